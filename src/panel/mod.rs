//! Debug panel abstraction: checkboxes, sliders, selects and buttons
//! grouped into folders, each bound to an `on_change` callback against a
//! caller-supplied context. A real widget toolkit renders the controls and
//! funnels its events into [`Panel::set_bool`] / [`Panel::set_number`] /
//! [`Panel::set_option`] / [`Panel::trigger`]; headless hosts (and tests)
//! call them directly.
//!
//! Control values persist as JSON under a fixed key in a [`StateStore`],
//! keyed per control by `folder/label`. There is no schema versioning:
//! entries that no longer match a control (or changed type) are silently
//! dropped on restore.

mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

pub use store::{JsonFileStore, MemoryStore, StateStore};

/// Storage key for the serialized panel state.
pub const PANEL_STATE_KEY: &str = "panel-state";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Number(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlId(usize);

#[derive(Debug, Clone, Copy)]
enum ControlKind {
    Checkbox,
    Slider { min: f64, max: f64 },
    /// Dropdown over the control's option list; its value is the selected
    /// index, stored as a number.
    Select,
    Button,
}

enum Callback<Ctx> {
    Change(Box<dyn FnMut(&mut Ctx, ControlValue)>),
    Press(Box<dyn FnMut(&mut Ctx)>),
}

struct Control<Ctx> {
    folder: String,
    label: String,
    kind: ControlKind,
    /// Select entries; empty for every other kind.
    options: Vec<String>,
    value: Option<ControlValue>,
    initial: Option<ControlValue>,
    callback: Callback<Ctx>,
}

impl<Ctx> Control<Ctx> {
    fn key(&self) -> String {
        format!("{}/{}", self.folder, self.label)
    }
}

/// Serialized panel state: one entry per persistable control.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct PanelState {
    pub values: BTreeMap<String, ControlValue>,
}

pub struct Panel<Ctx> {
    pub title: String,
    controls: Vec<Control<Ctx>>,
}

impl<Ctx> Panel<Ctx> {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            controls: Vec::new(),
        }
    }

    pub fn add_checkbox(
        &mut self,
        folder: &str,
        label: &str,
        initial: bool,
        mut on_change: impl FnMut(&mut Ctx, bool) + 'static,
    ) -> ControlId {
        self.push(
            folder,
            label,
            ControlKind::Checkbox,
            Vec::new(),
            Some(ControlValue::Bool(initial)),
            Callback::Change(Box::new(move |ctx, value| {
                if let ControlValue::Bool(b) = value {
                    on_change(ctx, b);
                }
            })),
        )
    }

    pub fn add_slider(
        &mut self,
        folder: &str,
        label: &str,
        initial: f64,
        min: f64,
        max: f64,
        mut on_change: impl FnMut(&mut Ctx, f64) + 'static,
    ) -> ControlId {
        self.push(
            folder,
            label,
            ControlKind::Slider { min, max },
            Vec::new(),
            Some(ControlValue::Number(initial)),
            Callback::Change(Box::new(move |ctx, value| {
                if let ControlValue::Number(n) = value {
                    on_change(ctx, n);
                }
            })),
        )
    }

    /// Adds a dropdown over `options`; the callback receives the chosen
    /// entry. The stored (and persisted) value is the selected index.
    pub fn add_select(
        &mut self,
        folder: &str,
        label: &str,
        options: Vec<String>,
        initial: usize,
        mut on_change: impl FnMut(&mut Ctx, &str) + 'static,
    ) -> ControlId {
        let entries = options.clone();
        self.push(
            folder,
            label,
            ControlKind::Select,
            options,
            Some(ControlValue::Number(initial as f64)),
            Callback::Change(Box::new(move |ctx, value| {
                if let ControlValue::Number(n) = value
                    && let Some(option) = entries.get(n as usize)
                {
                    on_change(ctx, option);
                }
            })),
        )
    }

    pub fn add_button(
        &mut self,
        folder: &str,
        label: &str,
        on_press: impl FnMut(&mut Ctx) + 'static,
    ) -> ControlId {
        self.push(
            folder,
            label,
            ControlKind::Button,
            Vec::new(),
            None,
            Callback::Press(Box::new(on_press)),
        )
    }

    fn push(
        &mut self,
        folder: &str,
        label: &str,
        kind: ControlKind,
        options: Vec<String>,
        value: Option<ControlValue>,
        callback: Callback<Ctx>,
    ) -> ControlId {
        self.controls.push(Control {
            folder: folder.to_string(),
            label: label.to_string(),
            kind,
            options,
            value,
            initial: value,
            callback,
        });
        ControlId(self.controls.len() - 1)
    }

    /// Applies a checkbox change and fires its callback.
    pub fn set_bool(&mut self, ctx: &mut Ctx, id: ControlId, value: bool) {
        let Some(control) = self.controls.get_mut(id.0) else {
            return;
        };
        if !matches!(control.kind, ControlKind::Checkbox) {
            return;
        }
        control.value = Some(ControlValue::Bool(value));
        if let Callback::Change(cb) = &mut control.callback {
            cb(ctx, ControlValue::Bool(value));
        }
    }

    /// Applies a slider change (clamped to the slider range) and fires its
    /// callback.
    pub fn set_number(&mut self, ctx: &mut Ctx, id: ControlId, value: f64) {
        let Some(control) = self.controls.get_mut(id.0) else {
            return;
        };
        let ControlKind::Slider { min, max } = control.kind else {
            return;
        };
        let value = value.clamp(min, max);
        control.value = Some(ControlValue::Number(value));
        if let Callback::Change(cb) = &mut control.callback {
            cb(ctx, ControlValue::Number(value));
        }
    }

    /// Applies a select change and fires its callback with the chosen
    /// entry. An out-of-range index is ignored.
    pub fn set_option(&mut self, ctx: &mut Ctx, id: ControlId, index: usize) {
        let Some(control) = self.controls.get_mut(id.0) else {
            return;
        };
        if !matches!(control.kind, ControlKind::Select) || index >= control.options.len() {
            return;
        }
        control.value = Some(ControlValue::Number(index as f64));
        if let Callback::Change(cb) = &mut control.callback {
            cb(ctx, ControlValue::Number(index as f64));
        }
    }

    /// Presses a button.
    pub fn trigger(&mut self, ctx: &mut Ctx, id: ControlId) {
        let Some(control) = self.controls.get_mut(id.0) else {
            return;
        };
        if let Callback::Press(cb) = &mut control.callback {
            cb(ctx);
        }
    }

    /// Updates a slider's displayed value without firing its callback. Used
    /// by the frame driver to reflect read-back state (e.g. blend weights).
    pub fn reflect_number(&mut self, id: ControlId, value: f64) {
        if let Some(control) = self.controls.get_mut(id.0)
            && matches!(control.kind, ControlKind::Slider { .. })
        {
            control.value = Some(ControlValue::Number(value));
        }
    }

    #[must_use]
    pub fn bool_value(&self, id: ControlId) -> Option<bool> {
        match self.controls.get(id.0)?.value? {
            ControlValue::Bool(b) => Some(b),
            ControlValue::Number(_) => None,
        }
    }

    #[must_use]
    pub fn number_value(&self, id: ControlId) -> Option<f64> {
        match self.controls.get(id.0)?.value? {
            ControlValue::Number(n) => Some(n),
            ControlValue::Bool(_) => None,
        }
    }

    /// The currently selected entry of a select control.
    #[must_use]
    pub fn selected_option(&self, id: ControlId) -> Option<&str> {
        let control = self.controls.get(id.0)?;
        match (control.value?, control.kind) {
            (ControlValue::Number(n), ControlKind::Select) => {
                control.options.get(n as usize).map(String::as_str)
            }
            _ => None,
        }
    }

    // ========================================================================
    // State persistence
    // ========================================================================

    /// Snapshot of every value-carrying control.
    #[must_use]
    pub fn save_state(&self) -> PanelState {
        let mut state = PanelState::default();
        for control in &self.controls {
            if let Some(value) = control.value {
                state.values.insert(control.key(), value);
            }
        }
        state
    }

    /// Applies a previously saved state, firing callbacks so the bound
    /// context follows along. Entries that do not match a current control's
    /// key and type are skipped.
    pub fn load_state(&mut self, ctx: &mut Ctx, state: &PanelState) {
        for index in 0..self.controls.len() {
            let id = ControlId(index);
            let key = self.controls[index].key();
            match (state.values.get(&key), self.controls[index].kind) {
                (Some(&ControlValue::Bool(b)), ControlKind::Checkbox) => {
                    self.set_bool(ctx, id, b);
                }
                (Some(&ControlValue::Number(n)), ControlKind::Slider { .. }) => {
                    self.set_number(ctx, id, n);
                }
                (Some(&ControlValue::Number(n)), ControlKind::Select) => {
                    self.set_option(ctx, id, n as usize);
                }
                _ => {}
            }
        }
    }

    /// Serializes the current state as JSON under [`PANEL_STATE_KEY`].
    pub fn persist(&self, store: &mut dyn StateStore) -> Result<()> {
        let json = serde_json::to_string(&self.save_state())?;
        store.set(PANEL_STATE_KEY, &json);
        Ok(())
    }

    /// Restores state from the store, if present. A payload that no longer
    /// parses is discarded (and removed) rather than reported: stale state
    /// from an older panel shape must never block startup.
    pub fn restore(&mut self, ctx: &mut Ctx, store: &mut dyn StateStore) -> bool {
        let Some(json) = store.get(PANEL_STATE_KEY) else {
            return false;
        };
        match serde_json::from_str::<PanelState>(&json) {
            Ok(state) => {
                self.load_state(ctx, &state);
                true
            }
            Err(err) => {
                log::warn!("discarding stale panel state: {err}");
                store.remove(PANEL_STATE_KEY);
                false
            }
        }
    }

    /// Restores every control to its initial value (firing callbacks) and
    /// drops the persisted state.
    pub fn reset(&mut self, ctx: &mut Ctx, store: &mut dyn StateStore) {
        for index in 0..self.controls.len() {
            let id = ControlId(index);
            match (self.controls[index].initial, self.controls[index].kind) {
                (Some(ControlValue::Bool(b)), _) => self.set_bool(ctx, id, b),
                (Some(ControlValue::Number(n)), ControlKind::Select) => {
                    self.set_option(ctx, id, n as usize);
                }
                (Some(ControlValue::Number(n)), _) => self.set_number(ctx, id, n),
                (None, _) => {}
            }
        }
        store.remove(PANEL_STATE_KEY);
    }
}
