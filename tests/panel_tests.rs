//! Panel Tests
//!
//! Tests for:
//! - Callback dispatch for checkboxes, sliders and buttons
//! - Slider range clamping and silent read-back reflection
//! - State save/load round-trips through a StateStore
//! - Silent discard of stale or mismatched persisted state

use waltz::panel::{MemoryStore, PANEL_STATE_KEY, Panel, StateStore};

#[derive(Default)]
struct Ctx {
    flag: bool,
    level: f64,
    choice: String,
    presses: u32,
}

fn build_panel() -> Panel<Ctx> {
    let mut panel = Panel::new("Test Panel");
    panel.add_checkbox("General", "flag", false, |ctx: &mut Ctx, v| ctx.flag = v);
    panel.add_slider("General", "level", 0.5, 0.0, 1.0, |ctx, v| ctx.level = v);
    panel.add_button("General", "press", |ctx| ctx.presses += 1);
    panel
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn callbacks_fire_on_change() {
    let mut ctx = Ctx::default();
    let mut panel = Panel::new("p");
    let flag = panel.add_checkbox("f", "flag", false, |ctx: &mut Ctx, v| ctx.flag = v);
    let level = panel.add_slider("f", "level", 0.0, 0.0, 2.0, |ctx, v| ctx.level = v);
    let press = panel.add_button("f", "press", |ctx| ctx.presses += 1);

    panel.set_bool(&mut ctx, flag, true);
    panel.set_number(&mut ctx, level, 1.5);
    panel.trigger(&mut ctx, press);
    panel.trigger(&mut ctx, press);

    assert!(ctx.flag);
    assert!((ctx.level - 1.5).abs() < 1e-9);
    assert_eq!(ctx.presses, 2);
    assert_eq!(panel.bool_value(flag), Some(true));
    assert_eq!(panel.number_value(level), Some(1.5));
}

#[test]
fn slider_values_clamp_to_range() {
    let mut ctx = Ctx::default();
    let mut panel = Panel::new("p");
    let level = panel.add_slider("f", "level", 0.5, 0.0, 1.0, |ctx: &mut Ctx, v| ctx.level = v);

    panel.set_number(&mut ctx, level, 7.0);
    assert_eq!(panel.number_value(level), Some(1.0));
    assert!((ctx.level - 1.0).abs() < 1e-9);

    panel.set_number(&mut ctx, level, -3.0);
    assert_eq!(panel.number_value(level), Some(0.0));
}

#[test]
fn reflect_updates_display_without_firing() {
    let ctx = Ctx::default();
    let mut panel = Panel::new("p");
    let level = panel.add_slider("f", "level", 0.0, 0.0, 1.0, |ctx: &mut Ctx, v| ctx.level = v);

    panel.reflect_number(level, 0.8);
    assert_eq!(panel.number_value(level), Some(0.8));
    assert!((ctx.level).abs() < 1e-9, "reflection must not run the callback");
}

#[test]
fn select_dispatches_the_chosen_entry() {
    let mut ctx = Ctx::default();
    let mut panel = Panel::new("p");
    let dance = panel.add_select(
        "f",
        "dance",
        vec!["samba".to_string(), "waltz".to_string()],
        0,
        |ctx: &mut Ctx, name| ctx.choice = name.to_string(),
    );
    assert_eq!(panel.selected_option(dance), Some("samba"));

    panel.set_option(&mut ctx, dance, 1);
    assert_eq!(ctx.choice, "waltz");
    assert_eq!(panel.selected_option(dance), Some("waltz"));

    panel.set_option(&mut ctx, dance, 7);
    assert_eq!(
        panel.selected_option(dance),
        Some("waltz"),
        "out-of-range index is ignored"
    );
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn state_round_trip_reproduces_values() {
    let mut store = MemoryStore::new();

    let mut ctx = Ctx::default();
    let mut panel = build_panel();
    // change away from defaults
    let flag = panel.add_checkbox("Extra", "other flag", false, |ctx: &mut Ctx, v| ctx.flag = v);
    panel.set_bool(&mut ctx, flag, true);
    panel.persist(&mut store).unwrap();

    // same schema, fresh panel and context
    let mut ctx2 = Ctx::default();
    let mut panel2 = build_panel();
    let flag2 = panel2.add_checkbox("Extra", "other flag", false, |ctx: &mut Ctx, v| ctx.flag = v);
    assert!(panel2.restore(&mut ctx2, &mut store));

    assert_eq!(panel2.save_state(), panel.save_state());
    assert_eq!(panel2.bool_value(flag2), Some(true));
    assert!(ctx2.flag, "restored values flow through callbacks");
}

#[test]
fn restore_without_saved_state_is_a_noop() {
    let mut store = MemoryStore::new();
    let mut ctx = Ctx::default();
    let mut panel = build_panel();
    assert!(!panel.restore(&mut ctx, &mut store));
}

#[test]
fn malformed_state_is_discarded_and_removed() {
    let mut store = MemoryStore::new();
    store.set(PANEL_STATE_KEY, "{ not json ]");

    let mut ctx = Ctx::default();
    let mut panel = build_panel();
    assert!(!panel.restore(&mut ctx, &mut store));
    assert!(store.get(PANEL_STATE_KEY).is_none(), "stale payload is dropped");
}

#[test]
fn mismatched_entries_are_skipped() {
    let mut store = MemoryStore::new();
    // "General/flag" carries a number now, "General/gone" no longer exists
    store.set(
        PANEL_STATE_KEY,
        r#"{"values":{"General/flag":0.75,"General/gone":true,"General/level":0.9}}"#,
    );

    let mut ctx = Ctx::default();
    let mut panel = build_panel();
    assert!(panel.restore(&mut ctx, &mut store));

    assert!(!ctx.flag, "type-mismatched entry is ignored");
    assert!((ctx.level - 0.9).abs() < 1e-9, "matching entry still applies");
}

#[test]
fn select_round_trips_and_resets() {
    let options = || vec!["samba".to_string(), "waltz".to_string(), "tango".to_string()];
    let mut store = MemoryStore::new();

    let mut ctx = Ctx::default();
    let mut panel = Panel::new("p");
    let dance = panel.add_select("f", "dance", options(), 0, |ctx: &mut Ctx, name| {
        ctx.choice = name.to_string();
    });
    panel.set_option(&mut ctx, dance, 2);
    panel.persist(&mut store).unwrap();

    let mut ctx2 = Ctx::default();
    let mut panel2 = Panel::new("p");
    let dance2 = panel2.add_select("f", "dance", options(), 0, |ctx: &mut Ctx, name| {
        ctx.choice = name.to_string();
    });
    assert!(panel2.restore(&mut ctx2, &mut store));
    assert_eq!(panel2.selected_option(dance2), Some("tango"));
    assert_eq!(ctx2.choice, "tango", "restored selection fires the callback");

    panel2.reset(&mut ctx2, &mut store);
    assert_eq!(panel2.selected_option(dance2), Some("samba"));
    assert!(store.get(PANEL_STATE_KEY).is_none());
}

#[test]
fn reset_restores_defaults_and_clears_store() {
    let mut store = MemoryStore::new();
    let mut ctx = Ctx::default();
    let mut panel = Panel::new("p");
    let flag = panel.add_checkbox("f", "flag", false, |ctx: &mut Ctx, v| ctx.flag = v);
    let level = panel.add_slider("f", "level", 0.5, 0.0, 1.0, |ctx, v| ctx.level = v);

    panel.set_bool(&mut ctx, flag, true);
    panel.set_number(&mut ctx, level, 0.9);
    panel.persist(&mut store).unwrap();

    panel.reset(&mut ctx, &mut store);
    assert_eq!(panel.bool_value(flag), Some(false));
    assert_eq!(panel.number_value(level), Some(0.5));
    assert!(!ctx.flag);
    assert!(store.get(PANEL_STATE_KEY).is_none());
}
