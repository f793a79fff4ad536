//! Utility Module
//!
//! - [`FpsCounter`]: Frame rate measurement utility (the stats readout)
//! - [`time`]: Frame clock

pub mod fps_counter;
pub mod time;

pub use fps_counter::FpsCounter;
pub use time::Timer;
