//! Domain types for the weekly signal engine

pub mod bar;
pub mod signal;

pub use bar::{Bar, MIN_WEEKLY_SPACING_DAYS};
pub use signal::{PersistedState, PositionAction, SignalResult, SignalType, SubSignals};
