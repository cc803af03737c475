//! Platform abstraction layer
//!
//! Turns host keyboard events into the per-tick intent snapshot the
//! simulation consumes. Key names are browser `KeyboardEvent.code` values.

pub mod input;

pub use input::{InputState, Intent, KeyBindings};
