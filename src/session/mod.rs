// src/session/mod.rs
//! Per-session glue: config, pass lifecycle, instancing.

pub mod state;
pub mod tasks;
pub mod instancing;
pub mod plugin;
pub mod stack;

pub use plugin::PlatformerStartupSet;
pub use stack::PlatformerStackPlugin;
pub use state::{PassFailed, PassSummary, PlatformerSession, RegenerateRequested};
