//! Core domain types and the value-area state machine.

pub mod value_area;
pub mod guard;
pub mod state;
pub mod transition;
pub mod targets;
pub mod machine;
pub mod levels;
pub mod session;
pub mod config_validation;
pub mod error;
