//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders that collect a machine's states and
//! transitions and run the completeness check as the final build step.

pub mod error;
pub mod machine;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::{TransitionBuilder, TransitionSpec};
