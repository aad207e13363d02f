//! Build errors for state machine and transition builders.

use crate::core::FsmError;
use crate::machine::CheckError;
use thiserror::Error;

/// Errors that can occur when building state machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("State machine name not specified")]
    MissingName,

    #[error("Transition source state not specified. Call .from(label)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(label)")]
    MissingToState,

    #[error("Transition action not specified. Call .on(action)")]
    MissingAction,

    #[error("Registration rejected: {0}")]
    Registration(#[from] FsmError),

    #[error(transparent)]
    Check(#[from] CheckError),
}
