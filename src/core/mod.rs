//! Core state machine types.
//!
//! This module contains the vocabulary shared by every machine:
//! - Identifiers for states and actions
//! - The `State` / `StateContext` protocol
//! - Guard predicates for transition control
//! - The error type returned while driving transitions

mod error;
mod guard;
mod label;
mod state;

pub use error::FsmError;
pub use guard::Guard;
pub use label::{Action, StateLabel};
pub use state::{
    downcast_state, downcast_state_mut, downcast_state_ref, AsAny, ContextRef, SimpleState,
    State, StateContext,
};
