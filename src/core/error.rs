//! Errors raised while driving a state machine.

use super::label::{Action, StateLabel};
use thiserror::Error;

/// Errors that can occur when registering or performing transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    /// No candidate edge exists for the action from the current state.
    #[error("transition from {current} with action {action} not found")]
    TransitionNotFound { current: StateLabel, action: Action },

    /// A transition resolved to a label with no registered state builder.
    #[error("no state builder registered for {label}")]
    StateBuilderNotFound { label: StateLabel },

    /// A state handed to a context is not of the type the context requires.
    #[error("state {label} is not a {expected}")]
    StateMismatch {
        label: StateLabel,
        expected: &'static str,
    },

    /// Registration with an empty state label.
    #[error("state label must not be empty")]
    EmptyLabel,

    /// Registration with an empty action.
    #[error("action must not be empty")]
    EmptyAction,

    /// The context refused to commit the transition.
    #[error("transition rejected: {0}")]
    Rejected(String),
}

impl FsmError {
    /// Build [`FsmError::TransitionNotFound`] from borrowed identifiers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecraft::core::{Action, FsmError, StateLabel};
    ///
    /// let err = FsmError::transition_not_found(
    ///     &StateLabel::from_static("pending"),
    ///     &Action::from_static("REMOVE"),
    /// );
    /// assert!(err.is_transition_not_found());
    /// assert_eq!(err.to_string(), "transition from pending with action REMOVE not found");
    /// ```
    pub fn transition_not_found(current: &StateLabel, action: &Action) -> Self {
        Self::TransitionNotFound {
            current: current.clone(),
            action: action.clone(),
        }
    }

    /// Whether the requested operation is not valid in the current state,
    /// as opposed to a configuration or commit failure.
    pub fn is_transition_not_found(&self) -> bool {
        matches!(self, Self::TransitionNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_not_found_names_label_and_action() {
        let err = FsmError::transition_not_found(
            &StateLabel::from_static("pending"),
            &Action::from_static("REMOVE"),
        );
        assert_eq!(
            err.to_string(),
            "transition from pending with action REMOVE not found"
        );
        assert!(err.is_transition_not_found());
    }

    #[test]
    fn rejection_is_not_a_missing_transition() {
        assert!(!FsmError::Rejected("too many items".to_string()).is_transition_not_found());
    }
}
