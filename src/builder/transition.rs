//! Builder for constructing transition candidates.

use crate::builder::error::BuildError;
use crate::core::{Action, Guard, StateLabel};

/// A fully specified candidate edge, ready to be registered on a machine.
pub struct TransitionSpec<C> {
    pub from: StateLabel,
    pub to: StateLabel,
    pub action: Action,
    pub guard: Option<Guard<C>>,
}

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<C> {
    from: Option<StateLabel>,
    to: Option<StateLabel>,
    action: Option<Action>,
    guard: Option<Guard<C>>,
}

impl<C> TransitionBuilder<C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            action: None,
            guard: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, label: impl Into<StateLabel>) -> Self {
        self.from = Some(label.into());
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, label: impl Into<StateLabel>) -> Self {
        self.to = Some(label.into());
        self
    }

    /// Set the triggering action (required).
    pub fn on(mut self, action: impl Into<Action>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Add a guard predicate (optional).
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<TransitionSpec<C>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let action = self.action.ok_or(BuildError::MissingAction)?;

        Ok(TransitionSpec {
            from,
            to,
            action,
            guard: self.guard,
        })
    }
}

impl<C> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ticket {
        approvals: u8,
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = TransitionBuilder::<Ticket>::new().from("open").build();
        assert!(matches!(result, Err(BuildError::MissingToState)));

        let result = TransitionBuilder::<Ticket>::new().to("closed").build();
        assert!(matches!(result, Err(BuildError::MissingFromState)));
    }

    #[test]
    fn builder_validates_missing_action() {
        let result = TransitionBuilder::<Ticket>::new()
            .from("open")
            .to("closed")
            .build();

        assert!(matches!(result, Err(BuildError::MissingAction)));
    }

    #[test]
    fn transition_builder_with_guard() {
        let spec = TransitionBuilder::new()
            .from("review")
            .to("approved")
            .on("APPROVE")
            .when(|t: &Ticket| t.approvals >= 2)
            .build()
            .unwrap();

        let guard = spec.guard.expect("guard set");
        assert!(!guard.check(&Ticket { approvals: 1 }));
        assert!(guard.check(&Ticket { approvals: 2 }));
    }

    #[test]
    fn fluent_api_builds_transition() {
        let spec = TransitionBuilder::<Ticket>::new()
            .from("open")
            .to("review")
            .on("SUBMIT")
            .build()
            .unwrap();

        assert_eq!(spec.from, "open");
        assert_eq!(spec.to, "review");
        assert_eq!(spec.action, "SUBMIT");
        assert!(spec.guard.is_none());
    }
}
