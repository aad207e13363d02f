//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::{TransitionBuilder, TransitionSpec};
use crate::core::{StateContext, StateLabel};
use crate::machine::{StateBuilder, StateMachine};
use crate::registry::MachineRegistry;
use std::sync::Arc;

/// Builder that registers states and transitions, then runs the
/// completeness check before handing the machine out.
pub struct StateMachineBuilder<C: StateContext> {
    name: String,
    states: Vec<(StateLabel, StateBuilder<C>)>,
    transitions: Vec<TransitionSpec<C>>,
}

impl<C: StateContext> StateMachineBuilder<C> {
    /// Create a new builder for the machine called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Register the state builder for `label`.
    pub fn state<F>(mut self, label: impl Into<StateLabel>, builder: F) -> Self
    where
        F: Fn() -> Box<C::State> + Send + Sync + 'static,
    {
        self.states.push((label.into(), Arc::new(builder)));
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<C>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: TransitionSpec<C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<TransitionSpec<C>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Build the state machine.
    /// Returns an error if a registration is rejected or the check fails.
    pub fn build(self) -> Result<StateMachine<C>, BuildError> {
        if self.name.is_empty() {
            return Err(BuildError::MissingName);
        }

        let machine = StateMachine::new(self.name);
        for (label, builder) in self.states {
            machine.insert_state_builder(label, builder)?;
        }
        for spec in self.transitions {
            machine.add_transition(spec.from, spec.to, spec.action, spec.guard)?;
        }
        machine.check()?;

        Ok(machine)
    }

    /// Build the machine and register it in `registry`.
    pub fn register(self, registry: &MachineRegistry) -> Result<Arc<StateMachine<C>>, BuildError>
    where
        C: 'static,
    {
        let machine = Arc::new(self.build()?);
        registry.register(Arc::clone(&machine));
        Ok(machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, FsmError, SimpleState, State};

    const DRAFT: StateLabel = StateLabel::from_static("draft");
    const PUBLISHED: StateLabel = StateLabel::from_static("published");
    const PUBLISH: Action = Action::from_static("PUBLISH");

    struct Post {
        words: usize,
        state: Box<SimpleState>,
    }

    impl StateContext for Post {
        type State = SimpleState;

        fn current_state(&self) -> &SimpleState {
            &self.state
        }

        fn transition_to(&mut self, next: Box<SimpleState>, _: &Action) -> Result<(), FsmError> {
            self.state = next;
            Ok(())
        }
    }

    fn simple(label: StateLabel) -> impl Fn() -> Box<SimpleState> + Send + Sync + 'static {
        move || Box::new(SimpleState::new(label.clone()))
    }

    #[test]
    fn builder_requires_name() {
        let result = StateMachineBuilder::<Post>::new("").build();
        assert!(matches!(result, Err(BuildError::MissingName)));
    }

    #[test]
    fn fluent_api_builds_checked_machine() {
        let machine = StateMachineBuilder::<Post>::new("posts")
            .state(DRAFT, simple(DRAFT))
            .state(PUBLISHED, simple(PUBLISHED))
            .transition(
                TransitionBuilder::new()
                    .from(DRAFT)
                    .to(PUBLISHED)
                    .on(PUBLISH)
                    .when(|p: &Post| p.words > 100),
            )
            .unwrap()
            .build()
            .unwrap();

        assert!(machine.is_checked());

        let mut post = Post {
            words: 10,
            state: Box::new(SimpleState::new(DRAFT)),
        };
        machine.transition_to_next(&mut post, &PUBLISH).unwrap();
        assert_eq!(post.current_state().label(), &DRAFT);

        post.words = 500;
        machine.transition_to_next(&mut post, &PUBLISH).unwrap();
        assert_eq!(post.current_state().label(), &PUBLISHED);
    }

    #[test]
    fn build_runs_completeness_check() {
        let result = StateMachineBuilder::<Post>::new("posts")
            .state(DRAFT, simple(DRAFT))
            .transition(TransitionBuilder::new().from(DRAFT).to(PUBLISHED).on(PUBLISH))
            .unwrap()
            .build();

        match result {
            Err(BuildError::Check(err)) => {
                assert_eq!(err.missing_state_builders, vec![PUBLISHED]);
            }
            other => panic!("expected check failure, got {other:?}"),
        }
    }

    #[test]
    fn empty_action_is_a_registration_error() {
        let result = StateMachineBuilder::<Post>::new("posts")
            .state(DRAFT, simple(DRAFT))
            .state(PUBLISHED, simple(PUBLISHED))
            .add_transition(TransitionSpec {
                from: DRAFT,
                to: PUBLISHED,
                action: Action::from_static(""),
                guard: None,
            })
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Registration(FsmError::EmptyAction))
        ));
    }

    #[test]
    fn register_stores_machine_by_name() {
        let registry = MachineRegistry::new();
        let machine = StateMachineBuilder::<Post>::new("posts")
            .state(DRAFT, simple(DRAFT))
            .state(PUBLISHED, simple(PUBLISHED))
            .transitions(vec![TransitionBuilder::new()
                .from(DRAFT)
                .to(PUBLISHED)
                .on(PUBLISH)
                .build()
                .unwrap()])
            .register(&registry)
            .unwrap();

        assert!(Arc::ptr_eq(&registry.must_get::<Post>("posts"), &machine));
    }
}
