//! The state machine: transition table, state builders and orchestration.
//!
//! A machine is configured once (transitions and builders registered, then
//! [`StateMachine::check`] run) and afterwards shared read-mostly between
//! any number of entities. Both tables sit behind a single reader/writer
//! lock; the machine holds no per-entity state.
//!
//! Callers must serialize transitions on the same entity. The `&mut C`
//! taken by [`StateMachine::transition_to_next`] makes that explicit.

mod check;
mod table;

pub use check::CheckError;

use crate::core::{Action, FsmError, Guard, State, StateContext, StateLabel};
use check::check_completeness;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use table::{resolve, Candidate, TransitionTable};
use tracing::{debug, error, warn};

/// Factory producing a fresh state value for one label.
pub type StateBuilder<C> = Arc<dyn Fn() -> Box<<C as StateContext>::State> + Send + Sync>;

struct Tables<C: StateContext> {
    transitions: TransitionTable<C>,
    builders: HashMap<StateLabel, StateBuilder<C>>,
    checked: bool,
}

/// Named state machine shared by every entity of one kind.
///
/// # Example
///
/// ```rust
/// use statecraft::core::{Action, FsmError, SimpleState, State, StateContext, StateLabel};
/// use statecraft::machine::StateMachine;
///
/// const OFF: StateLabel = StateLabel::from_static("off");
/// const ON: StateLabel = StateLabel::from_static("on");
/// const TOGGLE: Action = Action::from_static("TOGGLE");
///
/// struct Lamp {
///     state: Box<SimpleState>,
/// }
///
/// impl StateContext for Lamp {
///     type State = SimpleState;
///
///     fn current_state(&self) -> &SimpleState {
///         &self.state
///     }
///
///     fn transition_to(&mut self, next: Box<SimpleState>, _by: &Action) -> Result<(), FsmError> {
///         self.state = next;
///         Ok(())
///     }
/// }
///
/// let machine = StateMachine::<Lamp>::new("lamp");
/// machine.add_transition(OFF, ON, TOGGLE, None).unwrap();
/// machine.add_transition(ON, OFF, TOGGLE, None).unwrap();
/// machine.register_state_builder(OFF, || Box::new(SimpleState::new(OFF))).unwrap();
/// machine.register_state_builder(ON, || Box::new(SimpleState::new(ON))).unwrap();
/// machine.check().unwrap();
///
/// let mut lamp = Lamp { state: Box::new(SimpleState::new(OFF)) };
/// machine.transition_to_next(&mut lamp, &TOGGLE).unwrap();
/// assert_eq!(lamp.current_state().label(), &ON);
/// ```
pub struct StateMachine<C: StateContext> {
    name: String,
    inner: RwLock<Tables<C>>,
}

impl<C: StateContext> StateMachine<C> {
    /// Create an empty machine.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty; machine names are program wiring.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "state machine name is required");
        Self {
            name,
            inner: RwLock::new(Tables {
                transitions: TransitionTable::new(),
                builders: HashMap::new(),
                checked: false,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a candidate edge `from --action--> to`, optionally guarded.
    ///
    /// Registering the same (from, action) again appends another candidate;
    /// candidates are tried in registration order. Empty labels or actions
    /// are rejected and leave the table untouched.
    pub fn add_transition(
        &self,
        from: impl Into<StateLabel>,
        to: impl Into<StateLabel>,
        action: impl Into<Action>,
        guard: Option<Guard<C>>,
    ) -> Result<(), FsmError> {
        let (from, to, action) = (from.into(), to.into(), action.into());
        if from.is_empty() || to.is_empty() {
            error!(machine = %self.name, %from, %to, %action, "rejected transition with empty label");
            return Err(FsmError::EmptyLabel);
        }
        if action.is_empty() {
            error!(machine = %self.name, %from, %to, "rejected transition with empty action");
            return Err(FsmError::EmptyAction);
        }

        let mut tables = self.inner.write();
        tables.transitions.insert(from, action, Candidate { to, guard });
        tables.checked = false;
        Ok(())
    }

    /// Whether any candidate exists for (from, action), whatever its guard.
    pub fn has_transition(&self, from: &StateLabel, action: &Action) -> bool {
        self.inner.read().transitions.contains(from, action)
    }

    /// Register the factory for `label`, replacing any previous one.
    pub fn register_state_builder<F>(
        &self,
        label: impl Into<StateLabel>,
        builder: F,
    ) -> Result<(), FsmError>
    where
        F: Fn() -> Box<C::State> + Send + Sync + 'static,
    {
        self.insert_state_builder(label.into(), Arc::new(builder))
    }

    pub(crate) fn insert_state_builder(
        &self,
        label: StateLabel,
        builder: StateBuilder<C>,
    ) -> Result<(), FsmError> {
        if label.is_empty() {
            error!(machine = %self.name, "rejected state builder with empty label");
            return Err(FsmError::EmptyLabel);
        }

        let mut tables = self.inner.write();
        if tables.builders.insert(label.clone(), builder).is_some() {
            debug!(machine = %self.name, %label, "replaced state builder");
        }
        tables.checked = false;
        Ok(())
    }

    /// Move `context` to the next state for `action`.
    ///
    /// - No candidate for (current label, action): [`FsmError::TransitionNotFound`].
    /// - Candidates exist but every guard is false: `Ok(())`, state unchanged.
    /// - Otherwise a fresh state is built for the first satisfied candidate
    ///   and handed to [`StateContext::transition_to`], whose result is
    ///   returned as is.
    ///
    /// Guards run after the table lock is released, so they may query the
    /// machine themselves.
    pub fn transition_to_next(&self, context: &mut C, action: &Action) -> Result<(), FsmError> {
        let current = context.current_state().label().clone();
        let (candidates, checked) = {
            let tables = self.inner.read();
            match tables.transitions.candidates(&current, action) {
                Some(candidates) => (candidates.to_vec(), tables.checked),
                None => return Err(FsmError::transition_not_found(&current, action)),
            }
        };
        if !checked {
            debug!(machine = %self.name, "transition on a machine that has not passed check");
        }

        let Some(next) = resolve(&candidates, &*context) else {
            debug!(machine = %self.name, from = %current, %action, "no guard satisfied, staying");
            return Ok(());
        };

        let builder = self
            .inner
            .read()
            .builders
            .get(next)
            .cloned()
            .ok_or_else(|| FsmError::StateBuilderNotFound {
                label: next.clone(),
            })?;
        let state = builder();

        debug!(machine = %self.name, from = %current, to = %next, %action, "transitioning");
        context.transition_to(state, action)
    }

    /// Verify that transitions and state builders cover the same labels.
    ///
    /// Run once after registration and before serving traffic; a failure
    /// lists labels lacking a builder and labels no transition references.
    /// (from, action) pairs with several unguarded candidates are logged as
    /// warnings but do not fail the check.
    pub fn check(&self) -> Result<(), CheckError> {
        let mut tables = self.inner.write();

        for (from, action) in tables.transitions.shadowed() {
            warn!(
                machine = %self.name,
                %from,
                %action,
                "multiple unguarded transitions; only the first is reachable"
            );
        }

        let referenced = tables.transitions.labels();
        let built: BTreeSet<StateLabel> = tables.builders.keys().cloned().collect();
        let result = check_completeness(&self.name, &referenced, &built);
        tables.checked = result.is_ok();
        if let Err(err) = &result {
            error!(
                machine = %self.name,
                missing_state_builders = ?err.missing_state_builders,
                missing_transitions = ?err.missing_transitions,
                "state machine check failed"
            );
        }
        result
    }

    /// Whether the current configuration has passed [`check`](Self::check).
    ///
    /// Any later registration resets this.
    pub fn is_checked(&self) -> bool {
        self.inner.read().checked
    }

    /// (from, action) pairs whose later unguarded candidates are unreachable.
    pub fn shadowed_candidates(&self) -> Vec<(StateLabel, Action)> {
        self.inner.read().transitions.shadowed()
    }

    /// Labels referenced by any transition.
    pub fn labels(&self) -> BTreeSet<StateLabel> {
        self.inner.read().transitions.labels()
    }

    /// Labels that have a state builder.
    pub fn built_labels(&self) -> BTreeSet<StateLabel> {
        self.inner.read().builders.keys().cloned().collect()
    }

    /// Number of registered candidate edges.
    pub fn transition_count(&self) -> usize {
        self.inner.read().transitions.len()
    }
}

impl<C: StateContext> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.inner.read();
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("transitions", &tables.transitions.len())
            .field("builders", &tables.builders.len())
            .field("checked", &tables.checked)
            .finish()
    }
}
