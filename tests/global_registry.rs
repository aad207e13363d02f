//! The process-wide default registry.
//!
//! Kept in its own test binary: clearing the default registry would race
//! with any other test that registers machines there.

use statecraft::core::{Action, FsmError, SimpleState, StateContext};
use statecraft::machine::StateMachine;
use statecraft::registry::{clear_machines, get_machine, global, must_get_machine, register_machine};
use std::sync::Arc;

struct Lamp {
    state: Box<SimpleState>,
}

impl StateContext for Lamp {
    type State = SimpleState;

    fn current_state(&self) -> &SimpleState {
        &self.state
    }

    fn transition_to(&mut self, next: Box<SimpleState>, _: &Action) -> Result<(), FsmError> {
        self.state = next;
        Ok(())
    }
}

#[test]
fn clear_machines_empties_the_default_registry() {
    let kitchen = Arc::new(StateMachine::<Lamp>::new("lamp.kitchen"));
    register_machine(Arc::clone(&kitchen));
    register_machine(Arc::new(StateMachine::<Lamp>::new("lamp.hall")));
    assert_eq!(
        global().names(),
        vec!["lamp.hall".to_string(), "lamp.kitchen".to_string()]
    );
    assert!(Arc::ptr_eq(&must_get_machine::<Lamp>("lamp.kitchen"), &kitchen));

    clear_machines();

    assert!(global().is_empty());
    assert!(get_machine::<Lamp>("lamp.kitchen").is_none());
    assert!(get_machine::<Lamp>("lamp.hall").is_none());
    // Handed-out machines stay usable.
    assert_eq!(kitchen.name(), "lamp.kitchen");

    register_machine(Arc::new(StateMachine::<Lamp>::new("lamp.hall")));
    assert_eq!(global().len(), 1);
}
