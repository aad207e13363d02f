//! Statecraft: an embeddable finite state machine engine
//!
//! A host defines named states, the actions that move an entity between
//! them, optional guards on each transition and a factory that builds a
//! fresh state object whenever one is entered. The engine resolves and
//! commits transitions; the entity keeps ownership of its data and of its
//! current state.
//!
//! # Core Concepts
//!
//! - **State / StateContext**: the protocol between a per-state behaviour
//!   object and the entity that owns it
//! - **Guards**: predicates over the entity, tried in registration order
//! - **StateMachine**: transition table, state builders and the
//!   completeness check, shared by every entity of one kind
//! - **MachineRegistry**: named lookup of machines
//! - **Mediator**: publication of the events recorded while transitioning
//!
//! # Example
//!
//! ```rust
//! use statecraft::core::{Action, FsmError, Guard, SimpleState, State, StateContext, StateLabel};
//! use statecraft::machine::StateMachine;
//!
//! const PENDING: StateLabel = StateLabel::from_static("pending");
//! const CHECKED_OUT: StateLabel = StateLabel::from_static("checked_out");
//! const ADD: Action = Action::from_static("ADD");
//!
//! struct Cart {
//!     items: Vec<String>,
//!     state: Box<SimpleState>,
//! }
//!
//! impl StateContext for Cart {
//!     type State = SimpleState;
//!
//!     fn current_state(&self) -> &SimpleState {
//!         &self.state
//!     }
//!
//!     fn transition_to(&mut self, next: Box<SimpleState>, _by: &Action) -> Result<(), FsmError> {
//!         self.state = next;
//!         Ok(())
//!     }
//! }
//!
//! let machine = StateMachine::<Cart>::new("cart");
//! machine
//!     .add_transition(PENDING, CHECKED_OUT, ADD, Some(Guard::new(|c: &Cart| c.items.len() == 2)))
//!     .unwrap();
//! machine.register_state_builder(PENDING, || Box::new(SimpleState::new(PENDING))).unwrap();
//! machine.register_state_builder(CHECKED_OUT, || Box::new(SimpleState::new(CHECKED_OUT))).unwrap();
//! machine.check().unwrap();
//!
//! let mut cart = Cart { items: vec!["apple".into()], state: Box::new(SimpleState::new(PENDING)) };
//! machine.transition_to_next(&mut cart, &ADD).unwrap();
//! assert_eq!(cart.current_state().label(), &PENDING);
//!
//! cart.items.push("pear".into());
//! machine.transition_to_next(&mut cart, &ADD).unwrap();
//! assert_eq!(cart.current_state().label(), &CHECKED_OUT);
//! ```

#[macro_use]
mod macros;

pub mod builder;
pub mod core;
pub mod machine;
pub mod mediator;
pub mod registry;

// Re-export commonly used types
pub use self::builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use self::core::{Action, ContextRef, FsmError, Guard, SimpleState, State, StateContext, StateLabel};
pub use self::machine::{CheckError, StateMachine};
pub use self::registry::MachineRegistry;
