//! Shopping Cart
//!
//! This example walks a cart through its lifecycle and publishes every
//! transition through an in-memory mediator.
//!
//! Key concepts:
//! - Cart states (AddPending -> CheckedOut, AddPending -> AddFailed)
//! - A guard that only lets the cart check out once it holds ten items
//! - States built fresh on entry and looked up by machine name
//! - Transition events raised after the cart's changes are done
//!
//! Run with: RUST_LOG=debug cargo run --example shopping_cart

use async_trait::async_trait;
use statecraft::builder::{StateMachineBuilder, TransitionBuilder};
use statecraft::core::{
    Action, ContextRef, FsmError, SimpleState, State, StateContext, StateLabel,
};
use statecraft::delegate_state;
use statecraft::mediator::{
    Event, EventCollection, EventHandler, EventKind, InMemMediator, Mediator, MediatorConfig,
    StateTransitioned,
};
use statecraft::registry::{global, must_get_machine};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const CART_MACHINE: &str = "cart";

const ADD_PENDING: StateLabel = StateLabel::from_static("state.add_pending");
const ADD_FAILED: StateLabel = StateLabel::from_static("state.add_failed");
const CHECKED_OUT: StateLabel = StateLabel::from_static("state.checked_out");

const ADD: Action = Action::from_static("ADD");
const FAIL: Action = Action::from_static("FAIL");

// Cart-specific operations; states that do not support one report it as an
// invalid transition.
trait CartState: State {
    fn add_items(&mut self, items: &mut Vec<String>, new_items: &[&str]) -> Result<(), FsmError> {
        let _ = (items, new_items);
        Err(FsmError::transition_not_found(self.label(), &ADD))
    }
}

struct AddPending {
    base: SimpleState,
}

delegate_state!(AddPending, base);

impl CartState for AddPending {
    fn add_items(&mut self, items: &mut Vec<String>, new_items: &[&str]) -> Result<(), FsmError> {
        if new_items.len() > 10 {
            return Err(FsmError::Rejected("items is too many".to_string()));
        }
        items.extend(new_items.iter().map(|item| item.to_string()));
        Ok(())
    }
}

struct Terminal {
    base: SimpleState,
}

delegate_state!(Terminal, base);

impl CartState for Terminal {}

fn add_pending() -> Box<dyn CartState> {
    Box::new(AddPending {
        base: SimpleState::new(ADD_PENDING),
    })
}

fn terminal(label: StateLabel) -> impl Fn() -> Box<dyn CartState> + Send + Sync + 'static {
    move || -> Box<dyn CartState> {
        Box::new(Terminal {
            base: SimpleState::new(label.clone()),
        })
    }
}

// Cart entity
struct Cart {
    id: String,
    state: Box<dyn CartState>,
    items: Vec<String>,
    events: EventCollection,
}

impl Cart {
    fn new(id: &str) -> Self {
        let mut state = add_pending();
        state.set_context(ContextRef::new(id));
        Self {
            id: id.to_string(),
            state,
            items: Vec::new(),
            events: EventCollection::new(),
        }
    }

    fn add_items(&mut self, new_items: &[&str]) -> Result<(), FsmError> {
        let machine = must_get_machine::<Cart>(CART_MACHINE);
        if !machine.has_transition(self.state.label(), &ADD) {
            return Err(FsmError::transition_not_found(self.state.label(), &ADD));
        }
        if let Err(err) = self.state.add_items(&mut self.items, new_items) {
            machine.transition_to_next(self, &FAIL)?;
            return Err(err);
        }
        machine.transition_to_next(self, &ADD)
    }
}

impl StateContext for Cart {
    type State = dyn CartState;

    fn current_state(&self) -> &dyn CartState {
        self.state.as_ref()
    }

    fn transition_to(&mut self, mut next: Box<dyn CartState>, by: &Action) -> Result<(), FsmError> {
        next.set_context(ContextRef::new(self.id.as_str()));
        let previous = std::mem::replace(&mut self.state, next);
        self.events.add(StateTransitioned::new(
            previous.label().clone(),
            self.state.label().clone(),
            by.clone(),
            self.id.as_str(),
        ));
        Ok(())
    }
}

struct TransitionPrinter;

#[async_trait]
impl EventHandler for TransitionPrinter {
    fn listening(&self) -> Vec<EventKind> {
        vec![StateTransitioned::KIND]
    }

    async fn handle(&self, event: Arc<dyn Event>) {
        if let Some(event) = event.downcast_ref::<StateTransitioned>() {
            match event.to_json() {
                Ok(json) => println!("  event: {json}"),
                Err(err) => eprintln!("  failed to encode event: {err}"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Shopping Cart Example ===\n");

    StateMachineBuilder::<Cart>::new(CART_MACHINE)
        .state(ADD_PENDING, add_pending)
        .state(ADD_FAILED, terminal(ADD_FAILED))
        .state(CHECKED_OUT, terminal(CHECKED_OUT))
        .transition(
            TransitionBuilder::new()
                .from(ADD_PENDING)
                .to(CHECKED_OUT)
                .on(ADD)
                .when(|cart: &Cart| cart.items.len() == 10),
        )?
        .transition(TransitionBuilder::new().from(ADD_PENDING).to(ADD_FAILED).on(FAIL))?
        .register(global())?;

    let mediator = InMemMediator::new(MediatorConfig::default());
    mediator.subscribe(Arc::new(TransitionPrinter));

    println!("1. Adding three items...");
    let mut cart = Cart::new("cart-1");
    cart.add_items(&["apple", "pear", "plum"])?;
    println!("   State: {}", cart.state.label());

    println!("\n2. Adding seven more...");
    cart.add_items(&["fig", "kiwi", "lime", "lemon", "date", "grape", "melon"])?;
    println!("   State: {}", cart.state.label());

    println!("\n3. Adding to a checked out cart...");
    if let Err(err) = cart.add_items(&["cherry"]) {
        println!("   Rejected: {err}");
    }

    println!("\n4. Raising recorded events...");
    let raised = cart.events.raise(&mediator).await;
    println!("   Raised {raised} event(s)");

    let mut greedy = Cart::new("cart-2");
    let too_many = ["x"; 11];
    if let Err(err) = greedy.add_items(&too_many) {
        println!("\n5. Greedy cart rejected: {err}");
    }
    println!("   State: {}", greedy.state.label());
    greedy.events.raise(&mediator).await;

    // Handlers run in the background; let them finish before exiting.
    mediator.shutdown().await;

    println!("\n=== Example Complete ===");
    Ok(())
}
