//! Guard predicates for controlling state transitions.
//!
//! A guard is evaluated against the owning context when a transition is
//! resolved. Guards should be side-effect free; the engine does not enforce
//! this, and their evaluation order is observable (registration order).

use std::fmt;
use std::sync::Arc;

/// Predicate over a context that must hold for a candidate transition to be
/// selected.
///
/// # Example
///
/// ```rust
/// use statecraft::core::Guard;
///
/// struct Cart {
///     items: Vec<String>,
/// }
///
/// let full = Guard::new(|cart: &Cart| cart.items.len() == 10);
///
/// assert!(!full.check(&Cart { items: vec![] }));
/// assert!(full.check(&Cart { items: vec![String::new(); 10] }));
/// ```
pub struct Guard<C: ?Sized> {
    predicate: Arc<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C: ?Sized> Guard<C> {
    /// Create a guard from a predicate function.
    ///
    /// The predicate must be thread-safe (Send + Sync); machines are shared
    /// across threads.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard against the context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}

impl<C: ?Sized> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C: ?Sized> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
