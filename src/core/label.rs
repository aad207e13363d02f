//! Identifiers for states and actions.

identifier! {
    /// Name of a state within one machine's state space.
    ///
    /// ```
    /// use statecraft::core::StateLabel;
    ///
    /// const PENDING: StateLabel = StateLabel::from_static("pending");
    /// assert_eq!(PENDING, "pending");
    /// ```
    pub struct StateLabel;
}

identifier! {
    /// Name of the trigger that may move an entity between states.
    pub struct Action;
}
