//! Transition table keyed by (from, action).

use crate::core::{Action, Guard, StateLabel};
use std::collections::{BTreeSet, HashMap};

/// One registered destination for a (from, action) pair.
pub(crate) struct Candidate<C> {
    pub(crate) to: StateLabel,
    pub(crate) guard: Option<Guard<C>>,
}

impl<C> Candidate<C> {
    fn is_unconditional(&self) -> bool {
        self.guard.is_none()
    }
}

impl<C> Clone for Candidate<C> {
    fn clone(&self) -> Self {
        Self {
            to: self.to.clone(),
            guard: self.guard.clone(),
        }
    }
}

/// Candidates are kept per (from, action) in registration order, which is
/// also their resolution priority.
pub(crate) struct TransitionTable<C> {
    edges: HashMap<StateLabel, HashMap<Action, Vec<Candidate<C>>>>,
}

impl<C> TransitionTable<C> {
    pub(crate) fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, from: StateLabel, action: Action, candidate: Candidate<C>) {
        self.edges
            .entry(from)
            .or_default()
            .entry(action)
            .or_default()
            .push(candidate);
    }

    pub(crate) fn contains(&self, from: &StateLabel, action: &Action) -> bool {
        self.candidates(from, action).is_some()
    }

    pub(crate) fn candidates(&self, from: &StateLabel, action: &Action) -> Option<&[Candidate<C>]> {
        self.edges
            .get(from)
            .and_then(|actions| actions.get(action))
            .map(Vec::as_slice)
            .filter(|candidates| !candidates.is_empty())
    }

    /// Every label appearing as a source or destination of some edge.
    pub(crate) fn labels(&self) -> BTreeSet<StateLabel> {
        let mut labels = BTreeSet::new();
        for (from, actions) in &self.edges {
            labels.insert(from.clone());
            for candidates in actions.values() {
                labels.extend(candidates.iter().map(|c| c.to.clone()));
            }
        }
        labels
    }

    pub(crate) fn len(&self) -> usize {
        self.edges
            .values()
            .flat_map(HashMap::values)
            .map(Vec::len)
            .sum()
    }

    /// (from, action) pairs with more than one unconditional candidate.
    ///
    /// Only the first of those candidates can ever be selected.
    pub(crate) fn shadowed(&self) -> Vec<(StateLabel, Action)> {
        let mut shadowed: Vec<(StateLabel, Action)> = self
            .edges
            .iter()
            .flat_map(|(from, actions)| {
                actions
                    .iter()
                    .filter(|(_, candidates)| {
                        candidates.iter().filter(|c| c.is_unconditional()).count() > 1
                    })
                    .map(move |(action, _)| (from.clone(), action.clone()))
            })
            .collect();
        shadowed.sort();
        shadowed
    }
}

/// Pick the first candidate whose guard is absent or holds for `context`.
pub(crate) fn resolve<'a, C>(candidates: &'a [Candidate<C>], context: &C) -> Option<&'a StateLabel> {
    candidates
        .iter()
        .find(|candidate| candidate.guard.as_ref().is_none_or(|g| g.check(context)))
        .map(|candidate| &candidate.to)
}
