//! Completeness check over transitions and state builders.
//!
//! Both kinds of problem are accumulated with `Validation` so a single run
//! reports everything that is wrong with a machine's configuration.

use crate::core::StateLabel;
use serde::Serialize;
use std::collections::BTreeSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// One category of configuration problem found by the check.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CheckViolation {
    /// Labels referenced by transitions that have no state builder.
    MissingStateBuilders(Vec<StateLabel>),
    /// Labels with a builder that no transition references.
    MissingTransitions(Vec<StateLabel>),
}

/// A machine's transitions and state builders do not cover the same labels.
///
/// Hosts should treat this as a deployment blocker.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error(
    "state machine {machine} check failed: missing_state_builders=[{}], missing_transitions=[{}]",
    join(.missing_state_builders),
    join(.missing_transitions)
)]
pub struct CheckError {
    pub machine: String,
    pub missing_state_builders: Vec<StateLabel>,
    pub missing_transitions: Vec<StateLabel>,
}

fn join(labels: &[StateLabel]) -> String {
    labels
        .iter()
        .map(StateLabel::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Compare the labels referenced by transitions with the labels that have a
/// builder. Reported lists are sorted.
pub(crate) fn check_completeness(
    machine: &str,
    referenced: &BTreeSet<StateLabel>,
    built: &BTreeSet<StateLabel>,
) -> Result<(), CheckError> {
    let missing_builders: Vec<StateLabel> = referenced.difference(built).cloned().collect();
    let missing_transitions: Vec<StateLabel> = built.difference(referenced).cloned().collect();

    let checks: Vec<Validation<(), NonEmptyVec<CheckViolation>>> = vec![
        if missing_builders.is_empty() {
            Validation::success(())
        } else {
            Validation::fail(CheckViolation::MissingStateBuilders(missing_builders))
        },
        if missing_transitions.is_empty() {
            Validation::success(())
        } else {
            Validation::fail(CheckViolation::MissingTransitions(missing_transitions))
        },
    ];

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => {
            let mut error = CheckError {
                machine: machine.to_string(),
                missing_state_builders: Vec::new(),
                missing_transitions: Vec::new(),
            };
            for violation in violations.iter() {
                match violation {
                    CheckViolation::MissingStateBuilders(labels) => {
                        error.missing_state_builders.extend(labels.iter().cloned())
                    }
                    CheckViolation::MissingTransitions(labels) => {
                        error.missing_transitions.extend(labels.iter().cloned())
                    }
                }
            }
            Err(error)
        }
    }
}
