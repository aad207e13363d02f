//! Mediator configuration.

use serde::{Deserialize, Serialize};

const DEFAULT_CONCURRENCY: usize = 16;

/// Settings for [`InMemMediator`](super::InMemMediator).
///
/// Deserializable so hosts can embed it in their own configuration files;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediatorConfig {
    /// Maximum number of handler invocations running at once.
    pub concurrency: usize,
}

impl MediatorConfig {
    /// Config with an explicit concurrency limit.
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self { concurrency }
    }

    /// Concurrency actually used; values below one are raised to one and
    /// values above `u32::MAX` are lowered to it.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, u32::MAX as usize)
    }
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
