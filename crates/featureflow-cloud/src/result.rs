//! Apply results reported back by an engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of applying one environment plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    /// Resources the engine created or updated
    pub succeeded: Vec<ResourceOutcome>,

    /// Resources the engine could not create
    pub failed: Vec<ResourceOutcome>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, logical_name: impl Into<String>, message: impl Into<String>) {
        self.succeeded.push(ResourceOutcome {
            logical_name: logical_name.into(),
            message: message.into(),
            error: None,
        });
    }

    pub fn add_failure(&mut self, logical_name: impl Into<String>, error: impl Into<String>) {
        self.failed.push(ResourceOutcome {
            logical_name: logical_name.into(),
            message: String::new(),
            error: Some(error.into()),
        });
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

impl fmt::Display for ApplyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed in {}ms",
            self.succeeded.len(),
            self.failed.len(),
            self.duration_ms
        )
    }
}

/// Result for a single planned resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOutcome {
    pub logical_name: String,
    pub message: String,
    /// Engine error, verbatim
    pub error: Option<String>,
}
