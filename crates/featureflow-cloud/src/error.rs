//! Provisioning error types

use featureflow_core::ValidationError;
use thiserror::Error;

/// Failure reported by a provisioning engine
///
/// The message is whatever the engine said. It is not reworded or classified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProvisionError {
    pub engine: String,
    pub message: String,
}

impl ProvisionError {
    pub fn new(engine: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DeployError {
    /// The plan could not be built; the engine was never called
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("provisioning failed ({engine}): {message}", engine = .0.engine, message = .0.message)]
    Provisioning(#[from] ProvisionError),
}

impl DeployError {
    /// `invalid-name`, `missing-reference`, ... or `provisioning`
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.reason(),
            Self::Provisioning(_) => "provisioning",
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
