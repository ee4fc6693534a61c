//! Provisioning engine trait definition

use crate::error::ProvisionError;
use crate::result::ApplyResult;
use async_trait::async_trait;
use featureflow_core::EnvironmentPlan;
use serde::{Deserialize, Serialize};

/// Anything that can turn an [`EnvironmentPlan`] into real resources
///
/// Implementations create resources in [`EnvironmentPlan::creation_order`]
/// (or wave by wave), resolve attribute references once their targets exist,
/// and report per-resource outcomes. Health probing, certificate issuance
/// and DNS propagation belong to the engine.
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Returns the engine name (e.g., "azure-arm")
    fn name(&self) -> &str;

    /// Check if the engine is configured and authenticated
    async fn check_auth(&self) -> AuthStatus;

    /// Apply the whole plan
    async fn apply(&self, plan: &EnvironmentPlan) -> Result<ApplyResult, ProvisionError>;
}

/// Authentication status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub authenticated: bool,

    /// Account or subscription information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}
