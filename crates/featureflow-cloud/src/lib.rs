//! FeatureFlow provisioning seam
//!
//! FeatureFlow only describes environments. Creating them is the job of a
//! provisioning engine implementing [`ProvisioningEngine`]; this crate
//! defines that contract and the [`deploy`] wrapper that validates a plan
//! before any engine is contacted.
//!
//! ```text
//! deploy() ──▶ featureflow_core::build() ──▶ EnvironmentPlan
//!    │                                           │
//!    └──▶ engine.check_auth() ──▶ engine.apply(&plan) ──▶ ApplyResult
//! ```

pub mod deploy;
pub mod error;
pub mod provider;
pub mod result;

// Re-exports
pub use deploy::{Deployment, deploy};
pub use error::{DeployError, ProvisionError, Result};
pub use provider::{AuthStatus, ProvisioningEngine};
pub use result::{ApplyResult, ResourceOutcome};
