//! FeatureFlow core
//!
//! Turns a feature name into a provisioning plan for an isolated, per-pull-request
//! feature environment: two container workloads behind a path router, a
//! storage mount for background jobs, telemetry, and an edge endpoint with a
//! custom domain and WAF policy.
//!
//! The builder is a pure function. It derives every resource name from the
//! feature identity, composes the workloads' environment variables, and
//! declares the dependency edges a provisioning engine needs to create
//! resources in a safe order.
//!
//! ```text
//! FeatureIdentity ─┐
//! ExternalRefs ────┼──▶ build() ──▶ EnvironmentPlan ──▶ provisioning engine
//! DeploymentConfig ┘                 (DAG of ResourceSpec)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use featureflow_core::{build_for, DeploymentConfig, ExternalReferenceSet};
//!
//! let plan = build_for("feature-1234", &refs, &config)?;
//! for resource in plan.creation_order() {
//!     println!("{} {}", resource.kind, resource.physical_name);
//! }
//! println!("{}", plan.outputs().feature_url);
//! ```

pub mod builder;
pub mod environment;
pub mod error;
pub mod model;
pub mod naming;
pub mod plan;
pub mod routing;

// Re-exports
pub use builder::{build, build_for};
pub use environment::Workload;
pub use error::{Result, ValidationError};
pub use model::*;
pub use naming::ResourceNames;
pub use plan::{ComputeOutput, EnvironmentPlan, PlanOutputs, PlanSummary};
pub use routing::RouteRule;
