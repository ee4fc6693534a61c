//! Environment-variable composition for the compute services
//!
//! Composition order is fixed: shared base set, then the JWT block when a
//! custom secret is configured, then the workload's port entry. Both
//! workloads get the same set apart from that final entry.

use crate::model::{
    AttributeRef, DeploymentConfig, EnvValue, EnvironmentVariableSet, ExternalKind,
    ExternalReferenceSet, FeatureFlags,
};
use crate::naming::ResourceNames;

pub const JWT_PREFIX: &str = "Security__Jwt__";
pub const JWT_ISSUER: &str = "https://auth.nisportal.com/feature";
pub const JWT_AUDIENCE: &str = "nordic-feature";
pub const JWT_SECRET_NAME: &str = "custom-jwt-secret";

pub const PORT_VARIABLE: &str = "ASPNETCORE_HTTP_PORTS";

pub const ATTR_CLIENT_ID: &str = "clientId";
pub const ATTR_CONNECTION_STRING: &str = "connectionString";

/// The two compute workloads of a feature environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Workload {
    Nordic,
    Worker,
}

impl Workload {
    pub const ALL: [Workload; 2] = [Workload::Nordic, Workload::Worker];

    pub fn port(&self) -> u16 {
        match self {
            Workload::Nordic => 8080,
            Workload::Worker => 8081,
        }
    }
}

impl std::fmt::Display for Workload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Workload::Nordic => write!(f, "nordic"),
            Workload::Worker => write!(f, "worker"),
        }
    }
}

/// `"true"` / `"false"`
pub fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Configuration label used to select per-feature app configuration
pub fn config_label(pr_id: &str) -> String {
    format!("Feature-{}", pr_id)
}

/// Shared variables every workload receives
pub fn base_environment(
    names: &ResourceNames,
    refs: &ExternalReferenceSet,
    config: &DeploymentConfig,
) -> EnvironmentVariableSet {
    let flags = &config.feature_flags;

    let client_id: EnvValue = match refs
        .get(ExternalKind::Identity)
        .and_then(|r| r.attribute(ATTR_CLIENT_ID))
    {
        Some(id) => id.into(),
        None => AttributeRef::external(ExternalKind::Identity, ATTR_CLIENT_ID).into(),
    };

    let (search_url, search_prefix, search_stream) = if flags.use_elastic8 {
        (
            config.elastic_endpoint.clone().unwrap_or_default(),
            names.feature.clone(),
            format!("logs-nordic-{}", names.feature),
        )
    } else {
        (String::new(), String::new(), String::new())
    };

    EnvironmentVariableSet::new()
        .with("ASPNETCORE_ENVIRONMENT", "Feature")
        .with("AZURE_CLIENT_ID", client_id)
        .with(
            "APPLICATIONINSIGHTS_CONNECTION_STRING",
            AttributeRef::resource(&names.telemetry, ATTR_CONNECTION_STRING),
        )
        .with("AppConfiguration__Label", config_label(&config.pr_id))
        .with("FeatureUrl", names.feature_url())
        .with("ElasticSearch__Url", search_url)
        .with("ElasticSearch__IndexPrefix", search_prefix)
        .with("ElasticSearch__DataStream", search_stream)
        .with(
            "Features__EnablePlayground",
            flag(flags.enable_playground),
        )
        .with(
            "Features__EnableUnsecurePlayground",
            flag(flags.enable_unsecure_playground),
        )
        .with(
            "Features__SuperAdministratorMode",
            flag(flags.super_administrator_mode),
        )
        .with(
            "Features__IncludeExceptionDetails",
            flag(flags.include_exception_details),
        )
        .with("Features__UseElastic8", flag(flags.use_elastic8))
}

/// Fixed three-entry JWT block
pub fn jwt_block() -> EnvironmentVariableSet {
    EnvironmentVariableSet::new()
        .with(format!("{}Issuer", JWT_PREFIX), JWT_ISSUER)
        .with(format!("{}Audience", JWT_PREFIX), JWT_AUDIENCE)
        .with(format!("{}SecretName", JWT_PREFIX), JWT_SECRET_NAME)
}

/// Merge base → JWT block (if enabled) → port entry
pub fn compose(
    base: &EnvironmentVariableSet,
    flags: &FeatureFlags,
    workload: Workload,
) -> EnvironmentVariableSet {
    let mut env = base.clone();
    if flags.has_custom_jwt_secret {
        env.merge(jwt_block());
    }
    env.set(PORT_VARIABLE, workload.port().to_string());
    env
}
