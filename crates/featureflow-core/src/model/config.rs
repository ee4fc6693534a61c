use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Container image reference, without the registry host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
        }
    }

    /// `{registry}/{name}:{tag}`
    pub fn qualified(&self, registry: &str) -> String {
        format!("{}/{}:{}", registry, self.name, self.tag)
    }
}

/// Application feature toggles rendered into the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub enable_playground: bool,
    pub enable_unsecure_playground: bool,
    pub super_administrator_mode: bool,
    pub include_exception_details: bool,
    pub has_custom_jwt_secret: bool,
    pub use_elastic8: bool,
}

/// Per-deployment options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    /// Container registry host (e.g. "nordicfeatures.azurecr.io")
    pub registry_server: String,

    pub nordic_image: ImageRef,

    pub worker_image: ImageRef,

    #[serde(default)]
    pub feature_flags: FeatureFlags,

    /// Search endpoint, only consulted when `use_elastic8` is set
    #[serde(default)]
    pub elastic_endpoint: Option<String>,

    /// Web application firewall policy resource id
    pub waf_policy_id: String,

    /// Zone feature hostnames are created under (e.g. "cust.nisportal.com")
    pub dns_zone_name: String,

    /// Pull request number or other token identifying the change
    pub pr_id: String,
}

impl DeploymentConfig {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("registryServer", &self.registry_server)?;
        require_non_empty("nordicImage.name", &self.nordic_image.name)?;
        require_non_empty("nordicImage.tag", &self.nordic_image.tag)?;
        require_non_empty("workerImage.name", &self.worker_image.name)?;
        require_non_empty("workerImage.tag", &self.worker_image.tag)?;
        require_non_empty("wafPolicyId", &self.waf_policy_id)?;
        validate_pr_id(&self.pr_id)?;
        validate_zone_name(&self.dns_zone_name)?;

        if self.feature_flags.use_elastic8 {
            match self.elastic_endpoint.as_deref() {
                Some(endpoint) if !endpoint.trim().is_empty() => {}
                _ => {
                    return Err(ValidationError::InvalidConfig(
                        "elasticEndpoint is required when useElastic8 is enabled".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidConfig(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

fn validate_pr_id(pr_id: &str) -> Result<()> {
    require_non_empty("prId", pr_id)?;
    if pr_id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidConfig(format!(
            "prId '{}' must be a single token",
            pr_id
        )));
    }
    Ok(())
}

fn validate_zone_name(zone: &str) -> Result<()> {
    require_non_empty("dnsZoneName", zone)?;

    let labels_ok = zone.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    });

    if !labels_ok || !zone.contains('.') {
        return Err(ValidationError::InvalidConfig(format!(
            "dnsZoneName '{}' is not a lowercase DNS name",
            zone
        )));
    }
    Ok(())
}
