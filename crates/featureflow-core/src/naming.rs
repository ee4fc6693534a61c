//! Resource naming policy
//!
//! Every physical and logical name in a plan is a pure function of the
//! feature identity (plus the DNS zone for the custom domain). Names that
//! live in shared scopes (the hosting environment, the edge profile) carry
//! the identity so concurrent feature environments never collide.

use crate::model::FeatureIdentity;
use serde::Serialize;

/// Storage account names: lowercase alphanumerics, 3-24 characters
pub const MAX_STORAGE_ACCOUNT_LEN: usize = 24;

pub const STORAGE_ACCOUNT_SUFFIX: &str = "storage";

/// Container app names: start with a letter, no `--`, at most 32 characters
pub const MAX_COMPUTE_NAME_LEN: usize = 32;

/// Longest suffix appended to the identity for a compute service
pub const LONGEST_COMPUTE_SUFFIX: &str = "-worker";

/// Share name inside each per-feature storage account.
///
/// The same literal is used for every feature; it cannot collide because
/// every feature gets its own account.
pub const FILE_SHARE_NAME: &str = "hangfire";

/// `lowercase(identity without hyphens) + "storage"`
pub fn storage_account_name(identity: &str) -> String {
    let mut name: String = identity
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    name.push_str(STORAGE_ACCOUNT_SUFFIX);
    name
}

/// `{identity}.{zone}`
pub fn feature_host(identity: &str, dns_zone_name: &str) -> String {
    format!("{}.{}", identity, dns_zone_name)
}

/// Resource-id safe form of a hostname (dots become hyphens)
pub fn resource_safe(host: &str) -> String {
    host.replace('.', "-")
}

/// All names derived for one feature environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNames {
    pub feature: String,
    pub storage_account: String,
    pub storage_account_logical: String,
    pub file_share: String,
    pub file_share_logical: String,
    pub storage_mount: String,
    pub telemetry: String,
    pub nordic: String,
    pub worker: String,
    pub routing: String,
    /// Endpoint name in the edge profile (the bare identity)
    pub endpoint: String,
    pub endpoint_logical: String,
    pub origin_group: String,
    pub origin: String,
    pub custom_domain_host: String,
    pub custom_domain: String,
    pub route: String,
    pub security_policy: String,
}

impl ResourceNames {
    pub fn derive(identity: &FeatureIdentity, dns_zone_name: &str) -> Self {
        let id = identity.as_str();
        let host = feature_host(id, dns_zone_name);

        Self {
            feature: id.to_string(),
            storage_account: storage_account_name(id),
            storage_account_logical: format!("{}-storage", id),
            file_share: FILE_SHARE_NAME.to_string(),
            file_share_logical: format!("{}-share", id),
            storage_mount: format!("{}-hangfire", id),
            telemetry: format!("{}-application-insights", id),
            nordic: format!("{}-nordic", id),
            worker: format!("{}-worker", id),
            routing: format!("{}-routing", id),
            endpoint: id.to_string(),
            endpoint_logical: format!("{}-endpoint", id),
            origin_group: format!("{}-origins", id),
            origin: format!("{}-origin", id),
            custom_domain: resource_safe(&host),
            custom_domain_host: host,
            route: format!("{}-route", id),
            security_policy: format!("{}-security-policy", id),
        }
    }

    /// Public URL of the feature environment
    pub fn feature_url(&self) -> String {
        format!("https://{}", self.custom_domain_host)
    }
}
