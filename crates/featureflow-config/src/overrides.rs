//! Per-invocation overrides (environment variables and CLI flags)

pub const REGISTRY_ENV: &str = "FEATUREFLOW_REGISTRY";
pub const NORDIC_TAG_ENV: &str = "FEATUREFLOW_NORDIC_TAG";
pub const WORKER_TAG_ENV: &str = "FEATUREFLOW_WORKER_TAG";
pub const PR_ENV: &str = "FEATUREFLOW_PR";
pub const WAF_POLICY_ENV: &str = "FEATUREFLOW_WAF_POLICY";
pub const DNS_ZONE_ENV: &str = "FEATUREFLOW_DNS_ZONE";

/// Values that replace whatever the configuration file says
///
/// These are the inputs a CI pipeline changes on every run: image tags,
/// the pull request number, and occasionally the registry or WAF policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub registry: Option<String>,
    pub nordic_tag: Option<String>,
    pub worker_tag: Option<String>,
    pub pr: Option<String>,
    pub waf_policy: Option<String>,
    pub dns_zone: Option<String>,
}

impl ConfigOverrides {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Self {
            registry: var(REGISTRY_ENV),
            nordic_tag: var(NORDIC_TAG_ENV),
            worker_tag: var(WORKER_TAG_ENV),
            pr: var(PR_ENV),
            waf_policy: var(WAF_POLICY_ENV),
            dns_zone: var(DNS_ZONE_ENV),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
