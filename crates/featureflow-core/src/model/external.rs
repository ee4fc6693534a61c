use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shared infrastructure a plan reads from but never creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExternalKind {
    /// Container hosting environment shared by all feature environments
    HostingEnvironment,
    /// Edge/CDN profile
    EdgeProfile,
    /// Log/telemetry workspace
    TelemetryWorkspace,
    /// Managed identity used to pull images and read configuration
    Identity,
    /// DNS zone the feature hostnames live under
    DnsZone,
}

impl ExternalKind {
    /// Every kind a plan requires, in validation order
    pub const REQUIRED: [ExternalKind; 5] = [
        ExternalKind::HostingEnvironment,
        ExternalKind::EdgeProfile,
        ExternalKind::TelemetryWorkspace,
        ExternalKind::Identity,
        ExternalKind::DnsZone,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExternalKind::HostingEnvironment => "hosting-environment",
            ExternalKind::EdgeProfile => "edge-profile",
            ExternalKind::TelemetryWorkspace => "telemetry-workspace",
            ExternalKind::Identity => "identity",
            ExternalKind::DnsZone => "dns-zone",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::REQUIRED.into_iter().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only pointer to pre-existing infrastructure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalReference {
    pub kind: ExternalKind,

    /// Resource name (e.g. "features-fd")
    pub name: String,

    /// Fully qualified provider resource identifier
    pub resource_id: String,

    /// Attribute snapshot (e.g. `clientId` for an identity)
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ExternalReference {
    pub fn new(kind: ExternalKind, name: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            resource_id: resource_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}

/// Snapshot of external references handed to the builder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReferenceSet {
    refs: BTreeMap<ExternalKind, ExternalReference>,
}

impl ExternalReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference, replacing any earlier one of the same kind
    pub fn insert(&mut self, reference: ExternalReference) {
        self.refs.insert(reference.kind, reference);
    }

    pub fn with(mut self, reference: ExternalReference) -> Self {
        self.insert(reference);
        self
    }

    pub fn get(&self, kind: ExternalKind) -> Option<&ExternalReference> {
        self.refs.get(&kind)
    }

    pub fn require(&self, kind: ExternalKind) -> Result<&ExternalReference> {
        self.get(kind)
            .ok_or(ValidationError::MissingReference(kind))
    }

    /// Fail on the first required kind that is absent
    pub fn require_all(&self) -> Result<()> {
        for kind in ExternalKind::REQUIRED {
            self.require(kind)?;
        }
        Ok(())
    }

    pub fn contains(&self, kind: ExternalKind) -> bool {
        self.refs.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalReference> {
        self.refs.values()
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in ExternalKind::REQUIRED {
            assert_eq!(ExternalKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(ExternalKind::from_name("registry"), None);
    }

    #[test]
    fn test_require_missing() {
        let set = ExternalReferenceSet::new().with(ExternalReference::new(
            ExternalKind::Identity,
            "id",
            "/ids/id",
        ));

        assert!(set.require(ExternalKind::Identity).is_ok());
        assert_eq!(
            set.require_all().unwrap_err(),
            ValidationError::MissingReference(ExternalKind::HostingEnvironment)
        );
    }

    #[test]
    fn test_insert_replaces_same_kind() {
        let mut set = ExternalReferenceSet::new();
        set.insert(ExternalReference::new(ExternalKind::DnsZone, "a", "/a"));
        set.insert(ExternalReference::new(ExternalKind::DnsZone, "b", "/b"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(ExternalKind::DnsZone).unwrap().name, "b");
    }

    #[test]
    fn test_attribute_lookup() {
        let identity = ExternalReference::new(ExternalKind::Identity, "id", "/ids/id")
            .with_attribute("clientId", "0000-1111");
        assert_eq!(identity.attribute("clientId"), Some("0000-1111"));
        assert_eq!(identity.attribute("principalId"), None);
    }
}
