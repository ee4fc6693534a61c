use super::external::ExternalKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Closed set of resource types a plan can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    ComputeService,
    RoutingRule,
    StorageAccount,
    FileShare,
    StorageMount,
    TelemetryComponent,
    EdgeEndpoint,
    EdgeOriginGroup,
    EdgeOrigin,
    EdgeCustomDomain,
    EdgeRoute,
    EdgeSecurityPolicy,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 12] = [
        ResourceKind::ComputeService,
        ResourceKind::RoutingRule,
        ResourceKind::StorageAccount,
        ResourceKind::FileShare,
        ResourceKind::StorageMount,
        ResourceKind::TelemetryComponent,
        ResourceKind::EdgeEndpoint,
        ResourceKind::EdgeOriginGroup,
        ResourceKind::EdgeOrigin,
        ResourceKind::EdgeCustomDomain,
        ResourceKind::EdgeRoute,
        ResourceKind::EdgeSecurityPolicy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ComputeService => "compute-service",
            ResourceKind::RoutingRule => "routing-rule",
            ResourceKind::StorageAccount => "storage-account",
            ResourceKind::FileShare => "file-share",
            ResourceKind::StorageMount => "storage-mount",
            ResourceKind::TelemetryComponent => "telemetry-component",
            ResourceKind::EdgeEndpoint => "edge-endpoint",
            ResourceKind::EdgeOriginGroup => "edge-origin-group",
            ResourceKind::EdgeOrigin => "edge-origin",
            ResourceKind::EdgeCustomDomain => "edge-custom-domain",
            ResourceKind::EdgeRoute => "edge-route",
            ResourceKind::EdgeSecurityPolicy => "edge-security-policy",
        }
    }

    /// Azure Resource Manager type the provisioning engine maps this kind to
    pub fn provider_type(&self) -> &'static str {
        match self {
            ResourceKind::ComputeService => "Microsoft.App/containerApps",
            ResourceKind::RoutingRule => "Microsoft.App/managedEnvironments/httpRouteConfigs",
            ResourceKind::StorageAccount => "Microsoft.Storage/storageAccounts",
            ResourceKind::FileShare => "Microsoft.Storage/storageAccounts/fileServices/shares",
            ResourceKind::StorageMount => "Microsoft.App/managedEnvironments/storages",
            ResourceKind::TelemetryComponent => "Microsoft.Insights/components",
            ResourceKind::EdgeEndpoint => "Microsoft.Cdn/profiles/afdEndpoints",
            ResourceKind::EdgeOriginGroup => "Microsoft.Cdn/profiles/originGroups",
            ResourceKind::EdgeOrigin => "Microsoft.Cdn/profiles/originGroups/origins",
            ResourceKind::EdgeCustomDomain => "Microsoft.Cdn/profiles/customDomains",
            ResourceKind::EdgeRoute => "Microsoft.Cdn/profiles/afdEndpoints/routes",
            ResourceKind::EdgeSecurityPolicy => "Microsoft.Cdn/profiles/securityPolicies",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an [`AttributeRef`] points at
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefTarget {
    /// A resource in the same plan, by logical name
    Resource(String),
    /// A shared external reference
    External(ExternalKind),
}

impl std::fmt::Display for RefTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefTarget::Resource(name) => write!(f, "resource '{}'", name),
            RefTarget::External(kind) => write!(f, "external {}", kind),
        }
    }
}

/// Attribute the provisioning engine resolves to a live value
/// (an access key, a generated hostname, ...) before substitution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeRef {
    pub target: RefTarget,
    pub attribute: String,
}

impl AttributeRef {
    pub fn resource(logical_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            target: RefTarget::Resource(logical_name.into()),
            attribute: attribute.into(),
        }
    }

    pub fn external(kind: ExternalKind, attribute: impl Into<String>) -> Self {
        Self {
            target: RefTarget::External(kind),
            attribute: attribute.into(),
        }
    }
}

/// Property value of a planned resource
///
/// Maps are ordered so serialized plans are byte-stable. A reference is
/// written as `{"$ref": {...}}`, so `$ref` is reserved as a map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    #[serde(with = "ref_envelope")]
    Ref(AttributeRef),
    Map(BTreeMap<String, Value>),
}

mod ref_envelope {
    use super::AttributeRef;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Out<'a> {
        #[serde(rename = "$ref")]
        reference: &'a AttributeRef,
    }

    #[derive(Deserialize)]
    #[serde(deny_unknown_fields)]
    struct In {
        #[serde(rename = "$ref")]
        reference: AttributeRef,
    }

    pub fn serialize<S: Serializer>(reference: &AttributeRef, s: S) -> Result<S::Ok, S::Error> {
        Out { reference }.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<AttributeRef, D::Error> {
        In::deserialize(d).map(|envelope| envelope.reference)
    }
}

impl Value {
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_attribute_ref(&self) -> Option<&AttributeRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Collect every attribute reference nested in this value
    pub fn collect_refs<'a>(&'a self, out: &mut Vec<&'a AttributeRef>) {
        match self {
            Value::Ref(r) => out.push(r),
            Value::List(items) => items.iter().for_each(|v| v.collect_refs(out)),
            Value::Map(map) => map.values().for_each(|v| v.collect_refs(out)),
            Value::Bool(_) | Value::Int(_) | Value::Str(_) => {}
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Str(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<AttributeRef> for Value {
    fn from(r: AttributeRef) -> Self {
        Value::Ref(r)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// One planned cloud resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSpec {
    pub kind: ResourceKind,

    /// Unique within a plan
    pub logical_name: String,

    /// Name the resource is created under
    pub physical_name: String,

    pub properties: BTreeMap<String, Value>,

    /// Logical names that must exist before this resource is created
    pub depends_on: BTreeSet<String>,

    /// External references this resource reads from
    pub reads: BTreeSet<ExternalKind>,
}

impl ResourceSpec {
    pub fn new(
        kind: ResourceKind,
        logical_name: impl Into<String>,
        physical_name: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            logical_name: logical_name.into(),
            physical_name: physical_name.into(),
            properties: BTreeMap::new(),
            depends_on: BTreeSet::new(),
            reads: BTreeSet::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn depends_on(mut self, logical_name: impl Into<String>) -> Self {
        self.depends_on.insert(logical_name.into());
        self
    }

    pub fn reads(mut self, kind: ExternalKind) -> Self {
        self.reads.insert(kind);
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn has_dependency(&self, logical_name: &str) -> bool {
        self.depends_on.contains(logical_name)
    }

    /// Every attribute reference across all properties
    pub fn attribute_refs(&self) -> Vec<&AttributeRef> {
        let mut refs = Vec::new();
        for value in self.properties.values() {
            value.collect_refs(&mut refs);
        }
        refs
    }
}
