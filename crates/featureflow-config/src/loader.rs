//! KDL configuration loader
//!
//! ```kdl
//! registry "nordicfeatures.azurecr.io"
//! dns-zone "cust.nisportal.com"
//! waf-policy "/subscriptions/.../featurewaf"
//! pr "1234"
//!
//! image "nordic" name="nordic/api" tag="1.0.0"
//! image "worker" name="nordic/worker" tag="1.0.0"
//!
//! flags {
//!     has-custom-jwt-secret #true
//! }
//!
//! external {
//!     identity "/subscriptions/.../features-id" client-id="0000-..."
//! }
//! ```

use crate::discovery::find_config_file;
use crate::error::{ConfigError, Result};
use crate::overrides::ConfigOverrides;
use featureflow_core::{
    DeploymentConfig, ExternalKind, ExternalReference, ExternalReferenceSet, FeatureFlags,
    ImageRef,
};
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings as read from a file, before overrides and validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    pub registry: Option<String>,
    pub nordic_image: Option<String>,
    pub nordic_tag: Option<String>,
    pub worker_image: Option<String>,
    pub worker_tag: Option<String>,
    pub flags: FeatureFlags,
    pub elastic_endpoint: Option<String>,
    pub waf_policy: Option<String>,
    pub dns_zone: Option<String>,
    pub pr: Option<String>,
    pub externals: ExternalReferenceSet,
}

/// Fully resolved configuration ready for the plan builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureConfig {
    pub deployment: DeploymentConfig,
    pub externals: ExternalReferenceSet,
    pub source: Option<PathBuf>,
}

impl RawConfig {
    /// Replace file values with any override that is set
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        let pairs = [
            (&mut self.registry, &overrides.registry),
            (&mut self.nordic_tag, &overrides.nordic_tag),
            (&mut self.worker_tag, &overrides.worker_tag),
            (&mut self.pr, &overrides.pr),
            (&mut self.waf_policy, &overrides.waf_policy),
            (&mut self.dns_zone, &overrides.dns_zone),
        ];
        for (target, value) in pairs {
            if let Some(v) = value {
                *target = Some(v.clone());
            }
        }
    }

    pub fn resolve(self, source: Option<PathBuf>) -> Result<FeatureConfig> {
        let deployment = DeploymentConfig {
            registry_server: required(self.registry, "registry")?,
            nordic_image: ImageRef::new(
                required(self.nordic_image, "image \"nordic\" name")?,
                required(self.nordic_tag, "image \"nordic\" tag")?,
            ),
            worker_image: ImageRef::new(
                required(self.worker_image, "image \"worker\" name")?,
                required(self.worker_tag, "image \"worker\" tag")?,
            ),
            feature_flags: self.flags,
            elastic_endpoint: self.elastic_endpoint,
            waf_policy_id: required(self.waf_policy, "waf-policy")?,
            dns_zone_name: required(self.dns_zone, "dns-zone")?,
            pr_id: required(self.pr, "pr")?,
        };
        deployment.validate()?;

        Ok(FeatureConfig {
            deployment,
            externals: self.externals,
            source,
        })
    }
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    value.ok_or_else(|| ConfigError::MissingSetting(key.to_string()))
}

/// Find, parse, override and validate in one go
pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<FeatureConfig> {
    let path = find_config_file(explicit)?;
    tracing::debug!("Loading configuration from {}", path.display());

    let mut raw = parse_kdl_file(&path)?;
    raw.apply(&ConfigOverrides::from_env());
    raw.apply(overrides);
    raw.resolve(Some(path))
}

pub fn parse_kdl_file<P: AsRef<Path>>(path: P) -> Result<RawConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_kdl_string(&content)
}

pub fn parse_kdl_string(content: &str) -> Result<RawConfig> {
    let doc: KdlDocument = content.parse()?;
    let mut raw = RawConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "registry" => raw.registry = Some(string_arg(node, "registry")?),
            "dns-zone" | "dns_zone" => raw.dns_zone = Some(string_arg(node, "dns-zone")?),
            "waf-policy" | "waf_policy" => {
                raw.waf_policy = Some(string_arg(node, "waf-policy")?)
            }
            "elastic-endpoint" | "elastic_endpoint" => {
                raw.elastic_endpoint = Some(string_arg(node, "elastic-endpoint")?)
            }
            "pr" => raw.pr = Some(token_arg(node, "pr")?),
            "image" => parse_image(node, &mut raw)?,
            "flags" => {
                if let Some(children) = node.children() {
                    raw.flags = parse_flags(children)?;
                }
            }
            "external" => {
                if let Some(children) = node.children() {
                    raw.externals = parse_externals(children)?;
                }
            }
            other => {
                tracing::warn!("Ignoring unknown configuration node '{}'", other);
            }
        }
    }

    Ok(raw)
}

fn parse_image(node: &KdlNode, raw: &mut RawConfig) -> Result<()> {
    let workload = string_arg(node, "image")?;
    let name = prop(node, "name").and_then(|v| v.as_string()).map(str::to_string);
    let tag = prop(node, "tag").map(value_token).transpose().map_err(|message| {
        ConfigError::InvalidValue {
            key: format!("image \"{}\" tag", workload),
            message,
        }
    })?;

    let (name_slot, tag_slot) = match workload.as_str() {
        "nordic" => (&mut raw.nordic_image, &mut raw.nordic_tag),
        "worker" => (&mut raw.worker_image, &mut raw.worker_tag),
        other => {
            return Err(ConfigError::InvalidValue {
                key: "image".to_string(),
                message: format!("unknown workload '{}', expected nordic or worker", other),
            });
        }
    };
    if name.is_some() {
        *name_slot = name;
    }
    if tag.is_some() {
        *tag_slot = tag;
    }
    Ok(())
}

fn parse_flags(doc: &KdlDocument) -> Result<FeatureFlags> {
    let mut flags = FeatureFlags::default();

    for node in doc.nodes() {
        let key = node.name().value();
        let value = bool_arg(node, key)?;
        match key.replace('_', "-").as_str() {
            "enable-playground" => flags.enable_playground = value,
            "enable-unsecure-playground" => flags.enable_unsecure_playground = value,
            "super-administrator-mode" => flags.super_administrator_mode = value,
            "include-exception-details" => flags.include_exception_details = value,
            "has-custom-jwt-secret" => flags.has_custom_jwt_secret = value,
            "use-elastic8" => flags.use_elastic8 = value,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "unknown feature flag".to_string(),
                });
            }
        }
    }

    Ok(flags)
}

fn parse_externals(doc: &KdlDocument) -> Result<ExternalReferenceSet> {
    let mut set = ExternalReferenceSet::new();

    for node in doc.nodes() {
        let key = node.name().value();
        let kind = ExternalKind::from_name(&key.replace('_', "-")).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: "unknown external reference kind".to_string(),
            }
        })?;

        let resource_id = string_arg(node, key)?;
        let name = match prop(node, "name").and_then(|v| v.as_string()) {
            Some(name) => name.to_string(),
            None => resource_id
                .rsplit('/')
                .next()
                .unwrap_or(resource_id.as_str())
                .to_string(),
        };

        let mut reference = ExternalReference::new(kind, name, resource_id);
        for entry in node.entries() {
            let Some(prop_name) = entry.name().map(|n| n.value()) else {
                continue;
            };
            if prop_name == "name" {
                continue;
            }
            let value = value_token(entry.value()).map_err(|message| ConfigError::InvalidValue {
                key: format!("{}.{}", key, prop_name),
                message,
            })?;
            reference = reference.with_attribute(camel_case(prop_name), value);
        }

        set.insert(reference);
    }

    Ok(set)
}

/// First positional argument
fn first_arg(node: &KdlNode) -> Option<&KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .map(|e| e.value())
}

/// Named property
fn prop<'a>(node: &'a KdlNode, key: &str) -> Option<&'a KdlValue> {
    node.entries()
        .iter()
        .find(|e| e.name().is_some_and(|n| n.value() == key))
        .map(|e| e.value())
}

fn string_arg(node: &KdlNode, key: &str) -> Result<String> {
    first_arg(node)
        .and_then(|v| v.as_string())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            message: "expected a string argument".to_string(),
        })
}

/// String or integer argument rendered as a string
fn token_arg(node: &KdlNode, key: &str) -> Result<String> {
    let value = first_arg(node).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        message: "expected an argument".to_string(),
    })?;
    value_token(value).map_err(|message| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    })
}

fn value_token(value: &KdlValue) -> std::result::Result<String, String> {
    if let Some(s) = value.as_string() {
        Ok(s.to_string())
    } else if let Some(i) = value.as_integer() {
        Ok(i.to_string())
    } else {
        Err(format!("expected a string or integer, got {}", value))
    }
}

fn bool_arg(node: &KdlNode, key: &str) -> Result<bool> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    let value = first_arg(node).ok_or_else(|| invalid("expected #true or #false".to_string()))?;

    if let Some(b) = value.as_bool() {
        return Ok(b);
    }
    match value.as_string() {
        Some(s @ ("true" | "false")) => {
            tracing::warn!("flag '{}' uses the string \"{}\"; prefer #{}", key, s, s);
            Ok(s == "true")
        }
        _ => Err(invalid(format!("expected #true or #false, got {}", value))),
    }
}

/// `client-id` -> `clientId`
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' || c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
