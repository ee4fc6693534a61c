//! Path routing inside the hosting environment
//!
//! Rules are evaluated first-match, so the `/worker` rule must come before
//! the `/` catch-all or the worker becomes unreachable.

use crate::model::Value;
use crate::naming::ResourceNames;
use serde::Serialize;

pub const WORKER_PREFIX: &str = "/worker";
pub const CATCH_ALL_PREFIX: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRule {
    pub prefix: String,

    /// Physical name of the compute service receiving the request
    pub target: String,

    /// Remove `prefix` before forwarding
    pub strip_prefix: bool,
}

impl RouteRule {
    pub fn matches(&self, path: &str) -> bool {
        if self.prefix == CATCH_ALL_PREFIX {
            return path.starts_with('/');
        }
        path == self.prefix
            || path
                .strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Path as seen by the target service
    pub fn forwarded_path(&self, path: &str) -> String {
        if !self.strip_prefix {
            return path.to_string();
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some("") | None => "/".to_string(),
            Some(rest) => rest.to_string(),
        }
    }

    fn to_value(&self) -> Value {
        Value::map([
            ("prefix", Value::from(&self.prefix)),
            ("target", Value::from(&self.target)),
            ("stripPrefix", Value::from(self.strip_prefix)),
        ])
    }
}

/// Worker rule first, catch-all last
pub fn routing_rules(names: &ResourceNames) -> Vec<RouteRule> {
    vec![
        RouteRule {
            prefix: WORKER_PREFIX.to_string(),
            target: names.worker.clone(),
            strip_prefix: true,
        },
        RouteRule {
            prefix: CATCH_ALL_PREFIX.to_string(),
            target: names.nordic.clone(),
            strip_prefix: false,
        },
    ]
}

/// First rule that matches `path`
pub fn first_match<'a>(rules: &'a [RouteRule], path: &str) -> Option<&'a RouteRule> {
    rules.iter().find(|rule| rule.matches(path))
}

pub fn rules_to_value(rules: &[RouteRule]) -> Value {
    Value::List(rules.iter().map(RouteRule::to_value).collect())
}

/// Read rules back out of a routing-rule spec's `rules` property
pub fn rules_from_value(value: &Value) -> Vec<RouteRule> {
    value
        .as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|v| {
            let map = v.as_map()?;
            Some(RouteRule {
                prefix: map.get("prefix")?.as_str()?.to_string(),
                target: map.get("target")?.as_str()?.to_string(),
                strip_prefix: map.get("stripPrefix")?.as_bool()?,
            })
        })
        .collect()
}
