use super::resource::{AttributeRef, Value};
use serde::Serialize;

/// Environment variable value: a literal or an attribute the engine resolves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    Ref(AttributeRef),
}

impl EnvValue {
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            EnvValue::Literal(s) => Some(s),
            EnvValue::Ref(_) => None,
        }
    }
}

impl From<&str> for EnvValue {
    fn from(s: &str) -> Self {
        EnvValue::Literal(s.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(s: String) -> Self {
        EnvValue::Literal(s)
    }
}

impl From<AttributeRef> for EnvValue {
    fn from(r: AttributeRef) -> Self {
        EnvValue::Ref(r)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVar {
    pub name: String,
    pub value: EnvValue,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<EnvValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered environment variables
///
/// Setting a name that is already present removes the earlier entry and
/// appends the new one, so the last writer wins and the final order
/// follows the merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentVariableSet {
    vars: Vec<EnvVar>,
}

impl EnvironmentVariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<EnvValue>) {
        let var = EnvVar::new(name, value);
        self.vars.retain(|v| v.name != var.name);
        self.vars.push(var);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<EnvValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Append `other` after this set; entries in `other` win on name clashes
    pub fn merge(&mut self, other: EnvironmentVariableSet) {
        for var in other.vars {
            self.set(var.name, var.value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&EnvValue> {
        self.vars.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|v| v.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvVar> {
        self.vars.iter()
    }

    pub fn last(&self) -> Option<&EnvVar> {
        self.vars.last()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Property form used in compute-service specs
    pub fn to_value(&self) -> Value {
        Value::List(
            self.vars
                .iter()
                .map(|v| {
                    let value = match &v.value {
                        EnvValue::Literal(s) => Value::Str(s.clone()),
                        EnvValue::Ref(r) => Value::Ref(r.clone()),
                    };
                    Value::map([("name", Value::Str(v.name.clone())), ("value", value)])
                })
                .collect(),
        )
    }
}
