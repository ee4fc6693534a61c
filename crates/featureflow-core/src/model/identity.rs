use crate::error::{Result, ValidationError};
use crate::naming::{
    LONGEST_COMPUTE_SUFFIX, MAX_COMPUTE_NAME_LEN, MAX_STORAGE_ACCOUNT_LEN, storage_account_name,
};
use serde::Serialize;

/// Validated feature identifier that seeds every derived resource name.
///
/// Input may contain ASCII letters, digits and single hyphens and must start
/// with a letter; it is normalised to lowercase so every name derived from
/// it is lowercase as well.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureIdentity(String);

impl FeatureIdentity {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(ValidationError::InvalidName(
                "feature name must not be empty".to_string(),
            ));
        }

        if let Some(c) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
        {
            return Err(ValidationError::InvalidName(format!(
                "'{}' contains '{}'; only letters, digits and '-' are allowed",
                raw, c
            )));
        }

        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(ValidationError::InvalidName(format!(
                "'{}' must start and end with a letter or digit",
                raw
            )));
        }

        if !raw.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidName(format!(
                "'{}' must start with a letter",
                raw
            )));
        }

        if raw.contains("--") {
            return Err(ValidationError::InvalidName(format!(
                "'{}' must not contain '--'",
                raw
            )));
        }

        let value = raw.to_ascii_lowercase();
        let compute_len = value.len() + LONGEST_COMPUTE_SUFFIX.len();
        if compute_len > MAX_COMPUTE_NAME_LEN {
            return Err(ValidationError::InvalidName(format!(
                "'{}' derives compute service '{}{}' ({} chars, limit {})",
                raw, value, LONGEST_COMPUTE_SUFFIX, compute_len, MAX_COMPUTE_NAME_LEN
            )));
        }

        let storage = storage_account_name(&value);
        if storage.len() > MAX_STORAGE_ACCOUNT_LEN {
            return Err(ValidationError::InvalidName(format!(
                "'{}' derives storage account '{}' ({} chars, limit {})",
                raw,
                storage,
                storage.len(),
                MAX_STORAGE_ACCOUNT_LEN
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FeatureIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for FeatureIdentity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let id = FeatureIdentity::parse("feature-99").unwrap();
        assert_eq!(id.as_str(), "feature-99");
    }

    #[test]
    fn test_parse_normalises_case() {
        let id = FeatureIdentity::parse("Feature-ABC").unwrap();
        assert_eq!(id.as_str(), "feature-abc");
    }

    #[test]
    fn test_parse_rejects_empty() {
        let err = FeatureIdentity::parse("").unwrap_err();
        assert_eq!(err.reason(), "invalid-name");
    }

    #[test]
    fn test_parse_rejects_bad_characters() {
        for raw in ["feature_1", "feature.1", "feature 1", "fëature"] {
            let err = FeatureIdentity::parse(raw).unwrap_err();
            assert_eq!(err.reason(), "invalid-name", "{}", raw);
        }
    }

    #[test]
    fn test_parse_rejects_edge_hyphens() {
        assert!(FeatureIdentity::parse("-feature").is_err());
        assert!(FeatureIdentity::parse("feature-").is_err());
    }

    #[test]
    fn test_parse_length_limit_counts_without_hyphens() {
        // 17 alphanumerics + "storage" = 24
        assert!(FeatureIdentity::parse("abcdefghijklmnopq").is_ok());
        assert!(FeatureIdentity::parse("abc-def-ghi-jkl-mno-pq").is_ok());

        let err = FeatureIdentity::parse("abcdefghijklmnopqr").unwrap_err();
        assert_eq!(err.reason(), "invalid-name");
    }

    #[test]
    fn test_parse_rejects_leading_digit() {
        let err = FeatureIdentity::parse("1abc").unwrap_err();
        assert_eq!(err.reason(), "invalid-name");
        assert!(FeatureIdentity::parse("a1bc").is_ok());
    }

    #[test]
    fn test_parse_rejects_double_hyphen() {
        let err = FeatureIdentity::parse("a--b").unwrap_err();
        assert_eq!(err.reason(), "invalid-name");
    }

    #[test]
    fn test_parse_compute_name_limit() {
        // 17 alphanumerics fit storage, but "-worker" takes it to 40
        let err = FeatureIdentity::parse("a-b-c-d-e-f-g-h-i-j-k-l-m-n-o-p-q").unwrap_err();
        assert_eq!(err.reason(), "invalid-name");
        assert!(err.to_string().contains("-worker"));

        // 25 + "-worker" = 32
        let id = FeatureIdentity::parse("a-b-c-d-e-f-g-h-i-j-k-l-m").unwrap();
        assert_eq!(format!("{}-worker", id).len(), MAX_COMPUTE_NAME_LEN);
        assert!(FeatureIdentity::parse("a-b-c-d-e-f-g-h-i-j-k-l-mn").is_err());
    }

    #[test]
    fn test_from_str() {
        let id: FeatureIdentity = "feature-1234".parse().unwrap();
        assert_eq!(id.to_string(), "feature-1234");
    }
}
