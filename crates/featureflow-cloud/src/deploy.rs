//! Build-then-apply wrapper around a provisioning engine

use crate::error::{ProvisionError, Result};
use crate::provider::ProvisioningEngine;
use crate::result::ApplyResult;
use chrono::{DateTime, Utc};
use featureflow_core::{
    DeploymentConfig, EnvironmentPlan, ExternalReferenceSet, FeatureIdentity, PlanOutputs,
};
use serde::Serialize;

/// A plan together with what the engine did with it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub plan: EnvironmentPlan,
    pub outputs: PlanOutputs,
    pub result: ApplyResult,
    pub started_at: DateTime<Utc>,
}

impl Deployment {
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Build the plan for `identity` and hand it to `engine`
///
/// Validation failures are returned before the engine is contacted. The
/// engine is asked to apply exactly once; its errors come back unchanged
/// and per-resource failures stay in [`Deployment::result`].
pub async fn deploy(
    engine: &dyn ProvisioningEngine,
    identity: &FeatureIdentity,
    refs: &ExternalReferenceSet,
    config: &DeploymentConfig,
) -> Result<Deployment> {
    let plan = featureflow_core::build(identity, refs, config)?;

    let auth = engine.check_auth().await;
    if !auth.authenticated {
        let message = auth
            .error
            .unwrap_or_else(|| "not authenticated".to_string());
        tracing::warn!(engine = engine.name(), "{}", message);
        return Err(ProvisionError::new(engine.name(), message).into());
    }

    let started_at = Utc::now();
    tracing::info!(
        engine = engine.name(),
        feature = %identity,
        resources = plan.len(),
        "Applying environment plan"
    );

    let result = engine.apply(&plan).await.map_err(|e| {
        tracing::warn!(engine = %e.engine, "{}", e.message);
        e
    })?;

    if result.is_success() {
        tracing::info!(feature = %identity, "{}", result);
    } else {
        tracing::warn!(feature = %identity, "{}", result);
    }

    Ok(Deployment {
        outputs: plan.outputs().clone(),
        plan,
        result,
        started_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeployError;
    use crate::provider::AuthStatus;
    use async_trait::async_trait;
    use featureflow_core::{ExternalKind, ExternalReference, FeatureFlags, ImageRef};
    use std::sync::Mutex;

    /// Records every plan it is asked to apply
    struct RecordingEngine {
        auth: AuthStatus,
        outcome: std::result::Result<(), String>,
        applied: Mutex<Vec<Vec<String>>>,
    }

    impl RecordingEngine {
        fn new() -> Self {
            Self {
                auth: AuthStatus::ok("sub-123"),
                outcome: Ok(()),
                applied: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.applied.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProvisioningEngine for RecordingEngine {
        fn name(&self) -> &str {
            "recording"
        }

        async fn check_auth(&self) -> AuthStatus {
            self.auth.clone()
        }

        async fn apply(
            &self,
            plan: &EnvironmentPlan,
        ) -> std::result::Result<ApplyResult, ProvisionError> {
            let order: Vec<String> = plan
                .creation_order()
                .iter()
                .map(|r| r.logical_name.clone())
                .collect();
            self.applied.lock().unwrap().push(order.clone());

            match &self.outcome {
                Ok(()) => {
                    let mut result = ApplyResult::new();
                    for name in order {
                        result.add_success(name, "created");
                    }
                    Ok(result)
                }
                Err(message) => Err(ProvisionError::new(self.name(), message.clone())),
            }
        }
    }

    fn refs() -> ExternalReferenceSet {
        ExternalReferenceSet::new()
            .with(ExternalReference::new(
                ExternalKind::HostingEnvironment,
                "features-env",
                "/subscriptions/s/managedEnvironments/features-env",
            ))
            .with(ExternalReference::new(
                ExternalKind::EdgeProfile,
                "features-fd",
                "/subscriptions/s/profiles/features-fd",
            ))
            .with(ExternalReference::new(
                ExternalKind::TelemetryWorkspace,
                "features-logs",
                "/subscriptions/s/workspaces/features-logs",
            ))
            .with(
                ExternalReference::new(
                    ExternalKind::Identity,
                    "features-id",
                    "/subscriptions/s/userAssignedIdentities/features-id",
                )
                .with_attribute("clientId", "client-1"),
            )
            .with(ExternalReference::new(
                ExternalKind::DnsZone,
                "cust.nisportal.com",
                "/subscriptions/s/dnszones/cust.nisportal.com",
            ))
    }

    fn config() -> DeploymentConfig {
        DeploymentConfig {
            registry_server: "nordicfeatures.azurecr.io".to_string(),
            nordic_image: ImageRef::new("nordic/api", "1.0.0"),
            worker_image: ImageRef::new("nordic/worker", "1.0.0"),
            feature_flags: FeatureFlags::default(),
            elastic_endpoint: None,
            waf_policy_id: "/subscriptions/s/policies/featurewaf".to_string(),
            dns_zone_name: "cust.nisportal.com".to_string(),
            pr_id: "1234".to_string(),
        }
    }

    #[tokio::test]
    async fn test_deploy_applies_once_in_creation_order() {
        let engine = RecordingEngine::new();
        let identity = FeatureIdentity::parse("feature-1234").unwrap();

        let deployment = deploy(&engine, &identity, &refs(), &config()).await.unwrap();

        assert!(deployment.is_success());
        assert_eq!(engine.calls(), 1);
        assert_eq!(
            deployment.outputs.feature_url,
            "https://feature-1234.cust.nisportal.com"
        );

        let applied = engine.applied.lock().unwrap();
        let expected: Vec<String> = deployment
            .plan
            .creation_order()
            .iter()
            .map(|r| r.logical_name.clone())
            .collect();
        assert_eq!(applied[0], expected);
        assert_eq!(deployment.result.succeeded.len(), deployment.plan.len());
    }

    #[tokio::test]
    async fn test_validation_error_skips_engine() {
        let engine = RecordingEngine::new();
        let identity = FeatureIdentity::parse("feature-1234").unwrap();
        let mut config = config();
        config.registry_server = String::new();

        let err = deploy(&engine, &identity, &refs(), &config).await.unwrap_err();

        assert!(matches!(err, DeployError::Validation(_)));
        assert_eq!(err.reason(), "invalid-config");
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_reference_skips_engine() {
        let engine = RecordingEngine::new();
        let identity = FeatureIdentity::parse("feature-1234").unwrap();
        let refs = ExternalReferenceSet::new();

        let err = deploy(&engine, &identity, &refs, &config()).await.unwrap_err();

        assert_eq!(err.reason(), "missing-reference");
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_unauthenticated_engine_is_not_applied() {
        let mut engine = RecordingEngine::new();
        engine.auth = AuthStatus::failed("token expired");
        let identity = FeatureIdentity::parse("feature-1234").unwrap();

        let err = deploy(&engine, &identity, &refs(), &config()).await.unwrap_err();

        match err {
            DeployError::Provisioning(e) => assert_eq!(e.message, "token expired"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(engine.calls(), 0);
    }

    #[tokio::test]
    async fn test_engine_error_passes_through_verbatim() {
        let mut engine = RecordingEngine::new();
        engine.outcome = Err("QuotaExceeded: container apps limit reached".to_string());
        let identity = FeatureIdentity::parse("feature-1234").unwrap();

        let err = deploy(&engine, &identity, &refs(), &config()).await.unwrap_err();

        assert_eq!(err.reason(), "provisioning");
        match err {
            DeployError::Provisioning(e) => {
                assert_eq!(e.engine, "recording");
                assert_eq!(e.message, "QuotaExceeded: container apps limit reached");
                assert_eq!(e.to_string(), "QuotaExceeded: container apps limit reached");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(engine.calls(), 1);
    }
}
