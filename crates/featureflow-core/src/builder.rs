//! Environment plan builder
//!
//! Expands a feature identity, a snapshot of shared infrastructure and the
//! deployment options into a complete [`EnvironmentPlan`]. Pure: no I/O,
//! no clock, no randomness.

use crate::environment::{Workload, base_environment, compose};
use crate::error::{Result, ValidationError};
use crate::model::{
    AttributeRef, DeploymentConfig, EnvironmentVariableSet, ExternalKind, ExternalReference,
    ExternalReferenceSet, FeatureIdentity, ResourceKind, ResourceSpec, Value,
};
use crate::naming::ResourceNames;
use crate::plan::{ComputeOutput, EnvironmentPlan, PlanOutputs};
use crate::routing::{routing_rules, rules_to_value};

pub const ATTR_PRIMARY_KEY: &str = "primaryKey";
pub const ATTR_FQDN: &str = "fqdn";
pub const ATTR_HOST_NAME: &str = "hostName";

/// Volume name inside the worker and its mount path
pub const HANGFIRE_VOLUME: &str = "hangfire";
pub const HANGFIRE_MOUNT_PATH: &str = "/hangfire";

pub const HEALTH_PROBE_PATH: &str = "/health";

/// Build the plan for one feature environment
pub fn build(
    identity: &FeatureIdentity,
    refs: &ExternalReferenceSet,
    config: &DeploymentConfig,
) -> Result<EnvironmentPlan> {
    let shared = Shared::resolve(refs)?;
    config.validate()?;
    if !shared.dns_zone.name.eq_ignore_ascii_case(&config.dns_zone_name) {
        return Err(ValidationError::InvalidConfig(format!(
            "dnsZoneName '{}' does not match the dns-zone reference '{}'",
            config.dns_zone_name, shared.dns_zone.name
        )));
    }

    let names = ResourceNames::derive(identity, &config.dns_zone_name);
    tracing::debug!(
        feature = %identity,
        storage = %names.storage_account,
        domain = %names.custom_domain_host,
        "Derived resource names"
    );

    let ctx = Context {
        names: &names,
        shared,
        config,
        base_env: base_environment(&names, refs, config),
    };

    let resources = vec![
        ctx.storage_account(),
        ctx.file_share(),
        ctx.storage_mount(),
        ctx.telemetry(),
        ctx.compute(Workload::Nordic),
        ctx.compute(Workload::Worker),
        ctx.routing(),
        ctx.edge_endpoint(),
        ctx.origin_group(),
        ctx.origin(),
        ctx.custom_domain(),
        ctx.route(),
        ctx.security_policy(),
    ];

    let outputs = PlanOutputs {
        feature_url: names.feature_url(),
        dns_record_name: names.feature.clone(),
        endpoint_hostname: AttributeRef::resource(&names.endpoint_logical, ATTR_HOST_NAME),
        compute: Workload::ALL
            .into_iter()
            .map(|w| {
                let name = ctx.compute_name(w).to_string();
                ComputeOutput {
                    logical_name: name.clone(),
                    internal_url: format!("http://{}", name),
                    name,
                }
            })
            .collect(),
    };

    let plan = EnvironmentPlan::assemble(identity.clone(), resources, refs, outputs)?;
    tracing::debug!("Built plan: {}", plan.summary());
    Ok(plan)
}

/// Parse the identity and build in one step
pub fn build_for(
    feature_name: &str,
    refs: &ExternalReferenceSet,
    config: &DeploymentConfig,
) -> Result<EnvironmentPlan> {
    let identity = FeatureIdentity::parse(feature_name)?;
    build(&identity, refs, config)
}

/// The five shared references every plan reads
struct Shared<'a> {
    hosting: &'a ExternalReference,
    edge_profile: &'a ExternalReference,
    telemetry_workspace: &'a ExternalReference,
    identity: &'a ExternalReference,
    dns_zone: &'a ExternalReference,
}

impl<'a> Shared<'a> {
    fn resolve(refs: &'a ExternalReferenceSet) -> Result<Self> {
        Ok(Self {
            hosting: refs.require(ExternalKind::HostingEnvironment)?,
            edge_profile: refs.require(ExternalKind::EdgeProfile)?,
            telemetry_workspace: refs.require(ExternalKind::TelemetryWorkspace)?,
            identity: refs.require(ExternalKind::Identity)?,
            dns_zone: refs.require(ExternalKind::DnsZone)?,
        })
    }
}

struct Context<'a> {
    names: &'a ResourceNames,
    shared: Shared<'a>,
    config: &'a DeploymentConfig,
    base_env: EnvironmentVariableSet,
}

impl Context<'_> {
    fn compute_name(&self, workload: Workload) -> &str {
        match workload {
            Workload::Nordic => &self.names.nordic,
            Workload::Worker => &self.names.worker,
        }
    }

    fn storage_account(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(
            ResourceKind::StorageAccount,
            &n.storage_account_logical,
            &n.storage_account,
        )
        .with_property("sku", "Standard_LRS")
        .with_property("kind", "StorageV2")
        .with_property("minimumTlsVersion", "TLS1_2")
        .with_property("allowBlobPublicAccess", false)
    }

    fn file_share(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::FileShare, &n.file_share_logical, &n.file_share)
            .with_property("storageAccount", &n.storage_account)
            .with_property("shareQuotaGb", 5i64)
            .depends_on(&n.storage_account_logical)
    }

    fn storage_mount(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::StorageMount, &n.storage_mount, &n.storage_mount)
            .with_property("environmentId", &self.shared.hosting.resource_id)
            .with_property("accountName", &n.storage_account)
            .with_property("shareName", &n.file_share)
            .with_property(
                "accountKey",
                AttributeRef::resource(&n.storage_account_logical, ATTR_PRIMARY_KEY),
            )
            .with_property("accessMode", "ReadWrite")
            .reads(ExternalKind::HostingEnvironment)
            .depends_on(&n.storage_account_logical)
            .depends_on(&n.file_share_logical)
    }

    fn telemetry(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::TelemetryComponent, &n.telemetry, &n.telemetry)
            .with_property("kind", "web")
            .with_property("applicationType", "web")
            .with_property("workspaceResourceId", &self.shared.telemetry_workspace.resource_id)
            .reads(ExternalKind::TelemetryWorkspace)
    }

    fn compute(&self, workload: Workload) -> ResourceSpec {
        let n = self.names;
        let config = self.config;
        let name = self.compute_name(workload);
        let image = match workload {
            Workload::Nordic => &config.nordic_image,
            Workload::Worker => &config.worker_image,
        };

        let env = compose(&self.base_env, &config.feature_flags, workload);

        let spec = ResourceSpec::new(ResourceKind::ComputeService, name, name)
            .with_property("environmentId", &self.shared.hosting.resource_id)
            .with_property("identityId", &self.shared.identity.resource_id)
            .with_property("registryServer", &config.registry_server)
            .with_property("image", image.qualified(&config.registry_server))
            .with_property("targetPort", workload.port())
            .with_property("ingress", "internal")
            .with_property("minReplicas", 1i64)
            .with_property("maxReplicas", 1i64)
            .with_property("env", env.to_value())
            .reads(ExternalKind::HostingEnvironment)
            .reads(ExternalKind::Identity)
            .depends_on(&n.telemetry);

        match workload {
            Workload::Nordic => spec,
            Workload::Worker => spec
                .with_property(
                    "volumes",
                    Value::List(vec![Value::map([
                        ("name", Value::from(HANGFIRE_VOLUME)),
                        ("storageName", Value::from(&n.storage_mount)),
                        ("storageType", Value::from("AzureFile")),
                    ])]),
                )
                .with_property(
                    "volumeMounts",
                    Value::List(vec![Value::map([
                        ("volumeName", Value::from(HANGFIRE_VOLUME)),
                        ("mountPath", Value::from(HANGFIRE_MOUNT_PATH)),
                    ])]),
                )
                .depends_on(&n.storage_mount),
        }
    }

    fn routing(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::RoutingRule, &n.routing, &n.routing)
            .with_property("environmentId", &self.shared.hosting.resource_id)
            .with_property("rules", rules_to_value(&routing_rules(n)))
            .reads(ExternalKind::HostingEnvironment)
            .depends_on(&n.worker)
            .depends_on(&n.nordic)
    }

    fn edge_endpoint(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::EdgeEndpoint, &n.endpoint_logical, &n.endpoint)
            .with_property("profile", &self.shared.edge_profile.name)
            .with_property("enabledState", "Enabled")
            .reads(ExternalKind::EdgeProfile)
    }

    fn origin_group(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::EdgeOriginGroup, &n.origin_group, &n.origin_group)
            .with_property("profile", &self.shared.edge_profile.name)
            .with_property(
                "healthProbe",
                Value::map([
                    ("path", Value::from(HEALTH_PROBE_PATH)),
                    ("protocol", Value::from("Https")),
                    ("requestType", Value::from("HEAD")),
                    ("intervalSeconds", Value::from(100i64)),
                ]),
            )
            .with_property(
                "loadBalancing",
                Value::map([
                    ("sampleSize", Value::from(4i64)),
                    ("successfulSamplesRequired", Value::from(3i64)),
                    ("additionalLatencyMs", Value::from(50i64)),
                ]),
            )
            .reads(ExternalKind::EdgeProfile)
            .depends_on(&n.endpoint_logical)
    }

    fn origin(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::EdgeOrigin, &n.origin, &n.origin)
            .with_property("originGroup", &n.origin_group)
            .with_property("hostName", AttributeRef::resource(&n.routing, ATTR_FQDN))
            .with_property(
                "originHostHeader",
                AttributeRef::resource(&n.routing, ATTR_FQDN),
            )
            .with_property("httpPort", 80u16)
            .with_property("httpsPort", 443u16)
            .with_property("priority", 1i64)
            .with_property("weight", 1000i64)
            .depends_on(&n.origin_group)
            .depends_on(&n.routing)
    }

    fn custom_domain(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(
            ResourceKind::EdgeCustomDomain,
            &n.custom_domain,
            &n.custom_domain,
        )
        .with_property("profile", &self.shared.edge_profile.name)
        .with_property("hostName", &n.custom_domain_host)
        .with_property("dnsZoneId", &self.shared.dns_zone.resource_id)
        .with_property("certificateType", "ManagedCertificate")
        .with_property("minimumTlsVersion", "TLS12")
        .reads(ExternalKind::EdgeProfile)
        .reads(ExternalKind::DnsZone)
        .depends_on(&n.endpoint_logical)
    }

    fn route(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(ResourceKind::EdgeRoute, &n.route, &n.route)
            .with_property("endpoint", &n.endpoint)
            .with_property("originGroup", &n.origin_group)
            .with_property("customDomains", vec![n.custom_domain.clone()])
            .with_property("patternsToMatch", vec!["/*"])
            .with_property("supportedProtocols", vec!["Http", "Https"])
            .with_property("forwardingProtocol", "HttpsOnly")
            .with_property("httpsRedirect", "Enabled")
            .with_property("linkToDefaultDomain", "Enabled")
            .depends_on(&n.endpoint_logical)
            .depends_on(&n.origin_group)
            .depends_on(&n.origin)
            .depends_on(&n.custom_domain)
    }

    fn security_policy(&self) -> ResourceSpec {
        let n = self.names;
        ResourceSpec::new(
            ResourceKind::EdgeSecurityPolicy,
            &n.security_policy,
            &n.security_policy,
        )
        .with_property("profile", &self.shared.edge_profile.name)
        .with_property("wafPolicyId", &self.config.waf_policy_id)
        .with_property(
            "domains",
            vec![n.custom_domain.clone(), n.endpoint.clone()],
        )
        .with_property("patternsToMatch", vec!["/*"])
        .reads(ExternalKind::EdgeProfile)
        .depends_on(&n.endpoint_logical)
        .depends_on(&n.custom_domain)
    }
}
