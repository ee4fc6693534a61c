use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const FEATURE_KDL: &str = r#"
registry "nordicfeatures.azurecr.io"
dns-zone "cust.nisportal.com"
waf-policy "/subscriptions/s/resourceGroups/edge/providers/Microsoft.Network/frontDoorWebApplicationFirewallPolicies/featurewaf"
pr "1234"

image "nordic" name="nordic/api" tag="1.0.0"
image "worker" name="nordic/worker" tag="1.0.0"

flags {
    enable-playground #true
}

external {
    hosting-environment "/subscriptions/s/resourceGroups/features/providers/Microsoft.App/managedEnvironments/features"
    edge-profile "/subscriptions/s/resourceGroups/edge/providers/Microsoft.Cdn/profiles/features-fd"
    telemetry-workspace "/subscriptions/s/resourceGroups/features/providers/Microsoft.OperationalInsights/workspaces/features-logs"
    identity "/subscriptions/s/resourceGroups/features/providers/Microsoft.ManagedIdentity/userAssignedIdentities/features-id" client-id="11111111-2222-3333-4444-555555555555"
    dns-zone "/subscriptions/s/resourceGroups/dns/providers/Microsoft.Network/dnszones/cust.nisportal.com" name="cust.nisportal.com"
}
"#;

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    /// Project with a complete, valid feature.kdl
    pub fn with_default_config() -> Self {
        let project = Self::new();
        project.write_feature_kdl(FEATURE_KDL);
        project
    }

    pub fn write_feature_kdl(&self, content: &str) {
        let path = self.root.path().join("feature.kdl");
        fs::write(path, content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}
