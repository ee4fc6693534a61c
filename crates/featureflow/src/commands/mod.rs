pub mod outputs;
pub mod plan;
pub mod validate;

use anyhow::Context;
use featureflow_config::{ConfigOverrides, FeatureConfig};
use featureflow_core::EnvironmentPlan;
use std::path::Path;

pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<FeatureConfig> {
    let config = featureflow_config::load(path, overrides).context("failed to load configuration")?;
    if let Some(source) = &config.source {
        tracing::debug!("Using configuration {}", source.display());
    }
    Ok(config)
}

pub fn build_plan(config: &FeatureConfig, feature: &str) -> featureflow_core::Result<EnvironmentPlan> {
    tracing::info!("Building plan for {}", feature);
    featureflow_core::build_for(feature, &config.externals, &config.deployment)
}
