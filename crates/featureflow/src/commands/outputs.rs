use featureflow_config::ConfigOverrides;
use std::path::Path;

pub fn handle(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    feature: &str,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path, overrides)?;
    let plan = super::build_plan(&config, feature)?;

    println!("{}", serde_json::to_string_pretty(plan.outputs())?);
    Ok(())
}
