use colored::Colorize;
use featureflow_config::ConfigOverrides;
use featureflow_core::ResourceKind;
use std::path::Path;

pub fn handle(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    feature: &str,
) -> anyhow::Result<()> {
    println!("{}", "Validating feature environment...".blue());

    let config = match super::load_config(config_path, overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Configuration error".red().bold());
            eprintln!("  {:#}", e);
            std::process::exit(1);
        }
    };

    if let Some(source) = &config.source {
        println!("Configuration: {}", source.display().to_string().cyan());
    }

    match super::build_plan(&config, feature) {
        Ok(plan) => {
            let summary = plan.summary();
            println!("{}", "✓ Plan is valid".green().bold());
            println!();
            println!("Summary:");
            println!("  Feature URL: {}", plan.outputs().feature_url.cyan());
            println!("  Resources: {} in {} waves", summary.total, summary.waves);
            for kind in ResourceKind::ALL {
                let count = summary.count(kind);
                if count > 0 {
                    println!("    - {} ({})", kind.as_str().cyan(), count);
                }
            }
            println!("  External references: {}", summary.externals);
        }
        Err(e) => {
            eprintln!();
            eprintln!("{} {}", "✗ Validation failed:".red().bold(), e.reason());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
