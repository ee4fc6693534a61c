use crate::OutputFormat;
use colored::Colorize;
use featureflow_config::ConfigOverrides;
use featureflow_core::EnvironmentPlan;
use std::fmt::Write as _;
use std::path::Path;

pub fn handle(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
    feature: &str,
    format: OutputFormat,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path, overrides)?;
    let plan = super::build_plan(&config, feature)?;

    match out {
        Some(path) => {
            // Files never carry ANSI escapes
            let rendered = match format {
                OutputFormat::Json => plan.to_json()?,
                OutputFormat::Text => render_text(&plan, false),
            };
            std::fs::write(path, rendered + "\n")?;
            println!(
                "{} {} -> {}",
                "✓".green(),
                plan.summary(),
                path.display().to_string().cyan()
            );
        }
        None => match format {
            OutputFormat::Json => println!("{}", plan.to_json()?),
            OutputFormat::Text => println!("{}", render_text(&plan, true)),
        },
    }

    Ok(())
}

fn render_text(plan: &EnvironmentPlan, color: bool) -> String {
    let paint = |s: &str, f: fn(&str) -> colored::ColoredString| {
        if color { f(s).to_string() } else { s.to_string() }
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Plan for {} ({})",
        paint(plan.feature().as_str(), |s| s.bold()),
        plan.outputs().feature_url
    );

    for (i, wave) in plan.waves().iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", paint(&format!("Wave {}", i + 1), |s| s.blue()));
        for spec in wave {
            let _ = writeln!(
                out,
                "  + {:<24} {}",
                spec.kind.as_str(),
                paint(&spec.physical_name, |s| s.cyan())
            );
            if !spec.depends_on.is_empty() {
                let deps: Vec<&str> = spec.depends_on.iter().map(String::as_str).collect();
                let _ = writeln!(out, "      after: {}", deps.join(", "));
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "External references:");
    for reference in plan.externals() {
        let _ = writeln!(out, "  {:<20} {}", reference.kind.as_str(), reference.name);
    }

    let _ = writeln!(out);
    let _ = write!(out, "{}", plan.summary());
    out
}
