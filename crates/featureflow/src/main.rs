mod commands;

use clap::{Args, Parser, Subcommand, ValueEnum};
use featureflow_config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "featureflow")]
#[command(about = "Plan isolated per-pull-request feature environments", long_about = None)]
struct Cli {
    /// Configuration file (defaults to feature.kdl discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Values that take precedence over the configuration file
#[derive(Args)]
struct OverrideArgs {
    /// Container registry server
    #[arg(long, global = true, env = "FEATUREFLOW_REGISTRY")]
    registry: Option<String>,

    /// Image tag for the nordic service
    #[arg(long, global = true, env = "FEATUREFLOW_NORDIC_TAG")]
    nordic_tag: Option<String>,

    /// Image tag for the worker service
    #[arg(long, global = true, env = "FEATUREFLOW_WORKER_TAG")]
    worker_tag: Option<String>,

    /// Pull request number
    #[arg(long, global = true, env = "FEATUREFLOW_PR")]
    pr: Option<String>,

    /// WAF policy resource id
    #[arg(long, global = true, env = "FEATUREFLOW_WAF_POLICY")]
    waf_policy: Option<String>,

    /// DNS zone that hosts feature domains
    #[arg(long, global = true, env = "FEATUREFLOW_DNS_ZONE")]
    dns_zone: Option<String>,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            registry: args.registry,
            nordic_tag: args.nordic_tag,
            worker_tag: args.worker_tag,
            pr: args.pr,
            waf_policy: args.waf_policy,
            dns_zone: args.dns_zone,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the environment plan for a feature
    Plan {
        /// Feature name (e.g. feature-1234)
        feature: String,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the plan to a file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Check that a plan can be built for a feature
    Validate {
        /// Feature name (e.g. feature-1234)
        feature: String,
    },
    /// Print the values a plan hands back to its caller
    Outputs {
        /// Feature name (e.g. feature-1234)
        feature: String,
    },
    /// Show version information
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout can carry JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let overrides = ConfigOverrides::from(cli.overrides);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Version => {
            println!("featureflow {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Plan {
            feature,
            format,
            out,
        } => {
            commands::plan::handle(config_path, &overrides, &feature, format, out.as_deref())?;
        }
        Commands::Validate { feature } => {
            commands::validate::handle(config_path, &overrides, &feature)?;
        }
        Commands::Outputs { feature } => {
            commands::outputs::handle(config_path, &overrides, &feature)?;
        }
    }

    Ok(())
}
