//! RDS Right-Size CLI
//!
//! Analyzes a fleet of RDS instances against an instance-type catalog and
//! recommends capacity changes (upscale, downscale, terminate) based on
//! observed utilization.

mod aws;
mod catalog_source;
mod commands;
mod output;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rightsize_lib::AnalyzerConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{analyze, catalog};
use output::OutputFormat;

const DEFAULT_INSTANCE_TYPES_URL: &str =
    "https://gist.githubusercontent.com/luneo7/fbea6db54a7bf114ba9310c3e649983b/raw/9cd77a5a9329749b5fbc502ed24dc23a6a70e103/aurora_instance_types.json";

/// RDS Right-Size CLI
#[derive(Parser)]
#[command(name = "rds-rightsize")]
#[command(author, version, about = "Right-sizing recommendations for RDS instances", long_about = None)]
pub struct Cli {
    /// AWS profile to log in with
    #[arg(long, short, env = "AWS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// AWS region to analyze
    #[arg(long, short, env = "AWS_REGION", global = true)]
    pub region: Option<String>,

    /// Instance types JSON URL or local path
    #[arg(long, short = 'i', default_value = DEFAULT_INSTANCE_TYPES_URL, global = true)]
    pub instance_types: String,

    /// Output format
    #[arg(long, short, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the fleet and write a recommendation report
    Analyze {
        /// Comma separated key=value tags; instances must match all of them
        #[arg(long, short, default_value = "")]
        tags: String,

        /// Lookback period in days
        #[arg(long, default_value_t = 30)]
        period: i32,

        /// Used CPU % above which an instance is upsized
        #[arg(long, default_value_t = 75.0)]
        cpu_upsize: f64,

        /// Used CPU % below which an instance is downsized
        #[arg(long, default_value_t = 30.0)]
        cpu_downsize: f64,

        /// Freeable memory % below which an instance is upsized
        #[arg(long, default_value_t = 5.0)]
        mem_upsize: f64,

        /// Statistic for CPU, memory and throughput metrics
        /// (Average, p99, p95, p50, ...)
        #[arg(long, short, default_value = "p99")]
        stat: String,
    },

    /// Inspect the instance-type catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Print every catalog entry
    Show,
    /// Check up/down link consistency
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Analyze {
            tags,
            period,
            cpu_upsize,
            cpu_downsize,
            mem_upsize,
            stat,
        } => {
            let config = AnalyzerConfig {
                period_days: period,
                required_tags: analyze::parse_tags(&tags)?,
                cpu_upsize_threshold: cpu_upsize,
                cpu_downsize_threshold: cpu_downsize,
                mem_upsize_threshold: mem_upsize,
                statistic: stat.parse()?,
            };
            config.validate()?;

            analyze::run(analyze::AnalyzeOptions {
                profile: cli.profile,
                region: cli.region,
                instance_types: cli.instance_types,
                config,
                format: cli.format,
            })
            .await?;
        }
        Commands::Catalog(catalog_cmd) => match catalog_cmd {
            CatalogCommands::Show => {
                catalog::show(&cli.instance_types, cli.format).await?;
            }
            CatalogCommands::Validate => {
                catalog::validate(&cli.instance_types).await?;
            }
        },
    }

    Ok(())
}
