//! `vetting`: commitment tooling and an end-to-end demo of a vetting session.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use vetting_cli::demo::parse_seed;
use vetting_cli::{run_demo, DemoOptions, VettingConfig};
use vetting_crypto::{commitment_hash, Secret};
use vetting_types::{CommitScheme, JurorAddress};
use vetting_utils::LogFormat;

#[derive(Parser)]
#[command(name = "vetting", about = "Commit-reveal vetting jury tooling")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for the LMDB store.
    #[arg(long, global = true, env = "VETTING_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, env = "VETTING_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "VETTING_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the commitment hash for a decision.
    Hash {
        #[arg(long, value_enum)]
        decision: Decision,
        /// Reveal secret; keep it, it is needed to reveal.
        #[arg(long)]
        secret: String,
        /// Juror address the commitment is bound to.
        #[arg(long)]
        juror: String,
        /// Hash scheme: "blake2b256" or "keccak256" (defaults to the config).
        #[arg(long)]
        scheme: Option<CommitScheme>,
    },
    /// Print a fresh random reveal secret.
    Secret,
    /// Print the effective configuration as TOML.
    Config,
    /// Run a full session against the local store and print the results.
    Demo {
        #[arg(long, default_value_t = 2)]
        candidates: u64,
        #[arg(long, default_value_t = 5)]
        jury_size: u32,
        /// Per-juror stake; 0 disables staking.
        #[arg(long, default_value_t = 0)]
        stake: u128,
        /// 32-byte hex VRF seed for a reproducible jury.
        #[arg(long)]
        seed: Option<String>,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Decision {
    Approve,
    Reject,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => VettingConfig::from_toml_file(path)?,
        None => VettingConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    vetting_utils::init_logging(config.log_format, &config.log_level)?;

    match cli.command {
        Command::Hash {
            decision,
            secret,
            juror,
            scheme,
        } => {
            let juror = JurorAddress::parse(juror)?;
            let scheme = scheme.unwrap_or(config.params.default_scheme);
            let hash = commitment_hash(
                scheme,
                matches!(decision, Decision::Approve),
                &secret,
                &juror,
            );
            println!("{}", hash.to_hex());
        }
        Command::Secret => {
            let secret = Secret::generate()?;
            println!("{}", secret.expose());
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Demo {
            candidates,
            jury_size,
            stake,
            seed,
            json,
        } => {
            let options = DemoOptions {
                candidates,
                jury_size,
                stake,
                seed: seed.as_deref().map(parse_seed).transpose()?,
            };
            tracing::info!(data_dir = %config.data_dir.display(), "running demo session");
            let report = run_demo(&config, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} with {} jurors", report.session, report.jurors.len());
                for result in &report.results {
                    println!(
                        "  {}: {} approve / {} reject ({}%) -> {}",
                        result.candidate,
                        result.approvals,
                        result.rejections,
                        result.approval_percentage,
                        if result.approved { "approved" } else { "rejected" },
                    );
                }
                for (candidate, silent) in &report.non_revealers {
                    for juror in silent {
                        println!("  {candidate}: {juror} committed but never revealed");
                    }
                }
                println!("  {} events emitted", report.events);
            }
        }
    }
    Ok(())
}
