//! Command-line front end for coverage and quota audit sampling runs.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use audit_sampler::{
    coverage_run, quota_run, write_dir, AuditError, ColumnMap, CoverageConfig, NamedTable,
    ProfileSet, QuotaConfig, Rosters, Table,
};

#[derive(Parser)]
#[command(name = "audit", about = "Stratified audit sampling over coding exports")]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Directory the sampled data and summaries are written to.
    #[arg(long, default_value = "out")]
    output: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileSetArg {
    SetA,
    SetB,
    Union,
}

impl From<ProfileSetArg> for ProfileSet {
    fn from(arg: ProfileSetArg) -> Self {
        match arg {
            ProfileSetArg::SetA => ProfileSet::SetA,
            ProfileSetArg::SetB => ProfileSet::SetB,
            ProfileSetArg::Union => ProfileSet::Union,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Priority-coverage sampling with per-operator floors (Policy A).
    Coverage {
        /// Input CSV export.
        input: PathBuf,
        /// Roster reference file (priority modules + profile sets).
        #[arg(long)]
        rosters: PathBuf,
        /// Which operator roster to sample against.
        #[arg(long, value_enum, default_value = "union")]
        profile_set: ProfileSetArg,
        /// Percentage of each priority stratum drawn first (0-100).
        #[arg(long, default_value_t = 40)]
        priority_percentage: u32,
        /// Per-operator percentage floor (0-100).
        #[arg(long, default_value_t = 20)]
        user_percentage: u32,
        /// Per-operator absolute floor.
        #[arg(long, default_value_t = 50)]
        min_samples: usize,
        /// RNG seed for the priority and percentage passes.
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Seed for the absolute-floor pass (defaults to the main seed).
        #[arg(long)]
        floor_seed: Option<u64>,
        /// Continue the main seeded stream in the floor pass instead of
        /// restarting from a fixed seed.
        #[arg(long, conflicts_with = "floor_seed")]
        unseeded_floor: bool,
    },
    /// Fixed quota-per-cell sampling with an expected-vs-actual report
    /// (Policy B).
    Quota {
        /// Input CSV export.
        input: PathBuf,
        /// Quota table file (JSON list of change-type/retailer/count lines).
        #[arg(long)]
        quotas: PathBuf,
        /// Base RNG seed; per-cell seeds are derived from it.
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn run(cli: Cli) -> Result<(), AuditError> {
    let map = ColumnMap::default();
    match cli.command {
        Command::Coverage {
            input,
            rosters,
            profile_set,
            priority_percentage,
            user_percentage,
            min_samples,
            seed,
            floor_seed,
            unseeded_floor,
        } => {
            let config = CoverageConfig {
                priority_percentage,
                user_percentage,
                min_samples,
                seed,
                floor_seed: if unseeded_floor {
                    None
                } else {
                    Some(floor_seed.unwrap_or(seed))
                },
            };
            config.validate()?;
            let rosters = Rosters::from_json_path(&rosters)?;
            let table = Table::from_csv_path(&input)?;
            info!(rows = table.len(), "loaded input");

            let run = coverage_run(&table, &map, &config, &rosters, profile_set.into())?;
            write_dir(
                &cli.output,
                &[
                    NamedTable {
                        name: "sampled_data",
                        table: &run.sampled,
                    },
                    NamedTable {
                        name: "category_summary",
                        table: &run.module_summary,
                    },
                    NamedTable {
                        name: "user_profile_summary",
                        table: &run.user_summary,
                    },
                ],
            )?;
            info!(
                sampled = run.sampled.len(),
                output = %cli.output.display(),
                "coverage run written"
            );
        }
        Command::Quota {
            input,
            quotas,
            seed,
        } => {
            let config = QuotaConfig::from_json_path(&quotas, seed)?;
            config.validate()?;
            let table = Table::from_csv_path(&input)?;
            info!(rows = table.len(), "loaded input");

            let run = quota_run(&table, &map, &config)?;
            write_dir(
                &cli.output,
                &[
                    NamedTable {
                        name: "audit_samples",
                        table: &run.sampled,
                    },
                    NamedTable {
                        name: "volume_summary",
                        table: &run.summary,
                    },
                ],
            )?;
            info!(
                sampled = run.sampled.len(),
                output = %cli.output.display(),
                "quota run written"
            );
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
