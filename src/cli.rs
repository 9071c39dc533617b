use crate::checkin::{EngineConfig, IdentityMode, Prefer};
use crate::git::{open_source, Backend, CommitSource};
use crate::heat::{HeatmapOptions, DEFAULT_CAP, DEFAULT_SPAN_DAYS};
use crate::util::{parse_date, parse_utc_offset};
use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitattend")]
#[command(about = "Aggregate check-in commits into attendance records, statistics and a heatmap")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = Backend::Gix, help = "How commit history is read")]
    pub backend: Backend,

    #[arg(
        long,
        global = true,
        value_parser = offset_arg,
        default_value = "+09:00",
        help = "UTC offset of the canonical timezone (default Asia/Tokyo)"
    )]
    pub utc_offset: FixedOffset,

    #[arg(long, global = true, value_enum, default_value_t = IdentityMode::Name, help = "How a user is derived from the commit author")]
    pub identity: IdentityMode,

    #[arg(long, global = true, value_enum, default_value_t = Prefer::Earliest, help = "Which commit wins when a user checks in twice on one day")]
    pub prefer: Prefer,

    #[arg(long, global = true, help = "Hide the progress spinner")]
    pub no_progress: bool,
}

#[derive(Args, Clone, Copy)]
pub struct HeatArgs {
    #[arg(long, default_value_t = DEFAULT_SPAN_DAYS, value_parser = clap::value_parser!(u32).range(1..=3660), help = "Number of days shown on the heatmap")]
    pub days: u32,

    #[arg(long, default_value_t = DEFAULT_CAP, value_parser = clap::value_parser!(u32).range(1..=100), help = "Participant count at which heatmap colour saturates")]
    pub cap: u32,

    #[arg(long, value_parser = date_arg, help = "Last day shown on the heatmap (YYYY-MM-DD); defaults to the latest check-in")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write attendance, counts, per-user stats, duplicates and the heatmap
    Aggregate {
        #[arg(long, help = "Directory for CSV/JSON outputs [default: <repo>/data]")]
        data_dir: Option<PathBuf>,

        #[arg(long, help = "Directory for the heatmap SVG [default: <repo>/assets]")]
        assets_dir: Option<PathBuf>,

        #[arg(long, help = "Also print duplicates as GitHub Actions warning annotations")]
        github_annotations: bool,

        #[clap(flatten)]
        heat: HeatArgs,
    },
    /// Show per-user statistics
    Stats {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Show the attendance heatmap
    Heat {
        #[arg(long, help = "Print the SVG instead of a terminal rendering")]
        svg: bool,

        #[clap(flatten)]
        heat: HeatArgs,
    },
}

fn offset_arg(s: &str) -> std::result::Result<FixedOffset, String> {
    parse_utc_offset(s).map_err(|e| e.to_string())
}

fn date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

impl CommonArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            zone: self.utc_offset,
            identity: self.identity,
            prefer: self.prefer,
        }
    }

    pub fn open_source(&self) -> Result<Box<dyn CommitSource>> {
        open_source(self.backend, self.repo.as_ref(), !self.no_progress)
            .context("Failed to open git repository")
    }

    /// Today in the canonical zone. Only consulted when nothing else anchors the heatmap.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }
}

impl From<HeatArgs> for HeatmapOptions {
    fn from(args: HeatArgs) -> Self {
        Self {
            days: args.days,
            cap: args.cap,
            as_of: args.as_of,
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Aggregate {
                data_dir,
                assets_dir,
                github_annotations,
                heat,
            } => crate::export::exec(
                &self.common,
                data_dir,
                assets_dir,
                github_annotations,
                heat.into(),
            ),
            Commands::Stats { json, ndjson } => crate::stats::exec(&self.common, json, ndjson),
            Commands::Heat { svg, heat } => crate::heat::exec(&self.common, svg, heat.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_canonical_config() {
        let cli = Cli::try_parse_from(["gitattend", "heat"]).unwrap();
        assert_eq!(cli.common.utc_offset.local_minus_utc(), 9 * 3600);
        assert_eq!(cli.common.identity, IdentityMode::Name);
        assert_eq!(cli.common.prefer, Prefer::Earliest);
        match cli.command {
            Commands::Heat { svg, heat } => {
                assert!(!svg);
                assert_eq!(heat.cap, 3);
                assert_eq!(heat.days, 365);
                assert!(heat.as_of.is_none());
            }
            _ => panic!("expected heat"),
        }
    }

    #[test]
    fn rejects_zero_cap_and_bad_dates() {
        assert!(Cli::try_parse_from(["gitattend", "heat", "--cap", "0"]).is_err());
        assert!(Cli::try_parse_from(["gitattend", "heat", "--as-of", "2025-02-30"]).is_err());
        assert!(Cli::try_parse_from(["gitattend", "--utc-offset", "nine", "stats"]).is_err());
    }
}
