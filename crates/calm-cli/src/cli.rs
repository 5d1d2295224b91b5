//! Command-line argument definitions.

use std::path::PathBuf;

use calm_core::Granularity;
use clap::{Parser, Subcommand, ValueEnum};

/// Schedule stress and rest-buffer analysis.
///
/// Reads time-boxed events as JSON and estimates how stressful a period is,
/// and where back-to-back commitments need more recovery time.
#[derive(Debug, Parser)]
#[command(name = "calm", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Estimate the stress level of a period.
    Stress {
        /// JSON file with an array of events, or `-` for stdin.
        #[arg(long)]
        events: PathBuf,

        /// Analysis window size.
        #[arg(long, value_enum, default_value_t = PeriodArg::Week)]
        period: PeriodArg,

        /// Any date inside the period: YYYY-MM-DD, "today", "yesterday",
        /// or relative ("3 days ago", "1 week ago"). Defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Also show day-by-day stress for every day of the period.
        #[arg(long)]
        daily: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Suggest rest buffers between back-to-back events.
    Buffers {
        /// JSON file with an array of events, or `-` for stdin.
        #[arg(long)]
        events: PathBuf,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Period choices accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodArg {
    Day,
    Week,
    Month,
    Year,
}

impl From<PeriodArg> for Granularity {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Day => Self::Day,
            PeriodArg::Week => Self::Week,
            PeriodArg::Month => Self::Month,
            PeriodArg::Year => Self::Year,
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
    fn stress_defaults_to_week() {
        let cli = Cli::try_parse_from(["calm", "stress", "--events", "events.json"]).unwrap();
        match cli.command {
            Some(Commands::Stress {
                period,
                date,
                daily,
                json,
                ..
            }) => {
                assert_eq!(period, PeriodArg::Week);
                assert!(date.is_none());
                assert!(!daily);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn period_maps_to_granularity() {
        let cli = Cli::try_parse_from([
            "calm", "-v", "stress", "--events", "-", "--period", "month",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Some(Commands::Stress { period, .. }) = cli.command else {
            panic!("expected stress command");
        };
        assert_eq!(Granularity::from(period), Granularity::Month);
    }

    #[test]
    fn rejects_unknown_period() {
        let result =
            Cli::try_parse_from(["calm", "stress", "--events", "-", "--period", "decade"]);
        assert!(result.is_err());
    }
}
