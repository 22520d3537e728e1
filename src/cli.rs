use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use worklog_engine::calculation::AllocationSettings;
use worklog_engine::models::WorkPeriod;

#[derive(Parser, Debug)]
#[command(
    name = "worklog",
    version,
    about = "Split a daily time budget across weighted Jira tickets and log it",
    long_about = None
)]
pub struct Cli {
    /// Configuration directory containing worklog.yaml and holidays/
    #[arg(long, short, default_value = "config/default", global = true)]
    pub config: PathBuf,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the allocation for a range without submitting anything
    Plan {
        #[command(flatten)]
        range: RangeArgs,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Allocate a range and record the worklogs in Jira
    Log {
        #[command(flatten)]
        range: RangeArgs,

        /// Submission back end
        #[arg(long, value_enum, default_value_t = Backend::Rest)]
        backend: Backend,

        /// Skip the /myself credential check
        #[arg(long)]
        skip_auth_check: bool,
    },

    /// Print the worklogs already recorded for a month
    Report {
        /// Calendar month, e.g. 2025-08 (default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Worklog author (default: the configured username)
        #[arg(long)]
        user: Option<String>,
    },

    /// Serve the plan preview API
    Serve {
        /// Listen address
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,

        /// Seed used by requests that carry none
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// JSON REST API
    Rest,
    /// Classic "Log work" web form
    Form,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Only today
    Today,
    /// Monday to Friday of this week
    ThisWeek,
    /// Monday to Friday of last week
    LastWeek,
    /// The whole current month
    ThisMonth,
}

#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD); must be paired with --to
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD); must be paired with --from
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Named range used when --from/--to are absent
    #[arg(long, value_enum, default_value_t = Preset::ThisMonth)]
    pub preset: Preset,

    /// Log on Saturdays and Sundays too
    #[arg(long)]
    pub include_weekends: bool,

    /// Log on public holidays too
    #[arg(long)]
    pub include_holidays: bool,

    /// Pick a random subset of tickets each day
    #[arg(long)]
    pub randomize: bool,

    /// Subset size when randomizing
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Seed for reproducible subsets
    #[arg(long)]
    pub seed: Option<u64>,
}

impl RangeArgs {
    /// Resolves the explicit range or the preset relative to `today`.
    pub fn dates(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let period = match (self.from, self.to) {
            (Some(from), Some(to)) => WorkPeriod::new(from, to),
            (None, None) => match self.preset {
                Preset::Today => WorkPeriod::today(today),
                Preset::ThisWeek => WorkPeriod::this_week(today),
                Preset::LastWeek => WorkPeriod::last_week(today),
                Preset::ThisMonth => WorkPeriod::this_month(today),
            },
            _ => bail!("--from and --to must be given together"),
        };
        period.validate()?;
        Ok((period.start_date, period.end_date))
    }

    /// Applies the command-line switches on top of the configured settings.
    pub fn settings(&self, base: &AllocationSettings) -> AllocationSettings {
        let mut settings = *base;
        if self.include_weekends {
            settings.skip_weekends = false;
        }
        if self.include_holidays {
            settings.skip_holidays = false;
        }
        if self.randomize {
            settings.selection.randomize = true;
        }
        if let Some(k) = self.k {
            settings.selection.k = k;
        }
        settings
    }
}
