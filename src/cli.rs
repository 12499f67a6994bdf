use crate::models::ProfileKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "windwatch",
    version,
    about = "Daily wind and rain forecasts, summarized and posted to Telegram"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every enabled profile on its daily schedule (default)
    Run,
    /// Run a single cycle of one profile now and exit
    Once {
        #[arg(value_enum)]
        profile: ProfileArg,
    },
    /// Write a default config to ~/.config/windwatch/config.yaml
    Init,
    /// Validate config and test connections
    Check,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Wind,
    Rain,
}

impl From<ProfileArg> for ProfileKind {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Wind => ProfileKind::Wind,
            ProfileArg::Rain => ProfileKind::Rain,
        }
    }
}

impl Cli {
    /// Default filter when RUST_LOG is unset
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
