use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::processors::{DailyStep, HourlyStep};

#[derive(Parser)]
#[command(name = "hspf-met")]
#[command(about = "Daily and hourly meteorological inputs for HSPF watershed models")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Store directory, overriding the configuration")]
    pub store: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every daily step, then every hourly step
    Run {
        #[arg(long, default_value = "false")]
        quiet: bool,
    },

    /// Run one daily step
    Daily {
        #[arg(value_enum)]
        step: DailyStep,
    },

    /// Run one hourly step
    Hourly {
        #[arg(value_enum)]
        step: HourlyStep,
    },

    /// Check the configuration and print the stations and inputs
    Check,

    /// List the data sets in the store
    List {
        #[arg(short, long, help = "Only show this location")]
        location: Option<String>,
    },

    /// Write one data set to a file
    Export {
        #[arg(short, long)]
        dsn: u32,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Parquet,
}
