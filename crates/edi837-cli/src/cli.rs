//! CLI argument definitions.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "edi837",
    version,
    about = "Convert JSON professional claims to X12 837P",
    long_about = "Convert a JSON professional claim into an X12 005010X222A1 (837P) interchange.\n\n\
                  Claims are validated in full before encoding; every problem is reported\n\
                  with the JSON path of the offending field."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow claim field values (names, identifiers) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// Prefix each log event with the time.
    #[arg(long = "log-timestamps", global = true)]
    pub log_timestamps: bool,

    /// Include the emitting module in each log event.
    #[arg(long = "log-target", global = true)]
    pub log_target: bool,
}

impl Cli {
    /// Logging configuration from the global flags.
    ///
    /// `--log-level` wins over `-v`/`-q`; `RUST_LOG` applies only when
    /// neither is given.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = match self.log_level {
            Some(level) => level.level_filter(),
            None => self.verbosity.tracing_level_filter(),
        };
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            with_timestamps: self.log_timestamps,
            with_target: self.log_target,
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            log_data: self.log_data,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a JSON claim into an 837P document.
    Convert(ConvertArgs),

    /// Validate a JSON claim and list every issue found.
    Check(CheckArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Path to the JSON claim.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Write the document here instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub envelope: EnvelopeArgs,
}

/// Envelope settings. Flags override values loaded with `--envelope`.
#[derive(Args, Default)]
pub struct EnvelopeArgs {
    /// JSON file with envelope settings (sender, receiver, delimiters, ...).
    #[arg(long = "envelope", value_name = "PATH")]
    pub envelope: Option<PathBuf>,

    /// Interchange sender ID (ISA06).
    #[arg(long = "sender-id", value_name = "ID")]
    pub sender_id: Option<String>,

    /// Interchange receiver ID (ISA08).
    #[arg(long = "receiver-id", value_name = "ID")]
    pub receiver_id: Option<String>,

    /// Sender ID qualifier (ISA05).
    #[arg(long = "sender-qualifier", value_name = "CODE")]
    pub sender_qualifier: Option<String>,

    /// Receiver ID qualifier (ISA07).
    #[arg(long = "receiver-qualifier", value_name = "CODE")]
    pub receiver_qualifier: Option<String>,

    /// Control number for all three envelope levels.
    ///
    /// When omitted, one is derived from the current time.
    #[arg(long = "control-number", value_name = "N")]
    pub control_number: Option<u32>,

    /// Mark the interchange as production data (ISA15 = P).
    #[arg(long = "production")]
    pub production: bool,

    /// Do not break lines after segment terminators.
    #[arg(long = "compact")]
    pub compact: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Path to the JSON claim.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
