//! CLI argument definitions for the XML table explorer.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{Args, ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;
use xtab_model::FilterSpec;

use crate::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "xml-table",
    version,
    about = "XML table explorer - flatten loosely structured XML into a table",
    long_about = "Flatten loosely structured XML into a filterable table.\n\n\
                  Records are found by tag, by path, or by detecting the most\n\
                  repeated element. Rows can be filtered, sorted, grouped by BL\n\
                  and exported as an Excel workbook or CSV."
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

    /// Log output format (pretty for human, json for machine parsing).
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
}

impl Cli {
    /// Logging configuration from the global flags.
    ///
    /// `--log-level` beats `-v`/`-q`, and either one disables `RUST_LOG`.
    /// File logs carry timestamps and never use ANSI colors under `auto`.
    pub fn log_config(&self) -> LogConfig {
        let level_filter: LevelFilter = match self.log_level {
            Some(level) => level.into(),
            None => self.verbosity.tracing_level_filter(),
        };
        let use_env_filter = !(self.verbosity.is_present() || self.log_level.is_some());
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig::default()
            .with_level_filter(level_filter)
            .with_env_filter(use_env_filter)
            .with_format(self.log_format.into())
            .with_timestamps(self.log_file.is_some())
            .with_ansi(with_ansi)
            .with_log_file(self.log_file.clone())
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Export the visible rows as a workbook or CSV.
    Convert(ConvertArgs),

    /// Print the table with its record detection and view summary.
    Inspect(InspectArgs),

    /// List the filter values of one column.
    Values(ValuesArgs),
}

/// Where rows come from and how records are found.
#[derive(Args)]
pub struct SourceArgs {
    /// XML file, or a folder searched recursively for *.xml files.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Use every element with this tag as a record (case-insensitive).
    #[arg(long = "record-tag", value_name = "TAG")]
    pub record_tag: Option<String>,

    /// Use the elements at this slash-separated path as records.
    ///
    /// Takes precedence over --record-tag.
    #[arg(long = "record-path", value_name = "PATH")]
    pub record_path: Option<String>,

    /// Add a _source_file column with the path of each row's file.
    #[arg(long = "add-source")]
    pub add_source: bool,
}

/// Options shaping which rows and columns are shown.
#[derive(Args)]
pub struct ViewArgs {
    /// Show every column instead of only BL and ErrorMessage.
    #[arg(long = "full-view")]
    pub full_view: bool,

    /// Keep rows whose status is only S.
    #[arg(long = "show-status-s")]
    pub show_status_s: bool,

    /// Keep rows where COLUMN equals VALUE. Repeat to select several values;
    /// `COLUMN=` selects empty cells.
    #[arg(long = "filter", value_name = "COLUMN=VALUE")]
    pub filters: Vec<FilterSpec>,

    /// Load a saved view (JSON). Flags given on the command line win.
    #[arg(long = "view-file", value_name = "PATH")]
    pub view_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Output path, or - for CSV on stdout.
    ///
    /// A .csv path gets CSV, any other path an Excel workbook. Defaults to
    /// <INPUT>.xlsx for a file and <INPUT>/xml_table.xlsx for a folder.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// CSV delimiter. Ignored for workbooks.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Show a flat table instead of grouping rows by BL.
    #[arg(long = "no-group")]
    pub no_group: bool,

    /// Expand the group with this BL. Repeatable.
    #[arg(long = "expand", value_name = "BL")]
    pub expand: Vec<String>,

    /// Mark the group with this BL as done. Repeatable.
    #[arg(long = "check", value_name = "BL")]
    pub check: Vec<String>,

    /// Sort by this column. Repeating a column flips the direction.
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Vec<String>,
}

#[derive(Args)]
pub struct ValuesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Column to list.
    #[arg(long = "column", value_name = "COLUMN")]
    pub column: String,
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

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
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
