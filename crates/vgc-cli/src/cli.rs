//! CLI argument definitions for the chart pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use vgc_model::DuplicateKeyPolicy;
use vgc_output::DashboardView;

#[derive(Parser)]
#[command(
    name = "vgc",
    version,
    about = "Video-game chart preprocessing - clean, merge and segment sales charts",
    long_about = "Clean the raw video-game sales chart, join it with developer, publisher\n\
                  and geography registries, and write the cleaned, merged and segmented\n\
                  tables for downstream reporting."
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

#[derive(Subcommand)]
pub enum Command {
    /// Run the preprocessing pipeline and write the artifacts.
    Build(BuildArgs),

    /// Load every raw table non-fatally and report its shape and gaps.
    Explore(ExploreArgs),

    /// Query persisted artifacts with dashboard filters.
    View(ViewArgs),

    /// Print the active lookup tables.
    Lookups(LookupsArgs),
}

#[derive(Parser)]
pub struct BuildArgs {
    /// Directory containing the raw vg_*.csv files.
    #[arg(value_name = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Output directory for artifacts.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "processed_data")]
    pub output_dir: PathBuf,

    /// Lookup tables file (default: $VGC_STANDARDS_DIR/lookups.toml or built-in).
    #[arg(long = "lookups", value_name = "PATH")]
    pub lookups: Option<PathBuf>,

    /// What to do when a registry has several rows for one key.
    #[arg(long = "duplicate-keys", value_enum, default_value = "first-match")]
    pub duplicate_keys: DuplicateKeysArg,

    /// Run every stage and report without writing artifacts.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ExploreArgs {
    /// Directory containing the raw vg_*.csv files.
    #[arg(value_name = "DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Number of best-selling chart rows to list.
    #[arg(long = "top", value_name = "N", default_value_t = 10)]
    pub top: usize,
}

#[derive(Parser)]
pub struct ViewArgs {
    /// Directory holding the artifacts of a previous build.
    #[arg(value_name = "OUTPUT_DIR", default_value = "processed_data")]
    pub output_dir: PathBuf,

    /// Table to query.
    #[arg(long = "view", value_enum, default_value = "merged")]
    pub view: ViewArg,

    /// Only rows with this platform code.
    #[arg(long = "platform", value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Only rows with this genre.
    #[arg(long = "genre", value_name = "GENRE")]
    pub genre: Option<String>,

    /// First release year to include.
    #[arg(long = "year-from", value_name = "YEAR")]
    pub year_from: Option<i32>,

    /// Last release year to include.
    #[arg(long = "year-to", value_name = "YEAR")]
    pub year_to: Option<i32>,

    /// Number of best-selling rows to list.
    #[arg(long = "top", value_name = "N", default_value_t = 20)]
    pub top: usize,
}

#[derive(Parser)]
pub struct LookupsArgs {
    /// Lookup tables file (default: $VGC_STANDARDS_DIR/lookups.toml or built-in).
    #[arg(long = "lookups", value_name = "PATH")]
    pub lookups: Option<PathBuf>,
}

/// CLI duplicate-key policy choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum DuplicateKeysArg {
    Reject,
    FirstMatch,
    FanOut,
}

impl From<DuplicateKeysArg> for DuplicateKeyPolicy {
    fn from(arg: DuplicateKeysArg) -> Self {
        match arg {
            DuplicateKeysArg::Reject => DuplicateKeyPolicy::Reject,
            DuplicateKeysArg::FirstMatch => DuplicateKeyPolicy::FirstMatch,
            DuplicateKeysArg::FanOut => DuplicateKeyPolicy::FanOut,
        }
    }
}

/// CLI dashboard view choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Merged,
    Recent,
    MajorPublishers,
    TopPlatforms,
}

impl From<ViewArg> for DashboardView {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Merged => DashboardView::Merged,
            ViewArg::Recent => DashboardView::RecentGames,
            ViewArg::MajorPublishers => DashboardView::MajorPublishers,
            ViewArg::TopPlatforms => DashboardView::TopPlatforms,
        }
    }
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

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
