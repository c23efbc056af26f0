mod platform;

use std::path::PathBuf;

use clap::Parser;
use newsdesk_core::Category;

use platform::logging::LogDestination;

/// Terminal news reader: page through headlines, keep favorites, export them.
#[derive(Debug, Parser)]
#[command(name = "newsdesk", version, about)]
pub struct Cli {
    /// RON configuration file; missing means defaults.
    #[arg(long, default_value = "newsdesk.ron")]
    pub config: PathBuf,

    /// Directory holding the saved-article store.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory the export is written to.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Headline category to open with.
    #[arg(long)]
    pub category: Option<Category>,

    /// Start with a search instead of headlines.
    #[arg(long)]
    pub query: Option<String>,
}

fn main() -> anyhow::Result<()> {
    platform::run_app(Cli::parse())
}
