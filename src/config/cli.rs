use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::application::sort::SortOrder;

/// Command-line arguments for the Chongyan binary.
#[derive(Debug, Parser)]
#[command(
    name = "chongyan",
    version,
    about = "Content tooling for the Chongyan blog"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "CHONGYAN_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the content root directory.
    #[arg(long = "content-root", value_name = "PATH", value_hint = ValueHint::DirPath, global = true)]
    pub content_root: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List entries related to one entry by shared categories and tags.
    Similar(SimilarArgs),
    /// Estimate the reading time of an entry or a markdown file.
    #[command(name = "reading-time")]
    ReadingTime(ReadingTimeArgs),
    /// Print site statistics as JSON.
    Stats,
    /// List a collection page by page.
    List(ListArgs),
    /// Render a markdown file to HTML.
    Render(RenderArgs),
    /// Print sitemap.xml, or the sitemap index with --index.
    Sitemap(SitemapArgs),
    /// Print robots.txt.
    Robots,
}

#[derive(Debug, Args, Clone)]
pub struct SimilarArgs {
    /// Collection name, e.g. `blog`.
    pub collection: String,
    /// Entry id within the collection.
    pub id: String,
    /// Maximum number of related entries to print.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Debug, Args, Clone)]
#[command(group(
    clap::ArgGroup::new("source")
        .required(true)
        .args(["collection", "file"])
))]
pub struct ReadingTimeArgs {
    /// Collection name; requires an entry id.
    #[arg(requires = "id")]
    pub collection: Option<String>,
    /// Entry id within the collection.
    pub id: Option<String>,
    /// Read markdown from a file instead of a collection.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, conflicts_with = "collection")]
    pub file: Option<PathBuf>,
    /// Complexity multiplier; defaults to `reading.complexity`.
    #[arg(long, value_name = "FACTOR")]
    pub complexity: Option<f64>,
}

#[derive(Debug, Args, Clone)]
pub struct ListArgs {
    /// Collection name, e.g. `notes`.
    pub collection: String,
    /// Sort order applied before paging.
    #[arg(long, value_enum, default_value_t = SortOrder::Date)]
    pub sort: SortOrder,
    /// 1-based page number.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(usize))]
    pub page: usize,
    /// Include draft entries.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub drafts: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Markdown file to render; front matter is skipped when present.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
    /// Render inline, without the wrapping paragraph.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub inline: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SitemapArgs {
    /// Print the sitemap index instead of the sitemap itself.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub index: bool,
}
