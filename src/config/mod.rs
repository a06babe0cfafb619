//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{num::NonZeroUsize, path::PathBuf, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use time::Date;
use tracing::level_filters::LevelFilter;

use crate::application::pagination::PaginationSettings;
use crate::application::reading_time::{DEFAULT_FORMAT, MINUTES_PLACEHOLDER, ReadingTimeFormat};
use crate::domain::slug::SlugStyle;
use crate::util::dates::parse_calendar_date;

pub use cli::{
    CliArgs, Command, GlobalOverrides, ListArgs, ReadingTimeArgs, RenderArgs, SimilarArgs,
    SitemapArgs,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "chongyan";
const ENV_PREFIX: &str = "CHONGYAN";
const DEFAULT_CONTENT_ROOT: &str = "src/content";
const DEFAULT_SITE_NAME: &str = "重言";
const DEFAULT_SITE_TITLE: &str = "重言的博客";
const DEFAULT_SITE_SUBTITLE: &str = "无限进步";
const DEFAULT_SITE_DESCRIPTION: &str = "全栈开发工程师，分享技术心得与生活感悟";
const DEFAULT_SITE_URL: &str = "https://chongyan.cloud";
const DEFAULT_DEV_URL: &str = "http://localhost:4321";
const DEFAULT_SITE_AUTHOR: &str = "重言";
const DEFAULT_START_DATE: &str = "2023-01-01";
const DEFAULT_COMPLEXITY: f64 = 1.0;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub content: ContentSettings,
    pub site: SiteSettings,
    pub reading: ReadingSettings,
    pub pagination: PaginationSettings,
    pub render: RenderSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct ContentSettings {
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub url: String,
    pub dev_url: String,
    pub author: String,
    pub start_date: Date,
    pub production: bool,
}

impl SiteSettings {
    /// The public URL in production, the dev server otherwise.
    pub fn site_url(&self) -> &str {
        if self.production {
            &self.url
        } else {
            &self.dev_url
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReadingSettings {
    pub complexity: f64,
    pub format: ReadingTimeFormat,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderSettings {
    pub slug_style: SlugStyle,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Parse CLI arguments and resolve configuration, returning both.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    content: RawContentSettings,
    site: RawSiteSettings,
    reading: RawReadingSettings,
    pagination: RawPaginationSettings,
    render: RawRenderSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(root) = overrides.content_root.as_ref() {
            self.content.root = Some(root.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            content,
            site,
            reading,
            pagination,
            render,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            content: build_content_settings(content)?,
            site: build_site_settings(site)?,
            reading: build_reading_settings(reading)?,
            pagination: build_pagination_settings(pagination)?,
            render: build_render_settings(render),
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_content_settings(content: RawContentSettings) -> Result<ContentSettings, LoadError> {
    let root = content
        .root
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_ROOT));
    if root.as_os_str().is_empty() {
        return Err(LoadError::invalid("content.root", "path must not be empty"));
    }
    Ok(ContentSettings { root })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let url = non_empty_url(site.url, DEFAULT_SITE_URL, "site.url")?;
    let dev_url = non_empty_url(site.dev_url, DEFAULT_DEV_URL, "site.dev_url")?;

    let start_date_raw = site
        .start_date
        .unwrap_or_else(|| DEFAULT_START_DATE.to_string());
    let start_date = parse_calendar_date(&start_date_raw).map_err(|err| {
        LoadError::invalid(
            "site.start_date",
            format!("`{start_date_raw}` is not a YYYY-MM-DD date: {err}"),
        )
    })?;

    Ok(SiteSettings {
        name: site.name.unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
        title: site.title.unwrap_or_else(|| DEFAULT_SITE_TITLE.to_string()),
        subtitle: site
            .subtitle
            .unwrap_or_else(|| DEFAULT_SITE_SUBTITLE.to_string()),
        description: site
            .description
            .unwrap_or_else(|| DEFAULT_SITE_DESCRIPTION.to_string()),
        url,
        dev_url,
        author: site.author.unwrap_or_else(|| DEFAULT_SITE_AUTHOR.to_string()),
        start_date,
        production: site.production.unwrap_or(false),
    })
}

fn build_reading_settings(reading: RawReadingSettings) -> Result<ReadingSettings, LoadError> {
    let complexity = reading.complexity.unwrap_or(DEFAULT_COMPLEXITY);
    if !complexity.is_finite() || complexity <= 0.0 {
        return Err(LoadError::invalid(
            "reading.complexity",
            "must be a finite number greater than zero",
        ));
    }

    let template = reading.format.unwrap_or_else(|| DEFAULT_FORMAT.to_string());
    let format = ReadingTimeFormat::new(template).ok_or_else(|| {
        LoadError::invalid(
            "reading.format",
            format!("template must contain `{MINUTES_PLACEHOLDER}`"),
        )
    })?;

    Ok(ReadingSettings { complexity, format })
}

fn build_pagination_settings(
    pagination: RawPaginationSettings,
) -> Result<PaginationSettings, LoadError> {
    let defaults = PaginationSettings::default();
    Ok(PaginationSettings {
        blog_entries_per_page: non_zero_usize(
            pagination
                .blog_entries_per_page
                .unwrap_or(defaults.blog_entries_per_page),
            "pagination.blog_entries_per_page",
        )?,
        notes_page_size: non_zero_usize(
            pagination.notes_page_size.unwrap_or(defaults.notes_page_size),
            "pagination.notes_page_size",
        )?,
        default_page_size: non_zero_usize(
            pagination
                .default_page_size
                .unwrap_or(defaults.default_page_size),
            "pagination.default_page_size",
        )?,
    })
}

fn build_render_settings(render: RawRenderSettings) -> RenderSettings {
    RenderSettings {
        slug_style: render.slug_style.unwrap_or_default(),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContentSettings {
    root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    name: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    description: Option<String>,
    url: Option<String>,
    dev_url: Option<String>,
    author: Option<String>,
    start_date: Option<String>,
    production: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawReadingSettings {
    complexity: Option<f64>,
    format: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPaginationSettings {
    blog_entries_per_page: Option<usize>,
    notes_page_size: Option<usize>,
    default_page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    slug_style: Option<SlugStyle>,
}

fn non_empty_url(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    let value = value.unwrap_or_else(|| default.to_string());
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(LoadError::invalid(key, "url must not be empty"));
    }
    url::Url::parse(trimmed)
        .map_err(|err| LoadError::invalid(key, format!("invalid url: {err}")))?;
    Ok(trimmed.to_string())
}

fn non_zero_usize(value: usize, key: &'static str) -> Result<usize, LoadError> {
    NonZeroUsize::new(value)
        .map(NonZeroUsize::get)
        .ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
