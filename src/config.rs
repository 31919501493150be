use crate::theme::Theme;
use clap::Parser;
use signal_map::dataset::{CsvFileSource, DatasetSource, RemoteCsvSource, StaticSource};
use signal_map::LoadError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "signal-map",
    version,
    about = "Terminal dashboard for graded public-health events"
)]
pub struct Args {
    /// `static` for the built-in sample, an http(s) URL, or a CSV file path
    #[arg(long, default_value = "static")]
    pub source: String,

    /// Seconds a successful load stays fresh
    #[arg(long, default_value_t = 1800)]
    pub ttl_secs: u64,

    /// HTTP timeout for remote sources
    #[arg(long, default_value_t = 20)]
    pub timeout_secs: u64,

    #[arg(long, value_enum, default_value_t = Theme::Light)]
    pub theme: Theme,

    /// Directory holding Natural Earth GeoJSON files
    #[arg(long, default_value = "data")]
    pub basemap_dir: PathBuf,

    /// Where `e` writes CSV exports
    #[arg(long, default_value = ".")]
    pub export_dir: PathBuf,

    /// Log file; the terminal itself is owned by the UI
    #[arg(long, default_value = "signal-map.log")]
    pub log_file: PathBuf,
}

/// Where the event table comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Static,
    Remote(String),
    File(PathBuf),
}

impl SourceSpec {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("static") {
            SourceSpec::Static
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            SourceSpec::Remote(raw.to_string())
        } else {
            SourceSpec::File(PathBuf::from(raw))
        }
    }

    pub fn open(&self, timeout: Duration) -> Result<Box<dyn DatasetSource>, LoadError> {
        Ok(match self {
            SourceSpec::Static => Box::new(StaticSource),
            SourceSpec::Remote(url) => Box::new(RemoteCsvSource::new(url.clone(), timeout)?),
            SourceSpec::File(path) => Box::new(CsvFileSource::new(path.clone())),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceSpec,
    pub ttl: Duration,
    pub timeout: Duration,
    pub theme: Theme,
    pub basemap_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            source: SourceSpec::parse(&args.source),
            ttl: Duration::from_secs(args.ttl_secs),
            timeout: Duration::from_secs(args.timeout_secs),
            theme: args.theme,
            basemap_dir: args.basemap_dir,
            export_dir: args.export_dir,
            log_file: args.log_file,
        }
    }
}
