use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use surfsup_core::{find_config_file, load_config, ConfigSource, DEFAULT_DATABASE, DEFAULT_PORT};
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::{db::parse_iso_date, ReportOptions};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "SurfsUp - read-only climate API over the Hawaii observation database"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $SURFSUP_CONFIG, ./surfsup.toml,
    /// $XDG_CONFIG_HOME/surfsup/surfsup.toml, /etc/surfsup/surfsup.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "SURFSUP_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(long, env = "SURFSUP_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SURFSUP_PORT")]
    pub port: Option<String>,

    /// SQLite file holding the `measurement` and `station` tables, opened read-only
    #[arg(short, long, env = "SURFSUP_DATABASE")]
    #[serde(alias = "database_path")]
    pub database: Option<String>,

    /// Pin the tobs report to this station instead of the most active one
    /// (the legacy report used USC00519281)
    #[arg(long, env = "SURFSUP_TOBS_STATION")]
    pub tobs_station: Option<String>,

    /// Pin the precipitation report's upper bound, YYYY-MM-DD
    /// (the legacy report used 2017-08-23)
    #[arg(long, env = "SURFSUP_PRECIPITATION_UNTIL")]
    pub precipitation_until: Option<String>,
}

impl Cli {
    pub fn host(&self) -> String {
        self.host.clone().unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> String {
        self.port
            .clone()
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
    }

    pub fn database(&self) -> String {
        self.database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
    }

    pub fn report_options(&self) -> anyhow::Result<ReportOptions> {
        let precipitation_until = self
            .precipitation_until
            .as_deref()
            .map(parse_iso_date)
            .transpose()
            .map_err(|e| anyhow::anyhow!("invalid precipitation_until: {}", e))?;

        Ok(ReportOptions {
            tobs_station: self.tobs_station.clone(),
            precipitation_until,
        })
    }

    /// Values set here win over `fallback`.
    fn merge(self, fallback: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(fallback.level),
            host: self.host.or(fallback.host),
            port: self.port.or(fallback.port),
            database: self.database.or(fallback.database),
            tobs_station: self.tobs_station.or(fallback.tobs_station),
            precipitation_until: self.precipitation_until.or(fallback.precipitation_until),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> Cli {
    let cli_args = Cli::parse();

    let source = match cli_args.config {
        Some(ref path) => ConfigSource::Explicit(path.into()),
        None => find_config_file("SURFSUP_CONFIG", "surfsup.toml"),
    };

    // logger isn't installed yet, so this goes straight to stderr
    if source.path().is_some() {
        eprintln!("Loading config from: {}", source);
    }

    let file_config: Cli = load_config(&source).unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config {}: {}", source, e);
        Cli::default()
    });

    // env vars are already folded into cli_args by clap
    cli_args.merge(file_config)
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = OffsetDateTime::now_utc()
                .format(&Iso8601::DEFAULT)
                .unwrap_or_default();
            out.finish(format_args!(
                "[{} {}] {}: {}",
                timestamp,
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
