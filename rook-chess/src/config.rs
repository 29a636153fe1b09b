//! Command line and environment configuration.

use std::path::PathBuf;

use clap::Parser;
use rook::router::history::normalize_base;

/// Base URL baked in at build time (`BASE_URL`), `/` when unset.
pub const DEFAULT_BASE_URL: &str = match option_env!("BASE_URL") {
    Some(base) => base,
    None => "/",
};

#[derive(Debug, Clone, Parser)]
#[command(name = "rook-chess")]
#[command(about = "Terminal chess board with client-side routing", long_about = None)]
pub struct Cli {
    /// Prefix every route is mounted under
    #[arg(long, env = "ROOK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Browser URL to open at, defaults to the base
    #[arg(long, env = "ROOK_URL")]
    pub url: Option<String>,

    /// Write logs to this file (the terminal belongs to the UI)
    #[arg(long, env = "ROOK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Resolved startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub start_url: String,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Parse the process arguments and environment.
    pub fn load() -> Self {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Self {
        let start_url = cli
            .url
            .unwrap_or_else(|| format!("{}/", normalize_base(&cli.base_url)));
        Self {
            base_url: cli.base_url,
            start_url,
            log_file: cli.log_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_url_defaults_to_base() {
        let cli = Cli::try_parse_from(["rook-chess", "--base-url", "/app"]).unwrap();
        let config = AppConfig::from_cli(cli);
        assert_eq!(config.base_url, "/app");
        assert_eq!(config.start_url, "/app/");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_explicit_url_wins() {
        let cli = Cli::try_parse_from([
            "rook-chess",
            "--base-url",
            "/app/",
            "--url",
            "/app/missing",
            "--log-file",
            "rook.log",
        ])
        .unwrap();
        let config = AppConfig::from_cli(cli);
        assert_eq!(config.start_url, "/app/missing");
        assert_eq!(config.log_file, Some(PathBuf::from("rook.log")));
    }

    #[test]
    fn test_root_base() {
        let cli = Cli::try_parse_from(["rook-chess", "--base-url", "/"]).unwrap();
        assert_eq!(AppConfig::from_cli(cli).start_url, "/");
    }
}
