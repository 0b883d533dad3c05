//! CLI module for urlmon
//!
//! Command-line / environment parsing. Produces an [`AppConfig`].

use crate::config::{AppConfig, MonitorConfig, ServerConfig, ShutdownConfig};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// urlmon - periodically checks a set of URLs and exports their state as metrics
#[derive(Parser, Debug, Clone)]
#[command(name = "urlmon")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENDPOINTS:
    /live       Always 200 while the process is alive
    /ready      200 when ready, 500 while shutting down
    /metrics    Prometheus metrics

ENVIRONMENT VARIABLES:
    URLMON_LOG_LEVEL        Log filter (default: info)
"#)]
pub struct Cli {
    /// Address on which to listen
    #[arg(
        short,
        long,
        default_value = "0.0.0.0:8080",
        env = "URLMON_LISTEN_ADDR",
        value_parser = parse_listen_addr
    )]
    pub listen_addr: SocketAddr,

    /// List of urls to check
    #[arg(
        short,
        long,
        required = true,
        value_delimiter = ',',
        env = "URLMON_URLS"
    )]
    pub urls: Vec<String>,

    /// How often to perform checks
    #[arg(
        short = 'p',
        long,
        default_value = "5s",
        env = "URLMON_CHECK_PERIOD",
        value_parser = humantime::parse_duration
    )]
    pub check_period: Duration,

    /// How many checks can be performed concurrently
    #[arg(short, long, default_value_t = 2, env = "URLMON_WORKERS")]
    pub workers: usize,

    /// Timeout of a single check request
    #[arg(
        long,
        default_value = "5s",
        env = "URLMON_CHECK_TIMEOUT",
        value_parser = humantime::parse_duration
    )]
    pub check_timeout: Duration,

    /// Time allowed for existing connections to close when shutting down
    #[arg(
        long,
        default_value = "1s",
        env = "URLMON_SHUTDOWN_DURATION",
        value_parser = humantime::parse_duration
    )]
    pub shutdown_duration: Duration,

    /// Fail readiness check for this long before actually shutting down
    #[arg(
        long,
        default_value = "1s",
        env = "URLMON_SHUTDOWN_READY_FAIL_DURATION",
        value_parser = humantime::parse_duration
    )]
    pub shutdown_ready_fail_duration: Duration,
}

impl Cli {
    /// Convert parsed arguments into the application configuration
    pub fn into_config(self) -> AppConfig {
        AppConfig {
            monitor: MonitorConfig::new()
                .with_urls(self.urls)
                .with_check_period(self.check_period)
                .with_workers(self.workers),
            server: ServerConfig {
                listen_addr: self.listen_addr,
                shutdown_duration: self.shutdown_duration,
            },
            shutdown: ShutdownConfig {
                ready_fail_duration: self.shutdown_ready_fail_duration,
            },
            check_timeout: self.check_timeout,
        }
    }
}

/// `:8080` のようにホストを省略した指定は全インターフェースとして扱う
fn parse_listen_addr(value: &str) -> Result<SocketAddr, String> {
    let value = value.trim();
    let normalized = if value.starts_with(':') {
        format!("0.0.0.0{}", value)
    } else {
        value.to_string()
    };
    normalized
        .parse()
        .map_err(|e| format!("invalid listen address '{}': {}", value, e))
}
