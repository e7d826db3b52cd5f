//! Bootstrap utilities for the murmur binary.

use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LOG_ENV_VAR;

/// Initialize tracing with the MURMUR_LOG environment variable.
///
/// Defaults to "info" level if MURMUR_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Config file path from `--config <path>`, `--config=<path>` or a lone
/// positional argument.
pub fn parse_config_path() -> Option<String> {
    config_path_from(std::env::args().skip(1))
}

fn config_path_from(mut args: impl Iterator<Item = String>) -> Option<String> {
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next();
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
        if !arg.starts_with('-') {
            return Some(arg);
        }
    }
    None
}

/// Shutdown signal raised on Ctrl-C.
///
/// Every request context and the HTTP server watch the returned receiver.
pub fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C, shutting down"),
        }
        let _ = tx.send(true);
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_config_path_forms() {
        assert_eq!(config_path_from(args(&[])), None);
        assert_eq!(
            config_path_from(args(&["--config", "a.yaml"])),
            Some("a.yaml".to_string())
        );
        assert_eq!(
            config_path_from(args(&["--config=b.yaml"])),
            Some("b.yaml".to_string())
        );
        assert_eq!(config_path_from(args(&["c.yaml"])), Some("c.yaml".to_string()));
        assert_eq!(config_path_from(args(&["--verbose"])), None);
    }
}
