//! Foreground periodic rebuilds.
//!
//! Runs a full build on a fixed interval until SIGINT or SIGTERM.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tokio::time::interval;

use crate::app::AppContext;
use crate::cli::commands::run_build;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Build interval in seconds (default: 21600 = 6 hours)
    pub build_interval_secs: u64,
    /// Whether to build immediately on start
    pub build_on_start: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            build_interval_secs: 6 * 3600,
            build_on_start: true,
        }
    }
}

impl DaemonConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> Result<u64, String> {
        let s = s.trim().to_lowercase();

        let (digits, unit) = match s.char_indices().last() {
            Some((i, c)) if c.is_ascii_alphabetic() => (&s[..i], Some(c)),
            _ => (s.as_str(), None),
        };

        let multiplier = match unit {
            None | Some('s') => 1,
            Some('m') => 60,
            Some('h') => 3600,
            Some('d') => 86400,
            Some(_) => {
                return Err(format!(
                    "Invalid interval: {}. Use format like '1h', '30m', '1d'",
                    s
                ))
            }
        };

        match digits.parse::<u64>() {
            Ok(0) => Err("Interval must be greater than zero".to_string()),
            Ok(n) => n
                .checked_mul(multiplier)
                .ok_or_else(|| format!("Interval too large: {}", s)),
            Err(_) => Err(format!(
                "Invalid interval: {}. Use format like '1h', '30m', '1d'",
                s
            )),
        }
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Daemon runner
pub struct Daemon {
    ctx: Arc<AppContext>,
    config: DaemonConfig,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl Daemon {
    pub fn new(ctx: Arc<AppContext>, config: DaemonConfig) -> Self {
        Self {
            ctx,
            config,
            running: Arc::new(AtomicBool::new(true)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Run the daemon
    pub async fn run(&self) -> crate::app::Result<()> {
        self.spawn_signal_handler()?;

        tracing::info!(
            interval = %DaemonConfig::format_interval(self.config.build_interval_secs),
            categories = self.ctx.categories.len(),
            output = %self.ctx.writer.dir().display(),
            "estuary daemon started"
        );

        if self.config.build_on_start {
            self.run_build().await;
        }

        let mut timer = interval(Duration::from_secs(self.config.build_interval_secs));
        timer.tick().await; // Skip the first immediate tick

        while self.running.load(Ordering::SeqCst) {
            tokio::select! {
                _ = timer.tick() => {}
                _ = self.shutdown.notified() => break,
            }

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            self.run_build().await;
        }

        tracing::info!("daemon shutting down");
        Ok(())
    }

    fn spawn_signal_handler(&self) -> crate::app::Result<()> {
        let running = self.running.clone();
        let shutdown = self.shutdown.clone();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;

            tokio::spawn(async move {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
                running.store(false, Ordering::SeqCst);
                shutdown.notify_one();
            });
        }

        #[cfg(not(unix))]
        {
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                running.store(false, Ordering::SeqCst);
                shutdown.notify_one();
            });
        }

        Ok(())
    }

    /// Run a single build cycle
    async fn run_build(&self) {
        let start = Utc::now();

        match run_build(&self.ctx, &[]).await {
            Ok(results) => {
                let items: usize = results.iter().map(|r| r.build.artifact.len()).sum();
                let failed_sources: usize =
                    results.iter().map(|r| r.build.failed_sources()).sum();
                let write_errors = results.iter().filter(|r| r.written.is_err()).count();

                let elapsed = Utc::now().signed_duration_since(start);
                tracing::info!(
                    categories = results.len(),
                    items,
                    failed_sources,
                    write_errors,
                    elapsed_ms = elapsed.num_milliseconds(),
                    "scheduled build complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "scheduled build failed");
            }
        }
    }

    /// Stop the daemon (called externally)
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(DaemonConfig::parse_interval("1h").unwrap(), 3600);
        assert_eq!(DaemonConfig::parse_interval("30m").unwrap(), 1800);
        assert_eq!(DaemonConfig::parse_interval("1d").unwrap(), 86400);
        assert_eq!(DaemonConfig::parse_interval("60s").unwrap(), 60);
        assert_eq!(DaemonConfig::parse_interval("3600").unwrap(), 3600);
        assert_eq!(DaemonConfig::parse_interval(" 6H ").unwrap(), 21600);
        assert!(DaemonConfig::parse_interval("invalid").is_err());
        assert!(DaemonConfig::parse_interval("5w").is_err());
        assert!(DaemonConfig::parse_interval("0h").is_err());
        assert!(DaemonConfig::parse_interval("").is_err());
        assert!(DaemonConfig::parse_interval("300000000000000d").is_err());
        assert!(DaemonConfig::parse_interval("18446744073709551615m").is_err());
    }

    fn feed_only_context(output: &std::path::Path) -> Arc<AppContext> {
        use crate::app::error::Result;
        use crate::config::Config;
        use crate::fetcher::Fetcher;

        struct Offline;

        #[async_trait::async_trait]
        impl Fetcher for Offline {
            async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
                Err(crate::app::EstuaryError::Other("offline".into()))
            }
        }

        let config = Config::parse(
            "[[categories]]\nname = \"club\"\nsources = [{ channel = \"UCclub\" }]\n",
        )
        .unwrap();
        Arc::new(
            AppContext::with_fetcher(config, Arc::new(Offline), None, Some(output.to_path_buf()))
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_stop_ends_run_without_a_build() {
        let dir = tempfile::tempdir().unwrap();
        let daemon = Daemon::new(
            feed_only_context(dir.path()),
            DaemonConfig {
                build_interval_secs: 3600,
                build_on_start: false,
            },
        );

        daemon.stop();
        let finished = tokio::time::timeout(Duration::from_secs(5), daemon.run()).await;

        assert!(matches!(finished, Ok(Ok(()))));
        assert!(!daemon.ctx.writer.path_for("club").exists());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(DaemonConfig::format_interval(3600), "1h");
        assert_eq!(DaemonConfig::format_interval(1800), "30m");
        assert_eq!(DaemonConfig::format_interval(86400), "1d");
        assert_eq!(DaemonConfig::format_interval(90), "90s");
        assert_eq!(DaemonConfig::format_interval(21600), "6h");
    }
}
