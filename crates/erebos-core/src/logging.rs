//! Process-wide logging configuration.
//!
//! The log level is decided once, before any other component runs, and is
//! read-only afterwards.

use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Log everything down to trace level.
    pub verbose: bool,
    /// Ignore `RUST_LOG` and log at info (or trace when verbose).
    pub ignore_env: bool,
}

impl LogConfig {
    /// Filter directives for this configuration.
    ///
    /// Verbose mode always logs at trace level. Otherwise `env_override`
    /// (usually `RUST_LOG`) is used when present and not ignored, falling
    /// back to info.
    pub fn filter_directives(&self, env_override: Option<&str>) -> String {
        if self.verbose {
            return LevelFilter::TRACE.to_string();
        }
        if self.ignore_env {
            return LevelFilter::INFO.to_string();
        }
        match env_override {
            Some(directives) if !directives.trim().is_empty() => directives.to_string(),
            _ => LevelFilter::INFO.to_string(),
        }
    }
}

static ACTIVE: OnceLock<LogConfig> = OnceLock::new();

/// Install the global subscriber.
///
/// Only the first call has an effect; it returns the configuration that is
/// actually in force.
pub fn init_logging(config: LogConfig) -> LogConfig {
    *ACTIVE.get_or_init(|| {
        let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = build_filter(config, env.as_deref());

        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

        tracing::debug!("Logging initialized (verbose: {})", config.verbose);
        config
    })
}

/// Parse the directives for `config`, falling back to info when they are
/// malformed.
fn build_filter(config: LogConfig, env_override: Option<&str>) -> EnvFilter {
    EnvFilter::try_new(config.filter_directives(env_override))
        .unwrap_or_else(|_| EnvFilter::new(LevelFilter::INFO.to_string()))
}

/// The configuration installed by [`init_logging`], if any.
pub fn active_config() -> Option<LogConfig> {
    ACTIVE.get().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_means_trace() {
        let config = LogConfig {
            verbose: true,
            ..LogConfig::default()
        };
        assert_eq!(config.filter_directives(None), "trace");
        assert_eq!(config.filter_directives(Some("warn")), "trace");
    }

    #[test]
    fn default_is_info_unless_overridden() {
        let config = LogConfig::default();
        assert_eq!(config.filter_directives(None), "info");
        assert_eq!(config.filter_directives(Some("  ")), "info");
        assert_eq!(
            config.filter_directives(Some("erebos_gpu=debug")),
            "erebos_gpu=debug"
        );
    }

    #[test]
    fn ignored_env_cannot_hide_info() {
        let config = LogConfig {
            verbose: false,
            ignore_env: true,
        };
        for restrictive in ["warn", "error", "off", "erebos_editor=error"] {
            assert_eq!(config.filter_directives(Some(restrictive)), "info");
            let filter = build_filter(config, Some(restrictive));
            assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        }

        let verbose = LogConfig {
            verbose: true,
            ignore_env: true,
        };
        assert_eq!(
            build_filter(verbose, Some("off")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn restrictive_env_applies_when_honored() {
        let filter = build_filter(LogConfig::default(), Some("warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn first_initialization_wins() {
        let first = init_logging(LogConfig {
            verbose: true,
            ..LogConfig::default()
        });
        let second = init_logging(LogConfig::default());
        assert_eq!(first, second);
        assert_eq!(active_config(), Some(first));
    }
}
