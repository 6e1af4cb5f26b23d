//! Logging setup for host applications.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::config::default_log_filter;

static ACTIVE_FILTER: OnceLock<String> = OnceLock::new();

/// Pick the filter directive: `env` when it parses, then `configured`, then
/// the built-in default.
pub fn effective_filter(env: Option<&str>, configured: &str) -> String {
    fn parses(directive: &&str) -> bool {
        EnvFilter::try_new(directive).is_ok()
    }
    env.filter(parses)
        .or_else(|| Some(configured).filter(parses))
        .unwrap_or(default_log_filter())
        .to_string()
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `configured` is used. Returns
/// `false` if a subscriber was already installed.
pub fn init_logging(configured: &str) -> bool {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = effective_filter(env.as_deref(), configured);

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .try_init()
        .is_ok();

    if installed {
        let _ = ACTIVE_FILTER.set(filter.clone());
        tracing::info!(
            filter = %filter,
            "{} starting v{}",
            crate::config::APP_NAME,
            crate::config::APP_VERSION
        );
    }
    installed
}

/// Filter of the subscriber installed by [`init_logging`], if any.
pub fn active_filter() -> Option<&'static str> {
    ACTIVE_FILTER.get().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_noop() {
        init_logging("dentasys_core=debug");
        assert!(!init_logging("dentasys_core=debug"));
        assert!(active_filter().is_some());
    }

    #[test]
    fn env_overrides_configured() {
        assert_eq!(
            effective_filter(Some("dentasys_core=trace"), "dentasys_core=warn"),
            "dentasys_core=trace"
        );
        assert_eq!(effective_filter(None, "dentasys_core=warn"), "dentasys_core=warn");
    }

    #[test]
    fn invalid_directives_fall_back() {
        assert_eq!(
            effective_filter(Some("dentasys_core=loud"), "dentasys_core=warn"),
            "dentasys_core=warn"
        );
        assert_eq!(effective_filter(None, "dentasys_core=loud"), default_log_filter());
    }
}
