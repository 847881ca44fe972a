//! Process-wide `tracing` subscriber for the launch service.
//!
//! The output format comes from `server.log_format`; verbosity comes from
//! `RUST_LOG` and falls back to [`DEFAULT_DIRECTIVES`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;

/// Directives used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "info";

/// Install the global subscriber in the given format.
///
/// Must be called at most once per process, before the first event is
/// recorded.
///
/// ```no_run
/// use launchpad_core::{config::LogFormat, logging};
///
/// logging::init(LogFormat::Json);
/// tracing::info!(port = 8000, "launch api listening");
/// ```
pub fn init(format: LogFormat) {
    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(fmt::layer().with_target(true)), None),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_current_span(false).with_target(true)),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with(pretty)
        .with(json)
        .init();
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_falls_back_to_info() {
        assert_eq!(env_filter(None).to_string(), DEFAULT_DIRECTIVES);
        assert_eq!(
            env_filter(Some("launchpad_launches=loud")).to_string(),
            DEFAULT_DIRECTIVES
        );
    }

    #[test]
    fn test_env_filter_keeps_directives() {
        let filter = env_filter(Some("launchpad_launches=debug"));
        assert_eq!(filter.to_string(), "launchpad_launches=debug");
    }
}
