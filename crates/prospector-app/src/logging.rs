//! Log filter selection for the binary.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Directives to use: `--log` first, then `RUST_LOG`, then [`DEFAULT_LOG_FILTER`].
/// Blank values count as unset.
pub fn select_directives<'a>(cli: Option<&'a str>, env: Option<&'a str>) -> &'a str {
    cli.filter(|d| !d.trim().is_empty())
        .or_else(|| env.filter(|d| !d.trim().is_empty()))
        .unwrap_or(DEFAULT_LOG_FILTER)
}

/// Build the subscriber filter, falling back to the default on bad directives.
pub fn env_filter(cli: Option<&str>) -> EnvFilter {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = select_directives(cli, env.as_deref());
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flag_wins_over_env() {
        assert_eq!(
            select_directives(Some("prospector_engine=debug"), Some("warn")),
            "prospector_engine=debug"
        );
    }

    #[test]
    fn test_env_used_without_flag() {
        assert_eq!(select_directives(None, Some("debug")), "debug");
        assert_eq!(select_directives(Some("  "), Some("debug")), "debug");
    }

    #[test]
    fn test_default_when_nothing_set() {
        assert_eq!(select_directives(None, None), DEFAULT_LOG_FILTER);
        assert_eq!(select_directives(None, Some("")), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_flag_directives_parsed() {
        assert_eq!(
            env_filter(Some("prospector_engine=debug")).to_string(),
            "prospector_engine=debug"
        );
    }
}
