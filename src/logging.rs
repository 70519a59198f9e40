use std::env;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE_PATH: &str = "./logs/image-stash.log";
const DEFAULT_CONSOLE_FILTER: &str = "info";
// Per-download debug lines go to the file; HTTP and pool chatter from
// dependencies stays at warn.
const DEFAULT_FILE_FILTER: &str = "warn,image_stash=debug";

/// Log to stdout and to a file, each with its own filter. Keep the returned
/// guard alive for the whole run or buffered file output is lost.
pub fn init_logger() -> impl Drop {
    let console_filter = filter_from_env("TRACING_LEVEL", DEFAULT_CONSOLE_FILTER);
    let file_filter = filter_from_env("LOG_FILE_LEVEL", DEFAULT_FILE_FILTER);

    let log_file_path =
        env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());

    let file_appender = tracing_appender::rolling::never("./", &log_file_path);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_target(false)
                .without_time()
                .with_ansi(true)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .init();

    debug!("Logging to stdout and {}", log_file_path);

    guard
}

/// Directives from `var`, falling back to `default` when unset or unparsable.
fn filter_from_env(var: &str, default: &str) -> EnvFilter {
    let directives = env::var(var).unwrap_or_else(|_| default.to_string());
    parse_filter(&directives).unwrap_or_else(|| EnvFilter::new(default))
}

fn parse_filter(directives: &str) -> Option<EnvFilter> {
    EnvFilter::try_new(directives).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        assert!(parse_filter(DEFAULT_CONSOLE_FILTER).is_some());
        assert!(parse_filter(DEFAULT_FILE_FILTER).is_some());
    }
}
