//! Tracing subscriber setup.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log events are written.
#[derive(Debug, Clone)]
pub(crate) enum LogTarget {
    /// Standard error, for one-shot commands
    Stderr,
    /// Append to a file, for the full-screen dashboard
    File(PathBuf),
}

impl LogTarget {
    /// `<cache_dir>/ff5/ff5.log`, or stderr when there is no cache directory.
    pub(crate) fn dashboard() -> Self {
        dirs::cache_dir()
            .map(|dir| Self::File(dir.join("ff5").join("ff5.log")))
            .unwrap_or(Self::Stderr)
    }
}

/// Level used when `RUST_LOG` is not set.
///
/// Commands are quiet by default; the dashboard log file records `info`.
pub(crate) const fn default_level(verbose: u8, target: &LogTarget) -> &'static str {
    let base = match target {
        LogTarget::Stderr => 0_u8,
        LogTarget::File(_) => 1,
    };
    match verbose.saturating_add(base) {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
pub(crate) fn init(verbose: u8, target: LogTarget) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, &target)));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
            tracing::info!(path = %path.display(), "logging to file");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "warn")]
    #[case(1, "info")]
    #[case(2, "debug")]
    #[case(5, "trace")]
    fn test_stderr_levels(#[case] verbose: u8, #[case] expected: &str) {
        assert_eq!(default_level(verbose, &LogTarget::Stderr), expected);
    }

    #[test]
    fn test_file_logs_info_by_default() {
        let target = LogTarget::File(PathBuf::from("ff5.log"));
        assert_eq!(default_level(0, &target), "info");
        assert_eq!(default_level(1, &target), "debug");
    }
}
