use std::fmt;
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{prelude::*, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Severity filter levels accepted by the `--log-level` option.
///
/// `fatal` is kept for compatibility with the option's historical
/// vocabulary; `tracing` has no severity above `error`, so both map to
/// the same filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    /// The `tracing` filter directive this level translates to.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Fatal => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// Handle used to re-point the severity filter once configuration
/// resolution has produced the requested log level.
pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Installs the global subscriber with an `info` default (overridable
/// through `RUST_LOG`) and returns the reload handle for
/// [`apply_level`].
pub fn init() -> FilterHandle {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let (filter, handle) = reload::Layer::new(filter);
    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(false))
        .init();
    handle
}

/// Re-points the active severity filter to `level`. Reload failures
/// (subscriber already torn down) are ignored.
pub fn apply_level(handle: &FilterHandle, level: LogLevel) {
    let _ = handle.reload(EnvFilter::new(level.as_directive()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_documented_levels_parse() {
        for (s, expected) in [
            ("trace", LogLevel::Trace),
            ("debug", LogLevel::Debug),
            ("info", LogLevel::Info),
            ("warning", LogLevel::Warning),
            ("error", LogLevel::Error),
            ("fatal", LogLevel::Fatal),
        ] {
            assert_eq!(s.parse::<LogLevel>(), Ok(expected));
            assert_eq!(expected.to_string(), s);
        }
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!("verbose".parse::<LogLevel>().is_err());
        assert!("INFO".parse::<LogLevel>().is_err());
    }

    #[test]
    fn fatal_shares_the_error_directive() {
        assert_eq!(LogLevel::Fatal.as_directive(), "error");
        assert_eq!(LogLevel::Warning.as_directive(), "warn");
    }
}
