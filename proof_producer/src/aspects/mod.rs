//! Concrete configuration aspects of the proof tools.

pub mod path;
pub mod prover;
pub mod verifier;

pub use path::PathAspect;
pub use prover::ProverAspect;
pub use verifier::VerifierAspect;

use std::path::{Path, PathBuf};

use tracing::error;

use crate::artifact::CurveType;
use crate::config::MergedValues;
use crate::tracing::LogLevel;

/// Linux `PATH_MAX`.
const PATH_MAX: usize = 4096;
/// stdio `FILENAME_MAX`.
const FILENAME_MAX: usize = 4096;

/// Path arguments are bounded by the stricter of the two platform
/// limits.
const fn max_path_len() -> usize {
    if PATH_MAX < FILENAME_MAX {
        PATH_MAX
    } else {
        FILENAME_MAX
    }
}

/// Resolves an input file option: the value must be present, within
/// the platform length limit, and name an existing file. Every
/// failure is soft: an error is logged and the field stays unset so
/// one run reports all configuration problems.
fn resolve_input_path(merged: &MergedValues, name: &str, what: &str) -> Option<PathBuf> {
    let Some(raw) = merged.get_str(name) else {
        error!("{what} file path not specified (--{name})");
        return None;
    };
    if raw.len() >= max_path_len() {
        error!("{what} file path is too long");
        return None;
    }
    let path = Path::new(raw);
    if !path.exists() {
        error!("{what} file {raw} does not exist");
        return None;
    }
    Some(path.to_path_buf())
}

/// Resolves `--log-level`, keeping `current` when the value is
/// unrecognized (the active severity filter stays as it was).
fn resolve_log_level(merged: &MergedValues, current: LogLevel) -> LogLevel {
    match merged.get_str("log-level") {
        Some(raw) => match raw.parse::<LogLevel>() {
            Ok(level) => level,
            Err(()) => {
                error!("invalid command line argument -l (log level): {raw}");
                current
            }
        },
        None => current,
    }
}

/// Resolves `--elliptic-curve-type`, keeping `current` when the value
/// is unrecognized. Never raises: an invalid curve name is a logged
/// diagnostic like every other configuration field.
fn resolve_curve_type(merged: &MergedValues, current: CurveType) -> CurveType {
    match merged.get_str("elliptic-curve-type") {
        Some(raw) => match raw.parse::<CurveType>() {
            Ok(curve) => curve,
            Err(()) => {
                error!("invalid command line argument -e (native elliptic curve type): {raw}");
                current
            }
        },
        None => {
            tracing::debug!("elliptic curve type not specified, using default: {current}");
            current
        }
    }
}
