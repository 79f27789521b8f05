//! Front-end library for the proof generation and verification tools.
//!
//! The crate is split along the two concerns the binaries share: the
//! layered configuration framework ([`config`] plus the concrete
//! [`aspects`]) and the binary proof artifact format ([`artifact`]).
//! The proving engine itself is reached through the [`engine`]
//! boundary and is not part of this crate.

pub mod artifact;
pub mod aspects;
pub mod config;
pub mod engine;
pub mod tracing;

#[cfg(test)]
pub(crate) mod testing_utils;

/// Common information for the `--version` CLI flags.
///
/// The version string is stamped at build time through the
/// `PROOF_PRODUCER_VERSION` environment variable; unstamped builds
/// report `undefined`.
pub fn version() -> String {
    option_env!("PROOF_PRODUCER_VERSION")
        .unwrap_or("undefined")
        .to_string()
}
