//! Shared helpers for the unit tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_TEMP_ID: AtomicUsize = AtomicUsize::new(0);

/// A unique path under the system temp dir. Nothing is created.
pub(crate) fn temp_path(tag: &str) -> PathBuf {
    let id = NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "proof_producer_{}_{}_{}",
        std::process::id(),
        id,
        tag
    ))
}

/// Writes `contents` to a unique temp file and returns its path.
pub(crate) fn write_temp_file(tag: &str, contents: &[u8]) -> PathBuf {
    let path = temp_path(tag);
    std::fs::write(&path, contents).unwrap();
    path
}
