//! The path aspect: base directories the other aspects derive default
//! locations from.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::config::{Aspect, OptionSchema, SchemaResult};

/// Base-directory provider shared (via `Arc`) by the prover and
/// verifier aspects. Its state is fixed at construction, so it only
/// contributes to the schemas (nothing, currently) and needs no
/// `initialize` step.
#[derive(Debug, Clone)]
pub struct PathAspect {
    current_path: PathBuf,
    config_path: PathBuf,
}

impl PathAspect {
    pub fn new() -> Result<Self> {
        let current_path = std::env::current_dir()
            .context("cannot determine the current working directory")?;
        // Headless environments may have no home directory; fall back
        // to the working directory for config lookup.
        let config_path = ProjectDirs::from("", "", "proof_producer")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| current_path.clone());
        Ok(Self {
            current_path,
            config_path,
        })
    }

    /// The working directory default outputs are derived from.
    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// The per-user configuration directory.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Location of the optional ini config file.
    pub fn default_config_file(&self) -> PathBuf {
        self.config_path.join("config.ini")
    }
}

impl Aspect for PathAspect {
    fn cli_options(&self, _cli: &mut OptionSchema) -> SchemaResult<()> {
        Ok(())
    }

    fn cfg_options(&self, _cfg: &mut OptionSchema) -> SchemaResult<()> {
        Ok(())
    }
}
