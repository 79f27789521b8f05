//! The prover tool's configuration aspect.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::{resolve_curve_type, resolve_input_path, resolve_log_level, PathAspect};
use crate::artifact::CurveType;
use crate::config::{
    Aspect, InitializeAspect, MergedValues, OptionDescriptor, OptionSchema, OptionValue,
    SchemaResult,
};
use crate::tracing::LogLevel;

/// Configuration of the proof-generator front-end.
///
/// Constructed once at startup with the shared [`PathAspect`], then
/// populated by `initialize` after the merged configuration exists.
/// The circuit and assignment-table paths stay `None` when their
/// validation soft-fails; callers must check before use. The proof
/// path is always set after `initialize` (derived default).
pub struct ProverAspect {
    path_aspect: Arc<PathAspect>,
    /// Runtime toggle for the multi-threaded variant: gates the
    /// `--shard0-mem-scale` option.
    multi_threaded: bool,

    circuit_file_path: Option<PathBuf>,
    assignment_table_file_path: Option<PathBuf>,
    proof_file_path: Option<PathBuf>,
    curve_type: CurveType,
    log_level: LogLevel,
    skip_verification: bool,
    shard0_mem_scale: Option<i64>,
}

impl ProverAspect {
    pub fn new(path_aspect: Arc<PathAspect>, multi_threaded: bool) -> Self {
        Self {
            path_aspect,
            multi_threaded,
            circuit_file_path: None,
            assignment_table_file_path: None,
            proof_file_path: None,
            curve_type: CurveType::default(),
            log_level: LogLevel::default(),
            skip_verification: false,
            shard0_mem_scale: None,
        }
    }

    pub fn input_circuit_file_path(&self) -> Option<&Path> {
        self.circuit_file_path.as_deref()
    }

    pub fn input_assignment_file_path(&self) -> Option<&Path> {
        self.assignment_table_file_path.as_deref()
    }

    pub fn output_proof_file_path(&self) -> Option<&Path> {
        self.proof_file_path.as_deref()
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn is_skip_verification_mode_on(&self) -> bool {
        self.skip_verification
    }

    /// Shard #0 memory scale hint; only ever set when the
    /// multi-threaded capability is on. Passed through opaquely to the
    /// engine.
    pub fn shard0_mem_scale(&self) -> Option<i64> {
        self.shard0_mem_scale
    }
}

impl Aspect for ProverAspect {
    fn cli_options(&self, cli: &mut OptionSchema) -> SchemaResult<()> {
        cli.push(OptionDescriptor::flag("version", "Display version").with_short('v'))?;
        cli.push(OptionDescriptor::string("proof", "Output proof file"))?;
        cli.push(OptionDescriptor::string("circuit", "Circuit input file").with_short('c'))?;
        cli.push(
            OptionDescriptor::string("assignment-table", "Assignment table input file")
                .with_short('t'),
        )?;
        cli.push(
            OptionDescriptor::string(
                "log-level",
                "Log level (trace, debug, info, warning, error, fatal)",
            )
            .with_short('l')
            .with_default(OptionValue::Str("info".to_string())),
        )?;
        if self.multi_threaded {
            cli.push(OptionDescriptor::int(
                "shard0-mem-scale",
                "If set allocates this many times more memory for shard #0 compared to other shards.",
            ))?;
        }
        cli.push(OptionDescriptor::flag(
            "skip-verification",
            "If set - skips verifying step of the generated proof",
        ))?;
        cli.push(
            OptionDescriptor::string(
                "elliptic-curve-type",
                "Native elliptic curve type (pallas, vesta, ed25519, bls12381), default: pallas",
            )
            .with_short('e')
            .with_default(OptionValue::Str("pallas".to_string())),
        )?;
        Ok(())
    }

    fn cfg_options(&self, _cfg: &mut OptionSchema) -> SchemaResult<()> {
        Ok(())
    }
}

impl InitializeAspect for ProverAspect {
    fn initialize(&mut self, merged: &MergedValues) {
        // Prints and then carries on with the rest of initialization.
        // Historical behavior; confirm with the maintainers before
        // changing it to print-and-exit.
        if merged.is_set("version") {
            println!("{}", crate::version());
        }

        self.log_level = resolve_log_level(merged, self.log_level);

        self.circuit_file_path = resolve_input_path(merged, "circuit", "circuit");
        self.assignment_table_file_path =
            resolve_input_path(merged, "assignment-table", "assignment table");

        self.proof_file_path = match merged.get_str("proof") {
            Some(raw) => Some(PathBuf::from(raw)),
            None => {
                let derived = self.path_aspect.current_path().join("proof.bin");
                debug!(
                    "proof file path not specified, using default: {}",
                    derived.display()
                );
                Some(derived)
            }
        };

        self.skip_verification = merged.is_set("skip-verification");

        if self.multi_threaded {
            self.shard0_mem_scale = merged.get_int("shard0-mem-scale");
        }

        self.curve_type = resolve_curve_type(merged, self.curve_type);
    }
}
