//! The verifier tool's configuration aspect.

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

/// Configuration of the proof-verifier front-end. Same model as the
/// prover aspect, minus the generation-only knobs; `--proof` names the
/// *input* artifact here, with the same `<cwd>/proof.bin` default.
pub struct VerifierAspect {
    path_aspect: Arc<PathAspect>,

    circuit_file_path: Option<PathBuf>,
    assignment_table_file_path: Option<PathBuf>,
    proof_file_path: Option<PathBuf>,
    curve_type: CurveType,
    log_level: LogLevel,
}

impl VerifierAspect {
    pub fn new(path_aspect: Arc<PathAspect>) -> Self {
        Self {
            path_aspect,
            circuit_file_path: None,
            assignment_table_file_path: None,
            proof_file_path: None,
            curve_type: CurveType::default(),
            log_level: LogLevel::default(),
        }
    }

    pub fn input_circuit_file_path(&self) -> Option<&Path> {
        self.circuit_file_path.as_deref()
    }

    pub fn input_assignment_file_path(&self) -> Option<&Path> {
        self.assignment_table_file_path.as_deref()
    }

    pub fn input_proof_file_path(&self) -> Option<&Path> {
        self.proof_file_path.as_deref()
    }

    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }
}

impl Aspect for VerifierAspect {
    fn cli_options(&self, cli: &mut OptionSchema) -> SchemaResult<()> {
        cli.push(OptionDescriptor::flag("version", "Display version").with_short('v'))?;
        cli.push(OptionDescriptor::string("proof", "Input proof file"))?;
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

impl InitializeAspect for VerifierAspect {
    fn initialize(&mut self, merged: &MergedValues) {
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

        self.curve_type = resolve_curve_type(merged, self.curve_type);
    }
}
