use std::fs;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use proof_producer::artifact::{codec, Endianness, SchemeParams};
use proof_producer::aspects::{PathAspect, VerifierAspect};
use proof_producer::config::{initialize_aspects, Configurator};
use proof_producer::engine::{DevEngine, EngineSettings, ProofEngine};
use tracing::info;

fn main() -> Result<()> {
    dotenv().ok();
    let filter_handle = proof_producer::tracing::init();

    let path_aspect = Arc::new(PathAspect::new()?);
    let mut verifier = VerifierAspect::new(path_aspect.clone());

    let configurator = Configurator::from_aspects(&[&*path_aspect, &verifier])?;
    let cli_values = configurator.parse_cli(std::env::args_os().skip(1))?;
    let file_values = configurator.parse_file(&path_aspect.default_config_file())?;
    let merged = configurator.merge(&cli_values, &file_values);

    initialize_aspects(&mut [&mut verifier], &merged);
    proof_producer::tracing::apply_level(&filter_handle, verifier.log_level());

    let proof_path = verifier
        .input_proof_file_path()
        .ok_or_else(|| anyhow!("proof file path was not derived"))?;
    let circuit_path = verifier
        .input_circuit_file_path()
        .ok_or_else(|| anyhow!("circuit file path is not set; pass --circuit with an existing file"))?;
    let assignment_path = verifier.input_assignment_file_path().ok_or_else(|| {
        anyhow!("assignment table file path is not set; pass --assignment-table with an existing file")
    })?;

    // A missing or malformed proof file invalidates the rest of the
    // run: codec errors abort with a non-zero exit.
    let params = SchemeParams::for_curve(verifier.curve_type());
    let artifact = codec::read_proof(&params, Endianness::Little, proof_path)?;

    let circuit = fs::read(circuit_path)
        .with_context(|| format!("cannot read circuit file {}", circuit_path.display()))?;
    let assignment = fs::read(assignment_path).with_context(|| {
        format!("cannot read assignment table file {}", assignment_path.display())
    })?;

    let settings = EngineSettings {
        curve: verifier.curve_type(),
        shard0_mem_scale: None,
    };
    if DevEngine.verify(&artifact, &circuit, &assignment, &settings)? {
        info!("proof {} verified successfully", proof_path.display());
        Ok(())
    } else {
        Err(anyhow!(
            "proof verification failed for {}",
            proof_path.display()
        ))
    }
}
