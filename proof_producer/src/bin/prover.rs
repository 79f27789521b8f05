use std::fs;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use proof_producer::artifact::{codec, Endianness, SchemeParams};
use proof_producer::aspects::{PathAspect, ProverAspect};
use proof_producer::config::{initialize_aspects, Configurator};
use proof_producer::engine::{DevEngine, EngineSettings, ProofEngine};
use tracing::info;

/// Startup toggle for the multi-threaded variant's options.
const MULTI_THREADED_ENV: &str = "PROOF_PRODUCER_MULTI_THREADED";

fn multi_threaded_enabled() -> bool {
    std::env::var(MULTI_THREADED_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn main() -> Result<()> {
    dotenv().ok();
    let filter_handle = proof_producer::tracing::init();

    let path_aspect = Arc::new(PathAspect::new()?);
    let mut prover = ProverAspect::new(path_aspect.clone(), multi_threaded_enabled());

    let configurator = Configurator::from_aspects(&[&*path_aspect, &prover])?;
    let cli_values = configurator.parse_cli(std::env::args_os().skip(1))?;
    let file_values = configurator.parse_file(&path_aspect.default_config_file())?;
    let merged = configurator.merge(&cli_values, &file_values);

    initialize_aspects(&mut [&mut prover], &merged);
    proof_producer::tracing::apply_level(&filter_handle, prover.log_level());

    // Soft-failed configuration fields surface here as missing
    // prerequisites.
    let circuit_path = prover
        .input_circuit_file_path()
        .ok_or_else(|| anyhow!("circuit file path is not set; pass --circuit with an existing file"))?;
    let assignment_path = prover.input_assignment_file_path().ok_or_else(|| {
        anyhow!("assignment table file path is not set; pass --assignment-table with an existing file")
    })?;
    let proof_path = prover
        .output_proof_file_path()
        .ok_or_else(|| anyhow!("proof file path was not derived"))?;

    let circuit = fs::read(circuit_path)
        .with_context(|| format!("cannot read circuit file {}", circuit_path.display()))?;
    let assignment = fs::read(assignment_path).with_context(|| {
        format!("cannot read assignment table file {}", assignment_path.display())
    })?;

    let settings = EngineSettings {
        curve: prover.curve_type(),
        shard0_mem_scale: prover.shard0_mem_scale(),
    };
    let engine = DevEngine;
    let artifact = engine
        .prove(&circuit, &assignment, &settings)
        .context("proof generation failed")?;

    // Artifacts are persisted little-endian; the codec understands
    // both byte orders on read.
    let params = SchemeParams::for_curve(prover.curve_type());
    codec::write_proof(&params, Endianness::Little, proof_path, &artifact)?;
    info!("proof written to {}", proof_path.display());

    if prover.is_skip_verification_mode_on() {
        info!("skipping verification of the generated proof");
    } else if engine.verify(&artifact, &circuit, &assignment, &settings)? {
        info!("generated proof verified successfully");
    } else {
        return Err(anyhow!("generated proof failed verification"));
    }

    Ok(())
}
