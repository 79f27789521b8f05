//! End-to-end pipeline: resolve configuration, initialize the
//! aspects, prove, persist through the codec, decode and verify.

use std::path::PathBuf;
use std::sync::Arc;

use proof_producer::artifact::{codec, CurveType, Endianness, SchemeParams};
use proof_producer::aspects::{PathAspect, ProverAspect, VerifierAspect};
use proof_producer::config::{initialize_aspects, Configurator, ResolvedValues};
use proof_producer::engine::{DevEngine, EngineSettings, ProofEngine};

fn temp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("proof_producer_it_{}_{}", std::process::id(), tag))
}

fn write_file(tag: &str, contents: &[u8]) -> PathBuf {
    let path = temp_path(tag);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn prove_persist_decode_verify() {
    let circuit = write_file("circuit.crct", b"synthetic circuit");
    let assignment = write_file("assignment.tbl", b"synthetic assignment table");
    let proof = temp_path("proof.bin");

    // Prover side: CLI resolution into a typed aspect.
    let path_aspect = Arc::new(PathAspect::new().unwrap());
    let mut prover = ProverAspect::new(path_aspect.clone(), false);
    let configurator = Configurator::from_aspects(&[&*path_aspect, &prover]).unwrap();
    let cli = configurator
        .parse_cli([
            "--circuit",
            circuit.to_str().unwrap(),
            "--assignment-table",
            assignment.to_str().unwrap(),
            "--proof",
            proof.to_str().unwrap(),
            "--elliptic-curve-type",
            "vesta",
        ])
        .unwrap();
    let merged = configurator.merge(&cli, &ResolvedValues::default());
    initialize_aspects(&mut [&mut prover], &merged);

    assert_eq!(prover.input_circuit_file_path(), Some(circuit.as_path()));
    assert_eq!(prover.curve_type(), CurveType::Vesta);

    let settings = EngineSettings {
        curve: prover.curve_type(),
        shard0_mem_scale: prover.shard0_mem_scale(),
    };
    let engine = DevEngine;
    let circuit_bytes = std::fs::read(&circuit).unwrap();
    let assignment_bytes = std::fs::read(&assignment).unwrap();
    let artifact = engine
        .prove(&circuit_bytes, &assignment_bytes, &settings)
        .unwrap();

    let params = SchemeParams::for_curve(prover.curve_type());
    codec::write_proof(
        &params,
        Endianness::Little,
        prover.output_proof_file_path().unwrap(),
        &artifact,
    )
    .unwrap();

    // Verifier side: independent resolution, decode, verify.
    let mut verifier = VerifierAspect::new(path_aspect.clone());
    let configurator = Configurator::from_aspects(&[&*path_aspect, &verifier]).unwrap();
    let cli = configurator
        .parse_cli([
            "--proof",
            proof.to_str().unwrap(),
            "--circuit",
            circuit.to_str().unwrap(),
            "--assignment-table",
            assignment.to_str().unwrap(),
            "-e",
            "vesta",
        ])
        .unwrap();
    let merged = configurator.merge(&cli, &ResolvedValues::default());
    initialize_aspects(&mut [&mut verifier], &merged);

    let params = SchemeParams::for_curve(verifier.curve_type());
    let decoded = codec::read_proof(
        &params,
        Endianness::Little,
        verifier.input_proof_file_path().unwrap(),
    )
    .unwrap();
    assert_eq!(decoded, artifact);

    let settings = EngineSettings {
        curve: verifier.curve_type(),
        shard0_mem_scale: None,
    };
    assert!(engine
        .verify(&decoded, &circuit_bytes, &assignment_bytes, &settings)
        .unwrap());

    // A different circuit no longer verifies.
    assert!(!engine
        .verify(&decoded, b"some other circuit", &assignment_bytes, &settings)
        .unwrap());
}

#[test]
fn decoding_with_the_wrong_curve_parameters_fails() {
    let engine = DevEngine;
    let settings = EngineSettings {
        curve: CurveType::Bls12381,
        shard0_mem_scale: None,
    };
    let artifact = engine.prove(b"c", b"a", &settings).unwrap();

    let proof = temp_path("wrong_params_proof.bin");
    let bls = SchemeParams::for_curve(CurveType::Bls12381);
    codec::write_proof(&bls, Endianness::Little, &proof, &artifact).unwrap();

    let pallas = SchemeParams::for_curve(CurveType::Pallas);
    assert!(codec::read_proof(&pallas, Endianness::Little, &proof).is_err());
}
