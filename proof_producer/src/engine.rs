//! Boundary to the proving/verification engine.
//!
//! The real engine (circuit execution, constraint satisfaction,
//! commitment arithmetic) lives outside this crate; the front-end only
//! needs "prove these bytes" and "verify this artifact". [`DevEngine`]
//! is a deterministic hash-based stand-in so the binaries and the
//! integration tests can exercise the full pipeline without the
//! native backend. It is not a proof system.

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::artifact::{CurveType, Opening, ProofArtifact, SchemeParams};

/// Knobs the front-end passes through to the engine. The shard hint
/// configures concurrency inside the engine; this crate treats it as
/// an opaque integer.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub curve: CurveType,
    pub shard0_mem_scale: Option<i64>,
}

/// The prove/verify seam between the front-end and the engine.
pub trait ProofEngine {
    fn prove(
        &self,
        circuit: &[u8],
        assignment: &[u8],
        settings: &EngineSettings,
    ) -> Result<ProofArtifact>;

    fn verify(
        &self,
        proof: &ProofArtifact,
        circuit: &[u8],
        assignment: &[u8],
        settings: &EngineSettings,
    ) -> Result<bool>;
}

/// Deterministic development backend: commitments and evaluations are
/// SHA-256 chains over the inputs, sized to the scheme parameters.
/// Proving twice over the same inputs yields the same artifact, and
/// verification recomputes and compares.
pub struct DevEngine;

impl DevEngine {
    fn digest(parts: &[&[u8]]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part);
        }
        hasher.finalize().into()
    }

    /// A commitment-sized digest over `parts`.
    fn commitment(params: &SchemeParams, parts: &[&[u8]]) -> Vec<u8> {
        let first = Self::digest(parts);
        let mut out = first.to_vec();
        while out.len() < params.commitment_bytes as usize {
            let next = Self::digest(&[&out, &[0x01]]);
            out.extend_from_slice(&next);
        }
        out.truncate(params.commitment_bytes as usize);
        out
    }

    /// A canonical field element derived from `seed`: digest bytes in
    /// little-endian order, zero-padded to the element width, excess
    /// top bits cleared.
    fn element(params: &SchemeParams, seed: &[u8]) -> Vec<u8> {
        let mut out = Self::digest(&[seed]).to_vec();
        out.resize(params.field_element_bytes(), 0);
        let excess = params.field_element_bytes() * 8 - params.field_bits as usize;
        if excess > 0 {
            let last = out.len() - 1;
            out[last] &= 0xff >> excess;
        }
        out
    }
}

impl ProofEngine for DevEngine {
    fn prove(
        &self,
        circuit: &[u8],
        assignment: &[u8],
        settings: &EngineSettings,
    ) -> Result<ProofArtifact> {
        let params = SchemeParams::for_curve(settings.curve);

        let circuit_commitment = Self::commitment(&params, &[b"dev:circuit", circuit]);
        let assignment_commitment = Self::commitment(&params, &[b"dev:assignment", assignment]);
        let joint_commitment =
            Self::commitment(&params, &[&circuit_commitment, &assignment_commitment]);

        let evaluations: Vec<Vec<u8>> = (0u64..4)
            .map(|i| {
                let mut seed = joint_commitment.clone();
                seed.extend_from_slice(&i.to_le_bytes());
                Self::element(&params, &seed)
            })
            .collect();

        let openings = evaluations
            .iter()
            .take(2)
            .enumerate()
            .map(|(i, evaluation)| Opening {
                position: i as u64,
                values: vec![evaluation.clone(), Self::element(&params, evaluation)],
            })
            .collect();

        Ok(ProofArtifact {
            commitments: vec![circuit_commitment, assignment_commitment, joint_commitment],
            evaluations,
            openings,
        })
    }

    fn verify(
        &self,
        proof: &ProofArtifact,
        circuit: &[u8],
        assignment: &[u8],
        settings: &EngineSettings,
    ) -> Result<bool> {
        let expected = self.prove(circuit, assignment, settings)?;
        Ok(expected == *proof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(curve: CurveType) -> EngineSettings {
        EngineSettings {
            curve,
            shard0_mem_scale: None,
        }
    }

    #[test]
    fn proving_is_deterministic() {
        let engine = DevEngine;
        let s = settings(CurveType::Pallas);
        let a = engine.prove(b"circuit", b"assignment", &s).unwrap();
        let b = engine.prove(b"circuit", b"assignment", &s).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn verification_accepts_the_matching_inputs() {
        let engine = DevEngine;
        let s = settings(CurveType::Vesta);
        let proof = engine.prove(b"circuit", b"assignment", &s).unwrap();
        assert!(engine.verify(&proof, b"circuit", b"assignment", &s).unwrap());
    }

    #[test]
    fn verification_rejects_other_inputs_and_tampering() {
        let engine = DevEngine;
        let s = settings(CurveType::Pallas);
        let mut proof = engine.prove(b"circuit", b"assignment", &s).unwrap();
        assert!(!engine.verify(&proof, b"other", b"assignment", &s).unwrap());

        proof.evaluations[0][0] ^= 1;
        assert!(!engine.verify(&proof, b"circuit", b"assignment", &s).unwrap());
    }

    #[test]
    fn artifact_shapes_match_the_scheme() {
        let engine = DevEngine;
        for curve in [CurveType::Pallas, CurveType::Bls12381] {
            let params = SchemeParams::for_curve(curve);
            let proof = engine.prove(b"c", b"a", &settings(curve)).unwrap();
            for commitment in &proof.commitments {
                assert_eq!(commitment.len(), params.commitment_bytes as usize);
            }
            for element in &proof.evaluations {
                assert_eq!(element.len(), params.field_element_bytes());
            }
        }
    }
}
