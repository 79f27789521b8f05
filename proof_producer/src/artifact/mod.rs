//! The persisted proof artifact: scheme parameters, the in-memory
//! decoded object, and its binary codec.

pub mod codec;

use std::fmt;
use std::str::FromStr;

pub use codec::{read_proof, write_proof, CodecError};

/// Native elliptic curve types the pipeline can be parameterized with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurveType {
    #[default]
    Pallas,
    Vesta,
    Ed25519,
    Bls12381,
}

impl FromStr for CurveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pallas" => Ok(CurveType::Pallas),
            "vesta" => Ok(CurveType::Vesta),
            "ed25519" => Ok(CurveType::Ed25519),
            "bls12381" => Ok(CurveType::Bls12381),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CurveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CurveType::Pallas => "pallas",
            CurveType::Vesta => "vesta",
            CurveType::Ed25519 => "ed25519",
            CurveType::Bls12381 => "bls12381",
        };
        f.write_str(name)
    }
}

/// Byte order used for the artifact's integer framing and for the
/// interpretation of nested field elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    /// One-byte wire tag carried in the frame header.
    pub(crate) fn tag(self) -> u8 {
        match self {
            Endianness::Little => 0,
            Endianness::Big => 1,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Endianness::Little),
            1 => Some(Endianness::Big),
            _ => None,
        }
    }
}

/// Commitment-scheme parameters the codec needs to size and validate
/// nested values. Echoed into the frame header so a file cannot be
/// silently decoded with the wrong parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeParams {
    /// Bit width of the native field; field elements must be canonical
    /// (bits above this width are zero).
    pub field_bits: u32,
    /// Size of one commitment digest in bytes.
    pub commitment_bytes: u32,
}

impl SchemeParams {
    pub fn for_curve(curve: CurveType) -> Self {
        match curve {
            CurveType::Pallas | CurveType::Vesta => Self {
                field_bits: 255,
                commitment_bytes: 32,
            },
            CurveType::Ed25519 => Self {
                field_bits: 255,
                commitment_bytes: 32,
            },
            CurveType::Bls12381 => Self {
                field_bits: 381,
                commitment_bytes: 48,
            },
        }
    }

    /// Bytes needed to hold one field element.
    pub fn field_element_bytes(&self) -> usize {
        self.field_bits.div_ceil(8) as usize
    }
}

/// One opening: an evaluation position together with the field
/// elements revealed at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    pub position: u64,
    pub values: Vec<Vec<u8>>,
}

/// The decoded in-memory proof object. Field elements are stored in
/// little-endian byte order regardless of the on-disk endianness;
/// commitments are opaque digests. Immutable once decoded: either the
/// whole object decodes or the operation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofArtifact {
    pub commitments: Vec<Vec<u8>>,
    pub evaluations: Vec<Vec<u8>>,
    pub openings: Vec<Opening>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_curve_names_resolve() {
        for (name, expected) in [
            ("pallas", CurveType::Pallas),
            ("vesta", CurveType::Vesta),
            ("ed25519", CurveType::Ed25519),
            ("bls12381", CurveType::Bls12381),
        ] {
            assert_eq!(name.parse::<CurveType>(), Ok(expected));
            assert_eq!(expected.to_string(), name);
        }
    }

    #[test]
    fn unknown_curve_name_is_rejected() {
        assert!("secp256k1".parse::<CurveType>().is_err());
        assert!("Pallas".parse::<CurveType>().is_err());
    }

    #[test]
    fn field_element_sizing_rounds_up() {
        assert_eq!(
            SchemeParams::for_curve(CurveType::Pallas).field_element_bytes(),
            32
        );
        assert_eq!(
            SchemeParams::for_curve(CurveType::Bls12381).field_element_bytes(),
            48
        );
    }
}
