//! Binary codec for the proof artifact file.
//!
//! Frame layout: 4-byte magic, endianness tag byte, then — in the
//! tagged byte order — a format version, an echo of the scheme
//! parameters, and three length-prefixed sections (commitments,
//! evaluations, openings). All failures are hard: a file either
//! decodes into a complete [`ProofArtifact`] or the operation fails
//! with a [`CodecError`] naming the file and the problem.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Endianness, Opening, ProofArtifact, SchemeParams};

/// Magic bytes identifying a proof artifact file.
pub const PROOF_MAGIC: [u8; 4] = *b"PRF\x01";

/// Current frame format version.
pub const FORMAT_VERSION: u32 = 1;

/// Stores the result of codec operations. Returns a [`CodecError`]
/// upon failure.
pub type CodecResult<T> = Result<T, CodecError>;

/// A fatal proof-file error. Deliberately a separate type from the
/// configuration diagnostics: callers abort on these instead of
/// continuing with a field unset.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file could not be opened.
    #[error("cannot open proof file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was opened but could not be read to the end.
    #[error("cannot read proof file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("cannot write proof file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Structural decoding failure: bad magic, truncated buffer,
    /// oversized counts, or a non-canonical field element.
    #[error("malformed proof file {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// The file is well-formed but was encoded with parameters or an
    /// endianness other than the caller supplied.
    #[error("proof file {} does not match the requested scheme: {reason}", path.display())]
    SchemeMismatch { path: PathBuf, reason: String },

    /// The artifact cannot be represented under the given parameters.
    #[error("cannot encode proof artifact: {reason}")]
    Encode { reason: String },
}

enum DecodeFailure {
    Malformed(String),
    SchemeMismatch(String),
}

impl DecodeFailure {
    fn at(self, path: &Path) -> CodecError {
        let path = path.to_path_buf();
        match self {
            DecodeFailure::Malformed(reason) => CodecError::Malformed { path, reason },
            DecodeFailure::SchemeMismatch(reason) => CodecError::SchemeMismatch { path, reason },
        }
    }
}

/// Reads and decodes a single framed proof object from `path`,
/// interpreting nested values with the caller-supplied endianness and
/// scheme parameters.
pub fn read_proof(
    params: &SchemeParams,
    endianness: Endianness,
    path: &Path,
) -> CodecResult<ProofArtifact> {
    let mut file = File::open(path).map_err(|source| CodecError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(|source| CodecError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    decode(params, endianness, &buf).map_err(|failure| failure.at(path))
}

/// Encodes `artifact` and writes it to `path` as a single frame.
/// `read_proof` with the same parameters and endianness round-trips
/// the value.
pub fn write_proof(
    params: &SchemeParams,
    endianness: Endianness,
    path: &Path,
    artifact: &ProofArtifact,
) -> CodecResult<()> {
    let bytes = encode(params, endianness, artifact)?;
    std::fs::write(path, bytes).map_err(|source| CodecError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn decode(
    params: &SchemeParams,
    endianness: Endianness,
    buf: &[u8],
) -> Result<ProofArtifact, DecodeFailure> {
    let mut reader = Reader {
        buf,
        pos: 0,
        endianness,
    };

    let magic = reader.take(4)?;
    if magic != PROOF_MAGIC {
        return Err(DecodeFailure::Malformed(format!(
            "bad magic {} (expected {})",
            hex::encode(magic),
            hex::encode(PROOF_MAGIC)
        )));
    }

    let tag = reader.u8()?;
    match Endianness::from_tag(tag) {
        Some(e) if e == endianness => {}
        Some(e) => {
            return Err(DecodeFailure::SchemeMismatch(format!(
                "file is {e:?}-endian, {endianness:?}-endian was requested"
            )))
        }
        None => {
            return Err(DecodeFailure::Malformed(format!(
                "unknown endianness tag {tag:#04x}"
            )))
        }
    }

    let version = reader.u32()?;
    if version != FORMAT_VERSION {
        return Err(DecodeFailure::Malformed(format!(
            "unsupported format version {version} (expected {FORMAT_VERSION})"
        )));
    }

    let field_bits = reader.u32()?;
    let commitment_bytes = reader.u32()?;
    if field_bits != params.field_bits || commitment_bytes != params.commitment_bytes {
        return Err(DecodeFailure::SchemeMismatch(format!(
            "file has field_bits={field_bits}, commitment_bytes={commitment_bytes}; \
             requested field_bits={}, commitment_bytes={}",
            params.field_bits, params.commitment_bytes
        )));
    }

    let commitments = reader.counted(params.commitment_bytes as usize, "commitment")?;

    let element_bytes = params.field_element_bytes();
    let mut evaluations = reader.counted(element_bytes, "evaluation")?;
    for evaluation in &mut evaluations {
        normalize_element(evaluation, endianness, params.field_bits)?;
    }

    let n_openings = reader.count("opening", 16)?;
    let mut openings = Vec::with_capacity(n_openings);
    for _ in 0..n_openings {
        let position = reader.u64()?;
        let mut values = reader.counted(element_bytes, "opening value")?;
        for value in &mut values {
            normalize_element(value, endianness, params.field_bits)?;
        }
        openings.push(Opening { position, values });
    }

    if reader.pos != buf.len() {
        return Err(DecodeFailure::Malformed(format!(
            "{} trailing bytes after the proof frame",
            buf.len() - reader.pos
        )));
    }

    Ok(ProofArtifact {
        commitments,
        evaluations,
        openings,
    })
}

fn encode(
    params: &SchemeParams,
    endianness: Endianness,
    artifact: &ProofArtifact,
) -> CodecResult<Vec<u8>> {
    let element_bytes = params.field_element_bytes();
    for commitment in &artifact.commitments {
        if commitment.len() != params.commitment_bytes as usize {
            return Err(CodecError::Encode {
                reason: format!(
                    "commitment is {} bytes, scheme expects {}",
                    commitment.len(),
                    params.commitment_bytes
                ),
            });
        }
    }
    for element in artifact
        .evaluations
        .iter()
        .chain(artifact.openings.iter().flat_map(|o| o.values.iter()))
    {
        if element.len() != element_bytes {
            return Err(CodecError::Encode {
                reason: format!(
                    "field element is {} bytes, scheme expects {}",
                    element.len(),
                    element_bytes
                ),
            });
        }
        if !is_canonical(element, params.field_bits) {
            return Err(CodecError::Encode {
                reason: "field element has non-zero bits above the field width".to_string(),
            });
        }
    }

    let mut out = Vec::new();
    out.extend_from_slice(&PROOF_MAGIC);
    out.push(endianness.tag());
    put_u32(&mut out, endianness, FORMAT_VERSION);
    put_u32(&mut out, endianness, params.field_bits);
    put_u32(&mut out, endianness, params.commitment_bytes);

    put_u64(&mut out, endianness, artifact.commitments.len() as u64);
    for commitment in &artifact.commitments {
        out.extend_from_slice(commitment);
    }

    put_u64(&mut out, endianness, artifact.evaluations.len() as u64);
    for element in &artifact.evaluations {
        put_element(&mut out, endianness, element);
    }

    put_u64(&mut out, endianness, artifact.openings.len() as u64);
    for opening in &artifact.openings {
        put_u64(&mut out, endianness, opening.position);
        put_u64(&mut out, endianness, opening.values.len() as u64);
        for value in &opening.values {
            put_element(&mut out, endianness, value);
        }
    }

    Ok(out)
}

/// Brings a wire field element into the in-memory (little-endian)
/// byte order and checks canonicity.
fn normalize_element(
    element: &mut [u8],
    endianness: Endianness,
    field_bits: u32,
) -> Result<(), DecodeFailure> {
    if endianness == Endianness::Big {
        element.reverse();
    }
    if !is_canonical(element, field_bits) {
        return Err(DecodeFailure::Malformed(
            "field element has non-zero bits above the field width".to_string(),
        ));
    }
    Ok(())
}

/// True iff the (little-endian) element's bits above `field_bits` are
/// all zero.
fn is_canonical(element: &[u8], field_bits: u32) -> bool {
    let excess = element.len() * 8 - field_bits as usize;
    if excess == 0 {
        return true;
    }
    let top = element[element.len() - 1];
    top >> (8 - excess) == 0
}

fn put_u32(out: &mut Vec<u8>, endianness: Endianness, v: u32) {
    match endianness {
        Endianness::Little => out.extend_from_slice(&v.to_le_bytes()),
        Endianness::Big => out.extend_from_slice(&v.to_be_bytes()),
    }
}

fn put_u64(out: &mut Vec<u8>, endianness: Endianness, v: u64) {
    match endianness {
        Endianness::Little => out.extend_from_slice(&v.to_le_bytes()),
        Endianness::Big => out.extend_from_slice(&v.to_be_bytes()),
    }
}

fn put_element(out: &mut Vec<u8>, endianness: Endianness, element: &[u8]) {
    match endianness {
        Endianness::Little => out.extend_from_slice(element),
        Endianness::Big => out.extend(element.iter().rev()),
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    endianness: Endianness,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeFailure> {
        if self.buf.len() - self.pos < n {
            return Err(DecodeFailure::Malformed(format!(
                "truncated: needed {} bytes at offset {}, {} remain",
                n,
                self.pos,
                self.buf.len() - self.pos
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, DecodeFailure> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> Result<u32, DecodeFailure> {
        let bytes: [u8; 4] = self.take(4)?.try_into().unwrap();
        Ok(match self.endianness {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        })
    }

    fn u64(&mut self) -> Result<u64, DecodeFailure> {
        let bytes: [u8; 8] = self.take(8)?.try_into().unwrap();
        Ok(match self.endianness {
            Endianness::Little => u64::from_le_bytes(bytes),
            Endianness::Big => u64::from_be_bytes(bytes),
        })
    }

    /// Reads a u64 count and sanity-checks it against the remaining
    /// buffer before any allocation happens.
    fn count(&mut self, what: &str, min_item_bytes: usize) -> Result<usize, DecodeFailure> {
        let count = self.u64()?;
        let remaining = (self.buf.len() - self.pos) as u64;
        if count.checked_mul(min_item_bytes as u64).is_none()
            || count * min_item_bytes as u64 > remaining
        {
            return Err(DecodeFailure::Malformed(format!(
                "{what} count {count} exceeds the remaining {remaining} bytes"
            )));
        }
        Ok(count as usize)
    }

    /// Reads a count-prefixed sequence of fixed-size items.
    fn counted(&mut self, item_bytes: usize, what: &str) -> Result<Vec<Vec<u8>>, DecodeFailure> {
        let count = self.count(what, item_bytes)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.take(item_bytes)?.to_vec());
        }
        Ok(items)
    }
}
