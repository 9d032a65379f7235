//! Digest providers.
//!
//! Every registry entry carries an [`Algorithm`] tag; dispatching a code is a
//! registry lookup followed by [`Algorithm::digest_into`]. Hasher state is
//! created, fed and finalized inside a single call.

use crate::{
  error::{
    Error,
    Result,
  },
  registry::{
    self,
    Code,
  },
};
use byteorder::{
  BigEndian,
  ByteOrder,
};
use digest::{
  Digest,
  ExtendableOutput,
  Update,
  XofReader,
};
use sha1::Sha1;
use sha_2::{
  Sha256,
  Sha512,
};
use sha_3::{
  Keccak224,
  Keccak256,
  Keccak384,
  Keccak512,
  Sha3_224,
  Sha3_256,
  Sha3_384,
  Sha3_512,
  Shake128,
  Shake256,
};
use std::io::Cursor;

/// The primitive behind a hash function code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
  Sha1,
  Sha2_256,
  Sha2_512,
  Sha3_224,
  Sha3_256,
  Sha3_384,
  Sha3_512,
  Keccak224,
  Keccak256,
  Keccak384,
  Keccak512,
  /// `sha2-256` applied to its own output.
  DblSha2_256,
  /// 32-bit murmur3 with seed 0, written big-endian.
  Murmur3_32,
  Shake128,
  Shake256,
  /// Blake2b with a parameterized output length.
  Blake2b,
  /// Blake2s with a parameterized output length.
  Blake2s,
}

impl Algorithm {
  /// Longest output the primitive can produce, or `None` for extendable
  /// output functions.
  pub fn max_length(self) -> Option<u32> {
    match self {
      Self::Murmur3_32 => Some(4),
      Self::Sha1 => Some(20),
      Self::Sha3_224 | Self::Keccak224 => Some(28),
      Self::Sha2_256 | Self::Sha3_256 | Self::Keccak256 | Self::DblSha2_256 => {
        Some(32)
      }
      Self::Blake2s => Some(blake2s_simd::OUTBYTES as u32),
      Self::Sha3_384 | Self::Keccak384 => Some(48),
      Self::Sha2_512 | Self::Sha3_512 | Self::Keccak512 => Some(64),
      Self::Blake2b => Some(blake2b_simd::OUTBYTES as u32),
      Self::Shake128 | Self::Shake256 => None,
    }
  }

  /// Whether the primitive can emit `length` bytes.
  pub fn supports(self, length: u32) -> bool {
    length > 0 && self.max_length().map_or(true, |max| length <= max)
  }

  /// Hashes `data` into `out`, filling it completely. Fixed-size digests
  /// longer than `out` are truncated.
  ///
  /// # Panics
  ///
  /// Panics if `out.len()` is not supported by the primitive, see
  /// [`Algorithm::supports`].
  pub fn digest_into(self, data: &[u8], out: &mut [u8]) {
    match self {
      Algorithm::Sha1 => fixed::<Sha1>(data, out),
      Algorithm::Sha2_256 => fixed::<Sha256>(data, out),
      Algorithm::Sha2_512 => fixed::<Sha512>(data, out),
      Algorithm::Sha3_224 => fixed::<Sha3_224>(data, out),
      Algorithm::Sha3_256 => fixed::<Sha3_256>(data, out),
      Algorithm::Sha3_384 => fixed::<Sha3_384>(data, out),
      Algorithm::Sha3_512 => fixed::<Sha3_512>(data, out),
      Algorithm::Keccak224 => fixed::<Keccak224>(data, out),
      Algorithm::Keccak256 => fixed::<Keccak256>(data, out),
      Algorithm::Keccak384 => fixed::<Keccak384>(data, out),
      Algorithm::Keccak512 => fixed::<Keccak512>(data, out),
      Algorithm::DblSha2_256 => fixed::<Sha256>(&Sha256::digest(data), out),
      Algorithm::Murmur3_32 => murmur3_32(data, out),
      Algorithm::Shake128 => xof::<Shake128>(data, out),
      Algorithm::Shake256 => xof::<Shake256>(data, out),
      Algorithm::Blake2b => {
        let hash =
          blake2b_simd::Params::new().hash_length(out.len()).hash(data);
        out.copy_from_slice(hash.as_bytes());
      }
      Algorithm::Blake2s => {
        let hash =
          blake2s_simd::Params::new().hash_length(out.len()).hash(data);
        out.copy_from_slice(hash.as_bytes());
      }
    }
  }
}

fn fixed<D: Digest>(data: &[u8], out: &mut [u8]) {
  let sum = D::digest(data);
  out.copy_from_slice(&sum[..out.len()]);
}

fn xof<D: Default + Update + ExtendableOutput>(data: &[u8], out: &mut [u8]) {
  let mut hasher = D::default();
  Update::update(&mut hasher, data);
  hasher.finalize_xof().read(out);
}

fn murmur3_32(data: &[u8], out: &mut [u8]) {
  // reads from an in-memory cursor never fail
  let sum = murmur3::murmur3_32(&mut Cursor::new(data), 0).unwrap_or_default();
  let mut buf = [0u8; 4];
  BigEndian::write_u32(&mut buf, sum);
  out.copy_from_slice(&buf[..out.len()]);
}

/// Computes the `out_length`-byte digest of `data` for the function `code`.
///
/// # Errors
///
/// Will return `Err` if `code` is not registered, or if its primitive cannot
/// produce `out_length` bytes.
pub fn compute(code: Code, data: &[u8], out_length: u32) -> Result<Vec<u8>> {
  let entry = registry::global().entry(code).ok_or(Error::unknown_code(code))?;
  if !entry.algorithm().supports(out_length) {
    return Err(Error::LengthMismatch {
      code,
      expected: entry.length(),
      declared: u64::from(out_length),
    });
  }
  let mut out = vec![0u8; out_length as usize];
  entry.algorithm().digest_into(data, &mut out);
  Ok(out)
}
