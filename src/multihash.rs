//! The self-describing digest: `varint(code) || varint(length) || digest`.

use crate::{
  error::{
    Error,
    Field,
    Malformed,
    Result,
  },
  provider::Algorithm,
  registry::{
    self,
    Code,
    Entry,
    Kind,
  },
  varint,
};
use core::{
  convert::TryFrom,
  fmt,
  hash,
  str::FromStr,
};
use log::trace;
use multibase::Base;

/// Shortest valid multihash: one byte per prefix field and one digest byte.
pub const MIN_LEN: usize = 3;

/// An immutable multihash.
///
/// The prefix and digest live in one contiguous buffer. Equality and hashing
/// look only at that buffer.
#[derive(Clone)]
pub struct Multihash {
  code: Code,
  prefix_len: usize,
  bytes: Vec<u8>,
}

impl Multihash {
  /// Hashes `data` with the function named `name`.
  ///
  /// # Errors
  ///
  /// Will return `Err` if `name` is not a registered function name.
  pub fn new(data: &[u8], name: &str) -> Result<Self> {
    Ok(Builder::new(name)?.sum(data))
  }

  /// Hashes `data` with `sha2-256`.
  pub fn new_default(data: &[u8]) -> Self { Builder::default().sum(data) }

  /// Builds a multihash around an already computed digest.
  ///
  /// # Errors
  ///
  /// Will return `Err` if `code` is unknown, or if the digest length is not
  /// one `code` can produce.
  pub fn wrap(code: Code, digest: &[u8]) -> Result<Self> {
    let entry =
      registry::global().entry(code).ok_or(Error::unknown_code(code))?;
    check_length(entry, digest.len() as u64)?;
    let (mut bytes, prefix_len) = zeroed(code, digest.len());
    bytes[prefix_len..].copy_from_slice(digest);
    Ok(Multihash { code, prefix_len, bytes })
  }

  /// Parses a multihash from a borrowed buffer, copying it.
  ///
  /// # Errors
  ///
  /// See [`Multihash::from_bytes`].
  pub fn decode(bytes: &[u8]) -> Result<Self> {
    let (code, prefix_len) = parse_prefix(bytes)?;
    Ok(Multihash { code, prefix_len, bytes: bytes.to_vec() })
  }

  /// Parses a multihash, taking ownership of `bytes` without copying.
  ///
  /// # Errors
  ///
  /// Will return `Err` if `bytes` is shorter than [`MIN_LEN`], if either
  /// prefix varint is truncated or overflows, if the code is unknown, if a
  /// fixed code declares a length other than its default, or if the declared
  /// length does not match the number of digest bytes.
  pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
    let (code, prefix_len) = parse_prefix(&bytes)?;
    Ok(Multihash { code, prefix_len, bytes })
  }

  /// Parses a hex rendering of a multihash.
  ///
  /// # Errors
  ///
  /// Will return `Err` on invalid hex, or for any reason listed on
  /// [`Multihash::from_bytes`].
  pub fn from_hex(s: &str) -> Result<Self> {
    let bytes =
      hex::decode(s).map_err(|e| Error::MalformedInput(e.to_string()))?;
    Self::from_bytes(bytes)
  }

  /// Parses a base58btc rendering (without a multibase prefix).
  ///
  /// # Errors
  ///
  /// Will return `Err` on invalid base58, or for any reason listed on
  /// [`Multihash::from_bytes`].
  pub fn from_base58(s: &str) -> Result<Self> {
    let bytes = Base::Base58Btc
      .decode(s)
      .map_err(|e| Error::MalformedInput(e.to_string()))?;
    Self::from_bytes(bytes)
  }

  pub fn code(&self) -> Code { self.code }

  /// Length of the digest in bytes.
  pub fn size(&self) -> usize { self.bytes.len() - self.prefix_len }

  /// Both varint fields.
  pub fn prefix(&self) -> &[u8] { &self.bytes[..self.prefix_len] }

  pub fn digest(&self) -> &[u8] { &self.bytes[self.prefix_len..] }

  /// The whole encoding, prefix included.
  pub fn as_bytes(&self) -> &[u8] { &self.bytes }

  pub fn into_bytes(self) -> Vec<u8> { self.bytes }

  /// Canonical name of the hash function. Registered codes are the only ones
  /// a `Multihash` can carry, so this is never empty.
  pub fn name(&self) -> &'static str {
    registry::name_of(self.code).unwrap_or_default()
  }

  pub fn algorithm(&self) -> Option<Algorithm> {
    registry::global().entry(self.code).map(Entry::algorithm)
  }

  pub fn to_hex(&self) -> String { hex::encode(&self.bytes) }

  pub fn to_base64(&self) -> String { base64::encode(&self.bytes) }

  pub fn to_base58(&self) -> String { Base::Base58Btc.encode(&self.bytes) }

  pub fn prefix_hex(&self) -> String { hex::encode(self.prefix()) }

  pub fn digest_hex(&self) -> String { hex::encode(self.digest()) }

  /// Renders the multihash with a multibase prefix character.
  pub fn to_multibase(&self, base: Base) -> String {
    multibase::encode(base, &self.bytes)
  }
}

/// A buffer holding the prefix for `code` and `length`, followed by `length`
/// zero bytes for the digest. Returns the buffer and the prefix length.
fn zeroed(code: Code, length: usize) -> (Vec<u8>, usize) {
  let mut code_buf = varint::buffer();
  let mut size_buf = varint::buffer();
  let code_prefix = varint::encode_into(code.0, &mut code_buf);
  let size_prefix = varint::encode_into(length as u64, &mut size_buf);
  let prefix_len = code_prefix.len() + size_prefix.len();
  let mut bytes = Vec::with_capacity(prefix_len + length);
  bytes.extend_from_slice(code_prefix);
  bytes.extend_from_slice(size_prefix);
  bytes.resize(prefix_len + length, 0);
  (bytes, prefix_len)
}

/// Validates the prefix of `bytes`, returning the code and the prefix length.
fn parse_prefix(bytes: &[u8]) -> Result<(Code, usize)> {
  if bytes.len() < MIN_LEN {
    trace!("rejecting {}-byte multihash", bytes.len());
    return Err(Error::MalformedInput(format!(
      "{} bytes is shorter than the minimum of {}",
      bytes.len(),
      MIN_LEN
    )));
  }
  let (code, code_len) = read_varint(bytes, Field::Code)?;
  let code = Code(code);
  let entry = registry::global().entry(code).ok_or_else(|| {
    trace!("rejecting multihash with unknown code {}", code);
    Error::unknown_code(code)
  })?;
  let (declared, size_len) = read_varint(&bytes[code_len..], Field::Length)?;
  check_length(entry, declared)?;
  let prefix_len = code_len + size_len;
  let available = bytes.len() - prefix_len;
  if declared != available as u64 {
    trace!(
      "{} declares {} bytes, {} available",
      entry.name(),
      declared,
      available
    );
    return Err(Error::TruncatedDigest { declared, available });
  }
  Ok((code, prefix_len))
}

fn read_varint(bytes: &[u8], field: Field) -> Result<(u64, usize)> {
  match varint::decode(bytes) {
    (value, n) if n > 0 => Ok((value, n as usize)),
    (_, 0) => {
      Err(Error::MalformedVarint { field, reason: Malformed::Truncated })
    }
    _ => Err(Error::MalformedVarint { field, reason: Malformed::Overflow }),
  }
}

/// Fixed codes must carry exactly their default length. Parametric codes
/// carry whatever the prefix declares, within what the family can produce.
fn check_length(entry: &Entry, declared: u64) -> Result<()> {
  let ok = match entry.kind() {
    Kind::Fixed => declared == u64::from(entry.length()),
    Kind::Parametric(_) => u32::try_from(declared)
      .map_or(false, |length| entry.algorithm().supports(length)),
  };
  if ok {
    Ok(())
  }
  else {
    trace!("{} cannot carry a {}-byte digest", entry.name(), declared);
    Err(Error::LengthMismatch {
      code: entry.code(),
      expected: entry.length(),
      declared,
    })
  }
}

impl PartialEq for Multihash {
  fn eq(&self, other: &Self) -> bool { self.bytes == other.bytes }
}

impl Eq for Multihash {}

impl hash::Hash for Multihash {
  fn hash<H: hash::Hasher>(&self, state: &mut H) { self.bytes.hash(state) }
}

impl fmt::Debug for Multihash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Multihash")
      .field("name", &self.name())
      .field("code", &self.code)
      .field("digest", &self.digest_hex())
      .finish()
  }
}

impl fmt::Display for Multihash {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl FromStr for Multihash {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::from_hex(s) }
}

impl TryFrom<Vec<u8>> for Multihash {
  type Error = Error;

  fn try_from(bytes: Vec<u8>) -> Result<Self> { Self::from_bytes(bytes) }
}

impl TryFrom<&[u8]> for Multihash {
  type Error = Error;

  fn try_from(bytes: &[u8]) -> Result<Self> { Self::decode(bytes) }
}

impl AsRef<[u8]> for Multihash {
  fn as_ref(&self) -> &[u8] { &self.bytes }
}

impl From<Multihash> for Vec<u8> {
  fn from(mh: Multihash) -> Self { mh.bytes }
}

/// A resolved hash function, ready to hash data into multihashes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Builder {
  code: Code,
  length: u32,
  algorithm: Algorithm,
}

impl Builder {
  /// Resolves `name` through the registry.
  ///
  /// # Errors
  ///
  /// Will return `Err` if `name` is not a registered function name.
  pub fn new(name: &str) -> Result<Self> {
    registry::global()
      .entry_by_name(name)
      .map(Self::from_entry)
      .ok_or_else(|| Error::unknown_name(name))
  }

  /// # Errors
  ///
  /// Will return `Err` if `code` is not registered.
  pub fn from_code(code: Code) -> Result<Self> {
    registry::global()
      .entry(code)
      .map(Self::from_entry)
      .ok_or(Error::unknown_code(code))
  }

  fn from_entry(entry: &Entry) -> Self {
    Builder {
      code: entry.code(),
      length: entry.length(),
      algorithm: entry.algorithm(),
    }
  }

  pub fn code(&self) -> Code { self.code }

  /// Digest length the built multihashes carry.
  pub fn length(&self) -> u32 { self.length }

  /// Hashes `data`, writing the digest directly behind the prefix.
  pub fn sum(&self, data: &[u8]) -> Multihash {
    let (mut bytes, prefix_len) = zeroed(self.code, self.length as usize);
    self.algorithm.digest_into(data, &mut bytes[prefix_len..]);
    Multihash { code: self.code, prefix_len, bytes }
  }
}

impl Default for Builder {
  /// `sha2-256`
  fn default() -> Self {
    Builder { code: Code::SHA2_256, length: 32, algorithm: Algorithm::Sha2_256 }
  }
}

#[cfg(test)]
pub mod tests {
  use super::*;
  use crate::arb::ACode;
  use quickcheck_macros::quickcheck;

  const DATA: &[u8] = b"this is some data to hash";

  #[test]
  fn sha1_vector() {
    let mh = Multihash::new(DATA, "sha1").unwrap();
    assert_eq!(mh.to_hex(), "11148c01cfecb50deb6ddcc39eddbddb012835f7919a");
    assert_eq!(mh.prefix_hex(), "1114");
    assert_eq!(mh.digest_hex(), "8c01cfecb50deb6ddcc39eddbddb012835f7919a");
    assert_eq!(mh.code(), Code::SHA1);
    assert_eq!(mh.size(), 20);
    assert_eq!(mh.name(), "sha1");
  }

  #[test]
  fn sha2_256_vector() {
    let mh = Multihash::new(DATA, "sha256").unwrap();
    assert_eq!(mh.prefix_hex(), "1220");
    assert_eq!(
      mh.digest_hex(),
      "cc98718f1394ba1071417e108bfb27a81c6fa7ff332ef4e1db37e5df2a9d18f0"
    );
    assert_eq!(mh.name(), "sha2-256");
    assert_eq!(mh, Multihash::new(DATA, "sha2-256").unwrap());
    assert_eq!(mh, Multihash::new_default(DATA));
  }

  #[test]
  fn sha2_512_vector() {
    let mh = Multihash::new(DATA, "sha2-512").unwrap();
    assert_eq!(mh.prefix_hex(), "1340");
    assert_eq!(
      mh.digest_hex(),
      "a47a2a38acdd9addde6b90e8fb3dc5e6a83bb38babfa0167ceaed8e57bade03c8b\
       1b2ea53776cf2d1c0f5ee3241511e9eabc14f868c4ac63a35e9879ac1977f6"
    );
    assert_eq!(mh.as_bytes().len(), 66);
  }

  #[test]
  fn unknown_name() {
    assert_eq!(
      Multihash::new(DATA, "sha9000"),
      Err(Error::unknown_name("sha9000"))
    );
    assert!(Builder::new("Sha1").is_err());
  }

  #[test]
  fn sha3_alias() {
    let alias = Multihash::new(DATA, "sha3").unwrap();
    let canonical = Multihash::new(DATA, "sha3-512").unwrap();
    assert_eq!(alias, canonical);
    assert_eq!(alias.name(), "sha3-512");
    assert_eq!(alias.prefix_hex(), "1440");
  }

  #[test]
  fn blake2b_prefix_is_three_byte_code() {
    let mh = Multihash::new(DATA, "blake2b-256").unwrap();
    assert_eq!(mh.code(), Code(0xb220));
    assert_eq!(mh.prefix_hex(), "a0e40220");
    assert_eq!(mh.size(), 32);
    let s = Multihash::new(DATA, "blake2s-8").unwrap();
    assert_eq!(s.size(), 1);
    assert_eq!(s.prefix_hex(), "c1e40201");
  }

  #[test]
  fn renderings() {
    let mh = Multihash::new(b"multihash", "sha2-256").unwrap();
    assert_eq!(
      mh.to_base58(),
      "QmYtUc4iTCbbfVSDNKvtQqrfyezPPnFvE33wFmutw9PBBk"
    );
    assert_eq!(
      mh.to_multibase(Base::Base58Btc),
      "zQmYtUc4iTCbbfVSDNKvtQqrfyezPPnFvE33wFmutw9PBBk"
    );
    assert_eq!(base64::decode(mh.to_base64()).unwrap(), mh.as_bytes());
    assert_eq!(mh.to_string(), mh.to_hex());
    assert_eq!(Multihash::from_base58(&mh.to_base58()).unwrap(), mh);
    assert_eq!(mh.to_hex().parse::<Multihash>().unwrap(), mh);
  }

  #[test]
  fn decode_too_short() {
    for len in 0..MIN_LEN {
      assert!(matches!(
        Multihash::decode(&[0x11, 0x14, 0xaa][..len]),
        Err(Error::MalformedInput(_))
      ));
    }
  }

  #[test]
  fn decode_malformed_varints() {
    assert_eq!(
      Multihash::decode(&[0x80, 0x80, 0x80]),
      Err(Error::MalformedVarint {
        field: Field::Code,
        reason: Malformed::Truncated
      })
    );
    assert_eq!(
      Multihash::decode(&[0xff; 12]),
      Err(Error::MalformedVarint {
        field: Field::Code,
        reason: Malformed::Overflow
      })
    );
    assert_eq!(
      Multihash::decode(&[0x11, 0x94, 0x80]),
      Err(Error::MalformedVarint {
        field: Field::Length,
        reason: Malformed::Truncated
      })
    );
  }

  #[test]
  fn decode_unknown_code() {
    assert_eq!(
      Multihash::decode(&[0x99, 0x01, 0x00]),
      Err(Error::unknown_code(Code(0x99)))
    );
  }

  #[test]
  fn decode_length_mismatch() {
    let mut bytes = vec![0x12, 0x10];
    bytes.extend_from_slice(&[0u8; 16]);
    assert_eq!(
      Multihash::decode(&bytes),
      Err(Error::LengthMismatch {
        code: Code::SHA2_256,
        expected: 32,
        declared: 16
      })
    );
    let mut blake = vec![0xa0, 0xe4, 0x02, 0x41];
    blake.extend_from_slice(&[0u8; 65]);
    assert!(matches!(
      Multihash::decode(&blake),
      Err(Error::LengthMismatch { declared: 65, .. })
    ));
  }

  #[test]
  fn decode_truncated_digest() {
    let mh = Multihash::new(DATA, "sha1").unwrap();
    let bytes = mh.as_bytes();
    assert_eq!(
      Multihash::decode(&bytes[..bytes.len() - 1]),
      Err(Error::TruncatedDigest { declared: 20, available: 19 })
    );
    let mut long = bytes.to_vec();
    long.push(0);
    assert_eq!(
      Multihash::decode(&long),
      Err(Error::TruncatedDigest { declared: 20, available: 21 })
    );
  }

  #[test]
  fn parametric_length_comes_from_prefix() {
    // a blake2b-256 code carrying a 16-byte digest
    let mut bytes = vec![0xa0, 0xe4, 0x02, 0x10];
    bytes.extend_from_slice(&[7u8; 16]);
    let mh = Multihash::decode(&bytes).unwrap();
    assert_eq!(mh.size(), 16);
    assert_eq!(mh.name(), "blake2b-256");
    assert_eq!(Multihash::wrap(Code(0xb220), &[7u8; 16]).unwrap(), mh);
  }

  #[test]
  fn from_hex_rejects_bad_characters() {
    assert!(matches!(
      Multihash::from_hex("11148c01zz"),
      Err(Error::MalformedInput(_))
    ));
    assert!(matches!(
      Multihash::from_hex("111"),
      Err(Error::MalformedInput(_))
    ));
  }

  #[test]
  fn from_bytes_keeps_the_buffer() {
    let bytes = Multihash::new(DATA, "keccak-256").unwrap().into_bytes();
    let ptr = bytes.as_ptr();
    let mh = Multihash::from_bytes(bytes).unwrap();
    assert_eq!(mh.as_bytes().as_ptr(), ptr);
  }

  #[test]
  fn wrap_checks_fixed_lengths() {
    let digest = crate::provider::compute(Code::SHA1, DATA, 20).unwrap();
    let wrapped = Multihash::wrap(Code::SHA1, &digest).unwrap();
    assert_eq!(wrapped, Multihash::new(DATA, "sha1").unwrap());
    assert!(matches!(
      Multihash::wrap(Code::SHA1, &digest[..19]),
      Err(Error::LengthMismatch { expected: 20, declared: 19, .. })
    ));
    assert!(Multihash::wrap(Code(0x99), &digest).is_err());
  }

  #[test]
  fn builder_from_code() {
    let builder = Builder::from_code(Code::MURMUR3_32).unwrap();
    assert_eq!(builder.length(), 4);
    assert_eq!(builder.sum(DATA).prefix_hex(), "2304");
    assert_eq!(builder, Builder::new("murmur3").unwrap());
    assert_eq!(builder.sum(DATA).algorithm(), Some(Algorithm::Murmur3_32));
    assert_eq!(Builder::default(), Builder::new("sha2-256").unwrap());
  }

  #[test]
  fn every_registered_code_round_trips() {
    for entry in registry::global().entries() {
      let mh = Multihash::new(DATA, entry.name()).unwrap();
      assert_eq!(mh.size(), entry.length() as usize, "{}", entry.name());
      assert_eq!(Multihash::decode(mh.as_bytes()).unwrap(), mh);
      assert_eq!(Multihash::from_hex(&mh.to_hex()).unwrap(), mh);
    }
  }

  #[quickcheck]
  fn round_trip(code: ACode, data: Vec<u8>) -> bool {
    let mh = Builder::from_code(code.0).unwrap().sum(&data);
    Multihash::decode(mh.as_bytes()) == Ok(mh)
  }

  #[quickcheck]
  fn wire_layout(code: ACode, data: Vec<u8>) -> bool {
    let mh = Builder::from_code(code.0).unwrap().sum(&data);
    let code_len = varint::encoded_len(mh.code().0);
    let size_len = varint::encoded_len(mh.size() as u64);
    mh.prefix().len() == code_len + size_len
      && varint::decode(mh.prefix()) == (mh.code().0, code_len as isize)
      && mh.as_bytes().len() == mh.prefix().len() + mh.size()
  }

  #[quickcheck]
  fn decode_never_panics(bytes: Vec<u8>) -> bool {
    match Multihash::decode(&bytes) {
      Ok(mh) => mh.as_bytes() == &bytes[..],
      Err(_) => true,
    }
  }
}
