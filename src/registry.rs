//! The hash function code table.
//!
//! Fixed codes map to one algorithm and one digest length. The blake2
//! families occupy contiguous code ranges in which a member's digest length
//! is its offset from the start of the range plus one; their entries are
//! synthesized when the registry is first built.

use crate::provider::Algorithm;
use core::fmt;
use log::debug;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

/// A hash function identifier, the first varint of a multihash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(pub u64);

impl Code {
  pub const BLAKE2B_MAX: Code = Code(0xb240);
  pub const BLAKE2B_MIN: Code = Code(0xb201);
  pub const BLAKE2S_MAX: Code = Code(0xb260);
  pub const BLAKE2S_MIN: Code = Code(0xb241);
  pub const DBL_SHA2_256: Code = Code(0x56);
  pub const KECCAK_224: Code = Code(0x1a);
  pub const KECCAK_256: Code = Code(0x1b);
  pub const KECCAK_384: Code = Code(0x1c);
  pub const KECCAK_512: Code = Code(0x1d);
  pub const MURMUR3_32: Code = Code(0x23);
  pub const SHA1: Code = Code(0x11);
  pub const SHA2_256: Code = Code(0x12);
  pub const SHA2_512: Code = Code(0x13);
  /// `sha3` is an alias of `sha3-512`.
  pub const SHA3: Code = Code::SHA3_512;
  pub const SHA3_224: Code = Code(0x17);
  pub const SHA3_256: Code = Code(0x16);
  pub const SHA3_384: Code = Code(0x15);
  pub const SHA3_512: Code = Code(0x14);
  pub const SHAKE_128: Code = Code(0x18);
  pub const SHAKE_256: Code = Code(0x19);
}

impl From<u64> for Code {
  fn from(code: u64) -> Self { Code(code) }
}

impl From<Code> for u64 {
  fn from(code: Code) -> Self { code.0 }
}

impl fmt::Display for Code {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:#x}", self.0)
  }
}

/// A contiguous run of codes for one variable-output hash family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Range {
  pub family: &'static str,
  pub min: Code,
  pub max: Code,
  pub algorithm: Algorithm,
}

impl Range {
  pub fn contains(&self, code: Code) -> bool {
    self.min <= code && code <= self.max
  }

  /// Canonical name of the member with a `length`-byte digest.
  pub fn name_for(&self, length: u32) -> String {
    format!("{}-{}", self.family, length * 8)
  }

  pub fn codes(&self) -> impl Iterator<Item = Code> {
    (self.min.0..=self.max.0).map(Code)
  }
}

pub const BLAKE2B: Range = Range {
  family: "blake2b",
  min: Code::BLAKE2B_MIN,
  max: Code::BLAKE2B_MAX,
  algorithm: Algorithm::Blake2b,
};

pub const BLAKE2S: Range = Range {
  family: "blake2s",
  min: Code::BLAKE2S_MIN,
  max: Code::BLAKE2S_MAX,
  algorithm: Algorithm::Blake2s,
};

pub static RANGES: [Range; 2] = [BLAKE2B, BLAKE2S];

/// Digest length in bytes of `code` within `range`, or `None` if `code` is
/// outside the range.
pub fn length_for(code: Code, range: &Range) -> Option<u32> {
  if range.contains(code) {
    Some((code.0 - range.min.0 + 1) as u32)
  }
  else {
    None
  }
}

const FIXED: [(Code, &str, u32, Algorithm); 15] = [
  (Code::SHA1, "sha1", 20, Algorithm::Sha1),
  (Code::SHA2_256, "sha2-256", 32, Algorithm::Sha2_256),
  (Code::SHA2_512, "sha2-512", 64, Algorithm::Sha2_512),
  (Code::SHA3_224, "sha3-224", 28, Algorithm::Sha3_224),
  (Code::SHA3_256, "sha3-256", 32, Algorithm::Sha3_256),
  (Code::SHA3_384, "sha3-384", 48, Algorithm::Sha3_384),
  (Code::SHA3_512, "sha3-512", 64, Algorithm::Sha3_512),
  (Code::DBL_SHA2_256, "dbl-sha2-256", 32, Algorithm::DblSha2_256),
  (Code::MURMUR3_32, "murmur3", 4, Algorithm::Murmur3_32),
  (Code::KECCAK_224, "keccak-224", 28, Algorithm::Keccak224),
  (Code::KECCAK_256, "keccak-256", 32, Algorithm::Keccak256),
  (Code::KECCAK_384, "keccak-384", 48, Algorithm::Keccak384),
  (Code::KECCAK_512, "keccak-512", 64, Algorithm::Keccak512),
  (Code::SHAKE_128, "shake-128", 32, Algorithm::Shake128),
  (Code::SHAKE_256, "shake-256", 64, Algorithm::Shake256),
];

/// Extra names that resolve to a fixed code but are never returned by
/// [`Registry::name_of`].
const ALIASES: [(&str, Code); 2] =
  [("sha256", Code::SHA2_256), ("sha3", Code::SHA3)];

/// How an entry's digest length is determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
  /// The length is a constant of the code table.
  Fixed,
  /// The length is derived from the code's position in the range.
  Parametric(&'static Range),
}

/// One row of the code table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
  code: Code,
  name: String,
  length: u32,
  algorithm: Algorithm,
  kind: Kind,
}

impl Entry {
  pub fn code(&self) -> Code { self.code }

  pub fn name(&self) -> &str { &self.name }

  /// Default digest length in bytes.
  pub fn length(&self) -> u32 { self.length }

  pub fn algorithm(&self) -> Algorithm { self.algorithm }

  pub fn kind(&self) -> Kind { self.kind }

  pub fn is_fixed(&self) -> bool { self.kind == Kind::Fixed }
}

/// The immutable code table. Obtain the process-wide instance with
/// [`global`].
#[derive(Debug)]
pub struct Registry {
  entries: BTreeMap<Code, Entry>,
  by_name: BTreeMap<String, Code>,
}

impl Registry {
  fn build() -> Self {
    let mut registry =
      Registry { entries: BTreeMap::new(), by_name: BTreeMap::new() };
    for (code, name, length, algorithm) in FIXED.iter().copied() {
      registry.insert(Entry {
        code,
        name: name.to_owned(),
        length,
        algorithm,
        kind: Kind::Fixed,
      });
    }
    for range in RANGES.iter() {
      for code in range.codes() {
        if let Some(length) = length_for(code, range) {
          registry.insert(Entry {
            code,
            name: range.name_for(length),
            length,
            algorithm: range.algorithm,
            kind: Kind::Parametric(range),
          });
        }
      }
    }
    for (alias, code) in ALIASES.iter() {
      registry.by_name.insert((*alias).to_owned(), *code);
    }
    debug!(
      "built hash function registry: {} codes, {} names",
      registry.entries.len(),
      registry.by_name.len()
    );
    registry
  }

  fn insert(&mut self, entry: Entry) {
    self.by_name.insert(entry.name.clone(), entry.code);
    self.entries.insert(entry.code, entry);
  }

  /// Exact, case-sensitive lookup of a function name or alias.
  pub fn resolve_by_name(&self, name: &str) -> Option<Code> {
    self.by_name.get(name).copied()
  }

  pub fn entry(&self, code: Code) -> Option<&Entry> { self.entries.get(&code) }

  pub fn entry_by_name(&self, name: &str) -> Option<&Entry> {
    self.resolve_by_name(name).and_then(|code| self.entry(code))
  }

  pub fn default_length(&self, code: Code) -> Option<u32> {
    self.entry(code).map(Entry::length)
  }

  /// Canonical name of `code`. Aliases are never returned.
  pub fn name_of(&self, code: Code) -> Option<&str> {
    self.entry(code).map(Entry::name)
  }

  pub fn contains(&self, code: Code) -> bool {
    self.entries.contains_key(&code)
  }

  /// All entries in ascending code order.
  pub fn entries(&self) -> impl Iterator<Item = &Entry> {
    self.entries.values()
  }
}

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Builds the process-wide registry if it does not exist yet. Concurrent
/// first callers block until a single build completes.
pub fn initialize() -> &'static Registry {
  REGISTRY.get_or_init(Registry::build)
}

/// The process-wide registry, built on first use.
pub fn global() -> &'static Registry { initialize() }

pub fn resolve_by_name(name: &str) -> Option<Code> {
  global().resolve_by_name(name)
}

pub fn default_length(code: Code) -> Option<u32> {
  global().default_length(code)
}

pub fn name_of(code: Code) -> Option<&'static str> { global().name_of(code) }
