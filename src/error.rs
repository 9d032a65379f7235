use crate::registry::Code;
use core::fmt;
use thiserror::Error;

/// Which prefix field a varint failure was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
  Code,
  Length,
}

impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Field::Code => f.write_str("code"),
      Field::Length => f.write_str("length"),
    }
  }
}

/// How a varint failed to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Malformed {
  /// The input ended before a terminating byte.
  Truncated,
  /// The value does not fit in 64 bits.
  Overflow,
}

impl fmt::Display for Malformed {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Malformed::Truncated => f.write_str("input ends mid-varint"),
      Malformed::Overflow => f.write_str("value exceeds 64 bits"),
    }
  }
}

/// A hash function that the registry does not know, either by its name or
/// by its numeric code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unknown {
  Name(String),
  Code(Code),
}

impl fmt::Display for Unknown {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Unknown::Name(name) => write!(f, "`{}`", name),
      Unknown::Code(code) => write!(f, "code {}", code),
    }
  }
}

/// Errors produced while building, wrapping or decoding a multihash.
///
/// No variant is ever accompanied by a partially built value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
  #[error("unknown hash function {0}")]
  UnknownFunction(Unknown),

  #[error("malformed varint in the {field} field: {reason}")]
  MalformedVarint { field: Field, reason: Malformed },

  #[error("malformed input: {0}")]
  MalformedInput(String),

  #[error(
    "length mismatch for {code}: expected {expected} bytes, got {declared}"
  )]
  LengthMismatch { code: Code, expected: u32, declared: u64 },

  #[error(
    "truncated digest: prefix declares {declared} bytes, {available} available"
  )]
  TruncatedDigest { declared: u64, available: usize },
}

impl Error {
  pub(crate) fn unknown_name(name: &str) -> Self {
    Error::UnknownFunction(Unknown::Name(name.to_owned()))
  }

  pub(crate) fn unknown_code(code: Code) -> Self {
    Error::UnknownFunction(Unknown::Code(code))
  }
}

pub type Result<T> = core::result::Result<T, Error>;
