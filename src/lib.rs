//! # multihash-codec
//!
//! Self-describing digests: `varint(code) || varint(length) || digest`.
//!
//! ```
//! use multihash_codec::{Code, Multihash};
//!
//! let mh = Multihash::new(b"this is some data to hash", "sha1").unwrap();
//! assert_eq!(mh.code(), Code::SHA1);
//! assert_eq!(mh.prefix_hex(), "1114");
//! assert_eq!(Multihash::decode(mh.as_bytes()).unwrap(), mh);
//! ```
#![deny(
  clippy::missing_errors_doc,
  clippy::missing_panics_doc,
  clippy::missing_safety_doc
)]

pub mod error;
pub mod multihash;
pub mod provider;
pub mod registry;
pub mod varint;

#[cfg(any(test, feature = "arb"))]
pub mod arb;
#[cfg(feature = "serde-codec")]
mod serde_codec;

pub use self::{
  error::{
    Error,
    Result,
  },
  multihash::{
    Builder,
    Multihash,
  },
  provider::Algorithm,
  registry::{
    Code,
    Registry,
  },
};
