//! `quickcheck` generators for registered codes and well-formed multihashes.

use crate::{
  multihash::{
    Builder,
    Multihash,
  },
  registry::{
    self,
    Code,
  },
};
use quickcheck::{
  Arbitrary,
  Gen,
};

/// A code drawn uniformly from the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ACode(pub Code);

impl Arbitrary for ACode {
  fn arbitrary(g: &mut Gen) -> Self {
    let codes: Vec<Code> =
      registry::global().entries().map(|entry| entry.code()).collect();
    ACode(*g.choose(&codes).unwrap_or(&Code::SHA2_256))
  }
}

impl Arbitrary for Multihash {
  fn arbitrary(g: &mut Gen) -> Self {
    let code = ACode::arbitrary(g).0;
    let data: Vec<u8> = Arbitrary::arbitrary(g);
    match Builder::from_code(code) {
      Ok(builder) => builder.sum(&data),
      Err(_) => Multihash::new_default(&data),
    }
  }
}
