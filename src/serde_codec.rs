//! `serde` support: a `Multihash` serializes as its encoded bytes and is
//! validated again when deserialized.

use crate::{
  multihash::Multihash,
  registry::Code,
};
use core::fmt;
use serde::{
  de,
  Deserialize,
  Deserializer,
  Serialize,
  Serializer,
};

impl Serialize for Multihash {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where S: Serializer {
    serializer.serialize_bytes(self.as_bytes())
  }
}

struct BytesVisitor;

impl<'de> de::Visitor<'de> for BytesVisitor {
  type Value = Multihash;

  fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt.write_str("multihash bytes")
  }

  fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
  where E: de::Error {
    Multihash::decode(v).map_err(E::custom)
  }

  fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E>
  where E: de::Error {
    Multihash::from_bytes(v).map_err(E::custom)
  }

  fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
  where A: de::SeqAccess<'de> {
    let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
    while let Some(byte) = seq.next_element::<u8>()? {
      bytes.push(byte);
    }
    self.visit_byte_buf(bytes)
  }
}

impl<'de> Deserialize<'de> for Multihash {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where D: Deserializer<'de> {
    deserializer.deserialize_bytes(BytesVisitor)
  }
}

impl Serialize for Code {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where S: Serializer {
    serializer.serialize_u64(self.0)
  }
}

impl<'de> Deserialize<'de> for Code {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where D: Deserializer<'de> {
    u64::deserialize(deserializer).map(Code)
  }
}
