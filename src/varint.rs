//! Unsigned LEB128 varints, as used by every multiformats prefix.
//!
//! Encoding goes through `unsigned_varint`. Decoding is done here because
//! callers need the three-way `(value, consumed)` contract: a positive
//! `consumed` on success, `0` when the input ends in the middle of a varint,
//! and a negative `consumed` when the value does not fit in 64 bits.

use unsigned_varint::{
  decode as varint_decode,
  encode as varint_encode,
};

/// Longest encoding of a `u64`: 64 bits in 7-bit groups.
pub const MAX_LEN: usize = 10;

/// A stack buffer large enough for any encoded `u64`.
pub type Buffer = [u8; MAX_LEN];

pub fn buffer() -> Buffer { varint_encode::u64_buffer() }

/// Encodes `value` as a minimal varint. Always at least one byte.
pub fn encode(value: u64) -> Vec<u8> {
  let mut buf = buffer();
  encode_into(value, &mut buf).to_vec()
}

/// Encodes `value` into `buf`, returning the written prefix of `buf`.
pub fn encode_into(value: u64, buf: &mut Buffer) -> &[u8] {
  varint_encode::u64(value, buf)
}

/// Number of bytes `encode(value)` produces.
pub fn encoded_len(value: u64) -> usize {
  let bits = 64 - value.leading_zeros() as usize;
  if bits == 0 { 1 } else { (bits + 6) / 7 }
}

/// Decodes the varint at the start of `bytes`.
///
/// Returns `(value, consumed)`:
/// - `consumed > 0`: success, `consumed` bytes were read;
/// - `consumed == 0`: `bytes` ended before a terminating byte (`value` is 0);
/// - `consumed < 0`: overflow at byte `-consumed - 1` (`value` is 0).
pub fn decode(bytes: &[u8]) -> (u64, isize) {
  let mut x: u64 = 0;
  let mut shift: u32 = 0;
  for (i, &b) in bytes.iter().enumerate() {
    if i == MAX_LEN {
      return (0, -(i as isize + 1));
    }
    if varint_decode::is_last(b) {
      // the tenth group only has room for the 64th bit
      if i == MAX_LEN - 1 && b > 1 {
        return (0, -(i as isize + 1));
      }
      return (x | u64::from(b) << shift, i as isize + 1);
    }
    x |= u64::from(b & 0x7f) << shift;
    shift += 7;
  }
  (0, 0)
}
