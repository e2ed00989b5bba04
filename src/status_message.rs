//! The subset of the Status Message wire header the flow control core reads.
//!
//! Full SM decoding (NAK ranges, application-specific data beyond the
//! receiver tag) is explicitly out of scope for this core; only the fields
//! strategies consume are modelled here. The teacher driver decodes its
//! RTPS submessages with `speedy`'s derive machinery
//! (`crate::rtps::submessage::Gap`), but that serves the *full* wire
//! protocol this crate deliberately does not implement -- the handful of
//! fixed-width integers read here are simpler to decode by hand than to
//! pull in a serialization framework for.

use log::warn;

use crate::error::FlowControlError;

/// Length in bytes of the fixed fields this core reads from an SM.
const FIXED_LENGTH: usize = 4 + 4 + 4 + 8;

/// The receiver tag extension, when present, is one `i32` immediately
/// following the fixed fields.
const RECEIVER_TAG_LENGTH: usize = 4;

/// Decoded Status Message fields the flow control core consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMessageHeader {
  pub consumption_term_id: i32,
  pub consumption_term_offset: i32,
  /// Untrusted wire value; the core does not clamp negative windows, see
  /// the design notes on negative `receiver_window`.
  pub receiver_window: i32,
  pub receiver_id: i64,
  /// Absent when the sending receiver did not attach a tag. A best-effort
  /// field: its absence is legal and must not be treated as an error.
  pub receiver_tag: Option<i32>,
}

impl StatusMessageHeader {
  /// Decodes a Status Message header from `bytes`, which may be either
  /// little- or big-endian on the wire depending on the sender's host
  /// order; `big_endian` selects which.
  pub fn decode(bytes: &[u8], big_endian: bool) -> Result<Self, FlowControlError> {
    if bytes.len() < FIXED_LENGTH {
      warn!(
        "status message too short to decode: {} bytes, need at least {}",
        bytes.len(),
        FIXED_LENGTH
      );
      return Err(FlowControlError::InvalidArgument {
        field: "sm".to_string(),
        options: format!("{} bytes", bytes.len()),
      });
    }

    let read_i32 = |slice: &[u8]| -> i32 {
      let array: [u8; 4] = slice.try_into().expect("slice is exactly 4 bytes");
      if big_endian {
        i32::from_be_bytes(array)
      } else {
        i32::from_le_bytes(array)
      }
    };
    let read_i64 = |slice: &[u8]| -> i64 {
      let array: [u8; 8] = slice.try_into().expect("slice is exactly 8 bytes");
      if big_endian {
        i64::from_be_bytes(array)
      } else {
        i64::from_le_bytes(array)
      }
    };

    let consumption_term_id = read_i32(&bytes[0..4]);
    let consumption_term_offset = read_i32(&bytes[4..8]);
    let receiver_window = read_i32(&bytes[8..12]);
    let receiver_id = read_i64(&bytes[12..20]);

    let receiver_tag = if bytes.len() >= FIXED_LENGTH + RECEIVER_TAG_LENGTH {
      Some(read_i32(&bytes[FIXED_LENGTH..FIXED_LENGTH + RECEIVER_TAG_LENGTH]))
    } else {
      None
    };

    Ok(StatusMessageHeader {
      consumption_term_id,
      consumption_term_offset,
      receiver_window,
      receiver_id,
      receiver_tag,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn encode_le(term_id: i32, offset: i32, window: i32, receiver_id: i64, tag: Option<i32>) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&term_id.to_le_bytes());
    v.extend_from_slice(&offset.to_le_bytes());
    v.extend_from_slice(&window.to_le_bytes());
    v.extend_from_slice(&receiver_id.to_le_bytes());
    if let Some(t) = tag {
      v.extend_from_slice(&t.to_le_bytes());
    }
    v
  }

  #[test]
  fn decodes_fixed_fields_without_tag() {
    let bytes = encode_le(0, 4096, 65536, 1, None);
    let sm = StatusMessageHeader::decode(&bytes, false).unwrap();
    assert_eq!(sm.consumption_term_id, 0);
    assert_eq!(sm.consumption_term_offset, 4096);
    assert_eq!(sm.receiver_window, 65536);
    assert_eq!(sm.receiver_id, 1);
    assert_eq!(sm.receiver_tag, None);
  }

  #[test]
  fn decodes_optional_receiver_tag() {
    let bytes = encode_le(0, 4096, 65536, 42, Some(7));
    let sm = StatusMessageHeader::decode(&bytes, false).unwrap();
    assert_eq!(sm.receiver_tag, Some(7));
  }

  #[test]
  fn big_endian_round_trip() {
    let mut v = Vec::new();
    v.extend_from_slice(&0i32.to_be_bytes());
    v.extend_from_slice(&4096i32.to_be_bytes());
    v.extend_from_slice(&65536i32.to_be_bytes());
    v.extend_from_slice(&1i64.to_be_bytes());
    let sm = StatusMessageHeader::decode(&v, true).unwrap();
    assert_eq!(sm.consumption_term_offset, 4096);
  }

  #[test]
  fn decodes_a_fixed_wire_capture() {
    // term_id=0, term_offset=4096, window=65536, receiver_id=1, big-endian.
    let bytes = hex_literal::hex!("00000000 00001000 00010000 0000000000000001");
    let sm = StatusMessageHeader::decode(&bytes, true).unwrap();
    assert_eq!(sm.consumption_term_offset, 4096);
    assert_eq!(sm.receiver_window, 65536);
    assert_eq!(sm.receiver_id, 1);
  }

  #[test]
  fn too_short_is_an_error() {
    let bytes = vec![0u8; 4];
    assert!(StatusMessageHeader::decode(&bytes, false).is_err());
  }
}
