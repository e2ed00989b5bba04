//! Nanosecond timestamp newtype used throughout the flow control core.
//!
//! The driver's wall clock is monotonic; strategies never read it directly,
//! they only ever compare a `NanoTimestamp` they are handed against one they
//! stored earlier.

use std::ops::{Add, Sub};

/// A driver-clock timestamp, nanoseconds since an arbitrary epoch.
///
/// Wrapping the raw `i64` keeps `now_ns` from being silently swapped for
/// `snd_lmt` or a position at a call site -- all three are plain `i64` in
/// the wire protocol this core descends from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NanoTimestamp(pub i64);

impl NanoTimestamp {
  pub const ZERO: NanoTimestamp = NanoTimestamp(0);

  pub fn as_nanos(self) -> i64 {
    self.0
  }
}

impl From<i64> for NanoTimestamp {
  fn from(v: i64) -> Self {
    NanoTimestamp(v)
  }
}

impl Add<i64> for NanoTimestamp {
  type Output = NanoTimestamp;
  fn add(self, rhs: i64) -> NanoTimestamp {
    NanoTimestamp(self.0 + rhs)
  }
}

impl Sub for NanoTimestamp {
  type Output = i64;
  fn sub(self, rhs: NanoTimestamp) -> i64 {
    self.0 - rhs.0
  }
}
