//! The max flow control strategy: stateless, fastest-receiver-sets-the-pace.

use crate::{clock::NanoTimestamp, position::compute_position, status_message::StatusMessageHeader};

/// `on_idle` for the max strategy never advances the limit on its own; it
/// has no receivers to consult.
pub fn on_idle(snd_lmt: i64) -> i64 {
  snd_lmt
}

/// `on_status_message` for the max strategy: the send limit becomes
/// whichever is larger of the current limit and this SM's window edge.
pub fn on_status_message(
  sm: &StatusMessageHeader,
  snd_lmt: i64,
  initial_term_id: i32,
  position_bits_to_shift: u32,
  _now: NanoTimestamp,
) -> i64 {
  let position = compute_position(
    sm.consumption_term_id,
    sm.consumption_term_offset,
    position_bits_to_shift,
    initial_term_id,
  );
  let window_edge = position + i64::from(sm.receiver_window);
  snd_lmt.max(window_edge)
}
