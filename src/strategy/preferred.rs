//! The preferred (tagged) flow control strategy: a min strategy that only
//! admits receivers whose SM carries a matching receiver tag, with a
//! bootstrap rule so a publication doesn't stall before any tagged
//! receiver has spoken up.

use log::trace;

use super::min::{self, apply_position_update, MinState};
use crate::{clock::NanoTimestamp, config, position::compute_position, status_message::StatusMessageHeader};

/// Wraps [`MinState`] with the operator-configured tag to admit receivers
/// by, composing behaviour through delegation rather than inheritance.
#[derive(Debug, Clone)]
pub struct PreferredState {
  pub(crate) min: MinState,
  pub(crate) receiver_tag: i32,
}

impl PreferredState {
  pub fn new(timeout_ns_from_uri: u64, receiver_tag: i32) -> Self {
    let receiver_timeout_ns = if timeout_ns_from_uri != 0 {
      timeout_ns_from_uri as i64
    } else {
      config::preferred_default_receiver_timeout_ns()
    };
    PreferredState {
      min: MinState {
        receivers: crate::receiver_table::ReceiverTable::new(),
        receiver_timeout_ns,
      },
      receiver_tag,
    }
  }

  pub fn has_any_preferred_receiver(&self) -> bool {
    !self.min.receivers.is_empty()
  }
}

/// `on_idle` delegates entirely to min's eviction sweep: an evicted
/// preferred receiver simply returns this strategy to bootstrap mode.
pub fn on_idle(state: &mut PreferredState, now: NanoTimestamp, snd_lmt: i64) -> i64 {
  min::on_idle(&mut state.min, now, snd_lmt)
}

/// `on_status_message`: decodes the optional tag, and either runs the
/// bootstrap rule (no preferred receiver known yet, and this SM isn't one
/// either) or the shared min update routine.
pub fn on_status_message(
  state: &mut PreferredState,
  sm: &StatusMessageHeader,
  snd_lmt: i64,
  initial_term_id: i32,
  position_bits_to_shift: u32,
  now: NanoTimestamp,
) -> i64 {
  let position = compute_position(
    sm.consumption_term_id,
    sm.consumption_term_offset,
    position_bits_to_shift,
    initial_term_id,
  );
  let window_length = i64::from(sm.receiver_window);
  let is_from_preferred = sm.receiver_tag == Some(state.receiver_tag);

  if !is_from_preferred && !state.has_any_preferred_receiver() {
    trace!(
      "preferred flow control: bootstrapping on non-preferred receiver_id {} (no preferred receiver registered yet)",
      sm.receiver_id
    );
    let position_plus_window = position + window_length;
    return snd_lmt.max(position_plus_window);
  }

  apply_position_update(
    &mut state.min,
    position,
    window_length,
    sm.receiver_id,
    snd_lmt,
    now,
    is_from_preferred,
  )
}
