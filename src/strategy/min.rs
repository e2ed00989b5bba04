//! The min flow control strategy: send limit tracks the slowest tracked
//! receiver, with timeout-based eviction of stale ones.

use log::trace;

use crate::{
  clock::NanoTimestamp,
  config,
  position::compute_position,
  receiver_table::{ReceiverRecord, ReceiverTable},
  status_message::StatusMessageHeader,
};

/// State shared by the min strategy and embedded by the preferred strategy.
#[derive(Debug, Clone)]
pub struct MinState {
  pub(crate) receivers: ReceiverTable,
  pub(crate) receiver_timeout_ns: i64,
}

impl MinState {
  /// Builds state using `timeout_ns` from the URI's `t:` field if nonzero,
  /// otherwise the process-wide min-strategy default.
  pub fn new(timeout_ns_from_uri: u64) -> Self {
    let receiver_timeout_ns = if timeout_ns_from_uri != 0 {
      timeout_ns_from_uri as i64
    } else {
      config::min_default_receiver_timeout_ns()
    };
    MinState {
      receivers: ReceiverTable::new(),
      receiver_timeout_ns,
    }
  }

  pub fn receiver_count(&self) -> usize {
    self.receivers.len()
  }
}

/// The routine shared by min's and preferred's `on_status_message`: walk the
/// table once, update or admit the reporting receiver if it is "from
/// preferred" (for plain min, every SM qualifies), and fold the minimum
/// `last_position_plus_window` across survivors.
pub(crate) fn apply_position_update(
  state: &mut MinState,
  position: i64,
  window_length: i64,
  receiver_id: i64,
  snd_lmt: i64,
  now: NanoTimestamp,
  is_from_preferred: bool,
) -> i64 {
  let mut is_existing = false;
  let mut min_position = i64::MAX;

  for receiver in state.receivers_mut_for_update() {
    if is_from_preferred && receiver_id == receiver.receiver_id {
      receiver.last_position = receiver.last_position.max(position);
      receiver.last_position_plus_window = position + window_length;
      receiver.time_of_last_status_message = now;
      is_existing = true;
    }
    min_position = min_position.min(receiver.last_position_plus_window);
  }

  if is_from_preferred && !is_existing {
    let was_empty = state.receivers.is_empty();
    let new_record = ReceiverRecord {
      last_position: position,
      last_position_plus_window: position + window_length,
      time_of_last_status_message: now,
      receiver_id,
    };
    if state.receivers.push(new_record) {
      min_position = min_position.min(position + window_length);
    } else if was_empty {
      return snd_lmt;
    }
  }

  snd_lmt.max(min_position)
}

impl MinState {
  fn receivers_mut_for_update(&mut self) -> impl Iterator<Item = &mut ReceiverRecord> {
    self.receivers.iter_mut_internal()
  }
}

/// `on_idle`: evict receivers that have gone silent past the timeout and
/// return the minimum edge among the survivors, or `snd_lmt` unchanged if
/// none remain.
pub fn on_idle(state: &mut MinState, now: NanoTimestamp, snd_lmt: i64) -> i64 {
  match state.receivers.evict_stale_and_min_edge(now, state.receiver_timeout_ns) {
    Some(min_edge) => min_edge,
    None => snd_lmt,
  }
}

/// `on_status_message`: every SM is treated as coming from a tracked
/// receiver.
pub fn on_status_message(
  state: &mut MinState,
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
  trace!(
    "min flow control: receiver_id {} at position {}, window {}",
    sm.receiver_id,
    position,
    sm.receiver_window
  );
  apply_position_update(
    state,
    position,
    i64::from(sm.receiver_window),
    sm.receiver_id,
    snd_lmt,
    now,
    true,
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sm(term_id: i32, offset: i32, window: i32, receiver_id: i64) -> StatusMessageHeader {
    StatusMessageHeader {
      consumption_term_id: term_id,
      consumption_term_offset: offset,
      receiver_window: window,
      receiver_id,
      receiver_tag: None,
    }
  }

  #[test]
  fn two_receivers_send_limit_is_the_slower_ones_edge() {
    let mut state = MinState::new(10_000_000_000);
    on_status_message(&mut state, &sm(0, 0, 100_000, 1), 0, 0, 16, NanoTimestamp(0));
    on_status_message(&mut state, &sm(0, 0, 80_000, 2), 0, 0, 16, NanoTimestamp(0));
    let result = on_idle(&mut state, NanoTimestamp(1), 0);
    assert_eq!(result, 80_000);
  }

  #[test]
  fn stale_receiver_is_evicted_and_limit_falls_back_to_snd_lmt() {
    let mut state = MinState::new(1_000_000_000);
    on_status_message(&mut state, &sm(0, 0, 1000, 1), 0, 0, 16, NanoTimestamp(0));
    let result = on_idle(&mut state, NanoTimestamp(2_000_000_000), 42);
    assert_eq!(result, 42);
    assert_eq!(state.receiver_count(), 0);
  }

  #[test]
  fn last_position_is_monotonic_even_if_window_shrinks() {
    let mut state = MinState::new(10_000_000_000);
    on_status_message(&mut state, &sm(0, 1000, 500, 1), 0, 0, 16, NanoTimestamp(0));
    // Receiver reports a lower position with a bigger window: last_position
    // must not move backward even though last_position_plus_window may.
    on_status_message(&mut state, &sm(0, 500, 100, 1), 0, 0, 16, NanoTimestamp(1));
    let receiver = state.receivers.find_mut(1).unwrap();
    assert_eq!(receiver.last_position, 1000);
    assert_eq!(receiver.last_position_plus_window, 600);
  }

  #[test]
  fn env_default_applies_when_uri_gives_no_timeout() {
    let state = MinState::new(0);
    assert_eq!(state.receiver_timeout_ns, config::min_default_receiver_timeout_ns());
  }

  #[test]
  fn uri_timeout_overrides_default() {
    let state = MinState::new(500_000_000);
    assert_eq!(state.receiver_timeout_ns, 500_000_000);
  }
}
