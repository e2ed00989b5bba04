//! The flow control strategy contract and its three concrete strategies.
//!
//! The strategy set is closed (max, min, preferred) and the core does not
//! need open-ended dynamic dispatch, so `Strategy` is a tagged enum rather
//! than a trait object -- this avoids an indirection and a heap allocation
//! per publication for the common (max, stateless) case.
//!
//! There is no explicit `fini` method: state (the receiver table, for min
//! and preferred) is released when a `Strategy` is dropped, which is how
//! idiomatic Rust expresses "release resources exactly once, no double
//! free" instead of a manually-invoked teardown call.

pub mod max;
pub mod min;
pub mod preferred;

pub use min::MinState;
pub use preferred::PreferredState;

use crate::{clock::NanoTimestamp, status_message::StatusMessageHeader};

/// One flow control strategy instance, owned exclusively by a publication.
#[derive(Debug, Clone)]
pub enum Strategy {
  Max,
  Min(MinState),
  Preferred(PreferredState),
}

impl Strategy {
  /// Constructs the max strategy. Stateless, infallible.
  pub fn max() -> Self {
    Strategy::Max
  }

  /// Constructs the min strategy with `timeout_ns_from_uri` (0 meaning
  /// "use the process default").
  pub fn min(timeout_ns_from_uri: u64) -> Self {
    Strategy::Min(MinState::new(timeout_ns_from_uri))
  }

  /// Constructs the preferred strategy for `receiver_tag`, with
  /// `timeout_ns_from_uri` (0 meaning "use the process default").
  pub fn preferred(timeout_ns_from_uri: u64, receiver_tag: i32) -> Self {
    Strategy::Preferred(PreferredState::new(timeout_ns_from_uri, receiver_tag))
  }

  /// Called periodically by the driver tick. Never blocks, never fails.
  pub fn on_idle(&mut self, now: NanoTimestamp, snd_lmt: i64, snd_pos: i64, is_end_of_stream: bool) -> i64 {
    let _ = (snd_pos, is_end_of_stream); // consulted by congestion-aware strategies outside this core
    match self {
      Strategy::Max => max::on_idle(snd_lmt),
      Strategy::Min(state) => min::on_idle(state, now, snd_lmt),
      Strategy::Preferred(state) => preferred::on_idle(state, now, snd_lmt),
    }
  }

  /// Called on every inbound Status Message. Never blocks, never fails.
  pub fn on_status_message(
    &mut self,
    sm: &StatusMessageHeader,
    snd_lmt: i64,
    initial_term_id: i32,
    position_bits_to_shift: u32,
    now: NanoTimestamp,
  ) -> i64 {
    match self {
      Strategy::Max => max::on_status_message(sm, snd_lmt, initial_term_id, position_bits_to_shift, now),
      Strategy::Min(state) => {
        min::on_status_message(state, sm, snd_lmt, initial_term_id, position_bits_to_shift, now)
      }
      Strategy::Preferred(state) => {
        preferred::on_status_message(state, sm, snd_lmt, initial_term_id, position_bits_to_shift, now)
      }
    }
  }
}
