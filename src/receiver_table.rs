//! The dynamic, unordered set of tracked receivers shared by the min and
//! preferred flow control strategies.
//!
//! Keyed by `receiver_id` and scanned linearly on every call -- tables are
//! small (one entry per receiver of a single publication), so a `Vec` with
//! swap-remove beats a hash map in both code size and cache behaviour.

use log::{debug, trace};

use crate::clock::NanoTimestamp;

/// Tracking state for one distinct receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiverRecord {
  /// Highest consumed position ever observed from this receiver. Monotonic
  /// non-decreasing across updates.
  pub last_position: i64,
  /// `position + receiver_window` from the most recent SM. Not monotonic --
  /// a shrinking advertised window can move this down.
  pub last_position_plus_window: i64,
  /// Driver-clock timestamp of the most recently accepted SM.
  pub time_of_last_status_message: NanoTimestamp,
  /// The receiver identity as carried on the wire; the table key.
  pub receiver_id: i64,
}

/// An unordered, amortized-growth collection of [`ReceiverRecord`]s.
///
/// Initial capacity matches the source strategy's starting capacity of 2;
/// `Vec`'s own growth policy provides the amortized doubling the original
/// hand-rolled array implemented explicitly.
#[derive(Debug, Clone)]
pub struct ReceiverTable {
  records: Vec<ReceiverRecord>,
}

const INITIAL_CAPACITY: usize = 2;

impl ReceiverTable {
  pub fn new() -> Self {
    ReceiverTable {
      records: Vec::with_capacity(INITIAL_CAPACITY),
    }
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn find_mut(&mut self, receiver_id: i64) -> Option<&mut ReceiverRecord> {
    self.records.iter_mut().find(|r| r.receiver_id == receiver_id)
  }

  /// Mutable iteration used by the shared position-update routine, which
  /// needs to both scan for a matching receiver and fold the min edge in a
  /// single pass.
  pub(crate) fn iter_mut_internal(&mut self) -> impl Iterator<Item = &mut ReceiverRecord> {
    self.records.iter_mut()
  }

  /// Appends a new record. Returns `false` (and leaves the table untouched)
  /// if the table could not grow to accommodate it -- the caller is
  /// expected to treat this the same as a dropped SM, per the flow
  /// control contract's "allocation failures during SM handling are
  /// swallowed" policy.
  pub fn push(&mut self, record: ReceiverRecord) -> bool {
    if self.records.try_reserve(1).is_err() {
      debug!(
        "receiver table failed to grow for receiver_id {}, dropping update",
        record.receiver_id
      );
      return false;
    }
    trace!("admitting receiver_id {} to flow control table", record.receiver_id);
    self.records.push(record);
    true
  }

  /// Evicts every record whose last SM is older than `timeout_ns` relative
  /// to `now`, walking the table so that swap-removal during iteration
  /// cannot skip an entry, and folds `last_position_plus_window` over the
  /// survivors. Returns `None` if every record was evicted (and the table
  /// was non-empty before the call produced no survivors) -- callers
  /// distinguish "no receivers at all" from "this call emptied it" the
  /// same way, both fold to `None`.
  pub fn evict_stale_and_min_edge(&mut self, now: NanoTimestamp, timeout_ns: i64) -> Option<i64> {
    let mut min_edge: Option<i64> = None;
    let mut index = self.records.len();
    while index > 0 {
      index -= 1;
      let stale = (now - self.records[index].time_of_last_status_message) > timeout_ns;
      if stale {
        let evicted = self.records.swap_remove(index);
        debug!(
          "evicting receiver_id {} after {}ns without a status message (timeout {}ns)",
          evicted.receiver_id,
          now - evicted.time_of_last_status_message,
          timeout_ns
        );
      } else {
        let edge = self.records[index].last_position_plus_window;
        min_edge = Some(min_edge.map_or(edge, |m: i64| m.min(edge)));
      }
    }
    min_edge
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(id: i64, pos: i64, window: i64, t: i64) -> ReceiverRecord {
    ReceiverRecord {
      last_position: pos,
      last_position_plus_window: pos + window,
      time_of_last_status_message: NanoTimestamp(t),
      receiver_id: id,
    }
  }

  #[test]
  fn push_and_find() {
    let mut table = ReceiverTable::new();
    assert!(table.push(record(1, 100, 50, 0)));
    assert_eq!(table.len(), 1);
    assert_eq!(table.find_mut(1).unwrap().last_position, 100);
    assert!(table.find_mut(2).is_none());
  }

  #[test_log::test]
  fn eviction_removes_only_stale_receivers() {
    let mut table = ReceiverTable::new();
    table.push(record(1, 100, 50, 0)); // stale
    table.push(record(2, 200, 10, 1_000_000_000)); // fresh
    let min_edge = table.evict_stale_and_min_edge(NanoTimestamp(2_000_000_000), 1_000_000_000);
    assert_eq!(table.len(), 1);
    assert_eq!(table.find_mut(2).unwrap().receiver_id, 2);
    assert_eq!(min_edge, Some(210));
  }

  #[test]
  fn evicting_everything_yields_none() {
    let mut table = ReceiverTable::new();
    table.push(record(1, 100, 50, 0));
    let min_edge = table.evict_stale_and_min_edge(NanoTimestamp(5_000_000_000), 1_000_000_000);
    assert_eq!(min_edge, None);
    assert!(table.is_empty());
  }
}
