//! Term-buffer position arithmetic.
//!
//! This is the one pure helper the flow control core treats as an external
//! collaborator (spec: term buffer descriptor owns the real implementation,
//! accounting for term length and wrap). The core only ever needs the
//! position of a `(term_id, term_offset)` pair relative to the stream's
//! `initial_term_id`, so a single free function covers the contract without
//! pulling in the rest of the log-buffer descriptor machinery.

/// Computes the absolute stream position of `(term_id, term_offset)`.
///
/// `position_bits_to_shift` is `log2(term_length)`; multiplying the
/// (possibly negative, if terms wrapped past `i32::MAX`) term count by the
/// term length is expressed as a left shift, matching the term-buffer
/// descriptor's own arithmetic.
pub fn compute_position(
  term_id: i32,
  term_offset: i32,
  position_bits_to_shift: u32,
  initial_term_id: i32,
) -> i64 {
  let term_count = i64::from(term_id) - i64::from(initial_term_id);
  (term_count << position_bits_to_shift) + i64::from(term_offset)
}
