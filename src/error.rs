//! Error kinds for flow control strategy construction and option parsing.
//!
//! Per the strategy contract, `on_idle` and `on_status_message` never fail:
//! only construction (the strategy supplier) and the `fc` option parser can.

use thiserror::Error;

/// Failures that can occur while parsing the `fc` URI option or selecting
/// and constructing a flow control strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowControlError {
  /// A malformed `fc` value, an unknown strategy name, an unrecognised
  /// field prefix, or an empty strategy name.
  #[error("invalid flow control argument, field: {field}, options: {options}")]
  InvalidArgument { field: String, options: String },

  /// A numeric `t:`/`g:` field value exceeded the parser's fixed buffer.
  #[error("flow control option field too long, field: {field}, options: {options}")]
  NumberTooLong { field: String, options: String },

  /// `strategy_name` did not match any known strategy.
  #[error("invalid flow control strategy name: {name} from URI: {uri}")]
  UnknownStrategy { name: String, uri: String },
}

/// Returned by the name-based strategy registry when no supplier is
/// registered under the requested name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no flow control strategy registered under name: {0}")]
pub struct NotFound(pub String);

pub type Result<T> = std::result::Result<T, FlowControlError>;
