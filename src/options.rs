//! Parser for the `fc` channel URI parameter.
//!
//! Grammar: `fc = strategy_name ( "," field )*`, `field = "t:" duration |
//! "g:" int32`. No whitespace tolerance; unrecognised field prefixes and
//! over-length numeric values fail the parse outright.

use log::warn;

use crate::error::FlowControlError;

/// Maximum length of a numeric field's value, one less than the fixed
/// stack buffer the reference implementation copies it into.
const MAX_NUMBER_FIELD_LEN: usize = 63;

/// Parsed `fc` option string. `strategy_name` borrows from the input and
/// must not outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowControlOptions<'a> {
  pub strategy_name: &'a str,
  /// Zero if the `t:` field was not present.
  pub timeout_ns: u64,
  pub has_receiver_tag: bool,
  /// Meaningless unless `has_receiver_tag` is set.
  pub receiver_tag: i32,
}

/// Parses the value of an `fc` URI parameter.
///
/// The first comma-separated token is taken as the strategy name -- even if
/// empty; callers that require a non-empty name (the channel-URI selector
/// does) check that separately, since the reference parser never rejects
/// an empty name itself.
///
/// Tokenisation walks the input with an explicit remaining-length counter
/// rather than a plain `str::split(',')`, to reproduce a quirk of the
/// reference parser exactly: consuming the final real field can exhaust the
/// counter in the same step as the comma that follows it, so a *single*
/// trailing comma at the very end of the string (`"min,"`, `"min,t:1s,"`) is
/// accepted as equivalent to no trailing comma at all -- the implicit empty
/// field after it is never inspected. A second trailing comma does not get
/// the same pass: the first trailing comma's empty field is then inspected
/// on the next iteration and rejected as an unrecognised field, same as any
/// other empty field appearing mid-string.
pub fn parse_preferred_options(options: &str) -> Result<FlowControlOptions<'_>, FlowControlError> {
  let mut strategy_name: Option<&str> = None;
  let mut timeout_ns: u64 = 0;
  let mut has_receiver_tag = false;
  let mut receiver_tag: i32 = -1;

  let mut current = options;
  let mut remaining = options.len();

  loop {
    let (token, rest) = match current.find(',') {
      Some(idx) => {
        let token = &current[..idx];
        let rest = &current[idx + 1..];
        remaining -= token.len() + 1;
        (token, Some(rest))
      }
      None => (current, None),
    };

    if strategy_name.is_none() {
      strategy_name = Some(token);
    } else {
      let bytes = token.as_bytes();
      let has_recognised_prefix =
        token.len() > 2 && (bytes[0] == b'g' || bytes[0] == b't') && bytes[1] == b':';
      if !has_recognised_prefix {
        warn!("unrecognised flow control option field: {token}, options: {options}");
        return Err(FlowControlError::InvalidArgument {
          field: token.to_string(),
          options: options.to_string(),
        });
      }

      let value = &token[2..];
      if value.len() > MAX_NUMBER_FIELD_LEN {
        return Err(FlowControlError::NumberTooLong {
          field: token.to_string(),
          options: options.to_string(),
        });
      }

      match bytes[0] {
        b'g' => {
          receiver_tag = value.parse::<i32>().map_err(|_| {
            warn!("invalid receiver tag field: {token}, options: {options}");
            FlowControlError::InvalidArgument {
              field: token.to_string(),
              options: options.to_string(),
            }
          })?;
          has_receiver_tag = true;
        }
        b't' => {
          let duration = humantime::parse_duration(value).map_err(|_| {
            warn!("invalid timeout field: {token}, options: {options}");
            FlowControlError::InvalidArgument {
              field: token.to_string(),
              options: options.to_string(),
            }
          })?;
          timeout_ns = duration.as_nanos().min(u64::MAX as u128) as u64;
        }
        _ => unreachable!("checked by has_recognised_prefix above"),
      }
    }

    match rest {
      Some(next) if remaining > 0 => current = next,
      _ => break,
    }
  }

  Ok(FlowControlOptions {
    strategy_name: strategy_name.unwrap_or(""),
    timeout_ns,
    has_receiver_tag,
    receiver_tag,
  })
}
