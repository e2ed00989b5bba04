//! Process-wide, environment-derived defaults.
//!
//! Both the min and preferred strategies fall back to a receiver timeout
//! read from the environment when the channel URI does not supply `t:`.
//! Each is read at most once per process, the way `rustdds::security::config`
//! resolves its own file-backed configuration once at participant startup
//! rather than on every lookup.

use std::sync::OnceLock;

use log::{debug, warn};

/// Built-in fallback when neither the URI nor the environment supply a
/// timeout: 5 seconds, matching `AERON_MAX_FLOW_CONTROL_STRATEGY_RECEIVER_TIMEOUT_NS`.
pub const DEFAULT_RECEIVER_TIMEOUT_NS: i64 = 5_000_000_000;

pub const MIN_RECEIVER_TIMEOUT_ENV_VAR: &str = "AERON_MIN_MULTICAST_FLOW_CONTROL_RECEIVER_TIMEOUT";
pub const PREFERRED_RECEIVER_TIMEOUT_ENV_VAR: &str =
  "AERON_PREFERRED_MULTICAST_FLOW_CONTROL_RECEIVER_TIMEOUT";

static MIN_TIMEOUT_NS: OnceLock<i64> = OnceLock::new();
static PREFERRED_TIMEOUT_NS: OnceLock<i64> = OnceLock::new();

fn resolve_timeout_ns(env_var: &str) -> i64 {
  match std::env::var(env_var) {
    Ok(value) => match humantime::parse_duration(&value) {
      Ok(d) => {
        let ns = d.as_nanos().min(i64::MAX as u128) as i64;
        debug!("{env_var}={value} resolved to {ns}ns");
        ns
      }
      Err(e) => {
        warn!("{env_var}={value} is not a valid duration ({e}), using default {DEFAULT_RECEIVER_TIMEOUT_NS}ns");
        DEFAULT_RECEIVER_TIMEOUT_NS
      }
    },
    Err(_) => DEFAULT_RECEIVER_TIMEOUT_NS,
  }
}

/// Returns the process-wide default receiver timeout for the **min**
/// strategy, reading the environment at most once.
pub fn min_default_receiver_timeout_ns() -> i64 {
  *MIN_TIMEOUT_NS.get_or_init(|| resolve_timeout_ns(MIN_RECEIVER_TIMEOUT_ENV_VAR))
}

/// Returns the process-wide default receiver timeout for the **preferred**
/// strategy, reading the environment at most once.
pub fn preferred_default_receiver_timeout_ns() -> i64 {
  *PREFERRED_TIMEOUT_NS.get_or_init(|| resolve_timeout_ns(PREFERRED_RECEIVER_TIMEOUT_ENV_VAR))
}
