//! Strategy selection driven by the channel URI's `fc` parameter, and a
//! name-based registry for lookups outside the URI path.

use log::{debug, warn};

use crate::{
  error::{FlowControlError, NotFound},
  options::parse_preferred_options,
  strategy::Strategy,
};

/// Canonical registry name for the unicast max strategy.
pub const UNICAST_MAX_STRATEGY_NAME: &str = "aeron_unicast_max_flow_control_strategy";
/// Canonical registry name for the multicast max strategy.
pub const MULTICAST_MAX_STRATEGY_NAME: &str = "aeron_max_multicast_flow_control_strategy";
/// Canonical registry name for the multicast min strategy.
pub const MULTICAST_MIN_STRATEGY_NAME: &str = "aeron_min_multicast_flow_control_strategy";

/// Looks up a strategy supplier by its canonical registry name.
///
/// This is the out-of-band extension point spec.md mentions alongside the
/// (out-of-scope) dynamic by-name plugin loading mechanism: a fixed table
/// of the three built-in strategies, matched by exact name. The reference
/// implementation matches by prefix (`strncmp` against the entry's own
/// length); we match exactly here since a prefix match would silently
/// accept `"aeron_unicast_max_flow_control_strategyXYZ"` as the unicast max
/// strategy, which is not a behavior worth preserving.
pub fn lookup_by_name(name: &str) -> Result<Strategy, NotFound> {
  match name {
    UNICAST_MAX_STRATEGY_NAME | MULTICAST_MAX_STRATEGY_NAME => Ok(Strategy::max()),
    MULTICAST_MIN_STRATEGY_NAME => Ok(Strategy::min(0)),
    other => Err(NotFound(other.to_string())),
  }
}

/// Selects and constructs a strategy for a publication from the channel
/// URI's `fc` parameter, falling back to `fallback_supplier` when `fc` is
/// absent entirely (the usual case for unicast channels, which don't carry
/// the parameter at all).
///
/// `fc_param` is the already-extracted value of the `fc` URI parameter, if
/// present; `uri` is the full original URI string, used only for
/// diagnostics. Parsing and extracting `fc` from a URI's parameter map is
/// the caller's responsibility -- that map is an external collaborator this
/// core does not implement.
pub fn select_default_multicast_strategy<F>(
  fc_param: Option<&str>,
  uri: &str,
  fallback_supplier: F,
) -> Result<Strategy, FlowControlError>
where
  F: FnOnce() -> Strategy,
{
  let Some(fc_value) = fc_param else {
    debug!("no fc parameter on URI {uri}, using fallback strategy supplier");
    return Ok(fallback_supplier());
  };

  let options = parse_preferred_options(fc_value)?;

  if options.strategy_name.is_empty() {
    warn!("no flow control strategy name specified, URI: {uri}");
    return Err(FlowControlError::InvalidArgument {
      field: "fc".to_string(),
      options: uri.to_string(),
    });
  }

  match options.strategy_name {
    "max" => Ok(Strategy::max()),
    "min" if options.has_receiver_tag => Ok(Strategy::preferred(options.timeout_ns, options.receiver_tag)),
    "min" => Ok(Strategy::min(options.timeout_ns)),
    other => {
      warn!("invalid flow control strategy name: {other} from URI: {uri}");
      Err(FlowControlError::UnknownStrategy {
        name: other.to_string(),
        uri: uri.to_string(),
      })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn unreachable_fallback() -> Strategy {
    panic!("fallback supplier should not be called when fc is present")
  }

  #[test]
  fn absent_fc_uses_fallback() {
    let mut called = false;
    let strategy =
      select_default_multicast_strategy(None, "udp://239.0.0.1:40000", || {
        called = true;
        Strategy::max()
      })
      .unwrap();
    assert!(called);
    assert!(matches!(strategy, Strategy::Max));
  }

  #[test]
  fn fc_max_selects_max_strategy() {
    let strategy =
      select_default_multicast_strategy(Some("max"), "udp://239.0.0.1:40000?fc=max", unreachable_fallback)
        .unwrap();
    assert!(matches!(strategy, Strategy::Max));
  }

  #[test]
  fn fc_min_selects_min_strategy() {
    let strategy =
      select_default_multicast_strategy(Some("min"), "udp://239.0.0.1:40000?fc=min", unreachable_fallback)
        .unwrap();
    assert!(matches!(strategy, Strategy::Min(_)));
  }

  #[test]
  fn fc_min_with_tag_selects_preferred_strategy() {
    let strategy = select_default_multicast_strategy(
      Some("min,g:42,t:500ms"),
      "udp://239.0.0.1:40000?fc=min,g:42,t:500ms",
      unreachable_fallback,
    )
    .unwrap();
    match strategy {
      Strategy::Preferred(state) => {
        assert_eq!(state.receiver_tag, 42);
        assert_eq!(state.min.receiver_timeout_ns, 500_000_000);
      }
      other => panic!("expected Preferred, got {other:?}"),
    }
  }

  #[test]
  fn bogus_strategy_name_fails() {
    let err =
      select_default_multicast_strategy(Some("bogus"), "udp://239.0.0.1:40000?fc=bogus", unreachable_fallback)
        .unwrap_err();
    match err {
      FlowControlError::UnknownStrategy { name, .. } => assert_eq!(name, "bogus"),
      other => panic!("expected UnknownStrategy, got {other:?}"),
    }
  }

  #[test]
  fn registry_lookup_by_canonical_name() {
    assert!(matches!(lookup_by_name(UNICAST_MAX_STRATEGY_NAME), Ok(Strategy::Max)));
    assert!(matches!(lookup_by_name(MULTICAST_MAX_STRATEGY_NAME), Ok(Strategy::Max)));
    assert!(matches!(lookup_by_name(MULTICAST_MIN_STRATEGY_NAME), Ok(Strategy::Min(_))));
  }

  #[test]
  fn registry_lookup_unknown_name_is_not_found() {
    let err = lookup_by_name("no_such_strategy").unwrap_err();
    assert_eq!(err, NotFound("no_such_strategy".to_string()));
  }

  #[test]
  fn fc_min_selects_min_strategy_via_anyhow() -> anyhow::Result<()> {
    use anyhow::Context;

    let strategy = select_default_multicast_strategy(
      Some("min"),
      "udp://239.0.0.1:40000?fc=min",
      unreachable_fallback,
    )
    .context("selecting the min strategy from a well-formed fc parameter")?;
    assert!(matches!(strategy, Strategy::Min(_)));
    Ok(())
  }
}
