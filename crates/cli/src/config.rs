//! Hub address configuration.
//!
//! There is deliberately no built-in default address: a hub is a
//! site-local device, and a hardcoded fallback IP turns every typo
//! into a 30-second navigation timeout against the wrong host. The
//! address comes from the `--hub-ip` flag or the environment, in that
//! order, or the command fails fast with a configuration error.

use crate::error::{PushError, Result};

/// Environment variable consulted when `--hub-ip` is not given.
pub const HUB_IP_ENV: &str = "HUBPUSH_HUB_IP";

/// Resolved hub coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
	/// Bare host or host:port, no scheme.
	pub addr: String,
}

impl HubConfig {
	/// Base URL for hub pages. The hub's admin UI is plain HTTP.
	pub fn base_url(&self) -> String {
		format!("http://{}", self.addr)
	}
}

/// Reads [`HUB_IP_ENV`] from the process environment.
pub fn hub_from_env() -> Option<String> {
	std::env::var(HUB_IP_ENV).ok()
}

/// Resolves the hub address: flag first, then the environment value.
///
/// The environment value is passed in rather than read here so the
/// precedence logic stays a pure function.
pub fn resolve_hub(flag: Option<&str>, env_value: Option<&str>) -> Result<HubConfig> {
	let addr = flag
		.or(env_value)
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.ok_or(PushError::HubAddressRequired)?;

	validate_addr(addr)?;
	Ok(HubConfig { addr: addr.to_string() })
}

fn validate_addr(addr: &str) -> Result<()> {
	let invalid = |reason: &str| PushError::InvalidHubAddress {
		addr: addr.to_string(),
		reason: reason.to_string(),
	};

	if addr.contains("://") {
		return Err(invalid("pass a bare host or host:port, not a URL"));
	}
	if addr.contains('/') || addr.contains(char::is_whitespace) {
		return Err(invalid("must not contain paths or whitespace"));
	}

	// Parse as the authority of a synthetic URL to catch garbage early
	// instead of timing out against it later.
	let probe = format!("http://{addr}/");
	match url::Url::parse(&probe) {
		Ok(parsed) if parsed.host_str().is_some() => Ok(()),
		Ok(_) => Err(invalid("no host")),
		Err(e) => Err(PushError::InvalidHubAddress {
			addr: addr.to_string(),
			reason: e.to_string(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flag_wins_over_environment() {
		let hub = resolve_hub(Some("10.0.0.2"), Some("10.0.0.9")).unwrap();
		assert_eq!(hub.addr, "10.0.0.2");
	}

	#[test]
	fn environment_is_the_fallback() {
		let hub = resolve_hub(None, Some("hub.local:8080")).unwrap();
		assert_eq!(hub.addr, "hub.local:8080");
		assert_eq!(hub.base_url(), "http://hub.local:8080");
	}

	#[test]
	fn missing_address_is_a_configuration_error() {
		assert!(matches!(resolve_hub(None, None), Err(PushError::HubAddressRequired)));
		assert!(matches!(resolve_hub(Some("  "), None), Err(PushError::HubAddressRequired)));
	}

	#[test]
	fn full_urls_are_rejected() {
		let err = resolve_hub(Some("http://10.0.0.2"), None).unwrap_err();
		assert!(matches!(err, PushError::InvalidHubAddress { .. }));
	}

	#[test]
	fn paths_and_whitespace_are_rejected() {
		assert!(resolve_hub(Some("10.0.0.2/app"), None).is_err());
		assert!(resolve_hub(Some("10.0 .2"), None).is_err());
	}
}
