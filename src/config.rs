//! Gateway configuration: base address and refresh endpoint wiring.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted by [`GatewayConfig::from_env`].
pub const BASE_URL_ENV: &str = "GATEWAY_BASE_URL";
/// Fallback base address used for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";
/// Default refresh endpoint path, relative to the base address.
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Immutable gateway configuration resolved once at construction.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
	base: String,
	refresh_path: String,
}
impl GatewayConfig {
	/// Validates and normalizes the provided base address.
	pub fn new(base_url: &str) -> Result<Self, ConfigError> {
		let _ = Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl { source: e })?;

		Ok(Self {
			base: base_url.trim_end_matches('/').to_owned(),
			refresh_path: DEFAULT_REFRESH_PATH.into(),
		})
	}

	/// Resolves the base address from the environment, falling back to the local
	/// development endpoint.
	pub fn from_env() -> Result<Self, ConfigError> {
		let base = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());

		Self::new(&base)
	}

	/// Overrides the refresh endpoint path (defaults to `/auth/refresh`).
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Returns the normalized base address.
	pub fn base(&self) -> &str {
		&self.base
	}

	/// Returns the refresh endpoint path.
	pub fn refresh_path(&self) -> &str {
		&self.refresh_path
	}

	/// Joins a gateway-relative path onto the base address.
	///
	/// Paths are concatenated rather than resolved with [`Url::join`] so that a leading
	/// slash does not strip a path-carrying base such as `http://host/api`.
	pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let raw = if path.starts_with('/') {
			format!("{}{path}", self.base)
		} else {
			format!("{}/{path}", self.base)
		};

		Url::parse(&raw).map_err(|e| ConfigError::InvalidRequestUrl { source: e })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn base_address_is_normalized_and_validated() {
		let config = GatewayConfig::new("http://localhost:4000/api/")
			.expect("Base address fixture should parse.");

		assert_eq!(config.base(), "http://localhost:4000/api");
		assert!(GatewayConfig::new("not a url").is_err());
	}

	#[test]
	fn endpoints_preserve_the_base_path_prefix() {
		let config = GatewayConfig::new("http://localhost:4000/api")
			.expect("Base address fixture should parse.");
		let url = config.endpoint("/auth/me").expect("Endpoint fixture should assemble.");

		assert_eq!(url.as_str(), "http://localhost:4000/api/auth/me");

		let unslashed = config.endpoint("shoes").expect("Endpoint fixture should assemble.");

		assert_eq!(unslashed.as_str(), "http://localhost:4000/api/shoes");
	}

	#[test]
	fn refresh_path_can_be_overridden() {
		let config = GatewayConfig::new("http://localhost:4000/api")
			.expect("Base address fixture should parse.")
			.with_refresh_path("/session/refresh");

		assert_eq!(config.refresh_path(), "/session/refresh");
	}
}
