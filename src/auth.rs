//! Credential primitives: redacted token secrets, storage slots, and refresh updates.

// self
use crate::_prelude::*;

/// Fixed storage key backing the access credential slot.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Fixed storage key backing the refresh credential slot.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the wrapped value is the empty string.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// The two durable credential slots owned by the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKind {
	/// Short-lived bearer token attached to outgoing requests.
	Access,
	/// Longer-lived token exchanged for a new access credential on expiry.
	Refresh,
}
impl CredentialKind {
	/// Returns the fixed storage key backing the slot.
	pub const fn storage_key(self) -> &'static str {
		match self {
			CredentialKind::Access => ACCESS_TOKEN_KEY,
			CredentialKind::Refresh => REFRESH_TOKEN_KEY,
		}
	}
}
impl Display for CredentialKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.storage_key())
	}
}

/// Update semantics applied to the refresh credential when tokens are written.
///
/// Login and refresh flows supply a replacement (or an explicit removal), while an
/// access-only rotation must leave the previously stored refresh credential
/// untouched. Modeling the tri-state explicitly keeps that asymmetry out of
/// optional-argument guesswork at call sites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RefreshUpdate {
	/// Leave the stored refresh credential untouched.
	#[default]
	Keep,
	/// Replace the stored refresh credential.
	Set(TokenSecret),
	/// Remove the stored refresh credential.
	Clear,
}
impl RefreshUpdate {
	/// Maps an optional wire value onto update semantics: an absent field keeps the
	/// stored secret, an empty value clears it, anything else replaces it.
	pub fn from_wire(value: Option<String>) -> Self {
		match value {
			None => Self::Keep,
			Some(value) if value.is_empty() => Self::Clear,
			Some(value) => Self::Set(TokenSecret::new(value)),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn credential_kinds_map_to_fixed_keys() {
		assert_eq!(CredentialKind::Access.storage_key(), ACCESS_TOKEN_KEY);
		assert_eq!(CredentialKind::Refresh.storage_key(), REFRESH_TOKEN_KEY);
		assert_ne!(ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY);
	}

	#[test]
	fn wire_values_map_onto_refresh_updates() {
		assert_eq!(RefreshUpdate::from_wire(None), RefreshUpdate::Keep);
		assert_eq!(RefreshUpdate::from_wire(Some(String::new())), RefreshUpdate::Clear);
		assert_eq!(
			RefreshUpdate::from_wire(Some("rotated".into())),
			RefreshUpdate::Set(TokenSecret::new("rotated")),
		);
	}
}
