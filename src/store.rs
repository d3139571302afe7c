//! Storage contracts and built-in credential store implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, TokenSecret},
};

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable key-value contract for the gateway's credential pair.
///
/// Implementations back the two fixed slots described by [`CredentialKind`]. The
/// gateway exclusively owns both slots; no other component reads or writes the
/// underlying storage directly.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Reads the secret stored in the slot, if present.
	fn load(&self, kind: CredentialKind) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Persists or replaces the secret in the slot.
	fn save(&self, kind: CredentialKind, secret: TokenSecret) -> StoreFuture<'_, ()>;

	/// Removes the secret from the slot; removing an empty slot is a no-op.
	fn remove(&self, kind: CredentialKind) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_gateway_error_with_source() {
		let store_error = StoreError::Backend { message: "storage unreachable".into() };
		let gateway_error: Error = store_error.clone().into();

		assert!(matches!(gateway_error, Error::Storage(_)));
		assert!(gateway_error.to_string().contains("storage unreachable"));

		let source = StdError::source(&gateway_error)
			.expect("Gateway error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
