//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, TokenSecret},
	store::{CredentialStore, StoreError, StoreFuture},
};

type SlotMap = Arc<RwLock<HashMap<&'static str, TokenSecret>>>;

/// Thread-safe storage backend that keeps the credential pair in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(SlotMap);
impl MemoryStore {
	fn load_now(map: SlotMap, kind: CredentialKind) -> Option<TokenSecret> {
		map.read().get(kind.storage_key()).cloned()
	}

	fn save_now(map: SlotMap, kind: CredentialKind, secret: TokenSecret) -> Result<(), StoreError> {
		map.write().insert(kind.storage_key(), secret);

		Ok(())
	}

	fn remove_now(map: SlotMap, kind: CredentialKind) -> Result<(), StoreError> {
		map.write().remove(kind.storage_key());

		Ok(())
	}
}
impl CredentialStore for MemoryStore {
	fn load(&self, kind: CredentialKind) -> StoreFuture<'_, Option<TokenSecret>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::load_now(map, kind)) })
	}

	fn save(&self, kind: CredentialKind, secret: TokenSecret) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, kind, secret) })
	}

	fn remove(&self, kind: CredentialKind) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::remove_now(map, kind) })
	}
}
