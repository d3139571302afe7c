//! The authenticated request gateway: credential ownership, request decoration, and
//! transparent re-authentication on expiry.

pub mod refresh;
pub mod request;

pub use refresh::RefreshCounters;
pub use request::RequestDescriptor;

// self
use crate::{
	_prelude::*,
	auth::{CredentialKind, RefreshUpdate, TokenSecret},
	config::GatewayConfig,
	http::GatewayHttpClient,
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Coordinates authenticated requests against a single backend base address.
///
/// The gateway owns the HTTP transport, the credential store, and the single-flight
/// refresh guard so callers can issue logical requests without duplicating credential
/// handling. The stored credential pair is mutated only through the gateway's own
/// operations; no other component touches the underlying storage.
#[derive(Clone)]
pub struct Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Credential store backing the durable access/refresh pair.
	pub store: Arc<dyn CredentialStore>,
	/// Immutable base address + refresh endpoint configuration.
	pub config: GatewayConfig,
	/// Shared counters for refresh outcomes.
	pub refresh_counters: Arc<RefreshCounters>,
	pub(crate) refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Creates a gateway that reuses a caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn CredentialStore>,
		config: GatewayConfig,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			config,
			refresh_counters: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Reads the stored access credential.
	pub async fn get_access_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.load(CredentialKind::Access).await?)
	}

	/// Reads the stored refresh credential.
	pub async fn get_refresh_token(&self) -> Result<Option<TokenSecret>> {
		Ok(self.store.load(CredentialKind::Refresh).await?)
	}

	/// Writes the access credential and applies the requested refresh update.
	///
	/// An empty or absent access value removes the stored access credential. The
	/// refresh slot follows [`RefreshUpdate`]: `Keep` leaves a previously stored
	/// refresh credential untouched, so access-only rotation never clobbers it.
	pub async fn set_auth_token(
		&self,
		access: Option<TokenSecret>,
		refresh: RefreshUpdate,
	) -> Result<()> {
		self.write_slot(CredentialKind::Access, access).await?;

		match refresh {
			RefreshUpdate::Keep => Ok(()),
			RefreshUpdate::Set(secret) => self.write_slot(CredentialKind::Refresh, Some(secret)).await,
			RefreshUpdate::Clear => self.write_slot(CredentialKind::Refresh, None).await,
		}
	}

	/// Removes both stored credentials unconditionally. Idempotent.
	pub async fn clear_auth_tokens(&self) -> Result<()> {
		self.store.remove(CredentialKind::Access).await?;
		self.store.remove(CredentialKind::Refresh).await?;

		Ok(())
	}

	async fn write_slot(&self, kind: CredentialKind, value: Option<TokenSecret>) -> Result<()> {
		match value {
			Some(secret) if !secret.is_empty() => Ok(self.store.save(kind, secret).await?),
			_ => Ok(self.store.remove(kind).await?),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a new gateway for the provided store and configuration.
	///
	/// The gateway provisions its own reqwest-backed transport so callers do not need
	/// to pass HTTP handles explicitly. Use [`Gateway::with_http_client`] to supply a
	/// custom transport (timeouts, proxies, test fakes).
	pub fn new(store: Arc<dyn CredentialStore>, config: GatewayConfig) -> Self {
		Self::with_http_client(store, config, ReqwestHttpClient::default())
	}

	/// Creates a gateway configured from the environment.
	pub fn from_env(store: Arc<dyn CredentialStore>) -> Result<Self> {
		Ok(Self::new(store, GatewayConfig::from_env()?))
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway").field("config", &self.config).finish()
	}
}
