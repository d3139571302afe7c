//! Session flows layered on the gateway: login, register, logout, and profile reads.
//!
//! These flows are the only callers allowed to persist credentials: login and
//! register store the returned pair before handing the profile payload back, and
//! logout clears both stored credentials even when the backend call fails.

// self
use crate::{
	_prelude::*,
	auth::{RefreshUpdate, TokenSecret},
	gateway::Gateway,
	http::GatewayHttpClient,
};

/// Credentials accepted by the login endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: String,
}

/// Payload accepted by the register endpoint.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
	/// Display name for the new account.
	pub name: String,
	/// Account email address.
	pub email: String,
	/// Account password.
	pub password: String,
}

/// Wire session payload: the credential pair plus whatever profile fields the backend
/// attaches alongside it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
	/// Newly issued access credential.
	pub access_token: String,
	/// Newly issued refresh credential, when the backend rotates one.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Remaining profile fields (user, roles, etc.).
	#[serde(flatten)]
	pub profile: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LogoutRequest<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	refresh_token: Option<&'a str>,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Logs in, persisting the returned credential pair before handing back the
	/// profile payload.
	pub async fn login(&self, credentials: &Credentials) -> Result<SessionPayload> {
		let payload: SessionPayload = self.post("/auth/login", credentials).await?;

		self.persist_session(&payload).await?;

		Ok(payload)
	}

	/// Registers a new account, persisting the returned credential pair.
	pub async fn register(&self, registration: &Registration) -> Result<SessionPayload> {
		let payload: SessionPayload = self.post("/auth/register", registration).await?;

		self.persist_session(&payload).await?;

		Ok(payload)
	}

	/// Logs out: notifies the backend with the stored refresh credential and clears
	/// both stored credentials even when the call fails.
	pub async fn logout(&self) -> Result<()> {
		let refresh = self.get_refresh_token().await?;
		let body = LogoutRequest { refresh_token: refresh.as_ref().map(TokenSecret::expose) };
		let result = self.post::<serde_json::Value>("/auth/logout", &body).await;

		self.clear_auth_tokens().await?;
		result.map(|_| ())
	}

	/// Fetches the authenticated profile through the decorated surface.
	pub async fn fetch_profile<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.get("/auth/me").await
	}

	async fn persist_session(&self, payload: &SessionPayload) -> Result<()> {
		self.set_auth_token(
			Some(TokenSecret::new(payload.access_token.clone())),
			RefreshUpdate::from_wire(payload.refresh_token.clone()),
		)
		.await
	}
}
