//! Single-flight credential refresh.
//!
//! The first request that observes a 401 takes the async refresh guard and performs
//! one `POST` to the refresh endpoint; every other request that 401s while that call
//! is pending parks on the same guard and, once admitted, finds the settled outcome
//! already persisted: the rotated access credential on success, a cleared credential
//! pair on failure. At most one refresh network call is outstanding at any time, and
//! the guard is released unconditionally when the operation settles.

mod counters;

pub use counters::RefreshCounters;

// self
use crate::{
	_prelude::*,
	auth::{RefreshUpdate, TokenSecret},
	error::StatusError,
	gateway::{Gateway, RequestDescriptor, request},
	http::GatewayHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
	refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
	access_token: String,
	#[serde(default)]
	refresh_token: Option<String>,
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Exchanges the stored refresh credential for a new access credential, coalescing
	/// concurrent callers onto a single network call.
	///
	/// `stale` is the bearer the failing request carried, if the gateway attached one.
	/// Returns `Ok(None)` when no refresh credential is stored ("no refresh possible").
	/// Both failure paths clear the stored credential pair while the guard is still
	/// held, so parked callers observe the settled outcome instead of issuing a
	/// refresh of their own.
	pub(crate) async fn refresh_access_token(
		&self,
		stale: Option<&TokenSecret>,
	) -> Result<Option<TokenSecret>> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh_access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.refresh_counters.record_attempt();

				let _singleflight = self.refresh_guard.lock().await;

				// A caller that lost the race finds the winner's rotated credential
				// already in place and reuses it without a second exchange. Only an
				// observed rotation counts; an untouched (or absent) pair still needs
				// a real refresh.
				if let Some(current) = self.get_access_token().await?
					&& stale.is_some_and(|used| used.expose() != current.expose())
				{
					self.refresh_counters.record_success();

					return Ok(Some(current));
				}

				let refresh_token = match self.get_refresh_token().await? {
					Some(secret) => secret,
					None => {
						self.refresh_counters.record_failure();
						self.clear_auth_tokens().await?;

						return Ok(None);
					},
				};
				let descriptor = RequestDescriptor::post(self.config.refresh_path())
					.with_json(&RefreshRequest { refresh_token: refresh_token.expose() })?;
				// The refresh exchange bypasses decoration so a stale bearer is never
				// attached and a failing exchange cannot recurse into itself.
				let response = match self.dispatch(&descriptor).await {
					Ok(response) => response,
					Err(error) => {
						self.refresh_counters.record_failure();
						self.clear_auth_tokens().await?;

						return Err(error);
					},
				};

				if !response.is_success() {
					self.refresh_counters.record_failure();
					self.clear_auth_tokens().await?;

					return Err(Error::Status(StatusError {
						status: response.status,
						body: response.body,
					}));
				}

				let payload: RefreshResponse = match request::decode_body(response) {
					Ok(payload) => payload,
					Err(error) => {
						self.refresh_counters.record_failure();
						self.clear_auth_tokens().await?;

						return Err(error);
					},
				};
				let access = TokenSecret::new(payload.access_token);

				self.set_auth_token(
					Some(access.clone()),
					RefreshUpdate::from_wire(payload.refresh_token),
				)
				.await?;
				self.refresh_counters.record_success();

				Ok(Some(access))
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}
}
