//! Request descriptors and the decorated send/decode surface.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, StatusError},
	gateway::Gateway,
	http::{GatewayHttpClient, Method, TransportRequest, TransportResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Canonical Authorization header name attached during decoration.
pub const AUTHORIZATION: &str = "Authorization";
/// Canonical Content-Type header name set alongside JSON bodies.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Logical representation of an outgoing request prior to transport.
///
/// The private retry marker enforces the at-most-once replay invariant: a request is
/// auto-retried after a 401 exactly once, no matter how the replay settles.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
	/// HTTP method.
	pub method: Method,
	/// Gateway-relative path (for example `/auth/me`).
	pub path: String,
	/// Query pairs appended to the assembled URL.
	pub query: Vec<(String, String)>,
	/// Explicit headers; an Authorization entry here wins over decoration.
	pub headers: BTreeMap<String, String>,
	/// Optional JSON body.
	pub body: Option<serde_json::Value>,
	pub(crate) retried: bool,
}
impl RequestDescriptor {
	/// Creates a descriptor for the provided method and path.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: BTreeMap::new(),
			body: None,
			retried: false,
		}
	}

	/// Shorthand for a GET descriptor.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a POST descriptor.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Shorthand for a PUT descriptor.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::Put, path)
	}

	/// Shorthand for a PATCH descriptor.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::Patch, path)
	}

	/// Shorthand for a DELETE descriptor.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::Delete, path)
	}

	/// Appends a query pair to the assembled URL.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Sets an explicit header, replacing any previous value under the same name.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Attaches a JSON body.
	pub fn with_body(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body);

		self
	}

	/// Serializes and attaches a JSON body.
	pub fn with_json(self, body: &impl Serialize) -> Result<Self, ConfigError> {
		let value =
			serde_json::to_value(body).map_err(|e| ConfigError::BodySerialize { source: e })?;

		Ok(self.with_body(value))
	}

	pub(crate) fn has_authorization(&self) -> bool {
		self.headers.keys().any(|name| name.eq_ignore_ascii_case(AUTHORIZATION))
	}

	pub(crate) fn set_authorization(&mut self, token: &TokenSecret) {
		self.headers.retain(|name, _| !name.eq_ignore_ascii_case(AUTHORIZATION));
		self.headers.insert(AUTHORIZATION.into(), format!("Bearer {}", token.expose()));
	}
}

impl<C> Gateway<C>
where
	C: ?Sized + GatewayHttpClient,
{
	/// Sends the descriptor through decoration, refresh, and replay, returning the raw
	/// 2xx response.
	///
	/// Non-401 failures propagate unchanged. A 401 triggers the single-flight refresh
	/// protocol and at most one replay; refresh exhaustion clears both stored
	/// credentials before the original (or refresh) error surfaces.
	pub async fn send(&self, descriptor: RequestDescriptor) -> Result<TransportResponse> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, "send");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.send_inner(descriptor)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn send_inner(&self, mut descriptor: RequestDescriptor) -> Result<TransportResponse> {
		let mut bearer = None;

		if !descriptor.has_authorization() {
			if let Some(token) = self.get_access_token().await? {
				descriptor.set_authorization(&token);

				bearer = Some(token);
			}
		}

		loop {
			let response = self.dispatch(&descriptor).await?;

			if response.is_success() {
				return Ok(response);
			}

			let status = response.status;
			let error = Error::Status(StatusError { status, body: response.body });

			if status != 401 || descriptor.retried {
				return Err(error);
			}

			descriptor.retried = true;

			// Exhaustion and refresh failures already cleared the stored pair while
			// the single-flight guard was held; only the error surfaces here.
			match self.refresh_access_token(bearer.take().as_ref()).await {
				Ok(Some(token)) => {
					descriptor.set_authorization(&token);

					bearer = Some(token);
				},
				Ok(None) => return Err(error),
				Err(refresh_error) => return Err(refresh_error),
			}
		}
	}

	pub(crate) async fn dispatch(
		&self,
		descriptor: &RequestDescriptor,
	) -> Result<TransportResponse> {
		let mut url = self.config.endpoint(&descriptor.path)?;

		if !descriptor.query.is_empty() {
			url.query_pairs_mut()
				.extend_pairs(descriptor.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		let mut headers = descriptor.headers.clone();
		let body = match &descriptor.body {
			Some(value) => {
				headers.entry(CONTENT_TYPE.into()).or_insert_with(|| "application/json".into());

				Some(serde_json::to_vec(value).map_err(|e| ConfigError::BodySerialize { source: e })?)
			},
			None => None,
		};
		let request = TransportRequest { method: descriptor.method, url, headers, body };

		Ok(self.http_client.execute(request).await?)
	}

	/// Sends the descriptor and decodes the 2xx body as the requested type.
	pub async fn request<T>(&self, descriptor: RequestDescriptor) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.send(descriptor).await?;

		decode_body(response)
	}

	/// Issues a GET against the provided path, decoding the response body.
	pub async fn get<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request(RequestDescriptor::get(path)).await
	}

	/// Issues a POST with a JSON body, decoding the response body.
	pub async fn post<T>(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request(RequestDescriptor::post(path).with_json(body)?).await
	}

	/// Issues a PUT with a JSON body, decoding the response body.
	pub async fn put<T>(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request(RequestDescriptor::put(path).with_json(body)?).await
	}

	/// Issues a PATCH with a JSON body, decoding the response body.
	pub async fn patch<T>(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request(RequestDescriptor::patch(path).with_json(body)?).await
	}

	/// Issues a DELETE against the provided path, decoding the response body.
	pub async fn delete<T>(&self, path: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.request(RequestDescriptor::delete(path)).await
	}
}

/// Decodes a 2xx response body as JSON; empty bodies decode as `null` so callers can
/// ask for `()` or `Option<T>`.
pub(crate) fn decode_body<T>(response: TransportResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status;
	let bytes = if response.body.is_empty() { b"null".to_vec() } else { response.body };
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn authorization_lookup_is_case_insensitive() {
		let explicit = RequestDescriptor::get("/orders").with_header("authorization", "Bearer x");

		assert!(explicit.has_authorization());
		assert!(!RequestDescriptor::get("/orders").has_authorization());
	}

	#[test]
	fn decoration_replaces_mixed_case_entries() {
		let mut descriptor = RequestDescriptor::get("/orders").with_header("AUTHORIZATION", "stale");

		descriptor.set_authorization(&TokenSecret::new("tok2"));

		assert_eq!(descriptor.headers.len(), 1);
		assert_eq!(descriptor.headers.get(AUTHORIZATION).map(String::as_str), Some("Bearer tok2"));
	}

	#[test]
	fn empty_bodies_decode_as_null() {
		let response = TransportResponse { status: 204, body: Vec::new() };
		let decoded: Option<u32> =
			decode_body(response).expect("Empty body should decode as JSON null.");

		assert!(decoded.is_none());
	}

	#[test]
	fn malformed_bodies_surface_decode_errors() {
		let response = TransportResponse { status: 200, body: b"{not json".to_vec() };
		let error = decode_body::<serde_json::Value>(response)
			.expect_err("Malformed body should fail to decode.");

		assert!(matches!(error, Error::Decode { status: 200, .. }));
	}
}
