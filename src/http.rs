//! Transport primitives for gateway requests.
//!
//! The module exposes [`GatewayHttpClient`] so downstream crates can integrate custom
//! HTTP stacks (or deterministic fakes in tests) without the gateway core depending on
//! a concrete client. Implementations receive a fully assembled [`TransportRequest`]
//! and report status + body through [`TransportResponse`] without interpreting either;
//! status handling, refresh, and decoding all stay in the gateway.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// HTTP methods accepted by the gateway surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// HTTP GET.
	Get,
	/// HTTP POST.
	Post,
	/// HTTP PUT.
	Put,
	/// HTTP PATCH.
	Patch,
	/// HTTP DELETE.
	Delete,
}
impl Method {
	/// Returns the canonical wire spelling.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully assembled request handed to the transport.
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute request URL (base address + path + query).
	pub url: Url,
	/// Final header set, including any bearer decoration.
	pub headers: BTreeMap<String, String>,
	/// Serialized request body, if any.
	pub body: Option<Vec<u8>>,
}

/// Raw response surfaced by the transport before the gateway applies status handling.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body bytes.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Returns `true` for any 2xx status.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Boxed future returned by [`GatewayHttpClient::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing gateway requests.
///
/// The trait acts as the gateway's only dependency on an HTTP stack. A non-2xx status
/// is not a transport error; implementations must return it inside
/// [`TransportResponse`] so the gateway can run its 401 refresh protocol. Only
/// network- or IO-level failures map to [`TransportError`].
pub trait GatewayHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Executes the request, reporting status + body without interpreting either.
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeout and redirect behavior are deliberately left to the underlying client;
/// configure a custom [`ReqwestClient`] and pass it through
/// [`with_client`](ReqwestHttpClient::with_client) when defaults do not fit.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl GatewayHttpClient for ReqwestHttpClient {
	fn execute(&self, request: TransportRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(TransportResponse { status, body })
		})
	}
}
