//! Transport contract for the agent's two outbound call shapes.
//!
//! [`AgentTransport`] is the crate's only dependency on an HTTP stack. Callers
//! provide an implementation (typically behind `Arc<T>`) and the cycles issue
//! configuration GETs and message POSTs through it. No per-request timeout is
//! configured; the only cadence control is the caller's retry window.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{_prelude::*, error::TransportError};

/// Boxed future returned by [`AgentTransport`] methods.
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of the agent's outbound calls.
///
/// Implementations must be `Send + Sync + 'static` so they can be shared
/// across cycle tasks behind `Arc` without additional wrappers, and the
/// futures they return must be `Send` for the lifetime of the in-flight call.
pub trait AgentTransport
where
	Self: 'static + Send + Sync,
{
	/// Issues a GET and returns the status plus raw body bytes.
	fn get(&self, url: Url) -> TransportFuture<'_, TransportResponse>;

	/// Issues a POST carrying a pre-signed authorization header.
	fn post(&self, request: PostRequest) -> TransportFuture<'_, TransportResponse>;
}

/// Outbound POST description consumed by [`AgentTransport::post`].
#[derive(Clone, Debug)]
pub struct PostRequest {
	/// Target URL.
	pub url: Url,
	/// Pre-rendered `Authorization` header value.
	pub authorization: String,
	/// `Content-Type` header value.
	pub content_type: &'static str,
	/// Raw payload bytes.
	pub body: Vec<u8>,
}

/// Status and body captured from an HTTP response.
#[derive(Clone, Debug)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl TransportResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

#[cfg(feature = "reqwest")]
/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn capture(response: reqwest::Response) -> Result<TransportResponse, TransportError> {
		let status = response.status().as_u16();
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		Ok(TransportResponse { status, body })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl AgentTransport for ReqwestTransport {
	fn get(&self, url: Url) -> TransportFuture<'_, TransportResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.get(url).send().await.map_err(TransportError::from)?;

			Self::capture(response).await
		})
	}

	fn post(&self, request: PostRequest) -> TransportFuture<'_, TransportResponse> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(request.url)
				.header(AUTHORIZATION, request.authorization)
				.header(CONTENT_TYPE, request.content_type)
				.body(request.body)
				.send()
				.await
				.map_err(TransportError::from)?;

			Self::capture(response).await
		})
	}
}
