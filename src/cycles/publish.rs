//! Message publishing with per-call signature minting.
//!
//! [`MessagePublisher`] is the standalone token-consuming flow: it mints a
//! fresh signature for the messages resource and POSTs one opaque payload.
//! It does not compose with [`DeviceAgent`]; the two utilities share nothing
//! but the transport contract.

// self
use crate::{
	_prelude::*,
	auth::{DeviceId, HubName, KeyName, SasToken, SigningKey, sas},
	error::{ConfigError, TransientError},
	ext::{BusyIndicator, IndicatorGuard, NullIndicator},
	http::{AgentTransport, PostRequest},
	obs::{self, CycleKind, CycleOutcome, CycleSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Content type the messages endpoint expects.
pub const MESSAGE_CONTENT_TYPE: &str = "application/atom+xml;type=entry;charset=utf-8";

#[cfg(feature = "reqwest")]
/// Publisher specialized for the crate's default reqwest transport.
pub type ReqwestMessagePublisher = MessagePublisher<ReqwestTransport>;

/// Publishes opaque payloads to a hub's per-device messages resource.
///
/// Every publish mints a fresh signature; expired credentials are never
/// reused or refreshed.
#[derive(Clone)]
pub struct MessagePublisher<C>
where
	C: ?Sized + AgentTransport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<C>,
	/// Indicator lit while a publish is in flight.
	pub indicator: Arc<dyn BusyIndicator>,
	/// Namespace base URL (scheme + host).
	pub endpoint: Url,
	/// Hub the messages are published to.
	pub hub: HubName,
	/// Device the messages are attributed to.
	pub device: DeviceId,
	/// Name of the shared access policy key.
	pub key_name: KeyName,
	/// Validity window for minted signatures.
	pub token_ttl: Duration,
	key: SigningKey,
}
impl<C> MessagePublisher<C>
where
	C: ?Sized + AgentTransport,
{
	/// Creates a publisher that reuses the caller-provided transport.
	pub fn with_transport(
		transport: impl Into<Arc<C>>,
		endpoint: Url,
		hub: HubName,
		device: DeviceId,
		key_name: KeyName,
		key: SigningKey,
	) -> Self {
		Self {
			transport: transport.into(),
			indicator: Arc::new(NullIndicator),
			endpoint,
			hub,
			device,
			key_name,
			token_ttl: sas::DEFAULT_TTL,
			key,
		}
	}

	/// Sets or replaces the indicator lit during publishes.
	pub fn with_indicator(mut self, indicator: Arc<dyn BusyIndicator>) -> Self {
		self.indicator = indicator;

		self
	}

	/// Overrides the validity window for minted signatures (defaults to one hour).
	pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
		self.token_ttl = ttl;

		self
	}

	/// URL of the per-device messages resource.
	pub fn messages_url(&self) -> Result<Url> {
		self.endpoint
			.join(&format!("{}/publishers/{}/messages", self.hub, self.device))
			.map_err(|source| ConfigError::InvalidEndpoint { source }.into())
	}

	/// Mints a fresh signature covering the messages resource.
	pub fn mint_token(&self, now: OffsetDateTime) -> Result<SasToken> {
		let url = self.messages_url()?;
		let token =
			SasToken::sign(url.as_str(), self.key_name.clone(), &self.key, now, self.token_ttl)?;

		Ok(token)
	}

	/// Publishes one payload, minting a fresh signature for the call.
	pub async fn publish(&self, payload: impl Into<Vec<u8>>) -> Result<()> {
		const KIND: CycleKind = CycleKind::Publish;

		let span = CycleSpan::new(KIND, "publish");

		obs::record_cycle_outcome(KIND, CycleOutcome::Attempt);

		let body = payload.into();
		let result = span
			.instrument(async move {
				let _busy = IndicatorGuard::lit(self.indicator.as_ref());
				let url = self.messages_url()?;
				let token = SasToken::sign(
					url.as_str(),
					self.key_name.clone(),
					&self.key,
					OffsetDateTime::now_utc(),
					self.token_ttl,
				)?;
				let response = self
					.transport
					.post(PostRequest {
						url,
						authorization: token.to_string(),
						content_type: MESSAGE_CONTENT_TYPE,
						body,
					})
					.await?;

				if response.is_success() {
					tracing::info!(status = response.status, "message published");

					Ok(())
				} else {
					Err(TransientError::MessageEndpoint { status: response.status }.into())
				}
			})
			.await;

		match &result {
			Ok(()) => obs::record_cycle_outcome(KIND, CycleOutcome::Success),
			Err(err) => {
				tracing::warn!(error = %err, "publish failed");
				obs::record_cycle_outcome(KIND, CycleOutcome::Failure);
			},
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl MessagePublisher<ReqwestTransport> {
	/// Creates a publisher with the crate's default reqwest transport.
	pub fn new(
		endpoint: Url,
		hub: HubName,
		device: DeviceId,
		key_name: KeyName,
		key: SigningKey,
	) -> Self {
		Self::with_transport(ReqwestTransport::default(), endpoint, hub, device, key_name, key)
	}
}
impl<C> Debug for MessagePublisher<C>
where
	C: ?Sized + AgentTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MessagePublisher")
			.field("endpoint", &self.endpoint)
			.field("hub", &self.hub)
			.field("device", &self.device)
			.field("key_name", &self.key_name)
			.field("key", &"<redacted>")
			.finish()
	}
}
