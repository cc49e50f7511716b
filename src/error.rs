//! Agent-level error types shared across cycles, transports, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical agent error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Store(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with jitter.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Signing-key material could not be used; fatal to the call, never retried.
	#[error(transparent)]
	Encoding(#[from] EncodingError),
	/// Network time source failure; an expected condition answered with a reschedule.
	#[error(transparent)]
	Clock(#[from] crate::ext::ClockError),

	/// Remote refused to authorize the device; any cached configuration must be dropped.
	#[error("Device authorization was denied{}.", reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
	AuthorizationDenied {
		/// Server-supplied message accompanying the denial, if any.
		reason: Option<String>,
	},
}
impl Error {
	/// Returns `true` for failures answered with a jittered reschedule.
	///
	/// Every class retries except [`EncodingError`], which is fatal to the single call.
	pub fn is_retryable(&self) -> bool {
		!matches!(self, Self::Encoding(_))
	}
}

/// Configuration and validation failures raised by the agent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// An endpoint URL could not be composed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configuration response omitted a required field.
	#[error("Configuration response is missing `{field}`.")]
	MissingField {
		/// Wire name of the absent field.
		field: &'static str,
	},
	/// A period field must be a positive number of seconds.
	#[error("Configuration period `{field}` must be positive.")]
	NonPositivePeriod {
		/// Wire name of the offending field.
		field: &'static str,
	},
	/// Server-issued signature string could not be parsed.
	#[error("Configuration carries an unusable shared access signature.")]
	InvalidSignature(#[from] crate::auth::SasParseError),
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Configuration endpoint responded with a body that could not be parsed.
	#[error("Configuration endpoint returned malformed JSON.")]
	ConfigResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Messages endpoint rejected the publish.
	#[error("Messages endpoint rejected the publish with status {status}.")]
	MessageEndpoint {
		/// HTTP status code returned by the endpoint.
		status: u16,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the remote endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Signing-key encoding failures; the one class that is never retried.
#[derive(Debug, ThisError)]
pub enum EncodingError {
	/// Key material is not valid base64.
	#[error("Signing key is not valid base64.")]
	KeyDecode(#[from] base64::DecodeError),
	/// HMAC initialization rejected the key material.
	#[error("Signing key was rejected by the HMAC implementation.")]
	KeyRejected,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn encoding_failures_are_the_only_non_retryable_class() {
		let encoding = Error::from(EncodingError::KeyRejected);
		let transport = Error::from(TransportError::network(std::io::Error::other("refused")));
		let denied = Error::AuthorizationDenied { reason: None };

		assert!(!encoding.is_retryable());
		assert!(transport.is_retryable());
		assert!(denied.is_retryable());
	}

	#[test]
	fn denial_display_carries_the_server_message() {
		let bare = Error::AuthorizationDenied { reason: None };
		let explained =
			Error::AuthorizationDenied { reason: Some("device not registered".into()) };

		assert_eq!(bare.to_string(), "Device authorization was denied.");
		assert_eq!(
			explained.to_string(),
			"Device authorization was denied: device not registered.",
		);
	}
}
