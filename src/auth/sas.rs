//! Shared-access-signature minting, rendering, and parsing.
//!
//! A signature grants time-limited access to a single resource URI. Tokens are
//! deterministic for a fixed `now`, immutable once minted, and minted fresh
//! (never refreshed) after expiry.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use sha2::Sha256;
// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, KeyName, SigningKey},
	error::EncodingError,
};

type HmacSha256 = Hmac<Sha256>;

/// Validity window applied when no explicit TTL is supplied.
pub const DEFAULT_TTL: Duration = Duration::seconds(3600);

const LABEL: &str = "SharedAccessSignature ";
/// Characters that pass URI-component encoding untouched. Everything else is
/// percent-encoded; space becomes `%20`, never `+`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Percent-encodes a URI component.
pub fn percent_encode_component(input: &str) -> String {
	utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Errors produced when parsing a wire-form signature string.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SasParseError {
	/// The string does not start with the `SharedAccessSignature` label.
	#[error("Signature string is missing the SharedAccessSignature label.")]
	MissingLabel,
	/// A required parameter is absent.
	#[error("Signature string is missing `{field}`.")]
	MissingField {
		/// Name of the absent parameter.
		field: &'static str,
	},
	/// The expiry parameter is not an integer.
	#[error("Signature expiry is not an integer.")]
	InvalidExpiry,
	/// A percent-encoded parameter did not decode to UTF-8.
	#[error("Signature field `{field}` is not valid UTF-8.")]
	NonUtf8Field {
		/// Name of the offending parameter.
		field: &'static str,
	},
	/// The key name is not a valid identifier.
	#[error("Signature key name is invalid.")]
	InvalidKeyName(#[from] IdentifierError),
}

/// Immutable, time-limited signature scoped to a single resource URI.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SasToken {
	/// Resource URI the signature grants access to.
	pub resource_uri: String,
	/// Expiry instant in Unix epoch seconds.
	pub expiry: i64,
	/// Base64-encoded HMAC-SHA256 signature. Callers must avoid logging it.
	pub signature: String,
	/// Name of the shared access policy key that produced the signature.
	pub key_name: KeyName,
}
impl SasToken {
	/// Mints a signature over `resource_uri`, valid for `ttl` from `now`.
	///
	/// The output is deterministic for a fixed `now`. The only failure source
	/// is key material the HMAC implementation rejects.
	pub fn sign(
		resource_uri: impl Into<String>,
		key_name: KeyName,
		key: &SigningKey,
		now: OffsetDateTime,
		ttl: Duration,
	) -> Result<Self, EncodingError> {
		let resource_uri = resource_uri.into();
		let expiry = (now + ttl).unix_timestamp();
		let string_to_sign = format!("{}\n{expiry}", percent_encode_component(&resource_uri));
		let mut mac = HmacSha256::new_from_slice(key.expose())
			.map_err(|_| EncodingError::KeyRejected)?;

		mac.update(string_to_sign.as_bytes());

		let signature = STANDARD.encode(mac.finalize().into_bytes());

		Ok(Self { resource_uri, expiry, signature, key_name })
	}

	/// Returns `true` if the signature has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant.unix_timestamp() >= self.expiry
	}

	/// Returns `true` if the signature is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Validity remaining at the provided instant; zero once expired.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expiry - instant.unix_timestamp();

		if remaining <= 0 { Duration::ZERO } else { Duration::seconds(remaining) }
	}
}
impl Display for SasToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"{LABEL}sr={}&sig={}&se={}&skn={}",
			percent_encode_component(&self.resource_uri),
			percent_encode_component(&self.signature),
			self.expiry,
			self.key_name,
		)
	}
}
impl Debug for SasToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SasToken")
			.field("resource_uri", &self.resource_uri)
			.field("expiry", &self.expiry)
			.field("signature", &"<redacted>")
			.field("key_name", &self.key_name)
			.finish()
	}
}
impl FromStr for SasToken {
	type Err = SasParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let params = s.strip_prefix(LABEL).ok_or(SasParseError::MissingLabel)?;
		let mut resource_uri = None;
		let mut signature = None;
		let mut expiry = None;
		let mut key_name = None;

		for pair in params.split('&') {
			let (name, value) = pair.split_once('=').unwrap_or((pair, ""));

			match name {
				"sr" => resource_uri = Some(decode_field("sr", value)?),
				"sig" => signature = Some(decode_field("sig", value)?),
				"se" =>
					expiry =
						Some(value.parse::<i64>().map_err(|_| SasParseError::InvalidExpiry)?),
				"skn" => key_name = Some(KeyName::new(value)?),
				_ => {},
			}
		}

		Ok(Self {
			resource_uri: resource_uri.ok_or(SasParseError::MissingField { field: "sr" })?,
			expiry: expiry.ok_or(SasParseError::MissingField { field: "se" })?,
			signature: signature.ok_or(SasParseError::MissingField { field: "sig" })?,
			key_name: key_name.ok_or(SasParseError::MissingField { field: "skn" })?,
		})
	}
}
impl TryFrom<String> for SasToken {
	type Error = SasParseError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl From<SasToken> for String {
	fn from(token: SasToken) -> Self {
		token.to_string()
	}
}

fn decode_field(field: &'static str, value: &str) -> Result<String, SasParseError> {
	percent_decode_str(value)
		.decode_utf8()
		.map(|decoded| decoded.into_owned())
		.map_err(|_| SasParseError::NonUtf8Field { field })
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn key_name() -> KeyName {
		KeyName::new("device-policy").expect("Key name fixture should be valid.")
	}

	#[test]
	fn component_encoding_matches_uri_component_rules() {
		assert_eq!(
			percent_encode_component("https://ns.example.net/hub"),
			"https%3A%2F%2Fns.example.net%2Fhub",
		);
		assert_eq!(percent_encode_component("a b!~*'()-_."), "a%20b!~*'()-_.");
		assert_eq!(percent_encode_component("plus+and=amp&"), "plus%2Band%3Damp%26");
	}

	#[test]
	fn expiry_boundaries_are_inclusive() {
		let key = SigningKey::new(b"key-material".to_vec());
		let now = macros::datetime!(2015-06-17 12:00 UTC);
		let token = SasToken::sign("https://ns.example.net/hub", key_name(), &key, now, DEFAULT_TTL)
			.expect("Signing fixture should succeed.");

		assert!(!token.is_expired_at(now + Duration::seconds(3599)));
		assert!(token.is_expired_at(now + Duration::seconds(3600)));
		assert_eq!(token.remaining_at(now), Duration::seconds(3600));
		assert_eq!(token.remaining_at(now + Duration::seconds(3601)), Duration::ZERO);
	}

	#[test]
	fn debug_redacts_the_signature() {
		let key = SigningKey::new(b"key-material".to_vec());
		let token = SasToken::sign(
			"https://ns.example.net/hub",
			key_name(),
			&key,
			macros::datetime!(2015-06-17 12:00 UTC),
			DEFAULT_TTL,
		)
		.expect("Signing fixture should succeed.");
		let rendered = format!("{token:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains(&token.signature));
	}

	#[test]
	fn parsing_rejects_malformed_strings() {
		assert_eq!(
			"sr=a&sig=b&se=1&skn=k".parse::<SasToken>(),
			Err(SasParseError::MissingLabel),
		);
		assert_eq!(
			"SharedAccessSignature sig=b&se=1&skn=k".parse::<SasToken>(),
			Err(SasParseError::MissingField { field: "sr" }),
		);
		assert_eq!(
			"SharedAccessSignature sr=a&sig=b&se=soon&skn=k".parse::<SasToken>(),
			Err(SasParseError::InvalidExpiry),
		);
	}
}
