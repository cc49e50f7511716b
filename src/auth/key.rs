//! Redacted wrapper for pre-shared signing-key material.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
// self
use crate::{_prelude::*, error::EncodingError};

/// Redacted signing-key wrapper keeping pre-shared key material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);
impl SigningKey {
	/// Wraps raw key bytes.
	pub fn new(material: impl Into<Vec<u8>>) -> Self {
		Self(material.into())
	}

	/// Decodes a key from the base64 form access policies are shared in.
	pub fn from_base64(encoded: &str) -> Result<Self, EncodingError> {
		Ok(Self(STANDARD.decode(encoded)?))
	}

	/// Returns the raw key bytes. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		&self.0
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningKey").field(&"<redacted>").finish()
	}
}
impl Display for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn key_formatters_redact() {
		let key = SigningKey::new(b"super-secret".to_vec());

		assert_eq!(format!("{key:?}"), "SigningKey(\"<redacted>\")");
		assert_eq!(format!("{key}"), "<redacted>");
	}

	#[test]
	fn base64_keys_decode_to_raw_material() {
		let key = SigningKey::from_base64("AAECAwQ=")
			.expect("Base64 key fixture should decode successfully.");

		assert_eq!(key.expose(), &[0, 1, 2, 3, 4]);
		assert!(SigningKey::from_base64("not base64!").is_err());
	}
}
