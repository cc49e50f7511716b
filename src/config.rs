//! Remote device configuration: wire model, validated snapshot, and the shared slot.

// self
use crate::{_prelude::*, auth::SasToken, error::ConfigError};

/// Raw configuration document returned by the configuration endpoint.
///
/// Mirrors the wire shape one-for-one; [`DeviceConfig`] is the validated form
/// the cycles act on. Period fields arrive as JSON numbers or decimal strings
/// depending on the backend, so both are accepted.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
	/// Whether the device is authorized to report.
	pub authorized: bool,
	/// Seconds between configuration refreshes.
	#[serde(default, deserialize_with = "period::deserialize")]
	pub config_refresh_period: Option<u64>,
	/// Seconds between measurements.
	#[serde(default, deserialize_with = "period::deserialize")]
	pub measurement_period: Option<u64>,
	/// Seconds between uploads.
	#[serde(default, deserialize_with = "period::deserialize")]
	pub upload_period: Option<u64>,
	/// Opaque host connection document; never interpreted by the agent.
	#[serde(default)]
	pub host: Option<serde_json::Value>,
	/// Server-issued shared access signature in wire form.
	#[serde(default)]
	pub sas: Option<String>,
	/// Optional server-supplied status message (set on denials).
	#[serde(default)]
	pub message: Option<String>,
}

/// Validated configuration snapshot acted on by the cycles.
///
/// Snapshots are immutable and replaced wholesale on every successful poll;
/// they are never merged or partially updated. Callers check `authorized` on
/// the wire document before converting.
#[derive(Clone, Debug)]
pub struct DeviceConfig {
	/// Interval between measurements.
	pub measurement_period: StdDuration,
	/// Interval between uploads.
	pub upload_period: StdDuration,
	/// Interval between configuration refreshes.
	pub config_refresh_period: StdDuration,
	/// Server-issued signature for the reporting host.
	pub signed_token: SasToken,
	/// Opaque host connection document.
	pub host: serde_json::Value,
}
impl TryFrom<ConfigResponse> for DeviceConfig {
	type Error = ConfigError;

	fn try_from(wire: ConfigResponse) -> Result<Self, Self::Error> {
		let measurement_period = require_period("measurementPeriod", wire.measurement_period)?;
		let upload_period = require_period("uploadPeriod", wire.upload_period)?;
		let config_refresh_period =
			require_period("configRefreshPeriod", wire.config_refresh_period)?;
		let sas = wire.sas.ok_or(ConfigError::MissingField { field: "sas" })?;
		let signed_token = sas.parse::<SasToken>()?;

		Ok(Self {
			measurement_period,
			upload_period,
			config_refresh_period,
			signed_token,
			host: wire.host.unwrap_or(serde_json::Value::Null),
		})
	}
}

fn require_period(field: &'static str, value: Option<u64>) -> Result<StdDuration, ConfigError> {
	match value {
		None => Err(ConfigError::MissingField { field }),
		Some(0) => Err(ConfigError::NonPositivePeriod { field }),
		Some(seconds) => Ok(StdDuration::from_secs(seconds)),
	}
}

/// Shared configuration snapshot with exactly one writer (the configuration cycle).
///
/// Replacement is wholesale; readers clone the current snapshot and never
/// observe partial updates.
#[derive(Clone, Debug, Default)]
pub struct ConfigSlot(Arc<RwLock<Option<DeviceConfig>>>);
impl ConfigSlot {
	/// Stores a new snapshot, dropping any previous one.
	pub fn replace(&self, config: DeviceConfig) {
		*self.0.write() = Some(config);
	}

	/// Clears the snapshot, forcing dependent cycles onto their retry path.
	pub fn clear(&self) {
		*self.0.write() = None;
	}

	/// Returns a copy of the current snapshot, if any.
	pub fn snapshot(&self) -> Option<DeviceConfig> {
		self.0.read().clone()
	}

	/// Returns `true` while no snapshot is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_none()
	}
}

mod period {
	// crates.io
	use serde::{Deserialize, Deserializer, de::Error as DeError};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Raw {
		Seconds(u64),
		Text(String),
	}

	pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
	where
		D: Deserializer<'de>,
	{
		let Some(raw) = Option::<Raw>::deserialize(deserializer)? else {
			return Ok(None);
		};

		match raw {
			Raw::Seconds(value) => Ok(Some(value)),
			Raw::Text(text) => text
				.trim()
				.parse::<u64>()
				.map(Some)
				.map_err(|_| DeError::custom("period strings must be decimal seconds")),
		}
	}
}
