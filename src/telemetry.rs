//! Telemetry record model and the key layout of the day-partitioned table.

// self
use crate::{_prelude::*, auth::DeviceId};

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Single sensor reading addressed by the table's composite key.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Measurement {
	/// Day bucket the reading belongs to.
	pub partition_key: String,
	/// Inverted time-of-day key; rows sort newest-first within a partition.
	pub row_key: String,
	/// Temperature reading in degrees Celsius.
	pub temperature: f64,
	/// Relative humidity reading in percent.
	pub humidity: f64,
	/// Network-time instant the reading was taken.
	#[serde(with = "time::serde::rfc3339")]
	pub measured_at: OffsetDateTime,
}
impl Measurement {
	/// Builds a reading keyed for the provided device and instant.
	pub fn new(
		device: &DeviceId,
		measured_at: OffsetDateTime,
		temperature: f64,
		humidity: f64,
	) -> Self {
		Self {
			partition_key: partition_key(device, measured_at),
			row_key: row_key(measured_at),
			temperature,
			humidity,
			measured_at,
		}
	}
}

/// Day bucket for a device.
///
/// The day component is the weekday index (Sunday = 0), not the day of the
/// month; existing tables are partitioned this way, so the layout is retained.
pub fn partition_key(device: &DeviceId, instant: OffsetDateTime) -> String {
	format!(
		"{device}|{}{:02}{:02}",
		instant.year(),
		u8::from(instant.month()),
		instant.weekday().number_days_from_sunday(),
	)
}

/// Seconds left in the day, zero-padded to five digits.
///
/// Later instants produce smaller keys, so lexicographic order within a day
/// is newest-first.
pub fn row_key(instant: OffsetDateTime) -> String {
	let since_midnight = u32::from(instant.hour()) * 3600
		+ u32::from(instant.minute()) * 60
		+ u32::from(instant.second());

	format!("{:05}", SECONDS_PER_DAY - since_midnight)
}
