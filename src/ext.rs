//! External collaborator contracts (busy indicators, sensor probes, network time).
//!
//! The crate intentionally exposes small traits with minimal default
//! implementations so device integrations can bring their own hardware
//! bindings without expanding the surface of `telemetry-agent` itself.

pub mod busy_indicator;
pub mod sensor;
pub mod time_source;

pub use busy_indicator::*;
pub use sensor::*;
pub use time_source::*;
