//! Busy-indicator contract for surfacing in-flight API calls on device hardware.

/// On/off output signaling that an API call is in progress.
///
/// Purely observational; nothing reads the indicator back and no control
/// semantics attach to it.
pub trait BusyIndicator
where
	Self: Send + Sync,
{
	/// Turns the indicator on or off.
	fn set(&self, lit: bool);
}

/// Indicator that discards every signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullIndicator;
impl BusyIndicator for NullIndicator {
	fn set(&self, _lit: bool) {}
}

/// Guard that keeps an indicator lit until dropped, including on error paths.
pub struct IndicatorGuard<'a>(&'a dyn BusyIndicator);
impl<'a> IndicatorGuard<'a> {
	/// Lights the indicator and returns the guard that will extinguish it.
	pub fn lit(indicator: &'a dyn BusyIndicator) -> Self {
		indicator.set(true);

		Self(indicator)
	}
}
impl Drop for IndicatorGuard<'_> {
	fn drop(&mut self) {
		self.0.set(false);
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
	// self
	use super::*;

	#[derive(Default)]
	struct Recording {
		lit: AtomicBool,
		toggles: AtomicUsize,
	}
	impl BusyIndicator for Recording {
		fn set(&self, lit: bool) {
			self.lit.store(lit, Ordering::SeqCst);
			self.toggles.fetch_add(1, Ordering::SeqCst);
		}
	}

	#[test]
	fn guard_extinguishes_on_drop() {
		let indicator = Recording::default();

		{
			let _guard = IndicatorGuard::lit(&indicator);

			assert!(indicator.lit.load(Ordering::SeqCst));
		}

		assert!(!indicator.lit.load(Ordering::SeqCst));
		assert_eq!(indicator.toggles.load(Ordering::SeqCst), 2);
	}
}
