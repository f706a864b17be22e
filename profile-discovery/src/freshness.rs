// ---------------------------------------------------------------------------
// Freshness — simulated recency signal in [0.7, 1.0)
// ---------------------------------------------------------------------------

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::Profile;

pub const FRESHNESS_MIN: f64 = 0.7;
pub const FRESHNESS_MAX: f64 = 1.0;

/// Supplies the freshness term for one scoring call.
///
/// Values are sampled once per computed ranking; cached rankings keep the
/// values drawn when they were first computed.
pub trait FreshnessSource {
	fn freshness(&mut self, candidate: &Profile) -> f64;
}

/// Uniform draws from a seedable PRNG.
pub struct SeededFreshness {
	rng: StdRng,
}

impl SeededFreshness {
	/// Reproducible sequence for a given seed.
	pub fn new(seed: u64) -> Self {
		Self {
			rng: StdRng::seed_from_u64(seed),
		}
	}

	/// Seeded from operating-system entropy.
	pub fn from_entropy() -> Self {
		Self {
			rng: StdRng::from_os_rng(),
		}
	}
}

impl FreshnessSource for SeededFreshness {
	fn freshness(&mut self, _candidate: &Profile) -> f64 {
		self.rng.random_range(FRESHNESS_MIN..FRESHNESS_MAX)
	}
}

/// The same value for every candidate, clamped to the freshness range.
pub struct FixedFreshness(f64);

impl FixedFreshness {
	pub fn new(value: f64) -> Self {
		Self(value.clamp(FRESHNESS_MIN, FRESHNESS_MAX))
	}
}

impl FreshnessSource for FixedFreshness {
	fn freshness(&mut self, _candidate: &Profile) -> f64 {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidate() -> Profile {
		serde_json::from_str(
			r#"{"id":"c","institution":"X","fieldOfStudy":"CS","graduationYear":2025,"city":"Pune","age":21}"#,
		)
		.unwrap()
	}

	#[test]
	fn seeded_values_stay_in_range() {
		let mut source = SeededFreshness::new(7);
		let c = candidate();
		for _ in 0..1000 {
			let v = source.freshness(&c);
			assert!((FRESHNESS_MIN..FRESHNESS_MAX).contains(&v), "out of range: {v}");
		}
	}

	#[test]
	fn same_seed_same_sequence() {
		let c = candidate();
		let mut a = SeededFreshness::new(42);
		let mut b = SeededFreshness::new(42);
		for _ in 0..20 {
			assert_eq!(a.freshness(&c), b.freshness(&c));
		}
	}

	#[test]
	fn fixed_is_clamped() {
		let c = candidate();
		assert_eq!(FixedFreshness::new(0.85).freshness(&c), 0.85);
		assert_eq!(FixedFreshness::new(0.1).freshness(&c), FRESHNESS_MIN);
		assert_eq!(FixedFreshness::new(3.0).freshness(&c), FRESHNESS_MAX);
	}
}
