// ---------------------------------------------------------------------------
// Performance counters
// ---------------------------------------------------------------------------

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Weight given to the newest sample in the response-time average.
const RESPONSE_TIME_ALPHA: f64 = 0.2;

/// Process-lifetime counters, reset only by replacing the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
	/// Pairwise similarity computations actually performed (cache misses).
	pub total_calculations: u64,
	pub cache_hits: u64,
	pub cache_misses: u64,
	/// `discover` calls answered for a known user.
	pub total_requests: u64,
	/// Exponential moving average of `discover` latency in milliseconds.
	pub average_response_time_ms: f64,
}

impl PerformanceMetrics {
	pub fn record_hit(&mut self) {
		self.cache_hits += 1;
	}

	pub fn record_miss(&mut self) {
		self.cache_misses += 1;
	}

	pub fn record_calculation(&mut self) {
		self.total_calculations += 1;
	}

	pub fn record_response_time(&mut self, elapsed: Duration) {
		let ms = elapsed.as_secs_f64() * 1000.0;
		self.average_response_time_ms = if self.total_requests == 0 {
			ms
		} else {
			RESPONSE_TIME_ALPHA * ms + (1.0 - RESPONSE_TIME_ALPHA) * self.average_response_time_ms
		};
		self.total_requests += 1;
	}

	/// Hits over all lookups, 0 when nothing has been looked up.
	pub fn hit_rate(&self) -> f64 {
		let lookups = self.cache_hits + self.cache_misses;
		if lookups == 0 {
			return 0.0;
		}
		self.cache_hits as f64 / lookups as f64
	}
}
