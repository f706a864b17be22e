use clap::Parser;

use crate::cache::DEFAULT_CAPACITY;

/// Engine construction options.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
	/// Maximum number of cached entries (rankings and pairwise scores).
	pub cache_capacity: usize,
	/// Seed for the freshness PRNG; `None` seeds from OS entropy.
	pub freshness_seed: Option<u64>,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			cache_capacity: DEFAULT_CAPACITY,
			freshness_seed: None,
		}
	}
}

#[derive(Parser, Debug)]
#[command(
	name = "profile-discovery-engine",
	about = "Profile discovery engine over JSON-RPC 2.0 / NDJSON stdio"
)]
pub struct CliArgs {
	/// JSON file with profiles to load at startup (an array or `{ "profiles": [...] }`)
	#[arg(long, env = "PROFILE_DISCOVERY_PROFILES")]
	pub profiles: Option<String>,

	/// Maximum number of cache entries before LRU eviction
	#[arg(long, default_value_t = DEFAULT_CAPACITY, env = "PROFILE_DISCOVERY_CACHE_CAPACITY")]
	pub cache_capacity: usize,

	/// Seed for the simulated freshness signal (reproducible rankings)
	#[arg(long, env = "PROFILE_DISCOVERY_FRESHNESS_SEED")]
	pub freshness_seed: Option<u64>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(long, default_value = "info", env = "PROFILE_DISCOVERY_LOG_LEVEL")]
	pub log_level: String,
}

impl CliArgs {
	pub fn engine_config(&self) -> EngineConfig {
		EngineConfig {
			cache_capacity: self.cache_capacity,
			freshness_seed: self.freshness_seed,
		}
	}
}
