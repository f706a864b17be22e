// ---------------------------------------------------------------------------
// DiscoveryEngine — ranked profile discovery with behavioral feedback
// ---------------------------------------------------------------------------
//
// Owns the profile store, the result cache, the performance counters and the
// freshness source. Every operation runs to completion on the caller's
// thread; callers that share an engine across threads wrap it in a single
// lock so an interaction is always visible to the next `discover`.
// ---------------------------------------------------------------------------

use std::collections::HashSet;
use std::time::Instant;

use crate::behavioral::behavioral_score;
use crate::cache::{CacheKey, CacheValue, PairKind, ResultCache};
use crate::config::EngineConfig;
use crate::error::DiscoveryError;
use crate::freshness::{FreshnessSource, SeededFreshness};
use crate::metrics::PerformanceMetrics;
use crate::scoring::{compute_compatibility, match_reasons, CompatibilityInput};
use crate::similarity::{combine, interest_similarity, similarity_breakdown};
use crate::store::ProfileStore;
use crate::types::{
	Action, CacheStats, FilterCriteria, InteractionOutcome, Profile, ScoredCandidate,
	SimilarityBreakdown,
};

pub const DEFAULT_DISCOVER_COUNT: usize = 10;

pub struct DiscoveryEngine {
	store: ProfileStore,
	cache: ResultCache,
	metrics: PerformanceMetrics,
	freshness: Box<dyn FreshnessSource>,
}

impl DiscoveryEngine {
	pub fn new(config: EngineConfig) -> Self {
		let freshness: Box<dyn FreshnessSource> = match config.freshness_seed {
			Some(seed) => Box::new(SeededFreshness::new(seed)),
			None => Box::new(SeededFreshness::from_entropy()),
		};
		Self::with_freshness(config, freshness)
	}

	/// Build an engine with a caller-supplied freshness signal.
	pub fn with_freshness(config: EngineConfig, freshness: Box<dyn FreshnessSource>) -> Self {
		Self {
			store: ProfileStore::new(),
			cache: ResultCache::new(config.cache_capacity),
			metrics: PerformanceMetrics::default(),
			freshness,
		}
	}

	// ── Ingest ────────────────────────────────────────────────────────────

	/// Insert or overwrite a profile by id.
	pub fn add_profile(&mut self, profile: Profile) -> Result<(), DiscoveryError> {
		profile.validate()?;
		let id = profile.id.clone();
		if self.store.add_profile(profile) {
			let removed = self.cache.invalidate(&id);
			tracing::debug!(id = %id, removed, "Profile replaced, cache entries invalidated");
		}
		self.cache.invalidate_rankings();
		Ok(())
	}

	/// Insert or overwrite a batch of profiles. Nothing is inserted if any
	/// profile fails validation.
	pub fn add_all(&mut self, profiles: Vec<Profile>) -> Result<usize, DiscoveryError> {
		for profile in &profiles {
			profile.validate()?;
		}
		let mut count = 0;
		for profile in profiles {
			let id = profile.id.clone();
			if self.store.add_profile(profile) {
				self.cache.invalidate(&id);
			}
			count += 1;
		}
		self.cache.invalidate_rankings();
		tracing::info!(count, total = self.store.len(), "Profiles loaded");
		Ok(count)
	}

	pub fn get(&self, id: &str) -> Option<&Profile> {
		self.store.get(id)
	}

	pub fn profile_count(&self) -> usize {
		self.store.len()
	}

	// ── Mutation ──────────────────────────────────────────────────────────

	/// Record a like or dislike and invalidate every cache entry derived
	/// from the acting user's state.
	pub fn record_interaction(
		&mut self,
		user_id: &str,
		target_id: &str,
		action: Action,
	) -> InteractionOutcome {
		let outcome = self.store.record_interaction(user_id, target_id, action);
		match outcome {
			InteractionOutcome::Recorded => {
				if !self.store.contains(target_id) {
					tracing::debug!(target = %target_id, "Interaction target not loaded");
				}
				let removed = self.cache.invalidate(user_id);
				tracing::debug!(
					user = %user_id,
					target = %target_id,
					?action,
					removed,
					"Interaction recorded"
				);
			}
			InteractionOutcome::UnknownUser => {
				tracing::warn!(user = %user_id, "Interaction ignored: unknown user");
			}
		}
		outcome
	}

	// ── Query ─────────────────────────────────────────────────────────────

	/// Up to `count` candidates for `user_id`, best first.
	///
	/// Unknown users get an empty result. Repeated calls with the same
	/// filters and unchanged history return the cached ranking unchanged.
	pub fn discover(
		&mut self,
		user_id: &str,
		count: usize,
		filters: &FilterCriteria,
	) -> Vec<ScoredCandidate> {
		let started = Instant::now();
		let Self {
			store,
			cache,
			metrics,
			freshness,
		} = self;
		let store = &*store;

		let Some(user) = store.get(user_id) else {
			tracing::debug!(user = %user_id, "Discover for unknown user");
			return Vec::new();
		};

		let filters = filters.normalized();
		let key = CacheKey::request(user, &filters);

		if let Some(CacheValue::Ranking(encoded)) = cache.get(&key) {
			match serde_json::from_str::<Vec<ScoredCandidate>>(encoded) {
				Ok(mut results) => {
					results.truncate(count);
					metrics.record_hit();
					metrics.record_response_time(started.elapsed());
					tracing::debug!(user = %user_id, results = results.len(), "Ranking cache hit");
					return results;
				}
				Err(e) => {
					tracing::warn!(user = %user_id, error = %e, "Cached ranking undecodable, recomputing");
				}
			}
		}
		metrics.record_miss();

		let seen: HashSet<&str> = user
			.liked
			.iter()
			.chain(user.disliked.iter())
			.map(String::as_str)
			.collect();

		let mut scored = Vec::new();
		for candidate in store.iter() {
			if candidate.id == user.id || seen.contains(candidate.id.as_str()) {
				continue;
			}
			if !filters.matches(candidate) {
				continue;
			}

			let profile_similarity = cached_profile_similarity(cache, metrics, user, candidate);
			let behavioral = behavioral_score(user, candidate, store, |a, b| {
				cached_profile_similarity(cache, metrics, a, b)
			});
			let result = compute_compatibility(&CompatibilityInput {
				profile_similarity,
				behavioral,
				freshness: freshness.freshness(candidate),
			});

			scored.push(ScoredCandidate {
				profile: candidate.clone(),
				score: result.score,
				reasons: match_reasons(user, candidate),
				breakdown: result.breakdown,
			});
		}

		// Stable: equal scores keep store insertion order.
		scored.sort_by(|a, b| b.score.total_cmp(&a.score));

		// The full ranking is cached so any `count` can be served from it.
		match serde_json::to_string(&scored) {
			Ok(encoded) => cache.put(key, CacheValue::Ranking(encoded)),
			Err(e) => tracing::warn!(user = %user_id, error = %e, "Failed to encode ranking"),
		}
		scored.truncate(count);

		metrics.record_response_time(started.elapsed());
		tracing::debug!(user = %user_id, results = scored.len(), "Ranking computed");
		scored
	}

	/// Per-calculator similarity between two stored profiles.
	pub fn similarity_breakdown(&self, a: &str, b: &str) -> Option<SimilarityBreakdown> {
		let a = self.store.get(a)?;
		let b = self.store.get(b)?;
		Some(similarity_breakdown(a, b))
	}

	// ── Introspection ─────────────────────────────────────────────────────

	pub fn performance_metrics(&self) -> PerformanceMetrics {
		self.metrics.clone()
	}

	pub fn cache_stats(&self) -> CacheStats {
		CacheStats {
			size: self.cache.size(),
			capacity: self.cache.capacity(),
			keys: self.cache.keys(),
		}
	}

	/// Drop all cached entries. Stored histories are untouched.
	pub fn clear_cache(&mut self) {
		self.cache.clear();
	}
}

impl Default for DiscoveryEngine {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

// ---------------------------------------------------------------------------
// Memoized pairwise similarity
// ---------------------------------------------------------------------------

fn cached_interest_similarity(
	cache: &mut ResultCache,
	metrics: &mut PerformanceMetrics,
	a: &Profile,
	b: &Profile,
) -> f64 {
	let key = CacheKey::pair(PairKind::Interest, &a.id, &b.id);
	if let Some(&CacheValue::Score(s)) = cache.get(&key) {
		metrics.record_hit();
		return s;
	}
	metrics.record_miss();
	metrics.record_calculation();
	let s = interest_similarity(a, b);
	cache.put(key, CacheValue::Score(s));
	s
}

fn cached_profile_similarity(
	cache: &mut ResultCache,
	metrics: &mut PerformanceMetrics,
	a: &Profile,
	b: &Profile,
) -> f64 {
	let key = CacheKey::pair(PairKind::Profile, &a.id, &b.id);
	if let Some(&CacheValue::Score(s)) = cache.get(&key) {
		metrics.record_hit();
		return s;
	}
	metrics.record_miss();
	metrics.record_calculation();
	let interest = cached_interest_similarity(cache, metrics, a, b);
	let s = combine(a, b, interest);
	cache.put(key, CacheValue::Score(s));
	s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
