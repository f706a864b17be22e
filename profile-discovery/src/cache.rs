// ---------------------------------------------------------------------------
// Result cache — bounded LRU over request rankings and pairwise scores
// ---------------------------------------------------------------------------
//
// Keys are structured rather than concatenated strings, so invalidating a
// user never matches another id that merely contains it. Entries are evicted
// least-recently-used first once `capacity` is exceeded.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::types::{FilterCriteria, Profile};

pub const DEFAULT_CAPACITY: usize = 10_000;

// ---------------------------------------------------------------------------
// Keys and values
// ---------------------------------------------------------------------------

/// Which pairwise computation a cached score belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKind {
	Interest,
	Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
	/// A full ranking for one user, filter set and history state.
	Request {
		user_id: String,
		filters: String,
		liked: usize,
		disliked: usize,
	},
	/// A symmetric score for an unordered id pair (`a <= b`).
	Pair { kind: PairKind, a: String, b: String },
}

impl CacheKey {
	/// Request key for `user` and an already-normalized filter.
	pub fn request(user: &Profile, filters: &FilterCriteria) -> Self {
		Self::Request {
			user_id: user.id.clone(),
			filters: filters.cache_fragment(),
			liked: user.liked.len(),
			disliked: user.disliked.len(),
		}
	}

	pub fn pair(kind: PairKind, a: &str, b: &str) -> Self {
		let (a, b) = if a <= b { (a, b) } else { (b, a) };
		Self::Pair {
			kind,
			a: a.to_string(),
			b: b.to_string(),
		}
	}

	/// True if this key was derived from `id`'s state.
	pub fn references(&self, id: &str) -> bool {
		match self {
			Self::Request { user_id, .. } => user_id == id,
			Self::Pair { a, b, .. } => a == id || b == id,
		}
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Request {
				user_id,
				filters,
				liked,
				disliked,
			} => write!(f, "request:{}:{}:{}:{}", user_id, filters, liked, disliked),
			Self::Pair { kind, a, b } => {
				let kind = match kind {
					PairKind::Interest => "interest",
					PairKind::Profile => "profile",
				};
				write!(f, "{}:{}:{}", kind, a, b)
			}
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
	Score(f64),
	/// JSON-encoded ranking.
	Ranking(String),
}

// ---------------------------------------------------------------------------
// ResultCache
// ---------------------------------------------------------------------------

struct Slot {
	value: CacheValue,
	tick: u64,
}

pub struct ResultCache {
	capacity: usize,
	entries: HashMap<CacheKey, Slot>,
	/// Recency order: tick -> key, oldest first.
	order: BTreeMap<u64, CacheKey>,
	next_tick: u64,
}

impl ResultCache {
	/// A capacity of zero disables caching.
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			entries: HashMap::new(),
			order: BTreeMap::new(),
			next_tick: 0,
		}
	}

	fn tick(&mut self) -> u64 {
		let t = self.next_tick;
		self.next_tick += 1;
		t
	}

	/// Look up a value, promoting it to most-recently-used on hit.
	pub fn get(&mut self, key: &CacheKey) -> Option<&CacheValue> {
		if !self.entries.contains_key(key) {
			return None;
		}
		let tick = self.tick();
		let slot = self.entries.get_mut(key)?;
		if let Some(k) = self.order.remove(&slot.tick) {
			self.order.insert(tick, k);
		}
		slot.tick = tick;
		Some(&slot.value)
	}

	/// Insert or replace, then evict down to capacity.
	pub fn put(&mut self, key: CacheKey, value: CacheValue) {
		if self.capacity == 0 {
			return;
		}
		let tick = self.tick();
		if let Some(old) = self.entries.insert(key.clone(), Slot { value, tick }) {
			self.order.remove(&old.tick);
		}
		self.order.insert(tick, key);
		self.evict();
	}

	fn evict(&mut self) {
		while self.entries.len() > self.capacity {
			let Some((_, key)) = self.order.pop_first() else {
				break;
			};
			self.entries.remove(&key);
		}
	}

	pub fn remove(&mut self, key: &CacheKey) -> bool {
		match self.entries.remove(key) {
			Some(slot) => {
				self.order.remove(&slot.tick);
				true
			}
			None => false,
		}
	}

	/// Drop every entry whose key references `id`. Returns how many were removed.
	pub fn invalidate(&mut self, id: &str) -> usize {
		let stale: Vec<CacheKey> = self
			.entries
			.keys()
			.filter(|k| k.references(id))
			.cloned()
			.collect();
		for key in &stale {
			self.remove(key);
		}
		stale.len()
	}

	/// Drop every request-level ranking, keeping pairwise scores.
	pub fn invalidate_rankings(&mut self) -> usize {
		let stale: Vec<CacheKey> = self
			.entries
			.keys()
			.filter(|k| matches!(k, CacheKey::Request { .. }))
			.cloned()
			.collect();
		for key in &stale {
			self.remove(key);
		}
		stale.len()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
		self.order.clear();
	}

	pub fn size(&self) -> usize {
		self.entries.len()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Rendered keys, least-recently-used first.
	pub fn keys(&self) -> Vec<String> {
		self.order.values().map(|k| k.to_string()).collect()
	}
}

impl Default for ResultCache {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY)
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
