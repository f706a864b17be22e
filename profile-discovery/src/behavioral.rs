// ---------------------------------------------------------------------------
// Behavioral matcher — nearest-neighbour feedback over interaction history
// ---------------------------------------------------------------------------
//
// Scores a candidate by how similar it is to profiles the user recently
// liked, penalising candidates that closely resemble recent dislikes. Users
// with no likes fall back to demographic similarity (cold start).
// ---------------------------------------------------------------------------

use crate::similarity::demographic_similarity;
use crate::store::ProfileStore;
use crate::types::Profile;

pub const LIKE_WINDOW: usize = 10;
pub const DISLIKE_WINDOW: usize = 5;
pub const LIKE_THRESHOLD: f64 = 0.3;
pub const DISLIKE_THRESHOLD: f64 = 0.6;
pub const REJECTED_SCORE: f64 = 0.1;
pub const NEUTRAL_SCORE: f64 = 0.5;

/// The most recent `n` entries of a chronological history.
fn recent(history: &[String], n: usize) -> &[String] {
	&history[history.len().saturating_sub(n)..]
}

/// Behavioral score for `candidate` from `user`'s point of view.
///
/// `similarity` computes profile similarity between two profiles; the engine
/// passes a memoizing closure. History ids that do not resolve in `store` are
/// skipped.
pub fn behavioral_score<F>(
	user: &Profile,
	candidate: &Profile,
	store: &ProfileStore,
	mut similarity: F,
) -> f64
where
	F: FnMut(&Profile, &Profile) -> f64,
{
	if user.liked.is_empty() {
		return demographic_similarity(user, candidate);
	}

	let mut total = 0.0;
	let mut matched = 0usize;
	for liked in recent(&user.liked, LIKE_WINDOW)
		.iter()
		.filter_map(|id| store.get(id))
	{
		let s = similarity(candidate, liked);
		if s > LIKE_THRESHOLD {
			total += s;
			matched += 1;
		}
	}
	if matched > 0 {
		return total / matched as f64;
	}

	for disliked in recent(&user.disliked, DISLIKE_WINDOW)
		.iter()
		.filter_map(|id| store.get(id))
	{
		if similarity(candidate, disliked) > DISLIKE_THRESHOLD {
			return REJECTED_SCORE;
		}
	}

	NEUTRAL_SCORE
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
