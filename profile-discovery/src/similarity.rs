// ---------------------------------------------------------------------------
// Similarity calculators — pairwise profile scoring
// ---------------------------------------------------------------------------
//
// Pure, symmetric functions reducing two profiles to a score in [0, 1].
// No side effects; the engine memoizes them on the unordered id pair.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::types::{Profile, SimilarityBreakdown};

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

pub const ACADEMIC_WEIGHT: f64 = 0.25;
pub const INTEREST_WEIGHT: f64 = 0.35;
pub const GEOGRAPHIC_WEIGHT: f64 = 0.20;
pub const DEMOGRAPHIC_WEIGHT: f64 = 0.20;

const SAME_INSTITUTION: f64 = 0.4;
const SAME_FIELD: f64 = 0.3;
const GRAD_YEAR_WEIGHT: f64 = 0.3;
const MAX_GRAD_YEAR_GAP: u32 = 1;

const IDENTICAL_INTERESTS_MULTIPLIER: f64 = 0.7;
const HEAVY_OVERLAP_MULTIPLIER: f64 = 0.85;
const HEAVY_OVERLAP_RATIO: f64 = 0.8;

const SAME_CITY: f64 = 0.8;

const AGE_WEIGHT: f64 = 0.3;
const MAX_AGE_GAP: u32 = 3;
const SHARED_LANGUAGE: f64 = 0.2;
const SAME_DIET: f64 = 0.1;

// ---------------------------------------------------------------------------
// Individual calculators
// ---------------------------------------------------------------------------

/// Institution, field of study and graduation-year proximity.
pub fn academic_similarity(a: &Profile, b: &Profile) -> f64 {
	let mut score = 0.0;
	if a.institution == b.institution {
		score += SAME_INSTITUTION;
	}
	if a.field_of_study == b.field_of_study {
		score += SAME_FIELD;
	}
	let year_gap = a.graduation_year.abs_diff(b.graduation_year);
	if year_gap <= MAX_GRAD_YEAR_GAP {
		score += GRAD_YEAR_WEIGHT * (1.0 - year_gap as f64 / 2.0);
	}
	score.min(1.0)
}

/// Jaccard index over interest tags, damped when the sets overlap too much.
///
/// Identical sets are multiplied by 0.7; sets where the overlap covers more
/// than 80% of the smaller set are multiplied by 0.85.
pub fn interest_similarity(a: &Profile, b: &Profile) -> f64 {
	let set_a: HashSet<&str> = a.interests.iter().map(String::as_str).collect();
	let set_b: HashSet<&str> = b.interests.iter().map(String::as_str).collect();
	if set_a.is_empty() || set_b.is_empty() {
		return 0.0;
	}

	let intersection = set_a.intersection(&set_b).count();
	let union = set_a.union(&set_b).count();
	let jaccard = intersection as f64 / union as f64;

	let multiplier = if intersection == set_a.len() && intersection == set_b.len() {
		IDENTICAL_INTERESTS_MULTIPLIER
	} else if intersection as f64 / set_a.len().min(set_b.len()) as f64 > HEAVY_OVERLAP_RATIO {
		HEAVY_OVERLAP_MULTIPLIER
	} else {
		1.0
	};

	jaccard * multiplier
}

/// Coarse locality: same city or nothing.
pub fn geographic_similarity(a: &Profile, b: &Profile) -> f64 {
	if a.city == b.city {
		SAME_CITY
	} else {
		0.0
	}
}

/// Age proximity, a shared spoken language and matching dietary preference.
pub fn demographic_similarity(a: &Profile, b: &Profile) -> f64 {
	let mut score = 0.0;
	let age_gap = a.age.abs_diff(b.age);
	if age_gap <= MAX_AGE_GAP {
		score += AGE_WEIGHT * (1.0 - age_gap as f64 / MAX_AGE_GAP as f64);
	}
	if a.languages.iter().any(|l| b.languages.contains(l)) {
		score += SHARED_LANGUAGE;
	}
	if a.dietary_preference == b.dietary_preference {
		score += SAME_DIET;
	}
	score.min(1.0)
}

// ---------------------------------------------------------------------------
// Combined profile similarity
// ---------------------------------------------------------------------------

/// Weighted sum of the four calculators given a precomputed interest score.
pub fn combine(a: &Profile, b: &Profile, interest: f64) -> f64 {
	ACADEMIC_WEIGHT * academic_similarity(a, b)
		+ INTEREST_WEIGHT * interest
		+ GEOGRAPHIC_WEIGHT * geographic_similarity(a, b)
		+ DEMOGRAPHIC_WEIGHT * demographic_similarity(a, b)
}

pub fn profile_similarity(a: &Profile, b: &Profile) -> f64 {
	combine(a, b, interest_similarity(a, b))
}

pub fn similarity_breakdown(a: &Profile, b: &Profile) -> SimilarityBreakdown {
	let academic = academic_similarity(a, b);
	let interest = interest_similarity(a, b);
	let geographic = geographic_similarity(a, b);
	let demographic = demographic_similarity(a, b);
	SimilarityBreakdown {
		academic,
		interest,
		geographic,
		demographic,
		overall: ACADEMIC_WEIGHT * academic
			+ INTEREST_WEIGHT * interest
			+ GEOGRAPHIC_WEIGHT * geographic
			+ DEMOGRAPHIC_WEIGHT * demographic,
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
