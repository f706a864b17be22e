// ---------------------------------------------------------------------------
// Compatibility aggregation — final ranking score and match reasons
// ---------------------------------------------------------------------------
//
// Combines profile similarity, behavioral score, freshness and a bounded
// diversity term into one score. Pure functions; the freshness value is
// supplied by the caller.
// ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::types::{Profile, ScoreBreakdown};

pub const PROFILE_WEIGHT: f64 = 0.4;
pub const BEHAVIORAL_WEIGHT: f64 = 0.3;
pub const FRESHNESS_WEIGHT: f64 = 0.2;
pub const DIVERSITY_WEIGHT: f64 = 0.1;

/// Similarity above this no longer lowers the diversity term, so it never
/// drops below 0.2.
const DIVERSITY_CAP: f64 = 0.8;

const SIMILAR_AGE_GAP: u32 = 1;

/// Input signals for a compatibility computation.
pub struct CompatibilityInput {
	pub profile_similarity: f64,
	pub behavioral: f64,
	pub freshness: f64,
}

pub struct CompatibilityResult {
	pub score: f64,
	pub breakdown: ScoreBreakdown,
}

pub fn diversity_score(profile_similarity: f64) -> f64 {
	1.0 - profile_similarity.min(DIVERSITY_CAP)
}

pub fn compute_compatibility(input: &CompatibilityInput) -> CompatibilityResult {
	let diversity = diversity_score(input.profile_similarity);
	let score = PROFILE_WEIGHT * input.profile_similarity
		+ BEHAVIORAL_WEIGHT * input.behavioral
		+ FRESHNESS_WEIGHT * input.freshness
		+ DIVERSITY_WEIGHT * diversity;
	CompatibilityResult {
		score,
		breakdown: ScoreBreakdown {
			profile: input.profile_similarity,
			behavioral: input.behavioral,
			freshness: input.freshness,
			diversity,
		},
	}
}

/// Number of distinct interest tags both profiles list.
pub fn shared_interest_count(a: &Profile, b: &Profile) -> usize {
	let set_a: HashSet<&str> = a.interests.iter().map(String::as_str).collect();
	let set_b: HashSet<&str> = b.interests.iter().map(String::as_str).collect();
	set_a.intersection(&set_b).count()
}

/// Human-readable reasons, in fixed order: institution, shared interests,
/// city, age, field of study.
pub fn match_reasons(user: &Profile, candidate: &Profile) -> Vec<String> {
	let mut reasons = Vec::new();
	if user.institution == candidate.institution {
		reasons.push(format!("Both at {}", user.institution));
	}
	let shared = shared_interest_count(user, candidate);
	if shared > 0 {
		reasons.push(format!("{} shared interests", shared));
	}
	if user.city == candidate.city {
		reasons.push(format!("Both in {}", user.city));
	}
	if user.age.abs_diff(candidate.age) <= SIMILAR_AGE_GAP {
		reasons.push("Similar age".to_string());
	}
	if user.field_of_study == candidate.field_of_study {
		reasons.push(format!("Both studying {}", user.field_of_study));
	}
	reasons
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn profile(id: &str) -> Profile {
		Profile {
			id: id.to_string(),
			name: String::new(),
			institution: "IIT Delhi".to_string(),
			field_of_study: "Physics".to_string(),
			graduation_year: 2025,
			city: "Delhi".to_string(),
			interests: vec!["Music".to_string(), "Art".to_string(), "Yoga".to_string()],
			age: 20,
			languages: vec![],
			dietary_preference: String::new(),
			liked: vec![],
			disliked: vec![],
		}
	}

	#[test]
	fn diversity_is_bounded_below() {
		assert!((diversity_score(0.0) - 1.0).abs() < 1e-10);
		assert!((diversity_score(0.5) - 0.5).abs() < 1e-10);
		assert!((diversity_score(0.8) - 0.2).abs() < 1e-10);
		assert!((diversity_score(0.95) - 0.2).abs() < 1e-10);
	}

	#[test]
	fn compatibility_weights_sum_signals() {
		let result = compute_compatibility(&CompatibilityInput {
			profile_similarity: 0.6,
			behavioral: 0.5,
			freshness: 0.9,
		});
		let expected = 0.4 * 0.6 + 0.3 * 0.5 + 0.2 * 0.9 + 0.1 * 0.4;
		assert!((result.score - expected).abs() < 1e-10);
		assert!((result.breakdown.diversity - 0.4).abs() < 1e-10);
		assert_eq!(result.breakdown.freshness, 0.9);
	}

	#[test]
	fn reasons_in_fixed_order() {
		let user = profile("u");
		let candidate = Profile {
			age: 21,
			interests: vec!["Music".to_string(), "Yoga".to_string(), "Chess".to_string()],
			..profile("c")
		};
		assert_eq!(
			match_reasons(&user, &candidate),
			vec![
				"Both at IIT Delhi",
				"2 shared interests",
				"Both in Delhi",
				"Similar age",
				"Both studying Physics",
			]
		);
	}

	#[test]
	fn reasons_only_include_true_facts() {
		let user = profile("u");
		let candidate = Profile {
			institution: "Delhi University".to_string(),
			field_of_study: "Law".to_string(),
			city: "Mumbai".to_string(),
			age: 24,
			interests: vec!["Art".to_string()],
			..profile("c")
		};
		assert_eq!(match_reasons(&user, &candidate), vec!["1 shared interests"]);
	}

	#[test]
	fn no_reasons_for_unrelated_profiles() {
		let user = profile("u");
		let candidate = Profile {
			institution: "Delhi University".to_string(),
			field_of_study: "Law".to_string(),
			city: "Mumbai".to_string(),
			age: 24,
			interests: vec![],
			..profile("c")
		};
		assert!(match_reasons(&user, &candidate).is_empty());
	}
}
