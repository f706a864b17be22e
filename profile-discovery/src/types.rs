use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A discoverable profile record with its interaction history.
///
/// `liked` and `disliked` are chronological (most recent last).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub id: String,
	#[serde(default)]
	pub name: String,
	pub institution: String,
	pub field_of_study: String,
	pub graduation_year: i32,
	pub city: String,
	#[serde(default)]
	pub interests: Vec<String>,
	pub age: u32,
	#[serde(default)]
	pub languages: Vec<String>,
	#[serde(default)]
	pub dietary_preference: String,
	#[serde(default)]
	pub liked: Vec<String>,
	#[serde(default)]
	pub disliked: Vec<String>,
}

impl Profile {
	/// Required-field check applied at ingest.
	pub fn validate(&self) -> Result<(), DiscoveryError> {
		if self.id.trim().is_empty() {
			return Err(DiscoveryError::InvalidProfile(
				"profile id must not be empty".to_string(),
			));
		}
		Ok(())
	}

	/// True if `id` appears in either interaction history.
	pub fn has_interacted_with(&self, id: &str) -> bool {
		self.liked.iter().any(|l| l == id) || self.disliked.iter().any(|d| d == id)
	}
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Caller-supplied candidate constraints. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
	#[serde(default)]
	pub institution: Option<String>,
	#[serde(default)]
	pub interests: Option<Vec<String>>,
	#[serde(default)]
	pub min_age: Option<u32>,
	#[serde(default)]
	pub max_age: Option<u32>,
}

impl FilterCriteria {
	/// Canonical form: blank institution and empty interest lists mean
	/// "no constraint"; interest tags are trimmed, sorted and de-duplicated.
	pub fn normalized(&self) -> FilterCriteria {
		let institution = self
			.institution
			.as_ref()
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty());

		let interests = self
			.interests
			.as_ref()
			.map(|tags| {
				let mut tags: Vec<String> = tags
					.iter()
					.map(|t| t.trim().to_string())
					.filter(|t| !t.is_empty())
					.collect();
				tags.sort();
				tags.dedup();
				tags
			})
			.filter(|tags| !tags.is_empty());

		FilterCriteria {
			institution,
			interests,
			min_age: self.min_age,
			max_age: self.max_age,
		}
	}

	/// Normalize and reject inverted age bounds.
	pub fn validate(self) -> Result<FilterCriteria, DiscoveryError> {
		if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
			if min > max {
				return Err(DiscoveryError::InvalidFilter(format!(
					"minAge {} exceeds maxAge {}",
					min, max
				)));
			}
		}
		Ok(self.normalized())
	}

	/// Cheap pre-scoring check. Expects a normalized filter.
	pub fn matches(&self, candidate: &Profile) -> bool {
		if let Some(institution) = &self.institution {
			if &candidate.institution != institution {
				return false;
			}
		}
		if let Some(min) = self.min_age {
			if candidate.age < min {
				return false;
			}
		}
		if let Some(max) = self.max_age {
			if candidate.age > max {
				return false;
			}
		}
		if let Some(tags) = &self.interests {
			if !tags.iter().any(|t| candidate.interests.contains(t)) {
				return false;
			}
		}
		true
	}

	/// Deterministic serialized form used inside request cache keys.
	pub fn cache_fragment(&self) -> String {
		serde_json::to_string(self).unwrap_or_default()
	}
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
	Like,
	Dislike,
}

/// Result of recording an interaction. Unknown users are a reported no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
	Recorded,
	UnknownUser,
}

impl InteractionOutcome {
	pub fn is_recorded(&self) -> bool {
		matches!(self, Self::Recorded)
	}
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Per-signal contributions to a candidate's final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
	pub profile: f64,
	pub behavioral: f64,
	pub freshness: f64,
	pub diversity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
	pub profile: Profile,
	pub score: f64,
	pub reasons: Vec<String>,
	pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityBreakdown {
	pub academic: f64,
	pub interest: f64,
	pub geographic: f64,
	pub demographic: f64,
	pub overall: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
	pub size: usize,
	pub capacity: usize,
	pub keys: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
	use super::*;

	fn profile(id: &str, institution: &str, age: u32, interests: &[&str]) -> Profile {
		Profile {
			id: id.to_string(),
			name: String::new(),
			institution: institution.to_string(),
			field_of_study: "Computer Science".to_string(),
			graduation_year: 2025,
			city: "Delhi".to_string(),
			interests: interests.iter().map(|s| s.to_string()).collect(),
			age,
			languages: vec![],
			dietary_preference: String::new(),
			liked: vec![],
			disliked: vec![],
		}
	}

	#[test]
	fn validate_rejects_blank_id() {
		let p = profile("  ", "IIT Delhi", 20, &[]);
		assert!(matches!(p.validate(), Err(DiscoveryError::InvalidProfile(_))));
	}

	#[test]
	fn profile_deserializes_with_defaults() {
		let p: Profile = serde_json::from_str(
			r#"{"id":"u1","institution":"X","fieldOfStudy":"CS","graduationYear":2025,"city":"Pune","age":21}"#,
		)
		.unwrap();
		assert!(p.liked.is_empty());
		assert!(p.interests.is_empty());
		assert_eq!(p.name, "");
	}

	#[test]
	fn normalized_drops_blank_constraints() {
		let f = FilterCriteria {
			institution: Some("  ".into()),
			interests: Some(vec!["".into(), " ".into()]),
			min_age: None,
			max_age: None,
		};
		assert_eq!(f.normalized(), FilterCriteria::default());
	}

	#[test]
	fn normalized_sorts_and_dedups_interests() {
		let f = FilterCriteria {
			interests: Some(vec!["Music".into(), " Art".into(), "Music".into()]),
			..Default::default()
		};
		assert_eq!(
			f.normalized().interests,
			Some(vec!["Art".to_string(), "Music".to_string()])
		);
	}

	#[test]
	fn equivalent_filters_share_cache_fragment() {
		let a = FilterCriteria {
			interests: Some(vec!["Music".into(), "Art".into()]),
			..Default::default()
		};
		let b = FilterCriteria {
			interests: Some(vec!["Art".into(), "Music".into(), "Art".into()]),
			..Default::default()
		};
		assert_eq!(a.normalized().cache_fragment(), b.normalized().cache_fragment());
	}

	#[test]
	fn validate_rejects_inverted_age_bounds() {
		let f = FilterCriteria {
			min_age: Some(30),
			max_age: Some(20),
			..Default::default()
		};
		assert!(matches!(f.validate(), Err(DiscoveryError::InvalidFilter(_))));
	}

	#[test]
	fn matches_applies_every_constraint() {
		let candidate = profile("c", "IIT Delhi", 21, &["Music", "Art"]);
		let f = FilterCriteria {
			institution: Some("IIT Delhi".into()),
			interests: Some(vec!["Art".into()]),
			min_age: Some(19),
			max_age: Some(22),
		};
		assert!(f.matches(&candidate));

		let too_young = FilterCriteria {
			min_age: Some(22),
			..Default::default()
		};
		assert!(!too_young.matches(&candidate));

		let other_school = FilterCriteria {
			institution: Some("Delhi University".into()),
			..Default::default()
		};
		assert!(!other_school.matches(&candidate));

		let no_overlap = FilterCriteria {
			interests: Some(vec!["Cricket".into()]),
			..Default::default()
		};
		assert!(!no_overlap.matches(&candidate));
	}

	#[test]
	fn action_uses_lowercase_wire_names() {
		assert_eq!(serde_json::to_string(&Action::Like).unwrap(), "\"like\"");
		let a: Action = serde_json::from_str("\"dislike\"").unwrap();
		assert_eq!(a, Action::Dislike);
	}
}
