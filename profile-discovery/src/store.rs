// ---------------------------------------------------------------------------
// ProfileStore — owned profile records and their interaction histories
// ---------------------------------------------------------------------------
//
// Profiles are kept in insertion order so that ranking ties resolve the same
// way on every run. Overwriting an id keeps its original position.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::types::{Action, InteractionOutcome, Profile};

#[derive(Debug, Default)]
pub struct ProfileStore {
	profiles: Vec<Profile>,
	/// Maps id -> index in `profiles`.
	index: HashMap<String, usize>,
}

impl ProfileStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or overwrite by id. Returns `true` when an existing profile
	/// was replaced.
	pub fn add_profile(&mut self, profile: Profile) -> bool {
		match self.index.get(&profile.id) {
			Some(&idx) => {
				self.profiles[idx] = profile;
				true
			}
			None => {
				self.index.insert(profile.id.clone(), self.profiles.len());
				self.profiles.push(profile);
				false
			}
		}
	}

	/// Apply [`add_profile`](Self::add_profile) to each profile in order.
	/// Returns the number of profiles processed.
	pub fn add_all<I>(&mut self, profiles: I) -> usize
	where
		I: IntoIterator<Item = Profile>,
	{
		let mut count = 0;
		for profile in profiles {
			self.add_profile(profile);
			count += 1;
		}
		count
	}

	pub fn get(&self, id: &str) -> Option<&Profile> {
		self.index.get(id).map(|&idx| &self.profiles[idx])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// All profiles in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &Profile> {
		self.profiles.iter()
	}

	pub(crate) fn len(&self) -> usize {
		self.profiles.len()
	}

	/// Append `target_id` to the acting user's history for `action`.
	///
	/// The target is first removed from the opposite history so an id is
	/// never both liked and disliked at once. Repeats of the same action are
	/// appended as-is. Unknown users are a no-op.
	pub fn record_interaction(
		&mut self,
		user_id: &str,
		target_id: &str,
		action: Action,
	) -> InteractionOutcome {
		let Some(&idx) = self.index.get(user_id) else {
			return InteractionOutcome::UnknownUser;
		};
		let user = &mut self.profiles[idx];
		let (history, opposite) = match action {
			Action::Like => (&mut user.liked, &mut user.disliked),
			Action::Dislike => (&mut user.disliked, &mut user.liked),
		};
		opposite.retain(|id| id != target_id);
		history.push(target_id.to_string());
		InteractionOutcome::Recorded
	}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
