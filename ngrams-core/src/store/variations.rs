use std::collections::HashMap;

use rand::Rng;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Future tokens observed after a window, with the number of times each one
/// was observed.
///
/// Conceptually, this is the set of outgoing edges of a node in a Markov
/// chain, weighted by their number of observations.
///
/// ## Invariants
/// - Counts only grow through [`Variations::add`]
/// - Each count added through `add` is strictly positive
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Variations(HashMap<String, u64>);

impl Variations {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `future`.
	pub fn add(&mut self, future: &str) {
		*self.0.entry(future.to_owned()).or_insert(0) += 1;
	}

	/// Returns how many times `future` was observed.
	pub fn count(&self, future: &str) -> u64 {
		self.0.get(future).copied().unwrap_or(0)
	}

	/// Sum of every count.
	pub fn total(&self) -> u64 {
		self.0.values().sum()
	}

	/// Number of distinct future tokens.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// True when no future token was observed.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over `(token, count)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.0.iter().map(|(token, count)| (token.as_str(), *count))
	}

	/// Picks a future token using the thread-local random generator.
	///
	/// See [`Variations::weighted_pick_with`].
	pub fn weighted_pick(&self) -> Result<&str> {
		self.weighted_pick_with(&mut rand::rng())
	}

	/// Picks a future token with a probability proportional to its count.
	///
	/// Draws a number in `[0, total)` and walks the variations, subtracting
	/// each count until the draw falls inside a bucket. Iteration order only
	/// changes which token wins for a given draw, not the distribution.
	///
	/// # Errors
	/// Returns [`Error::EmptyDistribution`] if the total weight is zero.
	pub fn weighted_pick_with<R: Rng>(&self, rng: &mut R) -> Result<&str> {
		let total = self.total();
		if total == 0 {
			return Err(Error::EmptyDistribution);
		}

		let mut r = rng.random_range(0..total);
		for (token, count) in self.iter() {
			if r < count {
				return Ok(token);
			}
			r -= count;
		}

		// Unreachable while the total matches the counts.
		Err(Error::EmptyDistribution)
	}
}

impl FromIterator<(String, u64)> for Variations {
	fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<const N: usize> From<[(&str, u64); N]> for Variations {
	fn from(pairs: [(&str, u64); N]) -> Self {
		pairs.into_iter().map(|(token, count)| (token.to_owned(), count)).collect()
	}
}
