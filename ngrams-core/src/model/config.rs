use serde::{Deserialize, Serialize};

use super::index::DEFAULT_N;

/// Settings needed to build an in-memory [`Index`](super::index::Index).
///
/// Missing fields take their default value when deserialized.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct IndexConfig {
	/// Number of tokens per ngram. 0 selects the default (trigrams).
	pub n: usize,

	/// Treat line breaks as whitespace instead of keeping them as tokens.
	pub strip_linebreaks: bool,
}

impl Default for IndexConfig {
	fn default() -> Self {
		Self {
			n: DEFAULT_N,
			strip_linebreaks: true,
		}
	}
}
