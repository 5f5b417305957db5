//! Error types shared by every component of the crate.

/// Errors returned by the tokenizer, store, index and generator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Generation was requested before any ngram was learned.
	#[error("index is empty")]
	EmptyIndex,

	/// An arbitrary ngram was returned by the store, but nothing usable
	/// could be generated from it. Indicates an inconsistent store.
	#[error("no result for arbitrary ngram")]
	NoResult,

	/// A weighted pick was attempted on a distribution with no variations.
	#[error("cannot pick from an empty distribution")]
	EmptyDistribution,

	/// The backing store failed to read or write.
	#[error("store error: {0}")]
	Store(String),

	/// I/O error while reading a corpus.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Result type for ngram operations.
pub type Result<T> = core::result::Result<T, Error>;
