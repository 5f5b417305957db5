//! Frequency stores, mapping an ngram window to the distribution of tokens
//! observed right after it.

/// In-memory store.
pub mod memory;

/// Distribution of future tokens for a single window.
pub mod variations;

pub use memory::MemoryStore;
pub use variations::Variations;

use crate::error::Result;

/// A storage mechanism for ngrams.
///
/// Every method takes `&self`: implementations synchronise internally so a
/// single store can be trained and queried from many threads at once.
/// Each call must be atomic with respect to the others, so concurrent `add`s
/// never lose an increment.
pub trait Store: Send + Sync {
	/// Records one observation of `future` following `window`.
	///
	/// Creates the window with `{future: 1}` if unseen, inserts `future` with
	/// a count of 1 if unseen under the window, increments it otherwise.
	fn add(&self, window: &str, future: &str) -> Result<()>;

	/// Returns the variations recorded for `window`, or `None` if the window
	/// was never observed.
	fn get(&self, window: &str) -> Result<Option<Variations>>;

	/// Removes `window` and all of its variations.
	fn delete(&self, window: &str) -> Result<()>;

	/// Returns an arbitrary stored window and its variations, or `None` when
	/// the store is empty.
	fn any(&self) -> Result<Option<(String, Variations)>>;

	/// Number of stored windows.
	fn len(&self) -> Result<usize>;

	/// Releases any resources held by the store.
	fn close(&self) -> Result<()>;
}

/// Shared stores, so a caller can keep a handle on the store given to an
/// index.
impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
	fn add(&self, window: &str, future: &str) -> Result<()> {
		(**self).add(window, future)
	}

	fn get(&self, window: &str) -> Result<Option<Variations>> {
		(**self).get(window)
	}

	fn delete(&self, window: &str) -> Result<()> {
		(**self).delete(window)
	}

	fn any(&self) -> Result<Option<(String, Variations)>> {
		(**self).any()
	}

	fn len(&self) -> Result<usize> {
		(**self).len()
	}

	fn close(&self) -> Result<()> {
		(**self).close()
	}
}
