use log::{debug, trace};

use super::index::{Index, SeekResult};
use crate::error::{Error, Result};

impl Index {
	/// Generates text by walking the index for up to `token_count` steps.
	///
	/// The output starts with the tokens of `seed`, and generation continues
	/// from the last window of the seed. Each step picks a future token from
	/// the current window's variations, weighted by how often it was
	/// observed, then slides the window by one token. When the current
	/// window was never learned, generation restarts from an arbitrary
	/// stored window. The token count includes punctuation tokens.
	///
	/// # Errors
	/// - [`Error::EmptyIndex`] if nothing has been learned yet, even when
	///   `token_count` is 0
	/// - [`Error::NoResult`] if an arbitrary window yields nothing to pick
	/// - Any store error, returned as soon as it happens
	pub fn babble(&self, seed: &str, token_count: usize) -> Result<String> {
		if self.store().len()? == 0 {
			return Err(Error::EmptyIndex);
		}

		let mut output = self.tokenizer().tokenize(seed);
		let mut window = output[output.len().saturating_sub(self.window_len())..].join(" ");

		let mut restarts = 0;
		for _ in 0..token_count {
			let result = match self.seek(&window)? {
				Some(result) => result,
				None => {
					restarts += 1;
					self.seek_any()?
				}
			};

			// Stored windows always carry at least one variation.
			let next = result.next.weighted_pick().map_err(|_| Error::NoResult)?;
			window = result.next_window(next);
			if !next.is_empty() {
				output.push(next.to_owned());
			}
		}

		debug!("babbled {} tokens ({} restarts)", output.len(), restarts);
		Ok(self.tokenizer().format(&output))
	}

	/// Looks up an arbitrary window of the store.
	fn seek_any(&self) -> Result<SeekResult> {
		let Some((window, _)) = self.store().any()? else {
			return Err(Error::EmptyIndex);
		};

		trace!("restarting from {window:?}");
		self.seek(&window)?.ok_or(Error::NoResult)
	}
}

#[cfg(test)]
mod tests {
	use crate::error::{Error, Result};
	use crate::model::index::tests::MockStore;
	use crate::model::index::{Index, IndexOptions};
	use crate::store::{Store, Variations};
	use crate::tokenizer::Whitespace;

	/// Store holding one window with no variations.
	struct InconsistentStore;

	impl Store for InconsistentStore {
		fn add(&self, _window: &str, _future: &str) -> Result<()> {
			Ok(())
		}

		fn get(&self, window: &str) -> Result<Option<Variations>> {
			Ok((window == "to be").then(Variations::new))
		}

		fn delete(&self, _window: &str) -> Result<()> {
			Ok(())
		}

		fn any(&self) -> Result<Option<(String, Variations)>> {
			Ok(Some(("to be".to_owned(), Variations::new())))
		}

		fn len(&self) -> Result<usize> {
			Ok(1)
		}

		fn close(&self) -> Result<()> {
			Ok(())
		}
	}

	/// Store failing every read.
	struct BrokenStore;

	impl Store for BrokenStore {
		fn add(&self, _window: &str, _future: &str) -> Result<()> {
			Ok(())
		}

		fn get(&self, _window: &str) -> Result<Option<Variations>> {
			Err(Error::Store("get failed".to_owned()))
		}

		fn delete(&self, _window: &str) -> Result<()> {
			Ok(())
		}

		fn any(&self) -> Result<Option<(String, Variations)>> {
			Err(Error::Store("any failed".to_owned()))
		}

		fn len(&self) -> Result<usize> {
			Err(Error::Store("len failed".to_owned()))
		}

		fn close(&self) -> Result<()> {
			Ok(())
		}
	}

	fn index_with(n: usize, store: Box<dyn Store>) -> Index {
		Index::with_options(
			n,
			IndexOptions {
				store: Some(store),
				tokenizer: None,
			},
		)
	}

	#[test]
	fn test_babble_empty_index() {
		let index = Index::new(3);
		assert!(matches!(index.babble("", 10), Err(Error::EmptyIndex)));
		assert!(matches!(index.babble("to be", 10), Err(Error::EmptyIndex)));
		assert!(matches!(index.babble("", 0), Err(Error::EmptyIndex)));

		// A mock which never returns an arbitrary window is empty as well.
		let index = index_with(3, Box::new(MockStore::default()));
		assert!(matches!(index.babble("", 10), Err(Error::EmptyIndex)));
	}

	#[test]
	fn test_babble_no_result() {
		let index = index_with(3, Box::new(InconsistentStore));
		assert!(matches!(index.babble("", 10), Err(Error::NoResult)));
		assert!(matches!(index.babble("to be", 10), Err(Error::NoResult)));
	}

	#[test]
	fn test_babble_store_error() {
		let index = index_with(3, Box::new(BrokenStore));
		assert!(matches!(index.babble("to be", 10), Err(Error::Store(_))));
	}

	#[test]
	fn test_babble_zero_tokens() {
		let index = Index::new(3);
		index.parse("or not to be").unwrap();
		assert_eq!(index.babble("to be", 0).unwrap(), "To be.");
		assert_eq!(index.babble("", 0).unwrap(), "");
	}

	#[test]
	fn test_babble_single_path() {
		let index = Index::new(3);
		index.parse("a b c d e f").unwrap();
		assert_eq!(index.babble("a b", 4).unwrap(), "A b c d e f.");

		// Only the last window of a long seed is looked up.
		assert_eq!(index.babble("x y a b", 2).unwrap(), "X y a b c d.");
	}

	#[test]
	fn test_babble_other_orders() {
		let index = Index::new(2);
		index.parse("a b c d").unwrap();
		assert_eq!(index.babble("a", 3).unwrap(), "A b c d.");

		let index = Index::new(4);
		index.parse("a b c d e f").unwrap();
		assert_eq!(index.babble("a b c", 3).unwrap(), "A b c d e f.");
	}

	#[test]
	fn test_babble_token_count() {
		let index = Index::with_options(
			3,
			IndexOptions {
				store: None,
				tokenizer: Some(Box::new(Whitespace)),
			},
		);
		index.parse("a b c a b d a b c").unwrap();

		let out = index.babble("a b", 50).unwrap();
		assert_eq!(out.split(' ').count(), 52);

		let out = index.babble("", 20).unwrap();
		assert_eq!(out.split(' ').count(), 20);
	}

	#[test]
	fn test_short_babble() {
		let index = Index::new(3);
		index.parse("to be or not to be, that is the question.").unwrap();
		index.parse("be or not to be something, what is the question?").unwrap();
		index.parse("what can we be, or not be, if we ask the question of ourselves.").unwrap();

		let out = index.babble("be something", 200).unwrap();
		assert!(out.starts_with("Be something"));
		assert!(out.len() > "Be something".len());
	}
}
