use std::io::Read;
use std::sync::mpsc;
use std::thread;

use log::{debug, info};

use serde::Serialize;

use super::config::IndexConfig;
use crate::error::{Error, Result};
use crate::store::{MemoryStore, Store, Variations};
use crate::tokenizer::{DefaultWord, Tokenizer};

/// Default number of tokens per ngram (trigrams).
pub const DEFAULT_N: usize = 3;

/// Optional collaborators for an [`Index`]. Missing ones fall back to a
/// [`MemoryStore`] and a [`DefaultWord`] tokenizer stripping line breaks.
#[derive(Default)]
pub struct IndexOptions {
	/// Store holding the indexed ngrams.
	pub store: Option<Box<dyn Store>>,

	/// Tokenizer used to split strings into tokens and format them back.
	pub tokenizer: Option<Box<dyn Tokenizer>>,
}

/// Result of an ngram lookup.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SeekResult {
	/// Last token of the matched window.
	pub prefix: String,

	/// The matched window without its first token. Appending a picked
	/// future to it gives the next window to look up.
	pub tail: Vec<String>,

	/// Future tokens observed after the window and their counts.
	pub next: Variations,
}

impl SeekResult {
	/// Builds the window following this one once `future` has been picked.
	pub fn next_window(&self, future: &str) -> String {
		let mut window = self.tail.join(" ");
		if !window.is_empty() {
			window.push(' ');
		}
		window.push_str(future);
		window
	}
}

/// Indexes ngrams of a fixed order `n`, and retrieves them to generate new
/// text (see [`Index::babble`]).
///
/// # Responsibilities
/// - Split text into tokens with its [`Tokenizer`]
/// - Extract every window of `n - 1` tokens and the token following it
/// - Record those observations in its [`Store`]
///
/// # Invariants
/// - `n >= 1`
/// - A window never spans two calls to [`Index::parse`]
///
/// The index is `Sync`: it can be shared between request handlers or
/// training threads without an outer lock.
pub struct Index {
	/// The number of tokens in an ngram, the window holding `n - 1` of them.
	n: usize,

	store: Box<dyn Store>,

	tokenizer: Box<dyn Tokenizer>,
}

impl Index {
	/// Creates an index of order `n` with the default store and tokenizer.
	///
	/// An `n` of 0 selects [`DEFAULT_N`].
	pub fn new(n: usize) -> Self {
		Self::with_options(n, IndexOptions::default())
	}

	/// Creates an index of order `n` with custom collaborators.
	pub fn with_options(n: usize, options: IndexOptions) -> Self {
		Self {
			n: if n == 0 { DEFAULT_N } else { n },
			store: options.store.unwrap_or_else(|| Box::new(MemoryStore::new())),
			tokenizer: options
				.tokenizer
				.unwrap_or_else(|| Box::new(DefaultWord::new(true))),
		}
	}

	/// Creates an in-memory index from a configuration.
	pub fn from_config(config: &IndexConfig) -> Self {
		Self::with_options(
			config.n,
			IndexOptions {
				store: None,
				tokenizer: Some(Box::new(DefaultWord::new(config.strip_linebreaks))),
			},
		)
	}

	/// Number of tokens per ngram.
	pub fn n(&self) -> usize {
		self.n
	}

	/// Store holding the learned windows.
	pub fn store(&self) -> &dyn Store {
		self.store.as_ref()
	}

	/// Tokenizer splitting learned text and formatting babble.
	pub fn tokenizer(&self) -> &dyn Tokenizer {
		self.tokenizer.as_ref()
	}

	/// Number of tokens in a lookup window. Monograms use the token itself.
	pub(crate) fn window_len(&self) -> usize {
		(self.n - 1).max(1)
	}

	/// Tokenizes `text` and adds each of its ngrams to the store.
	///
	/// Returns every token of the text. A trailing window without a
	/// following token is not stored.
	///
	/// # Errors
	/// Stops at, and returns, the first store error.
	pub fn parse(&self, text: &str) -> Result<Vec<String>> {
		let tokens = self.tokenizer.tokenize(text);

		let mut windows = 0;
		for j in 0..tokens.len() {
			let Some((window, Some(future))) = self.extract_window(j, &tokens) else {
				break;
			};
			self.store.add(&window, future)?;
			windows += 1;
		}

		debug!("parsed {} tokens into {} ngrams", tokens.len(), windows);
		Ok(tokens)
	}

	/// Reads `reader` to its end and parses it as a single text.
	pub fn read<R: Read>(&self, mut reader: R) -> Result<Vec<String>> {
		let mut text = String::new();
		reader.read_to_string(&mut text)?;
		self.parse(&text)
	}

	/// Parses many independent texts in parallel.
	///
	/// Texts are split into chunks handed to worker threads (a few chunks
	/// per CPU), all adding to this index's store. Windows never span two
	/// texts. Returns the total number of tokens parsed.
	///
	/// # Errors
	/// Returns the first store error reported by a worker. Other workers
	/// finish their chunk.
	pub fn parse_all<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<usize> {
		if texts.is_empty() {
			return Ok(0);
		}

		let factor = 4;
		let chunks = num_cpus::get() * factor;
		let chunk_size = texts.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for chunk in texts.chunks(chunk_size) {
				let tx = tx.clone();
				scope.spawn(move || {
					let parsed = chunk
						.iter()
						.try_fold(0, |total, text| Ok::<_, Error>(total + self.parse(text.as_ref())?.len()));
					// The receiver outlives the scope.
					let _ = tx.send(parsed);
				});
			}
		});
		drop(tx);

		let mut total = 0;
		for parsed in rx.iter() {
			total += parsed?;
		}

		info!("parsed {} texts ({} tokens) over {} chunks", texts.len(), total, texts.len().div_ceil(chunk_size));
		Ok(total)
	}

	/// Extracts the window starting at token `j`, and the token following
	/// it if there is one.
	///
	/// Returns `None` when fewer than `n - 1` tokens remain. With `n == 1`
	/// the window is the token itself and so is its future.
	pub(crate) fn extract_window<'t>(&self, j: usize, tokens: &'t [String]) -> Option<(String, Option<&'t str>)> {
		let len = self.n - 1;

		if len == 0 {
			let token = tokens.get(j)?;
			return Some((token.clone(), Some(token.as_str())));
		}

		if j + len > tokens.len() {
			return None;
		}

		// Tokens are joined with a space, which the tokenizers never keep
		// inside a token.
		let window = tokens[j..j + len].join(" ");
		Some((window, tokens.get(j + len).map(String::as_str)))
	}

	/// Looks up the variations following `window`.
	///
	/// The window is tokenized first so it matches the form used while
	/// training. Returns `None` if the window is blank or unknown.
	pub fn seek(&self, window: &str) -> Result<Option<SeekResult>> {
		let tokens = self.tokenizer.tokenize(window);
		let Some(prefix) = tokens.last() else {
			return Ok(None);
		};

		let Some(next) = self.store.get(&tokens.join(" "))? else {
			return Ok(None);
		};

		Ok(Some(SeekResult {
			prefix: prefix.clone(),
			tail: tokens[1..].to_vec(),
			next,
		}))
	}

	/// Closes the underlying store.
	pub fn close(&self) -> Result<()> {
		self.store.close()
	}
}
