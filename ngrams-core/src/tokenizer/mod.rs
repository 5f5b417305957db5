//! Tokenizers split raw text into word and punctuation tokens, and join
//! tokens back into readable text.
//!
//! Any type implementing [`Tokenizer`] can be given to an
//! [`Index`](crate::model::index::Index) in place of the default one.

/// Default tokenizer for english and other latin-based languages, with
/// support for common CJK punctuation.
pub mod default_word;

/// Minimal tokenizer splitting on whitespace only.
pub mod whitespace;

pub use default_word::DefaultWord;
pub use whitespace::Whitespace;

/// Splits a string into discrete tokens and formats tokens back into text.
///
/// Implementations must be shareable between threads, as a single index may
/// be trained and queried concurrently.
pub trait Tokenizer: Send + Sync {
	/// Splits `text` into an ordered sequence of non-empty tokens.
	fn tokenize(&self, text: &str) -> Vec<String>;

	/// Joins tokens back into a string following the tokenizer's rules.
	///
	/// The result is a best effort reconstruction and is not guaranteed to
	/// match the text the tokens were taken from.
	fn format(&self, tokens: &[String]) -> String;
}
