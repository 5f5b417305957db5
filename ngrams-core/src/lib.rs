//! Word-level ngram indexing and text generation library.
//!
//! This crate learns how tokens (words and punctuation) follow each other in
//! a body of text, and babbles new text with the same local sequencing:
//! - Tokenizers splitting text into tokens and formatting them back
//! - Frequency stores counting what follows each window of `n - 1` tokens
//! - An index training a store and looking windows up
//! - Weighted random generation walking the index
//!
//! ```
//! use ngrams_core::model::index::Index;
//!
//! let index = Index::new(3);
//! index.parse("to be or not to be, that is the question.")?;
//! let text = index.babble("to be", 20)?;
//! assert!(text.starts_with("To be"));
//! # Ok::<(), ngrams_core::Error>(())
//! ```

/// Error types.
pub mod error;

/// I/O utilities for loading corpora.
pub mod io;

/// Ngram index and babble generation.
pub mod model;

/// Frequency stores and the `Store` trait.
pub mod store;

/// Tokenizers and the `Tokenizer` trait.
pub mod tokenizer;

pub use error::{Error, Result};
