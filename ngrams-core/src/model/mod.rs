//! Ngram indexing and text generation.
//!
//! - [`index::Index`] learns ngrams from text and looks them up
//! - [`generator`] adds [`Index::babble`](index::Index::babble), walking the
//!   index to produce new text
//! - [`config::IndexConfig`] holds the settings of an in-memory index

/// Index configuration.
pub mod config;

/// Babble generation over an index.
pub mod generator;

/// Ngram index: training and lookups.
pub mod index;
