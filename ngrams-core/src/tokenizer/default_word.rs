use std::iter::Peekable;
use std::str::CharIndices;

use super::Tokenizer;

/// Whitespace-like characters which end a token and are discarded.
const SKIPPABLE: [char; 3] = [
	'\t',       // tab
	' ',        // space
	'\u{3000}', // ideographic space (cjk)
];

/// Line breaks. Skippable when stripped, otherwise kept as punctuation tokens.
const LINE_BREAKS: [char; 2] = ['\n', '\r'];

/// Brackets and quote marks, removed from tokens entirely.
/// The right single quote is left out, it is used as an apostrophe.
const INVALID: [char; 19] = [
	'(', ')', '[', ']', '{', '}', '"', '&', '*',
	'\u{201C}', // “
	'\u{201D}', // ”
	'\u{2018}', // ‘
	'\u{00AB}', // «
	'\u{00BB}', // »
	'\u{201E}', // „
	'\u{300E}', // 『
	'\u{300F}', // 』
	'\u{300C}', // 「
	'\u{300D}', // 」
];

/// Punctuation which ends a sentence. Used when formatting.
const STOPPERS: [char; 7] = [
	'.', '?', '!',
	'\u{203D}', // ‽
	'\u{3002}', // 。
	'\u{FF1F}', // ？
	'\u{FF01}', // ！
];

/// Punctuation which can be split into its own token.
const PUNCTUATION: [char; 13] = [
	'.', ',', '?', '!', ':', ';',
	'\u{203D}', // ‽
	'\u{3002}', // 。
	'\u{3001}', // 、
	'\u{FF01}', // ！
	'\u{FF1F}', // ？
	'\u{FF1A}', // ：
	'\u{FF1B}', // ；
];

/// Word tokenizer for bodies of text in english and other latin-based
/// languages, also aware of the common CJK punctuation and quote marks.
///
/// Words keep their inner hyphens, apostrophes and punctuation
/// (`good-looking`, `ma'am?--is`), while punctuation ending a word is split
/// into a token of its own. Brackets and quote marks are dropped.
///
/// Each character class can be replaced with the `with_*` builders, e.g.
/// to split the em dash off like any other punctuation:
///
/// ```
/// use ngrams_core::tokenizer::{DefaultWord, Tokenizer};
///
/// let tk = DefaultWord::default().with_punctuation(['.', ',', '\u{2014}']);
/// assert_eq!(tk.tokenize("wait\u{2014} now"), vec!["wait", "\u{2014}", "now"]);
/// ```
///
/// ## Invariants
/// - `unskippable` is only filled when line breaks are preserved, and is
///   then a subset of `punctuation`
/// - Stripped line breaks are always skippable, whatever `skippable` was set to
#[derive(Clone, Debug)]
pub struct DefaultWord {
	/// Line breaks are whitespace rather than tokens.
	strip_linebreaks: bool,
	/// Characters which end the current token and are discarded.
	skippable: Vec<char>,
	/// Characters which are not skippable but still mark the end of a word
	/// (line breaks, when they are preserved).
	unskippable: Vec<char>,
	/// Punctuation ending a sentence.
	stoppers: Vec<char>,
	/// Punctuation which may form a token on its own.
	punctuation: Vec<char>,
	/// Characters stripped from tokens.
	invalid: Vec<char>,
}

impl Default for DefaultWord {
	fn default() -> Self {
		Self::new(true)
	}
}

impl DefaultWord {
	/// Creates a new tokenizer.
	///
	/// When `strip_linebreaks` is false, `\n` and `\r` are preserved as
	/// punctuation tokens instead of being treated as whitespace.
	pub fn new(strip_linebreaks: bool) -> Self {
		let mut tokenizer = Self {
			strip_linebreaks,
			skippable: Vec::new(),
			unskippable: Vec::new(),
			stoppers: STOPPERS.to_vec(),
			punctuation: Vec::new(),
			invalid: INVALID.to_vec(),
		};

		if !strip_linebreaks {
			tokenizer.unskippable.extend(LINE_BREAKS);
		}

		tokenizer.with_skippable(SKIPPABLE).with_punctuation(PUNCTUATION)
	}

	/// Replaces the characters treated as whitespace.
	///
	/// Line breaks are added back when they are stripped.
	pub fn with_skippable(mut self, chars: impl IntoIterator<Item = char>) -> Self {
		self.skippable = chars.into_iter().collect();
		if self.strip_linebreaks {
			self.skippable.extend(LINE_BREAKS);
		}
		self
	}

	/// Replaces the punctuation which may be split into its own token.
	///
	/// Line breaks are added back when they are preserved.
	pub fn with_punctuation(mut self, chars: impl IntoIterator<Item = char>) -> Self {
		self.punctuation = chars.into_iter().collect();
		if !self.strip_linebreaks {
			self.punctuation.extend(LINE_BREAKS);
		}
		self
	}

	/// Replaces the characters stripped from tokens.
	pub fn with_invalid(mut self, chars: impl IntoIterator<Item = char>) -> Self {
		self.invalid = chars.into_iter().collect();
		self
	}

	/// Replaces the punctuation ending a sentence.
	pub fn with_stoppers(mut self, chars: impl IntoIterator<Item = char>) -> Self {
		self.stoppers = chars.into_iter().collect();
		self
	}

	/// Returns a scanner over the raw tokens of `text`.
	///
	/// Unlike [`Tokenizer::tokenize`], the scanner may yield empty tokens,
	/// for example around runs of whitespace or a token made only of quotes.
	pub fn scan<'a>(&'a self, text: &'a str) -> Scanner<'a> {
		Scanner {
			tokenizer: self,
			text,
			chars: text.char_indices().peekable(),
			start: 0,
			pending: None,
		}
	}

	/// Removes every invalid character from `text`.
	pub fn sanitize(&self, text: &str) -> String {
		text.chars().filter(|c| !self.invalid.contains(c)).collect()
	}

	fn is_skippable(&self, c: char) -> bool {
		self.skippable.contains(&c)
	}

	fn is_punctuation(&self, c: char) -> bool {
		self.punctuation.contains(&c)
	}

	/// A punctuation mark is only split off when it ends a word: it is
	/// followed by whitespace, an invalid character, a preserved line break,
	/// more punctuation, or nothing at all.
	fn ends_word(&self, next: Option<char>) -> bool {
		match next {
			None => true,
			Some(c) => {
				self.is_skippable(c)
					|| self.invalid.contains(&c)
					|| self.unskippable.contains(&c)
					|| self.is_punctuation(c)
			}
		}
	}

	fn starts_with(token: &str, class: &[char]) -> bool {
		token.chars().next().is_some_and(|c| class.contains(&c))
	}
}

/// Uppercases the first letter of `word`, when only apostrophes come
/// before it (`'tis`, but not `2nd`).
fn capitalize(word: &str) -> String {
	match word.char_indices().find(|&(_, c)| c != '\'' && c != '\u{2019}') {
		Some((i, c)) if c.is_alphabetic() => {
			let mut capitalized = String::with_capacity(word.len());
			capitalized.push_str(&word[..i]);
			capitalized.extend(c.to_uppercase());
			capitalized.push_str(&word[i + c.len_utf8()..]);
			capitalized
		}
		_ => word.to_owned(),
	}
}

impl Tokenizer for DefaultWord {
	fn tokenize(&self, text: &str) -> Vec<String> {
		self.scan(text).filter(|token| !token.is_empty()).collect()
	}

	fn format(&self, tokens: &[String]) -> String {
		let mut out = String::new();
		let mut previous: Option<&str> = None;
		// The first word, and any word starting a new sentence, is capitalized.
		let mut sentence_start = true;

		for token in tokens.iter().filter(|token| !token.is_empty()) {
			if Self::starts_with(token, &self.punctuation) {
				out.push_str(token);
				if Self::starts_with(token, &self.stoppers) {
					sentence_start = true;
				} else if !Self::starts_with(token, &self.unskippable) {
					sentence_start = false;
				}
			} else {
				let after_break = previous.is_some_and(|p| Self::starts_with(p, &self.unskippable));
				if previous.is_some() && !after_break {
					out.push(' ');
				}

				if sentence_start {
					out.push_str(&capitalize(token));
				} else {
					out.push_str(token);
				}
				sentence_start = false;
			}
			previous = Some(token);
		}

		if let Some(last) = previous
			&& !Self::starts_with(last, &self.punctuation)
		{
			out.push('.');
		}

		out
	}
}

/// Single pass scanner over the characters of a string, yielding raw
/// (sanitized, possibly empty) tokens.
pub struct Scanner<'a> {
	tokenizer: &'a DefaultWord,
	text: &'a str,
	chars: Peekable<CharIndices<'a>>,
	/// Byte offset where the current token starts.
	start: usize,
	/// Punctuation split off at the end of the previous token.
	pending: Option<&'a str>,
}

impl Scanner<'_> {
	fn flush(&mut self, end: usize) -> String {
		let token = self.tokenizer.sanitize(&self.text[self.start..end]);
		self.start = end;
		token
	}
}

impl Iterator for Scanner<'_> {
	type Item = String;

	fn next(&mut self) -> Option<String> {
		if let Some(punctuation) = self.pending.take() {
			return Some(punctuation.to_owned());
		}

		while let Some((i, c)) = self.chars.next() {
			if self.tokenizer.is_skippable(c) {
				let token = self.flush(i);

				// Consume the whole run of skippable characters.
				while self.chars.next_if(|&(_, n)| self.tokenizer.is_skippable(n)).is_some() {}
				self.start = self.chars.peek().map_or(self.text.len(), |&(j, _)| j);

				return Some(token);
			}

			// Preserved line breaks always stand alone, other punctuation only
			// when it ends a word.
			let split = self.tokenizer.unskippable.contains(&c)
				|| (self.tokenizer.is_punctuation(c) && self.tokenizer.ends_word(self.chars.peek().map(|&(_, n)| n)));
			if split {
				let token = self.flush(i);
				let end = i + c.len_utf8();
				self.pending = Some(&self.text[i..end]);
				self.start = end;

				return Some(token);
			}
		}

		if self.start < self.text.len() {
			return Some(self.flush(self.text.len()));
		}

		None
	}
}
