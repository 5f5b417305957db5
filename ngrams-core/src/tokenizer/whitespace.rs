use super::Tokenizer;

/// Splits text on Unicode whitespace and nothing else.
///
/// Punctuation stays attached to the words it touches, and formatting is a
/// plain space-join. Useful when the corpus is already tokenized, or when
/// punctuation should not influence the chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct Whitespace;

impl Tokenizer for Whitespace {
	fn tokenize(&self, text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}

	fn format(&self, tokens: &[String]) -> String {
		tokens
			.iter()
			.filter(|token| !token.is_empty())
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join(" ")
	}
}
