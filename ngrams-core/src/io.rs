use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Extension of the files making up a corpus.
const CORPUS_EXTENSION: &str = "txt";

/// Reads every `.txt` file of a directory, one text per file, in file name
/// order. `"."` stands for the current working directory.
///
/// # Errors
/// Returns an error if the path is not a directory or a file can't be read.
pub fn read_corpus(folder: &str) -> io::Result<Vec<String>> {
	let folder = match folder {
		"." | "./" => env::current_dir()?,
		_ => PathBuf::from(folder),
	};
	if !folder.is_dir() {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("Expected a directory, got: {}", folder.display()),
		));
	}

	let mut files = Vec::new();
	for entry in fs::read_dir(&folder)? {
		let path = entry?.path();
		if path.is_file() && path.extension().is_some_and(|ext| ext == CORPUS_EXTENSION) {
			files.push(path);
		}
	}
	files.sort();

	files.iter().map(fs::read_to_string).collect()
}

#[cfg(test)]
mod tests {
	use tempdir::TempDir;

	use super::*;

	#[test]
	fn test_read_corpus() {
		let dir = TempDir::new("ngrams_corpus").unwrap();
		fs::write(dir.path().join("b.txt"), "second text").unwrap();
		fs::write(dir.path().join("a.txt"), "first text").unwrap();
		fs::write(dir.path().join("notes.md"), "ignored").unwrap();
		fs::create_dir(dir.path().join("nested.txt")).unwrap();

		assert_eq!(
			read_corpus(dir.path().to_str().unwrap()).unwrap(),
			vec!["first text", "second text"]
		);
	}

	#[test]
	fn test_read_corpus_empty_directory() {
		let dir = TempDir::new("ngrams_empty").unwrap();
		assert!(read_corpus(dir.path().to_str().unwrap()).unwrap().is_empty());
	}

	#[test]
	fn test_read_corpus_not_a_directory() {
		let err = read_corpus("/definitely/not/here").unwrap_err();
		assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
	}
}
