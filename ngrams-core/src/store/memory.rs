use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::prelude::IteratorRandom;

use super::{Store, Variations};
use crate::error::{Error, Result};

/// In-memory ngram store. Ngrams are lost when the store is dropped.
///
/// The whole map sits behind a single reader-writer lock: `add` and
/// `delete` take it exclusively, `get`, `any` and `len` share it.
#[derive(Debug, Default)]
pub struct MemoryStore {
	/// Variations keyed on window (ex. `"to be" => {"or": 1, "that": 1}`).
	grams: RwLock<HashMap<String, Variations>>,
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Variations>>> {
		self.grams.read().map_err(|_| Error::Store("memory store lock poisoned".to_owned()))
	}

	fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Variations>>> {
		self.grams.write().map_err(|_| Error::Store("memory store lock poisoned".to_owned()))
	}
}

impl Store for MemoryStore {
	fn add(&self, window: &str, future: &str) -> Result<()> {
		let mut grams = self.write()?;
		match grams.get_mut(window) {
			Some(variations) => variations.add(future),
			None => {
				let mut variations = Variations::new();
				variations.add(future);
				grams.insert(window.to_owned(), variations);
			}
		}
		Ok(())
	}

	fn get(&self, window: &str) -> Result<Option<Variations>> {
		Ok(self.read()?.get(window).cloned())
	}

	fn delete(&self, window: &str) -> Result<()> {
		self.write()?.remove(window);
		Ok(())
	}

	fn any(&self) -> Result<Option<(String, Variations)>> {
		let grams = self.read()?;
		Ok(grams
			.iter()
			.choose(&mut rand::rng())
			.map(|(window, variations)| (window.clone(), variations.clone())))
	}

	fn len(&self) -> Result<usize> {
		Ok(self.read()?.len())
	}

	fn close(&self) -> Result<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::thread;

	use super::*;

	#[test]
	fn test_add() {
		let store = MemoryStore::new();

		store.add("to be", "or").unwrap();
		assert_eq!(store.get("to be").unwrap(), Some(Variations::from([("or", 1)])));

		store.add("to be", "or").unwrap();
		store.add("to be", "that").unwrap();
		assert_eq!(
			store.get("to be").unwrap(),
			Some(Variations::from([("or", 2), ("that", 1)]))
		);
		assert_eq!(store.len().unwrap(), 1);
	}

	#[test]
	fn test_get_missing() {
		let store = MemoryStore::new();
		assert_eq!(store.get("to be").unwrap(), None);
	}

	#[test]
	fn test_delete() {
		let store = MemoryStore::new();
		store.add("to be", "or").unwrap();
		store.add("be or", "not").unwrap();

		store.delete("to be").unwrap();
		assert_eq!(store.get("to be").unwrap(), None);
		assert!(store.get("be or").unwrap().is_some());

		// Deleting an unknown window is not an error.
		store.delete("never seen").unwrap();
		assert_eq!(store.len().unwrap(), 1);
	}

	#[test]
	fn test_any() {
		let store = MemoryStore::new();
		assert_eq!(store.any().unwrap(), None);

		store.add("to be", "or").unwrap();
		store.add("be or", "not").unwrap();

		let (window, variations) = store.any().unwrap().unwrap();
		assert_eq!(store.get(&window).unwrap(), Some(variations));
	}

	#[test]
	fn test_concurrent_add() {
		let store = MemoryStore::new();

		thread::scope(|scope| {
			for _ in 0..8 {
				scope.spawn(|| {
					for _ in 0..1000 {
						store.add("to be", "or").unwrap();
						store.add("be or", "not").unwrap();
					}
				});
			}
		});

		assert_eq!(store.get("to be").unwrap().unwrap().count("or"), 8000);
		assert_eq!(store.get("be or").unwrap().unwrap().count("not"), 8000);
	}

	#[test]
	fn test_close() {
		assert!(MemoryStore::new().close().is_ok());
	}
}
