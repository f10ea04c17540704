/* src/backend/memory.rs */

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use super::{Backend, BackendError, Validator};
use crate::codec::Tag;

#[derive(Clone)]
struct Slot {
	value: Tag,
	/// `None` until the key is defined; staged values have no validator yet.
	validator: Option<Validator>,
}

/// In-memory backend, useful for testing and for hosting detached entries.
///
/// Uses RCU (Read-Copy-Update) for lock-free reads. Values staged with
/// [`MemoryBackend::with_values`] play the role of a previously loaded file:
/// they are picked up by `define` when valid.
pub struct MemoryBackend {
	inner: ArcSwap<HashMap<String, Slot>>,
	version: AtomicU64,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self {
			inner: ArcSwap::from_pointee(HashMap::new()),
			version: AtomicU64::new(0),
		}
	}

	/// Creates a backend with staged values, keyed by full path.
	pub fn with_values<I, K>(values: I) -> Self
	where
		I: IntoIterator<Item = (K, Tag)>,
		K: Into<String>,
	{
		let staged = values
			.into_iter()
			.map(|(key, value)| {
				(
					key.into(),
					Slot {
						value,
						validator: None,
					},
				)
			})
			.collect();
		Self {
			inner: ArcSwap::from_pointee(staged),
			version: AtomicU64::new(0),
		}
	}

	/// Number of successful writes so far.
	pub fn version(&self) -> u64 {
		self.version.load(Ordering::SeqCst)
	}

	/// Returns all defined keys.
	pub fn keys(&self) -> Vec<String> {
		let snapshot = self.inner.load();
		snapshot
			.iter()
			.filter(|(_, slot)| slot.validator.is_some())
			.map(|(key, _)| key.clone())
			.collect()
	}

	pub fn is_defined(&self, key: &str) -> bool {
		let snapshot = self.inner.load();
		snapshot.get(key).is_some_and(|slot| slot.validator.is_some())
	}

	/// Returns the stored values, staged ones included.
	pub fn snapshot(&self) -> HashMap<String, Tag> {
		let snapshot = self.inner.load();
		snapshot
			.iter()
			.map(|(key, slot)| (key.clone(), slot.value.clone()))
			.collect()
	}

	fn store(&self, key: &str, slot: Slot) {
		self.inner.rcu(|map| {
			let mut new_map = (**map).clone();
			new_map.insert(key.to_string(), slot.clone());
			new_map
		});
		self.version.fetch_add(1, Ordering::SeqCst);
	}
}

impl Default for MemoryBackend {
	fn default() -> Self {
		Self::new()
	}
}

impl Backend for MemoryBackend {
	fn define(&self, key: &str, default: Tag, validator: Validator) -> Result<(), BackendError> {
		let value = {
			let snapshot = self.inner.load();
			match snapshot.get(key) {
				Some(slot) if slot.validator.is_some() => {
					return Err(BackendError::AlreadyDefined {
						key: key.to_string(),
					});
				}
				Some(slot) if validator(&slot.value) => slot.value.clone(),
				_ => default,
			}
		};
		self.store(
			key,
			Slot {
				value,
				validator: Some(validator),
			},
		);
		Ok(())
	}

	fn get(&self, key: &str) -> Option<Tag> {
		let snapshot = self.inner.load();
		snapshot
			.get(key)
			.filter(|slot| slot.validator.is_some())
			.map(|slot| slot.value.clone())
	}

	fn set(&self, key: &str, value: Tag) -> Result<(), BackendError> {
		// Pre-check outside rcu so a rejected write never clones the map.
		let validator = {
			let snapshot = self.inner.load();
			match snapshot.get(key).and_then(|slot| slot.validator.clone()) {
				Some(validator) => validator,
				None => {
					return Err(BackendError::Undefined {
						key: key.to_string(),
					});
				}
			}
		};
		if !validator(&value) {
			return Err(BackendError::Rejected {
				key: key.to_string(),
			});
		}
		self.store(
			key,
			Slot {
				value,
				validator: Some(validator),
			},
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;

	fn ints() -> Validator {
		Arc::new(|tag: &Tag| matches!(tag, Tag::Int(_)))
	}

	#[test]
	fn test_staged_value_survives_define_when_valid() {
		let backend = MemoryBackend::with_values([("a", Tag::Int(5)), ("b", Tag::Bool(true))]);
		backend.define("a", Tag::Int(0), ints()).unwrap();
		backend.define("b", Tag::Int(0), ints()).unwrap();
		assert_eq!(backend.get("a"), Some(Tag::Int(5)));
		assert_eq!(backend.get("b"), Some(Tag::Int(0)));
	}

	#[test]
	fn test_set_requires_definition_and_validity() {
		let backend = MemoryBackend::new();
		assert!(matches!(
			backend.set("x", Tag::Int(1)),
			Err(BackendError::Undefined { .. })
		));
		backend.define("x", Tag::Int(1), ints()).unwrap();
		assert!(matches!(
			backend.set("x", Tag::String("no".into())),
			Err(BackendError::Rejected { .. })
		));
		backend.set("x", Tag::Int(2)).unwrap();
		assert_eq!(backend.get("x"), Some(Tag::Int(2)));
		assert_eq!(backend.version(), 2);
	}

	#[test]
	fn test_define_twice_is_rejected() {
		let backend = MemoryBackend::new();
		backend.define("x", Tag::Int(1), ints()).unwrap();
		backend.set("x", Tag::Int(3)).unwrap();

		let result = backend.define("x", Tag::Int(0), Arc::new(|_: &Tag| true));
		assert_eq!(
			result,
			Err(BackendError::AlreadyDefined {
				key: "x".to_string()
			})
		);
		assert!(matches!(
			backend.set("x", Tag::String("no".into())),
			Err(BackendError::Rejected { .. })
		));
		assert_eq!(backend.get("x"), Some(Tag::Int(3)));
	}
}
