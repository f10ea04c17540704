/* src/backend/mod.rs */

//! Storage backend for persisted values and the slots entries read through.

mod error;
mod memory;

pub use error::BackendError;
pub use memory::MemoryBackend;

use std::sync::Arc;

use crate::codec::Tag;

/// Predicate deciding whether a stored tag is acceptable for a key.
pub type Validator = Arc<dyn Fn(&Tag) -> bool + Send + Sync>;

/// Validates and stores persisted values keyed by their full dot path.
///
/// The core never touches storage directly. Every entry obtains a
/// [`PersistedHandle`] once, at build time.
pub trait Backend: Send + Sync {
	/// Declares `key`. A staged value is kept when `validator` accepts it,
	/// otherwise `default` is stored. A key can be declared once.
	fn define(&self, key: &str, default: Tag, validator: Validator) -> Result<(), BackendError>;

	fn get(&self, key: &str) -> Option<Tag>;

	fn set(&self, key: &str, value: Tag) -> Result<(), BackendError>;
}

/// A single addressable cell holding an entry's persisted tag.
///
/// Tree holders hand out cells of the root backend, detached holders hand
/// out cells of a private store. Entries cannot tell the two apart.
pub trait ValueSlot: Send + Sync {
	fn key(&self) -> &str;

	fn read(&self) -> Option<Tag>;

	fn write(&self, value: Tag) -> Result<(), BackendError>;
}

/// Handle to one defined key of a [`Backend`].
pub struct PersistedHandle {
	backend: Arc<dyn Backend>,
	key: String,
}

impl PersistedHandle {
	/// Defines `key` on `backend` and returns the handle bound to it.
	pub fn define(
		backend: Arc<dyn Backend>,
		key: impl Into<String>,
		default: Tag,
		validator: Validator,
	) -> Result<Self, BackendError> {
		let key = key.into();
		backend.define(&key, default, validator)?;
		Ok(Self { backend, key })
	}
}

impl ValueSlot for PersistedHandle {
	fn key(&self) -> &str {
		&self.key
	}

	fn read(&self) -> Option<Tag> {
		self.backend.get(&self.key)
	}

	fn write(&self, value: Tag) -> Result<(), BackendError> {
		self.backend.set(&self.key, value)
	}
}
