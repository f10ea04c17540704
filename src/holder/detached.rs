/* src/holder/detached.rs */

use std::sync::Arc;

use crate::backend::{Backend, BackendError, MemoryBackend, PersistedHandle, Validator, ValueSlot};
use crate::codec::Tag;
use crate::entry::{BuildError, DirtyNode, SlotProvider};

/// Hosts nested entries outside the tree.
///
/// Composites build their slot entries here. Cells live in a private
/// store keyed by entry name and dirty state never reaches the tree.
pub struct DetachedHolder {
	path: String,
	store: Arc<MemoryBackend>,
	dirty: Arc<DirtyNode>,
}

impl DetachedHolder {
	/// Creates a holder for the slots of the entry at `owner`.
	pub fn new(owner: impl Into<String>) -> Self {
		Self {
			path: owner.into(),
			store: Arc::new(MemoryBackend::new()),
			dirty: DirtyNode::root(),
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn get(&self, name: &str) -> Option<Tag> {
		self.store.get(name)
	}

	pub fn set(&self, name: &str, value: Tag) -> Result<(), BackendError> {
		self.store.set(name, value)
	}

	/// Whether any entry built here has changed.
	pub fn is_dirty(&self) -> bool {
		self.dirty.is_dirty()
	}
}

impl SlotProvider for DetachedHolder {
	fn entry_path(&self, name: &str) -> String {
		format!("{}[{}]", self.path, name)
	}

	fn define_slot(
		&self,
		name: &str,
		default: Tag,
		validator: Validator,
	) -> Result<Box<dyn ValueSlot>, BuildError> {
		let store: Arc<dyn Backend> = self.store.clone();
		Ok(Box::new(PersistedHandle::define(store, name, default, validator)?))
	}

	fn dirty_node(&self) -> Option<Arc<DirtyNode>> {
		Some(Arc::clone(&self.dirty))
	}
}
