/* src/entry/dirty.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A dirty flag linked to the flag of its owner.
///
/// Marking propagates to every ancestor. Clearing is local; holders cascade
/// it downwards themselves since only they know their descendants.
#[derive(Debug, Default)]
pub struct DirtyNode {
	flag: AtomicBool,
	parent: Option<Arc<DirtyNode>>,
}

impl DirtyNode {
	pub fn root() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn child(parent: Option<Arc<DirtyNode>>) -> Arc<Self> {
		Arc::new(Self {
			flag: AtomicBool::new(false),
			parent,
		})
	}

	pub fn is_dirty(&self) -> bool {
		self.flag.load(Ordering::Relaxed)
	}

	pub fn mark(&self) {
		self.flag.store(true, Ordering::Relaxed);
		if let Some(parent) = &self.parent {
			parent.mark();
		}
	}

	pub fn clear(&self) {
		self.flag.store(false, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mark_reaches_ancestors_clear_stays_local() {
		let root = DirtyNode::root();
		let group = DirtyNode::child(Some(root.clone()));
		let leaf = DirtyNode::child(Some(group.clone()));
		leaf.mark();
		assert!(root.is_dirty() && group.is_dirty() && leaf.is_dirty());
		root.clear();
		assert!(!root.is_dirty());
		assert!(group.is_dirty());
	}
}
