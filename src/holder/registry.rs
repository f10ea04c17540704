/* src/holder/registry.rs */

use std::collections::HashSet;
use std::sync::{LazyLock, Mutex, PoisonError};

use arc_swap::ArcSwap;

use super::RootId;
use crate::entry::BuildError;

static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Process-wide set of live roots, keyed by owner and kind.
///
/// Lookups are lock-free. The mutex only serializes registration.
pub struct Registry {
	roots: ArcSwap<HashSet<RootId>>,
	lock: Mutex<()>,
}

/// The process-wide registry.
pub fn registry() -> &'static Registry {
	&REGISTRY
}

impl Registry {
	fn new() -> Self {
		Self {
			roots: ArcSwap::from_pointee(HashSet::new()),
			lock: Mutex::new(()),
		}
	}

	pub(crate) fn register(&'static self, id: RootId) -> Result<Registration, BuildError> {
		let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
		if self.roots.load().contains(&id) {
			return Err(BuildError::DuplicateRoot { id: id.to_string() });
		}
		self.roots.rcu(|roots| {
			let mut roots = (**roots).clone();
			roots.insert(id.clone());
			roots
		});
		#[cfg(feature = "logging")]
		log::info!("registered config root {id}");
		Ok(Registration { registry: self, id })
	}

	fn release(&self, id: &RootId) {
		let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
		self.roots.rcu(|roots| {
			let mut roots = (**roots).clone();
			roots.remove(id);
			roots
		});
		#[cfg(feature = "logging")]
		log::debug!("released config root {id}");
	}

	pub fn contains(&self, id: &RootId) -> bool {
		self.roots.load().contains(id)
	}

	pub fn ids(&self) -> Vec<RootId> {
		self.roots.load().iter().cloned().collect()
	}
}

/// Keeps a root registered until dropped.
pub struct Registration {
	registry: &'static Registry,
	id: RootId,
}

impl Registration {
	pub fn id(&self) -> &RootId {
		&self.id
	}
}

impl Drop for Registration {
	fn drop(&mut self) {
		self.registry.release(&self.id);
	}
}
