/* src/entry/backing.rs */

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

pub type BackingError = Box<dyn std::error::Error + Send + Sync>;

/// Externally bound state an entry commits from and bakes into.
pub trait Backing<V>: Send + Sync {
	fn load(&self) -> Result<V, BackingError>;

	fn store(&self, value: &V) -> Result<(), BackingError>;
}

/// A shared cell bound to an entry. Never fails.
pub struct SharedBacking<V> {
	cell: Arc<ArcSwap<V>>,
}

impl<V> SharedBacking<V> {
	pub fn new(value: V) -> Self {
		Self {
			cell: Arc::new(ArcSwap::from_pointee(value)),
		}
	}

	/// Current value. This is a wait-free operation.
	pub fn get(&self) -> Arc<V> {
		self.cell.load_full()
	}

	pub fn set(&self, value: V) {
		self.cell.store(Arc::new(value));
	}
}

impl<V> Clone for SharedBacking<V> {
	fn clone(&self) -> Self {
		Self {
			cell: Arc::clone(&self.cell),
		}
	}
}

impl<V> Backing<V> for SharedBacking<V>
where
	V: Clone + Send + Sync,
{
	fn load(&self) -> Result<V, BackingError> {
		Ok((*self.cell.load_full()).clone())
	}

	fn store(&self, value: &V) -> Result<(), BackingError> {
		self.set(value.clone());
		Ok(())
	}
}

/// One failed transfer between an entry and its backing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackingFailure {
	pub path: String,
	pub cause: String,
}

impl fmt::Display for BackingFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.path, self.cause)
	}
}
