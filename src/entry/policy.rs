/* src/entry/policy.rs */

/// Where an entry keeps its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persistence {
	/// Stored through the backend.
	#[default]
	Persistent,
	/// Kept in an entry-local shadow, never written to the backend.
	Temporary,
	/// Temporary, and edits coming from presentation are discarded.
	Ignored,
}

impl Persistence {
	pub fn is_persistent(self) -> bool {
		self == Persistence::Persistent
	}

	pub fn is_ignored(self) -> bool {
		self == Persistence::Ignored
	}
}
