/* src/entry/meta.rs */

use super::Persistence;

/// Builder-level flags copied onto every built entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMeta {
	/// Opaque translation key for the entry's label.
	pub translation: Option<String>,
	/// Opaque translation key for the entry's tooltip.
	pub tooltip: Option<String>,
	/// Changing the value only takes effect after a restart.
	pub requires_restart: bool,
	pub persistence: Persistence,
}
