/* src/holder/snapshot.rs */

use std::collections::BTreeMap;

use super::{EntryHolder, join};
use crate::codec::Tag;
use crate::entry::EntryError;

/// Outcome of [`EntryHolder::load_snapshot`].
#[derive(Debug, Default)]
pub struct LoadReport {
	/// Entries whose value was applied.
	pub loaded: Vec<String>,
	/// Entries whose value was refused, with the reason.
	pub failed: Vec<(String, EntryError)>,
	/// Unknown paths and non-persistent entries.
	pub skipped: Vec<String>,
}

impl EntryHolder {
	/// Persisted tags of every persistent entry, nested by group.
	pub fn snapshot(&self) -> Tag {
		let mut compound = BTreeMap::new();
		for (name, entry) in &self.entries {
			if entry.meta().persistence.is_persistent() {
				compound.insert(name.clone(), entry.current_tag());
			}
		}
		for (name, child) in &self.children {
			compound.insert(name.clone(), child.snapshot());
		}
		Tag::Compound(compound)
	}

	/// Applies a tag produced by [`EntryHolder::snapshot`].
	///
	/// Invalid entries are reported and never stop the rest of the load.
	pub fn load_snapshot(&mut self, snapshot: &Tag) -> LoadReport {
		let mut report = LoadReport::default();
		self.load_into(snapshot, &mut report);
		report
	}

	fn load_into(&mut self, snapshot: &Tag, report: &mut LoadReport) {
		let Some(compound) = snapshot.as_compound() else {
			report.failed.push((
				self.path.clone(),
				EntryError::Decode {
					path: self.path.clone(),
				},
			));
			return;
		};
		for (name, tag) in compound {
			let path = join(&self.path, name);
			if let Some(child) = self.children.get_mut(name) {
				child.load_into(tag, report);
				continue;
			}
			match self.entries.get_mut(name) {
				Some(entry) if entry.meta().persistence.is_persistent() => match entry.load_tag(tag) {
					Ok(_) => report.loaded.push(path),
					Err(error) => {
						#[cfg(feature = "logging")]
						log::warn!("snapshot value rejected for {path}: {error}");
						report.failed.push((path, error));
					}
				},
				_ => report.skipped.push(path),
			}
		}
	}
}
