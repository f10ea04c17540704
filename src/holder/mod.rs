/* src/holder/mod.rs */

//! The holder tree: named groups of entries resolved by dot paths.

mod detached;
mod error;
mod registry;
mod root;
mod snapshot;

pub use detached::DetachedHolder;
pub use error::{HolderError, Phase};
pub use registry::{Registration, Registry, registry};
pub use root::{ConfigRoot, ConfigRootBuilder, RootId, RootKind};
pub use snapshot::LoadReport;

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::backend::{Backend, PersistedHandle, Validator, ValueSlot};
use crate::codec::Tag;
use crate::entry::{
	AnyEntry, AnyValue, BackingError, BackingFailure, BuildError, DirtyNode, Entry, EntryBuilder,
	EntryError, EntryKind, KindBuilder, SEPARATOR, SlotProvider, Value, validate_name,
};
use crate::presentation::{PresentationError, PresentationGroup, WidgetFactory};

/// Post-bake hook of a holder.
pub type Baker = Arc<dyn Fn(&EntryHolder) -> Result<(), BackingError> + Send + Sync>;

fn join(parent: &str, name: &str) -> String {
	if parent.is_empty() {
		name.to_string()
	} else {
		format!("{parent}{SEPARATOR}{name}")
	}
}

/// A named container of entries and child holders.
///
/// Entries and children keep insertion order. A dirty child always has
/// dirty ancestors; clearing a holder clears its whole subtree.
pub struct EntryHolder {
	name: String,
	path: String,
	backend: Arc<dyn Backend>,
	entries: IndexMap<String, Box<dyn AnyEntry>>,
	children: IndexMap<String, EntryHolder>,
	dirty: Arc<DirtyNode>,
	baker: Option<Baker>,
}

impl EntryHolder {
	pub(crate) fn root(name: String, backend: Arc<dyn Backend>) -> Self {
		Self {
			name,
			path: String::new(),
			backend,
			entries: IndexMap::new(),
			children: IndexMap::new(),
			dirty: DirtyNode::root(),
			baker: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Dot path from the root; empty for the root itself.
	pub fn path(&self) -> &str {
		&self.path
	}

	fn check_free(&self, name: &str) -> Result<(), BuildError> {
		validate_name(name)?;
		if self.entries.contains_key(name) || self.children.contains_key(name) {
			return Err(BuildError::Duplicate {
				path: join(&self.path, name),
			});
		}
		Ok(())
	}

	/// Builds and attaches an entry.
	pub fn add<B: KindBuilder>(&mut self, name: &str, builder: &EntryBuilder<B>) -> Result<&mut Self, BuildError> {
		self.check_free(name)?;
		let entry = builder.build(&*self, name)?;
		self.entries.insert(name.to_string(), Box::new(entry));
		Ok(self)
	}

	/// Creates a child holder and returns it.
	pub fn group(&mut self, name: &str) -> Result<&mut EntryHolder, BuildError> {
		self.check_free(name)?;
		let child = EntryHolder {
			name: name.to_string(),
			path: join(&self.path, name),
			backend: Arc::clone(&self.backend),
			entries: IndexMap::new(),
			children: IndexMap::new(),
			dirty: DirtyNode::child(Some(Arc::clone(&self.dirty))),
			baker: None,
		};
		Ok(self.children.entry(name.to_string()).or_insert(child))
	}

	/// Installs the hook run at the end of this holder's bake.
	pub fn set_baker(
		&mut self,
		baker: impl Fn(&EntryHolder) -> Result<(), BackingError> + Send + Sync + 'static,
	) -> &mut Self {
		self.baker = Some(Arc::new(baker));
		self
	}

	/// Splits `path` into the holder owning its last segment and that segment.
	fn locate<'a, 'p>(&'a self, path: &'p str) -> Result<(&'a EntryHolder, &'p str), EntryError> {
		match path.split_once(SEPARATOR) {
			None => Ok((self, path)),
			Some((group, rest)) => match self.children.get(group) {
				Some(child) => child.locate(rest),
				None => Err(EntryError::NoSuchGroup {
					path: join(&self.path, group),
				}),
			},
		}
	}

	fn locate_mut<'a, 'p>(&'a mut self, path: &'p str) -> Result<(&'a mut EntryHolder, &'p str), EntryError> {
		match path.split_once(SEPARATOR) {
			None => Ok((self, path)),
			Some((group, rest)) => {
				let missing = join(&self.path, group);
				match self.children.get_mut(group) {
					Some(child) => child.locate_mut(rest),
					None => Err(EntryError::NoSuchGroup { path: missing }),
				}
			}
		}
	}

	pub fn any_entry(&self, path: &str) -> Result<&dyn AnyEntry, EntryError> {
		let (holder, name) = self.locate(path)?;
		match holder.entries.get(name) {
			Some(entry) => Ok(&**entry),
			None => Err(EntryError::NoSuchEntry {
				path: join(&holder.path, name),
			}),
		}
	}

	pub fn any_entry_mut(&mut self, path: &str) -> Result<&mut (dyn AnyEntry + 'static), EntryError> {
		let (holder, name) = self.locate_mut(path)?;
		let missing = join(&holder.path, name);
		match holder.entries.get_mut(name) {
			Some(entry) => Ok(&mut **entry),
			None => Err(EntryError::NoSuchEntry { path: missing }),
		}
	}

	/// Typed access to the entry at `path`.
	pub fn entry<K: EntryKind>(&self, path: &str) -> Result<&Entry<K>, EntryError> {
		let entry = self.any_entry(path)?;
		entry
			.as_any()
			.downcast_ref::<Entry<K>>()
			.ok_or_else(|| EntryError::TypeMismatch {
				path: entry.path().to_string(),
				expected: entry.type_name(),
				found: type_name::<K::Value>(),
			})
	}

	pub fn entry_mut<K: EntryKind>(&mut self, path: &str) -> Result<&mut Entry<K>, EntryError> {
		let entry = self.any_entry_mut(path)?;
		let mismatch = EntryError::TypeMismatch {
			path: entry.path().to_string(),
			expected: entry.type_name(),
			found: type_name::<K::Value>(),
		};
		entry.as_any_mut().downcast_mut::<Entry<K>>().ok_or(mismatch)
	}

	pub fn child(&self, path: &str) -> Result<&EntryHolder, EntryError> {
		let (holder, name) = self.locate(path)?;
		holder.children.get(name).ok_or_else(|| EntryError::NoSuchGroup {
			path: join(&holder.path, name),
		})
	}

	pub fn child_mut(&mut self, path: &str) -> Result<&mut EntryHolder, EntryError> {
		let (holder, name) = self.locate_mut(path)?;
		let missing = join(&holder.path, name);
		holder
			.children
			.get_mut(name)
			.ok_or(EntryError::NoSuchGroup { path: missing })
	}

	pub fn has_entry(&self, path: &str) -> bool {
		self.any_entry(path).is_ok()
	}

	pub fn has_child(&self, path: &str) -> bool {
		self.child(path).is_ok()
	}

	/// Reads the value at `path` as a `V`.
	pub fn get<V: Value>(&self, path: &str) -> Result<V, EntryError> {
		let entry = self.any_entry(path)?;
		entry
			.value_any()
			.downcast_ref::<V>()
			.cloned()
			.ok_or_else(|| EntryError::TypeMismatch {
				path: entry.path().to_string(),
				expected: entry.type_name(),
				found: type_name::<V>(),
			})
	}

	/// Writes the value at `path`, returning whether it changed.
	pub fn set<V: Value>(&mut self, path: &str, value: V) -> Result<bool, EntryError> {
		self.any_entry_mut(path)?.set_any(&AnyValue::new(value))
	}

	/// Relative paths of every entry, and of every group when asked.
	pub fn paths(&self, include_groups: bool) -> Vec<String> {
		let mut paths: Vec<String> = self.entries.keys().cloned().collect();
		for (name, child) in &self.children {
			if include_groups {
				paths.push(name.clone());
			}
			paths.extend(
				child
					.paths(include_groups)
					.into_iter()
					.map(|path| join(name, &path)),
			);
		}
		paths
	}

	pub fn entries(&self) -> impl Iterator<Item = &(dyn AnyEntry + 'static)> {
		self.entries.values().map(|entry| &**entry)
	}

	pub fn children(&self) -> impl Iterator<Item = &EntryHolder> {
		self.children.values()
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty.is_dirty()
	}

	/// Marking propagates up to the root; clearing cascades to every descendant.
	pub fn mark_dirty(&self, dirty: bool) {
		if dirty {
			self.dirty.mark();
			return;
		}
		self.dirty.clear();
		for entry in self.entries.values() {
			entry.mark_dirty(false);
		}
		for child in self.children.values() {
			child.mark_dirty(false);
		}
	}

	pub fn any_dirty_requires_restart(&self) -> bool {
		self.entries
			.values()
			.any(|entry| entry.is_dirty() && entry.meta().requires_restart)
			|| self.children.values().any(EntryHolder::any_dirty_requires_restart)
	}

	/// Restores every entry of the subtree to its default.
	pub fn reset(&mut self) -> Result<(), EntryError> {
		for entry in self.entries.values_mut() {
			entry.reset()?;
		}
		for child in self.children.values_mut() {
			child.reset()?;
		}
		Ok(())
	}

	/// Resets a single entry or a whole group.
	pub fn reset_path(&mut self, path: &str) -> Result<(), EntryError> {
		if self.has_child(path) {
			return self.child_mut(path)?.reset();
		}
		self.any_entry_mut(path)?.reset().map(|_| ())
	}

	/// Pulls values from bound backing state, children first.
	pub fn commit(&mut self) -> Result<(), HolderError> {
		let mut failures = Vec::new();
		self.commit_into(&mut failures);
		check(Phase::Commit, failures)
	}

	fn commit_into(&mut self, failures: &mut Vec<BackingFailure>) {
		for child in self.children.values_mut() {
			child.commit_into(failures);
		}
		for entry in self.entries.values_mut() {
			if let Err(failure) = entry.commit() {
				failures.push(failure);
			}
		}
	}

	/// Pushes values into bound backing state, children first, then runs
	/// the baker.
	pub fn bake(&self) -> Result<(), HolderError> {
		let mut failures = Vec::new();
		self.bake_into(&mut failures);
		check(Phase::Bake, failures)
	}

	fn bake_into(&self, failures: &mut Vec<BackingFailure>) {
		for child in self.children.values() {
			child.bake_into(failures);
		}
		for entry in self.entries.values() {
			if let Err(failure) = entry.bake() {
				failures.push(failure);
			}
		}
		if let Some(baker) = &self.baker {
			if let Err(cause) = baker(self) {
				failures.push(BackingFailure {
					path: if self.path.is_empty() {
						self.name.clone()
					} else {
						self.path.clone()
					},
					cause: cause.to_string(),
				});
			}
		}
	}

	/// Requests widgets for every entry of the subtree.
	pub fn present(&self, factory: &dyn WidgetFactory) -> Result<PresentationGroup, PresentationError> {
		let mut entries = Vec::with_capacity(self.entries.len());
		for entry in self.entries.values() {
			entries.extend(entry.present(factory)?);
		}
		let groups = self
			.children
			.values()
			.map(|child| child.present(factory))
			.collect::<Result<_, _>>()?;
		Ok(PresentationGroup {
			path: self.path.clone(),
			entries,
			groups,
		})
	}
}

impl fmt::Debug for EntryHolder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EntryHolder")
			.field("path", &self.path)
			.field("entries", &self.entries.keys().collect::<Vec<_>>())
			.field("children", &self.children)
			.field("dirty", &self.is_dirty())
			.finish()
	}
}

fn check(phase: Phase, failures: Vec<BackingFailure>) -> Result<(), HolderError> {
	if failures.is_empty() {
		return Ok(());
	}
	#[cfg(feature = "logging")]
	for failure in &failures {
		log::error!("{phase} failed for {failure}");
	}
	Err(HolderError::Backing { phase, failures })
}

impl SlotProvider for EntryHolder {
	fn entry_path(&self, name: &str) -> String {
		join(&self.path, name)
	}

	fn define_slot(
		&self,
		name: &str,
		default: Tag,
		validator: Validator,
	) -> Result<Box<dyn ValueSlot>, BuildError> {
		let handle = PersistedHandle::define(Arc::clone(&self.backend), self.entry_path(name), default, validator)?;
		Ok(Box::new(handle))
	}

	fn dirty_node(&self) -> Option<Arc<DirtyNode>> {
		Some(Arc::clone(&self.dirty))
	}
}
