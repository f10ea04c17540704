/* src/entry/base.rs */

use std::fmt;
use std::sync::Arc;

use super::rules::Rules;
use super::{Backing, BackingFailure, BuildError, DirtyNode, EntryError, EntryKind, EntryMeta};
use crate::backend::{Validator, ValueSlot};
use crate::codec::{Persist, Tag};
use crate::message::{MISSING_VALUE, Message};

/// Anything entries can be built against: a tree holder or a detached one.
pub trait SlotProvider {
	/// Full path of a child entry called `name`.
	fn entry_path(&self, name: &str) -> String;

	/// Declares the persisted cell of entry `name`.
	fn define_slot(
		&self,
		name: &str,
		default: Tag,
		validator: Validator,
	) -> Result<Box<dyn ValueSlot>, BuildError>;

	/// Flag that entries built here propagate their dirty state to.
	fn dirty_node(&self) -> Option<Arc<DirtyNode>>;
}

/// Immutable part of an entry, shared with the backend validator.
pub(crate) struct EntryDef<K: EntryKind> {
	pub(crate) name: String,
	pub(crate) path: String,
	pub(crate) kind: K,
	pub(crate) default: K::Value,
	pub(crate) meta: EntryMeta,
	pub(crate) rules: Rules<K::Value, K::Presented>,
}

impl<K: EntryKind> EntryDef<K> {
	pub(crate) fn presentation_errors(&self, presented: &K::Presented) -> Vec<Message> {
		let mut errors = self.kind.presentation_errors(presented);
		errors.extend(self.rules.presentation_error(presented));
		match self.kind.from_presentation(presented) {
			Some(value) => errors.extend(self.rules.error(&value)),
			None if errors.is_empty() => errors.push(Message::new(MISSING_VALUE)),
			None => {}
		}
		errors
	}

	pub(crate) fn errors(&self, value: &K::Value) -> Vec<Message> {
		self.presentation_errors(&self.kind.for_presentation(value))
	}

	pub(crate) fn encode(&self, value: &K::Value) -> Tag {
		self.kind.for_persisted(value).to_tag()
	}

	pub(crate) fn decode(&self, tag: &Tag) -> Option<K::Value> {
		K::Persisted::from_tag(tag).and_then(|persisted| self.kind.from_persisted(&persisted))
	}

	/// Equal as values and in persisted form. Insertion order of linked
	/// maps only shows in the latter.
	pub(crate) fn same(&self, current: &K::Value, value: &K::Value) -> bool {
		current == value && self.encode(current) == self.encode(value)
	}

	/// Backend validator: the tag decodes into a value without errors.
	pub(crate) fn accepts(&self, tag: &Tag) -> bool {
		self.decode(tag).is_some_and(|value| self.errors(&value).is_empty())
	}
}

pub(crate) enum Binding<V> {
	Slot(Box<dyn ValueSlot>),
	Shadow(V),
}

/// A named configuration entry of kind `K`.
///
/// Created by [`EntryBuilder::build`](super::EntryBuilder::build). The name
/// and path are fixed from then on.
pub struct Entry<K: EntryKind> {
	pub(crate) def: Arc<EntryDef<K>>,
	pub(crate) binding: Binding<K::Value>,
	pub(crate) backing: Option<Arc<dyn Backing<K::Value>>>,
	pub(crate) dirty: Arc<DirtyNode>,
}

impl<K: EntryKind> Entry<K> {
	pub fn name(&self) -> &str {
		&self.def.name
	}

	pub fn path(&self) -> &str {
		&self.def.path
	}

	pub fn kind(&self) -> &K {
		&self.def.kind
	}

	pub fn meta(&self) -> &EntryMeta {
		&self.def.meta
	}

	pub fn type_name(&self) -> &'static str {
		self.def.kind.type_name()
	}

	pub fn default_value(&self) -> &K::Value {
		&self.def.default
	}

	pub fn for_persisted(&self, value: &K::Value) -> K::Persisted {
		self.def.kind.for_persisted(value)
	}

	pub fn from_persisted(&self, persisted: &K::Persisted) -> Option<K::Value> {
		self.def.kind.from_persisted(persisted)
	}

	pub fn from_persisted_or_default(&self, persisted: &K::Persisted) -> K::Value {
		self.from_persisted(persisted)
			.unwrap_or_else(|| self.def.default.clone())
	}

	pub fn for_presentation(&self, value: &K::Value) -> K::Presented {
		self.def.kind.for_presentation(value)
	}

	pub fn from_presentation(&self, presented: &K::Presented) -> Option<K::Value> {
		self.def.kind.from_presentation(presented)
	}

	pub fn from_presentation_or_default(&self, presented: &K::Presented) -> K::Value {
		self.from_presentation(presented)
			.unwrap_or_else(|| self.def.default.clone())
	}

	/// First error of `value`.
	pub fn error(&self, value: &K::Value) -> Option<Message> {
		self.errors(value).into_iter().next()
	}

	pub fn errors(&self, value: &K::Value) -> Vec<Message> {
		self.def.errors(value)
	}

	/// First error of a presentation value.
	pub fn presentation_error(&self, presented: &K::Presented) -> Option<Message> {
		self.presentation_errors(presented).into_iter().next()
	}

	/// Every error of a presentation value.
	///
	/// Structural and presentation-rule errors come first. Value rules are
	/// only consulted when the presentation value decodes.
	pub fn presentation_errors(&self, presented: &K::Presented) -> Vec<Message> {
		self.def.presentation_errors(presented)
	}

	pub fn is_valid(&self, value: &K::Value) -> bool {
		self.errors(value).is_empty()
	}

	pub fn tooltip(&self, value: &K::Value) -> Vec<Message> {
		self.def.rules.tooltip(value)
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty.is_dirty()
	}

	pub fn mark_dirty(&self, dirty: bool) {
		if dirty {
			self.dirty.mark();
		} else {
			self.dirty.clear();
		}
	}

	/// Persistent and of a kind that may live inside a composite.
	pub fn is_nestable(&self) -> bool {
		self.def.meta.persistence.is_persistent() && self.def.kind.can_be_nested()
	}

	/// Current value. Undecodable persisted data reads as the default.
	pub fn get(&self) -> K::Value {
		match &self.binding {
			Binding::Shadow(value) => value.clone(),
			Binding::Slot(slot) => match slot.read().and_then(|tag| self.def.decode(&tag)) {
				Some(value) => value,
				None => {
					#[cfg(feature = "logging")]
					log::debug!("unreadable value for {}, using default", self.def.path);
					self.def.default.clone()
				}
			},
		}
	}

	/// Stores `value`, returning whether it changed.
	///
	/// A change marks the entry and every holder above it dirty.
	pub fn set(&mut self, value: K::Value) -> Result<bool, EntryError> {
		let errors = self.def.errors(&value);
		if !errors.is_empty() {
			return Err(EntryError::InvalidValue {
				path: self.def.path.clone(),
				errors,
			});
		}
		if self.def.same(&self.get(), &value) {
			return Ok(false);
		}
		match &mut self.binding {
			Binding::Shadow(current) => *current = value,
			Binding::Slot(slot) => slot.write(self.def.encode(&value))?,
		}
		self.dirty.mark();
		Ok(true)
	}

	/// Applies an edited presentation value. Ignored entries discard it.
	pub fn set_presented(&mut self, presented: &K::Presented) -> Result<bool, EntryError> {
		if self.def.meta.persistence.is_ignored() {
			return Ok(false);
		}
		match self.from_presentation(presented) {
			Some(value) => self.set(value),
			None => Err(EntryError::InvalidValue {
				path: self.def.path.clone(),
				errors: self.presentation_errors(presented),
			}),
		}
	}

	pub fn reset(&mut self) -> Result<bool, EntryError> {
		self.set(self.def.default.clone())
	}

	pub(crate) fn decode(&self, tag: &Tag) -> Option<K::Value> {
		self.def.decode(tag)
	}

	pub(crate) fn encode(&self, value: &K::Value) -> Tag {
		self.def.encode(value)
	}

	/// Pulls the value from bound backing state, if any.
	pub fn commit(&mut self) -> Result<bool, BackingFailure> {
		let Some(backing) = self.backing.clone() else {
			return Ok(false);
		};
		let value = backing.load().map_err(|e| self.failure(e))?;
		self.set(value).map_err(|e| self.failure(e))
	}

	/// Pushes the current value into bound backing state, if any.
	pub fn bake(&self) -> Result<(), BackingFailure> {
		match &self.backing {
			Some(backing) => backing.store(&self.get()).map_err(|e| self.failure(e)),
			None => Ok(()),
		}
	}

	fn failure(&self, cause: impl ToString) -> BackingFailure {
		BackingFailure {
			path: self.def.path.clone(),
			cause: cause.to_string(),
		}
	}
}

impl<K: EntryKind> fmt::Debug for Entry<K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Entry")
			.field("path", &self.def.path)
			.field("value", &self.get())
			.field("dirty", &self.is_dirty())
			.finish()
	}
}
