/* src/entry/builder.rs */

use std::sync::Arc;

use super::base::{Binding, EntryDef};
use super::rules::{Rules, chain};
use super::{
	Backing, BuildError, DirtyNode, Entry, EntryMeta, KindBuilder, Persistence, PresentedOf,
	SlotProvider, ValueOf,
};
use crate::backend::Validator;
use crate::codec::Tag;
use crate::message::Message;

/// Path separator between holder and entry names.
pub const SEPARATOR: char = '.';

pub(crate) fn validate_name(name: &str) -> Result<(), BuildError> {
	if name.is_empty() || name.contains(SEPARATOR) {
		return Err(BuildError::InvalidName {
			name: name.to_string(),
		});
	}
	Ok(())
}

/// Immutable construction parameters of an entry.
///
/// Every configuration method returns a new builder and leaves `self`
/// untouched, so one builder can seed any number of independent entries.
pub struct EntryBuilder<B: KindBuilder> {
	pub(crate) kind: B,
	pub(crate) default: ValueOf<B>,
	pub(crate) meta: EntryMeta,
	pub(crate) rules: Rules<ValueOf<B>, PresentedOf<B>>,
	pub(crate) backing: Option<Arc<dyn Backing<ValueOf<B>>>>,
}

impl<B: KindBuilder> Clone for EntryBuilder<B> {
	fn clone(&self) -> Self {
		Self {
			kind: self.kind.clone(),
			default: self.default.clone(),
			meta: self.meta.clone(),
			rules: self.rules.clone(),
			backing: self.backing.clone(),
		}
	}
}

impl<B: KindBuilder> EntryBuilder<B> {
	pub fn new(kind: B, default: ValueOf<B>) -> Self {
		Self {
			kind,
			default,
			meta: EntryMeta::default(),
			rules: Rules::default(),
			backing: None,
		}
	}

	/// Copies the builder and applies `change` to the copy.
	pub(crate) fn with(&self, change: impl FnOnce(&mut Self)) -> Self {
		let mut copy = self.clone();
		change(&mut copy);
		copy
	}

	pub(crate) fn with_kind(&self, change: impl FnOnce(&mut B)) -> Self {
		self.with(|copy| change(&mut copy.kind))
	}

	pub fn kind(&self) -> &B {
		&self.kind
	}

	pub fn default_value(&self) -> &ValueOf<B> {
		&self.default
	}

	pub fn meta(&self) -> &EntryMeta {
		&self.meta
	}

	#[must_use]
	pub fn with_default(&self, value: ValueOf<B>) -> Self {
		self.with(|copy| copy.default = value)
	}

	/// Adds a value rule, consulted after any rule set before it.
	#[must_use]
	pub fn error(
		&self,
		rule: impl Fn(&ValueOf<B>) -> Option<Message> + Send + Sync + 'static,
	) -> Self {
		self.with(|copy| copy.rules.error = Some(chain(copy.rules.error.take(), Arc::new(rule))))
	}

	/// Adds a rule on the presentation value, consulted before value rules.
	#[must_use]
	pub fn presentation_error(
		&self,
		rule: impl Fn(&PresentedOf<B>) -> Option<Message> + Send + Sync + 'static,
	) -> Self {
		self.with(|copy| {
			copy.rules.presentation_error = Some(chain(copy.rules.presentation_error.take(), Arc::new(rule)))
		})
	}

	#[must_use]
	pub fn without_error(&self) -> Self {
		self.with(|copy| {
			copy.rules.error = None;
			copy.rules.presentation_error = None;
		})
	}

	#[must_use]
	pub fn tooltip(&self, rule: impl Fn(&ValueOf<B>) -> Vec<Message> + Send + Sync + 'static) -> Self {
		self.with(|copy| copy.rules.tooltip = Some(Arc::new(rule)))
	}

	#[must_use]
	pub fn translation(&self, key: impl Into<String>) -> Self {
		let key = key.into();
		self.with(|copy| copy.meta.translation = Some(key))
	}

	#[must_use]
	pub fn tooltip_key(&self, key: impl Into<String>) -> Self {
		let key = key.into();
		self.with(|copy| copy.meta.tooltip = Some(key))
	}

	#[must_use]
	pub fn restart(&self) -> Self {
		self.with(|copy| copy.meta.requires_restart = true)
	}

	/// Keeps the value in the entry only, never in the backend.
	#[must_use]
	pub fn temp(&self) -> Self {
		self.with(|copy| copy.meta.persistence = Persistence::Temporary)
	}

	/// Temporary, and presentation edits are discarded.
	#[must_use]
	pub fn ignored(&self) -> Self {
		self.with(|copy| copy.meta.persistence = Persistence::Ignored)
	}

	#[must_use]
	pub fn persistent(&self) -> Self {
		self.with(|copy| copy.meta.persistence = Persistence::Persistent)
	}

	/// Binds external state used by `commit` and `bake`.
	#[must_use]
	pub fn backing(&self, backing: impl Backing<ValueOf<B>> + 'static) -> Self {
		let backing: Arc<dyn Backing<ValueOf<B>>> = Arc::new(backing);
		self.with(|copy| copy.backing = Some(backing))
	}

	/// Builds an entry called `name` on `holder`.
	///
	/// Runs the kind's build hook, then copies the builder flags onto the
	/// entry and defines its persisted cell.
	pub fn build(&self, holder: &dyn SlotProvider, name: &str) -> Result<Entry<B::Kind>, BuildError> {
		self.build_with(holder, name, true)
	}

	/// Builds without checking the default, for slots whose default is
	/// never stored as a value.
	pub(crate) fn build_unchecked(
		&self,
		holder: &dyn SlotProvider,
		name: &str,
	) -> Result<Entry<B::Kind>, BuildError> {
		self.build_with(holder, name, false)
	}

	fn build_with(
		&self,
		holder: &dyn SlotProvider,
		name: &str,
		check_default: bool,
	) -> Result<Entry<B::Kind>, BuildError> {
		validate_name(name)?;
		let path = holder.entry_path(name);
		let kind = self.kind.build_kind(&path)?;
		let def = Arc::new(EntryDef {
			name: name.to_string(),
			path,
			kind,
			default: self.default.clone(),
			meta: self.meta.clone(),
			rules: self.rules.clone(),
		});

		let errors = if check_default { def.errors(&def.default) } else { Vec::new() };
		if !errors.is_empty() {
			return Err(BuildError::InvalidDefault {
				path: def.path.clone(),
				errors,
			});
		}

		let binding = if def.meta.persistence.is_persistent() {
			let checked = Arc::clone(&def);
			let validator: Validator = Arc::new(move |tag: &Tag| checked.accepts(tag));
			Binding::Slot(holder.define_slot(name, def.encode(&def.default), validator)?)
		} else {
			Binding::Shadow(def.default.clone())
		};

		Ok(Entry {
			def,
			binding,
			backing: self.backing.clone(),
			dirty: DirtyNode::child(holder.dirty_node()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_validate_name() {
		assert!(validate_name("ok_name").is_ok());
		assert!(validate_name("").is_err());
		assert!(matches!(
			validate_name("a.b"),
			Err(BuildError::InvalidName { .. })
		));
	}
}
