/* src/entry/any.rs */

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use super::{
	BackingFailure, BuildError, Entry, EntryBuilder, EntryError, EntryKind, EntryMeta, KindBuilder,
	SlotProvider, Value,
};
use crate::codec::Tag;
use crate::message::{MISSING_VALUE, Message};
use crate::presentation::{PresentationError, PresentationNode, WidgetFactory};

/// A type-erased value that still compares and prints.
#[derive(Clone)]
pub struct AnyValue {
	value: Arc<dyn Any + Send + Sync>,
	type_name: &'static str,
	eq: fn(&dyn Any, &dyn Any) -> bool,
	debug: fn(&dyn Any, &mut fmt::Formatter<'_>) -> fmt::Result,
}

fn eq_as<T: Value>(a: &dyn Any, b: &dyn Any) -> bool {
	match (a.downcast_ref::<T>(), b.downcast_ref::<T>()) {
		(Some(a), Some(b)) => a == b,
		_ => false,
	}
}

fn debug_as<T: Value>(value: &dyn Any, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match value.downcast_ref::<T>() {
		Some(value) => fmt::Debug::fmt(value, f),
		None => f.write_str("<?>"),
	}
}

impl AnyValue {
	pub fn new<T: Value>(value: T) -> Self {
		Self {
			value: Arc::new(value),
			type_name: type_name::<T>(),
			eq: eq_as::<T>,
			debug: debug_as::<T>,
		}
	}

	pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
		self.value.downcast_ref::<T>()
	}

	pub fn is<T: 'static>(&self) -> bool {
		self.value.is::<T>()
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}
}

impl PartialEq for AnyValue {
	fn eq(&self, other: &Self) -> bool {
		(self.eq)(&*self.value, &*other.value)
	}
}

impl fmt::Debug for AnyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		(self.debug)(&*self.value, f)
	}
}

/// Copies `value` into `slot` when the types match.
pub fn assign<T: Clone + 'static>(slot: &mut T, value: &AnyValue) -> bool {
	match value.downcast_ref::<T>() {
		Some(value) => {
			*slot = value.clone();
			true
		}
		None => false,
	}
}

/// Object-safe view of an [`Entry`] of any kind.
///
/// Holders store entries through this trait. Values cross it as
/// [`AnyValue`]; a value of the wrong type yields
/// [`EntryError::TypeMismatch`] or `None`, never a panic.
pub trait AnyEntry: Send + Sync {
	fn name(&self) -> &str;
	fn path(&self) -> &str;
	fn type_name(&self) -> &'static str;
	fn meta(&self) -> &EntryMeta;
	fn is_dirty(&self) -> bool;
	fn mark_dirty(&self, dirty: bool);
	fn is_nestable(&self) -> bool;

	fn value_any(&self) -> AnyValue;
	fn default_any(&self) -> AnyValue;
	fn set_any(&mut self, value: &AnyValue) -> Result<bool, EntryError>;
	fn reset(&mut self) -> Result<bool, EntryError>;

	/// Persisted tag of the current value.
	fn current_tag(&self) -> Tag;
	fn load_tag(&mut self, tag: &Tag) -> Result<bool, EntryError>;

	fn tag_of(&self, value: &AnyValue) -> Option<Tag>;
	fn value_of_tag(&self, tag: &Tag) -> Option<AnyValue>;
	fn presented_of(&self, value: &AnyValue) -> Option<AnyValue>;
	fn value_of_presented(&self, presented: &AnyValue) -> Option<AnyValue>;
	fn presented_errors(&self, presented: &AnyValue) -> Vec<Message>;

	fn commit(&mut self) -> Result<bool, BackingFailure>;
	fn bake(&self) -> Result<(), BackingFailure>;

	fn present(&self, factory: &dyn WidgetFactory) -> Result<Option<PresentationNode>, PresentationError>;
	fn present_presented(
		&self,
		presented: &AnyValue,
		inline: bool,
		factory: &dyn WidgetFactory,
	) -> Result<Option<PresentationNode>, PresentationError>;

	fn as_any(&self) -> &dyn Any;
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<K: EntryKind> AnyEntry for Entry<K> {
	fn name(&self) -> &str {
		Entry::name(self)
	}

	fn path(&self) -> &str {
		Entry::path(self)
	}

	fn type_name(&self) -> &'static str {
		Entry::type_name(self)
	}

	fn meta(&self) -> &EntryMeta {
		Entry::meta(self)
	}

	fn is_dirty(&self) -> bool {
		Entry::is_dirty(self)
	}

	fn mark_dirty(&self, dirty: bool) {
		Entry::mark_dirty(self, dirty)
	}

	fn is_nestable(&self) -> bool {
		Entry::is_nestable(self)
	}

	fn value_any(&self) -> AnyValue {
		AnyValue::new(self.get())
	}

	fn default_any(&self) -> AnyValue {
		AnyValue::new(self.default_value().clone())
	}

	fn set_any(&mut self, value: &AnyValue) -> Result<bool, EntryError> {
		match value.downcast_ref::<K::Value>() {
			Some(value) => self.set(value.clone()),
			None => Err(EntryError::TypeMismatch {
				path: self.path().to_string(),
				expected: Entry::type_name(self),
				found: value.type_name(),
			}),
		}
	}

	fn reset(&mut self) -> Result<bool, EntryError> {
		Entry::reset(self)
	}

	fn current_tag(&self) -> Tag {
		self.encode(&self.get())
	}

	fn load_tag(&mut self, tag: &Tag) -> Result<bool, EntryError> {
		match self.decode(tag) {
			Some(value) => self.set(value),
			None => Err(EntryError::Decode {
				path: self.path().to_string(),
			}),
		}
	}

	fn tag_of(&self, value: &AnyValue) -> Option<Tag> {
		value.downcast_ref::<K::Value>().map(|value| self.encode(value))
	}

	fn value_of_tag(&self, tag: &Tag) -> Option<AnyValue> {
		self.decode(tag).map(AnyValue::new)
	}

	fn presented_of(&self, value: &AnyValue) -> Option<AnyValue> {
		value
			.downcast_ref::<K::Value>()
			.map(|value| AnyValue::new(self.for_presentation(value)))
	}

	fn value_of_presented(&self, presented: &AnyValue) -> Option<AnyValue> {
		presented
			.downcast_ref::<K::Presented>()
			.and_then(|presented| self.from_presentation(presented))
			.map(AnyValue::new)
	}

	fn presented_errors(&self, presented: &AnyValue) -> Vec<Message> {
		match presented.downcast_ref::<K::Presented>() {
			Some(presented) => self.presentation_errors(presented),
			None => vec![Message::new(MISSING_VALUE)],
		}
	}

	fn commit(&mut self) -> Result<bool, BackingFailure> {
		Entry::commit(self)
	}

	fn bake(&self) -> Result<(), BackingFailure> {
		Entry::bake(self)
	}

	fn present(&self, factory: &dyn WidgetFactory) -> Result<Option<PresentationNode>, PresentationError> {
		Entry::present(self, factory)
	}

	fn present_presented(
		&self,
		presented: &AnyValue,
		inline: bool,
		factory: &dyn WidgetFactory,
	) -> Result<Option<PresentationNode>, PresentationError> {
		match presented.downcast_ref::<K::Presented>() {
			Some(presented) => self.present_value(presented, inline, factory),
			None => Ok(None),
		}
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// Object-safe view of an [`EntryBuilder`], used by record composites.
pub trait AnyBuilder: Send + Sync {
	fn build_any(&self, holder: &dyn SlotProvider, name: &str) -> Result<Box<dyn AnyEntry>, BuildError>;
}

impl<B: KindBuilder> AnyBuilder for EntryBuilder<B> {
	fn build_any(&self, holder: &dyn SlotProvider, name: &str) -> Result<Box<dyn AnyEntry>, BuildError> {
		Ok(Box::new(self.build(holder, name)?))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_any_value_compares_by_type_and_value() {
		assert_eq!(AnyValue::new(3_i32), AnyValue::new(3_i32));
		assert_ne!(AnyValue::new(3_i32), AnyValue::new(3_i64));
		assert_ne!(AnyValue::new("a".to_string()), AnyValue::new("b".to_string()));
		assert_eq!(format!("{:?}", AnyValue::new(vec![1, 2])), "[1, 2]");
	}

	#[test]
	fn test_assign() {
		let mut slot = 1_u8;
		assert!(assign(&mut slot, &AnyValue::new(5_u8)));
		assert_eq!(slot, 5);
		assert!(!assign(&mut slot, &AnyValue::new(5_i32)));
	}
}
