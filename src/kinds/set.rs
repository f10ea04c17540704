/* src/kinds/set.rs */

use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexSet;

use super::list::{ELEMENT, Stamp, nested};
use super::map::duplicates;
use crate::entry::{BuildError, Entry, EntryBuilder, EntryKind, KindBuilder, ValueOf};
use crate::holder::DetachedHolder;
use crate::message::{DUPLICATE_ELEMENT, Message, SET_SIZE, size_error};
use crate::presentation::{Children, PresentationError, WidgetFactory};

/// Rule over one decoded element.
pub type ElementRule<V> = Arc<dyn Fn(&V) -> Option<Message> + Send + Sync>;

#[derive(Clone)]
pub struct SetBuilder<B: KindBuilder> {
	element: EntryBuilder<B>,
	min_size: usize,
	max_size: usize,
	element_error: Option<ElementRule<ValueOf<B>>>,
}

impl<B: KindBuilder> SetBuilder<B> {
	pub fn new(element: EntryBuilder<B>) -> Self {
		Self {
			element,
			min_size: 0,
			max_size: usize::MAX,
			element_error: None,
		}
	}
}

impl<B> KindBuilder for SetBuilder<B>
where
	B: KindBuilder,
	ValueOf<B>: Hash + Eq,
{
	type Kind = SetKind<B::Kind>;

	fn build_kind(&self, path: &str) -> Result<SetKind<B::Kind>, BuildError> {
		let (element, stamp) = nested(&self.element, path, ELEMENT)?;
		Ok(SetKind {
			path: path.to_string(),
			element,
			stamp,
			min_size: self.min_size,
			max_size: self.max_size,
			element_error: self.element_error.clone(),
		})
	}
}

/// A collection of distinct elements sharing one element entry.
///
/// Persisted as a list in insertion order. Presented as a list that may
/// transiently hold duplicates while being edited; decoding keeps the first
/// occurrence of each.
pub struct SetKind<E: EntryKind> {
	path: String,
	element: Entry<E>,
	stamp: Stamp<E>,
	min_size: usize,
	max_size: usize,
	element_error: Option<ElementRule<E::Value>>,
}

impl<E> SetKind<E>
where
	E: EntryKind,
	E::Value: Hash + Eq,
{
	pub fn element(&self) -> &Entry<E> {
		&self.element
	}

	pub fn min_size(&self) -> usize {
		self.min_size
	}

	pub fn max_size(&self) -> usize {
		self.max_size
	}

	/// Flags every row decoding to the same element as another row.
	pub fn duplicate_rows(&self, presented: &[E::Presented]) -> Vec<bool> {
		let elements: Vec<Option<E::Value>> = presented
			.iter()
			.map(|g| self.element.from_presentation(g))
			.collect();
		duplicates(&elements)
	}

	fn element_errors(&self, index: usize, g: &E::Presented) -> Vec<Message> {
		let mut errors = self.element.presentation_errors(g);
		if let (Some(rule), Some(v)) = (&self.element_error, self.element.from_presentation(g)) {
			errors.extend(rule(&v));
		}
		errors.into_iter().map(|message| message.at_index(index)).collect()
	}
}

impl<E> EntryKind for SetKind<E>
where
	E: EntryKind,
	E::Value: Hash + Eq,
{
	type Value = IndexSet<E::Value>;
	type Persisted = Vec<E::Persisted>;
	type Presented = Vec<E::Presented>;

	fn for_persisted(&self, value: &Self::Value) -> Vec<E::Persisted> {
		value.iter().map(|v| self.element.for_persisted(v)).collect()
	}

	fn from_persisted(&self, persisted: &Vec<E::Persisted>) -> Option<Self::Value> {
		persisted.iter().map(|c| self.element.from_persisted(c)).collect()
	}

	fn for_presentation(&self, value: &Self::Value) -> Vec<E::Presented> {
		value.iter().map(|v| self.element.for_presentation(v)).collect()
	}

	fn from_presentation(&self, presented: &Vec<E::Presented>) -> Option<Self::Value> {
		presented.iter().map(|g| self.element.from_presentation(g)).collect()
	}

	/// Size, then a single duplicate message at the first repeated row,
	/// then every element's errors tagged with its index.
	fn presentation_errors(&self, presented: &Vec<E::Presented>) -> Vec<Message> {
		let mut errors: Vec<Message> = size_error(&SET_SIZE, presented.len(), self.min_size, self.max_size)
			.into_iter()
			.collect();
		if let Some(index) = self.duplicate_rows(presented).iter().position(|duplicate| *duplicate) {
			errors.push(Message::new(DUPLICATE_ELEMENT).at_index(index));
		}
		for (index, g) in presented.iter().enumerate() {
			errors.extend(self.element_errors(index, g));
		}
		errors
	}

	fn present_children(
		&self,
		presented: &Vec<E::Presented>,
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		let holder = DetachedHolder::new(self.path.as_str());
		let mut children = Children::default();
		for (index, g) in presented.iter().enumerate() {
			let node = match (self.stamp)(&holder, &index.to_string()) {
				Ok(row) => row.present_value(g, false, factory)?,
				Err(_) => self.element.present_value(g, false, factory)?,
			};
			children.nodes.extend(node);
		}
		Ok(children)
	}
}

impl<B> EntryBuilder<SetBuilder<B>>
where
	B: KindBuilder,
	ValueOf<B>: Hash + Eq,
{
	pub fn element(&self) -> &EntryBuilder<B> {
		&self.kind().element
	}

	#[must_use]
	pub fn min_size(&self, min: usize) -> Self {
		self.with_kind(|kind| kind.min_size = min)
	}

	#[must_use]
	pub fn max_size(&self, max: usize) -> Self {
		self.with_kind(|kind| kind.max_size = max)
	}

	/// Adds a rule checked on every decoded element.
	#[must_use]
	pub fn element_error(&self, rule: impl Fn(&ValueOf<B>) -> Option<Message> + Send + Sync + 'static) -> Self {
		let rule: ElementRule<ValueOf<B>> = Arc::new(rule);
		self.with_kind(|kind| kind.element_error = Some(rule))
	}
}
