/* src/kinds/list.rs */

use std::sync::Arc;

use crate::entry::{BuildError, Entry, EntryBuilder, EntryKind, KindBuilder, SlotProvider};
use crate::holder::DetachedHolder;
use crate::message::{LIST_SIZE, Message, size_error};
use crate::presentation::{Children, PresentationError, WidgetFactory};

/// Name of the shared element entry inside its detached holder.
pub(crate) const ELEMENT: &str = "*";

/// Builds one more entry from a composite's slot builder.
pub type Stamp<E> = Arc<dyn Fn(&dyn SlotProvider, &str) -> Result<Entry<E>, BuildError> + Send + Sync>;

/// Builds the shared element entry of a composite and a stamp for its rows.
pub(crate) fn nested<B: KindBuilder>(
	builder: &EntryBuilder<B>,
	owner: &str,
	name: &str,
) -> Result<(Entry<B::Kind>, Stamp<B::Kind>), BuildError> {
	let entry = builder.build(&DetachedHolder::new(owner), name)?;
	let builder = builder.clone();
	let stamp: Stamp<B::Kind> =
		Arc::new(move |holder: &dyn SlotProvider, name: &str| builder.build(holder, name));
	nestable(entry, stamp)
}

/// Like [`nested`], for key slots. Their default is never stored, so it
/// is not checked.
pub(crate) fn nested_key<B: KindBuilder>(
	builder: &EntryBuilder<B>,
	owner: &str,
	name: &str,
) -> Result<(Entry<B::Kind>, Stamp<B::Kind>), BuildError> {
	let entry = builder.build_unchecked(&DetachedHolder::new(owner), name)?;
	let builder = builder.clone();
	let stamp: Stamp<B::Kind> =
		Arc::new(move |holder: &dyn SlotProvider, name: &str| builder.build_unchecked(holder, name));
	nestable(entry, stamp)
}

fn nestable<E: EntryKind>(entry: Entry<E>, stamp: Stamp<E>) -> Result<(Entry<E>, Stamp<E>), BuildError> {
	if !entry.is_nestable() {
		return Err(BuildError::NotNestable {
			path: entry.path().to_string(),
		});
	}
	Ok((entry, stamp))
}

#[derive(Clone)]
pub struct ListBuilder<B: KindBuilder> {
	element: EntryBuilder<B>,
	min_size: usize,
	max_size: usize,
}

impl<B: KindBuilder> ListBuilder<B> {
	pub fn new(element: EntryBuilder<B>) -> Self {
		Self {
			element,
			min_size: 0,
			max_size: usize::MAX,
		}
	}
}

impl<B: KindBuilder> KindBuilder for ListBuilder<B> {
	type Kind = ListKind<B::Kind>;

	fn build_kind(&self, path: &str) -> Result<ListKind<B::Kind>, BuildError> {
		let (element, stamp) = nested(&self.element, path, ELEMENT)?;
		Ok(ListKind {
			path: path.to_string(),
			element,
			stamp,
			min_size: self.min_size,
			max_size: self.max_size,
		})
	}
}

/// An ordered sequence sharing one element entry.
///
/// The element entry lives on a detached holder. Per-row entries are
/// stamped from the same builder on demand.
pub struct ListKind<E: EntryKind> {
	path: String,
	element: Entry<E>,
	stamp: Stamp<E>,
	min_size: usize,
	max_size: usize,
}

impl<E: EntryKind> ListKind<E> {
	pub fn element(&self) -> &Entry<E> {
		&self.element
	}

	pub fn min_size(&self) -> usize {
		self.min_size
	}

	pub fn max_size(&self) -> usize {
		self.max_size
	}

	fn row(&self, holder: &DetachedHolder, index: usize) -> Result<Entry<E>, BuildError> {
		(self.stamp)(holder, &index.to_string())
	}
}

impl<E: EntryKind> EntryKind for ListKind<E> {
	type Value = Vec<E::Value>;
	type Persisted = Vec<E::Persisted>;
	type Presented = Vec<E::Presented>;

	fn for_persisted(&self, value: &Vec<E::Value>) -> Vec<E::Persisted> {
		value.iter().map(|v| self.element.for_persisted(v)).collect()
	}

	fn from_persisted(&self, persisted: &Vec<E::Persisted>) -> Option<Vec<E::Value>> {
		persisted.iter().map(|c| self.element.from_persisted(c)).collect()
	}

	fn for_presentation(&self, value: &Vec<E::Value>) -> Vec<E::Presented> {
		value.iter().map(|v| self.element.for_presentation(v)).collect()
	}

	fn from_presentation(&self, presented: &Vec<E::Presented>) -> Option<Vec<E::Value>> {
		presented.iter().map(|g| self.element.from_presentation(g)).collect()
	}

	/// The size error comes first, then every element's errors tagged
	/// with its index.
	fn presentation_errors(&self, presented: &Vec<E::Presented>) -> Vec<Message> {
		let mut errors: Vec<Message> = size_error(&LIST_SIZE, presented.len(), self.min_size, self.max_size)
			.into_iter()
			.collect();
		for (index, g) in presented.iter().enumerate() {
			errors.extend(
				self.element
					.presentation_errors(g)
					.into_iter()
					.map(|message| message.at_index(index)),
			);
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
			let node = match self.row(&holder, index) {
				Ok(row) => row.present_value(g, false, factory)?,
				Err(_) => self.element.present_value(g, false, factory)?,
			};
			children.nodes.extend(node);
		}
		Ok(children)
	}
}

impl<E: EntryKind> Entry<ListKind<E>> {
	/// One detached entry per element, holding that element's value.
	pub fn rows(&self) -> crate::Result<Vec<Entry<E>>> {
		let kind = self.kind();
		let holder = DetachedHolder::new(self.path());
		let mut rows = Vec::new();
		for (index, value) in self.get().into_iter().enumerate() {
			let mut row = kind.row(&holder, index)?;
			row.set(value)?;
			row.mark_dirty(false);
			rows.push(row);
		}
		Ok(rows)
	}
}

impl<B: KindBuilder> EntryBuilder<ListBuilder<B>> {
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

	#[must_use]
	pub fn size(&self, min: usize, max: usize) -> Self {
		self.with_kind(|kind| {
			kind.min_size = min;
			kind.max_size = max;
		})
	}
}
