/* src/kinds/captioned.rs */

use std::collections::BTreeMap;

use super::list::nested;
use crate::codec::{Persist, Tag};
use crate::entry::{BuildError, Entry, EntryBuilder, EntryKind, KeyKind, KindBuilder};
use crate::message::Message;
use crate::presentation::{Children, PresentationError, WidgetFactory};

#[derive(Clone)]
pub struct CaptionedBuilder<CB: KindBuilder, LB: KindBuilder> {
	caption: EntryBuilder<CB>,
	collection: EntryBuilder<LB>,
}

impl<CB: KindBuilder, LB: KindBuilder> CaptionedBuilder<CB, LB> {
	pub fn new(caption: EntryBuilder<CB>, collection: EntryBuilder<LB>) -> Self {
		Self { caption, collection }
	}
}

impl<CB, LB> KindBuilder for CaptionedBuilder<CB, LB>
where
	CB: KindBuilder,
	CB::Kind: KeyKind,
	LB: KindBuilder,
{
	type Kind = CaptionedKind<CB::Kind, LB::Kind>;

	fn build_kind(&self, path: &str) -> Result<Self::Kind, BuildError> {
		let (caption, _) = nested(&self.caption, path, "caption")?;
		let (collection, _) = nested(&self.collection, path, "collection")?;
		Ok(CaptionedKind { caption, collection })
	}
}

/// A collection headed by an inline caption value.
///
/// Persisted as a compound with a single entry, keyed by the serialized
/// caption.
pub struct CaptionedKind<C: KeyKind, L: EntryKind> {
	caption: Entry<C>,
	collection: Entry<L>,
}

impl<C: KeyKind, L: EntryKind> CaptionedKind<C, L> {
	pub fn caption(&self) -> &Entry<C> {
		&self.caption
	}

	pub fn collection(&self) -> &Entry<L> {
		&self.collection
	}
}

impl<C: KeyKind, L: EntryKind> EntryKind for CaptionedKind<C, L> {
	type Value = (C::Value, L::Value);
	type Persisted = Tag;
	type Presented = (C::Presented, L::Presented);

	fn for_persisted(&self, value: &Self::Value) -> Tag {
		let key = self
			.caption
			.kind()
			.serialize_string_key(&self.caption.for_persisted(&value.0));
		let mut compound = BTreeMap::new();
		compound.insert(key, self.collection.for_persisted(&value.1).to_tag());
		Tag::Compound(compound)
	}

	fn from_persisted(&self, persisted: &Tag) -> Option<Self::Value> {
		let compound = persisted.as_compound()?;
		if compound.len() != 1 {
			return None;
		}
		let (key, tag) = compound.iter().next()?;
		let caption = self
			.caption
			.kind()
			.deserialize_string_key(key)
			.and_then(|c| self.caption.from_persisted(&c))?;
		let collection = <L::Persisted as Persist>::from_tag(tag)
			.and_then(|c| self.collection.from_persisted(&c))?;
		Some((caption, collection))
	}

	fn for_presentation(&self, value: &Self::Value) -> Self::Presented {
		(
			self.caption.for_presentation(&value.0),
			self.collection.for_presentation(&value.1),
		)
	}

	fn from_presentation(&self, presented: &Self::Presented) -> Option<Self::Value> {
		Some((
			self.caption.from_presentation(&presented.0)?,
			self.collection.from_presentation(&presented.1)?,
		))
	}

	fn presentation_errors(&self, presented: &Self::Presented) -> Vec<Message> {
		let mut errors = self.caption.presentation_errors(&presented.0);
		errors.extend(self.collection.presentation_errors(&presented.1));
		errors
	}

	fn present_children(
		&self,
		presented: &Self::Presented,
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		Ok(Children {
			caption: Some(self.caption.present_inline(&presented.0, factory)?),
			nodes: self
				.collection
				.present_value(&presented.1, false, factory)?
				.into_iter()
				.collect(),
		})
	}
}
