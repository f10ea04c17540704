/* src/kinds/tuple.rs */

use std::collections::BTreeMap;

use super::list::nested;
use crate::codec::{Persist, Tag};
use crate::entry::{BuildError, Entry, EntryBuilder, EntryKind, KeyKind, KindBuilder};
use crate::message::Message;
use crate::presentation::{Children, PresentationError, WidgetFactory};

/// Slot tags of a tuple, read from a compound or a list of the same arity.
fn slots<'a, const N: usize>(tag: &'a Tag, names: [&str; N]) -> Option<[Option<&'a Tag>; N]> {
	match tag {
		Tag::Compound(entries) => Some(names.map(|name| entries.get(name))),
		Tag::List(items) if items.len() == N => Some(std::array::from_fn(|index| items.get(index))),
		_ => None,
	}
}

fn decode_slot<E: EntryKind>(entry: &Entry<E>, tag: Option<&Tag>) -> Option<E::Value> {
	tag.and_then(<E::Persisted as Persist>::from_tag)
		.and_then(|persisted| entry.from_persisted(&persisted))
}

fn encode_slots<const N: usize>(names: [&str; N], tags: [Tag; N]) -> Tag {
	Tag::Compound(
		names
			.into_iter()
			.map(str::to_string)
			.zip(tags)
			.collect::<BTreeMap<_, _>>(),
	)
}

#[derive(Clone)]
pub struct PairBuilder<LB: KindBuilder, RB: KindBuilder> {
	left: EntryBuilder<LB>,
	right: EntryBuilder<RB>,
}

impl<LB: KindBuilder, RB: KindBuilder> PairBuilder<LB, RB> {
	pub fn new(left: EntryBuilder<LB>, right: EntryBuilder<RB>) -> Self {
		Self { left, right }
	}
}

impl<LB, RB> KindBuilder for PairBuilder<LB, RB>
where
	LB: KindBuilder,
	LB::Kind: KeyKind,
	RB: KindBuilder,
	RB::Kind: KeyKind,
{
	type Kind = PairKind<LB::Kind, RB::Kind>;

	fn build_kind(&self, path: &str) -> Result<Self::Kind, BuildError> {
		let (left, _) = nested(&self.left, path, "l")?;
		let (right, _) = nested(&self.right, path, "r")?;
		Ok(PairKind { left, right })
	}
}

/// Two heterogeneous slots, each with its own rules.
///
/// A slot that fails to decode falls back to its own default; only a tuple
/// whose every slot fails is undecodable.
pub struct PairKind<L: KeyKind, R: KeyKind> {
	left: Entry<L>,
	right: Entry<R>,
}

impl<L: KeyKind, R: KeyKind> PairKind<L, R> {
	pub fn left(&self) -> &Entry<L> {
		&self.left
	}

	pub fn right(&self) -> &Entry<R> {
		&self.right
	}
}

impl<L: KeyKind, R: KeyKind> EntryKind for PairKind<L, R> {
	type Value = (L::Value, R::Value);
	type Persisted = Tag;
	type Presented = (L::Presented, R::Presented);

	fn for_persisted(&self, value: &Self::Value) -> Tag {
		encode_slots(
			["l", "r"],
			[
				self.left.for_persisted(&value.0).to_tag(),
				self.right.for_persisted(&value.1).to_tag(),
			],
		)
	}

	fn from_persisted(&self, persisted: &Tag) -> Option<Self::Value> {
		let [l, r] = slots(persisted, ["l", "r"])?;
		let (l, r) = (decode_slot(&self.left, l), decode_slot(&self.right, r));
		if l.is_none() && r.is_none() {
			return None;
		}
		Some((
			l.unwrap_or_else(|| self.left.default_value().clone()),
			r.unwrap_or_else(|| self.right.default_value().clone()),
		))
	}

	fn for_presentation(&self, value: &Self::Value) -> Self::Presented {
		(
			self.left.for_presentation(&value.0),
			self.right.for_presentation(&value.1),
		)
	}

	fn from_presentation(&self, presented: &Self::Presented) -> Option<Self::Value> {
		Some((
			self.left.from_presentation_or_default(&presented.0),
			self.right.from_presentation_or_default(&presented.1),
		))
	}

	fn presentation_errors(&self, presented: &Self::Presented) -> Vec<Message> {
		let mut errors = self.left.presentation_errors(&presented.0);
		errors.extend(self.right.presentation_errors(&presented.1));
		errors
	}

	fn present_children(
		&self,
		presented: &Self::Presented,
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		Ok(Children {
			caption: None,
			nodes: vec![
				self.left.present_inline(&presented.0, factory)?,
				self.right.present_inline(&presented.1, factory)?,
			],
		})
	}
}

impl<L: KeyKind, R: KeyKind> KeyKind for PairKind<L, R> {
	fn serialize_string_key(&self, key: &Tag) -> String {
		key.to_text()
	}

	fn deserialize_string_key(&self, key: &str) -> Option<Tag> {
		Tag::from_text(key)
			.ok()
			.filter(|tag| self.from_persisted(tag).is_some())
	}
}

#[derive(Clone)]
pub struct TripleBuilder<LB: KindBuilder, MB: KindBuilder, RB: KindBuilder> {
	left: EntryBuilder<LB>,
	middle: EntryBuilder<MB>,
	right: EntryBuilder<RB>,
}

impl<LB: KindBuilder, MB: KindBuilder, RB: KindBuilder> TripleBuilder<LB, MB, RB> {
	pub fn new(left: EntryBuilder<LB>, middle: EntryBuilder<MB>, right: EntryBuilder<RB>) -> Self {
		Self { left, middle, right }
	}
}

impl<LB, MB, RB> KindBuilder for TripleBuilder<LB, MB, RB>
where
	LB: KindBuilder,
	LB::Kind: KeyKind,
	MB: KindBuilder,
	MB::Kind: KeyKind,
	RB: KindBuilder,
	RB::Kind: KeyKind,
{
	type Kind = TripleKind<LB::Kind, MB::Kind, RB::Kind>;

	fn build_kind(&self, path: &str) -> Result<Self::Kind, BuildError> {
		let (left, _) = nested(&self.left, path, "l")?;
		let (middle, _) = nested(&self.middle, path, "m")?;
		let (right, _) = nested(&self.right, path, "r")?;
		Ok(TripleKind { left, middle, right })
	}
}

/// Three heterogeneous slots, decoded like [`PairKind`].
pub struct TripleKind<L: KeyKind, M: KeyKind, R: KeyKind> {
	left: Entry<L>,
	middle: Entry<M>,
	right: Entry<R>,
}

impl<L: KeyKind, M: KeyKind, R: KeyKind> TripleKind<L, M, R> {
	pub fn left(&self) -> &Entry<L> {
		&self.left
	}

	pub fn middle(&self) -> &Entry<M> {
		&self.middle
	}

	pub fn right(&self) -> &Entry<R> {
		&self.right
	}
}

impl<L: KeyKind, M: KeyKind, R: KeyKind> EntryKind for TripleKind<L, M, R> {
	type Value = (L::Value, M::Value, R::Value);
	type Persisted = Tag;
	type Presented = (L::Presented, M::Presented, R::Presented);

	fn for_persisted(&self, value: &Self::Value) -> Tag {
		encode_slots(
			["l", "m", "r"],
			[
				self.left.for_persisted(&value.0).to_tag(),
				self.middle.for_persisted(&value.1).to_tag(),
				self.right.for_persisted(&value.2).to_tag(),
			],
		)
	}

	fn from_persisted(&self, persisted: &Tag) -> Option<Self::Value> {
		let [l, m, r] = slots(persisted, ["l", "m", "r"])?;
		let (l, m, r) = (
			decode_slot(&self.left, l),
			decode_slot(&self.middle, m),
			decode_slot(&self.right, r),
		);
		if l.is_none() && m.is_none() && r.is_none() {
			return None;
		}
		Some((
			l.unwrap_or_else(|| self.left.default_value().clone()),
			m.unwrap_or_else(|| self.middle.default_value().clone()),
			r.unwrap_or_else(|| self.right.default_value().clone()),
		))
	}

	fn for_presentation(&self, value: &Self::Value) -> Self::Presented {
		(
			self.left.for_presentation(&value.0),
			self.middle.for_presentation(&value.1),
			self.right.for_presentation(&value.2),
		)
	}

	fn from_presentation(&self, presented: &Self::Presented) -> Option<Self::Value> {
		Some((
			self.left.from_presentation_or_default(&presented.0),
			self.middle.from_presentation_or_default(&presented.1),
			self.right.from_presentation_or_default(&presented.2),
		))
	}

	fn presentation_errors(&self, presented: &Self::Presented) -> Vec<Message> {
		let mut errors = self.left.presentation_errors(&presented.0);
		errors.extend(self.middle.presentation_errors(&presented.1));
		errors.extend(self.right.presentation_errors(&presented.2));
		errors
	}

	fn present_children(
		&self,
		presented: &Self::Presented,
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		Ok(Children {
			caption: None,
			nodes: vec![
				self.left.present_inline(&presented.0, factory)?,
				self.middle.present_inline(&presented.1, factory)?,
				self.right.present_inline(&presented.2, factory)?,
			],
		})
	}
}

impl<L: KeyKind, M: KeyKind, R: KeyKind> KeyKind for TripleKind<L, M, R> {
	fn serialize_string_key(&self, key: &Tag) -> String {
		key.to_text()
	}

	fn deserialize_string_key(&self, key: &str) -> Option<Tag> {
		Tag::from_text(key)
			.ok()
			.filter(|tag| self.from_persisted(tag).is_some())
	}
}
