/* src/kinds/mod.rs */

//! Concrete entry kinds and the factory functions that start their builders.
//!
//! Scalars are leaves. Composites hold nested entries built from the
//! builders passed in here; those entries must be persistent.

mod bean;
mod captioned;
mod list;
mod map;
mod scalar;
mod set;
mod tuple;

pub use bean::{Bean, BeanBuilder, BeanKind, BeanView};
pub use captioned::{CaptionedBuilder, CaptionedKind};
pub use list::{ListBuilder, ListKind, Stamp};
pub use map::{MAX_INDEX, MapBuilder, MapKind, PairListBuilder, PairListKind, RowRule};
pub use scalar::{BoolKind, Number, NumberKind, StringKind};
pub use set::{ElementRule, SetBuilder, SetKind};
pub use tuple::{PairBuilder, PairKind, TripleBuilder, TripleKind};

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};

use crate::entry::{EntryBuilder, KeyKind, KindBuilder, ValueOf};

pub fn boolean(default: bool) -> EntryBuilder<BoolKind> {
	EntryBuilder::new(BoolKind, default)
}

pub fn string(default: impl Into<String>) -> EntryBuilder<StringKind> {
	EntryBuilder::new(StringKind::default(), default.into())
}

pub fn number<T: Number>(default: T) -> EntryBuilder<NumberKind<T>> {
	EntryBuilder::new(NumberKind::default(), default)
}

pub fn int(default: i32) -> EntryBuilder<NumberKind<i32>> {
	number(default)
}

pub fn long(default: i64) -> EntryBuilder<NumberKind<i64>> {
	number(default)
}

pub fn float(default: f32) -> EntryBuilder<NumberKind<f32>> {
	number(default)
}

pub fn double(default: f64) -> EntryBuilder<NumberKind<f64>> {
	number(default)
}

/// A list whose every element is built from `element`.
pub fn list<B: KindBuilder>(element: EntryBuilder<B>, default: Vec<ValueOf<B>>) -> EntryBuilder<ListBuilder<B>> {
	EntryBuilder::new(ListBuilder::new(element), default)
}

/// A set of distinct elements, each built from `element`.
pub fn set<B>(element: EntryBuilder<B>, default: IndexSet<ValueOf<B>>) -> EntryBuilder<SetBuilder<B>>
where
	B: KindBuilder,
	ValueOf<B>: Hash + Eq,
{
	EntryBuilder::new(SetBuilder::new(element), default)
}

/// A map from `key` entries to `value` entries. The default is copied.
pub fn map<KB, VB>(
	key: EntryBuilder<KB>,
	value: EntryBuilder<VB>,
	default: IndexMap<ValueOf<KB>, ValueOf<VB>>,
) -> EntryBuilder<MapBuilder<KB, VB>>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	ValueOf<KB>: Hash + Eq,
	VB: KindBuilder,
{
	EntryBuilder::new(MapBuilder::new(key, value), default)
}

pub fn pair_list<KB, VB>(
	key: EntryBuilder<KB>,
	value: EntryBuilder<VB>,
	default: Vec<(ValueOf<KB>, ValueOf<VB>)>,
) -> EntryBuilder<PairListBuilder<KB, VB>>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	VB: KindBuilder,
{
	EntryBuilder::new(PairListBuilder::new(key, value), default)
}

/// A pair of slots. Each slot's own default is the fallback when it fails
/// to decode.
pub fn pair<LB, RB>(left: EntryBuilder<LB>, right: EntryBuilder<RB>) -> EntryBuilder<PairBuilder<LB, RB>>
where
	LB: KindBuilder,
	LB::Kind: KeyKind,
	RB: KindBuilder,
	RB::Kind: KeyKind,
{
	let default = (left.default_value().clone(), right.default_value().clone());
	EntryBuilder::new(PairBuilder::new(left, right), default)
}

pub fn triple<LB, MB, RB>(
	left: EntryBuilder<LB>,
	middle: EntryBuilder<MB>,
	right: EntryBuilder<RB>,
) -> EntryBuilder<TripleBuilder<LB, MB, RB>>
where
	LB: KindBuilder,
	LB::Kind: KeyKind,
	MB: KindBuilder,
	MB::Kind: KeyKind,
	RB: KindBuilder,
	RB::Kind: KeyKind,
{
	let default = (
		left.default_value().clone(),
		middle.default_value().clone(),
		right.default_value().clone(),
	);
	EntryBuilder::new(TripleBuilder::new(left, middle, right), default)
}

/// A record edited through one entry per property; add them with
/// [`EntryBuilder::add`].
pub fn bean<B: Bean>(default: B) -> EntryBuilder<BeanBuilder<B>> {
	EntryBuilder::new(BeanBuilder::new(default.clone()), default)
}

pub fn captioned<CB, LB>(
	caption: EntryBuilder<CB>,
	collection: EntryBuilder<LB>,
) -> EntryBuilder<CaptionedBuilder<CB, LB>>
where
	CB: KindBuilder,
	CB::Kind: KeyKind,
	LB: KindBuilder,
{
	let default = (caption.default_value().clone(), collection.default_value().clone());
	EntryBuilder::new(CaptionedBuilder::new(caption, collection), default)
}
