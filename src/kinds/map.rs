/* src/kinds/map.rs */

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexMap;

use super::list::{Stamp, nested, nested_key};
use crate::codec::{Persist, Tag};
use crate::entry::{BuildError, Entry, EntryBuilder, EntryKind, KeyKind, KindBuilder, ValueOf};
use crate::holder::DetachedHolder;
use crate::message::{DUPLICATE_KEY, LIST_SIZE, Message, size_error};
use crate::presentation::{Children, PresentationError, WidgetFactory};

/// Index given to linked keys that carry no `<index>:` prefix.
pub const MAX_INDEX: usize = usize::MAX;

/// Rule over one decoded key/value row.
pub type RowRule<K, V> = Arc<dyn Fn(&K, &V) -> Option<Message> + Send + Sync>;

/// Splits a linked key into its insertion index and the key proper.
pub(crate) fn split_index(key: &str) -> (usize, &str) {
	key.split_once(':')
		.filter(|(index, _)| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
		.and_then(|(index, rest)| index.parse::<usize>().ok().map(|index| (index, rest)))
		.unwrap_or((MAX_INDEX, key))
}

/// Flags every decoded item equal to another one. Undecoded items are
/// never duplicates.
pub(crate) fn duplicates<T: Hash + Eq>(items: &[Option<T>]) -> Vec<bool> {
	let mut counts: HashMap<&T, usize> = HashMap::new();
	for item in items.iter().flatten() {
		*counts.entry(item).or_default() += 1;
	}
	items
		.iter()
		.map(|item| {
			item.as_ref()
				.and_then(|item| counts.get(item))
				.is_some_and(|count| *count > 1)
		})
		.collect()
}

#[derive(Clone)]
struct RowsBuilder<KB: KindBuilder, VB: KindBuilder> {
	key: EntryBuilder<KB>,
	value: EntryBuilder<VB>,
	min_size: usize,
	max_size: usize,
	entry_error: Option<RowRule<ValueOf<KB>, ValueOf<VB>>>,
}

impl<KB, VB> RowsBuilder<KB, VB>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	VB: KindBuilder,
{
	fn new(key: EntryBuilder<KB>, value: EntryBuilder<VB>) -> Self {
		Self {
			key,
			value,
			min_size: 0,
			max_size: usize::MAX,
			entry_error: None,
		}
	}

	fn build(&self, path: &str) -> Result<Rows<KB::Kind, VB::Kind>, BuildError> {
		let (key, key_stamp) = nested_key(&self.key, path, "key")?;
		let (value, value_stamp) = nested(&self.value, path, "value")?;
		Ok(Rows {
			path: path.to_string(),
			key,
			value,
			key_stamp,
			value_stamp,
			min_size: self.min_size,
			max_size: self.max_size,
			entry_error: self.entry_error.clone(),
		})
	}
}

/// Key and value slots shared by maps and pair lists.
struct Rows<K: KeyKind, V: EntryKind> {
	path: String,
	key: Entry<K>,
	value: Entry<V>,
	key_stamp: Stamp<K>,
	value_stamp: Stamp<V>,
	min_size: usize,
	max_size: usize,
	entry_error: Option<RowRule<K::Value, V::Value>>,
}

impl<K: KeyKind, V: EntryKind> Rows<K, V> {
	/// Renders rows as the text of a compound keyed by string keys.
	fn encode<'a>(&self, rows: impl Iterator<Item = (&'a K::Value, &'a V::Value)>, linked: bool) -> String {
		let compound = rows
			.enumerate()
			.map(|(index, (k, v))| {
				let key = self.key.kind().serialize_string_key(&self.key.for_persisted(k));
				let key = if linked { format!("{index}:{key}") } else { key };
				(key, self.value.for_persisted(v).to_tag())
			})
			.collect();
		Tag::Compound(compound).to_text()
	}

	/// Parses rows back. Undecodable keys drop their row, undecodable
	/// values fall back to the value entry's default.
	fn decode(&self, text: &str, linked: bool) -> Option<Vec<(K::Value, V::Value)>> {
		let tag = Tag::from_text(text).ok()?;
		let compound = tag.as_homogeneous_compound()?;
		let mut keyed: Vec<(usize, &str, &Tag)> = compound
			.iter()
			.map(|(key, tag)| {
				let (index, key) = if linked { split_index(key) } else { (0, key.as_str()) };
				(index, key, tag)
			})
			.collect();
		keyed.sort_by_key(|(index, ..)| *index);

		let mut rows = Vec::with_capacity(keyed.len());
		for (_, key, tag) in keyed {
			let Some(k) = self
				.key
				.kind()
				.deserialize_string_key(key)
				.and_then(|c| self.key.from_persisted(&c))
			else {
				#[cfg(feature = "logging")]
				log::warn!("dropping undecodable key {key:?} of {}", self.path);
				continue;
			};
			let v = <V::Persisted as Persist>::from_tag(tag)
				.and_then(|c| self.value.from_persisted(&c))
				.unwrap_or_else(|| self.value.default_value().clone());
			rows.push((k, v));
		}
		Some(rows)
	}

	fn present_row(&self, v: (&K::Value, &V::Value)) -> (K::Presented, V::Presented) {
		(self.key.for_presentation(v.0), self.value.for_presentation(v.1))
	}

	fn decode_presented(&self, rows: &[(K::Presented, V::Presented)]) -> Option<Vec<(K::Value, V::Value)>> {
		rows.iter()
			.map(|(kg, g)| Some((self.key.from_presentation(kg)?, self.value.from_presentation(g)?)))
			.collect()
	}

	fn row_errors(&self, index: usize, kg: &K::Presented, g: &V::Presented) -> Vec<Message> {
		let mut errors = self.key.presentation_errors(kg);
		errors.extend(self.value.presentation_errors(g));
		if let (Some(rule), Some(k), Some(v)) = (
			&self.entry_error,
			self.key.from_presentation(kg),
			self.value.from_presentation(g),
		) {
			errors.extend(rule(&k, &v));
		}
		errors.into_iter().map(|message| message.at_index(index)).collect()
	}

	fn errors(&self, rows: &[(K::Presented, V::Presented)], duplicate: Option<Message>) -> Vec<Message> {
		let mut errors: Vec<Message> = size_error(&LIST_SIZE, rows.len(), self.min_size, self.max_size)
			.into_iter()
			.chain(duplicate)
			.collect();
		for (index, (kg, g)) in rows.iter().enumerate() {
			errors.extend(self.row_errors(index, kg, g));
		}
		errors
	}

	/// One node per row: the value widget captioned by its inline key widget.
	fn present(
		&self,
		rows: &[(K::Presented, V::Presented)],
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		let mut children = Children::default();
		for (index, (kg, g)) in rows.iter().enumerate() {
			let holder = DetachedHolder::new(format!("{}[{index}]", self.path));
			let key = (self.key_stamp)(&holder, "key").ok();
			let value = (self.value_stamp)(&holder, "value").ok();
			let caption = key.as_ref().unwrap_or(&self.key).present_inline(kg, factory)?;
			if let Some(mut node) = value.as_ref().unwrap_or(&self.value).present_value(g, false, factory)? {
				node.caption = Some(Box::new(caption));
				children.nodes.push(node);
			}
		}
		Ok(children)
	}
}

#[derive(Clone)]
pub struct MapBuilder<KB: KindBuilder, VB: KindBuilder> {
	rows: RowsBuilder<KB, VB>,
	linked: bool,
}

impl<KB, VB> MapBuilder<KB, VB>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	VB: KindBuilder,
{
	pub fn new(key: EntryBuilder<KB>, value: EntryBuilder<VB>) -> Self {
		Self {
			rows: RowsBuilder::new(key, value),
			linked: false,
		}
	}
}

impl<KB, VB> KindBuilder for MapBuilder<KB, VB>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	ValueOf<KB>: Hash + Eq,
	VB: KindBuilder,
{
	type Kind = MapKind<KB::Kind, VB::Kind>;

	fn build_kind(&self, path: &str) -> Result<Self::Kind, BuildError> {
		Ok(MapKind {
			rows: self.rows.build(path)?,
			linked: self.linked,
		})
	}
}

/// A key-unique, insertion-ordered mapping.
///
/// Persisted as the text of a compound keyed by serialized keys. In linked
/// mode every key is prefixed with its insertion index so order survives
/// the unordered compound. Presented as an ordered list of rows, which may
/// transiently hold duplicate keys while being edited.
pub struct MapKind<K: KeyKind, V: EntryKind> {
	rows: Rows<K, V>,
	linked: bool,
}

impl<K, V> MapKind<K, V>
where
	K: KeyKind,
	K::Value: Hash + Eq,
	V: EntryKind,
{
	pub fn key_entry(&self) -> &Entry<K> {
		&self.rows.key
	}

	pub fn value_entry(&self) -> &Entry<V> {
		&self.rows.value
	}

	pub fn is_linked(&self) -> bool {
		self.linked
	}

	/// Flags every row whose key decodes to the same value as another row's.
	pub fn duplicate_rows(&self, rows: &[(K::Presented, V::Presented)]) -> Vec<bool> {
		let keys: Vec<Option<K::Value>> = rows
			.iter()
			.map(|(kg, _)| self.rows.key.from_presentation(kg))
			.collect();
		duplicates(&keys)
	}

	/// Errors of each row on its own, duplicate keys included.
	pub fn row_errors(&self, rows: &[(K::Presented, V::Presented)]) -> Vec<Vec<Message>> {
		self.duplicate_rows(rows)
			.into_iter()
			.zip(rows)
			.enumerate()
			.map(|(index, (duplicate, (kg, g)))| {
				let mut errors = Vec::new();
				if duplicate {
					errors.push(Message::new(DUPLICATE_KEY).at_index(index));
				}
				errors.extend(self.rows.row_errors(index, kg, g));
				errors
			})
			.collect()
	}
}

impl<K, V> EntryKind for MapKind<K, V>
where
	K: KeyKind,
	K::Value: Hash + Eq,
	V: EntryKind,
{
	type Value = IndexMap<K::Value, V::Value>;
	type Persisted = String;
	type Presented = Vec<(K::Presented, V::Presented)>;

	fn for_persisted(&self, value: &Self::Value) -> String {
		self.rows.encode(value.iter(), self.linked)
	}

	fn from_persisted(&self, persisted: &String) -> Option<Self::Value> {
		Some(self.rows.decode(persisted, self.linked)?.into_iter().collect())
	}

	fn for_presentation(&self, value: &Self::Value) -> Self::Presented {
		value.iter().map(|row| self.rows.present_row(row)).collect()
	}

	/// Rows with a repeated key keep the first position and the last value.
	fn from_presentation(&self, presented: &Self::Presented) -> Option<Self::Value> {
		Some(self.rows.decode_presented(presented)?.into_iter().collect())
	}

	/// Size, then a single duplicate-key message at the first repeated row,
	/// then per-row errors.
	fn presentation_errors(&self, presented: &Self::Presented) -> Vec<Message> {
		let duplicate = self
			.duplicate_rows(presented)
			.iter()
			.position(|duplicate| *duplicate)
			.map(|index| Message::new(DUPLICATE_KEY).at_index(index));
		self.rows.errors(presented, duplicate)
	}

	fn present_children(
		&self,
		presented: &Self::Presented,
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		self.rows.present(presented, factory)
	}
}

#[derive(Clone)]
pub struct PairListBuilder<KB: KindBuilder, VB: KindBuilder> {
	rows: RowsBuilder<KB, VB>,
}

impl<KB, VB> PairListBuilder<KB, VB>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	VB: KindBuilder,
{
	pub fn new(key: EntryBuilder<KB>, value: EntryBuilder<VB>) -> Self {
		Self {
			rows: RowsBuilder::new(key, value),
		}
	}
}

impl<KB, VB> KindBuilder for PairListBuilder<KB, VB>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	VB: KindBuilder,
{
	type Kind = PairListKind<KB::Kind, VB::Kind>;

	fn build_kind(&self, path: &str) -> Result<Self::Kind, BuildError> {
		Ok(PairListKind {
			rows: self.rows.build(path)?,
		})
	}
}

/// An ordered list of key/value pairs. Keys may repeat.
///
/// Persisted like a linked map.
pub struct PairListKind<K: KeyKind, V: EntryKind> {
	rows: Rows<K, V>,
}

impl<K: KeyKind, V: EntryKind> PairListKind<K, V> {
	pub fn key_entry(&self) -> &Entry<K> {
		&self.rows.key
	}

	pub fn value_entry(&self) -> &Entry<V> {
		&self.rows.value
	}
}

impl<K: KeyKind, V: EntryKind> EntryKind for PairListKind<K, V> {
	type Value = Vec<(K::Value, V::Value)>;
	type Persisted = String;
	type Presented = Vec<(K::Presented, V::Presented)>;

	fn for_persisted(&self, value: &Self::Value) -> String {
		self.rows.encode(value.iter().map(|(k, v)| (k, v)), true)
	}

	fn from_persisted(&self, persisted: &String) -> Option<Self::Value> {
		self.rows.decode(persisted, true)
	}

	fn for_presentation(&self, value: &Self::Value) -> Self::Presented {
		value.iter().map(|(k, v)| self.rows.present_row((k, v))).collect()
	}

	fn from_presentation(&self, presented: &Self::Presented) -> Option<Self::Value> {
		self.rows.decode_presented(presented)
	}

	fn presentation_errors(&self, presented: &Self::Presented) -> Vec<Message> {
		self.rows.errors(presented, None)
	}

	fn present_children(
		&self,
		presented: &Self::Presented,
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		self.rows.present(presented, factory)
	}
}

impl<KB, VB> EntryBuilder<MapBuilder<KB, VB>>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	ValueOf<KB>: Hash + Eq,
	VB: KindBuilder,
{
	/// Keeps insertion order across persistence.
	#[must_use]
	pub fn linked(&self) -> Self {
		self.with_kind(|kind| kind.linked = true)
	}

	#[must_use]
	pub fn min_size(&self, min: usize) -> Self {
		self.with_kind(|kind| kind.rows.min_size = min)
	}

	#[must_use]
	pub fn max_size(&self, max: usize) -> Self {
		self.with_kind(|kind| kind.rows.max_size = max)
	}

	/// Adds a rule checked on every decoded row.
	#[must_use]
	pub fn entry_error(
		&self,
		rule: impl Fn(&ValueOf<KB>, &ValueOf<VB>) -> Option<Message> + Send + Sync + 'static,
	) -> Self {
		let rule: RowRule<ValueOf<KB>, ValueOf<VB>> = Arc::new(rule);
		self.with_kind(|kind| kind.rows.entry_error = Some(rule))
	}
}

impl<KB, VB> EntryBuilder<PairListBuilder<KB, VB>>
where
	KB: KindBuilder,
	KB::Kind: KeyKind,
	VB: KindBuilder,
{
	#[must_use]
	pub fn min_size(&self, min: usize) -> Self {
		self.with_kind(|kind| kind.rows.min_size = min)
	}

	#[must_use]
	pub fn max_size(&self, max: usize) -> Self {
		self.with_kind(|kind| kind.rows.max_size = max)
	}

	#[must_use]
	pub fn entry_error(
		&self,
		rule: impl Fn(&ValueOf<KB>, &ValueOf<VB>) -> Option<Message> + Send + Sync + 'static,
	) -> Self {
		let rule: RowRule<ValueOf<KB>, ValueOf<VB>> = Arc::new(rule);
		self.with_kind(|kind| kind.rows.entry_error = Some(rule))
	}
}
