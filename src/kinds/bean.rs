/* src/kinds/bean.rs */

use std::any::type_name;
use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::codec::Tag;
use crate::entry::{
	AnyBuilder, AnyEntry, AnyValue, BuildError, EntryBuilder, EntryError, EntryKind, KeyKind,
	KindBuilder, Value,
};
use crate::holder::DetachedHolder;
use crate::message::{MISSING_VALUE, Message};
use crate::presentation::{Children, PresentationError, WidgetFactory};

/// A record whose named properties can be read and written generically.
///
/// Implement it with [`bean!`](crate::bean).
pub trait Bean: Value {
	/// Every settable property.
	fn properties() -> &'static [&'static str];

	fn property(&self, name: &str) -> Option<AnyValue>;

	/// Returns `false` for unknown names and values of the wrong type.
	fn set_property(&mut self, name: &str, value: &AnyValue) -> bool;
}

/// Implements [`Bean`](crate::kinds::Bean) for a struct over the listed fields.
///
/// ```
/// #[derive(Debug, Clone, PartialEq)]
/// struct Point {
/// 	x: i32,
/// 	y: i32,
/// }
///
/// trellis::bean!(Point { x, y });
/// ```
#[macro_export]
macro_rules! bean {
	($ty:ty { $($field:ident),* $(,)? }) => {
		impl $crate::kinds::Bean for $ty {
			fn properties() -> &'static [&'static str] {
				&[$(stringify!($field)),*]
			}

			fn property(&self, name: &str) -> Option<$crate::entry::AnyValue> {
				match name {
					$(stringify!($field) => Some($crate::entry::AnyValue::new(self.$field.clone())),)*
					_ => None,
				}
			}

			fn set_property(&mut self, name: &str, value: &$crate::entry::AnyValue) -> bool {
				match name {
					$(stringify!($field) => $crate::entry::assign(&mut self.$field, value),)*
					_ => false,
				}
			}
		}
	};
}

#[derive(Clone)]
pub struct BeanBuilder<B: Bean> {
	template: B,
	entries: IndexMap<String, Arc<dyn AnyBuilder>>,
	caption: Option<String>,
	allow_uneditable: bool,
}

impl<B: Bean> BeanBuilder<B> {
	/// Starts from `template`, which also fills properties missing from
	/// persisted data.
	pub fn new(template: B) -> Self {
		Self {
			template,
			entries: IndexMap::new(),
			caption: None,
			allow_uneditable: false,
		}
	}

	fn validate(&self) -> Result<(), BuildError> {
		let bean = type_name::<B>();
		let properties = B::properties();
		let unknown = self
			.entries
			.keys()
			.find(|name| !properties.iter().any(|property| *property == name.as_str()));
		if let Some(unknown) = unknown {
			return Err(BuildError::UnknownProperty {
				bean,
				property: unknown.clone(),
			});
		}
		if !self.allow_uneditable {
			let missing: Vec<String> = properties
				.iter()
				.filter(|property| !self.entries.contains_key(**property))
				.map(|property| property.to_string())
				.collect();
			if !missing.is_empty() {
				return Err(BuildError::UneditableProperties {
					bean,
					properties: missing,
				});
			}
		}
		Ok(())
	}
}

impl<B: Bean> KindBuilder for BeanBuilder<B> {
	type Kind = BeanKind<B>;

	/// Checks the declared entries against the record's properties, then
	/// builds every entry on a detached holder.
	fn build_kind(&self, path: &str) -> Result<BeanKind<B>, BuildError> {
		self.validate()?;
		let holder = DetachedHolder::new(path);
		let mut entries = IndexMap::with_capacity(self.entries.len());
		for (name, builder) in &self.entries {
			let entry = builder.build_any(&holder, name)?;
			if !entry.is_nestable() {
				return Err(BuildError::NotNestable {
					path: entry.path().to_string(),
				});
			}
			let fits = self
				.template
				.property(name)
				.is_some_and(|value| entry.tag_of(&value).is_some());
			if !fits {
				#[cfg(feature = "logging")]
				log::warn!(
					"property {name} of {} does not match entry type {}",
					type_name::<B>(),
					entry.type_name()
				);
				return Err(BuildError::PropertyType {
					bean: type_name::<B>(),
					property: name.clone(),
					expected: entry.type_name(),
				});
			}
			entries.insert(name.clone(), entry);
		}
		Ok(BeanKind {
			template: self.template.clone(),
			entries,
			caption: self.caption.clone(),
		})
	}
}

/// Presentation form of a record: the value it was derived from plus one
/// presented value per declared property.
#[derive(Debug, Clone, PartialEq)]
pub struct BeanView<B: Bean> {
	pub base: B,
	pub fields: IndexMap<String, AnyValue>,
}

/// A record edited property by property.
///
/// Properties without an entry keep whatever value the record carries.
/// The caption property, if any, is presented inline with the record.
pub struct BeanKind<B: Bean> {
	template: B,
	entries: IndexMap<String, Box<dyn AnyEntry>>,
	caption: Option<String>,
}

impl<B: Bean> BeanKind<B> {
	pub fn property_names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn caption(&self) -> Option<&str> {
		self.caption.as_deref()
	}

	pub fn entry(&self, name: &str) -> Option<&dyn AnyEntry> {
		self.entries.get(name).map(|entry| &**entry)
	}

	fn slot(&self, name: &str) -> Result<&dyn AnyEntry, EntryError> {
		self.entry(name).ok_or_else(|| EntryError::NoSuchEntry {
			path: name.to_string(),
		})
	}

	/// Presented value of one property of `bean`.
	pub fn get_presented(&self, bean: &B, name: &str) -> Option<AnyValue> {
		self.entry(name)?.presented_of(&bean.property(name)?)
	}

	/// Validates `value` with the property's entry and stores it in `bean`.
	pub fn set(&self, bean: &mut B, name: &str, value: &AnyValue) -> Result<(), EntryError> {
		let entry = self.slot(name)?;
		let presented = entry.presented_of(value).ok_or_else(|| EntryError::TypeMismatch {
			path: entry.path().to_string(),
			expected: entry.type_name(),
			found: value.type_name(),
		})?;
		let errors = entry.presented_errors(&presented);
		if !errors.is_empty() {
			return Err(EntryError::InvalidValue {
				path: entry.path().to_string(),
				errors,
			});
		}
		if !bean.set_property(name, value) {
			return Err(EntryError::TypeMismatch {
				path: entry.path().to_string(),
				expected: type_name::<B>(),
				found: value.type_name(),
			});
		}
		Ok(())
	}

	/// Decodes a presented value through the property's entry and stores it.
	pub fn set_presented(&self, bean: &mut B, name: &str, presented: &AnyValue) -> Result<(), EntryError> {
		let entry = self.slot(name)?;
		match entry.value_of_presented(presented) {
			Some(value) => self.set(bean, name, &value),
			None => Err(EntryError::InvalidValue {
				path: entry.path().to_string(),
				errors: entry.presented_errors(presented),
			}),
		}
	}
}

impl<B: Bean> EntryKind for BeanKind<B> {
	type Value = B;
	type Persisted = Tag;
	type Presented = BeanView<B>;

	fn for_persisted(&self, value: &B) -> Tag {
		let compound: BTreeMap<String, Tag> = self
			.entries
			.iter()
			.filter_map(|(name, entry)| Some((name.clone(), entry.tag_of(&value.property(name)?)?)))
			.collect();
		Tag::Compound(compound)
	}

	/// Missing or undecodable properties keep the template's value.
	fn from_persisted(&self, persisted: &Tag) -> Option<B> {
		let compound = persisted.as_compound()?;
		let mut bean = self.template.clone();
		for (name, entry) in &self.entries {
			if let Some(value) = compound.get(name).and_then(|tag| entry.value_of_tag(tag)) {
				bean.set_property(name, &value);
			}
		}
		Some(bean)
	}

	fn for_presentation(&self, value: &B) -> BeanView<B> {
		let fields = self
			.entries
			.iter()
			.filter_map(|(name, entry)| Some((name.clone(), entry.presented_of(&value.property(name)?)?)))
			.collect();
		BeanView {
			base: value.clone(),
			fields,
		}
	}

	fn from_presentation(&self, presented: &BeanView<B>) -> Option<B> {
		let mut bean = presented.base.clone();
		for (name, entry) in &self.entries {
			let value = entry.value_of_presented(presented.fields.get(name)?)?;
			if !bean.set_property(name, &value) {
				return None;
			}
		}
		Some(bean)
	}

	fn presentation_errors(&self, presented: &BeanView<B>) -> Vec<Message> {
		self.entries
			.iter()
			.flat_map(|(name, entry)| match presented.fields.get(name) {
				Some(field) => entry.presented_errors(field),
				None => vec![Message::new(MISSING_VALUE).arg(name)],
			})
			.collect()
	}

	fn present_children(
		&self,
		presented: &BeanView<B>,
		factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		let mut children = Children::default();
		for (name, entry) in &self.entries {
			let Some(field) = presented.fields.get(name) else {
				continue;
			};
			if self.caption.as_deref() == Some(name.as_str()) {
				children.caption = entry.present_presented(field, true, factory)?;
			} else {
				children.nodes.extend(entry.present_presented(field, false, factory)?);
			}
		}
		Ok(children)
	}
}

impl<B: Bean> EntryBuilder<BeanBuilder<B>> {
	/// Declares the entry editing property `name`.
	#[must_use]
	pub fn add<KB: KindBuilder>(&self, name: &str, builder: EntryBuilder<KB>) -> Self {
		let builder: Arc<dyn AnyBuilder> = Arc::new(builder);
		self.with_kind(|kind| {
			kind.entries.insert(name.to_string(), builder);
		})
	}

	/// Declares the caption property, shown inline with the record.
	#[must_use]
	pub fn caption<KB>(&self, name: &str, builder: EntryBuilder<KB>) -> Self
	where
		KB: KindBuilder,
		KB::Kind: KeyKind,
	{
		let builder: Arc<dyn AnyBuilder> = Arc::new(builder);
		self.with_kind(|kind| {
			kind.entries.shift_insert(0, name.to_string(), builder);
			kind.caption = Some(name.to_string());
		})
	}

	/// Lets record properties without an entry pass the build.
	#[must_use]
	pub fn allow_uneditable_properties(&self) -> Self {
		self.with_kind(|kind| kind.allow_uneditable = true)
	}
}
