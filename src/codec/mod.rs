/* src/codec/mod.rs */

//! Fallback tagged format for values without a native scalar slot.
//!
//! A [`Tag`] tree is what the backend stores for every entry. Aggregates that
//! the backend cannot hold natively are rendered to a single string with
//! [`Tag::to_text`] and parsed back with [`Tag::from_text`].

mod error;
mod persist;
mod text;

pub use error::CodecError;
pub use persist::Persist;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A node of the tagged tree.
///
/// Compounds are keyed maps with no insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tag {
	Bool(bool),
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	String(String),
	List(Vec<Tag>),
	Compound(BTreeMap<String, Tag>),
}

/// Shape of a [`Tag`], ignoring its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
	Bool,
	Byte,
	Short,
	Int,
	Long,
	Float,
	Double,
	String,
	List,
	Compound,
}

impl fmt::Display for TagKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

impl Tag {
	pub fn kind(&self) -> TagKind {
		match self {
			Tag::Bool(_) => TagKind::Bool,
			Tag::Byte(_) => TagKind::Byte,
			Tag::Short(_) => TagKind::Short,
			Tag::Int(_) => TagKind::Int,
			Tag::Long(_) => TagKind::Long,
			Tag::Float(_) => TagKind::Float,
			Tag::Double(_) => TagKind::Double,
			Tag::String(_) => TagKind::String,
			Tag::List(_) => TagKind::List,
			Tag::Compound(_) => TagKind::Compound,
		}
	}

	/// Builds a list, rejecting items of mixed shapes.
	pub fn list(items: Vec<Tag>) -> Result<Tag, CodecError> {
		check_homogeneous(&items)?;
		Ok(Tag::List(items))
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Tag::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Tag]> {
		match self {
			Tag::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_compound(&self) -> Option<&BTreeMap<String, Tag>> {
		match self {
			Tag::Compound(entries) => Some(entries),
			_ => None,
		}
	}

	/// The compound's entries, provided every value has the same shape.
	pub fn as_homogeneous_compound(&self) -> Option<&BTreeMap<String, Tag>> {
		self.as_compound()
			.filter(|entries| check_homogeneous(entries.values()).is_ok())
	}

	/// Plain rendering used for string keys.
	///
	/// Strings render bare and numbers use their `Display` form, anything
	/// else falls back to the text encoding.
	pub fn naive_string(&self) -> String {
		match self {
			Tag::Bool(v) => v.to_string(),
			Tag::Byte(v) => v.to_string(),
			Tag::Short(v) => v.to_string(),
			Tag::Int(v) => v.to_string(),
			Tag::Long(v) => v.to_string(),
			Tag::Float(v) => v.to_string(),
			Tag::Double(v) => v.to_string(),
			Tag::String(s) => s.clone(),
			Tag::List(_) | Tag::Compound(_) => self.to_text(),
		}
	}

	/// Checks that every list in the tree is homogeneous.
	pub fn validate(&self) -> Result<(), CodecError> {
		match self {
			Tag::List(items) => {
				check_homogeneous(items)?;
				items.iter().try_for_each(Tag::validate)
			}
			Tag::Compound(entries) => entries.values().try_for_each(Tag::validate),
			_ => Ok(()),
		}
	}
}

fn check_homogeneous<'a>(items: impl IntoIterator<Item = &'a Tag>) -> Result<(), CodecError> {
	let mut items = items.into_iter();
	let Some(first) = items.next().map(Tag::kind) else {
		return Ok(());
	};
	match items.map(Tag::kind).find(|kind| *kind != first) {
		Some(found) => Err(CodecError::Heterogeneous {
			expected: first,
			found,
		}),
		None => Ok(()),
	}
}

/// Encodes any persistable value into a tag.
pub fn encode<T: Persist>(value: &T) -> Tag {
	value.to_tag()
}

/// Decodes a tag into the shape `T`, rejecting mismatched shapes.
pub fn decode<T: Persist>(tag: &Tag) -> Result<T, CodecError> {
	tag.validate()?;
	T::from_tag(tag).ok_or(CodecError::Shape {
		expected: std::any::type_name::<T>(),
		found: tag.kind(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_list_rejects_mixed_shapes() {
		let err = Tag::list(vec![Tag::Int(1), Tag::String("a".into())]).unwrap_err();
		assert!(matches!(
			err,
			CodecError::Heterogeneous {
				expected: TagKind::Int,
				found: TagKind::String
			}
		));
		assert!(Tag::list(Vec::new()).is_ok());
	}

	#[test]
	fn test_naive_string() {
		assert_eq!(Tag::String("abc".into()).naive_string(), "abc");
		assert_eq!(Tag::Int(-4).naive_string(), "-4");
		assert_eq!(Tag::Double(1.5).naive_string(), "1.5");
	}

	#[test]
	fn test_homogeneous_compound() {
		let mut entries = BTreeMap::new();
		entries.insert("a".to_string(), Tag::Int(1));
		assert!(Tag::Compound(entries.clone()).as_homogeneous_compound().is_some());
		entries.insert("b".to_string(), Tag::Bool(true));
		assert!(Tag::Compound(entries).as_homogeneous_compound().is_none());
	}
}
