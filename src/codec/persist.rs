/* src/codec/persist.rs */

use std::collections::BTreeMap;
use std::fmt::Debug;

use super::{Tag, check_homogeneous};

/// A value the backend can store as a [`Tag`].
///
/// Decoding is partial: `None` means the tag has the wrong shape.
pub trait Persist: Clone + Debug + PartialEq + Send + Sync + 'static {
	fn to_tag(&self) -> Tag;
	fn from_tag(tag: &Tag) -> Option<Self>;
}

impl Persist for Tag {
	fn to_tag(&self) -> Tag {
		self.clone()
	}

	fn from_tag(tag: &Tag) -> Option<Self> {
		Some(tag.clone())
	}
}

impl Persist for bool {
	fn to_tag(&self) -> Tag {
		Tag::Bool(*self)
	}

	fn from_tag(tag: &Tag) -> Option<Self> {
		match *tag {
			Tag::Bool(v) => Some(v),
			Tag::Byte(v) => Some(v != 0),
			_ => None,
		}
	}
}

impl Persist for String {
	fn to_tag(&self) -> Tag {
		Tag::String(self.clone())
	}

	fn from_tag(tag: &Tag) -> Option<Self> {
		tag.as_str().map(str::to_owned)
	}
}

// Integers widen or narrow freely as long as the value fits.
macro_rules! persist_int {
	($($ty:ty => $variant:ident),* $(,)?) => {$(
		impl Persist for $ty {
			fn to_tag(&self) -> Tag {
				Tag::$variant(*self)
			}

			fn from_tag(tag: &Tag) -> Option<Self> {
				match *tag {
					Tag::Byte(v) => <$ty>::try_from(v).ok(),
					Tag::Short(v) => <$ty>::try_from(v).ok(),
					Tag::Int(v) => <$ty>::try_from(v).ok(),
					Tag::Long(v) => <$ty>::try_from(v).ok(),
					_ => None,
				}
			}
		}
	)*};
}

persist_int!(i8 => Byte, i16 => Short, i32 => Int, i64 => Long);

macro_rules! persist_float {
	($($ty:ty => $variant:ident),* $(,)?) => {$(
		impl Persist for $ty {
			fn to_tag(&self) -> Tag {
				Tag::$variant(*self)
			}

			fn from_tag(tag: &Tag) -> Option<Self> {
				match *tag {
					Tag::Float(v) => Some(v as $ty),
					Tag::Double(v) => Some(v as $ty),
					Tag::Byte(v) => Some(v as $ty),
					Tag::Short(v) => Some(v as $ty),
					Tag::Int(v) => Some(v as $ty),
					Tag::Long(v) => Some(v as $ty),
					_ => None,
				}
			}
		}
	)*};
}

persist_float!(f32 => Float, f64 => Double);

impl<T: Persist> Persist for Vec<T> {
	fn to_tag(&self) -> Tag {
		Tag::List(self.iter().map(Persist::to_tag).collect())
	}

	fn from_tag(tag: &Tag) -> Option<Self> {
		let items = tag.as_list()?;
		check_homogeneous(items).ok()?;
		items.iter().map(T::from_tag).collect()
	}
}

impl<T: Persist> Persist for BTreeMap<String, T> {
	fn to_tag(&self) -> Tag {
		Tag::Compound(self.iter().map(|(k, v)| (k.clone(), v.to_tag())).collect())
	}

	fn from_tag(tag: &Tag) -> Option<Self> {
		tag.as_homogeneous_compound()?
			.iter()
			.map(|(k, v)| T::from_tag(v).map(|v| (k.clone(), v)))
			.collect()
	}
}
