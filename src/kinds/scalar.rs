/* src/kinds/scalar.rs */

use std::fmt::Display;
use std::str::FromStr;

use crate::codec::Persist;
use crate::entry::{BuildError, EntryBuilder, EntryKind, KeyKind, KindBuilder};
use crate::message::{Message, TOO_LARGE, TOO_LONG, TOO_SHORT, TOO_SMALL};

/// A boolean toggle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolKind;

impl EntryKind for BoolKind {
	type Value = bool;
	type Persisted = bool;
	type Presented = bool;

	fn for_persisted(&self, value: &bool) -> bool {
		*value
	}

	fn from_persisted(&self, persisted: &bool) -> Option<bool> {
		Some(*persisted)
	}

	fn for_presentation(&self, value: &bool) -> bool {
		*value
	}

	fn from_presentation(&self, presented: &bool) -> Option<bool> {
		Some(*presented)
	}
}

impl KeyKind for BoolKind {
	fn deserialize_string_key(&self, key: &str) -> Option<bool> {
		key.parse().ok()
	}
}

impl KindBuilder for BoolKind {
	type Kind = Self;

	fn build_kind(&self, _path: &str) -> Result<Self, BuildError> {
		Ok(*self)
	}
}

/// Free text, optionally bounded in length (counted in chars).
#[derive(Debug, Clone, Default)]
pub struct StringKind {
	min_length: usize,
	max_length: Option<usize>,
}

impl StringKind {
	fn check(&self, value: &str) -> Vec<Message> {
		let len = value.chars().count();
		let mut errors = Vec::new();
		if len < self.min_length {
			errors.push(Message::new(TOO_SHORT).arg(self.min_length));
		}
		if let Some(max) = self.max_length.filter(|max| len > *max) {
			errors.push(Message::new(TOO_LONG).arg(max));
		}
		errors
	}
}

impl EntryKind for StringKind {
	type Value = String;
	type Persisted = String;
	type Presented = String;

	fn for_persisted(&self, value: &String) -> String {
		value.clone()
	}

	fn from_persisted(&self, persisted: &String) -> Option<String> {
		Some(persisted.clone())
	}

	fn for_presentation(&self, value: &String) -> String {
		value.clone()
	}

	fn from_presentation(&self, presented: &String) -> Option<String> {
		Some(presented.clone())
	}

	fn presentation_errors(&self, presented: &String) -> Vec<Message> {
		self.check(presented)
	}
}

impl KeyKind for StringKind {
	fn deserialize_string_key(&self, key: &str) -> Option<String> {
		Some(key.to_string())
	}
}

impl KindBuilder for StringKind {
	type Kind = Self;

	fn build_kind(&self, _path: &str) -> Result<Self, BuildError> {
		Ok(self.clone())
	}
}

/// Primitive numbers with a native tag.
pub trait Number: Persist + PartialOrd + Copy + Display + FromStr {}

macro_rules! number {
	($($ty:ty),* $(,)?) => {$(
		impl Number for $ty {}
	)*};
}

number!(i8, i16, i32, i64, f32, f64);

/// A number, optionally bounded on either side.
#[derive(Debug, Clone)]
pub struct NumberKind<T: Number> {
	min: Option<T>,
	max: Option<T>,
}

impl<T: Number> Default for NumberKind<T> {
	fn default() -> Self {
		Self { min: None, max: None }
	}
}

impl<T: Number> NumberKind<T> {
	fn check(&self, value: &T) -> Vec<Message> {
		let mut errors = Vec::new();
		if let Some(min) = self.min.filter(|min| value < min) {
			errors.push(Message::new(TOO_SMALL).arg(min));
		}
		if let Some(max) = self.max.filter(|max| value > max) {
			errors.push(Message::new(TOO_LARGE).arg(max));
		}
		errors
	}
}

impl<T: Number> EntryKind for NumberKind<T> {
	type Value = T;
	type Persisted = T;
	type Presented = T;

	fn for_persisted(&self, value: &T) -> T {
		*value
	}

	fn from_persisted(&self, persisted: &T) -> Option<T> {
		Some(*persisted)
	}

	fn for_presentation(&self, value: &T) -> T {
		*value
	}

	fn from_presentation(&self, presented: &T) -> Option<T> {
		Some(*presented)
	}

	fn presentation_errors(&self, presented: &T) -> Vec<Message> {
		self.check(presented)
	}
}

impl<T: Number> KeyKind for NumberKind<T> {
	fn deserialize_string_key(&self, key: &str) -> Option<T> {
		key.parse().ok()
	}
}

impl<T: Number> KindBuilder for NumberKind<T> {
	type Kind = Self;

	fn build_kind(&self, _path: &str) -> Result<Self, BuildError> {
		Ok(self.clone())
	}
}

impl<T: Number> EntryBuilder<NumberKind<T>> {
	#[must_use]
	pub fn min(&self, min: T) -> Self {
		self.with_kind(|kind| kind.min = Some(min))
	}

	#[must_use]
	pub fn max(&self, max: T) -> Self {
		self.with_kind(|kind| kind.max = Some(max))
	}

	#[must_use]
	pub fn range(&self, min: T, max: T) -> Self {
		self.with_kind(|kind| {
			kind.min = Some(min);
			kind.max = Some(max);
		})
	}
}

impl EntryBuilder<StringKind> {
	#[must_use]
	pub fn min_length(&self, min: usize) -> Self {
		self.with_kind(|kind| kind.min_length = min)
	}

	#[must_use]
	pub fn max_length(&self, max: usize) -> Self {
		self.with_kind(|kind| kind.max_length = Some(max))
	}

	#[must_use]
	pub fn non_empty(&self) -> Self {
		self.min_length(1)
	}
}
