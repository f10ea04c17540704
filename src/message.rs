/* src/message.rs */

//! Untranslated messages attached to entries, rows and tooltips.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const MISSING_VALUE: &str = "trellis.error.missing_value";
pub const LIST_EMPTY: &str = "trellis.error.list.empty";
pub const LIST_MIN_SIZE: &str = "trellis.error.list.min_size";
pub const LIST_MAX_SIZE: &str = "trellis.error.list.max_size";
pub const SET_EMPTY: &str = "trellis.error.set.empty";
pub const SET_MIN_SIZE: &str = "trellis.error.set.min_size";
pub const SET_MAX_SIZE: &str = "trellis.error.set.max_size";
pub const DUPLICATE_KEY: &str = "trellis.error.map.duplicate_key";
pub const DUPLICATE_ELEMENT: &str = "trellis.error.set.duplicate_element";
pub const TOO_SMALL: &str = "trellis.error.number.too_small";
pub const TOO_LARGE: &str = "trellis.error.number.too_large";
pub const TOO_SHORT: &str = "trellis.error.string.too_short";
pub const TOO_LONG: &str = "trellis.error.string.too_long";

/// A translation key with its formatting arguments.
///
/// Keys are never resolved here. A message created from free text simply
/// carries that text as its key, which renders unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
	key: Cow<'static, str>,
	args: Vec<String>,
	index: Option<usize>,
}

impl Message {
	pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
		Self {
			key: key.into(),
			args: Vec::new(),
			index: None,
		}
	}

	/// Appends a formatting argument.
	pub fn arg(mut self, arg: impl ToString) -> Self {
		self.args.push(arg.to_string());
		self
	}

	/// Attaches the message to the zero-based element `index`.
	///
	/// The index is rendered 1-based. Attaching twice keeps the innermost index.
	pub fn at_index(mut self, index: usize) -> Self {
		if self.index.is_none() {
			self.index = Some(index);
		}
		self
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn args(&self) -> &[String] {
		&self.args
	}

	/// Zero-based element index, if any.
	pub fn index(&self) -> Option<usize> {
		self.index
	}
}

impl fmt::Display for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.key)?;
		if !self.args.is_empty() {
			write!(f, "({})", self.args.join(", "))?;
		}
		if let Some(index) = self.index {
			write!(f, ", at index {}", index + 1)?;
		}
		Ok(())
	}
}

impl From<&'static str> for Message {
	fn from(key: &'static str) -> Self {
		Self::new(key)
	}
}

impl From<String> for Message {
	fn from(key: String) -> Self {
		Self::new(key)
	}
}

/// Message keys of one family of size bounds.
pub(crate) struct SizeKeys {
	empty: &'static str,
	min_size: &'static str,
	max_size: &'static str,
}

pub(crate) const LIST_SIZE: SizeKeys = SizeKeys {
	empty: LIST_EMPTY,
	min_size: LIST_MIN_SIZE,
	max_size: LIST_MAX_SIZE,
};

pub(crate) const SET_SIZE: SizeKeys = SizeKeys {
	empty: SET_EMPTY,
	min_size: SET_MIN_SIZE,
	max_size: SET_MAX_SIZE,
};

/// Size bound check shared by every sequence-shaped kind.
pub(crate) fn size_error(keys: &SizeKeys, len: usize, min: usize, max: usize) -> Option<Message> {
	if len < min {
		Some(if min == 1 {
			Message::new(keys.empty)
		} else {
			Message::new(keys.min_size).arg(min)
		})
	} else if len > max {
		Some(Message::new(keys.max_size).arg(max))
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_index_is_one_based_in_text() {
		let message = Message::new("bad").arg(3).at_index(0);
		assert_eq!(message.to_string(), "bad(3), at index 1");
		assert_eq!(message.index(), Some(0));
	}

	#[test]
	fn test_size_error_variants() {
		let key = |len, min| size_error(&LIST_SIZE, len, min, 3).map(|m| m.key().to_string());
		assert_eq!(key(0, 1), Some(LIST_EMPTY.into()));
		assert_eq!(key(1, 2), Some(LIST_MIN_SIZE.into()));
		assert_eq!(key(4, 1), Some(LIST_MAX_SIZE.into()));
		assert!(key(2, 1).is_none());
		assert_eq!(
			size_error(&SET_SIZE, 0, 2, 3).map(|m| m.args().to_vec()),
			Some(vec!["2".to_string()])
		);
	}
}
