/* src/codec/text.rs */

use super::{CodecError, Tag};

impl Tag {
	/// Renders the tree as a single string using `serde_json`.
	pub fn to_text(&self) -> String {
		// Non-finite floats render as null and simply fail to parse back.
		serde_json::to_string(self).unwrap_or_default()
	}

	/// Parses text produced by [`Tag::to_text`].
	pub fn from_text(input: &str) -> Result<Tag, CodecError> {
		let tag: Tag = serde_json::from_str(input).map_err(|e| CodecError::Parse(e.to_string()))?;
		tag.validate()?;
		Ok(tag)
	}

	/// Compact binary encoding using `postcard`.
	#[cfg(feature = "postcard")]
	pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
		postcard::to_allocvec(self).map_err(|e| CodecError::Parse(e.to_string()))
	}

	#[cfg(feature = "postcard")]
	pub fn from_bytes(input: &[u8]) -> Result<Tag, CodecError> {
		let tag: Tag = postcard::from_bytes(input).map_err(|e| CodecError::Parse(e.to_string()))?;
		tag.validate()?;
		Ok(tag)
	}
}
