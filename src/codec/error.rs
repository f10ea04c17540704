/* src/codec/error.rs */

use super::TagKind;

/// Errors raised while parsing or decoding tags.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
	/// Text or binary input could not be parsed.
	#[error("parse error: {0}")]
	Parse(String),

	/// A list mixes items of different shapes.
	#[error("heterogeneous items: expected {expected}, found {found}")]
	Heterogeneous { expected: TagKind, found: TagKind },

	/// The tag does not have the requested shape.
	#[error("cannot decode {found} as {expected}")]
	Shape {
		expected: &'static str,
		found: TagKind,
	},
}
