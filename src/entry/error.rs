/* src/entry/error.rs */

use crate::backend::BackendError;
use crate::message::Message;

fn join(messages: &[Message]) -> String {
	messages
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("; ")
}

/// Errors from reading or writing entries through a holder.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryError {
	#[error("no such entry: {path}")]
	NoSuchEntry { path: String },

	#[error("no such group: {path}")]
	NoSuchGroup { path: String },

	/// A value of the wrong runtime type went through a generic setter.
	#[error("type mismatch for {path}: expected {expected}, found {found}")]
	TypeMismatch {
		path: String,
		expected: &'static str,
		found: &'static str,
	},

	#[error("invalid value for {path}: {}", join(.errors))]
	InvalidValue { path: String, errors: Vec<Message> },

	/// A persisted tag did not decode into the entry's value.
	#[error("cannot decode value for {path}")]
	Decode { path: String },

	#[error("backend error: {0}")]
	Backend(#[from] BackendError),
}

/// Configuration-time errors. Always raised at `build`/`add` time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BuildError {
	#[error("invalid entry name: {name:?}")]
	InvalidName { name: String },

	#[error("duplicate name: {path}")]
	Duplicate { path: String },

	#[error("default value of {path} is invalid: {}", join(.errors))]
	InvalidDefault { path: String, errors: Vec<Message> },

	/// A composite slot was given a non-persistent or non-nestable entry.
	#[error("entry cannot be nested: {path}")]
	NotNestable { path: String },

	#[error("{bean} has no settable property {property}")]
	UnknownProperty {
		bean: &'static str,
		property: String,
	},

	#[error("{bean} leaves properties without entries: {}", .properties.join(", "))]
	UneditableProperties {
		bean: &'static str,
		properties: Vec<String>,
	},

	#[error("property {property} of {bean} does not hold a {expected}")]
	PropertyType {
		bean: &'static str,
		property: String,
		expected: &'static str,
	},

	#[error("root already registered: {id}")]
	DuplicateRoot { id: String },

	#[error("builder error: {0}")]
	Builder(String),

	#[error("backend error: {0}")]
	Backend(#[from] BackendError),
}
