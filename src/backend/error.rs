/* src/backend/error.rs */

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
	/// The key was never defined.
	#[error("undefined key: {key}")]
	Undefined { key: String },

	/// The key is already declared by another entry.
	#[error("key already defined: {key}")]
	AlreadyDefined { key: String },

	/// The validator declared for the key refused the value.
	#[error("value rejected for key: {key}")]
	Rejected { key: String },
}
