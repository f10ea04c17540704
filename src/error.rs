/* src/error.rs */

use thiserror::Error;

use crate::backend::BackendError;
use crate::codec::CodecError;
use crate::entry::{BuildError, EntryError};
use crate::holder::HolderError;
use crate::presentation::PresentationError;

/// Any error raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
	#[error("Build error: {0}")]
	Build(#[from] BuildError),

	#[error("Entry error: {0}")]
	Entry(#[from] EntryError),

	#[error("Holder error: {0}")]
	Holder(#[from] HolderError),

	#[error("Codec error: {0}")]
	Codec(#[from] CodecError),

	#[error("Backend error: {0}")]
	Backend(#[from] BackendError),

	#[error("Presentation error: {0}")]
	Presentation(#[from] PresentationError),
}

pub type Result<T> = std::result::Result<T, Error>;
