/* src/entry/kind.rs */

use std::fmt::Debug;

use super::BuildError;
use crate::codec::Persist;
use crate::message::Message;
use crate::presentation::{Children, PresentationError, WidgetFactory};

/// Bounds shared by domain and presentation values.
pub trait Value: Clone + PartialEq + Debug + Send + Sync + 'static {}

impl<T> Value for T where T: Clone + PartialEq + Debug + Send + Sync + 'static {}

/// The three-way transform contract of an entry kind.
///
/// Forward transforms are total. Backward transforms return `None` on
/// malformed input and callers fall back to the entry's default.
pub trait EntryKind: Send + Sync + 'static {
	/// Domain value handed to user code.
	type Value: Value;
	/// Form stored by the backend.
	type Persisted: Persist;
	/// Form edited by a widget.
	type Presented: Value;

	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self::Value>()
	}

	fn for_persisted(&self, value: &Self::Value) -> Self::Persisted;

	fn from_persisted(&self, persisted: &Self::Persisted) -> Option<Self::Value>;

	fn for_presentation(&self, value: &Self::Value) -> Self::Presented;

	fn from_presentation(&self, presented: &Self::Presented) -> Option<Self::Value>;

	/// Structural errors of a presentation value, checked before user rules.
	fn presentation_errors(&self, _presented: &Self::Presented) -> Vec<Message> {
		Vec::new()
	}

	/// Whether entries of this kind may live inside a composite slot.
	fn can_be_nested(&self) -> bool {
		true
	}

	/// Widgets for nested slots or rows, requested after the entry's own.
	fn present_children(
		&self,
		_presented: &Self::Presented,
		_factory: &dyn WidgetFactory,
	) -> Result<Children, PresentationError> {
		Ok(Children::default())
	}
}

/// Kinds usable as map keys, tuple slots or captions.
///
/// Widgets produced for key kinds are requested inline and must report
/// themselves as child-capable.
pub trait KeyKind: EntryKind {
	fn serialize_string_key(&self, key: &Self::Persisted) -> String {
		key.to_tag().naive_string()
	}

	fn deserialize_string_key(&self, key: &str) -> Option<Self::Persisted>;
}

/// Kind-specific half of an [`EntryBuilder`](super::EntryBuilder).
///
/// `build_kind` is the hook run by `EntryBuilder::build`; composites use it
/// to materialize their nested entries on detached holders.
pub trait KindBuilder: Clone + Send + Sync + 'static {
	type Kind: EntryKind;

	fn build_kind(&self, path: &str) -> Result<Self::Kind, BuildError>;
}

/// Value type produced by a kind builder.
pub type ValueOf<B> = <<B as KindBuilder>::Kind as EntryKind>::Value;

/// Presentation type produced by a kind builder.
pub type PresentedOf<B> = <<B as KindBuilder>::Kind as EntryKind>::Presented;
