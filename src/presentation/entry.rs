/* src/presentation/entry.rs */

use super::{PresentationError, PresentationNode, WidgetFactory, WidgetRequest};
use crate::entry::{AnyValue, Entry, EntryKind, KeyKind};

impl<K: EntryKind> Entry<K> {
	/// Requests the widget tree of the current value.
	pub fn present(&self, factory: &dyn WidgetFactory) -> Result<Option<PresentationNode>, PresentationError> {
		self.present_value(&self.for_presentation(&self.get()), false, factory)
	}

	/// Requests the widget tree of an arbitrary presentation value.
	///
	/// Inline requests must produce a child-capable widget.
	pub fn present_value(
		&self,
		presented: &K::Presented,
		inline: bool,
		factory: &dyn WidgetFactory,
	) -> Result<Option<PresentationNode>, PresentationError> {
		let errors = self.presentation_errors(presented);
		let tooltip = self
			.from_presentation(presented)
			.map(|value| self.tooltip(&value))
			.unwrap_or_default();
		let value = AnyValue::new(presented.clone());
		let request = WidgetRequest {
			path: self.path(),
			display_key: self.meta().translation.as_deref(),
			type_name: self.type_name(),
			value: &value,
			errors: &errors,
			tooltip: &tooltip,
			inline,
		};

		let widget = match factory.build_widget(&request) {
			Some(widget) if inline && !widget.is_child_capable() => return Err(self.not_child_capable()),
			Some(widget) => widget,
			None if inline => return Err(self.not_child_capable()),
			None => return Ok(None),
		};
		let children = self.kind().present_children(presented, factory)?;

		Ok(Some(PresentationNode {
			path: self.path().to_string(),
			widget,
			errors,
			tooltip,
			requires_restart: self.meta().requires_restart,
			caption: children.caption.map(Box::new),
			children: children.nodes,
		}))
	}

	fn not_child_capable(&self) -> PresentationError {
		PresentationError::NotChildCapable {
			path: self.path().to_string(),
		}
	}
}

impl<K: KeyKind> Entry<K> {
	/// Presents a key-capable entry inside a composite row.
	pub fn present_inline(
		&self,
		presented: &K::Presented,
		factory: &dyn WidgetFactory,
	) -> Result<PresentationNode, PresentationError> {
		self.present_value(presented, true, factory)?
			.ok_or_else(|| self.not_child_capable())
	}
}
