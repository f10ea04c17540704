/* src/presentation/mod.rs */

//! Contract with the external widget layer.
//!
//! The core never renders anything. It asks a [`WidgetFactory`] for one
//! widget per entry (and per composite slot or row) and arranges the results
//! into a tree decorated with errors and tooltips.

mod entry;

use std::fmt;

use crate::entry::AnyValue;
use crate::message::Message;

/// A widget produced by the external presentation layer.
pub trait Widget {
	/// Whether the widget can be embedded inline inside a composite row.
	fn is_child_capable(&self) -> bool {
		false
	}

	fn value(&self) -> Option<AnyValue> {
		None
	}

	fn set_value(&mut self, _value: AnyValue) -> bool {
		false
	}
}

/// Everything known about an entry when its widget is requested.
pub struct WidgetRequest<'a> {
	pub path: &'a str,
	/// Opaque translation key, resolved by the presentation layer.
	pub display_key: Option<&'a str>,
	pub type_name: &'static str,
	pub value: &'a AnyValue,
	pub errors: &'a [Message],
	pub tooltip: &'a [Message],
	/// The widget will be embedded in a composite row and must be child-capable.
	pub inline: bool,
}

pub trait WidgetFactory {
	fn build_widget(&self, request: &WidgetRequest<'_>) -> Option<Box<dyn Widget>>;
}

/// The widget of one entry, slot or row.
pub struct PresentationNode {
	pub path: String,
	pub widget: Box<dyn Widget>,
	pub errors: Vec<Message>,
	pub tooltip: Vec<Message>,
	pub requires_restart: bool,
	/// Inline summary widget, for captioned composites and map rows.
	pub caption: Option<Box<PresentationNode>>,
	pub children: Vec<PresentationNode>,
}

impl fmt::Debug for PresentationNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PresentationNode")
			.field("path", &self.path)
			.field("errors", &self.errors)
			.field("caption", &self.caption)
			.field("children", &self.children)
			.finish_non_exhaustive()
	}
}

/// Nested widgets produced by a composite kind.
#[derive(Debug, Default)]
pub struct Children {
	pub caption: Option<PresentationNode>,
	pub nodes: Vec<PresentationNode>,
}

/// Widgets of one holder, in insertion order.
#[derive(Debug)]
pub struct PresentationGroup {
	pub path: String,
	pub entries: Vec<PresentationNode>,
	pub groups: Vec<PresentationGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PresentationError {
	/// A key-capable slot did not get an inline-capable widget.
	#[error("widget for {path} is not child-capable")]
	NotChildCapable { path: String },
}
