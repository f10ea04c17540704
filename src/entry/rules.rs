/* src/entry/rules.rs */

use std::sync::Arc;

use crate::message::Message;

pub type ErrorRule<T> = Arc<dyn Fn(&T) -> Option<Message> + Send + Sync>;
pub type TooltipRule<T> = Arc<dyn Fn(&T) -> Vec<Message> + Send + Sync>;

/// User-supplied validation and tooltip rules of one entry.
pub(crate) struct Rules<V, G> {
	pub(crate) error: Option<ErrorRule<V>>,
	pub(crate) presentation_error: Option<ErrorRule<G>>,
	pub(crate) tooltip: Option<TooltipRule<V>>,
}

impl<V: 'static, G: 'static> Rules<V, G> {
	pub(crate) fn error(&self, value: &V) -> Option<Message> {
		self.error.as_ref().and_then(|rule| rule(value))
	}

	pub(crate) fn presentation_error(&self, presented: &G) -> Option<Message> {
		self.presentation_error.as_ref().and_then(|rule| rule(presented))
	}

	pub(crate) fn tooltip(&self, value: &V) -> Vec<Message> {
		self.tooltip.as_ref().map(|rule| rule(value)).unwrap_or_default()
	}
}

/// Chains `next` after `previous`; the first message wins.
pub(crate) fn chain<T: 'static>(previous: Option<ErrorRule<T>>, next: ErrorRule<T>) -> ErrorRule<T> {
	match previous {
		Some(previous) => Arc::new(move |value: &T| previous(value).or_else(|| next(value))),
		None => next,
	}
}

impl<V, G> Clone for Rules<V, G> {
	fn clone(&self) -> Self {
		Self {
			error: self.error.clone(),
			presentation_error: self.presentation_error.clone(),
			tooltip: self.tooltip.clone(),
		}
	}
}

impl<V, G> Default for Rules<V, G> {
	fn default() -> Self {
		Self {
			error: None,
			presentation_error: None,
			tooltip: None,
		}
	}
}
