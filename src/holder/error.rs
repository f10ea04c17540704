/* src/holder/error.rs */

use std::fmt;

use crate::entry::BackingFailure;

/// Lifecycle step that moves values across backing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Commit,
	Bake,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Phase::Commit => f.write_str("commit"),
			Phase::Bake => f.write_str("bake"),
		}
	}
}

fn join(failures: &[BackingFailure]) -> String {
	failures
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HolderError {
	/// Every backing failure of one commit or bake call.
	#[error("{phase} failed: {}", join(.failures))]
	Backing {
		phase: Phase,
		failures: Vec<BackingFailure>,
	},
}
