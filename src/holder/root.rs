/* src/holder/root.rs */

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{EntryHolder, Registration, registry};
use crate::backend::{Backend, MemoryBackend};
use crate::entry::{BuildError, validate_name};

/// Side of the application a root configures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootKind {
	Client,
	#[default]
	Common,
	Server,
}

impl fmt::Display for RootKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RootKind::Client => f.write_str("client"),
			RootKind::Common => f.write_str("common"),
			RootKind::Server => f.write_str("server"),
		}
	}
}

/// Registry key of a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootId {
	pub owner: String,
	pub kind: RootKind,
}

impl fmt::Display for RootId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}-{}", self.owner, self.kind)
	}
}

/// The top holder of a tree, registered once per owner and kind.
///
/// Dereferences to its [`EntryHolder`]. Dropping the root releases its
/// registration.
pub struct ConfigRoot {
	holder: EntryHolder,
	registration: Registration,
}

impl ConfigRoot {
	pub fn builder() -> ConfigRootBuilder {
		ConfigRootBuilder::new()
	}

	pub fn id(&self) -> &RootId {
		self.registration.id()
	}

	pub fn kind(&self) -> RootKind {
		self.id().kind
	}
}

impl Deref for ConfigRoot {
	type Target = EntryHolder;

	fn deref(&self) -> &EntryHolder {
		&self.holder
	}
}

impl DerefMut for ConfigRoot {
	fn deref_mut(&mut self) -> &mut EntryHolder {
		&mut self.holder
	}
}

impl fmt::Debug for ConfigRoot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConfigRoot")
			.field("id", self.id())
			.field("paths", &self.holder.paths(true))
			.finish()
	}
}

/// Builder for [`ConfigRoot`].
#[derive(Default)]
pub struct ConfigRootBuilder {
	owner: Option<String>,
	kind: RootKind,
	backend: Option<Arc<dyn Backend>>,
}

impl ConfigRootBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn owner(mut self, owner: impl Into<String>) -> Self {
		self.owner = Some(owner.into());
		self
	}

	pub fn kind(mut self, kind: RootKind) -> Self {
		self.kind = kind;
		self
	}

	/// Store for persisted values. Defaults to a fresh [`MemoryBackend`].
	pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
		self.backend = Some(backend);
		self
	}

	pub fn build(self) -> Result<ConfigRoot, BuildError> {
		let owner = self
			.owner
			.ok_or_else(|| BuildError::Builder("owner is required".to_string()))?;
		validate_name(&owner)?;
		let backend: Arc<dyn Backend> = match self.backend {
			Some(backend) => backend,
			None => Arc::new(MemoryBackend::new()),
		};

		let registration = registry().register(RootId {
			owner: owner.clone(),
			kind: self.kind,
		})?;

		Ok(ConfigRoot {
			holder: EntryHolder::root(owner, backend),
			registration,
		})
	}
}
