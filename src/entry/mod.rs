/* src/entry/mod.rs */

//! The entry contract, its builder and the type-erased views over both.

mod any;
mod backing;
mod base;
mod builder;
mod dirty;
mod error;
mod kind;
mod meta;
mod policy;
mod rules;

pub use any::{AnyBuilder, AnyEntry, AnyValue, assign};
pub use backing::{Backing, BackingError, BackingFailure, SharedBacking};
pub use base::{Entry, SlotProvider};
pub use builder::{EntryBuilder, SEPARATOR};
pub use dirty::DirtyNode;
pub use error::{BuildError, EntryError};
pub use kind::{EntryKind, KeyKind, KindBuilder, PresentedOf, Value, ValueOf};
pub use meta::EntryMeta;
pub use policy::Persistence;
pub use rules::{ErrorRule, TooltipRule};

pub(crate) use builder::validate_name;
