/* src/lib.rs */

//! Typed configuration entries arranged in a tree.
//!
//! Every entry moves its value between three forms: the domain value handed
//! to user code, the persisted form stored by a backend and the presented
//! form edited by a widget.
//!
//! - **codec**: the fallback tagged format (`Tag`) and its text encoding.
//! - **backend**: the persisted-value store entries read and write through.
//! - **entry**: the entry contract, its copy-on-write builder and erased views.
//! - **kinds**: scalar kinds plus list, set, map, pair, triple, bean and captioned composites.
//! - **holder**: the holder tree, detached holders and registered roots.
//! - **presentation**: the widget factory contract and the presentation tree.
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `logging`: Logs through the `log` facade (default).
//! - `postcard`: Binary encoding of `Tag`.
//!
//! ## Basic Usage
//!
//! ```
//! use trellis::holder::ConfigRoot;
//! use trellis::kinds::{int, string};
//!
//! let mut root = ConfigRoot::builder().owner("doc_basic").build()?;
//! root.add("name", &string("guest").non_empty())?;
//! root.group("net")?.add("port", &int(8080).range(1, 65535))?;
//!
//! root.set("net.port", 9000_i32)?;
//! assert_eq!(root.get::<i32>("net.port")?, 9000);
//! assert!(root.is_dirty());
//! # Ok::<(), trellis::Error>(())
//! ```

pub mod backend;
pub mod codec;
pub mod entry;
pub mod error;
pub mod holder;
pub mod kinds;
pub mod message;
pub mod presentation;

pub use codec::Tag;
pub use entry::{Entry, EntryBuilder, EntryKind, KeyKind};
pub use error::{Error, Result};
pub use holder::{ConfigRoot, EntryHolder, RootKind};
pub use message::Message;
