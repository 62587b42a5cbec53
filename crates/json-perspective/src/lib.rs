//! Reference-preserving views over JSON-like data.
//!
//! Raw data is wrapped into a tree of view nodes owned by a [`Store`]. Nodes
//! are addressed by [`NodeId`] handles:
//!
//! - navigation returns the child's own handle, so mutating it through one
//!   view is visible through every other view holding the same handle;
//! - derivations (`filter`, `slice`, `sort`, `entries`, `concat`, the removed
//!   part of `splice`) build new containers whose children are handles to the
//!   source's children, never copies.
//!
//! # Example
//!
//! ```
//! use json_perspective::{create_store, SequenceOps};
//! use serde_json::json;
//!
//! let (mut store, root) = create_store(json!({"d": [3, 4, 5, 6]}));
//! let d = store.get(root, "d").unwrap();
//!
//! let odd = store
//!     .filter(d, |s, n, _| s.view(n).as_i64().unwrap_or(0) % 2 == 1)
//!     .unwrap();
//! let three = store.get(odd, 0usize).unwrap();
//! store.set(three, "changed");
//!
//! assert_eq!(store.view(root), json!({"d": ["changed", 4, 5, 6]}));
//! ```

pub mod coerce;
pub mod data;
pub mod error;
pub mod node;
pub mod ops;
pub mod store;

pub use data::{Data, Key};
pub use error::{Category, Result, ViewError};
pub use node::{Kind, NodeData, NodeId, Scalar};
pub use ops::{Children, PolymorphicOps, SequenceOps, TextOps};
pub use regex::Regex;
pub use store::Store;

/// Create a store and wrap `data` as its root.
pub fn create_store(data: impl Into<Data>) -> (Store, NodeId) {
    let mut store = Store::new();
    let root = store.wrap(data);
    (store, root)
}
