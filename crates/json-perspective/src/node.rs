//! View node representation.
//!
//! # Node shapes
//!
//! | Rust variant          | Holds                                   |
//! |-----------------------|-----------------------------------------|
//! | `NodeData::Scalar`    | one primitive, including `undefined`    |
//! | `NodeData::Sequence`  | ordered list of child handles           |
//! | `NodeData::Mapping`   | insertion-ordered key → child handle    |
//!
//! Containers never hold their children inline; they hold [`NodeId`] handles
//! into the owning [`Store`](crate::Store). Two containers may hold the same
//! handle, which is how derived views share elements with their source.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Number, Value};

/// Stable handle to a node inside a [`Store`](crate::Store).
///
/// Equality of handles is node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The shape tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Scalar => write!(f, "scalar"),
            Kind::Sequence => write!(f, "sequence"),
            Kind::Mapping => write!(f, "mapping"),
        }
    }
}

/// A primitive value held by a scalar node.
///
/// `Undefined` is the explicit absent value: it is what navigation returns
/// for a missing key and what an empty store is created with.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Scalar::Undefined)
    }

    /// JSON form of the scalar; `None` for `Undefined`.
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Scalar::Undefined => None,
            Scalar::Null => Some(Value::Null),
            Scalar::Bool(b) => Some(Value::Bool(*b)),
            Scalar::Number(n) => Some(Value::Number(n.clone())),
            Scalar::Text(s) => Some(Value::String(s.clone())),
        }
    }

    /// Short name of the primitive type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Undefined => "undefined",
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Number(_) => "number",
            Scalar::Text(_) => "text",
        }
    }
}

/// Contents of one arena slot.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Scalar(Scalar),
    Sequence(Vec<NodeId>),
    Mapping(IndexMap<String, NodeId>),
}

impl Default for NodeData {
    fn default() -> Self {
        NodeData::Scalar(Scalar::Undefined)
    }
}

impl NodeData {
    pub fn kind(&self) -> Kind {
        match self {
            NodeData::Scalar(_) => Kind::Scalar,
            NodeData::Sequence(_) => Kind::Sequence,
            NodeData::Mapping(_) => Kind::Mapping,
        }
    }

    /// The observed shape as reported by category errors: `sequence`,
    /// `mapping`, or the scalar's primitive type.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeData::Scalar(s) => s.type_name(),
            NodeData::Sequence(_) => "sequence",
            NodeData::Mapping(_) => "mapping",
        }
    }

    /// Handles of the immediate children, in order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeData::Scalar(_) => Vec::new(),
            NodeData::Sequence(items) => items.clone(),
            NodeData::Mapping(entries) => entries.values().copied().collect(),
        }
    }
}
