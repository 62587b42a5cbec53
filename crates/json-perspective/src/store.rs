//! The node arena: construction, flattening, navigation, in-place `set`.
//!
//! Every node lives in one `Vec<NodeData>` owned by the [`Store`]; a
//! [`NodeId`] is an index into it. Containers hold handle lists, so sharing a
//! child between two containers is just storing the same handle twice, and no
//! ownership graph has to be maintained. Nodes are never freed while the store
//! lives.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::coerce::{numbers_equal, scalar_text, MAPPING_TEXT};
use crate::data::{Data, Key};
use crate::error::{Category, Result, ViewError};
use crate::node::{Kind, NodeData, NodeId, Scalar};

/// Arena that owns every view node.
#[derive(Debug, Clone, Default)]
pub struct Store {
    nodes: Vec<NodeData>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of nodes allocated so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// # Panics
    ///
    /// Panics when the arena already holds more nodes than a [`NodeId`] can
    /// address.
    pub(crate) fn alloc(&mut self, data: NodeData) -> NodeId {
        let Ok(index) = u32::try_from(self.nodes.len()) else {
            panic!("node arena is full: {} nodes", self.nodes.len());
        };
        let id = NodeId(index);
        self.nodes.push(data);
        id
    }

    /// Raw contents of a node.
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).kind()
    }

    pub fn scalar(&self, id: NodeId) -> Option<&Scalar> {
        match self.node(id) {
            NodeData::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_undefined(&self, id: NodeId) -> bool {
        matches!(self.node(id), NodeData::Scalar(Scalar::Undefined))
    }

    /// Allocate a fresh absent value.
    pub fn undefined(&mut self) -> NodeId {
        self.alloc(NodeData::Scalar(Scalar::Undefined))
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Wrap raw data into a node tree and return its root.
    ///
    /// Wrapping an existing handle returns it unchanged, so
    /// `wrap(wrap(x)) == wrap(x)`.
    ///
    /// ```
    /// use json_perspective::Store;
    /// use serde_json::json;
    ///
    /// let mut store = Store::new();
    /// let root = store.wrap(json!({"a": [1, 2]}));
    /// assert_eq!(store.wrap(root), root);
    /// assert_eq!(store.view(root), json!({"a": [1, 2]}));
    /// ```
    pub fn wrap(&mut self, data: impl Into<Data>) -> NodeId {
        match data.into() {
            Data::Node(id) => id,
            other => {
                let content = self.build(other);
                self.alloc(content)
            }
        }
    }

    /// Content for a new node; nested raw data is allocated, handles are kept.
    fn build(&mut self, data: Data) -> NodeData {
        match data {
            Data::Undefined => NodeData::Scalar(Scalar::Undefined),
            Data::Node(id) => self.node(id).clone(),
            Data::Seq(items) => {
                NodeData::Sequence(items.into_iter().map(|d| self.wrap(d)).collect())
            }
            Data::Map(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    let child = self.wrap(value);
                    map.insert(key, child);
                }
                NodeData::Mapping(map)
            }
            Data::Json(value) => self.build_json(value),
        }
    }

    fn build_json(&mut self, value: Value) -> NodeData {
        match value {
            Value::Null => NodeData::Scalar(Scalar::Null),
            Value::Bool(b) => NodeData::Scalar(Scalar::Bool(b)),
            Value::Number(n) => NodeData::Scalar(Scalar::Number(n)),
            Value::String(s) => NodeData::Scalar(Scalar::Text(s)),
            Value::Array(items) => NodeData::Sequence(
                items
                    .into_iter()
                    .map(|v| {
                        let content = self.build_json(v);
                        self.alloc(content)
                    })
                    .collect(),
            ),
            Value::Object(entries) => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (key, v) in entries {
                    let content = self.build_json(v);
                    map.insert(key, self.alloc(content));
                }
                NodeData::Mapping(map)
            }
        }
    }

    /// Replace the content of `id` in place and return `id`.
    ///
    /// Every handle to the node observes the new content. Passing another
    /// node's handle adopts that node's content shallowly (its children are
    /// shared). When `data` reaches `id`, directly or through the children of
    /// a node it names, those occurrences resolve to a fresh node holding the
    /// previous content, and the nodes on the way down to it are copied. The
    /// tree stays acyclic.
    pub fn set(&mut self, id: NodeId, data: impl Into<Data>) -> NodeId {
        let mut data = data.into();
        if data == Data::Node(id) {
            return id;
        }
        if self.data_reaches(&data, id) {
            let previous = std::mem::take(self.node_mut(id));
            let moved = self.alloc(previous);
            data = self.detach_data(data, id, moved, &mut HashMap::new());
        }
        let content = self.build(data);
        let before = self.node(id).kind();
        debug!(node = %id, %before, after = %content.kind(), "set");
        *self.node_mut(id) = content;
        id
    }

    /// Whether `target` is `from` or one of its descendants.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if seen.insert(id) {
                stack.extend(self.node(id).children());
            }
        }
        false
    }

    fn data_reaches(&self, data: &Data, target: NodeId) -> bool {
        match data {
            Data::Node(id) => self.reaches(*id, target),
            Data::Seq(items) => items.iter().any(|d| self.data_reaches(d, target)),
            Data::Map(entries) => entries.iter().any(|(_, d)| self.data_reaches(d, target)),
            Data::Undefined | Data::Json(_) => false,
        }
    }

    /// `id` with every path down to `from` copied and `from` swapped for `to`.
    /// Subtrees that never reach `from` stay shared.
    fn detach(
        &mut self,
        id: NodeId,
        from: NodeId,
        to: NodeId,
        memo: &mut HashMap<NodeId, NodeId>,
    ) -> NodeId {
        if id == from {
            return to;
        }
        if let Some(&done) = memo.get(&id) {
            return done;
        }
        let replaced = match self.node(id).clone() {
            NodeData::Scalar(_) => id,
            NodeData::Sequence(items) => {
                let mapped: Vec<NodeId> =
                    items.iter().map(|&c| self.detach(c, from, to, memo)).collect();
                if mapped == items {
                    id
                } else {
                    self.alloc(NodeData::Sequence(mapped))
                }
            }
            NodeData::Mapping(entries) => {
                let mapped: IndexMap<String, NodeId> = entries
                    .iter()
                    .map(|(k, &c)| (k.clone(), self.detach(c, from, to, memo)))
                    .collect();
                if mapped.values().eq(entries.values()) {
                    id
                } else {
                    self.alloc(NodeData::Mapping(mapped))
                }
            }
        };
        memo.insert(id, replaced);
        replaced
    }

    fn detach_data(
        &mut self,
        data: Data,
        from: NodeId,
        to: NodeId,
        memo: &mut HashMap<NodeId, NodeId>,
    ) -> Data {
        match data {
            Data::Node(id) => Data::Node(self.detach(id, from, to, memo)),
            Data::Seq(items) => Data::Seq(
                items
                    .into_iter()
                    .map(|d| self.detach_data(d, from, to, memo))
                    .collect(),
            ),
            Data::Map(entries) => Data::Map(
                entries
                    .into_iter()
                    .map(|(k, d)| (k, self.detach_data(d, from, to, memo)))
                    .collect(),
            ),
            other => other,
        }
    }

    // ── Navigation ────────────────────────────────────────────────────────

    /// Child handle under `key`, or a fresh undefined node when absent.
    ///
    /// The returned handle is the child itself, not a copy. An absent child
    /// allocates a new undefined node on every call, so read-only lookups
    /// should go through [`Store::child`].
    pub fn get(&mut self, id: NodeId, key: impl Into<Key>) -> Result<NodeId> {
        match self.child(id, key)? {
            Some(child) => Ok(child),
            None => Ok(self.undefined()),
        }
    }

    /// Child handle under `key`, `None` when absent.
    pub fn child(&self, id: NodeId, key: impl Into<Key>) -> Result<Option<NodeId>> {
        let key = key.into();
        match self.node(id) {
            NodeData::Sequence(items) => {
                Ok(key.to_index().and_then(|i| items.get(i).copied()))
            }
            NodeData::Mapping(entries) => Ok(entries.get(&key.to_name()).copied()),
            other => Err(mismatch("get", Category::Container, other.describe())),
        }
    }

    /// Follow a path of keys from `id`. Absent steps yield a fresh undefined
    /// node; navigating through a scalar fails.
    pub fn get_in<K: Into<Key>>(
        &mut self,
        id: NodeId,
        path: impl IntoIterator<Item = K>,
    ) -> Result<NodeId> {
        let mut current = id;
        for key in path {
            current = self.get(current, key)?;
        }
        Ok(current)
    }

    // ── Flattening ────────────────────────────────────────────────────────

    /// Flatten a node back into plain data.
    ///
    /// Returns `None` for an undefined node. Nested undefined values become
    /// `null` inside sequences and are left out of mappings.
    pub fn unwrap(&self, id: NodeId) -> Option<Value> {
        match self.node(id) {
            NodeData::Scalar(s) => s.to_json(),
            NodeData::Sequence(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|&c| self.unwrap(c).unwrap_or(Value::Null))
                    .collect(),
            )),
            NodeData::Mapping(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, &c) in entries {
                    if let Some(v) = self.unwrap(c) {
                        map.insert(key.clone(), v);
                    }
                }
                Some(Value::Object(map))
            }
        }
    }

    /// [`unwrap`](Self::unwrap) with a top-level undefined rendered as `null`.
    pub fn view(&self, id: NodeId) -> Value {
        self.unwrap(id).unwrap_or(Value::Null)
    }

    /// Text form of the flattened value.
    ///
    /// ```
    /// use json_perspective::Store;
    /// use serde_json::json;
    ///
    /// let mut store = Store::new();
    /// let arr = store.wrap(json!([3, null, [4, 5]]));
    /// assert_eq!(store.stringify(arr), "3,,4,5");
    /// let obj = store.wrap(json!({"b": 1}));
    /// assert_eq!(store.stringify(obj), "[object Object]");
    /// ```
    pub fn stringify(&self, id: NodeId) -> String {
        match self.node(id) {
            NodeData::Scalar(s) => scalar_text(s),
            NodeData::Sequence(items) => self.sequence_text(items),
            NodeData::Mapping(_) => MAPPING_TEXT.to_string(),
        }
    }

    fn sequence_text(&self, items: &[NodeId]) -> String {
        let parts: Vec<String> = items
            .iter()
            .map(|&c| match self.node(c) {
                NodeData::Scalar(Scalar::Undefined | Scalar::Null) => String::new(),
                _ => self.stringify(c),
            })
            .collect();
        parts.join(",")
    }

    // ── Comparison ────────────────────────────────────────────────────────

    /// Structural equality between a node and a probe value.
    ///
    /// Handles inside the probe are compared by their flattened content.
    pub fn equals(&self, id: NodeId, probe: &Data) -> bool {
        match (self.node(id), probe) {
            (_, Data::Node(other)) => self.same_value(id, *other),
            (_, Data::Json(value)) => self.equals_json(id, value),
            (NodeData::Scalar(s), Data::Undefined) => s.is_undefined(),
            (NodeData::Sequence(items), Data::Seq(probes)) => {
                items.len() == probes.len()
                    && items.iter().zip(probes).all(|(&c, p)| self.equals(c, p))
            }
            (NodeData::Mapping(entries), Data::Map(probes)) => {
                entries.len() == probes.len()
                    && probes
                        .iter()
                        .all(|(k, p)| entries.get(k).is_some_and(|&c| self.equals(c, p)))
            }
            _ => false,
        }
    }

    fn equals_json(&self, id: NodeId, value: &Value) -> bool {
        match (self.node(id), value) {
            (NodeData::Scalar(s), v) => scalar_equals(s, v),
            (NodeData::Sequence(items), Value::Array(values)) => {
                items.len() == values.len()
                    && items.iter().zip(values).all(|(&c, v)| self.equals_json(c, v))
            }
            (NodeData::Mapping(entries), Value::Object(values)) => {
                entries.len() == values.len()
                    && values
                        .iter()
                        .all(|(k, v)| entries.get(k).is_some_and(|&c| self.equals_json(c, v)))
            }
            _ => false,
        }
    }

    /// Structural equality between two nodes.
    pub fn same_value(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        match (self.node(a), self.node(b)) {
            (NodeData::Scalar(x), NodeData::Scalar(y)) => match (x, y) {
                (Scalar::Number(m), Scalar::Number(n)) => numbers_equal(m, n),
                _ => x == y,
            },
            (NodeData::Sequence(xs), NodeData::Sequence(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(&x, &y)| self.same_value(x, y))
            }
            (NodeData::Mapping(xs), NodeData::Mapping(ys)) => {
                xs.len() == ys.len()
                    && xs
                        .iter()
                        .all(|(k, &x)| ys.get(k).is_some_and(|&y| self.same_value(x, y)))
            }
            _ => false,
        }
    }

    // ── Category checks ───────────────────────────────────────────────────

    pub(crate) fn items(&self, id: NodeId, op: &'static str) -> Result<&[NodeId]> {
        match self.node(id) {
            NodeData::Sequence(items) => Ok(items),
            other => Err(mismatch(op, Category::Sequence, other.describe())),
        }
    }

    pub(crate) fn items_mut(&mut self, id: NodeId, op: &'static str) -> Result<&mut Vec<NodeId>> {
        match self.node_mut(id) {
            NodeData::Sequence(items) => Ok(items),
            other => Err(mismatch(op, Category::Sequence, other.describe())),
        }
    }

    pub(crate) fn text(&self, id: NodeId, op: &'static str) -> Result<&str> {
        match self.node(id) {
            NodeData::Scalar(Scalar::Text(s)) => Ok(s),
            other => Err(mismatch(op, Category::Text, other.describe())),
        }
    }
}

/// Build a category error, logging it at debug level.
pub(crate) fn mismatch(op: &'static str, expected: Category, actual: &'static str) -> ViewError {
    debug!(op, %expected, actual, "category mismatch");
    ViewError::CategoryMismatch {
        op,
        expected,
        actual,
    }
}

fn scalar_equals(scalar: &Scalar, value: &Value) -> bool {
    match (scalar, value) {
        (Scalar::Null, Value::Null) => true,
        (Scalar::Bool(a), Value::Bool(b)) => a == b,
        (Scalar::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Scalar::Text(a), Value::String(b)) => a == b,
        _ => false,
    }
}
