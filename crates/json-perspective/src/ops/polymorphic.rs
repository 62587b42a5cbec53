//! Operations valid on both sequences and text scalars.

use serde_json::Value;

use crate::coerce::{number_text, relative_index, relative_range, MAPPING_TEXT};
use crate::data::Data;
use crate::error::{Category, Result};
use crate::node::{NodeData, NodeId, Scalar};
use crate::ops::text::{byte_offset, char_position};
use crate::store::{mismatch, Store};

/// Sequence-or-text operations.
///
/// Probes compare by identity when they are [`Data::Node`] and by flattened
/// value otherwise. On text the probe's text form is searched as a substring.
/// A `from` offset counts back from the end when negative and is clamped at
/// zero, for sequences and text alike.
pub trait PolymorphicOps {
    /// New container (or text) holding the receiver followed by `values`.
    /// The receiver is left untouched.
    fn concat<I>(&mut self, node: NodeId, values: I) -> Result<NodeId>
    where
        I: IntoIterator,
        I::Item: Into<Data>;

    fn includes(&self, node: NodeId, probe: impl Into<Data>) -> Result<bool>;

    fn includes_from(&self, node: NodeId, probe: impl Into<Data>, from: i64) -> Result<bool>;

    fn index_of(&self, node: NodeId, probe: impl Into<Data>) -> Result<Option<usize>>;

    fn index_of_from(&self, node: NodeId, probe: impl Into<Data>, from: i64)
        -> Result<Option<usize>>;

    fn last_index_of(&self, node: NodeId, probe: impl Into<Data>) -> Result<Option<usize>>;

    /// New container (or text) of `[start, end)`; sequence children are shared.
    fn slice(&mut self, node: NodeId, start: i64, end: Option<i64>) -> Result<NodeId>;

    /// Child count of a sequence, char count of text.
    fn length(&self, node: NodeId) -> Result<usize>;
}

/// Receiver shape after the category check.
enum Target<'a> {
    Items(&'a [NodeId]),
    Text(&'a str),
}

impl Store {
    fn target(&self, node: NodeId, op: &'static str) -> Result<Target<'_>> {
        match self.node(node) {
            NodeData::Sequence(items) => Ok(Target::Items(items)),
            NodeData::Scalar(Scalar::Text(s)) => Ok(Target::Text(s)),
            other => Err(mismatch(op, Category::SequenceOrText, other.describe())),
        }
    }

    fn matches_probe(&self, child: NodeId, probe: &Data) -> bool {
        match probe {
            Data::Node(id) => child == *id,
            other => self.equals(child, other),
        }
    }

    /// Text form of a probe or a concat argument.
    fn data_text(&self, data: &Data) -> String {
        match data {
            Data::Undefined => "undefined".to_string(),
            Data::Node(id) => self.stringify(*id),
            Data::Json(value) => value_text(value),
            Data::Seq(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|d| match d {
                        Data::Undefined | Data::Json(Value::Null) => String::new(),
                        other => self.data_text(other),
                    })
                    .collect();
                parts.join(",")
            }
            Data::Map(_) => MAPPING_TEXT.to_string(),
        }
    }

    /// Searchable text of a probe: raw text or a text node's content.
    fn probe_text(&self, probe: &Data) -> Option<String> {
        match probe {
            Data::Json(Value::String(s)) => Some(s.clone()),
            Data::Node(id) => self.scalar(*id).and_then(Scalar::as_text).map(str::to_string),
            _ => None,
        }
    }

    fn position_from(
        &self,
        node: NodeId,
        probe: Data,
        from: i64,
        op: &'static str,
    ) -> Result<Option<usize>> {
        match self.target(node, op)? {
            Target::Items(items) => {
                let start = relative_index(from, items.len());
                Ok(items[start..]
                    .iter()
                    .position(|&c| self.matches_probe(c, &probe))
                    .map(|i| i + start))
            }
            Target::Text(s) => {
                let Some(needle) = self.probe_text(&probe) else {
                    return Ok(None);
                };
                let start = byte_offset(s, relative_index(from, s.chars().count()));
                Ok(s[start..]
                    .find(needle.as_str())
                    .map(|b| char_position(s, start + b)))
            }
        }
    }
}

/// Generic text form of a JSON value at the top level.
fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|v| match v {
                    Value::Null => String::new(),
                    other => value_text(other),
                })
                .collect();
            parts.join(",")
        }
        Value::Object(_) => MAPPING_TEXT.to_string(),
    }
}

impl PolymorphicOps for Store {
    fn concat<I>(&mut self, node: NodeId, values: I) -> Result<NodeId>
    where
        I: IntoIterator,
        I::Item: Into<Data>,
    {
        match self.target(node, "concat")? {
            Target::Items(items) => {
                let mut children = items.to_vec();
                for value in values {
                    let data: Data = value.into();
                    match data.into_elements() {
                        Ok(elements) => {
                            for element in elements {
                                children.push(self.wrap(element));
                            }
                        }
                        Err(single) => children.push(self.wrap(single)),
                    }
                }
                Ok(self.alloc(NodeData::Sequence(children)))
            }
            Target::Text(s) => {
                let mut out = s.to_string();
                for value in values {
                    out.push_str(&self.data_text(&value.into()));
                }
                Ok(self.alloc(NodeData::Scalar(Scalar::Text(out))))
            }
        }
    }

    fn includes(&self, node: NodeId, probe: impl Into<Data>) -> Result<bool> {
        self.includes_from(node, probe, 0)
    }

    fn includes_from(&self, node: NodeId, probe: impl Into<Data>, from: i64) -> Result<bool> {
        Ok(self.position_from(node, probe.into(), from, "includes")?.is_some())
    }

    fn index_of(&self, node: NodeId, probe: impl Into<Data>) -> Result<Option<usize>> {
        self.position_from(node, probe.into(), 0, "index_of")
    }

    fn index_of_from(
        &self,
        node: NodeId,
        probe: impl Into<Data>,
        from: i64,
    ) -> Result<Option<usize>> {
        self.position_from(node, probe.into(), from, "index_of")
    }

    fn last_index_of(&self, node: NodeId, probe: impl Into<Data>) -> Result<Option<usize>> {
        let probe = probe.into();
        match self.target(node, "last_index_of")? {
            Target::Items(items) => Ok(items.iter().rposition(|&c| self.matches_probe(c, &probe))),
            Target::Text(s) => Ok(self
                .probe_text(&probe)
                .and_then(|needle| s.rfind(needle.as_str()))
                .map(|b| char_position(s, b))),
        }
    }

    fn slice(&mut self, node: NodeId, start: i64, end: Option<i64>) -> Result<NodeId> {
        let content = match self.target(node, "slice")? {
            Target::Items(items) => {
                let (from, to) = relative_range(start, end, items.len());
                NodeData::Sequence(items[from..to].to_vec())
            }
            Target::Text(s) => {
                let (from, to) = relative_range(start, end, s.chars().count());
                let (a, b) = (byte_offset(s, from), byte_offset(s, to));
                NodeData::Scalar(Scalar::Text(s[a..b].to_string()))
            }
        };
        Ok(self.alloc(content))
    }

    fn length(&self, node: NodeId) -> Result<usize> {
        match self.target(node, "length")? {
            Target::Items(items) => Ok(items.len()),
            Target::Text(s) => Ok(s.chars().count()),
        }
    }
}
