//! Raw input accepted by construction and by every inserting operation.

use serde_json::{Number, Value};

use crate::node::{NodeId, Scalar};

/// Plain data, possibly mixed with handles to existing nodes.
///
/// Wrapping a `Data` allocates fresh nodes for everything except
/// [`Data::Node`], which is stored as the very handle it carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Data {
    #[default]
    Undefined,
    /// Any JSON value; arrays and objects become containers.
    Json(Value),
    /// An existing node, shared rather than copied.
    Node(NodeId),
    Seq(Vec<Data>),
    Map(Vec<(String, Data)>),
}

impl Data {
    /// Elements of a raw sequence, if this is one.
    ///
    /// A `Data::Node` is never treated as a raw sequence even when it points
    /// at a sequence node.
    pub fn into_elements(self) -> Result<Vec<Data>, Data> {
        match self {
            Data::Seq(items) => Ok(items),
            Data::Json(Value::Array(items)) => Ok(items.into_iter().map(Data::Json).collect()),
            other => Err(other),
        }
    }

    /// Whether `id` appears anywhere inside this data.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Data::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<Scalar> for Data {
    fn from(scalar: Scalar) -> Self {
        match scalar.to_json() {
            Some(v) => Data::Json(v),
            None => Data::Undefined,
        }
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        Data::Json(value)
    }
}

impl From<&Value> for Data {
    fn from(value: &Value) -> Self {
        Data::Json(value.clone())
    }
}

impl From<NodeId> for Data {
    fn from(id: NodeId) -> Self {
        Data::Node(id)
    }
}

impl From<&str> for Data {
    fn from(s: &str) -> Self {
        Data::Json(Value::String(s.to_string()))
    }
}

impl From<String> for Data {
    fn from(s: String) -> Self {
        Data::Json(Value::String(s))
    }
}

impl From<bool> for Data {
    fn from(b: bool) -> Self {
        Data::Json(Value::Bool(b))
    }
}

impl From<i32> for Data {
    fn from(n: i32) -> Self {
        Data::Json(Value::from(n))
    }
}

impl From<i64> for Data {
    fn from(n: i64) -> Self {
        Data::Json(Value::from(n))
    }
}

impl From<u64> for Data {
    fn from(n: u64) -> Self {
        Data::Json(Value::from(n))
    }
}

impl From<usize> for Data {
    fn from(n: usize) -> Self {
        Data::Json(Value::from(n))
    }
}

/// Non-finite floats have no JSON form and become `null`.
impl From<f64> for Data {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(num) => Data::Json(Value::Number(num)),
            None => Data::Json(Value::Null),
        }
    }
}

impl<T: Into<Data>> From<Option<T>> for Data {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Data::Undefined, Into::into)
    }
}

impl<T: Into<Data>> From<Vec<T>> for Data {
    fn from(items: Vec<T>) -> Self {
        Data::Seq(items.into_iter().map(Into::into).collect())
    }
}

/// Navigation key: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(usize),
}

impl Key {
    /// The key as mapping text (`Index(3)` looks up `"3"`).
    pub fn to_name(&self) -> String {
        match self {
            Key::Name(name) => name.clone(),
            Key::Index(i) => i.to_string(),
        }
    }

    /// The key as a sequence index; names qualify only in canonical decimal
    /// form (`"3"`, not `"03"` or `"+3"`).
    pub fn to_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(name) => {
                let i: usize = name.parse().ok()?;
                (i.to_string() == *name).then_some(i)
            }
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}
