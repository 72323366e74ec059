use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// A schema-less value tree.
///
/// Used for persisted resource specs, externally observed state and link
/// data alike. A node holds exactly one of a scalar, an ordered list or a
/// set of named fields; `Empty` means "no value". A field whose value is
/// `Empty` is treated the same as a field that is absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingNode {
    #[default]
    Empty,
    Scalar(ScalarValue),
    Items(Vec<MappingNode>),
    Fields(BTreeMap<String, MappingNode>),
}

/// Leaf values. Comparison is by value *and* type, so `Int(1)`,
/// `Float(1.0)` and `Str("1")` are all distinct.
///
/// JSON cannot hold NaN or infinities, so serializing a non-finite `Float`
/// fails rather than writing `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(#[serde(serialize_with = "serialize_finite")] f64),
    Str(String),
}

fn serialize_finite<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        return Err(serde::ser::Error::custom(format!(
            "non-finite float {value} has no JSON representation"
        )));
    }
    serializer.serialize_f64(*value)
}

impl MappingNode {
    pub fn fields<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, MappingNode)>,
    {
        Self::Fields(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = MappingNode>,
    {
        Self::Items(items.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_items(&self) -> Option<&[MappingNode]> {
        match self {
            Self::Items(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&BTreeMap<String, MappingNode>> {
        match self {
            Self::Fields(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(ScalarValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a direct child field. Returns `None` for non-object nodes.
    pub fn field(&self, name: &str) -> Option<&MappingNode> {
        self.as_fields().and_then(|f| f.get(name))
    }

    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Scalar(_) => "scalar",
            Self::Items(_) => "list",
            Self::Fields(_) => "object",
        }
    }
}

impl fmt::Display for MappingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::Value::from(self.clone());
        write!(f, "{json}")
    }
}

impl From<ScalarValue> for MappingNode {
    fn from(value: ScalarValue) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for MappingNode {
    fn from(value: &str) -> Self {
        Self::Scalar(ScalarValue::Str(value.to_string()))
    }
}

impl From<String> for MappingNode {
    fn from(value: String) -> Self {
        Self::Scalar(ScalarValue::Str(value))
    }
}

impl From<i64> for MappingNode {
    fn from(value: i64) -> Self {
        Self::Scalar(ScalarValue::Int(value))
    }
}

impl From<f64> for MappingNode {
    fn from(value: f64) -> Self {
        Self::Scalar(ScalarValue::Float(value))
    }
}

impl From<bool> for MappingNode {
    fn from(value: bool) -> Self {
        Self::Scalar(ScalarValue::Bool(value))
    }
}

impl From<serde_json::Value> for MappingNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Empty,
            Value::Bool(b) => Self::Scalar(ScalarValue::Bool(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Scalar(ScalarValue::Int(i)),
                // u64 above i64::MAX and all non-integral numbers
                None => match n.as_f64() {
                    Some(f) => Self::Scalar(ScalarValue::Float(f)),
                    None => Self::Scalar(ScalarValue::Str(n.to_string())),
                },
            },
            Value::String(s) => Self::Scalar(ScalarValue::Str(s)),
            Value::Array(items) => Self::Items(items.into_iter().map(Self::from).collect()),
            Value::Object(fields) => Self::Fields(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Non-finite floats become `null` here; use `serde_json::to_value` to get
/// an error for them instead.
impl From<MappingNode> for serde_json::Value {
    fn from(node: MappingNode) -> Self {
        use serde_json::Value;

        match node {
            MappingNode::Empty => Value::Null,
            MappingNode::Scalar(ScalarValue::Bool(b)) => Value::Bool(b),
            MappingNode::Scalar(ScalarValue::Int(i)) => Value::from(i),
            MappingNode::Scalar(ScalarValue::Float(f)) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            MappingNode::Scalar(ScalarValue::Str(s)) => Value::String(s),
            MappingNode::Items(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            MappingNode::Fields(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}
