//! The schema tree shared by inference, assembly, validation and rendering.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered child properties of an object node.
pub type Properties = IndexMap<String, SchemaNode>;

/// Primitive schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// A string value.
    String,
    /// A whole number.
    Integer,
    /// Any number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A mapping with named properties.
    Object,
    /// A list.
    Array,
}

impl SchemaType {
    /// Returns true for `integer` and `number`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Number)
    }

    /// Returns true if `value` is an instance of this type.
    ///
    /// # Examples
    ///
    /// ```
    /// use heimdall_config::schema::SchemaType;
    /// use serde_json::json;
    ///
    /// assert!(SchemaType::Integer.matches(&json!(3)));
    /// assert!(!SchemaType::Integer.matches(&json!(3.5)));
    /// assert!(SchemaType::Number.matches(&json!(3)));
    /// ```
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

/// The typed, constrained description of one configuration property.
///
/// An object node always carries a (possibly empty) property map; any other
/// node never does. The map is only reachable through accessors so the
/// invariant holds for every node, including deserialized ones.
///
/// # Examples
///
/// ```
/// use heimdall_config::schema::{SchemaNode, SchemaType};
///
/// let mut bar = SchemaNode::new(SchemaType::Object);
/// bar.insert_property("height", SchemaNode::new(SchemaType::Integer));
/// assert_eq!(bar.properties().unwrap().len(), 1);
///
/// let height = SchemaNode::new(SchemaType::Integer);
/// assert!(height.properties().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemaNodeRepr", into = "SchemaNodeRepr")]
pub struct SchemaNode {
    /// The node's type.
    pub schema_type: SchemaType,
    /// Default value, when one could be inferred.
    pub default: Option<Value>,
    /// Inclusive lower bound for numeric values.
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numeric values.
    pub maximum: Option<f64>,
    /// Allowed values.
    pub enum_values: Option<Vec<Value>>,
    /// Regular expression string values must match.
    pub pattern: Option<String>,
    /// Format hint such as `color`.
    pub format: Option<String>,
    /// Human-readable description.
    pub description: Option<String>,
    properties: Option<Properties>,
}

impl SchemaNode {
    /// Creates an unconstrained node of the given type.
    #[must_use]
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            default: None,
            minimum: None,
            maximum: None,
            enum_values: None,
            pattern: None,
            format: None,
            description: None,
            properties: (schema_type == SchemaType::Object).then(Properties::new),
        }
    }

    /// Creates an object node from an existing property map.
    #[must_use]
    pub fn object(properties: Properties) -> Self {
        let mut node = Self::new(SchemaType::Object);
        node.properties = Some(properties);
        node
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the pattern constraint.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the format hint.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets both numeric bounds.
    #[must_use]
    pub const fn with_range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// Child properties; `None` unless this is an object node.
    #[must_use]
    pub const fn properties(&self) -> Option<&Properties> {
        self.properties.as_ref()
    }

    /// Mutable child properties; `None` unless this is an object node.
    pub fn properties_mut(&mut self) -> Option<&mut Properties> {
        self.properties.as_mut()
    }

    /// Adds a child property, returning false if this is not an object node.
    pub fn insert_property(&mut self, name: impl Into<String>, node: SchemaNode) -> bool {
        match self.properties.as_mut() {
            Some(properties) => {
                properties.insert(name.into(), node);
                true
            }
            None => false,
        }
    }

    /// Looks up a descendant by dotted path (`"bar.workspaces.shown"`).
    #[must_use]
    pub fn lookup(&self, dotted_path: &str) -> Option<&SchemaNode> {
        dotted_path
            .split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| node.properties()?.get(segment))
    }
}

/// Wire shape of a node, using JSON Schema keyword names.
#[derive(Serialize, Deserialize)]
struct SchemaNodeRepr {
    #[serde(rename = "type")]
    schema_type: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    maximum: Option<f64>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<Properties>,
}

impl TryFrom<SchemaNodeRepr> for SchemaNode {
    type Error = String;

    fn try_from(repr: SchemaNodeRepr) -> Result<Self, Self::Error> {
        let properties = match (repr.schema_type, repr.properties) {
            (SchemaType::Object, properties) => Some(properties.unwrap_or_default()),
            (_, None) => None,
            (other, Some(_)) => {
                return Err(format!("a node of type '{other}' cannot have properties"));
            }
        };

        Ok(Self {
            schema_type: repr.schema_type,
            default: repr.default,
            minimum: repr.minimum,
            maximum: repr.maximum,
            enum_values: repr.enum_values,
            pattern: repr.pattern,
            format: repr.format,
            description: repr.description,
            properties,
        })
    }
}

impl From<SchemaNode> for SchemaNodeRepr {
    fn from(node: SchemaNode) -> Self {
        Self {
            schema_type: node.schema_type,
            description: node.description,
            format: node.format,
            pattern: node.pattern,
            default: node.default,
            minimum: node.minimum,
            maximum: node.maximum,
            enum_values: node.enum_values,
            properties: node.properties,
        }
    }
}
