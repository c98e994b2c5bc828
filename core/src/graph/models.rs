#![deny(missing_docs)]

//! # Graph Models
//!
//! Node types of the code graph handed to snippet renderers.
//!
//! Nodes are built through named constructors and read through accessors, so a
//! renderer can rely on the leaf/composite invariants without re-checking them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic kind of a [`CodeProperty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PropertyType {
    /// Sentinel for "no body".
    #[default]
    Default,
    /// Escaped string literal.
    String,
    /// Canonical decimal text.
    Number,
    /// `true` / `false`.
    Boolean,
    /// `null`.
    Null,
    /// `EnumType.Member` reference.
    Enum,
    /// `date-time` formatted string.
    Date,
    /// `base64url` formatted string.
    Base64Url,
    /// Raw, unparsed payload (`application/octet-stream`).
    Binary,
    /// Object with typed members.
    Object,
    /// Ordered collection.
    Array,
    /// Untyped key/value bag (e.g. `additionalData`).
    Map,
}

impl PropertyType {
    /// Scalar kinds carrying a textual value and no children.
    pub fn is_leaf(self) -> bool {
        matches!(
            self,
            PropertyType::String
                | PropertyType::Number
                | PropertyType::Boolean
                | PropertyType::Null
                | PropertyType::Enum
                | PropertyType::Date
                | PropertyType::Base64Url
        )
    }

    /// Kinds that own child nodes.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            PropertyType::Object | PropertyType::Array | PropertyType::Map
        )
    }
}

/// One node of the code graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeProperty {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(rename = "type")]
    property_type: PropertyType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<CodeProperty>,
}

impl CodeProperty {
    /// The `Default` sentinel used when there is no body.
    pub fn sentinel() -> Self {
        Self::default()
    }

    /// A scalar node. `value` is already in its serialized textual form.
    pub fn leaf(name: Option<String>, property_type: PropertyType, value: Option<String>) -> Self {
        debug_assert!(property_type.is_leaf(), "{property_type:?} is not a leaf");
        Self {
            name,
            value,
            property_type,
            children: Vec::new(),
        }
    }

    /// An `Object`, `Array` or `Map` node.
    pub fn composite(
        name: Option<String>,
        property_type: PropertyType,
        children: Vec<CodeProperty>,
    ) -> Self {
        debug_assert!(
            property_type.is_composite(),
            "{property_type:?} cannot own children"
        );
        Self {
            name,
            value: None,
            property_type,
            children,
        }
    }

    /// A `Binary` node wrapping the raw payload verbatim.
    pub fn binary(payload: impl Into<String>) -> Self {
        Self {
            name: None,
            value: Some(payload.into()),
            property_type: PropertyType::Binary,
            children: Vec::new(),
        }
    }

    /// Property name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Serialized value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Node kind.
    pub fn property_type(&self) -> PropertyType {
        self.property_type
    }

    /// Child nodes in source order.
    pub fn children(&self) -> &[CodeProperty] {
        &self.children
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&CodeProperty> {
        self.children.iter().find(|c| c.name() == Some(name))
    }
}

/// One segment of the addressed resource path (e.g. `users`, `{user-id}`,
/// `microsoft.graph.sendMail`).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathSegment(String);

impl PathSegment {
    /// Creates a segment from its raw text.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the raw segment text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the segment addresses a single member of a collection (`{id}`).
    pub fn is_collection_index(&self) -> bool {
        self.0.starts_with('{') && self.0.ends_with('}')
    }

    /// Whether the segment names a bound function or action.
    pub fn is_function(&self) -> bool {
        self.0.contains('.') || self.0.ends_with(')')
    }

    /// The bare function name: the text after the last `.`, without any call suffix.
    ///
    /// e.g. `microsoft.graph.delta()` -> `delta`
    pub fn function_name(&self) -> &str {
        let head = self.0.split('(').next().unwrap_or(self.as_str());
        head.rsplit('.').next().unwrap_or(head)
    }
}

impl fmt::Debug for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathSegment({:?})", self.0)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
