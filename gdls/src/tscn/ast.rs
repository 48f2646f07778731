// Copyright (C) 2024 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::Display;

use thiserror::Error;

use crate::SourceRange;

/// A parsed TSCN or TRES document.
#[derive(Debug, Clone, Default)]
pub struct TscnDocument {
    pub descriptor: Option<SceneDescriptor>,
    pub ext_resources: Vec<ExtResource>,
    pub sub_resources: Vec<SubResource>,
    pub nodes: Vec<SceneNode>,
    pub connections: Vec<Connection>,
    pub comments: Vec<TscnComment>,
    pub errors: Vec<TscnParseError>,
}

/// The file descriptor section, `[gd_scene ...]` or `[gd_resource ...]`.
#[derive(Debug, Clone)]
pub struct SceneDescriptor {
    pub range: SourceRange,
    /// `"gd_scene"` or `"gd_resource"`.
    pub kind: String,
    pub load_steps: Option<i64>,
    pub format: i64,
    pub uid: String,
    /// Only set for `gd_resource` files.
    pub resource_type: String,
}

/// An `[ext_resource ...]` section.
#[derive(Debug, Clone, Default)]
pub struct ExtResource {
    pub range: SourceRange,
    pub resource_type: String,
    pub uid: String,
    pub path: String,
    /// Range of the quoted path literal, including both quote characters.
    pub path_range: SourceRange,
    pub id: String,
}

/// A `[sub_resource ...]` section with its trailing properties.
#[derive(Debug, Clone, Default)]
pub struct SubResource {
    pub range: SourceRange,
    pub resource_type: String,
    pub id: String,
    pub properties: Vec<Property>,
}

/// A `[node ...]` section with its trailing properties.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub range: SourceRange,
    pub name: String,
    /// Empty for instanced nodes.
    pub node_type: String,
    /// Empty for the root node, `"."` for direct children of the root.
    pub parent: String,
    pub instance: Option<TscnValue>,
    pub instance_placeholder: String,
    pub owner: String,
    pub index: Option<i64>,
    pub groups: Vec<String>,
    pub properties: Vec<Property>,
}

impl SceneNode {
    /// The node's own path, as other nodes and connections refer to it:
    /// the root is the empty path, its direct children are their name, and
    /// deeper nodes are `parent + "/" + name`.
    #[must_use]
    pub fn path(&self) -> String {
        match self.parent.as_str() {
            "" => String::new(),
            "." => self.name.clone(),
            parent => format!("{parent}/{}", self.name),
        }
    }
}

/// A `[connection ...]` section.
#[derive(Debug, Clone, Default)]
pub struct Connection {
    pub range: SourceRange,
    pub signal: String,
    pub from: String,
    pub to: String,
    pub method: String,
    pub flags: Option<i64>,
    pub binds: Vec<TscnValue>,
}

/// A `key = value` pair under a section header.
#[derive(Debug, Clone)]
pub struct Property {
    pub range: SourceRange,
    /// May contain `/` segments, e.g. `bones/0/position`.
    pub key: String,
    pub key_range: SourceRange,
    pub value: TscnValue,
}

/// A `;` comment line, text stored without the leading `;`.
#[derive(Debug, Clone)]
pub struct TscnComment {
    pub range: SourceRange,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TscnParseError {
    pub range: SourceRange,
    pub kind: TscnParseErrorKind,
}

impl TscnParseError {
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for TscnParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.kind.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TscnParseErrorKind {
    #[error("unexpected token: {token}")]
    UnexpectedToken { token: String },

    #[error("expected section type after '['")]
    ExpectedSectionType,

    #[error("unknown section type: {name}")]
    UnknownSectionType { name: String },

    #[error("expected '=' after key")]
    ExpectedEqualsAfterKey,

    #[error("expected '=' after property key")]
    ExpectedEqualsAfterPropertyKey,

    #[error("expected string or identifier as dictionary key")]
    ExpectedDictionaryKey,

    #[error("expected ':' after dictionary key")]
    ExpectedColonAfterDictionaryKey,
}

/// A structured TSCN value.
#[derive(Debug, Clone, PartialEq)]
pub enum TscnValue {
    String(StringValue),
    Number(NumberValue),
    Bool(BoolValue),
    Null(NullValue),
    Array(ArrayValue),
    Dict(DictValue),
    Ident(IdentValue),
    Typed(TypedValue),
    ResourceRef(ResourceRef),
}

impl TscnValue {
    #[must_use]
    pub fn range(&self) -> SourceRange {
        match self {
            Self::String(v) => v.range,
            Self::Number(v) => v.range,
            Self::Bool(v) => v.range,
            Self::Null(v) => v.range,
            Self::Array(v) => v.range,
            Self::Dict(v) => v.range,
            Self::Ident(v) => v.range,
            Self::Typed(v) => v.range,
            Self::ResourceRef(v) => v.range,
        }
    }

    /// A short human-readable type name, used by hovers.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::String(..) => "String",
            Self::Number(v) => if v.is_int { "int" } else { "float" },
            Self::Bool(..) => "bool",
            Self::Null(..) => "null",
            Self::Array(..) => "Array",
            Self::Dict(..) => "Dictionary",
            Self::Ident(..) => "Identifier",
            Self::Typed(v) => &v.type_name,
            Self::ResourceRef(v) => v.ref_type.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringValue {
    pub range: SourceRange,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberValue {
    pub range: SourceRange,
    pub value: f64,
    /// True iff the raw form has no `.`, `e` or `E` and is not inf/nan.
    pub is_int: bool,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolValue {
    pub range: SourceRange,
    pub value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NullValue {
    pub range: SourceRange,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub range: SourceRange,
    pub values: Vec<TscnValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictValue {
    pub range: SourceRange,
    pub entries: Vec<DictEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    pub range: SourceRange,
    pub key: TscnValue,
    pub value: TscnValue,
}

/// An unquoted identifier used as a value.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentValue {
    pub range: SourceRange,
    pub name: String,
}

/// A typed constructor value like `Vector3(1, 2, 3)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub range: SourceRange,
    pub type_name: String,
    pub type_range: SourceRange,
    pub arguments: Vec<TscnValue>,
}

/// The kind of section a `ResourceRef` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRefKind {
    ExtResource,
    SubResource,
}

impl ResourceRefKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExtResource => "ExtResource",
            Self::SubResource => "SubResource",
        }
    }
}

impl Display for ResourceRefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `ExtResource("id")` or `SubResource("id")` reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRef {
    pub range: SourceRange,
    pub ref_type: ResourceRefKind,
    pub id: String,
    pub id_range: SourceRange,
}
