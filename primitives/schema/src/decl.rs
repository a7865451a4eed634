//! Declaration tree nodes.
//!
//! These structs mirror the shape of a parsed schema file after cross-file
//! resolution. Field declarations are a closed sum type so that every code
//! path dispatching on field kind is checked exhaustively at compile time.

use serde::{Deserialize, Serialize};

/// A single `name = value` option attached to a declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDecl {
    /// Option name, dot-separated (e.g. `wrapgen.json.tag_disable`)
    pub name: String,
    /// Option value, kept as the literal source text
    pub value: String,
}

/// Schema syntax level of a file.
///
/// Proto2-style files carry optional-by-default field semantics, which the
/// generated wrapper surface expresses as `Option<T>` declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    /// Optional-by-default semantics
    Proto2,
    /// Presence tracked only for message fields
    #[default]
    Proto3,
}

/// A schema source file and its top-level declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDecl {
    /// File path as referenced by imports (e.g. `myapp/user.proto`)
    pub path: String,
    /// Dot-separated package name
    pub package: String,
    /// Syntax level
    #[serde(default)]
    pub syntax: Syntax,
    /// File-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
    /// Top-level message declarations
    #[serde(default)]
    pub messages: Vec<MessageDecl>,
    /// Top-level enum declarations
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    /// Service declarations
    #[serde(default)]
    pub services: Vec<ServiceDecl>,
}

impl FileDecl {
    /// Look up a file-level option value by name.
    pub fn option(&self, name: &str) -> Option<&str> { find_option(&self.options, name) }
}

/// A message declaration, possibly nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDecl {
    /// Message name as declared
    pub name: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Nested message declarations
    #[serde(default)]
    pub messages: Vec<MessageDecl>,
    /// Nested enum declarations
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    /// Message-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// A field of a message.
///
/// The three kinds cover everything a message body can contain; map and
/// oneof are distinct kinds rather than flags so that emitters must handle
/// each shape explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldDecl {
    /// A plain (possibly repeated) field
    Plain(PlainField),
    /// A `map<K, V>` field
    Map(MapField),
    /// A oneof group
    Oneof(OneofDecl),
}

impl FieldDecl {
    /// Field (or oneof group) name as declared.
    pub fn name(&self) -> &str {
        match self {
            FieldDecl::Plain(f) => &f.name,
            FieldDecl::Map(f) => &f.name,
            FieldDecl::Oneof(f) => &f.name,
        }
    }

    /// Borrow this field as a [`FieldRef`].
    pub fn as_field_ref(&self) -> FieldRef<'_> {
        match self {
            FieldDecl::Plain(f) => FieldRef::Plain(f),
            FieldDecl::Map(f) => FieldRef::Map(f),
            FieldDecl::Oneof(f) => FieldRef::Oneof(f),
        }
    }
}

/// A plain field declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlainField {
    /// Field name as declared
    pub name: String,
    /// Referenced type name, bare or partially qualified
    pub type_name: String,
    /// Whether the field is repeated
    #[serde(default)]
    pub repeated: bool,
    /// Whether the field carries an explicit `optional` label
    #[serde(default)]
    pub optional: bool,
    /// Field-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

impl PlainField {
    /// Look up a field option value by name.
    pub fn option(&self, name: &str) -> Option<&str> { find_option(&self.options, name) }
}

/// A `map<K, V>` field declaration. Keys are always scalar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapField {
    /// Field name as declared
    pub name: String,
    /// Key type name (scalar)
    pub key_type: String,
    /// Value type name, bare or partially qualified
    pub value_type: String,
    /// Field-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// A oneof group: exactly one of the inner fields may be set at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneofDecl {
    /// Oneof group name
    pub name: String,
    /// Variant fields in declaration order
    #[serde(default)]
    pub fields: Vec<PlainField>,
    /// Oneof-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// An enum declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumDecl {
    /// Enum name as declared
    pub name: String,
    /// Constants in declaration order
    #[serde(default)]
    pub constants: Vec<EnumConstant>,
    /// Enum-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// A single enum constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Constant name as declared
    pub name: String,
    /// Assigned number
    pub number: i32,
}

/// A service declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDecl {
    /// Service name as declared
    pub name: String,
    /// RPC methods in declaration order
    #[serde(default)]
    pub rpcs: Vec<RpcDecl>,
    /// Service-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

/// A single RPC method of a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcDecl {
    /// Method name as declared
    pub name: String,
    /// Request message type name
    pub request_type: String,
    /// Response message type name
    pub response_type: String,
    /// Whether the client streams requests
    #[serde(default)]
    pub streams_request: bool,
    /// Whether the server streams responses
    #[serde(default)]
    pub streams_response: bool,
    /// Method-level options
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

impl RpcDecl {
    /// True when either direction of this RPC is streaming.
    pub fn is_streaming(&self) -> bool { self.streams_request || self.streams_response }
}

/// A borrowed view of any declaration a tag customizer can be asked about.
///
/// Oneof variant fields and message fields go through the same hook, so the
/// hook receives this view rather than a [`FieldDecl`].
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    /// A plain field
    Plain(&'a PlainField),
    /// A map field
    Map(&'a MapField),
    /// A oneof group
    Oneof(&'a OneofDecl),
}

impl FieldRef<'_> {
    /// Field name as declared.
    pub fn name(&self) -> &str {
        match self {
            FieldRef::Plain(f) => &f.name,
            FieldRef::Map(f) => &f.name,
            FieldRef::Oneof(f) => &f.name,
        }
    }

    /// Options attached to the field.
    pub fn options(&self) -> &[OptionDecl] {
        match self {
            FieldRef::Plain(f) => &f.options,
            FieldRef::Map(f) => &f.options,
            FieldRef::Oneof(f) => &f.options,
        }
    }

    /// Look up an option value by name.
    pub fn option(&self, name: &str) -> Option<&str> { find_option(self.options(), name) }
}

fn find_option<'a>(options: &'a [OptionDecl], name: &str) -> Option<&'a str> {
    options.iter().find(|o| o.name == name).map(|o| o.value.as_str())
}
