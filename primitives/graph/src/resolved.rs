//! Resolved type descriptors.

use serde::{Deserialize, Serialize};

/// Kind of a declared (non-scalar) type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    /// Message declaration
    Message,
    /// Enum declaration
    Enum,
    /// Oneof group declaration
    Oneof,
}

/// Immutable descriptor of a resolved schema type reference.
///
/// Produced by a registry lookup; value semantics, never mutated. The same
/// logical type may be described by many equal `ResolvedType` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Dot path of the declaration inside its file, scope included
    /// (e.g. `User.Profile`)
    pub name: String,
    /// Fully package-qualified name (e.g. `myapp.User.Profile`)
    pub qualified: String,
    /// Path of the owning schema file
    pub file: String,
    /// Package of the owning file
    pub package: String,
    /// Declaration kind
    pub kind: DeclKind,
}

impl ResolvedType {
    /// Whether values of this type are reference-like in the generated
    /// surface (messages are, enums are not).
    pub fn is_pointer_like(&self) -> bool { matches!(self.kind, DeclKind::Message) }

    /// Whether proto2-style `optional` turns a field of this type into an
    /// `Option<T>` declaration. Types that are already reference-like gain
    /// nothing from the extra wrapping.
    pub fn can_be_optional(&self) -> bool { !self.is_pointer_like() }

    /// The declaration's own (unscoped) name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(self.name.as_str())
    }
}
