//! Scalar type lexicon.
//!
//! Scalar references are detected by name against this fixed lexicon and
//! short-circuit type resolution entirely: scope is irrelevant for scalars
//! and they never claim a registry entry.

use serde::{Deserialize, Serialize};

/// The closed set of schema scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// `double`
    Double,
    /// `float`
    Float,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `sint32`
    Sint32,
    /// `sint64`
    Sint64,
    /// `fixed32`
    Fixed32,
    /// `fixed64`
    Fixed64,
    /// `sfixed32`
    Sfixed32,
    /// `sfixed64`
    Sfixed64,
    /// `bool`
    Bool,
    /// `string`
    String,
    /// `bytes`
    Bytes,
}

impl ScalarType {
    /// Parse a type reference against the scalar lexicon.
    ///
    /// Returns `None` for anything that must go through the type registry.
    pub fn parse(name: &str) -> Option<ScalarType> {
        match name {
            "double" => Some(ScalarType::Double),
            "float" => Some(ScalarType::Float),
            "int32" => Some(ScalarType::Int32),
            "int64" => Some(ScalarType::Int64),
            "uint32" => Some(ScalarType::Uint32),
            "uint64" => Some(ScalarType::Uint64),
            "sint32" => Some(ScalarType::Sint32),
            "sint64" => Some(ScalarType::Sint64),
            "fixed32" => Some(ScalarType::Fixed32),
            "fixed64" => Some(ScalarType::Fixed64),
            "sfixed32" => Some(ScalarType::Sfixed32),
            "sfixed64" => Some(ScalarType::Sfixed64),
            "bool" => Some(ScalarType::Bool),
            "string" => Some(ScalarType::String),
            "bytes" => Some(ScalarType::Bytes),
            _ => None,
        }
    }

    /// The Rust type the scalar maps to in generated code.
    pub fn rust_type(&self) -> &'static str {
        match self {
            ScalarType::Double => "f64",
            ScalarType::Float => "f32",
            ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 => "i32",
            ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64 => "i64",
            ScalarType::Uint32 | ScalarType::Fixed32 => "u32",
            ScalarType::Uint64 | ScalarType::Fixed64 => "u64",
            ScalarType::Bool => "bool",
            ScalarType::String => "String",
            ScalarType::Bytes => "Vec<u8>",
        }
    }

    /// The schema-source spelling of the scalar.
    pub fn proto_name(&self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.proto_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_covers_lexicon() {
        for name in [
            "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64",
            "fixed32", "fixed64", "sfixed32", "sfixed64", "bool", "string", "bytes",
        ] {
            let scalar = ScalarType::parse(name).expect("lexicon entry");
            assert_eq!(scalar.proto_name(), name);
        }
    }

    #[test]
    fn test_parse_rejects_named_types() {
        assert!(ScalarType::parse("MyMessage").is_none());
        assert!(ScalarType::parse("google.protobuf.Timestamp").is_none());
        assert!(ScalarType::parse("").is_none());
    }

    #[test]
    fn test_rust_type_mapping() {
        assert_eq!(ScalarType::String.rust_type(), "String");
        assert_eq!(ScalarType::Bytes.rust_type(), "Vec<u8>");
        assert_eq!(ScalarType::Sfixed64.rust_type(), "i64");
        assert_eq!(ScalarType::Fixed32.rust_type(), "u32");
    }
}
