#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Schema declaration nodes for the wrapgen compiler.
//!
//! This crate defines the declaration tree a resolved schema graph is made
//! of: files, messages, enums, oneofs, fields, maps and services, plus the
//! options attached to each of them. The tree is produced by an upstream
//! schema front end and consumed read-only by code generation; every node
//! here is plain serde-backed data with no behavior beyond accessors.
//!
//! The scalar type lexicon lives in [`scalar`] and is deliberately separate
//! from the declaration tree: scalar references never reach the type
//! registry.

pub mod decl;
pub mod scalar;

pub use decl::{
    EnumConstant, EnumDecl, FieldDecl, FieldRef, FileDecl, MapField, MessageDecl, OneofDecl,
    OptionDecl, PlainField, RpcDecl, ServiceDecl, Syntax,
};
pub use scalar::ScalarType;
