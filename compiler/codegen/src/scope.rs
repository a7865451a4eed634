//! Scope-aware type resolution.
//!
//! Maps a bare or partially-qualified type reference, as written inside a
//! declaration's lexical scope, to exactly one resolved type. Lookup is
//! innermost-first: a reference prefers the nearest enclosing declaration
//! over one at the file root, mirroring nested-scope name resolution.
//! Scalars are detected against the lexicon up front and never touch the
//! registry.

use graph::{ResolvedType, SchemaFile, SchemaGraph, TypeRegistry};
use schema::ScalarType;

use crate::{CodegenError, Result};

/// A resolved field type reference: scalar or registry-backed.
#[derive(Debug, Clone)]
pub enum TypeRef {
    /// A scalar from the fixed lexicon
    Scalar(ScalarType),
    /// A declared type found in the registry
    Named(ResolvedType),
}

impl TypeRef {
    /// The resolved type, when the reference is not scalar.
    pub fn as_named(&self) -> Option<&ResolvedType> {
        match self {
            TypeRef::Named(rt) => Some(rt),
            TypeRef::Scalar(_) => None,
        }
    }
}

/// Candidate names probed for a reference used in the given scope, most
/// deeply scoped first: for scope `[A, B]` and reference `T`, the probes
/// are `A.B.T`, `A.T`, `T`.
pub fn scope_probes(scope: &[String], reference: &str) -> Vec<String> {
    let mut probes = Vec::with_capacity(scope.len() + 1);
    for i in (1..=scope.len()).rev() {
        probes.push(format!("{}.{}", scope[..i].join("."), reference));
    }
    probes.push(reference.to_string());
    probes
}

/// Resolve a type reference used inside `scope` of `file`.
///
/// Each probe is tried relative to the declaring file's package first, then
/// as an absolute qualified name, so cross-package references like
/// `google.protobuf.Timestamp` resolve without any scope prefix.
pub fn resolve_in_scope(
    graph: &SchemaGraph,
    file: &SchemaFile,
    scope: &[String],
    reference: &str,
) -> Result<TypeRef> {
    if let Some(scalar) = ScalarType::parse(reference) {
        return Ok(TypeRef::Scalar(scalar));
    }

    for probe in scope_probes(scope, reference) {
        if !file.package().is_empty() {
            let qualified = format!("{}.{}", file.package(), probe);
            if let Some(rt) = graph.resolve(&qualified) {
                return Ok(TypeRef::Named(rt));
            }
        }
        if let Some(rt) = graph.resolve(&probe) {
            return Ok(TypeRef::Named(rt));
        }
    }

    Err(CodegenError::UnresolvedType {
        reference: reference.to_string(),
        scope: scope.join("."),
        file: file.path().to_string(),
    })
}
