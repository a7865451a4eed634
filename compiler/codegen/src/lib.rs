#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Code generation engine for wrapgen.
//!
//! This crate turns a resolved schema graph into wrapper source files. It
//! owns the parts of the compiler with real invariants: scope-aware type
//! resolution, the type-converter abstraction and its plugin dispatch, the
//! customizer chain, the deferred-header output buffering, and the
//! declaration emitters for every field kind.
//!
//! Other responsibilities, such as loading the schema graph, walking the
//! own source set, and writing files to disk, live in companion crates.

pub mod convert;
pub mod converters;
pub mod customize;
pub mod customizers;
pub mod generator;
pub mod naming;
pub mod output;
pub mod scope;
pub mod service;
pub mod tagset;
pub mod util;

use thiserror::Error;

pub use convert::{ConverterPlugin, ConverterSet, NameContext, Side, TypeConverter};
pub use customize::{Customizer, CustomizerChain, ParentDecl};
pub use generator::{Generator, RenderedFile, UnitRoute, UNIT_MAIN, UNIT_SERVICE};
pub use scope::TypeRef;
pub use service::{GrpcServiceGen, ServiceGen};
pub use tagset::TagSet;

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// A type reference could not be resolved after exhausting the scope search.
    #[error("unable to resolve type '{reference}' in scope '{scope}' in file '{file}'")]
    UnresolvedType {
        /// The reference as written in the schema
        reference: String,
        /// The lexical scope the search started from, dot-joined
        scope: String,
        /// The file the reference appears in
        file: String,
    },
    /// Two dependency declarations ended up with the same alias. The alias
    /// table deduplicates on assignment, so this indicates a broken invariant.
    #[error("duplicate import alias '{0}'")]
    DuplicateAlias(String),
    /// A customizer hook failed; carries the hook's own message.
    #[error("customizer error: {0}")]
    Customizer(String),
    /// Rendered output failed the structural validation pass.
    #[error("generated source failed validation for '{0}': {1}")]
    MalformedOutput(String, String),
    /// Formatting error when building generated source.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl From<String> for CodegenError {
    fn from(msg: String) -> Self { CodegenError::Message(msg) }
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Trim trailing whitespace from each line and drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
pub fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<String> = src.lines().map(|l| l.trim_end().to_string()).collect();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_generated_source() {
        let src = "pub struct A {   \n    pub x: i32,\n}\n\n\n";
        assert_eq!(clean_generated_source(src), "pub struct A {\n    pub x: i32,\n}\n");
        assert_eq!(clean_generated_source(""), "");
        assert_eq!(clean_generated_source("\n\n"), "");
    }
}
