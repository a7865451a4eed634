//! Package and module-path policy for generated output.
//!
//! Decides which files are wrapped, what package a wrapped file's output
//! belongs to, and how wrapper-side and source-side module paths are
//! spelled in emitted `use` declarations.

use graph::{SchemaFile, SchemaGraph, TypeRegistry};
use regex::Regex;

use crate::{CodegenError, Result};

/// File option that opts a file out of wrapping (`"false"`) even when it
/// belongs to the own source set.
pub const OPT_WRAP: &str = "wrapgen.wrap";
/// File option overriding the wrap output package.
pub const OPT_WRAP_PACKAGE: &str = "wrapgen.package";
/// File option naming the module path of the original generated bindings.
pub const OPT_RUST_PACKAGE: &str = "rust_package";

/// Interface to customize the output package name for a schema file.
pub trait PackageSource {
    /// Gets an output package for a file. Returning `None` falls back to
    /// the file's own options.
    fn package_for(&self, file: &SchemaFile) -> Option<String>;
}

/// Whether wrapper types are generated for (and may be referenced from) a file.
///
/// A file is wrapped when it belongs to the own source set and does not opt
/// out via the `wrapgen.wrap` option. Unwrapped files are referenced by
/// direct alias to their original bindings.
pub fn file_is_wrapped(graph: &SchemaGraph, path: &str) -> bool {
    if !graph.is_own_source(path) {
        return false;
    }
    graph.file_option(path, OPT_WRAP) != Some("false")
}

/// The output package of a wrapped file: package-source override, else the
/// `wrapgen.package` option, else the `rust_package` option, else the
/// schema file's directory.
pub fn wrap_package(file: &SchemaFile, package_source: Option<&dyn PackageSource>) -> String {
    if let Some(ps) = package_source {
        if let Some(p) = ps.package_for(file) {
            return p;
        }
    }
    if let Some(p) = file.option(OPT_WRAP_PACKAGE) {
        return p.to_string();
    }
    if let Some(p) = file.option(OPT_RUST_PACKAGE) {
        return p.to_string();
    }
    let path = file.path();
    match path.rfind('/') {
        Some(i) => path[..i].to_string(),
        None => file.package().to_string(),
    }
}

/// Module path of a wrapped file's generated wrapper, as spelled in `use`
/// declarations of other generated files.
pub fn wrap_module_path(file: &SchemaFile, package_source: Option<&dyn PackageSource>) -> String {
    package_to_module(&wrap_package(file, package_source))
}

/// Module path of the original generated bindings for a file: the
/// `rust_package` option, else the schema package.
pub fn source_module_path(file: &SchemaFile) -> String {
    match file.option(OPT_RUST_PACKAGE) {
        Some(p) => package_to_module(p),
        None => package_to_module(file.package()),
    }
}

/// Convert a dotted or slashed package name to a Rust module path.
pub fn package_to_module(package: &str) -> String {
    package
        .split(['.', '/'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("::")
}

/// Convert a dotted or `::`-separated package name to an output directory path.
pub fn package_to_path(package: &str) -> String {
    package
        .replace("::", "/")
        .split(['.', '/'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Check an output package name before it is turned into a file path.
pub fn validate_package(package: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_./:]*$")
        .map_err(|e| CodegenError::Message(e.to_string()))?;
    if package.is_empty() || !re.is_match(package) {
        return Err(CodegenError::Message(format!("invalid output package name '{}'", package)));
    }
    Ok(())
}
