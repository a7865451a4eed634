#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Resolved schema graph: the type registry the wrapgen compiler reads.
//!
//! A [`SchemaGraph`] holds every schema file taking part in a generation
//! run, each tagged with whether it belongs to the "own" source set or was
//! pulled in as an import. A qualified-name index over all declared types
//! is built once at load time; after that the graph is immutable and every
//! lookup is a plain map probe.
//!
//! The graph is loaded from JSON produced by an upstream schema front end.
//! Parsing schema source and settling cross-file references is that front
//! end's job, not this crate's.

pub mod resolved;

use std::collections::BTreeMap;
use std::path::Path;

use schema::{FileDecl, MessageDecl, Syntax};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use resolved::{DeclKind, ResolvedType};

/// Errors that can occur while loading or querying a schema graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// I/O error while reading a graph file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON deserialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// A file path was referenced but is not part of the graph.
    #[error("file '{0}' not found in schema graph")]
    UnknownFile(String),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl From<String> for GraphError {
    fn from(msg: String) -> Self { GraphError::Message(msg) }
}

/// Convenient result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Whether a schema file belongs to the set being generated or is imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Part of the source set this run generates wrappers for
    Own,
    /// Referenced dependency, never generated
    Import,
}

/// One schema file inside the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Source set membership
    pub source: SourceKind,
    /// The file's declaration tree
    pub file: FileDecl,
}

impl SchemaFile {
    /// File path as referenced by imports.
    pub fn path(&self) -> &str { &self.file.path }

    /// Dot-separated package name.
    pub fn package(&self) -> &str { &self.file.package }

    /// Syntax level of the file.
    pub fn syntax(&self) -> Syntax { self.file.syntax }

    /// Look up a file-level option value by name.
    pub fn option(&self, name: &str) -> Option<&str> { self.file.option(name) }

    /// True when both files declare the same package.
    pub fn same_package(&self, other: &SchemaFile) -> bool { self.package() == other.package() }
}

/// Read-only interface to the schema graph, as consumed by code generation.
pub trait TypeRegistry {
    /// Resolve a fully package-qualified type name.
    fn resolve(&self, qualified: &str) -> Option<ResolvedType>;

    /// True when the file belongs to the own source set.
    fn is_own_source(&self, path: &str) -> bool;

    /// Read a file-level option.
    fn file_option<'a>(&'a self, path: &str, key: &str) -> Option<&'a str>;
}

#[derive(Debug, Clone)]
struct IndexEntry {
    file: String,
    package: String,
    name: String,
    kind: DeclKind,
}

/// The resolved schema graph: file table plus qualified-name type index.
pub struct SchemaGraph {
    files: BTreeMap<String, SchemaFile>,
    index: BTreeMap<String, IndexEntry>,
}

#[derive(Deserialize)]
struct RawGraph {
    files: Vec<SchemaFile>,
}

impl SchemaGraph {
    /// Build a graph from a list of schema files, indexing every declared type.
    pub fn new(file_list: Vec<SchemaFile>) -> Self {
        let mut files = BTreeMap::new();
        let mut index = BTreeMap::new();
        for sf in file_list {
            index_file(&sf.file, &mut index);
            files.insert(sf.file.path.clone(), sf);
        }
        Self { files, index }
    }

    /// Load a graph from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawGraph = serde_json::from_str(json)?;
        Ok(Self::new(raw.files))
    }

    /// Load a graph from a JSON file on disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Get a file by path.
    pub fn file(&self, path: &str) -> Option<&SchemaFile> { self.files.get(path) }

    /// Get a file by path, failing with [`GraphError::UnknownFile`].
    pub fn require_file(&self, path: &str) -> Result<&SchemaFile> {
        self.file(path).ok_or_else(|| GraphError::UnknownFile(path.to_string()))
    }

    /// All files in the graph, ordered by path.
    pub fn files(&self) -> impl Iterator<Item = &SchemaFile> { self.files.values() }

    /// Files belonging to the own source set, ordered by path.
    pub fn own_files(&self) -> impl Iterator<Item = &SchemaFile> {
        self.files.values().filter(|f| f.source == SourceKind::Own)
    }

    /// Total number of indexed type declarations.
    pub fn type_count(&self) -> usize { self.index.len() }

    fn lookup(&self, qualified: &str) -> Option<ResolvedType> {
        self.index.get(qualified).map(|e| ResolvedType {
            name: e.name.clone(),
            qualified: qualified.to_string(),
            file: e.file.clone(),
            package: e.package.clone(),
            kind: e.kind,
        })
    }
}

impl TypeRegistry for SchemaGraph {
    fn resolve(&self, qualified: &str) -> Option<ResolvedType> { self.lookup(qualified) }

    fn is_own_source(&self, path: &str) -> bool {
        self.files.get(path).map(|f| f.source == SourceKind::Own).unwrap_or(false)
    }

    fn file_option<'a>(&'a self, path: &str, key: &str) -> Option<&'a str> {
        self.files.get(path).and_then(|f| f.option(key))
    }
}

fn index_file(file: &FileDecl, index: &mut BTreeMap<String, IndexEntry>) {
    for en in &file.enums {
        insert_entry(file, &[], &en.name, DeclKind::Enum, index);
    }
    for msg in &file.messages {
        index_message(file, &[], msg, index);
    }
}

fn index_message(
    file: &FileDecl,
    scope: &[String],
    msg: &MessageDecl,
    index: &mut BTreeMap<String, IndexEntry>,
) {
    insert_entry(file, scope, &msg.name, DeclKind::Message, index);

    let mut inner = scope.to_vec();
    inner.push(msg.name.clone());

    for field in &msg.fields {
        if let schema::FieldDecl::Oneof(oo) = field {
            insert_entry(file, &inner, &oo.name, DeclKind::Oneof, index);
        }
    }
    for en in &msg.enums {
        insert_entry(file, &inner, &en.name, DeclKind::Enum, index);
    }
    for sub in &msg.messages {
        index_message(file, &inner, sub, index);
    }
}

fn insert_entry(
    file: &FileDecl,
    scope: &[String],
    name: &str,
    kind: DeclKind,
    index: &mut BTreeMap<String, IndexEntry>,
) {
    let mut in_file = scope.to_vec();
    in_file.push(name.to_string());
    let in_file = in_file.join(".");

    let qualified = if file.package.is_empty() {
        in_file.clone()
    } else {
        format!("{}.{}", file.package, in_file)
    };

    index.insert(
        qualified,
        IndexEntry {
            file: file.path.clone(),
            package: file.package.clone(),
            name: in_file,
            kind,
        },
    );
}
