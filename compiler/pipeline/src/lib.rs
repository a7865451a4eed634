#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that turns a schema graph into wrapper source files
//! by orchestrating code generation.
//!
//! The [`Wrapper`] driver walks every file of the own source set, applies
//! the should-wrap predicate, runs the code generator, and flushes each
//! non-empty output unit to a [`FileSink`]. Generation is fail-fast: the
//! first error stops the run, because a schema reference graph is not
//! safely partially generatable.
//!
//! ## Module Organization
//!
//! - `wrapper` - The driver and its configuration surface
//! - `sink` - Output sinks (directory-backed and in-memory)

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the generation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// Error while loading or querying the schema graph.
    #[error(transparent)]
    Graph(#[from] graph::GraphError),
    /// Error loading the generation configuration.
    #[error(transparent)]
    Config(#[from] wrapgen_config::ConfigError),
    /// I/O failure from the output sink.
    #[error("sink write failed: {0}")]
    Sink(std::io::Error),
    /// I/O error outside the sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Generic message-based error.
    #[error("{0}")]
    Message(String),
}

impl From<String> for PipelineError {
    fn from(msg: String) -> Self { PipelineError::Message(msg) }
}

pub mod sink;
pub mod wrapper;

pub use sink::{DirectorySink, FileSink, MemorySink};
pub use wrapper::Wrapper;
