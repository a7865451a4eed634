//! Output sinks.
//!
//! A sink receives rendered files from the driver. The lifecycle is
//! `initialize`, any number of `output` calls (one per non-empty unit),
//! then `finalize`. Empty units never reach a sink.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{PipelineError, Result};

/// Destination for rendered output files.
pub trait FileSink {
    /// Called once before the first output.
    fn initialize(&mut self) -> Result<()> { Ok(()) }

    /// Write one rendered file. `path` is relative to the sink root.
    fn output(&mut self, path: &str, contents: &str) -> Result<()>;

    /// Called once after the last output, also on failed runs.
    fn finalize(&mut self) -> Result<()> { Ok(()) }
}

/// Sink writing files under a root directory, creating parents as needed.
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Create a sink rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self { Self { root: root.as_ref().to_path_buf() } }
}

impl FileSink for DirectorySink {
    fn output(&mut self, path: &str, contents: &str) -> Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(PipelineError::Sink)?;
        }
        fs::write(&full, contents).map_err(PipelineError::Sink)?;
        Ok(())
    }
}

/// In-memory sink recording everything it receives. Used by tests and by
/// callers that post-process rendered output themselves.
#[derive(Default)]
pub struct MemorySink {
    /// `(path, contents)` pairs in output order
    pub files: Vec<(String, String)>,
    /// Whether `initialize` ran
    pub initialized: bool,
    /// Whether `finalize` ran
    pub finalized: bool,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self { Self::default() }

    /// Contents of a recorded file, by exact path.
    pub fn file(&self, path: &str) -> Option<&str> {
        self.files.iter().find(|(p, _)| p == path).map(|(_, c)| c.as_str())
    }
}

impl FileSink for MemorySink {
    fn initialize(&mut self) -> Result<()> {
        self.initialized = true;
        Ok(())
    }

    fn output(&mut self, path: &str, contents: &str) -> Result<()> {
        self.files.push((path.to_string(), contents.to_string()));
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.finalized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_sink_creates_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = DirectorySink::new(dir.path());

        sink.output("myapp/wrap/user.wr.rs", "pub struct User {}\n").expect("write ok");

        let written = std::fs::read_to_string(dir.path().join("myapp/wrap/user.wr.rs"))
            .expect("file exists");
        assert_eq!(written, "pub struct User {}\n");
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let mut sink = MemorySink::new();
        sink.initialize().expect("ok");
        sink.output("a.rs", "a").expect("ok");
        sink.output("b.rs", "b").expect("ok");
        sink.finalize().expect("ok");

        assert!(sink.initialized);
        assert!(sink.finalized);
        assert_eq!(sink.files.len(), 2);
        assert_eq!(sink.file("a.rs"), Some("a"));
        assert_eq!(sink.file("missing.rs"), None);
    }
}
