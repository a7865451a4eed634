//! Field tag metadata.
//!
//! A [`TagSet`] collects the attribute arguments customizers attach to a
//! field before its declaration line is emitted. Every customizer in the
//! chain sees the same mutable set and may add, overwrite or delete
//! entries. Rendering is deterministic: attributes appear in sorted name
//! order, the free-form append text last.

use std::collections::BTreeMap;

/// Attribute argument meaning "omit this field from the tag's surface".
pub const TAG_SKIP: &str = "skip";

/// Helper to facilitate building field attributes.
#[derive(Debug, Default, Clone)]
pub struct TagSet {
    tags: BTreeMap<String, String>,
    append: String,
}

impl TagSet {
    /// Create an empty tag set.
    pub fn new() -> Self { Self::default() }

    /// Set (or overwrite) an attribute's argument text.
    pub fn set(&mut self, name: &str, value: &str) {
        self.tags.insert(name.to_string(), value.to_string());
    }

    /// Get an attribute's argument text.
    pub fn get(&self, name: &str) -> Option<&str> { self.tags.get(name).map(|v| v.as_str()) }

    /// Remove an attribute.
    pub fn delete(&mut self, name: &str) { self.tags.remove(name); }

    /// Remove every attribute and the append text.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.append.clear();
    }

    /// Free-form raw attribute appended after the named ones.
    pub fn append_text(&self) -> &str { &self.append }

    /// Set the free-form raw attribute.
    pub fn set_append(&mut self, append: &str) { self.append = append.to_string(); }

    /// True when nothing would be rendered.
    pub fn is_empty(&self) -> bool { self.tags.is_empty() && self.append.is_empty() }

    /// Render one `#[name(args)]` line per attribute, sorted by attribute
    /// name, with the free-form append text rendered verbatim last.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> =
            self.tags.iter().map(|(name, value)| format!("#[{}({})]", name, value)).collect();
        if !self.append.is_empty() {
            lines.push(self.append.clone());
        }
        lines
    }
}
