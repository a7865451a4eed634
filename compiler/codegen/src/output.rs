//! Buffered output units with deferred header synthesis.
//!
//! An [`OutputUnit`] is one logical output file. Body text is appended in a
//! single pass while dependency aliases are collected on the side; the
//! header (generated-file banner, package doc line, sorted `use` block) is
//! only rendered at [`OutputUnit::finalize`], once the full dependency set
//! is known. Units that never receive body text render to nothing and are
//! discarded by the caller.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt::Write;

use crate::util;
use crate::{CodegenError, Result};

const INDENT: &str = "    ";

/// Header fields rendered ahead of a unit's body.
#[derive(Debug, Clone)]
pub struct UnitHeader {
    /// Output package the unit belongs to
    pub package: String,
    /// Schema source path the unit was generated from
    pub source_path: String,
}

/// A single buffered output file.
pub struct OutputUnit {
    id: String,
    suffix: String,
    body: String,
    indent: usize,
    imports: BTreeMap<String, String>,
    has_data: bool,
}

impl OutputUnit {
    /// Create an empty unit with the given id and file-name suffix.
    pub fn new(id: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            suffix: suffix.into(),
            body: String::new(),
            indent: 0,
            imports: BTreeMap::new(),
            has_data: false,
        }
    }

    /// Unit id as registered with the generator.
    pub fn id(&self) -> &str { &self.id }

    /// File-name suffix inserted before the output extension.
    pub fn suffix(&self) -> &str { &self.suffix }

    /// Checks if any body text was written to this unit.
    pub fn has_data(&self) -> bool { self.has_data }

    /// Append one line to the body at the current indent level.
    ///
    /// An empty line writes a bare newline; anything else marks the unit as
    /// holding data.
    pub fn p(&mut self, line: &str) {
        if line.is_empty() {
            self.body.push('\n');
            return;
        }
        self.has_data = true;
        for _ in 0..self.indent {
            self.body.push_str(INDENT);
        }
        self.body.push_str(line);
        self.body.push('\n');
    }

    /// Indents the output one level.
    pub fn indent(&mut self) { self.indent += 1; }

    /// Unindents the output one level.
    pub fn outdent(&mut self) { self.indent = self.indent.saturating_sub(1); }

    /// Declares a dependency and returns the alias to be used in this unit.
    ///
    /// Repeated declarations of the same module path return the alias
    /// assigned the first time. A preferred alias already taken by another
    /// path gets an increasing numeric suffix until unique.
    pub fn declare_dependency(&mut self, module_path: &str, preferred_alias: &str) -> String {
        if let Some(alias) = self.imports.get(module_path) {
            return alias.clone();
        }

        let mut preferred = if preferred_alias.is_empty() {
            util::base_name(module_path)
        } else {
            preferred_alias.to_string()
        };
        preferred = preferred.replace('.', "_");

        let mut alias = preferred.clone();
        let mut counter = 0;
        while self.imports.values().any(|a| a == &alias) {
            counter += 1;
            alias = format!("{}{}", preferred, counter);
        }

        self.imports.insert(module_path.to_string(), alias.clone());
        alias
    }

    /// Render the finished unit: header, sorted import block, then body.
    ///
    /// Returns `None` when the unit never received body text; such units
    /// must not reach the sink.
    pub fn finalize(&self, header: &UnitHeader) -> Result<Option<String>> {
        if !self.has_data {
            return Ok(None);
        }

        // The alias table deduplicates on assignment; a collision here
        // means that invariant was broken elsewhere.
        let mut seen = BTreeSet::new();
        for alias in self.imports.values() {
            if !seen.insert(alias) {
                return Err(CodegenError::DuplicateAlias(alias.clone()));
            }
        }

        let mut out = String::with_capacity(self.body.len() + 256);
        writeln!(out, "// Code generated by wrapgen. DO NOT EDIT.")?;
        writeln!(out, "// source file: {}", header.source_path)?;
        writeln!(out)?;
        writeln!(out, "//! Wrapper types for schema package `{}`.", header.package)?;
        writeln!(out)?;

        if !self.imports.is_empty() {
            // BTreeMap iteration gives the lexicographic module-path order.
            for (path, alias) in &self.imports {
                if *alias == util::base_name(path) {
                    writeln!(out, "use {};", path)?;
                } else {
                    writeln!(out, "use {} as {};", path, alias)?;
                }
            }
            writeln!(out)?;
        }

        out.push_str(&self.body);
        Ok(Some(out))
    }
}

/// Structural validation of rendered output: every brace, bracket and
/// parenthesis outside string literals and line comments must balance.
pub fn check_balanced(text: &str) -> std::result::Result<(), String> {
    let mut stack: Vec<char> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '/' if chars.peek() == Some(&'/') => {
                for nc in chars.by_ref() {
                    if nc == '\n' {
                        break;
                    }
                }
            }
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return Err(format!("unbalanced '{}'", c));
                }
            }
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed '{}'", open));
    }
    if in_string {
        return Err("unterminated string literal".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> UnitHeader {
        UnitHeader { package: "myapp".to_string(), source_path: "myapp/user.proto".to_string() }
    }

    #[test]
    fn test_empty_unit_renders_to_none() {
        let unit = OutputUnit::new("main", "");
        assert!(!unit.has_data());
        assert!(unit.finalize(&header()).expect("finalize ok").is_none());
    }

    #[test]
    fn test_blank_lines_alone_do_not_mark_data() {
        let mut unit = OutputUnit::new("main", "");
        unit.p("");
        unit.p("");
        assert!(!unit.has_data());
        assert!(unit.finalize(&header()).expect("finalize ok").is_none());
    }

    #[test]
    fn test_header_rendered_before_body_with_sorted_imports() {
        let mut unit = OutputUnit::new("main", "");
        unit.p("pub struct User {}");
        // Dependencies declared after the body line still land in the header.
        unit.declare_dependency("zeta::pb", "zpb");
        unit.declare_dependency("alpha::pb", "apb");

        let text = unit.finalize(&header()).expect("finalize ok").expect("has data");
        let body_pos = text.find("pub struct User").expect("body present");
        let alpha_pos = text.find("use alpha::pb as apb;").expect("alpha import present");
        let zeta_pos = text.find("use zeta::pb as zpb;").expect("zeta import present");
        assert!(alpha_pos < zeta_pos, "imports must be sorted by module path");
        assert!(zeta_pos < body_pos, "imports must precede the body");
        assert!(text.starts_with("// Code generated by wrapgen. DO NOT EDIT."));
    }

    #[test]
    fn test_alias_suppressed_when_it_matches_last_segment() {
        let mut unit = OutputUnit::new("main", "");
        unit.p("x");
        unit.declare_dependency("wrapgen_runtime", "");
        let text = unit.finalize(&header()).expect("finalize ok").expect("has data");
        assert!(text.contains("use wrapgen_runtime;"));
        assert!(!text.contains("use wrapgen_runtime as"));
    }

    #[test]
    fn test_alias_collision_gets_numeric_suffix() {
        let mut unit = OutputUnit::new("main", "");
        let first = unit.declare_dependency("a::common", "common");
        let second = unit.declare_dependency("b::common", "common");
        let third = unit.declare_dependency("c::common", "common");
        assert_eq!(first, "common");
        assert_eq!(second, "common1");
        assert_eq!(third, "common2");

        // Re-declaring a known path returns the assigned alias unchanged.
        assert_eq!(unit.declare_dependency("b::common", "common"), "common1");
    }

    #[test]
    fn test_indent_tracking() {
        let mut unit = OutputUnit::new("main", "");
        unit.p("fn f() {");
        unit.indent();
        unit.p("body();");
        unit.outdent();
        unit.p("}");
        let text = unit.finalize(&header()).expect("finalize ok").expect("has data");
        assert!(text.contains("fn f() {\n    body();\n}\n"));
    }

    #[test]
    fn test_check_balanced() {
        assert!(check_balanced("fn f() { (a[0]) }").is_ok());
        assert!(check_balanced("let s = \"{ not a brace\";").is_ok());
        assert!(check_balanced("// { comment only\nfn f() {}").is_ok());
        assert!(check_balanced("fn f() {").is_err());
        assert!(check_balanced("fn f() }").is_err());
        assert!(check_balanced("(]").is_err());
    }
}
