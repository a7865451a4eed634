//! The customizer chain.
//!
//! Customizers let independent concerns observe and augment the
//! declaration walk without the emitters knowing about them: tag injection
//! before each field declaration, auxiliary code after a file's
//! declarations, and (rarely) output independent of any schema file.
//!
//! Chain semantics live here and nowhere else: hooks run sequentially in
//! registration order and the first error aborts the whole generation. A
//! chain with zero customizers is a legal no-op.

use graph::{SchemaFile, SchemaGraph};
use schema::{FieldRef, MessageDecl, OneofDecl};

use crate::generator::Generator;
use crate::tagset::TagSet;
use crate::{CodegenError, Result};

/// The declaration a field being tagged belongs to.
#[derive(Debug, Clone, Copy)]
pub enum ParentDecl<'a> {
    /// Field of a message
    Message(&'a MessageDecl),
    /// Variant field of a oneof group
    Oneof(&'a OneofDecl),
}

impl ParentDecl<'_> {
    /// Name of the parent declaration.
    pub fn name(&self) -> &str {
        match self {
            ParentDecl::Message(m) => &m.name,
            ParentDecl::Oneof(o) => &o.name,
        }
    }
}

/// Interface to allow customizing various aspects of the output.
///
/// Every hook defaults to a no-op so customizers implement only what they
/// care about.
pub trait Customizer {
    /// Short name used to attribute errors to this customizer.
    fn name(&self) -> &'static str;

    /// Allows adding attributes for a generated field. Every customizer in
    /// the chain sees (and may edit) the same tag set.
    fn get_tag(
        &self,
        file: &SchemaFile,
        parent: ParentDecl<'_>,
        field: FieldRef<'_>,
        tag: &mut TagSet,
    ) -> Result<()> {
        let _ = (file, parent, field, tag);
        Ok(())
    }

    /// Allows code generation after all of a file's enum/message
    /// declarations were generated.
    fn generate_code(&self, g: &mut Generator<'_>) -> Result<()> {
        let _ = g;
        Ok(())
    }

    /// Allows service code generation after all of a file's services were
    /// generated.
    fn generate_service_code(&self, g: &mut Generator<'_>) -> Result<()> {
        let _ = g;
        Ok(())
    }

    /// Allows generation of output independent of any specific schema
    /// file. Returns `(path, contents)` pairs handed to the sink as-is.
    fn generate_global_code(&self, graph: &SchemaGraph) -> Result<Vec<(String, String)>> {
        let _ = graph;
        Ok(vec![])
    }
}

/// Ordered customizer pipeline.
#[derive(Default)]
pub struct CustomizerChain {
    customizers: Vec<Box<dyn Customizer>>,
}

impl CustomizerChain {
    /// Create an empty chain.
    pub fn new() -> Self { Self::default() }

    /// Append a customizer. Registration order is invocation order.
    pub fn register(&mut self, customizer: Box<dyn Customizer>) {
        self.customizers.push(customizer);
    }

    /// Number of registered customizers.
    pub fn len(&self) -> usize { self.customizers.len() }

    /// True when the chain is a no-op.
    pub fn is_empty(&self) -> bool { self.customizers.is_empty() }

    /// Build the tag set for a field by running every `get_tag` hook over
    /// the same mutable set.
    pub fn get_tag(
        &self,
        file: &SchemaFile,
        parent: ParentDecl<'_>,
        field: FieldRef<'_>,
    ) -> Result<TagSet> {
        let mut tag = TagSet::new();
        for cz in &self.customizers {
            cz.get_tag(file, parent, field, &mut tag).map_err(|e| wrap_error(cz.name(), e))?;
        }
        Ok(tag)
    }

    /// Run every `generate_code` hook.
    pub fn generate_code(&self, g: &mut Generator<'_>) -> Result<()> {
        for cz in &self.customizers {
            cz.generate_code(g).map_err(|e| wrap_error(cz.name(), e))?;
        }
        Ok(())
    }

    /// Run every `generate_service_code` hook.
    pub fn generate_service_code(&self, g: &mut Generator<'_>) -> Result<()> {
        for cz in &self.customizers {
            cz.generate_service_code(g).map_err(|e| wrap_error(cz.name(), e))?;
        }
        Ok(())
    }

    /// Collect `(path, contents)` pairs from every global hook.
    pub fn global_units(&self, graph: &SchemaGraph) -> Result<Vec<(String, String)>> {
        let mut units = Vec::new();
        for cz in &self.customizers {
            units.extend(cz.generate_global_code(graph).map_err(|e| wrap_error(cz.name(), e))?);
        }
        Ok(units)
    }
}

fn wrap_error(name: &str, err: CodegenError) -> CodegenError {
    CodegenError::Customizer(format!("{}: {}", name, err))
}
