//! Bundled tag customizers.
//!
//! Both customizers implement only the `get_tag` hook: they attach
//! serialization attributes to generated fields and contribute no extra
//! code. Field options steer them per field:
//!
//! - `wrapgen.json.tag_disable` / `wrapgen.db.tag_disable`: set to
//!   `"true"`, the field's attribute argument becomes the literal `skip`.
//! - `wrapgen.json.tag_name` / `wrapgen.db.tag_name`: override the
//!   snake_case name derived from the field.

use graph::SchemaFile;
use schema::FieldRef;

use crate::customize::{Customizer, ParentDecl};
use crate::tagset::{TagSet, TAG_SKIP};
use crate::util;
use crate::Result;

/// Adds a serde attribute to all generated fields, using snake case naming.
pub struct SerdeTagCustomizer;

impl Customizer for SerdeTagCustomizer {
    fn name(&self) -> &'static str { "serde_tag" }

    fn get_tag(
        &self,
        _file: &SchemaFile,
        _parent: ParentDecl<'_>,
        field: FieldRef<'_>,
        tag: &mut TagSet,
    ) -> Result<()> {
        apply_tag(field, tag, "serde", "wrapgen.json.tag_disable", "wrapgen.json.tag_name", |n| {
            format!("rename = \"{}\"", n)
        });
        Ok(())
    }
}

/// Adds a db column attribute to all generated fields, using snake case naming.
pub struct DbTagCustomizer;

impl Customizer for DbTagCustomizer {
    fn name(&self) -> &'static str { "db_tag" }

    fn get_tag(
        &self,
        _file: &SchemaFile,
        _parent: ParentDecl<'_>,
        field: FieldRef<'_>,
        tag: &mut TagSet,
    ) -> Result<()> {
        apply_tag(field, tag, "db", "wrapgen.db.tag_disable", "wrapgen.db.tag_name", |n| {
            format!("column = \"{}\"", n)
        });
        Ok(())
    }
}

fn apply_tag(
    field: FieldRef<'_>,
    tag: &mut TagSet,
    attr: &str,
    disable_opt: &str,
    name_opt: &str,
    render: impl Fn(&str) -> String,
) {
    // Oneof groups carry no serialized name of their own.
    if matches!(field, FieldRef::Oneof(_)) {
        return;
    }

    if field.option(disable_opt) == Some("true") {
        tag.set(attr, TAG_SKIP);
        return;
    }

    let mut name = util::snake_case(field.name());
    if let Some(n) = field.option(name_opt) {
        if !n.is_empty() {
            name = n.to_string();
        }
    }
    tag.set(attr, &render(&name));
}
