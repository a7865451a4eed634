//! Converts `wrapgen.types.Uuid` to `uuid::Uuid`.
//!
//! The schema-side type is a single-field message carrying the canonical
//! string form; the wrapper surface uses the parsed `uuid::Uuid` value.
//! The original bindings for the `wrapgen/types` schema files live in the
//! `wrapgen_types` crate.

use graph::ResolvedType;

use crate::convert::{ConverterPlugin, NameContext, TypeConverter};
use crate::output::OutputUnit;
use crate::Result;

/// Claims `wrapgen.types.Uuid` and substitutes `uuid::Uuid`.
pub struct UuidPlugin;

impl ConverterPlugin for UuidPlugin {
    fn match_type(&self, ty: &ResolvedType) -> Option<Box<dyn TypeConverter>> {
        if ty.file == "wrapgen/types/uuid.proto"
            && ty.package == "wrapgen.types"
            && ty.name == "Uuid"
        {
            return Some(Box::new(UuidConverter));
        }
        None
    }
}

struct UuidConverter;

impl TypeConverter for UuidConverter {
    fn type_name(&self, unit: &mut OutputUnit, ctx: NameContext) -> String {
        let alias = unit.declare_dependency("uuid", "");
        let base = format!("{}::Uuid", alias);
        match ctx {
            NameContext::EmptyValue | NameContext::EmptyOrNone => format!("{}::nil()", base),
            NameContext::Declaration | NameContext::Bare | NameContext::Pointer => base,
        }
    }

    fn is_pointer_like(&self) -> bool { false }

    fn generate_import(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let alias = unit.declare_dependency("uuid", "");
        let rt = unit.declare_dependency("wrapgen_runtime", "");

        unit.p(&format!("if let Some(u) = {} {{", src));
        unit.indent();
        unit.p(&format!(
            "{} = {}::Uuid::parse_str(&u.value).map_err({}::ConvertError::invalid)?;",
            dest, alias, rt
        ));
        unit.outdent();
        unit.p("}");

        Ok(true)
    }

    fn generate_export(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let pb = unit.declare_dependency("wrapgen_types", "");

        unit.p(&format!("{} = {}::Uuid {{", dest, pb));
        unit.indent();
        unit.p(&format!("value: {}.to_string(),", src));
        unit.outdent();
        unit.p("};");

        Ok(false)
    }
}
