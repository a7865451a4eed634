//! Converts `wrapgen.types.JsonObject` to `serde_json::Value`.
//!
//! The schema-side type is a single-field message carrying serialized JSON
//! text; the wrapper surface holds the parsed value. Conversion through
//! the text form is lossy (object key order, number formatting), so this
//! type is exempt from round-trip mirroring.

use graph::ResolvedType;

use crate::convert::{ConverterPlugin, NameContext, TypeConverter};
use crate::output::OutputUnit;
use crate::Result;

/// Claims `wrapgen.types.JsonObject` and substitutes `serde_json::Value`.
pub struct JsonObjectPlugin;

impl ConverterPlugin for JsonObjectPlugin {
    fn match_type(&self, ty: &ResolvedType) -> Option<Box<dyn TypeConverter>> {
        if ty.file == "wrapgen/types/json.proto"
            && ty.package == "wrapgen.types"
            && ty.name == "JsonObject"
        {
            return Some(Box::new(JsonObjectConverter));
        }
        None
    }
}

struct JsonObjectConverter;

impl TypeConverter for JsonObjectConverter {
    fn type_name(&self, unit: &mut OutputUnit, ctx: NameContext) -> String {
        let alias = unit.declare_dependency("serde_json", "");
        let base = format!("{}::Value", alias);
        match ctx {
            NameContext::EmptyValue | NameContext::EmptyOrNone => format!("{}::Null", base),
            NameContext::Declaration | NameContext::Bare | NameContext::Pointer => base,
        }
    }

    fn is_pointer_like(&self) -> bool { false }

    fn generate_import(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let alias = unit.declare_dependency("serde_json", "");
        let rt = unit.declare_dependency("wrapgen_runtime", "");

        unit.p(&format!("if let Some(j) = {} {{", src));
        unit.indent();
        unit.p("if !j.value.is_empty() {");
        unit.indent();
        unit.p(&format!(
            "{} = {}::from_str(&j.value).map_err({}::ConvertError::invalid)?;",
            dest, alias, rt
        ));
        unit.outdent();
        unit.p("}");
        unit.outdent();
        unit.p("}");

        Ok(true)
    }

    fn generate_export(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let alias = unit.declare_dependency("serde_json", "");
        let pb = unit.declare_dependency("wrapgen_types", "");
        let rt = unit.declare_dependency("wrapgen_runtime", "");

        unit.p(&format!("{} = {}::JsonObject {{", dest, pb));
        unit.indent();
        unit.p(&format!(
            "value: {}::to_string(&{}).map_err({}::ConvertError::invalid)?,",
            alias, src, rt
        ));
        unit.outdent();
        unit.p("};");

        Ok(true)
    }
}
