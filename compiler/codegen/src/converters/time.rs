//! Converts the well-known timestamp and duration types to chrono types.

use graph::ResolvedType;

use crate::convert::{ConverterPlugin, NameContext, TypeConverter};
use crate::output::OutputUnit;
use crate::Result;

/// Claims `google.protobuf.Timestamp` and substitutes
/// `chrono::DateTime<chrono::Utc>`.
pub struct TimestampPlugin;

impl ConverterPlugin for TimestampPlugin {
    fn match_type(&self, ty: &ResolvedType) -> Option<Box<dyn TypeConverter>> {
        if ty.file == "google/protobuf/timestamp.proto"
            && ty.package == "google.protobuf"
            && ty.name == "Timestamp"
        {
            return Some(Box::new(TimestampConverter));
        }
        None
    }
}

struct TimestampConverter;

impl TypeConverter for TimestampConverter {
    fn type_name(&self, unit: &mut OutputUnit, ctx: NameContext) -> String {
        let alias = unit.declare_dependency("chrono", "");
        match ctx {
            NameContext::EmptyValue | NameContext::EmptyOrNone => {
                format!("{}::DateTime::<{}::Utc>::default()", alias, alias)
            }
            NameContext::Declaration | NameContext::Bare | NameContext::Pointer => {
                format!("{}::DateTime<{}::Utc>", alias, alias)
            }
        }
    }

    fn is_pointer_like(&self) -> bool { false }

    fn generate_import(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let alias = unit.declare_dependency("chrono", "");
        let rt = unit.declare_dependency("wrapgen_runtime", "");

        unit.p(&format!("if let Some(ts) = {} {{", src));
        unit.indent();
        unit.p(&format!(
            "{} = {}::DateTime::from_timestamp(ts.seconds, ts.nanos as u32)",
            dest, alias
        ));
        unit.indent();
        unit.p(&format!(
            ".ok_or_else(|| {}::ConvertError::invalid(\"timestamp out of range\"))?;",
            rt
        ));
        unit.outdent();
        unit.outdent();
        unit.p("}");

        Ok(true)
    }

    fn generate_export(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let pb = unit.declare_dependency("prost_types", "");

        unit.p(&format!("{} = {}::Timestamp {{", dest, pb));
        unit.indent();
        unit.p(&format!("seconds: {}.timestamp(),", src));
        unit.p(&format!("nanos: {}.timestamp_subsec_nanos() as i32,", src));
        unit.outdent();
        unit.p("};");

        Ok(false)
    }
}

/// Claims `google.protobuf.Duration` and substitutes `chrono::TimeDelta`.
pub struct DurationPlugin;

impl ConverterPlugin for DurationPlugin {
    fn match_type(&self, ty: &ResolvedType) -> Option<Box<dyn TypeConverter>> {
        if ty.file == "google/protobuf/duration.proto"
            && ty.package == "google.protobuf"
            && ty.name == "Duration"
        {
            return Some(Box::new(DurationConverter));
        }
        None
    }
}

struct DurationConverter;

impl TypeConverter for DurationConverter {
    fn type_name(&self, unit: &mut OutputUnit, ctx: NameContext) -> String {
        let alias = unit.declare_dependency("chrono", "");
        let base = format!("{}::TimeDelta", alias);
        match ctx {
            NameContext::EmptyValue | NameContext::EmptyOrNone => format!("{}::default()", base),
            NameContext::Declaration | NameContext::Bare | NameContext::Pointer => base,
        }
    }

    fn is_pointer_like(&self) -> bool { false }

    fn generate_import(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let alias = unit.declare_dependency("chrono", "");
        let rt = unit.declare_dependency("wrapgen_runtime", "");

        unit.p(&format!("if let Some(d) = {} {{", src));
        unit.indent();
        unit.p(&format!("{} = {}::TimeDelta::new(d.seconds, d.nanos as u32)", dest, alias));
        unit.indent();
        unit.p(&format!(
            ".ok_or_else(|| {}::ConvertError::invalid(\"duration out of range\"))?;",
            rt
        ));
        unit.outdent();
        unit.outdent();
        unit.p("}");

        Ok(true)
    }

    fn generate_export(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        let pb = unit.declare_dependency("prost_types", "");

        unit.p(&format!("{} = {}::Duration {{", dest, pb));
        unit.indent();
        unit.p(&format!("seconds: {}.num_seconds(),", src));
        unit.p(&format!("nanos: {}.subsec_nanos(),", src));
        unit.outdent();
        unit.p("};");

        Ok(false)
    }
}
