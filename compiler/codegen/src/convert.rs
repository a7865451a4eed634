//! Type naming and conversion dispatch.
//!
//! A [`TypeConverter`] decides, per field type, how a value is named in the
//! generated surface and how it moves between the original and wrapper
//! representations. Exactly one converter is selected per resolved type:
//! scalars always take the scalar converter, everything else probes the
//! registered plugins in registration order and falls back to the default.
//!
//! The [`ConverterSet`] is an explicit value threaded through the
//! traversal; there is no global default converter, so independent
//! generation runs cannot interfere.

use graph::{DeclKind, ResolvedType, SchemaFile, SchemaGraph};
use schema::{ScalarType, Syntax};

use crate::naming::{self, PackageSource};
use crate::output::OutputUnit;
use crate::scope::TypeRef;
use crate::util;
use crate::Result;

/// Source contexts a type name can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameContext {
    /// A field declaration; `Option<...>` wrapping may apply
    Declaration,
    /// A bare type reference (loop element declarations, generics)
    Bare,
    /// The zero-construction expression for the type
    EmptyValue,
    /// The explicit "absent" literal when the type has one, else the zero value
    EmptyOrNone,
    /// A reference position
    Pointer,
}

/// Which representation a converter names and converts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The wrapper representation generated by this compiler
    Wrapper,
    /// The original generated bindings
    Source,
}

/// Per-type code generation capability.
///
/// `generate_import` and `generate_export` write complete statements moving
/// a value between representations and report whether the emitted statement
/// can fail. In the Rust surface a fallible statement carries its own `?`
/// short-circuit; the returned flag tells the emitter what the statement
/// may do to control flow.
pub trait TypeConverter {
    /// The type's name in the requested source context.
    fn type_name(&self, unit: &mut OutputUnit, ctx: NameContext) -> String;

    /// Whether the underlying type is reference-like.
    fn is_pointer_like(&self) -> bool;

    /// Write statements converting `src` (original) into `dest` (wrapper).
    fn generate_import(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool>;

    /// Write statements converting `src` (wrapper) into `dest` (original).
    fn generate_export(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool>;
}

/// Extension point: claims responsibility for specific resolved types.
///
/// At most one plugin should claim a given type; when several match, the
/// first registered wins. That ordering is a caller contract, not
/// arbitrated here.
pub trait ConverterPlugin {
    /// Return a converter for the type, or `None` to pass.
    fn match_type(&self, ty: &ResolvedType) -> Option<Box<dyn TypeConverter>>;
}

/// Read-only context of the file currently being generated.
#[derive(Clone, Copy)]
pub struct FileContext<'a> {
    /// The schema graph
    pub graph: &'a SchemaGraph,
    /// The file wrappers are being generated for
    pub file: &'a SchemaFile,
    /// Optional output-package override hook
    pub package_source: Option<&'a dyn PackageSource>,
}

/// Ordered registry of converter plugins plus the built-in fallbacks.
#[derive(Default)]
pub struct ConverterSet {
    plugins: Vec<Box<dyn ConverterPlugin>>,
}

impl ConverterSet {
    /// Create an empty set (default and scalar converters only).
    pub fn new() -> Self { Self::default() }

    /// Register a plugin. Registration order is probe order.
    pub fn register(&mut self, plugin: Box<dyn ConverterPlugin>) { self.plugins.push(plugin); }

    /// Number of registered plugins.
    pub fn len(&self) -> usize { self.plugins.len() }

    /// True when no plugin is registered.
    pub fn is_empty(&self) -> bool { self.plugins.is_empty() }

    /// Select the converter for a resolved reference.
    ///
    /// Scalars short-circuit to the scalar converter. Named types probe the
    /// plugins in registration order (wrapper side only) and fall back to
    /// the default converter.
    pub fn converter_for<'g>(
        &self,
        cx: FileContext<'g>,
        tyref: &TypeRef,
        side: Side,
    ) -> Box<dyn TypeConverter + 'g> {
        match tyref {
            TypeRef::Scalar(scalar) => Box::new(ScalarConverter::new(*scalar, cx.file.syntax())),
            TypeRef::Named(rt) => {
                if side == Side::Wrapper {
                    for plugin in &self.plugins {
                        if let Some(tc) = plugin.match_type(rt) {
                            return tc;
                        }
                    }
                }
                Box::new(DefaultConverter { cx, ty: rt.clone(), side })
            }
        }
    }
}

/// Default type converter for registry-backed types.
pub struct DefaultConverter<'a> {
    cx: FileContext<'a>,
    ty: ResolvedType,
    side: Side,
}

impl DefaultConverter<'_> {
    fn scoped_segments(&self) -> Vec<String> {
        self.ty.name.split('.').map(str::to_string).collect()
    }

    /// Name of the type as the wrapper surface spells it, declaring the
    /// owning module as a dependency when it lives elsewhere.
    fn wrapper_name(&self, unit: &mut OutputUnit) -> String {
        let segments = self.scoped_segments();
        let owning = self.cx.graph.file(&self.ty.file);

        if !naming::file_is_wrapped(self.cx.graph, &self.ty.file) {
            // Unwrapped files are referenced by direct alias to the
            // original bindings.
            let path = owning
                .map(naming::source_module_path)
                .unwrap_or_else(|| naming::package_to_module(&self.ty.package));
            let alias = unit.declare_dependency(&path, "");
            return format!("{}::{}", alias, util::source_path(&segments));
        }

        let same_package = owning.map(|f| f.same_package(self.cx.file)).unwrap_or(false);
        let flat = util::wrapper_ident(&segments);
        if same_package {
            flat
        } else {
            let path = owning
                .map(|f| naming::wrap_module_path(f, self.cx.package_source))
                .unwrap_or_else(|| naming::package_to_module(&self.ty.package));
            let alias = unit.declare_dependency(&path, "");
            format!("{}::{}", alias, flat)
        }
    }

    fn source_name(&self, unit: &mut OutputUnit) -> String {
        let segments = self.scoped_segments();
        let path = self
            .cx
            .graph
            .file(&self.ty.file)
            .map(naming::source_module_path)
            .unwrap_or_else(|| naming::package_to_module(&self.ty.package));
        let alias = unit.declare_dependency(&path, "");
        format!("{}::{}", alias, util::source_path(&segments))
    }

    fn base_name(&self, unit: &mut OutputUnit) -> String {
        match self.side {
            Side::Wrapper => self.wrapper_name(unit),
            Side::Source => self.source_name(unit),
        }
    }
}

impl TypeConverter for DefaultConverter<'_> {
    fn type_name(&self, unit: &mut OutputUnit, ctx: NameContext) -> String {
        let base = self.base_name(unit);
        match ctx {
            NameContext::Declaration => {
                let proto2_optional =
                    self.cx.file.syntax() == Syntax::Proto2 && self.ty.can_be_optional();
                if self.ty.is_pointer_like() || proto2_optional {
                    format!("Option<{}>", base)
                } else {
                    base
                }
            }
            NameContext::Bare | NameContext::Pointer => base,
            NameContext::EmptyValue => format!("{}::default()", base),
            NameContext::EmptyOrNone => {
                if self.ty.is_pointer_like() {
                    "None".to_string()
                } else {
                    format!("{}::default()", base)
                }
            }
        }
    }

    fn is_pointer_like(&self) -> bool { self.ty.is_pointer_like() }

    fn generate_import(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        if !naming::file_is_wrapped(self.cx.graph, &self.ty.file) {
            unit.p(&format!("{} = {}.clone();", dest, src));
            return Ok(false);
        }

        // Enum-kind types are identity-mapped aliases; no conversion
        // function exists for them.
        if self.ty.kind != DeclKind::Message {
            unit.p(&format!("{} = {};", dest, src));
            return Ok(false);
        }

        let name = self.wrapper_name(unit);
        unit.p(&format!("{} = {}::import({}.as_ref())?;", dest, name, src));
        Ok(true)
    }

    fn generate_export(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        if !naming::file_is_wrapped(self.cx.graph, &self.ty.file) {
            unit.p(&format!("{} = {}.clone();", dest, src));
            return Ok(false);
        }

        if self.ty.kind != DeclKind::Message {
            unit.p(&format!("{} = {};", dest, src));
            return Ok(false);
        }

        unit.p(&format!("{} = {}.export()?;", dest, src));
        Ok(true)
    }
}

/// Type converter for scalar fields.
pub struct ScalarConverter {
    scalar: ScalarType,
    syntax: Syntax,
}

impl ScalarConverter {
    /// Build a scalar converter for a field in a file of the given syntax.
    pub fn new(scalar: ScalarType, syntax: Syntax) -> Self { Self { scalar, syntax } }

    fn needs_clone(&self) -> bool {
        matches!(self.scalar, ScalarType::String | ScalarType::Bytes)
    }
}

impl TypeConverter for ScalarConverter {
    fn type_name(&self, _unit: &mut OutputUnit, ctx: NameContext) -> String {
        let rust = self.scalar.rust_type();
        match ctx {
            NameContext::Declaration if self.syntax == Syntax::Proto2 => {
                format!("Option<{}>", rust)
            }
            // The bare zero value; `Default::default()` stays valid for
            // generic scalars like `Vec<u8>`.
            NameContext::EmptyValue | NameContext::EmptyOrNone => "Default::default()".to_string(),
            _ => rust.to_string(),
        }
    }

    fn is_pointer_like(&self) -> bool { false }

    fn generate_import(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        // just assign
        if self.needs_clone() {
            unit.p(&format!("{} = {}.clone();", dest, src));
        } else {
            unit.p(&format!("{} = {};", dest, src));
        }
        Ok(false)
    }

    fn generate_export(&self, unit: &mut OutputUnit, src: &str, dest: &str) -> Result<bool> {
        // just assign
        if self.needs_clone() {
            unit.p(&format!("{} = {}.clone();", dest, src));
        } else {
            unit.p(&format!("{} = {};", dest, src));
        }
        Ok(false)
    }
}
