//! Declaration emitters.
//!
//! A [`Generator`] produces the wrapper output for a single schema file. It
//! walks the file's declarations depth-first, drives the customizer chain
//! and the type converters, and buffers everything into output units whose
//! headers are synthesized only once the full body is known.
//!
//! Every emitter follows the same shape: declare the wrapper type, then
//! emit its `import` function (original → wrapper), then its `export`
//! function (wrapper → original), iterating fields in declaration order.

use std::collections::BTreeMap;

use graph::{SchemaFile, SchemaGraph};
use schema::{EnumDecl, FieldDecl, FieldRef, MessageDecl, OneofDecl};

use crate::convert::{ConverterSet, FileContext, NameContext, Side, TypeConverter};
use crate::customize::{CustomizerChain, ParentDecl};
use crate::naming::{self, PackageSource};
use crate::output::{OutputUnit, UnitHeader};
use crate::scope;
use crate::service::ServiceGen;
use crate::util;
use crate::{clean_generated_source, output, CodegenError, Result};

/// Unit id of the default output unit.
pub const UNIT_MAIN: &str = "main";
/// Unit id service code is routed to.
pub const UNIT_SERVICE: &str = "service";

/// Fixed extension of generated wrapper files.
pub const EXTENSION: &str = ".wr.rs";

/// Routing entry for one output unit.
#[derive(Debug, Clone)]
pub struct UnitRoute {
    /// Unit id the route applies to
    pub id: String,
    /// File-name suffix of the unit
    pub suffix: String,
    /// Redirect writes into another unit instead of creating this one
    pub alias_of: Option<String>,
}

/// One finished output file.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    /// Output path relative to the sink root
    pub path: String,
    /// Rendered file contents
    pub contents: String,
}

/// Generates the wrapper output for a single schema file.
pub struct Generator<'a> {
    graph: &'a SchemaGraph,
    file: &'a SchemaFile,
    converters: &'a ConverterSet,
    customizers: &'a CustomizerChain,
    service_gen: Option<&'a dyn ServiceGen>,
    package_source: Option<&'a dyn PackageSource>,
    file_suffix: String,
    routes: Vec<UnitRoute>,
    units: BTreeMap<String, OutputUnit>,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for the file path.
    pub fn new(
        graph: &'a SchemaGraph,
        path: &str,
        converters: &'a ConverterSet,
        customizers: &'a CustomizerChain,
    ) -> Result<Self> {
        let file = graph.file(path).ok_or_else(|| {
            CodegenError::Message(format!("file '{}' not found in schema graph", path))
        })?;

        Ok(Self {
            graph,
            file,
            converters,
            customizers,
            service_gen: None,
            package_source: None,
            file_suffix: String::new(),
            routes: vec![
                UnitRoute { id: UNIT_MAIN.to_string(), suffix: String::new(), alias_of: None },
                UnitRoute {
                    id: UNIT_SERVICE.to_string(),
                    suffix: ".svc".to_string(),
                    alias_of: None,
                },
            ],
            units: BTreeMap::new(),
        })
    }

    /// The schema graph this generator reads.
    pub fn graph(&self) -> &'a SchemaGraph { self.graph }

    /// The file wrappers are generated for.
    pub fn file(&self) -> &'a SchemaFile { self.file }

    /// Set the service generation strategy.
    pub fn set_service_gen(&mut self, sg: &'a dyn ServiceGen) { self.service_gen = Some(sg); }

    /// Set the output-package override hook.
    pub fn set_package_source(&mut self, ps: &'a dyn PackageSource) {
        self.package_source = Some(ps);
    }

    /// Set the file-name suffix appended to every unit of this file.
    pub fn set_file_suffix(&mut self, suffix: &str) { self.file_suffix = suffix.to_string(); }

    /// Replace (or add) the routing entry for a unit id.
    pub fn set_route(&mut self, route: UnitRoute) {
        self.routes.retain(|r| r.id != route.id);
        self.routes.push(route);
    }

    /// Borrow an output unit, creating it on first use.
    ///
    /// A unit may be routed into another via its [`UnitRoute::alias_of`];
    /// the write then lands in the target unit.
    pub fn unit_mut(&mut self, id: &str) -> &mut OutputUnit {
        let (target, suffix) = self.route_for(id);
        self.units.entry(target).or_insert_with_key(|k| OutputUnit::new(k.clone(), suffix))
    }

    fn route_for(&self, id: &str) -> (String, String) {
        let mut target = id.to_string();
        if let Some(route) = self.routes.iter().find(|r| r.id == target) {
            if let Some(alias) = &route.alias_of {
                target = alias.clone();
            }
        }
        let suffix = self
            .routes
            .iter()
            .find(|r| r.id == target)
            .map(|r| r.suffix.clone())
            .unwrap_or_default();
        (target, suffix)
    }

    /// Declare the current file's original-bindings module on a unit and
    /// return the alias.
    pub fn source_alias(&mut self, unit_id: &str) -> String {
        let path = naming::source_module_path(self.file);
        self.unit_mut(unit_id).declare_dependency(&path, "")
    }

    /// Declare the runtime support crate on a unit and return the alias.
    pub fn runtime_alias(&mut self, unit_id: &str) -> String {
        self.unit_mut(unit_id).declare_dependency("wrapgen_runtime", "")
    }

    /// The file context converters are built against.
    pub fn file_context(&self) -> FileContext<'a> {
        FileContext { graph: self.graph, file: self.file, package_source: self.package_source }
    }

    /// Resolve a field type and select its wrapper-side converter.
    pub fn wrapper_type(
        &self,
        scope_path: &[String],
        fldtype: &str,
    ) -> Result<Box<dyn TypeConverter + 'a>> {
        let tyref = scope::resolve_in_scope(self.graph, self.file, scope_path, fldtype)?;
        Ok(self.converters.converter_for(self.file_context(), &tyref, Side::Wrapper))
    }

    /// Resolve a field type and select its source-side converter.
    pub fn source_type(
        &self,
        scope_path: &[String],
        fldtype: &str,
    ) -> Result<Box<dyn TypeConverter + 'a>> {
        let tyref = scope::resolve_in_scope(self.graph, self.file, scope_path, fldtype)?;
        Ok(self.converters.converter_for(self.file_context(), &tyref, Side::Source))
    }

    /// Resolve a field type once and select both converters.
    pub fn both_types(
        &self,
        scope_path: &[String],
        fldtype: &str,
    ) -> Result<(Box<dyn TypeConverter + 'a>, Box<dyn TypeConverter + 'a>)> {
        let tyref = scope::resolve_in_scope(self.graph, self.file, scope_path, fldtype)?;
        let cx = self.file_context();
        let wrapper = self.converters.converter_for(cx, &tyref, Side::Wrapper);
        let source = self.converters.converter_for(cx, &tyref, Side::Source);
        Ok((wrapper, source))
    }

    /// Executes the generator over the whole file.
    pub fn generate(&mut self) -> Result<()> {
        let chain = self.customizers;

        self.generate_enums()?;
        self.generate_messages()?;

        chain.generate_code(self)?;

        self.generate_services()?;

        chain.generate_service_code(self)?;

        Ok(())
    }

    /// Generates the file's top-level enums.
    pub fn generate_enums(&mut self) -> Result<()> {
        let file = self.file;
        for en in &file.file.enums {
            self.generate_enum(en, &[])?;
        }
        Ok(())
    }

    /// Generates the file's top-level messages.
    pub fn generate_messages(&mut self) -> Result<()> {
        let file = self.file;
        for msg in &file.file.messages {
            self.generate_message(msg, &[])?;
        }
        Ok(())
    }

    /// Generates the file's services through the configured strategy.
    pub fn generate_services(&mut self) -> Result<()> {
        let Some(sg) = self.service_gen else {
            return Ok(());
        };
        let file = self.file;
        for svc in &file.file.services {
            sg.generate_service(self, svc)?;
        }
        Ok(())
    }

    fn p(&mut self, line: &str) { self.unit_mut(UNIT_MAIN).p(line); }

    fn indent(&mut self) { self.unit_mut(UNIT_MAIN).indent(); }

    fn outdent(&mut self) { self.unit_mut(UNIT_MAIN).outdent(); }

    /// A multi-line comment banner starting and ending with an empty `//`.
    fn banner(&mut self, label: &str, name: &str) {
        self.p("//");
        self.p(&format!("// {}{}", label, name));
        self.p("//");
    }

    fn generate_message(&mut self, message: &MessageDecl, scope_path: &[String]) -> Result<()> {
        let file = self.file;
        let chain = self.customizers;

        let mut msg_scoped: Vec<String> = scope_path.to_vec();
        msg_scoped.push(message.name.clone());
        let schema_name = msg_scoped.join(".");
        let struct_name = util::wrapper_ident(&msg_scoped);

        let src_alias = self.source_alias(UNIT_MAIN);
        let rt_alias = self.runtime_alias(UNIT_MAIN);
        let src_type = format!("{}::{}", src_alias, util::source_path(&msg_scoped));

        //
        // pub struct MyMessage
        //
        self.banner("MESSAGE: ", &schema_name);

        self.p("#[derive(Default)]");
        self.p(&format!("pub struct {} {{", struct_name));
        self.indent();

        for fld in &message.fields {
            let tag = chain.get_tag(file, ParentDecl::Message(message), fld.as_field_ref())?;
            for line in tag.render_lines() {
                self.p(&line);
            }

            match fld {
                FieldDecl::Plain(f) => {
                    let tc = self.wrapper_type(&msg_scoped, &f.type_name)?;
                    let ident = util::field_ident(&f.name);
                    if f.repeated {
                        let elem = tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
                        self.p(&format!("pub {}: Vec<{}>,", ident, elem));
                    } else {
                        let decl =
                            tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Declaration);
                        self.p(&format!("pub {}: {},", ident, decl));
                    }
                }
                FieldDecl::Map(f) => {
                    let key_tc = self.wrapper_type(&msg_scoped, &f.key_type)?;
                    let val_tc = self.wrapper_type(&msg_scoped, &f.value_type)?;
                    let key = key_tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
                    let val = val_tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
                    self.p(&format!(
                        "pub {}: std::collections::BTreeMap<{}, {}>,",
                        util::field_ident(&f.name),
                        key,
                        val
                    ));
                }
                FieldDecl::Oneof(oo) => {
                    let mut oo_segs = msg_scoped.clone();
                    oo_segs.push(oo.name.clone());
                    let marker = util::wrapper_ident(&oo_segs);
                    self.p(&format!(
                        "pub {}: Option<Box<dyn {}>>,",
                        util::field_ident(&oo.name),
                        marker
                    ));
                }
            }
        }

        self.outdent();
        self.p("}");
        self.p("");

        //
        // pub fn import(s: Option<&pb::MyMessage>) -> Result<Option<Self>, ...>
        //
        self.banner("IMPORT: ", &schema_name);

        self.p(&format!("impl {} {{", struct_name));
        self.indent();
        self.p(&format!(
            "pub fn import(s: Option<&{}>) -> Result<Option<Self>, {}::ConvertError> {{",
            src_type, rt_alias
        ));
        self.indent();

        self.p("let s = match s {");
        self.indent();
        self.p("Some(v) => v,");
        self.p("None => return Ok(None),");
        self.outdent();
        self.p("};");
        self.p("let mut ret = Self::default();");

        for fld in &message.fields {
            self.p(&format!("// {}.{}", schema_name, fld.name()));

            match fld {
                FieldDecl::Plain(f) => {
                    let tc = self.wrapper_type(&msg_scoped, &f.type_name)?;
                    let ident = util::field_ident(&f.name);

                    if f.repeated {
                        self.p(&format!("for ms in &s.{} {{", ident));
                        self.indent();
                        let elem = tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
                        self.p(&format!("let msi: {};", elem));

                        tc.generate_import(self.unit_mut(UNIT_MAIN), "ms", "msi")?;

                        self.p(&format!("ret.{}.push(msi);", ident));
                        self.outdent();
                        self.p("}");
                    } else {
                        tc.generate_import(
                            self.unit_mut(UNIT_MAIN),
                            &format!("s.{}", ident),
                            &format!("ret.{}", ident),
                        )?;
                    }
                }
                FieldDecl::Map(f) => {
                    let val_tc = self.wrapper_type(&msg_scoped, &f.value_type)?;
                    let ident = util::field_ident(&f.name);

                    self.p(&format!("for (msidx, ms) in &s.{} {{", ident));
                    self.indent();
                    let elem = val_tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
                    self.p(&format!("let msi: {};", elem));

                    val_tc.generate_import(self.unit_mut(UNIT_MAIN), "ms", "msi")?;

                    self.p(&format!("ret.{}.insert(msidx.clone(), msi);", ident));
                    self.outdent();
                    self.p("}");
                }
                FieldDecl::Oneof(oo) => {
                    let ident = util::field_ident(&oo.name);
                    let oneof_path = self.source_oneof_path(&src_alias, &msg_scoped, &oo.name);

                    self.p(&format!("match &s.{} {{", ident));
                    self.indent();

                    for oofld in &oo.fields {
                        let mut fld_segs = msg_scoped.clone();
                        fld_segs.push(oofld.name.clone());
                        let fld_struct = util::wrapper_ident(&fld_segs);
                        let variant = util::pascal_case(&oofld.name);

                        self.p(&format!("Some({}::{}(en)) => {{", oneof_path, variant));
                        self.indent();
                        self.p(&format!(
                            "ret.{} = Some(Box::new({}::import(en)?));",
                            ident, fld_struct
                        ));
                        self.outdent();
                        self.p("}");
                    }

                    self.p("None => {}");
                    self.outdent();
                    self.p("}");
                }
            }
        }

        self.p("Ok(Some(ret))");
        self.outdent();
        self.p("}");
        self.p("");

        //
        // pub fn export(&self) -> Result<pb::MyMessage, ...>
        //
        self.banner("EXPORT: ", &schema_name);

        self.p(&format!(
            "pub fn export(&self) -> Result<{}, {}::ConvertError> {{",
            src_type, rt_alias
        ));
        self.indent();
        self.p(&format!("let mut ret = {}::default();", src_type));

        for fld in &message.fields {
            self.p(&format!("// {}.{}", schema_name, fld.name()));

            match fld {
                FieldDecl::Plain(f) => {
                    let (tc, src_tc) = self.both_types(&msg_scoped, &f.type_name)?;
                    let ident = util::field_ident(&f.name);

                    if f.repeated {
                        self.p(&format!("for ms in &self.{} {{", ident));
                        self.indent();
                        let elem = src_tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
                        self.p(&format!("let msi: {};", elem));

                        tc.generate_export(self.unit_mut(UNIT_MAIN), "ms", "msi")?;

                        self.p(&format!("ret.{}.push(msi);", ident));
                        self.outdent();
                        self.p("}");
                    } else {
                        tc.generate_export(
                            self.unit_mut(UNIT_MAIN),
                            &format!("self.{}", ident),
                            &format!("ret.{}", ident),
                        )?;
                    }
                }
                FieldDecl::Map(f) => {
                    let (val_tc, src_val_tc) = self.both_types(&msg_scoped, &f.value_type)?;
                    let ident = util::field_ident(&f.name);

                    self.p(&format!("for (msidx, ms) in &self.{} {{", ident));
                    self.indent();
                    let elem = src_val_tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
                    self.p(&format!("let msi: {};", elem));

                    val_tc.generate_export(self.unit_mut(UNIT_MAIN), "ms", "msi")?;

                    self.p(&format!("ret.{}.insert(msidx.clone(), msi);", ident));
                    self.outdent();
                    self.p("}");
                }
                FieldDecl::Oneof(oo) => {
                    let ident = util::field_ident(&oo.name);
                    self.p(&format!("if let Some(en) = &self.{} {{", ident));
                    self.indent();
                    self.p(&format!("ret.{} = en.export()?;", ident));
                    self.outdent();
                    self.p("}");
                }
            }
        }

        self.p("Ok(ret)");
        self.outdent();
        self.p("}");
        self.outdent();
        self.p("}");
        self.p("");

        // Enums
        for en in &message.enums {
            self.generate_enum(en, &msg_scoped)?;
        }

        // Oneofs
        for fld in &message.fields {
            if let FieldDecl::Oneof(oo) = fld {
                self.generate_oneof(oo, &msg_scoped)?;
            }
        }

        // Submessages
        for sub in &message.messages {
            self.generate_message(sub, &msg_scoped)?;
        }

        Ok(())
    }

    fn generate_enum(&mut self, en: &EnumDecl, scope_path: &[String]) -> Result<()> {
        let mut segs: Vec<String> = scope_path.to_vec();
        segs.push(en.name.clone());
        let schema_name = segs.join(".");
        let alias_name = util::wrapper_ident(&segs);

        let src_alias = self.source_alias(UNIT_MAIN);

        //
        // pub type MyEnum = pb::MyEnum
        //
        self.banner("ENUM: ", &schema_name);
        self.p(&format!(
            "pub type {} = {}::{};",
            alias_name,
            src_alias,
            util::source_path(&segs)
        ));
        self.p("");

        Ok(())
    }

    fn generate_oneof(&mut self, oneof: &OneofDecl, scope_path: &[String]) -> Result<()> {
        let file = self.file;
        let chain = self.customizers;

        let mut oo_segs: Vec<String> = scope_path.to_vec();
        oo_segs.push(oneof.name.clone());
        let schema_name = oo_segs.join(".");
        let marker = util::wrapper_ident(&oo_segs);

        let src_alias = self.source_alias(UNIT_MAIN);
        let rt_alias = self.runtime_alias(UNIT_MAIN);
        let oneof_path = self.source_oneof_path(&src_alias, scope_path, &oneof.name);

        //
        // pub trait StructOneof { fn export(...) }
        //
        self.banner("ONEOF: ", &schema_name);

        self.p(&format!("pub trait {} {{", marker));
        self.indent();
        self.p(&format!(
            "fn export(&self) -> Result<Option<{}>, {}::ConvertError>;",
            oneof_path, rt_alias
        ));
        self.outdent();
        self.p("}");
        self.p("");

        for oofld in &oneof.fields {
            let tag = chain.get_tag(file, ParentDecl::Oneof(oneof), FieldRef::Plain(oofld))?;

            // The variant struct is named with the parent message scope,
            // not the oneof name.
            let mut fld_segs: Vec<String> = scope_path.to_vec();
            fld_segs.push(oofld.name.clone());
            let fld_struct = util::wrapper_ident(&fld_segs);
            let fld_schema_name = format!("{}.{}", schema_name, oofld.name);
            let ident = util::field_ident(&oofld.name);
            let variant = util::pascal_case(&oofld.name);

            let (tc, src_tc) = self.both_types(scope_path, &oofld.type_name)?;

            //
            // pub struct StructOneofField { field: ... }
            //
            self.banner("ONEOF Field: ", &fld_schema_name);

            self.p("#[derive(Default)]");
            self.p(&format!("pub struct {} {{", fld_struct));
            self.indent();
            for line in tag.render_lines() {
                self.p(&line);
            }
            let decl = tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);
            self.p(&format!("pub {}: {},", ident, decl));
            self.outdent();
            self.p("}");
            self.p("");

            let payload = src_tc.type_name(self.unit_mut(UNIT_MAIN), NameContext::Bare);

            //
            // pub fn import(s: &payload) -> Result<Self, ...>
            //
            self.banner("IMPORT: ", &fld_schema_name);

            self.p(&format!("impl {} {{", fld_struct));
            self.indent();
            self.p(&format!(
                "pub fn import(s: &{}) -> Result<Self, {}::ConvertError> {{",
                payload, rt_alias
            ));
            self.indent();
            self.p("let mut ret = Self::default();");

            tc.generate_import(self.unit_mut(UNIT_MAIN), "s", &format!("ret.{}", ident))?;

            self.p("Ok(ret)");
            self.outdent();
            self.p("}");
            self.outdent();
            self.p("}");
            self.p("");

            //
            // fn export(&self) -> Result<Option<pb::Oneof>, ...>
            //
            self.banner("EXPORT: ", &fld_schema_name);

            self.p(&format!("impl {} for {} {{", marker, fld_struct));
            self.indent();
            self.p(&format!(
                "fn export(&self) -> Result<Option<{}>, {}::ConvertError> {{",
                oneof_path, rt_alias
            ));
            self.indent();
            self.p(&format!("let ret: {};", payload));

            tc.generate_export(self.unit_mut(UNIT_MAIN), &format!("self.{}", ident), "ret")?;

            self.p(&format!("Ok(Some({}::{}(ret)))", oneof_path, variant));
            self.outdent();
            self.p("}");
            self.outdent();
            self.p("}");
            self.p("");
        }

        Ok(())
    }

    /// Module path of a oneof's enum in the original bindings
    /// (`pb::my_message::Contact` style).
    fn source_oneof_path(&self, src_alias: &str, scope_path: &[String], name: &str) -> String {
        let modules: Vec<String> = scope_path.iter().map(|s| util::snake_case(s)).collect();
        if modules.is_empty() {
            format!("{}::{}", src_alias, util::pascal_case(name))
        } else {
            format!("{}::{}::{}", src_alias, modules.join("::"), util::pascal_case(name))
        }
    }

    /// Finalize every unit: render headers, clean the text, validate it,
    /// and return the non-empty files. Empty units are discarded.
    pub fn finish(self) -> Result<Vec<RenderedFile>> {
        let wrap_pkg = naming::wrap_package(self.file, self.package_source);
        naming::validate_package(&wrap_pkg)?;

        let header = UnitHeader {
            package: wrap_pkg.clone(),
            source_path: self.file.path().to_string(),
        };
        let stem = util::file_stem(self.file.path());
        let dir = naming::package_to_path(&wrap_pkg);

        let mut rendered = Vec::new();
        for unit in self.units.values() {
            if let Some(text) = unit.finalize(&header)? {
                let cleaned = clean_generated_source(&text);
                let path =
                    format!("{}/{}{}{}{}", dir, stem, unit.suffix(), self.file_suffix, EXTENSION);
                output::check_balanced(&cleaned)
                    .map_err(|e| CodegenError::MalformedOutput(path.clone(), e))?;
                rendered.push(RenderedFile { path, contents: cleaned });
            }
        }
        Ok(rendered)
    }
}
