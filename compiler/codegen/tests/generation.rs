//! End-to-end generation tests over a small schema graph.
//!
//! These tests run the full declaration walk and assert on the emitted
//! wrapper source: field declarations, import/export bodies, loop shapes,
//! oneof dispatch, plugin substitution and unit routing.

use codegen::converters::TimestampPlugin;
use codegen::customizers::SerdeTagCustomizer;
use codegen::{
    ConverterSet, CustomizerChain, Generator, GrpcServiceGen, RenderedFile, UnitRoute,
    UNIT_SERVICE,
};
use graph::SchemaGraph;

fn sample_graph() -> SchemaGraph {
    let json = r#"{
      "files": [
        {"source": "own", "file": {
          "path": "myapp/user.proto",
          "package": "myapp",
          "options": [{"name": "wrapgen.package", "value": "myapp.wrap"},
                      {"name": "rust_package", "value": "pb"}],
          "enums": [{"name": "Level", "constants": [{"name": "LOW", "number": 0}]}],
          "messages": [
            {"name": "Profile", "fields": [
              {"kind": "plain", "name": "display_name", "type_name": "string"}
            ]},
            {"name": "User", "fields": [
              {"kind": "plain", "name": "id", "type_name": "string"},
              {"kind": "plain", "name": "level", "type_name": "Level"},
              {"kind": "plain", "name": "tags", "type_name": "string", "repeated": true},
              {"kind": "map", "name": "attrs", "key_type": "string", "value_type": "string"},
              {"kind": "plain", "name": "profile", "type_name": "Profile"},
              {"kind": "plain", "name": "ext", "type_name": "other.ExtMsg"},
              {"kind": "plain", "name": "created_at", "type_name": "google.protobuf.Timestamp"},
              {"kind": "oneof", "name": "contact", "fields": [
                {"name": "email", "type_name": "string"},
                {"name": "phone", "type_name": "string"}
              ]}
            ]},
            {"name": "GetUserRequest", "fields": [
              {"kind": "plain", "name": "id", "type_name": "string"}
            ]},
            {"name": "GetUserResponse", "fields": [
              {"kind": "plain", "name": "user", "type_name": "User"}
            ]}
          ],
          "services": [{"name": "UserService", "rpcs": [
            {"name": "GetUser", "request_type": "GetUserRequest",
             "response_type": "GetUserResponse"},
            {"name": "Watch", "request_type": "GetUserRequest",
             "response_type": "GetUserResponse", "streams_response": true}
          ]}]
        }},
        {"source": "own", "file": {
          "path": "other/ext.proto", "package": "other",
          "options": [{"name": "wrapgen.wrap", "value": "false"}],
          "messages": [{"name": "ExtMsg", "fields": []}]
        }},
        {"source": "own", "file": {
          "path": "empty/none.proto", "package": "empty"
        }},
        {"source": "import", "file": {
          "path": "google/protobuf/timestamp.proto", "package": "google.protobuf",
          "messages": [{"name": "Timestamp", "fields": [
            {"kind": "plain", "name": "seconds", "type_name": "int64"},
            {"kind": "plain", "name": "nanos", "type_name": "int32"}
          ]}]
        }}
      ]
    }"#;
    SchemaGraph::from_json(json).expect("valid graph json")
}

fn generate(
    graph: &SchemaGraph,
    path: &str,
    converters: &ConverterSet,
    customizers: &CustomizerChain,
) -> Vec<RenderedFile> {
    let mut g = Generator::new(graph, path, converters, customizers).expect("file exists");
    g.generate().expect("generation succeeds");
    g.finish().expect("finish succeeds")
}

fn main_file(files: &[RenderedFile]) -> &RenderedFile {
    files.iter().find(|f| f.path.ends_with("user.wr.rs")).expect("main unit rendered")
}

#[test]
fn test_output_path_uses_wrap_package() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    assert_eq!(files.len(), 1, "only the main unit has data without a service generator");
    assert_eq!(files[0].path, "myapp/wrap/user.wr.rs");
}

#[test]
fn test_header_precedes_body_and_is_marked_generated() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text.starts_with("// Code generated by wrapgen. DO NOT EDIT."));
    assert!(text.contains("// source file: myapp/user.proto"));
    assert!(text.contains("//! Wrapper types for schema package `myapp.wrap`."));

    let imports_pos = text.find("use pb;").expect("source bindings imported");
    let body_pos = text.find("pub struct").expect("body present");
    assert!(imports_pos < body_pos);
    assert!(text.contains("use wrapgen_runtime;"));
}

#[test]
fn test_field_declarations() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text.contains("pub struct User {"));
    assert!(text.contains("pub id: String,"));
    assert!(text.contains("pub level: Level,"));
    assert!(text.contains("pub tags: Vec<String>,"));
    assert!(text.contains("pub attrs: std::collections::BTreeMap<String, String>,"));
    assert!(text.contains("pub profile: Option<Profile>,"));
    // Unwrapped file: direct alias to the original bindings.
    assert!(text.contains("pub ext: Option<other::ExtMsg>,"));
    assert!(text.contains("pub contact: Option<Box<dyn UserContact>>,"));
}

#[test]
fn test_enum_is_a_direct_alias() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text.contains("pub type Level = pb::Level;"));
    // Identity mapping in conversions, both directions.
    assert!(text.contains("ret.level = s.level;"));
    assert!(text.contains("ret.level = self.level;"));
}

#[test]
fn test_import_short_circuits_absent_original() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text
        .contains("pub fn import(s: Option<&pb::User>) -> Result<Option<Self>, wrapgen_runtime::ConvertError> {"));
    assert!(text.contains("None => return Ok(None),"));
}

#[test]
fn test_repeated_field_emits_accumulating_loop() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    // Import: fresh collection fed element by element.
    assert!(text.contains("for ms in &s.tags {"));
    assert!(text.contains("let msi: String;"));
    assert!(text.contains("msi = ms.clone();"));
    assert!(text.contains("ret.tags.push(msi);"));

    // Export: same loop over the wrapper.
    assert!(text.contains("for ms in &self.tags {"));
}

#[test]
fn test_map_field_preserves_keys_and_converts_values() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text.contains("for (msidx, ms) in &s.attrs {"));
    assert!(text.contains("ret.attrs.insert(msidx.clone(), msi);"));
    assert!(text.contains("for (msidx, ms) in &self.attrs {"));
}

#[test]
fn test_embedded_message_delegates_to_generated_pair() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text.contains("ret.profile = Profile::import(s.profile.as_ref())?;"));
    assert!(text.contains("ret.profile = self.profile.export()?;"));
}

#[test]
fn test_unwrapped_file_reference_is_direct_assignment() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text.contains("ret.ext = s.ext.clone();"));
    assert!(!text.contains("ExtMsg::import"));
}

#[test]
fn test_oneof_marker_variants_and_dispatch() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;

    // Marker capability type.
    assert!(text.contains("pub trait UserContact {"));

    // One synthetic variant type per inner field, named with the parent
    // message scope.
    assert!(text.contains("pub struct UserEmail {"));
    assert!(text.contains("pub struct UserPhone {"));
    assert!(text.contains("impl UserContact for UserEmail {"));

    // Import dispatches over the original oneof enum, variant by variant.
    assert!(text.contains("match &s.contact {"));
    assert!(text.contains("Some(pb::user::Contact::Email(en)) => {"));
    assert!(text.contains("ret.contact = Some(Box::new(UserEmail::import(en)?));"));
    assert!(text.contains("Some(pb::user::Contact::Phone(en)) => {"));

    // Export goes through the marker capability and restores the selector.
    assert!(text.contains("if let Some(en) = &self.contact {"));
    assert!(text.contains("ret.contact = en.export()?;"));
    assert!(text.contains("Ok(Some(pb::user::Contact::Email(ret)))"));
    assert!(text.contains("Ok(Some(pb::user::Contact::Phone(ret)))"));
}

#[test]
fn test_plugin_substitutes_well_known_type() {
    let graph = sample_graph();

    // Without the plugin the timestamp is an unwrapped cross-file message.
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    let text = &main_file(&files).contents;
    assert!(text.contains("pub created_at: Option<protobuf::Timestamp>,"));
    assert!(text.contains("ret.created_at = s.created_at.clone();"));

    // With the plugin registered, the field type and conversions change.
    let mut converters = ConverterSet::new();
    converters.register(Box::new(TimestampPlugin));
    let files = generate(&graph, "myapp/user.proto", &converters, &CustomizerChain::new());
    let text = &main_file(&files).contents;

    assert!(text.contains("pub created_at: chrono::DateTime<chrono::Utc>,"));
    assert!(text.contains("if let Some(ts) = s.created_at {"));
    assert!(text.contains("chrono::DateTime::from_timestamp(ts.seconds, ts.nanos as u32)"));
    assert!(text.contains("use chrono;"));
    assert!(text.contains("use prost_types;"));
}

#[test]
fn test_customizer_tags_are_rendered_above_fields() {
    let json = r#"{"files": [{"source": "own", "file": {
        "path": "myapp/tagged.proto", "package": "myapp",
        "options": [{"name": "rust_package", "value": "pb"}],
        "messages": [{"name": "Tagged", "fields": [
            {"kind": "plain", "name": "userName", "type_name": "string"},
            {"kind": "plain", "name": "secret", "type_name": "string",
             "options": [{"name": "wrapgen.json.tag_disable", "value": "true"}]}
        ]}]
    }}]}"#;
    let graph = SchemaGraph::from_json(json).expect("valid graph json");

    let mut customizers = CustomizerChain::new();
    customizers.register(Box::new(SerdeTagCustomizer));
    let files = generate(&graph, "myapp/tagged.proto", &ConverterSet::new(), &customizers);
    let text = &files[0].contents;

    assert!(text.contains("#[serde(rename = \"user_name\")]\n    pub user_name: String,"));
    // The disabling option produces the literal skip placeholder, never the
    // computed default name.
    assert!(text.contains("#[serde(skip)]\n    pub secret: String,"));
    assert!(!text.contains("rename = \"secret\""));
}

#[test]
fn test_service_routed_to_own_unit() {
    let graph = sample_graph();
    let converters = ConverterSet::new();
    let customizers = CustomizerChain::new();
    let service_gen = GrpcServiceGen::new();

    let mut g = Generator::new(&graph, "myapp/user.proto", &converters, &customizers)
        .expect("file exists");
    g.set_service_gen(&service_gen);
    g.generate().expect("generation succeeds");
    let files = g.finish().expect("finish succeeds");

    assert_eq!(files.len(), 2);
    let svc = files.iter().find(|f| f.path == "myapp/wrap/user.svc.wr.rs").expect("service unit");

    assert!(svc.contents.contains("pub struct UserServiceClient {"));
    assert!(svc.contents.contains("pub async fn get_user("));
    assert!(svc.contents.contains("req: Option<GetUserRequest>,"));
    assert!(svc
        .contents
        .contains(") -> Result<Option<GetUserResponse>, wrapgen_runtime::ConvertError> {"));
    assert!(svc.contents.contains("GetUserResponse::import(Some(resp.get_ref()))"));
    assert!(svc.contents.contains("use tonic;"));

    // Streaming RPCs are passed through untranslated.
    assert!(svc.contents.contains(
        "// UserService.Watch: streaming RPC is passed through; use the original client directly."
    ));
    assert!(!svc.contents.contains("pub async fn watch("));
}

#[test]
fn test_service_unit_can_be_aliased_into_main() {
    let graph = sample_graph();
    let converters = ConverterSet::new();
    let customizers = CustomizerChain::new();
    let service_gen = GrpcServiceGen::new();

    let mut g = Generator::new(&graph, "myapp/user.proto", &converters, &customizers)
        .expect("file exists");
    g.set_service_gen(&service_gen);
    g.set_route(UnitRoute {
        id: UNIT_SERVICE.to_string(),
        suffix: String::new(),
        alias_of: Some("main".to_string()),
    });
    g.generate().expect("generation succeeds");
    let files = g.finish().expect("finish succeeds");

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "myapp/wrap/user.wr.rs");
    assert!(files[0].contents.contains("pub async fn get_user("));
    assert!(files[0].contents.contains("pub struct User {"));
}

#[test]
fn test_file_without_declarations_renders_nothing() {
    let graph = sample_graph();
    let files =
        generate(&graph, "empty/none.proto", &ConverterSet::new(), &CustomizerChain::new());
    assert!(files.is_empty());
}

#[test]
fn test_unresolved_reference_aborts_generation() {
    let json = r#"{"files": [{"source": "own", "file": {
        "path": "myapp/broken.proto", "package": "myapp",
        "messages": [{"name": "Broken", "fields": [
            {"kind": "plain", "name": "x", "type_name": "NoSuchType"}
        ]}]
    }}]}"#;
    let graph = SchemaGraph::from_json(json).expect("valid graph json");
    let converters = ConverterSet::new();
    let customizers = CustomizerChain::new();

    let mut g = Generator::new(&graph, "myapp/broken.proto", &converters, &customizers)
        .expect("file exists");
    let err = g.generate().expect_err("must fail");
    assert!(err.to_string().contains("NoSuchType"));
    assert!(err.to_string().contains("myapp/broken.proto"));
}

#[test]
fn test_rendered_output_is_balanced_and_clean() {
    let graph = sample_graph();
    let files =
        generate(&graph, "myapp/user.proto", &ConverterSet::new(), &CustomizerChain::new());
    for file in &files {
        assert!(file.contents.ends_with('\n'));
        assert!(!file.contents.contains(" \n"), "no trailing whitespace survives cleanup");
        // finish() already ran the balance check; spot-check the obvious.
        assert_eq!(
            file.contents.matches('{').count(),
            file.contents.matches('}').count(),
            "braces balance in {}",
            file.path
        );
    }
}
