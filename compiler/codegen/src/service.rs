//! Service stub generation.
//!
//! Service emission is a pluggable strategy: it consumes the same type
//! converter primitives as the declaration emitters but contributes no new
//! resolution logic. The bundled [`GrpcServiceGen`] wraps tonic-style
//! generated clients; other transports implement [`ServiceGen`] themselves.

use schema::ServiceDecl;

use crate::convert::{NameContext, TypeConverter};
use crate::generator::{Generator, UNIT_SERVICE};
use crate::util;
use crate::Result;

/// Interface to generate service specifications.
pub trait ServiceGen {
    /// Transport kind identifier (e.g. `"grpc"`).
    fn service_kind(&self) -> &'static str;

    /// Emit the wrapper for one service declaration.
    fn generate_service(&self, g: &mut Generator<'_>, svc: &ServiceDecl) -> Result<()>;
}

/// Generates service wrappers for tonic-style gRPC clients.
///
/// For every unary RPC the client wrapper exports the request, calls the
/// underlying generated client, and imports the response. Streaming RPCs
/// are passed through untranslated; callers use the original client for
/// those.
pub struct GrpcServiceGen {
    /// Fold transport status errors into the conversion error type.
    pub wrap_errors: bool,
}

impl GrpcServiceGen {
    /// Create the strategy with error wrapping enabled.
    pub fn new() -> Self { Self { wrap_errors: true } }
}

impl Default for GrpcServiceGen {
    fn default() -> Self { Self::new() }
}

fn sp(g: &mut Generator<'_>, line: &str) { g.unit_mut(UNIT_SERVICE).p(line); }

impl ServiceGen for GrpcServiceGen {
    fn service_kind(&self) -> &'static str { "grpc" }

    fn generate_service(&self, g: &mut Generator<'_>, svc: &ServiceDecl) -> Result<()> {
        let src_alias = g.source_alias(UNIT_SERVICE);
        let rt_alias = g.runtime_alias(UNIT_SERVICE);
        let tonic_alias = g.unit_mut(UNIT_SERVICE).declare_dependency("tonic", "");

        let svc_name = util::pascal_case(&svc.name);
        let client_type = format!(
            "{}::{}_client::{}Client<{}::transport::Channel>",
            src_alias,
            util::snake_case(&svc.name),
            svc_name,
            tonic_alias
        );

        //
        // pub struct MyServiceClient
        //
        sp(g, "//");
        sp(g, &format!("// SERVICE: {}", svc.name));
        sp(g, "//");
        sp(g, &format!("pub struct {}Client {{", svc_name));
        g.unit_mut(UNIT_SERVICE).indent();
        sp(g, &format!("cli: {},", client_type));
        g.unit_mut(UNIT_SERVICE).outdent();
        sp(g, "}");
        sp(g, "");

        sp(g, &format!("impl {}Client {{", svc_name));
        g.unit_mut(UNIT_SERVICE).indent();
        sp(g, &format!("pub fn new(cli: {}) -> Self {{", client_type));
        g.unit_mut(UNIT_SERVICE).indent();
        sp(g, "Self { cli }");
        g.unit_mut(UNIT_SERVICE).outdent();
        sp(g, "}");

        for rpc in &svc.rpcs {
            sp(g, "");

            if rpc.is_streaming() {
                sp(g, &format!(
                    "// {}.{}: streaming RPC is passed through; use the original client directly.",
                    svc.name, rpc.name
                ));
                continue;
            }

            let req_tc = g.wrapper_type(&[], &rpc.request_type)?;
            let resp_tc = g.wrapper_type(&[], &rpc.response_type)?;
            let req_name = req_tc.type_name(g.unit_mut(UNIT_SERVICE), NameContext::Bare);
            let resp_name = resp_tc.type_name(g.unit_mut(UNIT_SERVICE), NameContext::Bare);
            let method = util::field_ident(&rpc.name);

            let map_err = if self.wrap_errors {
                format!(".map_err({}::ConvertError::rpc)", rt_alias)
            } else {
                format!(".map_err(|e| {}::ConvertError::Message(e.to_string()))", rt_alias)
            };

            sp(g, "//");
            sp(g, &format!("// RPC: {}.{}", svc.name, rpc.name));
            sp(g, "//");
            sp(g, &format!("pub async fn {}(", method));
            g.unit_mut(UNIT_SERVICE).indent();
            sp(g, "&mut self,");
            sp(g, &format!("req: Option<{}>,", req_name));
            g.unit_mut(UNIT_SERVICE).outdent();
            sp(g, &format!(") -> Result<Option<{}>, {}::ConvertError> {{", resp_name, rt_alias));
            g.unit_mut(UNIT_SERVICE).indent();

            sp(g, "let req = match req {");
            g.unit_mut(UNIT_SERVICE).indent();
            sp(g, "Some(v) => v.export()?,");
            sp(g, "None => Default::default(),");
            g.unit_mut(UNIT_SERVICE).outdent();
            sp(g, "};");
            sp(g, &format!("let resp = self.cli.{}(req).await{}?;", method, map_err));
            sp(g, &format!("{}::import(Some(resp.get_ref()))", resp_name));

            g.unit_mut(UNIT_SERVICE).outdent();
            sp(g, "}");
        }

        g.unit_mut(UNIT_SERVICE).outdent();
        sp(g, "}");
        sp(g, "");

        Ok(())
    }
}
