//! Pipeline CLI tool for the wrapgen compiler.
//!
//! This binary reads a resolved schema graph (JSON) and writes wrapper
//! source files under an output directory.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::env;
use std::process;

use codegen::converters::{DurationPlugin, JsonObjectPlugin, TimestampPlugin, UuidPlugin};
use codegen::customizers::SerdeTagCustomizer;
use codegen::GrpcServiceGen;
use graph::SchemaGraph;
use pipeline::{DirectorySink, Wrapper};
use wrapgen_config::Config;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 && args.len() != 4 {
        eprintln!("Usage:");
        eprintln!("  {} <graph.json> <output-dir> [config.toml]", args[0]);
        process::exit(2);
    }

    let graph = match SchemaGraph::from_file(&args[1]) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("failed to load schema graph '{}': {}", args[1], e);
            process::exit(1);
        }
    };

    let config = if args.len() == 4 {
        match Config::from_file(&args[3]) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("failed to load config '{}': {}", args[3], e);
                process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let mut wrapper = Wrapper::with_config(&graph, config);
    wrapper.converters.register(Box::new(TimestampPlugin));
    wrapper.converters.register(Box::new(DurationPlugin));
    wrapper.converters.register(Box::new(UuidPlugin));
    wrapper.converters.register(Box::new(JsonObjectPlugin));
    wrapper.customizers.register(Box::new(SerdeTagCustomizer));
    wrapper.service_gen = Some(Box::new(GrpcServiceGen::new()));

    let mut sink = DirectorySink::new(&args[2]);
    if let Err(e) = wrapper.generate(&mut sink) {
        eprintln!("pipeline failed: {}", e);
        process::exit(1);
    }
}
