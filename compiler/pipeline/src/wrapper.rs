//! The driver: walks the own source set and flushes rendered units.

use codegen::naming::{self, PackageSource};
use codegen::{
    ConverterSet, CustomizerChain, Generator, RenderedFile, ServiceGen, UnitRoute, UNIT_MAIN,
    UNIT_SERVICE,
};
use graph::{SchemaFile, SchemaGraph};
use wrapgen_config::Config;

use crate::sink::FileSink;
use crate::Result;

/// Root driver generating wrappers for every wrapped file of a graph.
pub struct Wrapper<'a> {
    graph: &'a SchemaGraph,
    /// Converter plugin registry used for every file.
    pub converters: ConverterSet,
    /// Customizer chain invoked around every file's generation.
    pub customizers: CustomizerChain,
    /// Optional service generation strategy.
    pub service_gen: Option<Box<dyn ServiceGen>>,
    /// Optional output-package override hook.
    pub package_source: Option<Box<dyn PackageSource>>,
    config: Config,
}

impl<'a> Wrapper<'a> {
    /// Creates a new wrapper driver with default configuration.
    pub fn new(graph: &'a SchemaGraph) -> Self { Self::with_config(graph, Config::default()) }

    /// Creates a new wrapper driver with the given configuration.
    pub fn with_config(graph: &'a SchemaGraph, config: Config) -> Self {
        Self {
            graph,
            converters: ConverterSet::new(),
            customizers: CustomizerChain::new(),
            service_gen: None,
            package_source: None,
            config,
        }
    }

    /// The configuration this driver runs with.
    pub fn config(&self) -> &Config { &self.config }

    /// Whether a file is selected for generation in this run.
    fn should_wrap(&self, file: &SchemaFile) -> bool {
        if self.config.generation.wrap_all {
            return true;
        }
        naming::file_is_wrapped(self.graph, file.path())
    }

    /// Generates wrappers for one file, returning the rendered units.
    pub fn generate_file(&self, path: &str) -> Result<Vec<RenderedFile>> {
        let mut g = Generator::new(self.graph, path, &self.converters, &self.customizers)?;

        if let Some(sg) = &self.service_gen {
            g.set_service_gen(sg.as_ref());
        }
        if let Some(ps) = &self.package_source {
            g.set_package_source(ps.as_ref());
        }
        g.set_file_suffix(&self.config.output.file_suffix);

        if self.config.generation.separate_service_unit {
            g.set_route(UnitRoute {
                id: UNIT_SERVICE.to_string(),
                suffix: self.config.generation.service_suffix.clone(),
                alias_of: None,
            });
        } else {
            g.set_route(UnitRoute {
                id: UNIT_SERVICE.to_string(),
                suffix: String::new(),
                alias_of: Some(UNIT_MAIN.to_string()),
            });
        }

        g.generate()?;
        Ok(g.finish()?)
    }

    /// Generates all wrapped files of the own source set into the sink.
    ///
    /// The first error stops processing; `finalize` runs on the sink
    /// regardless of the outcome.
    pub fn generate(&self, sink: &mut dyn FileSink) -> Result<()> {
        sink.initialize()?;
        let run = self.generate_all(sink);
        let fin = sink.finalize();
        run?;
        fin
    }

    fn generate_all(&self, sink: &mut dyn FileSink) -> Result<()> {
        for file in self.graph.own_files() {
            if !self.should_wrap(file) {
                continue;
            }

            wrapgen_logging::trace(
                "pipeline",
                &format!("generating wrappers for {}", file.path()),
            );

            for rendered in self.generate_file(file.path())? {
                sink.output(&rendered.path, &rendered.contents)?;
            }
        }

        // Output independent of any schema file, from global customizers.
        for (path, contents) in self.customizers.global_units(self.graph)? {
            sink.output(&path, &contents)?;
        }

        Ok(())
    }
}
