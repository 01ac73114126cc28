//! Trellis - An architecture description language for software systems.
//!
//! Semantic validation, format detection and syntax conversion for Trellis
//! documents. Parsing lives in [`trellis_parser`], the entity model in
//! [`trellis_core`]; this crate ties them together behind [`ModelBuilder`].

pub mod config;
pub mod convert;
pub mod detect;
pub mod render;
pub mod report;
pub mod suggest;
pub mod validate;

mod error;

pub use trellis_core::{entity, graph};

pub use convert::ConvertError;
pub use detect::{DetectedSyntax, Detection};
pub use error::TrellisError;
pub use report::ValidationReport;
pub use validate::{Check, Validator};

use std::{fs, path::Path};

use log::{debug, info, trace};

use trellis_core::EntityGraph;
use trellis_parser::{DocumentSource, FileSystemSource, ParsedDocument, Resolution, Syntax};

use config::AppConfig;

/// A resolved entity graph that passed validation.
///
/// The report may still hold warnings and notes.
#[derive(Debug, Clone)]
pub struct Model {
    graph: EntityGraph,
    report: ValidationReport,
}

impl Model {
    /// The merged entity graph.
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Warnings and notes collected while checking the model.
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Consume the model, returning its graph.
    pub fn into_graph(self) -> EntityGraph {
        self.graph
    }
}

/// Builder for checking and converting Trellis documents.
///
/// # Examples
///
/// ```rust
/// use trellis::{ModelBuilder, config::AppConfig};
/// use trellis_parser::MemorySource;
///
/// let source = "Shop -> Main\nMain @ src/main.ts\n";
///
/// let builder = ModelBuilder::new(AppConfig::default());
///
/// // Resolve imports and validate
/// let model = builder
///     .check(source, None, &MemorySource::new())
///     .expect("model is valid");
/// assert_eq!(model.graph().len(), 2);
///
/// // Render in the other syntax
/// let (_, longform) = builder.toggle(source).expect("entities are renderable");
/// assert!(longform.starts_with("program Shop {"));
/// ```
#[derive(Default)]
pub struct ModelBuilder {
    config: AppConfig,
}

impl ModelBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Scan and link one document without resolving its imports.
    pub fn parse(&self, source: &str) -> ParsedDocument {
        info!("Parsing document");
        let document = trellis_parser::parse(source);
        debug!(
            entities = document.graph.len(),
            imports = document.imports.len(),
            diagnostics = document.diagnostics.len();
            "Document parsed"
        );
        document
    }

    /// Parse a document and merge everything it imports.
    ///
    /// # Arguments
    ///
    /// * `source` - Text of the root document
    /// * `base` - Location of the root document; imports are relative to it
    /// * `documents` - Where imported documents are read from
    pub fn resolve(
        &self,
        source: &str,
        base: Option<&Path>,
        documents: &dyn DocumentSource,
    ) -> Resolution {
        info!(base:? = base; "Resolving document");
        let resolution = trellis_parser::parse_with_imports(source, base, documents);
        debug!(
            entities = resolution.graph.len(),
            diagnostics = resolution.diagnostics.len();
            "Document resolved"
        );
        resolution
    }

    /// Run every semantic check over an assembled graph.
    pub fn validate(&self, graph: &EntityGraph) -> ValidationReport {
        info!(entities = graph.len(); "Validating model");
        let report = validate::validate(graph, self.config.validation());
        debug!(findings = report.len(), valid = report.is_valid(); "Model validated");
        report
    }

    /// Resolve, link and validate a document.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Invalid`] carrying every diagnostic when any
    /// of them is an error.
    pub fn check(
        &self,
        source: &str,
        base: Option<&Path>,
        documents: &dyn DocumentSource,
    ) -> Result<Model, TrellisError> {
        let Resolution {
            graph,
            mut diagnostics,
        } = self.resolve(source, base, documents);
        diagnostics.extend(self.validate(&graph).into_diagnostics());

        let report = ValidationReport::new(diagnostics);
        trace!(report:?; "Check report");
        if !report.is_valid() {
            info!(findings = report.len(); "Model is invalid");
            return Err(TrellisError::new_invalid(report, source));
        }

        info!(entities = graph.len(); "Model is valid");
        Ok(Model { graph, report })
    }

    /// Read a document from disk and check it, resolving imports relative to
    /// its location.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Io`] if the file cannot be read, otherwise as
    /// [`ModelBuilder::check`].
    pub fn check_file(&self, path: impl AsRef<Path>) -> Result<Model, TrellisError> {
        let path = path.as_ref();
        info!(path:? = path; "Reading document");
        let source = fs::read_to_string(path)?;
        self.check(&source, Some(path), &FileSystemSource)
    }

    /// Classify the syntax style of a document.
    pub fn detect(&self, source: &str) -> Detection {
        let detection = detect::detect(source);
        debug!(
            syntax:% = detection.syntax(),
            confidence = detection.confidence();
            "Syntax detected"
        );
        detection
    }

    /// Render a parsed document in `syntax`.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Convert`] naming the first entity that has no
    /// form in `syntax`.
    pub fn convert(
        &self,
        document: &ParsedDocument,
        syntax: Syntax,
    ) -> Result<String, TrellisError> {
        Ok(convert::convert(document, syntax, self.config.convert())?)
    }

    /// Render a document in the syntax opposite to its dominant one.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::Convert`] naming the first entity that has no
    /// form in the target syntax.
    pub fn toggle(&self, source: &str) -> Result<(Syntax, String), TrellisError> {
        Ok(convert::toggle(source, self.config.convert())?)
    }
}
