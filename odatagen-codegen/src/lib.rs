//! # odatagen Codegen
//!
//! Rust client binding generation from OData v4 metadata.
//!
//! This crate provides:
//! - Deterministic rendering of enums, complex/entity structs and entity
//!   set bindings from a linked [`DataServiceModel`]
//! - Single-namespace and whole-model rendering
//! - Artifact writing with module names derived from the target directory

pub mod error;
pub mod generator;
pub mod options;
pub mod output;
pub mod rust;

pub use error::CodegenError;
pub use generator::Generator;
pub use options::GeneratorOptions;

use odatagen_schema::DataServiceModel;

/// Renders one namespace of a model as module source text.
///
/// # Arguments
/// * `model` - Linked metadata model
/// * `namespace` - Namespace to render
/// * `module_name` - Name of the module the text will live in
///
/// # Errors
/// Returns `CodegenError` if the namespace is missing or an entity set
/// cannot be resolved.
pub fn render(
    model: &DataServiceModel,
    namespace: &str,
    module_name: &str,
) -> Result<String, CodegenError> {
    Generator::new(model).generate(namespace, module_name)
}

/// Renders every namespace of a model as one module.
///
/// # Errors
/// Returns `CodegenError` if an entity set cannot be resolved.
pub fn render_all(model: &DataServiceModel, module_name: &str) -> Result<String, CodegenError> {
    Generator::new(model).generate_all(module_name)
}

/// Generates Rust code from a metadata document.
///
/// # Arguments
/// * `bytes` - `$metadata` document content
/// * `namespace` - Namespace to render, or `None` for all
/// * `module_name` - Name of the module the text will live in
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(
    bytes: &[u8],
    namespace: Option<&str>,
    module_name: &str,
) -> Result<String, CodegenError> {
    let model = odatagen_schema::parse_metadata(bytes)?;
    match namespace {
        Some(namespace) => render(&model, namespace, module_name),
        None => render_all(&model, module_name),
    }
}

/// Generates Rust code from a metadata document file.
///
/// # Arguments
/// * `path` - Path to the `$metadata` document
/// * `namespace` - Namespace to render, or `None` for all
/// * `module_name` - Name of the module the text will live in
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    namespace: Option<&str>,
    module_name: &str,
) -> Result<String, CodegenError> {
    let bytes = std::fs::read(path)?;
    generate_from_xml(&bytes, namespace, module_name)
}
