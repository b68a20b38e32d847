//! Main code generator.

use crate::error::CodegenError;
use crate::options::GeneratorOptions;
use crate::output;
use crate::rust::{CollectionGenerator, EnumGenerator, ModuleNames, StructGenerator, StructKind};
use odatagen_schema::{DataServiceModel, Schema};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Renders source text from a linked model.
///
/// Output is a pure function of the model, the options and the requested
/// module: every map is walked in sorted key order.
pub struct Generator<'a> {
    model: &'a DataServiceModel,
    options: GeneratorOptions,
}

impl<'a> Generator<'a> {
    /// Creates a new generator with default options.
    #[must_use]
    pub fn new(model: &'a DataServiceModel) -> Self {
        Self::with_options(model, GeneratorOptions::default())
    }

    /// Creates a new generator with the given options.
    #[must_use]
    pub fn with_options(model: &'a DataServiceModel, options: GeneratorOptions) -> Self {
        Self { model, options }
    }

    /// Returns the generator options.
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Generates the module for one namespace.
    ///
    /// # Arguments
    /// * `namespace` - Namespace to render
    /// * `module_name` - Name of the module the text will live in
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if the namespace is not in the model
    /// or an entity set reference cannot be resolved.
    pub fn generate(&self, namespace: &str, module_name: &str) -> Result<String, CodegenError> {
        let schema = self.model.require_schema(namespace)?;
        let names = ModuleNames::plan(self.model, &[namespace])?;

        let mut output = self.generate_header(module_name, &[namespace], &names);
        let mut emitted = HashSet::new();
        output.push_str(&self.generate_namespace(schema, &names, &mut emitted)?);

        Ok(output)
    }

    /// Generates one module covering every namespace, in namespace order.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if an entity set reference cannot be
    /// resolved.
    pub fn generate_all(&self, module_name: &str) -> Result<String, CodegenError> {
        let namespaces = self.model.namespaces();
        let names = ModuleNames::plan(self.model, &namespaces)?;

        let mut output = self.generate_header(module_name, &namespaces, &names);
        let mut emitted = HashSet::new();
        for namespace in namespaces {
            let schema = self.model.require_schema(namespace)?;
            output.push_str(&self.generate_namespace(schema, &names, &mut emitted)?);
        }

        Ok(output)
    }

    /// Generates and writes the artifact into `dir`.
    ///
    /// The module name is derived from the directory's final path segment.
    /// With no namespace, every namespace is rendered.
    ///
    /// # Returns
    /// Path of the written file.
    ///
    /// # Errors
    /// Returns `CodegenError` if the module name cannot be derived,
    /// generation fails, or the file cannot be written.
    pub fn write_to_dir(
        &self,
        namespace: Option<&str>,
        dir: &Path,
    ) -> Result<PathBuf, CodegenError> {
        let module_name = output::module_name_for(dir)?;
        let source = match namespace {
            Some(namespace) => self.generate(namespace, &module_name)?,
            None => self.generate_all(&module_name)?,
        };

        let path = dir.join(&self.options.file_name);
        output::write_atomic(&path, &source)?;
        tracing::info!("Wrote {} ({} bytes)", path.display(), source.len());

        Ok(path)
    }

    fn generate_header(
        &self,
        module_name: &str,
        namespaces: &[&str],
        names: &ModuleNames,
    ) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "// @generated by odatagen from namespace {}. Do not edit by hand.\n\n",
            namespaces
                .iter()
                .map(|ns| format!("`{ns}`"))
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(&format!(
            "//! OData model definitions for the `{}` module.\n\n",
            module_name
        ));
        output.push_str("#![allow(dead_code, unused_imports, clippy::all)]\n\n");
        let collections = CollectionGenerator::new(&self.options.client_crate, names);
        output.push_str(&collections.generate_support());

        output
    }

    /// Enums, then complex types, then entity structs and accessors per
    /// entity set. `emitted` tracks entity types already rendered.
    ///
    /// Must walk declarations in the order [`ModuleNames::plan`] does.
    fn generate_namespace(
        &self,
        schema: &Schema,
        names: &ModuleNames,
        emitted: &mut HashSet<String>,
    ) -> Result<String, CodegenError> {
        let mut output = String::new();
        let structs = StructGenerator::new(self.model, names);
        let collections = CollectionGenerator::new(&self.options.client_crate, names);

        output.push_str(&EnumGenerator::new(schema, names).generate());
        output.push_str(&structs.generate_complex_types(schema)?);

        for entity_set in schema.sorted_entity_sets() {
            let entity_type = entity_set.resolve(self.model)?;
            let reference = entity_set.entity_type_ref();
            let canonical = self
                .model
                .canonical_name(reference)
                .unwrap_or_else(|| reference.to_string());
            let type_namespace = canonical
                .rsplit_once('.')
                .map_or(schema.namespace.as_str(), |(namespace, _)| namespace)
                .to_string();

            if emitted.insert(canonical) {
                output.push_str(&structs.generate_struct(
                    entity_type,
                    &type_namespace,
                    StructKind::Entity,
                )?);
            }
            output.push_str(&collections.generate_accessor(
                entity_set,
                entity_type,
                &type_namespace,
            ));
        }

        Ok(output)
    }
}
