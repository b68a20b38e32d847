//! Struct code generation for entity and complex types.

use crate::error::CodegenError;
use crate::rust::names::{IdentScope, ModuleNames};
use crate::rust::naming::field_ident;
use crate::rust::types::{defaults_when_missing, rust_type};
use odatagen_schema::{DataServiceModel, Schema, StructuredType};

/// Kind of structured type being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    /// Addressable entity type.
    Entity,
    /// Complex value type.
    Complex,
}

impl StructKind {
    fn label(self) -> &'static str {
        match self {
            Self::Entity => "entity type",
            Self::Complex => "complex type",
        }
    }
}

/// Generator for struct definitions.
///
/// Property types resolve against the namespace that declared them, so an
/// entity type from another namespace renders with its own references.
pub struct StructGenerator<'a> {
    model: &'a DataServiceModel,
    names: &'a ModuleNames,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    #[must_use]
    pub fn new(model: &'a DataServiceModel, names: &'a ModuleNames) -> Self {
        Self { model, names }
    }

    /// Generates all complex type structs of a schema, ordered by name.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if a property's namespace is missing
    /// from the model.
    pub fn generate_complex_types(&self, schema: &Schema) -> Result<String, CodegenError> {
        let mut output = String::new();

        for complex_type in schema.sorted_complex_types() {
            output.push_str(&self.generate_struct(
                complex_type,
                &schema.namespace,
                StructKind::Complex,
            )?);
        }

        Ok(output)
    }

    /// Generates one struct with fields ordered by property name.
    ///
    /// Properties whose field identifiers coincide (`ID` and `Id`) are
    /// told apart with a numeric suffix; the serde rename keeps the wire
    /// name either way.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if a property's namespace is missing
    /// from the model.
    pub fn generate_struct(
        &self,
        structured: &StructuredType,
        namespace: &str,
        kind: StructKind,
    ) -> Result<String, CodegenError> {
        let mut output = String::new();
        let rust_name = self.names.type_name(namespace, &structured.name);
        let mut fields = IdentScope::snake();

        output.push_str(&format!("/// {} {}.\n", rust_name, kind.label()));
        if !structured.key.is_empty() {
            let key: Vec<String> = structured.key.iter().map(|k| format!("`{k}`")).collect();
            output.push_str("///\n");
            output.push_str(&format!("/// Key: {}.\n", key.join(", ")));
        }
        if let Some(base_type) = &structured.base_type {
            output.push_str("///\n");
            output.push_str(&format!(
                "/// Declares base type `{}`; inherited properties are not included.\n",
                base_type
            ));
        }
        output.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
        output.push_str(&format!("pub struct {} {{\n", rust_name));

        for property in structured.sorted_properties() {
            let descriptor = property.resolve(self.model)?;
            let field_type = rust_type(
                &descriptor,
                property.namespace(),
                &structured.name,
                self.names,
            );

            let plain = field_ident(&property.name);
            let field = fields.claim(plain.clone());
            if field != plain {
                tracing::warn!(
                    "Property {}.{}.{} clashes with another field, emitting it as {}",
                    namespace,
                    structured.name,
                    property.name,
                    field
                );
            }

            if defaults_when_missing(&descriptor) {
                output.push_str(&format!(
                    "    #[serde(rename = {:?}, default)]\n",
                    property.name
                ));
            } else {
                output.push_str(&format!("    #[serde(rename = {:?})]\n", property.name));
            }
            output.push_str(&format!("    pub {}: {},\n", field, field_type));
        }

        output.push_str("}\n\n");

        Ok(output)
    }
}
