//! Collection accessor generation.
//!
//! Every entity set gets a `const fn` returning a `ModelDefinition` that
//! binds the generated entity type to its element name and address segment.
//! The REST client consumes these bindings through its `EntityDefinition`
//! trait.

use crate::rust::names::ModuleNames;
use odatagen_schema::{EntitySet, EntityType};

/// Generator for entity set bindings.
pub struct CollectionGenerator<'a> {
    client_crate: &'a str,
    names: &'a ModuleNames,
}

impl<'a> CollectionGenerator<'a> {
    /// Creates a generator importing the REST client from `client_crate`.
    #[must_use]
    pub fn new(client_crate: &'a str, names: &'a ModuleNames) -> Self {
        Self {
            client_crate,
            names,
        }
    }

    /// Generates the imports and the `ModelDefinition` binding type.
    #[must_use]
    pub fn generate_support(&self) -> String {
        let mut output = String::new();

        output.push_str("use std::marker::PhantomData;\n\n");
        output.push_str("use serde::{Deserialize, Serialize};\n");
        output.push_str(&format!(
            "use {}::{{DataSet, EntityDefinition, ODataClient}};\n\n",
            self.client_crate
        ));

        output.push_str("/// Binds a model type to the entity set serving it.\n");
        output.push_str("pub struct ModelDefinition<T> {\n");
        output.push_str("    name: &'static str,\n");
        output.push_str("    url: &'static str,\n");
        output.push_str("    model: PhantomData<fn() -> T>,\n");
        output.push_str("}\n\n");

        output.push_str("impl<T> ModelDefinition<T> {\n");
        output.push_str("    /// Creates a binding for `name` entities served at `url`.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn new(name: &'static str, url: &'static str) -> Self {\n");
        output.push_str("        Self {\n");
        output.push_str("            name,\n");
        output.push_str("            url,\n");
        output.push_str("            model: PhantomData,\n");
        output.push_str("        }\n");
        output.push_str("    }\n\n");
        output.push_str("    /// Opens the bound entity set on a client.\n");
        output.push_str("    pub fn data_set(self, client: &ODataClient) -> DataSet<Self> {\n");
        output.push_str("        client.data_set(self)\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str("impl<T> Clone for ModelDefinition<T> {\n");
        output.push_str("    fn clone(&self) -> Self {\n");
        output.push_str("        *self\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output.push_str("impl<T> Copy for ModelDefinition<T> {}\n\n");

        output.push_str("impl<T> EntityDefinition for ModelDefinition<T> {\n");
        output.push_str("    type Model = T;\n\n");
        output.push_str("    fn name(&self) -> &str {\n");
        output.push_str("        self.name\n");
        output.push_str("    }\n\n");
        output.push_str("    fn url(&self) -> &str {\n");
        output.push_str("        self.url\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }

    /// Generates the accessor binding for one entity set.
    ///
    /// # Arguments
    /// * `entity_set` - Entity set to bind
    /// * `entity_type` - Resolved element type of the set
    /// * `type_namespace` - Namespace declaring `entity_type`
    #[must_use]
    pub fn generate_accessor(
        &self,
        entity_set: &EntitySet,
        entity_type: &EntityType,
        type_namespace: &str,
    ) -> String {
        let mut output = String::new();
        let rust_name = self.names.type_name(type_namespace, &entity_type.name);

        output.push_str(&format!(
            "/// Binding for the `{}` entity set.\n",
            entity_set.name
        ));
        output.push_str("#[must_use]\n");
        output.push_str(&format!(
            "pub const fn {}() -> ModelDefinition<{}> {{\n",
            self.names.accessor_name(entity_set),
            rust_name
        ));
        output.push_str(&format!(
            "    ModelDefinition::new({:?}, {:?})\n",
            entity_type.name, entity_set.name
        ));
        output.push_str("}\n\n");

        output
    }
}
