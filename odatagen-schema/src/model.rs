//! Linked schema graph.
//!
//! [`DataServiceModel`] owns every [`Schema`] and is the only store of the
//! graph. Properties and entity sets keep the namespace of their declaring
//! schema instead of a reference to it, and resolve names through the model
//! at read time.

use crate::error::SchemaError;
use crate::resolve::{self, TypeDescriptor};
use std::collections::HashMap;

/// Resolution root of a linked metadata document.
///
/// Immutable once built by [`link`](crate::linker::link).
#[derive(Debug, Clone, Default)]
pub struct DataServiceModel {
    schemas: HashMap<String, Schema>,
    aliases: HashMap<String, String>,
}

impl DataServiceModel {
    /// Registers a schema shell, along with its alias if it has one.
    pub(crate) fn insert_schema(&mut self, schema: Schema) {
        if let Some(alias) = &schema.alias {
            self.aliases.insert(alias.clone(), schema.namespace.clone());
        }
        self.schemas.insert(schema.namespace.clone(), schema);
    }

    pub(crate) fn schema_mut(&mut self, namespace: &str) -> Option<&mut Schema> {
        self.schemas.get_mut(namespace)
    }

    /// Gets a schema by namespace.
    #[must_use]
    pub fn schema(&self, namespace: &str) -> Option<&Schema> {
        self.schemas.get(namespace)
    }

    /// Gets a schema by namespace, failing if it is not part of the model.
    ///
    /// # Errors
    /// Returns `SchemaError::NamespaceNotFound` for an unknown namespace.
    pub fn require_schema(&self, namespace: &str) -> Result<&Schema, SchemaError> {
        self.schema(namespace)
            .ok_or_else(|| SchemaError::NamespaceNotFound {
                namespace: namespace.to_string(),
            })
    }

    /// Gets a schema by namespace or alias.
    #[must_use]
    pub fn schema_by_qualifier(&self, qualifier: &str) -> Option<&Schema> {
        self.schema(qualifier).or_else(|| {
            self.aliases
                .get(qualifier)
                .and_then(|namespace| self.schema(namespace))
        })
    }

    /// Iterates over all schemas in no particular order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// Returns all namespaces in sorted order.
    #[must_use]
    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        namespaces
    }

    /// Returns true if the model has a schema for the namespace.
    #[must_use]
    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.schemas.contains_key(namespace)
    }

    /// Looks up an entity type by qualified name in any namespace.
    ///
    /// The name is split on its last `.`; the prefix may be a namespace or
    /// an alias.
    #[must_use]
    pub fn entity_type(&self, qualified_name: &str) -> Option<&EntityType> {
        let (qualifier, name) = qualified_name.rsplit_once('.')?;
        self.schema_by_qualifier(qualifier)?.entity_types.get(name)
    }

    /// Rewrites an alias-qualified name to its namespace-qualified form.
    ///
    /// Returns `None` if the qualifier is not part of the model.
    #[must_use]
    pub fn canonical_name(&self, qualified_name: &str) -> Option<String> {
        let (qualifier, name) = qualified_name.rsplit_once('.')?;
        let schema = self.schema_by_qualifier(qualifier)?;
        Some(format!("{}.{}", schema.namespace, name))
    }

    /// Returns the number of schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if the model has no schemas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// Declarations of one namespace.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Namespace name.
    pub namespace: String,
    /// Alias usable in place of the namespace.
    pub alias: Option<String>,
    /// Entity types by name.
    pub entity_types: HashMap<String, EntityType>,
    /// Complex types by name.
    pub complex_types: HashMap<String, ComplexType>,
    /// Enum types by name.
    pub enum_types: HashMap<String, EnumType>,
    /// Entity sets by name, across all containers of the schema.
    pub entity_sets: HashMap<String, EntitySet>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(namespace: String, alias: Option<String>) -> Self {
        Self {
            namespace,
            alias,
            entity_types: HashMap::new(),
            complex_types: HashMap::new(),
            enum_types: HashMap::new(),
            entity_sets: HashMap::new(),
        }
    }

    /// Strips this schema's namespace or alias from a qualified name.
    ///
    /// Returns `None` if the name is qualified by anything else.
    #[must_use]
    pub fn local_name<'a>(&self, qualified_name: &'a str) -> Option<&'a str> {
        let (qualifier, name) = qualified_name.rsplit_once('.')?;
        let owned = qualifier == self.namespace || self.alias.as_deref() == Some(qualifier);
        owned.then_some(name)
    }

    /// Returns enum types sorted by name.
    #[must_use]
    pub fn sorted_enum_types(&self) -> Vec<&EnumType> {
        sorted_values(&self.enum_types)
    }

    /// Returns complex types sorted by name.
    #[must_use]
    pub fn sorted_complex_types(&self) -> Vec<&ComplexType> {
        sorted_values(&self.complex_types)
    }

    /// Returns entity sets sorted by name.
    #[must_use]
    pub fn sorted_entity_sets(&self) -> Vec<&EntitySet> {
        sorted_values(&self.entity_sets)
    }
}

fn sorted_values<V>(map: &HashMap<String, V>) -> Vec<&V> {
    let mut entries: Vec<(&String, &V)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, value)| value).collect()
}

/// An entity or complex type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredType {
    /// Type name.
    pub name: String,
    /// Qualified base type name. Informative only, not applied.
    pub base_type: Option<String>,
    /// Whether the type is abstract.
    pub is_abstract: bool,
    /// Key property names.
    pub key: Vec<String>,
    /// Properties by name.
    pub properties: HashMap<String, Property>,
}

/// Entity type; same shape as a complex type.
pub type EntityType = StructuredType;

/// Complex type; same shape as an entity type.
pub type ComplexType = StructuredType;

impl StructuredType {
    /// Creates a type without properties.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            base_type: None,
            is_abstract: false,
            key: Vec::new(),
            properties: HashMap::new(),
        }
    }

    /// Returns properties sorted by name.
    #[must_use]
    pub fn sorted_properties(&self) -> Vec<&Property> {
        sorted_values(&self.properties)
    }
}

/// A structural property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name.
    pub name: String,
    type_name: String,
    nullable: Option<String>,
    namespace: String,
}

impl Property {
    /// Creates a property declared in `namespace`.
    #[must_use]
    pub fn new(
        name: String,
        type_name: String,
        nullable: Option<String>,
        namespace: String,
    ) -> Self {
        Self {
            name,
            type_name,
            nullable,
            namespace,
        }
    }

    /// Declared type as written in the document.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Raw `Nullable` attribute.
    #[must_use]
    pub fn nullable(&self) -> Option<&str> {
        self.nullable.as_deref()
    }

    /// Namespace of the declaring schema.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns true if the declared type is a collection.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        resolve::collection_element(&self.type_name).is_some()
    }

    /// Gets the declaring schema.
    ///
    /// # Errors
    /// Returns `SchemaError::NamespaceNotFound` if the property does not
    /// belong to `model`.
    pub fn schema<'m>(&self, model: &'m DataServiceModel) -> Result<&'m Schema, SchemaError> {
        model.require_schema(&self.namespace)
    }

    /// Resolves the declared type against the declaring schema.
    ///
    /// # Errors
    /// Returns `SchemaError::NamespaceNotFound` if the property does not
    /// belong to `model`.
    pub fn resolve(&self, model: &DataServiceModel) -> Result<TypeDescriptor, SchemaError> {
        let schema = self.schema(model)?;
        Ok(resolve::resolve_property_type(
            &self.type_name,
            self.nullable(),
            schema,
        ))
    }
}

/// Representation of an enum, derived from its member values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRepr {
    /// Every member value is a base-10 integer.
    Integer,
    /// At least one member value is not an integer.
    String,
}

/// An enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name.
    pub name: String,
    /// Literal value text.
    pub value: String,
}

impl EnumMember {
    /// Returns the value as an integer, if it is one.
    #[must_use]
    pub fn integer_value(&self) -> Option<i64> {
        self.value.parse().ok()
    }
}

/// An enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    /// Enum name.
    pub name: String,
    /// Whether members may be combined as flags.
    pub is_flags: bool,
    /// Members in declaration order.
    pub members: Vec<EnumMember>,
}

impl EnumType {
    /// Creates an enum without members.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            is_flags: false,
            members: Vec::new(),
        }
    }

    /// Derives the representation: integer only if every value is one.
    #[must_use]
    pub fn repr(&self) -> EnumRepr {
        if self
            .members
            .iter()
            .all(|member| member.integer_value().is_some())
        {
            EnumRepr::Integer
        } else {
            EnumRepr::String
        }
    }
}

/// An addressable collection of entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySet {
    /// Entity set name, also its address segment.
    pub name: String,
    /// Name of the declaring entity container.
    pub container: String,
    entity_type: String,
    namespace: String,
}

impl EntitySet {
    /// Creates an entity set declared in `namespace`.
    #[must_use]
    pub fn new(name: String, entity_type: String, namespace: String, container: String) -> Self {
        Self {
            name,
            container,
            entity_type,
            namespace,
        }
    }

    /// Qualified entity type reference as declared.
    #[must_use]
    pub fn entity_type_ref(&self) -> &str {
        &self.entity_type
    }

    /// Namespace of the declaring schema.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Gets the declaring schema.
    ///
    /// # Errors
    /// Returns `SchemaError::NamespaceNotFound` if the set does not belong
    /// to `model`.
    pub fn schema<'m>(&self, model: &'m DataServiceModel) -> Result<&'m Schema, SchemaError> {
        model.require_schema(&self.namespace)
    }

    /// Resolves the entity type, which may live in another namespace.
    ///
    /// # Errors
    /// Returns `SchemaError::UnresolvedEntitySetReference` if no such entity
    /// type exists in `model`.
    pub fn resolve<'m>(&self, model: &'m DataServiceModel) -> Result<&'m EntityType, SchemaError> {
        resolve::resolve_entity_set(model, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, value: &str) -> EnumMember {
        EnumMember {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_enum_repr_is_all_or_nothing() {
        let mut gender = EnumType::new("PersonGender".to_string());
        gender.members = vec![member("Male", "0"), member("Female", "1"), member("Unknown", "2")];
        assert_eq!(gender.repr(), EnumRepr::Integer);

        gender.members.push(member("Other", "other"));
        assert_eq!(gender.repr(), EnumRepr::String);

        let mut negative = EnumType::new("Offset".to_string());
        negative.members = vec![member("Behind", "-1"), member("Ahead", "1")];
        assert_eq!(negative.repr(), EnumRepr::Integer);
    }

    #[test]
    fn test_local_name() {
        let schema = Schema::new("Trippin.Model".to_string(), Some("tm".to_string()));

        assert_eq!(schema.local_name("Trippin.Model.Person"), Some("Person"));
        assert_eq!(schema.local_name("tm.Person"), Some("Person"));
        assert_eq!(schema.local_name("Trippin.Person"), None);
        assert_eq!(schema.local_name("Person"), None);
    }

    #[test]
    fn test_sorted_properties() {
        let mut person = StructuredType::new("Person".to_string());
        for name in ["UserName", "Age", "FirstName"] {
            person.properties.insert(
                name.to_string(),
                Property::new(
                    name.to_string(),
                    "Edm.String".to_string(),
                    None,
                    "Trippin".to_string(),
                ),
            );
        }

        let names: Vec<&str> = person
            .sorted_properties()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Age", "FirstName", "UserName"]);
    }

    #[test]
    fn test_entity_type_lookup_by_alias() {
        let mut schema = Schema::new("Trippin.Model".to_string(), Some("tm".to_string()));
        schema
            .entity_types
            .insert("Person".to_string(), StructuredType::new("Person".to_string()));

        let mut model = DataServiceModel::default();
        model.insert_schema(schema);

        assert!(model.entity_type("Trippin.Model.Person").is_some());
        assert!(model.entity_type("tm.Person").is_some());
        assert!(model.entity_type("Trippin.Person").is_none());
        assert!(model.entity_type("Person").is_none());

        assert_eq!(
            model.canonical_name("tm.Person").as_deref(),
            Some("Trippin.Model.Person")
        );
        assert!(model.canonical_name("Other.Person").is_none());
    }

    #[test]
    fn test_require_schema() {
        let model = DataServiceModel::default();
        assert!(model.is_empty());
        assert!(matches!(
            model.require_schema("Missing"),
            Err(SchemaError::NamespaceNotFound { .. })
        ));
    }

    #[test]
    fn test_property_accessors() {
        let property = Property::new(
            "Emails".to_string(),
            "Collection(Edm.String)".to_string(),
            Some("true".to_string()),
            "Trippin".to_string(),
        );

        assert!(property.is_collection());
        assert_eq!(property.type_name(), "Collection(Edm.String)");
        assert_eq!(property.nullable(), Some("true"));
        assert_eq!(property.namespace(), "Trippin");
    }
}
