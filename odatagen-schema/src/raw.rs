//! Raw declaration records.
//!
//! These mirror the elements of a metadata document one to one and carry
//! no cross references. The [`linker`](crate::linker) turns them into a
//! [`DataServiceModel`](crate::model::DataServiceModel).

/// Root `Edmx` element.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    /// Value of the `Version` attribute, if present.
    pub version: Option<String>,
    /// Every `DataServices` block found under the root.
    pub data_services: Vec<RawDataServices>,
}

/// A `DataServices` block.
#[derive(Debug, Clone, Default)]
pub struct RawDataServices {
    /// Schemas declared in this block.
    pub schemas: Vec<RawSchema>,
}

/// A `Schema` element.
#[derive(Debug, Clone)]
pub struct RawSchema {
    /// Namespace name.
    pub namespace: String,
    /// Optional alias usable in place of the namespace.
    pub alias: Option<String>,
    /// Entity type declarations.
    pub entity_types: Vec<RawStructuredType>,
    /// Complex type declarations.
    pub complex_types: Vec<RawStructuredType>,
    /// Enum type declarations.
    pub enum_types: Vec<RawEnumType>,
    /// Entity containers.
    pub containers: Vec<RawEntityContainer>,
}

impl RawSchema {
    /// Creates an empty schema record.
    #[must_use]
    pub fn new(namespace: String) -> Self {
        Self {
            namespace,
            alias: None,
            entity_types: Vec::new(),
            complex_types: Vec::new(),
            enum_types: Vec::new(),
            containers: Vec::new(),
        }
    }
}

/// An `EntityType` or `ComplexType` element.
#[derive(Debug, Clone)]
pub struct RawStructuredType {
    /// Type name.
    pub name: String,
    /// Qualified name of the base type.
    pub base_type: Option<String>,
    /// Whether the type is declared abstract.
    pub is_abstract: bool,
    /// Key property names (entity types only).
    pub key: Vec<String>,
    /// Structural properties in declaration order.
    pub properties: Vec<RawProperty>,
}

impl RawStructuredType {
    /// Creates a structured type record without properties.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            base_type: None,
            is_abstract: false,
            key: Vec::new(),
            properties: Vec::new(),
        }
    }
}

/// A `Property` element.
#[derive(Debug, Clone)]
pub struct RawProperty {
    /// Property name.
    pub name: String,
    /// Declared type, e.g. `Edm.String` or `Collection(NS.Location)`.
    pub type_name: String,
    /// Raw `Nullable` attribute.
    pub nullable: Option<String>,
}

impl RawProperty {
    /// Creates a property record.
    #[must_use]
    pub fn new(name: String, type_name: String, nullable: Option<String>) -> Self {
        Self {
            name,
            type_name,
            nullable,
        }
    }
}

/// An `EnumType` element.
#[derive(Debug, Clone)]
pub struct RawEnumType {
    /// Enum name.
    pub name: String,
    /// Whether members may be combined as flags.
    pub is_flags: bool,
    /// Members in declaration order.
    pub members: Vec<RawMember>,
}

impl RawEnumType {
    /// Creates an enum record without members.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            is_flags: false,
            members: Vec::new(),
        }
    }
}

/// A `Member` element.
#[derive(Debug, Clone)]
pub struct RawMember {
    /// Member name.
    pub name: String,
    /// Literal `Value` attribute, absent for implicitly numbered members.
    pub value: Option<String>,
}

/// An `EntityContainer` element.
#[derive(Debug, Clone)]
pub struct RawEntityContainer {
    /// Container name.
    pub name: String,
    /// Entity sets declared in the container.
    pub entity_sets: Vec<RawEntitySet>,
}

/// An `EntitySet` element.
#[derive(Debug, Clone)]
pub struct RawEntitySet {
    /// Entity set name, also its address segment.
    pub name: String,
    /// Qualified entity type reference, e.g. `NS.Person`.
    pub entity_type: String,
}
