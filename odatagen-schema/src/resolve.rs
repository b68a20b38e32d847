//! Type resolution.
//!
//! Property types resolve lazily against their declaring schema and degrade
//! to [`TypeDescriptor::Unresolved`] when a name cannot be matched. Entity
//! set references resolve across every namespace of the model and fail hard.

use crate::error::SchemaError;
use crate::model::{DataServiceModel, EntitySet, EntityType, Schema};

/// EDM primitive kinds with a typed representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `Edm.String`.
    String,
    /// `Edm.Boolean`.
    Boolean,
    /// `Edm.Byte`, unsigned 8-bit.
    Byte,
    /// `Edm.SByte`, signed 8-bit.
    SByte,
    /// `Edm.Int16`.
    Int16,
    /// `Edm.Int32`.
    Int32,
    /// `Edm.Int64`.
    Int64,
    /// `Edm.Single`.
    Single,
    /// `Edm.Double`.
    Double,
    /// `Edm.Decimal`.
    Decimal,
    /// `Edm.Guid`.
    Guid,
    /// `Edm.Date`.
    Date,
    /// `Edm.DateTimeOffset`.
    DateTimeOffset,
    /// `Edm.TimeOfDay`.
    TimeOfDay,
    /// `Edm.Duration`.
    Duration,
    /// `Edm.Binary`.
    Binary,
}

impl PrimitiveKind {
    /// Every supported primitive kind.
    pub const ALL: [Self; 16] = [
        Self::String,
        Self::Boolean,
        Self::Byte,
        Self::SByte,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Single,
        Self::Double,
        Self::Decimal,
        Self::Guid,
        Self::Date,
        Self::DateTimeOffset,
        Self::TimeOfDay,
        Self::Duration,
        Self::Binary,
    ];

    /// Looks up a primitive kind by its qualified EDM name.
    ///
    /// # Arguments
    /// * `name` - Qualified name such as `Edm.Int32`
    #[must_use]
    pub fn from_edm_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.edm_name() == name)
    }

    /// Returns the qualified EDM name.
    #[must_use]
    pub const fn edm_name(self) -> &'static str {
        match self {
            Self::String => "Edm.String",
            Self::Boolean => "Edm.Boolean",
            Self::Byte => "Edm.Byte",
            Self::SByte => "Edm.SByte",
            Self::Int16 => "Edm.Int16",
            Self::Int32 => "Edm.Int32",
            Self::Int64 => "Edm.Int64",
            Self::Single => "Edm.Single",
            Self::Double => "Edm.Double",
            Self::Decimal => "Edm.Decimal",
            Self::Guid => "Edm.Guid",
            Self::Date => "Edm.Date",
            Self::DateTimeOffset => "Edm.DateTimeOffset",
            Self::TimeOfDay => "Edm.TimeOfDay",
            Self::Duration => "Edm.Duration",
            Self::Binary => "Edm.Binary",
        }
    }
}

/// Semantic type of a property.
///
/// Wrappers nest as collection outermost, then nullable, then the base type.
/// A collection is never wrapped nullable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// Primitive EDM type.
    Primitive(PrimitiveKind),
    /// Enum type of the declaring namespace, by local name.
    EnumRef(String),
    /// Complex type of the declaring namespace, by local name.
    ComplexRef(String),
    /// Sequence of the inner type.
    Collection(Box<TypeDescriptor>),
    /// Optional value of the inner type.
    Nullable(Box<TypeDescriptor>),
    /// Placeholder for any type that could not be matched.
    Unresolved,
}

impl TypeDescriptor {
    /// Returns true if this is a collection.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Returns true if this is wrapped nullable.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// Returns the base type with all wrappers removed.
    #[must_use]
    pub fn base(&self) -> &TypeDescriptor {
        match self {
            Self::Collection(inner) | Self::Nullable(inner) => inner.base(),
            other => other,
        }
    }
}

/// Returns the element type name of a `Collection(...)` type name.
#[must_use]
pub fn collection_element(type_name: &str) -> Option<&str> {
    type_name.strip_prefix("Collection(")?.strip_suffix(')')
}

/// Returns true if a `Nullable` attribute value permits null.
///
/// An absent attribute permits null; otherwise only a case-insensitive
/// `true` does.
#[must_use]
pub fn is_nullable(attribute: Option<&str>) -> bool {
    attribute.is_none_or(|value| value.eq_ignore_ascii_case("true"))
}

/// Resolves a declared property type against its owning schema.
///
/// # Arguments
/// * `type_name` - Declared type, e.g. `Collection(NS.Location)`
/// * `nullable` - Raw `Nullable` attribute
/// * `schema` - Schema declaring the property
#[must_use]
pub fn resolve_property_type(
    type_name: &str,
    nullable: Option<&str>,
    schema: &Schema,
) -> TypeDescriptor {
    if let Some(element) = collection_element(type_name) {
        return TypeDescriptor::Collection(Box::new(resolve_named(element, schema)));
    }

    let base = resolve_named(type_name, schema);
    if is_nullable(nullable) {
        TypeDescriptor::Nullable(Box::new(base))
    } else {
        base
    }
}

fn resolve_named(name: &str, schema: &Schema) -> TypeDescriptor {
    if name.starts_with("Edm.") {
        return match PrimitiveKind::from_edm_name(name) {
            Some(kind) => TypeDescriptor::Primitive(kind),
            None => {
                tracing::debug!("No typed mapping for primitive {}, using placeholder", name);
                TypeDescriptor::Unresolved
            }
        };
    }

    // Only names qualified by the declaring namespace are looked up
    let Some(local) = schema.local_name(name) else {
        tracing::debug!(
            "Type {} is outside namespace {}, using placeholder",
            name,
            schema.namespace
        );
        return TypeDescriptor::Unresolved;
    };

    if schema.enum_types.contains_key(local) {
        TypeDescriptor::EnumRef(local.to_string())
    } else if schema.complex_types.contains_key(local) {
        TypeDescriptor::ComplexRef(local.to_string())
    } else {
        tracing::debug!(
            "Type {} not declared as enum or complex type in {}, using placeholder",
            name,
            schema.namespace
        );
        TypeDescriptor::Unresolved
    }
}

/// Resolves an entity set's entity type in any namespace of the model.
///
/// # Errors
/// Returns `SchemaError::UnresolvedEntitySetReference` if the reference does
/// not name an entity type of the model.
pub fn resolve_entity_set<'m>(
    model: &'m DataServiceModel,
    entity_set: &EntitySet,
) -> Result<&'m EntityType, SchemaError> {
    model
        .entity_type(entity_set.entity_type_ref())
        .ok_or_else(|| SchemaError::UnresolvedEntitySetReference {
            entity_set: entity_set.name.clone(),
            entity_type: entity_set.entity_type_ref().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumType, StructuredType};

    fn trippin_schema() -> Schema {
        let mut schema = Schema::new("Trippin".to_string(), Some("tp".to_string()));
        schema.enum_types.insert(
            "PersonGender".to_string(),
            EnumType::new("PersonGender".to_string()),
        );
        schema.complex_types.insert(
            "Location".to_string(),
            StructuredType::new("Location".to_string()),
        );
        schema
            .entity_types
            .insert("Person".to_string(), StructuredType::new("Person".to_string()));
        schema
    }

    fn string() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::String)
    }

    fn nullable(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Nullable(Box::new(inner))
    }

    fn collection(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Collection(Box::new(inner))
    }

    #[test]
    fn test_primitive_table() {
        assert_eq!(
            PrimitiveKind::from_edm_name("Edm.Int32"),
            Some(PrimitiveKind::Int32)
        );
        assert_eq!(
            PrimitiveKind::from_edm_name("Edm.DateTimeOffset"),
            Some(PrimitiveKind::DateTimeOffset)
        );
        assert_eq!(PrimitiveKind::from_edm_name("Edm.GeographyPoint"), None);
        assert_eq!(PrimitiveKind::from_edm_name("Int32"), None);

        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_edm_name(kind.edm_name()), Some(kind));
        }
    }

    #[test]
    fn test_collection_element() {
        assert_eq!(collection_element("Collection(Edm.String)"), Some("Edm.String"));
        assert_eq!(collection_element("Edm.String"), None);
        assert_eq!(collection_element("Collection(Edm.String"), None);
    }

    #[test]
    fn test_string_collection_is_never_nullable() {
        let schema = trippin_schema();

        for attribute in [None, Some("true"), Some("false"), Some("TRUE")] {
            assert_eq!(
                resolve_property_type("Collection(Edm.String)", attribute, &schema),
                collection(string())
            );
        }
    }

    #[test]
    fn test_string_nullability() {
        let schema = trippin_schema();

        assert_eq!(
            resolve_property_type("Edm.String", None, &schema),
            nullable(string())
        );
        assert_eq!(
            resolve_property_type("Edm.String", Some("true"), &schema),
            nullable(string())
        );
        assert_eq!(
            resolve_property_type("Edm.String", Some("True"), &schema),
            nullable(string())
        );
        assert_eq!(
            resolve_property_type("Edm.String", Some("false"), &schema),
            string()
        );
        assert_eq!(
            resolve_property_type("Edm.String", Some("FALSE"), &schema),
            string()
        );
    }

    #[test]
    fn test_enum_and_complex_references() {
        let schema = trippin_schema();

        assert_eq!(
            resolve_property_type("Trippin.PersonGender", Some("false"), &schema),
            TypeDescriptor::EnumRef("PersonGender".to_string())
        );
        assert_eq!(
            resolve_property_type("Trippin.Location", None, &schema),
            nullable(TypeDescriptor::ComplexRef("Location".to_string()))
        );
        assert_eq!(
            resolve_property_type("Collection(Trippin.Location)", None, &schema),
            collection(TypeDescriptor::ComplexRef("Location".to_string()))
        );
    }

    #[test]
    fn test_alias_qualified_reference() {
        let schema = trippin_schema();

        assert_eq!(
            resolve_property_type("tp.PersonGender", Some("false"), &schema),
            TypeDescriptor::EnumRef("PersonGender".to_string())
        );
    }

    #[test]
    fn test_unresolved_placeholders() {
        let schema = trippin_schema();

        // Primitive without typed mapping
        assert_eq!(
            resolve_property_type("Edm.GeographyPoint", Some("false"), &schema),
            TypeDescriptor::Unresolved
        );
        // Other namespace
        assert_eq!(
            resolve_property_type("Other.Location", Some("false"), &schema),
            TypeDescriptor::Unresolved
        );
        // Entity types are not property value types
        assert_eq!(
            resolve_property_type("Trippin.Person", Some("false"), &schema),
            TypeDescriptor::Unresolved
        );
        // Unknown name still gets the nullable wrapper
        assert_eq!(
            resolve_property_type("Trippin.Missing", None, &schema),
            nullable(TypeDescriptor::Unresolved)
        );
    }

    #[test]
    fn test_descriptor_helpers() {
        let descriptor = collection(TypeDescriptor::ComplexRef("Location".to_string()));
        assert!(descriptor.is_collection());
        assert!(!descriptor.is_nullable());
        assert_eq!(
            descriptor.base(),
            &TypeDescriptor::ComplexRef("Location".to_string())
        );

        let descriptor = nullable(string());
        assert!(descriptor.is_nullable());
        assert_eq!(descriptor.base(), &string());
    }
}
