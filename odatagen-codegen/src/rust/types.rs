//! Rust spelling of resolved property types.

use crate::rust::names::ModuleNames;
use odatagen_schema::{PrimitiveKind, TypeDescriptor};

/// Placeholder type for anything that could not be resolved.
pub const UNRESOLVED_TYPE: &str = "serde_json::Value";

/// Returns the Rust type for a primitive kind.
#[must_use]
pub const fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::String => "String",
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::Byte => "u8",
        PrimitiveKind::SByte => "i8",
        PrimitiveKind::Int16 => "i16",
        PrimitiveKind::Int32 => "i32",
        PrimitiveKind::Int64 => "i64",
        PrimitiveKind::Single => "f32",
        PrimitiveKind::Double | PrimitiveKind::Decimal => "f64",
        PrimitiveKind::Guid => "uuid::Uuid",
        PrimitiveKind::Date => "chrono::NaiveDate",
        PrimitiveKind::DateTimeOffset => "chrono::DateTime<chrono::FixedOffset>",
        PrimitiveKind::TimeOfDay => "chrono::NaiveTime",
        // ISO 8601 duration and base64url text
        PrimitiveKind::Duration | PrimitiveKind::Binary => "String",
    }
}

/// Spells a type descriptor as Rust type syntax.
///
/// # Arguments
/// * `descriptor` - Resolved property type
/// * `namespace` - Namespace the property was declared in; enum and complex
///   references are local to it
/// * `owner` - Name of the type declaring the property; a direct
///   reference back to it is boxed
/// * `names` - Identifiers of the module being generated
#[must_use]
pub fn rust_type(
    descriptor: &TypeDescriptor,
    namespace: &str,
    owner: &str,
    names: &ModuleNames,
) -> String {
    match descriptor {
        TypeDescriptor::Primitive(kind) => primitive_type(*kind).to_string(),
        TypeDescriptor::EnumRef(name) => names.type_name(namespace, name),
        TypeDescriptor::ComplexRef(name) if name == owner => {
            format!("Box<{}>", names.type_name(namespace, name))
        }
        TypeDescriptor::ComplexRef(name) => names.type_name(namespace, name),
        // Vec already provides the indirection a self reference needs
        TypeDescriptor::Collection(inner) => {
            format!("Vec<{}>", rust_type(inner, namespace, "", names))
        }
        TypeDescriptor::Nullable(inner) => {
            format!("Option<{}>", rust_type(inner, namespace, owner, names))
        }
        TypeDescriptor::Unresolved => UNRESOLVED_TYPE.to_string(),
    }
}

/// Returns true if a missing field should deserialize to its default.
#[must_use]
pub fn defaults_when_missing(descriptor: &TypeDescriptor) -> bool {
    matches!(
        descriptor,
        TypeDescriptor::Collection(_) | TypeDescriptor::Unresolved
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(descriptor: TypeDescriptor) -> Box<TypeDescriptor> {
        Box::new(descriptor)
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(primitive_type(PrimitiveKind::String), "String");
        assert_eq!(primitive_type(PrimitiveKind::Int64), "i64");
        assert_eq!(primitive_type(PrimitiveKind::Single), "f32");
        assert_eq!(primitive_type(PrimitiveKind::Guid), "uuid::Uuid");
    }

    #[test]
    fn test_wrapper_order() {
        let names = ModuleNames::new();
        let emails = TypeDescriptor::Collection(boxed(TypeDescriptor::Primitive(
            PrimitiveKind::String,
        )));
        assert_eq!(rust_type(&emails, "Trippin", "Person", &names), "Vec<String>");

        let last_name = TypeDescriptor::Nullable(boxed(TypeDescriptor::Primitive(
            PrimitiveKind::String,
        )));
        assert_eq!(rust_type(&last_name, "Trippin", "Person", &names), "Option<String>");

        let gender = TypeDescriptor::EnumRef("PersonGender".to_string());
        assert_eq!(rust_type(&gender, "Trippin", "Person", &names), "PersonGender");

        let unresolved = TypeDescriptor::Nullable(boxed(TypeDescriptor::Unresolved));
        assert_eq!(
            rust_type(&unresolved, "Trippin", "Person", &names),
            "Option<serde_json::Value>"
        );
    }

    #[test]
    fn test_self_reference_is_boxed() {
        let names = ModuleNames::new();
        let parent = TypeDescriptor::Nullable(boxed(TypeDescriptor::ComplexRef(
            "Node".to_string(),
        )));
        assert_eq!(rust_type(&parent, "Trippin", "Node", &names), "Option<Box<Node>>");
        assert_eq!(rust_type(&parent, "Trippin", "Tree", &names), "Option<Node>");

        let required = TypeDescriptor::ComplexRef("Node".to_string());
        assert_eq!(rust_type(&required, "Trippin", "Node", &names), "Box<Node>");

        let children = TypeDescriptor::Collection(boxed(TypeDescriptor::ComplexRef(
            "Node".to_string(),
        )));
        assert_eq!(rust_type(&children, "Trippin", "Node", &names), "Vec<Node>");
    }

    #[test]
    fn test_renamed_reference() {
        let xml = r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
<edmx:DataServices>
<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="A">
<ComplexType Name="Location"><Property Name="Parent" Type="A.Location"/></ComplexType>
</Schema>
<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="B">
<ComplexType Name="Location"><Property Name="Parent" Type="B.Location"/></ComplexType>
</Schema>
</edmx:DataServices>
</edmx:Edmx>"#;
        let model = odatagen_schema::parse_metadata(xml.as_bytes()).expect("Failed to parse");
        let names = ModuleNames::plan(&model, &["A", "B"]).expect("Failed to plan");

        let parent = TypeDescriptor::Nullable(boxed(TypeDescriptor::ComplexRef(
            "Location".to_string(),
        )));
        assert_eq!(
            rust_type(&parent, "A", "Location", &names),
            "Option<Box<Location>>"
        );
        assert_eq!(
            rust_type(&parent, "B", "Location", &names),
            "Option<Box<Location2>>"
        );
    }

    #[test]
    fn test_defaults_when_missing() {
        assert!(defaults_when_missing(&TypeDescriptor::Unresolved));
        assert!(defaults_when_missing(&TypeDescriptor::Collection(boxed(
            TypeDescriptor::Unresolved
        ))));
        assert!(!defaults_when_missing(&TypeDescriptor::Primitive(
            PrimitiveKind::Int32
        )));
    }
}
