//! Schema linker.
//!
//! Turns raw per-namespace records into a [`DataServiceModel`]. Every schema
//! shell is registered before any schema is filled, so properties and
//! entity sets can refer to a namespace whose contents are not linked yet.

use crate::error::SchemaError;
use crate::model::{
    DataServiceModel, EntitySet, EnumMember, EnumType, Property, Schema, StructuredType,
};
use crate::raw::{RawDataServices, RawEnumType, RawSchema, RawStructuredType};

/// Links raw schemas into a cross-referenced model.
///
/// # Errors
/// Returns `SchemaError::UnresolvedEntitySetReference` for the first entity
/// set, in namespace then name order, whose entity type does not exist.
pub fn link(data_services: RawDataServices) -> Result<DataServiceModel, SchemaError> {
    let mut model = DataServiceModel::default();

    for raw in &data_services.schemas {
        let alias = raw.alias.clone().filter(|alias| {
            let clashes = data_services
                .schemas
                .iter()
                .any(|other| &other.namespace == alias);
            if clashes {
                tracing::warn!(
                    "Alias {} of namespace {} shadows another namespace, ignoring it",
                    alias,
                    raw.namespace
                );
            }
            !clashes
        });
        model.insert_schema(Schema::new(raw.namespace.clone(), alias));
    }

    for raw in data_services.schemas {
        let schema = model
            .schema_mut(&raw.namespace)
            .ok_or_else(|| SchemaError::NamespaceNotFound {
                namespace: raw.namespace.clone(),
            })?;
        fill_schema(schema, raw);
    }

    validate_entity_sets(&model)?;

    Ok(model)
}

fn fill_schema(schema: &mut Schema, raw: RawSchema) {
    let namespace = raw.namespace;
    tracing::debug!("Linking namespace {}", namespace);

    for raw_type in raw.entity_types {
        let entity_type = link_structured_type(raw_type, &namespace);
        if let Some(previous) = schema
            .entity_types
            .insert(entity_type.name.clone(), entity_type)
        {
            tracing::warn!(
                "Duplicate entity type {}.{}, keeping the last declaration",
                namespace,
                previous.name
            );
        }
    }

    for raw_type in raw.complex_types {
        let complex_type = link_structured_type(raw_type, &namespace);
        if let Some(previous) = schema
            .complex_types
            .insert(complex_type.name.clone(), complex_type)
        {
            tracing::warn!(
                "Duplicate complex type {}.{}, keeping the last declaration",
                namespace,
                previous.name
            );
        }
    }

    for raw_enum in raw.enum_types {
        let enum_type = link_enum_type(raw_enum);
        if let Some(previous) = schema.enum_types.insert(enum_type.name.clone(), enum_type) {
            tracing::warn!(
                "Duplicate enum type {}.{}, keeping the last declaration",
                namespace,
                previous.name
            );
        }
    }

    for container in raw.containers {
        for raw_set in container.entity_sets {
            let entity_set = EntitySet::new(
                raw_set.name,
                raw_set.entity_type,
                namespace.clone(),
                container.name.clone(),
            );
            if let Some(previous) = schema
                .entity_sets
                .insert(entity_set.name.clone(), entity_set)
            {
                tracing::warn!(
                    "Duplicate entity set {} in {}, keeping the last declaration",
                    previous.name,
                    namespace
                );
            }
        }
    }
}

fn link_structured_type(raw: RawStructuredType, namespace: &str) -> StructuredType {
    let mut linked = StructuredType::new(raw.name);
    linked.base_type = raw.base_type;
    linked.is_abstract = raw.is_abstract;
    linked.key = raw.key;

    for raw_property in raw.properties {
        let property = Property::new(
            raw_property.name,
            raw_property.type_name,
            raw_property.nullable,
            namespace.to_string(),
        );
        if let Some(previous) = linked.properties.insert(property.name.clone(), property) {
            tracing::warn!(
                "Duplicate property {} on {}.{}, keeping the last declaration",
                previous.name,
                namespace,
                linked.name
            );
        }
    }

    linked
}

/// Copies members, numbering implicit ones from the previous value.
fn link_enum_type(raw: RawEnumType) -> EnumType {
    let mut linked = EnumType::new(raw.name);
    linked.is_flags = raw.is_flags;

    let mut next: i64 = 0;
    for raw_member in raw.members {
        let value = raw_member.value.unwrap_or_else(|| next.to_string());
        next = value
            .parse::<i64>()
            .map_or(next.saturating_add(1), |current| current.saturating_add(1));
        linked.members.push(EnumMember {
            name: raw_member.name,
            value,
        });
    }

    linked
}

fn validate_entity_sets(model: &DataServiceModel) -> Result<(), SchemaError> {
    for namespace in model.namespaces() {
        let schema = model.require_schema(namespace)?;
        for entity_set in schema.sorted_entity_sets() {
            let entity_type = entity_set.resolve(model)?;
            tracing::debug!(
                "Entity set {} bound to entity type {}",
                entity_set.name,
                entity_type.name
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use crate::resolve::{PrimitiveKind, TypeDescriptor};

    const MULTI_NAMESPACE_EDMX: &str = r#"<edmx:Edmx xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx" Version="4.0">
<edmx:DataServices>
<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Trippin.Model">
<EntityType Name="Person">
<Key><PropertyRef Name="UserName"/></Key>
<Property Name="UserName" Type="Edm.String" Nullable="false"/>
<Property Name="Gender" Type="Trippin.Model.PersonGender" Nullable="false"/>
<Property Name="HomeAddress" Type="Trippin.Model.Location"/>
<Property Name="Emails" Type="Collection(Edm.String)"/>
</EntityType>
<EntityType Name="Airline">
<Key><PropertyRef Name="AirlineCode"/></Key>
<Property Name="AirlineCode" Type="Edm.String" Nullable="false"/>
</EntityType>
<ComplexType Name="Location">
<Property Name="Address" Type="Edm.String"/>
</ComplexType>
<EnumType Name="PersonGender">
<Member Name="Male" Value="0"/>
<Member Name="Female" Value="1"/>
<Member Name="Unknown" Value="2"/>
</EnumType>
</Schema>
<Schema xmlns="http://docs.oasis-open.org/odata/ns/edm" Namespace="Trippin.Data">
<ComplexType Name="Visit">
<Property Name="Where" Type="Trippin.Model.Location"/>
</ComplexType>
<EntityContainer Name="Container">
<EntitySet Name="People" EntityType="Trippin.Model.Person"/>
<EntitySet Name="Airlines" EntityType="Trippin.Model.Airline"/>
</EntityContainer>
</Schema>
</edmx:DataServices>
</edmx:Edmx>"#;

    fn link_str(xml: &str) -> Result<DataServiceModel, SchemaError> {
        let data_services = parse_document(xml.as_bytes())?;
        link(data_services)
    }

    fn single_schema(body: &str) -> String {
        format!(
            r#"<edmx:Edmx Version="4.0"><edmx:DataServices><Schema Namespace="NS" Alias="ns">{body}</Schema></edmx:DataServices></edmx:Edmx>"#
        )
    }

    #[test]
    fn test_link_multi_namespace() {
        let model = link_str(MULTI_NAMESPACE_EDMX).expect("Failed to link");

        assert_eq!(model.len(), 2);
        assert_eq!(model.namespaces(), vec!["Trippin.Data", "Trippin.Model"]);

        let data = model.schema("Trippin.Data").expect("data schema");
        let people = data.entity_sets.get("People").expect("People set");
        assert_eq!(people.entity_type_ref(), "Trippin.Model.Person");
        assert_eq!(people.namespace(), "Trippin.Data");
        assert_eq!(people.container, "Container");

        let person = people.resolve(&model).expect("Person resolves");
        let expected = model
            .schema("Trippin.Model")
            .and_then(|schema| schema.entity_types.get("Person"))
            .expect("Person declared");
        assert_eq!(person, expected);
        assert_eq!(person.key, vec!["UserName".to_string()]);
    }

    #[test]
    fn test_properties_resolve_in_declaring_namespace() {
        let model = link_str(MULTI_NAMESPACE_EDMX).expect("Failed to link");
        let person = model
            .entity_type("Trippin.Model.Person")
            .expect("Person declared");

        let gender = &person.properties["Gender"];
        assert_eq!(gender.namespace(), "Trippin.Model");
        assert_eq!(
            gender.resolve(&model).expect("declared namespace"),
            TypeDescriptor::EnumRef("PersonGender".to_string())
        );

        let emails = &person.properties["Emails"];
        assert_eq!(
            emails.resolve(&model).expect("declared namespace"),
            TypeDescriptor::Collection(Box::new(TypeDescriptor::Primitive(
                PrimitiveKind::String
            )))
        );
    }

    #[test]
    fn test_cross_namespace_property_stays_unresolved() {
        let model = link_str(MULTI_NAMESPACE_EDMX).expect("Failed to link");
        let visit = &model.schema("Trippin.Data").expect("data schema").complex_types["Visit"];

        assert_eq!(
            visit.properties["Where"].resolve(&model).expect("declared namespace"),
            TypeDescriptor::Nullable(Box::new(TypeDescriptor::Unresolved))
        );
    }

    #[test]
    fn test_unresolved_entity_set_reference() {
        let xml = single_schema(
            r#"<EntityContainer Name="Container"><EntitySet Name="Ghosts" EntityType="NS.Ghost"/></EntityContainer>"#,
        );

        let err = link_str(&xml).expect_err("Ghost is not declared");
        match err {
            SchemaError::UnresolvedEntitySetReference {
                entity_set,
                entity_type,
            } => {
                assert_eq!(entity_set, "Ghosts");
                assert_eq!(entity_type, "NS.Ghost");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_entity_set_reference_by_alias() {
        let xml = single_schema(
            r#"<EntityType Name="Thing"><Property Name="Id" Type="Edm.Int32" Nullable="false"/></EntityType>
               <EntityContainer Name="Container"><EntitySet Name="Things" EntityType="ns.Thing"/></EntityContainer>"#,
        );

        let model = link_str(&xml).expect("Failed to link");
        let things = &model.schema("NS").expect("schema").entity_sets["Things"];
        assert_eq!(things.resolve(&model).expect("alias resolves").name, "Thing");
    }

    #[test]
    fn test_entity_sets_from_several_containers() {
        let xml = single_schema(
            r#"<EntityType Name="Thing"/>
               <EntityContainer Name="First"><EntitySet Name="A" EntityType="NS.Thing"/></EntityContainer>
               <EntityContainer Name="Second"><EntitySet Name="B" EntityType="NS.Thing"/></EntityContainer>"#,
        );

        let model = link_str(&xml).expect("Failed to link");
        let schema = model.schema("NS").expect("schema");
        assert_eq!(schema.entity_sets.len(), 2);
        assert_eq!(schema.entity_sets["B"].container, "Second");
    }

    #[test]
    fn test_implicit_enum_values() {
        let xml = single_schema(
            r#"<EnumType Name="Level">
                 <Member Name="Low"/>
                 <Member Name="Mid"/>
                 <Member Name="High" Value="10"/>
                 <Member Name="Max"/>
               </EnumType>"#,
        );

        let model = link_str(&xml).expect("Failed to link");
        let level = &model.schema("NS").expect("schema").enum_types["Level"];
        let values: Vec<&str> = level.members.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["0", "1", "10", "11"]);
    }

    #[test]
    fn test_duplicate_declarations_keep_last() {
        let xml = single_schema(
            r#"<ComplexType Name="Point"><Property Name="X" Type="Edm.Int32"/></ComplexType>
               <ComplexType Name="Point"><Property Name="Y" Type="Edm.Int32"/></ComplexType>"#,
        );

        let model = link_str(&xml).expect("Failed to link");
        let point = &model.schema("NS").expect("schema").complex_types["Point"];
        assert!(point.properties.contains_key("Y"));
        assert!(!point.properties.contains_key("X"));
    }

    #[test]
    fn test_declaration_extras_are_kept() {
        let xml = single_schema(
            r#"<EntityType Name="Base" Abstract="true"/>
               <EntityType Name="Derived" BaseType="NS.Base"/>
               <EnumType Name="Perms" IsFlags="true"><Member Name="Read" Value="1"/></EnumType>"#,
        );

        let model = link_str(&xml).expect("Failed to link");
        let schema = model.schema("NS").expect("schema");
        assert!(schema.entity_types["Base"].is_abstract);
        assert_eq!(
            schema.entity_types["Derived"].base_type.as_deref(),
            Some("NS.Base")
        );
        assert!(schema.enum_types["Perms"].is_flags);
    }

    #[test]
    fn test_parse_errors_pass_through() {
        let err = link_str("not xml at all").expect_err("no root");
        assert!(matches!(err, SchemaError::Parse(_)));
    }
}
