//! Enum code generation.

use crate::rust::names::{IdentScope, ModuleNames};
use crate::rust::naming::type_ident;
use odatagen_schema::{EnumMember, EnumRepr, EnumType, Schema};
use std::collections::{BTreeMap, HashMap};

/// Generator for enum definitions of one namespace.
pub struct EnumGenerator<'a> {
    schema: &'a Schema,
    names: &'a ModuleNames,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(schema: &'a Schema, names: &'a ModuleNames) -> Self {
        Self { schema, names }
    }

    /// Generates all enum definitions, ordered by enum name.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        for enum_type in self.schema.sorted_enum_types() {
            output.push_str(&self.generate_enum(enum_type));
        }

        output
    }

    /// Generates one enum definition.
    #[must_use]
    pub fn generate_enum(&self, enum_type: &EnumType) -> String {
        match enum_type.repr() {
            EnumRepr::Integer if !enum_type.members.is_empty() => {
                self.generate_integer_enum(enum_type)
            }
            _ => self.generate_string_enum(enum_type),
        }
    }

    /// Members in declaration order; a repeated name keeps its last
    /// declaration.
    fn latest_members<'e>(&self, enum_type: &'e EnumType) -> Vec<&'e EnumMember> {
        let mut last_index = HashMap::new();
        for (index, member) in enum_type.members.iter().enumerate() {
            if let Some(previous) = last_index.insert(member.name.as_str(), index) {
                tracing::warn!(
                    "Enum {}.{} repeats member {}, dropping value {}",
                    self.schema.namespace,
                    enum_type.name,
                    member.name,
                    enum_type.members[previous].value
                );
            }
        }

        enum_type
            .members
            .iter()
            .enumerate()
            .filter(|(index, member)| last_index.get(member.name.as_str()) == Some(index))
            .map(|(_, member)| member)
            .collect()
    }

    /// Members ordered by value; for a repeated value the last member wins.
    fn members_by_value<'e>(&self, enum_type: &'e EnumType) -> Vec<(i64, &'e EnumMember)> {
        let mut by_value = BTreeMap::new();

        for member in self.latest_members(enum_type) {
            let Some(value) = member.integer_value() else {
                continue;
            };
            if let Some(previous) = by_value.insert(value, member) {
                tracing::warn!(
                    "Enum {}.{} repeats value {}, dropping member {}",
                    self.schema.namespace,
                    enum_type.name,
                    value,
                    previous.name
                );
            }
        }

        by_value.into_iter().collect()
    }

    /// Members ordered by name.
    fn members_by_name<'e>(&self, enum_type: &'e EnumType) -> Vec<&'e EnumMember> {
        let mut members = self.latest_members(enum_type);
        members.sort_by(|a, b| a.name.cmp(&b.name));
        members
    }

    /// Variant identifiers for `members`, in the same order.
    fn variant_idents(&self, enum_type: &EnumType, members: &[&EnumMember]) -> Vec<String> {
        let mut scope = IdentScope::pascal();

        members
            .iter()
            .map(|member| {
                let plain = type_ident(&member.name);
                let ident = scope.claim(plain.clone());
                if ident != plain {
                    tracing::warn!(
                        "Enum {}.{} member {} clashes with another variant, emitting it as {}",
                        self.schema.namespace,
                        enum_type.name,
                        member.name,
                        ident
                    );
                }
                ident
            })
            .collect()
    }

    fn generate_integer_enum(&self, enum_type: &EnumType) -> String {
        let mut output = String::new();
        let rust_name = self.names.type_name(&self.schema.namespace, &enum_type.name);
        let members = self.members_by_value(enum_type);
        let member_refs: Vec<&EnumMember> = members.iter().map(|(_, member)| *member).collect();
        let variants = self.variant_idents(enum_type, &member_refs);

        output.push_str(&self.generate_doc(enum_type, &rust_name));
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        output.push_str("#[repr(i64)]\n");
        output.push_str(&format!("pub enum {} {{\n", rust_name));
        for ((value, _), variant) in members.iter().zip(&variants) {
            output.push_str(&format!("    {} = {},\n", variant, value));
        }
        output.push_str("}\n\n");

        output.push_str(&format!("impl From<{}> for i64 {{\n", rust_name));
        output.push_str(&format!("    fn from(value: {}) -> Self {{\n", rust_name));
        output.push_str("        value as Self\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl TryFrom<i64> for {} {{\n", rust_name));
        output.push_str("    type Error = i64;\n\n");
        output.push_str("    fn try_from(value: i64) -> Result<Self, Self::Error> {\n");
        output.push_str("        match value {\n");
        for ((value, _), variant) in members.iter().zip(&variants) {
            output.push_str(&format!("            {} => Ok(Self::{}),\n", value, variant));
        }
        output.push_str("            other => Err(other),\n");
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl Serialize for {} {{\n", rust_name));
        output.push_str(
            "    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {\n",
        );
        output.push_str("        serializer.serialize_i64(i64::from(*self))\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output.push_str(&format!("impl<'de> Deserialize<'de> for {} {{\n", rust_name));
        output.push_str(
            "    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {\n",
        );
        output.push_str("        let value = i64::deserialize(deserializer)?;\n");
        output.push_str(&format!(
            "        Self::try_from(value).map_err(|value| serde::de::Error::custom(format!(\"invalid {} value {{value}}\")))\n",
            rust_name
        ));
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }

    fn generate_string_enum(&self, enum_type: &EnumType) -> String {
        let mut output = String::new();
        let rust_name = self.names.type_name(&self.schema.namespace, &enum_type.name);
        let members = self.members_by_name(enum_type);
        let variants = self.variant_idents(enum_type, &members);

        output.push_str(&self.generate_doc(enum_type, &rust_name));
        output.push_str(
            "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n",
        );
        output.push_str(&format!("pub enum {} {{\n", rust_name));
        for (member, variant) in members.iter().zip(&variants) {
            output.push_str(&format!("    #[serde(rename = {:?})]\n", member.value));
            output.push_str(&format!("    {},\n", variant));
        }
        output.push_str("}\n\n");

        output
    }

    fn generate_doc(&self, enum_type: &EnumType, rust_name: &str) -> String {
        let mut output = format!("/// {} enum.\n", rust_name);
        if enum_type.is_flags {
            output.push_str("///\n");
            output.push_str("/// Declared with `IsFlags`; combined values are not modeled.\n");
        }
        output
    }
}
