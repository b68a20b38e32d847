//! Identifier allocation for generated modules.
//!
//! Distinct metadata names can map to the same Rust identifier (`ID` and
//! `Id` both become `id`, `Location` may be declared in two namespaces).
//! Identifiers are handed out in emission order: the first claimant keeps
//! the plain identifier and later ones get a numeric suffix.

use crate::error::CodegenError;
use crate::rust::naming::{accessor_ident, type_ident};
use odatagen_schema::{DataServiceModel, EntitySet};
use std::collections::{HashMap, HashSet};

/// Type names every generated module imports or declares up front.
const RESERVED_TYPES: &[&str] = &[
    "ModelDefinition",
    "PhantomData",
    "Serialize",
    "Deserialize",
    "DataSet",
    "EntityDefinition",
    "ODataClient",
    "Box",
    "Option",
    "Result",
    "String",
    "Vec",
];

/// Identifiers already taken in one Rust scope.
#[derive(Debug, Clone)]
pub struct IdentScope {
    taken: HashSet<String>,
    separator: &'static str,
}

impl IdentScope {
    /// Scope for snake_case identifiers; clashes get `_2`, `_3`, ...
    #[must_use]
    pub fn snake() -> Self {
        Self {
            taken: HashSet::new(),
            separator: "_",
        }
    }

    /// Scope for PascalCase identifiers; clashes get `2`, `3`, ...
    #[must_use]
    pub fn pascal() -> Self {
        Self {
            taken: HashSet::new(),
            separator: "",
        }
    }

    /// Marks an identifier as taken without claiming it.
    pub fn reserve(&mut self, ident: &str) {
        self.taken.insert(ident.to_string());
    }

    /// Claims `ident`, or its first free suffixed form if it is taken.
    pub fn claim(&mut self, ident: String) -> String {
        if self.taken.insert(ident.clone()) {
            return ident;
        }

        // A suffixed keyword is no longer a keyword
        let stem = ident.strip_prefix("r#").unwrap_or(&ident);
        let mut n = 2u32;
        loop {
            let candidate = format!("{stem}{}{n}", self.separator);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Type and accessor identifiers of one generated module.
///
/// Names that were never planned fall back to their plain identifier.
#[derive(Debug, Clone, Default)]
pub struct ModuleNames {
    types: HashMap<String, String>,
    accessors: HashMap<String, String>,
}

impl ModuleNames {
    /// Creates a table with no planned names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns identifiers to everything rendered for `namespaces`.
    ///
    /// Walks declarations in the order the generator emits them: per
    /// namespace, enums, complex types, then entity types and accessors
    /// by entity set name.
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if a namespace is not in the model.
    pub fn plan(model: &DataServiceModel, namespaces: &[&str]) -> Result<Self, CodegenError> {
        let mut names = Self::new();
        let mut types = IdentScope::pascal();
        let mut functions = IdentScope::snake();
        let mut entity_types = HashSet::new();

        for reserved in RESERVED_TYPES {
            types.reserve(reserved);
        }

        for namespace in namespaces {
            let schema = model.require_schema(namespace)?;

            for enum_type in schema.sorted_enum_types() {
                names.assign_type(&mut types, &schema.namespace, &enum_type.name);
            }
            for complex_type in schema.sorted_complex_types() {
                names.assign_type(&mut types, &schema.namespace, &complex_type.name);
            }
            for entity_set in schema.sorted_entity_sets() {
                // Unresolvable references fail later, in the generator
                if let Some(canonical) = model.canonical_name(entity_set.entity_type_ref()) {
                    if let Some((owner, name)) = canonical.rsplit_once('.') {
                        if !entity_types.contains(&canonical) {
                            names.assign_type(&mut types, owner, name);
                        }
                    }
                    entity_types.insert(canonical);
                }
                names.assign_accessor(&mut functions, entity_set);
            }
        }

        Ok(names)
    }

    fn assign_type(&mut self, scope: &mut IdentScope, namespace: &str, name: &str) {
        let plain = type_ident(name);
        let ident = scope.claim(plain.clone());
        if ident != plain {
            tracing::warn!(
                "Type {}.{} clashes with another item, emitting it as {}",
                namespace,
                name,
                ident
            );
        }
        self.types.insert(qualified(namespace, name), ident);
    }

    fn assign_accessor(&mut self, scope: &mut IdentScope, entity_set: &EntitySet) {
        let plain = accessor_ident(&entity_set.name);
        let ident = scope.claim(plain.clone());
        if ident != plain {
            tracing::warn!(
                "Entity set {}.{} clashes with another accessor, emitting it as {}",
                entity_set.namespace(),
                entity_set.name,
                ident
            );
        }
        self.accessors
            .insert(qualified(entity_set.namespace(), &entity_set.name), ident);
    }

    /// Identifier of a type declared in `namespace`.
    #[must_use]
    pub fn type_name(&self, namespace: &str, name: &str) -> String {
        self.types
            .get(&qualified(namespace, name))
            .cloned()
            .unwrap_or_else(|| type_ident(name))
    }

    /// Identifier of an entity set's accessor function.
    #[must_use]
    pub fn accessor_name(&self, entity_set: &EntitySet) -> String {
        self.accessors
            .get(&qualified(entity_set.namespace(), &entity_set.name))
            .cloned()
            .unwrap_or_else(|| accessor_ident(&entity_set.name))
    }
}

fn qualified(namespace: &str, name: &str) -> String {
    format!("{namespace}.{name}")
}
