//! # odatagen Schema
//!
//! OData v4 metadata (EDMX/CSDL) parser and schema graph.
//!
//! This crate provides:
//! - Streaming EDMX parsing into raw per-namespace declaration records
//! - Linking of those records into a cross-namespace [`DataServiceModel`]
//! - Property and entity set type resolution
//! - Error taxonomy for unusable metadata documents

pub mod envelope;
pub mod error;
pub mod linker;
pub mod model;
pub mod parser;
pub mod raw;
pub mod resolve;

pub use error::{DecodeError, ParseError, SchemaError};
pub use linker::link;
pub use model::{
    ComplexType, DataServiceModel, EntitySet, EntityType, EnumMember, EnumRepr, EnumType,
    Property, Schema, StructuredType,
};
pub use parser::parse_document;
pub use resolve::{PrimitiveKind, TypeDescriptor};

/// Parses a metadata document and links it into a [`DataServiceModel`].
///
/// # Arguments
/// * `bytes` - Raw `$metadata` response body
///
/// # Errors
/// Returns `SchemaError` if the document is malformed, has an unsupported
/// version or structure, or declares an entity set whose entity type
/// cannot be found.
pub fn parse_metadata(bytes: &[u8]) -> Result<DataServiceModel, SchemaError> {
    let data_services = parse_document(bytes)?;
    link(data_services)
}
