//! Prelude module for convenient imports.
//!
//! ```ignore
//! use odatagen::prelude::*;
//! ```

// Schema types
pub use odatagen_schema::{
    DataServiceModel, EntitySet, EntityType, EnumType, ParseError, Property, Schema, SchemaError,
    TypeDescriptor, parse_metadata,
};

// Codegen types
pub use odatagen_codegen::{
    CodegenError, Generator, GeneratorOptions, render, render_all,
};

// Fetch types
pub use crate::error::FetchError;
pub use crate::fetch::{FetchOptions, MetadataFetcher};
