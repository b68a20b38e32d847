//! # odatagen
//!
//! Typed Rust client bindings from OData v4 service metadata.
//!
//! odatagen reads a service's `$metadata` document (EDMX/CSDL), links its
//! namespaces into one schema graph and renders enums, structs and entity
//! set bindings for a REST client to consume.
//!
//! ## Quick Start
//!
//! ```ignore
//! use odatagen::prelude::*;
//!
//! let fetcher = MetadataFetcher::new()?;
//! let model = fetcher.fetch_model("https://services.odata.org/TripPinRESTierService").await?;
//!
//! let source = render(&model, "Trippin", "trippin")?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Metadata parsing, linking and type resolution
//! - [`codegen`] - Rust source generation and artifact writing
//! - [`fetch`] - Metadata download

pub mod error;
pub mod fetch;
pub mod prelude;

pub use error::FetchError;
pub use fetch::{FetchOptions, MetadataFetcher};

/// Metadata parsing, linking and type resolution.
pub mod schema {
    pub use odatagen_schema::*;
}

/// Rust source generation from linked metadata.
pub mod codegen {
    pub use odatagen_codegen::*;
}
