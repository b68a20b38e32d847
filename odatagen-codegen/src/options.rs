//! Generator options.

/// Default path of the REST client crate referenced by generated bindings.
pub const DEFAULT_CLIENT_CRATE: &str = "odata_client";

/// Default name of the generated source file.
pub const DEFAULT_FILE_NAME: &str = "model_definitions.rs";

/// Options controlling generated source text and artifact naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Crate path the generated bindings import the REST client from.
    pub client_crate: String,
    /// Generated file name.
    pub file_name: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            client_crate: DEFAULT_CLIENT_CRATE.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl GeneratorOptions {
    /// Creates options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the crate path generated bindings import the REST client from.
    #[must_use]
    pub fn client_crate(mut self, path: impl Into<String>) -> Self {
        self.client_crate = path.into();
        self
    }

    /// Sets the generated file name.
    #[must_use]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }
}
