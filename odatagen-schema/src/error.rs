//! Error types for metadata parsing and linking.

use thiserror::Error;

/// Low-level failure to decode the bytes of a metadata document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The input contains no element at all.
    #[error("document has no root element")]
    MissingRoot,

    /// The root element is not an EDMX envelope.
    #[error("expected root element 'Edmx', found '{found}'")]
    UnexpectedRoot {
        /// Local name of the root element found.
        found: String,
    },

    /// The document ended before an element was closed.
    #[error("document ended inside element '{element}'")]
    UnexpectedEof {
        /// Element that was still open.
        element: String,
    },

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },
}

impl DecodeError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an unexpected end-of-document error.
    pub fn unexpected_eof(element: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            element: element.into(),
        }
    }
}

/// Error type for document-level parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The EDMX version attribute is not `4.0`.
    #[error("only EDMX version 4.0 is supported, got '{found}'")]
    VersionMismatch {
        /// Version found on the root element (empty if absent).
        found: String,
    },

    /// Wrong number of `DataServices` or `Schema` blocks.
    #[error("invalid document structure: {message}")]
    Structure {
        /// Error message.
        message: String,
    },

    /// The document could not be decoded.
    ///
    /// When the body turned out to be a service error envelope, `message`
    /// holds the message the service reported.
    #[error("malformed metadata document: {}", describe_malformed(.message, .source))]
    MalformedDocument {
        /// Message embedded in an error envelope, if one was found.
        message: Option<String>,
        /// Underlying decode failure.
        #[source]
        source: DecodeError,
    },
}

impl ParseError {
    /// Creates a structure error with the given message.
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Structure {
            message: message.into(),
        }
    }

    /// Returns the message a service embedded in an error envelope, if any.
    #[must_use]
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::MalformedDocument { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

fn describe_malformed(message: &Option<String>, source: &DecodeError) -> String {
    match message {
        Some(message) => format!("service reported '{message}'"),
        None => source.to_string(),
    }
}

/// Error type for schema graph construction and lookups.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// An entity set names an entity type that does not exist.
    #[error("entity set '{entity_set}' references unknown entity type '{entity_type}'")]
    UnresolvedEntitySetReference {
        /// Entity set name.
        entity_set: String,
        /// Qualified entity type reference as declared.
        entity_type: String,
    },

    /// Namespace not present in the model.
    #[error("namespace '{namespace}' not found")]
    NamespaceNotFound {
        /// Namespace name.
        namespace: String,
    },
}
