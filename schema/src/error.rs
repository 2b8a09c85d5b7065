//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or validating a schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A property range or restriction names an identifier that is not
    /// registered.
    #[error("{owner} refers to unregistered identifier {target}")]
    UnresolvedReference {
        /// The property or restriction holding the reference.
        owner: String,
        /// The identifier that failed to resolve.
        target: String,
    },

    /// An identifier is already taken by a definition of another kind.
    #[error("identifier {id} is already registered as a {existing}, cannot add a {incoming}")]
    IdCollision {
        /// The contested identifier.
        id: String,
        /// Kind of the existing definition.
        existing: &'static str,
        /// Kind of the rejected definition.
        incoming: &'static str,
    },

    /// A restriction's lower bound exceeds its upper bound.
    #[error("restriction {restriction} has min cardinality {min} above max cardinality {max}")]
    InvalidCardinality {
        /// The restriction identifier.
        restriction: String,
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },

    /// A restriction constrains a property its class neither owns nor
    /// inherits.
    #[error("restriction {restriction} on class {class} targets unreachable property {property}")]
    UnreachableProperty {
        /// The restriction identifier.
        restriction: String,
        /// The owning class.
        class: String,
        /// The restricted property.
        property: String,
    },

    /// No class with this identifier exists.
    #[error("unknown class {0}")]
    UnknownClass(String),

    /// No entry with this identifier exists.
    #[error("unknown entry {0}")]
    UnknownEntry(String),
}

/// Errors raised while reading or writing a crate on disk.
#[derive(Debug, Error)]
pub enum CrateError {
    /// No metadata file was found at or below the given path.
    #[error("no {file} found under {}", path.display())]
    MetadataNotFound {
        /// The searched path.
        path: PathBuf,
        /// The metadata file name searched for.
        file: String,
    },

    /// Filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The metadata file is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        /// The offending file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed as JSON but is not a usable graph document.
    #[error("invalid crate document: {0}")]
    InvalidDocument(String),

    /// The schema failed validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result alias for crate I/O.
pub type Result<T> = std::result::Result<T, CrateError>;

/// Result alias for schema operations.
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;
