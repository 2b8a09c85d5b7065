//! Typed RO-Crate schemas and instance graphs.
//!
//! The `rocrate-schema` crate models a crate's schema layer (classes,
//! properties and cardinality restrictions) and its instance layer (entries
//! holding literal values and references), turns both into RDF triples, and
//! reads them back from the JSON-LD crate metadata document.
//!
//! # Entry Point
//!
//! ```
//! use rocrate_schema::{ClassDef, Entry, LiteralType, PropertyDef, SchemaFacade};
//!
//! let mut facade = SchemaFacade::new();
//! facade
//!     .add_class(
//!         ClassDef::new("Person")
//!             .with_property(PropertyDef::new("name").with_range(LiteralType::String).required(true))
//!             .with_property(PropertyDef::new("knows").with_range("Person").multi_valued(true)),
//!     )
//!     .unwrap();
//! facade.add_entry(Entry::new("p1", "Person").with_property("name", "Ann"));
//! assert_eq!(facade.collect_dependencies_bfs("Person"), vec!["Person"]);
//! ```
//!
//! # Serialization
//!
//! ```
//! let facade = rocrate_schema::SchemaFacade::new();
//! let json_ld = facade.to_json_ld();
//! let ntriples = facade.to_ntriples();
//! assert!(json_ld["@graph"].is_array());
//! assert!(ntriples.is_empty());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod context;
pub mod dataset;
pub mod emit;
pub mod error;
pub mod facade;
pub mod import;
pub mod instance;
pub mod introspect;
pub mod layout;
pub mod model;
pub mod prefix;
pub mod reconcile;
pub mod registry;
pub mod serializer;
pub mod term;
pub mod vocab;

pub use config::CrateConfig;
pub use context::Context;
pub use dataset::{CrateMetadata, FileEntry};
pub use error::{CrateError, SchemaError};
pub use facade::SchemaFacade;
pub use import::{DroppedItem, ImportReport};
pub use instance::{Entry, InstanceModel, Value};
pub use introspect::{
    FieldTemplate, FieldValue, Materialize, Record, RecordValue, Skeleton, SkeletonField,
    TypeTemplate, ValueKind,
};
pub use model::{ClassDef, LiteralType, PropertyDef, Range, RestrictionDef, Schema};
pub use reconcile::AddOutcome;
pub use registry::{Registry, Resolved, Slot};
pub use term::{Graph, Literal, Term, Triple};
