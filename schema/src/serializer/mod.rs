//! Serializers for crate graphs.
//!
//! Two serialization formats are supported:
//! - **JSON-LD** ([`jsonld`]): the crate metadata document, one node object per subject
//! - **N-Triples** ([`ntriples`]): one triple per line, for diffing and bulk loading

pub mod jsonld;
pub mod ntriples;
