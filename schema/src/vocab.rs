//! Vocabulary IRIs used by the schema layer.
//!
//! Every triple the emitter produces draws its predicates and structural
//! types from this module, and the importer matches against the same set.

/// `rdf:` namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// `rdfs:` namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// `owl:` namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
/// `xsd:` namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// `schema:` namespace (schema.org).
pub const SCHEMA_ORG: &str = "https://schema.org/";
/// `openbis:` namespace, used by crates exported from openBIS.
pub const OPENBIS: &str = "http://openbis.org/";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:Property`, the structural type of every property node.
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
/// `rdf:XMLLiteral`.
pub const RDF_XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";

/// `rdfs:Class`, the structural type of every class node.
pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
/// `rdfs:label`.
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// `rdfs:comment`.
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
/// `rdfs:subClassOf`.
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

/// `owl:Restriction`, the structural type of every restriction node.
pub const OWL_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#Restriction";
/// `owl:restriction`, linking a class to one of its restrictions.
pub const OWL_HAS_RESTRICTION: &str = "http://www.w3.org/2002/07/owl#restriction";
/// `owl:onProperty`.
pub const OWL_ON_PROPERTY: &str = "http://www.w3.org/2002/07/owl#onProperty";
/// `owl:minCardinality`.
pub const OWL_MIN_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#minCardinality";
/// `owl:maxCardinality`.
pub const OWL_MAX_CARDINALITY: &str = "http://www.w3.org/2002/07/owl#maxCardinality";
/// `owl:equivalentClass`.
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";
/// `owl:equivalentProperty`.
pub const OWL_EQUIVALENT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#equivalentProperty";

/// `schema:domainIncludes`.
pub const SCHEMA_DOMAIN_INCLUDES: &str = "https://schema.org/domainIncludes";
/// `schema:rangeIncludes`.
pub const SCHEMA_RANGE_INCLUDES: &str = "https://schema.org/rangeIncludes";
/// `schema:Thing`, the parent assigned to classes that declare none.
pub const SCHEMA_THING: &str = "https://schema.org/Thing";
/// `schema:MediaObject`, the full type behind RO-Crate's `File`.
pub const SCHEMA_MEDIA_OBJECT: &str = "https://schema.org/MediaObject";

/// Prefix table the context deriver always recognizes.
pub const WELL_KNOWN_PREFIXES: &[(&str, &str)] = &[
    ("schema", SCHEMA_ORG),
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("owl", OWL),
    ("xsd", XSD),
    ("openbis", OPENBIS),
];

/// Returns the well-known namespace bound to `prefix`, if any.
#[must_use]
pub fn well_known_namespace(prefix: &str) -> Option<&'static str> {
    WELL_KNOWN_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, ns)| *ns)
}

/// Returns `true` if `s` carries a URI scheme (`http:`, `urn:`, a compact
/// `prefix:` form, ...).
///
/// A scheme is a leading ASCII letter followed by letters, digits, `+`, `-`
/// or `.`, terminated by `:`.
#[must_use]
pub fn has_scheme(s: &str) -> bool {
    let Some(colon) = s.find(':') else {
        return false;
    };
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Returns `true` for `http://` and `https://` IRIs.
#[must_use]
pub fn is_web_iri(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
