//! Triple emitter.
//!
//! Walks the schema and instance layers and yields their triples lazily:
//! classes first (each followed by its restrictions and its property
//! copies), then standalone properties, standalone restrictions and
//! finally entries. Every identifier is expanded to an absolute IRI.

use crate::config::CrateConfig;
use crate::instance::{Entry, InstanceModel};
use crate::model::{ClassDef, PropertyDef, Range, RestrictionDef, Schema};
use crate::term::{Literal, Triple};
use crate::vocab::{
    OWL_EQUIVALENT_CLASS, OWL_EQUIVALENT_PROPERTY, OWL_HAS_RESTRICTION, OWL_MAX_CARDINALITY,
    OWL_MIN_CARDINALITY, OWL_ON_PROPERTY, OWL_RESTRICTION, RDFS_CLASS, RDFS_COMMENT, RDFS_LABEL,
    RDFS_SUBCLASS_OF, RDF_PROPERTY, RDF_TYPE, SCHEMA_DOMAIN_INCLUDES, SCHEMA_RANGE_INCLUDES,
};

/// Yields every triple of `schema` and `instances`.
pub fn triples<'a>(
    schema: &'a Schema,
    instances: &'a InstanceModel,
    config: &'a CrateConfig,
) -> impl Iterator<Item = Triple> + 'a {
    let classes = schema.classes().flat_map(move |c| class_triples(c, config));
    let properties = schema
        .properties()
        .flat_map(move |p| property_triples(p, &p.domain, config));
    let restrictions = schema
        .restrictions()
        .flat_map(move |r| restriction_triples(r, config));
    let entries = instances
        .entries()
        .iter()
        .flat_map(move |e| entry_triples(e, config));
    classes.chain(properties).chain(restrictions).chain(entries)
}

/// Triples for one class, its restrictions and the properties it owns.
///
/// Each owned property is emitted with its domain narrowed to this class.
#[must_use]
pub fn class_triples(class: &ClassDef, config: &CrateConfig) -> Vec<Triple> {
    let s = config.node_iri(&class.id);
    let mut out = vec![Triple::iri(&s, RDF_TYPE, RDFS_CLASS)];
    annotations(&mut out, &s, class.label.as_deref(), class.comment.as_deref());
    for parent in &class.parents {
        out.push(Triple::iri(&s, RDFS_SUBCLASS_OF, config.node_iri(parent)));
    }
    for alias in &class.ontology_aliases {
        out.push(Triple::iri(&s, OWL_EQUIVALENT_CLASS, config.node_iri(alias)));
    }
    for restriction in class.effective_restrictions() {
        out.push(Triple::iri(
            &s,
            OWL_HAS_RESTRICTION,
            config.node_iri(&restriction.id),
        ));
        out.extend(restriction_triples(&restriction, config));
    }
    let domain = [class.id.clone()];
    for property in &class.properties {
        out.extend(property_triples(property, &domain, config));
    }
    out
}

/// Triples for one property, with `domain` as its domain.
#[must_use]
pub fn property_triples(
    property: &PropertyDef,
    domain: &[String],
    config: &CrateConfig,
) -> Vec<Triple> {
    let s = config.node_iri(&property.id);
    let mut out = vec![Triple::iri(&s, RDF_TYPE, RDF_PROPERTY)];
    annotations(&mut out, &s, property.label.as_deref(), property.comment.as_deref());
    for class in domain {
        out.push(Triple::iri(&s, SCHEMA_DOMAIN_INCLUDES, config.node_iri(class)));
    }
    for range in &property.range {
        out.push(Triple::iri(&s, SCHEMA_RANGE_INCLUDES, range_iri(range, config)));
    }
    for alias in &property.ontology_aliases {
        out.push(Triple::iri(&s, OWL_EQUIVALENT_PROPERTY, config.node_iri(alias)));
    }
    out
}

/// Triples for one restriction node.
#[must_use]
pub fn restriction_triples(restriction: &RestrictionDef, config: &CrateConfig) -> Vec<Triple> {
    let s = config.node_iri(&restriction.id);
    let mut out = vec![
        Triple::iri(&s, RDF_TYPE, OWL_RESTRICTION),
        Triple::iri(&s, OWL_ON_PROPERTY, config.node_iri(&restriction.property)),
    ];
    if let Some(min) = restriction.min_cardinality {
        out.push(Triple::literal(&s, OWL_MIN_CARDINALITY, cardinality(min)));
    }
    if let Some(max) = restriction.max_cardinality {
        out.push(Triple::literal(&s, OWL_MAX_CARDINALITY, cardinality(max)));
    }
    out
}

/// Triples for one entry: its type, one edge per literal item and one edge
/// per reference target.
#[must_use]
pub fn entry_triples(entry: &Entry, config: &CrateConfig) -> Vec<Triple> {
    let s = config.node_iri(entry.id());
    let mut out = vec![Triple::iri(&s, RDF_TYPE, config.node_iri(entry.class_id()))];
    for (key, value) in entry.properties() {
        let predicate = config.node_iri(key);
        for literal in Literal::from_value(value) {
            out.push(Triple::literal(&s, &predicate, literal));
        }
    }
    for (key, targets) in entry.references() {
        let predicate = config.node_iri(key);
        for target in targets {
            out.push(Triple::iri(&s, &predicate, config.node_iri(target)));
        }
    }
    out
}

fn annotations(out: &mut Vec<Triple>, s: &str, label: Option<&str>, comment: Option<&str>) {
    if let Some(label) = label {
        out.push(Triple::literal(s, RDFS_LABEL, Literal::from(label)));
    }
    if let Some(comment) = comment {
        out.push(Triple::literal(s, RDFS_COMMENT, Literal::from(comment)));
    }
}

fn range_iri(range: &Range, config: &CrateConfig) -> String {
    match range {
        Range::Literal(t) => t.iri(),
        Range::Class(id) => config.node_iri(id),
        Range::External(uri) => config.node_iri(uri),
    }
}

fn cardinality(n: u64) -> Literal {
    i64::try_from(n).map_or_else(
        |_| Literal::Typed {
            lexical: n.to_string(),
            datatype: crate::model::LiteralType::Integer,
        },
        Literal::Integer,
    )
}
