//! Namespace prefix derivation.
//!
//! Builds the minimal `@context` for a set of triples: well-known prefixes
//! that are actually used, plus prefixes minted for unknown namespaces that
//! recur often enough to be worth abbreviating.

use indexmap::{IndexMap, IndexSet};
use serde_json::json;
use tracing::debug;

use crate::config::CrateConfig;
use crate::context::Context;
use crate::term::{Term, Triple};
use crate::vocab::{self, OWL_MAX_CARDINALITY, OWL_MIN_CARDINALITY, RDF_TYPE};

/// Derives the context for `triples`.
///
/// Web IRIs in predicate, type and object position are matched against the
/// well-known prefixes and the configured base namespace. An unmatched IRI
/// contributes its namespace (everything up to the last `/`) when the IRI
/// has a host containing `.` and at least one path segment. A namespace
/// shared by at least [`CrateConfig::namespace_threshold`] distinct IRIs is
/// bound to the first label of its host, suffixed with a number on
/// collision.
pub fn derive_context<'a, I>(triples: I, config: &CrateConfig) -> Context
where
    I: IntoIterator<Item = &'a Triple>,
{
    let mut iris: IndexSet<&str> = IndexSet::new();
    let mut uses_cardinality = false;
    for t in triples {
        if vocab::is_web_iri(&t.predicate) {
            iris.insert(&t.predicate);
        }
        if let Term::Iri(object) = &t.object {
            if t.predicate == RDF_TYPE || vocab::is_web_iri(object) {
                iris.insert(object);
            }
        }
        if t.predicate == OWL_MIN_CARDINALITY || t.predicate == OWL_MAX_CARDINALITY {
            uses_cardinality = true;
        }
    }

    let known: Vec<(&str, &str)> = vocab::WELL_KNOWN_PREFIXES
        .iter()
        .copied()
        .chain(std::iter::once((config.base_prefix.as_str(), config.base_iri.as_str())))
        .collect();

    let mut used: IndexMap<String, String> = IndexMap::new();
    let mut unknown: IndexMap<String, usize> = IndexMap::new();
    for iri in &iris {
        let matched = known
            .iter()
            .filter(|(_, ns)| iri.starts_with(ns))
            .max_by_key(|(_, ns)| ns.len());
        match matched {
            Some((prefix, ns)) => {
                used.entry((*prefix).to_string())
                    .or_insert_with(|| (*ns).to_string());
            }
            None => {
                if let Some(ns) = namespace_of(iri) {
                    *unknown.entry(ns).or_default() += 1;
                }
            }
        }
    }

    if uses_cardinality {
        used.entry("xsd".to_string())
            .or_insert_with(|| vocab::XSD.to_string());
    }

    for (ns, count) in unknown {
        if count < config.namespace_threshold {
            continue;
        }
        let Some(stem) = host_label(&ns) else {
            continue;
        };
        let mut prefix = stem.to_string();
        let mut n = 1;
        while used.contains_key(&prefix) {
            prefix = format!("{}{}", stem, n);
            n += 1;
        }
        debug!(prefix = %prefix, namespace = %ns, uses = count, "minted namespace prefix");
        used.insert(prefix, ns);
    }

    let mut ctx = Context::new(config.base_context.clone());
    for (prefix, ns) in used {
        ctx.insert_prefix(prefix, ns);
    }
    if uses_cardinality {
        ctx.insert_term("owl:minCardinality", json!({"@type": "xsd:integer"}));
        ctx.insert_term("owl:maxCardinality", json!({"@type": "xsd:integer"}));
    }
    ctx
}

/// Namespace of a web IRI: everything up to and including the last `/`,
/// provided the host contains `.` and a path follows it.
fn namespace_of(iri: &str) -> Option<String> {
    let parts: Vec<&str> = iri.split('/').collect();
    if parts.len() <= 3 || !parts[2].contains('.') {
        return None;
    }
    let last = iri.rfind('/')?;
    Some(iri[..=last].to_string())
}

/// First label of the namespace host (`"purl"` for `http://purl.org/dc/`).
fn host_label(ns: &str) -> Option<&str> {
    let host = ns.split('/').nth(2)?;
    let mut labels = host.split('.');
    let first = labels.next()?;
    (labels.next().is_some() && !first.is_empty()).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Literal;

    fn edge(s: &str, p: &str, o: &str) -> Triple {
        Triple::iri(s, p, o)
    }

    #[test]
    fn only_used_well_known_prefixes_appear() {
        let config = CrateConfig::default();
        let triples = vec![edge(
            "http://example.com/Person",
            RDF_TYPE,
            vocab::RDFS_CLASS,
        )];
        let ctx = derive_context(&triples, &config);
        let prefixes: Vec<&str> = ctx.prefixes().keys().map(String::as_str).collect();
        assert_eq!(prefixes, vec!["rdf", "rdfs"]);
        assert_eq!(ctx.base(), Some("https://w3id.org/ro/crate/1.1/context"));
    }

    #[test]
    fn namespace_used_once_gets_no_prefix() {
        let config = CrateConfig::default();
        let triples = vec![edge(
            "http://example.com/p1",
            "http://purl.org/dc/terms/creator",
            "http://example.com/p2",
        )];
        let ctx = derive_context(&triples, &config);
        assert!(ctx.namespace("purl").is_none());
        assert_eq!(ctx.namespace("base"), Some("http://example.com/"));
    }

    #[test]
    fn namespace_used_twice_gets_host_prefix() {
        let config = CrateConfig::default();
        let triples = vec![
            edge("http://example.com/p1", "http://purl.org/dc/terms/creator", "http://example.com/p2"),
            edge("http://example.com/p1", "http://purl.org/dc/terms/license", "http://example.com/p3"),
        ];
        let ctx = derive_context(&triples, &config);
        assert_eq!(ctx.namespace("purl"), Some("http://purl.org/dc/terms/"));
    }

    #[test]
    fn colliding_host_labels_get_suffixes() {
        let config = CrateConfig::default();
        let triples = vec![
            edge("http://example.com/a", "http://purl.org/dc/terms/x", "http://purl.org/dc/terms/y"),
            edge("http://example.com/a", "http://purl.org/vocab/x", "http://purl.org/vocab/y"),
        ];
        let ctx = derive_context(&triples, &config);
        assert_eq!(ctx.namespace("purl"), Some("http://purl.org/dc/terms/"));
        assert_eq!(ctx.namespace("purl1"), Some("http://purl.org/vocab/"));
    }

    #[test]
    fn openbis_namespace_is_well_known() {
        let config = CrateConfig::default();
        let triples = vec![edge(
            "http://example.com/Sample",
            crate::vocab::OWL_EQUIVALENT_CLASS,
            "http://openbis.org/Sample",
        )];
        let ctx = derive_context(&triples, &config);
        assert_eq!(ctx.namespace("openbis"), Some(vocab::OPENBIS));
        assert!(ctx.namespace("openbis1").is_none());
    }

    #[test]
    fn hosts_without_dot_are_ignored() {
        let config = CrateConfig::default();
        let triples = vec![
            edge("http://example.com/a", "http://localhost/ns/x", "http://localhost/ns/y"),
        ];
        let ctx = derive_context(&triples, &config);
        assert!(ctx.namespace("localhost").is_none());
    }

    #[test]
    fn cardinality_triples_add_integer_typing() {
        let config = CrateConfig::default();
        let triples = vec![Triple::literal("http://example.com/r", OWL_MIN_CARDINALITY, Literal::Integer(1))];
        let ctx = derive_context(&triples, &config);
        assert_eq!(
            ctx.to_json()[1]["owl:minCardinality"],
            json!({"@type": "xsd:integer"})
        );
        assert_eq!(ctx.namespace("owl"), Some(vocab::OWL));
        assert_eq!(ctx.namespace("xsd"), Some(vocab::XSD));
    }
}
