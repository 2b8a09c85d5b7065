//! JSON-LD serializer.
//!
//! Groups triples into one node object per subject (in first-seen order),
//! compacts identifiers and keys against the supplied [`Context`], and wraps
//! the nodes in a crate metadata document that always starts with the root
//! dataset and the metadata descriptor, followed by the file entities.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::config::CrateConfig;
use crate::context::Context;
use crate::dataset::{CrateMetadata, FileEntry};
use crate::term::{Term, Triple};
use crate::vocab::RDF_TYPE;

/// Identifier of the root dataset node.
pub const ROOT_DATASET_ID: &str = "./";

/// Profile the metadata descriptor conforms to.
pub const RO_CRATE_PROFILE: &str = "https://w3id.org/ro/crate/1.1";

/// Serializes `triples` to a `{"@context", "@graph"}` document without the
/// structural crate nodes.
#[must_use]
pub fn to_json_ld<'a, I>(triples: I, context: &Context) -> Value
where
    I: IntoIterator<Item = &'a Triple>,
{
    json!({
        "@context": context.to_json(),
        "@graph": build_graph(triples, context)
    })
}

/// Serializes `triples` to a complete crate metadata document: the root
/// dataset carrying `metadata`, the metadata descriptor and one node per
/// file come first, then the graph nodes.
#[must_use]
pub fn to_crate_document<'a, I>(
    triples: I,
    context: &Context,
    config: &CrateConfig,
    metadata: &CrateMetadata,
    files: &[FileEntry],
) -> Value
where
    I: IntoIterator<Item = &'a Triple>,
{
    let mut graph = vec![
        metadata.to_root_node(ROOT_DATASET_ID, files),
        json!({
            "@id": config.metadata_file,
            "@type": "CreativeWork",
            "conformsTo": { "@id": RO_CRATE_PROFILE },
            "about": { "@id": ROOT_DATASET_ID }
        }),
    ];
    graph.extend(files.iter().map(FileEntry::to_node));
    graph.extend(build_graph(triples, context));
    json!({
        "@context": context.to_json(),
        "@graph": graph
    })
}

fn build_graph<'a, I>(triples: I, context: &Context) -> Vec<Value>
where
    I: IntoIterator<Item = &'a Triple>,
{
    let mut nodes: IndexMap<&str, Map<String, Value>> = IndexMap::new();
    for t in triples {
        let node = nodes.entry(t.subject.as_str()).or_insert_with(|| {
            let mut node = Map::new();
            node.insert("@id".to_owned(), json!(context.compact(&t.subject)));
            node
        });
        let (key, value) = match &t.object {
            Term::Iri(o) if t.predicate == RDF_TYPE => ("@type".to_owned(), json!(context.compact(o))),
            Term::Iri(o) => (context.compact(&t.predicate), json!({ "@id": context.compact(o) })),
            Term::Literal(l) => (context.compact(&t.predicate), l.to_json()),
        };
        push_value(node, key, value);
    }
    nodes.into_values().map(Value::Object).collect()
}

/// Adds `value` under `key`, promoting to an array on the second distinct
/// value. Repeated identical values collapse, as triples form a set.
fn push_value(node: &mut Map<String, Value>, key: String, value: Value) {
    match node.get_mut(&key) {
        None => {
            node.insert(key, value);
        }
        Some(Value::Array(items)) => {
            if !items.contains(&value) {
                items.push(value);
            }
        }
        Some(existing) => {
            if *existing != value {
                let previous = existing.take();
                *existing = Value::Array(vec![previous, value]);
            }
        }
    }
}
