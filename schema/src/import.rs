//! Graph importer.
//!
//! Reads a crate metadata document back into schema and instance
//! definitions. Import is lax: malformed nodes are skipped and recorded in
//! the [`ImportReport`], and only a document without a usable `@graph` is an
//! error.
//!
//! Nodes are bucketed by type. Classes link their properties one class at a
//! time, in document order: first through the class's restrictions
//! (required when the minimum is above zero), then through the domain of
//! each property not linked yet.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use crate::config::CrateConfig;
use crate::context::Context;
use crate::dataset::{CrateMetadata, FileEntry, FILE_TYPE};
use crate::error::{CrateError, Result};
use crate::instance::{Entry, Value};
use crate::model::{ClassDef, LiteralType, PropertyDef, Range, RestrictionDef};
use crate::serializer::jsonld::ROOT_DATASET_ID;
use crate::vocab::{
    OWL_EQUIVALENT_CLASS, OWL_EQUIVALENT_PROPERTY, OWL_HAS_RESTRICTION, OWL_MAX_CARDINALITY,
    OWL_MIN_CARDINALITY, OWL_ON_PROPERTY, RDFS_COMMENT, RDFS_LABEL, RDFS_SUBCLASS_OF,
    SCHEMA_DOMAIN_INCLUDES, SCHEMA_MEDIA_OBJECT, SCHEMA_RANGE_INCLUDES,
};

/// A node the importer skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedItem {
    /// Node identifier, or `"<anonymous>"`.
    pub id: String,
    /// Why the node was skipped.
    pub reason: String,
}

/// Everything the importer skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Skipped nodes, in document order.
    pub dropped: Vec<DroppedItem>,
}

impl ImportReport {
    /// Whether nothing was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }

    pub(crate) fn drop_item(&mut self, id: impl Into<String>, reason: impl Into<String>) {
        let item = DroppedItem {
            id: id.into(),
            reason: reason.into(),
        };
        warn!(id = %item.id, reason = %item.reason, "dropping item on import");
        self.dropped.push(item);
    }
}

/// Definitions recovered from a document, ready to be loaded into a
/// [`SchemaFacade`](crate::SchemaFacade).
#[derive(Debug, Clone, Default)]
pub struct Imported {
    /// Classes with their linked properties.
    pub classes: Vec<ClassDef>,
    /// Properties no class claimed.
    pub properties: Vec<PropertyDef>,
    /// Restrictions no class referenced.
    pub restrictions: Vec<RestrictionDef>,
    /// Instance entries.
    pub entries: Vec<Entry>,
    /// Metadata of the root dataset.
    pub metadata: CrateMetadata,
    /// File entities, with sources relative to the crate directory.
    pub files: Vec<FileEntry>,
    /// The document's parsed context.
    pub context: Context,
    /// Skipped nodes.
    pub report: ImportReport,
}

/// Returns the last segment of an identifier: the part after the last `/`
/// or `#` of an absolute IRI, the part after the last `:` of a compact IRI,
/// or the identifier itself.
#[must_use]
pub fn local_id(iri: &str) -> &str {
    if iri.contains("://") {
        let tail = iri.rsplit('/').next().unwrap_or(iri);
        return tail.rsplit('#').next().unwrap_or(tail);
    }
    match iri.rsplit_once(':') {
        Some((_, local)) => local,
        None => iri,
    }
}

/// Imports a crate metadata document.
///
/// # Errors
///
/// Returns [`CrateError::InvalidDocument`] when the document is not an
/// object or has no `@graph` array. Every other defect is recorded in
/// [`Imported::report`].
pub fn import_document(doc: &Json, config: &CrateConfig) -> Result<Imported> {
    let obj = doc
        .as_object()
        .ok_or_else(|| CrateError::InvalidDocument("top level is not an object".into()))?;
    let graph = obj
        .get("@graph")
        .and_then(Json::as_array)
        .ok_or_else(|| CrateError::InvalidDocument("missing @graph array".into()))?;
    let context = obj.get("@context").map(Context::parse).unwrap_or_default();

    let mut importer = Importer {
        config,
        context: &context,
        report: ImportReport::default(),
    };
    let buckets = importer.bucket(graph);
    debug!(
        classes = buckets.classes.len(),
        properties = buckets.properties.len(),
        restrictions = buckets.restrictions.len(),
        instances = buckets.instances.len(),
        "bucketed graph nodes"
    );

    let properties: IndexMap<String, PropertyDef> = buckets
        .properties
        .iter()
        .map(|n| importer.property(n))
        .map(|p| (p.id.clone(), p))
        .collect();
    let restrictions: IndexMap<String, RestrictionDef> = buckets
        .restrictions
        .iter()
        .filter_map(|n| importer.restriction(n))
        .map(|r| (r.id.clone(), r))
        .collect();
    let mut classes: Vec<ClassDef> = buckets.classes.iter().map(|n| importer.class(n)).collect();

    let mut used_restrictions: HashSet<String> = HashSet::new();
    let mut linked: HashSet<String> = HashSet::new();

    for (class, node) in classes.iter_mut().zip(&buckets.classes) {
        let mut own: Vec<RestrictionDef> = Vec::new();
        for rid in node.refs(OWL_HAS_RESTRICTION, importer.context) {
            let rid = local_id(&rid).to_string();
            let Some(restriction) = restrictions.get(&rid) else {
                continue;
            };
            used_restrictions.insert(rid);
            own.push(restriction.clone());
            let Some(property) = properties.get(&restriction.property) else {
                continue;
            };
            if class.property(&property.id).is_none() {
                let linked_copy = property
                    .clone()
                    .required(restriction.is_required())
                    .multi_valued(restriction.is_multi_valued());
                class.properties.push(linked_copy);
            }
            linked.insert(property.id.clone());
        }
        if !own.is_empty() {
            class.restrictions = Some(own);
        }

        // Domain fallback for properties no class has linked so far.
        for property in properties.values() {
            if linked.contains(&property.id) || class.property(&property.id).is_some() {
                continue;
            }
            if property.domain.iter().any(|d| local_id(d) == class.id) {
                class.properties.push(property.clone().required(false));
                linked.insert(property.id.clone());
            }
        }
    }

    let class_ids: HashSet<String> = classes.iter().map(|c| c.id.clone()).collect();
    for class in &mut classes {
        for property in &mut class.properties {
            externalize_unknown_ranges(property, &class_ids, config);
        }
    }
    let mut standalone_properties: Vec<PropertyDef> = properties
        .into_values()
        .filter(|p| !linked.contains(&p.id))
        .collect();
    for property in &mut standalone_properties {
        externalize_unknown_ranges(property, &class_ids, config);
    }
    let standalone_restrictions: Vec<RestrictionDef> = restrictions
        .into_values()
        .filter(|r| !used_restrictions.contains(&r.id))
        .collect();

    let entries: Vec<Entry> = buckets
        .instances
        .iter()
        .filter_map(|n| importer.entry(n))
        .collect();
    let metadata = buckets
        .root
        .map(CrateMetadata::from_root_node)
        .unwrap_or_default();
    let mut files: Vec<FileEntry> = Vec::with_capacity(buckets.files.len());
    for (id, node) in &buckets.files {
        match FileEntry::from_node(node) {
            Ok(file) => files.push(file),
            Err(reason) => importer.report.drop_item(*id, reason),
        }
    }

    let report = importer.report;
    Ok(Imported {
        classes,
        properties: standalone_properties,
        restrictions: standalone_restrictions,
        entries,
        metadata,
        files,
        context,
        report,
    })
}

/// Class ranges that name no imported class become external URIs.
fn externalize_unknown_ranges(
    property: &mut PropertyDef,
    class_ids: &HashSet<String>,
    config: &CrateConfig,
) {
    for range in &mut property.range {
        if let Range::Class(id) = range {
            if !class_ids.contains(id.as_str()) {
                *range = Range::External(config.node_iri(id));
            }
        }
    }
}

/// A graph node with its keys expanded.
struct Node<'a> {
    id: &'a str,
    types: Vec<String>,
    fields: Vec<(String, &'a str, &'a Json)>,
}

impl<'a> Node<'a> {
    fn get(&self, iri: &str) -> Option<&'a Json> {
        self.fields
            .iter()
            .find(|(expanded, _, _)| expanded == iri)
            .map(|(_, _, v)| *v)
    }

    /// Identifier references under `iri`, expanded.
    fn refs(&self, iri: &str, context: &Context) -> Vec<String> {
        let Some(value) = self.get(iri) else {
            return Vec::new();
        };
        let items: Vec<&Json> = match value {
            Json::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        items
            .into_iter()
            .filter_map(|item| match item {
                Json::String(s) => Some(s.as_str()),
                Json::Object(o) => o.get("@id").and_then(Json::as_str),
                _ => None,
            })
            .map(|s| context.expand(s))
            .collect()
    }

    fn text(&self, iri: &str) -> Option<String> {
        match Value::from_json(self.get(iri)?)? {
            Value::List(items) => items.first().map(Value::lexical),
            v => Some(v.lexical()),
        }
    }

    fn cardinality(&self, iri: &str) -> Option<std::result::Result<u64, String>> {
        let value = self.get(iri)?;
        let parsed = match Value::from_json(value) {
            Some(Value::Integer(i)) => u64::try_from(i).ok(),
            Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
            Some(Value::Float(f)) if f >= 0.0 && f.fract() == 0.0 => Some(f as u64),
            _ => None,
        };
        Some(parsed.ok_or_else(|| format!("invalid cardinality {}", value)))
    }
}

#[derive(Default)]
struct Buckets<'a> {
    root: Option<&'a Map<String, Json>>,
    files: Vec<(&'a str, &'a Map<String, Json>)>,
    classes: Vec<Node<'a>>,
    properties: Vec<Node<'a>>,
    restrictions: Vec<Node<'a>>,
    instances: Vec<Node<'a>>,
}

enum Kind {
    Class,
    Property,
    Restriction,
    Instance,
}

fn classify(types: &[String]) -> Kind {
    let is = |suffix: &str| {
        types
            .iter()
            .any(|t| t.ends_with(&format!("/{}", suffix)) || t.ends_with(&format!("#{}", suffix)))
    };
    if is("Class") {
        Kind::Class
    } else if is("Property") {
        Kind::Property
    } else if is("Restriction") {
        Kind::Restriction
    } else {
        Kind::Instance
    }
}

struct Importer<'c> {
    config: &'c CrateConfig,
    context: &'c Context,
    report: ImportReport,
}

impl<'c> Importer<'c> {
    fn bucket<'a>(&mut self, graph: &'a [Json]) -> Buckets<'a> {
        let mut buckets = Buckets::default();
        for item in graph {
            let Some(obj) = item.as_object() else {
                self.report.drop_item("<anonymous>", "graph item is not an object");
                continue;
            };
            let Some(id) = obj.get("@id").and_then(Json::as_str) else {
                self.report.drop_item("<anonymous>", "missing @id");
                continue;
            };
            if id == ROOT_DATASET_ID {
                buckets.root = Some(obj);
                continue;
            }
            if id == self.config.metadata_file {
                continue;
            }
            let node = self.node(id, obj);
            if node.types.iter().any(|t| t == FILE_TYPE || t == SCHEMA_MEDIA_OBJECT) {
                buckets.files.push((id, obj));
                continue;
            }
            match classify(&node.types) {
                Kind::Class => buckets.classes.push(node),
                Kind::Property => buckets.properties.push(node),
                Kind::Restriction => buckets.restrictions.push(node),
                Kind::Instance => buckets.instances.push(node),
            }
        }
        buckets
    }

    fn node<'a>(&self, id: &'a str, obj: &'a Map<String, Json>) -> Node<'a> {
        let types = match obj.get("@type") {
            Some(Json::String(t)) => vec![self.context.expand(t)],
            Some(Json::Array(ts)) => ts
                .iter()
                .filter_map(Json::as_str)
                .map(|t| self.context.expand(t))
                .collect(),
            _ => Vec::new(),
        };
        let fields = obj
            .iter()
            .filter(|(k, _)| !k.starts_with('@'))
            .map(|(k, v)| (self.context.expand(k), k.as_str(), v))
            .collect();
        Node { id, types, fields }
    }

    /// A reference kept as a local id when it lives under the base
    /// namespace, as an expanded IRI otherwise.
    fn reference(&self, expanded: &str) -> String {
        match self.config.local_id(expanded) {
            Some(local) => local.to_string(),
            None => expanded.to_string(),
        }
    }

    fn range(&self, expanded: &str) -> Range {
        if let Some(literal) = LiteralType::from_iri(expanded) {
            return Range::Literal(literal);
        }
        if let Some(local) = self.config.local_id(expanded) {
            return Range::Class(local.to_string());
        }
        if crate::vocab::has_scheme(expanded) {
            Range::External(expanded.to_string())
        } else {
            Range::Class(expanded.to_string())
        }
    }

    fn property(&self, node: &Node<'_>) -> PropertyDef {
        let mut property = PropertyDef::new(local_id(&self.context.expand(node.id)));
        property.label = node.text(RDFS_LABEL);
        property.comment = node.text(RDFS_COMMENT);
        for d in node.refs(SCHEMA_DOMAIN_INCLUDES, self.context) {
            property.add_domain(self.reference(&d));
        }
        for r in node.refs(SCHEMA_RANGE_INCLUDES, self.context) {
            property = property.with_range(self.range(&r));
        }
        for a in node.refs(OWL_EQUIVALENT_PROPERTY, self.context) {
            property = property.with_alias(a);
        }
        property
    }

    fn restriction(&mut self, node: &Node<'_>) -> Option<RestrictionDef> {
        let id = local_id(&self.context.expand(node.id)).to_string();
        let Some(on) = node.refs(OWL_ON_PROPERTY, self.context).into_iter().next() else {
            self.report.drop_item(id, "restriction without owl:onProperty");
            return None;
        };
        let mut restriction = RestrictionDef::new(id.clone(), local_id(&on));
        for (iri, slot) in [
            (OWL_MIN_CARDINALITY, &mut restriction.min_cardinality),
            (OWL_MAX_CARDINALITY, &mut restriction.max_cardinality),
        ] {
            match node.cardinality(iri) {
                None => {}
                Some(Ok(n)) => *slot = Some(n),
                Some(Err(reason)) => {
                    self.report.drop_item(id, reason);
                    return None;
                }
            }
        }
        if let Err(err) = restriction.validate() {
            self.report.drop_item(id, err.to_string());
            return None;
        }
        Some(restriction)
    }

    fn class(&self, node: &Node<'_>) -> ClassDef {
        let mut class = ClassDef::new(local_id(&self.context.expand(node.id)));
        class.label = node.text(RDFS_LABEL);
        class.comment = node.text(RDFS_COMMENT);
        for parent in node.refs(RDFS_SUBCLASS_OF, self.context) {
            class = class.with_parent(self.reference(&parent));
        }
        if class.parents.is_empty() {
            class = class.with_parent(self.config.default_parent.clone());
        }
        for alias in node.refs(OWL_EQUIVALENT_CLASS, self.context) {
            class = class.with_alias(alias);
        }
        class
    }

    fn entry(&mut self, node: &Node<'_>) -> Option<Entry> {
        let id = local_id(&self.context.expand(node.id)).to_string();
        let Some(class) = node.types.first() else {
            self.report.drop_item(id, "missing @type");
            return None;
        };
        let mut entry = Entry::new(id.clone(), local_id(class));

        for (expanded, raw_key, value) in &node.fields {
            let key = local_id(expanded);
            let identifier_typed = self.context.is_identifier_typed(raw_key);
            let items: Vec<&Json> = match value {
                Json::Array(items) => items.iter().collect(),
                other => vec![*other],
            };
            let mut literals: Vec<Value> = Vec::new();
            let mut targets: Vec<String> = Vec::new();
            for item in items {
                match item {
                    Json::Object(o) if o.contains_key("@id") => {
                        if let Some(target) = o.get("@id").and_then(Json::as_str) {
                            targets.push(local_id(&self.context.expand(target)).to_string());
                        }
                    }
                    Json::String(s) if identifier_typed => {
                        targets.push(local_id(&self.context.expand(s)).to_string());
                    }
                    other => match Value::from_json(other) {
                        Some(v) => literals.push(v),
                        None => warn!(entry = %id, key = %raw_key, "skipping unsupported value"),
                    },
                }
            }
            for target in targets {
                entry.add_reference(key, target);
            }
            match literals.len() {
                0 => {}
                1 => entry.set_property(key, literals.remove(0)),
                _ => entry.set_property(key, Value::List(literals)),
            }
        }
        Some(entry)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn import(doc: Json) -> Imported {
        import_document(&doc, &CrateConfig::default()).unwrap()
    }

    #[test]
    fn local_ids() {
        assert_eq!(local_id("http://example.com/Person"), "Person");
        assert_eq!(local_id("http://www.w3.org/2001/XMLSchema#string"), "string");
        assert_eq!(local_id("base:Person"), "Person");
        assert_eq!(local_id("Person"), "Person");
    }

    #[test]
    fn rejects_documents_without_graph() {
        let config = CrateConfig::default();
        assert!(matches!(
            import_document(&json!([]), &config),
            Err(CrateError::InvalidDocument(_))
        ));
        assert!(matches!(
            import_document(&json!({"@context": []}), &config),
            Err(CrateError::InvalidDocument(_))
        ));
    }

    #[test]
    fn restriction_links_property_as_required() {
        let imported = import(json!({
            "@context": ["https://w3id.org/ro/crate/1.1/context", {"base": "http://example.com/"}],
            "@graph": [
                {"@id": "base:Person", "@type": "rdfs:Class",
                 "owl:restriction": {"@id": "base:Person_name_restriction"}},
                {"@id": "base:Person_name_restriction", "@type": "owl:Restriction",
                 "owl:onProperty": {"@id": "base:name"},
                 "owl:minCardinality": 1, "owl:maxCardinality": 1},
                {"@id": "base:name", "@type": "rdf:Property",
                 "schema:domainIncludes": {"@id": "base:Person"},
                 "schema:rangeIncludes": {"@id": "xsd:string"}}
            ]
        }));
        assert!(imported.report.is_clean());
        assert_eq!(imported.classes.len(), 1);
        let person = &imported.classes[0];
        assert_eq!(person.parents, vec![crate::vocab::SCHEMA_THING.to_string()]);
        let name = person.property("name").unwrap();
        assert_eq!(name.required, Some(true));
        assert!(!name.multi_valued);
        assert_eq!(name.range, vec![Range::Literal(LiteralType::String)]);
        assert!(imported.properties.is_empty());
        assert!(imported.restrictions.is_empty());
    }

    #[test]
    fn domain_fallback_links_optional() {
        let imported = import(json!({
            "@context": {"base": "http://example.com/"},
            "@graph": [
                {"@id": "base:Person", "@type": "rdfs:Class"},
                {"@id": "base:Org", "@type": "rdfs:Class"},
                {"@id": "base:nick", "@type": "rdf:Property",
                 "schema:domainIncludes": [{"@id": "base:Org"}, {"@id": "base:Person"}]}
            ]
        }));
        assert!(imported.classes[0].property("nick").is_some(), "first class in document order wins");
        assert!(imported.classes[1].property("nick").is_none());
        assert_eq!(imported.classes[0].properties[0].required, Some(false));
    }

    #[test]
    fn domain_fallback_runs_before_later_restrictions() {
        let imported = import(json!({
            "@context": {"base": "http://example.com/"},
            "@graph": [
                {"@id": "base:A", "@type": "rdfs:Class"},
                {"@id": "base:B", "@type": "rdfs:Class",
                 "owl:restriction": {"@id": "base:B_p_restriction"}},
                {"@id": "base:B_p_restriction", "@type": "owl:Restriction",
                 "owl:onProperty": {"@id": "base:p"}, "owl:minCardinality": 1},
                {"@id": "base:p", "@type": "rdf:Property",
                 "schema:domainIncludes": [{"@id": "base:A"}, {"@id": "base:B"}]}
            ]
        }));
        assert!(imported.report.is_clean());
        let a = imported.classes[0].property("p").unwrap();
        assert_eq!(a.required, Some(false));
        let b = imported.classes[1].property("p").unwrap();
        assert_eq!(b.required, Some(true));
        assert!(imported.properties.is_empty());
    }

    #[test]
    fn unclaimed_definitions_are_standalone() {
        let imported = import(json!({
            "@graph": [
                {"@id": "http://example.com/orphan", "@type": "rdf:Property"},
                {"@id": "http://example.com/r", "@type": "owl:Restriction",
                 "owl:onProperty": {"@id": "http://example.com/orphan"}}
            ]
        }));
        assert_eq!(imported.properties.len(), 1);
        assert_eq!(imported.restrictions.len(), 1);
        assert_eq!(imported.restrictions[0].property, "orphan");
    }

    #[test]
    fn malformed_nodes_are_reported_not_fatal() {
        let imported = import(json!({
            "@graph": [
                {"@type": "rdfs:Class"},
                42,
                {"@id": "r1", "@type": "owl:Restriction"},
                {"@id": "r2", "@type": "owl:Restriction", "owl:onProperty": {"@id": "p"},
                 "owl:minCardinality": 3, "owl:maxCardinality": 1},
                {"@id": "e1"}
            ]
        }));
        let reasons: Vec<&str> = imported.report.dropped.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(reasons, vec!["<anonymous>", "<anonymous>", "r1", "r2", "e1"]);
    }

    #[test]
    fn structural_nodes_are_skipped() {
        let imported = import(json!({
            "@graph": [
                {"@id": "./", "@type": "Dataset"},
                {"@id": "ro-crate-metadata.json", "@type": "CreativeWork"}
            ]
        }));
        assert!(imported.entries.is_empty());
        assert!(imported.files.is_empty());
        assert_eq!(imported.metadata, CrateMetadata::default());
        assert!(imported.report.is_clean());
    }

    #[test]
    fn root_metadata_and_files_are_read() {
        let imported = import(json!({
            "@graph": [
                {"@id": "./", "@type": "Dataset", "name": "Survey",
                 "license": {"@id": "https://spdx.org/licenses/MIT"},
                 "datePublished": "2024-01-01",
                 "hasPart": [{"@id": "data.csv"}]},
                {"@id": "data.csv", "@type": "File", "name": "Raw data",
                 "encodingFormat": "text/csv"},
                {"@id": "img.png", "@type": ["File", "ImageObject"]},
                {"@id": "../outside.txt", "@type": "File"}
            ]
        }));
        assert_eq!(imported.metadata.name.as_deref(), Some("Survey"));
        assert_eq!(
            imported.metadata.license.as_deref(),
            Some("https://spdx.org/licenses/MIT")
        );
        assert_eq!(imported.metadata.extra["datePublished"], json!("2024-01-01"));
        assert!(!imported.metadata.extra.contains_key("hasPart"));

        let ids: Vec<&str> = imported.files.iter().map(FileEntry::id).collect();
        assert_eq!(ids, vec!["data.csv", "img.png"]);
        assert_eq!(imported.files[0].name(), "Raw data");
        assert_eq!(imported.files[1].encoding_format(), "image/png");
        assert!(imported.entries.is_empty());
        assert_eq!(imported.report.dropped.len(), 1);
        assert_eq!(imported.report.dropped[0].id, "../outside.txt");
    }

    #[test]
    fn entry_values_split_into_literals_and_references() {
        let imported = import(json!({
            "@context": [
                "https://w3id.org/ro/crate/1.1/context",
                {"base": "http://example.com/", "author": {"@id": "base:author", "@type": "@id"}}
            ],
            "@graph": [
                {"@id": "base:b1", "@type": "base:Book",
                 "base:title": "Dune",
                 "base:tags": ["scifi", "classic"],
                 "base:single": ["only"],
                 "author": "base:p1",
                 "base:cites": [{"@id": "base:b2"}, "plain text"]}
            ]
        }));
        let entry = &imported.entries[0];
        assert_eq!(entry.id(), "b1");
        assert_eq!(entry.class_id(), "Book");
        assert_eq!(entry.properties()["title"], Value::from("Dune"));
        assert_eq!(entry.properties()["tags"], Value::from(vec!["scifi", "classic"]));
        assert_eq!(entry.properties()["single"], Value::from("only"));
        assert_eq!(entry.references()["author"], vec!["p1".to_string()]);
        assert_eq!(entry.references()["cites"], vec!["b2".to_string()]);
        assert_eq!(entry.properties()["cites"], Value::from("plain text"));
    }

    #[test]
    fn unknown_class_ranges_become_external() {
        let imported = import(json!({
            "@context": {"base": "http://example.com/"},
            "@graph": [
                {"@id": "base:A", "@type": "rdfs:Class"},
                {"@id": "base:p", "@type": "rdf:Property",
                 "schema:domainIncludes": {"@id": "base:A"},
                 "schema:rangeIncludes": [{"@id": "base:A"}, {"@id": "base:Missing"},
                                          {"@id": "https://schema.org/Text"}]}
            ]
        }));
        let p = imported.classes[0].property("p").unwrap();
        assert_eq!(
            p.range,
            vec![
                Range::Class("A".into()),
                Range::External("http://example.com/Missing".into()),
                Range::External("https://schema.org/Text".into()),
            ]
        );
    }
}
