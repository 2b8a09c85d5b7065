//! JSON-LD context handling: prefix tables, compaction and expansion.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::vocab;

/// A parsed or derived `@context`.
///
/// Holds the remote base context identifier, the prefix table and any term
/// definitions (objects such as `{"@type": "@id"}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    base: Option<String>,
    prefixes: IndexMap<String, String>,
    terms: IndexMap<String, Value>,
}

impl Context {
    /// Creates a context whose first entry is `base`.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: Some(base.into()),
            ..Self::default()
        }
    }

    /// Parses a `@context` value.
    ///
    /// Accepts a string, an object, or an array mixing both. Strings name
    /// remote contexts (the first is kept, none are fetched); within
    /// objects, string values bind prefixes and object values define terms.
    /// Anything else is ignored.
    #[must_use]
    pub fn parse(value: &Value) -> Self {
        let mut ctx = Self::default();
        ctx.merge(value);
        ctx
    }

    fn merge(&mut self, value: &Value) {
        match value {
            Value::String(s) => {
                if self.base.is_none() {
                    self.base = Some(s.clone());
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.merge(item);
                }
            }
            Value::Object(map) => {
                for (key, val) in map {
                    if key.starts_with('@') {
                        continue;
                    }
                    match val {
                        Value::String(ns) => {
                            self.prefixes.insert(key.clone(), ns.clone());
                        }
                        Value::Object(_) => {
                            self.terms.insert(key.clone(), val.clone());
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    /// Remote base context identifier.
    #[must_use]
    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Prefix table, in insertion order.
    #[must_use]
    pub fn prefixes(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }

    /// Namespace bound to `prefix`.
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Binds `prefix` to `namespace`.
    pub fn insert_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Adds a term definition.
    pub fn insert_term(&mut self, term: impl Into<String>, definition: Value) {
        self.terms.insert(term.into(), definition);
    }

    /// Expands a compact IRI or defined term.
    ///
    /// Absolute IRIs pass through. Unknown prefixes fall back to the
    /// well-known table; terms that still cannot be expanded are returned
    /// unchanged.
    #[must_use]
    pub fn expand(&self, term: &str) -> String {
        if term.contains("://") {
            return term.to_string();
        }
        match self.terms.get(term).and_then(|d| d.get("@id")).and_then(Value::as_str) {
            Some(id) if id.contains("://") => id.to_string(),
            Some(id) => self.expand_prefixed(id),
            None => self.expand_prefixed(term),
        }
    }

    /// Term definitions are not followed here, so chained definitions cannot
    /// recurse.
    fn expand_prefixed(&self, term: &str) -> String {
        let Some((prefix, local)) = term.split_once(':') else {
            return term.to_string();
        };
        let namespace = self
            .prefixes
            .get(prefix)
            .map(String::as_str)
            .or_else(|| vocab::well_known_namespace(prefix));
        match namespace {
            Some(ns) => format!("{}{}", with_separator(ns), local),
            None => term.to_string(),
        }
    }

    /// Compacts `iri` against the longest matching namespace in the prefix
    /// table, or returns it unchanged.
    #[must_use]
    pub fn compact(&self, iri: &str) -> String {
        let best = self
            .prefixes
            .iter()
            .filter(|(_, ns)| iri.len() > ns.len() && iri.starts_with(ns.as_str()))
            .max_by_key(|(_, ns)| ns.len());
        match best {
            Some((prefix, ns)) => format!("{}:{}", prefix, &iri[ns.len()..]),
            None => iri.to_string(),
        }
    }

    /// Whether `key` is defined as identifier-typed (`"@type": "@id"`).
    #[must_use]
    pub fn is_identifier_typed(&self, key: &str) -> bool {
        let expanded = self.expand(key);
        self.terms.iter().any(|(term, def)| {
            def.get("@type").and_then(Value::as_str) == Some("@id")
                && (term == key || self.expand(term) == expanded)
        })
    }

    /// Serializes to the `@context` array form: the base identifier, then
    /// one object holding prefixes and term definitions if there are any.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut layers: Vec<Value> = Vec::new();
        if let Some(base) = &self.base {
            layers.push(Value::String(base.clone()));
        }
        if !self.prefixes.is_empty() || !self.terms.is_empty() {
            let mut obj = Map::new();
            for (prefix, ns) in &self.prefixes {
                obj.insert(prefix.clone(), Value::String(ns.clone()));
            }
            for (term, def) in &self.terms {
                obj.insert(term.clone(), def.clone());
            }
            layers.push(Value::Object(obj));
        }
        Value::Array(layers)
    }
}

/// Appends `/` to namespaces that end in neither `/` nor `#`.
fn with_separator(ns: &str) -> String {
    if ns.ends_with('/') || ns.ends_with('#') {
        ns.to_string()
    } else {
        format!("{}/", ns)
    }
}
