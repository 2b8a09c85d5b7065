//! Crate-wide settings.

use crate::vocab;

/// Settings shared by the emitter, the context deriver, the importer and
/// the file layout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrateConfig {
    /// Namespace local identifiers are minted under.
    pub base_iri: String,
    /// Prefix bound to [`base_iri`](Self::base_iri) in derived contexts.
    pub base_prefix: String,
    /// First entry of every emitted `@context`.
    pub base_context: String,
    /// Name of the metadata file inside a crate directory.
    pub metadata_file: String,
    /// Minimum number of distinct URIs sharing an unknown namespace before
    /// the deriver mints a prefix for it.
    pub namespace_threshold: usize,
    /// Parent assigned to imported classes that declare none.
    pub default_parent: String,
}

impl Default for CrateConfig {
    fn default() -> Self {
        Self {
            base_iri: "http://example.com/".to_string(),
            base_prefix: "base".to_string(),
            base_context: "https://w3id.org/ro/crate/1.1/context".to_string(),
            metadata_file: "ro-crate-metadata.json".to_string(),
            namespace_threshold: 2,
            default_parent: vocab::SCHEMA_THING.to_string(),
        }
    }
}

impl CrateConfig {
    /// Sets the base namespace.
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = base_iri.into();
        self
    }

    /// Returns the node IRI for `id`. Local identifiers are placed under the
    /// base namespace, `base:` and well-known compact forms are expanded,
    /// other IRIs pass through.
    #[must_use]
    pub fn node_iri(&self, id: &str) -> String {
        if vocab::has_scheme(id) {
            if let Some((prefix, local)) = id.split_once(':') {
                if prefix == self.base_prefix {
                    return format!("{}{}", self.base_iri, local);
                }
                if let Some(ns) = vocab::well_known_namespace(prefix) {
                    return format!("{}{}", ns, local);
                }
            }
            return id.to_string();
        }
        format!("{}{}", self.base_iri, id)
    }

    /// Strips the base namespace from `iri`, if present.
    #[must_use]
    pub fn local_id<'a>(&self, iri: &'a str) -> Option<&'a str> {
        iri.strip_prefix(self.base_iri.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_iris() {
        let config = CrateConfig::default();
        assert_eq!(config.node_iri("Person"), "http://example.com/Person");
        assert_eq!(config.node_iri("base:Person"), "http://example.com/Person");
        assert_eq!(config.node_iri(vocab::SCHEMA_THING), vocab::SCHEMA_THING);
        assert_eq!(config.node_iri("schema:name"), "https://schema.org/name");
        assert_eq!(config.node_iri("urn:uuid:1"), "urn:uuid:1");
        assert_eq!(config.local_id("http://example.com/p1"), Some("p1"));
        assert_eq!(config.local_id("https://schema.org/Thing"), None);
    }
}
