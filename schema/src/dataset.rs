//! Root dataset metadata and file data entities.
//!
//! Neither is part of the schema or instance graph: they are written as
//! plain RO-Crate nodes next to it. The root dataset (`./`) carries the
//! crate's name, description, license and any extra keys, and lists every
//! file under `hasPart`. Each file is a `File` node whose `@id` is its path
//! relative to the crate directory.

use std::path::{Component, Path, PathBuf};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde_json::{json, Map, Value as Json};

use crate::instance::{Value, DATE_TIME_FORMAT};
use crate::introspect::title_case;

/// `@type` of file data entities.
pub const FILE_TYPE: &str = "File";

/// Encoding format used for unknown extensions.
pub const DEFAULT_ENCODING_FORMAT: &str = "application/octet-stream";

const ENCODING_FORMATS: &[(&str, &str)] = &[
    ("csv", "text/csv"),
    ("json", "application/json"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("pdf", "application/pdf"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("xls", "application/vnd.ms-excel"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("xml", "application/xml"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("py", "text/x-python"),
    ("js", "text/javascript"),
    ("css", "text/css"),
    ("zip", "application/zip"),
    ("gz", "application/gzip"),
];

/// Keys of the root dataset node that have dedicated fields.
const ROOT_KEYS: &[&str] = &["@id", "@type", "name", "description", "license", "hasPart"];

/// Keys of a file node that have dedicated fields.
const FILE_KEYS: &[&str] = &[
    "@id",
    "@type",
    "name",
    "description",
    "encodingFormat",
    "dateCreated",
];

/// Encoding format for `path`, from its extension.
#[must_use]
pub fn encoding_format(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_ENCODING_FORMAT;
    };
    let ext = ext.to_ascii_lowercase();
    ENCODING_FORMATS
        .iter()
        .find(|(e, _)| *e == ext)
        .map_or(DEFAULT_ENCODING_FORMAT, |(_, format)| *format)
}

/// Whether `id` is a relative path that stays inside the crate directory.
#[must_use]
pub fn is_contained_path(id: &str) -> bool {
    let path = Path::new(id);
    !id.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Metadata of the root dataset.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrateMetadata {
    /// Crate name.
    pub name: Option<String>,
    /// Crate description.
    pub description: Option<String>,
    /// License identifier or URL.
    pub license: Option<String>,
    /// Any further keys, written as given.
    pub extra: IndexMap<String, Json>,
}

impl CrateMetadata {
    /// Metadata with every field empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the license.
    #[must_use]
    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Adds an extra key. Keys that have a dedicated field, or start with
    /// `@`, are ignored.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Json) -> Self {
        let key = key.into();
        if !key.starts_with('@') && !ROOT_KEYS.contains(&key.as_str()) {
            self.extra.insert(key, value);
        }
        self
    }

    /// The root dataset node `root_id`, listing `files` under `hasPart`.
    #[must_use]
    pub fn to_root_node(&self, root_id: &str, files: &[FileEntry]) -> Json {
        let mut node = Map::new();
        node.insert("@id".into(), json!(root_id));
        node.insert("@type".into(), json!("Dataset"));
        for (key, value) in [
            ("name", &self.name),
            ("description", &self.description),
            ("license", &self.license),
        ] {
            if let Some(value) = value {
                node.insert(key.into(), json!(value));
            }
        }
        for (key, value) in &self.extra {
            node.insert(key.clone(), value.clone());
        }
        if !files.is_empty() {
            let parts: Vec<Json> = files.iter().map(|f| json!({ "@id": f.id() })).collect();
            node.insert("hasPart".into(), Json::Array(parts));
        }
        Json::Object(node)
    }

    /// Reads the root dataset node. `hasPart` is not kept: file nodes are
    /// read on their own.
    #[must_use]
    pub fn from_root_node(node: &Map<String, Json>) -> Self {
        let text = |key: &str| match node.get(key)? {
            Json::String(s) => Some(s.clone()),
            Json::Object(o) => o.get("@id").and_then(Json::as_str).map(str::to_string),
            _ => None,
        };
        let mut metadata = Self {
            name: text("name"),
            description: text("description"),
            license: text("license"),
            extra: IndexMap::new(),
        };
        for (key, value) in node {
            metadata = metadata.with_extra(key.clone(), value.clone());
        }
        metadata
    }
}

/// A file shipped inside the crate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileEntry {
    id: String,
    source: PathBuf,
    name: String,
    description: String,
    encoding_format: String,
    date_created: Option<NaiveDateTime>,
    properties: IndexMap<String, Value>,
}

impl FileEntry {
    /// A file read from `source`, stored in the crate under its file name.
    ///
    /// The name defaults to the title-cased file stem, the description to
    /// `"Data file: <file name>"` and the encoding format to the one of the
    /// extension.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().replace('-', "_"))
            .unwrap_or_default();
        Self {
            name: title_case(&stem),
            description: format!("Data file: {file_name}"),
            encoding_format: encoding_format(&source).to_string(),
            id: file_name,
            source,
            date_created: None,
            properties: IndexMap::new(),
        }
    }

    /// Stores the file under `id`, a path relative to the crate directory.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the encoding format.
    #[must_use]
    pub fn with_encoding_format(mut self, format: impl Into<String>) -> Self {
        self.encoding_format = format.into();
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub fn with_date_created(mut self, date: NaiveDateTime) -> Self {
        self.date_created = Some(date);
        self
    }

    /// Adds a further property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Path inside the crate directory.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Where the file is read from when the crate is written.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Encoding format (MIME type).
    #[must_use]
    pub fn encoding_format(&self) -> &str {
        &self.encoding_format
    }

    /// Creation time, if set.
    #[must_use]
    pub fn date_created(&self) -> Option<NaiveDateTime> {
        self.date_created
    }

    /// Further properties.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    pub(crate) fn set_source(&mut self, source: PathBuf) {
        self.source = source;
    }

    pub(crate) fn stamp_if_unset(&mut self, now: NaiveDateTime) {
        self.date_created.get_or_insert(now);
    }

    /// The `File` node.
    #[must_use]
    pub fn to_node(&self) -> Json {
        let mut node = Map::new();
        node.insert("@id".into(), json!(self.id));
        node.insert("@type".into(), json!(FILE_TYPE));
        node.insert("name".into(), json!(self.name));
        node.insert("description".into(), json!(self.description));
        node.insert("encodingFormat".into(), json!(self.encoding_format));
        if let Some(date) = self.date_created {
            node.insert(
                "dateCreated".into(),
                json!(date.format(DATE_TIME_FORMAT).to_string()),
            );
        }
        for (key, value) in &self.properties {
            node.insert(key.clone(), value.to_json());
        }
        Json::Object(node)
    }

    /// Reads a `File` node. The source is the id itself, relative to
    /// wherever the crate is read from.
    ///
    /// # Errors
    ///
    /// Returns the reason when the node has no `@id` or its id leaves the
    /// crate directory.
    pub fn from_node(node: &Map<String, Json>) -> std::result::Result<Self, String> {
        let id = node
            .get("@id")
            .and_then(Json::as_str)
            .ok_or_else(|| "file without @id".to_string())?;
        if !is_contained_path(id) {
            return Err(format!("file path {id} leaves the crate directory"));
        }
        let mut file = Self::new(id).with_id(id);
        let text = |key: &str| node.get(key).and_then(Json::as_str);
        if let Some(name) = text("name") {
            file.name = name.to_string();
        }
        if let Some(description) = text("description") {
            file.description = description.to_string();
        }
        if let Some(format) = text("encodingFormat") {
            file.encoding_format = format.to_string();
        }
        if let Some(raw) = text("dateCreated") {
            match NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT) {
                Ok(date) => file.date_created = Some(date),
                Err(_) => {
                    file.properties
                        .insert("dateCreated".into(), Value::String(raw.to_string()));
                }
            }
        }
        for (key, value) in node {
            if FILE_KEYS.contains(&key.as_str()) || key.starts_with('@') {
                continue;
            }
            if let Some(value) = Value::from_json(value) {
                file.properties.insert(key.clone(), value);
            }
        }
        Ok(file)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn defaults_come_from_the_path() {
        let file = FileEntry::new("/tmp/data/raw-measurement_results.CSV");
        assert_eq!(file.id(), "raw-measurement_results.CSV");
        assert_eq!(file.name(), "Raw Measurement Results");
        assert_eq!(file.description(), "Data file: raw-measurement_results.CSV");
        assert_eq!(file.encoding_format(), "text/csv");
        assert_eq!(encoding_format(Path::new("notes")), DEFAULT_ENCODING_FORMAT);
    }

    #[test]
    fn file_nodes_read_back() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_micro_opt(9, 30, 0, 250)
            .unwrap();
        let file = FileEntry::new("results.json")
            .with_id("data/results.json")
            .with_name("Results")
            .with_date_created(date)
            .with_property("contentSize", 42);
        let node = file.to_node();
        assert_eq!(node["@type"], FILE_TYPE);
        assert_eq!(node["encodingFormat"], "application/json");

        let back = FileEntry::from_node(node.as_object().unwrap()).unwrap();
        assert_eq!(back.id(), "data/results.json");
        assert_eq!(back.name(), "Results");
        assert_eq!(back.date_created(), Some(date));
        assert_eq!(back.properties()["contentSize"], Value::Integer(42));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        assert!(is_contained_path("data/a.csv"));
        assert!(!is_contained_path("../a.csv"));
        assert!(!is_contained_path("/etc/passwd"));
        assert!(!is_contained_path(""));
        let node = json!({"@id": "../../secret", "@type": "File"});
        assert!(FileEntry::from_node(node.as_object().unwrap()).is_err());
    }

    #[test]
    fn root_node_carries_metadata_and_parts() {
        let metadata = CrateMetadata::new()
            .with_name("Survey")
            .with_license("CC-BY-4.0")
            .with_extra("keywords", json!(["a", "b"]))
            .with_extra("name", json!("ignored"));
        let files = vec![FileEntry::new("a.csv")];
        let node = metadata.to_root_node("./", &files);
        assert_eq!(node["name"], "Survey");
        assert_eq!(node["license"], "CC-BY-4.0");
        assert!(node.get("description").is_none());
        assert_eq!(node["hasPart"], json!([{"@id": "a.csv"}]));

        let back = CrateMetadata::from_root_node(node.as_object().unwrap());
        assert_eq!(back, metadata);
    }
}
