//! Instance model: entries, their literal values and their references.
//!
//! Reconciliation of placeholder entries lives in
//! [`reconcile`](crate::reconcile).

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde_json::Value as Json;

/// Lexical format used for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Lexical format used for date-times.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A literal property value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Text.
    String(String),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time without zone.
    DateTime(NaiveDateTime),
    /// Several literals under one key.
    List(Vec<Value>),
}

impl Value {
    /// Returns the lexical form. Dates use [`DATE_FORMAT`] and date-times
    /// [`DATE_TIME_FORMAT`]; lists join their items with `,`.
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format(DATE_FORMAT).to_string(),
            Value::DateTime(dt) => dt.format(DATE_TIME_FORMAT).to_string(),
            Value::List(items) => items
                .iter()
                .map(Value::lexical)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Converts to the JSON form written into graph documents.
    #[must_use]
    pub fn to_json(&self) -> Json {
        match self {
            Value::String(s) => Json::String(s.clone()),
            Value::Integer(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map_or_else(|| Json::String(f.to_string()), Json::Number),
            Value::Boolean(b) => Json::Bool(*b),
            Value::Date(_) | Value::DateTime(_) => Json::String(self.lexical()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
        }
    }

    /// Reads a JSON literal. Value objects (`{"@value": ...}`) are unwrapped;
    /// `null`, nested node objects and empty arrays yield `None`.
    ///
    /// Dates come back as [`Value::String`]: their datatype is not carried in
    /// the document.
    #[must_use]
    pub fn from_json(json: &Json) -> Option<Self> {
        match json {
            Json::String(s) => Some(Value::String(s.clone())),
            Json::Bool(b) => Some(Value::Boolean(*b)),
            Json::Number(n) => n
                .as_i64()
                .map(Value::Integer)
                .or_else(|| n.as_f64().map(Value::Float)),
            Json::Array(items) => {
                let values: Vec<Value> = items.iter().filter_map(Value::from_json).collect();
                match values.len() {
                    0 => None,
                    1 => values.into_iter().next(),
                    _ => Some(Value::List(values)),
                }
            }
            Json::Object(obj) => obj.get("@value").and_then(Value::from_json),
            Json::Null => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// An instance of a schema class.
///
/// Fields are private; an entry changes only through its setters and
/// through reconciliation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    id: String,
    class_id: String,
    properties: IndexMap<String, Value>,
    references: IndexMap<String, Vec<String>>,
    placeholder: bool,
}

impl Entry {
    /// Creates an entry with no values.
    pub fn new(id: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class_id: class_id.into(),
            properties: IndexMap::new(),
            references: IndexMap::new(),
            placeholder: false,
        }
    }

    /// Marks this entry as a synthetic stand-in for an object whose
    /// identifier was not yet known.
    #[must_use]
    pub fn into_placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    /// Sets a literal value.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(key, value);
        self
    }

    /// Appends a reference target.
    #[must_use]
    pub fn with_reference(mut self, key: impl Into<String>, target: impl Into<String>) -> Self {
        self.add_reference(key, target);
        self
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier of the class this entry instantiates.
    #[must_use]
    pub fn class_id(&self) -> &str {
        &self.class_id
    }

    /// Literal values, in insertion order.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, Value> {
        &self.properties
    }

    /// Reference targets per key, in insertion order.
    #[must_use]
    pub fn references(&self) -> &IndexMap<String, Vec<String>> {
        &self.references
    }

    /// Whether this entry is a synthetic placeholder.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Sets a literal value, replacing any earlier one.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Removes a literal value.
    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.shift_remove(key)
    }

    /// Appends a reference target unless it is already listed.
    pub fn add_reference(&mut self, key: impl Into<String>, target: impl Into<String>) {
        let target = target.into();
        let targets = self.references.entry(key.into()).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    /// Replaces the targets of one reference key.
    pub fn set_references(&mut self, key: impl Into<String>, targets: Vec<String>) {
        self.references.insert(key.into(), targets);
    }

    /// Rewrites every reference to `old` into `new`, dropping duplicates
    /// that the rewrite produces. Returns the number of rewritten targets.
    pub(crate) fn rewrite_reference(&mut self, old: &str, new: &str) -> usize {
        let mut rewritten = 0;
        for targets in self.references.values_mut() {
            if !targets.iter().any(|t| t == old) {
                continue;
            }
            let mut next: Vec<String> = Vec::with_capacity(targets.len());
            for target in targets.drain(..) {
                let target = if target == old {
                    rewritten += 1;
                    new.to_string()
                } else {
                    target
                };
                if !next.contains(&target) {
                    next.push(target);
                }
            }
            *targets = next;
        }
        rewritten
    }
}

/// Returns the identifier minted for a placeholder of `class_id` carrying
/// `properties`: `"{class}_placeholder_{hash}"` with the class in lower case
/// and the first 16 hex digits of a BLAKE3 digest over the sorted values.
#[must_use]
pub fn placeholder_id(class_id: &str, properties: &IndexMap<String, Value>) -> String {
    let mut keys: Vec<&String> = properties.keys().collect();
    keys.sort();
    let mut hasher = blake3::Hasher::new();
    hasher.update(class_id.as_bytes());
    for key in keys {
        hasher.update(b"\n");
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        if let Some(value) = properties.get(key) {
            hasher.update(value.lexical().as_bytes());
        }
    }
    let hex = hasher.finalize().to_hex();
    format!(
        "{}_placeholder_{}",
        class_id.to_lowercase(),
        &hex.as_str()[..16]
    )
}

/// The instance layer of a crate: entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceModel {
    pub(crate) entries: Vec<Entry>,
}

impl InstanceModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entry.
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the model holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds an entry of `class_id` whose literal values equal `properties`.
    #[must_use]
    pub fn find_by_values(
        &self,
        class_id: &str,
        properties: &IndexMap<String, Value>,
    ) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| e.class_id == class_id && &e.properties == properties)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dates_use_iso_lexical_forms() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::from(d).lexical(), "2024-03-09");
        let dt = d.and_hms_opt(8, 5, 0).unwrap();
        assert_eq!(Value::from(dt).lexical(), "2024-03-09T08:05:00");
        assert_eq!(Value::from(dt).to_json(), Json::String("2024-03-09T08:05:00".into()));
    }

    #[test]
    fn json_literals() {
        assert_eq!(Value::from_json(&serde_json::json!(3)), Some(Value::Integer(3)));
        assert_eq!(Value::from_json(&serde_json::json!(2.5)), Some(Value::Float(2.5)));
        assert_eq!(
            Value::from_json(&serde_json::json!({"@value": "x"})),
            Some(Value::String("x".into()))
        );
        assert_eq!(Value::from_json(&serde_json::json!(["only"])), Some(Value::from("only")));
        assert_eq!(
            Value::from_json(&serde_json::json!(["a", "b"])),
            Some(Value::from(vec!["a", "b"]))
        );
        assert_eq!(Value::from_json(&Json::Null), None);
    }

    #[test]
    fn rewrite_deduplicates() {
        let mut e = Entry::new("a", "Person")
            .with_reference("knows", "ph")
            .with_reference("knows", "b");
        let n = e.rewrite_reference("ph", "b");
        assert_eq!(n, 1);
        assert_eq!(e.references()["knows"], vec!["b".to_string()]);
    }

    #[test]
    fn placeholder_ids_are_stable_and_value_sensitive() {
        let mut props = IndexMap::new();
        props.insert("name".to_string(), Value::from("Ann"));
        props.insert("age".to_string(), Value::from(30));
        let a = placeholder_id("Person", &props);
        assert!(a.starts_with("person_placeholder_"), "unexpected id {}", a);
        assert_eq!(a.len(), "person_placeholder_".len() + 16);

        let mut reordered = IndexMap::new();
        reordered.insert("age".to_string(), Value::from(30));
        reordered.insert("name".to_string(), Value::from("Ann"));
        assert_eq!(a, placeholder_id("Person", &reordered));

        props.insert("age".to_string(), Value::from(31));
        assert_ne!(a, placeholder_id("Person", &props));
    }
}
