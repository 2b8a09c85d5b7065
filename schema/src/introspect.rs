//! Typed-object bridge.
//!
//! A [`TypeTemplate`] describes a host type field by field and converts into
//! a [`ClassDef`]. The [`Materialize`] trait exposes a typed object's
//! identifier and field values so that [`SchemaFacade::add_object`] can
//! flatten an object graph into entries. In the other direction a
//! [`Skeleton`] describes the typed shape of a class and a [`Record`] is an
//! entry rebuilt as a tree.
//!
//! [`SchemaFacade::add_object`]: crate::SchemaFacade::add_object

use indexmap::IndexMap;

use crate::instance::{InstanceModel, Value};
use crate::model::{ClassDef, LiteralType, PropertyDef, Range, RestrictionDef, Schema};

/// What a field holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueKind {
    /// A literal of the given datatype.
    Literal(LiteralType),
    /// A reference to an instance of the named class.
    Reference(String),
}

impl ValueKind {
    /// The property range this kind maps to.
    #[must_use]
    pub fn range(&self) -> Range {
        match self {
            ValueKind::Literal(t) => Range::Literal(*t),
            ValueKind::Reference(class) => Range::Class(class.clone()),
        }
    }

    fn from_range(range: Option<&Range>) -> Self {
        match range {
            Some(Range::Literal(t)) => ValueKind::Literal(*t),
            Some(Range::Class(id)) => ValueKind::Reference(id.clone()),
            Some(Range::External(_)) | None => ValueKind::Literal(LiteralType::String),
        }
    }
}

/// One field of a [`TypeTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTemplate {
    /// Field name, used as the property id.
    pub name: String,
    /// Value kind.
    pub kind: ValueKind,
    /// Whether a value must be present.
    pub required: bool,
    /// Whether the field holds a list.
    pub list: bool,
    /// Equivalent external property URI.
    pub ontology: Option<String>,
    /// Description.
    pub comment: Option<String>,
}

impl FieldTemplate {
    /// An optional single literal field.
    pub fn literal(name: impl Into<String>, datatype: LiteralType) -> Self {
        Self::new(name, ValueKind::Literal(datatype))
    }

    /// An optional single reference field.
    pub fn reference(name: impl Into<String>, class_id: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Reference(class_id.into()))
    }

    fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            list: false,
            ontology: None,
            comment: None,
        }
    }

    /// Marks the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as a list.
    #[must_use]
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Sets the equivalent external property.
    #[must_use]
    pub fn with_ontology(mut self, uri: impl Into<String>) -> Self {
        self.ontology = Some(uri.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Description of a host type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTemplate {
    /// Class id.
    pub id: String,
    /// Equivalent external class URI.
    pub ontology: Option<String>,
    /// Description.
    pub comment: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldTemplate>,
}

impl TypeTemplate {
    /// A template with no fields.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ontology: None,
            comment: None,
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldTemplate) -> Self {
        self.fields.push(field);
        self
    }

    /// Sets the equivalent external class.
    #[must_use]
    pub fn with_ontology(mut self, uri: impl Into<String>) -> Self {
        self.ontology = Some(uri.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Converts into a class under `parent`, with one property and one
    /// explicit restriction per field.
    #[must_use]
    pub fn to_class(&self, parent: &str) -> ClassDef {
        let mut class = ClassDef::new(self.id.clone())
            .with_label(self.id.clone())
            .with_parent(parent);
        class.comment = self.comment.clone();
        if let Some(ontology) = &self.ontology {
            class = class.with_alias(ontology.clone());
        }
        let mut restrictions = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let mut property = PropertyDef::new(field.name.clone())
                .with_label(title_case(&field.name))
                .with_range(field.kind.range())
                .required(field.required)
                .multi_valued(field.list);
            property.comment = field.comment.clone();
            if let Some(ontology) = &field.ontology {
                property = property.with_alias(ontology.clone());
            }
            restrictions.push(
                RestrictionDef::for_class(&self.id, field.name.clone())
                    .with_min(u64::from(field.required))
                    .with_max(if field.list { None } else { Some(1) }),
            );
            class = class.with_property(property);
        }
        class.restrictions = Some(restrictions);
        class
    }
}

/// `"first_name"` to `"First Name"`.
pub(crate) fn title_case(name: &str) -> String {
    name.split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A field value handed out by [`Materialize::field_values`].
pub enum FieldValue<'a> {
    /// A literal.
    Literal(Value),
    /// A single nested object.
    Object(&'a dyn Materialize),
    /// Several nested objects.
    Objects(Vec<&'a dyn Materialize>),
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            FieldValue::Object(o) => f.debug_tuple("Object").field(&o.type_template().id).finish(),
            FieldValue::Objects(os) => f.debug_tuple("Objects").field(&os.len()).finish(),
        }
    }
}

/// A typed object that can be flattened into entries.
pub trait Materialize {
    /// The object's type description.
    fn type_template(&self) -> TypeTemplate;

    /// The object's identifier, if it has one. Objects without one are
    /// stored under a placeholder id.
    fn instance_id(&self) -> Option<String> {
        None
    }

    /// Field values in declaration order. Absent optional fields are
    /// omitted.
    fn field_values(&self) -> Vec<(String, FieldValue<'_>)>;
}

/// One field of a [`Skeleton`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkeletonField {
    /// Property id.
    pub name: String,
    /// Value kind, from the first range entry.
    pub kind: ValueKind,
    /// Whether the governing restriction requires a value.
    pub required: bool,
    /// Whether the governing restriction admits several values.
    pub list: bool,
    /// Description.
    pub comment: Option<String>,
}

/// The typed shape of a class, owned and inherited fields included.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skeleton {
    /// Class id.
    pub class_id: String,
    /// Class description.
    pub comment: Option<String>,
    /// Fields, nearest class first.
    pub fields: Vec<SkeletonField>,
}

impl Skeleton {
    /// Builds the skeleton of `class_id`, or `None` if no such class exists.
    #[must_use]
    pub fn build(schema: &Schema, class_id: &str) -> Option<Self> {
        let class = schema.class(class_id)?;
        let fields = schema
            .all_properties(class_id)
            .into_iter()
            .map(|p| {
                let restriction = schema.restriction_for(class_id, &p.id);
                SkeletonField {
                    name: p.id.clone(),
                    kind: ValueKind::from_range(p.range.first()),
                    required: restriction
                        .as_ref()
                        .map_or(p.required == Some(true), RestrictionDef::is_required),
                    list: restriction
                        .as_ref()
                        .map_or(p.multi_valued, RestrictionDef::is_multi_valued),
                    comment: p.comment.clone(),
                }
            })
            .collect();
        Some(Self {
            class_id: class.id.clone(),
            comment: class.comment.clone(),
            fields,
        })
    }

    /// Looks up a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SkeletonField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A value inside a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A literal.
    Literal(Value),
    /// A nested record.
    Record(Box<Record>),
    /// A target that is missing or already being rebuilt higher up.
    Reference(String),
    /// Several values under one key.
    List(Vec<RecordValue>),
}

/// An entry rebuilt as a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Entry id.
    pub id: String,
    /// Class id.
    pub class_id: String,
    /// Field values: literals first, then references.
    pub fields: IndexMap<String, RecordValue>,
}

impl Record {
    /// Field lookup.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RecordValue> {
        self.fields.get(name)
    }
}

/// Rebuilds `entry_id` as a [`Record`] tree. Cycles stop at the first
/// repeated id on the current path.
#[must_use]
pub fn materialize(instances: &InstanceModel, entry_id: &str) -> Option<Record> {
    let mut path: Vec<String> = Vec::new();
    build_record(instances, entry_id, &mut path)
}

fn build_record(instances: &InstanceModel, id: &str, path: &mut Vec<String>) -> Option<Record> {
    let entry = instances.entry(id)?;
    path.push(id.to_string());

    let mut fields: IndexMap<String, RecordValue> = entry
        .properties()
        .iter()
        .map(|(k, v)| (k.clone(), RecordValue::Literal(v.clone())))
        .collect();

    for (key, targets) in entry.references() {
        let mut values: Vec<RecordValue> = targets
            .iter()
            .map(|target| {
                if path.contains(target) {
                    return RecordValue::Reference(target.clone());
                }
                build_record(instances, target, path).map_or_else(
                    || RecordValue::Reference(target.clone()),
                    |r| RecordValue::Record(Box::new(r)),
                )
            })
            .collect();
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            RecordValue::List(values)
        };
        match fields.shift_remove(key) {
            Some(RecordValue::List(mut items)) => {
                items.push(value);
                fields.insert(key.clone(), RecordValue::List(items));
            }
            Some(existing) => {
                fields.insert(key.clone(), RecordValue::List(vec![existing, value]));
            }
            None => {
                fields.insert(key.clone(), value);
            }
        }
    }

    path.pop();
    Some(Record {
        id: entry.id().to_string(),
        class_id: entry.class_id().to_string(),
        fields,
    })
}
