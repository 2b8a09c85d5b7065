//! Schema model types.
//!
//! A [`Schema`] owns the class, property and restriction definitions of one
//! crate. Cross-references between definitions are plain identifier strings
//! and are resolved lazily through the [`Registry`](crate::registry::Registry),
//! so a property may name a class that is added later.

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::vocab;

/// Literal datatypes a property range may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralType {
    /// `xsd:boolean`
    Boolean,
    /// `xsd:integer`
    Integer,
    /// `xsd:double`
    Double,
    /// `xsd:decimal`
    Decimal,
    /// `xsd:float`
    Float,
    /// `xsd:date`
    Date,
    /// `xsd:dateTime`
    DateTime,
    /// `xsd:time`
    Time,
    /// `xsd:string`
    String,
    /// `xsd:base64Binary`
    Base64Binary,
    /// `rdf:XMLLiteral`
    XmlLiteral,
}

impl LiteralType {
    /// Every literal type, in declaration order.
    pub const ALL: [LiteralType; 11] = [
        LiteralType::Boolean,
        LiteralType::Integer,
        LiteralType::Double,
        LiteralType::Decimal,
        LiteralType::Float,
        LiteralType::Date,
        LiteralType::DateTime,
        LiteralType::Time,
        LiteralType::String,
        LiteralType::Base64Binary,
        LiteralType::XmlLiteral,
    ];

    /// Returns the compact `prefix:local` form (e.g. `"xsd:string"`).
    #[must_use]
    pub fn compact(self) -> &'static str {
        match self {
            LiteralType::Boolean => "xsd:boolean",
            LiteralType::Integer => "xsd:integer",
            LiteralType::Double => "xsd:double",
            LiteralType::Decimal => "xsd:decimal",
            LiteralType::Float => "xsd:float",
            LiteralType::Date => "xsd:date",
            LiteralType::DateTime => "xsd:dateTime",
            LiteralType::Time => "xsd:time",
            LiteralType::String => "xsd:string",
            LiteralType::Base64Binary => "xsd:base64Binary",
            LiteralType::XmlLiteral => "rdf:XMLLiteral",
        }
    }

    /// Returns the full datatype IRI.
    #[must_use]
    pub fn iri(self) -> String {
        let compact = self.compact();
        match compact.split_once(':') {
            Some(("rdf", local)) => format!("{}{}", vocab::RDF, local),
            Some((_, local)) => format!("{}{}", vocab::XSD, local),
            None => compact.to_string(),
        }
    }

    /// Recognizes a datatype given either its compact or its full IRI form.
    #[must_use]
    pub fn from_iri(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.compact() == s || t.iri() == s)
    }
}

/// One admissible value type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Range {
    /// A literal datatype.
    Literal(LiteralType),
    /// The local identifier of a class in this schema.
    Class(String),
    /// An opaque URI outside the schema (e.g. `https://schema.org/Text`).
    External(String),
}

impl Range {
    /// Parses a range token.
    ///
    /// Datatype IRIs (compact or full) become [`Range::Literal`], `base:`
    /// prefixed and bare names become [`Range::Class`], anything else that
    /// carries a scheme is kept as [`Range::External`].
    #[must_use]
    pub fn parse(token: &str) -> Self {
        if let Some(literal) = LiteralType::from_iri(token) {
            return Range::Literal(literal);
        }
        if let Some(local) = token.strip_prefix("base:") {
            return Range::Class(local.to_string());
        }
        if vocab::has_scheme(token) {
            Range::External(token.to_string())
        } else {
            Range::Class(token.to_string())
        }
    }

    /// Returns the class identifier if this range names a schema class.
    #[must_use]
    pub fn class_id(&self) -> Option<&str> {
        match self {
            Range::Class(id) => Some(id),
            _ => None,
        }
    }
}

impl From<LiteralType> for Range {
    fn from(t: LiteralType) -> Self {
        Range::Literal(t)
    }
}

impl From<&str> for Range {
    fn from(s: &str) -> Self {
        Range::parse(s)
    }
}

/// A property definition.
///
/// The domain of a class-owned property is filled in when the property is
/// attached to its class.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyDef {
    /// Local identifier.
    pub id: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Description.
    pub comment: Option<String>,
    /// Class identifiers or URIs this property applies to.
    pub domain: Vec<String>,
    /// Admissible value types.
    pub range: Vec<Range>,
    /// `Some(true)` if every instance of the owning class must carry a value.
    pub required: Option<bool>,
    /// Whether more than one value is admissible.
    pub multi_valued: bool,
    /// External ontology URIs this property is equivalent to.
    pub ontology_aliases: Vec<String>,
}

impl PropertyDef {
    /// Creates an optional, single-valued property with no range.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            comment: None,
            domain: Vec::new(),
            range: Vec::new(),
            required: None,
            multi_valued: false,
            ontology_aliases: Vec::new(),
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Appends a range entry.
    #[must_use]
    pub fn with_range(mut self, range: impl Into<Range>) -> Self {
        let range = range.into();
        if !self.range.contains(&range) {
            self.range.push(range);
        }
        self
    }

    /// Appends a domain entry.
    #[must_use]
    pub fn with_domain(mut self, class_id: impl Into<String>) -> Self {
        self.add_domain(class_id);
        self
    }

    /// Marks the property required or optional.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Marks the property as admitting several values.
    #[must_use]
    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }

    /// Appends an equivalent external property URI.
    #[must_use]
    pub fn with_alias(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        if !self.ontology_aliases.contains(&uri) {
            self.ontology_aliases.push(uri);
        }
        self
    }

    /// Adds `class_id` to the domain unless already present.
    pub fn add_domain(&mut self, class_id: impl Into<String>) {
        let class_id = class_id.into();
        if !self.domain.contains(&class_id) {
            self.domain.push(class_id);
        }
    }

    /// Minimum cardinality implied by the required flag.
    #[must_use]
    pub fn min_cardinality(&self) -> u64 {
        u64::from(self.required == Some(true))
    }

    /// Maximum cardinality implied by the multi-valued flag.
    #[must_use]
    pub fn max_cardinality(&self) -> Option<u64> {
        if self.multi_valued {
            None
        } else {
            Some(1)
        }
    }
}

/// A cardinality restriction on one property.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RestrictionDef {
    /// Local identifier.
    pub id: String,
    /// Identifier of the restricted property.
    pub property: String,
    /// Lower bound, if stated.
    pub min_cardinality: Option<u64>,
    /// Upper bound, if stated. `None` means unbounded.
    pub max_cardinality: Option<u64>,
}

impl RestrictionDef {
    /// Creates a restriction with no bounds.
    pub fn new(id: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            property: property.into(),
            min_cardinality: None,
            max_cardinality: None,
        }
    }

    /// Creates a restriction whose identifier is derived from the owning
    /// class and the restricted property.
    pub fn for_class(class_id: &str, property: impl Into<String>) -> Self {
        let property = property.into();
        Self::new(Self::derived_id(class_id, &property), property)
    }

    /// Returns `"{class}_{property}_restriction"`.
    #[must_use]
    pub fn derived_id(class_id: &str, property_id: &str) -> String {
        format!("{}_{}_restriction", class_id, property_id)
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn with_min(mut self, min: u64) -> Self {
        self.min_cardinality = Some(min);
        self
    }

    /// Sets the upper bound. `None` means unbounded.
    #[must_use]
    pub fn with_max(mut self, max: Option<u64>) -> Self {
        self.max_cardinality = max;
        self
    }

    /// Whether the restriction makes its property required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.min_cardinality.is_some_and(|m| m > 0)
    }

    /// Whether the restriction admits more than one value.
    #[must_use]
    pub fn is_multi_valued(&self) -> bool {
        self.max_cardinality.map_or(true, |m| m > 1)
    }

    /// Checks that `min <= max` when both bounds are stated.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidCardinality`] when the bounds cross.
    pub fn validate(&self) -> Result<(), SchemaError> {
        match (self.min_cardinality, self.max_cardinality) {
            (Some(min), Some(max)) if min > max => Err(SchemaError::InvalidCardinality {
                restriction: self.id.clone(),
                min,
                max,
            }),
            _ => Ok(()),
        }
    }
}

/// A class definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassDef {
    /// Local identifier.
    pub id: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Description.
    pub comment: Option<String>,
    /// Parent class identifiers or URIs (`rdfs:subClassOf`).
    pub parents: Vec<String>,
    /// External ontology URIs this class is equivalent to.
    pub ontology_aliases: Vec<String>,
    /// Properties owned by this class, in declaration order.
    pub properties: Vec<PropertyDef>,
    /// Explicit restrictions. When `None`, restrictions are derived from
    /// the owned properties.
    pub restrictions: Option<Vec<RestrictionDef>>,
}

impl ClassDef {
    /// Creates a class with no parents and no properties.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            comment: None,
            parents: Vec::new(),
            ontology_aliases: Vec::new(),
            properties: Vec::new(),
            restrictions: None,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Appends a parent class.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        if !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
        self
    }

    /// Appends an equivalent external class URI.
    #[must_use]
    pub fn with_alias(mut self, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        if !self.ontology_aliases.contains(&uri) {
            self.ontology_aliases.push(uri);
        }
        self
    }

    /// Attaches a property. A property with the same id replaces the
    /// earlier one.
    #[must_use]
    pub fn with_property(mut self, property: PropertyDef) -> Self {
        if let Some(slot) = self.properties.iter_mut().find(|p| p.id == property.id) {
            *slot = property;
        } else {
            self.properties.push(property);
        }
        self
    }

    /// Adds an explicit restriction.
    #[must_use]
    pub fn with_restriction(mut self, restriction: RestrictionDef) -> Self {
        self.restrictions.get_or_insert_with(Vec::new).push(restriction);
        self
    }

    /// Looks up an owned property.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.id == id)
    }

    /// Returns the restrictions that apply to this class.
    ///
    /// Explicit restrictions are returned as stored. Otherwise one
    /// restriction per owned property is derived: minimum 1 if the property
    /// is required else 0, maximum unbounded if multi-valued else 1.
    #[must_use]
    pub fn effective_restrictions(&self) -> Vec<RestrictionDef> {
        match &self.restrictions {
            Some(explicit) => explicit.clone(),
            None => self
                .properties
                .iter()
                .map(|p| {
                    RestrictionDef::for_class(&self.id, p.id.clone())
                        .with_min(p.min_cardinality())
                        .with_max(p.max_cardinality())
                })
                .collect(),
        }
    }

    /// Returns the restriction governing `property_id`, explicit or derived.
    #[must_use]
    pub fn restriction_for(&self, property_id: &str) -> Option<RestrictionDef> {
        self.effective_restrictions()
            .into_iter()
            .find(|r| r.property == property_id)
    }
}

/// The schema layer of a crate: classes plus standalone properties and
/// restrictions, each kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    pub(crate) classes: IndexMap<String, ClassDef>,
    pub(crate) properties: IndexMap<String, PropertyDef>,
    pub(crate) restrictions: IndexMap<String, RestrictionDef>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a class.
    #[must_use]
    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.classes.get(id)
    }

    /// Iterates classes in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.classes.values()
    }

    /// Looks up a standalone property.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&PropertyDef> {
        self.properties.get(id)
    }

    /// Iterates standalone properties in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDef> {
        self.properties.values()
    }

    /// Looks up a standalone restriction.
    #[must_use]
    pub fn restriction(&self, id: &str) -> Option<&RestrictionDef> {
        self.restrictions.get(id)
    }

    /// Iterates standalone restrictions in insertion order.
    pub fn restrictions(&self) -> impl Iterator<Item = &RestrictionDef> {
        self.restrictions.values()
    }

    /// Returns `class_id` followed by its schema ancestors, breadth first.
    ///
    /// Parents that are not classes of this schema (external URIs) are
    /// skipped. Cyclic parent chains terminate.
    #[must_use]
    pub fn lineage(&self, class_id: &str) -> Vec<&ClassDef> {
        let mut out: Vec<&ClassDef> = Vec::new();
        let mut queue = std::collections::VecDeque::from([class_id]);
        while let Some(id) = queue.pop_front() {
            let Some(class) = self.classes.get(id) else {
                continue;
            };
            if out.iter().any(|c| c.id == class.id) {
                continue;
            }
            out.push(class);
            queue.extend(class.parents.iter().map(String::as_str));
        }
        out
    }

    /// Returns the properties owned by `class_id` or inherited from its
    /// schema ancestors. A nearer definition shadows an inherited one.
    #[must_use]
    pub fn all_properties(&self, class_id: &str) -> Vec<&PropertyDef> {
        let mut out: Vec<&PropertyDef> = Vec::new();
        for class in self.lineage(class_id) {
            for property in &class.properties {
                if !out.iter().any(|p| p.id == property.id) {
                    out.push(property);
                }
            }
        }
        out
    }

    /// Returns the restriction governing `property_id` on `class_id`,
    /// searching the class and then its ancestors.
    #[must_use]
    pub fn restriction_for(&self, class_id: &str, property_id: &str) -> Option<RestrictionDef> {
        self.lineage(class_id)
            .into_iter()
            .find_map(|c| c.restriction_for(property_id))
    }
}
