//! RDF terms, triples and graphs.
//!
//! Subjects and predicates are always absolute IRIs. Objects are either an
//! IRI or a literal.

use crate::instance::Value;
use crate::model::LiteralType;

/// A literal object.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `xsd:string`
    String(String),
    /// `xsd:integer`
    Integer(i64),
    /// `xsd:double`
    Double(f64),
    /// `xsd:boolean`
    Boolean(bool),
    /// Any other datatype, kept in lexical form.
    Typed {
        /// Lexical form.
        lexical: String,
        /// Datatype.
        datatype: LiteralType,
    },
}

impl Literal {
    /// Lexical form.
    #[must_use]
    pub fn lexical(&self) -> String {
        match self {
            Literal::String(s) => s.clone(),
            Literal::Integer(i) => i.to_string(),
            Literal::Double(d) => d.to_string(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Typed { lexical, .. } => lexical.clone(),
        }
    }

    /// Datatype.
    #[must_use]
    pub fn datatype(&self) -> LiteralType {
        match self {
            Literal::String(_) => LiteralType::String,
            Literal::Integer(_) => LiteralType::Integer,
            Literal::Double(_) => LiteralType::Double,
            Literal::Boolean(_) => LiteralType::Boolean,
            Literal::Typed { datatype, .. } => *datatype,
        }
    }

    /// Converts an instance value into one literal per item.
    #[must_use]
    pub fn from_value(value: &Value) -> Vec<Literal> {
        match value {
            Value::String(s) => vec![Literal::String(s.clone())],
            Value::Integer(i) => vec![Literal::Integer(*i)],
            Value::Float(f) => vec![Literal::Double(*f)],
            Value::Boolean(b) => vec![Literal::Boolean(*b)],
            Value::Date(_) => vec![Literal::Typed {
                lexical: value.lexical(),
                datatype: LiteralType::Date,
            }],
            Value::DateTime(_) => vec![Literal::Typed {
                lexical: value.lexical(),
                datatype: LiteralType::DateTime,
            }],
            Value::List(items) => items.iter().flat_map(Literal::from_value).collect(),
        }
    }

    /// JSON form used in graph documents. Typed literals lose their
    /// datatype and become strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Literal::String(s) => serde_json::Value::String(s.clone()),
            Literal::Integer(i) => serde_json::Value::from(*i),
            Literal::Double(d) => serde_json::Number::from_f64(*d)
                .map_or_else(|| serde_json::Value::String(d.to_string()), serde_json::Value::Number),
            Literal::Boolean(b) => serde_json::Value::Bool(*b),
            Literal::Typed { lexical, .. } => serde_json::Value::String(lexical.clone()),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

/// An RDF term in object position.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// A node reference.
    Iri(String),
    /// A literal.
    Literal(Literal),
}

impl Term {
    /// Returns the IRI if this term is a node reference.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }
}

/// A subject-predicate-object statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    /// Subject IRI.
    pub subject: String,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Term,
}

impl Triple {
    /// Creates a triple whose object is an IRI.
    pub fn iri(subject: impl Into<String>, predicate: &str, object: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.to_string(),
            object: Term::Iri(object.into()),
        }
    }

    /// Creates a triple whose object is a literal.
    pub fn literal(subject: impl Into<String>, predicate: &str, object: Literal) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.to_string(),
            object: Term::Literal(object),
        }
    }
}

/// An ordered collection of triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    triples: Vec<Triple>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a triple.
    pub fn push(&mut self, triple: Triple) {
        self.triples.push(triple);
    }

    /// Triples in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Triples with subject `subject`.
    pub fn about<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| t.subject == subject)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::slice::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_values_become_one_literal_each() {
        let lits = Literal::from_value(&Value::from(vec![1i64, 2, 3]));
        assert_eq!(lits, vec![Literal::Integer(1), Literal::Integer(2), Literal::Integer(3)]);
    }

    #[test]
    fn typed_literals_serialize_as_strings() {
        let lit = Literal::Typed {
            lexical: "2024-01-02".into(),
            datatype: LiteralType::Date,
        };
        assert_eq!(lit.to_json(), serde_json::json!("2024-01-02"));
        assert_eq!(lit.datatype().compact(), "xsd:date");
    }
}
