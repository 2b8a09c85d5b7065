//! Schema → Rust mapping tables.
//!
//! Deterministic mappings from class and property identifiers to Rust
//! identifiers, and from literal datatypes to Rust types.

use rocrate_schema::{LiteralType, SkeletonField, ValueKind};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Converts a camelCase, PascalCase or dashed identifier into a snake_case
/// Rust field name.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for ch in local_name(s).chars() {
        if ch.is_uppercase() {
            if matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit()) {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else if ch.is_alphanumeric() {
            result.push(ch);
        } else if !result.is_empty() && !result.ends_with('_') {
            result.push('_');
        }
        prev = Some(ch);
    }
    let mut result = result.trim_end_matches('_').to_string();
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if KEYWORDS.contains(&result.as_str()) {
        result.push('_');
    }
    result
}

/// Converts a class identifier into a PascalCase Rust type name.
#[must_use]
pub fn to_type_name(id: &str) -> String {
    let mut result = String::with_capacity(id.len());
    for part in local_name(id).split(|c: char| !c.is_alphanumeric()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, 'T');
    }
    result
}

/// Extracts the local name from an identifier (after the last `/`, `#` or
/// `:`).
#[must_use]
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['/', '#', ':'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(iri)
}

/// Maps a literal datatype to the Rust type holding its values.
#[must_use]
pub fn literal_rust_type(datatype: LiteralType) -> &'static str {
    match datatype {
        LiteralType::Boolean => "bool",
        LiteralType::Integer => "i64",
        LiteralType::Double | LiteralType::Decimal | LiteralType::Float => "f64",
        LiteralType::Date => "chrono::NaiveDate",
        LiteralType::DateTime => "chrono::NaiveDateTime",
        LiteralType::Time => "chrono::NaiveTime",
        LiteralType::String | LiteralType::Base64Binary | LiteralType::XmlLiteral => "String",
    }
}

/// Full Rust type of a field: references are held as entry ids, list fields
/// become `Vec<_>` and optional single fields `Option<_>`.
#[must_use]
pub fn field_type(field: &SkeletonField) -> String {
    let base = match &field.kind {
        ValueKind::Literal(t) => literal_rust_type(*t),
        ValueKind::Reference(_) => "String",
    };
    if field.list {
        format!("Vec<{base}>")
    } else if field.required {
        base.to_string()
    } else {
        format!("Option<{base}>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: ValueKind, required: bool, list: bool) -> SkeletonField {
        SkeletonField {
            name: "f".into(),
            kind,
            required,
            list,
            comment: None,
        }
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("birthDate"), "birth_date");
        assert_eq!(to_snake_case("isPartOf"), "is_part_of");
        assert_eq!(to_snake_case("date-published"), "date_published");
        assert_eq!(to_snake_case("https://schema.org/sameAs"), "same_as");
        assert_eq!(to_snake_case("type"), "type_");
        assert_eq!(to_snake_case("3d"), "_3d");
    }

    #[test]
    fn type_names() {
        assert_eq!(to_type_name("Person"), "Person");
        assert_eq!(to_type_name("research-object"), "ResearchObject");
        assert_eq!(to_type_name("base:Dataset"), "Dataset");
        assert_eq!(to_type_name("2020Survey"), "T2020Survey");
    }

    #[test]
    fn local_name_extraction() {
        assert_eq!(local_name("https://schema.org/Person"), "Person");
        assert_eq!(local_name("http://www.w3.org/2001/XMLSchema#string"), "string");
        assert_eq!(local_name("Person"), "Person");
    }

    #[test]
    fn field_types() {
        let date = ValueKind::Literal(LiteralType::Date);
        assert_eq!(field_type(&field(date.clone(), true, false)), "chrono::NaiveDate");
        assert_eq!(field_type(&field(date, false, false)), "Option<chrono::NaiveDate>");
        let person = ValueKind::Reference("Person".into());
        assert_eq!(field_type(&field(person, false, true)), "Vec<String>");
        assert_eq!(
            field_type(&field(ValueKind::Literal(LiteralType::Decimal), true, true)),
            "Vec<f64>"
        );
    }
}
