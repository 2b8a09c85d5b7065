//! Struct generation: schema class → Rust struct, property → field.

use std::collections::HashSet;
use std::fmt::Write as FmtWrite;

use rocrate_schema::{ClassDef, Skeleton, ValueKind};

use crate::emit::{normalize_comment, RustFile};
use crate::mapping::{field_type, to_snake_case, to_type_name};

/// Generates one struct for `class` with the fields of `skeleton`.
///
/// Returns the number of fields emitted, the `id` field included.
pub fn generate_struct(f: &mut RustFile, class: &ClassDef, skeleton: &Skeleton) -> usize {
    let type_name = to_type_name(&class.id);
    let comment = class
        .comment
        .as_deref()
        .map(normalize_comment)
        .unwrap_or_else(|| format!("An entry of class `{}`.", class.id));
    f.doc_comment(&comment);
    let parents: Vec<&str> = class.parents.iter().map(String::as_str).collect();
    if !parents.is_empty() {
        f.doc_comment("");
        let _ = writeln!(f.buf, "/// Subclass of: {}.", parents.join(", "));
    }

    f.line("#[derive(Debug, Clone, PartialEq)]");
    let _ = writeln!(f.buf, "pub struct {type_name} {{");
    f.indented_doc_comment("Entry identifier.");
    f.line("    pub id: String,");

    let mut taken: HashSet<String> = HashSet::from(["id".to_string()]);
    for field in &skeleton.fields {
        let mut name = to_snake_case(&field.name);
        while !taken.insert(name.clone()) {
            name.push('_');
        }
        let doc = match (&field.comment, &field.kind) {
            (Some(c), _) => normalize_comment(c),
            (None, ValueKind::Reference(target)) => {
                format!("Identifiers of `{target}` entries held in `{}`.", field.name)
            }
            (None, ValueKind::Literal(t)) => format!("`{}` ({}).", field.name, t.compact()),
        };
        f.indented_doc_comment(&doc);
        let _ = writeln!(f.buf, "    pub {name}: {},", field_type(field));
    }
    f.line("}");
    f.blank();

    let _ = writeln!(f.buf, "impl {type_name} {{");
    f.indented_doc_comment("Schema class identifier.");
    let _ = writeln!(f.buf, "    pub const CLASS_ID: &str = {:?};", class.id);
    f.line("}");
    f.blank();

    skeleton.fields.len() + 1
}
