//! N-Triples serializer.
//!
//! Produces a valid N-Triples document (one triple per line, absolute IRIs,
//! typed literals). Triples keep their emission order.

use crate::term::{Literal, Term, Triple};

/// Serializes `triples` to an N-Triples string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid N-Triples string.
#[must_use]
pub fn to_ntriples<'a, I>(triples: I) -> String
where
    I: IntoIterator<Item = &'a Triple>,
{
    let mut out = String::with_capacity(16 * 1024);
    for t in triples {
        let object = match &t.object {
            Term::Iri(o) => iri(o),
            Term::Literal(l) => literal(l),
        };
        triple(&mut out, &t.subject, &t.predicate, &object);
    }
    out
}

fn triple(out: &mut String, subj: &str, pred: &str, obj: &str) {
    out.push('<');
    out.push_str(subj);
    out.push_str("> <");
    out.push_str(pred);
    out.push_str("> ");
    out.push_str(obj);
    out.push_str(" .\n");
}

fn iri(s: &str) -> String {
    format!("<{}>", s)
}

fn literal(l: &Literal) -> String {
    lit(&l.lexical(), &l.datatype().iri())
}

fn lit(s: &str, datatype: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{}\"^^<{}>", escaped, datatype)
}
