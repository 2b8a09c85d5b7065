//! RO-Crate schema code generator.
//!
//! Turns the classes of a [`SchemaFacade`] into plain Rust structs: one
//! struct per class, one field per owned or inherited property. Literal
//! properties map to Rust scalars and `chrono` types, references are held as
//! entry identifiers, multi-valued properties become `Vec<_>` and optional
//! ones `Option<_>`. Structs are emitted in registry dependency order, so a
//! class comes before the classes only it refers to.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod emit;
pub mod mapping;
pub mod structs;

use std::path::Path;

use anyhow::Result;
use rocrate_schema::{SchemaFacade, Skeleton};
use tracing::debug;

use emit::RustFile;

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of structs generated.
    pub struct_count: usize,
    /// Number of fields generated, `id` fields included.
    pub field_count: usize,
    /// Class identifiers, in emission order.
    pub classes: Vec<String>,
}

/// Generates the struct source for every class of `facade`.
#[must_use]
pub fn generate(facade: &SchemaFacade) -> String {
    render(facade).0
}

/// Generates the struct source and writes it to `path`.
///
/// # Errors
///
/// Returns an error if the file or its parent directory cannot be written.
pub fn generate_to(facade: &SchemaFacade, path: &Path) -> Result<GenerationReport> {
    let (source, report) = render(facade);
    emit::write_file(path, &source)?;
    Ok(report)
}

fn render(facade: &SchemaFacade) -> (String, GenerationReport) {
    let mut report = GenerationReport::default();
    let roots: Vec<&str> = facade.classes().map(|c| c.id.as_str()).collect();
    let order = facade.get_all_dependencies(&roots);

    let mut f = RustFile::new(&format!(
        "Typed structs for a crate schema.\n\nClasses: {}",
        roots.len()
    ));
    for id in &order {
        let Some(class) = facade.class(id) else {
            continue;
        };
        let Some(skeleton) = Skeleton::build(facade.schema(), id) else {
            continue;
        };
        report.field_count += structs::generate_struct(&mut f, class, &skeleton);
        report.struct_count += 1;
        report.classes.push(id.clone());
    }
    debug!(
        structs = report.struct_count,
        fields = report.field_count,
        "generated structs"
    );
    (f.finish(), report)
}
