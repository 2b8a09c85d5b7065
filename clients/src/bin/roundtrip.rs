//! `rocrate-roundtrip`: Reads an RO-Crate, reconciles it, and writes it back.
//!
//! The input may be a metadata file, a crate directory, or a directory tree
//! holding a crate. Placeholders are resolved and references validated before
//! the crate is re-emitted.
//!
//! **Outputs:**
//! - `<out>/ro-crate-metadata.json`, JSON-LD crate metadata (`--format json`)
//! - `<out>/ro-crate-metadata.nt`, N-Triples (`--format nt`)
//!
//! **Usage:**
//! ```
//! rocrate-roundtrip <input> [--out <dir>] [--format json|nt] [--base-iri <iri>] [--verbose]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rocrate_schema::{CrateConfig, SchemaFacade};
use tracing::info;

/// Output serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// JSON-LD crate metadata document.
    Json,
    /// N-Triples.
    Nt,
}

/// Read, reconcile and re-emit an RO-Crate.
#[derive(Parser)]
#[command(
    name = "rocrate-roundtrip",
    about = "Read an RO-Crate, reconcile it, and write it back"
)]
struct Args {
    /// Metadata file, crate directory, or tree containing a crate.
    input: PathBuf,

    /// Output directory.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Namespace for local identifiers.
    #[arg(long)]
    base_iri: Option<String>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    rocrate_clients::init_tracing(args.verbose);

    let mut config = CrateConfig::default();
    if let Some(base_iri) = args.base_iri {
        config = config.with_base_iri(base_iri);
    }
    let metadata_file = config.metadata_file.clone();

    let (mut facade, report) = SchemaFacade::read_with_config(&args.input, config)
        .with_context(|| format!("Failed to read crate at {}", args.input.display()))?;

    println!(
        "Read {}: {} classes, {} properties, {} restrictions, {} entries",
        args.input.display(),
        facade.classes().count(),
        facade.properties().len(),
        facade.restrictions().len(),
        facade.entries().len()
    );
    if !report.is_clean() {
        println!("Dropped {} item(s):", report.dropped.len());
        for item in &report.dropped {
            println!("  {}: {}", item.id, item.reason);
        }
    }

    let resolved = facade.resolve_placeholders();
    info!(resolved = resolved.len(), "reconciled placeholders");

    let written = match args.format {
        Format::Json => facade
            .write(&args.out)
            .with_context(|| format!("Failed to write crate to {}", args.out.display()))?,
        Format::Nt => {
            facade
                .resolve_forward_refs()
                .context("Crate schema has unresolved references")?;
            fs::create_dir_all(&args.out).with_context(|| {
                format!("Failed to create output directory: {}", args.out.display())
            })?;
            let path = args.out.join(metadata_file.replace(".json", ".nt"));
            fs::write(&path, facade.to_ntriples())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
    };
    println!("  Written: {}", written.display());
    Ok(())
}
