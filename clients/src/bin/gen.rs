//! `rocrate-gen`: Generates Rust structs from an RO-Crate's schema.
//!
//! Reads the crate's classes and writes one struct per class to a single
//! Rust source file.
//!
//! **Usage:**
//! ```
//! rocrate-gen <input> [--out <path>] [--verbose]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rocrate_schema::SchemaFacade;

/// Generate Rust structs from an RO-Crate schema.
#[derive(Parser)]
#[command(name = "rocrate-gen", about = "Generate Rust structs from an RO-Crate schema")]
struct Args {
    /// Metadata file, crate directory, or tree containing a crate.
    input: PathBuf,

    /// Output file for the generated source.
    #[arg(long, default_value = "src/schema.rs")]
    out: PathBuf,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    rocrate_clients::init_tracing(args.verbose);

    let (facade, report) = SchemaFacade::read(&args.input)
        .with_context(|| format!("Failed to read crate at {}", args.input.display()))?;
    if !report.is_clean() {
        println!("Skipped {} malformed item(s) on import", report.dropped.len());
    }

    let report = rocrate_codegen::generate_to(&facade, &args.out)?;

    println!(
        "Generated {} structs, {} fields",
        report.struct_count, report.field_count
    );
    for class in &report.classes {
        println!("  {}", class);
    }
    println!("  Written: {}", args.out.display());
    Ok(())
}
