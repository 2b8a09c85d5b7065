//! Source buffer and file output helpers.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Marker line at the top of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by rocrate-codegen. Do not edit by hand.";

/// An in-memory Rust source file.
#[derive(Debug, Default)]
pub struct RustFile {
    /// The source text written so far.
    pub buf: String,
}

impl RustFile {
    /// Starts a file with the generated header and a module doc comment.
    /// Each line of `module_doc` becomes one `//!` line.
    #[must_use]
    pub fn new(module_doc: &str) -> Self {
        let mut f = Self::default();
        f.line(GENERATED_HEADER);
        f.blank();
        for line in module_doc.lines() {
            if line.is_empty() {
                f.line("//!");
            } else {
                f.buf.push_str("//! ");
                f.line(line);
            }
        }
        f.blank();
        f
    }

    /// Appends a line.
    pub fn line(&mut self, s: &str) {
        self.buf.push_str(s);
        self.buf.push('\n');
    }

    /// Appends an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Appends a `///` comment at item level.
    pub fn doc_comment(&mut self, s: &str) {
        self.doc_lines("", s);
    }

    /// Appends a `///` comment indented one level.
    pub fn indented_doc_comment(&mut self, s: &str) {
        self.doc_lines("    ", s);
    }

    fn doc_lines(&mut self, indent: &str, s: &str) {
        if s.is_empty() {
            self.buf.push_str(indent);
            self.line("///");
            return;
        }
        for line in s.lines() {
            self.buf.push_str(indent);
            if line.is_empty() {
                self.line("///");
            } else {
                self.buf.push_str("/// ");
                self.line(line);
            }
        }
    }

    /// Returns the finished source, with exactly one trailing newline.
    #[must_use]
    pub fn finish(mut self) -> String {
        while self.buf.ends_with("\n\n") {
            self.buf.pop();
        }
        self.buf
    }
}

/// Collapses runs of whitespace in a free-text comment into single spaces.
#[must_use]
pub fn normalize_comment(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Writes `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if a directory or the file cannot be written.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))
}
