//! Writing crates to disk and reading them back.

use std::fs;

use rocrate_schema::{
    ClassDef, CrateConfig, CrateError, CrateMetadata, Entry, FileEntry, LiteralType, PropertyDef,
    SchemaError, SchemaFacade,
};

fn catalog(config: CrateConfig) -> SchemaFacade {
    let mut facade = SchemaFacade::with_config(config);
    facade
        .add_class(
            ClassDef::new("Collection")
                .with_property(PropertyDef::new("title").with_range(LiteralType::String).required(true))
                .with_property(PropertyDef::new("creator").with_range("Person").multi_valued(true)),
        )
        .unwrap();
    facade
        .add_class(ClassDef::new("Person").with_property(PropertyDef::new("name").with_range(LiteralType::String)))
        .unwrap();
    facade.add_entry(
        Entry::new("survey", "Collection")
            .with_property("title", "Bird survey")
            .with_reference("creator", "ann")
            .with_reference("creator", "bob"),
    );
    facade.add_entry(Entry::new("ann", "Person").with_property("name", "Ann"));
    facade.add_entry(Entry::new("bob", "Person").with_property("name", "Bob"));
    facade
}

/// The metadata file lands in the target directory and reads back from the
/// directory, the file itself, or an ancestor directory.
#[test]
fn write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("crates").join("survey");
    let mut facade = catalog(CrateConfig::default());

    let path = facade.write(&target).unwrap();
    assert_eq!(path, target.join("ro-crate-metadata.json"));
    assert!(fs::read_to_string(&path).unwrap().ends_with("}\n"));

    for source in [target.clone(), path.clone(), dir.path().to_path_buf()] {
        let (read, report) = SchemaFacade::read(&source).unwrap();
        assert!(report.is_clean());
        assert_eq!(read.entries().len(), 3);
        assert_eq!(
            read.entry("survey").unwrap().references()["creator"],
            vec!["ann".to_string(), "bob".to_string()]
        );
    }
}

/// The document opens with the root dataset and the metadata descriptor.
#[test]
fn document_carries_crate_structure() {
    let dir = tempfile::tempdir().unwrap();
    let path = catalog(CrateConfig::default()).write(dir.path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

    let graph = doc["@graph"].as_array().unwrap();
    assert_eq!(graph[0]["@id"], "./");
    assert_eq!(graph[0]["@type"], "Dataset");
    assert_eq!(graph[1]["@id"], "ro-crate-metadata.json");
    assert_eq!(graph[1]["about"]["@id"], "./");
    assert_eq!(doc["@context"][0], "https://w3id.org/ro/crate/1.1/context");
    assert_eq!(doc["@context"][1]["base"], "http://example.com/");
}

/// A custom base namespace is used on write and stripped on read.
#[test]
fn custom_base_namespace() {
    let config = CrateConfig::default().with_base_iri("https://data.example.org/crate/");
    let dir = tempfile::tempdir().unwrap();
    let path = catalog(config.clone()).write(dir.path()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("https://data.example.org/crate/"));

    let (read, report) = SchemaFacade::read_with_config(dir.path(), config).unwrap();
    assert!(report.is_clean());
    assert!(read.class("Collection").is_some());
    assert!(read.entry("ann").is_some());
}

/// Writing refuses a schema whose ranges name missing classes.
#[test]
fn write_rejects_dangling_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let mut facade = SchemaFacade::new();
    facade
        .add_class(ClassDef::new("Collection").with_property(PropertyDef::new("license").with_range("License")))
        .unwrap();

    let err = facade.write(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        CrateError::Schema(SchemaError::UnresolvedReference { ref target, .. }) if target == "License"
    ));
    assert!(!dir.path().join("ro-crate-metadata.json").exists());
}

/// Missing and malformed metadata files surface as errors.
#[test]
fn read_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SchemaFacade::read(dir.path()),
        Err(CrateError::MetadataNotFound { .. })
    ));

    fs::write(dir.path().join("ro-crate-metadata.json"), "{\"@context\": []}").unwrap();
    assert!(matches!(
        SchemaFacade::read(dir.path()),
        Err(CrateError::InvalidDocument(_))
    ));
}

/// Files are copied next to the metadata file, missing ones are left out,
/// and root metadata survives the round trip.
#[test]
fn files_and_root_metadata_round_trip() {
    let work = tempfile::tempdir().unwrap();
    let source = work.path().join("counts.csv");
    fs::write(&source, "species,count\nwren,3\n").unwrap();
    let target = work.path().join("out");

    let mut facade = catalog(CrateConfig::default());
    facade.set_crate_metadata(
        CrateMetadata::new()
            .with_name("Bird survey")
            .with_description("Counts from the spring walk")
            .with_license("https://spdx.org/licenses/CC-BY-4.0")
            .with_extra("datePublished", serde_json::json!("2024-05-01")),
    );
    facade
        .add_file(FileEntry::new(&source).with_id("data/counts.csv"))
        .add_file(FileEntry::new(work.path().join("missing.txt")));
    facade.write(&target).unwrap();

    assert_eq!(
        fs::read_to_string(target.join("data").join("counts.csv")).unwrap(),
        "species,count\nwren,3\n"
    );
    assert!(!target.join("missing.txt").exists());

    let (read, report) = SchemaFacade::read(&target).unwrap();
    assert!(report.is_clean());
    let metadata = read.crate_metadata();
    assert_eq!(metadata.name.as_deref(), Some("Bird survey"));
    assert_eq!(metadata.description.as_deref(), Some("Counts from the spring walk"));
    assert_eq!(metadata.license.as_deref(), Some("https://spdx.org/licenses/CC-BY-4.0"));
    assert_eq!(metadata.extra["datePublished"], "2024-05-01");

    assert_eq!(read.files().len(), 1);
    let file = &read.files()[0];
    assert_eq!(file.id(), "data/counts.csv");
    assert_eq!(file.encoding_format(), "text/csv");
    assert!(file.date_created().is_some());
    assert_eq!(file.source(), target.join("data").join("counts.csv"));
    // Files are crate structure, not schema or instance data.
    assert_eq!(read.entries().len(), 3);
}
