//! The [`SchemaFacade`] session object.
//!
//! A facade owns one crate's schema, instances and registry, plus the root
//! dataset metadata and the files shipped with the crate. It is the only
//! place where definitions are registered, so every identifier it stores is
//! resolvable through the registry.

use std::path::{Path, PathBuf};

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::{debug, info, warn};

use crate::config::CrateConfig;
use crate::context::Context;
use crate::dataset::{CrateMetadata, FileEntry};
use crate::emit;
use crate::error::{Result, SchemaError, SchemaResult};
use crate::import::{self, ImportReport, Imported};
use crate::instance::{placeholder_id, Entry, InstanceModel, Value};
use crate::introspect::{self, FieldValue, Materialize, Record, Skeleton, TypeTemplate};
use crate::layout;
use crate::model::{ClassDef, PropertyDef, RestrictionDef, Schema};
use crate::prefix;
use crate::reconcile::AddOutcome;
use crate::registry::{Registry, Resolved, Slot};
use crate::serializer::{jsonld, ntriples};
use crate::term::{Graph, Triple};
use crate::vocab;

/// One crate's schema and instance graph.
#[derive(Debug, Clone, Default)]
pub struct SchemaFacade {
    config: CrateConfig,
    schema: Schema,
    instances: InstanceModel,
    registry: Registry,
    metadata: CrateMetadata,
    files: Vec<FileEntry>,
}

impl SchemaFacade {
    /// An empty facade with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty facade with `config`.
    #[must_use]
    pub fn with_config(config: CrateConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CrateConfig {
        &self.config
    }

    /// Schema layer.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Instance layer.
    #[must_use]
    pub fn instances(&self) -> &InstanceModel {
        &self.instances
    }

    /// Identifier registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Metadata written on the root dataset.
    #[must_use]
    pub fn crate_metadata(&self) -> &CrateMetadata {
        &self.metadata
    }

    /// Replaces the root dataset metadata.
    pub fn set_crate_metadata(&mut self, metadata: CrateMetadata) {
        self.metadata = metadata;
    }

    /// Adds a file to ship with the crate, replacing any file stored under
    /// the same id. Files without a creation time are stamped now.
    pub fn add_file(&mut self, mut file: FileEntry) -> &mut Self {
        file.stamp_if_unset(Utc::now().naive_utc());
        match self.files.iter_mut().find(|f| f.id() == file.id()) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
        self
    }

    /// Files in insertion order.
    #[must_use]
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Removes every file.
    pub fn clear_files(&mut self) -> &mut Self {
        self.files.clear();
        self
    }

    fn ensure_free(
        &self,
        id: &str,
        incoming: &'static str,
        allowed: fn(&Slot) -> bool,
    ) -> SchemaResult<()> {
        match self.registry.slot(id) {
            Some(slot) if !allowed(slot) => Err(SchemaError::IdCollision {
                id: id.to_string(),
                existing: slot.kind(),
                incoming,
            }),
            _ => Ok(()),
        }
    }

    /// Adds a class, or replaces the class with the same id.
    ///
    /// Each owned property gets the class added to its domain.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IdCollision`] if the class, one of its
    /// properties or one of its restrictions reuses an id registered as
    /// another kind, and [`SchemaError::InvalidCardinality`] for crossed
    /// restriction bounds.
    pub fn add_class(&mut self, mut class: ClassDef) -> SchemaResult<()> {
        self.ensure_free(&class.id, "class", |s| matches!(s, Slot::Class))?;
        if class.properties.iter().any(|p| p.id == class.id) {
            return Err(SchemaError::IdCollision {
                id: class.id.clone(),
                existing: "class",
                incoming: "property",
            });
        }
        for property in &class.properties {
            self.ensure_free(&property.id, "property", |s| matches!(s, Slot::Property { .. }))?;
        }
        for restriction in class.restrictions.iter().flatten() {
            restriction.validate()?;
            self.ensure_free(&restriction.id, "restriction", |s| {
                matches!(s, Slot::Restriction { .. })
            })?;
        }

        for property in &mut class.properties {
            property.add_domain(class.id.clone());
        }
        self.release_dropped_members(&class);
        self.registry.register(class.id.clone(), Slot::Class);
        for property in &class.properties {
            self.registry.register(
                property.id.clone(),
                Slot::Property {
                    owner: Some(class.id.clone()),
                },
            );
        }
        for restriction in class.restrictions.iter().flatten() {
            self.registry.register(
                restriction.id.clone(),
                Slot::Restriction {
                    owner: Some(class.id.clone()),
                },
            );
        }
        self.registry.clear_skeleton_cache();
        debug!(class = %class.id, properties = class.properties.len(), "registered class");
        self.schema.classes.insert(class.id.clone(), class);
        Ok(())
    }

    /// When `class` replaces a stored class, hands the ids of properties and
    /// restrictions it no longer carries to their remaining owner, or
    /// unregisters them.
    fn release_dropped_members(&mut self, class: &ClassDef) {
        let Some(old) = self.schema.class(&class.id) else {
            return;
        };
        let dropped_properties: Vec<String> = old
            .properties
            .iter()
            .filter(|p| class.property(&p.id).is_none())
            .map(|p| p.id.clone())
            .collect();
        let kept_restrictions: Vec<&str> = class
            .restrictions
            .iter()
            .flatten()
            .map(|r| r.id.as_str())
            .collect();
        let dropped_restrictions: Vec<String> = old
            .restrictions
            .iter()
            .flatten()
            .filter(|r| !kept_restrictions.contains(&r.id.as_str()))
            .map(|r| r.id.clone())
            .collect();

        for id in dropped_properties {
            let owned_here = matches!(
                self.registry.slot(&id),
                Some(Slot::Property { owner: Some(o) }) if *o == class.id
            );
            if !owned_here {
                continue;
            }
            let other = self
                .schema
                .classes()
                .find(|c| c.id != class.id && c.property(&id).is_some())
                .map(|c| c.id.clone());
            if let Some(owner) = other {
                self.registry.register(id, Slot::Property { owner: Some(owner) });
            } else if self.schema.property(&id).is_some() {
                self.registry.register(id, Slot::Property { owner: None });
            } else {
                debug!(class = %class.id, property = %id, "unregistered dropped property");
                self.registry.unregister(&id);
            }
        }
        for id in dropped_restrictions {
            let owned_here = matches!(
                self.registry.slot(&id),
                Some(Slot::Restriction { owner: Some(o) }) if *o == class.id
            );
            if !owned_here {
                continue;
            }
            if self.schema.restriction(&id).is_some() {
                self.registry.register(id, Slot::Restriction { owner: None });
            } else {
                self.registry.unregister(&id);
            }
        }
    }

    /// Adds a property no class owns.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IdCollision`] if the id is registered as a
    /// class or restriction.
    pub fn add_property(&mut self, property: PropertyDef) -> SchemaResult<()> {
        self.ensure_free(&property.id, "property", |s| matches!(s, Slot::Property { .. }))?;
        if !matches!(self.registry.slot(&property.id), Some(Slot::Property { owner: Some(_) })) {
            self.registry
                .register(property.id.clone(), Slot::Property { owner: None });
        }
        debug!(property = %property.id, "registered standalone property");
        self.schema.properties.insert(property.id.clone(), property);
        Ok(())
    }

    /// Adds a restriction no class owns.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::IdCollision`] if the id is registered as a
    /// class or property, and [`SchemaError::InvalidCardinality`] for
    /// crossed bounds.
    pub fn add_restriction(&mut self, restriction: RestrictionDef) -> SchemaResult<()> {
        restriction.validate()?;
        self.ensure_free(&restriction.id, "restriction", |s| {
            matches!(s, Slot::Restriction { .. })
        })?;
        self.registry
            .register(restriction.id.clone(), Slot::Restriction { owner: None });
        self.schema
            .restrictions
            .insert(restriction.id.clone(), restriction);
        Ok(())
    }

    /// Converts a type template into a class under the configured default
    /// parent and adds it.
    ///
    /// # Errors
    ///
    /// Propagates [`add_class`](Self::add_class) errors.
    pub fn add_template(&mut self, template: &TypeTemplate) -> SchemaResult<&ClassDef> {
        self.add_class(template.to_class(&self.config.default_parent))?;
        self.schema
            .class(&template.id)
            .ok_or_else(|| SchemaError::UnknownClass(template.id.clone()))
    }

    /// Adds an entry, reconciling it with placeholders already stored.
    pub fn add_entry(&mut self, entry: Entry) -> AddOutcome {
        self.instances.add_entry(entry)
    }

    /// Flattens a typed object, and every object reachable from it, into
    /// entries. Classes missing from the schema are added from the objects'
    /// templates.
    ///
    /// Objects without an identifier reuse an entry of the same class with
    /// equal literal values, or are stored as placeholders. Cycles in the
    /// object graph are followed once. Returns the id the root object ended
    /// up under.
    ///
    /// # Errors
    ///
    /// Propagates [`add_class`](Self::add_class) errors raised while adding
    /// templates.
    pub fn add_object(&mut self, object: &dyn Materialize) -> SchemaResult<String> {
        let (id, placeholder) = self.object_id(object);
        let mut path: Vec<usize> = Vec::new();
        self.flatten(object, id, placeholder, &mut path)
    }

    fn object_id(&self, object: &dyn Materialize) -> (String, bool) {
        if let Some(id) = object.instance_id() {
            return (id, false);
        }
        let class_id = object.type_template().id;
        let literals = literal_values(object);
        match self.instances.find_by_values(&class_id, &literals) {
            Some(existing) => (existing.id().to_string(), false),
            None => (placeholder_id(&class_id, &literals), true),
        }
    }

    fn flatten(
        &mut self,
        object: &dyn Materialize,
        id: String,
        placeholder: bool,
        path: &mut Vec<usize>,
    ) -> SchemaResult<String> {
        let template = object.type_template();
        if self.schema.class(&template.id).is_none() {
            self.add_template(&template)?;
        }

        path.push(address(object));
        let mut entry = Entry::new(id, template.id);
        for (name, value) in object.field_values() {
            match value {
                FieldValue::Literal(v) => entry.set_property(name, v),
                FieldValue::Object(nested) => {
                    let target = self.link(nested, path)?;
                    entry.add_reference(name, target);
                }
                FieldValue::Objects(nested) => {
                    for n in nested {
                        let target = self.link(n, path)?;
                        entry.add_reference(name.clone(), target);
                    }
                }
            }
        }
        path.pop();

        if placeholder {
            entry = entry.into_placeholder();
        }
        let id = entry.id().to_string();
        Ok(match self.instances.add_entry(entry) {
            AddOutcome::Merged { kept } => kept,
            _ => id,
        })
    }

    fn link(
        &mut self,
        object: &dyn Materialize,
        path: &mut Vec<usize>,
    ) -> SchemaResult<String> {
        let (id, placeholder) = self.object_id(object);
        if path.contains(&address(object)) || self.instances.entry(&id).is_some() {
            return Ok(id);
        }
        self.flatten(object, id, placeholder, path)
    }

    /// Replaces every placeholder that has an equivalent real entry.
    /// Returns the applied `(placeholder, replacement)` pairs.
    pub fn resolve_placeholders(&mut self) -> Vec<(String, String)> {
        self.instances.resolve_placeholders()
    }

    /// Checks that every class-valued range names a registered class, every
    /// class restriction targets a property the class owns or inherits, and
    /// every standalone restriction targets a registered property.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError::UnresolvedReference`] or
    /// [`SchemaError::UnreachableProperty`] found.
    pub fn resolve_forward_refs(&self) -> SchemaResult<()> {
        let check_ranges = |property: &PropertyDef| {
            for target in property.range.iter().filter_map(|r| r.class_id()) {
                if !self.registry.is_class(target) {
                    return Err(SchemaError::UnresolvedReference {
                        owner: property.id.clone(),
                        target: target.to_string(),
                    });
                }
            }
            Ok(())
        };

        for class in self.schema.classes() {
            for parent in &class.parents {
                if !vocab::has_scheme(parent) && !self.registry.is_class(parent) {
                    return Err(SchemaError::UnresolvedReference {
                        owner: class.id.clone(),
                        target: parent.clone(),
                    });
                }
            }
            for property in &class.properties {
                check_ranges(property)?;
            }
            let reachable = self.schema.all_properties(&class.id);
            for restriction in class.restrictions.iter().flatten() {
                if !reachable.iter().any(|p| p.id == restriction.property) {
                    return Err(SchemaError::UnreachableProperty {
                        restriction: restriction.id.clone(),
                        class: class.id.clone(),
                        property: restriction.property.clone(),
                    });
                }
            }
        }
        for property in self.schema.properties() {
            check_ranges(property)?;
        }
        for restriction in self.schema.restrictions() {
            if !matches!(self.registry.slot(&restriction.property), Some(Slot::Property { .. })) {
                return Err(SchemaError::UnresolvedReference {
                    owner: restriction.id.clone(),
                    target: restriction.property.clone(),
                });
            }
        }
        Ok(())
    }

    /// Resolves any registered id.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<Resolved<'_>> {
        self.registry.resolve(&self.schema, id)
    }

    /// Breadth-first dependency walk from `id`; see
    /// [`Registry::collect_dependencies_bfs`].
    #[must_use]
    pub fn collect_dependencies_bfs(&self, id: &str) -> Vec<String> {
        self.registry.collect_dependencies_bfs(&self.schema, id)
    }

    /// Union of the dependency walks of `ids`, in first-seen order.
    #[must_use]
    pub fn get_all_dependencies<S: AsRef<str>>(&self, ids: &[S]) -> Vec<String> {
        self.registry.get_all_dependencies(&self.schema, ids)
    }

    /// Typed shape of `class_id`, built once and cached until the schema
    /// changes.
    pub fn skeleton(&mut self, class_id: &str) -> Option<&Skeleton> {
        if self.registry.cached_skeleton(class_id).is_none() {
            let skeleton = Skeleton::build(&self.schema, class_id)?;
            debug!(class = class_id, fields = skeleton.fields.len(), "built skeleton");
            self.registry.cache_skeleton(skeleton);
        }
        self.registry.cached_skeleton(class_id)
    }

    /// Drops every cached skeleton.
    pub fn clear_skeleton_cache(&mut self) {
        self.registry.clear_skeleton_cache();
    }

    /// Rebuilds an entry and everything it references as a [`Record`].
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownEntry`] if no entry has `entry_id`.
    /// Missing targets further down are kept as references.
    pub fn materialize(&self, entry_id: &str) -> SchemaResult<Record> {
        introspect::materialize(&self.instances, entry_id)
            .ok_or_else(|| SchemaError::UnknownEntry(entry_id.to_string()))
    }

    /// Looks up a class.
    #[must_use]
    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.schema.class(id)
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.schema.classes()
    }

    /// Looks up a property, standalone first, then class-owned.
    #[must_use]
    pub fn property(&self, id: &str) -> Option<&PropertyDef> {
        self.schema.property(id).or_else(|| {
            self.schema
                .classes()
                .find_map(|c| c.property(id))
        })
    }

    /// Every property, standalone first, deduplicated by id.
    #[must_use]
    pub fn properties(&self) -> Vec<&PropertyDef> {
        let mut out: IndexMap<&str, &PropertyDef> = IndexMap::new();
        let owned = self.schema.classes().flat_map(|c| c.properties.iter());
        for property in self.schema.properties().chain(owned) {
            out.entry(property.id.as_str()).or_insert(property);
        }
        out.into_values().collect()
    }

    /// Looks up a restriction, standalone or effective on a class.
    #[must_use]
    pub fn restriction(&self, id: &str) -> Option<RestrictionDef> {
        self.schema.restriction(id).cloned().or_else(|| {
            self.schema
                .classes()
                .flat_map(ClassDef::effective_restrictions)
                .find(|r| r.id == id)
        })
    }

    /// Every restriction, standalone first, deduplicated by id.
    #[must_use]
    pub fn restrictions(&self) -> Vec<RestrictionDef> {
        let mut out: IndexMap<String, RestrictionDef> = IndexMap::new();
        let effective = self.schema.classes().flat_map(ClassDef::effective_restrictions);
        for restriction in self.schema.restrictions().cloned().chain(effective) {
            out.entry(restriction.id.clone()).or_insert(restriction);
        }
        out.into_values().collect()
    }

    /// Looks up an entry.
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&Entry> {
        self.instances.entry(id)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        self.instances.entries()
    }

    /// Entries of one class.
    pub fn entries_of_class<'a>(&'a self, class_id: &'a str) -> impl Iterator<Item = &'a Entry> + 'a {
        self.instances
            .entries()
            .iter()
            .filter(move |e| e.class_id() == class_id)
    }

    /// Lazily emitted triples.
    pub fn triples(&self) -> impl Iterator<Item = Triple> + '_ {
        emit::triples(&self.schema, &self.instances, &self.config)
    }

    /// All triples, collected.
    #[must_use]
    pub fn graph(&self) -> Graph {
        self.triples().collect()
    }

    /// Minimal context for the current graph.
    #[must_use]
    pub fn context(&self) -> Context {
        prefix::derive_context(&self.graph(), &self.config)
    }

    /// The crate metadata document for the current graph, the root dataset
    /// metadata and every file.
    #[must_use]
    pub fn to_json_ld(&self) -> Json {
        self.document(&self.files)
    }

    fn document(&self, files: &[FileEntry]) -> Json {
        let graph = self.graph();
        let context = prefix::derive_context(&graph, &self.config);
        jsonld::to_crate_document(&graph, &context, &self.config, &self.metadata, files)
    }

    /// The current graph as N-Triples.
    #[must_use]
    pub fn to_ntriples(&self) -> String {
        ntriples::to_ntriples(&self.graph())
    }

    /// Resolves placeholders, validates references, copies the files into
    /// `dir` and writes the metadata document there. Returns the written
    /// file's path.
    ///
    /// Files whose source does not exist are left out of the crate.
    ///
    /// # Errors
    ///
    /// Returns [`CrateError::Schema`](crate::CrateError::Schema) when a
    /// reference does not resolve, and I/O errors from copying or writing.
    pub fn write(&mut self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        self.resolve_placeholders();
        self.resolve_forward_refs()?;

        let mut shipped: Vec<FileEntry> = Vec::with_capacity(self.files.len());
        for file in &self.files {
            if !file.source().is_file() {
                warn!(file = %file.id(), source = %file.source().display(), "file not found, skipping");
                continue;
            }
            layout::copy_into(dir, file.id(), file.source())?;
            shipped.push(file.clone());
        }
        let doc = self.document(&shipped);
        let path = layout::write_document(dir, &self.config.metadata_file, &doc)?;
        info!(
            path = %path.display(),
            classes = self.schema.classes.len(),
            entries = self.instances.len(),
            files = shipped.len(),
            "wrote crate"
        );
        Ok(path)
    }

    /// Reads a crate with the default configuration; see
    /// [`read_with_config`](Self::read_with_config).
    ///
    /// # Errors
    ///
    /// As [`read_with_config`](Self::read_with_config).
    pub fn read(path: impl AsRef<Path>) -> Result<(Self, ImportReport)> {
        Self::read_with_config(path, CrateConfig::default())
    }

    /// Reads a crate from the metadata file, a directory holding it, or a
    /// tree containing it.
    ///
    /// # Errors
    ///
    /// Returns [`CrateError::MetadataNotFound`](crate::CrateError::MetadataNotFound),
    /// I/O and JSON errors, and
    /// [`CrateError::InvalidDocument`](crate::CrateError::InvalidDocument)
    /// for documents without a graph.
    pub fn read_with_config(
        path: impl AsRef<Path>,
        config: CrateConfig,
    ) -> Result<(Self, ImportReport)> {
        let file = layout::locate_metadata(path.as_ref(), &config.metadata_file)?;
        let doc = layout::read_document(&file)?;
        let mut loaded = Self::from_document(&doc, config)?;
        if let Some(crate_dir) = file.parent() {
            for entry in &mut loaded.0.files {
                let source = crate_dir.join(entry.id());
                entry.set_source(source);
            }
        }
        info!(
            path = %file.display(),
            classes = loaded.0.schema.classes.len(),
            entries = loaded.0.instances.len(),
            dropped = loaded.1.dropped.len(),
            "read crate"
        );
        Ok(loaded)
    }

    /// Imports a crate metadata document. File sources are taken relative
    /// to the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`CrateError::InvalidDocument`](crate::CrateError::InvalidDocument)
    /// when the document has no graph. Every other defect lands in the
    /// returned report.
    pub fn from_document(doc: &Json, config: CrateConfig) -> Result<(Self, ImportReport)> {
        let imported = import::import_document(doc, &config)?;
        Ok(Self::from_imported(imported, config))
    }

    /// Loads imported definitions. Definitions the registry rejects are
    /// added to the report.
    #[must_use]
    pub fn from_imported(imported: Imported, config: CrateConfig) -> (Self, ImportReport) {
        let Imported {
            classes,
            properties,
            restrictions,
            entries,
            metadata,
            files,
            mut report,
            ..
        } = imported;
        let mut facade = Self::with_config(config);
        facade.metadata = metadata;
        facade.files = files;
        for class in classes {
            let id = class.id.clone();
            if let Err(err) = facade.add_class(class) {
                report.drop_item(id, err.to_string());
            }
        }
        for property in properties {
            let id = property.id.clone();
            if let Err(err) = facade.add_property(property) {
                report.drop_item(id, err.to_string());
            }
        }
        for restriction in restrictions {
            let id = restriction.id.clone();
            if let Err(err) = facade.add_restriction(restriction) {
                report.drop_item(id, err.to_string());
            }
        }
        for entry in entries {
            facade.add_entry(entry);
        }
        (facade, report)
    }
}

/// Literal field values of `object`, keyed by field name.
fn literal_values(object: &dyn Materialize) -> IndexMap<String, Value> {
    object
        .field_values()
        .into_iter()
        .filter_map(|(name, value)| match value {
            FieldValue::Literal(v) => Some((name, v)),
            _ => None,
        })
        .collect()
}

fn address(object: &dyn Materialize) -> usize {
    (object as *const dyn Materialize).cast::<()>() as usize
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::introspect::FieldTemplate;
    use crate::model::{LiteralType, Range};

    fn person_class() -> ClassDef {
        ClassDef::new("Person")
            .with_property(PropertyDef::new("name").with_range(LiteralType::String).required(true))
            .with_property(PropertyDef::new("knows").with_range("Person").multi_valued(true))
    }

    #[test]
    fn class_properties_get_their_domain() {
        let mut facade = SchemaFacade::new();
        facade.add_class(person_class()).unwrap();
        assert_eq!(facade.property("name").unwrap().domain, vec!["Person".to_string()]);
        assert!(matches!(facade.resolve("knows"), Some(Resolved::Property(_))));
    }

    #[test]
    fn kind_collisions_are_rejected() {
        let mut facade = SchemaFacade::new();
        facade.add_class(person_class()).unwrap();
        let err = facade.add_property(PropertyDef::new("Person")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::IdCollision {
                id: "Person".into(),
                existing: "class",
                incoming: "property"
            }
        );
        assert!(facade.add_class(ClassDef::new("name")).is_err());
        assert!(facade
            .add_restriction(RestrictionDef::new("knows", "name"))
            .is_err());
    }

    #[test]
    fn forward_references_resolve_lazily() {
        let mut facade = SchemaFacade::new();
        facade
            .add_class(ClassDef::new("Person").with_property(PropertyDef::new("worksFor").with_range("Org")))
            .unwrap();
        assert_eq!(
            facade.resolve_forward_refs(),
            Err(SchemaError::UnresolvedReference {
                owner: "worksFor".into(),
                target: "Org".into()
            })
        );
        facade.add_class(ClassDef::new("Org")).unwrap();
        assert_eq!(facade.resolve_forward_refs(), Ok(()));
    }

    #[test]
    fn restriction_on_unreachable_property_fails_validation() {
        let mut facade = SchemaFacade::new();
        facade
            .add_class(ClassDef::new("A").with_restriction(RestrictionDef::new("r", "ghost")))
            .unwrap();
        assert!(matches!(
            facade.resolve_forward_refs(),
            Err(SchemaError::UnreachableProperty { .. })
        ));
    }

    #[test]
    fn queries_deduplicate() {
        let mut facade = SchemaFacade::new();
        facade.add_class(person_class()).unwrap();
        facade.add_property(PropertyDef::new("name").with_range(Range::External("https://schema.org/Text".into()))).unwrap();
        let ids: Vec<&str> = facade.properties().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["name", "knows"]);
        assert_eq!(facade.restrictions().len(), 2);
        assert!(facade.restriction("Person_knows_restriction").is_some());
    }

    #[test]
    fn skeletons_are_cached_and_invalidated() {
        let mut facade = SchemaFacade::new();
        facade.add_class(person_class()).unwrap();
        assert!(facade.skeleton("Person").unwrap().field("name").unwrap().required);
        assert!(facade.registry().cached_skeleton("Person").is_some());
        facade.add_class(ClassDef::new("Org")).unwrap();
        assert!(facade.registry().cached_skeleton("Person").is_none());
        assert!(facade.skeleton("Ghost").is_none());
    }

    #[test]
    fn entries_of_class_filters() {
        let mut facade = SchemaFacade::new();
        facade.add_entry(Entry::new("p1", "Person"));
        facade.add_entry(Entry::new("o1", "Org"));
        facade.add_entry(Entry::new("p2", "Person"));
        let ids: Vec<&str> = facade.entries_of_class("Person").map(Entry::id).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    fn cardinalities(restrictions: Vec<RestrictionDef>) -> Vec<(String, u64, Option<u64>)> {
        let mut out: Vec<_> = restrictions
            .into_iter()
            .map(|r| (r.property, r.min_cardinality.unwrap_or(0), r.max_cardinality))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn template_and_flag_restrictions_agree() {
        let template = TypeTemplate::new("Sample")
            .with_field(FieldTemplate::literal("label", LiteralType::String).required())
            .with_field(FieldTemplate::literal("note", LiteralType::String))
            .with_field(FieldTemplate::reference("parts", "Sample").list())
            .with_field(FieldTemplate::literal("tags", LiteralType::String).required().list());
        let flagged = ClassDef::new("Sample")
            .with_property(PropertyDef::new("label").with_range(LiteralType::String).required(true))
            .with_property(PropertyDef::new("note").with_range(LiteralType::String))
            .with_property(PropertyDef::new("parts").with_range("Sample").multi_valued(true))
            .with_property(
                PropertyDef::new("tags")
                    .with_range(LiteralType::String)
                    .required(true)
                    .multi_valued(true),
            );

        let mut from_template = SchemaFacade::new();
        from_template.add_template(&template).unwrap();
        let mut from_flags = SchemaFacade::new();
        from_flags.add_class(flagged).unwrap();

        let explicit = cardinalities(from_template.restrictions());
        assert_eq!(explicit, cardinalities(from_flags.restrictions()));
        assert_eq!(
            explicit,
            vec![
                ("label".to_string(), 1, Some(1)),
                ("note".to_string(), 0, Some(1)),
                ("parts".to_string(), 0, None),
                ("tags".to_string(), 1, None),
            ]
        );

        // Both survive a trip through the document unchanged.
        for facade in [&from_template, &from_flags] {
            let (back, report) = SchemaFacade::from_document(&facade.to_json_ld(), CrateConfig::default()).unwrap();
            assert!(report.is_clean());
            assert_eq!(cardinalities(back.restrictions()), explicit);
        }
    }

    #[test]
    fn materialize_reports_unknown_entries() {
        let mut facade = SchemaFacade::new();
        facade.add_entry(Entry::new("p1", "Person").with_property("name", "Ann"));
        assert_eq!(facade.materialize("p1").unwrap().id, "p1");
        assert_eq!(
            facade.materialize("nobody").unwrap_err(),
            SchemaError::UnknownEntry("nobody".into())
        );
    }

    #[test]
    fn replacing_a_class_releases_dropped_properties() {
        let mut facade = SchemaFacade::new();
        facade.add_class(person_class()).unwrap();
        facade
            .add_class(ClassDef::new("Person").with_property(PropertyDef::new("name").with_range(LiteralType::String)))
            .unwrap();
        assert!(facade.registry().slot("knows").is_none());
        assert!(facade.resolve("knows").is_none());
        assert!(facade.registry().slot("Person_knows_restriction").is_none());
        assert!(matches!(facade.resolve("name"), Some(Resolved::Property(_))));
        // The freed id is usable for another kind now.
        facade.add_class(ClassDef::new("knows")).unwrap();
        assert!(matches!(facade.resolve("knows"), Some(Resolved::Class(_))));
    }

    #[test]
    fn replacing_a_class_hands_shared_properties_over() {
        let mut facade = SchemaFacade::new();
        facade.add_class(person_class()).unwrap();
        facade
            .add_class(ClassDef::new("Org").with_property(PropertyDef::new("name").with_range(LiteralType::String)))
            .unwrap();
        facade.add_class(ClassDef::new("Person")).unwrap();
        assert!(matches!(
            facade.registry().slot("name"),
            Some(Slot::Property { owner: Some(owner) }) if owner == "Org"
        ));
        assert!(facade.property("name").is_some());
        assert!(facade.registry().slot("knows").is_none());
    }

    #[test]
    fn files_replace_by_id_and_clear() {
        let mut facade = SchemaFacade::new();
        facade
            .add_file(FileEntry::new("data/results.csv"))
            .add_file(FileEntry::new("other/results.csv").with_description("second"));
        assert_eq!(facade.files().len(), 1);
        let file = &facade.files()[0];
        assert_eq!(file.id(), "results.csv");
        assert_eq!(file.description(), "second");
        assert!(file.date_created().is_some());

        facade.set_crate_metadata(CrateMetadata::new().with_name("Survey"));
        let doc = facade.to_json_ld();
        assert_eq!(doc["@graph"][0]["name"], "Survey");
        assert_eq!(doc["@graph"][0]["hasPart"][0]["@id"], "results.csv");
        assert_eq!(doc["@graph"][2]["@type"], "File");

        facade.clear_files();
        assert!(facade.files().is_empty());
        assert!(facade.to_json_ld()["@graph"][0].get("hasPart").is_none());
    }
}
