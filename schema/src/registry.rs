//! Forward-reference registry.
//!
//! The registry maps every known identifier to the kind of definition that
//! owns it. Property ranges and restrictions refer to classes by id only, so
//! a class may be named before it exists and is resolved at lookup time.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::introspect::Skeleton;
use crate::model::{ClassDef, PropertyDef, Range, RestrictionDef, Schema};

/// What an identifier is registered as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A class of the schema.
    Class,
    /// A property, owned by `owner` or standalone.
    Property {
        /// The owning class, `None` for a standalone property.
        owner: Option<String>,
    },
    /// A restriction, owned by `owner` or standalone.
    Restriction {
        /// The owning class, `None` for a standalone restriction.
        owner: Option<String>,
    },
}

impl Slot {
    /// Human-readable kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::Class => "class",
            Slot::Property { .. } => "property",
            Slot::Restriction { .. } => "restriction",
        }
    }
}

/// A resolved identifier.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    /// A class.
    Class(&'a ClassDef),
    /// A property.
    Property(&'a PropertyDef),
    /// An explicitly stored restriction.
    Restriction(&'a RestrictionDef),
}

/// Identifier registry plus the per-class skeleton cache.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    slots: HashMap<String, Slot>,
    skeletons: HashMap<String, Skeleton>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id`. A later registration of the same id wins and drops
    /// any cached skeleton for it.
    pub fn register(&mut self, id: impl Into<String>, slot: Slot) {
        let id = id.into();
        self.skeletons.remove(&id);
        self.slots.insert(id, slot);
    }

    /// Removes `id` and its cached skeleton. Returns the removed slot.
    pub fn unregister(&mut self, id: &str) -> Option<Slot> {
        self.skeletons.remove(id);
        self.slots.remove(id)
    }

    /// Returns how `id` is registered.
    #[must_use]
    pub fn slot(&self, id: &str) -> Option<&Slot> {
        self.slots.get(id)
    }

    /// Whether `id` is registered as a class.
    #[must_use]
    pub fn is_class(&self, id: &str) -> bool {
        matches!(self.slots.get(id), Some(Slot::Class))
    }

    /// Resolves `id` against `schema`.
    ///
    /// Returns `None` for unknown ids and for restrictions that are derived
    /// rather than stored.
    #[must_use]
    pub fn resolve<'a>(&self, schema: &'a Schema, id: &str) -> Option<Resolved<'a>> {
        match self.slots.get(id)? {
            Slot::Class => schema.class(id).map(Resolved::Class),
            Slot::Property { owner: None } => schema.property(id).map(Resolved::Property),
            Slot::Property { owner: Some(owner) } => schema
                .class(owner)
                .and_then(|c| c.property(id))
                .map(Resolved::Property),
            Slot::Restriction { owner: None } => {
                schema.restriction(id).map(Resolved::Restriction)
            }
            Slot::Restriction { owner: Some(owner) } => schema
                .class(owner)
                .and_then(|c| c.restrictions.as_ref())
                .and_then(|rs| rs.iter().find(|r| r.id == id))
                .map(Resolved::Restriction),
        }
    }

    /// Breadth-first walk from `start` over class-valued property ranges,
    /// owned or inherited.
    ///
    /// Returns every reachable identifier exactly once, in visitation order,
    /// with `start` first. Only registered classes are followed; cycles
    /// terminate.
    #[must_use]
    pub fn collect_dependencies_bfs(&self, schema: &Schema, start: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::from([start.to_string()]);

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            if self.is_class(&current) {
                for property in schema.all_properties(&current) {
                    for range in &property.range {
                        let Some(target) = range_class(range, self) else {
                            continue;
                        };
                        if !visited.contains(target) {
                            queue.push_back(target.to_string());
                        }
                    }
                }
            }
            out.push(current);
        }
        out
    }

    /// Unions the dependency walks of `ids`, keeping first-seen order.
    #[must_use]
    pub fn get_all_dependencies<S: AsRef<str>>(&self, schema: &Schema, ids: &[S]) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<String> = Vec::new();
        for id in ids {
            for dep in self.collect_dependencies_bfs(schema, id.as_ref()) {
                if seen.insert(dep.clone()) {
                    out.push(dep);
                }
            }
        }
        out
    }

    /// Returns the cached skeleton of `class_id`.
    #[must_use]
    pub fn cached_skeleton(&self, class_id: &str) -> Option<&Skeleton> {
        self.skeletons.get(class_id)
    }

    /// Caches a skeleton under its class id.
    pub fn cache_skeleton(&mut self, skeleton: Skeleton) -> &Skeleton {
        let id = skeleton.class_id.clone();
        self.skeletons.insert(id.clone(), skeleton);
        &self.skeletons[&id]
    }

    /// Drops every cached skeleton.
    pub fn clear_skeleton_cache(&mut self) {
        self.skeletons.clear();
    }

    /// Drops every registration and every cached skeleton.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.skeletons.clear();
    }
}

/// The registered class a range entry points at. External URIs whose base
/// local name is a registered class are followed too.
fn range_class<'r>(range: &'r Range, registry: &Registry) -> Option<&'r str> {
    let candidate = match range {
        Range::Class(id) => id.as_str(),
        Range::External(uri) => crate::import::local_id(uri),
        Range::Literal(_) => return None,
    };
    registry.is_class(candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LiteralType, PropertyDef};

    fn schema_with(classes: Vec<ClassDef>) -> (Schema, Registry) {
        let mut schema = Schema::new();
        let mut registry = Registry::new();
        for class in classes {
            registry.register(class.id.clone(), Slot::Class);
            schema.classes.insert(class.id.clone(), class);
        }
        (schema, registry)
    }

    fn link(name: &str, target: &str) -> PropertyDef {
        PropertyDef::new(name).with_range(Range::Class(target.into()))
    }

    #[test]
    fn diamond_visits_each_node_once() {
        let (schema, registry) = schema_with(vec![
            ClassDef::new("A").with_property(link("b", "B")).with_property(link("c", "C")),
            ClassDef::new("B").with_property(link("d", "D")),
            ClassDef::new("C").with_property(link("d", "D")),
            ClassDef::new("D"),
        ]);
        assert_eq!(registry.collect_dependencies_bfs(&schema, "A"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn cycles_terminate() {
        let (schema, registry) = schema_with(vec![
            ClassDef::new("Person").with_property(link("knows", "Person")),
        ]);
        assert_eq!(registry.collect_dependencies_bfs(&schema, "Person"), vec!["Person"]);
    }

    #[test]
    fn unregistered_and_literal_ranges_are_not_followed() {
        let (schema, registry) = schema_with(vec![ClassDef::new("A")
            .with_property(link("ghost", "Ghost"))
            .with_property(PropertyDef::new("n").with_range(LiteralType::Integer))]);
        assert_eq!(registry.collect_dependencies_bfs(&schema, "A"), vec!["A"]);
    }

    #[test]
    fn inherited_ranges_are_followed() {
        let (schema, registry) = schema_with(vec![
            ClassDef::new("Base").with_property(link("owner", "Agent")),
            ClassDef::new("Child").with_parent("Base"),
            ClassDef::new("Agent"),
        ]);
        assert_eq!(
            registry.collect_dependencies_bfs(&schema, "Child"),
            vec!["Child", "Agent"]
        );
    }

    #[test]
    fn union_keeps_first_seen_order() {
        let (schema, registry) = schema_with(vec![
            ClassDef::new("A").with_property(link("c", "C")),
            ClassDef::new("B").with_property(link("c", "C")),
            ClassDef::new("C"),
        ]);
        assert_eq!(registry.get_all_dependencies(&schema, &["B", "A"]), vec!["B", "C", "A"]);
    }

    #[test]
    fn lazy_resolution() {
        let mut schema = Schema::new();
        let mut registry = Registry::new();
        let person = ClassDef::new("Person").with_property(link("worksFor", "Org"));
        registry.register("Person", Slot::Class);
        registry.register("worksFor", Slot::Property { owner: Some("Person".into()) });
        schema.classes.insert("Person".into(), person);
        assert!(registry.resolve(&schema, "Org").is_none());

        registry.register("Org", Slot::Class);
        schema.classes.insert("Org".into(), ClassDef::new("Org"));
        assert!(matches!(registry.resolve(&schema, "Org"), Some(Resolved::Class(c)) if c.id == "Org"));
        assert!(matches!(
            registry.resolve(&schema, "worksFor"),
            Some(Resolved::Property(p)) if p.id == "worksFor"
        ));
    }
}
