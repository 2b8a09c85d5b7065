//! Placeholder reconciliation.
//!
//! An object added before its identifier is known is stored as a
//! placeholder entry. When an equivalent real entry turns up, the
//! placeholder is dropped and every reference to it is rewritten.

use tracing::{debug, info};

use crate::instance::{Entry, InstanceModel};

/// How [`InstanceModel::add_entry`] stored an incoming entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The entry was appended.
    Appended,
    /// An entry with the same id was replaced in place.
    Replaced,
    /// The incoming placeholder was discarded in favour of `kept`.
    Merged {
        /// Identifier of the entry that absorbed the placeholder.
        kept: String,
    },
    /// The incoming real entry replaced the placeholder `removed`.
    Superseded {
        /// Identifier of the discarded placeholder.
        removed: String,
    },
}

/// Returns `true` if `a` and `b` describe the same object.
///
/// Both must share a class and carry equal literal values. For references:
/// when either side is a placeholder, an empty side matches anything and
/// otherwise the smaller map must be contained in the larger one; two real
/// entries need identical references. Target lists compare as sets.
#[must_use]
pub fn entries_equivalent(a: &Entry, b: &Entry) -> bool {
    if a.class_id() != b.class_id() || a.properties() != b.properties() {
        return false;
    }
    let refs_a = normalized_references(a);
    let refs_b = normalized_references(b);

    if a.is_placeholder() || b.is_placeholder() {
        if refs_a.is_empty() || refs_b.is_empty() {
            return true;
        }
        let (small, large) = if refs_a.len() <= refs_b.len() {
            (&refs_a, &refs_b)
        } else {
            (&refs_b, &refs_a)
        };
        return small
            .iter()
            .all(|(key, targets)| large.iter().any(|(k, t)| k == key && t == targets));
    }
    refs_a == refs_b
}

/// Reference map with empty lists dropped and targets sorted.
fn normalized_references(entry: &Entry) -> Vec<(&str, Vec<&str>)> {
    let mut refs: Vec<(&str, Vec<&str>)> = entry
        .references()
        .iter()
        .filter(|(_, targets)| !targets.is_empty())
        .map(|(key, targets)| {
            let mut sorted: Vec<&str> = targets.iter().map(String::as_str).collect();
            sorted.sort_unstable();
            (key.as_str(), sorted)
        })
        .collect();
    refs.sort();
    refs
}

impl InstanceModel {
    /// Adds an entry, reconciling it against the entries already present.
    ///
    /// An entry whose id is already taken replaces the stored one in place.
    /// Otherwise the first equivalent entry decides: an incoming placeholder
    /// is discarded and references to it point at the existing entry; an
    /// incoming real entry replaces an existing placeholder and references
    /// to the placeholder are rewritten. Two equivalent real entries are
    /// both kept.
    pub fn add_entry(&mut self, entry: Entry) -> AddOutcome {
        if let Some(slot) = self.entries.iter_mut().find(|e| e.id() == entry.id()) {
            debug!(id = entry.id(), "replacing entry with same id");
            *slot = entry;
            return AddOutcome::Replaced;
        }

        let matched = self
            .entries
            .iter()
            .position(|existing| {
                entries_equivalent(&entry, existing)
                    && (entry.is_placeholder() || existing.is_placeholder())
            });

        let Some(index) = matched else {
            self.entries.push(entry);
            return AddOutcome::Appended;
        };

        if entry.is_placeholder() {
            let kept = self.entries[index].id().to_string();
            info!(placeholder = entry.id(), kept = %kept, "placeholder merged into existing entry");
            self.rewrite_references(entry.id(), &kept);
            AddOutcome::Merged { kept }
        } else {
            let removed = self.entries[index].id().to_string();
            let new_id = entry.id().to_string();
            info!(placeholder = %removed, replacement = %new_id, "placeholder superseded");
            self.entries[index] = entry;
            self.rewrite_references(&removed, &new_id);
            AddOutcome::Superseded { removed }
        }
    }

    /// Matches every placeholder against the real entries, removes the
    /// matched placeholders and rewrites references to them.
    ///
    /// Returns the `(placeholder, replacement)` pairs that were applied.
    /// Unmatched placeholders stay.
    pub fn resolve_placeholders(&mut self) -> Vec<(String, String)> {
        let mut mapping: Vec<(String, String)> = Vec::new();
        for placeholder in self.entries.iter().filter(|e| e.is_placeholder()) {
            if let Some(real) = self
                .entries
                .iter()
                .filter(|e| !e.is_placeholder())
                .find(|real| entries_equivalent(placeholder, real))
            {
                mapping.push((placeholder.id().to_string(), real.id().to_string()));
            }
        }
        if mapping.is_empty() {
            return mapping;
        }

        self.entries
            .retain(|e| !mapping.iter().any(|(placeholder, _)| placeholder == e.id()));
        for (placeholder, real) in &mapping {
            self.rewrite_references(placeholder, real);
        }
        info!(resolved = mapping.len(), "placeholders resolved");
        mapping
    }

    /// Rewrites every reference to `old` into `new` across all entries.
    /// Returns the number of rewritten targets.
    pub fn rewrite_references(&mut self, old: &str, new: &str) -> usize {
        self.entries
            .iter_mut()
            .map(|e| e.rewrite_reference(old, new))
            .sum()
    }
}
