//! Static fact snapshots: a JSON description of elements, attributes and
//! links that registers itself into a [`SliceBuilder`].

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SliceError};
use crate::schema::ArchitectureTypes;
use crate::slice::{
    SliceBuilder, SliceContributor, StaticAttributeValues, StaticElements, StaticLinks,
};
use crate::types::{generate_element_id, Element, ElementId};

/// One element of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementFact {
    /// Explicit id; derived from `kind` and `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ElementFact {
    /// The id this element is registered under.
    pub fn element_id(&self) -> ElementId {
        match (&self.id, &self.name) {
            (Some(id), _) => ElementId::new(id.clone()),
            (None, Some(name)) => generate_element_id(&self.kind, name),
            (None, None) => generate_element_id(&self.kind, ""),
        }
    }
}

/// One directed link of a snapshot. `source` and `target` refer to element
/// ids, or to element names when ids were derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkFact {
    pub source: String,
    pub target: String,
    pub kind: String,
}

/// A complete, static set of facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactSnapshot {
    #[serde(default)]
    pub elements: Vec<ElementFact>,
    #[serde(default)]
    pub links: Vec<LinkFact>,
}

impl FactSnapshot {
    /// Reads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| SliceError::Provider {
            message: format!("failed to read fact file '{}': {}", path.display(), e),
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolves a link endpoint reference to an element: first by id, then by name.
    fn resolve_ref<'s>(
        &'s self,
        reference: &str,
        by_id: &HashMap<ElementId, &'s ElementFact>,
    ) -> Option<&'s ElementFact> {
        by_id
            .get(&ElementId::new(reference))
            .copied()
            .or_else(|| self.resolve_name(reference))
    }

    /// Name lookup; an ambiguous name resolves to its first element.
    fn resolve_name(&self, name: &str) -> Option<&ElementFact> {
        let mut matches = self
            .elements
            .iter()
            .filter(|e| e.name.as_deref() == Some(name));
        let first = matches.next()?;
        let others = matches.count();
        if others > 0 {
            tracing::warn!(
                name = %name,
                candidates = others + 1,
                "link refers to an ambiguous element name; using the first match"
            );
        }
        Some(first)
    }
}

impl SliceContributor for FactSnapshot {
    fn contribute(&self, builder: &mut SliceBuilder) {
        let by_id: HashMap<ElementId, &ElementFact> = self
            .elements
            .iter()
            .map(|fact| (fact.element_id(), fact))
            .collect();

        // Kinds keep first-seen order so slots and registrations are deterministic.
        let mut kinds: Vec<&str> = Vec::new();
        let mut elements_by_kind: HashMap<&str, Vec<Element>> = HashMap::new();
        let mut attributes: BTreeMap<(&str, &str), StaticAttributeValues> = BTreeMap::new();

        for fact in &self.elements {
            let kind = fact.kind.as_str();
            if !elements_by_kind.contains_key(kind) {
                kinds.push(kind);
            }
            let id = fact.element_id();
            elements_by_kind
                .entry(kind)
                .or_default()
                .push(Element::new(id.clone(), ArchitectureTypes::element_kind(kind)));
            for (name, value) in &fact.attributes {
                attributes
                    .entry((kind, name.as_str()))
                    .or_default()
                    .insert(id.clone(), value.clone());
            }
        }

        for kind in &kinds {
            let elements = elements_by_kind.remove(kind).unwrap_or_default();
            builder.add_root_elements(
                ArchitectureTypes::element_kind(kind),
                StaticElements(elements),
            );
        }

        for ((kind, name), values) in attributes {
            builder.add_element_attribute(ArchitectureTypes::element_kind(kind), name, values);
        }

        let mut link_groups: Vec<((&str, &str, &str), StaticLinks)> = Vec::new();
        for link in &self.links {
            let (Some(source), Some(target)) = (
                self.resolve_ref(&link.source, &by_id),
                self.resolve_ref(&link.target, &by_id),
            ) else {
                tracing::warn!(
                    source = %link.source,
                    target = %link.target,
                    kind = %link.kind,
                    "link refers to an unknown element; skipping"
                );
                continue;
            };

            let key = (link.kind.as_str(), source.kind.as_str(), target.kind.as_str());
            let target_element = Element::new(
                target.element_id(),
                ArchitectureTypes::element_kind(&target.kind),
            );
            match link_groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, links)) => links.insert(source.element_id(), target_element),
                None => {
                    let mut links = StaticLinks::default();
                    links.insert(source.element_id(), target_element);
                    link_groups.push((key, links));
                }
            }
        }

        for ((link_kind, source_kind, target_kind), links) in link_groups {
            builder.add_links(
                ArchitectureTypes::link_kind(link_kind),
                ArchitectureTypes::element_kind(source_kind),
                ArchitectureTypes::element_kind(target_kind),
                links,
            );
        }
    }
}
