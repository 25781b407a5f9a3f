//! Seams through which external fact providers contribute to a slice.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{Element, ElementId};

use super::builder::SliceBuilder;

/// Enumerates every element of one element type. Invoked once, at build time.
#[async_trait]
pub trait RootElementLoader: Send + Sync {
    async fn load_elements(&self) -> Result<Vec<Element>>;
}

/// Loads one attribute for one element.
///
/// `Ok(None)` means the attribute does not apply to the element.
#[async_trait]
pub trait AttributeLoader: Send + Sync {
    async fn load_attribute(&self, id: &ElementId) -> Result<Option<String>>;
}

/// Loads the targets of one link type for a source element.
#[async_trait]
pub trait LinkLoader: Send + Sync {
    async fn load_targets(&self, source: &ElementId) -> Result<Vec<Element>>;
}

/// A provider that registers a whole fragment of facts at once.
pub trait SliceContributor {
    fn contribute(&self, builder: &mut SliceBuilder);
}

/// A fixed list of elements.
#[derive(Debug, Clone, Default)]
pub struct StaticElements(pub Vec<Element>);

#[async_trait]
impl RootElementLoader for StaticElements {
    async fn load_elements(&self) -> Result<Vec<Element>> {
        Ok(self.0.clone())
    }
}

/// Attribute values held in memory, keyed by element.
#[derive(Debug, Clone, Default)]
pub struct StaticAttributeValues(pub HashMap<ElementId, String>);

impl StaticAttributeValues {
    pub fn insert(&mut self, id: impl Into<ElementId>, value: impl Into<String>) {
        self.0.insert(id.into(), value.into());
    }
}

#[async_trait]
impl AttributeLoader for StaticAttributeValues {
    async fn load_attribute(&self, id: &ElementId) -> Result<Option<String>> {
        Ok(self.0.get(id).cloned())
    }
}

/// Link targets held in memory, keyed by source element.
///
/// Targets keep their insertion order, which keeps traversals deterministic.
#[derive(Debug, Clone, Default)]
pub struct StaticLinks(pub HashMap<ElementId, Vec<Element>>);

impl StaticLinks {
    pub fn insert(&mut self, source: impl Into<ElementId>, target: Element) {
        self.0.entry(source.into()).or_default().push(target);
    }
}

#[async_trait]
impl LinkLoader for StaticLinks {
    async fn load_targets(&self, source: &ElementId) -> Result<Vec<Element>> {
        Ok(self.0.get(source).cloned().unwrap_or_default())
    }
}
