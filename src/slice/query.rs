use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};

use crate::algebra::{ElementType, LinkType};
use crate::errors::{Result, SliceError};
use crate::types::{Element, ElementId};

use super::provider::{AttributeLoader, LinkLoader};

/// All elements registered under one element-type slot.
#[derive(Debug, Clone)]
pub(crate) struct RootSlot {
    pub(crate) slot_type: ElementType,
    pub(crate) elements: Vec<Element>,
}

pub(crate) struct AttributeRegistration {
    pub(crate) element_type: ElementType,
    pub(crate) loader: Arc<dyn AttributeLoader>,
}

pub(crate) struct LinkRegistration {
    pub(crate) link_type: LinkType,
    pub(crate) source_type: ElementType,
    pub(crate) target_type: ElementType,
    pub(crate) loader: Arc<dyn LinkLoader>,
}

/// The immutable, queryable fact graph.
///
/// The registered facts never change after [`super::SliceBuilder::build`].
/// Attribute values are memoised and link-target types are recorded as they
/// are discovered, both behind internal locks, so a `Slice` can be shared
/// across concurrent traversals by reference or `Arc`.
pub struct Slice {
    slots: Vec<RootSlot>,
    element_types: HashMap<ElementId, ElementType>,
    discovered: RwLock<HashMap<ElementId, ElementType>>,
    attributes: HashMap<String, Vec<AttributeRegistration>>,
    links: Vec<LinkRegistration>,
    attribute_cache: Mutex<HashMap<(String, ElementId), Option<String>>>,
}

impl Slice {
    pub(crate) fn new(
        slots: Vec<RootSlot>,
        element_types: HashMap<ElementId, ElementType>,
        attributes: HashMap<String, Vec<AttributeRegistration>>,
        links: Vec<LinkRegistration>,
    ) -> Self {
        Self {
            slots,
            element_types,
            discovered: RwLock::new(HashMap::new()),
            attributes,
            links,
            attribute_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the type of a registered or discovered element.
    pub fn get_element_type(&self, id: &ElementId) -> Result<ElementType> {
        if let Some(ty) = self.element_types.get(id) {
            return Ok(ty.clone());
        }
        if let Ok(discovered) = self.discovered.read() {
            if let Some(ty) = discovered.get(id) {
                return Ok(ty.clone());
            }
        }
        Err(SliceError::unknown_element(id))
    }

    /// Returns `true` if `id` has been registered or discovered.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.get_element_type(id).is_ok()
    }

    /// Number of distinct elements enumerated by root providers.
    pub fn element_count(&self) -> usize {
        self.element_types.len()
    }

    /// The element-type slots that root providers registered under.
    pub fn root_element_types(&self) -> Vec<ElementType> {
        self.slots.iter().map(|s| s.slot_type.clone()).collect()
    }

    /// Returns every root element whose declared type is a subset of `ty`.
    ///
    /// The result is a snapshot, ordered by slot registration and then by the
    /// order each provider enumerated its elements.
    pub async fn get_root_elements(&self, ty: &ElementType) -> Vec<Element> {
        let mut seen: HashSet<&ElementId> = HashSet::new();
        let mut result = Vec::new();
        for slot in &self.slots {
            for element in &slot.elements {
                if element.element_type.is_subset_or_equal(ty) && seen.insert(&element.id) {
                    result.push(element.clone());
                }
            }
        }
        result
    }

    /// Returns an explorer over links of exactly `link_type`.
    pub fn get_link_explorer(&self, link_type: &LinkType) -> LinkExplorer<'_> {
        let registrations = self
            .links
            .iter()
            .filter(|reg| reg.link_type == *link_type)
            .collect();
        LinkExplorer {
            slice: self,
            link_type: link_type.clone(),
            registrations,
        }
    }

    /// Returns a resolver for the attribute called `name`.
    pub fn get_attribute_provider(&self, name: &str) -> AttributeProvider<'_> {
        AttributeProvider {
            slice: self,
            name: name.to_string(),
        }
    }

    /// Names of every attribute with at least one registration.
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.keys().cloned().collect();
        names.sort();
        names
    }

    fn record_discovered(&self, element: &Element) {
        if self.element_types.contains_key(&element.id) {
            return;
        }
        if let Ok(mut discovered) = self.discovered.write() {
            let merged = match discovered.get(&element.id) {
                Some(existing) => existing.union(&element.element_type),
                None => element.element_type.clone(),
            };
            discovered.insert(element.id.clone(), merged);
        }
    }
}

/// Resolves targets of one link type.
pub struct LinkExplorer<'a> {
    slice: &'a Slice,
    link_type: LinkType,
    registrations: Vec<&'a LinkRegistration>,
}

impl LinkExplorer<'_> {
    pub fn link_type(&self) -> &LinkType {
        &self.link_type
    }

    /// Returns the targets of every link of this type leaving `source`.
    ///
    /// A source without such links yields an empty list. Targets are
    /// deduplicated by id, keeping the first occurrence.
    pub async fn get_target_elements(&self, source: &ElementId) -> Result<Vec<Element>> {
        let source_type = self.slice.get_element_type(source)?;
        let mut seen: HashSet<ElementId> = HashSet::new();
        let mut targets = Vec::new();

        for reg in &self.registrations {
            if !source_type.any_subset_of(&reg.source_type) {
                continue;
            }
            let loaded = reg.loader.load_targets(source).await?;
            for target in loaded {
                if !target.element_type.any_subset_of(&reg.target_type) {
                    warn!(
                        source = %source,
                        target = %target.id,
                        link = %self.link_type,
                        "link target does not match the registered target type; skipping"
                    );
                    continue;
                }
                if seen.insert(target.id.clone()) {
                    self.slice.record_discovered(&target);
                    targets.push(target);
                }
            }
        }

        debug!(source = %source, link = %self.link_type, count = targets.len(), "explored links");
        Ok(targets)
    }
}

/// Lazily resolves one named attribute for individual elements.
pub struct AttributeProvider<'a> {
    slice: &'a Slice,
    name: String,
}

impl AttributeProvider<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves the attribute value, failing with `AttributeNotApplicable`
    /// when the element's type has no provider for it or the provider has no
    /// non-empty value.
    pub async fn resolve(&self, id: &ElementId) -> Result<String> {
        self.try_resolve(id)
            .await?
            .ok_or_else(|| SliceError::AttributeNotApplicable {
                attribute: self.name.clone(),
                id: id.to_string(),
            })
    }

    /// Like [`AttributeProvider::resolve`], but reports absence as `Ok(None)`.
    pub async fn try_resolve(&self, id: &ElementId) -> Result<Option<String>> {
        let element_type = self.slice.get_element_type(id)?;
        let key = (self.name.clone(), id.clone());

        if let Ok(cache) = self.slice.attribute_cache.lock() {
            if let Some(cached) = cache.get(&key) {
                return Ok(cached.clone());
            }
        }

        let mut value = None;
        if let Some(registrations) = self.slice.attributes.get(&self.name) {
            for reg in registrations {
                if !element_type.any_subset_of(&reg.element_type) {
                    continue;
                }
                if let Some(loaded) = reg.loader.load_attribute(id).await? {
                    if !loaded.is_empty() {
                        value = Some(loaded);
                        break;
                    }
                }
            }
        }

        if let Ok(mut cache) = self.slice.attribute_cache.lock() {
            cache.insert(key, value.clone());
        }
        Ok(value)
    }
}
