use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::algebra::{ElementType, LinkType};
use crate::errors::{Result, SliceError};
use crate::types::{Element, ElementId};

use super::provider::{AttributeLoader, LinkLoader, RootElementLoader, SliceContributor};
use super::query::{AttributeRegistration, LinkRegistration, RootSlot, Slice};

/// Accumulates provider registrations and freezes them into a [`Slice`].
///
/// Registrations for the same element type from different providers are
/// unioned, never overwritten.
#[derive(Default)]
pub struct SliceBuilder {
    roots: Vec<(ElementType, Arc<dyn RootElementLoader>)>,
    attributes: Vec<(ElementType, String, Arc<dyn AttributeLoader>)>,
    links: Vec<LinkRegistration>,
}

impl SliceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a one-shot enumeration of the elements of `element_type`.
    pub fn add_root_elements(
        &mut self,
        element_type: ElementType,
        loader: impl RootElementLoader + 'static,
    ) -> &mut Self {
        self.roots.push((element_type, Arc::new(loader)));
        self
    }

    /// Registers a lazy loader for attribute `name` on elements of `element_type`.
    pub fn add_element_attribute(
        &mut self,
        element_type: ElementType,
        name: impl Into<String>,
        loader: impl AttributeLoader + 'static,
    ) -> &mut Self {
        self.attributes
            .push((element_type, name.into(), Arc::new(loader)));
        self
    }

    /// Registers a lazy loader for links of `link_type` between the given
    /// source and target element types.
    pub fn add_links(
        &mut self,
        link_type: LinkType,
        source_type: ElementType,
        target_type: ElementType,
        loader: impl LinkLoader + 'static,
    ) -> &mut Self {
        self.links.push(LinkRegistration {
            link_type,
            source_type,
            target_type,
            loader: Arc::new(loader),
        });
        self
    }

    /// Lets a provider register a whole fact fragment.
    pub fn add_contributor(&mut self, contributor: &dyn SliceContributor) -> &mut Self {
        contributor.contribute(self);
        self
    }

    /// Runs every root enumeration once and freezes the result.
    ///
    /// Fails with `ConflictingRegistration` when an element does not fit the
    /// slot it was registered under, or when one slot receives the same id
    /// under two types neither of which refines the other.
    pub async fn build(self) -> Result<Slice> {
        let mut slots: Vec<SlotAccumulator> = Vec::new();

        for (slot_type, loader) in &self.roots {
            let elements = loader.load_elements().await?;
            let index = match slots.iter().position(|s| s.slot_type == *slot_type) {
                Some(index) => index,
                None => {
                    slots.push(SlotAccumulator::new(slot_type.clone()));
                    slots.len() - 1
                }
            };
            for element in elements {
                slots[index].add(element)?;
            }
        }

        let mut element_types: HashMap<ElementId, ElementType> = HashMap::new();
        let mut frozen = Vec::with_capacity(slots.len());
        for slot in slots {
            for element in &slot.elements {
                let merged = match element_types.get(&element.id) {
                    Some(existing) => existing.union(&element.element_type),
                    None => element.element_type.clone(),
                };
                element_types.insert(element.id.clone(), merged);
            }
            debug!(slot = %slot.slot_type, count = slot.elements.len(), "froze element slot");
            frozen.push(RootSlot {
                slot_type: slot.slot_type,
                elements: slot.elements,
            });
        }

        let mut attributes: HashMap<String, Vec<AttributeRegistration>> = HashMap::new();
        for (element_type, name, loader) in self.attributes {
            attributes
                .entry(name)
                .or_default()
                .push(AttributeRegistration {
                    element_type,
                    loader,
                });
        }

        info!(
            elements = element_types.len(),
            slots = frozen.len(),
            attributes = attributes.len(),
            links = self.links.len(),
            "built slice"
        );

        Ok(Slice::new(frozen, element_types, attributes, self.links))
    }
}

struct SlotAccumulator {
    slot_type: ElementType,
    elements: Vec<Element>,
    positions: HashMap<ElementId, usize>,
}

impl SlotAccumulator {
    fn new(slot_type: ElementType) -> Self {
        Self {
            slot_type,
            elements: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn add(&mut self, element: Element) -> Result<()> {
        if !element.element_type.is_subset_or_equal(&self.slot_type) {
            return Err(SliceError::ConflictingRegistration {
                id: element.id.to_string(),
                message: format!(
                    "declared type {} does not fit slot {}",
                    element.element_type, self.slot_type
                ),
            });
        }

        let Some(&position) = self.positions.get(&element.id) else {
            self.positions
                .insert(element.id.clone(), self.elements.len());
            self.elements.push(element);
            return Ok(());
        };

        let existing = &mut self.elements[position];
        if existing.element_type == element.element_type
            || existing.element_type.is_subset_or_equal(&element.element_type)
        {
            return Ok(());
        }
        if element.element_type.is_subset_or_equal(&existing.element_type) {
            existing.element_type = element.element_type;
            return Ok(());
        }
        Err(SliceError::ConflictingRegistration {
            id: element.id.to_string(),
            message: format!(
                "registered as both {} and {} in slot {}",
                existing.element_type, element.element_type, self.slot_type
            ),
        })
    }
}
