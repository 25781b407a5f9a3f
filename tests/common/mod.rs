#![allow(dead_code)]

use std::collections::BTreeMap;

use flowslice::algebra::ElementType;
use flowslice::schema::ArchitectureTypes;
use flowslice::slice::{Slice, SliceBuilder, StaticAttributeValues, StaticElements, StaticLinks};
use flowslice::types::{Element, ElementId};

/// Element type for a `Kind` value.
pub fn kind(k: &str) -> ElementType {
    ArchitectureTypes::element_kind(k)
}

pub fn id(value: &str) -> ElementId {
    ElementId::new(value)
}

/// Builds a slice from `(id, kind)` elements, `(source, link_kind, target)`
/// links and `(id, attribute, value)` attributes.
///
/// Every link kind is registered once, between the union of all element
/// kinds used, so link order follows the order given here.
pub async fn build_slice(
    elements: &[(&str, &str)],
    links: &[(&str, &str, &str)],
    attributes: &[(&str, &str, &str)],
) -> Slice {
    let kind_of: BTreeMap<&str, &str> = elements.iter().copied().collect();

    let mut kinds: Vec<&str> = Vec::new();
    for (_, k) in elements {
        if !kinds.contains(k) {
            kinds.push(*k);
        }
    }
    let any = kinds
        .iter()
        .map(|k| kind(k))
        .fold(ElementType::empty(), |acc, ty| acc | ty);

    let mut builder = SliceBuilder::new();
    for k in &kinds {
        let members = elements
            .iter()
            .filter(|(_, ek)| ek == k)
            .map(|(eid, ek)| Element::new(*eid, kind(ek)))
            .collect();
        builder.add_root_elements(kind(k), StaticElements(members));
    }

    let mut link_kinds: Vec<&str> = Vec::new();
    for (_, lk, _) in links {
        if !link_kinds.contains(lk) {
            link_kinds.push(*lk);
        }
    }
    for lk in link_kinds {
        let mut loader = StaticLinks::default();
        for (source, _, target) in links.iter().filter(|(_, l, _)| *l == lk) {
            loader.insert(*source, Element::new(*target, kind(kind_of[target])));
        }
        builder.add_links(ArchitectureTypes::link_kind(lk), any.clone(), any.clone(), loader);
    }

    let mut grouped: BTreeMap<(&str, &str), StaticAttributeValues> = BTreeMap::new();
    for (eid, name, value) in attributes {
        grouped
            .entry((kind_of[eid], *name))
            .or_default()
            .insert(*eid, *value);
    }
    for ((k, name), values) in grouped {
        builder.add_element_attribute(kind(k), name, values);
    }

    builder.build().await.expect("slice should build")
}
