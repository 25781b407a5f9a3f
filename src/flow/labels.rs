use async_trait::async_trait;

use crate::schema::{attributes, link_kinds, ArchitectureTypes};
use crate::slice::Slice;
use crate::types::ElementId;

/// Supplies human-readable labels for rendered nodes and edges.
#[async_trait]
pub trait LabelProvider: Send + Sync {
    async fn element_label(&self, id: &ElementId) -> String;

    fn link_label(&self, link_kind: &str) -> String {
        link_kind.replace('_', " ")
    }
}

/// Labels elements from their architecture kind and attributes.
pub struct ArchitectureLabeler<'a> {
    slice: &'a Slice,
    types: ArchitectureTypes,
}

impl<'a> ArchitectureLabeler<'a> {
    pub fn new(slice: &'a Slice, types: ArchitectureTypes) -> Self {
        Self { slice, types }
    }

    async fn attribute(&self, id: &ElementId, name: &str) -> Option<String> {
        self.slice
            .get_attribute_provider(name)
            .try_resolve(id)
            .await
            .ok()
            .flatten()
    }
}

#[async_trait]
impl LabelProvider for ArchitectureLabeler<'_> {
    async fn element_label(&self, id: &ElementId) -> String {
        let Ok(ty) = self.slice.get_element_type(id) else {
            return id.to_string();
        };

        let verb = self.attribute(id, attributes::VERB).await;
        let route = self.attribute(id, attributes::ROUTE).await;
        let entity = self.attribute(id, attributes::ENTITY).await;
        let table = self.attribute(id, attributes::TABLE).await;
        let contract = self.attribute(id, attributes::CONTRACT).await;
        let t = &self.types;

        if ty.any_subset_of(&t.endpoint()) {
            return match (verb, route) {
                (Some(verb), Some(route)) => format!("{} {}", verb, route),
                (None, Some(route)) => route,
                _ => "Endpoint".to_string(),
            };
        }
        if ty.any_subset_of(&t.http_client) {
            return match (verb, route) {
                (Some(verb), Some(route)) => format!("HTTP {} → {}", verb, route),
                (None, Some(route)) => format!("HTTP → {}", route),
                _ => "HTTP Client".to_string(),
            };
        }
        if ty.any_subset_of(&t.repository) {
            let subject = entity.or(table).unwrap_or_else(|| "Unknown".to_string());
            return format!("Repository: {}", subject);
        }
        if ty.any_subset_of(&t.ef_db_context) {
            return format!("DbContext: {}", entity.as_deref().unwrap_or("Unknown"));
        }
        if ty.any_subset_of(&t.db_table) {
            return format!("Table: {}", table.as_deref().unwrap_or("Unknown"));
        }
        if ty.any_subset_of(&t.message_publisher) {
            return format!("Publisher: {}", contract.as_deref().unwrap_or("Unknown"));
        }
        if ty.any_subset_of(&t.message_contract) {
            return format!("Message: {}", contract.as_deref().unwrap_or("Unknown"));
        }
        if ty.any_subset_of(&t.cqrs_handler) {
            return "CQRS Handler".to_string();
        }
        if ty.any_subset_of(&t.background_service) {
            return "Background Service".to_string();
        }

        id.to_string()
    }

    fn link_label(&self, link_kind: &str) -> String {
        let label = match link_kind {
            link_kinds::CALLS => "calls",
            link_kinds::SENDS_REQUEST => "sends HTTP request",
            link_kinds::HANDLED_BY => "handled by",
            link_kinds::PROCESSED_BY => "processed by",
            link_kinds::USES_CLIENT => "uses client",
            link_kinds::USES_SERVICE => "uses service",
            link_kinds::USES_STORAGE => "uses storage",
            link_kinds::PUBLISHES => "publishes",
            link_kinds::QUERIES => "queries",
            link_kinds::READS_FROM => "reads from",
            link_kinds::WRITES_TO => "writes to",
            link_kinds::MAPS_TO => "maps to",
            _ => "links to",
        };
        label.to_string()
    }
}
