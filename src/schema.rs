//! Catalog of architecture element kinds, link kinds and attribute names.

use crate::algebra::{ElementType, LinkType};

/// Attribute names attached to elements and links.
pub mod attributes {
    /// Classification key shared by every element and link type.
    pub const KIND: &str = "Kind";

    pub const VERB: &str = "Verb";
    pub const ROUTE: &str = "Route";
    pub const BASE_URL: &str = "BaseUrl";
    pub const CONFIG_KEY: &str = "ConfigKey";
    pub const CLIENT_METHOD: &str = "ClientMethod";
    pub const EXTERNAL: &str = "External";
    pub const CONTRACT: &str = "Contract";
    pub const ENTITY: &str = "Entity";
    pub const TABLE: &str = "Table";
    pub const PROVENANCE: &str = "Provenance";
    pub const CONFIDENCE: &str = "Confidence";
    pub const SERVICE_NAME: &str = "ServiceName";
    pub const REPOSITORY_NAME: &str = "RepositoryName";
    pub const DATABASE_NAME: &str = "DatabaseName";
    pub const QUEUE_NAME: &str = "QueueName";
    pub const TOPIC_NAME: &str = "TopicName";
    pub const MESSAGE_TYPE: &str = "MessageType";
    pub const CODE_LOCATION: &str = "CodeLocation";

    /// Attributes resolved for every node of a flow tree by default.
    pub const FLOW_DEFAULTS: &[&str] = &[
        SERVICE_NAME,
        VERB,
        ROUTE,
        BASE_URL,
        REPOSITORY_NAME,
        DATABASE_NAME,
        QUEUE_NAME,
        TOPIC_NAME,
        MESSAGE_TYPE,
        ENTITY,
        TABLE,
        CONTRACT,
        PROVENANCE,
        CONFIDENCE,
    ];
}

/// Values of the `Kind` attribute for elements.
pub mod element_kinds {
    pub const ENDPOINT_CONTROLLER: &str = "endpoint.controller";
    pub const ENDPOINT_MINIMAL_API: &str = "endpoint.minimal_api";
    pub const CONTROLLER_ACTION: &str = "controller.action";
    pub const HTTP_CLIENT: &str = "http.client";
    pub const CQRS_REQUEST: &str = "cqrs.request";
    pub const CQRS_HANDLER: &str = "cqrs.handler";
    pub const NOTIFICATION_HANDLER: &str = "notification.handler";
    pub const EF_DB_CONTEXT: &str = "ef.db_context";
    pub const EF_ENTITY: &str = "ef.entity";
    pub const DB_TABLE: &str = "db.table";
    pub const DATABASE: &str = "db.database";
    pub const REPOSITORY: &str = "app.repository";
    pub const MESSAGE_PUBLISHER: &str = "message.publisher";
    pub const MESSAGE_CONTRACT: &str = "message.contract";
    pub const QUEUE: &str = "message.queue";
    pub const TOPIC: &str = "message.topic";
    pub const APP_SERVICE: &str = "app.service";
    pub const BACKGROUND_SERVICE: &str = "app.background_service";
    pub const CONFIG_OPTIONS: &str = "config.options";
    pub const CACHE_OPERATION: &str = "cache.operation";

    pub const ALL: &[&str] = &[
        ENDPOINT_CONTROLLER,
        ENDPOINT_MINIMAL_API,
        CONTROLLER_ACTION,
        HTTP_CLIENT,
        CQRS_REQUEST,
        CQRS_HANDLER,
        NOTIFICATION_HANDLER,
        EF_DB_CONTEXT,
        EF_ENTITY,
        DB_TABLE,
        DATABASE,
        REPOSITORY,
        MESSAGE_PUBLISHER,
        MESSAGE_CONTRACT,
        QUEUE,
        TOPIC,
        APP_SERVICE,
        BACKGROUND_SERVICE,
        CONFIG_OPTIONS,
        CACHE_OPERATION,
    ];
}

/// Values of the `Kind` attribute for links.
pub mod link_kinds {
    pub const CALLS: &str = "calls";
    pub const SENDS_REQUEST: &str = "sends_request";
    pub const HANDLED_BY: &str = "handled_by";
    pub const PROCESSED_BY: &str = "processed_by";
    pub const USES_CLIENT: &str = "uses_client";
    pub const USES_SERVICE: &str = "uses_service";
    pub const USES_STORAGE: &str = "uses_storage";
    pub const USES_CACHE: &str = "uses_cache";
    pub const READS_FROM: &str = "reads_from";
    pub const WRITES_TO: &str = "writes_to";
    pub const QUERIES: &str = "queries";
    pub const PUBLISHES: &str = "publishes";
    pub const PUBLISHES_TO: &str = "publishes_to";
    pub const CONSUMES_FROM: &str = "consumes_from";
    pub const MAPS_TO: &str = "maps_to";

    /// Link kinds a flow follows by default, in exploration order.
    pub const FLOW_DEFAULTS: &[&str] = &[
        CALLS,
        SENDS_REQUEST,
        HANDLED_BY,
        USES_CLIENT,
        USES_SERVICE,
        USES_STORAGE,
        WRITES_TO,
        READS_FROM,
        QUERIES,
        PUBLISHES,
        PUBLISHES_TO,
        CONSUMES_FROM,
    ];
}

/// Coarse node-type labels attached to flow nodes.
pub mod node_types {
    pub const ENDPOINT: &str = "Endpoint";
    pub const HTTP_CLIENT: &str = "HttpClient";
    pub const REPOSITORY: &str = "Repository";
    pub const DATABASE: &str = "Database";
    pub const QUEUE: &str = "Queue";
    pub const TOPIC: &str = "Topic";
    pub const BACKGROUND_SERVICE: &str = "BackgroundService";
    pub const SERVICE: &str = "Service";
    pub const UNKNOWN: &str = "Unknown";
}

/// Strongly typed handles to the architecture element and link types.
#[derive(Debug, Clone)]
pub struct ArchitectureTypes {
    pub endpoint_controller: ElementType,
    pub endpoint_minimal_api: ElementType,
    pub controller_action: ElementType,
    pub http_client: ElementType,
    pub cqrs_request: ElementType,
    pub cqrs_handler: ElementType,
    pub notification_handler: ElementType,
    pub ef_db_context: ElementType,
    pub ef_entity: ElementType,
    pub db_table: ElementType,
    pub database: ElementType,
    pub repository: ElementType,
    pub message_publisher: ElementType,
    pub message_contract: ElementType,
    pub queue: ElementType,
    pub topic: ElementType,
    pub app_service: ElementType,
    pub background_service: ElementType,
    pub config_options: ElementType,
    pub cache_operation: ElementType,

    pub calls: LinkType,
    pub sends_request: LinkType,
    pub handled_by: LinkType,
    pub processed_by: LinkType,
    pub uses_client: LinkType,
    pub uses_service: LinkType,
    pub uses_storage: LinkType,
    pub uses_cache: LinkType,
    pub reads_from: LinkType,
    pub writes_to: LinkType,
    pub queries: LinkType,
    pub publishes: LinkType,
    pub publishes_to: LinkType,
    pub consumes_from: LinkType,
    pub maps_to: LinkType,
}

impl Default for ArchitectureTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchitectureTypes {
    pub fn new() -> Self {
        use element_kinds as ek;
        use link_kinds as lk;

        Self {
            endpoint_controller: Self::element_kind(ek::ENDPOINT_CONTROLLER),
            endpoint_minimal_api: Self::element_kind(ek::ENDPOINT_MINIMAL_API),
            controller_action: Self::element_kind(ek::CONTROLLER_ACTION),
            http_client: Self::element_kind(ek::HTTP_CLIENT),
            cqrs_request: Self::element_kind(ek::CQRS_REQUEST),
            cqrs_handler: Self::element_kind(ek::CQRS_HANDLER),
            notification_handler: Self::element_kind(ek::NOTIFICATION_HANDLER),
            ef_db_context: Self::element_kind(ek::EF_DB_CONTEXT),
            ef_entity: Self::element_kind(ek::EF_ENTITY),
            db_table: Self::element_kind(ek::DB_TABLE),
            database: Self::element_kind(ek::DATABASE),
            repository: Self::element_kind(ek::REPOSITORY),
            message_publisher: Self::element_kind(ek::MESSAGE_PUBLISHER),
            message_contract: Self::element_kind(ek::MESSAGE_CONTRACT),
            queue: Self::element_kind(ek::QUEUE),
            topic: Self::element_kind(ek::TOPIC),
            app_service: Self::element_kind(ek::APP_SERVICE),
            background_service: Self::element_kind(ek::BACKGROUND_SERVICE),
            config_options: Self::element_kind(ek::CONFIG_OPTIONS),
            cache_operation: Self::element_kind(ek::CACHE_OPERATION),

            calls: Self::link_kind(lk::CALLS),
            sends_request: Self::link_kind(lk::SENDS_REQUEST),
            handled_by: Self::link_kind(lk::HANDLED_BY),
            processed_by: Self::link_kind(lk::PROCESSED_BY),
            uses_client: Self::link_kind(lk::USES_CLIENT),
            uses_service: Self::link_kind(lk::USES_SERVICE),
            uses_storage: Self::link_kind(lk::USES_STORAGE),
            uses_cache: Self::link_kind(lk::USES_CACHE),
            reads_from: Self::link_kind(lk::READS_FROM),
            writes_to: Self::link_kind(lk::WRITES_TO),
            queries: Self::link_kind(lk::QUERIES),
            publishes: Self::link_kind(lk::PUBLISHES),
            publishes_to: Self::link_kind(lk::PUBLISHES_TO),
            consumes_from: Self::link_kind(lk::CONSUMES_FROM),
            maps_to: Self::link_kind(lk::MAPS_TO),
        }
    }

    /// The element type for an arbitrary `Kind` value.
    pub fn element_kind(kind: &str) -> ElementType {
        ElementType::from_predicate(attributes::KIND, kind)
    }

    /// The link type for an arbitrary `Kind` value.
    pub fn link_kind(kind: &str) -> LinkType {
        LinkType::from_predicate(attributes::KIND, kind)
    }

    /// Any kind of HTTP entry point.
    pub fn endpoint(&self) -> ElementType {
        &(&self.endpoint_controller | &self.endpoint_minimal_api) | &self.controller_action
    }

    /// Elements that execute code on behalf of a request.
    pub fn procedure(&self) -> ElementType {
        &(&self.controller_action | &self.cqrs_handler) | &self.notification_handler
    }

    /// Application-level services, including CQRS and notification handlers.
    pub fn service(&self) -> ElementType {
        &(&self.app_service | &self.cqrs_handler) | &self.notification_handler
    }

    /// Union of every element kind in the catalog.
    pub fn any_element(&self) -> ElementType {
        element_kinds::ALL
            .iter()
            .map(|kind| Self::element_kind(kind))
            .fold(ElementType::empty(), |acc, ty| acc | ty)
    }

    /// Element types offered as flow roots.
    pub fn root_element_types(&self) -> Vec<ElementType> {
        vec![
            self.endpoint_controller.clone(),
            self.endpoint_minimal_api.clone(),
            self.background_service.clone(),
        ]
    }

    /// Ordered node classification table; the first matching entry wins.
    pub fn node_classification(&self) -> Vec<(String, ElementType)> {
        vec![
            (node_types::ENDPOINT.to_string(), self.endpoint()),
            (node_types::HTTP_CLIENT.to_string(), self.http_client.clone()),
            (
                node_types::REPOSITORY.to_string(),
                &self.repository | &self.ef_db_context,
            ),
            (
                node_types::DATABASE.to_string(),
                &self.database | &self.db_table,
            ),
            (node_types::QUEUE.to_string(), self.queue.clone()),
            (
                node_types::TOPIC.to_string(),
                &(&self.topic | &self.message_publisher) | &self.message_contract,
            ),
            (
                node_types::BACKGROUND_SERVICE.to_string(),
                self.background_service.clone(),
            ),
            (node_types::SERVICE.to_string(), self.service()),
        ]
    }

    /// Link types a flow follows by default, in exploration order.
    pub fn flow_link_types(&self) -> Vec<LinkType> {
        link_kinds::FLOW_DEFAULTS
            .iter()
            .map(|kind| Self::link_kind(kind))
            .collect()
    }
}
