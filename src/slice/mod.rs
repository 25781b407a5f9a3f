/// Freezes provider registrations into a slice.
pub mod builder;

/// Provider traits and in-memory loaders.
pub mod provider;

/// Read-only queries over a built slice.
pub mod query;

pub use builder::SliceBuilder;
pub use provider::{
    AttributeLoader, LinkLoader, RootElementLoader, SliceContributor, StaticAttributeValues,
    StaticElements, StaticLinks,
};
pub use query::{AttributeProvider, LinkExplorer, Slice};
