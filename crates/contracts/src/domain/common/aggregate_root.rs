use super::{EntityMetadata, Origin};

/// Trait implemented by every aggregate root.
///
/// Instance methods expose the record's identity; the static methods carry
/// the aggregate's catalog metadata (index, storage collection, UI names).
pub trait AggregateRoot {
    /// Identifier type of the aggregate
    type Id;

    /// Record id
    fn id(&self) -> Self::Id;

    /// Business code
    fn code(&self) -> &str;

    /// Description
    fn description(&self) -> &str;

    /// Lifecycle metadata
    fn metadata(&self) -> &EntityMetadata;

    /// Mutable lifecycle metadata
    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Aggregate index in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Storage collection name (e.g. "product_profile")
    fn collection_name() -> &'static str;

    /// Singular UI name (e.g. "Modelo de Toner")
    fn element_name() -> &'static str;

    /// Plural UI name (e.g. "Modelos de Toner")
    fn list_name() -> &'static str;

    /// Where records of this aggregate come from by default
    fn origin() -> Origin;

    /// Full system name, e.g. "a001_product_profile"
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
