//! Shared type definitions for the variant-aware network changelog.
//!
//! This crate is the single source of truth for the values exchanged
//! between the host network model, the changelog and the export pipeline.
//!
//! # Modules
//!
//! - [`ids`] -- String-backed identifiers for entities and variants
//! - [`enums`] -- Entity kinds, classifications, scopes and change kinds
//! - [`value`] -- Typed attribute values carried by updates
//! - [`records`] -- Mutation inputs and sequenced change records

pub mod enums;
pub mod ids;
pub mod records;
pub mod value;

// Re-export all public types at crate root for convenience.
pub use enums::{ChangeKind, Classification, EntityKind, Scope};
pub use ids::{EntityId, INITIAL_VARIANT_ID, VariantId};
pub use records::{ChangeRecord, Mutation};
pub use value::AttributeValue;
