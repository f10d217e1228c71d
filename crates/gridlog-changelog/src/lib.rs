//! Variant-aware changelog of network model mutations.
//!
//! Every creation, update and removal applied to a multi-variant network
//! model is recorded here, tagged with a global sequence number and a
//! visibility scope. The changelog can then reconstruct, for any variant,
//! the exact ordered list of changes that variant can see -- including
//! variants cloned from others at arbitrary points in time. Exporters use
//! that list to produce incremental updates instead of re-serializing the
//! whole model.
//!
//! # Architecture
//!
//! - [`classifier`] -- The [`Classifier`] table deciding whether an update
//!   is shared or variant-local.
//! - [`history`] -- The persistent [`History`] list giving O(1) variant
//!   clones.
//! - [`changelog`] -- The [`Changelog`] store: append, query, clone, remove.
//! - [`sink`] -- Boundary traits the host model and variant manager call.
//! - [`query`] -- The read surface consumed by export pipelines.
//! - [`shared`] -- [`SharedChangelog`], a lock-guarded handle for
//!   multi-threaded hosts.
//!
//! # Visibility
//!
//! | Record | Scope | Visible to |
//! |--------|-------|------------|
//! | Creation | shared | every variant, including earlier clones |
//! | Removal | shared | every variant, including earlier clones |
//! | Update (static parameter) | shared | every variant, including earlier clones |
//! | Update (setpoint, state) | variant-local | recording variant and its later clones |
//!
//! The changelog never panics; contract violations by the host are
//! returned as [`ChangelogError`].

pub mod changelog;
pub mod classifier;
pub mod history;
pub mod query;
pub mod shared;
pub mod sink;

// Re-export primary types at crate root.
pub use changelog::Changelog;
pub use classifier::{ClassificationRule, Classifier};
pub use history::History;
pub use query::{ChangeQuery, ExportChange, export_changes, net_updates};
pub use shared::SharedChangelog;
pub use sink::{MutationSink, VariantLifecycle, WorkingVariant};

use gridlog_types::VariantId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors returned by changelog operations.
///
/// All of them signal a boundary-contract violation by the caller. None is
/// transient and none should be retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChangelogError {
    /// The variant was never registered.
    #[error("unknown variant: {variant_id}")]
    UnknownVariant {
        /// The offending variant id.
        variant_id: VariantId,
    },

    /// A clone targeted a variant id that is already registered.
    #[error("variant already registered: {variant_id}")]
    DuplicateVariant {
        /// The offending variant id.
        variant_id: VariantId,
    },

    /// The variant reached the removed state.
    #[error("variant has been removed: {variant_id}")]
    RemovedVariant {
        /// The offending variant id.
        variant_id: VariantId,
    },

    /// A mutation was reported while the host had no working variant.
    #[error("no working variant is set")]
    NoWorkingVariant,

    /// The sequence counter cannot advance any further.
    #[error("sequence counter exhausted")]
    SequenceExhausted,

    /// A thread panicked while holding the changelog lock.
    #[error("changelog lock poisoned")]
    LockPoisoned,
}
