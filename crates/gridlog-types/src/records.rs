//! Mutation inputs and the immutable change records built from them.
//!
//! A [`Mutation`] is what the host network model reports. The changelog
//! assigns it a global sequence number and a visibility [`Scope`], producing
//! a [`ChangeRecord`] that is never modified afterwards.

use serde::{Deserialize, Serialize};

use crate::enums::{ChangeKind, EntityKind, Scope};
use crate::ids::EntityId;
use crate::value::AttributeValue;

// ---------------------------------------------------------------------------
// Mutation (input)
// ---------------------------------------------------------------------------

/// A mutation reported by the host model, before sequencing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum Mutation {
    /// A network object was created.
    Creation {
        /// The created object.
        entity_id: EntityId,
        /// Its kind.
        entity_kind: EntityKind,
    },
    /// An attribute of a network object changed.
    Update {
        /// The updated object.
        entity_id: EntityId,
        /// Its kind.
        entity_kind: EntityKind,
        /// Attribute name as exposed by the model (e.g. `targetP`).
        attribute: String,
        /// Value before the update.
        old_value: AttributeValue,
        /// Value after the update.
        new_value: AttributeValue,
    },
    /// A network object was removed.
    Removal {
        /// The removed object.
        entity_id: EntityId,
        /// Its kind.
        entity_kind: EntityKind,
    },
}

impl Mutation {
    /// Shorthand for [`Mutation::Creation`].
    pub fn creation(entity_id: impl Into<EntityId>, entity_kind: EntityKind) -> Self {
        Self::Creation {
            entity_id: entity_id.into(),
            entity_kind,
        }
    }

    /// Shorthand for [`Mutation::Update`].
    pub fn update(
        entity_id: impl Into<EntityId>,
        entity_kind: EntityKind,
        attribute: impl Into<String>,
        old_value: impl Into<AttributeValue>,
        new_value: impl Into<AttributeValue>,
    ) -> Self {
        Self::Update {
            entity_id: entity_id.into(),
            entity_kind,
            attribute: attribute.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    /// Shorthand for [`Mutation::Removal`].
    pub fn removal(entity_id: impl Into<EntityId>, entity_kind: EntityKind) -> Self {
        Self::Removal {
            entity_id: entity_id.into(),
            entity_kind,
        }
    }

    /// The kind of mutation.
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Creation { .. } => ChangeKind::Creation,
            Self::Update { .. } => ChangeKind::Update,
            Self::Removal { .. } => ChangeKind::Removal,
        }
    }

    /// The object the mutation applies to.
    pub const fn entity_id(&self) -> &EntityId {
        match self {
            Self::Creation { entity_id, .. }
            | Self::Update { entity_id, .. }
            | Self::Removal { entity_id, .. } => entity_id,
        }
    }

    /// The kind of the object the mutation applies to.
    pub const fn entity_kind(&self) -> EntityKind {
        match self {
            Self::Creation { entity_kind, .. }
            | Self::Update { entity_kind, .. }
            | Self::Removal { entity_kind, .. } => *entity_kind,
        }
    }

    /// Attach a sequence number and scope, producing the stored record.
    ///
    /// Creation and removal records are always [`Scope::Shared`]; the
    /// given scope only applies to updates.
    pub fn into_record(self, sequence: u64, scope: Scope) -> ChangeRecord {
        match self {
            Self::Creation {
                entity_id,
                entity_kind,
            } => ChangeRecord::Creation {
                sequence,
                entity_id,
                entity_kind,
            },
            Self::Update {
                entity_id,
                entity_kind,
                attribute,
                old_value,
                new_value,
            } => ChangeRecord::Update {
                sequence,
                entity_id,
                entity_kind,
                attribute,
                old_value,
                new_value,
                scope,
            },
            Self::Removal {
                entity_id,
                entity_kind,
            } => ChangeRecord::Removal {
                sequence,
                entity_id,
                entity_kind,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeRecord (stored)
// ---------------------------------------------------------------------------

/// One recorded mutation with its global order and visibility.
///
/// `sequence` is unique across all variants and strictly increasing in
/// append order; it is the only total order in the changelog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// A network object was created. Always shared.
    Creation {
        /// Global sequence number.
        sequence: u64,
        /// The created object.
        entity_id: EntityId,
        /// Its kind.
        entity_kind: EntityKind,
    },
    /// An attribute of a network object changed.
    Update {
        /// Global sequence number.
        sequence: u64,
        /// The updated object.
        entity_id: EntityId,
        /// Its kind.
        entity_kind: EntityKind,
        /// Attribute name.
        attribute: String,
        /// Value before the update.
        old_value: AttributeValue,
        /// Value after the update.
        new_value: AttributeValue,
        /// Which variants can see this update.
        scope: Scope,
    },
    /// A network object was removed. Always shared.
    Removal {
        /// Global sequence number.
        sequence: u64,
        /// The removed object.
        entity_id: EntityId,
        /// Its kind.
        entity_kind: EntityKind,
    },
}

/// Scope reported by creation and removal records.
static SHARED: Scope = Scope::Shared;

impl ChangeRecord {
    /// Global sequence number.
    pub const fn sequence(&self) -> u64 {
        match self {
            Self::Creation { sequence, .. }
            | Self::Update { sequence, .. }
            | Self::Removal { sequence, .. } => *sequence,
        }
    }

    /// The kind of mutation.
    pub const fn kind(&self) -> ChangeKind {
        match self {
            Self::Creation { .. } => ChangeKind::Creation,
            Self::Update { .. } => ChangeKind::Update,
            Self::Removal { .. } => ChangeKind::Removal,
        }
    }

    /// The object the change applies to.
    pub const fn entity_id(&self) -> &EntityId {
        match self {
            Self::Creation { entity_id, .. }
            | Self::Update { entity_id, .. }
            | Self::Removal { entity_id, .. } => entity_id,
        }
    }

    /// The kind of the object the change applies to.
    pub const fn entity_kind(&self) -> EntityKind {
        match self {
            Self::Creation { entity_kind, .. }
            | Self::Update { entity_kind, .. }
            | Self::Removal { entity_kind, .. } => *entity_kind,
        }
    }

    /// Visibility scope. Creation and removal are always shared.
    pub const fn scope(&self) -> &Scope {
        match self {
            Self::Update { scope, .. } => scope,
            Self::Creation { .. } | Self::Removal { .. } => &SHARED,
        }
    }

    /// Whether this record is an update.
    pub const fn is_update(&self) -> bool {
        matches!(self, Self::Update { .. })
    }

    /// Attribute name, for updates.
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::Update { attribute, .. } => Some(attribute),
            Self::Creation { .. } | Self::Removal { .. } => None,
        }
    }

    /// Value before the update, for updates.
    pub const fn old_value(&self) -> Option<&AttributeValue> {
        match self {
            Self::Update { old_value, .. } => Some(old_value),
            Self::Creation { .. } | Self::Removal { .. } => None,
        }
    }

    /// Value after the update, for updates.
    pub const fn new_value(&self) -> Option<&AttributeValue> {
        match self {
            Self::Update { new_value, .. } => Some(new_value),
            Self::Creation { .. } | Self::Removal { .. } => None,
        }
    }
}
