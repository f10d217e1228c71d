//! Read surface consumed by export pipelines.
//!
//! An incremental exporter (for instance one producing a CGMES steady
//! state hypothesis delta) asks for the changes visible to one variant and
//! walks them in the given order. It must not re-sort them: the order is
//! the global sequence order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gridlog_types::{AttributeValue, ChangeKind, ChangeRecord, EntityId, EntityKind, VariantId};

use crate::ChangelogError;
use crate::changelog::Changelog;

/// Source of per-variant change lists.
pub trait ChangeQuery {
    /// Every change visible to `variant_id`, ascending by sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError`] if the variant is unknown or removed.
    fn changes_for_variant(
        &self,
        variant_id: &VariantId,
    ) -> Result<Vec<ChangeRecord>, ChangelogError>;
}

impl ChangeQuery for Changelog {
    fn changes_for_variant(
        &self,
        variant_id: &VariantId,
    ) -> Result<Vec<ChangeRecord>, ChangelogError> {
        Ok(self
            .changes_visible_to(variant_id)?
            .into_iter()
            .cloned()
            .collect())
    }
}

/// The part of a change record an exporter needs.
///
/// Old values and sequence numbers are left out; they only serve
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportChange {
    /// The object that changed.
    pub entity_id: EntityId,
    /// Its kind.
    pub entity_kind: EntityKind,
    /// Creation, update or removal.
    pub kind: ChangeKind,
    /// Attribute name, for updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Value after the update, for updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<AttributeValue>,
}

impl From<&ChangeRecord> for ExportChange {
    fn from(record: &ChangeRecord) -> Self {
        Self {
            entity_id: record.entity_id().clone(),
            entity_kind: record.entity_kind(),
            kind: record.kind(),
            attribute: record.attribute().map(str::to_owned),
            new_value: record.new_value().cloned(),
        }
    }
}

/// Project the changes visible to `variant_id` for export, keeping order.
///
/// # Errors
///
/// Returns [`ChangelogError`] if the variant is unknown or removed.
pub fn export_changes<Q>(
    query: &Q,
    variant_id: &VariantId,
) -> Result<Vec<ExportChange>, ChangelogError>
where
    Q: ChangeQuery + ?Sized,
{
    Ok(query
        .changes_for_variant(variant_id)?
        .iter()
        .map(ExportChange::from)
        .collect())
}

/// Final value of every updated attribute, keyed by entity and attribute.
///
/// Later updates win. Attributes of an entity are dropped when a removal of
/// that entity follows them; a re-creation starts from an empty set again.
pub fn net_updates(records: &[ChangeRecord]) -> BTreeMap<(EntityId, String), AttributeValue> {
    let mut values: BTreeMap<(EntityId, String), AttributeValue> = BTreeMap::new();
    for record in records {
        match record {
            ChangeRecord::Update {
                entity_id,
                attribute,
                new_value,
                ..
            } => {
                values.insert((entity_id.clone(), attribute.clone()), new_value.clone());
            }
            ChangeRecord::Removal { entity_id, .. } => {
                values.retain(|(id, _), _| id != entity_id);
            }
            ChangeRecord::Creation { .. } => {}
        }
    }
    values
}
