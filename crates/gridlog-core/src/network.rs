//! Minimal multi-variant network host.
//!
//! [`TrackedNetwork`] holds just enough of a network model to drive a
//! changelog the way a real model does: which objects exist, the values of
//! their attributes, and which of those values differ per variant. Shared
//! attributes are stored once per object; variant-local attributes are
//! stored per variant and copied when a variant is cloned.
//!
//! Every mutation is reported to the sink first and applied second, so a
//! rejected report leaves the model unchanged.

use std::collections::BTreeMap;

use tracing::debug;

use gridlog_changelog::{
    ChangeQuery, Changelog, ChangelogError, Classifier, MutationSink, VariantLifecycle,
};
use gridlog_types::{AttributeValue, ChangeRecord, Classification, EntityId, EntityKind, VariantId};

use crate::config::GridlogConfig;
use crate::variant::{VariantError, VariantManager};

/// Errors returned by network mutations and queries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    /// No object has this id.
    #[error("unknown entity: {entity_id}")]
    UnknownEntity {
        /// The offending id.
        entity_id: EntityId,
    },

    /// An object with this id already exists.
    #[error("entity already exists: {entity_id}")]
    DuplicateEntity {
        /// The offending id.
        entity_id: EntityId,
    },

    /// The object has no such attribute.
    #[error("entity {entity_id} has no attribute {attribute}")]
    UnknownAttribute {
        /// The object.
        entity_id: EntityId,
        /// The missing attribute.
        attribute: String,
    },

    /// A variant operation failed.
    #[error(transparent)]
    Variant(#[from] VariantError),

    /// The changelog rejected a report or query.
    #[error(transparent)]
    Changelog(#[from] ChangelogError),
}

/// Attribute values of one object.
#[derive(Debug, Clone)]
struct Entity {
    kind: EntityKind,
    shared: BTreeMap<String, AttributeValue>,
    local: BTreeMap<VariantId, BTreeMap<String, AttributeValue>>,
}

impl Entity {
    fn value(&self, variant_id: &VariantId, attribute: &str) -> Option<&AttributeValue> {
        self.shared.get(attribute).or_else(|| {
            self.local
                .get(variant_id)
                .and_then(|values| values.get(attribute))
        })
    }
}

/// A network model whose every mutation is reported to a sink.
///
/// The sink is usually a [`Changelog`]; any type implementing both
/// [`MutationSink`] and [`VariantLifecycle`] works.
#[derive(Debug, Clone)]
pub struct TrackedNetwork<S = Changelog> {
    classifier: Classifier,
    variants: VariantManager,
    entities: BTreeMap<EntityId, Entity>,
    sink: S,
}

impl TrackedNetwork<Changelog> {
    /// Build an empty network and changelog from configuration.
    pub fn from_config(config: &GridlogConfig) -> Self {
        Self::new(
            config.classification.build_classifier(),
            config.variants.initial_variant_id.clone(),
            config.build_changelog(),
        )
    }
}

impl<S> TrackedNetwork<S>
where
    S: MutationSink + VariantLifecycle,
{
    /// Create an empty network whose working variant is `initial`.
    ///
    /// `sink` must already know `initial`. `classifier` decides which
    /// attributes are stored per variant and should match the sink's.
    pub fn new(classifier: Classifier, initial: VariantId, sink: S) -> Self {
        Self {
            classifier,
            variants: VariantManager::new(initial),
            entities: BTreeMap::new(),
            sink,
        }
    }

    /// The sink receiving mutations.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The variant registry.
    pub const fn variants(&self) -> &VariantManager {
        &self.variants
    }

    /// Number of objects.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Kind of object `entity_id`, if it exists.
    pub fn entity_kind(&self, entity_id: &EntityId) -> Option<EntityKind> {
        self.entities.get(entity_id).map(|entity| entity.kind)
    }

    /// Create an object with its initial attribute values.
    ///
    /// The object exists in every variant. Variant-local attributes start
    /// with the same value in each of them. Only the creation is recorded;
    /// initial values are not reported as updates.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Variant`] if no working variant is set,
    /// [`NetworkError::DuplicateEntity`] if the id is taken, and sink errors
    /// as [`NetworkError::Changelog`].
    pub fn create(
        &mut self,
        entity_id: EntityId,
        kind: EntityKind,
        attributes: BTreeMap<String, AttributeValue>,
    ) -> Result<u64, NetworkError> {
        self.variants.working_variant_id()?;
        if self.entities.contains_key(&entity_id) {
            return Err(NetworkError::DuplicateEntity { entity_id });
        }
        let sequence = self.sink.on_create(&self.variants, entity_id.clone(), kind)?;

        let mut entity = Entity {
            kind,
            shared: BTreeMap::new(),
            local: BTreeMap::new(),
        };
        let mut local = BTreeMap::new();
        for (attribute, value) in attributes {
            match self.classifier.classify(kind, &attribute) {
                Classification::Shared => {
                    entity.shared.insert(attribute, value);
                }
                Classification::VariantLocal => {
                    local.insert(attribute, value);
                }
            }
        }
        for variant_id in self.variants.variant_ids() {
            entity.local.insert(variant_id.clone(), local.clone());
        }
        debug!(entity = %entity_id, %kind, sequence, "Entity created");
        self.entities.insert(entity_id, entity);
        Ok(sequence)
    }

    /// Set `attribute` of `entity_id` to `value` in the working variant.
    ///
    /// Shared attributes change for every variant at once.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownEntity`] or
    /// [`NetworkError::UnknownAttribute`] for a bad target,
    /// [`NetworkError::Variant`] if no working variant is set, and sink
    /// errors as [`NetworkError::Changelog`].
    pub fn update(
        &mut self,
        entity_id: &EntityId,
        attribute: &str,
        value: AttributeValue,
    ) -> Result<u64, NetworkError> {
        let working = self.variants.working_variant_id()?.clone();
        let entity = self
            .entities
            .get(entity_id)
            .ok_or_else(|| NetworkError::UnknownEntity {
                entity_id: entity_id.clone(),
            })?;
        let kind = entity.kind;
        let old_value = entity
            .value(&working, attribute)
            .cloned()
            .ok_or_else(|| NetworkError::UnknownAttribute {
                entity_id: entity_id.clone(),
                attribute: attribute.to_owned(),
            })?;

        let sequence = self.sink.on_update(
            &self.variants,
            entity_id.clone(),
            kind,
            attribute,
            old_value,
            value.clone(),
        )?;

        let entity = self
            .entities
            .get_mut(entity_id)
            .ok_or_else(|| NetworkError::UnknownEntity {
                entity_id: entity_id.clone(),
            })?;
        let slot = if entity.shared.contains_key(attribute) {
            entity.shared.get_mut(attribute)
        } else {
            entity
                .local
                .get_mut(&working)
                .and_then(|values| values.get_mut(attribute))
        };
        if let Some(slot) = slot {
            *slot = value;
        }
        Ok(sequence)
    }

    /// Remove object `entity_id` from every variant.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Variant`] if no working variant is set,
    /// [`NetworkError::UnknownEntity`] if the object does not exist, and
    /// sink errors as [`NetworkError::Changelog`].
    pub fn remove(&mut self, entity_id: &EntityId) -> Result<u64, NetworkError> {
        self.variants.working_variant_id()?;
        let kind = self
            .entity_kind(entity_id)
            .ok_or_else(|| NetworkError::UnknownEntity {
                entity_id: entity_id.clone(),
            })?;
        let sequence = self.sink.on_remove(&self.variants, entity_id.clone(), kind)?;
        self.entities.remove(entity_id);
        debug!(entity = %entity_id, %kind, sequence, "Entity removed");
        Ok(sequence)
    }

    /// Value of `attribute` of `entity_id` in the working variant.
    ///
    /// # Errors
    ///
    /// Same lookup errors as [`TrackedNetwork::update`].
    pub fn value(
        &self,
        entity_id: &EntityId,
        attribute: &str,
    ) -> Result<&AttributeValue, NetworkError> {
        let working = self.variants.working_variant_id()?;
        self.value_in(working, entity_id, attribute)
    }

    /// Value of `attribute` of `entity_id` in `variant_id`.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Variant`] for an unknown variant, and the
    /// lookup errors of [`TrackedNetwork::update`].
    pub fn value_in(
        &self,
        variant_id: &VariantId,
        entity_id: &EntityId,
        attribute: &str,
    ) -> Result<&AttributeValue, NetworkError> {
        if !self.variants.contains(variant_id) {
            return Err(VariantError::Unknown {
                variant_id: variant_id.clone(),
            }
            .into());
        }
        self.entities
            .get(entity_id)
            .ok_or_else(|| NetworkError::UnknownEntity {
                entity_id: entity_id.clone(),
            })?
            .value(variant_id, attribute)
            .ok_or_else(|| NetworkError::UnknownAttribute {
                entity_id: entity_id.clone(),
                attribute: attribute.to_owned(),
            })
    }

    /// Clone `source_id` into `targets`, copying variant-local values.
    ///
    /// Values are copied to each target as soon as the sink accepts it, so
    /// a clone stopped by the sink partway leaves every registered target
    /// with its values.
    ///
    /// # Errors
    ///
    /// See [`VariantManager::clone_variant`].
    pub fn clone_variant(
        &mut self,
        source_id: &VariantId,
        targets: &[VariantId],
        may_overwrite: bool,
    ) -> Result<(), NetworkError> {
        let entities = &mut self.entities;
        self.variants.clone_variant_with(
            source_id,
            targets,
            may_overwrite,
            &mut self.sink,
            |target| {
                for entity in entities.values_mut() {
                    let values = entity.local.get(source_id).cloned().unwrap_or_default();
                    entity.local.insert(target.clone(), values);
                }
            },
        )?;
        Ok(())
    }

    /// Remove variant `variant_id` and its local values.
    ///
    /// # Errors
    ///
    /// See [`VariantManager::remove_variant`].
    pub fn remove_variant(&mut self, variant_id: &VariantId) -> Result<(), NetworkError> {
        self.variants.remove_variant(variant_id, &mut self.sink)?;
        for entity in self.entities.values_mut() {
            entity.local.remove(variant_id);
        }
        Ok(())
    }

    /// Make `variant_id` the working variant.
    ///
    /// # Errors
    ///
    /// See [`VariantManager::set_working_variant`].
    pub fn set_working_variant(&mut self, variant_id: &VariantId) -> Result<(), NetworkError> {
        Ok(self.variants.set_working_variant(variant_id)?)
    }
}

impl<S> TrackedNetwork<S>
where
    S: ChangeQuery,
{
    /// Changes visible to `variant_id`, ascending by sequence.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Changelog`] for an unknown or removed
    /// variant.
    pub fn changes_for_variant(
        &self,
        variant_id: &VariantId,
    ) -> Result<Vec<ChangeRecord>, NetworkError> {
        Ok(self.sink.changes_for_variant(variant_id)?)
    }
}
