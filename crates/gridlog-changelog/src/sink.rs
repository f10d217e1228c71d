//! Boundary traits between the changelog and its host.
//!
//! The host network model reports every mutation through a
//! [`MutationSink`], handing over a [`WorkingVariant`] context so the sink
//! can read which variant is active at call time. The host's variant
//! manager reports clone and removal events through [`VariantLifecycle`].
//!
//! [`Changelog`] implements all of them directly: each sink call performs
//! exactly one [`Changelog::append`], with no batching or reordering.

use gridlog_types::{AttributeValue, EntityId, EntityKind, Mutation, VariantId};

use crate::ChangelogError;
use crate::changelog::Changelog;

/// Exposes the variant that is active for the next mutation.
pub trait WorkingVariant {
    /// The working variant, or `None` when the host has none set (for
    /// instance right after the working variant was removed).
    fn working_variant_id(&self) -> Option<&VariantId>;
}

/// A fixed variant id is its own working-variant context.
impl WorkingVariant for VariantId {
    fn working_variant_id(&self) -> Option<&VariantId> {
        Some(self)
    }
}

/// Receives every mutation of the host network model.
///
/// Implementations record exactly one change per call and return the
/// sequence number it was assigned.
pub trait MutationSink {
    /// A network object was created.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError`] if the working variant is missing or
    /// unusable.
    fn on_create(
        &mut self,
        context: &dyn WorkingVariant,
        entity_id: EntityId,
        entity_kind: EntityKind,
    ) -> Result<u64, ChangelogError>;

    /// An attribute of a network object changed value.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError`] if the working variant is missing or
    /// unusable.
    fn on_update(
        &mut self,
        context: &dyn WorkingVariant,
        entity_id: EntityId,
        entity_kind: EntityKind,
        attribute: &str,
        old_value: AttributeValue,
        new_value: AttributeValue,
    ) -> Result<u64, ChangelogError>;

    /// A network object was removed.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError`] if the working variant is missing or
    /// unusable.
    fn on_remove(
        &mut self,
        context: &dyn WorkingVariant,
        entity_id: EntityId,
        entity_kind: EntityKind,
    ) -> Result<u64, ChangelogError>;
}

/// Receives variant clone and removal events from the variant manager.
///
/// The variant manager calls each hook exactly once per event.
pub trait VariantLifecycle {
    /// `new_id` was created as a copy of `source_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError`] if `source_id` is not registered or
    /// `new_id` already is.
    fn on_variant_cloned(
        &mut self,
        source_id: &VariantId,
        new_id: &VariantId,
    ) -> Result<(), ChangelogError>;

    /// The existing `target_id` was overwritten with a copy of `source_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError`] if either id is not registered.
    fn on_variant_overwritten(
        &mut self,
        source_id: &VariantId,
        target_id: &VariantId,
    ) -> Result<(), ChangelogError>;

    /// `variant_id` was permanently removed.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError`] if the id is not registered.
    fn on_variant_removed(&mut self, variant_id: &VariantId) -> Result<(), ChangelogError>;
}

/// Read the working variant or fail with [`ChangelogError::NoWorkingVariant`].
pub(crate) fn require_working(context: &dyn WorkingVariant) -> Result<&VariantId, ChangelogError> {
    context
        .working_variant_id()
        .ok_or(ChangelogError::NoWorkingVariant)
}

impl MutationSink for Changelog {
    fn on_create(
        &mut self,
        context: &dyn WorkingVariant,
        entity_id: EntityId,
        entity_kind: EntityKind,
    ) -> Result<u64, ChangelogError> {
        let working = require_working(context)?;
        self.append(
            Mutation::Creation {
                entity_id,
                entity_kind,
            },
            working,
        )
    }

    fn on_update(
        &mut self,
        context: &dyn WorkingVariant,
        entity_id: EntityId,
        entity_kind: EntityKind,
        attribute: &str,
        old_value: AttributeValue,
        new_value: AttributeValue,
    ) -> Result<u64, ChangelogError> {
        let working = require_working(context)?;
        self.append(
            Mutation::Update {
                entity_id,
                entity_kind,
                attribute: attribute.to_owned(),
                old_value,
                new_value,
            },
            working,
        )
    }

    fn on_remove(
        &mut self,
        context: &dyn WorkingVariant,
        entity_id: EntityId,
        entity_kind: EntityKind,
    ) -> Result<u64, ChangelogError> {
        let working = require_working(context)?;
        self.append(
            Mutation::Removal {
                entity_id,
                entity_kind,
            },
            working,
        )
    }
}

impl VariantLifecycle for Changelog {
    fn on_variant_cloned(
        &mut self,
        source_id: &VariantId,
        new_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        Self::on_variant_cloned(self, source_id, new_id)
    }

    fn on_variant_overwritten(
        &mut self,
        source_id: &VariantId,
        target_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        Self::on_variant_overwritten(self, source_id, target_id)
    }

    fn on_variant_removed(&mut self, variant_id: &VariantId) -> Result<(), ChangelogError> {
        Self::on_variant_removed(self, variant_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridlog_types::ChangeKind;

    use super::*;

    /// Host stand-in whose working variant can be unset.
    struct Host {
        working: Option<VariantId>,
    }

    impl WorkingVariant for Host {
        fn working_variant_id(&self) -> Option<&VariantId> {
            self.working.as_ref()
        }
    }

    #[test]
    fn each_sink_call_appends_one_record() {
        let mut changelog = Changelog::default();
        let host = Host {
            working: Some(VariantId::initial()),
        };

        let created = changelog
            .on_create(&host, EntityId::from("GEN"), EntityKind::Generator)
            .unwrap();
        let updated = changelog
            .on_update(
                &host,
                EntityId::from("GEN"),
                EntityKind::Generator,
                "targetP",
                AttributeValue::Float(607.0),
                AttributeValue::Float(605.0),
            )
            .unwrap();
        let removed = changelog
            .on_remove(&host, EntityId::from("GEN"), EntityKind::Generator)
            .unwrap();

        assert_eq!((created, updated, removed), (0, 1, 2));
        let kinds: Vec<ChangeKind> = changelog
            .changes_visible_to(&VariantId::initial())
            .unwrap()
            .iter()
            .map(|r| r.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![ChangeKind::Creation, ChangeKind::Update, ChangeKind::Removal]
        );
    }

    #[test]
    fn sink_reads_working_variant_at_call_time() {
        let mut changelog = Changelog::default();
        let v1 = VariantId::from("v1");
        VariantLifecycle::on_variant_cloned(&mut changelog, &VariantId::initial(), &v1).unwrap();

        let mut host = Host {
            working: Some(v1.clone()),
        };
        changelog
            .on_update(
                &host,
                EntityId::from("LOAD"),
                EntityKind::Load,
                "p0",
                AttributeValue::Float(600.0),
                AttributeValue::Float(550.0),
            )
            .unwrap();
        host.working = Some(VariantId::initial());

        assert_eq!(changelog.local_len(&v1).unwrap(), 1);
        assert_eq!(changelog.local_len(&VariantId::initial()).unwrap(), 0);
    }

    #[test]
    fn missing_working_variant_is_rejected() {
        let mut changelog = Changelog::default();
        let host = Host { working: None };
        let result = changelog.on_create(&host, EntityId::from("GEN"), EntityKind::Generator);
        assert_eq!(result, Err(ChangelogError::NoWorkingVariant));
        assert!(changelog.is_empty());
    }

    #[test]
    fn variant_id_is_a_working_context() {
        let mut changelog = Changelog::default();
        let sequence = changelog
            .on_create(&VariantId::initial(), EntityId::from("S1"), EntityKind::Substation)
            .unwrap();
        assert_eq!(sequence, 0);
    }

    #[test]
    fn lifecycle_hooks_delegate_to_changelog() {
        let mut changelog = Changelog::default();
        let hooks: &mut dyn VariantLifecycle = &mut changelog;
        let v1 = VariantId::from("v1");
        hooks.on_variant_cloned(&VariantId::initial(), &v1).unwrap();
        hooks.on_variant_overwritten(&VariantId::initial(), &v1).unwrap();
        hooks.on_variant_removed(&v1).unwrap();
        assert_eq!(
            hooks.on_variant_removed(&v1),
            Err(ChangelogError::RemovedVariant { variant_id: v1 })
        );
    }
}
