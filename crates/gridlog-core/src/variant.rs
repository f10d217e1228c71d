//! Variant registry of a network model.
//!
//! The [`VariantManager`] owns the set of live variant ids, the ids removed
//! so far, and the working variant. It validates every clone and removal
//! request before touching anything, then notifies a [`VariantLifecycle`]
//! hook exactly once per cloned target or removed variant, updating its own
//! state after each accepted event.
//!
//! Removed ids can never come back, matching the changelog, so a hook
//! backed by the same history rejects nothing that validation let through.
//! A hook that fails anyway stops a multi-target clone at that target; the
//! targets reported before it stay registered.

use std::collections::BTreeSet;

use tracing::{debug, info};

use gridlog_changelog::{ChangelogError, VariantLifecycle, WorkingVariant};
use gridlog_types::VariantId;

/// Errors returned by variant management operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantError {
    /// The variant id is not registered.
    #[error("unknown variant: {variant_id}")]
    Unknown {
        /// The offending variant id.
        variant_id: VariantId,
    },

    /// A clone targeted an existing variant without allowing overwrite.
    #[error("variant already exists: {variant_id}")]
    AlreadyExists {
        /// The offending variant id.
        variant_id: VariantId,
    },

    /// The variant id was removed and cannot be used again.
    #[error("variant has been removed: {variant_id}")]
    Removed {
        /// The offending variant id.
        variant_id: VariantId,
    },

    /// The initial variant is permanent.
    #[error("the initial variant {variant_id} cannot be removed")]
    CannotRemoveInitial {
        /// The initial variant id.
        variant_id: VariantId,
    },

    /// A clone was requested with no target.
    #[error("no target variant given for clone of {source_id}")]
    EmptyTargets {
        /// The clone source.
        source_id: VariantId,
    },

    /// No working variant is set.
    #[error("no working variant is set")]
    NoWorkingVariant,

    /// The lifecycle hook rejected the event.
    #[error("changelog rejected variant event: {0}")]
    Changelog(#[from] ChangelogError),
}

/// Registry of variant ids and the working variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantManager {
    initial: VariantId,
    variants: BTreeSet<VariantId>,
    removed: BTreeSet<VariantId>,
    working: Option<VariantId>,
}

impl VariantManager {
    /// Create a manager holding only `initial`, which is also the working
    /// variant.
    pub fn new(initial: VariantId) -> Self {
        Self {
            variants: BTreeSet::from([initial.clone()]),
            removed: BTreeSet::new(),
            working: Some(initial.clone()),
            initial,
        }
    }

    /// The permanent initial variant.
    pub const fn initial_variant_id(&self) -> &VariantId {
        &self.initial
    }

    /// Live variant ids, in order.
    pub fn variant_ids(&self) -> Vec<&VariantId> {
        self.variants.iter().collect()
    }

    /// Whether `variant_id` was removed.
    pub fn is_removed(&self, variant_id: &VariantId) -> bool {
        self.removed.contains(variant_id)
    }

    /// Whether `variant_id` is live.
    pub fn contains(&self, variant_id: &VariantId) -> bool {
        self.variants.contains(variant_id)
    }

    /// The working variant.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::NoWorkingVariant`] if the working variant was
    /// removed and no other has been set since.
    pub fn working_variant_id(&self) -> Result<&VariantId, VariantError> {
        self.working.as_ref().ok_or(VariantError::NoWorkingVariant)
    }

    /// Make `variant_id` the working variant.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::Unknown`] or [`VariantError::Removed`] if the
    /// id is not live.
    pub fn set_working_variant(&mut self, variant_id: &VariantId) -> Result<(), VariantError> {
        self.ensure_known(variant_id)?;
        debug!(variant = %variant_id, "Working variant set");
        self.working = Some(variant_id.clone());
        Ok(())
    }

    /// Clone `source_id` into every id of `targets`.
    ///
    /// Targets that do not exist yet are created and reported through
    /// [`VariantLifecycle::on_variant_cloned`]. Existing targets are only
    /// accepted with `may_overwrite` and are reported through
    /// [`VariantLifecycle::on_variant_overwritten`]. The working variant is
    /// left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::Unknown`] or [`VariantError::Removed`] for a
    /// bad source, [`VariantError::EmptyTargets`] for an empty target list,
    /// [`VariantError::Removed`] for a target removed earlier,
    /// [`VariantError::AlreadyExists`] for an existing (or repeated) target
    /// without `may_overwrite`, and [`VariantError::Changelog`] if the hook
    /// rejects an event. Validation happens before any hook is called.
    pub fn clone_variant<H>(
        &mut self,
        source_id: &VariantId,
        targets: &[VariantId],
        may_overwrite: bool,
        hooks: &mut H,
    ) -> Result<(), VariantError>
    where
        H: VariantLifecycle + ?Sized,
    {
        self.clone_variant_with(source_id, targets, may_overwrite, hooks, |_| {})
    }

    /// Same as [`VariantManager::clone_variant`], calling `on_applied` with
    /// each target right after the hook accepted it and the registry holds
    /// it.
    ///
    /// # Errors
    ///
    /// Same as [`VariantManager::clone_variant`].
    pub fn clone_variant_with<H, F>(
        &mut self,
        source_id: &VariantId,
        targets: &[VariantId],
        may_overwrite: bool,
        hooks: &mut H,
        mut on_applied: F,
    ) -> Result<(), VariantError>
    where
        H: VariantLifecycle + ?Sized,
        F: FnMut(&VariantId),
    {
        self.validate_clone(source_id, targets, may_overwrite)?;

        for target in targets {
            if self.variants.contains(target) {
                hooks.on_variant_overwritten(source_id, target)?;
                info!(source = %source_id, target = %target, "Variant overwritten");
            } else {
                hooks.on_variant_cloned(source_id, target)?;
                self.variants.insert(target.clone());
                info!(source = %source_id, target = %target, "Variant cloned");
            }
            on_applied(target);
        }
        Ok(())
    }

    fn validate_clone(
        &self,
        source_id: &VariantId,
        targets: &[VariantId],
        may_overwrite: bool,
    ) -> Result<(), VariantError> {
        self.ensure_known(source_id)?;
        if targets.is_empty() {
            return Err(VariantError::EmptyTargets {
                source_id: source_id.clone(),
            });
        }
        let mut seen = BTreeSet::new();
        for target in targets {
            if self.removed.contains(target) {
                return Err(VariantError::Removed {
                    variant_id: target.clone(),
                });
            }
            let repeated = !seen.insert(target);
            if !may_overwrite && (repeated || self.variants.contains(target)) {
                return Err(VariantError::AlreadyExists {
                    variant_id: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Remove `variant_id`.
    ///
    /// Removing the working variant leaves no working variant set.
    ///
    /// # Errors
    ///
    /// Returns [`VariantError::Unknown`] or [`VariantError::Removed`] if the
    /// id is not live, [`VariantError::CannotRemoveInitial`] for the initial variant, and
    /// [`VariantError::Changelog`] if the hook rejects the event.
    pub fn remove_variant<H>(
        &mut self,
        variant_id: &VariantId,
        hooks: &mut H,
    ) -> Result<(), VariantError>
    where
        H: VariantLifecycle + ?Sized,
    {
        self.ensure_known(variant_id)?;
        if *variant_id == self.initial {
            return Err(VariantError::CannotRemoveInitial {
                variant_id: variant_id.clone(),
            });
        }

        hooks.on_variant_removed(variant_id)?;
        self.variants.remove(variant_id);
        self.removed.insert(variant_id.clone());
        if self.working.as_ref() == Some(variant_id) {
            self.working = None;
        }
        info!(variant = %variant_id, "Variant removed");
        Ok(())
    }

    fn ensure_known(&self, variant_id: &VariantId) -> Result<(), VariantError> {
        if self.variants.contains(variant_id) {
            Ok(())
        } else if self.removed.contains(variant_id) {
            Err(VariantError::Removed {
                variant_id: variant_id.clone(),
            })
        } else {
            Err(VariantError::Unknown {
                variant_id: variant_id.clone(),
            })
        }
    }
}

impl Default for VariantManager {
    fn default() -> Self {
        Self::new(VariantId::initial())
    }
}

impl WorkingVariant for VariantManager {
    fn working_variant_id(&self) -> Option<&VariantId> {
        self.working.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridlog_changelog::Changelog;

    use super::*;

    fn v(id: &str) -> VariantId {
        VariantId::from(id)
    }

    /// Records every hook call, optionally rejecting one clone target.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        reject: Option<VariantId>,
    }

    impl VariantLifecycle for Recorder {
        fn on_variant_cloned(
            &mut self,
            source_id: &VariantId,
            new_id: &VariantId,
        ) -> Result<(), ChangelogError> {
            if self.reject.as_ref() == Some(new_id) {
                return Err(ChangelogError::DuplicateVariant {
                    variant_id: new_id.clone(),
                });
            }
            self.events.push(format!("clone {source_id} -> {new_id}"));
            Ok(())
        }

        fn on_variant_overwritten(
            &mut self,
            source_id: &VariantId,
            target_id: &VariantId,
        ) -> Result<(), ChangelogError> {
            self.events.push(format!("overwrite {source_id} -> {target_id}"));
            Ok(())
        }

        fn on_variant_removed(&mut self, variant_id: &VariantId) -> Result<(), ChangelogError> {
            self.events.push(format!("remove {variant_id}"));
            Ok(())
        }
    }

    #[test]
    fn initial_variant_is_working() {
        let manager = VariantManager::default();
        assert_eq!(manager.working_variant_id().unwrap(), &VariantId::initial());
        assert_eq!(manager.variant_ids(), vec![&VariantId::initial()]);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut manager = VariantManager::default();
        let mut hooks = Recorder::default();
        assert!(matches!(
            manager.set_working_variant(&v("UnknownVariant")),
            Err(VariantError::Unknown { .. })
        ));
        assert!(matches!(
            manager.remove_variant(&v("UnknownVariant"), &mut hooks),
            Err(VariantError::Unknown { .. })
        ));
        assert!(hooks.events.is_empty());
    }

    #[test]
    fn initial_variant_cannot_be_removed() {
        let mut manager = VariantManager::default();
        let mut hooks = Recorder::default();
        assert_eq!(
            manager.remove_variant(&VariantId::initial(), &mut hooks),
            Err(VariantError::CannotRemoveInitial {
                variant_id: VariantId::initial(),
            })
        );
        assert!(hooks.events.is_empty());
    }

    #[test]
    fn clone_to_many_targets_notifies_once_each() {
        let mut manager = VariantManager::default();
        let mut hooks = Recorder::default();
        manager
            .clone_variant(&VariantId::initial(), &[v("a"), v("b")], false, &mut hooks)
            .unwrap();
        assert_eq!(
            hooks.events,
            vec!["clone InitialState -> a", "clone InitialState -> b"]
        );
        assert_eq!(manager.variant_ids().len(), 3);
        // Cloning never changes the working variant.
        assert_eq!(manager.working_variant_id().unwrap(), &VariantId::initial());
    }

    #[test]
    fn existing_target_needs_overwrite() {
        let mut manager = VariantManager::default();
        let mut hooks = Recorder::default();
        manager
            .clone_variant(&VariantId::initial(), &[v("a")], false, &mut hooks)
            .unwrap();
        assert_eq!(
            manager.clone_variant(&v("a"), &[v("b"), VariantId::initial()], false, &mut hooks),
            Err(VariantError::AlreadyExists {
                variant_id: VariantId::initial(),
            })
        );
        // Validation failed before "b" was touched.
        assert!(!manager.contains(&v("b")));
        assert_eq!(hooks.events.len(), 1);

        manager
            .clone_variant(&v("a"), &[VariantId::initial()], true, &mut hooks)
            .unwrap();
        assert_eq!(hooks.events.last().unwrap(), "overwrite a -> InitialState");
    }

    #[test]
    fn repeated_target_is_rejected() {
        let mut manager = VariantManager::default();
        let mut hooks = Recorder::default();
        assert!(matches!(
            manager.clone_variant(&VariantId::initial(), &[v("a"), v("a")], false, &mut hooks),
            Err(VariantError::AlreadyExists { .. })
        ));
        assert!(matches!(
            manager.clone_variant(&VariantId::initial(), &[], false, &mut hooks),
            Err(VariantError::EmptyTargets { .. })
        ));
        assert!(hooks.events.is_empty());
    }

    #[test]
    fn removing_working_variant_unsets_it() {
        let mut manager = VariantManager::default();
        let mut hooks = Recorder::default();
        manager
            .clone_variant(&VariantId::initial(), &[v("c1")], false, &mut hooks)
            .unwrap();
        manager.set_working_variant(&v("c1")).unwrap();
        manager.remove_variant(&v("c1"), &mut hooks).unwrap();

        assert_eq!(manager.working_variant_id(), Err(VariantError::NoWorkingVariant));
        assert_eq!(WorkingVariant::working_variant_id(&manager), None);
        assert_eq!(manager.variant_ids(), vec![&VariantId::initial()]);
    }

    #[test]
    fn removed_target_is_rejected_before_any_hook() {
        let mut manager = VariantManager::default();
        let mut changelog = Changelog::default();
        manager
            .clone_variant(&VariantId::initial(), &[v("old")], false, &mut changelog)
            .unwrap();
        manager.remove_variant(&v("old"), &mut changelog).unwrap();
        assert!(manager.is_removed(&v("old")));

        let result = manager.clone_variant(
            &VariantId::initial(),
            &[v("a"), v("old")],
            false,
            &mut changelog,
        );
        assert_eq!(
            result,
            Err(VariantError::Removed {
                variant_id: v("old"),
            })
        );
        assert!(!manager.contains(&v("a")));
        assert!(!changelog.is_registered(&v("a")));

        // Overwrite does not bring a removed id back either.
        assert!(matches!(
            manager.clone_variant(&VariantId::initial(), &[v("old")], true, &mut changelog),
            Err(VariantError::Removed { .. })
        ));
        assert!(matches!(
            manager.set_working_variant(&v("old")),
            Err(VariantError::Removed { .. })
        ));
    }

    #[test]
    fn failing_hook_keeps_targets_already_applied() {
        let mut manager = VariantManager::default();
        let mut hooks = Recorder {
            reject: Some(v("b")),
            ..Recorder::default()
        };
        let mut applied = Vec::new();
        let result = manager.clone_variant_with(
            &VariantId::initial(),
            &[v("a"), v("b"), v("c")],
            false,
            &mut hooks,
            |target| applied.push(target.clone()),
        );
        assert!(matches!(result, Err(VariantError::Changelog(_))));
        assert_eq!(applied, vec![v("a")]);
        assert!(manager.contains(&v("a")));
        assert!(!manager.contains(&v("b")));
        assert!(!manager.contains(&v("c")));
    }
}
