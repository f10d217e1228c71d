//! Thread-safe handle around a [`Changelog`].
//!
//! The changelog itself is single-threaded. Hosts that mutate or export
//! from several threads share a [`SharedChangelog`]: every append takes the
//! write lock, so the counter increment and the list push happen as one
//! step. Queries take the read lock and may run concurrently with each
//! other; clone and removal notifications update the registry and take the
//! write lock, which is held only for an O(1) alias copy.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use gridlog_types::{AttributeValue, ChangeRecord, EntityId, EntityKind, Mutation, VariantId};

use crate::ChangelogError;
use crate::changelog::Changelog;
use crate::query::ChangeQuery;
use crate::sink::{MutationSink, VariantLifecycle, WorkingVariant, require_working};

/// Cloneable, lock-guarded handle to one [`Changelog`].
#[derive(Debug, Clone, Default)]
pub struct SharedChangelog {
    inner: Arc<RwLock<Changelog>>,
}

fn poisoned<T>(_: PoisonError<T>) -> ChangelogError {
    warn!("Changelog lock poisoned by a panicking thread");
    ChangelogError::LockPoisoned
}

impl SharedChangelog {
    /// Wrap a changelog.
    pub fn new(changelog: Changelog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(changelog)),
        }
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Changelog>, ChangelogError> {
        self.inner.read().map_err(poisoned)
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Changelog>, ChangelogError> {
        self.inner.write().map_err(poisoned)
    }

    /// Run `f` with shared access to the changelog.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::LockPoisoned`] if the lock is poisoned.
    pub fn read<R>(&self, f: impl FnOnce(&Changelog) -> R) -> Result<R, ChangelogError> {
        let guard = self.read_guard()?;
        Ok(f(&guard))
    }

    /// Record a mutation under the write lock. See [`Changelog::append`].
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::append`], plus [`ChangelogError::LockPoisoned`].
    pub fn append(
        &self,
        mutation: Mutation,
        working_variant: &VariantId,
    ) -> Result<u64, ChangelogError> {
        self.write_guard()?.append(mutation, working_variant)
    }

    /// Owned copy of the changes visible to `variant_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::changes_visible_to`], plus
    /// [`ChangelogError::LockPoisoned`].
    pub fn changes_visible_to(
        &self,
        variant_id: &VariantId,
    ) -> Result<Vec<ChangeRecord>, ChangelogError> {
        self.read_guard()?.changes_for_variant(variant_id)
    }

    /// Register `variant_id` with an empty history.
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::register_variant`], plus
    /// [`ChangelogError::LockPoisoned`].
    pub fn register_variant(&self, variant_id: VariantId) -> Result<(), ChangelogError> {
        self.write_guard()?.register_variant(variant_id)
    }

    /// See [`Changelog::on_variant_cloned`].
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::on_variant_cloned`], plus
    /// [`ChangelogError::LockPoisoned`].
    pub fn clone_variant(
        &self,
        source_id: &VariantId,
        new_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        self.write_guard()?.on_variant_cloned(source_id, new_id)
    }

    /// See [`Changelog::on_variant_overwritten`].
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::on_variant_overwritten`], plus
    /// [`ChangelogError::LockPoisoned`].
    pub fn overwrite_variant(
        &self,
        source_id: &VariantId,
        target_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        self.write_guard()?.on_variant_overwritten(source_id, target_id)
    }

    /// See [`Changelog::on_variant_removed`].
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::on_variant_removed`], plus
    /// [`ChangelogError::LockPoisoned`].
    pub fn remove_variant(&self, variant_id: &VariantId) -> Result<(), ChangelogError> {
        self.write_guard()?.on_variant_removed(variant_id)
    }
}

impl From<Changelog> for SharedChangelog {
    fn from(changelog: Changelog) -> Self {
        Self::new(changelog)
    }
}

impl ChangeQuery for SharedChangelog {
    fn changes_for_variant(
        &self,
        variant_id: &VariantId,
    ) -> Result<Vec<ChangeRecord>, ChangelogError> {
        self.changes_visible_to(variant_id)
    }
}

impl MutationSink for SharedChangelog {
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

impl VariantLifecycle for SharedChangelog {
    fn on_variant_cloned(
        &mut self,
        source_id: &VariantId,
        new_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        self.clone_variant(source_id, new_id)
    }

    fn on_variant_overwritten(
        &mut self,
        source_id: &VariantId,
        target_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        self.overwrite_variant(source_id, target_id)
    }

    fn on_variant_removed(&mut self, variant_id: &VariantId) -> Result<(), ChangelogError> {
        self.remove_variant(variant_id)
    }
}
