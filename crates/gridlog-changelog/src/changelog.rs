//! The changelog: an append-only record of every mutation, per variant.
//!
//! The [`Changelog`] holds one shared list of changes visible to every
//! variant and, for each registered variant, a persistent [`History`] of its
//! variant-local changes. A single counter assigns the global sequence
//! number of every record, whichever list the record lands in.
//!
//! # Design
//!
//! - **Append-only**: records are never modified or deleted.
//! - **Single authority**: only [`Changelog::append`] advances the sequence.
//! - **O(1) clone**: a cloned variant aliases its parent's history.
//! - **Linear merge**: a variant's view merges two ascending lists.

use std::collections::BTreeMap;

use tracing::{debug, info};

use gridlog_types::{ChangeKind, ChangeRecord, Classification, Mutation, Scope, VariantId};

use crate::ChangelogError;
use crate::classifier::Classifier;
use crate::history::History;

// ---------------------------------------------------------------------------
// Variant registry
// ---------------------------------------------------------------------------

/// Lifecycle state of a variant id known to the changelog.
#[derive(Debug, Clone)]
enum VariantState {
    /// Registered, holding its local history (possibly aliased).
    Registered(History),
    /// Permanently removed. Queries and clones against it fail.
    Removed,
}

// ---------------------------------------------------------------------------
// Changelog
// ---------------------------------------------------------------------------

/// Variant-aware store of every mutation applied to a network model.
///
/// # Examples
///
/// ```
/// use gridlog_changelog::Changelog;
/// use gridlog_types::{EntityKind, Mutation, VariantId};
///
/// let mut changelog = Changelog::default();
/// let initial = VariantId::initial();
///
/// changelog
///     .append(Mutation::update("GEN", EntityKind::Generator, "targetP", 607.0, 605.0), &initial)
///     .ok();
/// changelog.on_variant_cloned(&initial, &VariantId::from("v1")).ok();
///
/// let visible = changelog.changes_visible_to(&VariantId::from("v1"));
/// assert_eq!(visible.map(|changes| changes.len()).ok(), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Changelog {
    classifier: Classifier,
    /// Changes visible to every variant, ascending by sequence.
    shared: Vec<ChangeRecord>,
    /// Every variant id ever registered. Removed ids stay as tombstones and
    /// are never reused, so the registry only grows.
    variants: BTreeMap<VariantId, VariantState>,
    next_sequence: u64,
}

impl Changelog {
    /// Create a changelog with no registered variant.
    pub const fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            shared: Vec::new(),
            variants: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    /// Create a changelog with `initial` already registered.
    pub fn with_initial_variant(classifier: Classifier, initial: VariantId) -> Self {
        let mut changelog = Self::new(classifier);
        changelog
            .variants
            .insert(initial, VariantState::Registered(History::new()));
        changelog
    }

    /// The classifier deciding the scope of updates.
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Register a new variant with an empty local history.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::DuplicateVariant`] if the id is registered,
    /// or [`ChangelogError::RemovedVariant`] if it was removed.
    pub fn register_variant(&mut self, variant_id: VariantId) -> Result<(), ChangelogError> {
        self.ensure_vacant(&variant_id)?;
        info!(variant = %variant_id, "Variant registered");
        self.variants
            .insert(variant_id, VariantState::Registered(History::new()));
        Ok(())
    }

    /// Record a mutation made while `working_variant` was active.
    ///
    /// Updates are scoped by the classifier; creations and removals are
    /// always shared. Returns the sequence number assigned to the record.
    /// Nothing is recorded and the counter does not move on error.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::UnknownVariant`] or
    /// [`ChangelogError::RemovedVariant`] if the working variant is not
    /// registered, and [`ChangelogError::SequenceExhausted`] if the counter
    /// cannot advance.
    pub fn append(
        &mut self,
        mutation: Mutation,
        working_variant: &VariantId,
    ) -> Result<u64, ChangelogError> {
        // Validate everything before touching the counter.
        let history = match self.variants.get_mut(working_variant) {
            Some(VariantState::Registered(history)) => history,
            Some(VariantState::Removed) => {
                return Err(ChangelogError::RemovedVariant {
                    variant_id: working_variant.clone(),
                });
            }
            None => {
                return Err(ChangelogError::UnknownVariant {
                    variant_id: working_variant.clone(),
                });
            }
        };
        let sequence = self.next_sequence;
        let following = sequence
            .checked_add(1)
            .ok_or(ChangelogError::SequenceExhausted)?;

        let scope = match &mutation {
            Mutation::Update {
                entity_kind,
                attribute,
                ..
            } => Scope::bind(
                self.classifier.classify(*entity_kind, attribute),
                working_variant,
            ),
            Mutation::Creation { .. } | Mutation::Removal { .. } => Scope::Shared,
        };

        let record = mutation.into_record(sequence, scope);
        debug!(
            sequence,
            kind = ?record.kind(),
            entity = %record.entity_id(),
            attribute = record.attribute().unwrap_or(""),
            shared = record.scope().is_shared(),
            working_variant = %working_variant,
            "Change recorded"
        );

        if record.scope().is_shared() {
            self.shared.push(record);
        } else {
            history.push(record);
        }

        self.next_sequence = following;
        Ok(sequence)
    }

    /// Every change visible to `variant_id`, ascending by sequence.
    ///
    /// Merges the shared list with the variant's local history in one
    /// linear pass.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::UnknownVariant`] if the id was never
    /// registered, or [`ChangelogError::RemovedVariant`] if it was removed.
    pub fn changes_visible_to(
        &self,
        variant_id: &VariantId,
    ) -> Result<Vec<&ChangeRecord>, ChangelogError> {
        let local = self.history(variant_id)?.to_ascending();
        Ok(merge_ascending(self.shared.iter(), local))
    }

    /// Changes visible to `variant_id` whose sequence is strictly greater
    /// than `after_sequence`.
    ///
    /// Lets an exporter resume from the last sequence it has already
    /// published.
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::changes_visible_to`].
    pub fn changes_visible_since(
        &self,
        variant_id: &VariantId,
        after_sequence: u64,
    ) -> Result<Vec<&ChangeRecord>, ChangelogError> {
        let history = self.history(variant_id)?;
        let mut local: Vec<&ChangeRecord> = history
            .iter()
            .take_while(|record| record.sequence() > after_sequence)
            .collect();
        local.reverse();
        let start = self
            .shared
            .partition_point(|record| record.sequence() <= after_sequence);
        let shared = self.shared.get(start..).unwrap_or_default();
        Ok(merge_ascending(shared.iter(), local))
    }

    /// Register `new_id` as a clone of `source_id`.
    ///
    /// The new variant's local history aliases the source's at this
    /// instant; later appends through either variant are not seen by the
    /// other.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::UnknownVariant`] or
    /// [`ChangelogError::RemovedVariant`] for a bad source, and
    /// [`ChangelogError::DuplicateVariant`] or
    /// [`ChangelogError::RemovedVariant`] if `new_id` is already known.
    pub fn on_variant_cloned(
        &mut self,
        source_id: &VariantId,
        new_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        let history = self.history(source_id)?.clone();
        self.ensure_vacant(new_id)?;
        info!(
            source = %source_id,
            target = %new_id,
            local_changes = history.len(),
            "Variant cloned"
        );
        self.variants
            .insert(new_id.clone(), VariantState::Registered(history));
        Ok(())
    }

    /// Replace the local history of an existing `target_id` with an alias
    /// of `source_id`'s history.
    ///
    /// This is the changelog side of cloning a variant onto an existing one
    /// with overwrite allowed. Shared changes are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::UnknownVariant`] or
    /// [`ChangelogError::RemovedVariant`] if either id is not registered.
    pub fn on_variant_overwritten(
        &mut self,
        source_id: &VariantId,
        target_id: &VariantId,
    ) -> Result<(), ChangelogError> {
        let history = self.history(source_id)?.clone();
        self.history(target_id)?;
        info!(
            source = %source_id,
            target = %target_id,
            local_changes = history.len(),
            "Variant overwritten"
        );
        self.variants
            .insert(target_id.clone(), VariantState::Registered(history));
        Ok(())
    }

    /// Permanently remove `variant_id`.
    ///
    /// Only the registry entry goes away. Nodes still aliased by other
    /// variants stay alive through their reference counts, and the shared
    /// list is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ChangelogError::UnknownVariant`] if the id was never
    /// registered, or [`ChangelogError::RemovedVariant`] if it was already
    /// removed.
    pub fn on_variant_removed(&mut self, variant_id: &VariantId) -> Result<(), ChangelogError> {
        let local_changes = self.history(variant_id)?.len();
        self.variants
            .insert(variant_id.clone(), VariantState::Removed);
        info!(variant = %variant_id, local_changes, "Variant removed");
        Ok(())
    }

    /// Whether `variant_id` is registered and not removed.
    pub fn is_registered(&self, variant_id: &VariantId) -> bool {
        matches!(
            self.variants.get(variant_id),
            Some(VariantState::Registered(_))
        )
    }

    /// Registered (not removed) variant ids, in order.
    pub fn variant_ids(&self) -> Vec<&VariantId> {
        self.variants
            .iter()
            .filter(|(_, state)| matches!(state, VariantState::Registered(_)))
            .map(|(id, _)| id)
            .collect()
    }

    /// Total number of records appended, across all lists.
    pub fn len(&self) -> usize {
        usize::try_from(self.next_sequence).unwrap_or(usize::MAX)
    }

    /// Whether nothing has been appended yet.
    pub const fn is_empty(&self) -> bool {
        self.next_sequence == 0
    }

    /// Number of shared records.
    pub const fn shared_len(&self) -> usize {
        self.shared.len()
    }

    /// Number of local records visible to `variant_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::changes_visible_to`].
    pub fn local_len(&self, variant_id: &VariantId) -> Result<usize, ChangelogError> {
        self.history(variant_id).map(History::len)
    }

    /// The sequence number the next append will receive.
    pub const fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Number of records of each kind visible to `variant_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Changelog::changes_visible_to`].
    pub fn kind_counts(
        &self,
        variant_id: &VariantId,
    ) -> Result<BTreeMap<ChangeKind, usize>, ChangelogError> {
        let mut counts = BTreeMap::new();
        for record in self.changes_visible_to(variant_id)? {
            let count = counts.entry(record.kind()).or_insert(0_usize);
            *count = count.saturating_add(1);
        }
        Ok(counts)
    }

    /// Scope an update would receive, without recording anything.
    pub fn classify(&self, mutation: &Mutation) -> Classification {
        match mutation {
            Mutation::Update {
                entity_kind,
                attribute,
                ..
            } => self.classifier.classify(*entity_kind, attribute),
            Mutation::Creation { .. } | Mutation::Removal { .. } => Classification::Shared,
        }
    }

    /// Start the counter at `next_sequence`.
    #[cfg(test)]
    pub(crate) const fn with_next_sequence(mut self, next_sequence: u64) -> Self {
        self.next_sequence = next_sequence;
        self
    }

    fn history(&self, variant_id: &VariantId) -> Result<&History, ChangelogError> {
        match self.variants.get(variant_id) {
            Some(VariantState::Registered(history)) => Ok(history),
            Some(VariantState::Removed) => Err(ChangelogError::RemovedVariant {
                variant_id: variant_id.clone(),
            }),
            None => Err(ChangelogError::UnknownVariant {
                variant_id: variant_id.clone(),
            }),
        }
    }

    fn ensure_vacant(&self, variant_id: &VariantId) -> Result<(), ChangelogError> {
        match self.variants.get(variant_id) {
            None => Ok(()),
            Some(VariantState::Registered(_)) => Err(ChangelogError::DuplicateVariant {
                variant_id: variant_id.clone(),
            }),
            Some(VariantState::Removed) => Err(ChangelogError::RemovedVariant {
                variant_id: variant_id.clone(),
            }),
        }
    }
}

impl Default for Changelog {
    /// Standard classifier with the initial variant registered.
    fn default() -> Self {
        Self::with_initial_variant(Classifier::standard(), VariantId::initial())
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Merge two ascending sequences of records into one ascending sequence.
fn merge_ascending<'a>(
    shared: impl Iterator<Item = &'a ChangeRecord>,
    local: Vec<&'a ChangeRecord>,
) -> Vec<&'a ChangeRecord> {
    let (shared_hint, _) = shared.size_hint();
    let mut merged = Vec::with_capacity(shared_hint.saturating_add(local.len()));
    let mut shared = shared.peekable();
    let mut local = local.into_iter().peekable();

    loop {
        let next = match (shared.peek(), local.peek()) {
            (Some(s), Some(l)) if l.sequence() < s.sequence() => local.next(),
            (Some(_), _) => shared.next(),
            (None, _) => local.next(),
        };
        match next {
            Some(record) => merged.push(record),
            None => break,
        }
    }
    merged
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gridlog_types::EntityKind;

    use super::*;

    fn v(id: &str) -> VariantId {
        VariantId::from(id)
    }

    fn branch_update(value: f64) -> Mutation {
        Mutation::update("NHV1_NHV2_1", EntityKind::Line, "r", value - 1.0, value)
    }

    fn setpoint_update(value: f64) -> Mutation {
        Mutation::update("GEN", EntityKind::Generator, "targetP", value - 1.0, value)
    }

    fn changelog_with(variant: &str) -> Changelog {
        Changelog::with_initial_variant(Classifier::standard(), v(variant))
    }

    fn sequences(records: &[&ChangeRecord]) -> Vec<u64> {
        records.iter().map(|r| r.sequence()).collect()
    }

    #[test]
    fn new_changelog_is_empty() {
        let changelog = changelog_with("v1");
        assert!(changelog.is_empty());
        assert_eq!(changelog.len(), 0);
        assert!(changelog.changes_visible_to(&v("v1")).unwrap().is_empty());
    }

    #[test]
    fn append_assigns_increasing_sequences() {
        let mut changelog = changelog_with("v1");
        let a = changelog.append(branch_update(1.0), &v("v1")).unwrap();
        let b = changelog.append(setpoint_update(1.0), &v("v1")).unwrap();
        let c = changelog
            .append(Mutation::removal("GEN", EntityKind::Generator), &v("v1"))
            .unwrap();
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(changelog.next_sequence(), 3);
        assert_eq!(changelog.shared_len(), 2);
        assert_eq!(changelog.local_len(&v("v1")).unwrap(), 1);
    }

    #[test]
    fn append_to_unknown_variant_records_nothing() {
        let mut changelog = changelog_with("v1");
        let result = changelog.append(branch_update(1.0), &v("nope"));
        assert_eq!(
            result,
            Err(ChangelogError::UnknownVariant {
                variant_id: v("nope"),
            })
        );
        assert!(changelog.is_empty());
        assert_eq!(changelog.shared_len(), 0);
    }

    #[test]
    fn exhausted_sequence_records_nothing() {
        let last = u64::MAX.saturating_sub(1);
        let mut changelog = changelog_with("v1").with_next_sequence(last);
        assert_eq!(changelog.append(setpoint_update(1.0), &v("v1")), Ok(last));
        assert_eq!(changelog.next_sequence(), u64::MAX);

        assert_eq!(
            changelog.append(branch_update(2.0), &v("v1")),
            Err(ChangelogError::SequenceExhausted)
        );
        assert_eq!(
            changelog.append(setpoint_update(2.0), &v("v1")),
            Err(ChangelogError::SequenceExhausted)
        );
        assert_eq!(changelog.next_sequence(), u64::MAX);
        assert_eq!(changelog.shared_len(), 0);
        assert_eq!(changelog.local_len(&v("v1")).unwrap(), 1);
        assert_eq!(sequences(&changelog.changes_visible_to(&v("v1")).unwrap()), vec![last]);
    }

    #[test]
    fn shared_changes_scenario() {
        let mut changelog = changelog_with("v1");
        for i in 0..3 {
            changelog.append(branch_update(f64::from(i)), &v("v1")).unwrap();
        }
        assert_eq!(changelog.changes_visible_to(&v("v1")).unwrap().len(), 3);

        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        assert_eq!(
            changelog.changes_visible_to(&v("v1")).unwrap(),
            changelog.changes_visible_to(&v("v2")).unwrap()
        );

        changelog.append(branch_update(10.0), &v("v2")).unwrap();
        changelog.append(branch_update(11.0), &v("v2")).unwrap();
        let first = changelog.changes_visible_to(&v("v1")).unwrap();
        let second = changelog.changes_visible_to(&v("v2")).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn variant_local_changes_scenario() {
        let mut changelog = changelog_with("v1");
        changelog.append(setpoint_update(605.0), &v("v1")).unwrap();
        assert_eq!(changelog.changes_visible_to(&v("v1")).unwrap().len(), 1);

        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        assert_eq!(
            changelog.changes_visible_to(&v("v1")).unwrap(),
            changelog.changes_visible_to(&v("v2")).unwrap()
        );

        changelog.append(setpoint_update(600.0), &v("v2")).unwrap();
        let first = changelog.changes_visible_to(&v("v1")).unwrap();
        let second = changelog.changes_visible_to(&v("v2")).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        let tail = second.get(1).copied().unwrap();
        assert!(!first.contains(&tail));
    }

    #[test]
    fn update_then_removal_stays_ordered() {
        let mut changelog = changelog_with("v1");
        changelog.append(setpoint_update(605.0), &v("v1")).unwrap();
        changelog
            .append(Mutation::removal("GEN", EntityKind::Generator), &v("v1"))
            .unwrap();

        let visible = changelog.changes_visible_to(&v("v1")).unwrap();
        assert_eq!(sequences(&visible), vec![0, 1]);
        assert!(visible.first().unwrap().is_update());
        assert_eq!(visible.last().unwrap().kind(), ChangeKind::Removal);
    }

    #[test]
    fn shared_change_reaches_earlier_clones_and_ancestors() {
        let mut changelog = changelog_with("v1");
        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        changelog.append(branch_update(3.0), &v("v2")).unwrap();
        assert_eq!(changelog.changes_visible_to(&v("v1")).unwrap().len(), 1);
        assert_eq!(changelog.changes_visible_to(&v("v2")).unwrap().len(), 1);
    }

    #[test]
    fn local_change_does_not_leak_to_ancestor() {
        let mut changelog = changelog_with("v1");
        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        changelog.append(setpoint_update(1.0), &v("v2")).unwrap();
        assert!(changelog.changes_visible_to(&v("v1")).unwrap().is_empty());
        assert_eq!(changelog.changes_visible_to(&v("v2")).unwrap().len(), 1);
    }

    #[test]
    fn merge_interleaves_by_sequence() {
        let mut changelog = changelog_with("v1");
        changelog.append(setpoint_update(1.0), &v("v1")).unwrap();
        changelog.append(branch_update(1.0), &v("v1")).unwrap();
        changelog.append(setpoint_update(2.0), &v("v1")).unwrap();
        changelog.append(branch_update(2.0), &v("v1")).unwrap();
        let visible = changelog.changes_visible_to(&v("v1")).unwrap();
        assert_eq!(sequences(&visible), vec![0, 1, 2, 3]);
    }

    #[test]
    fn clone_errors() {
        let mut changelog = changelog_with("v1");
        assert_eq!(
            changelog.on_variant_cloned(&v("ghost"), &v("v2")),
            Err(ChangelogError::UnknownVariant {
                variant_id: v("ghost"),
            })
        );
        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        assert_eq!(
            changelog.on_variant_cloned(&v("v1"), &v("v2")),
            Err(ChangelogError::DuplicateVariant {
                variant_id: v("v2"),
            })
        );
    }

    #[test]
    fn removed_variant_is_terminal() {
        let mut changelog = changelog_with("v1");
        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        changelog.on_variant_removed(&v("v2")).unwrap();

        let removed = Err(ChangelogError::RemovedVariant {
            variant_id: v("v2"),
        });
        assert_eq!(changelog.changes_visible_to(&v("v2")), removed);
        assert_eq!(
            changelog.on_variant_removed(&v("v2")),
            Err(ChangelogError::RemovedVariant {
                variant_id: v("v2"),
            })
        );
        assert!(changelog.on_variant_cloned(&v("v1"), &v("v2")).is_err());
        assert!(changelog.register_variant(v("v2")).is_err());
        assert!(changelog.append(branch_update(1.0), &v("v2")).is_err());
        assert_eq!(changelog.variant_ids(), vec![&v("v1")]);
    }

    #[test]
    fn removing_a_parent_keeps_clone_history() {
        let mut changelog = changelog_with("v1");
        changelog.append(setpoint_update(1.0), &v("v1")).unwrap();
        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        changelog.on_variant_removed(&v("v1")).unwrap();
        assert_eq!(changelog.changes_visible_to(&v("v2")).unwrap().len(), 1);
    }

    #[test]
    fn overwrite_replaces_local_history() {
        let mut changelog = changelog_with("v1");
        changelog.on_variant_cloned(&v("v1"), &v("v2")).unwrap();
        changelog.append(setpoint_update(605.0), &v("v2")).unwrap();
        changelog.append(branch_update(4.0), &v("v1")).unwrap();

        changelog.on_variant_overwritten(&v("v2"), &v("v1")).unwrap();
        let first = changelog.changes_visible_to(&v("v1")).unwrap();
        assert_eq!(first, changelog.changes_visible_to(&v("v2")).unwrap());
        assert_eq!(sequences(&first), vec![0, 1]);

        assert!(
            changelog
                .on_variant_overwritten(&v("v1"), &v("ghost"))
                .is_err()
        );
    }

    #[test]
    fn visible_since_returns_suffix() {
        let mut changelog = changelog_with("v1");
        for i in 0..3 {
            changelog.append(setpoint_update(f64::from(i)), &v("v1")).unwrap();
            changelog.append(branch_update(f64::from(i)), &v("v1")).unwrap();
        }
        let since = changelog.changes_visible_since(&v("v1"), 2).unwrap();
        assert_eq!(sequences(&since), vec![3, 4, 5]);
        let all = changelog.changes_visible_since(&v("v1"), 0).unwrap();
        assert_eq!(sequences(&all), vec![1, 2, 3, 4, 5]);
        assert!(changelog.changes_visible_since(&v("v1"), 5).unwrap().is_empty());
    }

    #[test]
    fn kind_counts_per_variant() {
        let mut changelog = changelog_with("v1");
        changelog
            .append(Mutation::creation("GEN", EntityKind::Generator), &v("v1"))
            .unwrap();
        changelog.append(setpoint_update(1.0), &v("v1")).unwrap();
        changelog.append(setpoint_update(2.0), &v("v1")).unwrap();
        let counts = changelog.kind_counts(&v("v1")).unwrap();
        assert_eq!(counts.get(&ChangeKind::Creation), Some(&1));
        assert_eq!(counts.get(&ChangeKind::Update), Some(&2));
        assert_eq!(counts.get(&ChangeKind::Removal), None);
    }

    #[test]
    fn classify_previews_scope() {
        let changelog = changelog_with("v1");
        assert_eq!(
            changelog.classify(&setpoint_update(1.0)),
            Classification::VariantLocal
        );
        assert_eq!(
            changelog.classify(&Mutation::creation("GEN", EntityKind::Generator)),
            Classification::Shared
        );
    }
}
