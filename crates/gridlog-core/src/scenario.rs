//! Scenario files: scripted sequences of network and variant operations.
//!
//! A scenario is a YAML document with a `name` and a list of `steps`, each
//! tagged by `op`. Replaying it drives a [`TrackedNetwork`] step by step and
//! captures labelled snapshots of what selected variants can see.
//!
//! ```yaml
//! name: setpoint divergence
//! steps:
//!   - op: create
//!     id: GEN
//!     kind: generator
//!     attributes:
//!       targetP: { type: float, value: 607.0 }
//!   - op: clone_variant
//!     source: InitialState
//!     targets: [v1]
//!   - op: set_working_variant
//!     id: v1
//!   - op: update
//!     id: GEN
//!     attribute: targetP
//!     value: { type: float, value: 605.0 }
//!   - op: snapshot
//!     label: after
//!     variant: v1
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use gridlog_types::{AttributeValue, ChangeRecord, EntityId, EntityKind, VariantId};

use crate::config::GridlogConfig;
use crate::network::{NetworkError, TrackedNetwork};

/// Errors that can occur when loading or replaying a scenario.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read the scenario file from disk.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse scenario YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A step failed.
    #[error("step {index} failed: {source}")]
    Step {
        /// Zero-based index of the failing step.
        index: usize,
        /// What went wrong.
        source: NetworkError,
    },
}

impl From<serde_yml::Error> for ScenarioError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A named list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Human-readable scenario name.
    #[serde(default)]
    pub name: String,

    /// Steps, replayed in order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Io`] if the file cannot be read, or
    /// [`ScenarioError::Yaml`] if the content is not a valid scenario.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Yaml`] if the string is not a valid
    /// scenario.
    pub fn parse(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Create an object with initial attribute values.
    Create {
        /// New object id.
        id: EntityId,
        /// Its kind.
        kind: EntityKind,
        /// Initial attribute values.
        #[serde(default)]
        attributes: BTreeMap<String, AttributeValue>,
    },
    /// Change one attribute in the working variant.
    Update {
        /// Target object.
        id: EntityId,
        /// Attribute name.
        attribute: String,
        /// New value.
        value: AttributeValue,
    },
    /// Remove an object.
    Remove {
        /// Target object.
        id: EntityId,
    },
    /// Clone a variant into one or more targets.
    CloneVariant {
        /// Variant to copy.
        source: VariantId,
        /// Variants to create or overwrite.
        targets: Vec<VariantId>,
        /// Allow overwriting existing targets.
        #[serde(default)]
        overwrite: bool,
    },
    /// Remove a variant.
    RemoveVariant {
        /// Variant to remove.
        id: VariantId,
    },
    /// Change the working variant.
    SetWorkingVariant {
        /// New working variant.
        id: VariantId,
    },
    /// Capture the changes visible to a variant.
    Snapshot {
        /// Label identifying the snapshot in the report.
        label: String,
        /// Variant to capture; the working variant when absent.
        #[serde(default)]
        variant: Option<VariantId>,
    },
}

/// Changes visible to one variant at one point of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Label from the scenario step.
    pub label: String,
    /// Captured variant.
    pub variant_id: VariantId,
    /// Visible changes, ascending by sequence.
    pub changes: Vec<ChangeRecord>,
}

/// Outcome of a replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    /// Unique id of this replay run.
    pub run_id: Uuid,
    /// When the replay started.
    pub started_at: DateTime<Utc>,
    /// Scenario name.
    pub scenario: String,
    /// Number of steps replayed.
    pub steps: usize,
    /// Snapshots, in step order.
    pub snapshots: Vec<Snapshot>,
    /// Variants alive at the end.
    pub variants: Vec<VariantId>,
    /// Sequence number the next change would have received.
    pub next_sequence: u64,
}

/// Replay `scenario` on an empty network built from `config`.
///
/// # Errors
///
/// Returns [`ScenarioError::Step`] for the first step that fails; later
/// steps are not run.
pub fn replay(config: &GridlogConfig, scenario: &Scenario) -> Result<ReplayReport, ScenarioError> {
    let run_id = Uuid::now_v7();
    let started_at = Utc::now();
    info!(
        %run_id,
        scenario = %scenario.name,
        steps = scenario.steps.len(),
        "Replay started"
    );

    let mut network = TrackedNetwork::from_config(config);
    let mut snapshots = Vec::new();
    for (index, step) in scenario.steps.iter().enumerate() {
        debug!(index, ?step, "Applying step");
        apply_step(&mut network, step, &mut snapshots)
            .map_err(|source| ScenarioError::Step { index, source })?;
    }

    let report = ReplayReport {
        run_id,
        started_at,
        scenario: scenario.name.clone(),
        steps: scenario.steps.len(),
        snapshots,
        variants: network.variants().variant_ids().into_iter().cloned().collect(),
        next_sequence: network.sink().next_sequence(),
    };
    info!(
        %run_id,
        snapshots = report.snapshots.len(),
        next_sequence = report.next_sequence,
        "Replay finished"
    );
    Ok(report)
}

fn apply_step(
    network: &mut TrackedNetwork,
    step: &Step,
    snapshots: &mut Vec<Snapshot>,
) -> Result<(), NetworkError> {
    match step {
        Step::Create {
            id,
            kind,
            attributes,
        } => {
            network.create(id.clone(), *kind, attributes.clone())?;
        }
        Step::Update {
            id,
            attribute,
            value,
        } => {
            network.update(id, attribute, value.clone())?;
        }
        Step::Remove { id } => {
            network.remove(id)?;
        }
        Step::CloneVariant {
            source,
            targets,
            overwrite,
        } => network.clone_variant(source, targets, *overwrite)?,
        Step::RemoveVariant { id } => network.remove_variant(id)?,
        Step::SetWorkingVariant { id } => network.set_working_variant(id)?,
        Step::Snapshot { label, variant } => {
            let variant_id = match variant {
                Some(variant_id) => variant_id.clone(),
                None => network.variants().working_variant_id()?.clone(),
            };
            let changes = network.changes_for_variant(&variant_id)?;
            snapshots.push(Snapshot {
                label: label.clone(),
                variant_id,
                changes,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const SETPOINT_SCENARIO: &str = r"
name: setpoint divergence
steps:
  - op: create
    id: GEN
    kind: generator
    attributes:
      targetP: { type: float, value: 607.0 }
  - op: clone_variant
    source: InitialState
    targets: [v1]
  - op: set_working_variant
    id: v1
  - op: update
    id: GEN
    attribute: targetP
    value: { type: float, value: 605.0 }
  - op: snapshot
    label: base
    variant: InitialState
  - op: snapshot
    label: clone
";

    #[test]
    fn parse_scenario() {
        let scenario = Scenario::parse(SETPOINT_SCENARIO).unwrap();
        assert_eq!(scenario.name, "setpoint divergence");
        assert_eq!(scenario.steps.len(), 6);
        assert_eq!(
            scenario.steps.get(1),
            Some(&Step::CloneVariant {
                source: VariantId::initial(),
                targets: vec![VariantId::from("v1")],
                overwrite: false,
            })
        );
    }

    #[test]
    fn replay_captures_snapshots() {
        let scenario = Scenario::parse(SETPOINT_SCENARIO).unwrap();
        let report = replay(&GridlogConfig::default(), &scenario).unwrap();

        assert_eq!(report.steps, 6);
        assert_eq!(report.next_sequence, 2);
        let base = report.snapshots.first().unwrap();
        assert_eq!(base.label, "base");
        assert_eq!(base.changes.len(), 1);
        let clone = report.snapshots.get(1).unwrap();
        assert_eq!(clone.variant_id, VariantId::from("v1"));
        assert_eq!(clone.changes.len(), 2);
        assert_eq!(
            report.variants,
            vec![VariantId::initial(), VariantId::from("v1")]
        );
    }

    #[test]
    fn failing_step_reports_its_index() {
        let yaml = "name: bad\nsteps:\n  - op: remove\n    id: GHOST\n";
        let scenario = Scenario::parse(yaml).unwrap();
        let result = replay(&GridlogConfig::default(), &scenario);
        assert!(matches!(
            result,
            Err(ScenarioError::Step {
                index: 0,
                source: NetworkError::UnknownEntity { .. }
            })
        ));
    }

    #[test]
    fn unknown_op_is_a_yaml_error() {
        let yaml = "steps:\n  - op: explode\n";
        assert!(matches!(
            Scenario::parse(yaml),
            Err(ScenarioError::Yaml { .. })
        ));
    }

    #[test]
    fn report_serializes_to_json() {
        let scenario = Scenario::parse(SETPOINT_SCENARIO).unwrap();
        let report = replay(&GridlogConfig::default(), &scenario).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["scenario"], "setpoint divergence");
        assert_eq!(json["snapshots"][1]["changes"][1]["change"], "update");
    }
}
