//! Classification of attribute updates into shared or variant-local scope.
//!
//! The [`Classifier`] is an explicit table keyed by entity kind and
//! attribute name. It never inspects values and never fails: attributes
//! absent from the table fall back to a configurable classification, which
//! defaults to [`Classification::Shared`].
//!
//! # Standard table
//!
//! [`Classifier::standard`] encodes the IIDM policy:
//!
//! | Category | Examples | Classification |
//! |----------|----------|----------------|
//! | Setpoints | `targetP`, `targetQ`, `targetV`, `p0`, `q0` | variant-local |
//! | Regulation state | `voltageRegulatorOn`, `regulating`, `tapPosition` | variant-local |
//! | Measured flows | `p`, `q`, `p1`, `q1`, `p2`, `q2` | variant-local |
//! | Bus state | `v`, `angle` | variant-local |
//! | Topology state | switch `open`, shunt `sectionCount` | variant-local |
//! | Static parameters | `r`, `x`, `g`, `b`, `nominalV`, `minP`, `maxP` | shared |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gridlog_types::{Classification, EntityKind};

/// One explicit table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    /// Entity kind the rule applies to.
    pub kind: EntityKind,
    /// Attribute name, as reported by the host model.
    pub attribute: String,
    /// Resulting classification.
    pub scope: Classification,
}

/// Operating-point and state attributes, per entity kind.
const VARIANT_LOCAL_ATTRIBUTES: &[(EntityKind, &[&str])] = &[
    (EntityKind::Bus, &["v", "angle"]),
    (EntityKind::Switch, &["open"]),
    (EntityKind::VoltageLevel, &["fictitiousP0", "fictitiousQ0"]),
    (EntityKind::Line, &["p1", "q1", "p2", "q2"]),
    (EntityKind::TieLine, &["p1", "q1", "p2", "q2"]),
    (
        EntityKind::TwoWindingsTransformer,
        &[
            "p1",
            "q1",
            "p2",
            "q2",
            "tapPosition",
            "regulating",
            "targetV",
            "targetDeadband",
            "regulationValue",
        ],
    ),
    (
        EntityKind::ThreeWindingsTransformer,
        &[
            "p1",
            "q1",
            "p2",
            "q2",
            "p3",
            "q3",
            "tapPosition",
            "regulating",
            "targetV",
            "targetDeadband",
        ],
    ),
    (
        EntityKind::Generator,
        &["targetP", "targetQ", "targetV", "voltageRegulatorOn", "p", "q"],
    ),
    (EntityKind::Battery, &["targetP", "targetQ", "p", "q"]),
    (EntityKind::Load, &["p0", "q0", "p", "q"]),
    (EntityKind::ShuntCompensator, &["sectionCount", "q"]),
    (
        EntityKind::DanglingLine,
        &[
            "p0",
            "q0",
            "targetP",
            "targetQ",
            "targetV",
            "voltageRegulationOn",
            "p",
            "q",
        ],
    ),
    (
        EntityKind::StaticVarCompensator,
        &[
            "regulationMode",
            "voltageSetpoint",
            "reactivePowerSetpoint",
            "q",
        ],
    ),
    (EntityKind::HvdcLine, &["activePowerSetpoint", "convertersMode"]),
    (
        EntityKind::HvdcConverterStation,
        &[
            "voltageSetpoint",
            "reactivePowerSetpoint",
            "voltageRegulatorOn",
            "p",
            "q",
        ],
    ),
];

/// Static equipment parameters, listed so the table documents them.
const SHARED_ATTRIBUTES: &[(EntityKind, &[&str])] = &[
    (
        EntityKind::VoltageLevel,
        &["nominalV", "lowVoltageLimit", "highVoltageLimit", "topologyKind"],
    ),
    (EntityKind::Line, &["r", "x", "g1", "b1", "g2", "b2"]),
    (EntityKind::TieLine, &["r", "x", "g1", "b1", "g2", "b2"]),
    (
        EntityKind::TwoWindingsTransformer,
        &["r", "x", "g", "b", "ratedU1", "ratedU2", "ratedS"],
    ),
    (EntityKind::ThreeWindingsTransformer, &["ratedU0"]),
    (
        EntityKind::Generator,
        &["minP", "maxP", "ratedS", "energySource"],
    ),
    (EntityKind::Battery, &["minP", "maxP"]),
    (EntityKind::Load, &["loadType"]),
    (EntityKind::ShuntCompensator, &["maximumSectionCount"]),
    (EntityKind::DanglingLine, &["r", "x", "g", "b"]),
    (EntityKind::StaticVarCompensator, &["bMin", "bMax"]),
    (EntityKind::HvdcLine, &["r", "nominalV", "maxP"]),
    (EntityKind::HvdcConverterStation, &["lossFactor"]),
];

/// Maps `(entity kind, attribute name)` to a [`Classification`].
///
/// # Examples
///
/// ```
/// use gridlog_changelog::Classifier;
/// use gridlog_types::{Classification, EntityKind};
///
/// let classifier = Classifier::standard();
/// assert_eq!(
///     classifier.classify(EntityKind::Generator, "targetP"),
///     Classification::VariantLocal,
/// );
/// assert_eq!(
///     classifier.classify(EntityKind::Line, "r"),
///     Classification::Shared,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    table: BTreeMap<EntityKind, BTreeMap<String, Classification>>,
    fallback: Classification,
}

impl Classifier {
    /// Create a classifier with an empty table.
    pub const fn new(fallback: Classification) -> Self {
        Self {
            table: BTreeMap::new(),
            fallback,
        }
    }

    /// Create a classifier holding the standard IIDM table and a shared
    /// fallback.
    pub fn standard() -> Self {
        let mut classifier = Self::new(Classification::Shared);
        for (kind, attributes) in SHARED_ATTRIBUTES {
            for attribute in *attributes {
                classifier.insert(*kind, attribute, Classification::Shared);
            }
        }
        for (kind, attributes) in VARIANT_LOCAL_ATTRIBUTES {
            for attribute in *attributes {
                classifier.insert(*kind, attribute, Classification::VariantLocal);
            }
        }
        classifier
    }

    /// Add or replace a table entry.
    #[must_use]
    pub fn with_rule(
        mut self,
        kind: EntityKind,
        attribute: &str,
        scope: Classification,
    ) -> Self {
        self.insert(kind, attribute, scope);
        self
    }

    /// Replace the classification used for attributes absent from the table.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: Classification) -> Self {
        self.fallback = fallback;
        self
    }

    /// Add or replace a table entry, returning the previous classification.
    pub fn insert(
        &mut self,
        kind: EntityKind,
        attribute: &str,
        scope: Classification,
    ) -> Option<Classification> {
        self.table
            .entry(kind)
            .or_default()
            .insert(attribute.to_owned(), scope)
    }

    /// Apply a rule, returning the previous classification.
    pub fn apply(&mut self, rule: &ClassificationRule) -> Option<Classification> {
        self.insert(rule.kind, &rule.attribute, rule.scope)
    }

    /// Classify an update to `attribute` on an entity of `kind`.
    pub fn classify(&self, kind: EntityKind, attribute: &str) -> Classification {
        self.lookup(kind, attribute).unwrap_or(self.fallback)
    }

    /// The explicit table entry, without falling back.
    pub fn lookup(&self, kind: EntityKind, attribute: &str) -> Option<Classification> {
        self.table
            .get(&kind)
            .and_then(|attributes| attributes.get(attribute))
            .copied()
    }

    /// Classification used for attributes absent from the table.
    pub const fn fallback(&self) -> Classification {
        self.fallback
    }

    /// Every table entry, ordered by kind then attribute name.
    pub fn rules(&self) -> Vec<ClassificationRule> {
        self.table
            .iter()
            .flat_map(|(kind, attributes)| {
                attributes
                    .iter()
                    .map(move |(attribute, scope)| ClassificationRule {
                        kind: *kind,
                        attribute: attribute.clone(),
                        scope: *scope,
                    })
            })
            .collect()
    }

    /// Number of table entries.
    pub fn len(&self) -> usize {
        self.table.values().map(BTreeMap::len).sum()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.table.values().all(BTreeMap::is_empty)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}
