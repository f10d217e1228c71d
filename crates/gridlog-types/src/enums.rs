//! Enumeration types for the network changelog.
//!
//! Entity kinds mirror the IIDM identifiable types. Scopes describe which
//! variants can see a recorded change.

use serde::{Deserialize, Serialize};

use crate::ids::VariantId;

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The kind of network object a change applies to.
///
/// The classifier keys its table on this kind together with the attribute
/// name, so two kinds may classify the same attribute name differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// The network itself.
    Network,
    /// A substation grouping voltage levels.
    Substation,
    /// A voltage level inside a substation.
    VoltageLevel,
    /// An electrical bus (bus/breaker or calculated).
    Bus,
    /// A busbar section in node/breaker topology.
    BusbarSection,
    /// A breaker, disconnector or load break switch.
    Switch,
    /// An AC line.
    Line,
    /// A tie line joining two half lines across a boundary.
    TieLine,
    /// A two windings transformer.
    TwoWindingsTransformer,
    /// A three windings transformer.
    ThreeWindingsTransformer,
    /// A generator.
    Generator,
    /// A battery.
    Battery,
    /// A load.
    Load,
    /// A shunt compensator.
    ShuntCompensator,
    /// A dangling line.
    DanglingLine,
    /// A static VAR compensator.
    StaticVarCompensator,
    /// An HVDC line.
    HvdcLine,
    /// An HVDC converter station (LCC or VSC).
    HvdcConverterStation,
}

impl EntityKind {
    /// Every entity kind, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Network,
        Self::Substation,
        Self::VoltageLevel,
        Self::Bus,
        Self::BusbarSection,
        Self::Switch,
        Self::Line,
        Self::TieLine,
        Self::TwoWindingsTransformer,
        Self::ThreeWindingsTransformer,
        Self::Generator,
        Self::Battery,
        Self::Load,
        Self::ShuntCompensator,
        Self::DanglingLine,
        Self::StaticVarCompensator,
        Self::HvdcLine,
        Self::HvdcConverterStation,
    ];

    /// Whether objects of this kind are branches (two or more terminals).
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Self::Line
                | Self::TieLine
                | Self::TwoWindingsTransformer
                | Self::ThreeWindingsTransformer
        )
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Substation => "substation",
            Self::VoltageLevel => "voltage_level",
            Self::Bus => "bus",
            Self::BusbarSection => "busbar_section",
            Self::Switch => "switch",
            Self::Line => "line",
            Self::TieLine => "tie_line",
            Self::TwoWindingsTransformer => "two_windings_transformer",
            Self::ThreeWindingsTransformer => "three_windings_transformer",
            Self::Generator => "generator",
            Self::Battery => "battery",
            Self::Load => "load",
            Self::ShuntCompensator => "shunt_compensator",
            Self::DanglingLine => "dangling_line",
            Self::StaticVarCompensator => "static_var_compensator",
            Self::HvdcLine => "hvdc_line",
            Self::HvdcConverterStation => "hvdc_converter_station",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

/// Classifier output for an attribute update.
///
/// Carries no variant identifier: the changelog binds a
/// [`Classification::VariantLocal`] result to the working variant at append
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Visible to every variant, past and future.
    Shared,
    /// Visible to the recording variant and to its later clones only.
    VariantLocal,
}

/// Visibility scope stored on a recorded change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Visible to every registered variant regardless of when or under
    /// which variant it was recorded.
    Shared,
    /// Visible to the named variant and to variants cloned from it after
    /// the change was recorded.
    VariantLocal(VariantId),
}

impl Scope {
    /// Bind a classifier result to the variant that was working when the
    /// change was recorded.
    pub fn bind(classification: Classification, working_variant: &VariantId) -> Self {
        match classification {
            Classification::Shared => Self::Shared,
            Classification::VariantLocal => Self::VariantLocal(working_variant.clone()),
        }
    }

    /// Whether the scope is [`Scope::Shared`].
    pub const fn is_shared(&self) -> bool {
        matches!(self, Self::Shared)
    }

    /// The variant a variant-local change was recorded under.
    pub const fn variant(&self) -> Option<&VariantId> {
        match self {
            Self::Shared => None,
            Self::VariantLocal(variant) => Some(variant),
        }
    }

    /// The classification this scope was bound from.
    pub const fn classification(&self) -> Classification {
        match self {
            Self::Shared => Classification::Shared,
            Self::VariantLocal(_) => Classification::VariantLocal,
        }
    }
}

// ---------------------------------------------------------------------------
// Change kinds
// ---------------------------------------------------------------------------

/// The kind of mutation a change record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// A network object was created.
    Creation,
    /// An attribute of a network object changed value.
    Update,
    /// A network object was removed.
    Removal,
}
