//! Host-side glue around the gridlog changelog.
//!
//! This crate plays the part of the network model that feeds a changelog:
//! it loads configuration, manages variants, applies mutations to a small
//! tracked model, and replays scripted scenarios against it.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `gridlog-config.yaml` into
//!   strongly-typed structs.
//! - [`variant`] -- [`VariantManager`], the registry of live variants and the
//!   working variant.
//! - [`network`] -- [`TrackedNetwork`], a minimal model reporting every
//!   mutation through a `MutationSink`.
//! - [`scenario`] -- YAML scenarios and [`replay`].
//!
//! [`VariantManager`]: variant::VariantManager
//! [`TrackedNetwork`]: network::TrackedNetwork
//! [`replay`]: scenario::replay

pub mod config;
pub mod network;
pub mod scenario;
pub mod variant;
