//! Type-safe identifier wrappers around network model identifiers.
//!
//! IIDM identifies every network object and every variant by a plain
//! string. The newtypes here keep entity and variant identifiers from being
//! mixed up at compile time while serializing as bare strings.

use serde::{Deserialize, Serialize};

/// Identifier of the variant that exists in every network from creation.
pub const INITIAL_VARIANT_ID: &str = "InitialState";

/// Generates a newtype wrapper around [`String`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub const fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Return the inner [`String`] value.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identifier of a network object (bus, line, generator, ...).
    EntityId
}

define_id! {
    /// Identifier of a variant, an independent working copy of the
    /// network's mutable state.
    VariantId
}

impl VariantId {
    /// The variant every network starts with.
    pub fn initial() -> Self {
        Self::from(INITIAL_VARIANT_ID)
    }

    /// Whether this is the initial variant.
    pub fn is_initial(&self) -> bool {
        self.0 == INITIAL_VARIANT_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_variant_id_matches_constant() {
        let initial = VariantId::initial();
        assert_eq!(initial.as_str(), INITIAL_VARIANT_ID);
        assert!(initial.is_initial());
        assert!(!VariantId::from("v1").is_initial());
    }

    #[test]
    fn ids_serialize_as_bare_strings() {
        let id = EntityId::from("GEN");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"GEN\""));

        let restored: Result<VariantId, _> = serde_json::from_str("\"v2\"");
        assert_eq!(restored.ok(), Some(VariantId::from("v2")));
    }

    #[test]
    fn id_display_matches_inner_string() {
        let id = EntityId::new(String::from("NHV1_NHV2_1"));
        assert_eq!(id.to_string(), "NHV1_NHV2_1");
        assert_eq!(id.into_inner(), "NHV1_NHV2_1");
    }
}
