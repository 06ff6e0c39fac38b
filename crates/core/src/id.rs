//! Strongly-typed identifiers used across the domain.
//!
//! Domain crates declare their own identifier newtypes with [`uuid_newtype!`]
//! so every entity gets a distinct type over the same UUIDv7 representation.

#[doc(hidden)]
pub use uuid::Uuid as __Uuid;

/// Declare a `Copy` UUID newtype with constructors, `Display`, `FromStr` and
/// transparent serde.
///
/// ```ignore
/// cannareg_core::uuid_newtype!(ProductId, "ProductId");
/// ```
#[macro_export]
macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t($crate::id::__Uuid);

        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self($crate::id::__Uuid::now_v7())
            }

            pub fn from_uuid(uuid: $crate::id::__Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &$crate::id::__Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::id::__Uuid> for $t {
            fn from(value: $crate::id::__Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $crate::id::__Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = <$crate::id::__Uuid as core::str::FromStr>::from_str(s)
                    .map_err(|e| $crate::DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}
