//! Newtype IDs for type-safe entity references.
//!
//! Shopify identifies everything with opaque global ids
//! (`gid://shopify/ProductVariant/123`). Use the `define_id!` macro to create
//! wrappers that prevent accidentally mixing ids from different entity types.

use thiserror::Error;

/// Errors that can occur when parsing an id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The input string is empty or whitespace.
    #[error("id cannot be empty")]
    Empty,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` that reject empty ids
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `parse()`, `as_str()`
/// - `TryFrom<String>`/`TryFrom<&str>` and `From<$name> for String`
///
/// # Example
///
/// ```rust
/// # use shopfront_core::define_id;
/// define_id!(OrderGid);
///
/// let id = OrderGid::parse("gid://shopify/Order/1").unwrap();
/// assert_eq!(id.as_str(), "gid://shopify/Order/1");
/// assert!(OrderGid::parse("  ").is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Parse an id, rejecting empty or whitespace-only input.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if the input is blank.
            pub fn parse(id: impl Into<String>) -> ::core::result::Result<Self, $crate::types::id::IdError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err($crate::types::id::IdError::Empty);
                }
                Ok(Self(id))
            }

            /// Get the underlying id string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::TryFrom<String> for $name {
            type Error = $crate::types::id::IdError;

            fn try_from(id: String) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(id)
            }
        }

        impl ::core::convert::TryFrom<&str> for $name {
            type Error = $crate::types::id::IdError;

            fn try_from(id: &str) -> ::core::result::Result<Self, Self::Error> {
                Self::parse(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(VariantId);
