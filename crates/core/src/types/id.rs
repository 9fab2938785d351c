//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing identifiers from different entity types.

/// Macro to define a type-safe ID wrapper over a `String`.
///
/// Creates a newtype wrapper with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use bodega_core::define_id;
/// define_id!(ItemId);
/// define_id!(SessionId);
///
/// let item_id = ItemId::new("netflix-premium");
/// let session_id = SessionId::new("abc123");
///
/// // These are different types, so this won't compile:
/// // let _: ItemId = session_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Catalog items carry opaque, stable string ids assigned by the content file.
define_id!(ItemId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_round_trip() {
        let id = ItemId::new("netflix-premium");
        assert_eq!(id.as_str(), "netflix-premium");
        assert_eq!(id.to_string(), "netflix-premium");
        assert_eq!(String::from(id), "netflix-premium");
    }

    #[test]
    fn test_item_id_equality() {
        assert_eq!(ItemId::new("a"), ItemId::from("a"));
        assert_ne!(ItemId::new("a"), ItemId::new("b"));
    }

    #[test]
    fn test_item_id_serde_transparent() {
        let id = ItemId::new("combo-cine");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"combo-cine\"");

        let back: ItemId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
