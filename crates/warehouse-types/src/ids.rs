//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Rounds are identified with UUID v7 (time-ordered) so that a subscriber
//! can tell a freshly started round apart from the one it was watching.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a single round (one `start_game` call).
    RoundId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_ids_are_unique() {
        let first = RoundId::new();
        let second = RoundId::new();
        assert_ne!(first, second);
    }

    #[test]
    fn round_id_round_trips_through_uuid() {
        let id = RoundId::new();
        let raw: Uuid = id.into();
        assert_eq!(RoundId::from(raw), id);
        assert_eq!(id.to_string(), raw.to_string());
    }
}
