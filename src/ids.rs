//! Identifiers of the records handled by this crate

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declares an opaque string identifier.
///
/// The remote service hands out ids of its own (numbers, UUIDs...), so ids are never parsed, only compared.
macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            content: String,
        }

        impl $name {
            /// Generate a random id.
            pub fn random() -> Self {
                let random = uuid::Uuid::new_v4().to_hyphenated().to_string();
                Self { content: random }
            }

            pub fn as_str(&self) -> &str {
                &self.content
            }
        }

        impl From<String> for $name {
            fn from(content: String) -> Self {
                Self { content }
            }
        }

        impl From<&str> for $name {
            fn from(content: &str) -> Self {
                Self { content: content.to_string() }
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::from(s))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(f, "{}", self.content)
            }
        }

        /// Used to support serde
        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.content)
            }
        }

        /// Used to support serde
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<$name, D::Error>
            where
                D: Deserializer<'de>,
            {
                let content = String::deserialize(deserializer)?;
                Ok($name { content })
            }
        }
    };
}

string_id!(
    /// The id of an [`Event`](crate::Event)
    EventId
);
string_id!(
    /// The id of a [`Task`](crate::Task)
    TaskId
);
string_id!(
    /// The id of a [`Manager`](crate::Manager). This is the `user_id` of its profile.
    ManagerId
);
