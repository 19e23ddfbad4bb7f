//! External (original) identifiers.
//!
//! Source tables key nodes and arcs by whatever the data provider uses:
//! integers, UUIDs, road codes.  `ExtId` keeps the textual form so both kinds
//! hash and compare the same way; integer ids are formatted in decimal.

use std::borrow::Borrow;
use std::fmt;

/// A stable identifier as it appears in the caller's data.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExtId(String);

impl ExtId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the empty identifier, used by synthetic arcs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ExtId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExtId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ExtId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&ExtId> for ExtId {
    fn from(id: &ExtId) -> Self {
        id.clone()
    }
}

macro_rules! ext_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ExtId {
            fn from(n: $t) -> Self {
                Self(n.to_string())
            }
        })*
    };
}

ext_from_int!(u32, u64, i32, i64, usize);
