use serde::{Deserialize, Serialize};

/// Unique identifier for a bakery row.
///
/// Wraps the store-assigned integer key to provide type safety and prevent
/// mixing up bakery ids with other integer-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BakeryId(i64);

impl BakeryId {
    /// Creates a bakery ID from a raw key value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw key value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BakeryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BakeryId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<BakeryId> for i64 {
    fn from(id: BakeryId) -> Self {
        id.0
    }
}

/// Unique identifier for a baked good row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BakedGoodId(i64);

impl BakedGoodId {
    /// Creates a baked good ID from a raw key value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw key value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BakedGoodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BakedGoodId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<BakedGoodId> for i64 {
    fn from(id: BakedGoodId) -> Self {
        id.0
    }
}
