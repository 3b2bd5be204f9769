use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{BakedGoodId, BakeryId};

/// A bakery row.
///
/// Owns zero or more [`BakedGood`] rows through their `bakery_id` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bakery {
    /// Store-assigned primary key.
    pub id: BakeryId,

    /// Display name of the bakery.
    pub name: String,

    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// A baked good row belonging to one bakery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BakedGood {
    /// Store-assigned primary key.
    pub id: BakedGoodId,

    /// Display name of the baked good.
    pub name: String,

    /// Unit price. Non-negative by convention, not enforced.
    pub price: f64,

    /// The bakery this row belongs to.
    pub bakery_id: BakeryId,

    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Fields for inserting a baked good; the store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBakedGood {
    pub name: String,
    pub price: f64,
    pub bakery_id: BakeryId,
}

impl NewBakedGood {
    pub fn new(name: impl Into<String>, price: f64, bakery_id: BakeryId) -> Self {
        Self {
            name: name.into(),
            price,
            bakery_id,
        }
    }
}
