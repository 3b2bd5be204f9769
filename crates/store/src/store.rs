use async_trait::async_trait;

use common::{BakedGoodId, BakeryId};

use crate::{BakedGood, Bakery, NewBakedGood, Result};

/// Core trait for store implementations.
///
/// The store persists bakery and baked good rows and answers the handful of
/// queries the HTTP surface needs. All implementations must be thread-safe
/// (Send + Sync). Rows are returned in id (insertion) order unless an
/// operation documents otherwise.
#[async_trait]
pub trait BakeryStore: Send + Sync {
    /// Retrieves all bakeries.
    async fn list_bakeries(&self) -> Result<Vec<Bakery>>;

    /// Retrieves a single bakery.
    ///
    /// Returns None if no row has the given id.
    async fn get_bakery(&self, id: BakeryId) -> Result<Option<Bakery>>;

    /// Replaces a bakery's name and returns the updated row.
    ///
    /// Returns None if no row has the given id.
    async fn rename_bakery(&self, id: BakeryId, name: &str) -> Result<Option<Bakery>>;

    /// Retrieves all baked goods.
    async fn list_baked_goods(&self) -> Result<Vec<BakedGood>>;

    /// Retrieves the baked goods belonging to one bakery.
    async fn baked_goods_for_bakery(&self, bakery_id: BakeryId) -> Result<Vec<BakedGood>>;

    /// Retrieves all baked goods ordered by price descending.
    ///
    /// Ties are broken by id ascending, so the order is stable across
    /// repeated calls and identical between implementations.
    async fn baked_goods_by_price(&self) -> Result<Vec<BakedGood>>;

    /// Retrieves the highest-priced baked good.
    ///
    /// This is the first element of [`baked_goods_by_price`]'s order.
    /// Returns None if the store holds no baked goods.
    ///
    /// [`baked_goods_by_price`]: BakeryStore::baked_goods_by_price
    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>>;

    /// Inserts a baked good and returns the stored row with its assigned id
    /// and creation timestamp.
    ///
    /// No existence check is performed on `bakery_id`; whether a dangling
    /// reference is rejected depends on the backend's schema.
    async fn insert_baked_good(&self, new: NewBakedGood) -> Result<BakedGood>;

    /// Deletes a baked good.
    ///
    /// Returns whether a row was removed.
    async fn delete_baked_good(&self, id: BakedGoodId) -> Result<bool>;
}
