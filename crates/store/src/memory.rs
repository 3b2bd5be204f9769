use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use common::{BakedGoodId, BakeryId};

use crate::{
    BakedGood, Bakery, NewBakedGood, Result,
    store::BakeryStore,
};

#[derive(Default)]
struct Inner {
    bakeries: Vec<Bakery>,
    baked_goods: Vec<BakedGood>,
    next_bakery_id: i64,
    next_baked_good_id: i64,
}

/// In-memory store implementation for testing and database-less runs.
///
/// Rows live in insertion order inside a shared `RwLock`, which matches the
/// id order the PostgreSQL implementation produces. No referential check is
/// made on `bakery_id`, so inserting a baked good for an unknown bakery
/// succeeds here while the PostgreSQL schema rejects it.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a bakery row directly.
    ///
    /// There is no HTTP operation that creates bakeries, so tests and
    /// database-less runs seed them through this method.
    pub async fn insert_bakery(&self, name: impl Into<String>) -> Bakery {
        let mut inner = self.inner.write().await;
        inner.next_bakery_id += 1;
        let bakery = Bakery {
            id: BakeryId::new(inner.next_bakery_id),
            name: name.into(),
            created_at: Utc::now(),
        };
        inner.bakeries.push(bakery.clone());
        bakery
    }

    /// Returns the number of baked good rows currently stored.
    pub async fn baked_good_count(&self) -> usize {
        self.inner.read().await.baked_goods.len()
    }

    /// Clears all rows.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.bakeries.clear();
        inner.baked_goods.clear();
    }
}

#[async_trait]
impl BakeryStore for InMemoryStore {
    async fn list_bakeries(&self) -> Result<Vec<Bakery>> {
        Ok(self.inner.read().await.bakeries.clone())
    }

    async fn get_bakery(&self, id: BakeryId) -> Result<Option<Bakery>> {
        let inner = self.inner.read().await;
        Ok(inner.bakeries.iter().find(|b| b.id == id).cloned())
    }

    async fn rename_bakery(&self, id: BakeryId, name: &str) -> Result<Option<Bakery>> {
        let mut inner = self.inner.write().await;
        match inner.bakeries.iter_mut().find(|b| b.id == id) {
            Some(bakery) => {
                bakery.name = name.to_string();
                Ok(Some(bakery.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_baked_goods(&self) -> Result<Vec<BakedGood>> {
        Ok(self.inner.read().await.baked_goods.clone())
    }

    async fn baked_goods_for_bakery(&self, bakery_id: BakeryId) -> Result<Vec<BakedGood>> {
        let inner = self.inner.read().await;
        Ok(inner
            .baked_goods
            .iter()
            .filter(|g| g.bakery_id == bakery_id)
            .cloned()
            .collect())
    }

    async fn baked_goods_by_price(&self) -> Result<Vec<BakedGood>> {
        let inner = self.inner.read().await;
        let mut goods = inner.baked_goods.clone();
        // Stable sort keeps insertion (id) order among equal prices.
        goods.sort_by(|a, b| b.price.total_cmp(&a.price));
        Ok(goods)
    }

    async fn most_expensive_baked_good(&self) -> Result<Option<BakedGood>> {
        let inner = self.inner.read().await;
        let mut best: Option<&BakedGood> = None;
        for good in &inner.baked_goods {
            // Strict comparison: the earliest row wins price ties, matching
            // the first element of the by_price order.
            if best.is_none_or(|b| good.price > b.price) {
                best = Some(good);
            }
        }
        Ok(best.cloned())
    }

    async fn insert_baked_good(&self, new: NewBakedGood) -> Result<BakedGood> {
        let mut inner = self.inner.write().await;
        inner.next_baked_good_id += 1;
        let good = BakedGood {
            id: BakedGoodId::new(inner.next_baked_good_id),
            name: new.name,
            price: new.price,
            bakery_id: new.bakery_id,
            created_at: Utc::now(),
        };
        inner.baked_goods.push(good.clone());
        Ok(good)
    }

    async fn delete_baked_good(&self, id: BakedGoodId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.baked_goods.iter().position(|g| g.id == id) {
            Some(index) => {
                inner.baked_goods.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
