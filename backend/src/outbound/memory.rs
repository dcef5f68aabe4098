//! In-process adapters used when no database or Redis URL is configured.
//!
//! Both adapters keep state behind a `std::sync::Mutex`; no lock is held
//! across an await point.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use pagination::PageParams;

use crate::domain::ports::{
    CouponCacheKey, CouponHashStore, CouponHashStoreError, CouponRepository,
    CouponRepositoryError,
};
use crate::domain::{Coupon, CouponCode, CouponPage, CouponPatch, NewCoupon};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn page_of<'a>(matches: impl Iterator<Item = &'a Coupon>, page: PageParams) -> CouponPage {
    let found: Vec<&Coupon> = matches.collect();
    let total = u64::try_from(found.len()).unwrap_or(u64::MAX);
    CouponPage {
        coupons: page.apply(found).cloned().collect(),
        total,
    }
}

/// `CouponRepository` over an ordered in-memory map.
///
/// Timestamps come from the injected clock, mirroring the column defaults of
/// the SQL adapter.
pub struct InMemoryCouponRepository {
    clock: Arc<dyn Clock>,
    coupons: Mutex<BTreeMap<String, Coupon>>,
}

impl InMemoryCouponRepository {
    /// Empty repository stamping records with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            coupons: Mutex::new(BTreeMap::new()),
        }
    }
}

#[async_trait]
impl CouponRepository for InMemoryCouponRepository {
    async fn create(&self, coupon: &NewCoupon) -> Result<Coupon, CouponRepositoryError> {
        let mut coupons = lock(&self.coupons);
        let code = coupon.code().as_str();
        if coupons.contains_key(code) {
            return Err(CouponRepositoryError::duplicate(code));
        }
        let stored = coupon.clone().into_coupon(self.clock.utc());
        coupons.insert(code.to_owned(), stored.clone());
        Ok(stored)
    }

    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError> {
        Ok(lock(&self.coupons).get(code.as_str()).cloned())
    }

    async fn update(
        &self,
        code: &CouponCode,
        patch: &CouponPatch,
    ) -> Result<Coupon, CouponRepositoryError> {
        let mut coupons = lock(&self.coupons);
        let coupon = coupons
            .get_mut(code.as_str())
            .ok_or_else(|| CouponRepositoryError::not_found(code.as_str()))?;
        patch.clone().apply_to(coupon, self.clock.utc());
        Ok(coupon.clone())
    }

    async fn delete(&self, code: &CouponCode) -> Result<(), CouponRepositoryError> {
        lock(&self.coupons)
            .remove(code.as_str())
            .map(|_| ())
            .ok_or_else(|| CouponRepositoryError::not_found(code.as_str()))
    }

    async fn list(&self, page: PageParams) -> Result<CouponPage, CouponRepositoryError> {
        let coupons = lock(&self.coupons);
        Ok(page_of(coupons.values(), page))
    }

    async fn search(
        &self,
        term: &str,
        page: PageParams,
    ) -> Result<CouponPage, CouponRepositoryError> {
        let coupons = lock(&self.coupons);
        Ok(page_of(
            coupons.values().filter(|coupon| coupon.code.as_str().contains(term)),
            page,
        ))
    }
}

#[derive(Debug, Default)]
struct HashEntry {
    fields: HashMap<String, String>,
    expires_at: Option<DateTime<Utc>>,
}

/// `CouponHashStore` over an in-memory map, honouring TTLs against the
/// injected clock.
pub struct InMemoryCouponHashStore {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, HashEntry>>,
}

impl InMemoryCouponHashStore {
    /// Empty store measuring expiry with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop `key` if its TTL has elapsed and return the live entries.
    fn live_entries(&self, key: &CouponCacheKey) -> MutexGuard<'_, HashMap<String, HashEntry>> {
        let now = self.clock.utc();
        let mut entries = lock(&self.entries);
        let expired = entries
            .get(key.as_str())
            .and_then(|entry| entry.expires_at)
            .is_some_and(|deadline| deadline <= now);
        if expired {
            entries.remove(key.as_str());
        }
        entries
    }
}

#[async_trait]
impl CouponHashStore for InMemoryCouponHashStore {
    async fn hash_get_all(
        &self,
        key: &CouponCacheKey,
    ) -> Result<HashMap<String, String>, CouponHashStoreError> {
        Ok(self
            .live_entries(key)
            .get(key.as_str())
            .map(|entry| entry.fields.clone())
            .unwrap_or_default())
    }

    async fn hash_set(
        &self,
        key: &CouponCacheKey,
        fields: &[(&'static str, String)],
    ) -> Result<(), CouponHashStoreError> {
        let mut entries = self.live_entries(key);
        let entry = entries.entry(key.as_str().to_owned()).or_default();
        for (field, value) in fields {
            entry.fields.insert((*field).to_owned(), value.clone());
        }
        Ok(())
    }

    async fn expire(&self, key: &CouponCacheKey, ttl: Duration) -> Result<(), CouponHashStoreError> {
        let lifetime = TimeDelta::from_std(ttl)
            .map_err(|err| CouponHashStoreError::backend(format!("invalid ttl: {err}")))?;
        let deadline = self.clock.utc() + lifetime;
        if let Some(entry) = self.live_entries(key).get_mut(key.as_str()) {
            entry.expires_at = Some(deadline);
        }
        Ok(())
    }

    async fn delete(&self, key: &CouponCacheKey) -> Result<(), CouponHashStoreError> {
        lock(&self.entries).remove(key.as_str());
        Ok(())
    }
}
