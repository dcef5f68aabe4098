//! Behaviour of the coupon cache against a mocked hash store.

use std::collections::HashMap;

use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockCouponHashStore;
use crate::test_support::{RecordingTaskSpawner, sample_coupon};

const TTL: Duration = Duration::from_secs(90);

#[fixture]
fn coupon() -> Coupon {
    sample_coupon("CACHED")
}

fn key_for(coupon: &Coupon) -> CouponCacheKey {
    CouponCacheKey::for_code(&coupon.code)
}

fn hash_of(coupon: &Coupon) -> HashMap<String, String> {
    fields::encode(coupon)
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

fn cache_with(store: MockCouponHashStore) -> (CouponCache, Arc<RecordingTaskSpawner>) {
    let spawner = Arc::new(RecordingTaskSpawner::new());
    let cache = CouponCache::new(
        Arc::new(store),
        spawner.clone(),
        CacheSettings { ttl: TTL },
    );
    (cache, spawner)
}

#[rstest]
fn default_ttl_is_one_hour() {
    assert_eq!(CacheSettings::default().ttl, Duration::from_secs(3600));
}

#[rstest]
#[tokio::test]
async fn get_reports_miss_for_empty_hash(coupon: Coupon) {
    let mut store = MockCouponHashStore::new();
    store
        .expect_hash_get_all()
        .with(eq(key_for(&coupon)))
        .times(1)
        .returning(|_| Ok(HashMap::new()));
    let (cache, _) = cache_with(store);

    let lookup = cache.get(&coupon.code).await.expect("read succeeds");
    assert_eq!(lookup, CacheLookup::Miss);
}

#[rstest]
#[tokio::test]
async fn get_decodes_hit(coupon: Coupon) {
    let hash = hash_of(&coupon);
    let mut store = MockCouponHashStore::new();
    store
        .expect_hash_get_all()
        .times(1)
        .returning(move |_| Ok(hash.clone()));
    let (cache, _) = cache_with(store);

    let lookup = cache.get(&coupon.code).await.expect("read succeeds");
    assert_eq!(lookup, CacheLookup::Hit(coupon));
}

#[rstest]
#[tokio::test]
async fn get_surfaces_corrupt_entries(coupon: Coupon) {
    let mut hash = hash_of(&coupon);
    hash.insert("coupon_value".to_owned(), "NaN-ish".to_owned());
    let mut store = MockCouponHashStore::new();
    store
        .expect_hash_get_all()
        .returning(move |_| Ok(hash.clone()));
    let (cache, _) = cache_with(store);

    let err = cache.get(&coupon.code).await.expect_err("corrupt entry");
    assert!(matches!(err, CacheError::Corrupt { ref field, .. } if field == "coupon_value"));
}

#[rstest]
#[case::backend(Err(CouponHashStoreError::backend("connection refused")))]
#[case::corrupt(Ok(HashMap::from([("title".to_owned(), "orphan".to_owned())])))]
#[tokio::test]
async fn lookup_treats_failures_as_miss(
    coupon: Coupon,
    #[case] reply: Result<HashMap<String, String>, CouponHashStoreError>,
) {
    let mut store = MockCouponHashStore::new();
    store
        .expect_hash_get_all()
        .returning(move |_| reply.clone());
    let (cache, _) = cache_with(store);

    assert_eq!(cache.lookup(&coupon.code).await, None);
}

#[rstest]
#[tokio::test]
async fn populate_is_deferred_until_task_runs(coupon: Coupon) {
    let expected_fields = fields::encode(&coupon);
    let mut store = MockCouponHashStore::new();
    store
        .expect_hash_set()
        .withf(move |key, written| {
            key.as_str() == "coupon:CACHED" && written == expected_fields.as_slice()
        })
        .times(1)
        .returning(|_, _| Ok(()));
    store
        .expect_expire()
        .with(eq(key_for(&coupon)), eq(TTL))
        .times(1)
        .returning(|_, _| Ok(()));
    let (cache, spawner) = cache_with(store);

    cache.populate(&coupon);
    assert_eq!(spawner.pending(), 1);

    spawner.run_pending().await;
    assert_eq!(spawner.pending(), 0);
}

#[rstest]
#[tokio::test]
async fn populate_failure_is_swallowed(coupon: Coupon) {
    let mut store = MockCouponHashStore::new();
    store
        .expect_hash_set()
        .times(1)
        .returning(|_, _| Err(CouponHashStoreError::backend("down")));
    store.expect_expire().never();
    let (cache, spawner) = cache_with(store);

    cache.refresh(&coupon);
    spawner.run_pending().await;
}

#[rstest]
#[tokio::test]
async fn populate_now_drops_entry_when_ttl_cannot_be_set(coupon: Coupon) {
    let mut store = MockCouponHashStore::new();
    store.expect_hash_set().returning(|_, _| Ok(()));
    store
        .expect_expire()
        .returning(|_, _| Err(CouponHashStoreError::backend("timeout")));
    store
        .expect_delete()
        .with(eq(key_for(&coupon)))
        .times(1)
        .returning(|_| Ok(()));
    let (cache, _) = cache_with(store);

    let err = cache.populate_now(&coupon).await.expect_err("expire failed");
    assert_eq!(err, CacheError::backend("timeout"));
}

#[rstest]
#[tokio::test]
async fn invalidate_deletes_key_in_background(coupon: Coupon) {
    let mut store = MockCouponHashStore::new();
    store
        .expect_delete()
        .with(eq(key_for(&coupon)))
        .times(1)
        .returning(|_| Ok(()));
    let (cache, spawner) = cache_with(store);

    cache.invalidate(&coupon.code);
    assert_eq!(spawner.pending(), 1);
    spawner.run_pending().await;
}

#[rstest]
#[tokio::test]
async fn invalidate_now_reports_backend_errors(coupon: Coupon) {
    let mut store = MockCouponHashStore::new();
    store
        .expect_delete()
        .returning(|_| Err(CouponHashStoreError::backend("readonly replica")));
    let (cache, _) = cache_with(store);

    let err = cache.invalidate_now(&coupon.code).await.expect_err("delete failed");
    assert_eq!(err.to_string(), "coupon cache backend failure: readonly replica");
}
