//! Content cache tests: sliding TTL behavior and concurrent access.


use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dispatchkit::ContentCache;
use parking_lot::Mutex;
use tracing_util::TestTracing;

fn bytes(n: usize) -> Vec<u8> {
    vec![0x5A; n]
}

#[test]
fn a_hit_restarts_the_ttl_window() {
    let cache = ContentCache::builder()
        .capacity_bytes(1024)
        .time_to_live(Duration::from_millis(400))
        .build();
    cache.put("page", bytes(16));

    // Two reads at 250ms spacing: each lands inside the window opened by the
    // previous touch, even though 500ms total exceeds the TTL.
    thread::sleep(Duration::from_millis(250));
    assert!(cache.get("page").is_some());
    thread::sleep(Duration::from_millis(250));
    assert!(cache.get("page").is_some());

    // Left untouched for a full window, the entry expires.
    thread::sleep(Duration::from_millis(500));
    assert!(cache.get("page").is_none());
}

#[test]
fn expiry_is_lazy_and_releases_the_budget() {
    let _tracing = TestTracing::init();
    let cache = ContentCache::builder()
        .capacity_bytes(1024)
        .time_to_live(Duration::from_millis(100))
        .build();
    cache.put("page", bytes(32));
    assert_eq!(cache.occupied_bytes(), 32);

    thread::sleep(Duration::from_millis(200));
    // Nothing is reaped until a lookup finds the stale entry.
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.occupied_bytes(), 32);

    assert!(cache.get("page").is_none());
    assert_eq!(cache.len(), 0);
    assert_eq!(cache.occupied_bytes(), 0);
}

#[test]
fn a_recent_put_shields_an_entry_from_eviction_longer_than_stale_peers() {
    let cache = ContentCache::builder().capacity_bytes(30).build();
    cache.put("a", bytes(10));
    cache.put("b", bytes(10));
    cache.put("c", bytes(10));
    // Touch "a" so "b" is now the oldest.
    assert!(cache.get("a").is_some());

    cache.put("d", bytes(10));
    assert!(cache.get("b").is_none());
    assert!(cache.get("a").is_some());
    assert!(cache.get("c").is_some());
    assert!(cache.get("d").is_some());
}

#[test]
fn concurrent_writers_keep_the_budget_exact() {
    let cache = Arc::new(ContentCache::builder().capacity_bytes(1 << 20).build());

    thread::scope(|scope| {
        for worker in 0..8 {
            let cache = Arc::clone(&cache);
            scope.spawn(move || {
                for item in 0..20 {
                    cache.put(&format!("w{worker}-{item}"), bytes(10));
                    // Everyone also hammers one shared key.
                    cache.put("shared", bytes(10));
                }
            });
        }
    });

    assert_eq!(cache.len(), 8 * 20 + 1);
    assert_eq!(cache.occupied_bytes(), 8 * 20 * 10 + 10);
    for worker in 0..8 {
        for item in 0..20 {
            assert!(cache.get(&format!("w{worker}-{item}")).is_some());
        }
    }
}

#[test]
fn concurrent_readers_share_one_entry() {
    let cache = Arc::new(ContentCache::builder().capacity_bytes(1024).build());
    cache.put("page", bytes(64));

    let payloads: Mutex<Vec<Arc<[u8]>>> = Mutex::new(Vec::new());
    thread::scope(|scope| {
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let payloads = &payloads;
            scope.spawn(move || {
                for _ in 0..100 {
                    let payload = cache.get("page").expect("hit");
                    payloads.lock().push(payload);
                }
            });
        }
    });

    let payloads = payloads.into_inner();
    assert_eq!(payloads.len(), 800);
    assert!(payloads.iter().all(|p| p.len() == 64));
    // Reads hand out shared references, not copies.
    assert_eq!(cache.occupied_bytes(), 64);
    assert_eq!(cache.len(), 1);
}

#[test]
fn readers_and_writers_do_not_corrupt_each_other() {
    let cache = Arc::new(
        ContentCache::builder()
            .capacity_bytes(200)
            .time_to_live(Duration::from_secs(60))
            .build(),
    );

    thread::scope(|scope| {
        for worker in 0..4 {
            let cache = Arc::clone(&cache);
            scope.spawn(move || {
                for round in 0..50 {
                    let key = format!("k{}", (worker + round) % 6);
                    cache.put(&key, bytes(20));
                    let _ = cache.get(&key);
                }
            });
        }
    });

    // At most six distinct keys of 20 bytes each were ever live.
    assert!(cache.len() <= 6);
    assert!(cache.occupied_bytes() <= 120);
    assert_eq!(cache.occupied_bytes(), cache.len() * 20);
}
