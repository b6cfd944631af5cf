use amlz::types::{Fingerprint, Fitness, TaskSignature};
use amlz::utils::{chill, derive_seed};
use amlz::{AmlzError, CachePolicy, FunctionalCache};
use std::sync::atomic::{AtomicBool, Ordering};

const THREADS: u64 = 8;
const FINGERPRINTS: u64 = 1000;
const TASK: TaskSignature = TaskSignature(99);

fn fitness_of(fingerprint: Fingerprint) -> Fitness {
    Fitness::new((fingerprint.0 % 1000) as f64 / 1000.0).unwrap()
}

fn fingerprint(index: u64) -> Fingerprint {
    Fingerprint(derive_seed(7, index))
}

fn bound(policy: CachePolicy) -> FunctionalCache {
    let cache = FunctionalCache::new(policy);
    cache.bind_task(TASK);
    cache
}

#[test]
fn test_repeated_insert_is_idempotent() {
    let cache = bound(CachePolicy::Unbounded);
    let fp = Fingerprint(11);
    let fitness = Fitness::new(0.25).unwrap();
    cache.insert(TASK, fp, fitness).unwrap();
    cache.insert(TASK, fp, fitness).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().inserts, 1);
    assert_eq!(cache.lookup(TASK, fp), Some(fitness));
}

#[test]
fn test_conflicting_insert_reports_inconsistency() {
    let cache = bound(CachePolicy::Unbounded);
    let fp = Fingerprint(0xabc);
    cache.insert(TASK, fp, Fitness::new(0.5).unwrap()).unwrap();

    let err = cache.insert(TASK, fp, Fitness::new(0.75).unwrap()).unwrap_err();
    match err {
        AmlzError::CacheInconsistency {
            fingerprint,
            cached,
            attempted,
        } => {
            assert_eq!(fingerprint, 0xabc);
            assert_eq!(cached, 0.5);
            assert_eq!(attempted, 0.75);
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(cache.insert(TASK, fp, Fitness::new(0.75).unwrap()).is_err());
    assert_eq!(cache.lookup(TASK, fp), Some(Fitness::new(0.5).unwrap()));
}

#[test]
fn test_reset_and_task_binding() {
    let cache = FunctionalCache::unbounded();
    assert!(!cache.bind_task(TASK));
    for index in 0..10 {
        cache.insert(TASK, fingerprint(index), fitness_of(fingerprint(index))).unwrap();
    }
    assert!(!cache.bind_task(TASK));
    assert_eq!(cache.len(), 10);

    let next = TaskSignature(2);
    assert!(cache.bind_task(next));
    assert!(cache.is_empty());
    assert_eq!(cache.task(), Some(next));

    cache.insert(next, Fingerprint(1), Fitness::MAX).unwrap();
    cache.reset();
    assert_eq!(cache.lookup(next, Fingerprint(1)), None);
    assert_eq!(cache.stats().resets, 2);
}

#[test]
fn test_concurrent_inserts_agree() {
    let cache = bound(CachePolicy::Unbounded);
    let start = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let cache = &cache;
            let start = &start;
            scope.spawn(move || {
                while !start.load(Ordering::Acquire) {
                    chill();
                }
                // Each thread walks the fingerprints from a different offset.
                for step in 0..FINGERPRINTS {
                    let fp = fingerprint((step + thread * 125) % FINGERPRINTS);
                    match cache.lookup(TASK, fp) {
                        Some(found) => assert_eq!(found, fitness_of(fp)),
                        None => cache.insert(TASK, fp, fitness_of(fp)).unwrap(),
                    }
                }
            });
        }
        start.store(true, Ordering::Release);
    });

    assert_eq!(cache.len(), FINGERPRINTS as usize);
    for index in 0..FINGERPRINTS {
        let fp = fingerprint(index);
        assert_eq!(cache.lookup(TASK, fp), Some(fitness_of(fp)));
    }
    let stats = cache.stats();
    assert_eq!(stats.inserts, FINGERPRINTS);
    assert_eq!(stats.hits + stats.misses, THREADS * FINGERPRINTS + FINGERPRINTS);
}

#[test]
fn test_concurrent_lru_respects_capacity() {
    let cache = bound(CachePolicy::Lru { capacity: 64 });
    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let cache = &cache;
            scope.spawn(move || {
                for step in 0..FINGERPRINTS {
                    let fp = fingerprint(step * THREADS + thread);
                    cache.insert(TASK, fp, fitness_of(fp)).unwrap();
                    assert!(cache.len() <= 64);
                }
            });
        }
    });

    let stats = cache.stats();
    assert_eq!(stats.size, 64);
    assert_eq!(stats.inserts, THREADS * FINGERPRINTS);
    assert_eq!(stats.evictions, THREADS * FINGERPRINTS - 64);
}

#[test]
fn test_insert_from_superseded_task_is_not_served() {
    let cache = FunctionalCache::unbounded();
    let (first, second) = (TaskSignature(1), TaskSignature(2));
    cache.bind_task(first);
    // Another evaluator moves the cache to its own task mid-evaluation.
    cache.bind_task(second);

    cache.insert(first, Fingerprint(42), Fitness::new(0.9).unwrap()).unwrap();
    assert_eq!(cache.task(), Some(second));
    assert_eq!(cache.lookup(second, Fingerprint(42)), None);
    assert!(cache.is_empty());
}

#[test]
fn test_concurrent_get_or_insert_computes_each_fingerprint_once() {
    let cache = bound(CachePolicy::Unbounded);
    let computed = std::sync::atomic::AtomicU64::new(0);
    let start = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let (cache, computed, start) = (&cache, &computed, &start);
            scope.spawn(move || {
                while !start.load(Ordering::Acquire) {
                    chill();
                }
                for step in 0..FINGERPRINTS {
                    let fp = fingerprint((step + thread * 125) % FINGERPRINTS);
                    let found = cache
                        .get_or_insert_with(TASK, fp, || {
                            computed.fetch_add(1, Ordering::Relaxed);
                            Ok(fitness_of(fp))
                        })
                        .unwrap();
                    assert_eq!(found, fitness_of(fp));
                }
            });
        }
        start.store(true, Ordering::Release);
    });

    assert_eq!(computed.load(Ordering::Relaxed), FINGERPRINTS);
    let stats = cache.stats();
    assert_eq!(stats.misses, FINGERPRINTS);
    assert_eq!(stats.hits, (THREADS - 1) * FINGERPRINTS);
}
