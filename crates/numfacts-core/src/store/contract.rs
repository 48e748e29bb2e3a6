//! Behavior every `FactStore` backend must share.
//!
//! Each check takes a fresh, empty store; backend test modules call these
//! with their own construction.

use chrono::{DateTime, Duration, SubsecRound, Utc};

use super::FactStore;
use crate::types::Fact;

fn at(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000 + millis).unwrap()
}

fn contents(facts: &[Fact]) -> Vec<(i64, String)> {
    facts.iter().map(Fact::content_key).collect()
}

pub(crate) async fn dedup_touches_existing_entry(store: &dyn FactStore) {
    let first = Fact::with_timestamp(1, "one", at(0));
    let second = Fact::with_timestamp(2, "two", at(10));
    store.save(&first).await;
    store.save(&second).await;
    assert_eq!(store.len().await, 2);

    let again = Fact::with_timestamp(1, "one", at(20));
    store.save(&again).await;

    assert_eq!(store.len().await, 2);
    let recent = store.recent(usize::MAX).await;
    assert_eq!(contents(&recent), vec![(1, "one".into()), (2, "two".into())]);
    // The stored entry keeps its identity and takes the new timestamp
    assert_eq!(recent[0].id, first.id);
    assert_eq!(recent[0].created_at, again.created_at);
}

pub(crate) async fn capacity_evicts_oldest(store: &dyn FactStore) {
    let capacity = store.capacity();
    let facts: Vec<Fact> = (0..=capacity as i64)
        .map(|i| Fact::with_timestamp(i, format!("fact {}", i), at(i)))
        .collect();
    for fact in &facts {
        store.save(fact).await;
    }

    assert_eq!(store.len().await, capacity);
    let recent = store.recent(capacity).await;
    assert_eq!(recent.len(), capacity);
    assert!(recent.iter().all(|f| f.id != facts[0].id));
}

pub(crate) async fn recency_ordering(store: &dyn FactStore) {
    // Saved out of timestamp order on purpose
    for (key, offset) in [(1, 30), (2, 10), (3, 50), (4, 20), (5, 40)] {
        store
            .save(&Fact::with_timestamp(key, format!("k{}", key), at(offset)))
            .await;
    }

    let all = store.recent(usize::MAX).await;
    let keys: Vec<i64> = all.iter().map(|f| f.key).collect();
    assert_eq!(keys, vec![3, 5, 1, 4, 2]);

    for n in 1..=all.len() {
        let top = store.recent(n).await;
        assert_eq!(top, all[..n].to_vec());
    }
}

pub(crate) async fn reused_id_with_new_content_is_ignored(store: &dyn FactStore) {
    let original = Fact::with_timestamp(1, "one", at(0));
    store.save(&original).await;

    let reused = Fact {
        id: original.id,
        ..Fact::with_timestamp(2, "two", at(10))
    };
    store.save(&reused).await;

    assert_eq!(store.len().await, 1);
    assert_eq!(store.recent(usize::MAX).await, vec![original]);
}

pub(crate) async fn limit_is_clamped(store: &dyn FactStore) {
    let capacity = store.capacity();
    for i in 0..capacity as i64 {
        store.save(&Fact::with_timestamp(i, "x", at(i))).await;
    }

    assert_eq!(store.recent(0).await.len(), 1);
    assert_eq!(store.recent(capacity * 10).await.len(), capacity);

    // recent() is read-only
    assert_eq!(store.len().await, capacity);
}

pub(crate) async fn equal_timestamps_break_by_touch(store: &dyn FactStore) {
    let now = at(0);
    store.save(&Fact::with_timestamp(1, "a", now)).await;
    store.save(&Fact::with_timestamp(2, "b", now)).await;
    store.save(&Fact::with_timestamp(3, "c", now)).await;

    let keys: Vec<i64> = store.recent(10).await.iter().map(|f| f.key).collect();
    assert_eq!(keys, vec![3, 2, 1]);

    // Touching an entry with the same timestamp moves it to the front
    store.save(&Fact::with_timestamp(1, "a", now)).await;
    let keys: Vec<i64> = store.recent(10).await.iter().map(|f| f.key).collect();
    assert_eq!(keys, vec![1, 3, 2]);
}

pub(crate) async fn clear_empties_store(store: &dyn FactStore) {
    for i in 0..3 {
        store.save(&Fact::new(i, format!("fact {}", i))).await;
    }
    assert!(!store.is_empty().await);

    store.clear().await;

    assert_eq!(store.len().await, 0);
    assert!(store.recent(1).await.is_empty());
    assert!(store.recent(usize::MAX).await.is_empty());

    // Still usable afterwards
    store.save(&Fact::new(9, "nine")).await;
    assert_eq!(store.len().await, 1);
}

pub(crate) async fn capacity_three_scenario(store: &dyn FactStore) {
    assert_eq!(store.capacity(), 3);
    let base = Utc::now().trunc_subsecs(3);
    let a = Fact::with_timestamp(1, "a", base);
    let b = Fact::with_timestamp(2, "b", base + Duration::milliseconds(1));
    let c = Fact::with_timestamp(3, "c", base + Duration::milliseconds(2));
    let d = Fact::with_timestamp(4, "d", base + Duration::milliseconds(3));
    for fact in [&a, &b, &c, &d] {
        store.save(fact).await;
    }

    let recent = store.recent(10).await;
    assert_eq!(
        recent.iter().map(|f| f.id).collect::<Vec<_>>(),
        vec![d.id, c.id, b.id]
    );

    let a_again = Fact::with_timestamp(1, "a", base + Duration::milliseconds(4));
    store.save(&a_again).await;

    let recent = store.recent(10).await;
    assert_eq!(store.len().await, 3);
    assert_eq!(
        contents(&recent),
        vec![(1, "a".into()), (4, "d".into()), (3, "c".into())]
    );
    assert_eq!(recent[0].created_at, a_again.created_at);
}
