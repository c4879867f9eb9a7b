use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::test_utils;
use crate::test_utils::sample_profile;
use crate::test_utils::SampleProfile;
use crate::Value;

#[tokio::test]
async fn test_unset_keys_resolve_to_defaults() {
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("defaults");

    assert!(!set.contains("missing").await);
    assert!(set.get("missing", true).await);
    assert_eq!(-1i8, set.get("missing", -1i8).await);
    assert_eq!(7i32, set.get("missing", 7i32).await);
    assert_eq!(7i64, set.get("missing", 7i64).await);
    assert_eq!(7u8, set.get("missing", 7u8).await);
    assert_eq!(7u64, set.get("missing", 7u64).await);
    assert_eq!(0.5f32, set.get("missing", 0.5f32).await);
    assert_eq!(0.5f64, set.get("missing", 0.5f64).await);
    assert_eq!('d', set.get("missing", 'd').await);
    assert_eq!("d".to_string(), set.get("missing", "d".to_string()).await);
    assert_eq!(Value::Bool(false), set.get_object("missing", Value::Bool(false)).await);
}

/// A stored value of another kind behaves exactly like an absent key.
#[tokio::test]
async fn test_kind_mismatch_resolves_to_default() {
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("mismatch");

    assert!(set.edit().put("k", "text").commit().await);
    assert_eq!(9i32, set.get("k", 9i32).await);
    assert_eq!("text".to_string(), set.get("k", String::new()).await);
}

#[tokio::test]
async fn test_put_commit_get_scenario() {
    test_utils::enable_logger();
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("scenario");

    assert!(set.edit().put("a", 1i32).put("b", "x").commit().await);
    assert_eq!(1i32, set.get("a", 0i32).await);
    assert_eq!("x".to_string(), set.get("b", String::new()).await);

    assert!(set.edit().remove("a").commit().await);
    assert!(!set.contains("a").await);
    assert!(set.contains("b").await);
}

#[tokio::test]
async fn test_object_values_round_trip_through_store() {
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("objects");

    let profile = sample_profile();
    let value = Value::object(&profile).expect("encode object");
    assert!(set.edit().put("profile", value.clone()).commit().await);

    let stored = set.get_object("profile", Value::Bool(false)).await;
    assert_eq!(value, stored);
    assert_eq!(Some(profile), stored.decode_object::<SampleProfile>());
}

/// Values committed through one registry are visible after a restart,
/// exercising the load barrier of a freshly created set.
#[tokio::test]
async fn test_committed_state_survives_restart() {
    let dir = tempfile::TempDir::new().unwrap();
    {
        let registry =
            crate::Registry::new(test_utils::test_config(dir.path()), test_utils::test_type_registry())
                .unwrap();
        let set = registry.get_or_create("persist");
        assert!(set.edit().put("kept", 11i64).commit().await);
    }

    let registry =
        crate::Registry::new(test_utils::test_config(dir.path()), test_utils::test_type_registry())
            .unwrap();
    let set = registry.get_or_create("persist");
    assert_eq!(11i64, set.get("kept", 0i64).await);
}

#[tokio::test]
async fn test_listener_receives_changed_keys() {
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("notify");

    let (tx, mut rx) = mpsc::channel::<String>(8);
    set.register_listener(tx);

    set.edit().put("watched", 1i32).apply().await;
    let key = timeout(Duration::from_secs(2), rx.recv()).await.expect("notified");
    assert_eq!(Some("watched".to_string()), key);
}

/// Registering the same channel twice must not duplicate notifications.
#[tokio::test]
async fn test_duplicate_registration_sends_once() {
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("dup");

    let (tx, mut rx) = mpsc::channel::<String>(8);
    set.register_listener(tx.clone());
    set.register_listener(tx);
    assert_eq!(1, set.listeners.len());

    set.edit().put("k", 1i32).apply().await;

    // Notification happens before apply returns; exactly one message.
    assert_eq!(Ok("k".to_string()), rx.try_recv());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_unregister_then_close_is_safe() {
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("lifecycle");

    let (tx, rx) = mpsc::channel::<String>(1);
    set.register_listener(tx.clone());
    set.unregister_listener(&tx);
    assert_eq!(0, set.listeners.len());
    drop(tx);
    drop(rx);

    // Unregistering an unknown channel is a no-op.
    let (other_tx, _other_rx) = mpsc::channel::<String>(1);
    set.unregister_listener(&other_tx);

    set.edit().put("k", 1i32).apply().await;
    assert_eq!(1i32, set.get("k", 0i32).await);
}

/// A full listener buffer drops notifications instead of blocking the
/// committing writer.
#[tokio::test]
async fn test_full_listener_buffer_drops_notifications() {
    let (registry, _dir) = test_utils::test_registry();
    let set = registry.get_or_create("backlog");

    let (tx, mut rx) = mpsc::channel::<String>(1);
    set.register_listener(tx);

    for i in 0..10i32 {
        set.edit().put("k", i).apply().await;
    }

    // The first notification fills the buffer; later ones were dropped, and
    // no apply call blocked on the stalled listener.
    assert_eq!(Ok("k".to_string()), rx.try_recv());
    assert!(rx.try_recv().is_err());
    assert_eq!(9i32, set.get("k", -1i32).await);
}

/// # Case: two concurrent writers on disjoint keys
///
/// ## Setup:
/// 1. writer one applies `k1 = 0..100` sequentially
/// 2. writer two applies `k2 = 100..200` sequentially
///
/// ## Criterias:
/// 1. no lost updates: `k1 == 99` and `k2 == 199` in memory
/// 2. after draining the write queue, a restarted registry reads the same
///    values from disk
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_disjoint_keys() {
    test_utils::enable_logger();
    let dir = tempfile::TempDir::new().unwrap();
    let registry = std::sync::Arc::new(
        crate::Registry::new(test_utils::test_config(dir.path()), test_utils::test_type_registry())
            .unwrap(),
    );
    let set = registry.get_or_create("contended");

    let writer_one = {
        let set = set.clone();
        tokio::spawn(async move {
            for i in 0..100i32 {
                set.edit().put("k1", i).apply().await;
            }
        })
    };
    let writer_two = {
        let set = set.clone();
        tokio::spawn(async move {
            for i in 100..200i32 {
                set.edit().put("k2", i).apply().await;
            }
        })
    };
    writer_one.await.unwrap();
    writer_two.await.unwrap();

    assert_eq!(99i32, set.get("k1", -1i32).await);
    assert_eq!(199i32, set.get("k2", -1i32).await);

    registry.flush_writes().await;
    let reopened =
        crate::Registry::new(test_utils::test_config(dir.path()), test_utils::test_type_registry())
            .unwrap();
    let set = reopened.get_or_create("contended");
    assert_eq!(99i32, set.get("k1", -1i32).await);
    assert_eq!(199i32, set.get("k2", -1i32).await);
}
