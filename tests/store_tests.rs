use punchtracker::models::punch_in::NewPunchIn;
use punchtracker::store::PunchInStore;
use std::time::Duration;

fn sample(user: &str, timestamp: i64) -> NewPunchIn {
    NewPunchIn {
        latitude: 45.0,
        longitude: 9.0,
        timestamp,
        user_id: user.to_string(),
    }
}

#[test]
fn test_insert_assigns_increasing_ids() {
    let store = PunchInStore::in_memory().expect("open store");

    let a = store.insert(&sample("alice", 1_000)).expect("insert");
    let b = store.insert(&sample("alice", 2_000)).expect("insert");
    let c = store.insert(&sample("bob", 3_000)).expect("insert");

    assert!(a.id < b.id && b.id < c.id);
    assert_eq!(c.user_id, "bob");
}

#[test]
fn test_list_is_newest_first_even_for_late_inserts() {
    let store = PunchInStore::in_memory().expect("open store");

    store.insert(&sample("alice", 1_000)).unwrap();
    store.insert(&sample("alice", 3_000)).unwrap();
    // older than the last one: must land in the middle
    store.insert(&sample("alice", 2_000)).unwrap();

    let list = store.list_by_user("alice").unwrap();
    let stamps: Vec<i64> = list.iter().map(|p| p.timestamp).collect();
    assert_eq!(stamps, vec![3_000, 2_000, 1_000]);
}

#[test]
fn test_delete_all_by_user_is_scoped_and_idempotent() {
    let store = PunchInStore::in_memory().expect("open store");

    store.insert(&sample("alice", 1_000)).unwrap();
    store.insert(&sample("alice", 2_000)).unwrap();
    store.insert(&sample("bob", 1_500)).unwrap();

    assert_eq!(store.delete_all_by_user("alice").unwrap(), 2);
    assert!(store.list_by_user("alice").unwrap().is_empty());
    assert_eq!(store.list_by_user("bob").unwrap().len(), 1);

    // second call is a no-op
    assert_eq!(store.delete_all_by_user("alice").unwrap(), 0);
    assert_eq!(store.list_by_user("bob").unwrap().len(), 1);
}

#[test]
fn test_count_by_user() {
    let store = PunchInStore::in_memory().expect("open store");

    store.insert(&sample("alice", 1)).unwrap();
    store.insert(&sample("bob", 2)).unwrap();
    store.insert(&sample("bob", 3)).unwrap();

    let counts = store.count_by_user().unwrap();
    assert_eq!(
        counts,
        vec![("bob".to_string(), 2), ("alice".to_string(), 1)]
    );
}

#[test]
fn test_records_survive_reopen() {
    let mut path = std::env::temp_dir();
    path.push("store_reopen_punchtracker.sqlite");
    let db_path = path.to_string_lossy().to_string();
    std::fs::remove_file(&db_path).ok();

    {
        let store = PunchInStore::open(&db_path).expect("open store");
        store.insert(&sample("alice", 42)).unwrap();
    }

    let store = PunchInStore::open(&db_path).expect("reopen store");
    let list = store.list_by_user("alice").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].timestamp, 42);
}

#[tokio::test]
async fn test_feed_pushes_changes() {
    let store = PunchInStore::in_memory().expect("open store");
    store.insert(&sample("alice", 1_000)).unwrap();

    let mut feed = store.subscribe("alice");

    // current list first
    let first = feed.next().await.expect("feed open").expect("query");
    assert_eq!(first.len(), 1);

    // nothing changed: the feed waits
    let idle = tokio::time::timeout(Duration::from_millis(50), feed.next()).await;
    assert!(idle.is_err());

    store.insert(&sample("alice", 2_000)).unwrap();
    let second = feed.next().await.expect("feed open").expect("query");
    assert_eq!(second.len(), 2);
    assert_eq!(second[0].timestamp, 2_000);

    store.delete_all_by_user("alice").unwrap();
    let third = feed.next().await.expect("feed open").expect("query");
    assert!(third.is_empty());

    drop(store);
    assert!(feed.next().await.is_none());
}

#[tokio::test]
async fn test_feed_collapses_bursts() {
    let store = PunchInStore::in_memory().expect("open store");
    let mut feed = store.subscribe("alice");
    assert!(feed.next().await.unwrap().unwrap().is_empty());

    store.insert(&sample("alice", 1)).unwrap();
    store.insert(&sample("alice", 2)).unwrap();
    store.insert(&sample("alice", 3)).unwrap();

    let list = feed.next().await.unwrap().unwrap();
    assert_eq!(list.len(), 3);
}
