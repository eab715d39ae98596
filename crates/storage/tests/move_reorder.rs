#![forbid(unsafe_code)]

use ol_core::ids::{ItemId, OwnerId};
use ol_storage::{CreateItemRequest, CreateOwnerRequest, SqliteStore, StoreError};
use std::path::PathBuf;

fn temp_db(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    base.join(format!("ol_storage_{test_name}_{pid}_{nonce}"))
        .join("orderly.db")
}

fn register_owner(store: &mut SqliteStore, username: &str) -> OwnerId {
    let row = store
        .create_owner(CreateOwnerRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        })
        .expect("create owner");
    OwnerId::try_new(row.id).expect("owner id")
}

fn append_item(store: &mut SqliteStore, owner: OwnerId, title: &str) -> ItemId {
    let row = store
        .create_item(
            owner,
            CreateItemRequest {
                title: title.to_string(),
                description: None,
                completed: false,
            },
        )
        .expect("create item");
    ItemId::try_new(row.id).expect("item id")
}

fn ordering(store: &SqliteStore, owner: OwnerId) -> Vec<(i64, i64)> {
    store
        .list_items(owner)
        .expect("list items")
        .into_iter()
        .map(|row| (row.id, row.order_no))
        .collect()
}

#[test]
fn move_to_current_rank_changes_no_rows() {
    let mut store =
        SqliteStore::open(temp_db("move_to_current_rank_changes_no_rows")).expect("open store");
    let owner = register_owner(&mut store, "alice");

    append_item(&mut store, owner, "a");
    let b = append_item(&mut store, owner, "b");
    append_item(&mut store, owner, "c");

    let before = store.list_items(owner).expect("list items");
    store.move_item(owner, b, 2).expect("no-op move");
    let after = store.list_items(owner).expect("list items");

    assert_eq!(before, after, "same-rank move must not touch any row");
}

#[test]
fn move_round_trip_restores_ordering() {
    let mut store =
        SqliteStore::open(temp_db("move_round_trip_restores_ordering")).expect("open store");
    let owner = register_owner(&mut store, "alice");

    for title in ["a", "b", "c", "d", "e"] {
        append_item(&mut store, owner, title);
    }
    let original = ordering(&store, owner);
    let moved = ItemId::try_new(original[1].0).expect("item id");

    store.move_item(owner, moved, 5).expect("move up");
    assert_ne!(ordering(&store, owner), original);

    store.move_item(owner, moved, 2).expect("move back");
    assert_eq!(ordering(&store, owner), original);
}

#[test]
fn move_rejects_out_of_range_targets() {
    let mut store =
        SqliteStore::open(temp_db("move_rejects_out_of_range_targets")).expect("open store");
    let owner = register_owner(&mut store, "alice");

    append_item(&mut store, owner, "a");
    let b = append_item(&mut store, owner, "b");
    append_item(&mut store, owner, "c");

    let before = ordering(&store, owner);

    let err = store.move_item(owner, b, 0).expect_err("target 0");
    match err {
        StoreError::InvalidPosition { requested, max } => {
            assert_eq!(requested, 0);
            assert_eq!(max, 3);
        }
        other => panic!("expected InvalidPosition, got {other:?}"),
    }

    let err = store.move_item(owner, b, 4).expect_err("target N+1");
    match err {
        StoreError::InvalidPosition { requested, max } => {
            assert_eq!(requested, 4);
            assert_eq!(max, 3);
        }
        other => panic!("expected InvalidPosition, got {other:?}"),
    }

    assert_eq!(
        ordering(&store, owner),
        before,
        "failed moves must leave the ordering untouched"
    );
}

#[test]
fn move_unknown_item_fails_not_found() {
    let mut store =
        SqliteStore::open(temp_db("move_unknown_item_fails_not_found")).expect("open store");
    let owner = register_owner(&mut store, "alice");
    append_item(&mut store, owner, "a");

    let missing = ItemId::try_new(999).expect("item id");
    let err = store.move_item(owner, missing, 1).expect_err("absent item");
    assert!(matches!(err, StoreError::NotFound), "got {err:?}");
}

#[test]
fn moves_between_interior_ranks() {
    let mut store = SqliteStore::open(temp_db("moves_between_interior_ranks")).expect("open store");
    let owner = register_owner(&mut store, "alice");

    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d", "e", "f"] {
        ids.push(append_item(&mut store, owner, title));
    }

    // b: 2 -> 5 shifts (2,5] down by one.
    store.move_item(owner, ids[1], 5).expect("move up");
    let titles: Vec<String> = store
        .list_items(owner)
        .expect("list items")
        .into_iter()
        .map(|row| row.title)
        .collect();
    assert_eq!(titles, vec!["a", "c", "d", "e", "b", "f"]);

    // e: 4 -> 2 shifts [2,4) up by one.
    store.move_item(owner, ids[4], 2).expect("move down");
    let titles: Vec<String> = store
        .list_items(owner)
        .expect("list items")
        .into_iter()
        .map(|row| row.title)
        .collect();
    assert_eq!(titles, vec!["a", "e", "c", "d", "b", "f"]);
}
