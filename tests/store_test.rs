// tests/store_test.rs — Campaign history persistence

use pretty_assertions::assert_eq;

use copybloom::store::{Campaign, Store};

fn open_temp_store() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(&dir.path().join("history/copybloom.db")).unwrap();
    (dir, store)
}

#[test]
fn open_creates_parent_dirs_and_schema() {
    let (dir, store) = open_temp_store();
    assert!(dir.path().join("history/copybloom.db").exists());
    assert_eq!(store.count_campaigns().unwrap(), 0);
}

#[test]
fn insert_and_fetch_round_trip() {
    let (_dir, store) = open_temp_store();

    let campaign = Campaign::new(
        "copy",
        "email: Save hours every week",
        r#"{"campaign_type":"email"}"#.to_string(),
        "Final copy text.".to_string(),
    )
    .with_score(9)
    .with_author(Some("Dana".to_string()));

    store.insert_campaign(&campaign).unwrap();

    let fetched = store.get_campaign(&campaign.id).unwrap().unwrap();
    assert_eq!(fetched.kind, "copy");
    assert_eq!(fetched.title, "email: Save hours every week");
    assert_eq!(fetched.content, "Final copy text.");
    assert_eq!(fetched.score, Some(9));
    assert_eq!(fetched.author.as_deref(), Some("Dana"));
}

#[test]
fn get_by_id_prefix() {
    let (_dir, store) = open_temp_store();

    let campaign = Campaign::new("copy", "t", "{}".to_string(), "c".to_string());
    store.insert_campaign(&campaign).unwrap();

    let fetched = store.get_campaign(&campaign.id[..8]).unwrap().unwrap();
    assert_eq!(fetched.id, campaign.id);

    assert!(store.get_campaign("zzzzzzzz").unwrap().is_none());
}

#[test]
fn list_filters_by_kind() {
    let (_dir, store) = open_temp_store();

    for (kind, title) in [("copy", "a"), ("script", "b"), ("copy", "c")] {
        store
            .insert_campaign(&Campaign::new(kind, title, "{}".to_string(), "x".to_string()))
            .unwrap();
    }

    let all = store.list_campaigns(None, 10).unwrap();
    assert_eq!(all.len(), 3);

    let scripts = store.list_campaigns(Some("script"), 10).unwrap();
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].title, "b");

    let capped = store.list_campaigns(None, 2).unwrap();
    assert_eq!(capped.len(), 2);
}

#[test]
fn delete_removes_the_row() {
    let (_dir, store) = open_temp_store();

    let campaign = Campaign::new("copy", "t", "{}".to_string(), "c".to_string());
    store.insert_campaign(&campaign).unwrap();
    assert_eq!(store.count_campaigns().unwrap(), 1);

    assert!(store.delete_campaign(&campaign.id).unwrap());
    assert_eq!(store.count_campaigns().unwrap(), 0);
    assert!(!store.delete_campaign(&campaign.id).unwrap());
}

#[test]
fn score_is_optional() {
    let (_dir, store) = open_temp_store();

    let campaign = Campaign::new("script", "t", "{}".to_string(), "c".to_string());
    store.insert_campaign(&campaign).unwrap();

    let fetched = store.get_campaign(&campaign.id).unwrap().unwrap();
    assert_eq!(fetched.score, None);
    assert_eq!(fetched.author, None);
}
