use std::ffi::OsString;
use std::path::Path;

use donego_core::datastore::DataStore;
use donego_shared::persist::{ONBOARD_KEY, STATE_KEY};
use donego_shared::{KeyValueStore, Persistence, Store, Theme};
use tempfile::tempdir;

fn donego(data: &Path, args: &[&str]) -> anyhow::Result<()> {
    let mut raw: Vec<OsString> = vec![
        "donego".into(),
        "--data".into(),
        data.as_os_str().to_owned(),
        "--donegorc".into(),
        "/dev/null".into(),
        "--yes".into(),
    ];
    raw.extend(args.iter().map(OsString::from));
    donego_core::run(raw)
}

fn saved(data: &Path) -> Store {
    Persistence::new(DataStore::open(data).expect("open datastore")).load_store()
}

#[test]
fn trip_checklist_lifecycle() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path();

    donego(data, &["new", "  Trip  "]).expect("new");
    donego(data, &["add", "1", "Pack", "bags"]).expect("add");
    donego(data, &["add", "1", "Book hotel"]).expect("add");

    let store = saved(data);
    assert_eq!(store.my_lists.len(), 1);
    let trip = &store.my_lists[0];
    assert_eq!(trip.title, "Trip");
    assert_eq!(trip.category, "Mine");
    let texts: Vec<&str> = trip.tasks.iter().map(|task| task.text.as_str()).collect();
    assert_eq!(texts, vec!["Book hotel", "Pack bags"]);

    donego(data, &["tog", "1", "1"]).expect("toggle by abbreviation");
    assert!(saved(data).my_lists[0].tasks[0].done);

    donego(data, &["clear", "1"]).expect("clear completed");
    let store = saved(data);
    assert_eq!(store.my_lists[0].tasks.len(), 1);
    assert_eq!(store.my_lists[0].tasks[0].text, "Pack bags");

    donego(data, &["rename", "1", "1", "   "]).expect("blank rename");
    assert_eq!(saved(data).my_lists[0].tasks[0].text, "Pack bags");

    donego(data, &["delete", "1"]).expect("delete");
    assert!(saved(data).my_lists.is_empty());
}

#[test]
fn copying_from_library_prepends_a_fresh_checklist() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path();

    donego(data, &["new", "Errands"]).expect("new");
    donego(data, &["copy", "lib_move"]).expect("copy");
    donego(data, &["toggle", "1", "3"]).expect("toggle");

    let store = saved(data);
    assert_eq!(store.my_lists.len(), 2);
    let moved = &store.my_lists[0];
    assert_eq!(moved.title, "Moving house");
    assert_eq!(moved.category, "Home");
    assert_eq!(moved.tasks.len(), 7);
    assert!(moved.id.starts_with("c_"));
    assert!(moved.tasks.iter().all(|task| task.id.starts_with("t_")));
    assert!(moved.tasks[2].done);

    // the template itself stays untouched
    let template = store.library_entry("lib_move").expect("template");
    assert!(template.tasks.iter().all(|task| !task.done));

    donego(data, &["reset", "1"]).expect("reset");
    assert!(!saved(data).my_lists[0].has_completed());
}

#[test]
fn tips_and_theme_live_in_their_own_slots() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path();

    donego(data, &["tips", "dismiss"]).expect("dismiss");
    donego(data, &["theme", "toggle"]).expect("theme");

    let slots = DataStore::open(data).expect("open datastore");
    assert_eq!(slots.get(ONBOARD_KEY).expect("read").as_deref(), Some("1"));
    assert!(slots.get(STATE_KEY).expect("read").is_none());

    let persistence = Persistence::new(slots);
    assert!(persistence.onboarding_dismissed());
    assert_eq!(persistence.stored_theme(), Some(Theme::Dark));
}

#[test]
fn malformed_state_falls_back_to_defaults() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path();

    let mut slots = DataStore::open(data).expect("open datastore");
    slots.set(STATE_KEY, "{not json").expect("write");

    donego(data, &["list"]).expect("list");
    let store = saved(data);
    assert!(store.my_lists.is_empty());
    assert_eq!(store.library, Store::default().library);
}

#[test]
fn bad_references_are_errors() {
    let temp = tempdir().expect("tempdir");
    let data = temp.path();

    assert!(donego(data, &["toggle", "1", "1"]).is_err());
    assert!(donego(data, &["re", "1"]).is_err());
    assert!(donego(data, &["copy", "lib_nothing"]).is_err());
}
