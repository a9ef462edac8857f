use notepad_core::{
    open_sqlite_controller, ControllerConfig, JsonBlobGateway, KeyValueStore, LoadPolicy, Note,
    PersistenceGateway, SessionError, SqliteKeyValueStore, StoreError, NOTES_KEY,
};

#[test]
fn save_then_load_preserves_notes_and_order() {
    let mut gateway = JsonBlobGateway::new(SqliteKeyValueStore::open_in_memory().unwrap());
    let notes = vec![
        Note::with_content(9, "Zeta", "last alphabetically, first in list"),
        Note::with_content(2, "Groceries", "milk, eggs"),
        Note::with_content(5, "", "ünïcödé body\nwith newline"),
    ];

    gateway.save(&notes).unwrap();
    assert_eq!(gateway.load().unwrap(), Some(notes));
}

#[test]
fn load_accepts_blob_written_by_older_clients() {
    let mut store = SqliteKeyValueStore::open_in_memory().unwrap();
    store
        .set_item(
            NOTES_KEY,
            r#"[{"title":"Groceries","body":"milk, eggs","id":123}]"#,
        )
        .unwrap();

    let gateway = JsonBlobGateway::new(store);
    assert_eq!(
        gateway.load().unwrap(),
        Some(vec![Note::with_content(123, "Groceries", "milk, eggs")])
    );
}

#[test]
fn controller_state_survives_reopen_of_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    let (first, second) = {
        let mut controller = open_sqlite_controller(&path, ControllerConfig::default()).unwrap();
        let first = controller.create_note().unwrap();
        controller.save_active_note("First", "one").unwrap();
        let second = controller.create_note().unwrap();
        controller.mark_changed().unwrap();
        (first, second)
    };

    let controller = open_sqlite_controller(&path, ControllerConfig::default()).unwrap();
    assert_eq!(
        controller.notes(),
        &[
            Note::with_content(first, "First", "one"),
            Note::new(second),
        ]
    );
    assert_eq!(controller.session().active_note_id, None);
    assert!(!controller.is_dirty());
}

#[test]
fn strict_open_reports_unparsable_blob_in_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    {
        let mut store = SqliteKeyValueStore::open(&path).unwrap();
        store.set_item(NOTES_KEY, "not json").unwrap();
    }

    let strict = ControllerConfig::default().with_load_policy(LoadPolicy::Strict);
    let err = open_sqlite_controller(&path, strict)
        .err()
        .expect("strict open should fail");
    assert!(matches!(
        err,
        SessionError::PersistenceUnavailable(StoreError::Serialization(_))
    ));

    let lenient = open_sqlite_controller(&path, ControllerConfig::default()).unwrap();
    assert!(lenient.notes().is_empty());
}

#[test]
fn open_fails_for_unreachable_database_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("notes.db");

    let err = open_sqlite_controller(&path, ControllerConfig::default())
        .err()
        .expect("open should fail without parent directory");
    assert!(matches!(
        err,
        SessionError::PersistenceUnavailable(StoreError::Sqlite(_))
    ));
}
