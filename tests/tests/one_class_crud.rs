use pretty_assertions::assert_eq;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use strata::{
    sql::stmt::Manipulation, Cx, Extension, Hooks, QueryInterceptor, ValidationMessage,
    ValidationResult, WriteInterceptor,
};
use tests::{fixtures, prelude::*};

#[test]
fn crud_one_page() {
    let TestDb { mut db, .. } = setup(&mut fixtures::pages());

    let mut page = assert_ok!(db.create("Page"));
    assert_none!(page.id());
    assert_eq!(assert_ok!(page.get_field("ShowInMenus")), Value::Bool(true));

    assert_ok!(page.set_field("Title", "Home"));
    assert_ok!(page.set_field("Sort", 3));

    let id = assert_ok!(page.write(&mut db));
    assert_eq!(id, 1);
    assert_eq!(page.id(), Some(1));
    assert_empty!(page.changed_fields(ChangeLevel::Type));

    let mut loaded = assert_ok!(db.get_by_id("Page", id));
    assert_eq!(loaded.class_name(), "Page");
    assert_eq!(assert_ok!(loaded.get::<String>("Title")), "Home");
    assert_eq!(assert_ok!(loaded.get::<i64>("Sort")), 3);
    assert!(assert_ok!(loaded.get::<bool>("ShowInMenus")));

    assert_ok!(loaded.set_field("Title", "Welcome"));
    assert_eq!(assert_ok!(loaded.write(&mut db)), id);

    let reloaded = assert_ok!(db.get_by_id("Page", id));
    assert_eq!(assert_ok!(reloaded.get::<String>("Title")), "Welcome");
    assert_eq!(assert_ok!(reloaded.get::<i64>("Sort")), 3);

    assert_ok!(loaded.delete(&mut db));
    assert_none!(loaded.id());
    assert_err!(db.get_by_id("Page", id), is_record_not_found);
}

#[test]
fn ids_increase() {
    let TestDb { mut db, .. } = setup(&mut fixtures::pages());

    let ids = (0..3)
        .map(|i| {
            let mut page = db.create("Page").unwrap();
            page.set_field("Sort", i).unwrap();
            page.write(&mut db).unwrap()
        })
        .collect::<Vec<_>>();

    assert_eq!(ids, [1, 2, 3]);
    assert_eq!(assert_ok!(db.all("Page")).len(), 3);
}

#[test]
fn timestamps_come_from_the_clock() {
    let (TestDb { mut db, .. }, clock) = setup_with_clock(&mut fixtures::pages(), at(9, 0, 0));

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "Home").unwrap();
    let id = page.write(&mut db).unwrap();

    clock.set(at(10, 30, 0));
    page.set_field("Title", "Start").unwrap();
    page.write(&mut db).unwrap();

    let loaded = db.get_by_id("Page", id).unwrap();
    assert_eq!(
        assert_ok!(loaded.get::<chrono::NaiveDateTime>("Created")),
        at(9, 0, 0)
    );
    assert_eq!(
        assert_ok!(loaded.get::<chrono::NaiveDateTime>("LastEdited")),
        at(10, 30, 0)
    );
}

#[test]
fn deleting_unsaved_record_is_rejected() {
    let TestDb { mut db, mut log } = setup(&mut fixtures::pages());

    let mut page = db.create("Page").unwrap();
    assert_err!(page.delete(&mut db), is_invalid_statement);
    assert!(log.pop().is_none());
}

#[test]
fn deleting_twice_is_not_found() {
    let TestDb { mut db, .. } = setup(&mut fixtures::pages());

    let mut page = db.create("Page").unwrap();
    let id = page.write(&mut db).unwrap();

    let mut copy = db.get_by_id("Page", id).unwrap();
    page.delete(&mut db).unwrap();

    assert_err!(copy.delete(&mut db), is_record_not_found);
}

#[test]
fn unknown_fields_are_rejected() {
    let TestDb { db, .. } = setup(&mut fixtures::pages());

    let mut page = db.create("Page").unwrap();
    assert_err!(page.set_field("Colour", "red"), is_unknown_field);
    assert_err!(page.get_field("Colour"), is_unknown_field);
    assert_err!(page.set_field("ID", 4), is_invalid_statement);
}

#[derive(Debug)]
struct RequireTitle;

impl Hooks for RequireTitle {
    fn validate(&self, record: &Record) -> strata::ValidationResult {
        let mut result = ValidationResult::valid();

        if record.get::<String>("Title").unwrap_or_default().is_empty() {
            result.push(ValidationMessage::field("Title", "is required"));
        }

        result
    }

    fn populate_defaults(&self, record: &mut Record) {
        record.set_field("Content", "<p>New page</p>").unwrap();
    }
}

#[test]
fn validation_blocks_the_write() {
    let mut builder = fixtures::pages();
    builder.hooks("Page", RequireTitle);
    let TestDb { mut db, log } = setup(&mut builder);

    let mut page = db.create("RedirectorPage").unwrap();
    assert_eq!(
        assert_ok!(page.get::<String>("Content")),
        "<p>New page</p>"
    );

    let err = assert_err!(page.write(&mut db), is_validation);
    assert_eq!(err.to_string(), "validation failed: Title: is required");
    assert_none!(page.id());
    assert_empty!(log.writes());

    page.set_field("Title", "Contact").unwrap();
    assert_ok!(page.write(&mut db));
}

#[derive(Debug)]
struct Slug;

impl Hooks for Slug {
    fn on_before_write(&self, _db: &mut Db, record: &mut Record) -> strata::Result<()> {
        let title = record.get::<String>("Title")?;
        record.set_field("Content", title.to_lowercase().replace(' ', "-"))
    }
}

#[test]
fn before_write_changes_are_saved() {
    let mut builder = fixtures::pages();
    builder.hooks("Page", Slug);
    let TestDb { mut db, .. } = setup(&mut builder);

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "About Us").unwrap();
    let id = page.write(&mut db).unwrap();

    let loaded = db.get_by_id("Page", id).unwrap();
    assert_eq!(assert_ok!(loaded.get::<String>("Content")), "about-us");
}

#[test]
fn hooks_for_unknown_class_fail_the_build() {
    let mut builder = fixtures::pages();
    builder.hooks("Nope", Slug);

    assert_err!(
        builder.build(strata_driver_sqlite::Sqlite::in_memory()),
        is_invalid_schema
    );
}

#[test]
fn unchanged_record_is_not_written() {
    let TestDb { mut db, mut log } = setup(&mut fixtures::pages());

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "Home").unwrap();
    let id = page.write(&mut db).unwrap();
    log.clear();

    // Assigning the current value marks the field without changing it.
    page.set_field("Title", "Home").unwrap();
    assert!(page.is_changed("Title", ChangeLevel::Type));
    assert!(!page.is_changed("Title", ChangeLevel::Value));

    assert_eq!(assert_ok!(page.write(&mut db)), id);
    assert!(log.is_empty());

    // Forcing the write sends every column.
    assert_ok!(page.force_write(&mut db));
    assert_eq!(log.writes().len(), 1);
}

/// Fails every write while `failing` is set.
#[derive(Debug, Default)]
struct FlakyStorage {
    failing: AtomicBool,
}

impl QueryInterceptor for FlakyStorage {}

impl WriteInterceptor for FlakyStorage {
    fn augment_write(
        &self,
        _cx: &mut Cx<'_>,
        _record: &Record,
        manipulation: Manipulation,
    ) -> strata::Result<Manipulation> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(strata::err!("storage unavailable"));
        }
        Ok(manipulation)
    }
}

impl Extension for FlakyStorage {}

#[test]
fn failed_write_leaves_the_record_as_it_was() {
    let storage = Arc::new(FlakyStorage::default());
    let mut builder = fixtures::pages();
    builder.extension(storage.clone());
    let (TestDb { mut db, .. }, clock) = setup_with_clock(&mut builder, at(9, 0, 0));

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "Home").unwrap();
    let id = page.write(&mut db).unwrap();

    storage.failing.store(true, Ordering::SeqCst);
    clock.set(at(10, 0, 0));

    page.set_field("Title", "Start").unwrap();
    assert_err!(page.write(&mut db));

    assert_eq!(page.id(), Some(id));
    assert_eq!(
        assert_ok!(page.get::<chrono::NaiveDateTime>("LastEdited")),
        at(9, 0, 0)
    );
    assert!(!page.is_changed("LastEdited", ChangeLevel::Type));
    assert_eq!(page.changed_fields(ChangeLevel::Value), ["Title"]);

    // A new record gets neither an id nor timestamps.
    let mut other = db.create("Page").unwrap();
    assert_err!(other.write(&mut db));
    assert_none!(other.id());
    assert_eq!(assert_ok!(other.get_field("Created")), Value::Null);
    assert!(!other.is_changed("Created", ChangeLevel::Type));

    storage.failing.store(false, Ordering::SeqCst);
    assert_ok!(page.write(&mut db));

    let loaded = db.get_by_id("Page", id).unwrap();
    assert_eq!(assert_ok!(loaded.get::<String>("Title")), "Start");
    assert_eq!(
        assert_ok!(loaded.get::<chrono::NaiveDateTime>("LastEdited")),
        at(10, 0, 0)
    );
}
