use pretty_assertions::assert_eq;
use tests::{fixtures, prelude::*};

fn title(record: &Record) -> String {
    record.get::<String>("Title").unwrap()
}

#[test]
fn reads_as_of_a_moment() {
    let (TestDb { mut db, .. }, clock) =
        setup_with_clock(&mut fixtures::versioned_pages(), at(9, 0, 0));

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "One").unwrap();
    let id = page.write(&mut db).unwrap();

    clock.set(at(10, 0, 0));
    page.set_field("Title", "Two").unwrap();
    page.write(&mut db).unwrap();

    clock.set(at(11, 0, 0));
    page.set_field("Title", "Three").unwrap();
    page.write(&mut db).unwrap();

    let mut late = db.create("Page").unwrap();
    late.set_field("Title", "Late").unwrap();
    late.write(&mut db).unwrap();

    let then = assert_ok!(db.with_context(StageContext::archived(at(10, 30, 0)), |db| {
        db.get_by_id("Page", id)
    }));
    assert_eq!(title(&then), "Two");
    assert_eq!(assert_ok!(then.get::<u64>("Version")), 2);
    assert_eq!(then.id(), Some(id));

    // Records written after the moment do not exist yet.
    let all = assert_ok!(db.with_context(StageContext::archived(at(10, 30, 0)), |db| {
        db.all("Page")
    }));
    assert_eq!(all.iter().map(title).collect::<Vec<_>>(), ["Two"]);

    let earlier = assert_ok!(db.with_context(StageContext::archived(at(9, 30, 0)), |db| {
        db.get_by_id("Page", id)
    }));
    assert_eq!(title(&earlier), "One");

    let before = db.with_context(StageContext::archived(at(8, 0, 0)), |db| {
        db.get_by_id("Page", id)
    });
    assert_err!(before, is_record_not_found);

    // The current draft is unaffected.
    assert_eq!(title(&db.get_by_id("Page", id).unwrap()), "Three");
}

#[test]
fn subclass_levels_follow_the_version() {
    let (TestDb { mut db, .. }, clock) =
        setup_with_clock(&mut fixtures::versioned_pages(), at(9, 0, 0));

    let mut docs = db.create("RedirectorPage").unwrap();
    docs.set_field("Title", "Docs").unwrap();
    docs.set_field("ExternalURL", "https://example.com/old").unwrap();
    let id = docs.write(&mut db).unwrap();

    clock.set(at(12, 0, 0));
    docs.set_field("ExternalURL", "https://example.com/new").unwrap();
    docs.write(&mut db).unwrap();

    let mut guard = db.scoped(StageContext::archived(at(10, 0, 0)));
    let then = assert_ok!(guard.get_by_id("Page", id));
    assert_eq!(then.class_name(), "RedirectorPage");
    assert_eq!(
        assert_ok!(then.get::<String>("ExternalURL")),
        "https://example.com/old"
    );
    drop(guard);

    assert_eq!(db.context(), StageContext::default());
}

#[test]
fn archived_reads_are_read_only() {
    let (TestDb { mut db, mut log }, _clock) =
        setup_with_clock(&mut fixtures::versioned_pages(), at(9, 0, 0));

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "One").unwrap();
    page.write(&mut db).unwrap();

    let mut then = db
        .with_context(StageContext::archived(at(10, 0, 0)), |db| {
            db.get_by_id("Page", page.id().unwrap())
        })
        .unwrap();
    log.clear();

    let mut guard = db.scoped(StageContext::archived(at(10, 0, 0)));
    then.set_field("Title", "Rewritten history").unwrap();
    assert_err!(then.write(&mut guard), is_invalid_statement);
    assert_err!(page.delete(&mut guard), is_invalid_statement);
    drop(guard);

    assert_empty!(log.writes());
}

#[test]
fn unversioned_classes_ignore_the_moment() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let mut article = db.create("Article").unwrap();
    article.set_field("Title", "Hello").unwrap();
    let id = article.write(&mut db).unwrap();

    let found = db.with_context(StageContext::archived(at(0, 0, 1)), |db| {
        db.get_by_id("Article", id)
    });
    assert_eq!(title(&assert_ok!(found)), "Hello");
}

#[test]
fn archived_reads_survive_a_rolled_back_transaction() {
    let (TestDb { mut db, .. }, clock) =
        setup_with_clock(&mut fixtures::versioned_pages(), at(9, 0, 0));

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "One").unwrap();
    let id = page.write(&mut db).unwrap();
    clock.set(at(11, 0, 0));

    assert_eq!(title(&assert_ok!(read_at(&mut db, id, at(10, 0, 0)))), "One");

    let failed: strata::Result<()> = db.transaction(|_| Err(strata::err!("interrupted")));
    assert_err!(failed);
    assert_eq!(title(&assert_ok!(read_at(&mut db, id, at(10, 0, 0)))), "One");

    // A moment first read inside a rolled back transaction is read again
    // afterwards.
    let failed: strata::Result<()> = db.transaction(|db| {
        read_at(db, id, at(10, 30, 0))?;
        Err(strata::err!("interrupted"))
    });
    assert_err!(failed);
    assert_eq!(title(&assert_ok!(read_at(&mut db, id, at(10, 30, 0)))), "One");

    // Moments read inside a committed transaction stay on the connection.
    assert_ok!(db.transaction(|db| read_at(db, id, at(10, 45, 0))));
    let failed: strata::Result<()> = db.transaction(|_| Err(strata::err!("interrupted")));
    assert_err!(failed);
    assert_eq!(title(&assert_ok!(read_at(&mut db, id, at(10, 45, 0)))), "One");
}

fn read_at(db: &mut Db, id: u64, moment: chrono::NaiveDateTime) -> strata::Result<Record> {
    db.with_context(StageContext::archived(moment), |db| db.get_by_id("Page", id))
}
