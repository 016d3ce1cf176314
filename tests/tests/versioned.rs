use pretty_assertions::assert_eq;
use strata::{versioned::PublishSource, VersionedState};
use tests::{fixtures, prelude::*};

fn write_titles(db: &mut Db, class: &str, titles: &[&str]) -> Record {
    let mut page = db.create(class).unwrap();

    for title in titles {
        page.set_field("Title", *title).unwrap();
        page.write(db).unwrap();
    }

    page
}

fn version(record: &Record) -> u64 {
    record.get::<u64>("Version").unwrap()
}

#[test]
fn each_write_is_a_new_version() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let page = write_titles(&mut db, "Page", &["One", "Two", "Three"]);
    let id = page.id().unwrap();
    assert_eq!(version(&page), 3);

    let versions = assert_ok!(versioned::all_versions(&mut db, "Page", id));
    let history = versions
        .iter()
        .map(|record| (version(record), record.get::<String>("Title").unwrap()))
        .collect::<Vec<_>>();

    assert_eq!(
        history,
        [
            (1, "One".to_string()),
            (2, "Two".to_string()),
            (3, "Three".to_string()),
        ]
    );
    assert!(versions.iter().all(|record| record.id() == Some(id)));

    let latest = assert_some!(assert_ok!(versioned::get_latest_version(&mut db, "Page", id)));
    assert_eq!(version(&latest), 3);

    let second = assert_ok!(versioned::get_version(&mut db, "Page", id, 2));
    assert_eq!(assert_ok!(second.get::<String>("Title")), "Two");

    assert_err!(
        versioned::get_version(&mut db, "Page", id, 9),
        is_record_not_found
    );
}

#[test]
fn unchanged_write_adds_no_version() {
    let TestDb { mut db, mut log } = setup(&mut fixtures::versioned_pages());

    let mut page = write_titles(&mut db, "Page", &["Home"]);
    log.clear();

    page.set_field("Title", "Home").unwrap();
    assert_ok!(page.write(&mut db));

    assert!(log.is_empty());
    assert_eq!(version(&page), 1);
}

#[test]
fn subclass_history_spans_every_level() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let mut docs = db.create("RedirectorPage").unwrap();
    docs.set_field("Title", "Docs").unwrap();
    docs.set_field("ExternalURL", "https://example.com/v1").unwrap();
    docs.write(&mut db).unwrap();

    docs.set_field("ExternalURL", "https://example.com/v2").unwrap();
    docs.write(&mut db).unwrap();

    let id = docs.id().unwrap();
    let first = assert_ok!(versioned::get_version(&mut db, "RedirectorPage", id, 1));
    assert_eq!(first.class_name(), "RedirectorPage");
    assert_eq!(
        assert_ok!(first.get::<String>("ExternalURL")),
        "https://example.com/v1"
    );

    // Reading through the root class still dispatches to the subclass.
    let latest = assert_some!(assert_ok!(versioned::get_latest_version(&mut db, "Page", id)));
    assert_eq!(latest.class_name(), "RedirectorPage");
    assert_eq!(
        assert_ok!(latest.get::<String>("ExternalURL")),
        "https://example.com/v2"
    );
}

#[test]
fn publish_copies_draft_to_live() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let page = write_titles(&mut db, "Page", &["Draft one", "Draft two"]);
    let id = page.id().unwrap();

    assert_err!(
        db.with_stage(Stage::Live, |db| db.get_by_id("Page", id)),
        is_record_not_found
    );
    assert!(!assert_ok!(versioned::is_published(&mut db, &page)));

    let published = assert_ok!(versioned::publish(
        &mut db,
        &page,
        Stage::Draft,
        Stage::Live,
        false
    ));
    assert_eq!(published.stage(), Stage::Live);
    assert_eq!(version(&published), 2);

    let live = assert_ok!(db.with_stage(Stage::Live, |db| db.get_by_id("Page", id)));
    let draft = assert_ok!(db.get_by_id("Page", id));

    assert_eq!(live.stage(), Stage::Live);
    assert_eq!(live.fields(), draft.fields());

    // Publishing reuses the draft's version.
    assert_eq!(
        assert_ok!(versioned::all_versions(&mut db, "Page", id)).len(),
        2
    );
    assert!(assert_ok!(versioned::is_published(&mut db, &page)));
    assert!(!assert_ok!(versioned::stages_differ(&mut db, &page)));
}

#[test]
fn publish_marks_the_version() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let mut page = write_titles(&mut db, "Page", &["One"]);
    let id = page.id().unwrap();

    assert_eq!(
        assert_ok!(versioned::state(&mut db, &page)),
        VersionedState {
            stage: Stage::Draft,
            version: 1,
            was_published: false,
        }
    );

    versioned::publish(&mut db, &page, Stage::Draft, Stage::Live, false).unwrap();

    assert!(assert_ok!(versioned::state(&mut db, &page)).was_published);

    page.set_field("Title", "Two").unwrap();
    page.write(&mut db).unwrap();

    assert_eq!(
        assert_ok!(versioned::state(&mut db, &page)),
        VersionedState {
            stage: Stage::Draft,
            version: 2,
            was_published: false,
        }
    );

    let flags = assert_ok!(versioned::all_versions(&mut db, "Page", id))
        .iter()
        .map(|record| record.get::<bool>("WasPublished").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(flags, [true, false]);
}

#[test]
fn publish_with_new_version() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let page = write_titles(&mut db, "Page", &["One"]);
    let id = page.id().unwrap();

    let published = assert_ok!(versioned::publish(
        &mut db,
        &page,
        Stage::Draft,
        Stage::Live,
        true
    ));
    assert_eq!(version(&published), 2);

    let latest = versioned::get_latest_version(&mut db, "Page", id)
        .unwrap()
        .unwrap();
    assert_eq!(version(&latest), 2);
    assert!(assert_ok!(latest.get::<bool>("WasPublished")));
}

#[test]
fn draft_edits_do_not_touch_live() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let mut page = write_titles(&mut db, "Page", &["Published"]);
    let id = page.id().unwrap();
    versioned::publish(&mut db, &page, Stage::Draft, Stage::Live, false).unwrap();

    page.set_field("Title", "Work in progress").unwrap();
    page.write(&mut db).unwrap();

    assert!(assert_ok!(versioned::stages_differ(&mut db, &page)));

    let live = versioned::get_one_by_stage(&mut db, "Page", Stage::Live, None).unwrap();
    let live = assert_some!(live);
    assert_eq!(live.id(), Some(id));
    assert_eq!(assert_ok!(live.get::<String>("Title")), "Published");

    let title = db.column("Page", "Title").unwrap();
    let drafts = assert_ok!(versioned::get_by_stage(
        &mut db,
        "Page",
        Stage::Draft,
        Some(Expr::eq(title, "Work in progress"))
    ));
    assert_eq!(drafts.len(), 1);
}

#[test]
fn unpublish_removes_only_live() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let page = write_titles(&mut db, "RedirectorPage", &["Docs"]);
    let id = page.id().unwrap();
    versioned::publish(&mut db, &page, Stage::Draft, Stage::Live, false).unwrap();

    assert_ok!(versioned::unpublish(&mut db, &page));

    assert!(!assert_ok!(versioned::is_published(&mut db, &page)));
    assert!(assert_ok!(versioned::stages_differ(&mut db, &page)));
    assert_ok!(db.get_by_id("RedirectorPage", id));
    assert_eq!(
        assert_ok!(versioned::all_versions(&mut db, "Page", id)).len(),
        1
    );

    assert_err!(versioned::unpublish(&mut db, &page), is_record_not_found);
}

#[test]
fn delete_from_draft_keeps_live() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let page = write_titles(&mut db, "Page", &["Home"]);
    let id = page.id().unwrap();
    versioned::publish(&mut db, &page, Stage::Draft, Stage::Live, false).unwrap();

    assert_ok!(versioned::delete_from_stage(&mut db, &page, Stage::Draft));

    assert_err!(db.get_by_id("Page", id), is_record_not_found);
    assert_ok!(db.with_stage(Stage::Live, |db| db.get_by_id("Page", id)));
}

#[test]
fn rollback_writes_a_new_version() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let mut page = write_titles(&mut db, "Page", &["One", "Two", "Three"]);
    let id = page.id().unwrap();

    assert_ok!(versioned::rollback_to(&mut db, &mut page, 1));
    assert_eq!(assert_ok!(page.get::<String>("Title")), "One");
    assert_eq!(version(&page), 4);

    let titles = assert_ok!(versioned::all_versions(&mut db, "Page", id))
        .iter()
        .map(|record| record.get::<String>("Title").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(titles, ["One", "Two", "Three", "One"]);
}

#[test]
fn versions_record_the_author() {
    let mut builder = fixtures::versioned_pages();
    builder.author(7);
    let TestDb { mut db, .. } = setup(&mut builder);

    let page = write_titles(&mut db, "Page", &["Home"]);

    let first = assert_ok!(versioned::get_version(&mut db, "Page", page.id().unwrap(), 1));
    assert_eq!(assert_ok!(first.get::<u64>("AuthorID")), 7);
}

#[test]
fn history_needs_a_versioned_class() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let mut article = db.create("Article").unwrap();
    let id = article.write(&mut db).unwrap();

    assert_err!(versioned::all_versions(&mut db, "Article", id), is_invalid_schema);

    let schema = db.schema();
    let article = schema.resolve_class("Article").unwrap();
    assert!(!versioned::is_versioned_class(schema, article.id));
}

#[test]
fn publish_an_older_version() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let page = write_titles(&mut db, "Page", &["One", "Two", "Three"]);
    let id = page.id().unwrap();

    let published = assert_ok!(versioned::publish(
        &mut db,
        &page,
        PublishSource::Version(1),
        Stage::Live,
        false
    ));
    assert_eq!(version(&published), 1);
    assert_eq!(assert_ok!(published.get::<String>("Title")), "One");

    let live = assert_ok!(db.with_stage(Stage::Live, |db| db.get_by_id("Page", id)));
    assert_eq!(assert_ok!(live.get::<String>("Title")), "One");
    assert_eq!(version(&live), 1);

    // The draft and the history are left alone; only version 1 is flagged.
    let draft = assert_ok!(db.get_by_id("Page", id));
    assert_eq!(assert_ok!(draft.get::<String>("Title")), "Three");
    assert_eq!(version(&draft), 3);

    let flags = assert_ok!(versioned::all_versions(&mut db, "Page", id))
        .iter()
        .map(|record| record.get::<bool>("WasPublished").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(flags, [true, false, false]);
    assert!(assert_ok!(versioned::stages_differ(&mut db, &page)));
}

#[test]
fn publish_from_a_missing_source_fails() {
    let TestDb { mut db, mut log } = setup(&mut fixtures::versioned_pages());

    let page = write_titles(&mut db, "Page", &["One"]);
    let id = page.id().unwrap();
    log.clear();

    assert_err!(
        versioned::publish(&mut db, &page, PublishSource::Version(5), Stage::Live, false),
        is_record_not_found
    );
    assert_eq!(db.context(), StageContext::default());

    // Nothing is live yet, so there is nothing to copy back to draft.
    assert_err!(
        versioned::publish(&mut db, &page, Stage::Live, Stage::Draft, false),
        is_record_not_found
    );
    assert_eq!(db.context(), StageContext::default());

    assert_empty!(log.writes());
    assert_err!(
        db.with_stage(Stage::Live, |db| db.get_by_id("Page", id)),
        is_record_not_found
    );
}

#[test]
fn stage_is_restored_after_errors() {
    let TestDb { mut db, .. } = setup(&mut fixtures::versioned_pages());

    let result: strata::Result<()> =
        db.with_stage(Stage::Live, |_| Err(strata::err!("interrupted")));
    assert_err!(result);
    assert_eq!(db.context(), StageContext::default());

    let result = db.with_context(StageContext::archived(at(9, 0, 0)), |db| {
        db.get_by_id("Page", 42)
    });
    assert_err!(result, is_record_not_found);
    assert_eq!(db.context(), StageContext::default());
}
