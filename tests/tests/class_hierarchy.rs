use pretty_assertions::assert_eq;
use strata::sql::stmt::Update;
use tests::{fixtures, prelude::*};

fn titles(records: &[Record]) -> Vec<(String, String)> {
    records
        .iter()
        .map(|record| {
            (
                record.class_name().to_string(),
                record.get::<String>("Title").unwrap(),
            )
        })
        .collect()
}

#[test]
fn subclass_fields_span_tables() {
    let TestDb { mut db, log } = setup(&mut fixtures::pages());

    let mut redirector = db.create("RedirectorPage").unwrap();
    redirector.set_field("Title", "Docs").unwrap();
    redirector.set_field("RedirectionType", "External").unwrap();
    redirector.set_field("ExternalURL", "https://example.com/docs").unwrap();
    let id = assert_ok!(redirector.write(&mut db));

    // One row allocates the id, then one statement per table level.
    let writes = log.writes();
    assert_eq!(writes.len(), 3);
    assert!(writes[0].starts_with(r#"INSERT INTO "Page""#));
    assert!(writes[2].starts_with(r#"INSERT INTO "RedirectorPage""#));

    let loaded = assert_ok!(db.get_by_id("RedirectorPage", id));
    assert_eq!(assert_ok!(loaded.get::<String>("Title")), "Docs");
    assert_eq!(
        assert_ok!(loaded.get::<String>("ExternalURL")),
        "https://example.com/docs"
    );
    assert!(loaded.is_a("Page"));
    assert!(!loaded.is_a("VirtualPage"));
}

#[test]
fn root_reads_return_subclasses() {
    let TestDb { mut db, .. } = setup(&mut fixtures::pages());

    for (class, title) in [
        ("Page", "Home"),
        ("RedirectorPage", "Docs"),
        ("VirtualPage", "Mirror"),
    ] {
        let mut record = db.create(class).unwrap();
        record.set_field("Title", title).unwrap();
        record.write(&mut db).unwrap();
    }

    let all = assert_ok!(db.all("Page"));
    assert_eq!(
        titles(&all),
        [
            ("Page".to_string(), "Home".to_string()),
            ("RedirectorPage".to_string(), "Docs".to_string()),
            ("VirtualPage".to_string(), "Mirror".to_string()),
        ]
    );

    let redirectors = assert_ok!(db.all("RedirectorPage"));
    assert_eq!(
        titles(&redirectors),
        [("RedirectorPage".to_string(), "Docs".to_string())]
    );

    // Reading a subclass by the id of another class finds nothing.
    let home = all[0].id().unwrap();
    assert_err!(db.get_by_id("VirtualPage", home), is_record_not_found);
}

#[test]
fn shared_column_names_resolve_per_class() {
    let TestDb { mut db, .. } = setup(&mut fixtures::pages());

    let mut redirector = db.create("RedirectorPage").unwrap();
    redirector.set_field("LinkLabel", "Go there").unwrap();
    redirector.write(&mut db).unwrap();

    let mut virtual_page = db.create("VirtualPage").unwrap();
    virtual_page.set_field("LinkLabel", "Copy").unwrap();
    virtual_page.write(&mut db).unwrap();

    let labels = assert_ok!(db.all("Page"))
        .iter()
        .map(|record| record.get::<String>("LinkLabel").unwrap())
        .collect::<Vec<_>>();

    assert_eq!(labels, ["Go there", "Copy"]);
}

#[test]
fn enum_fields_reject_unlisted_values() {
    let TestDb { db, .. } = setup(&mut fixtures::pages());

    let mut redirector = db.create("RedirectorPage").unwrap();
    assert_err!(
        redirector.set_field("RedirectionType", "Sideways"),
        is_type_conversion
    );
    assert_ok!(redirector.set_field("RedirectionType", "Internal"));
}

#[test]
fn subclass_fields_are_unknown_on_the_parent() {
    let TestDb { db, .. } = setup(&mut fixtures::pages());

    let mut page = db.create("Page").unwrap();
    assert_err!(page.set_field("ExternalURL", "https://example.com"), is_unknown_field);
}

#[test]
fn delete_removes_every_level() {
    let TestDb { mut db, mut log } = setup(&mut fixtures::pages());

    let mut redirector = db.create("RedirectorPage").unwrap();
    let id = redirector.write(&mut db).unwrap();
    log.clear();

    assert_ok!(redirector.delete(&mut db));

    let deletes = log
        .writes()
        .into_iter()
        .filter(|sql| sql.starts_with("DELETE"))
        .count();
    assert_eq!(deletes, 2);

    assert_err!(db.get_by_id("Page", id), is_record_not_found);
    assert_empty!(assert_ok!(db.all("RedirectorPage")));
}

#[test]
fn unknown_discriminator_reads_as_requested_class() {
    let TestDb { mut db, .. } = setup(&mut fixtures::pages());

    let mut page = db.create("Page").unwrap();
    page.set_field("Title", "Legacy").unwrap();
    let id = page.write(&mut db).unwrap();

    // A class that has since been removed from the code base.
    let update = Update::new("Page")
        .set("ClassName", "ErrorPage")
        .filter(Expr::eq(Expr::unqualified("ID"), id));
    assert_eq!(assert_ok!(db.execute(&update.into())), 1);

    let loaded = assert_ok!(db.get_by_id("Page", id));
    assert_eq!(loaded.class_name(), "Page");
    assert_eq!(assert_ok!(loaded.get::<String>("Title")), "Legacy");
}
