use pretty_assertions::assert_eq;
use tests::{fixtures, prelude::*};

fn create(db: &mut Db, class: &str, field: &str, value: &str) -> Record {
    let mut record = db.create(class).unwrap();
    record.set_field(field, value).unwrap();
    record.write(db).unwrap();
    record
}

fn join_rows(log: &ExecLog) -> usize {
    log.writes()
        .iter()
        .filter(|sql| sql.starts_with(r#"INSERT INTO "Article_Tags""#))
        .count()
}

#[test]
fn add_links_both_sides() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = create(&mut db, "Article", "Title", "Hello");
    let rust = create(&mut db, "Tag", "Name", "rust");
    let mut orm = db.create("Tag").unwrap();
    orm.set_field("Name", "orm").unwrap();

    let mut tags = assert_ok!(article.many_many("Tags"));
    assert_ok!(tags.add(&mut db, rust.id().unwrap()));
    assert_ok!(tags.add(&mut db, &mut orm));
    assert_some!(orm.id());

    let names = assert_ok!(tags.items(&mut db))
        .iter()
        .map(|tag| tag.get::<String>("Name").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, ["rust", "orm"]);
    assert_eq!(assert_ok!(tags.count(&mut db)), 2);

    let mut articles = assert_ok!(rust.many_many("Articles"));
    assert_eq!(assert_ok!(articles.ids(&mut db)), [article.id().unwrap()]);
}

#[test]
fn repeated_add_keeps_one_join_row() {
    let TestDb { mut db, log } = setup(&mut fixtures::blog());

    let article = create(&mut db, "Article", "Title", "Hello");
    let tag = create(&mut db, "Tag", "Name", "rust");
    let tag_id = tag.id().unwrap();

    let mut tags = article.many_many("Tags").unwrap();
    assert_ok!(tags.add(&mut db, tag_id));
    assert_ok!(tags.add(&mut db, tag_id));

    assert_eq!(join_rows(&log), 2);
    assert_eq!(assert_ok!(tags.count(&mut db)), 1);
    assert_eq!(assert_ok!(tags.ids(&mut db)), [tag_id]);
}

#[test]
fn extra_fields_live_on_the_join_row() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = create(&mut db, "Article", "Title", "Hello");
    let rust = create(&mut db, "Tag", "Name", "rust");
    let orm = create(&mut db, "Tag", "Name", "orm");

    let mut tags = article.many_many("Tags").unwrap();
    assert_ok!(tags.add_with(&mut db, rust.id().unwrap(), &[("Sort", Value::from(2))]));
    assert_ok!(tags.add_with(&mut db, orm.id().unwrap(), &[("Sort", Value::from("1"))]));

    let extras = assert_ok!(tags.extra_fields(&mut db, orm.id().unwrap()));
    assert_eq!(extras.get("Sort"), Some(&Value::I64(1)));

    // Items carry the extras too.
    let sorts = assert_ok!(tags.items(&mut db))
        .iter()
        .map(|tag| tag.get::<i64>("Sort").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(sorts, [2, 1]);

    // Re-adding replaces the join row, extras included.
    assert_ok!(tags.add_with(&mut db, rust.id().unwrap(), &[("Sort", Value::from(5))]));
    let extras = assert_ok!(tags.extra_fields(&mut db, rust.id().unwrap()));
    assert_eq!(extras.get("Sort"), Some(&Value::I64(5)));
}

#[test]
fn extra_fields_errors() {
    let TestDb { mut db, log } = setup(&mut fixtures::blog());

    let article = create(&mut db, "Article", "Title", "Hello");
    let tag = create(&mut db, "Tag", "Name", "rust");
    let tag_id = tag.id().unwrap();

    let mut tags = article.many_many("Tags").unwrap();
    assert_err!(
        tags.add_with(&mut db, tag_id, &[("Colour", Value::from("red"))]),
        is_unknown_field
    );
    assert_eq!(join_rows(&log), 0);

    assert_err!(tags.extra_fields(&mut db, tag_id), is_record_not_found);
}

#[test]
fn relations_without_extras_report_none() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let alice = create(&mut db, "Member", "Email", "alice@example.com");
    let bob = create(&mut db, "Member", "Email", "bob@example.com");

    let friends = alice.many_many("Friends").unwrap();
    assert_empty!(assert_ok!(friends.extra_fields(&mut db, bob.id().unwrap())));
}

#[test]
fn remove_and_remove_all() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = create(&mut db, "Article", "Title", "Hello");
    let ids = ["a", "b", "c"]
        .into_iter()
        .map(|name| create(&mut db, "Tag", "Name", name).id().unwrap())
        .collect::<Vec<_>>();

    let mut tags = article.many_many("Tags").unwrap();
    for id in &ids {
        tags.add(&mut db, *id).unwrap();
    }

    assert_ok!(tags.remove(&mut db, ids[1]));
    assert_eq!(assert_ok!(tags.ids(&mut db)), [ids[0], ids[2]]);

    assert_ok!(tags.remove_all(&mut db));
    assert_eq!(assert_ok!(tags.count(&mut db)), 0);

    // The tags themselves are untouched.
    assert_eq!(assert_ok!(db.all("Tag")).len(), 3);
}

#[test]
fn set_to_id_list_applies_the_difference() {
    let TestDb { mut db, mut log } = setup(&mut fixtures::blog());

    let article = create(&mut db, "Article", "Title", "Hello");
    let ids = ["a", "b", "c", "d"]
        .into_iter()
        .map(|name| create(&mut db, "Tag", "Name", name).id().unwrap())
        .collect::<Vec<_>>();

    let mut tags = article.many_many("Tags").unwrap();
    tags.add(&mut db, ids[0]).unwrap();
    tags.add(&mut db, ids[1]).unwrap();

    assert_ok!(tags.set_to_id_list(&mut db, &[ids[1], ids[2], ids[3], ids[2]]));

    let mut current = assert_ok!(tags.ids(&mut db));
    current.sort_unstable();
    assert_eq!(current, [ids[1], ids[2], ids[3]]);
    assert_unique!(current.iter());

    log.clear();
    assert_ok!(tags.set_to_id_list(&mut db, &[ids[3], ids[1], ids[2]]));
    assert_empty!(log.writes());
}

#[test]
fn reverse_side_edits_the_same_rows() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let hello = create(&mut db, "Article", "Title", "Hello");
    let bye = create(&mut db, "Article", "Title", "Bye");
    let tag = create(&mut db, "Tag", "Name", "rust");

    let mut articles = tag.many_many("Articles").unwrap();
    assert_ok!(articles.add(&mut db, hello.id().unwrap()));
    assert_ok!(articles.add(&mut db, bye.id().unwrap()));

    let mut tags = hello.many_many("Tags").unwrap();
    assert_eq!(assert_ok!(tags.ids(&mut db)), [tag.id().unwrap()]);

    assert_ok!(tags.remove(&mut db, tag.id().unwrap()));
    assert_eq!(assert_ok!(articles.ids(&mut db)), [bye.id().unwrap()]);
}

#[test]
fn self_join() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let alice = create(&mut db, "Member", "Email", "alice@example.com");
    let bob = create(&mut db, "Member", "Email", "bob@example.com");
    let carol = create(&mut db, "Member", "Email", "carol@example.com");

    let mut friends = alice.many_many("Friends").unwrap();
    friends.add(&mut db, bob.id().unwrap()).unwrap();
    friends.add(&mut db, carol.id().unwrap()).unwrap();

    assert_eq!(
        assert_ok!(friends.ids(&mut db)),
        [bob.id().unwrap(), carol.id().unwrap()]
    );
    assert_eq!(
        assert_ok!(bob.many_many("Friends").unwrap().count(&mut db)),
        0
    );
}

#[test]
fn deleting_the_owner_drops_join_rows() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let mut article = create(&mut db, "Article", "Title", "Hello");
    let tag = create(&mut db, "Tag", "Name", "rust");

    article
        .many_many("Tags")
        .unwrap()
        .add(&mut db, tag.id().unwrap())
        .unwrap();

    assert_ok!(article.delete(&mut db));

    let mut articles = tag.many_many("Articles").unwrap();
    assert_eq!(assert_ok!(articles.count(&mut db)), 0);
}
