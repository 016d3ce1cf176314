use pretty_assertions::assert_eq;
use tests::{fixtures, prelude::*};

fn article(db: &mut Db, title: &str) -> Record {
    let mut article = db.create("Article").unwrap();
    article.set_field("Title", title).unwrap();
    article.write(db).unwrap();
    article
}

fn comment(db: &mut Db, body: &str) -> Record {
    let mut comment = db.create("Comment").unwrap();
    comment.set_field("Body", body).unwrap();
    comment
}

#[test]
fn add_and_count() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = article(&mut db, "Hello");
    let mut comments = assert_ok!(article.has_many("Comments"));
    assert_eq!(assert_ok!(comments.count(&mut db)), 0);

    let mut first = comment(&mut db, "First!");
    let mut second = comment(&mut db, "Nice post");

    // Unsaved children are written by the add.
    assert_ok!(comments.add(&mut db, &mut first));
    assert_ok!(comments.add(&mut db, &mut second));
    assert_some!(first.id());

    assert_eq!(assert_ok!(comments.count(&mut db)), 2);
    assert_eq!(
        assert_ok!(comments.ids(&mut db)),
        [first.id().unwrap(), second.id().unwrap()]
    );

    let bodies = assert_ok!(comments.items(&mut db))
        .iter()
        .map(|comment| comment.get::<String>("Body").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(bodies, ["First!", "Nice post"]);

    let loaded = assert_ok!(db.get_by_id("Comment", first.id().unwrap()));
    assert_eq!(assert_ok!(loaded.get::<u64>("ArticleID")), article.id().unwrap());
}

#[test]
fn add_by_id_moves_the_child() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let hello = article(&mut db, "Hello");
    let bye = article(&mut db, "Bye");

    let mut child = comment(&mut db, "Moving");
    hello.has_many("Comments").unwrap().add(&mut db, &mut child).unwrap();

    let mut comments = bye.has_many("Comments").unwrap();
    assert_ok!(comments.add(&mut db, child.id().unwrap()));

    assert_eq!(assert_ok!(comments.count(&mut db)), 1);
    assert_eq!(
        assert_ok!(hello.has_many("Comments").unwrap().count(&mut db)),
        0
    );
}

#[test]
fn remove_clears_the_foreign_key() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = article(&mut db, "Hello");
    let mut comments = article.has_many("Comments").unwrap();

    let mut keep = comment(&mut db, "Keep");
    let mut gone = comment(&mut db, "Drop");
    comments.add(&mut db, &mut keep).unwrap();
    comments.add(&mut db, &mut gone).unwrap();

    assert_ok!(comments.remove(&mut db, gone.id().unwrap()));
    assert_eq!(assert_ok!(comments.ids(&mut db)), [keep.id().unwrap()]);

    let dropped = assert_ok!(db.get_by_id("Comment", gone.id().unwrap()));
    assert_eq!(assert_ok!(dropped.get_field("ArticleID")), Value::Null);
}

#[test]
fn remove_ignores_children_of_other_owners() {
    let TestDb { mut db, mut log } = setup(&mut fixtures::blog());

    let hello = article(&mut db, "Hello");
    let bye = article(&mut db, "Bye");

    let mut child = comment(&mut db, "Stays");
    hello.has_many("Comments").unwrap().add(&mut db, &mut child).unwrap();
    log.clear();

    assert_ok!(bye.has_many("Comments").unwrap().remove(&mut db, &mut child));
    assert_empty!(log.writes());

    assert_eq!(
        assert_ok!(hello.has_many("Comments").unwrap().count(&mut db)),
        1
    );
}

#[test]
fn remove_all() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = article(&mut db, "Hello");
    let mut comments = article.has_many("Comments").unwrap();

    for body in ["a", "b", "c"] {
        let mut child = comment(&mut db, body);
        comments.add(&mut db, &mut child).unwrap();
    }

    assert_eq!(assert_ok!(comments.count(&mut db)), 3);
    assert_ok!(comments.remove_all(&mut db));
    assert_eq!(assert_ok!(comments.count(&mut db)), 0);
    assert_eq!(assert_ok!(db.all("Comment")).len(), 3);
}

#[test]
fn extra_fields_are_rejected() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = article(&mut db, "Hello");
    let mut child = comment(&mut db, "Hi");

    assert_err!(
        article
            .has_many("Comments")
            .unwrap()
            .add_with(&mut db, &mut child, &[("Sort", Value::from(1))]),
        is_invalid_statement
    );
    assert_none!(child.id());
}

#[test]
fn unsaved_owner_has_no_list() {
    let TestDb { db, .. } = setup(&mut fixtures::blog());

    let article = db.create("Article").unwrap();
    assert_err!(article.has_many("Comments"), is_invalid_statement);
}

#[test]
fn wrong_relation_kind() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let article = article(&mut db, "Hello");
    assert_err!(article.has_many("Tags"), is_invalid_schema);
    assert_err!(article.has_many("Nope"), is_invalid_schema);
}

#[test]
fn deleting_the_owner_detaches_children() {
    let TestDb { mut db, .. } = setup(&mut fixtures::blog());

    let mut article = article(&mut db, "Hello");
    let article_id = article.id().unwrap();

    let mut child = comment(&mut db, "Orphan soon");
    article
        .has_many("Comments")
        .unwrap()
        .add(&mut db, &mut child)
        .unwrap();

    assert_ok!(article.delete(&mut db));
    assert_err!(db.get_by_id("Article", article_id), is_record_not_found);

    let survivor = assert_ok!(db.get_by_id("Comment", child.id().unwrap()));
    assert_eq!(assert_ok!(survivor.get::<String>("Body")), "Orphan soon");
    assert_eq!(assert_ok!(survivor.get_field("ArticleID")), Value::Null);

    let parent = assert_ok!(survivor.has_one(&mut db, "Article"));
    assert_none!(parent.id());
}
