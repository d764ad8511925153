use indoc::indoc;
use crate::parser::tests::{load, public};

#[test]
fn comments_on_every_supported_kind() {
    let database = load(indoc! {"
        CREATE SCHEMA app;
        CREATE TABLE app.t (
            id integer NOT NULL
        );
        ALTER TABLE ONLY app.t
            ADD CONSTRAINT t_pkey PRIMARY KEY (id);
        CREATE INDEX t_id_idx ON app.t USING btree (id);
        CREATE SEQUENCE app.s;

        COMMENT ON DATABASE current_database() IS 'the database';
        COMMENT ON SCHEMA app IS 'application';
        COMMENT ON TABLE app.t IS 'temporary';
        COMMENT ON TABLE app.t IS NULL;
        COMMENT ON COLUMN app.t.id IS 'identifier';
        COMMENT ON CONSTRAINT t_pkey ON app.t IS 'key';
        COMMENT ON INDEX app.t_id_idx IS 'lookup';
        COMMENT ON SEQUENCE app.s IS 'counter';
    "});

    assert_eq!(database.comment.as_deref(), Some("'the database'"));

    let app = database.get_schema("app").unwrap();
    assert_eq!(app.comment.as_deref(), Some("'application'"));

    let t = app.get_relation("t").unwrap();
    assert_eq!(t.comment, None);
    assert_eq!(t.get_column("id").unwrap().comment.as_deref(), Some("'identifier'"));
    assert_eq!(t.get_constraint("t_pkey").unwrap().comment.as_deref(), Some("'key'"));
    assert_eq!(t.get_index("t_id_idx").unwrap().comment.as_deref(), Some("'lookup'"));
    assert_eq!(app.get_sequence("s").unwrap().comment.as_deref(), Some("'counter'"));

    assert!(database.ignored_statements.is_empty());
}

#[test]
fn index_comment_falls_back_to_constraint() {
    let database = load(indoc! {"
        CREATE TABLE t (id integer);
        ALTER TABLE ONLY t ADD CONSTRAINT t_pkey PRIMARY KEY (id);
        COMMENT ON INDEX t_pkey IS 'primary';
    "});

    let t = public(&database).get_relation("t").unwrap();
    assert_eq!(t.get_constraint("t_pkey").unwrap().comment.as_deref(), Some("'primary'"));
}

#[test]
fn comments_on_unmodelled_objects_are_ignored() {
    let database = load("COMMENT ON OPERATOR CLASS int_ops USING btree IS 'integers';");

    assert_eq!(
        database.ignored_statements,
        vec!["COMMENT ON OPERATOR CLASS int_ops USING btree IS 'integers';"]
    );
}
