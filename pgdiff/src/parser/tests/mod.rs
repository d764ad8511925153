mod comments;
mod grants;
mod operators;

use indoc::indoc;
use super::*;
use crate::default;
use crate::models::*;

pub(super) fn load(dump: &str) -> PostgresDatabase {
    crate::init_test_tracing();
    load_database_from_str(dump, &LoadOptions::default()).unwrap()
}

pub(super) fn public(database: &PostgresDatabase) -> &PostgresSchema {
    database.get_schema("public").unwrap()
}

fn test_load(dump: &str, expected: PostgresDatabase) {
    similar_asserts::assert_eq!(load(dump), expected);
}

#[test]
fn handler_patterns_compile() {
    assert!(!HANDLERS.is_empty());
}

#[test]
fn loads_simple_dump() {
    test_load(
        indoc! {"
            --
            -- PostgreSQL database dump
            --
            SET statement_timeout = 0;
            SELECT pg_catalog.set_config('search_path', '', false);

            CREATE TABLE public.t (
                id integer NOT NULL,
                name text DEFAULT 'x'::text
            );

            ALTER TABLE public.t OWNER TO admin;

            ALTER TABLE ONLY public.t
                ADD CONSTRAINT t_pkey PRIMARY KEY (id);
        "},
        PostgresDatabase {
            schemas: vec![PostgresSchema {
                name: "public".to_string(),
                relations: vec![PostgresRelation {
                    columns: vec![
                        PostgresColumn {
                            name: "id".to_string(),
                            data_type: Some("integer".to_string()),
                            nullable: false,
                            ..default()
                        },
                        PostgresColumn {
                            name: "name".to_string(),
                            data_type: Some("text".to_string()),
                            default_value: Some("'x'::text".to_string()),
                            ..default()
                        },
                    ],
                    constraints: vec![PostgresConstraint {
                        name: "t_pkey".to_string(),
                        definition: "PRIMARY KEY (id)".to_string(),
                        comment: None,
                    }],
                    owner: Some("admin".to_string()),
                    ..PostgresRelation::new("t", RelationKind::Table(default()))
                }],
                ..default()
            }],
            ignored_statements: vec!["SET statement_timeout = 0;".to_string()],
            ..default()
        },
    );
}

#[test]
fn unsupported_statements_are_kept_as_ignored() {
    let database = load(indoc! {"
        CREATE TABLE t (id integer);
        CREATE OPERATOR CLASS int_ops FOR TYPE integer USING btree AS OPERATOR 1 <;
    "});

    assert_eq!(public(&database).relations.len(), 1);
    assert_eq!(
        database.ignored_statements,
        vec!["CREATE OPERATOR CLASS int_ops FOR TYPE integer USING btree AS OPERATOR 1 <;"]
    );
}

#[test]
fn second_table_with_same_name_fails() {
    let result = load_database_from_str(
        "CREATE TABLE t (a integer); CREATE TABLE t (b integer);",
        &LoadOptions::default(),
    );

    assert!(matches!(
        result,
        Err(PgDiffError::DuplicateObject { kind: ObjectKind::Relation, ref name, .. }) if name == "t"
    ));
}

#[test]
fn inline_primary_key_is_rejected() {
    let result = load_database_from_str("CREATE TABLE t (id integer, PRIMARY KEY (id));", &LoadOptions::default());
    assert!(matches!(result, Err(PgDiffError::Unsupported { .. })));
}

#[test]
fn altering_a_missing_table_fails() {
    let result = load_database_from_str("ALTER TABLE missing OWNER TO admin;", &LoadOptions::default());

    assert!(matches!(
        result,
        Err(PgDiffError::ObjectNotFound { kind: ObjectKind::Relation, ref name, .. }) if name == "missing"
    ));
}

#[test]
fn unterminated_dump_fails() {
    let result = load_database_from_str("CREATE TABLE t (id integer)", &LoadOptions::default());
    assert!(matches!(result, Err(PgDiffError::UnterminatedStatement { .. })));
}

#[test]
fn search_path_decides_the_default_schema() {
    let database = load(indoc! {"
        CREATE SCHEMA app;
        SET search_path = app, pg_catalog;
        CREATE TABLE t (id integer);
        SET search_path TO '';
        CREATE TABLE u (id integer);
    "});

    assert_eq!(database.default_schema, "app");
    assert!(public(&database).relations.is_empty());

    let app = database.get_schema("app").unwrap();
    assert!(app.get_relation("t").is_some());
    assert!(app.get_relation("u").is_some());
    assert_eq!(database.ignored_statements, vec!["SET search_path TO '';"]);
}

#[test]
fn schemas_and_extensions() {
    let database = load(indoc! {"
        CREATE SCHEMA \"Sales\" AUTHORIZATION admin;
        ALTER SCHEMA \"Sales\" OWNER TO admin;
        CREATE EXTENSION IF NOT EXISTS plpgsql WITH SCHEMA pg_catalog;
        CREATE EXTENSION hstore WITH SCHEMA \"Sales\" VERSION '1.8';
    "});

    let sales = database.get_schema("Sales").unwrap();
    assert_eq!(sales.authorization.as_deref(), Some("admin"));
    assert_eq!(sales.owner.as_deref(), Some("admin"));

    let hstore = sales.get_extension("hstore").unwrap();
    assert_eq!(hstore.schema_name, "Sales");
    assert_eq!(hstore.version.as_deref(), Some("'1.8'"));

    let plpgsql = public(&database).get_extension("plpgsql").unwrap();
    assert_eq!(plpgsql.schema_name, "pg_catalog");
}

#[test]
fn slony_triggers_can_be_skipped() {
    let dump = indoc! {"
        CREATE TABLE t (id integer);
        CREATE TRIGGER _slony_logtrigger AFTER INSERT ON t FOR EACH ROW EXECUTE PROCEDURE _slony.logtrigger('x');
        ALTER TABLE t DISABLE TRIGGER _slony_logtrigger;
    "};

    let options = LoadOptions {
        ignore_slony_triggers: true,
    };
    let skipped = load_database_from_str(dump, &options).unwrap();
    assert!(public(&skipped).relations[0].triggers.is_empty());

    let kept = load(dump);
    let trigger = &public(&kept).relations[0].triggers[0];
    assert_eq!(trigger.name, "_slony_logtrigger");
    assert!(trigger.disabled);
}
