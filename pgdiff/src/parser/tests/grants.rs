use std::collections::BTreeSet;
use indoc::indoc;
use crate::models::*;
use crate::parser::tests::{load, public};

fn kinds(kinds: &[PrivilegeKind]) -> BTreeSet<PrivilegeKind> {
    kinds.iter().copied().collect()
}

#[test]
fn relation_column_sequence_and_schema_privileges() {
    let database = load(indoc! {"
        CREATE TABLE t (a integer, b integer);
        CREATE SEQUENCE s;

        REVOKE ALL ON TABLE t FROM PUBLIC;
        GRANT SELECT, INSERT ON TABLE t TO role_a;
        GRANT SELECT ON t TO role_b, role_c;
        GRANT UPDATE(a) ON TABLE t TO role_c;
        GRANT ALL ON TABLE t TO admin WITH GRANT OPTION;
        GRANT USAGE ON SEQUENCE s TO role_a;
        GRANT SELECT ON s TO PUBLIC;
        GRANT USAGE ON SCHEMA public TO role_a;
        GRANT CREATE ON SCHEMA public TO role_b;
        REVOKE CREATE ON SCHEMA public FROM role_b;
        GRANT EXECUTE ON FUNCTION f() TO role_a;
        REVOKE SELECT ON TABLE t FROM role_b CASCADE;
    "});

    let schema = public(&database);
    let t = schema.get_relation("t").unwrap();

    let all = PrivilegeTarget::Relation.all_privileges();
    assert_eq!(
        t.privileges,
        vec![
            PostgresPrivilege {
                role: "role_a".to_string(),
                granted: kinds(&[PrivilegeKind::Select, PrivilegeKind::Insert]),
                grant_option: BTreeSet::new(),
            },
            PostgresPrivilege {
                role: "role_b".to_string(),
                granted: kinds(&[PrivilegeKind::Select]),
                grant_option: BTreeSet::new(),
            },
            PostgresPrivilege {
                role: "role_c".to_string(),
                granted: kinds(&[PrivilegeKind::Select]),
                grant_option: BTreeSet::new(),
            },
            PostgresPrivilege {
                role: "admin".to_string(),
                granted: kinds(all),
                grant_option: kinds(all),
            },
        ]
    );

    assert_eq!(
        t.get_column("a").unwrap().privileges,
        vec![PostgresPrivilege {
            role: "role_c".to_string(),
            granted: kinds(&[PrivilegeKind::Update]),
            grant_option: BTreeSet::new(),
        }]
    );
    assert!(t.get_column("b").unwrap().privileges.is_empty());

    let s = schema.get_sequence("s").unwrap();
    assert_eq!(
        s.privileges,
        vec![
            PostgresPrivilege {
                role: "role_a".to_string(),
                granted: kinds(&[PrivilegeKind::Usage]),
                grant_option: BTreeSet::new(),
            },
            PostgresPrivilege {
                role: "PUBLIC".to_string(),
                granted: kinds(&[PrivilegeKind::Select]),
                grant_option: BTreeSet::new(),
            },
        ]
    );

    assert_eq!(schema.grants, vec!["GRANT USAGE ON SCHEMA public TO role_a;"]);

    assert_eq!(
        database.ignored_statements,
        vec![
            "GRANT EXECUTE ON FUNCTION f() TO role_a;",
            "REVOKE SELECT ON TABLE t FROM role_b CASCADE;",
        ]
    );
}

#[test]
fn revoking_the_grant_option_keeps_the_privilege() {
    let database = load(indoc! {"
        CREATE TABLE t (a integer);
        GRANT SELECT ON TABLE t TO app WITH GRANT OPTION;
        REVOKE GRANT OPTION FOR SELECT ON TABLE t FROM app;
    "});

    let t = public(&database).get_relation("t").unwrap();
    assert_eq!(t.privileges[0].granted, kinds(&[PrivilegeKind::Select]));
    assert!(t.privileges[0].grant_option.is_empty());
}

#[test]
fn privileges_that_do_not_apply_are_ignored() {
    let database = load(indoc! {"
        CREATE TABLE t (a integer);
        GRANT USAGE ON TABLE t TO app;
    "});

    assert!(public(&database).get_relation("t").unwrap().privileges.is_empty());
    assert_eq!(database.ignored_statements, vec!["GRANT USAGE ON TABLE t TO app;"]);
}

#[test]
fn a_grant_that_does_not_fully_apply_changes_nothing() {
    let database = load(indoc! {"
        CREATE TABLE t (a integer);
        CREATE SEQUENCE s;
        GRANT SELECT, USAGE ON TABLE t TO app;
        GRANT SELECT, DELETE (a) ON TABLE t TO app;
        GRANT USAGE ON TABLE s, t TO app;
    "});

    let schema = public(&database);
    let t = schema.get_relation("t").unwrap();
    assert!(t.privileges.is_empty());
    assert!(t.get_column("a").unwrap().privileges.is_empty());
    assert!(schema.get_sequence("s").unwrap().privileges.is_empty());

    assert_eq!(
        database.ignored_statements,
        vec![
            "GRANT SELECT, USAGE ON TABLE t TO app;",
            "GRANT SELECT, DELETE (a) ON TABLE t TO app;",
            "GRANT USAGE ON TABLE s, t TO app;",
        ]
    );
}

#[test]
fn table_and_column_privileges_in_one_statement_apply_independently() {
    let database = load(indoc! {"
        CREATE TABLE t (a integer, b integer);
        GRANT SELECT, SELECT (a) ON TABLE t TO app;
    "});

    let select = PostgresPrivilege {
        role: "app".to_string(),
        granted: kinds(&[PrivilegeKind::Select]),
        grant_option: BTreeSet::new(),
    };

    let t = public(&database).get_relation("t").unwrap();
    assert_eq!(t.privileges, vec![select.clone()]);
    assert_eq!(t.get_column("a").unwrap().privileges, vec![select]);
    assert!(t.get_column("b").unwrap().privileges.is_empty());
    assert!(database.ignored_statements.is_empty());

    let database = load(indoc! {"
        CREATE TABLE t (a integer, b integer);
        GRANT SELECT, SELECT (a) ON TABLE t TO app;
        REVOKE SELECT ON TABLE t FROM app;
    "});

    let t = public(&database).get_relation("t").unwrap();
    assert!(t.privileges.is_empty());
    assert_eq!(t.get_column("a").unwrap().privileges[0].granted, kinds(&[PrivilegeKind::Select]));
}
