use indoc::indoc;
use crate::error::{ObjectKind, PgDiffError};
use crate::models::*;
use crate::options::LoadOptions;
use crate::parser::load_database_from_str;
use crate::parser::tests::{load, public};

#[test]
fn operator_with_every_option() {
    let database = load(indoc! {"
        CREATE OPERATOR public.=== (
            FUNCTION = public.int_eq,
            LEFTARG = integer,
            RIGHTARG = integer,
            COMMUTATOR = OPERATOR(public.===),
            NEGATOR = OPERATOR(public.!==),
            RESTRICT = eqsel,
            JOIN = eqjoinsel,
            HASHES,
            MERGES
        );
        ALTER OPERATOR public.=== (integer, integer) OWNER TO admin;
        COMMENT ON OPERATOR public.=== (integer, integer) IS 'strict equality';
    "});

    let schema = public(&database);
    let operator = schema.get_operator("===(integer,integer)").unwrap();

    assert_eq!(
        operator,
        &PostgresOperator {
            name: "===".to_string(),
            function: "public.int_eq".to_string(),
            left_type: Some("integer".to_string()),
            right_type: Some("integer".to_string()),
            commutator: Some("OPERATOR(public.===)".to_string()),
            negator: Some("OPERATOR(public.!==)".to_string()),
            restrict: Some("eqsel".to_string()),
            join: Some("eqjoinsel".to_string()),
            hashes: true,
            merges: true,
            owner: Some("admin".to_string()),
            comment: Some("'strict equality'".to_string()),
            ..Default::default()
        }
    );
    assert!(database.ignored_statements.is_empty());
}

#[test]
fn operators_are_overloaded_by_argument_types() {
    let database = load(indoc! {"
        CREATE OPERATOR !! (PROCEDURE = factorial, RIGHTARG = bigint);
        CREATE OPERATOR !! (FUNCTION = int_not, LEFTARG = integer, RIGHTARG = integer);
        ALTER OPERATOR !! (NONE, bigint) OWNER TO admin;
    "});

    let schema = public(&database);
    assert_eq!(schema.operators.len(), 2);

    let prefix = schema.get_operator("!!(none,bigint)").unwrap();
    assert_eq!(prefix.function, "factorial");
    assert_eq!(prefix.left_type, None);
    assert_eq!(prefix.owner.as_deref(), Some("admin"));

    assert_eq!(schema.get_operator("!!(integer,integer)").unwrap().owner, None);
}

#[test]
fn operator_errors() {
    let result = load_database_from_str(
        "CREATE OPERATOR === (FUNCTION = f, LEFTARG = integer, RIGHTARG = integer); \
         CREATE OPERATOR === (FUNCTION = g, LEFTARG = integer, RIGHTARG = integer);",
        &LoadOptions::default(),
    );
    assert!(matches!(
        result,
        Err(PgDiffError::DuplicateObject { kind: ObjectKind::Operator, .. })
    ));

    let result = load_database_from_str("ALTER OPERATOR === (text, text) OWNER TO admin;", &LoadOptions::default());
    assert!(matches!(
        result,
        Err(PgDiffError::ObjectNotFound { kind: ObjectKind::Operator, .. })
    ));

    let result = load_database_from_str("CREATE OPERATOR === (LEFTARG = integer);", &LoadOptions::default());
    assert!(matches!(result, Err(PgDiffError::Syntax { .. })));
}

#[test]
fn operator_classes_and_families_are_ignored() {
    let database = load(indoc! {"
        CREATE OPERATOR FAMILY int_ops USING btree;
        ALTER OPERATOR FAMILY int_ops USING btree OWNER TO admin;
    "});

    assert!(public(&database).operators.is_empty());
    assert_eq!(database.ignored_statements.len(), 2);
}
