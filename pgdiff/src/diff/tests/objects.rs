use indoc::indoc;
use crate::diff::tests::diff;

#[test]
fn creates_a_schema_with_its_comment_and_owner() {
    let new = indoc! {"
        CREATE SCHEMA app;
        ALTER SCHEMA app OWNER TO admin;
        COMMENT ON SCHEMA app IS 'application';
    "};

    similar_asserts::assert_eq!(
        diff("", new),
        indoc! {"
            CREATE SCHEMA app;

            COMMENT ON SCHEMA app IS 'application';

            ALTER SCHEMA app OWNER TO admin;
        "}
    );
}

#[test]
fn dropping_a_schema_takes_its_contents() {
    let old = indoc! {"
        CREATE SCHEMA app;
        CREATE TABLE app.t (id integer);
    "};

    assert_eq!(diff(old, ""), "DROP SCHEMA app CASCADE;\n");
}

#[test]
fn updates_an_extension() {
    assert_eq!(
        diff(
            "CREATE EXTENSION hstore WITH SCHEMA public VERSION '1.7';",
            "CREATE EXTENSION hstore WITH SCHEMA public VERSION '1.8';"
        ),
        "ALTER EXTENSION hstore UPDATE TO '1.8';\n"
    );
}

#[test]
fn enum_values_are_added_in_place() {
    assert_eq!(
        diff(
            "CREATE TYPE mood AS ENUM ('sad', 'happy');",
            "CREATE TYPE mood AS ENUM ('sad', 'ok', 'happy');"
        ),
        "ALTER TYPE mood ADD VALUE 'ok' AFTER 'sad';\n"
    );
}

#[test]
fn removing_an_enum_value_recreates_the_type() {
    similar_asserts::assert_eq!(
        diff(
            "CREATE TYPE mood AS ENUM ('sad', 'happy');",
            "CREATE TYPE mood AS ENUM ('sad');"
        ),
        indoc! {"
            DROP TYPE mood;

            CREATE TYPE mood AS ENUM (
            	'sad'
            );
        "}
    );
}

#[test]
fn alters_a_domain() {
    assert_eq!(
        diff(
            "CREATE DOMAIN positive AS integer CHECK ((VALUE > 0));",
            "CREATE DOMAIN positive AS integer DEFAULT 1 CHECK ((VALUE > 0));"
        ),
        "ALTER DOMAIN positive SET DEFAULT 1;\n"
    );
}

#[test]
fn domain_with_another_base_type_is_recreated() {
    similar_asserts::assert_eq!(
        diff(
            "CREATE DOMAIN positive AS integer CHECK ((VALUE > 0));",
            "CREATE DOMAIN positive AS bigint CHECK ((VALUE > 0));"
        ),
        indoc! {"
            DROP DOMAIN positive;

            CREATE DOMAIN positive AS bigint
            	CONSTRAINT positive_check CHECK ((VALUE > 0));
        "}
    );
}

#[test]
fn composite_type_attributes_are_altered() {
    similar_asserts::assert_eq!(
        diff(
            "CREATE TYPE pair AS (first integer, second text);",
            "CREATE TYPE pair AS (first integer, second varchar);"
        ),
        indoc! {"
            ALTER TYPE pair
            	ALTER ATTRIBUTE second TYPE varchar;
        "}
    );
}

#[test]
fn changed_function_body_is_replaced() {
    assert_eq!(
        diff(
            "CREATE FUNCTION one() RETURNS integer LANGUAGE sql AS 'SELECT 1';",
            "CREATE FUNCTION one() RETURNS integer LANGUAGE sql AS 'SELECT 2';"
        ),
        "CREATE OR REPLACE FUNCTION one() RETURNS integer LANGUAGE sql AS 'SELECT 2';\n"
    );
}

#[test]
fn renamed_function_arguments_need_a_new_function() {
    similar_asserts::assert_eq!(
        diff(
            "CREATE FUNCTION f(a integer) RETURNS integer LANGUAGE sql AS 'SELECT a';",
            "CREATE FUNCTION f(b integer) RETURNS integer LANGUAGE sql AS 'SELECT b';"
        ),
        indoc! {"
            DROP FUNCTION f(integer);

            CREATE OR REPLACE FUNCTION f(b integer) RETURNS integer LANGUAGE sql AS 'SELECT b';
        "}
    );
}

#[test]
fn operator_is_created_after_its_function() {
    let new = indoc! {"
        CREATE FUNCTION int_eq(integer, integer) RETURNS boolean LANGUAGE sql AS 'SELECT true';
        CREATE OPERATOR === (FUNCTION = int_eq, LEFTARG = integer, RIGHTARG = integer);
        ALTER OPERATOR === (integer, integer) OWNER TO admin;
        COMMENT ON OPERATOR === (integer, integer) IS 'same';
    "};

    similar_asserts::assert_eq!(
        diff("", new),
        indoc! {"
            CREATE OR REPLACE FUNCTION int_eq(integer, integer) RETURNS boolean LANGUAGE sql AS 'SELECT true';

            CREATE OPERATOR === (
            	FUNCTION = int_eq,
            	LEFTARG = integer,
            	RIGHTARG = integer
            );

            COMMENT ON OPERATOR === (integer, integer) IS 'same';

            ALTER OPERATOR === (integer, integer) OWNER TO admin;
        "}
    );
}

#[test]
fn changed_operator_is_recreated() {
    let old = "CREATE OPERATOR === (FUNCTION = f, LEFTARG = integer, RIGHTARG = integer);";
    let new = "CREATE OPERATOR === (FUNCTION = f, LEFTARG = integer, RIGHTARG = integer, HASHES);";

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            DROP OPERATOR === (integer, integer);

            CREATE OPERATOR === (
            	FUNCTION = f,
            	LEFTARG = integer,
            	RIGHTARG = integer,
            	HASHES
            );
        "}
    );

    assert_eq!(diff(old, ""), "DROP OPERATOR === (integer, integer);\n");
    assert_eq!(diff(old, old), "");
}

#[test]
fn sequence_is_owned_by_a_column_after_the_table_exists() {
    let new = indoc! {"
        CREATE TABLE t (id integer NOT NULL);
        CREATE SEQUENCE t_id_seq START WITH 1;
        ALTER SEQUENCE t_id_seq OWNED BY t.id;
    "};

    similar_asserts::assert_eq!(
        diff("", new),
        indoc! {"
            CREATE SEQUENCE t_id_seq
            	START WITH 1
            	NO MAXVALUE
            	NO MINVALUE;

            CREATE TABLE t (
            	id integer NOT NULL
            );

            ALTER SEQUENCE t_id_seq OWNED BY t.id;
        "}
    );
}

const SERIAL_COLUMN: &str = indoc! {"
    CREATE TABLE t (id integer NOT NULL, name text);
    CREATE SEQUENCE t_id_seq START WITH 1;
    ALTER SEQUENCE t_id_seq OWNED BY public.t.id;
    ALTER TABLE ONLY t ALTER COLUMN id SET DEFAULT nextval('t_id_seq'::regclass);
"};

#[test]
fn owned_sequence_goes_away_with_its_table() {
    assert_eq!(diff(SERIAL_COLUMN, ""), "DROP TABLE t;\n");
}

#[test]
fn owned_sequence_goes_away_with_its_column() {
    similar_asserts::assert_eq!(
        diff(SERIAL_COLUMN, "CREATE TABLE t (name text);"),
        indoc! {"
            ALTER TABLE t
            	DROP COLUMN id;
        "}
    );
}

#[test]
fn kept_sequence_is_released_before_its_column_is_dropped() {
    let new = indoc! {"
        CREATE TABLE t (name text);
        CREATE SEQUENCE t_id_seq START WITH 1;
    "};

    similar_asserts::assert_eq!(
        diff(SERIAL_COLUMN, new),
        indoc! {"
            ALTER SEQUENCE t_id_seq OWNED BY NONE;

            ALTER TABLE t
            	DROP COLUMN id;
        "}
    );
}

#[test]
fn comments_and_owners_follow_the_new_dump() {
    let old = "CREATE TABLE t (id integer);";
    let new = indoc! {"
        CREATE TABLE t (id integer);
        ALTER TABLE t OWNER TO admin;
        COMMENT ON TABLE t IS 'things';
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            COMMENT ON TABLE t IS 'things';

            ALTER TABLE t OWNER TO admin;
        "}
    );

    assert_eq!(diff(new, old), "COMMENT ON TABLE t IS NULL;\n");
}

#[test]
fn grants_on_sequences_and_columns() {
    let old = indoc! {"
        CREATE TABLE t (a integer);
        CREATE SEQUENCE s;
    "};
    let new = indoc! {"
        CREATE TABLE t (a integer);
        CREATE SEQUENCE s;
        GRANT UPDATE(a) ON TABLE t TO app;
        GRANT USAGE ON SEQUENCE s TO app;
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            GRANT USAGE ON SEQUENCE s TO app;

            GRANT UPDATE (a) ON TABLE t TO app;
        "}
    );
}

#[test]
fn table_and_column_grants_are_revoked_separately() {
    let both = indoc! {"
        CREATE TABLE t (a integer);
        GRANT SELECT, SELECT (a) ON TABLE t TO app;
    "};
    let table_only = indoc! {"
        CREATE TABLE t (a integer);
        GRANT SELECT ON TABLE t TO app;
    "};
    let column_only = indoc! {"
        CREATE TABLE t (a integer);
        GRANT SELECT (a) ON TABLE t TO app;
    "};

    assert_eq!(diff(both, table_only), "REVOKE SELECT (a) ON TABLE t FROM app;\n");
    assert_eq!(diff(both, column_only), "REVOKE SELECT ON TABLE t FROM app;\n");
    assert_eq!(diff(both, both), "");
}

#[test]
fn schema_grants_are_revoked() {
    let old = indoc! {"
        CREATE SCHEMA app;
        GRANT USAGE ON SCHEMA app TO reader;
    "};

    assert_eq!(diff(old, "CREATE SCHEMA app;"), "REVOKE USAGE ON SCHEMA app FROM reader;\n");
}
