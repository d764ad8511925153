mod objects;
mod tables;

use indoc::indoc;
use super::*;
use crate::options::LoadOptions;
use crate::parser::load_database_from_str;

fn load(dump: &str) -> PostgresDatabase {
    crate::init_test_tracing();
    load_database_from_str(dump, &LoadOptions::default()).unwrap()
}

pub(super) fn diff_with(old: &str, new: &str, options: &DiffOptions) -> String {
    diff_databases(&load(old), &load(new), options)
}

pub(super) fn diff(old: &str, new: &str) -> String {
    diff_with(old, new, &DiffOptions::default())
}

const ACCOUNTS_DUMP: &str = indoc! {"
    --
    -- PostgreSQL database dump
    --
    SET statement_timeout = 0;
    SELECT pg_catalog.set_config('search_path', '', false);

    CREATE SCHEMA app;
    ALTER SCHEMA app OWNER TO admin;
    COMMENT ON SCHEMA app IS 'application';

    CREATE EXTENSION IF NOT EXISTS hstore WITH SCHEMA public;
    COMMENT ON EXTENSION hstore IS 'key value pairs';

    CREATE TYPE public.mood AS ENUM (
        'sad',
        'happy'
    );

    CREATE DOMAIN public.positive AS integer
        CONSTRAINT positive_check CHECK ((VALUE > 0));

    CREATE FUNCTION public.audit() RETURNS trigger
        LANGUAGE plpgsql
        AS $$
    BEGIN
        RETURN NEW;
    END;
    $$;
    ALTER FUNCTION public.audit() OWNER TO admin;

    CREATE OPERATOR public.=== (
        FUNCTION = int4eq,
        LEFTARG = integer,
        RIGHTARG = integer,
        COMMUTATOR = OPERATOR(public.===)
    );
    ALTER OPERATOR public.=== (integer, integer) OWNER TO admin;
    COMMENT ON OPERATOR public.=== (integer, integer) IS 'equal';

    CREATE TABLE public.accounts (
        id integer NOT NULL,
        holder text DEFAULT CURRENT_USER,
        balance numeric
    );
    ALTER TABLE public.accounts OWNER TO admin;
    COMMENT ON COLUMN public.accounts.balance IS 'in cents';

    CREATE SEQUENCE public.accounts_id_seq
        AS integer
        START WITH 1
        INCREMENT BY 1
        NO MINVALUE
        NO MAXVALUE
        CACHE 1;
    ALTER TABLE public.accounts_id_seq OWNER TO admin;
    ALTER SEQUENCE public.accounts_id_seq OWNED BY public.accounts.id;

    CREATE VIEW public.rich_accounts AS
     SELECT accounts.id
       FROM public.accounts
      WHERE (accounts.balance > (1000)::numeric);

    CREATE TABLE app.events (
        id bigint NOT NULL,
        payload text
    );

    ALTER TABLE ONLY public.accounts ALTER COLUMN id SET DEFAULT nextval('public.accounts_id_seq'::regclass);

    ALTER TABLE ONLY public.accounts
        ADD CONSTRAINT accounts_pkey PRIMARY KEY (id);

    CREATE INDEX accounts_holder_idx ON public.accounts USING btree (holder);

    CREATE TRIGGER audit_balance AFTER UPDATE OF balance ON public.accounts FOR EACH ROW EXECUTE FUNCTION public.audit();

    CREATE RULE no_delete AS ON DELETE TO public.accounts DO INSTEAD NOTHING;

    ALTER TABLE public.accounts ENABLE ROW LEVEL SECURITY;

    CREATE POLICY own_rows ON public.accounts USING ((holder = CURRENT_USER));

    CREATE OPERATOR CLASS int_ops FOR TYPE integer USING btree AS OPERATOR 1 <;

    GRANT USAGE ON SCHEMA app TO reader;
    REVOKE ALL ON TABLE public.accounts FROM PUBLIC;
    GRANT SELECT ON TABLE public.accounts TO reader;
"};

#[test]
fn identical_dumps_need_no_migration() {
    similar_asserts::assert_eq!(diff(ACCOUNTS_DUMP, ACCOUNTS_DUMP), "");
}

#[test]
fn migration_from_nothing_recreates_the_dump() {
    let migration = diff("", ACCOUNTS_DUMP);
    assert!(migration.starts_with("CREATE SCHEMA app;\n\n"));

    similar_asserts::assert_eq!(diff(&migration, ACCOUNTS_DUMP), "");
}

#[test]
fn output_is_deterministic() {
    let old = "CREATE TABLE public.accounts (id integer NOT NULL);";

    let first = diff(old, ACCOUNTS_DUMP);
    assert!(!first.is_empty());
    assert_eq!(first, diff(old, ACCOUNTS_DUMP));
}

#[test]
fn adds_a_column() {
    similar_asserts::assert_eq!(
        diff(
            "CREATE TABLE t (id integer);",
            "CREATE TABLE t (id integer, name text);"
        ),
        indoc! {"
            ALTER TABLE t
            	ADD COLUMN name text;
        "}
    );
}

#[test]
fn alters_a_sequence() {
    similar_asserts::assert_eq!(
        diff("CREATE SEQUENCE s INCREMENT BY 1;", "CREATE SEQUENCE s INCREMENT BY 2;"),
        indoc! {"
            ALTER SEQUENCE s
            	INCREMENT BY 2;
        "}
    );
}

#[test]
fn changed_view_is_recreated() {
    similar_asserts::assert_eq!(
        diff("CREATE VIEW v AS SELECT 1;", "CREATE VIEW v AS SELECT 2;"),
        indoc! {"
            DROP VIEW v;

            CREATE VIEW v AS
            	SELECT 2;
        "}
    );
}

#[test]
fn creates_a_trigger() {
    let old = "CREATE TABLE t (id integer);";
    let new = indoc! {"
        CREATE TABLE t (id integer);
        CREATE TRIGGER trg BEFORE INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();
    "};

    assert_eq!(
        diff(old, new),
        "CREATE TRIGGER trg BEFORE INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();\n"
    );
}

#[test]
fn revokes_privileges() {
    let old = indoc! {"
        CREATE TABLE t (id integer);
        GRANT SELECT, INSERT ON TABLE t TO role_b;
    "};

    assert_eq!(
        diff(old, "CREATE TABLE t (id integer);"),
        "REVOKE SELECT, INSERT ON TABLE t FROM role_b;\n"
    );
}

#[test]
fn drops_in_reverse_and_creates_in_dependency_order() {
    let old = indoc! {"
        CREATE SEQUENCE s;
        CREATE TABLE t (id integer);
        CREATE VIEW v AS SELECT 1;
    "};
    let new = indoc! {"
        CREATE SEQUENCE s2;
        CREATE TABLE t2 (id integer);
        CREATE VIEW v2 AS SELECT 1;
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            DROP VIEW v;

            DROP TABLE t;

            DROP SEQUENCE s;

            CREATE SEQUENCE s2
            	NO MAXVALUE
            	NO MINVALUE;

            CREATE TABLE t2 (
            	id integer
            );

            CREATE VIEW v2 AS
            	SELECT 1;
        "}
    );
}

#[test]
fn switches_the_search_path_between_schemas() {
    let old = "CREATE SCHEMA app;";
    let new = indoc! {"
        CREATE SCHEMA app;
        CREATE TABLE app.t (id integer);
        CREATE TABLE public.u (id integer);
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            CREATE TABLE u (
            	id integer
            );

            SET search_path = app, pg_catalog;

            CREATE TABLE t (
            	id integer
            );
        "}
    );
}
