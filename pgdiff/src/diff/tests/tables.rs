use indoc::indoc;
use crate::diff::tests::diff;

#[test]
fn column_changes() {
    let old = "CREATE TABLE t (a integer, b text NOT NULL, c text);";
    let new = "CREATE TABLE t (a bigint DEFAULT 0, b text, d boolean);";

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            ALTER TABLE t
            	DROP COLUMN c;

            ALTER TABLE t
            	ADD COLUMN d boolean;

            ALTER TABLE t
            	ALTER COLUMN a TYPE bigint USING a::bigint;

            ALTER TABLE t
            	ALTER COLUMN a SET DEFAULT 0;

            ALTER TABLE t
            	ALTER COLUMN b DROP NOT NULL;
        "}
    );
}

#[test]
fn foreign_table_column_types_change_without_using() {
    similar_asserts::assert_eq!(
        diff(
            "CREATE FOREIGN TABLE f (a integer) SERVER remote;",
            "CREATE FOREIGN TABLE f (a bigint) SERVER remote;"
        ),
        indoc! {"
            ALTER FOREIGN TABLE f
            	ALTER COLUMN a TYPE bigint;
        "}
    );
}

#[test]
fn table_turned_into_a_view() {
    similar_asserts::assert_eq!(
        diff("CREATE TABLE t (a integer);", "CREATE VIEW t AS SELECT 1 AS a;"),
        indoc! {"
            DROP TABLE t;

            CREATE VIEW t AS
            	SELECT 1 AS a;
        "}
    );
}

#[test]
fn primary_keys_are_dropped_last_and_created_first() {
    let old = indoc! {"
        CREATE TABLE t (id integer, p integer);
        ALTER TABLE ONLY t ADD CONSTRAINT t_pkey PRIMARY KEY (id);
        ALTER TABLE ONLY t ADD CONSTRAINT t_p_check CHECK ((p > 0));
    "};
    let new = indoc! {"
        CREATE TABLE t (id integer, p integer);
        ALTER TABLE ONLY t ADD CONSTRAINT t_p_check CHECK ((p > 0));
        ALTER TABLE ONLY t ADD CONSTRAINT t_p_key UNIQUE (p);
        ALTER TABLE ONLY t ADD CONSTRAINT t_pkey PRIMARY KEY (id, p);
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            ALTER TABLE t
            	DROP CONSTRAINT t_pkey;

            ALTER TABLE t
            	ADD CONSTRAINT t_pkey PRIMARY KEY (id, p);

            ALTER TABLE t
            	ADD CONSTRAINT t_p_key UNIQUE (p);
        "}
    );
}

#[test]
fn changed_index_is_recreated_and_clustered() {
    let old = indoc! {"
        CREATE TABLE t (a integer);
        CREATE INDEX t_a_idx ON t USING btree (a);
    "};
    let new = indoc! {"
        CREATE TABLE t (a integer);
        CREATE UNIQUE INDEX t_a_idx ON t USING btree (a);
        ALTER TABLE t CLUSTER ON t_a_idx;
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            DROP INDEX t_a_idx;

            CREATE UNIQUE INDEX t_a_idx ON t USING btree (a);

            ALTER TABLE t
            	CLUSTER ON t_a_idx;
        "}
    );
}

#[test]
fn policies_are_altered_unless_the_command_changes() {
    let old = indoc! {"
        CREATE TABLE t (a integer);
        CREATE POLICY p ON t USING ((a > 0));
        CREATE POLICY q ON t FOR SELECT USING (true);
    "};
    let new = indoc! {"
        CREATE TABLE t (a integer);
        CREATE POLICY p ON t USING ((a > 1));
        CREATE POLICY q ON t FOR INSERT WITH CHECK (true);
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            DROP POLICY q ON t;

            ALTER POLICY p ON t
            	TO PUBLIC
            	USING ((a > 1));

            CREATE POLICY q ON t
            	FOR INSERT
            	TO PUBLIC
            	WITH CHECK (true);
        "}
    );
}

#[test]
fn disabling_a_trigger_keeps_it() {
    let old = indoc! {"
        CREATE TABLE t (a integer);
        CREATE TRIGGER trg BEFORE INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();
    "};
    let new = indoc! {"
        CREATE TABLE t (a integer);
        CREATE TRIGGER trg BEFORE INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();
        ALTER TABLE t DISABLE TRIGGER trg;
    "};

    assert_eq!(diff(old, new), "ALTER TABLE t DISABLE TRIGGER trg;\n");
    assert_eq!(diff(new, old), "ALTER TABLE t ENABLE TRIGGER trg;\n");
}

#[test]
fn changed_trigger_is_recreated() {
    let old = indoc! {"
        CREATE TABLE t (a integer);
        CREATE TRIGGER trg BEFORE INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();
    "};
    let new = indoc! {"
        CREATE TABLE t (a integer);
        CREATE TRIGGER trg AFTER INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            DROP TRIGGER trg ON t;

            CREATE TRIGGER trg AFTER INSERT ON t FOR EACH ROW EXECUTE FUNCTION f();
        "}
    );
}

#[test]
fn changed_rule_is_recreated() {
    let old = indoc! {"
        CREATE TABLE t (a integer);
        CREATE RULE r AS ON DELETE TO t DO INSTEAD NOTHING;
    "};
    let new = indoc! {"
        CREATE TABLE t (a integer);
        CREATE RULE r AS ON DELETE TO t DO ALSO NOTHING;
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            DROP RULE r ON t;

            CREATE RULE r AS ON DELETE TO t DO ALSO NOTHING;
        "}
    );
}

#[test]
fn inheritance_and_row_level_security() {
    let old = indoc! {"
        CREATE TABLE parent (a integer);
        CREATE TABLE child (b integer);
    "};
    let new = indoc! {"
        CREATE TABLE parent (a integer);
        CREATE TABLE child (b integer)
        INHERITS (parent);
        ALTER TABLE child ENABLE ROW LEVEL SECURITY;
    "};

    similar_asserts::assert_eq!(
        diff(old, new),
        indoc! {"
            ALTER TABLE child
            	INHERIT parent;

            ALTER TABLE child
            	ENABLE ROW LEVEL SECURITY;
        "}
    );
}
