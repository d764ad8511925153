use crate::diff::{changes, Differ, MigrationWriter};
use crate::models::{get_parent_name, PostgresColumn, PostgresRelation, RelationKind, TableDetails};
use crate::options::DiffOptions;
use crate::quoting::Quotable;

fn is_table(relation: &PostgresRelation) -> bool {
    relation.kind.table_details().is_some()
}

pub(super) fn drop_tables(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for table in pair.relation_changes().dropped.into_iter().filter(|r| is_table(r)) {
            writer.write_in(pair.name(), table.get_drop_statement(differ.guard()));
        }
    }
}

/// Creates new tables and brings existing ones up to date: columns, inheritance, tablespace,
/// persistence and row level security.
pub(super) fn create_tables(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let relations = pair.relation_changes();

        for table in relations.created.into_iter().filter(|r| is_table(r)) {
            writer.write_all_in(pair.name(), get_create_statements(table, pair.name(), differ.guard()));
        }

        for (old, new) in relations.kept.into_iter().filter(|(_, new)| is_table(new)) {
            writer.write_all_in(pair.name(), get_alter_statements(old, new, pair.name(), differ.options));
        }
    }
}

/// The table itself and whatever the create statement cannot express.
fn get_create_statements(table: &PostgresRelation, schema_name: &str, if_not_exists: bool) -> Vec<String> {
    let mut statements = vec![table.get_create_statement(schema_name, if_not_exists)];

    let prefix = table.get_alter_prefix();
    for column in &table.columns {
        statements.extend(get_column_attribute_changes(&prefix, &as_created(column), column));
    }

    if let Some(details) = table.kind.table_details() {
        statements.extend(
            details
                .inherited_columns
                .iter()
                .filter(|c| c.default_value.is_some())
                .map(|c| c.get_default_statement(&table.name)),
        );

        let created = TableDetails {
            tablespace: details.tablespace.clone(),
            unlogged: details.unlogged,
            ..Default::default()
        };
        statements.extend(get_table_attribute_changes(&prefix, &created, details));
    }

    statements
}

/// The column as the create statement leaves it.
fn as_created(column: &PostgresColumn) -> PostgresColumn {
    PostgresColumn {
        storage: None,
        statistics: None,
        identity: None,
        ..column.clone()
    }
}

fn get_alter_statements(
    old: &PostgresRelation,
    new: &PostgresRelation,
    schema_name: &str,
    options: &DiffOptions,
) -> Vec<String> {
    let prefix = new.get_alter_prefix();
    let foreign = matches!(new.kind, RelationKind::ForeignTable(_));
    let columns = changes(&old.columns, &new.columns);
    let mut statements = Vec::new();

    for column in columns.dropped {
        statements.push(format!("{}\n\tDROP COLUMN {};", prefix, column.name.quote()));
    }

    for column in columns.created {
        statements.extend(get_add_column_statements(&prefix, column, options.add_defaults));
    }

    for (old_column, new_column) in columns.kept {
        if old_column.data_type != new_column.data_type {
            if let Some(data_type) = &new_column.data_type {
                let name = new_column.name.quote();
                statements.push(if foreign {
                    format!("{}\n\tALTER COLUMN {} TYPE {};", prefix, name, data_type)
                } else {
                    format!(
                        "{}\n\tALTER COLUMN {} TYPE {} USING {}::{};",
                        prefix, name, data_type, name, data_type
                    )
                });
            }
        }

        statements.extend(get_default_change(&prefix, old_column, new_column));

        if old_column.nullable != new_column.nullable {
            statements.push(format!(
                "{}\n\tALTER COLUMN {} {} NOT NULL;",
                prefix,
                new_column.name.quote(),
                if new_column.nullable { "DROP" } else { "SET" }
            ));
        }

        statements.extend(get_column_attribute_changes(&prefix, old_column, new_column));
    }

    if let (Some(old_details), Some(new_details)) = (old.kind.table_details(), new.kind.table_details()) {
        statements.extend(get_inheritance_changes(&prefix, old_details, new_details, schema_name));

        for inherited in &new_details.inherited_columns {
            let old_default = old_details
                .get_inherited_column(&inherited.name)
                .and_then(|c| c.default_value.as_ref());

            if old_default != inherited.default_value.as_ref() {
                statements.push(inherited.get_default_statement(&new.name));
            }
        }

        statements.extend(get_table_attribute_changes(&prefix, old_details, new_details));
    }

    statements
}

/// Adds a column. With `add_defaults` a `NOT NULL` column without a default is filled with the
/// neutral value of its type, and the default is dropped again right after.
fn get_add_column_statements(prefix: &str, column: &PostgresColumn, add_defaults: bool) -> Vec<String> {
    let mut statements = vec![format!(
        "{}\n\tADD COLUMN {};",
        prefix,
        column.get_definition(add_defaults)
    )];

    let filled = add_defaults
        && !column.nullable
        && column.default_value.is_none()
        && column.get_type_default_value().is_some();
    if filled {
        statements.push(format!(
            "{}\n\tALTER COLUMN {} DROP DEFAULT;",
            prefix,
            column.name.quote()
        ));
    }

    statements.extend(get_column_attribute_changes(prefix, &as_created(column), column));
    statements
}

pub(super) fn get_default_change(prefix: &str, old: &PostgresColumn, new: &PostgresColumn) -> Option<String> {
    if old.default_value == new.default_value {
        return None;
    }

    Some(match &new.default_value {
        Some(default_value) => format!(
            "{}\n\tALTER COLUMN {} SET DEFAULT {};",
            prefix,
            new.name.quote(),
            default_value
        ),
        None => format!("{}\n\tALTER COLUMN {} DROP DEFAULT;", prefix, new.name.quote()),
    })
}

/// Statistics, storage and identity. A storage that is no longer set is left alone, the
/// default depends on the type.
fn get_column_attribute_changes(prefix: &str, old: &PostgresColumn, new: &PostgresColumn) -> Vec<String> {
    let name = new.name.quote();
    let mut statements = Vec::new();

    if old.statistics != new.statistics {
        statements.push(format!(
            "{}\n\tALTER COLUMN {} SET STATISTICS {};",
            prefix,
            name,
            new.statistics.unwrap_or(-1)
        ));
    }

    if let Some(storage) = new.storage {
        if old.storage != new.storage {
            statements.push(format!(
                "{}\n\tALTER COLUMN {} SET STORAGE {};",
                prefix,
                name,
                storage.keyword()
            ));
        }
    }

    if old.identity != new.identity {
        if old.identity.is_some() {
            statements.push(format!("{}\n\tALTER COLUMN {} DROP IDENTITY;", prefix, name));
        }

        if let Some(identity) = &new.identity {
            statements.push(format!(
                "{}\n\tALTER COLUMN {} {};",
                prefix,
                name,
                identity.get_add_clause()
            ));
        }
    }

    statements
}

fn get_inheritance_changes(
    prefix: &str,
    old: &TableDetails,
    new: &TableDetails,
    schema_name: &str,
) -> Vec<String> {
    let removed = old
        .inherits
        .iter()
        .filter(|p| !new.inherits.contains(*p))
        .map(|p| format!("{}\n\tNO INHERIT {};", prefix, get_parent_name(p, schema_name)));

    let added = new
        .inherits
        .iter()
        .filter(|p| !old.inherits.contains(*p))
        .map(|p| format!("{}\n\tINHERIT {};", prefix, get_parent_name(p, schema_name)));

    removed.chain(added).collect()
}

fn get_table_attribute_changes(prefix: &str, old: &TableDetails, new: &TableDetails) -> Vec<String> {
    let mut statements = Vec::new();

    if old.tablespace != new.tablespace {
        statements.push(format!(
            "{}\n\tSET TABLESPACE {};",
            prefix,
            new.tablespace.as_deref().unwrap_or("pg_default")
        ));
    }

    if old.unlogged != new.unlogged {
        statements.push(format!(
            "{}\n\tSET {};",
            prefix,
            if new.unlogged { "UNLOGGED" } else { "LOGGED" }
        ));
    }

    if old.row_security != new.row_security {
        statements.push(format!(
            "{}\n\t{} ROW LEVEL SECURITY;",
            prefix,
            if new.row_security { "ENABLE" } else { "DISABLE" }
        ));
    }

    if old.force_row_security != new.force_row_security {
        statements.push(format!(
            "{}\n\t{} ROW LEVEL SECURITY;",
            prefix,
            if new.force_row_security { "FORCE" } else { "NO FORCE" }
        ));
    }

    statements
}
