use crate::diff::tables::get_default_change;
use crate::diff::{Differ, MigrationWriter};
use crate::models::{PostgresColumn, PostgresRelation};

fn is_view(relation: &PostgresRelation) -> bool {
    relation.kind.is_view()
}

/// Views are dropped whole when anything about them changed. Later definitions may select from
/// earlier ones, so they go first.
pub(super) fn drop_views(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for view in pair.relation_changes().dropped.into_iter().filter(|r| is_view(r)) {
            writer.write_in(pair.name(), view.get_drop_statement(differ.guard()));
        }
    }
}

/// Creates views and updates the column defaults of the ones kept. View columns have no type of
/// their own, so nothing else about them can change.
pub(super) fn create_views(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let relations = pair.relation_changes();

        for view in relations.created.into_iter().filter(|r| is_view(r)) {
            writer.write_in(pair.name(), view.get_create_statement(pair.name(), false));
            writer.write_all_in(pair.name(), get_column_default_changes(None, view));
        }

        for (old, new) in relations.kept.into_iter().filter(|(_, new)| is_view(new)) {
            writer.write_all_in(pair.name(), get_column_default_changes(Some(old), new));
        }
    }
}

fn get_column_default_changes(old: Option<&PostgresRelation>, new: &PostgresRelation) -> Vec<String> {
    let prefix = new.get_alter_prefix();
    let mut statements = Vec::new();

    // A column that vanished from the view had nothing but its default.
    if let Some(old) = old {
        for old_column in old.columns.iter().filter(|c| c.default_value.is_some()) {
            if new.get_column(&old_column.name).is_none() {
                let cleared = PostgresColumn::new(&old_column.name);
                statements.extend(get_default_change(&prefix, old_column, &cleared));
            }
        }
    }

    for column in &new.columns {
        let unchanged = PostgresColumn::new(&column.name);
        let old_column = old.and_then(|r| r.get_column(&column.name)).unwrap_or(&unchanged);
        statements.extend(get_default_change(&prefix, old_column, column));
    }

    statements
}
