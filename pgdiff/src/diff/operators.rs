use crate::diff::{changes, Differ, MigrationWriter};

pub(super) fn drop_operators(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = changes(pair.old_items(|s| s.operators.as_slice()), &pair.new.operators);

        for operator in changes.dropped {
            writer.write_in(pair.name(), operator.get_drop_statement(differ.guard()));
        }
    }
}

/// Operators need their function, so they follow the functions. A changed operator was dropped
/// and is created again here.
pub(super) fn create_operators(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = changes(pair.old_items(|s| s.operators.as_slice()), &pair.new.operators);

        for operator in changes.created {
            writer.write_in(pair.name(), operator.get_create_statement());
        }
    }
}
