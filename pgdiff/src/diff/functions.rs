use crate::diff::{changes, Differ, MigrationWriter};

pub(super) fn drop_functions(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = changes(pair.old_items(|s| s.functions.as_slice()), &pair.new.functions);

        for function in changes.dropped {
            writer.write_in(pair.name(), function.get_drop_statement(differ.guard()));
        }
    }
}

/// New functions are created and changed bodies replaced, both with `CREATE OR REPLACE`.
pub(super) fn create_functions(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = changes(pair.old_items(|s| s.functions.as_slice()), &pair.new.functions);

        for function in changes.created {
            writer.write_in(pair.name(), function.get_create_statement(true));
        }

        for (old, new) in changes.kept {
            if !new.definition_equals(old, differ.options.ignore_function_whitespace) {
                writer.write_in(pair.name(), new.get_create_statement(true));
            }
        }
    }
}
