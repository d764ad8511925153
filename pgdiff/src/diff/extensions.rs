use crate::diff::{changes, Differ, MigrationWriter};

pub(super) fn drop_extensions(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = changes(pair.old_items(|s| s.extensions.as_slice()), &pair.new.extensions);

        for extension in changes.dropped {
            writer.write(extension.get_drop_statement(differ.guard()));
        }
    }
}

pub(super) fn create_extensions(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = changes(pair.old_items(|s| s.extensions.as_slice()), &pair.new.extensions);

        for extension in changes.created {
            writer.write(extension.get_create_statement(differ.guard()));
        }

        for (old, new) in changes.kept {
            if let Some(update) = new.get_update_statement(old) {
                writer.write(update);
            }
        }
    }
}
