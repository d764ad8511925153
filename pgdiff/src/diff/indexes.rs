use crate::diff::{changes, pair_up, Differ, MigrationWriter};
use crate::quoting::Quotable;

pub(super) fn drop_indexes(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.kept_relations() {
            for index in changes(&old.indexes, &new.indexes).dropped {
                writer.write_in(pair.name(), index.get_drop_statement(differ.guard()));
            }
        }
    }
}

/// Creates indexes, then marks the indexes tables are clustered on.
pub(super) fn create_indexes(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.relations() {
            let old_indexes = old.map(|r| r.indexes.as_slice()).unwrap_or(&[]);

            for (_, index) in pair_up(old_indexes, &new.indexes).into_iter().filter(|(kept, _)| kept.is_none()) {
                writer.write_in(pair.name(), index.get_create_statement(differ.guard()));
            }
        }

        for (old, new) in pair.relations() {
            let Some(details) = new.kind.table_details() else {
                continue;
            };

            let old_cluster = old
                .and_then(|r| r.kind.table_details())
                .and_then(|d| d.cluster_index.as_ref());

            if old_cluster == details.cluster_index.as_ref() {
                continue;
            }

            let statement = match &details.cluster_index {
                Some(index) => format!("{}\n\tCLUSTER ON {};", new.get_alter_prefix(), index.quote()),
                None => format!("{}\n\tSET WITHOUT CLUSTER;", new.get_alter_prefix()),
            };
            writer.write_in(pair.name(), statement);
        }
    }
}
