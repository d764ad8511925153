use crate::diff::{changes, Changes, Differ, MigrationWriter, SchemaObject, SchemaPair};
use crate::models::PostgresSequence;
use crate::quoting::split_qualified_name;

/// Whether the column an old sequence is `OWNED BY` disappears in this migration. Postgres
/// drops the sequence together with its column, table or schema.
fn owner_is_dropped(differ: &Differ, schema_name: &str, sequence: &PostgresSequence) -> bool {
    let Some(owned_by) = &sequence.owned_by else {
        return false;
    };

    let mut parts = split_qualified_name(owned_by);
    let (Some(column), Some(table)) = (parts.pop(), parts.pop()) else {
        return false;
    };
    let schema_name = parts.pop().unwrap_or_else(|| schema_name.to_string());

    if !differ.options.is_schema_included(&schema_name) {
        return false;
    }

    let Some(old_table) = differ.old.get_schema(&schema_name).and_then(|s| s.get_relation(&table)) else {
        return false;
    };

    match differ.new.get_schema(&schema_name).and_then(|s| s.get_relation(&table)) {
        Some(new_table) if old_table.alterable_into(new_table) => {
            old_table.get_column(&column).is_some() && new_table.get_column(&column).is_none()
        }
        _ => true,
    }
}

/// Like [`changes`], but a sequence that goes away with its owner is not dropped on its own.
fn sequence_changes<'a>(differ: &Differ, pair: &SchemaPair<'a>) -> Changes<'a, PostgresSequence> {
    let mut sequences = changes(pair.old_items(|s| s.sequences.as_slice()), &pair.new.sequences);
    sequences.dropped.retain(|s| !owner_is_dropped(differ, pair.name(), s));
    sequences
}

/// Sequences the new database keeps while their owning column goes away are released from it
/// first, so dropping the column or table leaves them alone.
pub(super) fn detach_sequences(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, _) in sequence_changes(differ, pair).kept {
            if owner_is_dropped(differ, pair.name(), old) {
                writer.write_in(pair.name(), old.get_owned_by_none_statement());
            }
        }
    }
}

pub(super) fn drop_sequences(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for sequence in sequence_changes(differ, pair).dropped {
            writer.write_in(pair.name(), sequence.get_drop_statement(differ.guard()));
        }
    }
}

pub(super) fn create_sequences(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = sequence_changes(differ, pair);

        for sequence in changes.created {
            writer.write_in(pair.name(), sequence.get_create_statement(differ.guard()));
        }

        for (old, new) in changes.kept {
            if let Some(alter) = new.get_alter_statement(old, differ.options.ignore_start_with) {
                writer.write_in(pair.name(), alter);
            }
        }
    }
}

/// `OWNED BY` needs the owning column, so it waits until the tables exist.
pub(super) fn set_owned_by(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let changes = sequence_changes(differ, pair);

        for sequence in changes.created.into_iter().filter(|s| s.owned_by.is_some()) {
            writer.write_in(pair.name(), sequence.get_owned_by_statement());
        }

        for (old, new) in changes.kept {
            let changed = if owner_is_dropped(differ, pair.name(), old) {
                new.owned_by.is_some()
            } else {
                old.owned_by != new.owned_by
            };

            if changed {
                writer.write_in(pair.name(), new.get_owned_by_statement());
            }
        }
    }
}
