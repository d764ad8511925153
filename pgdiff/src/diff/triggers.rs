use crate::diff::{changes, pair_up, Differ, MigrationWriter};

pub(super) fn drop_triggers(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.kept_relations() {
            for trigger in changes(&old.triggers, &new.triggers).dropped {
                writer.write_in(pair.name(), trigger.get_drop_statement(differ.guard()));
            }
        }
    }
}

/// Creates triggers and toggles the ones whose enabled state changed. A trigger is created
/// enabled, so only disabled ones need the extra statement.
pub(super) fn create_triggers(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.relations() {
            let old_triggers = old.map(|r| r.triggers.as_slice()).unwrap_or(&[]);

            for (kept, trigger) in pair_up(old_triggers, &new.triggers) {
                match kept {
                    None => {
                        writer.write_in(pair.name(), trigger.get_create_statement());
                        if trigger.disabled {
                            writer.write_in(pair.name(), trigger.get_enable_statement());
                        }
                    }
                    Some(kept) if kept.disabled != trigger.disabled => {
                        writer.write_in(pair.name(), trigger.get_enable_statement());
                    }
                    Some(_) => {}
                }
            }
        }
    }
}
