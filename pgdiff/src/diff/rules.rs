use crate::diff::{changes, pair_up, Differ, MigrationWriter};

pub(super) fn drop_rules(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.kept_relations() {
            for rule in changes(&old.rules, &new.rules).dropped {
                writer.write_in(pair.name(), rule.get_drop_statement(differ.guard()));
            }
        }
    }
}

pub(super) fn create_rules(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.relations() {
            let old_rules = old.map(|r| r.rules.as_slice()).unwrap_or(&[]);

            for (_, rule) in pair_up(old_rules, &new.rules).into_iter().filter(|(kept, _)| kept.is_none()) {
                writer.write_in(pair.name(), rule.get_create_statement());
            }
        }
    }
}
