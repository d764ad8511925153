use crate::diff::{changes, pair_up, Differ, MigrationWriter};

/// Foreign keys may depend on a primary key, so other constraints go first.
pub(super) fn drop_constraints(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for primary_keys in [false, true] {
            for (old, new) in pair.kept_relations() {
                let dropped = changes(&old.constraints, &new.constraints)
                    .dropped
                    .into_iter()
                    .filter(|c| c.is_primary_key() == primary_keys);

                for constraint in dropped {
                    writer.write_in(pair.name(), constraint.get_drop_statement(&old.name, differ.guard()));
                }
            }
        }
    }
}

/// Primary keys are added before everything else so foreign keys can reference them.
pub(super) fn create_constraints(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for primary_keys in [true, false] {
            for (old, new) in pair.relations() {
                let old_constraints = old.map(|r| r.constraints.as_slice()).unwrap_or(&[]);

                let created = pair_up(old_constraints, &new.constraints)
                    .into_iter()
                    .filter(|(kept, constraint)| kept.is_none() && constraint.is_primary_key() == primary_keys);

                for (_, constraint) in created {
                    writer.write_in(pair.name(), constraint.get_add_statement(&new.name));
                }
            }
        }
    }
}
