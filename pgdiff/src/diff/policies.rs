use crate::diff::{changes, pair_up, Differ, MigrationWriter};

pub(super) fn drop_policies(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.kept_relations() {
            for policy in changes(&old.policies, &new.policies).dropped {
                writer.write_in(pair.name(), policy.get_drop_statement(differ.guard()));
            }
        }
    }
}

/// The command of a policy cannot be altered, everything else can.
pub(super) fn create_policies(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        for (old, new) in pair.relations() {
            let old_policies = old.map(|r| r.policies.as_slice()).unwrap_or(&[]);

            for (kept, policy) in pair_up(old_policies, &new.policies) {
                match kept {
                    None => writer.write_in(pair.name(), policy.get_create_statement()),
                    Some(kept)
                        if kept.roles != policy.roles
                            || kept.using != policy.using
                            || kept.with_check != policy.with_check =>
                    {
                        writer.write_in(pair.name(), policy.get_alter_statement())
                    }
                    Some(_) => {}
                }
            }
        }
    }
}
