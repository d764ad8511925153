use crate::diff::schemas::diff_schema_grants;
use crate::diff::{pair_up, Differ, MigrationWriter};
use crate::models::get_privilege_changes;
use crate::quoting::Quotable;

/// Grants and revokes per role. A created object starts without any privileges, so all of
/// its privileges are granted.
pub(super) fn diff_privileges(differ: &Differ, writer: &mut MigrationWriter) {
    diff_schema_grants(differ, writer);

    for pair in &differ.schemas {
        for (old, new) in pair_up(pair.old_items(|s| s.sequences.as_slice()), &pair.new.sequences) {
            let old_privileges = old.map(|s| s.privileges.as_slice()).unwrap_or(&[]);
            let object = format!("SEQUENCE {}", new.name.quote());

            writer.write_all_in(
                pair.name(),
                get_privilege_changes(old_privileges, &new.privileges, &object, None),
            );
        }

        for (old, new) in pair.relations() {
            let old_privileges = old.map(|r| r.privileges.as_slice()).unwrap_or(&[]);
            let object = new.get_privilege_object();

            writer.write_all_in(
                pair.name(),
                get_privilege_changes(old_privileges, &new.privileges, &object, None),
            );

            for column in &new.columns {
                let old_privileges = old
                    .and_then(|r| r.get_column(&column.name))
                    .map(|c| c.privileges.as_slice())
                    .unwrap_or(&[]);
                let column_name = column.name.quote();

                writer.write_all_in(
                    pair.name(),
                    get_privilege_changes(old_privileges, &column.privileges, &object, Some(&column_name)),
                );
            }
        }
    }
}
