use itertools::Itertools;
use crate::diff::{Differ, MigrationWriter, SchemaObject};

pub(super) fn drop_schemas(differ: &Differ, writer: &mut MigrationWriter) {
    for schema in &differ.dropped_schemas {
        writer.write(schema.get_drop_statement(differ.guard()));
    }
}

pub(super) fn create_schemas(differ: &Differ, writer: &mut MigrationWriter) {
    if differ.options.ignore_schema_creation {
        return;
    }

    let created = differ
        .schemas
        .iter()
        .filter(|pair| pair.old.is_none())
        .sorted_by_key(|pair| pair.new.order());

    for pair in created {
        writer.write(pair.new.get_create_statement(differ.guard()));
    }
}

/// Schema grants are kept as written. New ones are emitted again, vanished ones are revoked.
pub(super) fn diff_schema_grants(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let old_grants = pair.old_items(|s| s.grants.as_slice());

        for grant in old_grants.iter().filter(|g| !pair.new.grants.contains(*g)) {
            if let Some(revoke) = get_revoke_statement(grant) {
                writer.write(revoke);
            }
        }

        for grant in pair.new.grants.iter().filter(|g| !old_grants.contains(*g)) {
            writer.write(grant.clone());
        }
    }
}

/// Turns `GRANT x ON SCHEMA s TO r [WITH GRANT OPTION];` into the matching `REVOKE`.
fn get_revoke_statement(grant: &str) -> Option<String> {
    let body = grant.strip_prefix("GRANT ")?.trim_end_matches(';');
    let body = body.strip_suffix(" WITH GRANT OPTION").unwrap_or(body);
    let (privileges, roles) = body.rsplit_once(" TO ")?;

    Some(format!("REVOKE {} FROM {};", privileges, roles))
}
