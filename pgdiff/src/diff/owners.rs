use crate::diff::{pair_up, Differ, MigrationWriter};

/// The owner an object should get. An owner that is no longer set in the new database is left
/// as it is, there is no sensible role to hand the object back to.
fn new_owner<'n>(old: Option<&Option<String>>, new: &'n Option<String>) -> Option<&'n str> {
    let new = new.as_deref()?;
    let old = old.and_then(|o| o.as_deref());

    (old != Some(new)).then_some(new)
}

pub(super) fn diff_owners(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        if let Some(owner) = new_owner(pair.old.map(|s| &s.owner), &pair.new.owner) {
            writer.write(pair.new.get_owner_statement(owner));
        }

        for (old, new) in pair_up(pair.old_items(|s| s.enums.as_slice()), &pair.new.enums) {
            if let Some(owner) = new_owner(old.map(|e| &e.owner), &new.owner) {
                writer.write_in(pair.name(), new.get_owner_statement(owner));
            }
        }

        for (old, new) in pair_up(pair.old_items(|s| s.domains.as_slice()), &pair.new.domains) {
            if let Some(owner) = new_owner(old.map(|d| &d.owner), &new.owner) {
                writer.write_in(pair.name(), new.get_owner_statement(owner));
            }
        }

        for (old, new) in pair_up(pair.old_items(|s| s.sequences.as_slice()), &pair.new.sequences) {
            if let Some(owner) = new_owner(old.map(|s| &s.owner), &new.owner) {
                writer.write_in(pair.name(), new.get_owner_statement(owner));
            }
        }

        for (old, new) in pair.relations() {
            if let Some(owner) = new_owner(old.map(|r| &r.owner), &new.owner) {
                writer.write_in(pair.name(), new.get_owner_statement(owner));
            }
        }

        for (old, new) in pair_up(pair.old_items(|s| s.functions.as_slice()), &pair.new.functions) {
            if let Some(owner) = new_owner(old.map(|f| &f.owner), &new.owner) {
                writer.write_in(pair.name(), new.get_owner_statement(owner));
            }
        }

        for (old, new) in pair_up(pair.old_items(|s| s.operators.as_slice()), &pair.new.operators) {
            if let Some(owner) = new_owner(old.map(|o| &o.owner), &new.owner) {
                writer.write_in(pair.name(), new.get_owner_statement(owner));
            }
        }
    }
}
