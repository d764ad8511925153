use crate::diff::{pair_up, Differ, MigrationWriter, SchemaPair};
use crate::helpers::comment_literal;
use crate::models::PostgresRelation;

/// Whether the comment of an object has to be set. Objects that are created from scratch have
/// none yet, whatever the old database said.
fn comment_changed(old: Option<&Option<String>>, new: &Option<String>) -> bool {
    old.and_then(|c| c.as_ref()) != new.as_ref()
}

pub(super) fn diff_comments(differ: &Differ, writer: &mut MigrationWriter) {
    if differ.old.comment != differ.new.comment {
        writer.write(format!(
            "COMMENT ON DATABASE current_database() IS {};",
            comment_literal(&differ.new.comment)
        ));
    }

    for pair in &differ.schemas {
        if comment_changed(pair.old.map(|s| &s.comment), &pair.new.comment) {
            writer.write(pair.new.get_comment_statement());
        }

        for (old, new) in pair_up(pair.old_items(|s| s.extensions.as_slice()), &pair.new.extensions) {
            if comment_changed(old.map(|e| &e.comment), &new.comment) {
                writer.write(new.get_comment_statement());
            }
        }

        diff_schema_object_comments(pair, writer);

        for (old, new) in pair.relations() {
            diff_relation_comments(pair, old, new, writer);
        }
    }
}

fn diff_schema_object_comments(pair: &SchemaPair, writer: &mut MigrationWriter) {
    for (old, new) in pair_up(pair.old_items(|s| s.enums.as_slice()), &pair.new.enums) {
        if comment_changed(old.map(|e| &e.comment), &new.comment) {
            writer.write_in(pair.name(), new.get_comment_statement());
        }
    }

    for (old, new) in pair_up(pair.old_items(|s| s.domains.as_slice()), &pair.new.domains) {
        if comment_changed(old.map(|d| &d.comment), &new.comment) {
            writer.write_in(pair.name(), new.get_comment_statement());
        }
    }

    for (old, new) in pair_up(pair.old_items(|s| s.sequences.as_slice()), &pair.new.sequences) {
        if comment_changed(old.map(|s| &s.comment), &new.comment) {
            writer.write_in(pair.name(), new.get_comment_statement());
        }
    }

    for (old, new) in pair_up(pair.old_items(|s| s.functions.as_slice()), &pair.new.functions) {
        if comment_changed(old.map(|f| &f.comment), &new.comment) {
            writer.write_in(pair.name(), new.get_comment_statement());
        }
    }

    for (old, new) in pair_up(pair.old_items(|s| s.operators.as_slice()), &pair.new.operators) {
        if comment_changed(old.map(|o| &o.comment), &new.comment) {
            writer.write_in(pair.name(), new.get_comment_statement());
        }
    }
}

fn diff_relation_comments(
    pair: &SchemaPair,
    old: Option<&PostgresRelation>,
    new: &PostgresRelation,
    writer: &mut MigrationWriter,
) {
    if comment_changed(old.map(|r| &r.comment), &new.comment) {
        writer.write_in(pair.name(), new.get_comment_statement());
    }

    for column in &new.columns {
        let old_column = old.and_then(|r| r.get_column(&column.name));
        if comment_changed(old_column.map(|c| &c.comment), &column.comment) {
            writer.write_in(pair.name(), new.get_column_comment_statement(column));
        }
    }

    let old_constraints = old.map(|r| r.constraints.as_slice()).unwrap_or(&[]);
    for (kept, constraint) in pair_up(old_constraints, &new.constraints) {
        if comment_changed(kept.map(|c| &c.comment), &constraint.comment) {
            writer.write_in(pair.name(), constraint.get_comment_statement(&new.name));
        }
    }

    let old_indexes = old.map(|r| r.indexes.as_slice()).unwrap_or(&[]);
    for (kept, index) in pair_up(old_indexes, &new.indexes) {
        if comment_changed(kept.map(|i| &i.comment), &index.comment) {
            writer.write_in(pair.name(), index.get_comment_statement());
        }
    }

    let old_triggers = old.map(|r| r.triggers.as_slice()).unwrap_or(&[]);
    for (kept, trigger) in pair_up(old_triggers, &new.triggers) {
        if comment_changed(kept.map(|t| &t.comment), &trigger.comment) {
            writer.write_in(pair.name(), trigger.get_comment_statement());
        }
    }

    let old_rules = old.map(|r| r.rules.as_slice()).unwrap_or(&[]);
    for (kept, rule) in pair_up(old_rules, &new.rules) {
        if comment_changed(kept.map(|r| &r.comment), &rule.comment) {
            writer.write_in(pair.name(), rule.get_comment_statement());
        }
    }

    let old_policies = old.map(|r| r.policies.as_slice()).unwrap_or(&[]);
    for (kept, policy) in pair_up(old_policies, &new.policies) {
        if comment_changed(kept.map(|p| &p.comment), &policy.comment) {
            writer.write_in(pair.name(), policy.get_comment_statement());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_objects_only_need_a_comment_when_they_have_one() {
        let comment = Some("'x'".to_string());

        assert!(!comment_changed(None, &None));
        assert!(comment_changed(None, &comment));
        assert!(comment_changed(Some(&comment), &None));
        assert!(!comment_changed(Some(&comment), &comment));
    }
}
