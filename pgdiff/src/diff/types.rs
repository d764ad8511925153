use itertools::Itertools;
use crate::diff::{changes, Differ, MigrationWriter, SchemaObject};
use crate::models::{PostgresRelation, RelationKind};
use crate::quoting::Quotable;

/// Drops composite types first as they may use the domains and enums dropped after them.
pub(super) fn drop_types(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let relations = pair.relation_changes();
        for composite in relations.dropped.into_iter().filter(|r| r.kind == RelationKind::Type) {
            writer.write_in(pair.name(), composite.get_drop_statement(differ.guard()));
        }

        let domains = changes(pair.old_items(|s| s.domains.as_slice()), &pair.new.domains);
        for domain in domains.dropped {
            writer.write_in(pair.name(), domain.get_drop_statement(differ.guard()));
        }

        let enums = changes(pair.old_items(|s| s.enums.as_slice()), &pair.new.enums);
        for enumeration in enums.dropped {
            writer.write_in(pair.name(), enumeration.get_drop_statement(differ.guard()));
        }
    }
}

/// Enums, domains and composite types share one namespace and are created in the order they
/// were defined in, followed by the changes to existing types.
pub(super) fn create_types(differ: &Differ, writer: &mut MigrationWriter) {
    for pair in &differ.schemas {
        let enums = changes(pair.old_items(|s| s.enums.as_slice()), &pair.new.enums);
        let domains = changes(pair.old_items(|s| s.domains.as_slice()), &pair.new.domains);
        let relations = pair.relation_changes();

        let created = enums
            .created
            .iter()
            .map(|e| (e.order(), e.get_create_statement()))
            .chain(domains.created.iter().map(|d| (d.order(), d.get_create_statement())))
            .chain(
                relations
                    .created
                    .iter()
                    .filter(|r| r.kind == RelationKind::Type)
                    .map(|r| (r.order(), r.get_create_statement(pair.name(), false))),
            )
            .sorted_by_key(|(order, _)| *order)
            .map(|(_, statement)| statement);
        writer.write_all_in(pair.name(), created);

        for (old, new) in enums.kept {
            writer.write_all_in(pair.name(), new.get_add_value_statements(old).unwrap_or_default());
        }

        for (old, new) in domains.kept {
            writer.write_all_in(pair.name(), new.get_alter_statements(old));
        }

        for (old, new) in relations.kept.into_iter().filter(|(_, new)| new.kind == RelationKind::Type) {
            writer.write_all_in(pair.name(), get_attribute_changes(old, new));
        }
    }
}

/// The attributes of a composite type are diffed like columns, but only by name and type.
fn get_attribute_changes(old: &PostgresRelation, new: &PostgresRelation) -> Vec<String> {
    let prefix = new.get_alter_prefix();
    let attributes = changes(&old.columns, &new.columns);
    let mut statements = Vec::new();

    for attribute in attributes.dropped {
        statements.push(format!("{}\n\tDROP ATTRIBUTE {};", prefix, attribute.name.quote()));
    }

    for attribute in attributes.created {
        statements.push(format!("{}\n\tADD ATTRIBUTE {};", prefix, attribute.get_definition(false)));
    }

    for (old_attribute, new_attribute) in attributes.kept {
        if old_attribute.data_type != new_attribute.data_type {
            if let Some(data_type) = &new_attribute.data_type {
                statements.push(format!(
                    "{}\n\tALTER ATTRIBUTE {} TYPE {};",
                    prefix,
                    new_attribute.name.quote(),
                    data_type
                ));
            }
        }
    }

    statements
}
