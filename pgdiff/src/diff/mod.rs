mod comments;
mod constraints;
mod extensions;
mod functions;
mod indexes;
mod operators;
mod owners;
mod policies;
mod privileges;
mod rules;
mod schemas;
mod sequences;
mod tables;
mod triggers;
mod types;
mod views;
mod writer;

#[cfg(test)]
mod tests;

use std::cmp::Reverse;
use tracing::{debug, instrument};
use crate::models::*;
use crate::options::DiffOptions;
pub(crate) use writer::MigrationWriter;

/// Generates the statements that turn the `old` database into the `new` one.
///
/// Objects are compared category by category. Everything that has to go is dropped first, in the
/// reverse order of creation, then everything new or changed is created or altered. Identical
/// inputs give an empty string.
#[instrument(skip_all)]
pub fn diff_databases(old: &PostgresDatabase, new: &PostgresDatabase, options: &DiffOptions) -> String {
    let differ = Differ::new(old, new, options);
    let mut writer = MigrationWriter::new();

    policies::drop_policies(&differ, &mut writer);
    rules::drop_rules(&differ, &mut writer);
    triggers::drop_triggers(&differ, &mut writer);
    operators::drop_operators(&differ, &mut writer);
    functions::drop_functions(&differ, &mut writer);
    views::drop_views(&differ, &mut writer);
    indexes::drop_indexes(&differ, &mut writer);
    constraints::drop_constraints(&differ, &mut writer);
    sequences::detach_sequences(&differ, &mut writer);
    tables::drop_tables(&differ, &mut writer);
    sequences::drop_sequences(&differ, &mut writer);
    types::drop_types(&differ, &mut writer);
    extensions::drop_extensions(&differ, &mut writer);
    schemas::drop_schemas(&differ, &mut writer);

    schemas::create_schemas(&differ, &mut writer);
    extensions::create_extensions(&differ, &mut writer);
    types::create_types(&differ, &mut writer);
    sequences::create_sequences(&differ, &mut writer);
    tables::create_tables(&differ, &mut writer);
    sequences::set_owned_by(&differ, &mut writer);
    constraints::create_constraints(&differ, &mut writer);
    indexes::create_indexes(&differ, &mut writer);
    views::create_views(&differ, &mut writer);
    functions::create_functions(&differ, &mut writer);
    operators::create_operators(&differ, &mut writer);
    triggers::create_triggers(&differ, &mut writer);
    rules::create_rules(&differ, &mut writer);
    policies::create_policies(&differ, &mut writer);
    privileges::diff_privileges(&differ, &mut writer);
    comments::diff_comments(&differ, &mut writer);
    owners::diff_owners(&differ, &mut writer);

    debug!(
        statements = writer.len(),
        schemas = differ.schemas.len(),
        dropped_schemas = differ.dropped_schemas.len(),
        "Diffed databases"
    );

    writer.finish(options, &old.ignored_statements, &new.ignored_statements)
}

/// The two databases being compared, narrowed down to the schemas the options include.
pub(crate) struct Differ<'a> {
    pub options: &'a DiffOptions,
    pub old: &'a PostgresDatabase,
    pub new: &'a PostgresDatabase,
    /// Every included schema of the new database, in model order.
    pub schemas: Vec<SchemaPair<'a>>,
    /// Included schemas only the old database has.
    pub dropped_schemas: Vec<&'a PostgresSchema>,
}

impl<'a> Differ<'a> {
    fn new(old: &'a PostgresDatabase, new: &'a PostgresDatabase, options: &'a DiffOptions) -> Self {
        let schemas = new
            .schemas
            .iter()
            .filter(|s| options.is_schema_included(&s.name))
            .map(|s| SchemaPair {
                old: old.get_schema(&s.name),
                new: s,
            })
            .collect();

        let dropped_schemas = old
            .schemas
            .iter()
            .filter(|s| options.is_schema_included(&s.name) && new.get_schema(&s.name).is_none())
            .collect();

        Differ {
            options,
            old,
            new,
            schemas,
            dropped_schemas,
        }
    }

    /// Whether `IF EXISTS` and `IF NOT EXISTS` should be added.
    pub fn guard(&self) -> bool {
        self.options.add_if_exists_guards
    }
}

/// A schema of the new database next to the schema of the same name in the old one.
pub(crate) struct SchemaPair<'a> {
    pub old: Option<&'a PostgresSchema>,
    pub new: &'a PostgresSchema,
}

impl<'a> SchemaPair<'a> {
    pub fn name(&self) -> &'a str {
        &self.new.name
    }

    /// The objects of the old schema picked by `items`, empty when the schema is new.
    pub fn old_items<T>(&self, items: impl Fn(&'a PostgresSchema) -> &'a [T]) -> &'a [T] {
        self.old.map(items).unwrap_or(&[])
    }

    /// The old version of `relation`, if it is altered in place rather than created.
    pub fn kept_relation(&self, relation: &PostgresRelation) -> Option<&'a PostgresRelation> {
        self.old?
            .get_relation(&relation.name)
            .filter(|old| old.alterable_into(relation))
    }

    /// Every relation of the new schema with the old relation it is altered from.
    pub fn relations(&self) -> impl Iterator<Item = (Option<&'a PostgresRelation>, &'a PostgresRelation)> + '_ {
        self.new
            .relations
            .iter()
            .map(move |relation| (self.kept_relation(relation), relation))
    }

    /// Relations present on both sides that are altered in place.
    pub fn kept_relations(&self) -> impl Iterator<Item = (&'a PostgresRelation, &'a PostgresRelation)> + '_ {
        self.relations().filter_map(|(old, new)| old.map(|old| (old, new)))
    }

    pub fn relation_changes(&self) -> Changes<'a, PostgresRelation> {
        changes(self.old_items(|s| s.relations.as_slice()), &self.new.relations)
    }
}

/// Something the diff compares by identity before comparing its contents.
pub(crate) trait SchemaObject {
    /// Whether both describe the same object, usually compared by name.
    fn same_object(&self, other: &Self) -> bool;

    /// Whether `self` can be altered into `new`. Objects that cannot are dropped and created again.
    fn alterable_into(&self, _new: &Self) -> bool {
        true
    }

    /// Where the object was defined, used to order creations.
    fn order(&self) -> usize {
        0
    }
}

/// How one list of objects turns into another.
pub(crate) struct Changes<'a, T> {
    /// Objects to drop, the ones defined last first.
    pub dropped: Vec<&'a T>,
    /// Objects to create, by definition order.
    pub created: Vec<&'a T>,
    /// Old and new versions of objects altered in place. They may well be identical.
    pub kept: Vec<(&'a T, &'a T)>,
}

pub(crate) fn changes<'a, T: SchemaObject>(old: &'a [T], new: &'a [T]) -> Changes<'a, T> {
    let mut dropped = Vec::new();
    for old_object in old {
        match new.iter().find(|n| old_object.same_object(n)) {
            Some(new_object) if old_object.alterable_into(new_object) => {}
            _ => dropped.push(old_object),
        }
    }
    dropped.sort_by_key(|o| Reverse(o.order()));

    let mut created = Vec::new();
    let mut kept = Vec::new();
    for new_object in new {
        match old.iter().find(|o| o.same_object(new_object)) {
            Some(old_object) if old_object.alterable_into(new_object) => kept.push((old_object, new_object)),
            _ => created.push(new_object),
        }
    }
    created.sort_by_key(|o| o.order());

    Changes { dropped, created, kept }
}

/// Pairs every new object with the old version it is altered from, `None` when it is created.
/// Keeps the order of `new`.
pub(crate) fn pair_up<'a, T: SchemaObject>(old: &'a [T], new: &'a [T]) -> Vec<(Option<&'a T>, &'a T)> {
    new.iter()
        .map(|new_object| {
            let old_object = old
                .iter()
                .find(|o| o.same_object(new_object))
                .filter(|o| o.alterable_into(new_object));
            (old_object, new_object)
        })
        .collect()
}

/// Whether a relation has to be dropped and created again to become `new`.
fn needs_recreation(old: &PostgresRelation, new: &PostgresRelation) -> bool {
    match (&old.kind, &new.kind) {
        (RelationKind::View(old), RelationKind::View(new))
        | (RelationKind::MaterializedView(old), RelationKind::MaterializedView(new)) => old != new,
        (RelationKind::Table(old), RelationKind::Table(new))
        | (RelationKind::ForeignTable(old), RelationKind::ForeignTable(new)) => {
            old.server != new.server || old.partition_by != new.partition_by
        }
        (RelationKind::Type, RelationKind::Type) => false,
        _ => true,
    }
}

impl SchemaObject for PostgresSchema {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresRelation {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn alterable_into(&self, new: &Self) -> bool {
        !needs_recreation(self, new)
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresColumn {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl SchemaObject for PostgresSequence {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresFunction {
    fn same_object(&self, other: &Self) -> bool {
        self.signature() == other.signature()
    }

    /// Argument names and defaults cannot be changed by `CREATE OR REPLACE`.
    fn alterable_into(&self, new: &Self) -> bool {
        self.arguments == new.arguments
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresOperator {
    fn same_object(&self, other: &Self) -> bool {
        self.signature() == other.signature()
    }

    /// Nothing but the owner and comment is altered in place.
    fn alterable_into(&self, new: &Self) -> bool {
        self.function == new.function
            && self.commutator == new.commutator
            && self.negator == new.negator
            && self.restrict == new.restrict
            && self.join == new.join
            && self.hashes == new.hashes
            && self.merges == new.merges
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresEnum {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn alterable_into(&self, new: &Self) -> bool {
        new.get_add_value_statements(self).is_some()
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresDomain {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn alterable_into(&self, new: &Self) -> bool {
        !new.requires_recreation(self)
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresExtension {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn order(&self) -> usize {
        self.position.index()
    }
}

impl SchemaObject for PostgresConstraint {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn alterable_into(&self, new: &Self) -> bool {
        self.definition == new.definition
    }
}

impl SchemaObject for PostgresIndex {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn alterable_into(&self, new: &Self) -> bool {
        self.relation_name == new.relation_name
            && self.unique == new.unique
            && self.only == new.only
            && self.definition == new.definition
    }
}

impl SchemaObject for PostgresTrigger {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    /// Only the enabled state can be altered.
    fn alterable_into(&self, new: &Self) -> bool {
        self.relation_name == new.relation_name
            && self.timing == new.timing
            && self.events == new.events
            && self.level == new.level
            && self.referencing_old_table == new.referencing_old_table
            && self.referencing_new_table == new.referencing_new_table
            && self.condition == new.condition
            && self.execute_keyword == new.execute_keyword
            && self.function_call == new.function_call
    }
}

impl SchemaObject for PostgresRule {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn alterable_into(&self, new: &Self) -> bool {
        self.relation_name == new.relation_name && self.event == new.event && self.definition == new.definition
    }
}

impl SchemaObject for PostgresPolicy {
    fn same_object(&self, other: &Self) -> bool {
        self.name == other.name
    }

    fn alterable_into(&self, new: &Self) -> bool {
        self.relation_name == new.relation_name && self.command == new.command
    }
}
