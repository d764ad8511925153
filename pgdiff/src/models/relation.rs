use serde::{Deserialize, Serialize};
use crate::helpers::{comment_literal, StringExt};
use crate::models::column::PostgresColumn;
use crate::models::constraint::PostgresConstraint;
use crate::models::index::PostgresIndex;
use crate::models::policy::PostgresPolicy;
use crate::models::privilege::PostgresPrivilege;
use crate::models::rule::PostgresRule;
use crate::models::table::{get_create_table_statement, TableDetails};
use crate::models::trigger::PostgresTrigger;
use crate::models::view::{get_create_view_statement, ViewDetails};
use crate::quoting::Quotable;
use crate::source_position::SourcePosition;

/// What a relation is. Everything that is not shared by all kinds lives in the variant.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub enum RelationKind {
    Table(TableDetails),
    ForeignTable(TableDetails),
    View(ViewDetails),
    MaterializedView(ViewDetails),
    /// A composite type, `CREATE TYPE x AS (...)`. Its attributes are the columns.
    Type,
}

impl RelationKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            RelationKind::Table(_) => "TABLE",
            RelationKind::ForeignTable(_) => "FOREIGN TABLE",
            RelationKind::View(_) => "VIEW",
            RelationKind::MaterializedView(_) => "MATERIALIZED VIEW",
            RelationKind::Type => "TYPE",
        }
    }

    /// Whether both are the same variant, regardless of their details.
    pub fn same_kind(&self, other: &RelationKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    pub fn is_view(&self) -> bool {
        matches!(self, RelationKind::View(_) | RelationKind::MaterializedView(_))
    }

    pub fn table_details(&self) -> Option<&TableDetails> {
        match self {
            RelationKind::Table(details) | RelationKind::ForeignTable(details) => Some(details),
            _ => None,
        }
    }

    pub fn table_details_mut(&mut self) -> Option<&mut TableDetails> {
        match self {
            RelationKind::Table(details) | RelationKind::ForeignTable(details) => Some(details),
            _ => None,
        }
    }

    pub fn view_details(&self) -> Option<&ViewDetails> {
        match self {
            RelationKind::View(details) | RelationKind::MaterializedView(details) => Some(details),
            _ => None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct PostgresRelation {
    pub name: String,
    pub kind: RelationKind,
    pub columns: Vec<PostgresColumn>,
    pub constraints: Vec<PostgresConstraint>,
    pub indexes: Vec<PostgresIndex>,
    pub triggers: Vec<PostgresTrigger>,
    pub rules: Vec<PostgresRule>,
    pub policies: Vec<PostgresPolicy>,
    pub privileges: Vec<PostgresPrivilege>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub position: SourcePosition,
}

impl PostgresRelation {
    pub fn new(name: &str, kind: RelationKind) -> Self {
        PostgresRelation {
            name: name.to_string(),
            kind,
            columns: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
            triggers: Vec::new(),
            rules: Vec::new(),
            policies: Vec::new(),
            privileges: Vec::new(),
            owner: None,
            comment: None,
            position: SourcePosition::default(),
        }
    }

    pub fn get_column(&self, name: &str) -> Option<&PostgresColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut PostgresColumn> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Returns the column called `name`, adding an untyped column if there is none yet.
    ///
    /// View columns are only known once something refers to them, so views materialize their
    /// columns through this.
    pub fn get_or_create_column(&mut self, name: &str) -> &mut PostgresColumn {
        let position = match self.columns.iter().position(|c| c.name == name) {
            Some(position) => position,
            None => {
                self.columns.push(PostgresColumn::new(name));
                self.columns.len() - 1
            }
        };

        &mut self.columns[position]
    }

    /// Finds a column a statement refers to. Views create it on first reference, every other
    /// kind of relation has to declare it.
    pub fn resolve_column_mut(&mut self, name: &str) -> Option<&mut PostgresColumn> {
        if self.kind.is_view() {
            Some(self.get_or_create_column(name))
        } else {
            self.get_column_mut(name)
        }
    }

    pub fn get_constraint(&self, name: &str) -> Option<&PostgresConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn get_constraint_mut(&mut self, name: &str) -> Option<&mut PostgresConstraint> {
        self.constraints.iter_mut().find(|c| c.name == name)
    }

    pub fn get_index(&self, name: &str) -> Option<&PostgresIndex> {
        self.indexes.iter().find(|i| i.name == name)
    }

    pub fn get_trigger(&self, name: &str) -> Option<&PostgresTrigger> {
        self.triggers.iter().find(|t| t.name == name)
    }

    pub fn get_trigger_mut(&mut self, name: &str) -> Option<&mut PostgresTrigger> {
        self.triggers.iter_mut().find(|t| t.name == name)
    }

    pub fn get_rule(&self, name: &str) -> Option<&PostgresRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn get_rule_mut(&mut self, name: &str) -> Option<&mut PostgresRule> {
        self.rules.iter_mut().find(|r| r.name == name)
    }

    pub fn get_policy(&self, name: &str) -> Option<&PostgresPolicy> {
        self.policies.iter().find(|p| p.name == name)
    }

    pub fn get_policy_mut(&mut self, name: &str) -> Option<&mut PostgresPolicy> {
        self.policies.iter_mut().find(|p| p.name == name)
    }

    /// The statement that creates the relation with its own columns. Constraints, indexes and
    /// everything else attached to it are created separately.
    pub fn get_create_statement(&self, schema_name: &str, if_not_exists: bool) -> String {
        match &self.kind {
            RelationKind::Table(details) => {
                get_create_table_statement(self, details, false, schema_name, if_not_exists)
            }
            RelationKind::ForeignTable(details) => {
                get_create_table_statement(self, details, true, schema_name, if_not_exists)
            }
            RelationKind::View(details) => get_create_view_statement(self, details, false),
            RelationKind::MaterializedView(details) => get_create_view_statement(self, details, true),
            RelationKind::Type => {
                let mut sql = format!("CREATE TYPE {} AS (", self.name.quote());
                if !self.columns.is_empty() {
                    sql.push_str("\n\t");
                    sql.push_join(",\n\t", self.columns.iter().map(|c| c.get_definition(false)));
                }
                sql.push_str("\n);");
                sql
            }
        }
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP {} {}{};",
            self.kind.keyword(),
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    /// `ALTER <kind> <name>`, the start of every statement that alters the relation itself.
    pub fn get_alter_prefix(&self) -> String {
        format!("ALTER {} {}", self.kind.keyword(), self.name.quote())
    }

    pub fn get_owner_statement(&self, owner: &str) -> String {
        format!("{} OWNER TO {};", self.get_alter_prefix(), owner)
    }

    /// The object clause of a GRANT or REVOKE on this relation.
    pub fn get_privilege_object(&self) -> String {
        format!("TABLE {}", self.name.quote())
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON {} {} IS {};",
            self.kind.keyword(),
            self.name.quote(),
            comment_literal(&self.comment)
        )
    }

    pub fn get_column_comment_statement(&self, column: &PostgresColumn) -> String {
        format!(
            "COMMENT ON COLUMN {}.{} IS {};",
            self.name.quote(),
            column.name.quote(),
            comment_literal(&column.comment)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_columns_are_created_on_first_reference() {
        let mut view = PostgresRelation::new("v", RelationKind::View(ViewDetails::default()));
        assert!(view.get_column("a").is_none());

        if let Some(column) = view.resolve_column_mut("a") {
            column.default_value = Some("1".to_string());
        }
        view.get_or_create_column("a").nullable = false;

        assert_eq!(view.columns.len(), 1);
        assert_eq!(view.columns[0].default_value.as_deref(), Some("1"));
        assert!(!view.columns[0].nullable);
    }

    #[test]
    fn table_columns_must_exist() {
        let mut table = PostgresRelation::new("t", RelationKind::Table(TableDetails::default()));
        assert!(table.resolve_column_mut("missing").is_none());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn composite_type_statements() {
        let mut composite = PostgresRelation::new("pair", RelationKind::Type);
        let mut first = PostgresColumn::new("first");
        first.parse_definition("integer");
        composite.columns.push(first);

        assert_eq!(composite.get_create_statement("public", false), "CREATE TYPE pair AS (\n\tfirst integer\n);");
        assert_eq!(composite.get_drop_statement(true), "DROP TYPE IF EXISTS pair;");
        assert_eq!(composite.get_owner_statement("admin"), "ALTER TYPE pair OWNER TO admin;");
    }

    #[test]
    fn kind_keywords() {
        let foreign = PostgresRelation::new("f", RelationKind::ForeignTable(TableDetails::default()));
        assert_eq!(foreign.get_drop_statement(false), "DROP FOREIGN TABLE f;");
        assert!(foreign.kind.same_kind(&RelationKind::ForeignTable(TableDetails {
            unlogged: true,
            ..Default::default()
        })));
        assert!(!foreign.kind.same_kind(&RelationKind::Type));
    }
}
