use serde::{Deserialize, Serialize};
use crate::helpers::StringExt;
use crate::models::relation::PostgresRelation;
use crate::quoting::Quotable;

/// The parts of a relation that only tables and foreign tables have.
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct TableDetails {
    /// Parent tables as (schema, table) pairs.
    pub inherits: Vec<(String, String)>,
    /// Columns that come from a parent table. Only kept to track defaults the child overrides.
    pub inherited_columns: Vec<PostgresInheritedColumn>,
    pub unlogged: bool,
    pub tablespace: Option<String>,
    /// The foreign server of a foreign table.
    pub server: Option<String>,
    /// The text after `PARTITION BY RANGE`.
    pub partition_by: Option<String>,
    pub row_security: bool,
    pub force_row_security: bool,
    pub cluster_index: Option<String>,
}

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresInheritedColumn {
    pub name: String,
    /// The parent table the column came from.
    pub parent: (String, String),
    /// The default set on the child only, `ALTER TABLE ONLY child ALTER COLUMN c SET DEFAULT`.
    pub default_value: Option<String>,
}

impl TableDetails {
    pub fn get_inherited_column(&self, name: &str) -> Option<&PostgresInheritedColumn> {
        self.inherited_columns.iter().find(|c| c.name == name)
    }

    pub fn get_inherited_column_mut(&mut self, name: &str) -> Option<&mut PostgresInheritedColumn> {
        self.inherited_columns.iter_mut().find(|c| c.name == name)
    }
}

/// Renders a parent table relative to the schema the child lives in.
pub(crate) fn get_parent_name(parent: &(String, String), schema_name: &str) -> String {
    if parent.0 == schema_name {
        parent.1.quote()
    } else {
        format!("{}.{}", parent.0.quote(), parent.1.quote())
    }
}

pub(crate) fn get_create_table_statement(
    relation: &PostgresRelation,
    details: &TableDetails,
    foreign: bool,
    schema_name: &str,
    if_not_exists: bool,
) -> String {
    let mut sql = "CREATE ".to_string();

    if details.unlogged {
        sql.push_str("UNLOGGED ");
    }

    if foreign {
        sql.push_str("FOREIGN ");
    }

    sql.push_str("TABLE ");

    if if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }

    sql.push_str(&relation.name.quote());
    sql.push_str(" (");
    if !relation.columns.is_empty() {
        sql.push_str("\n\t");
        sql.push_join(",\n\t", relation.columns.iter().map(|c| c.get_definition(false)));
    }
    sql.push_str("\n)");

    if !details.inherits.is_empty() {
        sql.push_str("\nINHERITS (");
        sql.push_join(", ", details.inherits.iter().map(|p| get_parent_name(p, schema_name)));
        sql.push(')');
    }

    if let Some(server) = &details.server {
        sql.push_str("\nSERVER ");
        sql.push_str(server);
    }

    if let Some(tablespace) = &details.tablespace {
        sql.push_str("\nTABLESPACE ");
        sql.push_str(tablespace);
    }

    if let Some(partition_by) = &details.partition_by {
        sql.push_str("\nPARTITION BY RANGE ");
        sql.push_str(partition_by);
    }

    sql.push(';');
    sql
}

impl PostgresInheritedColumn {
    pub fn get_default_statement(&self, relation_name: &str) -> String {
        match &self.default_value {
            Some(default_value) => format!(
                "ALTER TABLE ONLY {}\n\tALTER COLUMN {} SET DEFAULT {};",
                relation_name.quote(),
                self.name.quote(),
                default_value
            ),
            None => format!(
                "ALTER TABLE ONLY {}\n\tALTER COLUMN {} DROP DEFAULT;",
                relation_name.quote(),
                self.name.quote()
            ),
        }
    }
}
