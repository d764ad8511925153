use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::models::privilege::PostgresPrivilege;
use crate::quoting::Quotable;

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct PostgresColumn {
    pub name: String,
    /// The declared type. View columns have no type.
    pub data_type: Option<String>,
    pub nullable: bool,
    pub default_value: Option<String>,
    pub storage: Option<ColumnStorage>,
    pub statistics: Option<i32>,
    pub identity: Option<ColumnIdentity>,
    pub privileges: Vec<PostgresPrivilege>,
    pub comment: Option<String>,
}

impl Default for PostgresColumn {
    fn default() -> Self {
        PostgresColumn {
            name: String::new(),
            data_type: None,
            nullable: true,
            default_value: None,
            storage: None,
            statistics: None,
            identity: None,
            privileges: Vec::new(),
            comment: None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum ColumnStorage {
    Plain,
    External,
    Extended,
    Main,
}

impl ColumnStorage {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "PLAIN" => Some(ColumnStorage::Plain),
            "EXTERNAL" => Some(ColumnStorage::External),
            "EXTENDED" => Some(ColumnStorage::Extended),
            "MAIN" => Some(ColumnStorage::Main),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ColumnStorage::Plain => "PLAIN",
            ColumnStorage::External => "EXTERNAL",
            ColumnStorage::Extended => "EXTENDED",
            ColumnStorage::Main => "MAIN",
        }
    }
}

/// `GENERATED { ALWAYS | BY DEFAULT } AS IDENTITY [ ( sequence_options ) ]`
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct ColumnIdentity {
    pub generation: IdentityGeneration,
    pub sequence_options: Option<String>,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum IdentityGeneration {
    Always,
    ByDefault,
}

impl ColumnIdentity {
    /// The clause used after `ALTER COLUMN x`.
    pub fn get_add_clause(&self) -> String {
        let mut sql = "ADD GENERATED ".to_string();
        sql.push_str(match self.generation {
            IdentityGeneration::Always => "ALWAYS",
            IdentityGeneration::ByDefault => "BY DEFAULT",
        });
        sql.push_str(" AS IDENTITY");

        if let Some(options) = &self.sequence_options {
            sql.push_str(" (\n\t");
            sql.push_str(options);
            sql.push_str("\n)");
        }

        sql
    }
}

static NOT_NULL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(.+)\s+NOT\s+NULL$").expect("valid regex"));
static NULL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(.+)\s+NULL$").expect("valid regex"));
static DEFAULT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^(.+?)\s+DEFAULT\s+(.+)$").expect("valid regex"));

impl PostgresColumn {
    pub fn new(name: &str) -> Self {
        PostgresColumn {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Fills type, default and nullability from the text that follows the column name
    /// in a `CREATE TABLE` column list.
    pub fn parse_definition(&mut self, definition: &str) {
        let mut rest = definition.trim().to_string();

        if let Some(captures) = NOT_NULL_PATTERN.captures(&rest) {
            self.nullable = false;
            rest = captures[1].trim().to_string();
        } else if let Some(captures) = NULL_PATTERN.captures(&rest) {
            let before = captures[1].trim();
            // `DEFAULT NULL` is a default, not a nullability marker.
            if !before.to_ascii_uppercase().ends_with(" DEFAULT") {
                self.nullable = true;
                rest = before.to_string();
            }
        }

        if let Some(captures) = DEFAULT_PATTERN.captures(&rest) {
            self.default_value = Some(captures[2].trim().to_string());
            rest = captures[1].trim().to_string();
        }

        self.data_type = Some(rest);
    }

    /// Returns the column as it appears in a column list, for example `id integer DEFAULT 0 NOT NULL`.
    ///
    /// With `add_defaults`, a `NOT NULL` column without a default gets the neutral value of its type.
    pub fn get_definition(&self, add_defaults: bool) -> String {
        let mut sql = self.name.quote();

        if let Some(data_type) = &self.data_type {
            sql.push(' ');
            sql.push_str(data_type);
        }

        if let Some(default_value) = &self.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(default_value);
        } else if add_defaults && !self.nullable {
            if let Some(default_value) = self.get_type_default_value() {
                sql.push_str(" DEFAULT ");
                sql.push_str(default_value);
            }
        }

        if !self.nullable {
            sql.push_str(" NOT NULL");
        }

        sql
    }

    /// The neutral value for the column type, used to fill existing rows when a
    /// `NOT NULL` column is added.
    pub fn get_type_default_value(&self) -> Option<&'static str> {
        let data_type = self.data_type.as_deref()?.to_lowercase();

        match data_type.as_str() {
            "smallint" | "integer" | "bigint" | "real" | "double precision" | "int2" | "int4"
            | "int8" | "double" | "money" => Some("0"),
            "text" => Some("''"),
            "boolean" => Some("false"),
            t if t.starts_with("decimal") || t.starts_with("numeric") || t.starts_with("float") => {
                Some("0")
            }
            t if t.starts_with("character") || t.starts_with("varchar") || t.starts_with("char") => {
                Some("''")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(definition: &str) -> PostgresColumn {
        let mut column = PostgresColumn::new("c");
        column.parse_definition(definition);
        column
    }

    #[test]
    fn patterns_compile() {
        Lazy::force(&NOT_NULL_PATTERN);
        Lazy::force(&NULL_PATTERN);
        Lazy::force(&DEFAULT_PATTERN);
    }

    #[test]
    fn parses_plain_type() {
        let column = parsed("character varying(20)");
        assert_eq!(column.data_type.as_deref(), Some("character varying(20)"));
        assert!(column.nullable);
        assert_eq!(column.default_value, None);
    }

    #[test]
    fn parses_default_and_not_null() {
        let column = parsed("integer DEFAULT nextval('t_id_seq'::regclass) NOT NULL");
        assert_eq!(column.data_type.as_deref(), Some("integer"));
        assert_eq!(column.default_value.as_deref(), Some("nextval('t_id_seq'::regclass)"));
        assert!(!column.nullable);
    }

    #[test]
    fn explicit_null_is_nullable() {
        let column = parsed("text NULL");
        assert_eq!(column.data_type.as_deref(), Some("text"));
        assert!(column.nullable);

        let column = parsed("text DEFAULT NULL");
        assert_eq!(column.data_type.as_deref(), Some("text"));
        assert_eq!(column.default_value.as_deref(), Some("NULL"));
    }

    #[test]
    fn definition_with_type_defaults() {
        let column = parsed("integer NOT NULL");
        assert_eq!(column.get_definition(false), "c integer NOT NULL");
        assert_eq!(column.get_definition(true), "c integer DEFAULT 0 NOT NULL");

        let column = parsed("point NOT NULL");
        assert_eq!(column.get_definition(true), "c point NOT NULL");
    }
}
