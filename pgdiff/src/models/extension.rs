use serde::{Deserialize, Serialize};
use crate::helpers::comment_literal;
use crate::quoting::Quotable;
use crate::source_position::SourcePosition;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresExtension {
    pub name: String,
    pub schema_name: String,
    /// The version as written in the dump, including its quotes.
    pub version: Option<String>,
    pub comment: Option<String>,
    pub position: SourcePosition,
}

impl PostgresExtension {
    pub fn get_create_statement(&self, if_not_exists: bool) -> String {
        let mut sql = "CREATE EXTENSION ".to_string();

        if if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }

        sql.push_str(&self.name.quote());
        sql.push_str(" WITH SCHEMA ");
        sql.push_str(&self.schema_name.quote());

        if let Some(version) = &self.version {
            sql.push_str(" VERSION ");
            sql.push_str(version);
        }

        sql.push(';');
        sql
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP EXTENSION {}{} CASCADE;",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    /// `None` when the version is unchanged or the new dump does not pin one.
    pub fn get_update_statement(&self, old: &PostgresExtension) -> Option<String> {
        match &self.version {
            Some(version) if old.version.as_ref() != Some(version) => Some(format!(
                "ALTER EXTENSION {} UPDATE TO {};",
                self.name.quote(),
                version
            )),
            _ => None,
        }
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON EXTENSION {} IS {};",
            self.name.quote(),
            comment_literal(&self.comment)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_update() {
        let old = PostgresExtension {
            name: "hstore".to_string(),
            schema_name: "public".to_string(),
            version: Some("'1.7'".to_string()),
            ..Default::default()
        };
        let new = PostgresExtension {
            version: Some("'1.8'".to_string()),
            ..old.clone()
        };

        assert_eq!(
            old.get_create_statement(true),
            "CREATE EXTENSION IF NOT EXISTS hstore WITH SCHEMA public VERSION '1.7';"
        );
        assert_eq!(
            new.get_update_statement(&old).as_deref(),
            Some("ALTER EXTENSION hstore UPDATE TO '1.8';")
        );
        assert_eq!(old.get_update_statement(&old), None);
    }
}
