use serde::{Deserialize, Serialize};
use crate::helpers::comment_literal;
use crate::quoting::Quotable;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresIndex {
    pub name: String,
    pub relation_name: String,
    pub unique: bool,
    /// `ON ONLY`, used for indexes on partitioned tables.
    pub only: bool,
    /// Everything after the indexed relation, such as `USING btree (lower(name))`.
    pub definition: String,
    pub comment: Option<String>,
}

impl PostgresIndex {
    pub fn get_create_statement(&self, if_not_exists: bool) -> String {
        let mut sql = "CREATE ".to_string();

        if self.unique {
            sql.push_str("UNIQUE ");
        }

        sql.push_str("INDEX ");

        if if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }

        sql.push_str(&self.name.quote());
        sql.push_str(" ON ");

        if self.only {
            sql.push_str("ONLY ");
        }

        sql.push_str(&self.relation_name.quote());
        sql.push(' ');
        sql.push_str(&self.definition);
        sql.push(';');

        sql
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP INDEX {}{};",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON INDEX {} IS {};",
            self.name.quote(),
            comment_literal(&self.comment)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_statement() {
        let index = PostgresIndex {
            name: "lower_name_idx".to_string(),
            relation_name: "People".to_string(),
            unique: true,
            definition: "USING btree (lower(name))".to_string(),
            ..Default::default()
        };

        assert_eq!(
            index.get_create_statement(false),
            "CREATE UNIQUE INDEX lower_name_idx ON \"People\" USING btree (lower(name));"
        );
        assert_eq!(index.get_drop_statement(false), "DROP INDEX lower_name_idx;");
    }
}
