use serde::{Deserialize, Serialize};
use crate::helpers::comment_literal;
use crate::quoting::Quotable;

/// A named table constraint, kept as its definition text, for example
/// `PRIMARY KEY (id)` or `FOREIGN KEY (a) REFERENCES other(id)`.
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresConstraint {
    pub name: String,
    pub definition: String,
    pub comment: Option<String>,
}

impl PostgresConstraint {
    pub fn is_primary_key(&self) -> bool {
        self.definition
            .trim_start()
            .get(..11)
            .is_some_and(|start| start.eq_ignore_ascii_case("PRIMARY KEY"))
    }

    /// `ALTER TABLE` is used for foreign tables and views as well, Postgres accepts it for both.
    pub fn get_add_statement(&self, relation_name: &str) -> String {
        format!(
            "ALTER TABLE {}\n\tADD CONSTRAINT {} {};",
            relation_name.quote(),
            self.name.quote(),
            self.definition
        )
    }

    pub fn get_drop_statement(&self, relation_name: &str, if_exists: bool) -> String {
        format!(
            "ALTER TABLE {}\n\tDROP CONSTRAINT {}{};",
            relation_name.quote(),
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    pub fn get_comment_statement(&self, relation_name: &str) -> String {
        format!(
            "COMMENT ON CONSTRAINT {} ON {} IS {};",
            self.name.quote(),
            relation_name.quote(),
            comment_literal(&self.comment)
        )
    }
}
