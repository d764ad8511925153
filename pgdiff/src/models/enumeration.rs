use itertools::Itertools;
use serde::{Deserialize, Serialize};
use crate::helpers::comment_literal;
use crate::quoting::{quote_value_string, Quotable};
use crate::source_position::SourcePosition;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresEnum {
    pub name: String,
    /// The labels, unquoted, in declaration order.
    pub values: Vec<String>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub position: SourcePosition,
}

impl PostgresEnum {
    pub fn get_create_statement(&self) -> String {
        format!(
            "CREATE TYPE {} AS ENUM (\n\t{}\n);",
            self.name.quote(),
            self.values.iter().map(|v| quote_value_string(v)).join(",\n\t")
        )
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP TYPE {}{};",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    /// The `ADD VALUE` statements that turn `old` into `self`.
    ///
    /// Returns `None` when labels were removed or reordered, which Postgres cannot do in place.
    pub fn get_add_value_statements(&self, old: &PostgresEnum) -> Option<Vec<String>> {
        let kept = self.values.iter().filter(|v| old.values.contains(v)).collect_vec();
        if kept.len() != old.values.len() || !kept.iter().zip(old.values.iter()).all(|(a, b)| *a == b) {
            return None;
        }

        let mut statements = Vec::new();

        for (idx, value) in self.values.iter().enumerate() {
            if old.values.contains(value) {
                continue;
            }

            let placement = if idx > 0 {
                format!(" AFTER {}", quote_value_string(&self.values[idx - 1]))
            } else if let Some(first) = old.values.first() {
                format!(" BEFORE {}", quote_value_string(first))
            } else {
                String::new()
            };

            statements.push(format!(
                "ALTER TYPE {} ADD VALUE {}{};",
                self.name.quote(),
                quote_value_string(value),
                placement
            ));
        }

        Some(statements)
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON TYPE {} IS {};",
            self.name.quote(),
            comment_literal(&self.comment)
        )
    }

    pub fn get_owner_statement(&self, owner: &str) -> String {
        format!("ALTER TYPE {} OWNER TO {};", self.name.quote(), owner)
    }
}
