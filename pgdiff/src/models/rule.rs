use serde::{Deserialize, Serialize};
use crate::helpers::comment_literal;
use crate::quoting::Quotable;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresRule {
    pub name: String,
    pub relation_name: String,
    pub event: PostgresRuleEvent,
    /// Everything after the target relation: `[WHERE ...] DO [ALSO | INSTEAD] ...`.
    pub definition: String,
    pub comment: Option<String>,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum PostgresRuleEvent {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

impl PostgresRuleEvent {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" => Some(PostgresRuleEvent::Select),
            "INSERT" => Some(PostgresRuleEvent::Insert),
            "UPDATE" => Some(PostgresRuleEvent::Update),
            "DELETE" => Some(PostgresRuleEvent::Delete),
            _ => None,
        }
    }
}

impl PostgresRule {
    pub fn get_create_statement(&self) -> String {
        format!(
            "CREATE RULE {} AS ON {} TO {} {};",
            self.name.quote(),
            match self.event {
                PostgresRuleEvent::Select => "SELECT",
                PostgresRuleEvent::Insert => "INSERT",
                PostgresRuleEvent::Update => "UPDATE",
                PostgresRuleEvent::Delete => "DELETE",
            },
            self.relation_name.quote(),
            self.definition
        )
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP RULE {}{} ON {};",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote(),
            self.relation_name.quote()
        )
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON RULE {} ON {} IS {};",
            self.name.quote(),
            self.relation_name.quote(),
            comment_literal(&self.comment)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_statement() {
        let rule = PostgresRule {
            name: "no_delete".to_string(),
            relation_name: "log".to_string(),
            event: PostgresRuleEvent::Delete,
            definition: "DO INSTEAD NOTHING".to_string(),
            comment: None,
        };

        assert_eq!(rule.get_create_statement(), "CREATE RULE no_delete AS ON DELETE TO log DO INSTEAD NOTHING;");
        assert_eq!(rule.get_drop_statement(true), "DROP RULE IF EXISTS no_delete ON log;");
    }
}
