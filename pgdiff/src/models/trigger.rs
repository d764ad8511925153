use serde::{Deserialize, Serialize};
use crate::helpers::{comment_literal, StringExt};
use crate::quoting::{Quotable, QuotableIter};

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresTrigger {
    pub name: String,
    pub relation_name: String,
    pub timing: PostgresTriggerTiming,
    pub events: Vec<PostgresTriggerEvent>,
    pub level: PostgresTriggerLevel,
    pub referencing_old_table: Option<String>,
    pub referencing_new_table: Option<String>,
    pub condition: Option<String>,
    pub execute_keyword: ExecuteKeyword,
    /// The function call, for example `audit('insert')`.
    pub function_call: String,
    pub disabled: bool,
    pub comment: Option<String>,
}

impl PostgresTrigger {
    pub fn get_create_statement(&self) -> String {
        let mut sql = "CREATE TRIGGER ".to_string();

        sql.push_str(&self.name.quote());
        sql.push(' ');
        sql.push_str(match self.timing {
            PostgresTriggerTiming::Before => "BEFORE",
            PostgresTriggerTiming::After => "AFTER",
            PostgresTriggerTiming::InsteadOf => "INSTEAD OF",
        });
        sql.push(' ');
        sql.push_join(" OR ", self.events.iter().map(|e| match e {
            PostgresTriggerEvent::Insert => "INSERT".to_string(),
            PostgresTriggerEvent::Update { columns } if columns.is_empty() => "UPDATE".to_string(),
            PostgresTriggerEvent::Update { columns } => {
                let mut update = "UPDATE OF ".to_string();
                update.push_join(", ", columns.iter().quote());
                update
            }
            PostgresTriggerEvent::Delete => "DELETE".to_string(),
            PostgresTriggerEvent::Truncate => "TRUNCATE".to_string(),
        }));
        sql.push_str(" ON ");
        sql.push_str(&self.relation_name.quote());

        if self.referencing_old_table.is_some() || self.referencing_new_table.is_some() {
            sql.push_str(" REFERENCING");
            if let Some(new_table) = &self.referencing_new_table {
                sql.push_str(" NEW TABLE AS ");
                sql.push_str(&new_table.quote());
            }
            if let Some(old_table) = &self.referencing_old_table {
                sql.push_str(" OLD TABLE AS ");
                sql.push_str(&old_table.quote());
            }
        }

        sql.push_str(" FOR EACH ");
        sql.push_str(match self.level {
            PostgresTriggerLevel::Row => "ROW",
            PostgresTriggerLevel::Statement => "STATEMENT",
        });

        if let Some(cond) = &self.condition {
            sql.push_str(" WHEN (");
            sql.push_str(cond);
            sql.push(')');
        }

        sql.push_str(match self.execute_keyword {
            ExecuteKeyword::Function => " EXECUTE FUNCTION ",
            ExecuteKeyword::Procedure => " EXECUTE PROCEDURE ",
        });
        sql.push_str(&self.function_call);
        sql.push(';');

        sql
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP TRIGGER {}{} ON {};",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote(),
            self.relation_name.quote()
        )
    }

    pub fn get_enable_statement(&self) -> String {
        format!(
            "ALTER TABLE {} {} TRIGGER {};",
            self.relation_name.quote(),
            if self.disabled { "DISABLE" } else { "ENABLE" },
            self.name.quote()
        )
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON TRIGGER {} ON {} IS {};",
            self.name.quote(),
            self.relation_name.quote(),
            comment_literal(&self.comment)
        )
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub enum PostgresTriggerEvent {
    Insert,
    Update { columns: Vec<String> },
    Delete,
    Truncate,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum PostgresTriggerTiming {
    #[default]
    Before,
    After,
    InsteadOf,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum PostgresTriggerLevel {
    Row,
    #[default]
    Statement,
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum ExecuteKeyword {
    #[default]
    Function,
    Procedure,
}
