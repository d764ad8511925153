use serde::{Deserialize, Serialize};
use crate::helpers::{comment_literal, StringExt};
use crate::quoting::Quotable;

/// A row level security policy.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct PostgresPolicy {
    pub name: String,
    pub relation_name: String,
    pub command: PolicyCommand,
    /// Role names as written, `PUBLIC` when no `TO` clause was given.
    pub roles: Vec<String>,
    pub using: Option<String>,
    pub with_check: Option<String>,
    pub comment: Option<String>,
}

impl Default for PostgresPolicy {
    fn default() -> Self {
        PostgresPolicy {
            name: String::new(),
            relation_name: String::new(),
            command: PolicyCommand::All,
            roles: vec!["PUBLIC".to_string()],
            using: None,
            with_check: None,
            comment: None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum PolicyCommand {
    #[default]
    All,
    Select,
    Insert,
    Update,
    Delete,
}

impl PolicyCommand {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "ALL" => Some(PolicyCommand::All),
            "SELECT" => Some(PolicyCommand::Select),
            "INSERT" => Some(PolicyCommand::Insert),
            "UPDATE" => Some(PolicyCommand::Update),
            "DELETE" => Some(PolicyCommand::Delete),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            PolicyCommand::All => "ALL",
            PolicyCommand::Select => "SELECT",
            PolicyCommand::Insert => "INSERT",
            PolicyCommand::Update => "UPDATE",
            PolicyCommand::Delete => "DELETE",
        }
    }
}

impl PostgresPolicy {
    pub fn get_create_statement(&self) -> String {
        let mut sql = "CREATE POLICY ".to_string();
        sql.push_str(&self.name.quote());
        sql.push_str(" ON ");
        sql.push_str(&self.relation_name.quote());
        sql.push_clause(&format!("FOR {}", self.command.keyword()));
        self.push_roles_and_predicates(&mut sql);
        sql.push(';');
        sql
    }

    /// Alters everything but the command, which can only be changed by recreating the policy.
    pub fn get_alter_statement(&self) -> String {
        let mut sql = "ALTER POLICY ".to_string();
        sql.push_str(&self.name.quote());
        sql.push_str(" ON ");
        sql.push_str(&self.relation_name.quote());
        self.push_roles_and_predicates(&mut sql);
        sql.push(';');
        sql
    }

    fn push_roles_and_predicates(&self, sql: &mut String) {
        let mut to = "TO ".to_string();
        to.push_join(", ", &self.roles);
        sql.push_clause(&to);

        if let Some(using) = &self.using {
            sql.push_clause(&format!("USING ({})", using));
        }

        if let Some(with_check) = &self.with_check {
            sql.push_clause(&format!("WITH CHECK ({})", with_check));
        }
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP POLICY {}{} ON {};",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote(),
            self.relation_name.quote()
        )
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON POLICY {} ON {} IS {};",
            self.name.quote(),
            self.relation_name.quote(),
            comment_literal(&self.comment)
        )
    }
}
