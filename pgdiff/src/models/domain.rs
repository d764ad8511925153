use serde::{Deserialize, Serialize};
use crate::helpers::comment_literal;
use crate::quoting::Quotable;
use crate::source_position::SourcePosition;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresDomain {
    pub name: String,
    pub data_type: String,
    pub collation: Option<String>,
    pub default_value: Option<String>,
    pub not_null: bool,
    pub constraints: Vec<PostgresDomainConstraint>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub position: SourcePosition,
}

#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct PostgresDomainConstraint {
    pub name: String,
    /// The check expression including its parentheses.
    pub check: String,
}

impl PostgresDomainConstraint {
    fn get_definition(&self) -> String {
        format!("CONSTRAINT {} CHECK {}", self.name.quote(), self.check)
    }
}

impl PostgresDomain {
    pub fn get_create_statement(&self) -> String {
        let mut sql = format!("CREATE DOMAIN {} AS {}", self.name.quote(), self.data_type);

        if let Some(collation) = &self.collation {
            sql.push_str(" COLLATE ");
            sql.push_str(collation);
        }

        if let Some(default_value) = &self.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(default_value);
        }

        if self.not_null {
            sql.push_str(" NOT NULL");
        }

        for constraint in &self.constraints {
            sql.push_str("\n\t");
            sql.push_str(&constraint.get_definition());
        }

        sql.push(';');
        sql
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP DOMAIN {}{};",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    /// The base type and collation cannot be altered, a domain that changes them has to be
    /// dropped and created again.
    pub fn requires_recreation(&self, old: &PostgresDomain) -> bool {
        self.data_type != old.data_type || self.collation != old.collation
    }

    pub fn get_alter_statements(&self, old: &PostgresDomain) -> Vec<String> {
        let name = self.name.quote();
        let mut statements = Vec::new();

        if self.default_value != old.default_value {
            statements.push(match &self.default_value {
                Some(default_value) => format!("ALTER DOMAIN {} SET DEFAULT {};", name, default_value),
                None => format!("ALTER DOMAIN {} DROP DEFAULT;", name),
            });
        }

        if self.not_null != old.not_null {
            statements.push(format!(
                "ALTER DOMAIN {} {} NOT NULL;",
                name,
                if self.not_null { "SET" } else { "DROP" }
            ));
        }

        for old_constraint in &old.constraints {
            if !self.constraints.contains(old_constraint) {
                statements.push(format!(
                    "ALTER DOMAIN {} DROP CONSTRAINT {};",
                    name,
                    old_constraint.name.quote()
                ));
            }
        }

        for new_constraint in &self.constraints {
            if !old.constraints.contains(new_constraint) {
                statements.push(format!(
                    "ALTER DOMAIN {} ADD {};",
                    name,
                    new_constraint.get_definition()
                ));
            }
        }

        statements
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON DOMAIN {} IS {};",
            self.name.quote(),
            comment_literal(&self.comment)
        )
    }

    pub fn get_owner_statement(&self, owner: &str) -> String {
        format!("ALTER DOMAIN {} OWNER TO {};", self.name.quote(), owner)
    }
}
