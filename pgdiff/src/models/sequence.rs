use serde::{Deserialize, Serialize};
use crate::helpers::{comment_literal, StringExt};
use crate::models::privilege::PostgresPrivilege;
use crate::quoting::Quotable;
use crate::source_position::SourcePosition;

/// A sequence. Numeric properties are kept as written so `9223372036854775807` and friends
/// round-trip without caring about their range.
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresSequence {
    pub name: String,
    pub data_type: Option<String>,
    pub start_with: Option<String>,
    pub increment: Option<String>,
    /// `None` means `NO MINVALUE`.
    pub min_value: Option<String>,
    /// `None` means `NO MAXVALUE`.
    pub max_value: Option<String>,
    pub cache: Option<String>,
    pub cycle: bool,
    /// `table.column` the sequence belongs to, `None` for `OWNED BY NONE`.
    pub owned_by: Option<String>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub privileges: Vec<PostgresPrivilege>,
    pub position: SourcePosition,
}

impl PostgresSequence {
    pub fn get_create_statement(&self, if_not_exists: bool) -> String {
        let mut sql = "CREATE SEQUENCE ".to_string();

        if if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }

        sql.push_str(&self.name.quote());

        if let Some(data_type) = &self.data_type {
            sql.push_clause(&format!("AS {}", data_type));
        }

        if let Some(start_with) = &self.start_with {
            sql.push_clause(&format!("START WITH {}", start_with));
        }

        if let Some(increment) = &self.increment {
            sql.push_clause(&format!("INCREMENT BY {}", increment));
        }

        match &self.max_value {
            Some(max_value) => sql.push_clause(&format!("MAXVALUE {}", max_value)),
            None => sql.push_clause("NO MAXVALUE"),
        }

        match &self.min_value {
            Some(min_value) => sql.push_clause(&format!("MINVALUE {}", min_value)),
            None => sql.push_clause("NO MINVALUE"),
        }

        if let Some(cache) = &self.cache {
            sql.push_clause(&format!("CACHE {}", cache));
        }

        if self.cycle {
            sql.push_clause("CYCLE");
        }

        sql.push(';');

        sql
    }

    /// Returns the clauses that turn `old` into `self`, or `None` if nothing differs.
    pub fn get_alter_statement(&self, old: &PostgresSequence, ignore_start_with: bool) -> Option<String> {
        let mut sql = "ALTER SEQUENCE ".to_string();
        sql.push_str(&self.name.quote());
        let initial_length = sql.len();

        if let Some(data_type) = &self.data_type {
            if old.data_type.as_ref() != Some(data_type) {
                sql.push_clause(&format!("AS {}", data_type));
            }
        }

        if let Some(increment) = &self.increment {
            if old.increment.as_ref() != Some(increment) {
                sql.push_clause(&format!("INCREMENT BY {}", increment));
            }
        }

        match (&old.min_value, &self.min_value) {
            (Some(_), None) => sql.push_clause("NO MINVALUE"),
            (old_value, Some(new_value)) if old_value.as_ref() != Some(new_value) => {
                sql.push_clause(&format!("MINVALUE {}", new_value))
            }
            _ => {}
        }

        match (&old.max_value, &self.max_value) {
            (Some(_), None) => sql.push_clause("NO MAXVALUE"),
            (old_value, Some(new_value)) if old_value.as_ref() != Some(new_value) => {
                sql.push_clause(&format!("MAXVALUE {}", new_value))
            }
            _ => {}
        }

        if !ignore_start_with {
            if let Some(start_with) = &self.start_with {
                if old.start_with.as_ref() != Some(start_with) {
                    sql.push_clause(&format!("START WITH {}", start_with));
                }
            }
        }

        if let Some(cache) = &self.cache {
            if old.cache.as_ref() != Some(cache) {
                sql.push_clause(&format!("CACHE {}", cache));
            }
        }

        if old.cycle != self.cycle {
            sql.push_clause(if self.cycle { "CYCLE" } else { "NO CYCLE" });
        }

        if sql.len() == initial_length {
            None
        } else {
            sql.push(';');
            Some(sql)
        }
    }

    pub fn get_owned_by_statement(&self) -> String {
        format!(
            "ALTER SEQUENCE {} OWNED BY {};",
            self.name.quote(),
            self.owned_by.as_deref().unwrap_or("NONE")
        )
    }

    pub fn get_owned_by_none_statement(&self) -> String {
        format!("ALTER SEQUENCE {} OWNED BY NONE;", self.name.quote())
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP SEQUENCE {}{};",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON SEQUENCE {} IS {};",
            self.name.quote(),
            comment_literal(&self.comment)
        )
    }

    pub fn get_owner_statement(&self, owner: &str) -> String {
        format!("ALTER SEQUENCE {} OWNER TO {};", self.name.quote(), owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn sequence(increment: &str) -> PostgresSequence {
        PostgresSequence {
            name: "s".to_string(),
            start_with: Some("1".to_string()),
            increment: Some(increment.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn create_statement() {
        let mut seq = sequence("1");
        seq.cache = Some("1".to_string());
        seq.min_value = Some("1".to_string());

        assert_eq!(
            seq.get_create_statement(false),
            indoc! {"
                CREATE SEQUENCE s
                	START WITH 1
                	INCREMENT BY 1
                	NO MAXVALUE
                	MINVALUE 1
                	CACHE 1;"}
        );
    }

    #[test]
    fn alter_only_changed_properties() {
        let old = sequence("1");
        let new = sequence("2");

        assert_eq!(
            new.get_alter_statement(&old, false).as_deref(),
            Some("ALTER SEQUENCE s\n\tINCREMENT BY 2;")
        );
        assert_eq!(old.get_alter_statement(&old, false), None);
    }

    #[test]
    fn start_with_can_be_ignored() {
        let old = sequence("1");
        let mut new = sequence("1");
        new.start_with = Some("100".to_string());

        assert_eq!(
            new.get_alter_statement(&old, false).as_deref(),
            Some("ALTER SEQUENCE s\n\tSTART WITH 100;")
        );
        assert_eq!(new.get_alter_statement(&old, true), None);
    }
}
