use serde::{Deserialize, Serialize};
use crate::helpers::{comment_literal, StringExt};
use crate::source_position::SourcePosition;

/// A user defined operator such as `===`. Operators are overloaded by their argument types, a
/// prefix operator has no left argument.
///
/// Names are made of operator characters and are never quoted.
#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresOperator {
    pub name: String,
    pub function: String,
    pub left_type: Option<String>,
    pub right_type: Option<String>,
    /// The remaining options are kept as written, for example `OPERATOR(public.===)`.
    pub commutator: Option<String>,
    pub negator: Option<String>,
    pub restrict: Option<String>,
    pub join: Option<String>,
    pub hashes: bool,
    pub merges: bool,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub position: SourcePosition,
}

impl PostgresOperator {
    /// The identity of the operator: its name and lower cased argument types.
    pub fn signature(&self) -> String {
        format!(
            "{}({},{})",
            self.name,
            self.left_type.as_deref().unwrap_or("NONE").to_lowercase(),
            self.right_type.as_deref().unwrap_or("NONE").to_lowercase()
        )
    }

    /// `name (left, right)` as used by `DROP`, `ALTER` and `COMMENT ON OPERATOR`.
    pub fn get_signature_sql(&self) -> String {
        format!(
            "{} ({}, {})",
            self.name,
            self.left_type.as_deref().unwrap_or("NONE"),
            self.right_type.as_deref().unwrap_or("NONE")
        )
    }

    pub fn get_create_statement(&self) -> String {
        let mut options = vec![format!("FUNCTION = {}", self.function)];

        let optional = [
            ("LEFTARG", &self.left_type),
            ("RIGHTARG", &self.right_type),
            ("COMMUTATOR", &self.commutator),
            ("NEGATOR", &self.negator),
            ("RESTRICT", &self.restrict),
            ("JOIN", &self.join),
        ];
        options.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| format!("{} = {}", key, v))),
        );

        if self.hashes {
            options.push("HASHES".to_string());
        }
        if self.merges {
            options.push("MERGES".to_string());
        }

        let mut sql = format!("CREATE OPERATOR {} (\n\t", self.name);
        sql.push_join(",\n\t", options);
        sql.push_str("\n);");
        sql
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP OPERATOR {}{};",
            if if_exists { "IF EXISTS " } else { "" },
            self.get_signature_sql()
        )
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON OPERATOR {} IS {};",
            self.get_signature_sql(),
            comment_literal(&self.comment)
        )
    }

    pub fn get_owner_statement(&self, owner: &str) -> String {
        format!("ALTER OPERATOR {} OWNER TO {};", self.get_signature_sql(), owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn int_eq() -> PostgresOperator {
        PostgresOperator {
            name: "===".to_string(),
            function: "public.int_eq".to_string(),
            left_type: Some("integer".to_string()),
            right_type: Some("integer".to_string()),
            commutator: Some("OPERATOR(public.===)".to_string()),
            hashes: true,
            ..Default::default()
        }
    }

    #[test]
    fn create_statement() {
        assert_eq!(
            int_eq().get_create_statement(),
            indoc! {"
                CREATE OPERATOR === (
                	FUNCTION = public.int_eq,
                	LEFTARG = integer,
                	RIGHTARG = integer,
                	COMMUTATOR = OPERATOR(public.===),
                	HASHES
                );"}
        );
    }

    #[test]
    fn prefix_operator_signature() {
        let operator = PostgresOperator {
            name: "!!".to_string(),
            function: "factorial".to_string(),
            right_type: Some("BigInt".to_string()),
            ..Default::default()
        };

        assert_eq!(operator.signature(), "!!(none,bigint)");
        assert_eq!(operator.get_drop_statement(true), "DROP OPERATOR IF EXISTS !! (NONE, BigInt);");
        assert_eq!(int_eq().get_owner_statement("admin"), "ALTER OPERATOR === (integer, integer) OWNER TO admin;");
    }
}
