use serde::{Deserialize, Serialize};
use crate::helpers::{comment_literal, StringExt};
use crate::quoting::Quotable;
use crate::source_position::SourcePosition;
use crate::whitespace_ignorant_string::WhitespaceIgnorantString;

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default, Serialize, Deserialize)]
pub enum ArgumentMode {
    #[default]
    In,
    Out,
    InOut,
    Variadic,
}

impl ArgumentMode {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "IN" => Some(ArgumentMode::In),
            "OUT" => Some(ArgumentMode::Out),
            "INOUT" => Some(ArgumentMode::InOut),
            "VARIADIC" => Some(ArgumentMode::Variadic),
            _ => None,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct FunctionArgument {
    pub mode: ArgumentMode,
    pub name: Option<String>,
    pub data_type: String,
    pub default_value: Option<String>,
}

impl FunctionArgument {
    pub fn get_declaration(&self) -> String {
        let mut sql = String::new();

        match self.mode {
            ArgumentMode::In => {}
            ArgumentMode::Out => sql.push_str("OUT "),
            ArgumentMode::InOut => sql.push_str("INOUT "),
            ArgumentMode::Variadic => sql.push_str("VARIADIC "),
        }

        if let Some(name) = &self.name {
            sql.push_str(&name.quote());
            sql.push(' ');
        }

        sql.push_str(&self.data_type);

        if let Some(default_value) = &self.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(default_value);
        }

        sql
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresFunction {
    pub name: String,
    pub arguments: Vec<FunctionArgument>,
    /// Everything after the argument list, starting at `RETURNS`.
    pub body: String,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub position: SourcePosition,
}

impl PostgresFunction {
    /// The identity of the function: its name and the lower cased types of every argument
    /// that is not `OUT`. Overloads differ in signature.
    pub fn signature(&self) -> String {
        let mut signature = self.name.clone();
        signature.push('(');
        signature.push_join(",", self.identity_argument_types().map(|t| t.to_lowercase()));
        signature.push(')');
        signature
    }

    /// The signature as used in `DROP FUNCTION` and `COMMENT ON FUNCTION`.
    pub fn get_signature_sql(&self) -> String {
        let mut sql = self.name.quote();
        sql.push('(');
        sql.push_join(", ", self.identity_argument_types());
        sql.push(')');
        sql
    }

    fn identity_argument_types(&self) -> impl Iterator<Item = &str> {
        self.arguments
            .iter()
            .filter(|a| a.mode != ArgumentMode::Out)
            .map(|a| a.data_type.as_str())
    }

    /// Compares everything but bookkeeping. With `ignore_whitespace` two bodies that only differ
    /// in their whitespace are considered equal.
    pub fn definition_equals(&self, other: &PostgresFunction, ignore_whitespace: bool) -> bool {
        let bodies_equal = if ignore_whitespace {
            WhitespaceIgnorantString::from(self.body.as_str())
                == WhitespaceIgnorantString::from(other.body.as_str())
        } else {
            self.body == other.body
        };

        bodies_equal && self.name == other.name && self.arguments == other.arguments
    }

    pub fn get_create_statement(&self, or_replace: bool) -> String {
        let mut sql = "CREATE ".to_string();

        if or_replace {
            sql.push_str("OR REPLACE ");
        }

        sql.push_str("FUNCTION ");
        sql.push_str(&self.name.quote());
        sql.push('(');
        sql.push_join(", ", self.arguments.iter().map(|a| a.get_declaration()));
        sql.push_str(") ");
        sql.push_str(&self.body);
        sql.push(';');

        sql
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP FUNCTION {}{};",
            if if_exists { "IF EXISTS " } else { "" },
            self.get_signature_sql()
        )
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON FUNCTION {} IS {};",
            self.get_signature_sql(),
            comment_literal(&self.comment)
        )
    }

    pub fn get_owner_statement(&self, owner: &str) -> String {
        format!("ALTER FUNCTION {} OWNER TO {};", self.get_signature_sql(), owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_function(body: &str) -> PostgresFunction {
        PostgresFunction {
            name: "add".to_string(),
            arguments: vec![
                FunctionArgument {
                    name: Some("a".to_string()),
                    data_type: "integer".to_string(),
                    ..Default::default()
                },
                FunctionArgument {
                    name: Some("b".to_string()),
                    data_type: "integer".to_string(),
                    default_value: Some("1".to_string()),
                    ..Default::default()
                },
                FunctionArgument {
                    mode: ArgumentMode::Out,
                    name: Some("result".to_string()),
                    data_type: "Integer".to_string(),
                    default_value: None,
                },
            ],
            body: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn signature_skips_out_arguments() {
        let function = add_function("AS $$ select a + b $$ LANGUAGE sql");
        assert_eq!(function.signature(), "add(integer,integer)");
        assert_eq!(function.get_drop_statement(false), "DROP FUNCTION add(integer, integer);");
    }

    #[test]
    fn create_statement() {
        let function = add_function("AS $$ select a + b $$ LANGUAGE sql");
        assert_eq!(
            function.get_create_statement(true),
            "CREATE OR REPLACE FUNCTION add(a integer, b integer DEFAULT 1, OUT result Integer) AS $$ select a + b $$ LANGUAGE sql;"
        );
    }

    #[test]
    fn whitespace_in_body_can_be_ignored() {
        let a = add_function("AS $$\n    select a + b\n$$ LANGUAGE sql");
        let b = add_function("AS $$ select a +  b $$ LANGUAGE sql");

        assert!(!a.definition_equals(&b, false));
        assert!(a.definition_equals(&b, true));
    }
}
