use serde::{Deserialize, Serialize};
use crate::helpers::StringExt;
use crate::models::relation::PostgresRelation;
use crate::quoting::{Quotable, QuotableIter};
use crate::whitespace_ignorant_string::WhitespaceIgnorantString;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ViewDetails {
    /// The query after `AS`. A dump tool may re-indent it, so whitespace is not significant.
    pub query: WhitespaceIgnorantString,
    /// The column names listed after the view name, empty when the view does not declare any.
    pub declared_columns: Vec<String>,
    /// The `WITH (...)` options including the parentheses.
    pub options: Option<String>,
}

pub(crate) fn get_create_view_statement(
    relation: &PostgresRelation,
    details: &ViewDetails,
    materialized: bool,
) -> String {
    let mut sql = "CREATE ".to_string();

    if materialized {
        sql.push_str("MATERIALIZED ");
    }

    sql.push_str("VIEW ");
    sql.push_str(&relation.name.quote());

    if !details.declared_columns.is_empty() {
        sql.push_str(" (");
        sql.push_join(", ", details.declared_columns.iter().quote());
        sql.push(')');
    }

    if let Some(options) = &details.options {
        sql.push_str(" WITH ");
        sql.push_str(options);
    }

    sql.push_str(" AS");
    sql.push_clause(details.query.trim());
    sql.push(';');
    sql
}
