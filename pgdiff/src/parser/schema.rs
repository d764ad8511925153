use crate::models::PostgresSchema;
use crate::parser::scanner::Scanner;
use crate::parser::{not_found, Loader};
use crate::error::ObjectKind;
use crate::quoting::{unquote_identifier, unquote_value_string};
use crate::Result;

/// `CREATE SCHEMA [IF NOT EXISTS] name [AUTHORIZATION role] [elements]` or
/// `CREATE SCHEMA AUTHORIZATION role`, which names the schema after the role.
pub(super) fn create_schema(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["CREATE", "SCHEMA"])?;
    scanner.expect_optional_sequence(&["IF", "NOT", "EXISTS"]);

    let mut schema = if scanner.expect_optional("AUTHORIZATION") {
        let role = scanner.parse_identifier()?;
        let mut schema = PostgresSchema::new(&unquote_identifier(&role));
        schema.authorization = Some(role);
        schema
    } else {
        let mut schema = PostgresSchema::new(&unquote_identifier(&scanner.parse_identifier()?));
        if scanner.expect_optional("AUTHORIZATION") {
            schema.authorization = Some(scanner.parse_identifier()?);
        }
        schema
    };

    schema.definition = scanner.rest();
    schema.position = loader.position();

    loader.database.add_schema(schema, statement)
}

pub(super) fn alter_schema(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["ALTER", "SCHEMA"])?;
    let name = unquote_identifier(&scanner.parse_identifier()?);
    scanner.expect_sequence(&["OWNER", "TO"])?;
    let owner = scanner.parse_identifier()?;

    if !scanner.is_consumed() {
        return Err(scanner.error(";"));
    }

    let schema = loader
        .database
        .get_schema_mut(&name)
        .ok_or_else(|| not_found(ObjectKind::Schema, &name, statement))?;
    schema.owner = Some(owner);

    Ok(())
}

/// `SET search_path = first, ...`. Only the first entry matters, unqualified names resolve to it.
pub(super) fn set_search_path(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["SET", "search_path"])?;

    if !scanner.expect_optional("=") {
        scanner.expect("TO")?;
    }

    let first = if scanner.peek_char() == Some('\'') {
        unquote_value_string(&scanner.parse_string()?)
    } else {
        unquote_identifier(&scanner.parse_identifier()?)
    };

    if first.is_empty() {
        loader.ignore(statement);
    } else {
        loader.database.default_schema = first;
    }

    Ok(())
}
