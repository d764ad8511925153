use crate::models::PostgresExtension;
use crate::parser::scanner::Scanner;
use crate::parser::Loader;
use crate::quoting::unquote_identifier;
use crate::Result;

/// `CREATE EXTENSION [IF NOT EXISTS] name [WITH] [SCHEMA s] [VERSION v] [FROM old] [CASCADE]`
///
/// The extension is kept in the schema it is installed into. Extensions installed into a schema
/// the dump does not create, usually `pg_catalog`, are kept in the current default schema.
pub(super) fn create_extension(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["CREATE", "EXTENSION"])?;
    scanner.expect_optional_sequence(&["IF", "NOT", "EXISTS"]);

    let name = unquote_identifier(&scanner.parse_identifier()?);
    let mut schema_name = loader.database.default_schema.clone();
    let mut version = None;

    scanner.expect_optional("WITH");

    while !scanner.is_consumed() {
        if scanner.expect_optional("SCHEMA") {
            schema_name = unquote_identifier(&scanner.parse_identifier()?);
        } else if scanner.expect_optional("VERSION") {
            version = Some(scanner.parse_string()?);
        } else if scanner.expect_optional("FROM") {
            scanner.parse_string()?;
        } else if !scanner.expect_optional("CASCADE") {
            return Err(scanner.error("SCHEMA, VERSION, FROM or CASCADE"));
        }
    }

    let container = if loader.database.get_schema(&schema_name).is_some() {
        schema_name.clone()
    } else {
        loader.database.default_schema.clone()
    };

    let extension = PostgresExtension {
        name,
        schema_name,
        version,
        comment: None,
        position: loader.position(),
    };

    loader.schema_mut(&container, statement)?.add_extension(extension, statement)
}
