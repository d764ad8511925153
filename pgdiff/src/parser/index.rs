use crate::models::PostgresIndex;
use crate::parser::scanner::Scanner;
use crate::parser::Loader;
use crate::quoting::unquote_identifier;
use crate::Result;

/// `CREATE [UNIQUE] INDEX [CONCURRENTLY] [IF NOT EXISTS] name ON [ONLY] relation ...`
///
/// An index always lives in the schema of its relation.
pub(super) fn create_index(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("CREATE")?;
    let unique = scanner.expect_optional("UNIQUE");
    scanner.expect("INDEX")?;
    scanner.expect_optional("CONCURRENTLY");
    scanner.expect_optional_sequence(&["IF", "NOT", "EXISTS"]);

    let name = unquote_identifier(&scanner.parse_identifier()?);
    scanner.expect("ON")?;
    let only = scanner.expect_optional("ONLY");

    let relation_name = scanner.parse_identifier()?;
    let definition = scanner.rest().ok_or_else(|| scanner.error("index definition"))?;

    let (schema, relation_name) = loader.resolve_schema_mut(&relation_name, statement)?;

    schema.add_index(
        PostgresIndex {
            name,
            relation_name,
            unique,
            only,
            definition,
            comment: None,
        },
        statement,
    )
}
