use crate::models::{PostgresRelation, RelationKind, ViewDetails};
use crate::parser::scanner::Scanner;
use crate::parser::Loader;
use crate::quoting::unquote_identifier;
use crate::Result;

/// `CREATE [OR REPLACE] [TEMP] [RECURSIVE] [MATERIALIZED] VIEW name [(columns)] [WITH (options)] AS query`
pub(super) fn create_view(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("CREATE")?;
    let or_replace = scanner.expect_optional_sequence(&["OR", "REPLACE"]);

    let mut materialized = false;
    while let Some(modifier) = scanner.expect_optional_one_of(&["TEMPORARY", "TEMP", "RECURSIVE", "MATERIALIZED"]) {
        if modifier == "MATERIALIZED" {
            materialized = true;
        }
    }

    scanner.expect("VIEW")?;
    scanner.expect_optional_sequence(&["IF", "NOT", "EXISTS"]);

    let qualified_name = scanner.parse_identifier()?;
    let mut details = ViewDetails::default();

    loop {
        if scanner.expect_optional("(") {
            loop {
                details
                    .declared_columns
                    .push(unquote_identifier(&scanner.parse_identifier()?));
                if scanner.expect_optional(")") {
                    break;
                }
                scanner.expect(",")?;
            }
        } else if scanner.expect_optional("WITH") {
            details.options = Some(parse_options(&mut scanner)?);
        } else {
            break;
        }
    }

    scanner.expect("AS")?;
    details.query = scanner.rest().ok_or_else(|| scanner.error("view query"))?.into();

    let (schema_name, name) = loader.database.resolve_name(&qualified_name);

    let mut view = PostgresRelation::new(&name, RelationKind::View(ViewDetails::default()));
    for column in &details.declared_columns {
        view.get_or_create_column(column);
    }
    view.kind = if materialized {
        RelationKind::MaterializedView(details)
    } else {
        RelationKind::View(details)
    };
    view.position = loader.position();

    let schema = loader.schema_mut(&schema_name, statement)?;

    if or_replace {
        schema.relations.retain(|r| !(r.name == name && r.kind.is_view()));
    }

    schema.add_relation(view, statement)
}

/// Reads `(name = value, ...)`, returned with the parentheses.
fn parse_options(scanner: &mut Scanner) -> Result<String> {
    scanner.expect("(")?;

    let mut options = Vec::new();
    loop {
        options.push(scanner.parse_expression()?);
        if scanner.expect_optional(")") {
            break;
        }
        scanner.expect(",")?;
    }

    Ok(format!("({})", options.join(", ")))
}
