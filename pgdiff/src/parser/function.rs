use crate::error::ObjectKind;
use crate::models::{ArgumentMode, FunctionArgument, PostgresFunction};
use crate::parser::scanner::Scanner;
use crate::parser::{not_found, Loader};
use crate::quoting::unquote_identifier;
use crate::Result;

/// `CREATE [OR REPLACE] FUNCTION name (arguments) RETURNS ...`
pub(super) fn create_function(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("CREATE")?;
    let or_replace = scanner.expect_optional_sequence(&["OR", "REPLACE"]);
    scanner.expect("FUNCTION")?;

    let (schema_name, mut function) = parse_function_signature(loader, &mut scanner)?;
    function.body = scanner.rest().ok_or_else(|| scanner.error("function definition"))?;
    function.position = loader.position();

    loader
        .schema_mut(&schema_name, statement)?
        .add_function(function, or_replace, statement)
}

/// `ALTER FUNCTION name (arguments) OWNER TO role`
pub(super) fn alter_function(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["ALTER", "FUNCTION"])?;

    let (schema_name, function) = parse_function_signature(loader, &mut scanner)?;
    scanner.expect_sequence(&["OWNER", "TO"])?;
    let owner = scanner.parse_identifier()?;

    let signature = function.signature();
    let existing = loader
        .schema_mut(&schema_name, statement)?
        .get_function_mut(&signature)
        .ok_or_else(|| not_found(ObjectKind::Function, &signature, statement))?;
    existing.owner = Some(owner);

    Ok(())
}

/// Parses `name (arguments)` into a function without body, returning the schema it belongs to.
pub(super) fn parse_function_signature(loader: &Loader, scanner: &mut Scanner) -> Result<(String, PostgresFunction)> {
    let qualified_name = scanner.parse_identifier()?;
    let (schema_name, name) = loader.database.resolve_name(&qualified_name);

    let mut function = PostgresFunction {
        name,
        ..Default::default()
    };

    scanner.expect("(")?;
    if !scanner.expect_optional(")") {
        loop {
            function.arguments.push(parse_argument(scanner)?);
            if scanner.expect_optional(")") {
                break;
            }
            scanner.expect(",")?;
        }
    }

    Ok((schema_name, function))
}

/// `[mode] [name] type [{DEFAULT | =} expression]`
fn parse_argument(scanner: &mut Scanner) -> Result<FunctionArgument> {
    let mode = scanner
        .expect_optional_one_of(&["INOUT", "IN", "OUT", "VARIADIC"])
        .and_then(ArgumentMode::parse)
        .unwrap_or_default();

    // Names are optional. A lone type is followed by the end of the argument.
    let start = scanner.save();
    let mut data_type = scanner.parse_data_type()?;
    let mut name = None;

    if !at_argument_end(scanner) {
        scanner.restore(start);
        name = Some(unquote_identifier(&scanner.parse_identifier()?));
        data_type = scanner.parse_data_type()?;
    }

    let default_value = if scanner.expect_optional("DEFAULT") || scanner.expect_optional("=") {
        Some(scanner.parse_expression()?)
    } else {
        None
    };

    Ok(FunctionArgument {
        mode,
        name,
        data_type,
        default_value,
    })
}

fn at_argument_end(scanner: &Scanner) -> bool {
    matches!(scanner.peek_char(), Some(',' | ')' | '=')) || scanner.peek_word("DEFAULT")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LoadOptions;

    fn parse(signature: &str) -> PostgresFunction {
        let options = LoadOptions::default();
        let loader = Loader::new(&options);
        let mut scanner = Scanner::new(signature);
        parse_function_signature(&loader, &mut scanner).unwrap().1
    }

    #[test]
    fn arguments_with_and_without_names() {
        let function = parse("app.f(integer, b character varying(10), OUT c text, d int DEFAULT 1, e text = 'x')");

        assert_eq!(function.name, "f");
        assert_eq!(
            function.arguments,
            vec![
                FunctionArgument {
                    data_type: "integer".to_string(),
                    ..Default::default()
                },
                FunctionArgument {
                    name: Some("b".to_string()),
                    data_type: "character varying(10)".to_string(),
                    ..Default::default()
                },
                FunctionArgument {
                    mode: ArgumentMode::Out,
                    name: Some("c".to_string()),
                    data_type: "text".to_string(),
                    default_value: None,
                },
                FunctionArgument {
                    name: Some("d".to_string()),
                    data_type: "int".to_string(),
                    default_value: Some("1".to_string()),
                    ..Default::default()
                },
                FunctionArgument {
                    name: Some("e".to_string()),
                    data_type: "text".to_string(),
                    default_value: Some("'x'".to_string()),
                    ..Default::default()
                },
            ]
        );
        assert_eq!(function.signature(), "f(integer,character varying(10),int,text)");
    }

    #[test]
    fn unnamed_multi_word_types() {
        let function = parse("f(double precision, timestamp with time zone)");
        assert_eq!(function.signature(), "f(double precision,timestamp with time zone)");
        assert!(function.arguments.iter().all(|a| a.name.is_none()));
    }
}
