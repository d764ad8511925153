use crate::error::ObjectKind;
use crate::models::PostgresOperator;
use crate::parser::scanner::Scanner;
use crate::parser::{not_found, Loader};
use crate::Result;

/// `CREATE OPERATOR name (FUNCTION = f [, LEFTARG = type] [, RIGHTARG = type] [, COMMUTATOR = op]
/// [, NEGATOR = op] [, RESTRICT = f] [, JOIN = f] [, HASHES] [, MERGES])`
///
/// Operator classes and families are not modelled.
pub(super) fn create_operator(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["CREATE", "OPERATOR"])?;

    if scanner.peek_word("CLASS") || scanner.peek_word("FAMILY") {
        loader.ignore(statement);
        return Ok(());
    }

    let qualified_name = scanner.parse_identifier()?;
    let (schema_name, name) = loader.database.resolve_name(&qualified_name);

    let mut operator = PostgresOperator {
        name,
        position: loader.position(),
        ..Default::default()
    };
    let mut function = None;

    scanner.expect("(")?;
    loop {
        if scanner.expect_optional("HASHES") {
            operator.hashes = true;
        } else if scanner.expect_optional("MERGES") {
            operator.merges = true;
        } else {
            let option = scanner
                .expect_optional_one_of(&[
                    "FUNCTION",
                    "PROCEDURE",
                    "LEFTARG",
                    "RIGHTARG",
                    "COMMUTATOR",
                    "NEGATOR",
                    "RESTRICT",
                    "JOIN",
                ])
                .ok_or_else(|| scanner.error("operator option"))?;
            scanner.expect("=")?;

            match option {
                "FUNCTION" | "PROCEDURE" => function = Some(scanner.parse_identifier()?),
                "LEFTARG" => operator.left_type = Some(scanner.parse_data_type()?),
                "RIGHTARG" => operator.right_type = Some(scanner.parse_data_type()?),
                "COMMUTATOR" => operator.commutator = Some(scanner.parse_expression()?),
                "NEGATOR" => operator.negator = Some(scanner.parse_expression()?),
                "RESTRICT" => operator.restrict = Some(scanner.parse_identifier()?),
                _ => operator.join = Some(scanner.parse_identifier()?),
            }
        }

        if !scanner.expect_optional(",") {
            break;
        }
    }
    scanner.expect(")")?;

    operator.function = function.ok_or_else(|| scanner.error("FUNCTION"))?;

    loader.schema_mut(&schema_name, statement)?.add_operator(operator, statement)
}

/// `ALTER OPERATOR name (left, right) OWNER TO role`
pub(super) fn alter_operator(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["ALTER", "OPERATOR"])?;

    if scanner.peek_word("CLASS") || scanner.peek_word("FAMILY") {
        loader.ignore(statement);
        return Ok(());
    }

    let (schema_name, signature) = parse_operator_signature(loader, &mut scanner)?;
    scanner.expect_sequence(&["OWNER", "TO"])?;
    let owner = scanner.parse_identifier()?;

    let operator = loader
        .schema_mut(&schema_name, statement)?
        .get_operator_mut(&signature)
        .ok_or_else(|| not_found(ObjectKind::Operator, &signature, statement))?;
    operator.owner = Some(owner);

    Ok(())
}

/// Parses `name (left, right)`, where either type may be `NONE`, into the schema name and the
/// [PostgresOperator::signature] it refers to.
pub(super) fn parse_operator_signature(loader: &Loader, scanner: &mut Scanner) -> Result<(String, String)> {
    let qualified_name = scanner.parse_identifier()?;
    let (schema_name, name) = loader.database.resolve_name(&qualified_name);

    scanner.expect("(")?;
    let left_type = parse_argument_type(scanner)?;
    scanner.expect(",")?;
    let right_type = parse_argument_type(scanner)?;
    scanner.expect(")")?;

    let operator = PostgresOperator {
        name,
        left_type,
        right_type,
        ..Default::default()
    };

    Ok((schema_name, operator.signature()))
}

fn parse_argument_type(scanner: &mut Scanner) -> Result<Option<String>> {
    if scanner.expect_optional("NONE") {
        Ok(None)
    } else {
        Ok(Some(scanner.parse_data_type()?))
    }
}
