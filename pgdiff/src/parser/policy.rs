use crate::error::ObjectKind;
use crate::models::{PolicyCommand, PostgresPolicy};
use crate::parser::scanner::Scanner;
use crate::parser::{duplicate, parse_role, Loader};
use crate::quoting::unquote_identifier;
use crate::Result;

/// `CREATE POLICY name ON relation [AS PERMISSIVE] [FOR command] [TO roles] [USING (e)] [WITH CHECK (e)]`
pub(super) fn create_policy(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["CREATE", "POLICY"])?;

    let mut policy = PostgresPolicy {
        name: unquote_identifier(&scanner.parse_identifier()?),
        ..Default::default()
    };

    scanner.expect("ON")?;
    let relation_name = scanner.parse_identifier()?;

    if scanner.expect_optional("AS") {
        if scanner.expect_optional("RESTRICTIVE") {
            return Err(scanner.unsupported("only permissive policies are supported"));
        }
        scanner.expect("PERMISSIVE")?;
    }

    if scanner.expect_optional("FOR") {
        let command = scanner.parse_string()?;
        policy.command = PolicyCommand::parse(&command).ok_or_else(|| scanner.error("ALL, SELECT, INSERT, UPDATE or DELETE"))?;
    }

    if scanner.expect_optional("TO") {
        policy.roles.clear();
        loop {
            policy.roles.push(parse_role(&mut scanner)?);
            if !scanner.expect_optional(",") {
                break;
            }
        }
    }

    if scanner.expect_optional("USING") {
        policy.using = Some(parse_predicate(&mut scanner)?);
    }

    if scanner.expect_optional_sequence(&["WITH", "CHECK"]) {
        policy.with_check = Some(parse_predicate(&mut scanner)?);
    }

    if !scanner.is_consumed() {
        return Err(scanner.error("USING, WITH CHECK or ;"));
    }

    let relation = loader.relation_mut(&relation_name, statement)?;
    if relation.get_policy(&policy.name).is_some() {
        return Err(duplicate(ObjectKind::Policy, &policy.name, statement));
    }

    policy.relation_name = relation.name.clone();
    relation.policies.push(policy);

    Ok(())
}

fn parse_predicate(scanner: &mut Scanner) -> Result<String> {
    scanner.expect("(")?;
    let predicate = scanner.parse_expression()?;
    scanner.expect(")")?;
    Ok(predicate)
}
