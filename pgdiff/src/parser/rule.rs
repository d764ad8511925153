use crate::error::ObjectKind;
use crate::models::{PostgresRule, PostgresRuleEvent};
use crate::parser::scanner::Scanner;
use crate::parser::{duplicate, Loader};
use crate::quoting::unquote_identifier;
use crate::Result;

/// `CREATE [OR REPLACE] RULE name AS ON event TO relation [WHERE ...] DO ...`
pub(super) fn create_rule(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("CREATE")?;
    let or_replace = scanner.expect_optional_sequence(&["OR", "REPLACE"]);
    scanner.expect("RULE")?;

    let name = unquote_identifier(&scanner.parse_identifier()?);
    scanner.expect_sequence(&["AS", "ON"])?;

    let event = scanner.parse_string()?;
    let event = PostgresRuleEvent::parse(&event).ok_or_else(|| scanner.error("SELECT, INSERT, UPDATE or DELETE"))?;

    scanner.expect("TO")?;
    let relation_name = scanner.parse_identifier()?;
    let definition = scanner.rest().ok_or_else(|| scanner.error("DO"))?;

    let relation = loader.relation_mut(&relation_name, statement)?;
    let rule = PostgresRule {
        name,
        relation_name: relation.name.clone(),
        event,
        definition,
        comment: None,
    };

    match relation.rules.iter().position(|r| r.name == rule.name) {
        Some(existing) if or_replace => relation.rules[existing] = rule,
        Some(_) => return Err(duplicate(ObjectKind::Rule, &rule.name, statement)),
        None => relation.rules.push(rule),
    }

    Ok(())
}
