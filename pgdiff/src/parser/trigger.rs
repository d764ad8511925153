use crate::error::ObjectKind;
use crate::models::{ExecuteKeyword, PostgresTrigger, PostgresTriggerEvent, PostgresTriggerLevel, PostgresTriggerTiming};
use crate::options::SLONY_TRIGGERS;
use crate::parser::alter_relation::alter_relation;
use crate::parser::scanner::Scanner;
use crate::parser::{duplicate, Loader};
use crate::quoting::unquote_identifier;
use crate::Result;

/// `CREATE [OR REPLACE] TRIGGER name timing events ON relation ... EXECUTE FUNCTION call`
pub(super) fn create_trigger(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("CREATE")?;
    let or_replace = scanner.expect_optional_sequence(&["OR", "REPLACE"]);
    scanner.expect("TRIGGER")?;

    let name = unquote_identifier(&scanner.parse_identifier()?);

    if loader.options.ignore_slony_triggers && SLONY_TRIGGERS.contains(&name.as_str()) {
        return Ok(());
    }

    let timing = if scanner.expect_optional("BEFORE") {
        PostgresTriggerTiming::Before
    } else if scanner.expect_optional("AFTER") {
        PostgresTriggerTiming::After
    } else if scanner.expect_optional_sequence(&["INSTEAD", "OF"]) {
        PostgresTriggerTiming::InsteadOf
    } else {
        return Err(scanner.error("BEFORE, AFTER or INSTEAD OF"));
    };

    let mut events = Vec::new();
    loop {
        events.push(parse_event(&mut scanner)?);
        if !scanner.expect_optional("OR") {
            break;
        }
    }

    scanner.expect("ON")?;
    let relation_name = scanner.parse_identifier()?;

    let mut trigger = PostgresTrigger {
        name,
        timing,
        events,
        ..Default::default()
    };

    while scanner.expect_optional("REFERENCING") {
        loop {
            if scanner.expect_optional_sequence(&["NEW", "TABLE"]) {
                scanner.expect_optional("AS");
                trigger.referencing_new_table = Some(unquote_identifier(&scanner.parse_identifier()?));
            } else if scanner.expect_optional_sequence(&["OLD", "TABLE"]) {
                scanner.expect_optional("AS");
                trigger.referencing_old_table = Some(unquote_identifier(&scanner.parse_identifier()?));
            } else {
                break;
            }
        }
    }

    if scanner.expect_optional("FOR") {
        scanner.expect_optional("EACH");
        trigger.level = if scanner.expect_optional("ROW") {
            PostgresTriggerLevel::Row
        } else {
            scanner.expect("STATEMENT")?;
            PostgresTriggerLevel::Statement
        };
    }

    if scanner.expect_optional("WHEN") {
        scanner.expect("(")?;
        trigger.condition = Some(scanner.parse_expression()?);
        scanner.expect(")")?;
    }

    scanner.expect("EXECUTE")?;
    trigger.execute_keyword = if scanner.expect_optional("PROCEDURE") {
        ExecuteKeyword::Procedure
    } else {
        scanner.expect("FUNCTION")?;
        ExecuteKeyword::Function
    };
    trigger.function_call = scanner.rest().ok_or_else(|| scanner.error("function call"))?;

    let relation = loader.relation_mut(&relation_name, statement)?;
    trigger.relation_name = relation.name.clone();

    match relation.triggers.iter().position(|t| t.name == trigger.name) {
        Some(existing) if or_replace => relation.triggers[existing] = trigger,
        Some(_) => return Err(duplicate(ObjectKind::Trigger, &trigger.name, statement)),
        None => relation.triggers.push(trigger),
    }

    Ok(())
}

fn parse_event(scanner: &mut Scanner) -> Result<PostgresTriggerEvent> {
    if scanner.expect_optional("INSERT") {
        Ok(PostgresTriggerEvent::Insert)
    } else if scanner.expect_optional("UPDATE") {
        let mut columns = Vec::new();
        if scanner.expect_optional("OF") {
            loop {
                columns.push(unquote_identifier(&scanner.parse_identifier()?));
                if !scanner.expect_optional(",") {
                    break;
                }
            }
        }
        Ok(PostgresTriggerEvent::Update { columns })
    } else if scanner.expect_optional("DELETE") {
        Ok(PostgresTriggerEvent::Delete)
    } else if scanner.expect_optional("TRUNCATE") {
        Ok(PostgresTriggerEvent::Truncate)
    } else {
        Err(scanner.error("INSERT, UPDATE, DELETE or TRUNCATE"))
    }
}

/// `ALTER TABLE relation DISABLE TRIGGER name;`. The Slony triggers are never loaded when they
/// are ignored, so disabling them is skipped as well.
pub(super) fn disable_trigger(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["ALTER", "TABLE"])?;
    scanner.expect_optional("ONLY");
    scanner.parse_identifier()?;
    scanner.expect_sequence(&["DISABLE", "TRIGGER"])?;
    let name = unquote_identifier(&scanner.parse_identifier()?);

    if loader.options.ignore_slony_triggers && SLONY_TRIGGERS.contains(&name.as_str()) {
        return Ok(());
    }

    alter_relation(loader, statement)
}
