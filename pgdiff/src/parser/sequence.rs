use crate::error::ObjectKind;
use crate::models::PostgresSequence;
use crate::parser::scanner::Scanner;
use crate::parser::{not_found, Loader};
use crate::Result;

pub(super) fn create_sequence(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("CREATE")?;
    scanner.expect_optional_one_of(&["TEMPORARY", "TEMP", "UNLOGGED"]);
    scanner.expect("SEQUENCE")?;
    scanner.expect_optional_sequence(&["IF", "NOT", "EXISTS"]);

    let qualified_name = scanner.parse_identifier()?;
    let (schema_name, name) = loader.database.resolve_name(&qualified_name);

    let mut sequence = PostgresSequence {
        name,
        position: loader.position(),
        ..Default::default()
    };

    apply_sequence_options(&mut scanner, &mut sequence)?;

    loader.schema_mut(&schema_name, statement)?.add_sequence(sequence, statement)
}

pub(super) fn alter_sequence(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["ALTER", "SEQUENCE"])?;

    let qualified_name = scanner.parse_identifier()?;
    let (schema, name) = loader.resolve_schema_mut(&qualified_name, statement)?;
    let sequence = schema
        .get_sequence_mut(&name)
        .ok_or_else(|| not_found(ObjectKind::Sequence, &qualified_name, statement))?;

    apply_sequence_options(&mut scanner, sequence)
}

/// Reads sequence options up to the end of the statement. `ALTER TABLE` on a sequence ends up
/// here as well, which is how a dump sets the owner of a sequence.
pub(super) fn apply_sequence_options(scanner: &mut Scanner, sequence: &mut PostgresSequence) -> Result {
    while !scanner.is_consumed() {
        if scanner.expect_optional("AS") {
            sequence.data_type = Some(scanner.parse_data_type()?);
        } else if scanner.expect_optional("INCREMENT") {
            scanner.expect_optional("BY");
            sequence.increment = Some(scanner.parse_string()?);
        } else if scanner.expect_optional("MINVALUE") {
            sequence.min_value = Some(scanner.parse_string()?);
        } else if scanner.expect_optional("MAXVALUE") {
            sequence.max_value = Some(scanner.parse_string()?);
        } else if scanner.expect_optional("START") {
            scanner.expect_optional("WITH");
            sequence.start_with = Some(scanner.parse_string()?);
        } else if scanner.expect_optional("CACHE") {
            sequence.cache = Some(scanner.parse_string()?);
        } else if scanner.expect_optional("CYCLE") {
            sequence.cycle = true;
        } else if scanner.expect_optional_sequence(&["OWNED", "BY"]) {
            sequence.owned_by = if scanner.expect_optional("NONE") {
                None
            } else {
                Some(scanner.parse_identifier()?)
            };
        } else if scanner.expect_optional_sequence(&["OWNER", "TO"]) {
            sequence.owner = Some(scanner.parse_identifier()?);
        } else if scanner.expect_optional("NO") {
            if scanner.expect_optional("MINVALUE") {
                sequence.min_value = None;
            } else if scanner.expect_optional("MAXVALUE") {
                sequence.max_value = None;
            } else if scanner.expect_optional("CYCLE") {
                sequence.cycle = false;
            } else {
                return Err(scanner.unsupported("expected MINVALUE, MAXVALUE or CYCLE after NO"));
            }
        } else {
            return Err(scanner.unsupported("unknown sequence option"));
        }
    }

    Ok(())
}
