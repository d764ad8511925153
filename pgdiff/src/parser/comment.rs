use crate::error::ObjectKind;
use crate::models::{PostgresRelation, RelationKind};
use crate::parser::function::parse_function_signature;
use crate::parser::operator::parse_operator_signature;
use crate::parser::scanner::Scanner;
use crate::parser::{not_found, Loader};
use crate::quoting::{split_qualified_name, unquote_identifier};
use crate::Result;

/// `COMMENT ON kind object IS 'text'`. The comment is kept as the literal found in the dump,
/// `IS NULL` removes it. Comments on kinds of objects that are not modelled are ignored.
pub(super) fn comment_on(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["COMMENT", "ON"])?;

    match find_comment(loader, &mut scanner, statement)? {
        Some(slot) => {
            scanner.expect("IS")?;
            let comment = scanner.rest().ok_or_else(|| scanner.error("comment"))?;
            *slot = if comment.eq_ignore_ascii_case("NULL") {
                None
            } else {
                Some(comment)
            };
        }
        None => loader.ignore(statement),
    }

    Ok(())
}

/// Finds the comment of the object the statement is about, `None` for unsupported kinds.
fn find_comment<'l>(
    loader: &'l mut Loader,
    scanner: &mut Scanner,
    statement: &str,
) -> Result<Option<&'l mut Option<String>>> {
    if scanner.expect_optional("DATABASE") {
        // `current_database()` is accepted in place of the name
        scanner.parse_identifier()?;
        scanner.expect_optional_sequence(&["(", ")"]);
        return Ok(Some(&mut loader.database.comment));
    }

    if scanner.expect_optional("SCHEMA") {
        let name = unquote_identifier(&scanner.parse_identifier()?);
        let schema = loader
            .database
            .get_schema_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Schema, &name, statement))?;
        return Ok(Some(&mut schema.comment));
    }

    if scanner.expect_optional("EXTENSION") {
        let name = unquote_identifier(&scanner.parse_identifier()?);
        let extension = loader
            .database
            .schemas
            .iter_mut()
            .find_map(|s| s.get_extension_mut(&name))
            .ok_or_else(|| not_found(ObjectKind::Extension, &name, statement))?;
        return Ok(Some(&mut extension.comment));
    }

    if scanner.expect_optional("FUNCTION") {
        let (schema_name, function) = parse_function_signature(loader, scanner)?;
        let signature = function.signature();
        let function = loader
            .schema_mut(&schema_name, statement)?
            .get_function_mut(&signature)
            .ok_or_else(|| not_found(ObjectKind::Function, &signature, statement))?;
        return Ok(Some(&mut function.comment));
    }

    if scanner.expect_optional("OPERATOR") {
        if scanner.peek_word("CLASS") || scanner.peek_word("FAMILY") {
            return Ok(None);
        }

        let (schema_name, signature) = parse_operator_signature(loader, scanner)?;
        let operator = loader
            .schema_mut(&schema_name, statement)?
            .get_operator_mut(&signature)
            .ok_or_else(|| not_found(ObjectKind::Operator, &signature, statement))?;
        return Ok(Some(&mut operator.comment));
    }

    if scanner.expect_optional("SEQUENCE") {
        let qualified_name = scanner.parse_identifier()?;
        let (schema, name) = loader.resolve_schema_mut(&qualified_name, statement)?;
        let sequence = schema
            .get_sequence_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Sequence, &qualified_name, statement))?;
        return Ok(Some(&mut sequence.comment));
    }

    if scanner.expect_optional("INDEX") {
        let qualified_name = scanner.parse_identifier()?;
        let (schema, name) = loader.resolve_schema_mut(&qualified_name, statement)?;

        // A primary key or unique constraint owns an index of the same name.
        if schema.find_index(&name).is_none() {
            let constraint = schema
                .relations
                .iter_mut()
                .find_map(|r| r.get_constraint_mut(&name))
                .ok_or_else(|| not_found(ObjectKind::Index, &qualified_name, statement))?;
            return Ok(Some(&mut constraint.comment));
        }

        let index = schema
            .find_index_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Index, &qualified_name, statement))?;
        return Ok(Some(&mut index.comment));
    }

    if scanner.expect_optional("TYPE") || scanner.expect_optional("DOMAIN") {
        let qualified_name = scanner.parse_identifier()?;
        let (schema, name) = loader.resolve_schema_mut(&qualified_name, statement)?;

        if schema.get_enum(&name).is_some() {
            return Ok(schema.get_enum_mut(&name).map(|e| &mut e.comment));
        }

        if schema.get_domain(&name).is_some() {
            return Ok(schema.get_domain_mut(&name).map(|d| &mut d.comment));
        }

        let composite = schema
            .get_relation_mut(&name)
            .filter(|r| r.kind == RelationKind::Type)
            .ok_or_else(|| not_found(ObjectKind::Type, &qualified_name, statement))?;
        return Ok(Some(&mut composite.comment));
    }

    if scanner.expect_optional("COLUMN") {
        let qualified_name = scanner.parse_identifier()?;
        let mut parts = split_qualified_name(&qualified_name);
        let column_name = parts.pop().unwrap_or_default();
        let relation_name = match parts.len() {
            0 => return Err(scanner.error("relation.column")),
            1 => parts[0].clone(),
            _ => format!("{}.{}", parts[parts.len() - 2], parts[parts.len() - 1]),
        };

        let relation = relation_by_parts(loader, &parts, &relation_name, statement)?;
        let column = relation
            .resolve_column_mut(&column_name)
            .ok_or_else(|| not_found(ObjectKind::Column, &qualified_name, statement))?;
        return Ok(Some(&mut column.comment));
    }

    if let Some(kind) = scanner.expect_optional_one_of(&["CONSTRAINT", "TRIGGER", "POLICY", "RULE"]) {
        let name = unquote_identifier(&scanner.parse_identifier()?);
        scanner.expect("ON")?;

        if scanner.peek_word("DOMAIN") {
            return Ok(None);
        }

        let relation_name = scanner.parse_identifier()?;
        let relation = loader.relation_mut(&relation_name, statement)?;

        let comment = match kind {
            "CONSTRAINT" => relation
                .get_constraint_mut(&name)
                .map(|c| &mut c.comment)
                .ok_or_else(|| not_found(ObjectKind::Constraint, &name, statement))?,
            "TRIGGER" => relation
                .get_trigger_mut(&name)
                .map(|t| &mut t.comment)
                .ok_or_else(|| not_found(ObjectKind::Trigger, &name, statement))?,
            "POLICY" => relation
                .get_policy_mut(&name)
                .map(|p| &mut p.comment)
                .ok_or_else(|| not_found(ObjectKind::Policy, &name, statement))?,
            _ => relation
                .get_rule_mut(&name)
                .map(|r| &mut r.comment)
                .ok_or_else(|| not_found(ObjectKind::Rule, &name, statement))?,
        };
        return Ok(Some(comment));
    }

    let is_relation = scanner.expect_optional_sequence(&["FOREIGN", "TABLE"])
        || scanner.expect_optional_sequence(&["MATERIALIZED", "VIEW"])
        || scanner.expect_optional("VIEW")
        || scanner.expect_optional("TABLE");

    if !is_relation {
        return Ok(None);
    }

    let qualified_name = scanner.parse_identifier()?;
    let relation = loader.relation_mut(&qualified_name, statement)?;
    Ok(Some(&mut relation.comment))
}

/// The relation of a `COMMENT ON COLUMN`, where `parts` is everything before the column name.
fn relation_by_parts<'l>(
    loader: &'l mut Loader,
    parts: &[String],
    relation_name: &str,
    statement: &str,
) -> Result<&'l mut PostgresRelation> {
    let name = &parts[parts.len() - 1];
    let schema_name = if parts.len() >= 2 {
        parts[parts.len() - 2].clone()
    } else {
        loader.database.default_schema.clone()
    };

    loader
        .schema_mut(&schema_name, statement)?
        .get_relation_mut(name)
        .ok_or_else(|| not_found(ObjectKind::Relation, relation_name, statement))
}
