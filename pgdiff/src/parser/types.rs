use crate::error::ObjectKind;
use crate::models::{PostgresColumn, PostgresDomain, PostgresDomainConstraint, PostgresEnum, PostgresRelation, RelationKind};
use crate::parser::scanner::Scanner;
use crate::parser::{duplicate, not_found, Loader};
use crate::quoting::{unquote_identifier, unquote_value_string};
use crate::Result;

/// `CREATE TYPE name AS ENUM (...)` and `CREATE TYPE name AS (...)`.
///
/// Range, base and shell types are kept as ignored statements.
pub(super) fn create_type(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["CREATE", "TYPE"])?;

    let qualified_name = scanner.parse_identifier()?;
    let (schema_name, name) = loader.database.resolve_name(&qualified_name);

    if !scanner.expect_optional("AS") {
        loader.ignore(statement);
        return Ok(());
    }

    if scanner.expect_optional("ENUM") {
        let mut enumeration = PostgresEnum {
            name,
            position: loader.position(),
            ..Default::default()
        };

        scanner.expect("(")?;
        if !scanner.expect_optional(")") {
            loop {
                enumeration.values.push(unquote_value_string(&scanner.parse_string()?));
                if scanner.expect_optional(")") {
                    break;
                }
                scanner.expect(",")?;
            }
        }

        return loader.schema_mut(&schema_name, statement)?.add_enum(enumeration, statement);
    }

    if scanner.peek_char() != Some('(') {
        loader.ignore(statement);
        return Ok(());
    }

    let mut composite = PostgresRelation::new(&name, RelationKind::Type);
    composite.position = loader.position();

    scanner.expect("(")?;
    if !scanner.expect_optional(")") {
        loop {
            let column_name = unquote_identifier(&scanner.parse_identifier()?);
            if composite.get_column(&column_name).is_some() {
                return Err(duplicate(ObjectKind::Column, &column_name, statement));
            }

            let mut column = PostgresColumn::new(&column_name);
            column.parse_definition(&scanner.parse_expression()?);
            composite.columns.push(column);

            if scanner.expect_optional(")") {
                break;
            }
            scanner.expect(",")?;
        }
    }

    let schema = loader.schema_mut(&schema_name, statement)?;
    if schema.get_enum(&name).is_some() || schema.get_domain(&name).is_some() {
        return Err(duplicate(ObjectKind::Type, &name, statement));
    }
    schema.add_relation(composite, statement)
}

/// `CREATE DOMAIN name [AS] type [COLLATE c] [DEFAULT e] [[NOT] NULL] [[CONSTRAINT n] CHECK (e)] ...`
pub(super) fn create_domain(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect_sequence(&["CREATE", "DOMAIN"])?;

    let qualified_name = scanner.parse_identifier()?;
    let (schema_name, name) = loader.database.resolve_name(&qualified_name);
    scanner.expect_optional("AS");

    let mut domain = PostgresDomain {
        data_type: scanner.parse_data_type()?,
        position: loader.position(),
        ..Default::default()
    };

    const CLAUSES: [&str; 6] = ["CHECK", "COLLATE", "CONSTRAINT", "DEFAULT", "NOT", "NULL"];

    while !scanner.is_consumed() {
        if scanner.expect_optional("COLLATE") {
            domain.collation = Some(scanner.parse_identifier()?);
        } else if scanner.expect_optional("DEFAULT") {
            domain.default_value = Some(scanner.parse_expression_until(&CLAUSES)?);
        } else if scanner.expect_optional_sequence(&["NOT", "NULL"]) {
            domain.not_null = true;
        } else if scanner.expect_optional("NULL") {
            domain.not_null = false;
        } else {
            let constraint_name = if scanner.expect_optional("CONSTRAINT") {
                Some(unquote_identifier(&scanner.parse_identifier()?))
            } else {
                None
            };
            scanner.expect("CHECK")?;

            let check = scanner.parse_expression_until(&CLAUSES)?;
            let check_name = match constraint_name {
                Some(check_name) => check_name,
                None => generated_check_name(&domain, &name),
            };
            domain.constraints.push(PostgresDomainConstraint { name: check_name, check });
        }
    }

    domain.name = name;

    loader.schema_mut(&schema_name, statement)?.add_domain(domain, statement)
}

/// The name Postgres gives an unnamed check: `<domain>_check`, then `<domain>_check1` and so on.
fn generated_check_name(domain: &PostgresDomain, domain_name: &str) -> String {
    let base = format!("{}_check", domain_name);
    let mut candidate = base.clone();
    let mut counter = 0;

    while domain.constraints.iter().any(|c| c.name == candidate) {
        counter += 1;
        candidate = format!("{}{}", base, counter);
    }

    candidate
}

/// `ALTER TYPE name OWNER TO role` for enums and composite types, and `ALTER DOMAIN` likewise.
pub(super) fn alter_type_owner(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("ALTER")?;
    let is_domain = scanner.expect_optional("DOMAIN");
    if !is_domain {
        scanner.expect("TYPE")?;
    }

    let qualified_name = scanner.parse_identifier()?;
    scanner.expect_sequence(&["OWNER", "TO"])?;
    let owner = Some(scanner.parse_identifier()?);

    let (schema, name) = loader.resolve_schema_mut(&qualified_name, statement)?;

    if is_domain {
        let domain = schema
            .get_domain_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Domain, &qualified_name, statement))?;
        domain.owner = owner;
    } else if let Some(enumeration) = schema.get_enum_mut(&name) {
        enumeration.owner = owner;
    } else {
        let composite = schema
            .get_relation_mut(&name)
            .filter(|r| r.kind == RelationKind::Type)
            .ok_or_else(|| not_found(ObjectKind::Type, &qualified_name, statement))?;
        composite.owner = owner;
    }

    Ok(())
}
