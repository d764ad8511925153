use crate::error::ObjectKind;
use crate::models::{PostgresColumn, PostgresConstraint, PostgresInheritedColumn, PostgresRelation, RelationKind, TableDetails};
use crate::parser::scanner::Scanner;
use crate::parser::{duplicate, not_found, Loader};
use crate::quoting::unquote_identifier;
use crate::Result;

pub(super) fn create_table(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("CREATE")?;

    let mut details = TableDetails::default();
    let mut foreign = false;

    loop {
        if scanner.expect_optional("UNLOGGED") {
            details.unlogged = true;
        } else if scanner.expect_optional("FOREIGN") {
            foreign = true;
        } else {
            break;
        }
    }

    scanner.expect("TABLE")?;
    scanner.expect_optional_sequence(&["IF", "NOT", "EXISTS"]);

    let qualified_name = scanner.parse_identifier()?;
    let (schema_name, name) = loader.database.resolve_name(&qualified_name);

    let mut relation = PostgresRelation::new(&name, RelationKind::Type);

    scanner.expect("(")?;
    if !scanner.expect_optional(")") {
        loop {
            if scanner.expect_optional("CONSTRAINT") {
                let constraint_name = unquote_identifier(&scanner.parse_identifier()?);
                if relation.get_constraint(&constraint_name).is_some() {
                    return Err(duplicate(ObjectKind::Constraint, &constraint_name, statement));
                }

                relation.constraints.push(PostgresConstraint {
                    name: constraint_name,
                    definition: scanner.parse_expression()?,
                    comment: None,
                });
            } else if scanner.expect_optional_sequence(&["PRIMARY", "KEY"]) {
                return Err(scanner.unsupported(
                    "an inline PRIMARY KEY is not supported, declare it as CONSTRAINT name PRIMARY KEY (columns)",
                ));
            } else if scanner.expect_optional("UNIQUE") {
                return Err(scanner.unsupported(
                    "an inline UNIQUE is not supported, declare it as CONSTRAINT name UNIQUE (columns)",
                ));
            } else {
                let column_name = unquote_identifier(&scanner.parse_identifier()?);
                if relation.get_column(&column_name).is_some() {
                    return Err(duplicate(ObjectKind::Column, &column_name, statement));
                }

                let mut column = PostgresColumn::new(&column_name);
                column.parse_definition(&scanner.parse_expression()?);
                relation.columns.push(column);
            }

            if scanner.expect_optional(")") {
                break;
            }
            scanner.expect(",")?;
        }
    }

    while !scanner.is_consumed() {
        if scanner.expect_optional("INHERITS") {
            scanner.expect("(")?;
            loop {
                let parent = scanner.parse_identifier()?;
                details.inherits.push(loader.database.resolve_name(&parent));

                if scanner.expect_optional(")") {
                    break;
                }
                scanner.expect(",")?;
            }
        } else if scanner.expect_optional("TABLESPACE") {
            details.tablespace = Some(scanner.parse_identifier()?);
        } else if scanner.expect_optional("SERVER") {
            details.server = Some(scanner.parse_expression()?);
        } else if scanner.expect_optional_sequence(&["PARTITION", "BY", "RANGE"]) {
            details.partition_by = Some(scanner.parse_expression()?);
        } else {
            return Err(scanner.unsupported("unknown CREATE TABLE clause"));
        }
    }

    details.inherited_columns = collect_inherited_columns(loader, &details.inherits, &relation, statement)?;

    relation.kind = if foreign {
        RelationKind::ForeignTable(details)
    } else {
        RelationKind::Table(details)
    };
    relation.position = loader.position();

    loader.schema_mut(&schema_name, statement)?.add_relation(relation, statement)
}

/// The columns `child` gets from its parents, except those it declares itself.
fn collect_inherited_columns(
    loader: &Loader,
    parents: &[(String, String)],
    child: &PostgresRelation,
    statement: &str,
) -> Result<Vec<PostgresInheritedColumn>> {
    let mut inherited: Vec<PostgresInheritedColumn> = Vec::new();

    for parent in parents {
        let parent_relation = loader
            .database
            .get_schema(&parent.0)
            .and_then(|s| s.get_relation(&parent.1))
            .ok_or_else(|| not_found(ObjectKind::Table, &format!("{}.{}", parent.0, parent.1), statement))?;

        let own_names = parent_relation.columns.iter().map(|c| &c.name);
        let grand_parent_names = parent_relation
            .kind
            .table_details()
            .into_iter()
            .flat_map(|d| d.inherited_columns.iter().map(|c| &c.name));

        for column_name in own_names.chain(grand_parent_names) {
            let known = child.get_column(column_name).is_some()
                || inherited.iter().any(|c| &c.name == column_name);

            if !known {
                inherited.push(PostgresInheritedColumn {
                    name: column_name.clone(),
                    parent: parent.clone(),
                    default_value: None,
                });
            }
        }
    }

    Ok(inherited)
}
