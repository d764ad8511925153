use itertools::Itertools;
use crate::error::ObjectKind;
use crate::models::{
    ColumnIdentity, ColumnStorage, IdentityGeneration, PostgresColumn, PostgresConstraint, PostgresRelation,
    PostgresTrigger, TableDetails,
};
use crate::parser::scanner::Scanner;
use crate::parser::sequence::apply_sequence_options;
use crate::parser::{duplicate, not_found, Loader};
use crate::quoting::{split_qualified_name, unquote_identifier};
use crate::Result;

/// Where the actions of one `ALTER TABLE` / `ALTER VIEW` apply.
struct AlterTarget<'a> {
    relation: &'a mut PostgresRelation,
    /// The relation as written in the statement.
    qualified_name: &'a str,
    schema_name: String,
    statement: &'a str,
    /// Statements split off to be kept as ignored statements.
    ignored: Vec<String>,
}

/// `ALTER [FOREIGN] TABLE [ONLY] name action, ...` and `ALTER [MATERIALIZED] VIEW name action, ...`
///
/// The kind written in the statement is not checked, Postgres accepts `ALTER TABLE` for views
/// and sequences as well. Sequences are handed over to the sequence options.
pub(super) fn alter_relation(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);
    scanner.expect("ALTER")?;
    scanner.expect_optional("FOREIGN");

    if scanner.expect_optional("TABLE") {
        scanner.expect_optional("ONLY");
    } else if !scanner.expect_optional_sequence(&["MATERIALIZED", "VIEW"]) {
        scanner.expect("VIEW")?;
    }

    let qualified_name = scanner.parse_identifier()?;
    let (schema, name) = loader.resolve_schema_mut(&qualified_name, statement)?;

    if schema.get_relation(&name).is_none() {
        return match schema.get_sequence_mut(&name) {
            Some(sequence) => apply_sequence_options(&mut scanner, sequence),
            None => Err(not_found(ObjectKind::Relation, &qualified_name, statement)),
        };
    }

    let schema_name = schema.name.clone();
    let relation = schema
        .get_relation_mut(&name)
        .ok_or_else(|| not_found(ObjectKind::Relation, &qualified_name, statement))?;

    let mut target = AlterTarget {
        relation,
        qualified_name: &qualified_name,
        schema_name,
        statement,
        ignored: Vec::new(),
    };

    loop {
        target.parse_action(&mut scanner)?;

        if scanner.is_consumed() {
            break;
        }
        scanner.expect(",")?;
    }

    for ignored in target.ignored {
        loader.ignore(&ignored);
    }

    Ok(())
}

impl AlterTarget<'_> {
    fn parse_action(&mut self, scanner: &mut Scanner) -> Result {
        if scanner.expect_optional("ALTER") {
            scanner.expect_optional("COLUMN");
            let column_name = unquote_identifier(&scanner.parse_identifier()?);
            self.alter_column(scanner, &column_name)
        } else if scanner.expect_optional_sequence(&["OWNER", "TO"]) {
            self.relation.owner = Some(scanner.parse_identifier()?);
            Ok(())
        } else if scanner.expect_optional_sequence(&["CLUSTER", "ON"]) {
            let index = unquote_identifier(&scanner.parse_identifier()?);
            self.table_details(scanner)?.cluster_index = Some(index);
            Ok(())
        } else if scanner.expect_optional_sequence(&["SET", "WITHOUT", "CLUSTER"]) {
            self.table_details(scanner)?.cluster_index = None;
            Ok(())
        } else if scanner.expect_optional_sequence(&["SET", "TABLESPACE"]) {
            let tablespace = scanner.parse_identifier()?;
            self.table_details(scanner)?.tablespace = Some(tablespace);
            Ok(())
        } else if scanner.expect_optional("ADD") {
            self.add_constraint(scanner)
        } else if scanner.expect_optional_sequence(&["ENABLE", "ROW", "LEVEL", "SECURITY"]) {
            self.table_details(scanner)?.row_security = true;
            Ok(())
        } else if scanner.expect_optional_sequence(&["DISABLE", "ROW", "LEVEL", "SECURITY"]) {
            self.table_details(scanner)?.row_security = false;
            Ok(())
        } else if scanner.expect_optional_sequence(&["FORCE", "ROW", "LEVEL", "SECURITY"]) {
            self.table_details(scanner)?.force_row_security = true;
            Ok(())
        } else if scanner.expect_optional_sequence(&["NO", "FORCE", "ROW", "LEVEL", "SECURITY"]) {
            self.table_details(scanner)?.force_row_security = false;
            Ok(())
        } else if scanner.expect_optional("INHERIT") {
            let parent = scanner.parse_identifier()?;
            let parent = resolve_parent(&parent, &self.schema_name);
            let details = self.table_details(scanner)?;
            if !details.inherits.contains(&parent) {
                details.inherits.push(parent);
            }
            Ok(())
        } else if scanner.expect_optional_sequence(&["NO", "INHERIT"]) {
            let parent = scanner.parse_identifier()?;
            let parent = resolve_parent(&parent, &self.schema_name);
            self.table_details(scanner)?.inherits.retain(|p| *p != parent);
            Ok(())
        } else if scanner.expect_optional("ENABLE") {
            self.parse_enable(scanner)
        } else if scanner.expect_optional("DISABLE") {
            self.parse_disable(scanner)
        } else {
            Err(scanner.unsupported("unknown ALTER TABLE action"))
        }
    }

    fn table_details(&mut self, scanner: &Scanner) -> Result<&mut TableDetails> {
        self.relation
            .kind
            .table_details_mut()
            .ok_or_else(|| scanner.unsupported("the action only applies to tables"))
    }

    fn alter_column(&mut self, scanner: &mut Scanner, column_name: &str) -> Result {
        if scanner.expect_optional_sequence(&["SET", "DEFAULT"]) {
            let default_value = scanner.parse_expression()?;
            self.set_column_default(column_name, Some(default_value))
        } else if scanner.expect_optional_sequence(&["DROP", "DEFAULT"]) {
            self.set_column_default(column_name, None)
        } else if scanner.expect_optional_sequence(&["SET", "NOT", "NULL"]) {
            self.column_mut(column_name)?.nullable = false;
            Ok(())
        } else if scanner.expect_optional_sequence(&["DROP", "NOT", "NULL"]) {
            self.column_mut(column_name)?.nullable = true;
            Ok(())
        } else if scanner.expect_optional_sequence(&["SET", "STATISTICS"]) {
            let statistics = scanner.parse_integer()?;
            let statistics = i32::try_from(statistics).map_err(|_| scanner.error("statistics target"))?;
            self.column_mut(column_name)?.statistics = Some(statistics);
            Ok(())
        } else if scanner.expect_optional_sequence(&["SET", "STORAGE"]) {
            let keyword = scanner.parse_identifier()?;
            let storage = ColumnStorage::parse(&keyword)
                .ok_or_else(|| scanner.error("PLAIN, EXTERNAL, EXTENDED or MAIN"))?;
            self.column_mut(column_name)?.storage = Some(storage);
            Ok(())
        } else if scanner.expect_optional_sequence(&["ADD", "GENERATED"]) {
            let generation = if scanner.expect_optional("ALWAYS") {
                IdentityGeneration::Always
            } else {
                scanner.expect_sequence(&["BY", "DEFAULT"])?;
                IdentityGeneration::ByDefault
            };
            scanner.expect_sequence(&["AS", "IDENTITY"])?;

            let sequence_options = if scanner.expect_optional("(") {
                let options = scanner.parse_expression()?;
                scanner.expect(")")?;
                Some(options)
            } else {
                None
            };

            self.column_mut(column_name)?.identity = Some(ColumnIdentity {
                generation,
                sequence_options,
            });
            Ok(())
        } else if scanner.expect_optional_sequence(&["DROP", "IDENTITY"]) {
            scanner.expect_optional_sequence(&["IF", "EXISTS"]);
            self.column_mut(column_name)?.identity = None;
            Ok(())
        } else if scanner.expect_optional_sequence(&["SET", "DATA", "TYPE"]) || scanner.expect_optional("TYPE") {
            let data_type = scanner.parse_data_type()?;
            if scanner.expect_optional("USING") {
                scanner.parse_expression()?;
            }
            self.column_mut(column_name)?.data_type = Some(data_type);
            Ok(())
        } else {
            Err(scanner.unsupported("unknown ALTER COLUMN action"))
        }
    }

    fn column_mut(&mut self, column_name: &str) -> Result<&mut PostgresColumn> {
        self.relation
            .resolve_column_mut(column_name)
            .ok_or_else(|| not_found(ObjectKind::Column, column_name, self.statement))
    }

    /// Defaults may also be set on a column the table inherits, which only changes the child.
    fn set_column_default(&mut self, column_name: &str, default_value: Option<String>) -> Result {
        if let Some(column) = self.relation.resolve_column_mut(column_name) {
            column.default_value = default_value;
            return Ok(());
        }

        let inherited = self
            .relation
            .kind
            .table_details_mut()
            .and_then(|d| d.get_inherited_column_mut(column_name))
            .ok_or_else(|| not_found(ObjectKind::Column, column_name, self.statement))?;
        inherited.default_value = default_value;

        Ok(())
    }

    /// `ADD CONSTRAINT name definition` or `ADD FOREIGN KEY (columns) ...`, which gets the name
    /// Postgres would give it.
    fn add_constraint(&mut self, scanner: &mut Scanner) -> Result {
        let constraint = if scanner.expect_optional("CONSTRAINT") {
            PostgresConstraint {
                name: unquote_identifier(&scanner.parse_identifier()?),
                definition: scanner.parse_expression()?,
                comment: None,
            }
        } else if scanner.expect_optional_sequence(&["FOREIGN", "KEY"]) {
            scanner.expect("(")?;
            let mut columns = Vec::new();
            loop {
                columns.push(scanner.parse_identifier()?);
                if scanner.expect_optional(")") {
                    break;
                }
                scanner.expect(",")?;
            }

            let name = format!(
                "{}_{}_fkey",
                self.relation.name,
                columns.iter().map(|c| unquote_identifier(c)).join("_")
            );

            PostgresConstraint {
                name,
                definition: format!("FOREIGN KEY ({}) {}", columns.join(", "), scanner.parse_expression()?),
                comment: None,
            }
        } else {
            return Err(scanner.unsupported("only ADD CONSTRAINT and ADD FOREIGN KEY are supported"));
        };

        if self.relation.get_constraint(&constraint.name).is_some() {
            return Err(duplicate(ObjectKind::Constraint, &constraint.name, self.statement));
        }

        self.relation.constraints.push(constraint);
        Ok(())
    }

    fn parse_enable(&mut self, scanner: &mut Scanner) -> Result {
        if let Some(mode) = scanner.expect_optional_one_of(&["REPLICA", "ALWAYS"]) {
            let kind = scanner
                .expect_optional_one_of(&["TRIGGER", "RULE"])
                .ok_or_else(|| scanner.error("TRIGGER or RULE"))?;
            let name = scanner.parse_identifier()?;

            self.ignored.push(format!(
                "ALTER TABLE {} ENABLE {} {} {};",
                self.qualified_name,
                mode.to_uppercase(),
                kind.to_uppercase(),
                name
            ));
            Ok(())
        } else if scanner.expect_optional("TRIGGER") {
            let name = unquote_identifier(&scanner.parse_identifier()?);
            self.trigger_mut(&name)?.disabled = false;
            Ok(())
        } else {
            scanner.expect("RULE")?;
            scanner.parse_identifier()?;
            Ok(())
        }
    }

    fn parse_disable(&mut self, scanner: &mut Scanner) -> Result {
        if scanner.expect_optional("TRIGGER") {
            let name = unquote_identifier(&scanner.parse_identifier()?);
            self.trigger_mut(&name)?.disabled = true;
            Ok(())
        } else {
            scanner.expect("RULE")?;
            let name = scanner.parse_identifier()?;
            self.ignored
                .push(format!("ALTER TABLE {} DISABLE RULE {};", self.qualified_name, name));
            Ok(())
        }
    }

    fn trigger_mut(&mut self, name: &str) -> Result<&mut PostgresTrigger> {
        self.relation
            .get_trigger_mut(name)
            .ok_or_else(|| not_found(ObjectKind::Trigger, name, self.statement))
    }
}

/// Resolves a parent table. An unqualified parent lives in the schema of the child.
fn resolve_parent(parent: &str, schema_name: &str) -> (String, String) {
    let mut parts = split_qualified_name(parent);
    let name = parts.pop().unwrap_or_default();
    let schema = parts.pop().unwrap_or_else(|| schema_name.to_string());

    (schema, name)
}
