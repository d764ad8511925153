use itertools::Itertools;
use crate::error::ObjectKind;
use crate::models::{get_or_create_privilege, PostgresPrivilege, PrivilegeKind, PrivilegeTarget};
use crate::parser::scanner::Scanner;
use crate::parser::{not_found, parse_role, Loader};
use crate::quoting::{unquote_identifier, Quotable};
use crate::Result;

/// A privilege as written: `SELECT`, `ALL` or `UPDATE (a, b)`.
struct PrivilegeClause {
    keyword: String,
    columns: Vec<String>,
}

/// Object types other than tables, sequences and schemas. Grants on them are ignored.
const UNSUPPORTED_OBJECT_TYPES: [&str; 12] = [
    "ALL", "DATABASE", "DOMAIN", "FOREIGN", "FUNCTION", "LANGUAGE", "LARGE", "PARAMETER", "PROCEDURE",
    "ROUTINE", "TABLESPACE", "TYPE",
];

/// `GRANT privileges ON [TABLE | SEQUENCE | SCHEMA] objects TO roles [WITH GRANT OPTION]` and
/// `REVOKE [GRANT OPTION FOR] privileges ON ... FROM roles`.
pub(super) fn grant_or_revoke(loader: &mut Loader, statement: &str) -> Result {
    let mut scanner = Scanner::new(statement);

    let grant = scanner.expect_optional("GRANT");
    if !grant {
        scanner.expect("REVOKE")?;
    }
    let revoke_grant_option = !grant && scanner.expect_optional_sequence(&["GRANT", "OPTION", "FOR"]);

    let Some(privileges) = parse_privileges(&mut scanner)? else {
        loader.ignore(statement);
        return Ok(());
    };

    if !scanner.expect_optional("ON") {
        loader.ignore(statement);
        return Ok(());
    }

    let object_type = scanner
        .expect_optional_one_of(&["TABLE", "SEQUENCE", "SCHEMA"])
        .unwrap_or("TABLE");

    if UNSUPPORTED_OBJECT_TYPES.iter().any(|t| scanner.peek_word(t)) {
        loader.ignore(statement);
        return Ok(());
    }

    let mut objects = Vec::new();
    loop {
        objects.push(scanner.parse_identifier()?);
        if !scanner.expect_optional(",") {
            break;
        }
    }

    scanner.expect(if grant { "TO" } else { "FROM" })?;
    let mut roles = Vec::new();
    loop {
        scanner.expect_optional("GROUP");
        roles.push(parse_role(&mut scanner)?);
        if !scanner.expect_optional(",") {
            break;
        }
    }

    let with_grant_option = grant && scanner.expect_optional_sequence(&["WITH", "GRANT", "OPTION"]);
    if scanner.expect_optional_sequence(&["GRANTED", "BY"]) {
        scanner.parse_identifier()?;
    }

    if scanner.expect_optional("CASCADE") {
        loader.ignore(statement);
        return Ok(());
    }
    scanner.expect_optional("RESTRICT");

    if !scanner.is_consumed() {
        return Err(scanner.error(";"));
    }

    let change = PrivilegeChange {
        grant,
        grant_option: if grant { with_grant_option } else { revoke_grant_option },
        privileges: &privileges,
        roles: &roles,
        statement,
    };

    // A statement is applied to every object or to none of them.
    for object in &objects {
        if !change.fits_object(loader, object_type, object)? {
            loader.ignore(statement);
            return Ok(());
        }
    }

    for object in &objects {
        match object_type {
            "SCHEMA" => change.apply_to_schema(loader, object),
            "SEQUENCE" => change.apply_to_sequence(loader, object),
            _ => change.apply_to_table(loader, object),
        }?;
    }

    Ok(())
}

/// Parses the privilege list, `None` when it is empty.
fn parse_privileges(scanner: &mut Scanner) -> Result<Option<Vec<PrivilegeClause>>> {
    let mut privileges = Vec::new();

    loop {
        if scanner.peek_word("ON") || scanner.is_consumed() {
            break;
        }

        let keyword = scanner.parse_identifier()?.to_uppercase();
        if keyword == "ALL" {
            scanner.expect_optional("PRIVILEGES");
        }

        let mut columns = Vec::new();
        if scanner.expect_optional("(") {
            loop {
                columns.push(unquote_identifier(&scanner.parse_identifier()?));
                if scanner.expect_optional(")") {
                    break;
                }
                scanner.expect(",")?;
            }
        }

        privileges.push(PrivilegeClause { keyword, columns });

        if !scanner.expect_optional(",") {
            break;
        }
    }

    Ok(if privileges.is_empty() { None } else { Some(privileges) })
}

/// One GRANT or REVOKE about to be applied to each of its objects.
struct PrivilegeChange<'a> {
    grant: bool,
    /// `WITH GRANT OPTION` for a grant, `GRANT OPTION FOR` for a revoke.
    grant_option: bool,
    privileges: &'a [PrivilegeClause],
    roles: &'a [String],
    statement: &'a str,
}

/// The kinds `clause` stands for on `target`, `None` when it does not exist there.
fn clause_kinds(clause: &PrivilegeClause, target: PrivilegeTarget) -> Option<Vec<PrivilegeKind>> {
    if clause.keyword == "ALL" {
        return Some(target.all_privileges().to_vec());
    }

    PrivilegeKind::parse(&clause.keyword)
        .filter(|kind| target.all_privileges().contains(kind))
        .map(|kind| vec![kind])
}

impl PrivilegeChange<'_> {
    /// Whether every clause scoped like `target` exists for it. Column lists are checked against
    /// [`PrivilegeTarget::Column`], everything else against the object itself.
    fn fits(&self, target: PrivilegeTarget) -> bool {
        let column_scoped = target == PrivilegeTarget::Column;

        self.privileges
            .iter()
            .filter(|clause| clause.columns.is_empty() != column_scoped)
            .all(|clause| clause_kinds(clause, target).is_some())
    }

    /// Whether the statement can be applied to `object` as a whole. Missing objects are left for
    /// the apply step to report.
    fn fits_object(&self, loader: &mut Loader, object_type: &str, object: &str) -> Result<bool> {
        if object_type == "SCHEMA" {
            return Ok(true);
        }

        let (schema, name) = loader.resolve_schema_mut(object, self.statement)?;

        if object_type != "SEQUENCE" && schema.get_relation(&name).is_some() {
            return Ok(self.fits(PrivilegeTarget::Relation) && self.fits(PrivilegeTarget::Column));
        }

        Ok(schema.get_sequence(&name).is_none() || self.fits(PrivilegeTarget::Sequence))
    }

    /// Applies the privileges listed for `column`, or those without a column list when it is
    /// `None`. Clauses that do not exist for `target` were rejected by [`Self::fits`].
    fn apply(&self, privileges: &mut Vec<PostgresPrivilege>, target: PrivilegeTarget, column: Option<&str>) {
        for clause in self.privileges {
            let scoped_here = match column {
                Some(column) => clause.columns.iter().any(|c| c == column),
                None => clause.columns.is_empty(),
            };
            let Some(kinds) = clause_kinds(clause, target).filter(|_| scoped_here) else {
                continue;
            };

            for role in self.roles {
                let privilege = get_or_create_privilege(privileges, role);
                for kind in &kinds {
                    privilege.apply(*kind, self.grant, self.grant_option);
                }
            }
        }

        privileges.retain(|p| !p.is_empty());
    }

    /// Tables, views and sequences share a namespace, `GRANT ... ON TABLE` also covers
    /// sequences.
    fn apply_to_table(&self, loader: &mut Loader, object: &str) -> Result {
        let (schema, name) = loader.resolve_schema_mut(object, self.statement)?;

        if schema.get_relation(&name).is_none() {
            return match schema.get_sequence_mut(&name) {
                Some(sequence) => {
                    self.apply(&mut sequence.privileges, PrivilegeTarget::Sequence, None);
                    Ok(())
                }
                None => Err(not_found(ObjectKind::Relation, object, self.statement)),
            };
        }

        let relation = schema
            .get_relation_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Relation, object, self.statement))?;

        let columns = self.privileges.iter().flat_map(|p| &p.columns).unique().collect_vec();
        if !relation.kind.is_view() {
            if let Some(missing) = columns.iter().find(|c| relation.get_column(c).is_none()) {
                return Err(not_found(ObjectKind::Column, missing.as_str(), self.statement));
            }
        }

        self.apply(&mut relation.privileges, PrivilegeTarget::Relation, None);

        for column_name in columns {
            if let Some(column) = relation.resolve_column_mut(column_name) {
                self.apply(&mut column.privileges, PrivilegeTarget::Column, Some(column_name));
            }
        }

        Ok(())
    }

    fn apply_to_sequence(&self, loader: &mut Loader, object: &str) -> Result {
        let (schema, name) = loader.resolve_schema_mut(object, self.statement)?;
        let sequence = schema
            .get_sequence_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Sequence, object, self.statement))?;

        self.apply(&mut sequence.privileges, PrivilegeTarget::Sequence, None);
        Ok(())
    }

    /// Schema privileges are kept as the grant statements that recreate them.
    fn apply_to_schema(&self, loader: &mut Loader, object: &str) -> Result {
        let name = unquote_identifier(object);
        let schema = loader
            .database
            .get_schema_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Schema, &name, self.statement))?;

        for clause in self.privileges {
            for role in self.roles {
                let prefix = format!("GRANT {} ON SCHEMA {} TO {}", clause.keyword, name.quote(), role);
                let plain = format!("{};", prefix);
                let with_option = format!("{} WITH GRANT OPTION;", prefix);

                if self.grant {
                    let granted = if self.grant_option { with_option } else { plain };
                    if !schema.grants.contains(&granted) {
                        schema.grants.push(granted);
                    }
                } else if self.grant_option {
                    for grant in schema.grants.iter_mut().filter(|g| **g == with_option) {
                        grant.clone_from(&plain);
                    }
                } else {
                    schema.grants.retain(|g| *g != plain && *g != with_option);
                }
            }
        }

        Ok(())
    }
}
