use std::io::BufRead;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};
use crate::error::{ObjectKind, PgDiffError};
use crate::models::{PostgresDatabase, PostgresRelation, PostgresSchema};
use crate::options::LoadOptions;
use crate::source_position::SourcePosition;
use crate::Result;

mod alter_relation;
mod comment;
mod extension;
mod function;
mod grant;
mod index;
mod operator;
mod policy;
mod rule;
mod scanner;
mod schema;
mod sequence;
mod splitter;
mod table;
#[cfg(test)]
mod tests;
mod trigger;
mod types;
mod view;

pub use splitter::StatementSplitter;

type Handler = fn(&mut Loader, &str) -> Result;

/// The statement handlers, tried in order. The first whose pattern matches the whole statement
/// parses it.
static HANDLERS: Lazy<Vec<(Regex, Handler)>> = Lazy::new(|| {
    let handlers: [(&str, Handler); 25] = [
        (r"CREATE\s+SCHEMA\s.*", schema::create_schema),
        (r"ALTER\s+SCHEMA\s.*\sOWNER\s+TO\s.*", schema::alter_schema),
        (r"CREATE\s+EXTENSION\s.*", extension::create_extension),
        (r"SET\s+search_path\s*(?:=|\sTO\s).*", schema::set_search_path),
        (r"CREATE\s+(?:(?:UNLOGGED|FOREIGN)\s+)*TABLE\s.*", table::create_table),
        (r"ALTER\s+TABLE\s+(?:ONLY\s+)?\S+\s+DISABLE\s+TRIGGER\s+\S+\s*;", trigger::disable_trigger),
        (r"ALTER\s+(?:FOREIGN\s+)?TABLE\s.*", alter_relation::alter_relation),
        (r"ALTER\s+(?:MATERIALIZED\s+)?VIEW\s.*", alter_relation::alter_relation),
        (r"CREATE\s+(?:(?:TEMP|TEMPORARY|UNLOGGED)\s+)?SEQUENCE\s.*", sequence::create_sequence),
        (r"ALTER\s+SEQUENCE\s.*", sequence::alter_sequence),
        (r"CREATE\s+(?:UNIQUE\s+)?INDEX\s.*", index::create_index),
        (
            r"CREATE\s+(?:OR\s+REPLACE\s+)?(?:(?:TEMP|TEMPORARY|RECURSIVE|MATERIALIZED)\s+)*VIEW\s.*",
            view::create_view,
        ),
        (r"CREATE\s+(?:OR\s+REPLACE\s+)?TRIGGER\s.*", trigger::create_trigger),
        (r"CREATE\s+(?:OR\s+REPLACE\s+)?FUNCTION\s.*", function::create_function),
        (r"ALTER\s+FUNCTION\s.*\sOWNER\s+TO\s.*", function::alter_function),
        (r"CREATE\s+OPERATOR\s.*", operator::create_operator),
        (r"ALTER\s+OPERATOR\s.*\sOWNER\s+TO\s.*", operator::alter_operator),
        (r"CREATE\s+TYPE\s.*", types::create_type),
        (r"CREATE\s+DOMAIN\s.*", types::create_domain),
        (r"ALTER\s+(?:TYPE|DOMAIN)\s.*\sOWNER\s+TO\s.*", types::alter_type_owner),
        (r"COMMENT\s+ON\s.*", comment::comment_on),
        (r"(?:SELECT\s|INSERT\s+INTO\s|UPDATE\s|DELETE\s+FROM\s).*", swallow),
        (r"(?:GRANT|REVOKE)\s.*", grant::grant_or_revoke),
        (r"CREATE\s+POLICY\s.*", policy::create_policy),
        (r"CREATE\s+(?:OR\s+REPLACE\s+)?RULE\s.*", rule::create_rule),
    ];

    handlers
        .into_iter()
        .map(|(pattern, handler)| {
            let regex = Regex::new(&format!(r"(?is)^(?:{})$", pattern)).expect("valid regex");
            (regex, handler)
        })
        .collect()
});

/// Data manipulation is not part of the schema. A dump contains some, such as
/// `SELECT pg_catalog.set_config(...)`, and it is dropped silently.
fn swallow(_loader: &mut Loader, _statement: &str) -> Result {
    Ok(())
}

/// The state shared by all handlers while one dump is loaded.
pub(crate) struct Loader<'o> {
    database: PostgresDatabase,
    options: &'o LoadOptions,
    statement_index: usize,
}

impl<'o> Loader<'o> {
    fn new(options: &'o LoadOptions) -> Self {
        Loader {
            database: PostgresDatabase::default(),
            options,
            statement_index: 0,
        }
    }

    /// The position of the statement being loaded.
    fn position(&self) -> SourcePosition {
        SourcePosition::new(self.statement_index)
    }

    fn ignore(&mut self, statement: &str) {
        debug!(statement, "Ignoring statement");
        self.database.ignored_statements.push(statement.to_string());
    }

    fn schema_mut(&mut self, name: &str, statement: &str) -> Result<&mut PostgresSchema> {
        self.database.require_schema_mut(name, statement)
    }

    /// Returns the schema holding `qualified_name` and the unqualified object name.
    fn resolve_schema_mut(&mut self, qualified_name: &str, statement: &str) -> Result<(&mut PostgresSchema, String)> {
        let (schema_name, name) = self.database.resolve_name(qualified_name);
        let schema = self.database.require_schema_mut(&schema_name, statement)?;
        Ok((schema, name))
    }

    fn relation_mut(&mut self, qualified_name: &str, statement: &str) -> Result<&mut PostgresRelation> {
        let (schema, name) = self.resolve_schema_mut(qualified_name, statement)?;
        schema
            .get_relation_mut(&name)
            .ok_or_else(|| not_found(ObjectKind::Relation, qualified_name, statement))
    }

    fn load_statement(&mut self, statement: &str) -> Result {
        if statement.trim_end_matches(';').trim().is_empty() {
            return Ok(());
        }

        self.statement_index += 1;

        match HANDLERS.iter().find(|(pattern, _)| pattern.is_match(statement)) {
            Some((_, handler)) => handler(self, statement),
            None => {
                self.ignore(statement);
                Ok(())
            }
        }
    }
}

/// A role as written, with `PUBLIC` always spelled upper case.
pub(crate) fn parse_role(scanner: &mut scanner::Scanner) -> Result<String> {
    let role = scanner.parse_identifier()?;

    if role == "public" {
        Ok("PUBLIC".to_string())
    } else {
        Ok(role)
    }
}

pub(crate) fn not_found(kind: ObjectKind, name: &str, statement: &str) -> PgDiffError {
    PgDiffError::ObjectNotFound {
        kind,
        name: name.to_string(),
        statement: statement.to_string(),
    }
}

pub(crate) fn duplicate(kind: ObjectKind, name: &str, statement: &str) -> PgDiffError {
    PgDiffError::DuplicateObject {
        kind,
        name: name.to_string(),
        statement: statement.to_string(),
    }
}

/// Reads a whole dump into its schema model.
///
/// Statements no handler understands end up in [PostgresDatabase::ignored_statements]. Any
/// statement that is understood but malformed, or refers to something that does not exist,
/// fails the whole load.
#[instrument(skip_all)]
pub fn load_database<R: BufRead>(reader: R, options: &LoadOptions) -> Result<PostgresDatabase> {
    let mut loader = Loader::new(options);

    for statement in StatementSplitter::new(reader) {
        loader.load_statement(&statement?)?;
    }

    let database = loader.database;

    debug!(
        statements = loader.statement_index,
        schemas = database.schemas.len(),
        ignored = database.ignored_statements.len(),
        "Loaded dump"
    );

    Ok(database)
}

/// [load_database] for a dump that is already in memory.
pub fn load_database_from_str(dump: &str, options: &LoadOptions) -> Result<PostgresDatabase> {
    load_database(dump.as_bytes(), options)
}
