use crate::options::DiffOptions;
use crate::quoting::Quotable;

/// The schema unqualified names resolve to before the migration changes anything.
const DEFAULT_SEARCH_PATH: &str = "public";

/// Collects the statements of a migration.
///
/// Statements render unqualified names, so the writer keeps track of the search path and switches
/// it whenever a statement belongs to another schema than the one before it.
pub(crate) struct MigrationWriter {
    statements: Vec<String>,
    search_path: String,
}

impl MigrationWriter {
    pub fn new() -> Self {
        MigrationWriter {
            statements: Vec::new(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
        }
    }

    /// Writes a statement that names everything it touches in full.
    pub fn write(&mut self, statement: impl Into<String>) {
        self.statements.push(statement.into());
    }

    /// Writes a statement whose unqualified names belong to `schema`.
    pub fn write_in(&mut self, schema: &str, statement: impl Into<String>) {
        if self.search_path != schema {
            self.statements
                .push(format!("SET search_path = {}, pg_catalog;", schema.quote()));
            self.search_path = schema.to_string();
        }

        self.write(statement);
    }

    pub fn write_all_in<I>(&mut self, schema: &str, statements: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        for statement in statements {
            self.write_in(schema, statement);
        }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Renders the migration, separating statements by a blank line.
    ///
    /// The ignored statements of both databases are appended as comments when the options ask
    /// for them. Without any statement the result is empty.
    pub fn finish(self, options: &DiffOptions, old_ignored: &[String], new_ignored: &[String]) -> String {
        let mut parts = Vec::new();

        if !self.statements.is_empty() {
            if options.add_transaction {
                parts.push("START TRANSACTION;".to_string());
            }

            parts.extend(self.statements);

            if options.add_transaction {
                parts.push("COMMIT TRANSACTION;".to_string());
            }
        }

        if options.output_ignored_statements {
            parts.extend(ignored_block("Original database ignored statements", old_ignored));
            parts.extend(ignored_block("New database ignored statements", new_ignored));
        }

        if parts.is_empty() {
            return String::new();
        }

        let mut sql = parts.join("\n\n");
        sql.push('\n');
        sql
    }
}

fn ignored_block(title: &str, statements: &[String]) -> Option<String> {
    if statements.is_empty() {
        return None;
    }

    let mut block = format!("/* {}", title);
    for statement in statements {
        block.push_str("\n\n");
        block.push_str(statement);
    }
    block.push_str("\n*/");

    Some(block)
}
