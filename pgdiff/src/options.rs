use regex::Regex;
use crate::error::{PgDiffError, Result};

/// Options that change how a dump is read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Skip the `_slony_logtrigger` and `_slony_denyaccess` triggers Slony-I installs on
    /// replicated tables.
    pub ignore_slony_triggers: bool,
}

pub(crate) const SLONY_TRIGGERS: [&str; 2] = ["_slony_logtrigger", "_slony_denyaccess"];

/// Options that change the generated migration.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// Emit `IF NOT EXISTS` on creation and `IF EXISTS` on drops.
    pub add_if_exists_guards: bool,
    /// Give a new `NOT NULL` column without default the neutral value of its type so existing
    /// rows can be filled. The default is dropped again right after.
    pub add_defaults: bool,
    /// Wrap the migration in `START TRANSACTION;` and `COMMIT TRANSACTION;`.
    pub add_transaction: bool,
    /// Consider function bodies equal when they only differ in whitespace.
    pub ignore_function_whitespace: bool,
    /// Do not alter `START WITH` of sequences.
    pub ignore_start_with: bool,
    /// Never emit `CREATE SCHEMA`, the schemas are expected to exist.
    pub ignore_schema_creation: bool,
    /// Append the statements neither dump could parse as comments.
    pub output_ignored_statements: bool,
    /// Only schemas whose whole name matches one of these are compared. Empty means all.
    pub include_schemas: Vec<Regex>,
    /// Schemas whose whole name matches one of these are skipped, even when included.
    pub exclude_schemas: Vec<Regex>,
}

impl DiffOptions {
    /// Compiles the include and exclude patterns. Each pattern has to match the whole name.
    pub fn with_schema_filters<I, E>(mut self, include: I, exclude: E) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        self.include_schemas = compile_patterns(include)?;
        self.exclude_schemas = compile_patterns(exclude)?;
        Ok(self)
    }

    pub fn is_schema_included(&self, name: &str) -> bool {
        let included = self.include_schemas.is_empty()
            || self.include_schemas.iter().any(|r| r.is_match(name));

        included && !self.exclude_schemas.iter().any(|r| r.is_match(name))
    }
}

fn compile_patterns<I>(patterns: I) -> Result<Vec<Regex>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|pattern| {
            let pattern = pattern.as_ref();
            Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| PgDiffError::InvalidSchemaPattern {
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}
