//! Reads two `pg_dump --schema-only` dumps and writes the DDL that turns the first database
//! into the second one.
//!
//! ```
//! use pgdiff::{diff_databases, load_database_from_str, DiffOptions, LoadOptions};
//!
//! let old = load_database_from_str("CREATE TABLE t (id integer);", &LoadOptions::default()).unwrap();
//! let new = load_database_from_str("CREATE TABLE t (id integer, name text);", &LoadOptions::default()).unwrap();
//!
//! assert_eq!(
//!     diff_databases(&old, &new, &DiffOptions::default()),
//!     "ALTER TABLE t\n\tADD COLUMN name text;\n"
//! );
//! ```

mod diff;
mod error;
mod helpers;
mod models;
mod options;
mod parser;
mod quoting;
mod source_position;
mod whitespace_ignorant_string;

pub use diff::diff_databases;
pub use error::*;
pub use models::*;
pub use options::{DiffOptions, LoadOptions};
pub use parser::{load_database, load_database_from_str, StatementSplitter};
pub use quoting::quote_identifier;
pub use source_position::SourcePosition;
pub use whitespace_ignorant_string::WhitespaceIgnorantString;

#[cfg(test)]
pub(crate) fn default<T: Default>() -> T {
    T::default()
}

/// Routes log output of the code under test to the test harness, filtered by `RUST_LOG`.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
