use clap::{Args, Parser, Subcommand};
use pgdiff::{DiffOptions, LoadOptions, Result};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about)]
#[command(propagate_version = true)]
/// Compares two schema dumps made with `pg_dump --schema-only` and prints the DDL that turns
/// the old database into the new one.
///
/// Only the dumps are read, no database is ever connected to. Review the output before running it.
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the statements that migrate the old dump into the new one
    Diff(DiffArgs),
    /// Load a single dump and print the schema model read from it as JSON
    Inspect {
        /// The dump to read, `-` for stdin
        dump: String,

        #[command(flatten)]
        load_args: LoadArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Skip the triggers Slony-I installs on replicated tables
    #[arg(long)]
    pub ignore_slony_triggers: bool,
}

impl LoadArgs {
    pub(crate) fn load_options(&self) -> LoadOptions {
        LoadOptions {
            ignore_slony_triggers: self.ignore_slony_triggers,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    /// The dump of the database as it is now, `-` for stdin
    pub old_dump: String,

    /// The dump of the database as it should become, `-` for stdin
    pub new_dump: String,

    #[command(flatten)]
    pub load_args: LoadArgs,

    /// Add IF NOT EXISTS to created objects and IF EXISTS to dropped ones
    #[arg(long)]
    pub add_if_exists: bool,

    /// Give new NOT NULL columns without a default the neutral value of their type while they
    /// are added, so existing rows can be filled
    #[arg(long)]
    pub add_defaults: bool,

    /// Wrap the migration in a transaction
    #[arg(long)]
    pub add_transaction: bool,

    /// Treat function bodies that only differ in whitespace as equal
    #[arg(long)]
    pub ignore_function_whitespace: bool,

    /// Do not alter the START WITH of existing sequences
    #[arg(long)]
    pub ignore_start_with: bool,

    /// Expect every schema to exist already and never create one
    #[arg(long)]
    pub ignore_schema_creation: bool,

    /// Append the statements that were not understood in either dump as comments
    #[arg(long)]
    pub output_ignored_statements: bool,

    /// Only compare schemas whose name matches this regex. Can be given multiple times
    #[arg(long = "schema", value_name = "REGEX")]
    pub schemas: Vec<String>,

    /// Skip schemas whose name matches this regex. Can be given multiple times
    #[arg(long = "exclude-schema", value_name = "REGEX")]
    pub exclude_schemas: Vec<String>,
}

impl DiffArgs {
    pub(crate) fn diff_options(&self) -> Result<DiffOptions> {
        DiffOptions {
            add_if_exists_guards: self.add_if_exists,
            add_defaults: self.add_defaults,
            add_transaction: self.add_transaction,
            ignore_function_whitespace: self.ignore_function_whitespace,
            ignore_start_with: self.ignore_start_with,
            ignore_schema_creation: self.ignore_schema_creation,
            output_ignored_statements: self.output_ignored_statements,
            ..Default::default()
        }
        .with_schema_filters(&self.schemas, &self.exclude_schemas)
    }
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}
