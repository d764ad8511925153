use serde::{Deserialize, Serialize};
use crate::error::{ObjectKind, PgDiffError, Result};
use crate::models::schema::PostgresSchema;
use crate::quoting::split_qualified_name;

/// One loaded dump.
#[derive(Debug, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct PostgresDatabase {
    /// The schema unqualified names resolve to, changed by `SET search_path`.
    pub default_schema: String,
    pub schemas: Vec<PostgresSchema>,
    /// Statements no handler understood, in the order they were read.
    pub ignored_statements: Vec<String>,
    pub comment: Option<String>,
}

impl Default for PostgresDatabase {
    fn default() -> Self {
        PostgresDatabase {
            default_schema: "public".to_string(),
            schemas: vec![PostgresSchema::new("public")],
            ignored_statements: Vec::new(),
            comment: None,
        }
    }
}

impl PostgresDatabase {
    pub fn get_schema(&self, name: &str) -> Option<&PostgresSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    pub fn get_schema_mut(&mut self, name: &str) -> Option<&mut PostgresSchema> {
        self.schemas.iter_mut().find(|s| s.name == name)
    }

    /// Like [PostgresDatabase::get_schema_mut], failing with the statement that needed the schema.
    pub fn require_schema_mut(&mut self, name: &str, statement: &str) -> Result<&mut PostgresSchema> {
        self.schemas
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| PgDiffError::ObjectNotFound {
                kind: ObjectKind::Schema,
                name: name.to_string(),
                statement: statement.to_string(),
            })
    }

    /// Adds a schema. `public` exists from the start, an explicit `CREATE SCHEMA public` only
    /// fills in its details.
    pub fn add_schema(&mut self, schema: PostgresSchema, statement: &str) -> Result {
        if let Some(existing) = self.get_schema_mut(&schema.name) {
            let untouched = existing.authorization.is_none()
                && existing.definition.is_none()
                && existing.relations.is_empty()
                && existing.sequences.is_empty()
                && existing.functions.is_empty();

            if schema.name == "public" && untouched {
                existing.authorization = schema.authorization;
                existing.definition = schema.definition;
                existing.position = schema.position;
                return Ok(());
            }

            return Err(PgDiffError::DuplicateObject {
                kind: ObjectKind::Schema,
                name: schema.name,
                statement: statement.to_string(),
            });
        }

        self.schemas.push(schema);
        Ok(())
    }

    /// Splits a possibly qualified name into schema and object name, using the default schema
    /// for unqualified names. A leading database name is dropped.
    pub fn resolve_name(&self, qualified_name: &str) -> (String, String) {
        let mut parts = split_qualified_name(qualified_name);
        let name = parts.pop().unwrap_or_default();

        match parts.pop() {
            Some(schema) => (schema, name),
            None => (self.default_schema.clone(), name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_against_the_default_schema() {
        let mut database = PostgresDatabase::default();
        assert_eq!(database.resolve_name("t"), ("public".to_string(), "t".to_string()));
        assert_eq!(
            database.resolve_name("\"Other\".\"T\""),
            ("Other".to_string(), "T".to_string())
        );

        database.default_schema = "app".to_string();
        assert_eq!(database.resolve_name("T"), ("app".to_string(), "t".to_string()));
        assert_eq!(database.resolve_name("db.s.t"), ("s".to_string(), "t".to_string()));
    }

    #[test]
    fn public_may_be_created_explicitly_once() {
        let mut database = PostgresDatabase::default();
        let mut public = PostgresSchema::new("public");
        public.authorization = Some("pg_database_owner".to_string());

        database.add_schema(public.clone(), "CREATE SCHEMA public AUTHORIZATION pg_database_owner").unwrap();
        assert_eq!(database.schemas.len(), 1);
        assert_eq!(database.schemas[0].authorization.as_deref(), Some("pg_database_owner"));

        assert!(database.add_schema(public, "").is_err());
        assert!(database.add_schema(PostgresSchema::new("app"), "").is_ok());
        assert!(database.add_schema(PostgresSchema::new("app"), "").is_err());
    }
}
