use serde::{Deserialize, Serialize};
use crate::error::{ObjectKind, PgDiffError, Result};
use crate::helpers::comment_literal;
use crate::models::domain::PostgresDomain;
use crate::models::enumeration::PostgresEnum;
use crate::models::extension::PostgresExtension;
use crate::models::function::PostgresFunction;
use crate::models::index::PostgresIndex;
use crate::models::operator::PostgresOperator;
use crate::models::relation::PostgresRelation;
use crate::models::sequence::PostgresSequence;
use crate::quoting::Quotable;
use crate::source_position::SourcePosition;

#[derive(Debug, Eq, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct PostgresSchema {
    pub name: String,
    pub authorization: Option<String>,
    /// Schema elements written after the name in `CREATE SCHEMA`, kept verbatim.
    pub definition: Option<String>,
    pub owner: Option<String>,
    pub comment: Option<String>,
    pub relations: Vec<PostgresRelation>,
    pub sequences: Vec<PostgresSequence>,
    /// Keyed by [PostgresFunction::signature], overloads are separate entries.
    pub functions: Vec<PostgresFunction>,
    /// Keyed by [PostgresOperator::signature].
    pub operators: Vec<PostgresOperator>,
    pub enums: Vec<PostgresEnum>,
    pub domains: Vec<PostgresDomain>,
    pub extensions: Vec<PostgresExtension>,
    /// `GRANT ... ON SCHEMA` statements, kept verbatim.
    pub grants: Vec<String>,
    pub position: SourcePosition,
}

impl PostgresSchema {
    pub fn new(name: &str) -> Self {
        PostgresSchema {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn get_relation(&self, name: &str) -> Option<&PostgresRelation> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn get_relation_mut(&mut self, name: &str) -> Option<&mut PostgresRelation> {
        self.relations.iter_mut().find(|r| r.name == name)
    }

    pub fn get_sequence(&self, name: &str) -> Option<&PostgresSequence> {
        self.sequences.iter().find(|s| s.name == name)
    }

    pub fn get_sequence_mut(&mut self, name: &str) -> Option<&mut PostgresSequence> {
        self.sequences.iter_mut().find(|s| s.name == name)
    }

    pub fn get_function(&self, signature: &str) -> Option<&PostgresFunction> {
        self.functions.iter().find(|f| f.signature() == signature)
    }

    pub fn get_function_mut(&mut self, signature: &str) -> Option<&mut PostgresFunction> {
        self.functions.iter_mut().find(|f| f.signature() == signature)
    }

    pub fn get_operator(&self, signature: &str) -> Option<&PostgresOperator> {
        self.operators.iter().find(|o| o.signature() == signature)
    }

    pub fn get_operator_mut(&mut self, signature: &str) -> Option<&mut PostgresOperator> {
        self.operators.iter_mut().find(|o| o.signature() == signature)
    }

    pub fn get_enum(&self, name: &str) -> Option<&PostgresEnum> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn get_enum_mut(&mut self, name: &str) -> Option<&mut PostgresEnum> {
        self.enums.iter_mut().find(|e| e.name == name)
    }

    pub fn get_domain(&self, name: &str) -> Option<&PostgresDomain> {
        self.domains.iter().find(|d| d.name == name)
    }

    pub fn get_domain_mut(&mut self, name: &str) -> Option<&mut PostgresDomain> {
        self.domains.iter_mut().find(|d| d.name == name)
    }

    pub fn get_extension(&self, name: &str) -> Option<&PostgresExtension> {
        self.extensions.iter().find(|e| e.name == name)
    }

    pub fn get_extension_mut(&mut self, name: &str) -> Option<&mut PostgresExtension> {
        self.extensions.iter_mut().find(|e| e.name == name)
    }

    /// Indexes belong to their relation, but their names are unique in the whole schema.
    pub fn find_index(&self, name: &str) -> Option<(&PostgresRelation, &PostgresIndex)> {
        self.relations
            .iter()
            .find_map(|r| r.get_index(name).map(|i| (r, i)))
    }

    pub fn find_index_mut(&mut self, name: &str) -> Option<&mut PostgresIndex> {
        self.relations
            .iter_mut()
            .find_map(|r| r.indexes.iter_mut().find(|i| i.name == name))
    }

    pub fn add_relation(&mut self, relation: PostgresRelation, statement: &str) -> Result {
        if self.get_relation(&relation.name).is_some() || self.get_sequence(&relation.name).is_some() {
            return Err(duplicate(ObjectKind::Relation, &relation.name, statement));
        }

        self.relations.push(relation);
        Ok(())
    }

    pub fn add_sequence(&mut self, sequence: PostgresSequence, statement: &str) -> Result {
        if self.get_relation(&sequence.name).is_some() || self.get_sequence(&sequence.name).is_some() {
            return Err(duplicate(ObjectKind::Sequence, &sequence.name, statement));
        }

        self.sequences.push(sequence);
        Ok(())
    }

    pub fn add_index(&mut self, index: PostgresIndex, statement: &str) -> Result {
        if self.find_index(&index.name).is_some() {
            return Err(duplicate(ObjectKind::Index, &index.name, statement));
        }

        let relation = self
            .get_relation_mut(&index.relation_name)
            .ok_or_else(|| PgDiffError::ObjectNotFound {
                kind: ObjectKind::Relation,
                name: index.relation_name.clone(),
                statement: statement.to_string(),
            })?;

        relation.indexes.push(index);
        Ok(())
    }

    /// Adds a function. With `replace` an existing function with the same signature is
    /// replaced, as `CREATE OR REPLACE` does.
    pub fn add_function(&mut self, function: PostgresFunction, replace: bool, statement: &str) -> Result {
        let signature = function.signature();

        match self.functions.iter().position(|f| f.signature() == signature) {
            Some(position) if replace => {
                self.functions[position] = function;
                Ok(())
            }
            Some(_) => Err(duplicate(ObjectKind::Function, &signature, statement)),
            None => {
                self.functions.push(function);
                Ok(())
            }
        }
    }

    pub fn add_operator(&mut self, operator: PostgresOperator, statement: &str) -> Result {
        let signature = operator.signature();
        if self.get_operator(&signature).is_some() {
            return Err(duplicate(ObjectKind::Operator, &signature, statement));
        }

        self.operators.push(operator);
        Ok(())
    }

    /// Composite types, enums and domains share one namespace.
    fn type_name_taken(&self, name: &str) -> bool {
        self.get_enum(name).is_some()
            || self.get_domain(name).is_some()
            || self.get_relation(name).is_some()
    }

    pub fn add_enum(&mut self, enumeration: PostgresEnum, statement: &str) -> Result {
        if self.type_name_taken(&enumeration.name) {
            return Err(duplicate(ObjectKind::Type, &enumeration.name, statement));
        }

        self.enums.push(enumeration);
        Ok(())
    }

    pub fn add_domain(&mut self, domain: PostgresDomain, statement: &str) -> Result {
        if self.type_name_taken(&domain.name) {
            return Err(duplicate(ObjectKind::Domain, &domain.name, statement));
        }

        self.domains.push(domain);
        Ok(())
    }

    pub fn add_extension(&mut self, extension: PostgresExtension, statement: &str) -> Result {
        if self.get_extension(&extension.name).is_some() {
            return Err(duplicate(ObjectKind::Extension, &extension.name, statement));
        }

        self.extensions.push(extension);
        Ok(())
    }

    pub fn get_create_statement(&self, if_not_exists: bool) -> String {
        let mut sql = "CREATE SCHEMA ".to_string();

        if if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }

        sql.push_str(&self.name.quote());

        if let Some(authorization) = &self.authorization {
            sql.push_str(" AUTHORIZATION ");
            sql.push_str(authorization);
        }

        if let Some(definition) = &self.definition {
            sql.push(' ');
            sql.push_str(definition);
        }

        sql.push(';');
        sql
    }

    pub fn get_drop_statement(&self, if_exists: bool) -> String {
        format!(
            "DROP SCHEMA {}{} CASCADE;",
            if if_exists { "IF EXISTS " } else { "" },
            self.name.quote()
        )
    }

    pub fn get_owner_statement(&self, owner: &str) -> String {
        format!("ALTER SCHEMA {} OWNER TO {};", self.name.quote(), owner)
    }

    pub fn get_comment_statement(&self) -> String {
        format!(
            "COMMENT ON SCHEMA {} IS {};",
            self.name.quote(),
            comment_literal(&self.comment)
        )
    }
}

fn duplicate(kind: ObjectKind, name: &str, statement: &str) -> PgDiffError {
    PgDiffError::DuplicateObject {
        kind,
        name: name.to_string(),
        statement: statement.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::relation::RelationKind;
    use crate::models::table::TableDetails;

    fn table(name: &str) -> PostgresRelation {
        PostgresRelation::new(name, RelationKind::Table(TableDetails::default()))
    }

    #[test]
    fn relation_names_are_unique() {
        let mut schema = PostgresSchema::new("public");
        schema.add_relation(table("t"), "CREATE TABLE t ()").unwrap();

        let result = schema.add_relation(table("t"), "CREATE TABLE t (a int)");
        assert!(matches!(
            result,
            Err(PgDiffError::DuplicateObject { kind: ObjectKind::Relation, ref name, .. }) if name == "t"
        ));
    }

    #[test]
    fn indexes_are_found_across_relations() {
        let mut schema = PostgresSchema::new("public");
        schema.add_relation(table("a"), "").unwrap();
        schema.add_relation(table("b"), "").unwrap();

        let index = PostgresIndex {
            name: "b_idx".to_string(),
            relation_name: "b".to_string(),
            definition: "USING btree (x)".to_string(),
            ..Default::default()
        };
        schema.add_index(index.clone(), "").unwrap();

        let (relation, found) = schema.find_index("b_idx").unwrap();
        assert_eq!(relation.name, "b");
        assert_eq!(found, &index);
        assert!(schema.add_index(index, "").is_err());
    }

    #[test]
    fn create_statement() {
        let schema = PostgresSchema {
            name: "Sales".to_string(),
            authorization: Some("admin".to_string()),
            ..Default::default()
        };

        assert_eq!(schema.get_create_statement(true), "CREATE SCHEMA IF NOT EXISTS \"Sales\" AUTHORIZATION admin;");
        assert_eq!(schema.get_drop_statement(false), "DROP SCHEMA \"Sales\" CASCADE;");
    }
}
