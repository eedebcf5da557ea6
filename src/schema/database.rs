use std::collections::BTreeMap;

use crate::{
    SchemaError,
    blueprint::Blueprint,
    schema::{Directory, table::Table},
};

/// Records the registration calls one table makes over the course of a
/// batch, so the owning [`Database`] can key its map afterwards.
///
/// Only the final outcome matters: the directory is never read mid-batch,
/// so replaying set/drop intents in order collapses to "under which name,
/// if any, is the table registered once the batch ends".
#[derive(Debug)]
struct Registration {
    registered_as: Option<String>,
}

impl Registration {
    fn new(registered_as: Option<String>) -> Self {
        Self { registered_as }
    }
}

impl Directory for Registration {
    fn set_table(&mut self, name: &str) {
        self.registered_as = Some(name.to_owned());
    }

    fn drop_table(&mut self, name: &str) {
        if self.registered_as.as_deref() == Some(name) {
            self.registered_as = None;
        }
    }
}

/// A directory of table mirrors, keyed by table name.
///
/// This is the root of the schema mirror: migration batches are fed in via
/// [`Database::apply_blueprint`], and the documentation consumer enumerates
/// the resulting tables afterwards. Enumeration order is the name order of
/// the underlying `BTreeMap`, so generated output is deterministic.
#[derive(Debug, Default)]
pub struct Database {
    tables: BTreeMap<String, Table>,
}

impl Database {
    /// Creates an empty database mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one table-alteration batch.
    ///
    /// The targeted table is looked up by the blueprint's table name, or
    /// started fresh if this batch creates it. Commands run strictly in
    /// order; an error mid-batch leaves the table partially mutated but
    /// still registered per the commands that did run, so the caller can
    /// inspect (and discard) the corrupt state.
    pub fn apply_blueprint(&mut self, blueprint: &Blueprint) -> Result<(), SchemaError> {
        let name = blueprint.table_name();
        let (mut table, mut registration) = match self.tables.remove(name) {
            Some(table) => (table, Registration::new(Some(name.to_owned()))),
            None => (Table::new(name), Registration::new(None)),
        };

        let result = table.apply_blueprint(blueprint, &mut registration);

        if let Some(registered_as) = registration.registered_as {
            self.tables.insert(registered_as, table);
        }

        result
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// All registered tables, in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// The number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table is registered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blueprint::{ColumnDefinition, PropertyValue},
        schema::index::IndexKind,
    };

    fn create_users(database: &mut Database) {
        let mut blueprint = Blueprint::new("users");
        blueprint
            .create()
            .column(ColumnDefinition::new("id").with_type("bigInteger"))
            .column(ColumnDefinition::new("name").with_type("string"));
        database.apply_blueprint(&blueprint).unwrap();
    }

    #[test]
    fn test_create_registers_table() {
        let mut database = Database::new();
        create_users(&mut database);

        assert_eq!(database.len(), 1);
        let table = database.table("users").unwrap();
        assert_eq!(table.name(), "users");
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_drop_deregisters_table() {
        let mut database = Database::new();
        create_users(&mut database);

        let mut blueprint = Blueprint::new("users");
        blueprint.drop_table();
        database.apply_blueprint(&blueprint).unwrap();

        assert!(database.is_empty());
    }

    #[test]
    fn test_drop_if_exists_on_absent_table_is_noop() {
        let mut database = Database::new();

        let mut blueprint = Blueprint::new("ghosts");
        blueprint.drop_table_if_exists();
        database.apply_blueprint(&blueprint).unwrap();

        assert!(database.is_empty());
    }

    #[test]
    fn test_rename_relocates_directory_entry() {
        let mut database = Database::new();
        create_users(&mut database);

        let mut blueprint = Blueprint::new("users");
        blueprint.rename("members");
        database.apply_blueprint(&blueprint).unwrap();

        assert!(database.table("users").is_none());
        let table = database.table("members").unwrap();
        assert_eq!(table.name(), "members");
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_alter_batch_without_create_keeps_registration() {
        let mut database = Database::new();
        create_users(&mut database);

        let mut blueprint = Blueprint::new("users");
        blueprint
            .add()
            .column(ColumnDefinition::new("email").with_type("string"));
        database.apply_blueprint(&blueprint).unwrap();

        let table = database.table("users").unwrap();
        assert!(table.column("email").is_some());
    }

    #[test]
    fn test_failed_batch_leaves_partial_state_visible() {
        let mut database = Database::new();
        create_users(&mut database);

        let mut blueprint = Blueprint::new("users");
        blueprint
            .add()
            .column(ColumnDefinition::new("email").with_type("string"))
            .rename_column("no_such_column", "other");

        let err = database.apply_blueprint(&blueprint).unwrap_err();
        assert!(matches!(err, SchemaError::ColumnNotFound { .. }));

        // No rollback: the add ran before the failing rename.
        let table = database.table("users").unwrap();
        assert!(table.column("email").is_some());
    }

    #[test]
    fn test_tables_enumerate_in_name_order() {
        let mut database = Database::new();
        for name in ["posts", "comments", "users"] {
            let mut blueprint = Blueprint::new(name);
            blueprint
                .create()
                .column(ColumnDefinition::new("id").with_type("bigInteger"));
            database.apply_blueprint(&blueprint).unwrap();
        }

        let names: Vec<_> = database.tables().map(Table::name).collect();
        assert_eq!(names, vec!["comments", "posts", "users"]);
    }

    #[test]
    fn test_end_to_end_users_scenario() {
        let mut database = Database::new();

        let mut blueprint = Blueprint::new("users");
        blueprint
            .create()
            .column(ColumnDefinition::new("id").with_type("bigInteger"))
            .column(ColumnDefinition::new("name").with_type("string"));
        database.apply_blueprint(&blueprint).unwrap();

        let mut blueprint = Blueprint::new("users");
        blueprint
            .add()
            .column(
                ColumnDefinition::new("email")
                    .with_type("string")
                    .with_property("length", PropertyValue::Int(255)),
            );
        database.apply_blueprint(&blueprint).unwrap();

        let mut blueprint = Blueprint::new("users");
        blueprint.unique("users_email_unique", vec!["email"]);
        database.apply_blueprint(&blueprint).unwrap();

        let mut blueprint = Blueprint::new("users");
        blueprint.drop_column(vec!["name"]);
        database.apply_blueprint(&blueprint).unwrap();

        let table = database.table("users").unwrap();
        let column_names: Vec<_> = table.columns().keys().map(String::as_str).collect();
        assert_eq!(column_names, vec!["email", "id"]);

        let indices = table.indices();
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[0].name(), "users_email_unique");
        assert_eq!(indices[0].kind(), IndexKind::Unique);
        assert_eq!(indices[0].columns(), ["email".to_owned()]);
    }
}
