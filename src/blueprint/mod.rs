use std::collections::BTreeMap;

use crate::blueprint::command::CommandDescriptor;

pub(crate) mod command;

/// The value of a single declared column property.
///
/// Migration declarations carry a small set of shapes: type names and
/// defaults as text, lengths and precisions as integers, flags like
/// `nullable` or `unsigned` as booleans, and the occasional explicit NULL
/// default.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A textual property, e.g. a type name or a string default.
    Text(String),

    /// An integer property, e.g. a VARCHAR length or a numeric default.
    Int(i64),

    /// A floating-point property, e.g. a decimal default.
    Float(f64),

    /// A flag property, e.g. `nullable` or `autoIncrement`.
    Bool(bool),

    /// An explicit NULL, e.g. a NULL default.
    Null,
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "{}", s),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Null => write!(f, "NULL"),
        }
    }
}

/// The DSL-side declaration of one column.
///
/// A declaration is a name plus an open bag of properties; the mirror does
/// not interpret the bag beyond storing it for the documentation consumer.
/// The `change` flag marks declarations that re-define an existing column,
/// so one declaration list can serve both the "added" and "changed" views
/// of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// The column name.
    pub name: String,

    /// Declared properties (type, length, nullable, default, ...).
    pub properties: BTreeMap<String, PropertyValue>,

    /// Whether this declaration changes an existing column rather than
    /// adding a new one.
    pub change: bool,
}

impl ColumnDefinition {
    /// Creates a declaration for a new column.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            properties: BTreeMap::new(),
            change: false,
        }
    }

    /// Sets a declared property, builder style.
    pub fn with_property(mut self, key: &str, value: PropertyValue) -> Self {
        self.properties.insert(key.to_owned(), value);
        self
    }

    /// Shorthand for declaring the column type as a textual property.
    pub fn with_type(self, type_name: &str) -> Self {
        self.with_property("type", PropertyValue::Text(type_name.to_owned()))
    }

    /// Marks this declaration as changing an existing column.
    pub fn changing(mut self) -> Self {
        self.change = true;
        self
    }
}

/// One table-alteration batch: the commands and column declarations that
/// logically belong to a single schema-definition statement.
///
/// A `Blueprint` is what the schema-definition DSL hands to the mirror. The
/// builder methods below stand in for that DSL so batches can be assembled
/// programmatically; actually parsing migration files is out of scope.
#[derive(Debug, Clone, Default)]
pub struct Blueprint {
    table: String,
    commands: Vec<CommandDescriptor>,
    columns: Vec<ColumnDefinition>,
}

impl Blueprint {
    /// Starts an empty batch for the named table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            commands: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// The table this batch targets.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// The raw commands of this batch, in the order they were issued.
    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Every column declared in this batch.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter()
    }

    /// Columns this batch adds (declarations without the change flag).
    pub fn added_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|column| !column.change)
    }

    /// Columns this batch re-defines (declarations with the change flag).
    pub fn changed_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|column| column.change)
    }

    /// Appends a raw command descriptor.
    ///
    /// This is the seam the DSL collaborator drives; the named builder
    /// methods below all funnel through it.
    pub fn push_command(&mut self, descriptor: CommandDescriptor) -> &mut Self {
        self.commands.push(descriptor);
        self
    }

    /// Declares a column as part of this batch.
    pub fn column(&mut self, definition: ColumnDefinition) -> &mut Self {
        self.columns.push(definition);
        self
    }

    /// Declares a column change as part of this batch.
    pub fn change_column(&mut self, definition: ColumnDefinition) -> &mut Self {
        self.columns.push(definition.changing());
        self
    }

    /// Marks this batch as creating the table.
    pub fn create(&mut self) -> &mut Self {
        self.push_command(CommandDescriptor::new("create"))
    }

    /// Marks this batch as adding its declared columns to an existing table.
    pub fn add(&mut self) -> &mut Self {
        self.push_command(CommandDescriptor::new("add"))
    }

    /// Marks this batch as applying its changed-column declarations.
    pub fn change(&mut self) -> &mut Self {
        self.push_command(CommandDescriptor::new("change"))
    }

    /// Drops the table.
    pub fn drop_table(&mut self) -> &mut Self {
        self.push_command(CommandDescriptor::new("drop"))
    }

    /// Drops the table, tolerating absence upstream.
    pub fn drop_table_if_exists(&mut self) -> &mut Self {
        self.push_command(CommandDescriptor::new("dropIfExists"))
    }

    /// Drops the named columns.
    pub fn drop_column<S: Into<String>>(&mut self, columns: Vec<S>) -> &mut Self {
        self.push_command(CommandDescriptor::new("dropColumn").with_list("columns", columns))
    }

    /// Renames a column.
    pub fn rename_column(&mut self, from: &str, to: &str) -> &mut Self {
        self.push_command(
            CommandDescriptor::new("renameColumn")
                .with_text("from", from)
                .with_text("to", to),
        )
    }

    /// Adds a primary key over the named columns.
    pub fn primary<S: Into<String>>(&mut self, name: &str, columns: Vec<S>) -> &mut Self {
        self.index_command("primary", name, columns)
    }

    /// Adds a unique index over the named columns.
    pub fn unique<S: Into<String>>(&mut self, name: &str, columns: Vec<S>) -> &mut Self {
        self.index_command("unique", name, columns)
    }

    /// Adds a plain index over the named columns.
    pub fn index<S: Into<String>>(&mut self, name: &str, columns: Vec<S>) -> &mut Self {
        self.index_command("index", name, columns)
    }

    /// Adds a spatial index over the named columns.
    pub fn spatial_index<S: Into<String>>(&mut self, name: &str, columns: Vec<S>) -> &mut Self {
        self.index_command("spatialIndex", name, columns)
    }

    /// Adds a foreign key over the named columns.
    pub fn foreign<S: Into<String>>(&mut self, name: &str, columns: Vec<S>) -> &mut Self {
        self.index_command("foreign", name, columns)
    }

    /// Drops the named primary key.
    pub fn drop_primary(&mut self, name: &str) -> &mut Self {
        self.drop_index_command("dropPrimary", name)
    }

    /// Drops the named unique index.
    pub fn drop_unique(&mut self, name: &str) -> &mut Self {
        self.drop_index_command("dropUnique", name)
    }

    /// Drops the named index.
    pub fn drop_index(&mut self, name: &str) -> &mut Self {
        self.drop_index_command("dropIndex", name)
    }

    /// Drops the named spatial index.
    pub fn drop_spatial_index(&mut self, name: &str) -> &mut Self {
        self.drop_index_command("dropSpatialIndex", name)
    }

    /// Drops the named foreign key.
    pub fn drop_foreign(&mut self, name: &str) -> &mut Self {
        self.drop_index_command("dropForeign", name)
    }

    /// Renames an index.
    pub fn rename_index(&mut self, from: &str, to: &str) -> &mut Self {
        self.push_command(
            CommandDescriptor::new("renameIndex")
                .with_text("from", from)
                .with_text("to", to),
        )
    }

    /// Renames the table itself.
    pub fn rename(&mut self, to: &str) -> &mut Self {
        let from = self.table.clone();
        self.push_command(
            CommandDescriptor::new("rename")
                .with_text("from", from)
                .with_text("to", to),
        )
    }

    fn index_command<S: Into<String>>(
        &mut self,
        command: &str,
        name: &str,
        columns: Vec<S>,
    ) -> &mut Self {
        self.push_command(
            CommandDescriptor::new(command)
                .with_text("index", name)
                .with_list("columns", columns),
        )
    }

    fn drop_index_command(&mut self, command: &str, name: &str) -> &mut Self {
        self.push_command(CommandDescriptor::new(command).with_text("index", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_added_and_changed_views_split_one_list() {
        let mut blueprint = Blueprint::new("users");
        blueprint
            .column(ColumnDefinition::new("id").with_type("bigInteger"))
            .change_column(ColumnDefinition::new("name").with_type("text"));

        let added: Vec<_> = blueprint.added_columns().map(|c| c.name.as_str()).collect();
        let changed: Vec<_> = blueprint
            .changed_columns()
            .map(|c| c.name.as_str())
            .collect();

        assert_eq!(added, vec!["id"]);
        assert_eq!(changed, vec!["name"]);
        assert_eq!(blueprint.columns().count(), 2);
    }

    #[test]
    fn test_builder_preserves_command_order() {
        let mut blueprint = Blueprint::new("users");
        blueprint
            .create()
            .unique("users_email_unique", vec!["email"])
            .drop_column(vec!["name"]);

        let names: Vec<_> = blueprint
            .commands()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["create", "unique", "dropColumn"]);
    }

    #[test]
    fn test_rename_records_current_table_name() {
        let mut blueprint = Blueprint::new("users");
        blueprint.rename("members");

        let command = &blueprint.commands()[0];
        assert_eq!(command.name, "rename");
        assert_eq!(
            command.params.get("from"),
            Some(&crate::ParamValue::Text("users".to_owned()))
        );
        assert_eq!(
            command.params.get("to"),
            Some(&crate::ParamValue::Text("members".to_owned()))
        );
    }
}
