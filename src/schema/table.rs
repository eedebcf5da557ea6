use std::collections::BTreeMap;

use crate::{
    SchemaError,
    blueprint::{Blueprint, command::SchemaCommand},
    schema::{
        Directory,
        column::{Column, ColumnEvent},
        index::{Index, IndexKind},
    },
};

/// The in-memory mirror of one database table.
///
/// A table owns its columns (keyed by name) and its indices (in declaration
/// order) and mutates them by interpreting the command stream of a
/// [`Blueprint`]. Registration into the owning database is delegated to a
/// [`Directory`] passed in per batch, so the table never holds a back
/// reference to its container.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: BTreeMap<String, Column>,
    indices: Vec<Index>,
}

impl Table {
    /// Creates an empty table mirror with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            columns: BTreeMap::new(),
            indices: Vec::new(),
        }
    }

    /// The table's current name.
    ///
    /// A `rename` command changes this mid-batch.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// All columns, keyed and ordered by name.
    pub fn columns(&self) -> &BTreeMap<String, Column> {
        &self.columns
    }

    /// All indices, in declaration order.
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    /// Applies one alteration batch, command by command, in order.
    ///
    /// Unknown command names are skipped (newer DSL commands must never
    /// break the mirror). There is no rollback: an error mid-batch leaves
    /// the table partially mutated, and callers should treat that state as
    /// corrupt.
    pub fn apply_blueprint(
        &mut self,
        blueprint: &Blueprint,
        directory: &mut dyn Directory,
    ) -> Result<(), SchemaError> {
        for descriptor in blueprint.commands() {
            let Some(command) = SchemaCommand::from_descriptor(descriptor)? else {
                continue;
            };
            self.run_command(&command, blueprint, directory)?;
        }
        Ok(())
    }

    fn run_command(
        &mut self,
        command: &SchemaCommand,
        blueprint: &Blueprint,
        directory: &mut dyn Directory,
    ) -> Result<(), SchemaError> {
        match command {
            SchemaCommand::Create => {
                directory.set_table(&self.name);
                for definition in blueprint.columns() {
                    self.columns
                        .insert(definition.name.clone(), Column::new(definition));
                }
            }
            SchemaCommand::Add => {
                for definition in blueprint.added_columns() {
                    self.columns
                        .insert(definition.name.clone(), Column::new(definition));
                }
            }
            SchemaCommand::Change => {
                for definition in blueprint.changed_columns() {
                    let column = self.column_mut(&definition.name)?;
                    column.update(definition);
                }
            }
            SchemaCommand::Drop | SchemaCommand::DropIfExists => {
                directory.drop_table(&self.name);
            }
            SchemaCommand::DropColumn { columns } => {
                // Absent names are tolerated; indices referencing a dropped
                // column keep its name (no reverse cascade).
                for name in columns {
                    self.columns.remove(name);
                }
            }
            SchemaCommand::RenameColumn { from, to } => {
                let mut column = self
                    .columns
                    .remove(from)
                    .ok_or_else(|| SchemaError::ColumnNotFound {
                        table: self.name.clone(),
                        column: from.clone(),
                    })?;
                column.notify(&ColumnEvent::Renamed { to: to.clone() });
                self.columns.insert(to.clone(), column);
            }
            SchemaCommand::AddIndex {
                kind,
                name,
                columns,
            } => {
                self.apply_index(name.clone(), *kind, columns.clone());
            }
            SchemaCommand::DropIndex { name } => {
                self.apply_drop_index(name);
            }
            SchemaCommand::RenameIndex { from, to } => {
                self.apply_rename_index(from, to);
            }
            SchemaCommand::Rename { from, to } => {
                directory.drop_table(from);
                self.name = to.clone();
                directory.set_table(to);
            }
        }
        Ok(())
    }

    /// Appends a new index and tells every referenced, currently-existing
    /// column that it now participates in it.
    fn apply_index(&mut self, name: String, kind: IndexKind, columns: Vec<String>) {
        let index = Index::new(name.clone(), kind, columns);
        let event = ColumnEvent::IndexAttached { index: name, kind };
        self.notify_columns(index.columns().to_vec(), &event);
        self.indices.push(index);
    }

    /// Removes the index with the given name, notifying its referenced
    /// columns first. An absent name leaves the index list unchanged.
    fn apply_drop_index(&mut self, name: &str) {
        let Some(position) = self.indices.iter().position(|index| index.name() == name) else {
            return;
        };
        let index = self.indices.remove(position);
        let event = ColumnEvent::IndexDetached {
            index: name.to_owned(),
        };
        self.notify_columns(index.columns().to_vec(), &event);
    }

    /// Renames every index currently called `from` (expected: at most one)
    /// and re-notifies its referenced columns.
    fn apply_rename_index(&mut self, from: &str, to: &str) {
        let event = ColumnEvent::IndexRenamed {
            from: from.to_owned(),
            to: to.to_owned(),
        };
        let mut touched = Vec::new();
        for index in &mut self.indices {
            if index.name() != from {
                continue;
            }
            index.rename(to);
            touched.extend_from_slice(index.columns());
        }
        self.notify_columns(touched, &event);
    }

    /// Delivers one event to each named column that still exists.
    ///
    /// Resolution happens by name at notification time; columns referenced
    /// by an index but already dropped are simply skipped.
    fn notify_columns(&mut self, columns: Vec<String>, event: &ColumnEvent) {
        for name in columns {
            if let Some(column) = self.columns.get_mut(&name) {
                column.notify(event);
            }
        }
    }

    fn column_mut(&mut self, name: &str) -> Result<&mut Column, SchemaError> {
        let table = self.name.clone();
        self.columns
            .get_mut(name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table,
                column: name.to_owned(),
            })
    }
}
