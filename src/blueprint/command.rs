use std::{collections::BTreeMap, str::FromStr};

use strum::EnumString;

use crate::{SchemaError, schema::index::IndexKind};

/// A raw schema-change command as delivered by the schema-definition DSL.
///
/// Commands arrive as a name plus a heterogeneous bag of named parameters.
/// The dispatcher never interprets descriptors directly; it converts them to
/// [`SchemaCommand`] first so handlers match on a closed, typed set.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescriptor {
    /// The DSL-side command name, e.g. `"renameColumn"` or `"dropIfExists"`.
    pub name: String,

    /// Named parameters carried by this command.
    pub params: BTreeMap<String, ParamValue>,
}

/// A single command parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A single name, e.g. an index name or a rename target.
    Text(String),

    /// An ordered list of names, e.g. the columns an index covers.
    List(Vec<String>),
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Adds a single-name parameter, builder style.
    pub fn with_text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params
            .insert(key.to_owned(), ParamValue::Text(value.into()));
        self
    }

    /// Adds a name-list parameter, builder style.
    pub fn with_list<S: Into<String>>(mut self, key: &str, values: Vec<S>) -> Self {
        self.params.insert(
            key.to_owned(),
            ParamValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Extracts a required single-name parameter.
    ///
    /// A missing key or a list where a name was expected is a malformed
    /// command from the upstream DSL, reported as a parameter error.
    fn require_text(&self, key: &'static str) -> Result<String, SchemaError> {
        match self.params.get(key) {
            Some(ParamValue::Text(value)) => Ok(value.clone()),
            Some(ParamValue::List(_)) => Err(SchemaError::InvalidParameter {
                command: self.name.clone(),
                parameter: key,
            }),
            None => Err(SchemaError::MissingParameter {
                command: self.name.clone(),
                parameter: key,
            }),
        }
    }

    /// Extracts a required name-list parameter.
    fn require_list(&self, key: &'static str) -> Result<Vec<String>, SchemaError> {
        match self.params.get(key) {
            Some(ParamValue::List(values)) => Ok(values.clone()),
            Some(ParamValue::Text(_)) => Err(SchemaError::InvalidParameter {
                command: self.name.clone(),
                parameter: key,
            }),
            None => Err(SchemaError::MissingParameter {
                command: self.name.clone(),
                parameter: key,
            }),
        }
    }
}

/// Command names the mirror understands.
///
/// Matching is case-insensitive, so the DSL's camelCase names
/// (`dropIfExists`, `renameColumn`, ...) resolve to these variants directly.
/// Names that fail to parse are unknown commands and are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum CommandKind {
    Create,
    Add,
    Change,
    Drop,
    DropIfExists,
    DropColumn,
    RenameColumn,

    Primary,
    Unique,
    Index,
    SpatialIndex,
    Foreign,

    DropPrimary,
    DropUnique,
    DropIndex,
    DropSpatialIndex,
    DropForeign,

    RenameIndex,
    Rename,
}

/// A schema-change command in typed form, ready for dispatch.
///
/// The five index-creating command names collapse into [`AddIndex`] with the
/// kind carried alongside, and the five drop-*-index names collapse into
/// [`DropIndex`], mirroring how they share one procedure downstream.
///
/// [`AddIndex`]: SchemaCommand::AddIndex
/// [`DropIndex`]: SchemaCommand::DropIndex
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaCommand {
    /// Register the table and materialize every declared column.
    Create,

    /// Materialize the batch's newly added columns.
    Add,

    /// Re-declare existing columns with new property bags.
    Change,

    /// Deregister the table from its database.
    Drop,

    /// Deregister the table from its database (tolerant variant upstream;
    /// identical effect on the mirror).
    DropIfExists,

    /// Remove the named columns from the table.
    DropColumn { columns: Vec<String> },

    /// Move a column to a new name.
    RenameColumn { from: String, to: String },

    /// Append an index over the named columns.
    AddIndex {
        kind: IndexKind,
        name: String,
        columns: Vec<String>,
    },

    /// Remove the index with the given name, if present.
    DropIndex { name: String },

    /// Rename the index currently called `from`.
    RenameIndex { from: String, to: String },

    /// Rename the table itself, relocating its database registration.
    Rename { from: String, to: String },
}

impl SchemaCommand {
    /// Converts a raw descriptor into a typed command.
    ///
    /// Returns `Ok(None)` when the command name is not one the mirror
    /// tracks; unknown commands are a deliberate no-op so that newer DSL
    /// commands never break documentation generation. A known name with
    /// missing or malformed parameters is an error: batches originate from
    /// a trusted DSL and are assumed well-formed.
    pub fn from_descriptor(descriptor: &CommandDescriptor) -> Result<Option<Self>, SchemaError> {
        let Ok(kind) = CommandKind::from_str(&descriptor.name) else {
            return Ok(None);
        };

        let command = match kind {
            CommandKind::Create => Self::Create,
            CommandKind::Add => Self::Add,
            CommandKind::Change => Self::Change,
            CommandKind::Drop => Self::Drop,
            CommandKind::DropIfExists => Self::DropIfExists,
            CommandKind::DropColumn => Self::DropColumn {
                columns: descriptor.require_list("columns")?,
            },
            CommandKind::RenameColumn => Self::RenameColumn {
                from: descriptor.require_text("from")?,
                to: descriptor.require_text("to")?,
            },
            CommandKind::Primary => Self::add_index(descriptor, IndexKind::Primary)?,
            CommandKind::Unique => Self::add_index(descriptor, IndexKind::Unique)?,
            CommandKind::Index => Self::add_index(descriptor, IndexKind::Index)?,
            CommandKind::SpatialIndex => Self::add_index(descriptor, IndexKind::Spatial)?,
            CommandKind::Foreign => Self::add_index(descriptor, IndexKind::Foreign)?,
            CommandKind::DropPrimary
            | CommandKind::DropUnique
            | CommandKind::DropIndex
            | CommandKind::DropSpatialIndex
            | CommandKind::DropForeign => Self::DropIndex {
                name: descriptor.require_text("index")?,
            },
            CommandKind::RenameIndex => Self::RenameIndex {
                from: descriptor.require_text("from")?,
                to: descriptor.require_text("to")?,
            },
            CommandKind::Rename => Self::Rename {
                from: descriptor.require_text("from")?,
                to: descriptor.require_text("to")?,
            },
        };

        Ok(Some(command))
    }

    fn add_index(descriptor: &CommandDescriptor, kind: IndexKind) -> Result<Self, SchemaError> {
        Ok(Self::AddIndex {
            kind,
            name: descriptor.require_text("index")?,
            columns: descriptor.require_list("columns")?,
        })
    }
}
