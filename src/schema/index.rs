use strum::Display;

/// The kind of constraint or index an [`Index`] entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum IndexKind {
    /// Primary key.
    Primary,

    /// Unique index.
    Unique,

    /// Plain (non-unique) index.
    Index,

    /// Spatial index.
    Spatial,

    /// Foreign key.
    Foreign,
}

/// An index or constraint over an ordered list of column names.
///
/// Only names are stored; the owning table resolves them to live columns at
/// the moment a notification has to be delivered. That keeps the relation
/// non-owning: a column can be dropped without touching the indices that
/// mention it.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    name: String,
    kind: IndexKind,
    columns: Vec<String>,
}

impl Index {
    /// Creates an index entry from an index-creating command's parameters.
    pub fn new(name: String, kind: IndexKind, columns: Vec<String>) -> Self {
        Self {
            name,
            kind,
            columns,
        }
    }

    /// The index name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The kind of index.
    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    /// The referenced column names, in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Adopts a new name in response to a rename-index command.
    ///
    /// The rename command in this DSL carries only a name pair, so the
    /// referenced-column list is left untouched.
    pub(crate) fn rename(&mut self, to: &str) {
        self.name = to.to_owned();
    }
}
