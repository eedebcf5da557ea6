use std::collections::{BTreeMap, BTreeSet};

use crate::{
    blueprint::{ColumnDefinition, PropertyValue},
    schema::index::IndexKind,
};

/// A notification delivered to a column when something it participates in
/// changes.
///
/// This replaces the untyped "pass the whole command along" hook of looser
/// designs: each variant carries exactly the fields the column needs, and
/// [`Column::notify`] matches them exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEvent {
    /// The column itself was renamed.
    Renamed { to: String },

    /// A new index now references this column.
    IndexAttached { index: String, kind: IndexKind },

    /// An index referencing this column was dropped.
    IndexDetached { index: String },

    /// An index referencing this column was renamed.
    IndexRenamed { from: String, to: String },
}

/// A named attribute of a table.
///
/// Stores the declared property bag verbatim for the documentation consumer,
/// plus the set of index names the column currently participates in, which
/// is maintained through [`ColumnEvent`] notifications from the owning table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    properties: BTreeMap<String, PropertyValue>,
    indexes: BTreeSet<String>,
}

impl Column {
    /// Materializes a column from its DSL-side declaration.
    pub fn new(definition: &ColumnDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            properties: definition.properties.clone(),
            indexes: BTreeSet::new(),
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reads a single declared property.
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// The full declared property bag.
    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    /// Names of the indices this column currently participates in.
    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.iter().map(String::as_str)
    }

    /// Whether any index currently references this column.
    pub fn is_indexed(&self) -> bool {
        !self.indexes.is_empty()
    }

    /// Replaces the property bag with a newly supplied definition.
    ///
    /// Used by the `change` command; the column's identity (and its index
    /// participation) is preserved, only the declaration is swapped.
    pub(crate) fn update(&mut self, definition: &ColumnDefinition) {
        self.properties = definition.properties.clone();
    }

    /// Applies a notification from the owning table.
    pub(crate) fn notify(&mut self, event: &ColumnEvent) {
        match event {
            ColumnEvent::Renamed { to } => {
                self.name = to.clone();
            }
            ColumnEvent::IndexAttached { index, .. } => {
                self.indexes.insert(index.clone());
            }
            ColumnEvent::IndexDetached { index } => {
                self.indexes.remove(index);
            }
            ColumnEvent::IndexRenamed { from, to } => {
                if self.indexes.remove(from) {
                    self.indexes.insert(to.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_column() -> Column {
        Column::new(
            &ColumnDefinition::new("email")
                .with_type("string")
                .with_property("length", PropertyValue::Int(255)),
        )
    }

    #[test]
    fn test_new_copies_declaration() {
        let column = email_column();

        assert_eq!(column.name(), "email");
        assert_eq!(
            column.property("type"),
            Some(&PropertyValue::Text("string".to_owned()))
        );
        assert_eq!(column.property("length"), Some(&PropertyValue::Int(255)));
        assert!(!column.is_indexed());
    }

    #[test]
    fn test_update_replaces_property_bag() {
        let mut column = email_column();

        column.update(&ColumnDefinition::new("email").with_type("text"));

        assert_eq!(
            column.property("type"),
            Some(&PropertyValue::Text("text".to_owned()))
        );
        // The old bag is gone entirely, not merged.
        assert_eq!(column.property("length"), None);
    }

    #[test]
    fn test_rename_event_changes_name() {
        let mut column = email_column();

        column.notify(&ColumnEvent::Renamed {
            to: "mail".to_owned(),
        });

        assert_eq!(column.name(), "mail");
    }

    #[test]
    fn test_index_participation_bookkeeping() {
        let mut column = email_column();

        column.notify(&ColumnEvent::IndexAttached {
            index: "users_email_unique".to_owned(),
            kind: IndexKind::Unique,
        });
        assert!(column.is_indexed());
        assert_eq!(
            column.index_names().collect::<Vec<_>>(),
            vec!["users_email_unique"]
        );

        column.notify(&ColumnEvent::IndexRenamed {
            from: "users_email_unique".to_owned(),
            to: "users_mail_unique".to_owned(),
        });
        assert_eq!(
            column.index_names().collect::<Vec<_>>(),
            vec!["users_mail_unique"]
        );

        column.notify(&ColumnEvent::IndexDetached {
            index: "users_mail_unique".to_owned(),
        });
        assert!(!column.is_indexed());
    }

    #[test]
    fn test_rename_of_unrelated_index_is_ignored() {
        let mut column = email_column();

        column.notify(&ColumnEvent::IndexRenamed {
            from: "users_name_index".to_owned(),
            to: "users_fullname_index".to_owned(),
        });

        assert!(!column.is_indexed());
    }
}
