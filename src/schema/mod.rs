pub mod column;
pub mod database;
pub mod index;
pub mod table;

/// The directory surface a table uses to register or remove itself while
/// processing schema commands.
///
/// A table only ever touches its own entry and never enumerates its peers,
/// so the surface carries names alone. [`Database`](database::Database)
/// interprets the calls a table makes during one batch and keys its table
/// map accordingly.
pub trait Directory {
    /// Registers (or overwrites) the entry for `name`.
    fn set_table(&mut self, name: &str);

    /// Removes the entry for `name`. Absent names are a no-op.
    fn drop_table(&mut self, name: &str);
}
