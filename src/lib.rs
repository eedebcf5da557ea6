pub(crate) mod blueprint;
pub(crate) mod common;
pub(crate) mod schema;

pub use blueprint::{
    Blueprint, ColumnDefinition, PropertyValue,
    command::{CommandDescriptor, ParamValue, SchemaCommand},
};
pub use common::error::SchemaError;
pub use schema::{
    Directory,
    column::{Column, ColumnEvent},
    database::Database,
    index::{Index, IndexKind},
    table::Table,
};
