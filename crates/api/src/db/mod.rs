//! Database schema, migrations, and query builders.
//!
//! Builders return `(sql, values)` pairs; the server binds the values when it
//! executes them.

pub mod chat;
pub mod dashboard;
pub mod interactions;
pub mod migrations;
pub mod news;
pub mod planning;
pub mod tables;
pub mod users;

pub use tables::*;

pub type Built = (String, sea_query::Values);
