//! User query builders.

use sea_query::{Expr, OnConflict, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::Users;

/// Insert a user unless the id already exists.
pub fn insert_if_missing(id: &str, username: &str, display_name: &str, created_at: &str) -> Built {
    Query::insert()
        .into_table(Users::Table)
        .columns([Users::Id, Users::Username, Users::DisplayName, Users::CreatedAt])
        .values_panic([
            id.into(),
            username.into(),
            display_name.into(),
            created_at.into(),
        ])
        .on_conflict(OnConflict::column(Users::Id).do_nothing().to_owned())
        .build(SqliteQueryBuilder)
}

/// Display name by user id.
pub fn get_display_name(id: &str) -> Built {
    Query::select()
        .column(Users::DisplayName)
        .from(Users::Table)
        .and_where(Expr::col(Users::Id).eq(id))
        .build(SqliteQueryBuilder)
}
