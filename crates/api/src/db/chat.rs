//! Chat history query builders.

use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::ChatMessages;

/// Column order must match `chat_from_row()` in the server.
const COLUMNS: [ChatMessages; 5] = [
    ChatMessages::Id,
    ChatMessages::UserId,
    ChatMessages::Content,
    ChatMessages::IsUser,
    ChatMessages::CreatedAt,
];

pub fn insert(user_id: &str, content: &str, is_user: bool, created_at: &str) -> Built {
    Query::insert()
        .into_table(ChatMessages::Table)
        .columns([
            ChatMessages::UserId,
            ChatMessages::Content,
            ChatMessages::IsUser,
            ChatMessages::CreatedAt,
        ])
        .values_panic([
            user_id.into(),
            content.into(),
            is_user.into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn get(id: i64) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(ChatMessages::Table)
        .and_where(Expr::col(ChatMessages::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Most recent `limit` messages for a user, newest first.
///
/// Callers reverse the rows to present the conversation oldest first.
pub fn recent(user_id: &str, limit: u32) -> Built {
    Query::select()
        .columns(COLUMNS)
        .from(ChatMessages::Table)
        .and_where(Expr::col(ChatMessages::UserId).eq(user_id))
        .order_by(ChatMessages::Id, Order::Desc)
        .limit(u64::from(limit))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_orders_by_id_desc_with_limit() {
        let (sql, values) = recent("owner", 20);
        assert!(sql.contains(r#"ORDER BY "id" DESC"#), "{sql}");
        assert!(sql.ends_with("LIMIT ?"), "{sql}");
        assert_eq!(values.0.len(), 2);
    }
}
