//! News article query builders.

use sea_query::{Expr, OnConflict, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::NewsArticles;

pub struct UpsertParams<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub source: &'a str,
    pub image_url: Option<&'a str>,
    pub category: &'a str,
    pub relevance: i64,
    pub sentiment: &'a str,
    pub published_at: &'a str,
    pub created_at: &'a str,
}

/// Insert an article, or refresh the stored copy when the url is known.
///
/// `created_at` is kept from the first insert.
pub fn upsert(p: &UpsertParams<'_>) -> Built {
    Query::insert()
        .into_table(NewsArticles::Table)
        .columns([
            NewsArticles::Title,
            NewsArticles::Description,
            NewsArticles::Url,
            NewsArticles::Source,
            NewsArticles::ImageUrl,
            NewsArticles::Category,
            NewsArticles::Relevance,
            NewsArticles::Sentiment,
            NewsArticles::PublishedAt,
            NewsArticles::CreatedAt,
        ])
        .values_panic([
            p.title.into(),
            p.description.into(),
            p.url.into(),
            p.source.into(),
            p.image_url.map(str::to_string).into(),
            p.category.into(),
            p.relevance.into(),
            p.sentiment.into(),
            p.published_at.into(),
            p.created_at.into(),
        ])
        .on_conflict(
            OnConflict::column(NewsArticles::Url)
                .update_columns([
                    NewsArticles::Title,
                    NewsArticles::Description,
                    NewsArticles::Source,
                    NewsArticles::ImageUrl,
                    NewsArticles::Category,
                    NewsArticles::Relevance,
                    NewsArticles::Sentiment,
                    NewsArticles::PublishedAt,
                ])
                .to_owned(),
        )
        .build(SqliteQueryBuilder)
}

/// Newest first, optionally restricted to one category.
/// Column order matches `news_from_row()`.
pub fn list(category: Option<&str>, limit: u32) -> Built {
    let mut q = Query::select()
        .columns([
            NewsArticles::Id,
            NewsArticles::Title,
            NewsArticles::Description,
            NewsArticles::Url,
            NewsArticles::Source,
            NewsArticles::ImageUrl,
            NewsArticles::Category,
            NewsArticles::Relevance,
            NewsArticles::Sentiment,
            NewsArticles::PublishedAt,
            NewsArticles::CreatedAt,
        ])
        .from(NewsArticles::Table)
        .to_owned();
    if let Some(category) = category {
        q.and_where(Expr::col(NewsArticles::Category).eq(category));
    }
    q.order_by(NewsArticles::PublishedAt, Order::Desc)
        .order_by(NewsArticles::Id, Order::Desc)
        .limit(u64::from(limit))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_updates_on_url_conflict() {
        let (sql, values) = upsert(&UpsertParams {
            title: "Safra recorde",
            description: "",
            url: "https://example.com/a",
            source: "Agro",
            image_url: None,
            category: "farm",
            relevance: 35,
            sentiment: "positive",
            published_at: "2026-10-19T00:00:00.000Z",
            created_at: "2026-10-19T00:00:00.000Z",
        });
        assert!(sql.contains(r#"ON CONFLICT ("url") DO UPDATE SET"#), "{sql}");
        assert!(!sql.contains(r#""created_at" = "excluded"."created_at""#), "{sql}");
        assert_eq!(values.0.len(), 10);
    }

    #[test]
    fn list_filters_only_when_category_given() {
        let (all, _) = list(None, 50);
        let (farm, values) = list(Some("farm"), 50);
        assert!(!all.contains("WHERE"));
        assert!(farm.contains(r#"WHERE "category" = ?"#), "{farm}");
        assert_eq!(values.0.len(), 2);
    }
}
