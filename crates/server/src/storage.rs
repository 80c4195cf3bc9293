use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::types::{Type, Value as SqlValue};
use rusqlite::{Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

use jarvis_api::db::{self, Built};
use jarvis_api::{
    AiInteraction, BusinessStats, BusinessSuggestion, ChatMessage, CreditOpportunity,
    DEFAULT_USER_ID, EnhancedTask, MetaAd, NewsArticle, StrategicDecision, timestamp,
};
use jarvis_core::assistant::Intent;
use jarvis_core::{mock, news};

/// Shared database state
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Initialize the database: open connection, enable WAL, run migrations,
/// insert seed rows on first start.
pub fn init_db(data_dir: &Path) -> Result<Db> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("jarvis.db");
    let conn = Connection::open(&db_path).context("opening SQLite database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;

    run_migrations(&conn)?;
    seed(&conn, Utc::now())?;

    Ok(Db {
        conn: Arc::new(Mutex::new(conn)),
    })
}

fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in db::migrations::MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !already_applied {
            conn.execute_batch(sql)
                .with_context(|| format!("running migration {name}"))?;
            conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])?;
            tracing::info!("applied migration: {name}");
        }
    }

    Ok(())
}

// ── sea-query execution ────────────────────────────────────────────────────

fn bind_values(values: &sea_query::Values) -> Vec<SqlValue> {
    values
        .0
        .iter()
        .map(|v| match v {
            sea_query::Value::Bool(Some(b)) => SqlValue::Integer(i64::from(*b)),
            sea_query::Value::Int(Some(i)) => SqlValue::Integer(i64::from(*i)),
            sea_query::Value::BigInt(Some(i)) => SqlValue::Integer(*i),
            sea_query::Value::Unsigned(Some(u)) => SqlValue::Integer(i64::from(*u)),
            sea_query::Value::BigUnsigned(Some(u)) => {
                SqlValue::Integer(i64::try_from(*u).unwrap_or(i64::MAX))
            }
            sea_query::Value::Float(Some(f)) => SqlValue::Real(f64::from(*f)),
            sea_query::Value::Double(Some(f)) => SqlValue::Real(*f),
            sea_query::Value::String(Some(s)) => SqlValue::Text(s.as_str().to_owned()),
            _ => SqlValue::Null,
        })
        .collect()
}

pub fn sq_execute(conn: &Connection, (sql, values): Built) -> rusqlite::Result<usize> {
    conn.execute(&sql, rusqlite::params_from_iter(bind_values(&values)))
}

pub fn sq_query_row<T, F>(conn: &Connection, (sql, values): Built, f: F) -> rusqlite::Result<T>
where
    F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
{
    conn.query_row(&sql, rusqlite::params_from_iter(bind_values(&values)), f)
}

pub fn sq_query_map<T, F>(conn: &Connection, (sql, values): Built, f: F) -> rusqlite::Result<Vec<T>>
where
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(bind_values(&values)), f)?;
    rows.collect()
}

// ── Row mappers (column order follows the jarvis_api::db builders) ─────────

pub fn chat_from_row(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        is_user: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn stats_from_row(row: &Row<'_>) -> rusqlite::Result<BusinessStats> {
    Ok(BusinessStats {
        id: row.get(0)?,
        monthly_revenue: row.get(1)?,
        active_trucks: row.get(2)?,
        monthly_deliveries: row.get(3)?,
        hectares_planted: row.get(4)?,
        open_opportunities: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub fn credit_from_row(row: &Row<'_>) -> rusqlite::Result<CreditOpportunity> {
    Ok(CreditOpportunity {
        id: row.get(0)?,
        title: row.get(1)?,
        provider: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        interest_rate: row.get(5)?,
        max_amount: row.get(6)?,
        deadline: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub fn ad_from_row(row: &Row<'_>) -> rusqlite::Result<MetaAd> {
    Ok(MetaAd {
        id: row.get(0)?,
        title: row.get(1)?,
        advertiser: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        cta_url: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn suggestion_from_row(row: &Row<'_>) -> rusqlite::Result<BusinessSuggestion> {
    Ok(BusinessSuggestion {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        priority: row.get(4)?,
        estimated_impact: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn news_from_row(row: &Row<'_>) -> rusqlite::Result<NewsArticle> {
    Ok(NewsArticle {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        url: row.get(3)?,
        source: row.get(4)?,
        image_url: row.get(5)?,
        category: row.get(6)?,
        relevance: row.get(7)?,
        sentiment: row.get(8)?,
        published_at: row.get(9)?,
        created_at: row.get(10)?,
    })
}

pub fn decision_from_row(row: &Row<'_>) -> rusqlite::Result<StrategicDecision> {
    Ok(StrategicDecision {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        impact: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn task_from_row(row: &Row<'_>) -> rusqlite::Result<EnhancedTask> {
    Ok(EnhancedTask {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        priority: row.get(4)?,
        status: row.get(5)?,
        due_date: row.get(6)?,
        assigned_agent: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn parse_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn interaction_from_row(row: &Row<'_>) -> rusqlite::Result<AiInteraction> {
    let intent: String = row.get(3)?;
    Ok(AiInteraction {
        id: row.get(0)?,
        provider: row.get(1)?,
        model: row.get(2)?,
        intent: Intent::parse(&intent).unwrap_or(Intent::General),
        prompt: row.get(4)?,
        response: row.get(5)?,
        latency_ms: row.get(6)?,
        success: row.get(7)?,
        error: row.get(8)?,
        created_at: parse_time(row, 9)?,
    })
}

pub fn insert_interaction(conn: &Connection, i: &AiInteraction) -> rusqlite::Result<usize> {
    let created_at = timestamp(i.created_at);
    sq_execute(
        conn,
        db::interactions::insert(&db::interactions::InsertParams {
            id: &i.id,
            provider: &i.provider,
            model: &i.model,
            intent: i.intent.as_str(),
            prompt: &i.prompt,
            response: i.response.as_deref(),
            latency_ms: i.latency_ms,
            success: i.success,
            error: i.error.as_deref(),
            created_at: &created_at,
        }),
    )
}

/// Classify and upsert a headline. Returns whether a row was written.
pub fn upsert_article(
    conn: &Connection,
    article: &news::RawArticle,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let c = news::classify(&article.title, &article.description);
    let published_at = timestamp(article.published_at);
    let created_at = timestamp(now);
    let written = sq_execute(
        conn,
        db::news::upsert(&db::news::UpsertParams {
            title: &article.title,
            description: &article.description,
            url: &article.url,
            source: &article.source,
            image_url: article.image_url.as_deref(),
            category: c.category.as_str(),
            relevance: i64::from(c.relevance),
            sentiment: c.sentiment.as_str(),
            published_at: &published_at,
            created_at: &created_at,
        }),
    )?;
    Ok(written > 0)
}

// ── Seed data ──────────────────────────────────────────────────────────────

fn is_empty<T: sea_query::Iden + 'static>(conn: &Connection, table: T) -> rusqlite::Result<bool> {
    let n: i64 = sq_query_row(conn, db::dashboard::count(table), |row| row.get(0))?;
    Ok(n == 0)
}

/// Insert the default user and the demo dashboard rows. Tables that already
/// have rows are left alone.
pub fn seed(conn: &Connection, now: DateTime<Utc>) -> Result<()> {
    let ts = timestamp(now);
    sq_execute(
        conn,
        db::users::insert_if_missing(DEFAULT_USER_ID, DEFAULT_USER_ID, "Dono", &ts),
    )
    .context("seeding default user")?;

    if is_empty(conn, db::BusinessStats::Table)? {
        let s = mock::business_stats();
        sq_execute(
            conn,
            db::dashboard::insert_stats(&db::dashboard::StatsParams {
                monthly_revenue: s.monthly_revenue,
                active_trucks: s.active_trucks,
                monthly_deliveries: s.monthly_deliveries,
                hectares_planted: s.hectares_planted,
                open_opportunities: s.open_opportunities,
                updated_at: &ts,
            }),
        )?;
    }

    if is_empty(conn, db::CreditOpportunities::Table)? {
        for o in mock::credit_offers() {
            let deadline = (now + Duration::days(o.deadline_days))
                .date_naive()
                .to_string();
            sq_execute(
                conn,
                db::dashboard::insert_credit(&db::dashboard::CreditParams {
                    title: o.title,
                    provider: o.provider,
                    description: o.description,
                    category: o.category,
                    interest_rate: o.interest_rate,
                    max_amount: o.max_amount,
                    deadline: &deadline,
                    created_at: &ts,
                }),
            )?;
        }
    }

    if is_empty(conn, db::MetaAds::Table)? {
        for ad in mock::meta_ads() {
            sq_execute(
                conn,
                db::dashboard::insert_ad(
                    ad.title,
                    ad.advertiser,
                    ad.description,
                    ad.category,
                    ad.cta_url,
                    &ts,
                ),
            )?;
        }
    }

    if is_empty(conn, db::BusinessSuggestions::Table)? {
        for s in mock::business_suggestions() {
            sq_execute(
                conn,
                db::dashboard::insert_suggestion(
                    s.title,
                    s.description,
                    s.category,
                    s.priority,
                    s.estimated_impact,
                    &ts,
                ),
            )?;
        }
    }

    if is_empty(conn, db::NewsArticles::Table)? {
        for article in news::mock_articles(now) {
            upsert_article(conn, &article, now)?;
        }
    }

    Ok(())
}
