//! Query builders for the read-mostly dashboard panels: business stats,
//! credit opportunities, sponsored ads and business suggestions.

use sea_query::{Asterisk, Expr, Func, Iden, Order, Query, SqliteQueryBuilder};

use super::Built;
use super::tables::{BusinessStats, BusinessSuggestions, CreditOpportunities, MetaAds};

/// Row count of any table. Used to decide whether seed data is needed.
pub fn count<T: Iden + 'static>(table: T) -> Built {
    Query::select()
        .expr(Func::count(Expr::col(Asterisk)))
        .from(table)
        .build(SqliteQueryBuilder)
}

// ── Business stats ─────────────────────────────────────────────────────────

pub struct StatsParams<'a> {
    pub monthly_revenue: f64,
    pub active_trucks: i64,
    pub monthly_deliveries: i64,
    pub hectares_planted: f64,
    pub open_opportunities: i64,
    pub updated_at: &'a str,
}

pub fn insert_stats(p: &StatsParams<'_>) -> Built {
    Query::insert()
        .into_table(BusinessStats::Table)
        .columns([
            BusinessStats::MonthlyRevenue,
            BusinessStats::ActiveTrucks,
            BusinessStats::MonthlyDeliveries,
            BusinessStats::HectaresPlanted,
            BusinessStats::OpenOpportunities,
            BusinessStats::UpdatedAt,
        ])
        .values_panic([
            p.monthly_revenue.into(),
            p.active_trucks.into(),
            p.monthly_deliveries.into(),
            p.hectares_planted.into(),
            p.open_opportunities.into(),
            p.updated_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Latest stats row. Column order matches `stats_from_row()`.
pub fn latest_stats() -> Built {
    Query::select()
        .columns([
            BusinessStats::Id,
            BusinessStats::MonthlyRevenue,
            BusinessStats::ActiveTrucks,
            BusinessStats::MonthlyDeliveries,
            BusinessStats::HectaresPlanted,
            BusinessStats::OpenOpportunities,
            BusinessStats::UpdatedAt,
        ])
        .from(BusinessStats::Table)
        .order_by(BusinessStats::Id, Order::Desc)
        .limit(1)
        .build(SqliteQueryBuilder)
}

// ── Credit opportunities ───────────────────────────────────────────────────

pub struct CreditParams<'a> {
    pub title: &'a str,
    pub provider: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub interest_rate: f64,
    pub max_amount: f64,
    pub deadline: &'a str,
    pub created_at: &'a str,
}

pub fn insert_credit(p: &CreditParams<'_>) -> Built {
    Query::insert()
        .into_table(CreditOpportunities::Table)
        .columns([
            CreditOpportunities::Title,
            CreditOpportunities::Provider,
            CreditOpportunities::Description,
            CreditOpportunities::Category,
            CreditOpportunities::InterestRate,
            CreditOpportunities::MaxAmount,
            CreditOpportunities::Deadline,
            CreditOpportunities::CreatedAt,
        ])
        .values_panic([
            p.title.into(),
            p.provider.into(),
            p.description.into(),
            p.category.into(),
            p.interest_rate.into(),
            p.max_amount.into(),
            p.deadline.into(),
            p.created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Closest deadline first. Column order matches `credit_from_row()`.
pub fn list_credit() -> Built {
    Query::select()
        .columns([
            CreditOpportunities::Id,
            CreditOpportunities::Title,
            CreditOpportunities::Provider,
            CreditOpportunities::Description,
            CreditOpportunities::Category,
            CreditOpportunities::InterestRate,
            CreditOpportunities::MaxAmount,
            CreditOpportunities::Deadline,
            CreditOpportunities::CreatedAt,
        ])
        .from(CreditOpportunities::Table)
        .order_by(CreditOpportunities::Deadline, Order::Asc)
        .order_by(CreditOpportunities::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}

// ── Meta ads ───────────────────────────────────────────────────────────────

pub fn insert_ad(
    title: &str,
    advertiser: &str,
    description: &str,
    category: &str,
    cta_url: &str,
    created_at: &str,
) -> Built {
    Query::insert()
        .into_table(MetaAds::Table)
        .columns([
            MetaAds::Title,
            MetaAds::Advertiser,
            MetaAds::Description,
            MetaAds::Category,
            MetaAds::CtaUrl,
            MetaAds::CreatedAt,
        ])
        .values_panic([
            title.into(),
            advertiser.into(),
            description.into(),
            category.into(),
            cta_url.into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

pub fn list_ads() -> Built {
    Query::select()
        .columns([
            MetaAds::Id,
            MetaAds::Title,
            MetaAds::Advertiser,
            MetaAds::Description,
            MetaAds::Category,
            MetaAds::CtaUrl,
            MetaAds::CreatedAt,
        ])
        .from(MetaAds::Table)
        .order_by(MetaAds::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}

// ── Business suggestions ───────────────────────────────────────────────────

pub fn insert_suggestion(
    title: &str,
    description: &str,
    category: &str,
    priority: &str,
    estimated_impact: &str,
    created_at: &str,
) -> Built {
    Query::insert()
        .into_table(BusinessSuggestions::Table)
        .columns([
            BusinessSuggestions::Title,
            BusinessSuggestions::Description,
            BusinessSuggestions::Category,
            BusinessSuggestions::Priority,
            BusinessSuggestions::EstimatedImpact,
            BusinessSuggestions::CreatedAt,
        ])
        .values_panic([
            title.into(),
            description.into(),
            category.into(),
            priority.into(),
            estimated_impact.into(),
            created_at.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// High priority first, then insertion order.
pub fn list_suggestions() -> Built {
    Query::select()
        .columns([
            BusinessSuggestions::Id,
            BusinessSuggestions::Title,
            BusinessSuggestions::Description,
            BusinessSuggestions::Category,
            BusinessSuggestions::Priority,
            BusinessSuggestions::EstimatedImpact,
            BusinessSuggestions::CreatedAt,
        ])
        .from(BusinessSuggestions::Table)
        .order_by_expr(
            Expr::case(Expr::col(BusinessSuggestions::Priority).eq("high"), 0)
                .case(Expr::col(BusinessSuggestions::Priority).eq("medium"), 1)
                .finally(2)
                .into(),
            Order::Asc,
        )
        .order_by(BusinessSuggestions::Id, Order::Asc)
        .build(SqliteQueryBuilder)
}
