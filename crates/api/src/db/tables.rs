//! Compile-time–checked column identifiers for all tables.

use sea_query::Iden;

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Username,
    DisplayName,
    CreatedAt,
}

#[derive(Iden)]
pub enum ChatMessages {
    Table,
    Id,
    UserId,
    Content,
    IsUser,
    CreatedAt,
}

#[derive(Iden)]
pub enum BusinessStats {
    Table,
    Id,
    MonthlyRevenue,
    ActiveTrucks,
    MonthlyDeliveries,
    HectaresPlanted,
    OpenOpportunities,
    UpdatedAt,
}

#[derive(Iden)]
pub enum CreditOpportunities {
    Table,
    Id,
    Title,
    Provider,
    Description,
    Category,
    InterestRate,
    MaxAmount,
    Deadline,
    CreatedAt,
}

#[derive(Iden)]
pub enum MetaAds {
    Table,
    Id,
    Title,
    Advertiser,
    Description,
    Category,
    CtaUrl,
    CreatedAt,
}

#[derive(Iden)]
pub enum BusinessSuggestions {
    Table,
    Id,
    Title,
    Description,
    Category,
    Priority,
    EstimatedImpact,
    CreatedAt,
}

#[derive(Iden)]
pub enum NewsArticles {
    Table,
    Id,
    Title,
    Description,
    Url,
    Source,
    ImageUrl,
    Category,
    Relevance,
    Sentiment,
    PublishedAt,
    CreatedAt,
}

#[derive(Iden)]
pub enum StrategicDecisions {
    Table,
    Id,
    Title,
    Description,
    Category,
    Impact,
    Status,
    CreatedAt,
}

#[derive(Iden)]
pub enum EnhancedTasks {
    Table,
    Id,
    Title,
    Description,
    Category,
    Priority,
    Status,
    DueDate,
    AssignedAgent,
    CreatedAt,
}

#[derive(Iden)]
pub enum AiInteractions {
    Table,
    Id,
    Provider,
    Model,
    Intent,
    Prompt,
    Response,
    LatencyMs,
    Success,
    Error,
    CreatedAt,
}
