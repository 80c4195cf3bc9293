//! Third-party data feeds: NewsAPI headlines and the federal transparency
//! portal (procurement notices and officials).

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use jarvis_core::mock::{GovernmentBid, GovernmentOfficial};
use jarvis_core::news::RawArticle;

use crate::error::{ClientError, parse_response};

const NEWSAPI_URL: &str = "https://newsapi.org/v2";

#[derive(Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    #[serde(default)]
    source: NewsApiSource,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Default)]
struct NewsApiSource {
    #[serde(default)]
    name: Option<String>,
}

impl NewsApiArticle {
    /// Drop entries without a title or url (NewsAPI marks removed items that way).
    fn into_raw(self, now: DateTime<Utc>) -> Option<RawArticle> {
        let title = self.title.filter(|t| !t.trim().is_empty() && t != "[Removed]")?;
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(RawArticle {
            title,
            description: self.description.unwrap_or_default(),
            url,
            source: self.source.name.unwrap_or_else(|| "NewsAPI".to_string()),
            image_url: self.url_to_image,
            published_at: self.published_at.unwrap_or(now),
        })
    }
}

#[derive(Clone)]
pub struct NewsApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsApiClient {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            base_url: NEWSAPI_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Latest Portuguese articles matching `query`.
    pub async fn search(&self, query: &str, page_size: u32) -> Result<Vec<RawArticle>, ClientError> {
        let page_size = page_size.clamp(1, 100).to_string();
        let resp = self
            .client
            .get(format!("{}/everything", self.base_url))
            .header("X-Api-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("language", "pt"),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;
        let parsed: NewsApiResponse = parse_response(resp).await?;
        let now = Utc::now();
        Ok(parsed
            .articles
            .into_iter()
            .filter_map(|a| a.into_raw(now))
            .collect())
    }
}

// ── Transparency portal ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortalBid {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default, alias = "objeto")]
    title: Option<String>,
    #[serde(default, alias = "orgao")]
    agency: Option<String>,
    #[serde(default, alias = "modalidade")]
    modality: Option<String>,
    #[serde(default, alias = "valor")]
    estimated_value: Option<f64>,
    #[serde(default, alias = "dataAbertura")]
    opening_date: Option<String>,
    #[serde(default, alias = "uf")]
    state: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Portal dates come as `dd/mm/yyyy`; ISO is accepted too.
fn parse_portal_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

impl PortalBid {
    fn into_bid(self) -> Option<GovernmentBid> {
        let id = match self.id {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(GovernmentBid {
            id,
            title: self.title?,
            agency: self.agency.unwrap_or_default(),
            modality: self.modality.unwrap_or_default(),
            estimated_value: self.estimated_value,
            opening_date: self.opening_date.as_deref().and_then(parse_portal_date),
            state: self.state,
            url: self.url,
        })
    }
}

#[derive(Deserialize)]
struct PortalOfficial {
    #[serde(alias = "nome")]
    name: String,
    #[serde(default, alias = "cargo")]
    role: String,
    #[serde(default, alias = "orgao")]
    agency: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Clone)]
pub struct GovernmentClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GovernmentClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("chave-api-dados", &self.api_key)
            .query(query)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// Notices opened in the 30 days up to `today`.
    pub async fn bids(&self, today: NaiveDate) -> Result<Vec<GovernmentBid>, ClientError> {
        let from = today - chrono::Duration::days(30);
        let raw: Vec<PortalBid> = self
            .get(
                "/licitacoes",
                &[
                    ("dataInicial", from.format("%d/%m/%Y").to_string()),
                    ("dataFinal", today.format("%d/%m/%Y").to_string()),
                    ("pagina", "1".to_string()),
                ],
            )
            .await?;
        Ok(raw.into_iter().filter_map(PortalBid::into_bid).collect())
    }

    pub async fn officials(&self) -> Result<Vec<GovernmentOfficial>, ClientError> {
        let raw: Vec<PortalOfficial> = self
            .get("/servidores", &[("pagina", "1".to_string())])
            .await?;
        Ok(raw
            .into_iter()
            .map(|o| GovernmentOfficial {
                name: o.name,
                role: o.role,
                agency: o.agency,
                email: o.email,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newsapi_removed_items_are_dropped() {
        let parsed: NewsApiResponse = serde_json::from_str(
            r#"{"status":"ok","articles":[
                {"source":{"name":"G1"},"title":"Safra de soja bate recorde","description":null,
                 "url":"https://g1.example/soja","urlToImage":null,"publishedAt":"2026-10-18T12:00:00Z"},
                {"source":{"name":null},"title":"[Removed]","url":"https://removed.com"}
            ]}"#,
        )
        .unwrap();
        let raw: Vec<_> = parsed
            .articles
            .into_iter()
            .filter_map(|a| a.into_raw(Utc::now()))
            .collect();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].source, "G1");
        assert_eq!(raw[0].description, "");
    }

    #[test]
    fn portal_bids_accept_numeric_ids_and_br_dates() {
        let bid: PortalBid = serde_json::from_str(
            r#"{"id": 9012, "objeto": "Frete de calcário", "orgao": "Conab",
                "modalidade": "Pregão", "valor": 1000.5, "dataAbertura": "05/11/2026"}"#,
        )
        .unwrap();
        let bid = bid.into_bid().unwrap();
        assert_eq!(bid.id, "9012");
        assert_eq!(bid.opening_date, NaiveDate::from_ymd_opt(2026, 11, 5));
    }
}
