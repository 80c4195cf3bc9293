//! Seed and fallback data for dashboard panels that have no live source
//! configured.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct CreditOfferSeed {
    pub title: &'static str,
    pub provider: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub interest_rate: f64,
    pub max_amount: f64,
    pub deadline_days: i64,
}

pub fn credit_offers() -> Vec<CreditOfferSeed> {
    vec![
        CreditOfferSeed {
            title: "BNDES Finame Caminhões",
            provider: "BNDES",
            description: "Financiamento de caminhões novos com carência de 6 meses.",
            category: "transport",
            interest_rate: 1.1,
            max_amount: 850_000.0,
            deadline_days: 30,
        },
        CreditOfferSeed {
            title: "Pronaf Custeio",
            provider: "Banco do Brasil",
            description: "Custeio agrícola para safra de grãos com juros subsidiados.",
            category: "farm",
            interest_rate: 0.5,
            max_amount: 250_000.0,
            deadline_days: 45,
        },
        CreditOfferSeed {
            title: "Capital de Giro Transportadoras",
            provider: "Sicredi",
            description: "Linha para cobrir prazo de recebimento de fretes.",
            category: "finance",
            interest_rate: 1.9,
            max_amount: 300_000.0,
            deadline_days: 15,
        },
        CreditOfferSeed {
            title: "Moderfrota Máquinas Agrícolas",
            provider: "Bradesco",
            description: "Aquisição de tratores e colheitadeiras com prazo de até 7 anos.",
            category: "farm",
            interest_rate: 0.9,
            max_amount: 1_200_000.0,
            deadline_days: 60,
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdSeed {
    pub title: &'static str,
    pub advertiser: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub cta_url: &'static str,
}

pub fn meta_ads() -> Vec<AdSeed> {
    vec![
        AdSeed {
            title: "Pneus com 20% de desconto para frotas",
            advertiser: "Rodar Pneus",
            description: "Condição especial para transportadoras com mais de 5 caminhões.",
            category: "transport",
            cta_url: "https://ads.example.com/rodar-pneus",
        },
        AdSeed {
            title: "Sementes certificadas de soja",
            advertiser: "AgroSementes",
            description: "Alta produtividade para o Cerrado, entrega na fazenda.",
            category: "farm",
            cta_url: "https://ads.example.com/agrosementes",
        },
        AdSeed {
            title: "Rastreamento de frota em tempo real",
            advertiser: "TrackBR",
            description: "Telemetria, alertas de rota e relatórios de consumo.",
            category: "technology",
            cta_url: "https://ads.example.com/trackbr",
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSeed {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub priority: &'static str,
    pub estimated_impact: &'static str,
}

pub fn business_suggestions() -> Vec<SuggestionSeed> {
    vec![
        SuggestionSeed {
            title: "Frete de retorno com grãos",
            description: "Use caminhões vazios na volta para transportar a própria safra.",
            category: "transport",
            priority: "high",
            estimated_impact: "Redução de 18% no custo por km",
        },
        SuggestionSeed {
            title: "Venda antecipada da safra",
            description: "Trave parte do preço da soja com contrato a termo.",
            category: "farm",
            priority: "medium",
            estimated_impact: "Proteção contra queda de preço",
        },
        SuggestionSeed {
            title: "Participar de licitações de transporte escolar",
            description: "Prefeituras da região abrem editais no segundo semestre.",
            category: "government",
            priority: "medium",
            estimated_impact: "Receita recorrente de 12 meses",
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct BusinessStatsSeed {
    pub monthly_revenue: f64,
    pub active_trucks: i64,
    pub monthly_deliveries: i64,
    pub hectares_planted: f64,
    pub open_opportunities: i64,
}

pub fn business_stats() -> BusinessStatsSeed {
    BusinessStatsSeed {
        monthly_revenue: 487_500.0,
        active_trucks: 12,
        monthly_deliveries: 164,
        hectares_planted: 820.0,
        open_opportunities: 4,
    }
}

/// Public procurement notice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GovernmentBid {
    pub id: String,
    pub title: String,
    pub agency: String,
    pub modality: String,
    pub estimated_value: Option<f64>,
    pub opening_date: Option<NaiveDate>,
    pub state: Option<String>,
    pub url: Option<String>,
}

pub fn government_bids(today: NaiveDate) -> Vec<GovernmentBid> {
    let bid = |id: &str, title: &str, agency: &str, modality: &str, value: f64, days: i64, uf: &str| {
        GovernmentBid {
            id: id.to_string(),
            title: title.to_string(),
            agency: agency.to_string(),
            modality: modality.to_string(),
            estimated_value: Some(value),
            opening_date: Some(today + Duration::days(days)),
            state: Some(uf.to_string()),
            url: None,
        }
    };
    vec![
        bid(
            "PE-2026-0142",
            "Transporte escolar rural",
            "Prefeitura de Rio Verde",
            "Pregão Eletrônico",
            1_450_000.0,
            12,
            "GO",
        ),
        bid(
            "PE-2026-0311",
            "Frete de insumos agrícolas",
            "Conab",
            "Pregão Eletrônico",
            620_000.0,
            20,
            "MT",
        ),
        bid(
            "CC-2026-0027",
            "Aquisição de gêneros da agricultura familiar",
            "Secretaria de Educação de GO",
            "Chamada Pública",
            380_000.0,
            35,
            "GO",
        ),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GovernmentOfficial {
    pub name: String,
    pub role: String,
    pub agency: String,
    pub email: Option<String>,
}

pub fn government_officials() -> Vec<GovernmentOfficial> {
    [
        ("Ana Paula Ribeiro", "Secretária de Agricultura", "Governo de Goiás", Some("agricultura@go.example.gov.br")),
        ("Carlos Menezes", "Superintendente", "ANTT", None),
        ("Júlia Fontes", "Diretora de Compras", "Prefeitura de Rio Verde", Some("compras@rioverde.example.gov.br")),
    ]
    .into_iter()
    .map(|(name, role, agency, email)| GovernmentOfficial {
        name: name.to_string(),
        role: role.to_string(),
        agency: agency.to_string(),
        email: email.map(str::to_string),
    })
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiTrend {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub category: String,
    /// 0–100.
    pub impact_score: u8,
    pub published_at: DateTime<Utc>,
}

pub fn ai_trends(now: DateTime<Utc>) -> Vec<AiTrend> {
    [
        (
            "Roteirização com IA reduz quilometragem vazia",
            "Modelos de otimização de rotas já reduzem em até 15% o retorno sem carga.",
            "Logística Digital",
            "transport",
            88,
            3,
        ),
        (
            "Visão computacional na contagem de gado",
            "Drones com IA estimam rebanho e detectam animais doentes no pasto.",
            "AgroTech Review",
            "farm",
            76,
            10,
        ),
        (
            "Assistentes de voz para pequenas empresas",
            "Agentes conversacionais passam a integrar ERP, bancos e portais de governo.",
            "Tech Brasil",
            "technology",
            81,
            24,
        ),
        (
            "Análise de crédito rural automatizada",
            "Cooperativas usam modelos de risco para liberar custeio em horas.",
            "Valor Rural",
            "finance",
            69,
            40,
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (title, summary, source, category, score, hours))| AiTrend {
        id: format!("trend-{}", i + 1),
        title: title.to_string(),
        summary: summary.to_string(),
        source: source.to_string(),
        category: category.to_string(),
        impact_score: score,
        published_at: now - Duration::hours(hours),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bids_open_in_the_future() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let bids = government_bids(today);
        assert_eq!(bids.len(), 3);
        assert!(bids.iter().all(|b| b.opening_date.is_some_and(|d| d > today)));
    }

    #[test]
    fn trends_are_newest_first() {
        let trends = ai_trends(Utc::now());
        assert!(trends.windows(2).all(|w| w[0].published_at > w[1].published_at));
        assert_eq!(trends[0].id, "trend-1");
    }

    #[test]
    fn credit_seeds_have_positive_rates() {
        assert!(credit_offers().iter().all(|o| o.interest_rate > 0.0 && o.max_amount > 0.0));
    }
}
