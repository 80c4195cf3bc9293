//! Keyword-table news triage: category, relevance and sentiment.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::text::{count_hits, count_hits_exclusive, fold};

/// Business area a headline belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    Transport,
    Farm,
    Finance,
    Government,
    Technology,
    General,
}

impl NewsCategory {
    /// Classified categories in tie-break order. `General` is the fallback.
    pub const RANKED: [NewsCategory; 5] = [
        Self::Transport,
        Self::Farm,
        Self::Finance,
        Self::Government,
        Self::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Farm => "farm",
            Self::Finance => "finance",
            Self::Government => "government",
            Self::Technology => "technology",
            Self::General => "general",
        }
    }

    /// Parse a wire name or one of the Portuguese aliases used by the client.
    pub fn parse(s: &str) -> Option<Self> {
        match fold(s.trim()).as_str() {
            "transport" | "transporte" | "logistica" => Some(Self::Transport),
            "farm" | "agro" | "agronegocio" | "fazenda" => Some(Self::Farm),
            "finance" | "financas" | "financeiro" => Some(Self::Finance),
            "government" | "governo" => Some(Self::Government),
            "technology" | "tecnologia" | "tech" => Some(Self::Technology),
            "general" | "geral" => Some(Self::General),
            _ => None,
        }
    }

    /// Folded keyword table for this category.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Transport => &[
                "transporte",
                "frete",
                "caminhao",
                "caminhoes",
                "rodovia",
                "logistica",
                "diesel",
                "pedagio",
                "antt",
                "carga",
                "truck",
                "freight",
                "highway",
            ],
            Self::Farm => &[
                "agro",
                "safra",
                "soja",
                "milho",
                "gado",
                "fazenda",
                "colheita",
                "plantio",
                "pecuaria",
                "fertilizante",
                "rural",
                "harvest",
                "crop",
                "cattle",
            ],
            Self::Finance => &[
                "credito",
                "juros",
                "selic",
                "banco",
                "financiamento",
                "emprestimo",
                "dolar",
                "inflacao",
                "bndes",
                "pronaf",
                "loan",
                "interest rate",
            ],
            Self::Government => &[
                "governo",
                "licitacao",
                "edital",
                "ministerio",
                "prefeitura",
                "decreto",
                "congresso",
                "imposto",
                "tributo",
                "government",
                "tender",
            ],
            Self::Technology => &[
                "inteligencia artificial",
                "tecnologia",
                "software",
                "aplicativo",
                "digital",
                "startup",
                "drone",
                "telemetria",
                "automacao",
                "technology",
            ],
            Self::General => &[],
        }
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            _ => Self::Neutral,
        }
    }
}

const POSITIVE: &[&str] = &[
    "alta",
    "cresce",
    "crescimento",
    "recorde",
    "lucro",
    "aprovado",
    "aprova",
    "melhora",
    "queda do diesel",
    "reducao",
    "beneficio",
    "oportunidade",
    "investimento",
    "growth",
    "record",
    "profit",
];

const NEGATIVE: &[&str] = &[
    "queda",
    "crise",
    "prejuizo",
    "greve",
    "bloqueio",
    "aumento do diesel",
    "seca",
    "praga",
    "multa",
    "atraso",
    "risco",
    "falencia",
    "crisis",
    "loss",
    "strike",
];

/// Output of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: NewsCategory,
    /// 0–100.
    pub relevance: u8,
    pub sentiment: Sentiment,
}

/// Classify a headline and its description.
pub fn classify(title: &str, description: &str) -> Classification {
    let title = fold(title);
    let description = fold(description);

    let mut best: Option<(NewsCategory, u32, u32, u32)> = None;
    for category in NewsCategory::RANKED {
        let keywords = category.keywords();
        let title_hits = count_hits(&title, keywords);
        let description_hits = count_hits(&description, keywords);
        let score = title_hits * 2 + description_hits;
        if score == 0 {
            continue;
        }
        // strict comparison keeps the earlier category on ties
        if best.is_none_or(|(_, s, _, _)| score > s) {
            best = Some((category, score, title_hits, description_hits));
        }
    }

    let (category, relevance) = match best {
        Some((category, _, title_hits, description_hits)) => {
            let raw = 20 + 15 * title_hits + 5 * description_hits;
            (category, raw.min(100) as u8)
        }
        None => (NewsCategory::General, 20),
    };

    Classification {
        category,
        relevance,
        sentiment: sentiment(&format!("{title} {description}")),
    }
}

fn sentiment(folded: &str) -> Sentiment {
    let counts = count_hits_exclusive(folded, &[POSITIVE, NEGATIVE]);
    match counts[0].cmp(&counts[1]) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// A headline before classification, as produced by a feed or the seed list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Deterministic seed headlines covering every category.
pub fn mock_articles(now: DateTime<Utc>) -> Vec<RawArticle> {
    let items: [(&str, &str, &str, &str, i64); 8] = [
        (
            "ANTT atualiza tabela do piso mínimo de frete",
            "Novos valores do frete rodoviário passam a valer para transporte de carga a granel.",
            "https://news.example.com/antt-piso-frete",
            "Portal Logística",
            2,
        ),
        (
            "Preço do diesel tem redução nas refinarias",
            "Petrobras anuncia redução que deve aliviar custos do transporte rodoviário.",
            "https://news.example.com/diesel-reducao",
            "Economia Hoje",
            5,
        ),
        (
            "Safra de soja deve bater recorde em 2026",
            "Colheita avança no Centro-Oeste e produtores projetam crescimento da produção.",
            "https://news.example.com/safra-soja-recorde",
            "Agro News",
            8,
        ),
        (
            "Seca ameaça pastagens e preocupa pecuaristas",
            "Risco de perdas no gado leva produtores rurais a antecipar suplementação.",
            "https://news.example.com/seca-pastagens",
            "Campo Aberto",
            12,
        ),
        (
            "BNDES abre nova linha de crédito para frotas",
            "Financiamento com juros reduzidos para renovação de caminhões.",
            "https://news.example.com/bndes-credito-frotas",
            "Valor Rural",
            20,
        ),
        (
            "Governo publica edital de licitação para transporte escolar",
            "Prefeituras poderão aderir à ata de registro de preços do ministério.",
            "https://news.example.com/edital-transporte-escolar",
            "Diário Oficial",
            26,
        ),
        (
            "Telemetria e inteligência artificial reduzem custo de frota",
            "Startups de tecnologia oferecem automação para gestão de caminhões.",
            "https://news.example.com/telemetria-ia-frota",
            "Tech Brasil",
            30,
        ),
        (
            "Feira regional reúne empreendedores do interior",
            "Evento acontece no próximo fim de semana com palestras e exposições.",
            "https://news.example.com/feira-regional",
            "Jornal da Cidade",
            48,
        ),
    ];

    items
        .into_iter()
        .map(|(title, description, url, source, hours_ago)| RawArticle {
            title: title.to_string(),
            description: description.to_string(),
            url: url.to_string(),
            source: source.to_string(),
            image_url: None,
            published_at: now - Duration::hours(hours_ago),
        })
        .collect()
}
