//! Business agents run by the orchestrator, and the communication guide.
//!
//! Agents are pure functions over a [`CycleInput`] snapshot; the
//! [`Orchestrator`] only counts cycles and keeps the latest reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::news::{NewsCategory, Sentiment};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AgentName {
    Finance,
    News,
    Planning,
    Communication,
}

impl AgentName {
    pub const ALL: [AgentName; 4] = [Self::Finance, Self::News, Self::Planning, Self::Communication];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferSnapshot {
    pub title: String,
    pub provider: String,
    /// Monthly interest rate in percent.
    pub interest_rate: f64,
    pub max_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadlineSnapshot {
    pub title: String,
    pub category: NewsCategory,
    pub sentiment: Sentiment,
    pub relevance: u8,
}

/// Data an orchestration cycle works on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleInput {
    pub offers: Vec<OfferSnapshot>,
    pub headlines: Vec<HeadlineSnapshot>,
    pub pending_tasks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentReport {
    pub agent: AgentName,
    pub summary: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResult {
    pub cycle: u64,
    pub executed_at: DateTime<Utc>,
    pub reports: Vec<AgentReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub cycles: u64,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub agents: Vec<AgentStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatus {
    pub agent: AgentName,
    pub last_summary: Option<String>,
}

#[derive(Debug, Default)]
pub struct Orchestrator {
    cycles: u64,
    last_cycle_at: Option<DateTime<Utc>>,
    last_reports: BTreeMap<AgentName, AgentReport>,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_cycle(&mut self, input: &CycleInput, now: DateTime<Utc>) -> CycleResult {
        let mut reports = vec![
            finance_agent(&input.offers),
            news_agent(&input.headlines),
            planning_agent(&input.pending_tasks),
        ];
        reports.push(communication_agent(&reports));

        self.cycles += 1;
        self.last_cycle_at = Some(now);
        for report in &reports {
            self.last_reports.insert(report.agent, report.clone());
        }
        tracing::info!(cycle = self.cycles, reports = reports.len(), "orchestrator cycle finished");

        CycleResult {
            cycle: self.cycles,
            executed_at: now,
            reports,
        }
    }

    pub fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            cycles: self.cycles,
            last_cycle_at: self.last_cycle_at,
            agents: AgentName::ALL
                .into_iter()
                .map(|agent| AgentStatus {
                    agent,
                    last_summary: self.last_reports.get(&agent).map(|r| r.summary.clone()),
                })
                .collect(),
        }
    }
}

fn finance_agent(offers: &[OfferSnapshot]) -> AgentReport {
    let mut sorted: Vec<&OfferSnapshot> = offers.iter().collect();
    sorted.sort_by(|a, b| a.interest_rate.total_cmp(&b.interest_rate));
    let recommendations = sorted
        .iter()
        .take(2)
        .map(|o| {
            format!(
                "Avaliar \"{}\" ({}) a {:.2}% a.m., até R$ {:.0}",
                o.title, o.provider, o.interest_rate, o.max_amount
            )
        })
        .collect();
    let summary = match sorted.first() {
        Some(best) => format!(
            "{} ofertas de crédito analisadas; menor taxa {:.2}% a.m.",
            offers.len(),
            best.interest_rate
        ),
        None => "Nenhuma oferta de crédito disponível".to_string(),
    };
    AgentReport {
        agent: AgentName::Finance,
        summary,
        recommendations,
    }
}

fn news_agent(headlines: &[HeadlineSnapshot]) -> AgentReport {
    let mut negatives: BTreeMap<NewsCategory, Vec<&HeadlineSnapshot>> = BTreeMap::new();
    for h in headlines.iter().filter(|h| h.sentiment == Sentiment::Negative) {
        negatives.entry(h.category).or_default().push(h);
    }
    let recommendations = negatives
        .iter()
        .map(|(category, items)| {
            let top = items
                .iter()
                .max_by_key(|h| h.relevance)
                .map(|h| h.title.as_str())
                .unwrap_or_default();
            format!(
                "Atenção em {category}: {} notícia(s) negativa(s), destaque \"{top}\"",
                items.len()
            )
        })
        .collect();
    AgentReport {
        agent: AgentName::News,
        summary: format!(
            "{} notícias analisadas, {} negativas",
            headlines.len(),
            negatives.values().map(Vec::len).sum::<usize>()
        ),
        recommendations,
    }
}

fn planning_agent(pending: &[String]) -> AgentReport {
    AgentReport {
        agent: AgentName::Planning,
        summary: format!("{} tarefas pendentes", pending.len()),
        recommendations: pending
            .iter()
            .take(3)
            .map(|t| format!("Concluir: {t}"))
            .collect(),
    }
}

fn communication_agent(reports: &[AgentReport]) -> AgentReport {
    let total: usize = reports.iter().map(|r| r.recommendations.len()).sum();
    let recommendations = if total > 0 {
        vec![format!("Enviar resumo com {total} recomendações ao proprietário")]
    } else {
        Vec::new()
    };
    AgentReport {
        agent: AgentName::Communication,
        summary: format!("{total} recomendações consolidadas"),
        recommendations,
    }
}

/// Static markdown notes on message delivery strategies.
pub fn communication_guide(topic: &str) -> &'static str {
    match topic.trim().to_ascii_lowercase().as_str() {
        "buffering" | "buffer" => BUFFERING,
        "queueing" | "queue" | "fila" => QUEUEING,
        "retry" | "retries" => RETRY,
        _ => INDEX,
    }
}

const INDEX: &str = "\
# Comunicação entre agentes

Tópicos disponíveis:

- `buffering`: agrupamento de mensagens antes do envio
- `queueing`: filas de comandos pendentes
- `retry`: reenvio após falhas
";

const BUFFERING: &str = "\
# Buffering

- Agrupe notificações de baixa prioridade em janelas de 5 minutos.
- Envie imediatamente mensagens marcadas como críticas.
- Limite o buffer a 100 mensagens; acima disso, descarte as mais antigas de baixa prioridade.
";

const QUEUEING: &str = "\
# Filas

- Cada comando recebe um id e data de criação.
- A fila é gravada de forma atômica; leitores nunca veem um arquivo parcial.
- Consumidores removem o comando somente após a execução.
";

const RETRY: &str = "\
# Reenvio

- Falhas de rede e respostas 5xx são reenviadas com espera de 1, 2 e 4 segundos.
- Respostas 4xx não são reenviadas.
- Após a última tentativa, o erro é registrado e o assistente usa a resposta local.
";

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(title: &str, rate: f64) -> OfferSnapshot {
        OfferSnapshot {
            title: title.into(),
            provider: "Banco".into(),
            interest_rate: rate,
            max_amount: 100_000.0,
        }
    }

    fn headline(title: &str, category: NewsCategory, sentiment: Sentiment, relevance: u8) -> HeadlineSnapshot {
        HeadlineSnapshot {
            title: title.into(),
            category,
            sentiment,
            relevance,
        }
    }

    #[test]
    fn cycle_produces_one_report_per_agent() {
        let mut orch = Orchestrator::new();
        let input = CycleInput {
            offers: vec![offer("Capital de giro", 1.9), offer("Pronaf", 0.5)],
            headlines: vec![
                headline("Greve na rodovia", NewsCategory::Transport, Sentiment::Negative, 60),
                headline("Bloqueio no porto", NewsCategory::Transport, Sentiment::Negative, 80),
                headline("Safra recorde", NewsCategory::Farm, Sentiment::Positive, 70),
            ],
            pending_tasks: vec!["Renovar seguro".into()],
        };
        let result = orch.run_cycle(&input, Utc::now());

        assert_eq!(result.cycle, 1);
        let agents: Vec<_> = result.reports.iter().map(|r| r.agent).collect();
        assert_eq!(agents, AgentName::ALL);

        let finance = &result.reports[0];
        assert!(finance.recommendations[0].contains("Pronaf"));

        let news = &result.reports[1];
        assert_eq!(news.recommendations.len(), 1);
        assert!(news.recommendations[0].contains("Bloqueio no porto"));

        let communication = &result.reports[3];
        assert!(communication.summary.starts_with("4 "));
    }

    #[test]
    fn status_tracks_cycles_and_last_summaries() {
        let mut orch = Orchestrator::new();
        let before = orch.status();
        assert_eq!(before.cycles, 0);
        assert!(before.agents.iter().all(|a| a.last_summary.is_none()));

        orch.run_cycle(&CycleInput::default(), Utc::now());
        orch.run_cycle(&CycleInput::default(), Utc::now());
        let after = orch.status();
        assert_eq!(after.cycles, 2);
        assert_eq!(
            after.agents[0].last_summary.as_deref(),
            Some("Nenhuma oferta de crédito disponível")
        );
    }

    #[test]
    fn guide_falls_back_to_index() {
        assert!(communication_guide("retry").starts_with("# Reenvio"));
        assert!(communication_guide("Fila").starts_with("# Filas"));
        assert!(communication_guide("unknown").contains("Tópicos disponíveis"));
    }
}
