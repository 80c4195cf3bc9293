//! Intent detection and the offline assistant persona.

use serde::{Deserialize, Serialize};

use crate::news::NewsCategory;
use crate::text::{count_hits, fold};

/// What a chat message is about. Drives provider routing and canned replies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Transport,
    Farm,
    Finance,
    Government,
    General,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Self::Transport,
        Self::Farm,
        Self::Finance,
        Self::Government,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Farm => "farm",
            Self::Finance => "finance",
            Self::Government => "government",
            Self::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.as_str() == s)
    }

    fn category(&self) -> Option<NewsCategory> {
        match self {
            Self::Transport => Some(NewsCategory::Transport),
            Self::Farm => Some(NewsCategory::Farm),
            Self::Finance => Some(NewsCategory::Finance),
            Self::Government => Some(NewsCategory::Government),
            Self::General => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the intent of a user message with the news keyword tables.
pub fn detect_intent(message: &str) -> Intent {
    let folded = fold(message);
    let mut best = (Intent::General, 0);
    for intent in Intent::ALL {
        let Some(category) = intent.category() else {
            continue;
        };
        let hits = count_hits(&folded, category.keywords());
        if hits > best.1 {
            best = (intent, hits);
        }
    }
    best.0
}

/// System prompt sent to every AI provider.
pub fn system_prompt() -> &'static str {
    "Você é o JARVIS, assistente pessoal de um pequeno empresário brasileiro que \
     administra uma transportadora e uma fazenda. Responda em português do Brasil, \
     de forma objetiva, com números concretos quando houver. Sugira próximos passos \
     práticos para frete, frota, safra, crédito rural e licitações públicas."
}

/// Deterministic reply used when no AI provider answers.
pub fn canned_reply(message: &str, intent: Intent) -> String {
    let topic = crate::text::truncate(message.trim(), 80);
    match intent {
        Intent::Transport => format!(
            "Sobre \"{topic}\": revise a tabela de frete da ANTT, confira o consumo de diesel \
             por caminhão e priorize as rotas com maior margem. Posso montar um resumo da frota."
        ),
        Intent::Farm => format!(
            "Sobre \"{topic}\": acompanhe a previsão do tempo para a colheita, compare o preço \
             da saca nas cooperativas e verifique o estoque de insumos antes do próximo plantio."
        ),
        Intent::Finance => format!(
            "Sobre \"{topic}\": há linhas de crédito do BNDES e do Pronaf com juros abaixo do \
             mercado. Veja o painel de oportunidades de crédito para comparar taxas e prazos."
        ),
        Intent::Government => format!(
            "Sobre \"{topic}\": confira as licitações abertas no painel de governo e separe \
             certidões negativas e documentos da empresa com antecedência."
        ),
        Intent::General => format!(
            "Entendi: \"{topic}\". No momento estou sem acesso aos provedores de IA, mas posso \
             mostrar notícias, oportunidades de crédito e licitações no painel."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_business_intents() {
        assert_eq!(detect_intent("Qual o preço do frete para Goiânia?"), Intent::Transport);
        assert_eq!(detect_intent("Como está a safra de milho?"), Intent::Farm);
        assert_eq!(detect_intent("Preciso de crédito com juros baixos"), Intent::Finance);
        assert_eq!(detect_intent("Tem alguma licitação aberta?"), Intent::Government);
        assert_eq!(detect_intent("Bom dia, JARVIS"), Intent::General);
    }

    #[test]
    fn canned_reply_mentions_the_topic() {
        let reply = canned_reply("Como está a safra?", Intent::Farm);
        assert!(reply.contains("Como está a safra?"));
        assert!(reply.contains("colheita"));
    }

    #[test]
    fn intent_round_trips_through_str() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse(intent.as_str()), Some(intent));
        }
        assert_eq!(Intent::parse("weather"), None);
    }
}
