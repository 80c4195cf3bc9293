//! Text preparation for Portuguese text-to-speech.
//!
//! [`sanitize`] rewrites chat-style text (markdown, phone numbers, CPFs,
//! dates, times, money, acronyms) into something a pt-BR voice reads
//! naturally. [`TtsCache`] holds synthesized audio keyed by [`cache_key`].

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::LazyLock;

/// Voice parameters that change the synthesized audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub voice_id: String,
    pub model_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*[-*•]\s+").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*#{1,6}\s*").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[*_`~]+").unwrap());
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static MONEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"R\$\s?(\d{1,3}(?:\.\d{3})+|\d+)(?:,(\d{2}))?").unwrap());
static CPF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{3})\.(\d{3})\.(\d{3})-(\d{2})\b").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{2})\)\s?(\d{4,5})-(\d{4})\b").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([01]?\d|2[0-3]):([0-5]\d)\b").unwrap());
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const ACRONYMS: &[(&str, &str)] = &[
    ("CNPJ", "cê ene pê jota"),
    ("CPF", "cê pê éfe"),
    ("ANTT", "a ene tê tê"),
    ("BNDES", "bê ene dê é ésse"),
    ("ICMS", "i cê ême ésse"),
    ("CNH", "cê ene agá"),
    ("PIX", "pix"),
    ("NF-e", "nota fiscal eletrônica"),
    ("API", "a pê i"),
    ("IA", "i a"),
    ("JARVIS", "Jarvis"),
    ("km", "quilômetros"),
];

static ACRONYM_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ACRONYMS
        .iter()
        .map(|(acronym, spoken)| {
            (
                Regex::new(&format!(r"\b{}\b", regex::escape(acronym))).unwrap(),
                *spoken,
            )
        })
        .collect()
});

const MONTHS: [&str; 12] = [
    "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto", "setembro",
    "outubro", "novembro", "dezembro",
];

const HOURS: [&str; 24] = [
    "zero",
    "uma",
    "duas",
    "três",
    "quatro",
    "cinco",
    "seis",
    "sete",
    "oito",
    "nove",
    "dez",
    "onze",
    "doze",
    "treze",
    "quatorze",
    "quinze",
    "dezesseis",
    "dezessete",
    "dezoito",
    "dezenove",
    "vinte",
    "vinte e uma",
    "vinte e duas",
    "vinte e três",
];

/// Rewrite `text` so a Portuguese TTS voice pronounces it well.
pub fn sanitize(text: &str) -> String {
    let mut s = BULLET_RE.replace_all(text, "").into_owned();
    s = HEADING_RE.replace_all(&s, "").into_owned();
    s = URL_RE.replace_all(&s, "link").into_owned();
    s = EMPHASIS_RE.replace_all(&s, "").into_owned();
    s = MONEY_RE.replace_all(&s, speak_money).into_owned();
    s = CPF_RE
        .replace_all(&s, |caps: &Captures| {
            (1..=4)
                .map(|i| spell_digits(&caps[i]))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .into_owned();
    s = PHONE_RE
        .replace_all(&s, |caps: &Captures| {
            format!(
                "{}, {}, {}",
                &caps[1],
                spell_digits(&caps[2]),
                spell_digits(&caps[3])
            )
        })
        .into_owned();
    s = DATE_RE.replace_all(&s, speak_date).into_owned();
    s = TIME_RE.replace_all(&s, speak_time).into_owned();
    for (re, spoken) in ACRONYM_RES.iter() {
        s = re.replace_all(&s, *spoken).into_owned();
    }
    SPACE_RE.replace_all(&s, " ").trim().to_string()
}

fn spell_digits(digits: &str) -> String {
    digits
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ")
}

fn speak_money(caps: &Captures) -> String {
    let reais = caps[1].replace('.', "");
    let unit = if reais == "1" { "real" } else { "reais" };
    match caps.get(2).map(|m| m.as_str()) {
        Some(cents) if cents != "00" => {
            let cents = cents.trim_start_matches('0');
            let cent_unit = if cents == "1" { "centavo" } else { "centavos" };
            format!("{reais} {unit} e {cents} {cent_unit}")
        }
        _ => format!("{reais} {unit}"),
    }
}

fn speak_date(caps: &Captures) -> String {
    let day: u32 = caps[1].parse().unwrap_or(0);
    let month: usize = caps[2].parse().unwrap_or(0);
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return caps[0].to_string();
    }
    format!("{day} de {} de {}", MONTHS[month - 1], &caps[3])
}

fn speak_time(caps: &Captures) -> String {
    let hour: usize = caps[1].parse().unwrap_or(0);
    let minute: u32 = caps[2].parse().unwrap_or(0);
    let hour_unit = if hour <= 1 { "hora" } else { "horas" };
    let spoken_hour = format!("{} {hour_unit}", HOURS[hour]);
    match minute {
        0 => spoken_hour,
        1 => format!("{spoken_hour} e 1 minuto"),
        m => format!("{spoken_hour} e {m} minutos"),
    }
}

/// Stable cache key for a piece of text rendered with `settings`.
pub fn cache_key(text: &str, settings: &VoiceSettings) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update([0x1f]);
    hasher.update(settings.voice_id.as_bytes());
    hasher.update([0x1f]);
    hasher.update(settings.model_id.as_bytes());
    hasher.update([0x1f]);
    hasher.update(format!("{:.3}:{:.3}", settings.stability, settings.similarity_boost));
    hex::encode(hasher.finalize())
}

/// Capacity-bounded audio cache. Evicts the oldest insertion when full.
#[derive(Debug, Default)]
pub struct TtsCache {
    capacity: usize,
    entries: HashMap<String, Vec<u8>>,
    order: VecDeque<String>,
}

impl TtsCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: String, audio: Vec<u8>) {
        if self.capacity == 0 {
            return;
        }
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = audio;
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, audio);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
