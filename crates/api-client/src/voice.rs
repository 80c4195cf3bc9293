use std::time::Duration;

use serde::Serialize;

use jarvis_core::tts::VoiceSettings;

use crate::error::{ClientError, check_status};

const ELEVENLABS_URL: &str = "https://api.elevenlabs.io/v1";

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: SpeechVoice,
}

#[derive(Serialize)]
struct SpeechVoice {
    stability: f32,
    similarity_boost: f32,
}

/// ElevenLabs text-to-speech.
#[derive(Clone)]
pub struct ElevenLabsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            base_url: ELEVENLABS_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Synthesize `text` and return MP3 bytes.
    pub async fn synthesize(
        &self,
        text: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>, ClientError> {
        let body = SpeechRequest {
            text,
            model_id: &settings.model_id,
            voice_settings: SpeechVoice {
                stability: settings.stability,
                similarity_boost: settings.similarity_boost,
            },
        };
        let resp = self
            .client
            .post(format!(
                "{}/text-to-speech/{}",
                self.base_url, settings.voice_id
            ))
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&body)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        let audio = resp.bytes().await?;
        if audio.is_empty() {
            return Err(ClientError::Decode("empty audio".into()));
        }
        Ok(audio.to_vec())
    }
}
