use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use jarvis_api::{OkResponse, SlackNotifyRequest, TtsPrepareResponse, TtsRequest};
use jarvis_core::tts::{cache_key, sanitize};

use crate::AppState;
use crate::error::ApiErr;

const MAX_TTS_CHARS: usize = 5000;

fn sanitized(text: &str) -> Result<String, ApiErr> {
    let clean = sanitize(text);
    if clean.is_empty() {
        return Err(ApiErr::bad_request("text is required"));
    }
    if clean.chars().count() > MAX_TTS_CHARS {
        return Err(ApiErr::bad_request(format!(
            "text is limited to {MAX_TTS_CHARS} characters"
        )));
    }
    Ok(clean)
}

/// POST /api/tts/prepare: the text that would be spoken, and its cache key.
pub async fn prepare(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Json<TtsPrepareResponse>, ApiErr> {
    let text = sanitized(&req.text)?;
    let key = cache_key(&text, &state.config.voice);
    let cached = state.tts_cache.lock().await.get(&key).is_some();
    Ok(Json(TtsPrepareResponse {
        text,
        cache_key: key,
        cached,
    }))
}

/// POST /api/tts: MP3 audio via ElevenLabs, served from cache when possible.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Response, ApiErr> {
    let client = state
        .services
        .tts
        .as_ref()
        .ok_or_else(|| ApiErr::unavailable("text-to-speech is not configured"))?;
    let text = sanitized(&req.text)?;
    let key = cache_key(&text, &state.config.voice);

    let cached = state.tts_cache.lock().await.get(&key).map(<[u8]>::to_vec);
    let (audio, hit) = match cached {
        Some(audio) => (audio, true),
        None => {
            let audio = client
                .synthesize(&text, &state.config.voice)
                .await
                .map_err(ApiErr::from_upstream("elevenlabs"))?;
            state.tts_cache.lock().await.insert(key, audio.clone());
            (audio, false)
        }
    };
    tracing::debug!(bytes = audio.len(), cache_hit = hit, "tts audio ready");

    Ok((
        [
            (header::CONTENT_TYPE, "audio/mpeg"),
            (header::CACHE_CONTROL, "private, max-age=3600"),
        ],
        audio,
    )
        .into_response())
}

/// POST /api/slack/notify
pub async fn slack_notify(
    State(state): State<AppState>,
    Json(req): Json<SlackNotifyRequest>,
) -> Result<Json<OkResponse>, ApiErr> {
    let slack = state
        .services
        .slack
        .as_ref()
        .ok_or_else(|| ApiErr::unavailable("slack is not configured"))?;
    if req.text.trim().is_empty() {
        return Err(ApiErr::bad_request("text is required"));
    }
    slack
        .notify(req.text.trim(), req.channel.as_deref())
        .await
        .map_err(ApiErr::from_upstream("slack"))?;
    Ok(Json(OkResponse { ok: true }))
}
