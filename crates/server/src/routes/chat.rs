use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;

use jarvis_api::{
    ChatMessage, DEFAULT_USER_ID, LimitQuery, VoiceCommandRequest, VoiceCommandResponse, db,
    timestamp,
};
use jarvis_core::memory::{MemoryKind, NewMemory};
use jarvis_core::text::truncate;

use crate::AppState;
use crate::assistant;
use crate::error::ApiErr;
use crate::storage::{Db, chat_from_row, insert_interaction, sq_execute, sq_query_map, sq_query_row};

const MAX_MESSAGE_CHARS: usize = 4000;

/// GET /api/chat-messages: conversation history, oldest first.
pub async fn chat_messages(
    State(db): State<Db>,
    Query(q): Query<LimitQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiErr> {
    let conn = db.conn();
    let mut messages = sq_query_map(
        &conn,
        db::chat::recent(DEFAULT_USER_ID, q.resolve(50, 500)),
        chat_from_row,
    )
    .map_err(ApiErr::from_db("list chat messages"))?;
    messages.reverse();
    Ok(Json(messages))
}

fn insert_message(db: &Db, content: &str, is_user: bool) -> Result<ChatMessage, ApiErr> {
    let conn = db.conn();
    let now = timestamp(Utc::now());
    sq_execute(
        &conn,
        db::chat::insert(DEFAULT_USER_ID, content, is_user, &now),
    )
    .map_err(ApiErr::from_db("insert chat message"))?;
    let id = conn.last_insert_rowid();
    sq_query_row(&conn, db::chat::get(id), chat_from_row).map_err(ApiErr::from_db("read chat message"))
}

/// POST /api/voice-command: answer a spoken/typed command.
///
/// Stores the owner's message, the reply, every provider attempt and a
/// conversation memory entry.
pub async fn voice_command(
    State(state): State<AppState>,
    Json(req): Json<VoiceCommandRequest>,
) -> Result<Json<VoiceCommandResponse>, ApiErr> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiErr::bad_request("text is required"));
    }
    if text.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiErr::bad_request(format!(
            "text is limited to {MAX_MESSAGE_CHARS} characters"
        )));
    }

    let user_message = insert_message(&state.db, text, true)?;
    let answer = assistant::answer(&state, text).await;
    let bot_message = insert_message(&state.db, &answer.reply, false)?;

    {
        let conn = state.db.conn();
        for attempt in &answer.attempts {
            if let Err(e) = insert_interaction(&conn, attempt) {
                tracing::error!("log AI interaction: {e}");
            }
        }
    }

    let memory = NewMemory {
        kind: MemoryKind::Conversation,
        content: format!("{} → {}", text, truncate(&answer.reply, 280)),
        importance: 0.3,
        tags: vec![answer.intent.as_str().to_string()],
        expires_at: Some(Utc::now() + chrono::Duration::days(30)),
    };
    if let Err(e) = state.memory.write().await.add(memory, Utc::now()) {
        tracing::warn!("store conversation memory: {e}");
    }

    tracing::info!(
        intent = %answer.intent,
        provider = %answer.provider,
        attempts = answer.attempts.len(),
        "voice command answered"
    );

    Ok(Json(VoiceCommandResponse {
        user_message,
        bot_message,
        intent: answer.intent.as_str().to_string(),
        provider: answer.provider,
    }))
}
