//! Telegram Bot API transport.

use super::{IncomingMessage, MessageTransport, UpdateCursor};
use crate::config::TelegramConfig;
use crate::error::{Result, WeatherWatchError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Quick-reply buttons shown under every bot message
const KEYBOARD: [[&str; 2]; 2] = [
    ["24-hour forecast", "Current safety alerts"],
    ["Runner’s weather analysis", "Driving condition assessment"],
];

/// Long-poll timeout passed to getUpdates, in seconds
const POLL_TIMEOUT_SECS: u32 = 1;

pub struct TelegramClient {
    client: reqwest::Client,
    config: TelegramConfig,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    reply_markup: ReplyKeyboard,
}

#[derive(Debug, Serialize)]
struct ReplyKeyboard {
    keyboard: Vec<Vec<String>>,
    resize_keyboard: bool,
    one_time_keyboard: bool,
}

impl Default for ReplyKeyboard {
    fn default() -> Self {
        Self {
            keyboard: KEYBOARD
                .iter()
                .map(|row| row.iter().map(|b| b.to_string()).collect())
                .collect(),
            resize_keyboard: true,
            one_time_keyboard: false,
        }
    }
}

// Bot API response structures
#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Deserialize)]
struct TgUpdate {
    update_id: i64,
    #[serde(default)]
    message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }

    /// The bot token is part of every URL, so it is stripped from errors
    fn transport_error(e: reqwest::Error) -> WeatherWatchError {
        WeatherWatchError::Transport(format!("Telegram: {}", e.without_url()))
    }

    fn check<T>(response: TgResponse<T>, method: &str) -> Result<Option<T>> {
        if response.ok {
            Ok(response.result)
        } else {
            Err(WeatherWatchError::Transport(format!(
                "Telegram {} failed: {}",
                method,
                response.description.unwrap_or_else(|| "unknown error".into())
            )))
        }
    }

    /// Keep only text messages, advancing the cursor past every update seen
    fn collect_messages(
        updates: Vec<TgUpdate>,
        cursor: UpdateCursor,
    ) -> (Vec<IncomingMessage>, UpdateCursor) {
        let mut cursor = cursor;
        let mut messages = Vec::new();

        for update in updates {
            cursor = cursor.advance(update.update_id);
            if let Some(TgMessage {
                chat,
                text: Some(text),
            }) = update.message
            {
                messages.push(IncomingMessage {
                    update_id: update.update_id,
                    chat_id: chat.id,
                    text,
                });
            }
        }

        (messages, cursor)
    }
}

#[async_trait]
impl MessageTransport for TelegramClient {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        let body = SendMessageRequest {
            chat_id,
            text,
            reply_markup: ReplyKeyboard::default(),
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let parsed: TgResponse<serde_json::Value> =
            response.json().await.map_err(Self::transport_error)?;
        Self::check(parsed, "sendMessage")?;
        Ok(())
    }

    async fn poll(&self, cursor: UpdateCursor) -> Result<(Vec<IncomingMessage>, UpdateCursor)> {
        let url = format!(
            "{}?offset={}&timeout={}",
            self.method_url("getUpdates"),
            cursor.next_offset(),
            POLL_TIMEOUT_SECS
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let parsed: TgResponse<Vec<TgUpdate>> =
            response.json().await.map_err(Self::transport_error)?;
        let updates = Self::check(parsed, "getUpdates")?.unwrap_or_default();

        Ok(Self::collect_messages(updates, cursor))
    }
}
