//! Outbound messages.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::AlertError;

const TELEGRAM_API: &str = "https://api.telegram.org";

pub trait Notifier {
    async fn send(&self, text: &str) -> Result<(), AlertError>;
}

/// Telegram Bot API `sendMessage` with HTML parse mode.
#[derive(Debug, Clone)]
pub struct Telegram {
    client: reqwest::Client,
    api_base: String,
    bot_key: String,
    chat_id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl Telegram {
    pub fn new(bot_key: impl Into<String>, chat_id: i64, timeout: Duration) -> Result<Self, AlertError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: TELEGRAM_API.to_string(),
            bot_key: bot_key.into(),
            chat_id,
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_key)
    }
}

impl Notifier for Telegram {
    async fn send(&self, text: &str) -> Result<(), AlertError> {
        if text.is_empty() {
            return Ok(());
        }

        // The API answers errors with a JSON body too, so no status check
        // before decoding.
        let response: TelegramResponse = self
            .client
            .get(self.send_message_url())
            .query(&[
                ("chat_id", self.chat_id.to_string()),
                ("text", text.to_string()),
                ("parse_mode", "html".to_string()),
                ("disable_web_page_preview", "true".to_string()),
            ])
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            return Err(AlertError::Notifier(
                response.description.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        debug!(chat_id = self.chat_id, len = text.len(), "message delivered");
        Ok(())
    }
}
