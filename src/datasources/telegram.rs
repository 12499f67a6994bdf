use crate::config::TelegramConfig;
use crate::error::{Result, WindWatchError};
use crate::logic::Notifier;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

pub struct TelegramClient {
    client: reqwest::Client,
    config: TelegramConfig,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .finish()
    }
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Bot API method URL; contains the token, never log it
    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.token,
            method
        )
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let payload = SendMessage {
            chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                WindWatchError::DataSourceUnavailable(format!("Telegram: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(WindWatchError::DataSourceUnavailable(format!(
                "Telegram returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }

    /// Test the bot token with getMe
    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.method_url("getMe"))
            .send()
            .await
            .map_err(|e| {
                WindWatchError::DataSourceUnavailable(format!("Telegram: {}", e.without_url()))
            })?;

        Ok(response.status().is_success())
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn notify(&self, text: &str) -> Result<()> {
        self.send_message(&self.config.chat_id, text).await
    }
}
