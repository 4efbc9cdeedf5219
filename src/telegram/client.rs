use crate::config::Config;
use crate::error::Error;
use crate::telegram::types::{
    AnswerCallbackQuery, ApiResponse, EditMessageText, InlineKeyboardMarkup, SendMessage,
    SentMessage,
};
use crate::telegram::Messenger;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A [`Messenger`] speaking JSON to the Telegram Bot API over HTTPS.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct TelegramClient {
    http: reqwest::Client,
    endpoint: String,
}

impl TelegramClient {
    /// Build a client for the configured bot token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the underlying HTTP client can't be constructed.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        let endpoint = format!(
            "{}/bot{}",
            config.telegram_api_base.trim_end_matches('/'),
            config.telegram_bot_token
        );
        Ok(Self { http, endpoint })
    }

    async fn call<P, R>(&self, method: &'static str, payload: &P) -> Result<R, Error>
    where
        P: Serialize + Sync,
        R: DeserializeOwned,
    {
        // The bot token is part of the URL; keep it out of error messages and logs.
        let response: ApiResponse<R> = self
            .http
            .post(format!("{}/{method}", self.endpoint))
            .json(payload)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .json()
            .await
            .map_err(reqwest::Error::without_url)?;

        match response {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(Error::Telegram {
                method,
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
        }
    }
}

#[async_trait::async_trait]
impl Messenger for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<i64, Error> {
        let payload = SendMessage {
            chat_id,
            text,
            reply_markup: markup,
        };
        let sent: SentMessage = self.call("sendMessage", &payload).await?;
        Ok(sent.message_id)
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), Error> {
        let payload = EditMessageText {
            chat_id,
            message_id,
            text,
            reply_markup: markup,
        };
        // Result is either the edited Message or `true` for inline messages.
        let _: serde_json::Value = self.call("editMessageText", &payload).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str) -> Result<(), Error> {
        let payload = AnswerCallbackQuery { callback_query_id };
        let _: bool = self.call("answerCallbackQuery", &payload).await?;
        Ok(())
    }
}
