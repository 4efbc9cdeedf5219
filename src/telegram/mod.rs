//! Telegram Bot API plumbing.
//!
//! Inbound updates arrive through the [webhook][crate::api]; outbound calls go through the
//! [`Messenger`] trait so the [event router][crate::bot] can be exercised without a network.
//! [`client::TelegramClient`] is the production implementation.

use crate::error::Error;
use std::sync::Arc;

pub mod client;
pub mod types;

pub use client::TelegramClient;
pub use types::{CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, Message, Update};

/// `DynMessenger` is a shared handle to a [`Messenger`] used by concurrent webhook deliveries.
pub type DynMessenger = Arc<dyn Messenger + Send + Sync>;

/// The three Bot API methods the bot needs.
#[async_trait::async_trait]
pub trait Messenger {
    /// Send a new message to `chat_id`, returning the new message's ID.
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<i64, Error>;

    /// Replace the text and keyboard of an existing message.
    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), Error>;

    /// Acknowledge an inline button press so the client stops showing a spinner.
    async fn answer_callback(&self, callback_query_id: &str) -> Result<(), Error>;
}
