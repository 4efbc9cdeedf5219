//! The subset of Telegram Bot API objects the webhook consumes and produces.

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct User {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn callback(text: impl Into<String>, data: impl ToString) -> Self {
        Self {
            text: text.into(),
            callback_data: data.to_string(),
        }
    }
}

impl InlineKeyboardMarkup {
    /// One button per row.
    pub fn column(buttons: impl IntoIterator<Item = InlineKeyboardButton>) -> Self {
        Self {
            inline_keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, row: Vec<InlineKeyboardButton>) -> Self {
        if !row.is_empty() {
            self.inline_keyboard.push(row);
        }
        self
    }

    /// Every button's callback data, row by row.
    pub fn callback_data(&self) -> impl Iterator<Item = &str> {
        self.inline_keyboard
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
    }
}

#[derive(Serialize, Debug)]
pub(super) struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize, Debug)]
pub(super) struct EditMessageText<'a> {
    pub chat_id: i64,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize, Debug)]
pub(super) struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Deserialize, Debug)]
pub(super) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(super) struct SentMessage {
    pub message_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_callback_update() {
        let update: Update = serde_json::from_str(
            r#"{
                "update_id": 10,
                "callback_query": {
                    "id": "cb-1",
                    "from": { "id": 42, "is_bot": false, "first_name": "op" },
                    "message": { "message_id": 7, "chat": { "id": 99, "type": "private" }, "date": 0 },
                    "data": "listzones_1"
                }
            }"#,
        )
        .unwrap();
        let cq = update.callback_query.unwrap();
        assert_eq!(cq.from.id, 42);
        assert_eq!(cq.data.as_deref(), Some("listzones_1"));
        assert_eq!(cq.message.unwrap().chat.id, 99);
        assert!(update.message.is_none());
    }

    #[test]
    fn keyboard_skips_empty_rows() {
        let kb = InlineKeyboardMarkup::column([InlineKeyboardButton::callback("a", "x_1")])
            .with_row(vec![]);
        assert_eq!(kb.inline_keyboard.len(), 1);
        let json = serde_json::to_value(&kb).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "inline_keyboard": [[{ "text": "a", "callback_data": "x_1" }]] })
        );
    }
}
