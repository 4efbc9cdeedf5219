//! In-memory stand-ins for the Telegram and Cloudflare clients.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use zonecrab::error::Error;
use zonecrab::provider::{AnalyticsSummary, DnsProvider, DnsRecord, NewDnsRecord, Zone};
use zonecrab::telegram::types::{CallbackQuery, Chat, Message, User};
use zonecrab::telegram::{InlineKeyboardMarkup, Messenger, Update};
use zonecrab::{Config, EventRouter, Shared};

pub const CHAT: i64 = 100;
pub const USER: i64 = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Message {
        chat_id: i64,
        text: String,
        buttons: Vec<String>,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        buttons: Vec<String>,
    },
}

impl Sent {
    pub fn text(&self) -> &str {
        match self {
            Sent::Message { text, .. } | Sent::Edit { text, .. } => text,
        }
    }

    pub fn buttons(&self) -> &[String] {
        match self {
            Sent::Message { buttons, .. } | Sent::Edit { buttons, .. } => buttons,
        }
    }
}

fn buttons(markup: Option<&InlineKeyboardMarkup>) -> Vec<String> {
    markup
        .map(|m| m.callback_data().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Records every outbound call. Message IDs count up from 1000. `attempted` also holds the
/// texts of sends that were made to fail.
#[derive(Default)]
pub struct RecordingMessenger {
    pub sent: Mutex<Vec<Sent>>,
    pub attempted: Mutex<Vec<String>>,
    pub answered: Mutex<Vec<String>>,
    next_id: AtomicI64,
    pub fail_sends: bool,
}

impl RecordingMessenger {
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<i64, Error> {
        self.attempted.lock().unwrap().push(text.to_string());
        if self.fail_sends {
            return Err(Error::Telegram {
                method: "sendMessage",
                description: "Unauthorized".into(),
            });
        }
        self.sent.lock().unwrap().push(Sent::Message {
            chat_id,
            text: text.to_string(),
            buttons: buttons(markup),
        });
        Ok(1000 + self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn edit_message(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), Error> {
        self.sent.lock().unwrap().push(Sent::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            buttons: buttons(markup),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str) -> Result<(), Error> {
        self.answered
            .lock()
            .unwrap()
            .push(callback_query_id.to_string());
        Ok(())
    }
}

/// Serves fixed zones, records and analytics, and remembers record creations.
#[derive(Default)]
pub struct MockProvider {
    pub zones: Vec<Zone>,
    pub records: Vec<DnsRecord>,
    pub analytics: Option<AnalyticsSummary>,
    pub reject_create: Option<String>,
    pub panic_on_records: bool,
    pub fail_analytics: bool,
    pub created: Mutex<Vec<(String, NewDnsRecord)>>,
    pub zone_calls: AtomicI64,
}

impl MockProvider {
    pub fn with_zones(zones: &[(&str, &str)]) -> Self {
        Self {
            zones: zones
                .iter()
                .map(|(id, name)| Zone {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub fn created(&self) -> Vec<(String, NewDnsRecord)> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsProvider for MockProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
        self.zone_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.zones.clone())
    }

    async fn list_dns_records(&self, _zone_id: &str) -> Result<Vec<DnsRecord>, Error> {
        assert!(!self.panic_on_records, "record listing blew up");
        Ok(self.records.clone())
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        record: &NewDnsRecord,
    ) -> Result<DnsRecord, Error> {
        self.created
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record.clone()));
        if let Some(reason) = &self.reject_create {
            return Err(Error::RecordRejected(reason.clone()));
        }
        let zone_name = self
            .zones
            .iter()
            .find(|z| z.id == zone_id)
            .map(|z| z.name.clone())
            .unwrap_or_default();
        let name = if record.name == "@" {
            zone_name
        } else {
            format!("{}.{zone_name}", record.name)
        };
        Ok(DnsRecord {
            id: "new-record".into(),
            name,
            record_type: record.record_type.clone(),
            content: record.content.clone(),
            proxied: record.proxied,
            ttl: record.ttl,
        })
    }

    async fn zone_analytics(&self, _zone_id: &str) -> Result<Option<AnalyticsSummary>, Error> {
        if self.fail_analytics {
            return Err(Error::Provider {
                operation: "zone analytics",
                status: reqwest::StatusCode::BAD_GATEWAY,
            });
        }
        Ok(self.analytics)
    }
}

pub fn config(allowed_user_id: Option<&str>) -> Shared {
    let config: Config = serde_json::from_value(json!({
        "api_bind_addr": "127.0.0.1:0",
        "telegram_bot_token": "123:token",
        "cloudflare_api_token": "cf-token",
        "cloudflare_account_id": "acct",
        "allowed_user_id": allowed_user_id,
    }))
    .unwrap();
    Arc::new(config)
}

pub fn router(
    allowed_user_id: Option<&str>,
    messenger: &Arc<RecordingMessenger>,
    provider: &Arc<MockProvider>,
) -> EventRouter {
    EventRouter::new(
        config(allowed_user_id),
        messenger.clone(),
        provider.clone(),
    )
}

pub fn text_update(text: &str) -> Update {
    Update {
        update_id: 1,
        message: Some(Message {
            message_id: 7,
            chat: Chat { id: CHAT },
            from: Some(User { id: USER }),
            text: Some(text.to_string()),
        }),
        callback_query: None,
    }
}

pub fn callback_update(data: &str) -> Update {
    Update {
        update_id: 2,
        message: None,
        callback_query: Some(CallbackQuery {
            id: "cb-1".into(),
            from: User { id: USER },
            message: Some(Message {
                message_id: 55,
                chat: Chat { id: CHAT },
                from: None,
                text: None,
            }),
            data: Some(data.to_string()),
        }),
    }
}

pub fn record(name: &str, record_type: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: format!("id-{name}-{record_type}"),
        name: name.to_string(),
        record_type: record_type.to_string(),
        content: content.to_string(),
        proxied: false,
        ttl: 1,
    }
}
