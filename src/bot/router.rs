use crate::bot::command::{Command, SetRecord};
use crate::bot::menus::{self, Menu};
use crate::bot::nav::NavToken;
use crate::bot::DNS_RECORDS_PER_PAGE;
use crate::config::Shared;
use crate::error::Error;
use crate::provider::{DnsRecord, DynProvider, NewDnsRecord, AUTO_TTL};
use crate::telegram::{DynMessenger, Update};
use crate::zone_cache::ZoneCache;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// The parts of an [`Update`] the router acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Event {
    chat_id: i64,
    user_id: i64,
    message_id: i64,
    input: Input,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Text(String),
    Callback { id: String, data: Option<String> },
}

impl Event {
    fn from_update(update: Update) -> Option<Self> {
        if let Some(message) = update.message {
            return Some(Event {
                chat_id: message.chat.id,
                user_id: message.from?.id,
                message_id: message.message_id,
                input: Input::Text(message.text.unwrap_or_default()),
            });
        }
        let callback = update.callback_query?;
        let message = callback.message?;
        Some(Event {
            chat_id: message.chat.id,
            user_id: callback.from.id,
            message_id: message.message_id,
            input: Input::Callback {
                id: callback.id,
                data: callback.data,
            },
        })
    }
}

/// Routes webhook updates to menu renderers and provider calls.
///
/// The router is stateless across updates apart from the shared [`ZoneCache`]; every reply is
/// rebuilt from the navigation token carried by the pressed button.
pub struct EventRouter {
    config: Shared,
    messenger: DynMessenger,
    provider: DynProvider,
    zone_cache: Arc<ZoneCache>,
}

impl EventRouter {
    pub fn new(config: Shared, messenger: DynMessenger, provider: DynProvider) -> Self {
        let zone_cache = Arc::new(ZoneCache::new(provider.clone(), config.zone_cache_ttl));
        Self::with_zone_cache(config, messenger, provider, zone_cache)
    }

    pub fn with_zone_cache(
        config: Shared,
        messenger: DynMessenger,
        provider: DynProvider,
        zone_cache: Arc<ZoneCache>,
    ) -> Self {
        Self {
            config,
            messenger,
            provider,
            zone_cache,
        }
    }

    /// Handle one webhook update to completion. Never fails: errors are logged and, where a
    /// chat is known, reported to the user with a generic apology.
    pub async fn handle_update(&self, update: Update) {
        let update_id = update.update_id;
        let Some(event) = Event::from_update(update) else {
            debug!("ignoring update {update_id} without a message or callback");
            return;
        };

        if let Input::Callback { id, .. } = &event.input {
            let messenger = Arc::clone(&self.messenger);
            let id = id.clone();
            tokio::spawn(async move {
                if let Err(err) = messenger.answer_callback(&id).await {
                    warn!("failed to answer callback query: {err}");
                }
            });
        }

        if !self.config.user_permitted(event.user_id) {
            info!("refused update from unauthorized user {}", event.user_id);
            self.send(event.chat_id, &Menu::text(menus::UNAUTHORIZED)).await;
            return;
        }

        let outcome = AssertUnwindSafe(self.dispatch(&event)).catch_unwind().await;
        let failed = match outcome {
            Ok(Ok(())) => false,
            Ok(Err(err)) => {
                error!("unhandled error in update {update_id}: {err:?}");
                true
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_default();
                error!("panic while handling update {update_id}: {reason}");
                true
            }
        };
        if failed {
            self.send(event.chat_id, &Menu::text(menus::UNEXPECTED_ERROR))
                .await;
        }
    }

    async fn dispatch(&self, event: &Event) -> Result<(), Error> {
        match &event.input {
            Input::Callback {
                data: Some(data), ..
            } => {
                let token: NavToken = match data.parse() {
                    Ok(token) => token,
                    Err(err) => {
                        warn!("{err}");
                        return Ok(());
                    }
                };
                self.navigate(event.chat_id, event.message_id, token).await
            }
            Input::Callback { data: None, .. } => Ok(()),
            Input::Text(text) => match Command::parse(text) {
                None => Ok(()),
                Some(Err(rejection)) => {
                    self.send(event.chat_id, &Menu::text(rejection.to_string()))
                        .await;
                    Ok(())
                }
                Some(Ok(command)) => self.run(event.chat_id, command).await,
            },
        }
    }

    async fn run(&self, chat_id: i64, command: Command) -> Result<(), Error> {
        match command {
            Command::Help => {
                self.send(chat_id, &menus::welcome()).await;
                Ok(())
            }
            Command::Domains => self.list_zones(chat_id, 0, None).await,
            Command::SetRecord(request) => self.set_record(chat_id, request).await,
        }
    }

    async fn navigate(
        &self,
        chat_id: i64,
        message_id: i64,
        token: NavToken,
    ) -> Result<(), Error> {
        debug!("navigating to {token}");
        let menu = match token {
            NavToken::ListZones { page } => {
                return self.list_zones(chat_id, page, Some(message_id)).await;
            }
            NavToken::Domain { zone_id } => {
                let zone_name = self.zone_cache.zone_name(&zone_id).await;
                menus::domain_actions(&zone_id, &zone_name)
            }
            NavToken::Analytics { zone_id } => {
                let zone_name = self.zone_cache.zone_name(&zone_id).await;
                self.edit(chat_id, message_id, &menus::analytics_loading(&zone_name))
                    .await;
                let summary = self
                    .provider
                    .zone_analytics(&zone_id)
                    .await
                    .unwrap_or_else(|err| {
                        error!("failed to fetch analytics for zone {zone_id}: {err}");
                        None
                    });
                menus::analytics(&zone_id, &zone_name, summary.as_ref())
            }
            NavToken::DnsMenu { zone_id } => {
                let zone_name = self.zone_cache.zone_name(&zone_id).await;
                menus::dns_menu(&zone_id, &zone_name)
            }
            NavToken::DnsRecords { zone_id, page } => {
                let zone_name = self.zone_cache.zone_name(&zone_id).await;
                self.edit(chat_id, message_id, &menus::records_loading(&zone_name))
                    .await;
                let records = self.records(&zone_id).await;
                menus::record_list(&zone_id, &zone_name, &records, page)
            }
            NavToken::DnsDetail {
                zone_id,
                page,
                index,
            } => {
                let zone_name = self.zone_cache.zone_name(&zone_id).await;
                self.edit(chat_id, message_id, &menus::record_detail_loading(&zone_name))
                    .await;
                let record = self.record_at(&zone_id, page, index).await;
                menus::record_detail(&zone_id, &zone_name, page, record.as_ref())
            }
            NavToken::DnsAddType { zone_id } => {
                let zone_name = self.zone_cache.zone_name(&zone_id).await;
                menus::add_record_type(&zone_id, &zone_name)
            }
            NavToken::DnsAddParams {
                zone_id,
                record_type,
            } => {
                let zone_name = self.zone_cache.zone_name(&zone_id).await;
                menus::add_record_instructions(&zone_id, &zone_name, record_type)
            }
        };
        self.edit(chat_id, message_id, &menu).await;
        Ok(())
    }

    /// Show a page of zones, editing `message_id` in place or, for `/domains`, sending a
    /// loading message first and editing that.
    async fn list_zones(
        &self,
        chat_id: i64,
        page: usize,
        message_id: Option<i64>,
    ) -> Result<(), Error> {
        let message_id = match message_id {
            Some(message_id) => {
                self.edit(chat_id, message_id, &Menu::text(menus::ZONES_REFRESHING))
                    .await;
                message_id
            }
            None => match self.send(chat_id, &Menu::text(menus::ZONES_LOADING)).await {
                Some(message_id) => message_id,
                None => {
                    error!("could not send the zone list loading message, check the bot token");
                    self.send(chat_id, &Menu::text(menus::LOADING_MESSAGE_FAILED))
                        .await;
                    return Ok(());
                }
            },
        };

        let zones = self.zone_cache.zones().await;
        let menu = if zones.is_empty() {
            Menu::text(menus::NO_ZONES)
        } else {
            menus::zone_list(&zones, page)
        };
        self.edit(chat_id, message_id, &menu).await;
        Ok(())
    }

    async fn set_record(&self, chat_id: i64, request: SetRecord) -> Result<(), Error> {
        let Some(zone) = self.zone_cache.find_by_name(&request.domain).await else {
            self.send(chat_id, &menus::domain_not_found(&request.domain))
                .await;
            return Ok(());
        };

        self.send(chat_id, &menus::record_adding(request.record_type, &request.fqdn()))
            .await;
        let new_record = NewDnsRecord {
            record_type: request.record_type.to_string(),
            name: request.name,
            content: request.content,
            ttl: AUTO_TTL,
            proxied: request.proxied,
        };
        let menu = match self.provider.create_dns_record(&zone.id, &new_record).await {
            Ok(created) => {
                info!(
                    "created {} record {} in zone {}",
                    created.record_type, created.name, zone.name
                );
                menus::record_created(&zone.id, request.record_type, &created)
            }
            Err(Error::RecordRejected(reason)) => menus::record_add_failed(&reason),
            Err(err) => {
                error!("error adding DNS record to zone {}: {err:?}", zone.name);
                menus::record_add_failed(&err.to_string())
            }
        };
        self.send(chat_id, &menu).await;
        Ok(())
    }

    /// Records of a zone in type-then-name order. Positional navigation tokens depend on this
    /// order being the same for every fetch of an unchanged zone.
    async fn records(&self, zone_id: &str) -> Vec<DnsRecord> {
        let mut records = self
            .provider
            .list_dns_records(zone_id)
            .await
            .unwrap_or_else(|err| {
                error!("failed to fetch DNS records for zone {zone_id}: {err}");
                Vec::new()
            });
        records.sort_by(|a, b| {
            a.record_type
                .cmp(&b.record_type)
                .then_with(|| a.name.cmp(&b.name))
        });
        records
    }

    async fn record_at(&self, zone_id: &str, page: usize, index: usize) -> Option<DnsRecord> {
        let position = page
            .checked_mul(DNS_RECORDS_PER_PAGE)
            .and_then(|start| start.checked_add(index))?;
        self.records(zone_id).await.into_iter().nth(position)
    }

    async fn send(&self, chat_id: i64, menu: &Menu) -> Option<i64> {
        match self
            .messenger
            .send_message(chat_id, &menu.text, menu.keyboard.as_ref())
            .await
        {
            Ok(message_id) => Some(message_id),
            Err(err) => {
                error!("failed to send message to chat {chat_id}: {err}");
                None
            }
        }
    }

    async fn edit(&self, chat_id: i64, message_id: i64, menu: &Menu) {
        if let Err(err) = self
            .messenger
            .edit_message(chat_id, message_id, &menu.text, menu.keyboard.as_ref())
            .await
        {
            error!("failed to edit message {message_id} in chat {chat_id}: {err}");
        }
    }
}
