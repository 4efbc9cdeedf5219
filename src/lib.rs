//! Zone Crab
//!
//! A Telegram bot for browsing and editing the DNS zones of a single [Cloudflare] account from
//! a chat.
//!
//! Telegram delivers every message and button press to the bot's [webhook][api]. The
//! [`EventRouter`] checks the sender against the optional allow-list, then either runs a slash
//! command (`/start`, `/domains`, `/set_a_record`, `/set_aaaa_record`) or follows the
//! [`NavToken`][bot::NavToken] carried by an inline keyboard button. Replies are rendered from
//! fresh [provider] data on every turn; the only state kept between updates is a short lived
//! [zone list cache][zone_cache::ZoneCache].
//!
//! [Cloudflare]: https://developers.cloudflare.com/api/
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod provider;
pub mod telegram;
pub mod zone_cache;

pub use api::new as new_http;
pub use bot::EventRouter;
pub use config::{Config, Shared};
pub use provider::CloudflareClient;
pub use telegram::TelegramClient;
