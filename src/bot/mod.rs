//! Chat side of the bot: slash commands, the inline keyboard menus and the router that ties
//! them to the DNS provider.

pub mod command;
pub mod format;
pub mod menus;
pub mod nav;
pub mod paginate;
mod router;

pub use command::{Command, CommandError, SetRecord};
pub use nav::NavToken;
pub use router::EventRouter;

pub const ZONES_PER_PAGE: usize = 5;
pub const DNS_RECORDS_PER_PAGE: usize = 8;
