//! Message text and inline keyboards for every menu the bot renders.
//!
//! Everything here is a pure function of provider data and a [`NavToken`] target, so the
//! menus can be checked without a chat or a provider.

use crate::bot::format::{format_bytes, group_thousands, percentage};
use crate::bot::nav::NavToken;
use crate::bot::paginate::paginate;
use crate::bot::{DNS_RECORDS_PER_PAGE, ZONES_PER_PAGE};
use crate::provider::{AnalyticsSummary, DnsRecord, Zone, AUTO_TTL};
use crate::telegram::{InlineKeyboardButton as Button, InlineKeyboardMarkup as Keyboard};
use trust_dns_proto::rr::RecordType;

pub const UNAUTHORIZED: &str = "⛔️ You are not allowed to use this bot.";
pub const UNEXPECTED_ERROR: &str =
    "😕 Sorry, something unexpected went wrong. Please try again later or contact the admin.";
pub const ZONES_LOADING: &str = "⏳ Fetching the domain list...";
pub const ZONES_REFRESHING: &str = "Refreshing the domain list...";
pub const NO_ZONES: &str = "⚠️ No domains were found in your account.";
pub const LOADING_MESSAGE_FAILED: &str =
    "Error: could not send the initial message. Check the bot token.";

/// Text plus optional keyboard, ready to send or to replace an existing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Menu {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}

fn button(text: impl Into<String>, target: &NavToken) -> Button {
    Button::callback(text, target)
}

fn prev_next_row(
    has_prev: bool,
    has_next: bool,
    to_page: impl Fn(usize) -> NavToken,
    page: usize,
) -> Vec<Button> {
    let mut row = Vec::with_capacity(2);
    if has_prev {
        row.push(button("⬅️ Previous page", &to_page(page - 1)));
    }
    if has_next {
        row.push(button("➡️ Next page", &to_page(page + 1)));
    }
    row
}

fn proxy_label(proxied: bool) -> &'static str {
    if proxied {
        "on ✅"
    } else {
        "off ❌"
    }
}

fn ttl_label(ttl: u32) -> String {
    if ttl == AUTO_TTL {
        "Auto".to_string()
    } else {
        ttl.to_string()
    }
}

fn zone_list_target() -> NavToken {
    NavToken::ListZones { page: 0 }
}

pub fn welcome() -> Menu {
    Menu::with_keyboard(
        "👋 Welcome to the Cloudflare domain management bot!\n\n\
         Tap the button below or send /domains to get started.",
        Keyboard::column([button("🗂️ My Domains", &zone_list_target())]),
    )
}

pub fn zone_list(zones: &[Zone], page: usize) -> Menu {
    let page = paginate(zones, page, ZONES_PER_PAGE);
    let keyboard = Keyboard::column(page.items.iter().map(|zone| {
        button(
            zone.name.clone(),
            &NavToken::Domain {
                zone_id: zone.id.clone(),
            },
        )
    }))
    .with_row(prev_next_row(
        page.has_prev,
        page.has_next,
        |page| NavToken::ListZones { page },
        page.number,
    ));
    let text = if page.items.is_empty() {
        "There are no domains to show on this page."
    } else {
        "Please choose a domain:"
    };
    Menu::with_keyboard(text, keyboard)
}

pub fn domain_actions(zone_id: &str, zone_name: &str) -> Menu {
    let zone_id = zone_id.to_string();
    Menu::with_keyboard(
        format!("Domain: {zone_name}\nWhat would you like to do?"),
        Keyboard::column([
            button(
                "🛡️ Manage DNS",
                &NavToken::DnsMenu {
                    zone_id: zone_id.clone(),
                },
            ),
            button(
                "📊 Analytics",
                &NavToken::Analytics {
                    zone_id: zone_id.clone(),
                },
            ),
            button("↩️ Back to domain list", &zone_list_target()),
        ]),
    )
}

pub fn analytics_loading(zone_name: &str) -> Menu {
    Menu::text(format!("⏳ Fetching analytics for {zone_name}..."))
}

pub fn analytics(zone_id: &str, zone_name: &str, summary: Option<&AnalyticsSummary>) -> Menu {
    let mut text = format!("📊 Analytics for {zone_name} (last 24 hours):\n\n");
    match summary {
        Some(s) => {
            text.push_str(&format!(
                "Total requests: {}\n",
                group_thousands(s.total_requests)
            ));
            text.push_str(&format!(
                "Cached requests: {} ({}%)\n",
                group_thousands(s.cached_requests),
                percentage(s.cached_requests, s.total_requests)
            ));
            text.push_str(&format!(
                "Total data served: {}\n",
                format_bytes(s.total_bytes)
            ));
            text.push_str(&format!("Data served from cache: {}\n", format_bytes(s.cached_bytes)));
        }
        None => text.push_str(
            "❌ No analytics data is available, or fetching it failed.\n\
             (The Cloudflare API token needs the `Analytics:Read` permission. New domains or \
             some plans may have no data. Check the bot logs for details.)",
        ),
    }
    Menu::with_keyboard(
        text,
        Keyboard::column([button(
            "↩️ Back to domain actions",
            &NavToken::Domain {
                zone_id: zone_id.to_string(),
            },
        )]),
    )
}

pub fn dns_menu(zone_id: &str, zone_name: &str) -> Menu {
    let zone_id = zone_id.to_string();
    Menu::with_keyboard(
        format!("DNS management for: {zone_name}\nPlease choose:"),
        Keyboard::column([
            button(
                "📄 View records",
                &NavToken::DnsRecords {
                    zone_id: zone_id.clone(),
                    page: 0,
                },
            ),
            button(
                "➕ Add a new record",
                &NavToken::DnsAddType {
                    zone_id: zone_id.clone(),
                },
            ),
            button("↩️ Back to domain actions", &NavToken::Domain { zone_id }),
        ]),
    )
}

fn back_to_dns_menu(zone_id: &str) -> Button {
    button(
        "↩️ Back to DNS management",
        &NavToken::DnsMenu {
            zone_id: zone_id.to_string(),
        },
    )
}

pub fn records_loading(zone_name: &str) -> Menu {
    Menu::text(format!("⏳ Fetching DNS records for {zone_name}..."))
}

pub fn record_list(zone_id: &str, zone_name: &str, records: &[DnsRecord], page: usize) -> Menu {
    if records.is_empty() {
        return Menu::with_keyboard(
            format!("⚠️ No records were found for {zone_name}."),
            Keyboard::column([back_to_dns_menu(zone_id)]),
        );
    }

    let page = paginate(records, page, DNS_RECORDS_PER_PAGE);
    let keyboard = Keyboard::column(page.items.iter().enumerate().map(|(index, record)| {
        button(
            format!("{} ({})", record.name, record.record_type),
            &NavToken::DnsDetail {
                zone_id: zone_id.to_string(),
                page: page.number,
                index,
            },
        )
    }))
    .with_row(prev_next_row(
        page.has_prev,
        page.has_next,
        |page| NavToken::DnsRecords {
            zone_id: zone_id.to_string(),
            page,
        },
        page.number,
    ))
    .with_row(vec![back_to_dns_menu(zone_id)]);

    let text = if page.items.is_empty() {
        "There are no records to show on this page.".to_string()
    } else {
        format!(
            "DNS records for {zone_name} (page {} of {}):",
            page.number + 1,
            page.total_pages
        )
    };
    Menu::with_keyboard(text, keyboard)
}

pub fn record_detail_loading(zone_name: &str) -> Menu {
    Menu::text(format!("⏳ Fetching record details for {zone_name}..."))
}

pub fn record_detail(
    zone_id: &str,
    zone_name: &str,
    page: usize,
    record: Option<&DnsRecord>,
) -> Menu {
    let text = match record {
        Some(record) => format!(
            "DNS record details for {zone_name}:\n\n\
             🔸 Name: {}\n\
             🔹 Type: {}\n\
             🎯 Content: {}\n\
             ☁️ Proxy: {}\n\
             ⏱️ TTL: {}\n\n\
             🔒 Note: existing records can't be deleted or re-proxied through this bot.",
            record.name,
            record.record_type,
            record.content,
            proxy_label(record.proxied),
            ttl_label(record.ttl),
        ),
        None => "❌ Record not found. The record list may have changed or the index is invalid."
            .to_string(),
    };
    Menu::with_keyboard(
        text,
        Keyboard::column([button(
            "↩️ Back to record list",
            &NavToken::DnsRecords {
                zone_id: zone_id.to_string(),
                page,
            },
        )]),
    )
}

pub fn add_record_type(zone_id: &str, zone_name: &str) -> Menu {
    let params = |record_type| NavToken::DnsAddParams {
        zone_id: zone_id.to_string(),
        record_type,
    };
    Menu::with_keyboard(
        format!("Add a new record to: {zone_name}\nPlease choose the record type:"),
        Keyboard::column([
            button("🅰️ A record (IPv4)", &params(RecordType::A)),
            button("💠 AAAA record (IPv6)", &params(RecordType::AAAA)),
            back_to_dns_menu(zone_id),
        ]),
    )
}

pub fn add_record_instructions(zone_id: &str, zone_name: &str, record_type: RecordType) -> Menu {
    let mut text = format!(
        "To add a {record_type} record to {zone_name}:\n\n\
         Send a message in the following format (include the domain name):\n"
    );
    if record_type == RecordType::AAAA {
        text.push_str(&format!(
            "`/set_aaaa_record {zone_name} <subdomain> <IPv6 address> <on|off>`\n\n\
             Example: `/set_aaaa_record {zone_name} mail 2001:db8::1 on`"
        ));
    } else {
        text.push_str(&format!(
            "`/set_a_record {zone_name} <subdomain> <IPv4 address> <on|off>`\n\n\
             Example: `/set_a_record {zone_name} www 1.2.3.4 on`\n\
             Or for the root domain: `/set_a_record {zone_name} @ 1.2.3.4 off`"
        ));
    }
    Menu::with_keyboard(
        text,
        Keyboard::column([button(
            "↩️ Back to record type",
            &NavToken::DnsAddType {
                zone_id: zone_id.to_string(),
            },
        )]),
    )
}

pub fn domain_not_found(domain: &str) -> Menu {
    Menu::text(format!("⚠️ Domain {domain} was not found."))
}

pub fn record_adding(record_type: RecordType, fqdn: &str) -> Menu {
    Menu::text(format!("⏳ Adding {record_type} record for {fqdn}..."))
}

pub fn record_add_failed(reason: &str) -> Menu {
    Menu::text(format!("❌ Failed to add record: {reason}"))
}

pub fn record_created(zone_id: &str, requested: RecordType, record: &DnsRecord) -> Menu {
    let text = format!(
        "✅ {requested} record for {name} was added.\n\n\
         New record details:\n\
         🔸 Name: {name}\n\
         🔹 Type: {}\n\
         🎯 Content: {}\n\
         ☁️ Proxy: {}\n\
         ⏱️ TTL: {}\n\n\
         Please choose:",
        record.record_type,
        record.content,
        proxy_label(record.proxied),
        ttl_label(record.ttl),
        name = record.name,
    );
    Menu::with_keyboard(
        text,
        Keyboard::column([
            button("↩️ Back to DNS menu", &NavToken::DnsMenu { zone_id: zone_id.to_string() }),
            button("🚪 Exit to domain list", &zone_list_target()),
        ]),
    )
}
