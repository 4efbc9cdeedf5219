//! Free-text slash commands.

use lazy_static::lazy_static;
use regex::Regex;
use trust_dns_proto::rr::RecordType;

const SET_A_RECORD: &str = "/set_a_record";
const SET_AAAA_RECORD: &str = "/set_aaaa_record";

lazy_static! {
    static ref IPV4_LITERAL: Regex = Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])$"
    )
    .unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` or `/help`.
    Help,
    /// `/domains`.
    Domains,
    /// `/set_a_record` or `/set_aaaa_record`.
    SetRecord(SetRecord),
}

/// A validated request to create an A or AAAA record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetRecord {
    pub record_type: RecordType,
    pub domain: String,
    pub name: String,
    pub content: String,
    pub proxied: bool,
}

impl SetRecord {
    /// The fully qualified name the record will answer for.
    pub fn fqdn(&self) -> String {
        if self.name == "@" {
            self.domain.clone()
        } else {
            format!("{}.{}", self.name, self.domain)
        }
    }
}

/// Rejections of malformed commands. The `Display` text is sent to the user as-is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("⚠️ Incorrect command usage.\nCorrect format: `{0} <domain_name> <record_name> <{1}_address> <on|off>`")]
    Usage(&'static str, &'static str),
    #[error("⚠️ Invalid IPv4 address format.")]
    InvalidIpv4,
    #[error("⚠️ The IPv6 address format looks invalid.")]
    InvalidIpv6,
    #[error("⚠️ Proxy state must be 'on' or 'off'.")]
    InvalidProxyState,
}

impl Command {
    /// Parse a message text. `None` for text that isn't one of the bot's commands.
    pub fn parse(text: &str) -> Option<Result<Command, CommandError>> {
        let command = if text.starts_with("/start") || text.starts_with("/help") {
            Ok(Command::Help)
        } else if text.starts_with("/domains") {
            Ok(Command::Domains)
        } else if text.starts_with(SET_A_RECORD) {
            parse_set_record(text, RecordType::A).map(Command::SetRecord)
        } else if text.starts_with(SET_AAAA_RECORD) {
            parse_set_record(text, RecordType::AAAA).map(Command::SetRecord)
        } else {
            return None;
        };
        Some(command)
    }
}

fn parse_set_record(text: &str, record_type: RecordType) -> Result<SetRecord, CommandError> {
    let args: Vec<&str> = text.split_whitespace().collect();
    let [_, domain, name, content, proxy] = args[..] else {
        return Err(match record_type {
            RecordType::AAAA => CommandError::Usage(SET_AAAA_RECORD, "ipv6"),
            _ => CommandError::Usage(SET_A_RECORD, "ipv4"),
        });
    };

    match record_type {
        RecordType::AAAA if !is_loose_ipv6(content) => return Err(CommandError::InvalidIpv6),
        RecordType::A if !is_ipv4(content) => return Err(CommandError::InvalidIpv4),
        _ => {}
    }
    let proxied = parse_proxy_state(proxy)?;

    Ok(SetRecord {
        record_type,
        domain: domain.to_string(),
        name: name.to_string(),
        content: content.to_string(),
        proxied,
    })
}

/// Record types the bot can create.
pub fn is_creatable(record_type: RecordType) -> bool {
    matches!(record_type, RecordType::A | RecordType::AAAA)
}

/// Dotted-quad IPv4 literal with every octet in `0..=255`.
pub fn is_ipv4(s: &str) -> bool {
    IPV4_LITERAL.is_match(s)
}

/// Loose IPv6 check: at least one colon and three characters. Malformed addresses that pass
/// are left for the provider to refuse.
pub fn is_loose_ipv6(s: &str) -> bool {
    s.contains(':') && s.len() >= 3
}

/// `on`/`off` in any letter case.
pub fn parse_proxy_state(token: &str) -> Result<bool, CommandError> {
    match token.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(CommandError::InvalidProxyState),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_literals() {
        for ok in ["1.2.3.4", "0.0.0.0", "255.255.255.255", "192.168.10.1"] {
            assert!(is_ipv4(ok), "{ok}");
        }
        for bad in [
            "999.1.1.1",
            "1.2.3",
            "abc.def.gh.i",
            "1.2.3.4.5",
            "256.1.1.1",
            " 1.2.3.4",
            "",
        ] {
            assert!(!is_ipv4(bad), "{bad}");
        }
    }

    #[test]
    fn proxy_tokens() {
        for on in ["on", "ON", "On"] {
            assert_eq!(parse_proxy_state(on), Ok(true));
        }
        assert_eq!(parse_proxy_state("OFF"), Ok(false));
        for bad in ["yes", "1", "true", ""] {
            assert_eq!(parse_proxy_state(bad), Err(CommandError::InvalidProxyState));
        }
    }

    #[test]
    fn only_address_records_are_creatable() {
        assert!(is_creatable(RecordType::A));
        assert!(is_creatable(RecordType::AAAA));
        assert!(!is_creatable(RecordType::MX));
    }

    #[test]
    fn loose_ipv6() {
        assert!(is_loose_ipv6("2001:db8::1"));
        assert!(is_loose_ipv6("::1"));
        assert!(!is_loose_ipv6("::"));
        assert!(!is_loose_ipv6("1.2.3.4"));
    }

    #[test]
    fn parses_set_a_record() {
        let cmd = Command::parse("/set_a_record example.com www 1.2.3.4 ON")
            .unwrap()
            .unwrap();
        let expected = SetRecord {
            record_type: RecordType::A,
            domain: "example.com".into(),
            name: "www".into(),
            content: "1.2.3.4".into(),
            proxied: true,
        };
        assert_eq!(cmd, Command::SetRecord(expected.clone()));
        assert_eq!(expected.fqdn(), "www.example.com");
    }

    #[test]
    fn apex_record_fqdn_is_the_domain() {
        let Some(Ok(Command::SetRecord(set))) =
            Command::parse("/set_aaaa_record example.com @ 2001:db8::1 off")
        else {
            panic!("expected a set record command");
        };
        assert_eq!(set.record_type, RecordType::AAAA);
        assert!(!set.proxied);
        assert_eq!(set.fqdn(), "example.com");
    }

    #[test]
    fn validation_order_and_messages() {
        assert_eq!(
            Command::parse("/set_a_record example.com www 1.2.3.4"),
            Some(Err(CommandError::Usage(SET_A_RECORD, "ipv4")))
        );
        assert_eq!(
            Command::parse("/set_aaaa_record a b c d e"),
            Some(Err(CommandError::Usage(SET_AAAA_RECORD, "ipv6")))
        );
        assert_eq!(
            Command::parse("/set_a_record example.com www 999.1.1.1 maybe"),
            Some(Err(CommandError::InvalidIpv4))
        );
        assert_eq!(
            Command::parse("/set_aaaa_record example.com www 1.2.3.4 on"),
            Some(Err(CommandError::InvalidIpv6))
        );
        assert_eq!(
            Command::parse("/set_a_record example.com www 1.2.3.4 maybe"),
            Some(Err(CommandError::InvalidProxyState))
        );
        assert!(CommandError::Usage(SET_A_RECORD, "ipv4")
            .to_string()
            .contains("`/set_a_record <domain_name> <record_name> <ipv4_address> <on|off>`"));
    }

    #[test]
    fn other_text_is_ignored() {
        assert_eq!(Command::parse("/start"), Some(Ok(Command::Help)));
        assert_eq!(Command::parse("/help me"), Some(Ok(Command::Help)));
        assert_eq!(Command::parse("/domains"), Some(Ok(Command::Domains)));
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse("/unknown"), None);
    }
}
