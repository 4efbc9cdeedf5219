//! Inline keyboard navigation tokens.
//!
//! Every button the bot renders carries a [`NavToken`] in its callback data, encoded as
//! `<action>_<p1>_<p2>_<p3>` with parameters optional from right to left. The token is the
//! only state kept between turns, so it must name everything needed to re-render the target
//! menu from fresh provider data.

use crate::bot::command::is_creatable;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;
use trust_dns_proto::rr::RecordType;

const DELIMITER: char = '_';
const MAX_PARAMS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavToken {
    ListZones { page: usize },
    Domain { zone_id: String },
    Analytics { zone_id: String },
    DnsMenu { zone_id: String },
    DnsRecords { zone_id: String, page: usize },
    DnsDetail { zone_id: String, page: usize, index: usize },
    DnsAddType { zone_id: String },
    DnsAddParams { zone_id: String, record_type: RecordType },
}

impl NavToken {
    fn action(&self) -> &'static str {
        match self {
            NavToken::ListZones { .. } => "listzones",
            NavToken::Domain { .. } => "domain",
            NavToken::Analytics { .. } => "analytics",
            NavToken::DnsMenu { .. } => "dnsmenu",
            NavToken::DnsRecords { .. } => "dnsrecords",
            NavToken::DnsDetail { .. } => "dnsdetail",
            NavToken::DnsAddType { .. } => "dnsaddtype",
            NavToken::DnsAddParams { .. } => "dnsaddparams",
        }
    }
}

impl fmt::Display for NavToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = DELIMITER;
        f.write_str(self.action())?;
        match self {
            NavToken::ListZones { page } => write!(f, "{d}{page}"),
            NavToken::Domain { zone_id }
            | NavToken::Analytics { zone_id }
            | NavToken::DnsMenu { zone_id }
            | NavToken::DnsAddType { zone_id } => write!(f, "{d}{zone_id}"),
            NavToken::DnsRecords { zone_id, page } => write!(f, "{d}{zone_id}{d}{page}"),
            NavToken::DnsDetail {
                zone_id,
                page,
                index,
            } => write!(f, "{d}{zone_id}{d}{page}{d}{index}"),
            NavToken::DnsAddParams {
                zone_id,
                record_type,
            } => write!(f, "{d}{zone_id}{d}{record_type}"),
        }
    }
}

impl FromStr for NavToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidNavToken(s.to_string());

        let mut parts = s.split(DELIMITER);
        let action = parts.next().unwrap_or_default();
        // Empty segments count as absent, e.g. `listzones_` is page 0.
        let params: Vec<Option<&str>> = parts.map(|p| (!p.is_empty()).then_some(p)).collect();
        if params.len() > MAX_PARAMS {
            return Err(invalid());
        }
        let param = |i: usize| params.get(i).copied().flatten();
        let zone_id = || param(0).map(str::to_string).ok_or_else(invalid);
        let number = |i: usize| -> Result<Option<usize>, Error> {
            param(i)
                .map(|p| p.parse::<usize>().map_err(|_| invalid()))
                .transpose()
        };

        let token = match action {
            "listzones" => NavToken::ListZones {
                page: number(0)?.unwrap_or(0),
            },
            "domain" => NavToken::Domain { zone_id: zone_id()? },
            "analytics" => NavToken::Analytics { zone_id: zone_id()? },
            "dnsmenu" => NavToken::DnsMenu { zone_id: zone_id()? },
            "dnsrecords" => NavToken::DnsRecords {
                zone_id: zone_id()?,
                page: number(1)?.unwrap_or(0),
            },
            "dnsdetail" => NavToken::DnsDetail {
                zone_id: zone_id()?,
                page: number(1)?.ok_or_else(invalid)?,
                index: number(2)?.ok_or_else(invalid)?,
            },
            "dnsaddtype" => NavToken::DnsAddType { zone_id: zone_id()? },
            "dnsaddparams" => {
                let record_type = param(1)
                    .and_then(|p| RecordType::from_str(p).ok())
                    .filter(|t| is_creatable(*t))
                    .ok_or_else(invalid)?;
                NavToken::DnsAddParams {
                    zone_id: zone_id()?,
                    record_type,
                }
            }
            _ => return Err(invalid()),
        };
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> NavToken {
        s.parse().unwrap()
    }

    #[test]
    fn decodes_every_action() {
        assert_eq!(decode("listzones_2"), NavToken::ListZones { page: 2 });
        assert_eq!(
            decode("domain_Z1"),
            NavToken::Domain { zone_id: "Z1".into() }
        );
        assert_eq!(
            decode("analytics_Z1"),
            NavToken::Analytics { zone_id: "Z1".into() }
        );
        assert_eq!(
            decode("dnsmenu_Z1"),
            NavToken::DnsMenu { zone_id: "Z1".into() }
        );
        assert_eq!(
            decode("dnsrecords_Z1_3"),
            NavToken::DnsRecords { zone_id: "Z1".into(), page: 3 }
        );
        assert_eq!(
            decode("dnsdetail_Z1_1_2"),
            NavToken::DnsDetail { zone_id: "Z1".into(), page: 1, index: 2 }
        );
        assert_eq!(
            decode("dnsaddtype_Z1"),
            NavToken::DnsAddType { zone_id: "Z1".into() }
        );
        assert_eq!(
            decode("dnsaddparams_Z1_AAAA"),
            NavToken::DnsAddParams { zone_id: "Z1".into(), record_type: RecordType::AAAA }
        );
    }

    #[test]
    fn missing_pages_default_to_zero() {
        assert_eq!(decode("listzones"), NavToken::ListZones { page: 0 });
        assert_eq!(decode("listzones_"), NavToken::ListZones { page: 0 });
        assert_eq!(
            decode("dnsrecords_Z1"),
            NavToken::DnsRecords { zone_id: "Z1".into(), page: 0 }
        );
    }

    #[test]
    fn encoding_matches_wire_grammar() {
        let detail = NavToken::DnsDetail {
            zone_id: "023e105f4ecef8ad9ca31a8372d0c353".into(),
            page: 1,
            index: 7,
        };
        let encoded = detail.to_string();
        assert_eq!(encoded, "dnsdetail_023e105f4ecef8ad9ca31a8372d0c353_1_7");
        // Telegram caps callback data at 64 bytes.
        assert!(encoded.len() <= 64);
        assert_eq!(decode(&encoded), detail);

        let params = NavToken::DnsAddParams {
            zone_id: "Z1".into(),
            record_type: RecordType::A,
        };
        assert_eq!(params.to_string(), "dnsaddparams_Z1_A");
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in [
            "",
            "unknown_Z1",
            "domain",
            "domain_",
            "listzones_x",
            "dnsrecords_Z1_-1",
            "dnsdetail_Z1_1",
            "dnsdetail_Z1__2",
            "dnsdetail_Z1_1_2_3",
            "dnsaddparams_Z1_MX",
            "dnsaddparams_Z1",
        ] {
            assert!(
                matches!(bad.parse::<NavToken>(), Err(Error::InvalidNavToken(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
