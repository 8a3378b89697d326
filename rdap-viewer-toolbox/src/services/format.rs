//! Formatter component: renders a [`LookupResult`] as a flat plain-text report.
//!
//! Rendering is deterministic. Every field the report knows about is printed;
//! absent values are replaced by the configured placeholder.

use chrono::{DateTime, Utc};

use super::vcard::{ContactCard, parse_vcard};
use crate::error::{RdapError, RdapResult};
use crate::types::{Entity, LookupResult, Notice, Report, Scalar};

/// Text used in place of absent values.
pub const DEFAULT_PLACEHOLDER: &str = "N/A";

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub placeholder: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Line-oriented report builder.
struct ReportWriter<'a> {
    out: String,
    placeholder: &'a str,
}

impl<'a> ReportWriter<'a> {
    fn new(placeholder: &'a str) -> Self {
        Self {
            out: String::new(),
            placeholder,
        }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn heading(&mut self, title: &str, underline: char) {
        self.line(title);
        self.line(&underline.to_string().repeat(title.chars().count()));
    }

    fn section(&mut self, title: &str) {
        self.blank();
        self.heading(title, '-');
    }

    fn field(&mut self, label: &str, value: Option<&str>) {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let value = value.unwrap_or(self.placeholder);
        self.line(&format!("{label}: {value}"));
    }

    fn empty_section(&mut self) {
        let placeholder = self.placeholder.to_string();
        self.line(&placeholder);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render `result` (fetched for `domain`) into a report and suggested filename.
pub fn format_report(result: &LookupResult, domain: &str, options: &FormatOptions) -> Report {
    let mut w = ReportWriter::new(&options.placeholder);

    w.heading(&format!("RDAP Lookup Report: {}", domain.trim()), '=');
    w.blank();
    write_overview(&mut w, result);

    w.section("Events");
    write_events(&mut w, result);

    w.section("Registrar");
    write_registrar(&mut w, find_entity(&result.entities, "registrar"));

    w.section("Registrant");
    write_contact(&mut w, find_entity(&result.entities, "registrant"));

    w.section("Technical Contact");
    write_contact(&mut w, find_entity(&result.entities, "technical"));

    w.section("DNSSEC");
    write_dnssec(&mut w, result);

    w.section("Nameservers");
    write_nameservers(&mut w, result);

    w.section("Notices");
    write_notices(&mut w, &result.notices);

    if !result.remarks.is_empty() {
        w.section("Remarks");
        write_notices(&mut w, &result.remarks);
    }

    Report {
        text: w.finish(),
        filename: suggested_filename(domain, "txt"),
    }
}

/// Pretty-printed JSON of the lookup result, unknown members included.
pub fn format_json(result: &LookupResult) -> RdapResult<String> {
    serde_json::to_string_pretty(result)
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(serialize_error)
}

fn serialize_error(e: serde_json::Error) -> RdapError {
    RdapError::ExportError(format!("Failed to serialize result as JSON: {e}"))
}

/// `rdap-<domain>.<extension>`, with the domain lowercased and anything outside
/// `[a-z0-9.-]` replaced by `_`.
pub fn suggested_filename(domain: &str, extension: &str) -> String {
    let sanitized: String = domain
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_matches('.');

    if sanitized.is_empty() {
        format!("rdap-lookup.{extension}")
    } else {
        format!("rdap-{sanitized}.{extension}")
    }
}

fn write_overview(w: &mut ReportWriter<'_>, result: &LookupResult) {
    w.field("Domain Name", result.ldh_name.as_deref());
    if let Some(unicode) = result.unicode_name.as_deref()
        && !result
            .ldh_name
            .as_deref()
            .is_some_and(|ldh| ldh.eq_ignore_ascii_case(unicode))
    {
        w.field("Unicode Name", Some(unicode));
    }
    w.field("Handle", result.handle.as_deref());
    let status = result.status.join(", ");
    w.field("Status", Some(status.as_str()));
}

fn write_events(w: &mut ReportWriter<'_>, result: &LookupResult) {
    if result.events.is_empty() {
        w.empty_section();
        return;
    }
    for event in &result.events {
        let action = event
            .event_action
            .as_deref()
            .map(title_case)
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| "Event".to_string());
        let date = event.event_date.as_deref().map(format_date);
        w.field(&action, date.as_deref());
    }
}

fn write_registrar(w: &mut ReportWriter<'_>, registrar: Option<&Entity>) {
    let Some(registrar) = registrar else {
        w.empty_section();
        return;
    };
    let card = contact_card(Some(registrar));
    w.field("Name", card.full_name.as_deref().or(card.organization.as_deref()));

    let iana_id = registrar
        .public_ids
        .iter()
        .find(|id| {
            id.id_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case("IANA Registrar ID"))
        })
        .and_then(|id| id.identifier.as_deref());
    w.field("IANA ID", iana_id);

    let abuse = contact_card(find_entity(&registrar.entities, "abuse"));
    w.field("Abuse Email", abuse.email.as_deref());
    w.field("Abuse Phone", abuse.phone.as_deref());
}

fn write_contact(w: &mut ReportWriter<'_>, entity: Option<&Entity>) {
    let Some(entity) = entity else {
        w.empty_section();
        return;
    };
    let card = contact_card(Some(entity));
    w.field("Name", card.full_name.as_deref());
    w.field("Organization", card.organization.as_deref());
    w.field("Address", card.address.as_deref());
    w.field("Email", card.email.as_deref());
    w.field("Phone", card.phone.as_deref());
}

fn write_dnssec(w: &mut ReportWriter<'_>, result: &LookupResult) {
    let Some(secure) = result.secure_dns.as_ref() else {
        w.empty_section();
        return;
    };
    w.field("Zone Signed", signed_flag(secure.zone_signed.as_ref()));
    w.field("Delegation Signed", signed_flag(secure.delegation_signed.as_ref()));

    for ds in &secure.ds_data {
        let line = format!(
            "Key Tag {}, Algorithm {}, Digest Type {}, Digest {}",
            scalar_or(ds.key_tag.as_ref(), w.placeholder),
            scalar_or(ds.algorithm.as_ref(), w.placeholder),
            scalar_or(ds.digest_type.as_ref(), w.placeholder),
            ds.digest.as_deref().unwrap_or(w.placeholder),
        );
        w.field("DS Record", Some(line.as_str()));
    }
    for key in &secure.key_data {
        let line = format!(
            "Flags {}, Protocol {}, Algorithm {}, Public Key {}",
            scalar_or(key.flags.as_ref(), w.placeholder),
            scalar_or(key.protocol.as_ref(), w.placeholder),
            scalar_or(key.algorithm.as_ref(), w.placeholder),
            key.public_key.as_deref().unwrap_or(w.placeholder),
        );
        w.field("DNSKEY", Some(line.as_str()));
    }
}

fn write_nameservers(w: &mut ReportWriter<'_>, result: &LookupResult) {
    if result.nameservers.is_empty() {
        w.empty_section();
        return;
    }
    for ns in &result.nameservers {
        let name = ns
            .ldh_name
            .as_deref()
            .or(ns.unicode_name.as_deref())
            .map_or_else(|| w.placeholder.to_string(), str::to_lowercase);
        let ips: Vec<&str> = ns
            .ip_addresses
            .iter()
            .flat_map(|ips| ips.v4.iter().chain(ips.v6.iter()))
            .map(String::as_str)
            .collect();
        if ips.is_empty() {
            w.line(&name);
        } else {
            w.line(&format!("{name} ({})", ips.join(", ")));
        }
    }
}

fn write_notices(w: &mut ReportWriter<'_>, notices: &[Notice]) {
    if notices.is_empty() {
        w.empty_section();
        return;
    }
    for (i, notice) in notices.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        let title = notice.title.as_deref().unwrap_or(w.placeholder).to_string();
        w.line(&title);
        for description in &notice.description {
            w.line(&format!("  {}", description.trim()));
        }
        for href in notice.links.iter().filter_map(|l| l.href.as_deref()) {
            w.line(&format!("  Link: {href}"));
        }
    }
}

/// First entity carrying `role`: top level first, then nested entities depth-first.
fn find_entity<'a>(entities: &'a [Entity], role: &str) -> Option<&'a Entity> {
    entities
        .iter()
        .find(|e| e.has_role(role))
        .or_else(|| entities.iter().find_map(|e| find_entity(&e.entities, role)))
}

fn contact_card(entity: Option<&Entity>) -> ContactCard {
    entity
        .and_then(|e| e.vcard_array.as_ref())
        .map(parse_vcard)
        .unwrap_or_default()
}

/// `2024-08-13T04:00:00Z` → `2024-08-13 04:00:00 UTC`; anything else verbatim.
fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw.trim()).map_or_else(
        |_| raw.trim().to_string(),
        |dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        },
    )
}

/// `last changed` → `Last Changed`. Remaining letters keep their case.
fn title_case(action: &str) -> String {
    action
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn signed_flag(value: Option<&Scalar>) -> Option<&'static str> {
    value.and_then(Scalar::as_bool).map(yes_no)
}

fn scalar_or(value: Option<&Scalar>, placeholder: &str) -> String {
    value.map_or_else(|| placeholder.to_string(), ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    const EXAMPLE_COM: &str = r#"{
      "objectClassName": "domain",
      "handle": "2336799_DOMAIN_COM-VRSN",
      "ldhName": "EXAMPLE.COM",
      "status": ["client delete prohibited", "client transfer prohibited"],
      "events": [
        {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
        {"eventAction": "expiration", "eventDate": "2025-08-13T04:00:00Z"},
        {"eventAction": "last update of RDAP database", "eventDate": "2024-05-01T12:30:00+02:00"}
      ],
      "entities": [
        {
          "objectClassName": "entity",
          "handle": "376",
          "roles": ["registrar"],
          "publicIds": [{"type": "IANA Registrar ID", "identifier": "376"}],
          "vcardArray": ["vcard", [["version", {}, "text", "4.0"], ["fn", {}, "text", "RESERVED-Internet Assigned Numbers Authority"]]],
          "entities": [
            {
              "roles": ["abuse"],
              "vcardArray": ["vcard", [
                ["fn", {}, "text", "Abuse Desk"],
                ["tel", {"type": "voice"}, "uri", "tel:+1.3103015800"],
                ["email", {}, "text", "abuse@iana.org"]
              ]]
            }
          ]
        }
      ],
      "secureDNS": {
        "delegationSigned": true,
        "dsData": [{"keyTag": 370, "algorithm": 13, "digestType": 2, "digest": "BE74359954660069D5C63D200C39F5603827D7DD02B56F120EE9F3A86764247C"}]
      },
      "nameservers": [
        {"objectClassName": "nameserver", "ldhName": "A.IANA-SERVERS.NET"},
        {"objectClassName": "nameserver", "ldhName": "B.IANA-SERVERS.NET", "ipAddresses": {"v4": ["199.43.133.53"], "v6": ["2001:500:8d::53"]}}
      ],
      "notices": [
        {
          "title": "Terms of Use",
          "description": ["Service subject to Terms of Use."],
          "links": [{"href": "https://www.verisign.com/domain-names/registration-data-access-protocol/terms-service/index.xhtml", "type": "text/html"}]
        }
      ]
    }"#;

    const EXPECTED_EXAMPLE_COM: &str = "\
RDAP Lookup Report: example.com
===============================

Domain Name: EXAMPLE.COM
Handle: 2336799_DOMAIN_COM-VRSN
Status: client delete prohibited, client transfer prohibited

Events
------
Registration: 1995-08-14 04:00:00 UTC
Expiration: 2025-08-13 04:00:00 UTC
Last Update Of RDAP Database: 2024-05-01 10:30:00 UTC

Registrar
---------
Name: RESERVED-Internet Assigned Numbers Authority
IANA ID: 376
Abuse Email: abuse@iana.org
Abuse Phone: +1.3103015800

Registrant
----------
N/A

Technical Contact
-----------------
N/A

DNSSEC
------
Zone Signed: N/A
Delegation Signed: Yes
DS Record: Key Tag 370, Algorithm 13, Digest Type 2, Digest BE74359954660069D5C63D200C39F5603827D7DD02B56F120EE9F3A86764247C

Nameservers
-----------
a.iana-servers.net
b.iana-servers.net (199.43.133.53, 2001:500:8d::53)

Notices
-------
Terms of Use
  Service subject to Terms of Use.
  Link: https://www.verisign.com/domain-names/registration-data-access-protocol/terms-service/index.xhtml
";

    fn parse(json: &str) -> LookupResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_report() {
        let report = format_report(&parse(EXAMPLE_COM), "example.com", &FormatOptions::default());
        assert_eq!(report.text, EXPECTED_EXAMPLE_COM);
        assert_eq!(report.filename, "rdap-example.com.txt");
    }

    #[test]
    fn test_report_is_deterministic() {
        let result = parse(EXAMPLE_COM);
        let options = FormatOptions::default();
        assert_eq!(
            format_report(&result, "example.com", &options),
            format_report(&result, "example.com", &options)
        );
    }

    #[test]
    fn test_empty_result_uses_placeholders() {
        let report = format_report(&LookupResult::default(), "empty.example", &FormatOptions::default());
        assert!(report.text.contains("Domain Name: N/A\n"));
        assert!(report.text.contains("Handle: N/A\n"));
        assert!(report.text.contains("Status: N/A\n"));
        assert!(report.text.contains("Events\n------\nN/A\n"));
        assert!(report.text.contains("Registrar\n---------\nN/A\n"));
        assert!(report.text.contains("DNSSEC\n------\nN/A\n"));
        assert!(report.text.contains("Nameservers\n-----------\nN/A\n"));
        assert!(report.text.ends_with("Notices\n-------\nN/A\n"));
        assert!(!report.text.contains("Remarks"));
    }

    #[test]
    fn test_custom_placeholder() {
        let options = FormatOptions {
            placeholder: "-".to_string(),
        };
        let report = format_report(&LookupResult::default(), "x.example", &options);
        assert!(report.text.contains("Domain Name: -\n"));
        assert!(!report.text.contains("N/A"));
    }

    #[test]
    fn test_registrant_and_technical_contacts() {
        let result = parse(
            r#"{"entities": [
                {"roles": ["registrant", "administrative"], "vcardArray": ["vcard", [
                    ["fn", {}, "text", "Jane Doe"],
                    ["org", {}, "text", "Example Org"],
                    ["adr", {"label": "1 Main St\nSpringfield"}, "text", ["", "", "", "", "", "", ""]],
                    ["email", {}, "text", "jane@example.org"]
                ]]},
                {"roles": ["technical"], "vcardArray": ["vcard", [["version", {}, "text", "4.0"]]]}
            ]}"#,
        );
        let text = format_report(&result, "example.org", &FormatOptions::default()).text;
        assert!(text.contains(
            "Registrant\n----------\nName: Jane Doe\nOrganization: Example Org\nAddress: 1 Main St, Springfield\nEmail: jane@example.org\nPhone: N/A\n"
        ));
        assert!(text.contains(
            "Technical Contact\n-----------------\nName: N/A\nOrganization: N/A\nAddress: N/A\nEmail: N/A\nPhone: N/A\n"
        ));
    }

    #[test]
    fn test_nested_entity_found() {
        let result = parse(
            r#"{"entities": [{"roles": ["registrar"], "entities": [
                {"roles": ["technical"], "vcardArray": ["vcard", [["fn", {}, "text", "Nested Tech"]]]}
            ]}]}"#,
        );
        let text = format_report(&result, "example.net", &FormatOptions::default()).text;
        assert!(text.contains("Technical Contact\n-----------------\nName: Nested Tech\n"));
        assert!(text.contains("Registrar\n---------\nName: N/A\nIANA ID: N/A\n"));
    }

    #[test]
    fn test_unicode_name_shown_when_different() {
        let result = parse(r#"{"ldhName": "xn--mnchen-3ya.de", "unicodeName": "münchen.de"}"#);
        let text = format_report(&result, "münchen.de", &FormatOptions::default()).text;
        assert!(text.contains("Domain Name: xn--mnchen-3ya.de\nUnicode Name: münchen.de\n"));

        let same = parse(r#"{"ldhName": "EXAMPLE.COM", "unicodeName": "example.com"}"#);
        let text = format_report(&same, "example.com", &FormatOptions::default()).text;
        assert!(!text.contains("Unicode Name"));
    }

    #[test]
    fn test_unparseable_dates_verbatim() {
        let result = parse(
            r#"{"events": [{"eventAction": "registration", "eventDate": "14-Aug-1995"}, {"eventAction": "expiration"}]}"#,
        );
        let text = format_report(&result, "example.com", &FormatOptions::default()).text;
        assert!(text.contains("Registration: 14-Aug-1995\n"));
        assert!(text.contains("Expiration: N/A\n"));
    }

    #[test]
    fn test_remarks_section_when_present() {
        let result = parse(r#"{"remarks": [{"title": "Redacted", "description": ["Data redacted for privacy."]}, {"description": ["untitled"]}]}"#);
        let text = format_report(&result, "example.com", &FormatOptions::default()).text;
        assert!(text.ends_with("Remarks\n-------\nRedacted\n  Data redacted for privacy.\n\nN/A\n  untitled\n"));
    }

    #[test]
    fn test_dnssec_key_data_and_unsigned() {
        let result = parse(
            r#"{"secureDNS": {"zoneSigned": false, "delegationSigned": false,
                "keyData": [{"flags": 257, "protocol": 3, "algorithm": 8, "publicKey": "AwEAAa"}]}}"#,
        );
        let text = format_report(&result, "example.com", &FormatOptions::default()).text;
        assert!(text.contains(
            "Zone Signed: No\nDelegation Signed: No\nDNSKEY: Flags 257, Protocol 3, Algorithm 8, Public Key AwEAAa\n"
        ));
    }

    #[test]
    fn test_suggested_filename() {
        assert_eq!(suggested_filename("Example.COM", "txt"), "rdap-example.com.txt");
        assert_eq!(suggested_filename("a/b\\c..d", "txt"), "rdap-a_b_c..d.txt");
        assert_eq!(suggested_filename("münchen.de", "json"), "rdap-m_nchen.de.json");
        assert_eq!(suggested_filename("  ", "txt"), "rdap-lookup.txt");
        assert_eq!(suggested_filename("..", "txt"), "rdap-lookup.txt");
    }

    #[test]
    fn test_format_json_preserves_unknown() {
        let result = parse(r#"{"ldhName": "example.com", "lang": "en"}"#);
        let json = format_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lang"], "en");
        assert_eq!(value["ldhName"], "example.com");
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_format_json_round_trips_nested_document() {
        let original = r#"{
          "objectClassName": "domain",
          "ldhName": "example.com",
          "events": [{"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z",
                      "links": [{"href": "https://rdap.example/e", "rel": "self"}]}],
          "notices": [{"title": "Truncated", "type": "result set truncated due to excessive load",
                       "description": ["Partial data."],
                       "links": [{"href": "https://rdap.example/t", "hreflang": "en", "title": "Terms", "media": "screen"}]}],
          "secureDNS": {"zoneSigned": "true", "dsData": [{"keyTag": "370", "x": 1}]},
          "nameservers": [{"ldhName": "ns1.example.com", "status": ["active"]}]
        }"#;
        let json = format_json(&parse(original)).unwrap();
        let exported: serde_json::Value = serde_json::from_str(&json).unwrap();
        let expected: serde_json::Value = serde_json::from_str(original).unwrap();
        assert_eq!(exported, expected);
    }

    #[test]
    fn test_serialize_error_is_export_error() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(serialize_error(err), RdapError::ExportError(_)));
    }

    #[test]
    fn test_empty_event_action_falls_back() {
        let result = parse(
            r#"{"events": [{"eventAction": "", "eventDate": "2020-01-01T00:00:00Z"}, {"eventAction": "  ", "eventDate": "x"}, {"eventDate": "y"}]}"#,
        );
        let text = format_report(&result, "example.com", &FormatOptions::default()).text;
        assert!(text.contains("Events\n------\nEvent: 2020-01-01 00:00:00 UTC\nEvent: x\nEvent: y\n"));
    }

    #[test]
    fn test_signed_flags_lenient() {
        let result = parse(r#"{"secureDNS": {"zoneSigned": "true", "delegationSigned": "unknown"}}"#);
        let text = format_report(&result, "example.com", &FormatOptions::default()).text;
        assert!(text.contains("Zone Signed: Yes\nDelegation Signed: N/A\n"));
    }

    #[test]
    fn test_notice_description_string() {
        let result = parse(r#"{"notices": [{"title": "Terms", "description": "Single line."}]}"#);
        let text = format_report(&result, "example.com", &FormatOptions::default()).text;
        assert!(text.ends_with("Notices\n-------\nTerms\n  Single line.\n"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("last changed"), "Last Changed");
        assert_eq!(title_case("last update of RDAP database"), "Last Update Of RDAP Database");
        assert_eq!(title_case(""), "");
    }
}
