//! Lookup Result model: the RDAP domain object as returned by the lookup service.
//!
//! The upstream schema is loosely followed by registries, so every field is optional
//! or defaults to empty, `null` is treated like an absent value, and unknown members
//! are kept in `extra` so the JSON export stays lossless.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Deserialize `null` as the type's default (registries send `"status": null`).
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Deserialize a string list that may also arrive as a single bare string.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(line)) => vec![line],
        Some(OneOrMany::Many(lines)) => lines,
    })
}

/// A scalar that registries encode as a JSON number, string or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON number (e.g. `"keyTag": 370`).
    Number(serde_json::Number),
    /// JSON string (e.g. `"keyTag": "370"`).
    Text(String),
    /// JSON boolean.
    Bool(bool),
}

impl Scalar {
    /// Boolean reading of the value: `true`/`false` as JSON booleans or strings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s.trim().eq_ignore_ascii_case("true") => Some(true),
            Self::Text(s) if s.trim().eq_ignore_ascii_case("false") => Some(false),
            Self::Number(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// RDAP domain lookup result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    /// Always `"domain"` for a domain lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_class_name: Option<String>,
    /// Registry-unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Domain name in LDH (ASCII) form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ldh_name: Option<String>,
    /// Domain name in Unicode form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode_name: Option<String>,
    /// EPP/RDAP status values.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub status: Vec<String>,
    /// Lifecycle events (registration, expiration, last changed, ...).
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub events: Vec<Event>,
    /// Registrar, registrant, technical and other contacts.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub entities: Vec<Entity>,
    /// DNSSEC signing data.
    #[serde(
        default,
        rename = "secureDNS",
        skip_serializing_if = "Option::is_none"
    )]
    pub secure_dns: Option<SecureDns>,
    /// Delegated name servers.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nameservers: Vec<Nameserver>,
    /// Service-level advisory notices (terms of use, status codes, ...).
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub notices: Vec<Notice>,
    /// Object-level remarks.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remarks: Vec<Notice>,
    /// Related links.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<Link>,
    /// Legacy WHOIS server host name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port43: Option<String>,
    /// Conformance identifiers.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub rdap_conformance: Vec<String>,
    /// Members not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A lifecycle event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// e.g. `"registration"`, `"expiration"`, `"last changed"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_action: Option<String>,
    /// RFC 3339 timestamp, in theory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_actor: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A contact entity (registrar, registrant, technical, abuse, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub roles: Vec<String>,
    /// jCard: `["vcard", [[name, params, type, value], ...]]`. Kept untyped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vcard_array: Option<Value>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub public_ids: Vec<PublicId>,
    /// Entities nested under this one (e.g. a registrar's abuse contact).
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub entities: Vec<Entity>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub events: Vec<Event>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub status: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remarks: Vec<Notice>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    /// Whether the entity carries `role` (case-insensitive).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

/// A public identifier such as the registrar IANA ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicId {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub id_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// DNSSEC information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureDns {
    /// Boolean in the schema; read through [`Scalar::as_bool`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_signed: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegation_signed: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sig_life: Option<Scalar>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub ds_data: Vec<DsData>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub key_data: Vec<KeyData>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A DS record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DsData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_tag: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_type: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A DNSKEY record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<Scalar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A delegated name server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nameserver {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ldh_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_addresses: Option<IpAddresses>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Glue addresses of a name server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpAddresses {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub v4: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub v6: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A notice or remark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Usually an array of lines; some servers send a bare string.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub description: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<Link>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A link object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// RDAP error response body (`errorCode`, `title`, `description`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RdapErrorBody {
    #[serde(default)]
    pub error_code: Option<u16>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub description: Vec<String>,
}

/// A rendered report plus its suggested download name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Plain-text report.
    pub text: String,
    /// Suggested filename, e.g. `rdap-example.com.txt`.
    pub filename: String,
}
