//! jCard (RFC 7095) contact extraction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contact fields pulled out of an entity's `vcardArray`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCard {
    /// `individual`, `org`, ...
    pub kind: Option<String>,
    pub full_name: Option<String>,
    pub organization: Option<String>,
    /// Structured address flattened into one line, or the `label` parameter.
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactCard {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Extract a [`ContactCard`] from a jCard value.
///
/// Anything that does not look like `["vcard", [...]]` yields an empty card.
/// The first occurrence of each property wins.
pub fn parse_vcard(vcard: &Value) -> ContactCard {
    let mut card = ContactCard::default();

    let Some(properties) = vcard
        .as_array()
        .filter(|arr| arr.first().and_then(Value::as_str) == Some("vcard"))
        .and_then(|arr| arr.get(1))
        .and_then(Value::as_array)
    else {
        return card;
    };

    for property in properties {
        let Some(parts) = property.as_array() else {
            continue;
        };
        let Some(name) = parts.first().and_then(Value::as_str) else {
            continue;
        };
        let params = parts.get(1);
        let values = parts.get(3..).unwrap_or_default();

        let slot = match name.to_ascii_lowercase().as_str() {
            "kind" => &mut card.kind,
            "fn" => &mut card.full_name,
            "org" => &mut card.organization,
            "adr" => &mut card.address,
            "email" => &mut card.email,
            "tel" => &mut card.phone,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }

        *slot = match name.to_ascii_lowercase().as_str() {
            "adr" => address_value(params, values),
            "tel" => flatten_values(values, ", ").map(|tel| strip_tel_scheme(&tel)),
            _ => flatten_values(values, ", "),
        };
    }

    card
}

/// Prefer the `label` parameter; otherwise join the non-empty structured components.
fn address_value(params: Option<&Value>, values: &[Value]) -> Option<String> {
    if let Some(label) = params
        .and_then(|p| p.get("label"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        return Some(label.split('\n').map(str::trim).collect::<Vec<_>>().join(", "));
    }
    flatten_values(values, ", ")
}

fn strip_tel_scheme(tel: &str) -> String {
    tel.strip_prefix("tel:").unwrap_or(tel).to_string()
}

/// Flatten a jCard value list (strings, nested arrays of strings) into one string.
fn flatten_values(values: &[Value], sep: &str) -> Option<String> {
    fn collect(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => {
                let s = s.trim();
                if !s.is_empty() {
                    out.push(s.to_string());
                }
            }
            Value::Array(items) => items.iter().for_each(|item| collect(item, out)),
            Value::Number(n) => out.push(n.to_string()),
            _ => {}
        }
    }

    let mut parts = Vec::new();
    values.iter().for_each(|v| collect(v, &mut parts));
    (!parts.is_empty()).then(|| parts.join(sep))
}
