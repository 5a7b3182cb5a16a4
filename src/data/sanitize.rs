//! Mapping raw marketplace items onto [`NormalizedItem`]
//!
//! Upstream text may carry HTML; everything leaving this module is plain
//! text. Malformed items never fail, they just produce empty fields.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::NormalizedItem;

/// Characters escaped in dataset ids: everything except `A-Z a-z 0-9 - _ . ~`
const RAW_URL_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Fields consulted for the organization, in priority order
const ORGANIZATION_KEYS: [&str; 3] = ["organization", "creator", "userId"];

/// Largest float printed as a plain integer; beyond this `f64` loses whole units
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// `<script>` and `<style>` elements including their content
///
/// Patterns are compile-time constants known to be valid.
#[allow(clippy::unwrap_used)]
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});

#[allow(clippy::unwrap_used)]
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|$)").unwrap());

/// Any tag, including one left unterminated at the end of the text
///
/// Quoted attribute values are skipped whole, so a `>` inside quotes does not
/// end the tag. A quote left open runs to the end of the text.
#[allow(clippy::unwrap_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[a-zA-Z/!?](?:"[^"]*(?:"|$)|'[^']*(?:'|$)|[^'">])*(?:>|$)"#).unwrap()
});

/// Normalizes one raw item
///
/// Anything other than a JSON object produces an item with every field empty.
pub fn sanitize(raw: &Value, base_url: &str) -> NormalizedItem {
    let Value::Object(item) = raw else {
        return NormalizedItem::default();
    };

    let id = item.get("id").map(coerce_string).unwrap_or_default();
    let title = plain_text_field(item, "title");
    let description = plain_text_field(item, "description");
    let organization = ORGANIZATION_KEYS
        .iter()
        .find_map(|key| item.get(*key).filter(|value| !value.is_null()))
        .map(|value| strip_all_tags(&coerce_string(value)))
        .unwrap_or_default();
    let link = dataset_link(base_url, &id);

    NormalizedItem {
        id,
        title,
        description,
        organization,
        link,
    }
}

/// Canonical dataset URL, or empty when there is no id
pub fn dataset_link(base_url: &str, id: &str) -> String {
    if id.is_empty() {
        return String::new();
    }
    format!("{}{}", base_url, utf8_percent_encode(id, RAW_URL_ENCODE))
}

/// Removes all markup and surrounding whitespace from `text`
pub fn strip_all_tags(text: &str) -> String {
    let text = SCRIPT_STYLE_RE.replace_all(text, "");
    let text = COMMENT_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");
    text.trim().to_string()
}

fn plain_text_field(item: &Map<String, Value>, key: &str) -> String {
    item.get(key)
        .map(|value| strip_all_tags(&coerce_string(value)))
        .unwrap_or_default()
}

/// String form of a scalar; containers and null become empty
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number_to_string(number),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Decimal form of a number; integral floats drop their `.0`
fn number_to_string(number: &Number) -> String {
    match number.as_f64() {
        Some(float)
            if number.is_f64() && float.fract() == 0.0 && float.abs() <= MAX_EXACT_FLOAT =>
        {
            format!("{}", float as i64)
        }
        _ => number.to_string(),
    }
}
