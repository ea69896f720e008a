use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Parameters of a cover generation request.
///
/// Every field is lenient about its JSON type: strings are taken as-is,
/// numbers and booleans are drawn in their JSON text form, `null` counts as
/// absent and arrays/objects are kept as compact JSON.
#[derive(Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Emby server base URL, required but never contacted
    #[serde(default, deserialize_with = "lenient_text")]
    pub emby_url: Option<String>,

    /// Emby API key, required but never contacted, logged or echoed
    #[serde(default, deserialize_with = "lenient_text")]
    pub api_key: Option<String>,

    /// Time range label, e.g. "7d"
    #[serde(default, deserialize_with = "lenient_text")]
    pub time_range: Option<String>,

    /// Recommendation rule description
    #[serde(default, deserialize_with = "lenient_text")]
    pub rule: Option<String>,

    /// Font name. Drawn as a label only; the cover always uses the
    /// configured font family.
    #[serde(default, deserialize_with = "lenient_text")]
    pub font: Option<String>,
}

impl GenerateRequest {
    /// Both credentials are provided and non-empty.
    pub fn has_required(&self) -> bool {
        is_present(&self.emby_url) && is_present(&self.api_key)
    }

    pub fn time_range(&self) -> &str {
        self.time_range.as_deref().unwrap_or_default()
    }

    pub fn rule(&self) -> &str {
        self.rule.as_deref().unwrap_or_default()
    }

    pub fn font(&self) -> &str {
        self.font.as_deref().unwrap_or_default()
    }
}

impl fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("emby_url", &self.emby_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("time_range", &self.time_range)
            .field("rule", &self.rule)
            .field("font", &self.font)
            .finish()
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<JsonValue>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
