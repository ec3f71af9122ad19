use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::errors::{LookupError, Result};

/// How raw JSON nodes are interpreted when they are wrapped.
///
/// Passed explicitly through the [`ProviderContext`](crate::context::ProviderContext);
/// there is no process-wide default instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsonSettings {
    /// Wrap date-shaped strings as `Date` instead of `String`.
    pub parse_dates: bool,
    /// chrono formats tried after the ISO-8601 and RFC 3339 forms.
    pub date_formats: Vec<String>,
    /// Single key marking an object as a base64 byte payload.
    pub byte_array_tag: String,
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self {
            parse_dates: false,
            date_formats: Vec::new(),
            byte_array_tag: "$base64".to_string(),
        }
    }
}

impl JsonSettings {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| LookupError::configuration(format!("invalid JSON settings: {e}")))
    }

    /// Parse a calendar date, discarding any time and zone component.
    pub fn parse_date(&self, text: &str) -> Option<NaiveDate> {
        let text = text.trim();
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(dt.date_naive());
        }
        if let Ok(local) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(local.date());
        }
        self.date_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn iso_and_rfc3339_dates() {
        let settings = JsonSettings::default();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29);
        assert_eq!(settings.parse_date("2024-02-29"), expected);
        assert_eq!(settings.parse_date("2024-02-29T23:30:00+10:00"), expected);
        assert_eq!(settings.parse_date("29/02/2024"), None);
    }

    #[test]
    fn local_date_time_without_offset() {
        let settings = JsonSettings::default();
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29);
        assert_eq!(settings.parse_date("2024-02-29T10:00:00"), expected);
        assert_eq!(settings.parse_date("2024-02-29T10:00:00.125"), expected);
        assert!(settings.date_formats.is_empty());
    }

    #[test]
    fn alternate_formats_from_json() {
        let settings =
            JsonSettings::from_json(r#"{"dateFormats": ["%d/%m/%Y"], "parseDates": true}"#).unwrap();
        assert!(settings.parse_dates);
        assert_eq!(settings.byte_array_tag, "$base64");
        assert_eq!(settings.parse_date("29/02/2024"), NaiveDate::from_ymd_opt(2024, 2, 29));
    }
}
