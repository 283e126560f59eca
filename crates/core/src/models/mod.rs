#![allow(missing_docs)]

//! Shared domain models for the timeline REST API.

mod document;

use serde::{Deserialize, Deserializer, Serialize};

pub use document::{
    Background, EraSlide, Media, RegenerateResponse, Slide, SlideText, TimelineDate,
    TimelineDocument,
};

/// Time scale used by the timeline viewer.
///
/// The backend stores the scale as free text, so names this client does not
/// know are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scale {
    /// Calendar dates.
    #[default]
    Human,
    /// Years before present, for very long ranges.
    Cosmological,
    /// Any other name the backend holds.
    Other(String),
}

impl Scale {
    /// Wire name of the scale.
    pub fn as_str(&self) -> &str {
        match self {
            Scale::Human => "human",
            Scale::Cosmological => "cosmological",
            Scale::Other(name) => name,
        }
    }

    /// Next scale for select-style toggles; unknown names step back to
    /// [`Scale::Human`].
    pub fn toggled(&self) -> Self {
        match self {
            Scale::Human => Scale::Cosmological,
            Scale::Cosmological | Scale::Other(_) => Scale::Human,
        }
    }
}

impl From<String> for Scale {
    fn from(name: String) -> Self {
        match name.as_str() {
            "human" => Scale::Human,
            "cosmological" => Scale::Cosmological,
            _ => Scale::Other(name),
        }
    }
}

impl From<Scale> for String {
    fn from(scale: Scale) -> Self {
        match scale {
            Scale::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// Title and scale settings served by `/config`.
///
/// Reads tolerate `null` and missing columns; writes always send the flat
/// `{title_headline, title_text, scale}` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Title slide headline.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_headline: String,
    /// Title slide body text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title_text: String,
    /// Time scale.
    #[serde(default, deserialize_with = "null_as_default")]
    pub scale: Scale,
}

/// Event row as stored by the backend.
///
/// Every field is optional so a partially populated row never fails to load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub headline: Option<String>,
    pub text: Option<String>,
    pub start_year: Option<i64>,
    pub start_month: Option<u32>,
    pub start_day: Option<u32>,
    pub start_display_date: Option<String>,
    pub end_year: Option<i64>,
    pub end_month: Option<u32>,
    pub end_day: Option<u32>,
    pub end_display_date: Option<String>,
    pub display_date: Option<String>,
    pub event_group: Option<String>,
    pub unique_id: Option<String>,
    pub media_url: Option<String>,
    pub media_caption: Option<String>,
    pub media_credit: Option<String>,
}

/// Payload sent when creating or updating an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    pub headline: String,
    pub text: String,
    pub start_year: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_day: Option<u32>,
    pub event_group: Option<String>,
    pub unique_id: Option<String>,
    pub display_date: Option<String>,
    pub media_url: Option<String>,
    pub media_caption: Option<String>,
}

/// Era row as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Era {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub headline: Option<String>,
    pub start_year: Option<i64>,
    pub end_year: Option<i64>,
    pub text: Option<String>,
}

/// Payload sent when creating or updating an era.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EraDraft {
    pub headline: String,
    pub start_year: i64,
    pub end_year: i64,
    pub text: String,
}

/// Reply to `POST /events` and `POST /eras`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreatedResponse {
    pub status: Option<String>,
    pub id: Option<i64>,
}

/// Reply to `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn config_tolerates_nulls_and_extra_columns() {
        let config: TimelineConfig = serde_json::from_value(json!({
            "id": 1,
            "title_headline": "Milestones",
            "title_text": null,
            "scale": "cosmological",
            "updated_at": "2024-01-01 00:00:00"
        }))
        .expect("config should parse");
        assert_eq!(config.title_headline, "Milestones");
        assert_eq!(config.title_text, "");
        assert_eq!(config.scale, Scale::Cosmological);
    }

    #[test]
    fn config_serializes_flat() {
        let config = TimelineConfig {
            title_headline: "A".to_string(),
            title_text: "B".to_string(),
            scale: Scale::Human,
        };
        assert_eq!(
            serde_json::to_value(&config).expect("serialize"),
            json!({"title_headline": "A", "title_text": "B", "scale": "human"})
        );
    }

    #[test]
    fn sparse_event_row_loads() {
        let event: Event = serde_json::from_value(json!({"id": 4, "start_year": 1990}))
            .expect("event should parse");
        assert_eq!(event.id, Some(4));
        assert_eq!(event.start_year, Some(1990));
        assert!(event.headline.is_none());
        assert!(event.media_url.is_none());
    }

    #[test]
    fn draft_nulls_empty_strings_and_omits_missing_numbers() {
        let draft = EventDraft {
            headline: "Launch".to_string(),
            text: String::new(),
            start_year: 1957,
            start_month: Some(10),
            start_day: None,
            end_year: None,
            end_month: None,
            end_day: None,
            event_group: None,
            unique_id: None,
            display_date: None,
            media_url: None,
            media_caption: None,
        };
        let value = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(value["start_month"], json!(10));
        assert!(value.get("start_day").is_none());
        assert_eq!(value["event_group"], json!(null));
        assert_eq!(value["media_caption"], json!(null));
    }

    #[test]
    fn scale_toggles() {
        assert_eq!(Scale::Human.toggled(), Scale::Cosmological);
        assert_eq!(Scale::Cosmological.toggled().as_str(), "human");
        assert_eq!(Scale::Other("geological".to_string()).toggled(), Scale::Human);
    }

    #[test]
    fn unknown_and_null_scales_load() {
        let config: TimelineConfig =
            serde_json::from_value(json!({"title_headline": "Deep time", "scale": "geological"}))
                .expect("unknown scale should parse");
        assert_eq!(config.scale, Scale::Other("geological".to_string()));
        assert_eq!(
            serde_json::to_value(&config).expect("serialize")["scale"],
            json!("geological")
        );

        let config: TimelineConfig =
            serde_json::from_value(json!({"scale": null})).expect("null scale should parse");
        assert_eq!(config.scale, Scale::Human);
    }
}
