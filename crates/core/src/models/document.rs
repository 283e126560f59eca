//! Materialized timeline document in the shape the timeline viewer consumes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{null_as_default, Scale};

/// Full timeline payload as produced by `/generate-json`.
///
/// The typed fields are a read view over the body. A document decoded from
/// the backend serializes back to exactly what was received, nulls and
/// unknown keys included; one built locally serializes its typed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct TimelineDocument {
    pub title: Slide,
    pub events: Vec<Slide>,
    pub eras: Vec<EraSlide>,
    pub scale: Scale,
    /// Top-level keys this client does not model.
    pub extra: Map<String, Value>,
    /// Body as received, when the document came off the wire.
    pub raw: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct DocumentParts {
    #[serde(default, deserialize_with = "null_as_default")]
    title: Slide,
    #[serde(default, deserialize_with = "null_as_default")]
    events: Vec<Slide>,
    #[serde(default, deserialize_with = "null_as_default")]
    eras: Vec<EraSlide>,
    #[serde(default, deserialize_with = "null_as_default")]
    scale: Scale,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<Value> for TimelineDocument {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let parts = DocumentParts::deserialize(&value)?;
        Ok(Self {
            title: parts.title,
            events: parts.events,
            eras: parts.eras,
            scale: parts.scale,
            extra: parts.extra,
            raw: Some(value),
        })
    }
}

impl From<TimelineDocument> for Value {
    fn from(document: TimelineDocument) -> Self {
        if let Some(raw) = document.raw {
            return raw;
        }
        let parts = DocumentParts {
            title: document.title,
            events: document.events,
            eras: document.eras,
            scale: document.scale,
            extra: document.extra,
        };
        serde_json::to_value(parts).unwrap_or(Value::Null)
    }
}

impl TimelineDocument {
    /// Headline of the title slide, if any.
    pub fn headline(&self) -> Option<&str> {
        self.title
            .text
            .as_ref()
            .and_then(|text| text.headline.as_deref())
            .filter(|headline| !headline.is_empty())
    }
}

/// A single slide: the title slide or one event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<TimelineDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<TimelineDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<SlideText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autolink: Option<bool>,
}

/// Era band drawn behind the timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraSlide {
    pub start_date: TimelineDate,
    pub end_date: TimelineDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<SlideText>,
}

/// Date components; only the populated ones are serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineDate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub millisecond: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_date: Option<String>,
}

/// Headline and body of a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Reply to `POST /generate-json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegenerateResponse {
    pub status: Option<String>,
    pub filepath: Option<String>,
    pub data: TimelineDocument,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_generated_document() {
        let document: TimelineDocument = serde_json::from_value(json!({
            "title": {"text": {"headline": "Milestones", "text": "From steam to silicon"}},
            "events": [{
                "start_date": {"year": 1769},
                "text": {"headline": "Watt engine", "text": ""},
                "group": "energy",
                "media": {"url": "https://example.com/watt.jpg", "caption": "Engine"},
                "autolink": true
            }],
            "eras": [{
                "start_date": {"year": 1760},
                "end_date": {"year": 1840},
                "text": {"headline": "Industrial revolution", "text": ""}
            }],
            "scale": "human"
        }))
        .expect("document should parse");

        assert_eq!(document.headline(), Some("Milestones"));
        assert_eq!(document.events.len(), 1);
        let event = &document.events[0];
        assert_eq!(event.start_date.as_ref().and_then(|d| d.year), Some(1769));
        assert_eq!(event.group.as_deref(), Some("energy"));
        assert_eq!(
            event.media.as_ref().map(|m| m.url.as_str()),
            Some("https://example.com/watt.jpg")
        );
        assert_eq!(document.eras[0].end_date.year, Some(1840));
        assert!(document.extra.is_empty());
    }

    #[test]
    fn empty_title_object_and_unknown_keys_survive() {
        let raw = json!({"title": {}, "events": [], "eras": [], "scale": "human", "version": 2});
        let document: TimelineDocument = serde_json::from_value(raw).expect("parse");
        assert_eq!(document.headline(), None);
        let value = serde_json::to_value(&document).expect("serialize");
        assert_eq!(value["title"], json!({}));
        assert_eq!(value["version"], json!(2));
    }

    #[test]
    fn unknown_and_null_scales_keep_the_document() {
        let document: TimelineDocument =
            serde_json::from_value(json!({"title": {}, "events": [], "scale": "geological"}))
                .expect("unknown scale should parse");
        assert_eq!(document.scale, Scale::Other("geological".to_string()));

        let document: TimelineDocument =
            serde_json::from_value(json!({"title": {}, "events": [], "scale": null}))
                .expect("null scale should parse");
        assert_eq!(document.scale, Scale::Human);
        let value = serde_json::to_value(&document).expect("serialize");
        assert_eq!(value["scale"], json!(null));
    }

    #[test]
    fn slide_level_nulls_and_unknown_keys_survive() {
        let raw = json!({
            "title": {"text": {"headline": "Milestones", "text": null}},
            "events": [{
                "start_date": {"year": 1969, "month": null},
                "text": {"headline": "Moon landing"},
                "group": null,
                "custom": {"pin": true}
            }],
            "eras": [],
            "scale": "human"
        });
        let document: TimelineDocument = serde_json::from_value(raw.clone()).expect("parse");
        assert_eq!(document.headline(), Some("Milestones"));
        assert_eq!(document.events[0].group, None);
        assert_eq!(serde_json::to_value(&document).expect("serialize"), raw);
    }

    #[test]
    fn regenerate_reply_carries_document() {
        let reply: RegenerateResponse = serde_json::from_value(json!({
            "status": "success",
            "filepath": "static/data/tl-story.json",
            "data": {"title": {}, "events": [], "eras": [], "scale": "cosmological"}
        }))
        .expect("parse");
        assert_eq!(reply.status.as_deref(), Some("success"));
        assert_eq!(reply.data.scale, Scale::Cosmological);
    }
}
