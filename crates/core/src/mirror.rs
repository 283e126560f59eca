//! Client-side copy of the timeline used for listing and preview.

use crate::models::{Era, Event, TimelineConfig, TimelineDocument};

/// Last-fetched state of the backend.
///
/// Owned by a single writer; every replace is wholesale, so the most recent
/// response to resolve wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalMirror {
    config: TimelineConfig,
    events: Vec<Event>,
    eras: Vec<Era>,
    document: TimelineDocument,
}

impl LocalMirror {
    /// Empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Title/scale settings as last loaded or saved.
    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Event rows in server order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Era rows in server order.
    pub fn eras(&self) -> &[Era] {
        &self.eras
    }

    /// Last materialized document.
    pub fn document(&self) -> &TimelineDocument {
        &self.document
    }

    /// Count shown on the events badge.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Look up an era row by id.
    pub fn era(&self, id: i64) -> Option<&Era> {
        self.eras.iter().find(|era| era.id == Some(id))
    }

    /// Replace the settings.
    pub fn set_config(&mut self, config: TimelineConfig) {
        self.config = config;
    }

    /// Replace every event row.
    pub fn replace_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    /// Replace every era row.
    pub fn replace_eras(&mut self, eras: Vec<Era>) {
        self.eras = eras;
    }

    /// Replace the materialized document.
    pub fn replace_document(&mut self, document: TimelineDocument) {
        self.document = document;
    }

    /// Detached copy of the current state.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Pretty JSON of the document, as shown in the preview pane.
    pub fn preview_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scale;

    #[test]
    fn replacements_are_wholesale() {
        let mut mirror = LocalMirror::new();
        mirror.replace_events(vec![
            Event {
                id: Some(1),
                ..Event::default()
            },
            Event {
                id: Some(2),
                ..Event::default()
            },
        ]);
        assert_eq!(mirror.event_count(), 2);

        mirror.replace_events(vec![Event {
            id: Some(3),
            ..Event::default()
        }]);
        assert_eq!(mirror.event_count(), 1);
        assert_eq!(mirror.events()[0].id, Some(3));
    }

    #[test]
    fn finds_eras_by_id() {
        let mut mirror = LocalMirror::new();
        mirror.replace_eras(vec![Era {
            id: Some(5),
            headline: Some("Bronze age".to_string()),
            ..Era::default()
        }]);
        assert_eq!(
            mirror.era(5).and_then(|era| era.headline.as_deref()),
            Some("Bronze age")
        );
        assert!(mirror.era(6).is_none());
    }

    #[test]
    fn snapshot_is_detached() {
        let mut mirror = LocalMirror::new();
        mirror.replace_eras(vec![Era::default()]);
        let snapshot = mirror.snapshot();
        mirror.replace_eras(Vec::new());
        assert_eq!(snapshot.eras().len(), 1);
        assert!(mirror.eras().is_empty());
    }

    #[test]
    fn preview_reflects_document() -> serde_json::Result<()> {
        let mut mirror = LocalMirror::new();
        mirror.replace_document(TimelineDocument {
            scale: Scale::Cosmological,
            ..TimelineDocument::default()
        });
        let preview = mirror.preview_json()?;
        assert!(preview.contains("\"scale\": \"cosmological\""));
        Ok(())
    }
}
