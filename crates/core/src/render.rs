//! Pure renderers over the mirror: list view-models, HTML fragments and the
//! standalone snapshot page.

use std::fmt::Write as _;

use crate::{
    intent::Intent,
    mirror::LocalMirror,
    models::{Era, Event},
};

/// Characters of event text kept in list excerpts.
pub const EXCERPT_CHARS: usize = 100;
/// Headline shown for events without one.
pub const UNTITLED_EVENT: &str = "Untitled";
/// Headline shown for eras without one.
pub const UNNAMED_ERA: &str = "Unnamed era";
/// Placeholder for an empty event list.
pub const EMPTY_EVENTS: &str = "No events yet. Add one to get started.";
/// Placeholder for an empty era list.
pub const EMPTY_ERAS: &str = "No eras yet.";

/// Human-readable date of an event.
///
/// An explicit `display_date` wins, then `start_display_date`, otherwise the
/// date is composed from its numeric parts. Month is shown only with a year
/// context and day only with a month.
pub fn date_display(event: &Event) -> String {
    if let Some(text) = present(&event.display_date) {
        return text.to_string();
    }
    if let Some(text) = present(&event.start_display_date) {
        return text.to_string();
    }

    let mut out = compose_date(event.start_year, event.start_month, event.start_day);
    if let Some(end_year) = event.end_year {
        out.push_str(" - ");
        out.push_str(&compose_date(Some(end_year), event.end_month, event.end_day));
    }
    out
}

fn compose_date(year: Option<i64>, month: Option<u32>, day: Option<u32>) -> String {
    let mut out = String::new();
    if let Some(year) = year {
        let _ = write!(out, "{year}年");
    }
    if let Some(month) = month.filter(|m| *m != 0) {
        let _ = write!(out, "{month}月");
        if let Some(day) = day.filter(|d| *d != 0) {
            let _ = write!(out, "{day}日");
        }
    }
    out
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// First [`EXCERPT_CHARS`] characters of `text`, with `...` when cut.
pub fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// One event line in a list view.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub id: Option<i64>,
    pub headline: String,
    pub date: String,
    pub group: Option<String>,
    pub excerpt: Option<String>,
    /// Row actions; empty for rows the backend has not assigned an id yet.
    pub actions: Vec<Intent>,
}

/// One era line in a list view.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraRow {
    pub id: Option<i64>,
    pub headline: String,
    pub span: String,
    pub actions: Vec<Intent>,
}

/// View-models for the event list, in server order.
pub fn event_rows(events: &[Event]) -> Vec<EventRow> {
    events
        .iter()
        .map(|event| EventRow {
            id: event.id,
            headline: present(&event.headline)
                .unwrap_or(UNTITLED_EVENT)
                .to_string(),
            date: date_display(event),
            group: present(&event.event_group).map(str::to_string),
            excerpt: present(&event.text).map(excerpt),
            actions: event
                .id
                .map(|id| vec![Intent::OpenEventForm(Some(id)), Intent::DeleteEvent(id)])
                .unwrap_or_default(),
        })
        .collect()
}

/// View-models for the era list, in server order.
pub fn era_rows(eras: &[Era]) -> Vec<EraRow> {
    eras.iter()
        .map(|era| EraRow {
            id: era.id,
            headline: present(&era.headline).unwrap_or(UNNAMED_ERA).to_string(),
            span: format!(
                "{} - {}",
                year_text(era.start_year),
                year_text(era.end_year)
            ),
            actions: era
                .id
                .map(|id| vec![Intent::OpenEraForm(Some(id)), Intent::DeleteEra(id)])
                .unwrap_or_default(),
        })
        .collect()
}

fn year_text(year: Option<i64>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn action_buttons(out: &mut String, id: Option<i64>, actions: &[Intent]) {
    let Some(id) = id else { return };
    for intent in actions {
        if let Some(name) = intent.action_name() {
            let _ = write!(
                out,
                r#"<button type="button" class="btn-action {name}" data-action="{name}" data-id="{id}"></button>"#
            );
        }
    }
}

/// Event list fragment; an empty list renders the placeholder.
pub fn events_html(events: &[Event]) -> String {
    if events.is_empty() {
        return format!(
            r#"<div class="text-center text-muted py-5"><p>{}</p></div>"#,
            escape_html(EMPTY_EVENTS)
        );
    }

    let mut out = String::new();
    for row in event_rows(events) {
        out.push_str(r#"<div class="event-card">"#);
        let _ = write!(out, "<h5>{}</h5>", escape_html(&row.headline));
        let _ = write!(
            out,
            r#"<p class="text-muted small">{}"#,
            escape_html(&row.date)
        );
        if let Some(group) = &row.group {
            let _ = write!(out, r#"<span class="group">{}</span>"#, escape_html(group));
        }
        out.push_str("</p>");
        if let Some(text) = &row.excerpt {
            let _ = write!(out, r#"<p class="small">{}</p>"#, escape_html(text));
        }
        action_buttons(&mut out, row.id, &row.actions);
        out.push_str("</div>");
    }
    out
}

/// Era list fragment; an empty list renders the placeholder.
pub fn eras_html(eras: &[Era]) -> String {
    if eras.is_empty() {
        return format!(
            r#"<div class="text-muted small">{}</div>"#,
            escape_html(EMPTY_ERAS)
        );
    }

    let mut out = String::new();
    for row in era_rows(eras) {
        out.push_str(r#"<div class="era-row">"#);
        let _ = write!(
            out,
            r#"<strong>{}</strong><div class="small text-muted">{}</div>"#,
            escape_html(&row.headline),
            escape_html(&row.span)
        );
        action_buttons(&mut out, row.id, &row.actions);
        out.push_str("</div>");
    }
    out
}

/// Standalone page with the title, event count, both lists and the JSON preview.
pub fn snapshot_html(mirror: &LocalMirror) -> String {
    let config = mirror.config();
    let title = if config.title_headline.is_empty() {
        mirror.document().headline().unwrap_or("Timeline")
    } else {
        config.title_headline.as_str()
    };
    let preview = mirror.preview_json().unwrap_or_else(|_| "{}".to_string());

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(title));
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(title));
    if !config.title_text.is_empty() {
        let _ = writeln!(out, "<p>{}</p>", escape_html(&config.title_text));
    }
    let _ = writeln!(
        out,
        r#"<p class="scale">Scale: {}</p>"#,
        config.scale.as_str()
    );
    let _ = writeln!(
        out,
        r#"<h2>Events <span class="badge" id="eventCount">{}</span></h2>"#,
        mirror.event_count()
    );
    let _ = writeln!(
        out,
        r#"<section id="eventsContainer">{}</section>"#,
        events_html(mirror.events())
    );
    out.push_str("<h2>Eras</h2>\n");
    let _ = writeln!(
        out,
        r#"<section id="erasContainer">{}</section>"#,
        eras_html(mirror.eras())
    );
    out.push_str("<h2>Preview</h2>\n");
    let _ = writeln!(out, r#"<pre id="jsonPreview">{}</pre>"#, escape_html(&preview));
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimelineConfig;

    fn dated(year: Option<i64>, month: Option<u32>, day: Option<u32>) -> Event {
        Event {
            start_year: year,
            start_month: month,
            start_day: day,
            ..Event::default()
        }
    }

    #[test]
    fn composes_dates_from_parts() {
        assert_eq!(date_display(&dated(Some(1990), None, None)), "1990年");
        assert_eq!(date_display(&dated(Some(1990), Some(5), None)), "1990年5月");

        let ranged = Event {
            end_year: Some(1991),
            ..dated(Some(1990), Some(5), Some(1))
        };
        assert_eq!(date_display(&ranged), "1990年5月1日 - 1991年");
    }

    #[test]
    fn day_without_month_is_ignored() {
        assert_eq!(date_display(&dated(Some(1990), None, Some(3))), "1990年");
    }

    #[test]
    fn explicit_display_dates_take_priority() {
        let mut event = Event {
            display_date: Some("Summer 1990".to_string()),
            start_display_date: Some("June".to_string()),
            ..dated(Some(1990), Some(6), None)
        };
        assert_eq!(date_display(&event), "Summer 1990");

        event.display_date = Some(String::new());
        assert_eq!(date_display(&event), "June");

        event.start_display_date = None;
        assert_eq!(date_display(&event), "1990年6月");
    }

    #[test]
    fn missing_fields_never_panic() {
        assert_eq!(date_display(&Event::default()), "");
        let end_only = Event {
            end_year: Some(2000),
            ..Event::default()
        };
        assert_eq!(date_display(&end_only), " - 2000年");
    }

    #[test]
    fn excerpt_truncates_long_text() {
        let long = "a".repeat(150);
        let cut = excerpt(&long);
        assert_eq!(cut.len(), EXCERPT_CHARS + 3);
        assert!(cut.ends_with("..."));

        let exact = "b".repeat(EXCERPT_CHARS);
        assert_eq!(excerpt(&exact), exact);

        let wide = "年".repeat(101);
        assert_eq!(excerpt(&wide).chars().count(), EXCERPT_CHARS + 3);
    }

    #[test]
    fn rows_fall_back_and_carry_actions() {
        let rows = event_rows(&[
            Event {
                id: Some(3),
                text: Some(String::new()),
                ..dated(Some(1900), None, None)
            },
            Event::default(),
        ]);
        assert_eq!(rows[0].headline, UNTITLED_EVENT);
        assert_eq!(rows[0].excerpt, None);
        assert_eq!(
            rows[0].actions,
            vec![Intent::OpenEventForm(Some(3)), Intent::DeleteEvent(3)]
        );
        assert!(rows[1].actions.is_empty());

        let eras = era_rows(&[Era {
            id: Some(1),
            start_year: Some(-500),
            end_year: Some(400),
            ..Era::default()
        }]);
        assert_eq!(eras[0].headline, UNNAMED_ERA);
        assert_eq!(eras[0].span, "-500 - 400");
    }

    #[test]
    fn empty_lists_render_placeholders() {
        assert!(events_html(&[]).contains(EMPTY_EVENTS));
        assert!(eras_html(&[]).contains(EMPTY_ERAS));
    }

    #[test]
    fn html_is_escaped_and_rows_are_bound_declaratively() {
        let html = events_html(&[Event {
            id: Some(9),
            headline: Some("<script>alert(1)</script>".to_string()),
            event_group: Some("a&b".to_string()),
            ..dated(Some(2001), None, None)
        }]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a&amp;b"));
        assert!(html.contains(r#"data-action="edit-event" data-id="9""#));
        assert!(html.contains(r#"data-action="delete-event" data-id="9""#));
    }

    #[test]
    fn snapshot_contains_every_section() {
        let mut mirror = LocalMirror::new();
        mirror.set_config(TimelineConfig {
            title_headline: "History & Co".to_string(),
            ..TimelineConfig::default()
        });
        mirror.replace_events(vec![Event {
            id: Some(1),
            headline: Some("First".to_string()),
            ..dated(Some(1800), None, None)
        }]);

        let page = snapshot_html(&mirror);
        assert!(page.contains("<title>History &amp; Co</title>"));
        assert!(page.contains(r#"<span class="badge" id="eventCount">1</span>"#));
        assert!(page.contains("First"));
        assert!(page.contains(EMPTY_ERAS));
        assert!(page.contains(r#"<pre id="jsonPreview">"#));
    }
}
