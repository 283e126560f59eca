//! Editable form state and the presence/number validation applied before submit.

use thiserror::Error;

use crate::models::{Era, EraDraft, Event, EventDraft, Scale, TimelineConfig};

/// Every input the console can focus.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    TitleHeadline,
    TitleText,
    Headline,
    Text,
    EventGroup,
    UniqueId,
    StartYear,
    StartMonth,
    StartDay,
    EndYear,
    EndMonth,
    EndDay,
    DisplayDate,
    MediaUrl,
    MediaCaption,
}

impl FormField {
    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            FormField::TitleHeadline => "Title",
            FormField::TitleText => "Description",
            FormField::Headline => "Headline",
            FormField::Text => "Text",
            FormField::EventGroup => "Group",
            FormField::UniqueId => "Unique ID",
            FormField::StartYear => "Start year",
            FormField::StartMonth => "Start month",
            FormField::StartDay => "Start day",
            FormField::EndYear => "End year",
            FormField::EndMonth => "End month",
            FormField::EndDay => "End day",
            FormField::DisplayDate => "Display date",
            FormField::MediaUrl => "Media URL",
            FormField::MediaCaption => "Media caption",
        }
    }
}

/// Validation failure; `field` is where focus should go.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormError {
    /// Input that failed.
    pub field: FormField,
    /// Message shown in the alert.
    pub message: String,
}

impl FormError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field-level access shared by every form, so hosts can edit them generically.
pub trait Form {
    /// Inputs in display order.
    fn fields(&self) -> &'static [FormField];
    /// Current text of `field`, if the form has it.
    fn value(&self, field: FormField) -> Option<&str>;
    /// Mutable text of `field`, if the form has it.
    fn value_mut(&mut self, field: FormField) -> Option<&mut String>;
}

const EVENT_FIELDS: &[FormField] = &[
    FormField::Headline,
    FormField::Text,
    FormField::EventGroup,
    FormField::UniqueId,
    FormField::StartYear,
    FormField::StartMonth,
    FormField::StartDay,
    FormField::EndYear,
    FormField::EndMonth,
    FormField::EndDay,
    FormField::DisplayDate,
    FormField::MediaUrl,
    FormField::MediaCaption,
];

const ERA_FIELDS: &[FormField] = &[
    FormField::Headline,
    FormField::StartYear,
    FormField::EndYear,
    FormField::Text,
];

const CONFIG_FIELDS: &[FormField] = &[FormField::TitleHeadline, FormField::TitleText];

/// Event modal state. `edit_id` is set when editing an existing row.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub edit_id: Option<i64>,
    pub headline: String,
    pub text: String,
    pub event_group: String,
    pub unique_id: String,
    pub start_year: String,
    pub start_month: String,
    pub start_day: String,
    pub end_year: String,
    pub end_month: String,
    pub end_day: String,
    pub display_date: String,
    pub media_url: String,
    pub media_caption: String,
}

impl EventForm {
    /// Clear every field, including the edit id.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fill the form from a fetched row; absent fields become empty. A row
    /// without an id keeps the id the form was opened for.
    pub fn populate(&mut self, event: &Event) {
        self.edit_id = event.id.or(self.edit_id);
        self.headline = text_or_empty(&event.headline);
        self.text = text_or_empty(&event.text);
        self.event_group = text_or_empty(&event.event_group);
        self.unique_id = text_or_empty(&event.unique_id);
        self.start_year = number_or_empty(event.start_year);
        self.start_month = number_or_empty(event.start_month);
        self.start_day = number_or_empty(event.start_day);
        self.end_year = number_or_empty(event.end_year);
        self.end_month = number_or_empty(event.end_month);
        self.end_day = number_or_empty(event.end_day);
        self.display_date = text_or_empty(&event.display_date);
        self.media_url = text_or_empty(&event.media_url);
        self.media_caption = text_or_empty(&event.media_caption);
    }

    /// Check required fields and build the request payload.
    pub fn validate(&self) -> Result<EventDraft, FormError> {
        let headline = self.headline.trim();
        if headline.is_empty() {
            return Err(FormError::new(
                FormField::Headline,
                "Please enter an event headline",
            ));
        }
        let start_year = required_number(
            &self.start_year,
            FormField::StartYear,
            "Please enter a valid start year",
        )?;

        Ok(EventDraft {
            headline: headline.to_string(),
            text: self.text.clone(),
            start_year,
            start_month: optional_number(&self.start_month, FormField::StartMonth)?,
            start_day: optional_number(&self.start_day, FormField::StartDay)?,
            end_year: optional_number(&self.end_year, FormField::EndYear)?,
            end_month: optional_number(&self.end_month, FormField::EndMonth)?,
            end_day: optional_number(&self.end_day, FormField::EndDay)?,
            event_group: non_empty(&self.event_group),
            unique_id: non_empty(&self.unique_id),
            display_date: non_empty(&self.display_date),
            media_url: non_empty(&self.media_url),
            media_caption: non_empty(&self.media_caption),
        })
    }
}

impl Form for EventForm {
    fn fields(&self) -> &'static [FormField] {
        EVENT_FIELDS
    }

    fn value(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::Headline => &self.headline,
            FormField::Text => &self.text,
            FormField::EventGroup => &self.event_group,
            FormField::UniqueId => &self.unique_id,
            FormField::StartYear => &self.start_year,
            FormField::StartMonth => &self.start_month,
            FormField::StartDay => &self.start_day,
            FormField::EndYear => &self.end_year,
            FormField::EndMonth => &self.end_month,
            FormField::EndDay => &self.end_day,
            FormField::DisplayDate => &self.display_date,
            FormField::MediaUrl => &self.media_url,
            FormField::MediaCaption => &self.media_caption,
            FormField::TitleHeadline | FormField::TitleText => return None,
        };
        Some(value.as_str())
    }

    fn value_mut(&mut self, field: FormField) -> Option<&mut String> {
        let value = match field {
            FormField::Headline => &mut self.headline,
            FormField::Text => &mut self.text,
            FormField::EventGroup => &mut self.event_group,
            FormField::UniqueId => &mut self.unique_id,
            FormField::StartYear => &mut self.start_year,
            FormField::StartMonth => &mut self.start_month,
            FormField::StartDay => &mut self.start_day,
            FormField::EndYear => &mut self.end_year,
            FormField::EndMonth => &mut self.end_month,
            FormField::EndDay => &mut self.end_day,
            FormField::DisplayDate => &mut self.display_date,
            FormField::MediaUrl => &mut self.media_url,
            FormField::MediaCaption => &mut self.media_caption,
            FormField::TitleHeadline | FormField::TitleText => return None,
        };
        Some(value)
    }
}

/// Era modal state; replaces the one-prompt-per-field flow with a single form.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EraForm {
    pub edit_id: Option<i64>,
    pub headline: String,
    pub start_year: String,
    pub end_year: String,
    pub text: String,
}

impl EraForm {
    /// Clear every field, including the edit id.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fill the form from a mirror row.
    pub fn populate(&mut self, era: &Era) {
        self.edit_id = era.id;
        self.headline = text_or_empty(&era.headline);
        self.start_year = number_or_empty(era.start_year);
        self.end_year = number_or_empty(era.end_year);
        self.text = text_or_empty(&era.text);
    }

    /// Any failure rejects the whole submission.
    pub fn validate(&self) -> Result<EraDraft, FormError> {
        let headline = self.headline.trim();
        if headline.is_empty() {
            return Err(FormError::new(FormField::Headline, "Please enter an era name"));
        }
        let start_year = required_number(
            &self.start_year,
            FormField::StartYear,
            "Please enter a valid year",
        )?;
        let end_year =
            required_number(&self.end_year, FormField::EndYear, "Please enter a valid year")?;
        Ok(EraDraft {
            headline: headline.to_string(),
            start_year,
            end_year,
            text: self.text.clone(),
        })
    }
}

impl Form for EraForm {
    fn fields(&self) -> &'static [FormField] {
        ERA_FIELDS
    }

    fn value(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::Headline => &self.headline,
            FormField::StartYear => &self.start_year,
            FormField::EndYear => &self.end_year,
            FormField::Text => &self.text,
            _ => return None,
        };
        Some(value.as_str())
    }

    fn value_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Headline => Some(&mut self.headline),
            FormField::StartYear => Some(&mut self.start_year),
            FormField::EndYear => Some(&mut self.end_year),
            FormField::Text => Some(&mut self.text),
            _ => None,
        }
    }
}

/// Title/scale inputs at the top of the console.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub title_headline: String,
    pub title_text: String,
    pub scale: Scale,
}

impl ConfigForm {
    /// Copy loaded settings into the inputs.
    pub fn populate(&mut self, config: &TimelineConfig) {
        self.title_headline = config.title_headline.clone();
        self.title_text = config.title_text.clone();
        self.scale = config.scale.clone();
    }

    /// The flat object sent to `PUT /config`.
    pub fn to_config(&self) -> TimelineConfig {
        TimelineConfig {
            title_headline: self.title_headline.clone(),
            title_text: self.title_text.clone(),
            scale: self.scale.clone(),
        }
    }
}

impl Form for ConfigForm {
    fn fields(&self) -> &'static [FormField] {
        CONFIG_FIELDS
    }

    fn value(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::TitleHeadline => Some(self.title_headline.as_str()),
            FormField::TitleText => Some(self.title_text.as_str()),
            _ => None,
        }
    }

    fn value_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::TitleHeadline => Some(&mut self.title_headline),
            FormField::TitleText => Some(&mut self.title_text),
            _ => None,
        }
    }
}

fn text_or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number_or_empty<N: ToString>(value: Option<N>) -> String {
    value.map(|n| n.to_string()).unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required_number(raw: &str, field: FormField, message: &str) -> Result<i64, FormError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| FormError::new(field, message))
}

fn optional_number<N: std::str::FromStr>(raw: &str, field: FormField) -> Result<Option<N>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<N>()
        .map(Some)
        .map_err(|_| FormError::new(field, format!("{} must be a number", field.label())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_event_form() -> EventForm {
        EventForm {
            headline: "Moon landing".to_string(),
            start_year: "1969".to_string(),
            ..EventForm::default()
        }
    }

    #[test]
    fn empty_headline_focuses_headline() {
        let form = EventForm {
            headline: "   ".to_string(),
            start_year: "1969".to_string(),
            ..EventForm::default()
        };
        let err = form.validate().expect_err("headline is required");
        assert_eq!(err.field, FormField::Headline);
    }

    #[test]
    fn missing_or_non_numeric_start_year_focuses_year() {
        let mut form = filled_event_form();
        form.start_year.clear();
        assert_eq!(
            form.validate().expect_err("year required").field,
            FormField::StartYear
        );

        form.start_year = "nineteen".to_string();
        assert_eq!(
            form.validate().expect_err("year numeric").field,
            FormField::StartYear
        );
    }

    #[test]
    fn optional_numbers_parse_only_when_present() {
        let mut form = filled_event_form();
        form.start_month = " 7 ".to_string();
        form.event_group = "space".to_string();
        form.media_caption = "  ".to_string();

        let draft = form.validate().expect("valid form");
        assert_eq!(draft.start_year, 1969);
        assert_eq!(draft.start_month, Some(7));
        assert_eq!(draft.start_day, None);
        assert_eq!(draft.event_group.as_deref(), Some("space"));
        assert_eq!(draft.media_caption, None);

        form.start_day = "twentieth".to_string();
        assert_eq!(
            form.validate().expect_err("day must be numeric").field,
            FormField::StartDay
        );
    }

    #[test]
    fn negative_years_are_numbers() {
        let mut form = filled_event_form();
        form.start_year = "-3000".to_string();
        assert_eq!(form.validate().expect("valid").start_year, -3000);
    }

    #[test]
    fn populate_defaults_absent_fields() {
        let mut form = filled_event_form();
        form.media_url = "stale".to_string();
        form.populate(&Event {
            id: Some(12),
            headline: Some("Sputnik".to_string()),
            start_year: Some(1957),
            start_month: Some(10),
            ..Event::default()
        });

        assert_eq!(form.edit_id, Some(12));
        assert_eq!(form.headline, "Sputnik");
        assert_eq!(form.start_month, "10");
        assert_eq!(form.start_day, "");
        assert_eq!(form.media_url, "");

        form.reset();
        assert_eq!(form, EventForm::default());
    }

    #[test]
    fn populate_keeps_opened_id_for_rows_without_one() {
        let mut form = EventForm {
            edit_id: Some(42),
            ..EventForm::default()
        };
        form.populate(&Event {
            headline: Some("Sputnik".to_string()),
            ..Event::default()
        });
        assert_eq!(form.edit_id, Some(42));
        assert_eq!(form.headline, "Sputnik");
    }

    #[test]
    fn era_form_rejects_any_bad_year() {
        let mut form = EraForm {
            headline: "Space age".to_string(),
            start_year: "1957".to_string(),
            end_year: "soon".to_string(),
            ..EraForm::default()
        };
        assert_eq!(
            form.validate().expect_err("end year numeric").field,
            FormField::EndYear
        );

        form.end_year = "1975".to_string();
        let draft = form.validate().expect("valid era");
        assert_eq!((draft.start_year, draft.end_year), (1957, 1975));
        assert_eq!(draft.text, "");
    }

    #[test]
    fn generic_field_access_matches_struct() {
        let mut form = EventForm::default();
        for field in form.fields() {
            assert!(form.value(*field).is_some(), "{field:?} missing");
        }
        if let Some(value) = form.value_mut(FormField::DisplayDate) {
            value.push_str("Summer 1969");
        }
        assert_eq!(form.display_date, "Summer 1969");
        assert!(form.value(FormField::TitleHeadline).is_none());

        let mut config = ConfigForm::default();
        if let Some(value) = config.value_mut(FormField::TitleText) {
            value.push('x');
        }
        assert_eq!(config.to_config().title_text, "x");
    }
}
