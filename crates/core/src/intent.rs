//! User intents understood by the console's dispatch table.

/// Which modal form an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// Add or edit an event.
    Event,
    /// Add or edit an era.
    Era,
}

/// Everything a user can ask the console to do.
///
/// Hosts translate key presses, buttons or `data-action` attributes into
/// intents; nothing here depends on a particular UI toolkit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Reload config, events and eras.
    LoadAll,
    /// Fetch title and scale.
    LoadConfig,
    /// Save title and scale now.
    SaveConfig,
    /// A title field changed; saved once the debounce window passes.
    ConfigEdited,
    /// The scale selector changed; saved immediately.
    ScaleChanged,
    /// Reload the event list.
    LoadEvents,
    /// Reload the era list.
    LoadEras,
    /// Open the event form, prefilled when an id is given.
    OpenEventForm(Option<i64>),
    /// Validate the event form and create or update.
    SaveEvent,
    /// Ask for confirmation before deleting.
    DeleteEvent(i64),
    /// Delete an event the user already confirmed.
    ConfirmDeleteEvent(i64),
    /// Open the era form, prefilled when an id is given.
    OpenEraForm(Option<i64>),
    /// Validate the era form and create or update.
    SaveEra,
    /// Ask for confirmation before deleting.
    DeleteEra(i64),
    /// Delete an era the user already confirmed.
    ConfirmDeleteEra(i64),
    /// Rebuild the published document with visible feedback.
    Regenerate,
    /// Fetch the document without rebuilding it.
    RefreshPreview,
    /// Save the backend export to a file.
    Export,
    /// Put the preview JSON on the clipboard.
    CopyJson,
    /// Write the standalone HTML page.
    WriteHtmlSnapshot,
    /// Empty the log panel.
    ClearLog,
}

impl Intent {
    /// Name used in rendered `data-action` attributes for row-level intents.
    pub fn action_name(&self) -> Option<&'static str> {
        match self {
            Intent::OpenEventForm(Some(_)) => Some("edit-event"),
            Intent::DeleteEvent(_) => Some("delete-event"),
            Intent::OpenEraForm(Some(_)) => Some("edit-era"),
            Intent::DeleteEra(_) => Some("delete-era"),
            _ => None,
        }
    }

    /// Inverse of [`Intent::action_name`] for a row id.
    pub fn from_action(name: &str, id: i64) -> Option<Self> {
        match name {
            "edit-event" => Some(Intent::OpenEventForm(Some(id))),
            "delete-event" => Some(Intent::DeleteEvent(id)),
            "edit-era" => Some(Intent::OpenEraForm(Some(id))),
            "delete-era" => Some(Intent::DeleteEra(id)),
            _ => None,
        }
    }

    /// Whether a successful run changes backend data.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Intent::SaveConfig
                | Intent::ScaleChanged
                | Intent::SaveEvent
                | Intent::ConfirmDeleteEvent(_)
                | Intent::SaveEra
                | Intent::ConfirmDeleteEra(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_actions_map_both_ways() {
        for intent in [
            Intent::OpenEventForm(Some(4)),
            Intent::DeleteEvent(4),
            Intent::OpenEraForm(Some(4)),
            Intent::DeleteEra(4),
        ] {
            let name = intent.action_name().expect("row intent has a name");
            assert_eq!(Intent::from_action(name, 4), Some(intent));
        }
        assert_eq!(Intent::OpenEventForm(None).action_name(), None);
        assert_eq!(Intent::from_action("reset", 1), None);
    }

    #[test]
    fn deletes_need_confirmation_before_mutating() {
        assert!(!Intent::DeleteEvent(1).is_mutation());
        assert!(Intent::ConfirmDeleteEvent(1).is_mutation());
        assert!(Intent::SaveEra.is_mutation());
        assert!(!Intent::CopyJson.is_mutation());
    }
}
