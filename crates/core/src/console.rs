//! Action layer: every user intent is handled here and answered with an
//! [`Outcome`] the host carries out.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    api::{ApiError, TimelineApi},
    config::AppConfig,
    debounce::Debouncer,
    form::{ConfigForm, EraForm, EventForm, FormField},
    intent::{FormKind, Intent},
    mirror::LocalMirror,
    models::RegenerateResponse,
    notify::{LogLevel, LogPanel, Notifications},
    render,
};

/// What the host should do after an intent has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing beyond redrawing.
    Done,
    /// Show a blocking message, then move focus to `focus` if set.
    Alert {
        /// Text of the alert.
        message: String,
        /// Input to focus once the alert is dismissed.
        focus: Option<FormField>,
    },
    /// Ask the user; dispatch `intent` if they accept.
    Confirm {
        /// Question shown to the user.
        prompt: String,
        /// Intent to run on acceptance.
        intent: Intent,
    },
    /// Show the given modal form.
    OpenForm(FormKind),
    /// Hide the open modal form.
    CloseForm,
    /// Put `text` on the clipboard and report back through
    /// [`Console::copy_finished`].
    Copy(String),
}

enum Completion {
    Regenerated(Result<RegenerateResponse, ApiError>),
}

/// Owns the mirror, the forms and the feedback sinks, and runs every action
/// against a [`TimelineApi`].
pub struct Console {
    api: Arc<dyn TimelineApi>,
    api_base: String,
    auto_generate: bool,
    export_path: PathBuf,
    snapshot_path: PathBuf,
    mirror: LocalMirror,
    log: LogPanel,
    notifications: Notifications,
    debouncer: Debouncer,
    config_form: ConfigForm,
    event_form: EventForm,
    era_form: EraForm,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    pending: usize,
}

impl Console {
    /// Console with an empty mirror; call [`Console::init`] to load data.
    pub fn new(api: Arc<dyn TimelineApi>, config: &AppConfig) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            api,
            api_base: config.api_base.clone(),
            auto_generate: config.auto_generate,
            export_path: config.export_path(),
            snapshot_path: config.snapshot_path(),
            mirror: LocalMirror::new(),
            log: LogPanel::with_capacity(config.log_capacity),
            notifications: Notifications::new(config.notification_ttl()),
            debouncer: Debouncer::new(config.debounce()),
            config_form: ConfigForm::default(),
            event_form: EventForm::default(),
            era_form: EraForm::default(),
            completion_tx,
            completion_rx,
            pending: 0,
        }
    }

    /// Startup sequence: announce, probe the backend, then load everything.
    pub async fn init(&mut self) {
        self.record(LogLevel::Info, "Console initialized");
        let base = format!("API base: {}", self.api_base);
        self.record(LogLevel::Info, base);

        match self.api.health().await {
            Ok(health) => {
                info!(status = %health.status, "backend reachable");
            }
            Err(err) => {
                warn!(%err, "health check failed");
                self.record(LogLevel::Warning, format!("Backend health check failed: {err}"));
            }
        }

        self.load_all().await;
    }

    /// Run one intent to completion.
    pub async fn dispatch(&mut self, intent: Intent) -> Outcome {
        debug!(?intent, mutation = intent.is_mutation(), "dispatch");
        match intent {
            Intent::LoadAll => {
                self.load_all().await;
                Outcome::Done
            }
            Intent::LoadConfig => {
                self.load_config().await;
                Outcome::Done
            }
            Intent::SaveConfig | Intent::ScaleChanged => {
                self.save_config().await;
                Outcome::Done
            }
            Intent::ConfigEdited => {
                self.config_edited(Instant::now());
                Outcome::Done
            }
            Intent::LoadEvents => {
                self.load_events().await;
                Outcome::Done
            }
            Intent::LoadEras => {
                self.load_eras().await;
                Outcome::Done
            }
            Intent::OpenEventForm(id) => self.open_event_form(id).await,
            Intent::SaveEvent => self.save_event().await,
            Intent::DeleteEvent(id) => Outcome::Confirm {
                prompt: "Delete this event?".to_string(),
                intent: Intent::ConfirmDeleteEvent(id),
            },
            Intent::ConfirmDeleteEvent(id) => {
                self.delete_event(id).await;
                Outcome::Done
            }
            Intent::OpenEraForm(id) => self.open_era_form(id),
            Intent::SaveEra => self.save_era().await,
            Intent::DeleteEra(id) => Outcome::Confirm {
                prompt: "Delete this era?".to_string(),
                intent: Intent::ConfirmDeleteEra(id),
            },
            Intent::ConfirmDeleteEra(id) => {
                self.delete_era(id).await;
                Outcome::Done
            }
            Intent::Regenerate => {
                self.regenerate().await;
                Outcome::Done
            }
            Intent::RefreshPreview => {
                self.refresh_preview().await;
                Outcome::Done
            }
            Intent::Export => {
                self.export().await;
                Outcome::Done
            }
            Intent::CopyJson => self.copy_json(),
            Intent::WriteHtmlSnapshot => {
                self.write_html_snapshot().await;
                Outcome::Done
            }
            Intent::ClearLog => {
                self.log.clear();
                Outcome::Done
            }
        }
    }

    /// Host heartbeat: apply finished background work, expire banners and
    /// flush a debounced config save.
    pub async fn tick(&mut self, now: Instant) {
        self.drain_completions();
        self.notifications.prune(now);
        if self.debouncer.fire(now) {
            self.save_config().await;
        }
    }

    /// A title field changed at `now`.
    pub fn config_edited(&mut self, now: Instant) {
        self.debouncer.touch(now);
    }

    /// Apply every background result that has already arrived.
    pub fn drain_completions(&mut self) {
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.apply(completion);
        }
    }

    /// Wait until every spawned background call has reported back.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.completion_rx.recv().await {
                Some(completion) => self.apply(completion),
                None => break,
            }
        }
    }

    /// Background calls still in flight.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Report the result of a clipboard write requested by [`Outcome::Copy`].
    pub fn copy_finished(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => self.announce(LogLevel::Success, "JSON copied to clipboard"),
            Err(err) => {
                warn!(%err, "clipboard write failed");
                self.announce(LogLevel::Error, format!("Copy failed: {err}"));
            }
        }
    }

    /// Last-fetched backend state.
    pub fn mirror(&self) -> &LocalMirror {
        &self.mirror
    }

    /// User-facing log panel.
    pub fn log(&self) -> &LogPanel {
        &self.log
    }

    /// Live banners.
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Backend root the console talks to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Title and scale inputs.
    pub fn config_form(&self) -> &ConfigForm {
        &self.config_form
    }

    /// Title and scale inputs, for the host to edit in place.
    pub fn config_form_mut(&mut self) -> &mut ConfigForm {
        &mut self.config_form
    }

    /// Event modal state.
    pub fn event_form(&self) -> &EventForm {
        &self.event_form
    }

    /// Event modal state, for the host to edit in place.
    pub fn event_form_mut(&mut self) -> &mut EventForm {
        &mut self.event_form
    }

    /// Era modal state.
    pub fn era_form(&self) -> &EraForm {
        &self.era_form
    }

    /// Era modal state, for the host to edit in place.
    pub fn era_form_mut(&mut self) -> &mut EraForm {
        &mut self.era_form
    }

    async fn load_all(&mut self) {
        self.load_config().await;
        self.load_events().await;
        self.load_eras().await;
        self.refresh_preview().await;
    }

    async fn load_config(&mut self) {
        match self.api.fetch_config().await {
            Ok(Some(config)) => {
                self.config_form.populate(&config);
                self.mirror.set_config(config);
                self.record(LogLevel::Success, "Config loaded");
            }
            Ok(None) => {
                debug!("backend has no config yet");
            }
            Err(err) => {
                error!(%err, "load config failed");
                self.record(LogLevel::Error, format!("Failed to load config: {err}"));
            }
        }
    }

    async fn save_config(&mut self) {
        self.debouncer.cancel();
        let config = self.config_form.to_config();
        match self.api.update_config(&config).await {
            Ok(()) => {
                info!(scale = config.scale.as_str(), "config saved");
                self.mirror.set_config(config);
                self.record(LogLevel::Success, "Config saved");
                self.after_mutation();
            }
            Err(err) => {
                error!(%err, "save config failed");
                self.record(LogLevel::Error, format!("Failed to save config: {err}"));
            }
        }
    }

    async fn load_events(&mut self) {
        match self.api.list_events().await {
            Ok(events) => {
                let count = events.len();
                self.mirror.replace_events(events);
                debug!(count, "events loaded");
                self.record(LogLevel::Success, format!("Loaded {count} events"));
            }
            Err(err) => {
                error!(%err, "load events failed");
                self.record(LogLevel::Error, format!("Failed to load events: {err}"));
            }
        }
    }

    async fn load_eras(&mut self) {
        match self.api.list_eras().await {
            Ok(eras) => {
                let count = eras.len();
                self.mirror.replace_eras(eras);
                debug!(count, "eras loaded");
                self.record(LogLevel::Success, format!("Loaded {count} eras"));
            }
            Err(err) => {
                error!(%err, "load eras failed");
                self.record(LogLevel::Error, format!("Failed to load eras: {err}"));
            }
        }
    }

    async fn open_event_form(&mut self, id: Option<i64>) -> Outcome {
        self.event_form.reset();
        if let Some(id) = id {
            self.event_form.edit_id = Some(id);
            match self.api.get_event(id).await {
                Ok(event) => self.event_form.populate(&event),
                Err(err) => {
                    error!(id, %err, "load event failed");
                    self.record(LogLevel::Error, format!("Failed to load event: {err}"));
                }
            }
        }
        Outcome::OpenForm(FormKind::Event)
    }

    async fn save_event(&mut self) -> Outcome {
        let draft = match self.event_form.validate() {
            Ok(draft) => draft,
            Err(err) => {
                return Outcome::Alert {
                    message: err.message,
                    focus: Some(err.field),
                }
            }
        };

        let result = match self.event_form.edit_id {
            Some(id) => self.api.update_event(id, &draft).await.map(|()| Some(id)),
            None => self.api.create_event(&draft).await.map(|reply| reply.id),
        };

        match result {
            Ok(id) => {
                info!(?id, headline = %draft.headline, "event saved");
                if self.event_form.edit_id.is_some() {
                    self.record(LogLevel::Info, format!("Event updated: {}", draft.headline));
                } else {
                    self.record(LogLevel::Success, format!("Event added: {}", draft.headline));
                }
                self.load_events().await;
                self.after_mutation();
                Outcome::CloseForm
            }
            Err(err) => {
                error!(%err, "save event failed");
                self.record(LogLevel::Error, format!("Failed to save event: {err}"));
                Outcome::Done
            }
        }
    }

    async fn delete_event(&mut self, id: i64) {
        match self.api.delete_event(id).await {
            Ok(()) => {
                info!(id, "event deleted");
                self.record(LogLevel::Warning, "Event deleted");
                self.load_events().await;
                self.after_mutation();
            }
            Err(err) => {
                error!(id, %err, "delete event failed");
                self.record(LogLevel::Error, format!("Failed to delete event: {err}"));
            }
        }
    }

    fn open_era_form(&mut self, id: Option<i64>) -> Outcome {
        self.era_form.reset();
        if let Some(id) = id {
            match self.mirror.era(id) {
                Some(era) => self.era_form.populate(era),
                None => {
                    warn!(id, "era not in mirror");
                    self.record(LogLevel::Error, format!("Era {id} not found"));
                    return Outcome::Done;
                }
            }
        }
        Outcome::OpenForm(FormKind::Era)
    }

    async fn save_era(&mut self) -> Outcome {
        let draft = match self.era_form.validate() {
            Ok(draft) => draft,
            Err(err) => {
                return Outcome::Alert {
                    message: err.message,
                    focus: Some(err.field),
                }
            }
        };

        let result = match self.era_form.edit_id {
            Some(id) => self.api.update_era(id, &draft).await.map(|()| Some(id)),
            None => self.api.create_era(&draft).await.map(|reply| reply.id),
        };

        match result {
            Ok(id) => {
                info!(?id, headline = %draft.headline, "era saved");
                if self.era_form.edit_id.is_some() {
                    self.record(LogLevel::Info, format!("Era updated: {}", draft.headline));
                } else {
                    self.record(LogLevel::Success, format!("Era added: {}", draft.headline));
                }
                self.load_eras().await;
                self.after_mutation();
                Outcome::CloseForm
            }
            Err(err) => {
                error!(%err, "save era failed");
                self.record(LogLevel::Error, format!("Failed to save era: {err}"));
                Outcome::Done
            }
        }
    }

    async fn delete_era(&mut self, id: i64) {
        match self.api.delete_era(id).await {
            Ok(()) => {
                info!(id, "era deleted");
                self.record(LogLevel::Warning, "Era deleted");
                self.load_eras().await;
                self.after_mutation();
            }
            Err(err) => {
                error!(id, %err, "delete era failed");
                self.record(LogLevel::Error, format!("Failed to delete era: {err}"));
            }
        }
    }

    async fn regenerate(&mut self) {
        self.record(LogLevel::Info, "Generating JSON file...");
        match self.api.regenerate().await {
            Ok(reply) => {
                info!(filepath = ?reply.filepath, "document regenerated");
                self.mirror.replace_document(reply.data);
                self.announce(LogLevel::Success, "JSON file generated");
            }
            Err(err) => {
                error!(%err, "regenerate failed");
                self.record(LogLevel::Error, format!("JSON generation failed: {err}"));
                self.banner(LogLevel::Error, format!("Generation failed: {err}"));
            }
        }
    }

    async fn refresh_preview(&mut self) {
        match self.api.fetch_document().await {
            Ok(document) => {
                self.mirror.replace_document(document);
                self.record(LogLevel::Success, "Timeline data loaded");
            }
            Err(err) => {
                error!(%err, "load document failed");
                self.record(
                    LogLevel::Error,
                    format!("Failed to load timeline data: {err}"),
                );
            }
        }
    }

    async fn export(&mut self) {
        let bytes = match self.api.export().await {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(%err, "export failed");
                self.announce(LogLevel::Error, format!("Export failed: {err}"));
                return;
            }
        };

        let path = self.export_path.clone();
        match write_file(&path, &bytes).await {
            Ok(()) => {
                info!(path = %path.display(), size = bytes.len(), "export written");
                self.record(LogLevel::Success, "Data exported");
                self.banner(
                    LogLevel::Success,
                    format!("Data exported to {}", path.display()),
                );
            }
            Err(err) => {
                error!(path = %path.display(), %err, "export write failed");
                self.announce(LogLevel::Error, format!("Export failed: {err}"));
            }
        }
    }

    fn copy_json(&mut self) -> Outcome {
        match self.mirror.preview_json() {
            Ok(text) => Outcome::Copy(text),
            Err(err) => {
                error!(%err, "serialize document failed");
                self.announce(LogLevel::Error, format!("Copy failed: {err}"));
                Outcome::Done
            }
        }
    }

    async fn write_html_snapshot(&mut self) {
        let page = render::snapshot_html(&self.mirror);
        let path = self.snapshot_path.clone();
        match write_file(&path, page.as_bytes()).await {
            Ok(()) => {
                info!(path = %path.display(), "snapshot written");
                self.announce(
                    LogLevel::Success,
                    format!("HTML snapshot written to {}", path.display()),
                );
            }
            Err(err) => {
                error!(path = %path.display(), %err, "snapshot write failed");
                self.announce(LogLevel::Error, format!("Snapshot failed: {err}"));
            }
        }
    }

    /// Fire-and-forget regenerate after a successful change.
    fn after_mutation(&mut self) {
        if !self.auto_generate {
            return;
        }
        let api = Arc::clone(&self.api);
        let tx = self.completion_tx.clone();
        self.pending += 1;
        tokio::spawn(async move {
            let result = api.regenerate().await;
            let _ = tx.send(Completion::Regenerated(result));
        });
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Regenerated(result) => {
                self.pending = self.pending.saturating_sub(1);
                match result {
                    Ok(reply) => {
                        debug!(filepath = ?reply.filepath, "background regenerate finished");
                        self.mirror.replace_document(reply.data);
                    }
                    Err(err) => {
                        warn!(%err, "background regenerate failed");
                        self.record(
                            LogLevel::Warning,
                            format!("Background regenerate failed: {err}"),
                        );
                    }
                }
            }
        }
    }

    fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log.push(level, message);
    }

    fn banner(&mut self, level: LogLevel, message: impl Into<String>) {
        self.notifications.push(level, message, Instant::now());
    }

    /// Log entry plus banner with the same text.
    fn announce(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        self.banner(level, message.clone());
        self.record(level, message);
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await
}
