use std::{
    io, thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use timeline_admin_core::{
    form::{Form, FormField},
    notify::LogLevel,
    render, Console, FormKind, Intent, Outcome,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clipboard;

const TICK_RATE: Duration = Duration::from_millis(250);
const LABEL_WIDTH: usize = 14;
const HELP: &str = "q quit · Tab focus · a add · e edit · d delete · g regenerate · p preview · x export · y copy · h html · m scale · s save · c clear log";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

impl Theme {
    fn level(&self, level: LogLevel) -> Color {
        match level {
            LogLevel::Info => self.accent,
            LogLevel::Success => self.success,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.danger,
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Panel {
    Config,
    Events,
    Eras,
    Preview,
    Log,
}

const PANELS: [Panel; 5] = [
    Panel::Config,
    Panel::Events,
    Panel::Eras,
    Panel::Preview,
    Panel::Log,
];

impl Panel {
    fn cycle(self, delta: isize) -> Self {
        let idx = PANELS.iter().position(|panel| *panel == self).unwrap_or(0) as isize;
        let len = PANELS.len() as isize;
        PANELS[(idx + delta).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, Copy)]
struct FormModal {
    kind: FormKind,
    field: usize,
}

#[derive(Debug, Clone)]
enum Dialog {
    Confirm { prompt: String, intent: Intent },
    Alert {
        message: String,
        focus: Option<FormField>,
    },
}

/// Terminal front end for the timeline admin console.
pub struct App {
    console: Console,
    theme: Theme,
    focus: Panel,
    event_cursor: usize,
    era_cursor: usize,
    preview_scroll: u16,
    config_field: usize,
    editing_config: bool,
    form: Option<FormModal>,
    dialog: Option<Dialog>,
    should_quit: bool,
}

impl App {
    pub fn new(console: Console) -> Self {
        Self {
            console,
            theme: Theme::default(),
            focus: Panel::Events,
            event_cursor: 0,
            era_cursor: 0,
            preview_scroll: 0,
            config_field: 0,
            editing_config: false,
            form: None,
            dialog: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.console.init().await;
        info!(
            events = self.console.mirror().event_count(),
            eras = self.console.mirror().eras().len(),
            "Initial load finished"
        );

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event).await {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    async fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key).await;
                }
                true
            }
            Some(AppEvent::Input(_)) => true,
            Some(AppEvent::Tick) => {
                self.console.tick(Instant::now()).await;
                true
            }
            None => false,
        }
    }

    async fn run_intent(&mut self, intent: Intent) {
        let outcome = self.console.dispatch(intent).await;
        self.apply_outcome(outcome);
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Done => {}
            Outcome::Alert { message, focus } => {
                self.dialog = Some(Dialog::Alert { message, focus });
            }
            Outcome::Confirm { prompt, intent } => {
                self.dialog = Some(Dialog::Confirm { prompt, intent });
            }
            Outcome::OpenForm(kind) => {
                self.form = Some(FormModal { kind, field: 0 });
            }
            Outcome::CloseForm => self.form = None,
            Outcome::Copy(text) => {
                let result = clipboard::copy(&text);
                self.console.copy_finished(result);
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        if self.dialog.is_some() {
            self.handle_dialog_key(key).await;
        } else if self.form.is_some() {
            self.handle_form_key(key).await;
        } else if self.editing_config {
            self.handle_config_edit_key(key).await;
        } else {
            self.handle_main_key(key).await;
        }
    }

    async fn handle_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        match dialog {
            Dialog::Confirm { prompt, intent } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.run_intent(intent).await,
                KeyCode::Char('n') | KeyCode::Esc => debug!(?intent, "Confirmation declined"),
                _ => self.dialog = Some(Dialog::Confirm { prompt, intent }),
            },
            Dialog::Alert { message, focus } => match key.code {
                KeyCode::Enter | KeyCode::Esc => self.focus_form_field(focus),
                _ => self.dialog = Some(Dialog::Alert { message, focus }),
            },
        }
    }

    fn focus_form_field(&mut self, focus: Option<FormField>) {
        let (Some(field), Some(modal)) = (focus, self.form) else {
            return;
        };
        if let Some(idx) = self.form_fields(modal.kind).iter().position(|f| *f == field) {
            self.form = Some(FormModal { field: idx, ..modal });
        }
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.form else {
            return;
        };
        let fields = self.form_fields(modal.kind);
        let Some(field) = fields.get(modal.field).copied() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Enter => {
                let intent = match modal.kind {
                    FormKind::Event => Intent::SaveEvent,
                    FormKind::Era => Intent::SaveEra,
                };
                self.run_intent(intent).await;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form = Some(FormModal {
                    field: step_index(modal.field, 1, fields.len()),
                    ..modal
                });
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form = Some(FormModal {
                    field: step_index(modal.field, -1, fields.len()),
                    ..modal
                });
            }
            KeyCode::Backspace => {
                if let Some(value) = self.form_value_mut(modal.kind, field) {
                    value.pop();
                }
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(value) = self.form_value_mut(modal.kind, field) {
                    value.clear();
                }
            }
            KeyCode::Char(c) if is_text_input(key.modifiers) => {
                if let Some(value) = self.form_value_mut(modal.kind, field) {
                    value.push(c);
                }
            }
            _ => {}
        }
    }

    async fn handle_config_edit_key(&mut self, key: KeyEvent) {
        let fields = self.console.config_form().fields();
        let Some(field) = fields.get(self.config_field).copied() else {
            self.editing_config = false;
            return;
        };
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing_config = false,
            KeyCode::Backspace => {
                if let Some(value) = self.console.config_form_mut().value_mut(field) {
                    value.pop();
                }
                self.run_intent(Intent::ConfigEdited).await;
            }
            KeyCode::Char(c) if is_text_input(key.modifiers) => {
                if let Some(value) = self.console.config_form_mut().value_mut(field) {
                    value.push(c);
                }
                self.run_intent(Intent::ConfigEdited).await;
            }
            _ => {}
        }
    }

    async fn handle_main_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Tab => self.focus = self.focus.cycle(1),
            KeyCode::BackTab => self.focus = self.focus.cycle(-1),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('r') => self.run_intent(Intent::LoadAll).await,
            KeyCode::Char('g') => self.run_intent(Intent::Regenerate).await,
            KeyCode::Char('p') => self.run_intent(Intent::RefreshPreview).await,
            KeyCode::Char('x') => self.run_intent(Intent::Export).await,
            KeyCode::Char('y') => self.run_intent(Intent::CopyJson).await,
            KeyCode::Char('h') => self.run_intent(Intent::WriteHtmlSnapshot).await,
            KeyCode::Char('c') => self.run_intent(Intent::ClearLog).await,
            KeyCode::Char('s') => self.run_intent(Intent::SaveConfig).await,
            KeyCode::Char('m') => {
                let form = self.console.config_form_mut();
                form.scale = form.scale.toggled();
                self.run_intent(Intent::ScaleChanged).await;
            }
            KeyCode::Char('a') => {
                let intent = if self.focus == Panel::Eras {
                    Intent::OpenEraForm(None)
                } else {
                    Intent::OpenEventForm(None)
                };
                self.run_intent(intent).await;
            }
            KeyCode::Enter if self.focus == Panel::Config => self.editing_config = true,
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(intent) = self.selected_action("edit") {
                    self.run_intent(intent).await;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(intent) = self.selected_action("delete") {
                    self.run_intent(intent).await;
                }
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let mirror = self.console.mirror();
        match self.focus {
            Panel::Config => {
                let len = self.console.config_form().fields().len();
                self.config_field = step_index(self.config_field, delta, len);
            }
            Panel::Events => {
                self.event_cursor = step_index(self.event_cursor, delta, mirror.event_count());
            }
            Panel::Eras => {
                self.era_cursor = step_index(self.era_cursor, delta, mirror.eras().len());
            }
            Panel::Preview => {
                self.preview_scroll = if delta < 0 {
                    self.preview_scroll.saturating_sub(1)
                } else {
                    self.preview_scroll.saturating_add(1)
                };
            }
            Panel::Log => {}
        }
    }

    /// Row intent named `<verb>-event` / `<verb>-era` for the selected row.
    fn selected_action(&self, verb: &str) -> Option<Intent> {
        let mirror = self.console.mirror();
        let (actions, noun) = match self.focus {
            Panel::Events => (
                render::event_rows(mirror.events())
                    .into_iter()
                    .nth(self.event_cursor)?
                    .actions,
                "event",
            ),
            Panel::Eras => (
                render::era_rows(mirror.eras())
                    .into_iter()
                    .nth(self.era_cursor)?
                    .actions,
                "era",
            ),
            _ => return None,
        };
        let name = format!("{verb}-{noun}");
        actions
            .into_iter()
            .find(|intent| intent.action_name() == Some(name.as_str()))
    }

    fn form_fields(&self, kind: FormKind) -> &'static [FormField] {
        match kind {
            FormKind::Event => self.console.event_form().fields(),
            FormKind::Era => self.console.era_form().fields(),
        }
    }

    fn form_value(&self, kind: FormKind, field: FormField) -> &str {
        let value = match kind {
            FormKind::Event => self.console.event_form().value(field),
            FormKind::Era => self.console.era_form().value(field),
        };
        value.unwrap_or_default()
    }

    fn form_value_mut(&mut self, kind: FormKind, field: FormField) -> Option<&mut String> {
        match kind {
            FormKind::Event => self.console.event_form_mut().value_mut(field),
            FormKind::Era => self.console.era_form_mut().value_mut(field),
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(5)])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(5)])
            .split(columns[1]);

        self.render_header(frame, rows[0]);
        self.render_config(frame, left[0]);
        self.render_events(frame, left[1]);
        self.render_eras(frame, right[0]);
        self.render_preview(frame, right[1]);
        self.render_log(frame, rows[2]);
        self.render_help(frame, rows[3]);
        self.render_banners(frame, area);

        if let Some(modal) = self.form {
            self.render_form(frame, modal);
        }
        if let Some(dialog) = &self.dialog {
            self.render_dialog(frame, dialog);
        }
    }

    fn panel_block(&self, panel: Panel, title: String) -> Block<'static> {
        let color = if self.focus == panel {
            self.theme.accent
        } else {
            self.theme.muted
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(title)
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let config = self.console.mirror().config();
        let title = if config.title_headline.is_empty() {
            "Timeline admin".to_string()
        } else {
            config.title_headline.clone()
        };
        let mut spans = vec![
            Span::styled(
                title,
                Style::default()
                    .fg(self.theme.primary_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", self.console.api_base()),
                Style::default().fg(self.theme.muted),
            ),
        ];
        if self.console.pending() > 0 {
            spans.push(Span::styled(
                "  regenerating…",
                Style::default().fg(self.theme.warning),
            ));
        }
        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    }

    fn render_config(&self, frame: &mut Frame, area: Rect) {
        let form = self.console.config_form();
        let focused = self.focus == Panel::Config;
        let mut lines: Vec<Line> = form
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let selected = focused && idx == self.config_field;
                let style = if selected {
                    Style::default().bg(self.theme.selection_bg)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                        Style::default().fg(self.theme.muted),
                    ),
                    Span::styled(form.value(*field).unwrap_or_default().to_string(), style),
                ])
            })
            .collect();
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<width$}", "Scale", width = LABEL_WIDTH),
                Style::default().fg(self.theme.muted),
            ),
            Span::raw(form.scale.as_str()),
            Span::styled("  (m to toggle)", Style::default().fg(self.theme.muted)),
        ]));

        let title = if self.editing_config {
            "Timeline (editing, Enter to finish)".to_string()
        } else {
            "Timeline".to_string()
        };
        let paragraph = Paragraph::new(lines).block(self.panel_block(Panel::Config, title));
        frame.render_widget(paragraph, area);

        if self.editing_config {
            if let Some(field) = form.fields().get(self.config_field) {
                let width = form.value(*field).unwrap_or_default().chars().count();
                let cursor_x = (area.x + 1 + (LABEL_WIDTH + width) as u16)
                    .min(area.x + area.width.saturating_sub(2));
                frame.set_cursor(cursor_x, area.y + 1 + self.config_field as u16);
            }
        }
    }

    fn render_events(&mut self, frame: &mut Frame, area: Rect) {
        let mirror = self.console.mirror();
        let block = self.panel_block(
            Panel::Events,
            format!("Events ({})", mirror.event_count()),
        );
        let rows = render::event_rows(mirror.events());
        if rows.is_empty() {
            self.event_cursor = 0;
            let paragraph = Paragraph::new(render::EMPTY_EVENTS)
                .style(Style::default().fg(self.theme.muted))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        self.event_cursor = self.event_cursor.min(rows.len() - 1);

        let items: Vec<ListItem> = rows
            .into_iter()
            .map(|row| {
                let mut first = vec![
                    Span::styled(
                        row.headline,
                        Style::default()
                            .fg(self.theme.primary_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", row.date),
                        Style::default().fg(self.theme.accent),
                    ),
                ];
                if let Some(group) = row.group {
                    first.push(Span::styled(
                        format!(" · {group}"),
                        Style::default().fg(self.theme.muted),
                    ));
                }
                let mut lines = vec![Line::from(first)];
                if let Some(text) = row.excerpt {
                    lines.push(Line::from(Span::styled(
                        format!("  {text}"),
                        Style::default().fg(self.theme.muted),
                    )));
                }
                ListItem::new(lines)
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.event_cursor));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_eras(&mut self, frame: &mut Frame, area: Rect) {
        let mirror = self.console.mirror();
        let block = self.panel_block(Panel::Eras, format!("Eras ({})", mirror.eras().len()));
        let rows = render::era_rows(mirror.eras());
        if rows.is_empty() {
            self.era_cursor = 0;
            let paragraph = Paragraph::new(render::EMPTY_ERAS)
                .style(Style::default().fg(self.theme.muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
        self.era_cursor = self.era_cursor.min(rows.len() - 1);

        let items: Vec<ListItem> = rows
            .into_iter()
            .map(|row| {
                ListItem::new(Line::from(vec![
                    Span::styled(row.headline, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("  {}", row.span),
                        Style::default().fg(self.theme.muted),
                    ),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.era_cursor));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let json = self
            .console
            .mirror()
            .preview_json()
            .unwrap_or_else(|err| format!("unable to render document: {err}"));
        let paragraph = Paragraph::new(json)
            .block(self.panel_block(Panel::Preview, "JSON preview".to_string()))
            .scroll((self.preview_scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect) {
        let log = self.console.log();
        let lines: Vec<Line> = if log.is_empty() {
            vec![Line::from(Span::styled(
                "Log cleared",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            log.entries()
                .map(|entry| {
                    Line::from(vec![
                        Span::styled(
                            format!("[{}] ", entry.timestamp_label()),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(
                            entry.message.clone(),
                            Style::default().fg(self.theme.level(entry.level)),
                        ),
                    ])
                })
                .collect()
        };
        let paragraph = Paragraph::new(lines)
            .block(self.panel_block(Panel::Log, "Log".to_string()))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(HELP).style(Style::default().fg(self.theme.muted));
        frame.render_widget(paragraph, area);
    }

    fn render_banners(&self, frame: &mut Frame, area: Rect) {
        let width = 48_u16.min(area.width);
        let x = area.x + area.width.saturating_sub(width + 1);
        let now = Instant::now();
        for (idx, banner) in self.console.notifications().active(now).enumerate() {
            let y = area.y + 1 + idx as u16 * 3;
            if y + 3 > area.y + area.height {
                break;
            }
            let popup = Rect::new(x, y, width, 3);
            let color = self.theme.level(banner.level);
            frame.render_widget(Clear, popup);
            let paragraph = Paragraph::new(banner.message.clone())
                .style(Style::default().fg(color))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                );
            frame.render_widget(paragraph, popup);
        }
    }

    fn render_form(&self, frame: &mut Frame, modal: FormModal) {
        let fields = self.form_fields(modal.kind);
        let height = fields.len() as u16 + 4;
        let area = centered_rect(72, height, frame.size());
        frame.render_widget(Clear, area);

        let edit_id = match modal.kind {
            FormKind::Event => self.console.event_form().edit_id,
            FormKind::Era => self.console.era_form().edit_id,
        };
        let noun = match modal.kind {
            FormKind::Event => "event",
            FormKind::Era => "era",
        };
        let title = match edit_id {
            Some(id) => format!("Edit {noun} #{id}"),
            None => format!("New {noun}"),
        };

        let mut lines: Vec<Line> = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let selected = idx == modal.field;
                let marker = if selected {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                let value_style = if selected {
                    Style::default().bg(self.theme.selection_bg)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    marker,
                    Span::styled(
                        format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                        Style::default().fg(self.theme.muted),
                    ),
                    Span::styled(self.form_value(modal.kind, *field).to_string(), value_style),
                ])
            })
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" save  "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" next field  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]));

        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);

        if let Some(field) = fields.get(modal.field) {
            let width = self.form_value(modal.kind, *field).chars().count();
            let cursor_x = (area.x + 3 + (LABEL_WIDTH + width) as u16)
                .min(area.x + area.width.saturating_sub(2));
            frame.set_cursor(cursor_x, area.y + 1 + modal.field as u16);
        }
    }

    fn render_dialog(&self, frame: &mut Frame, dialog: &Dialog) {
        let area = centered_rect(56, 6, frame.size());
        frame.render_widget(Clear, area);

        let (title, message, hint, color) = match dialog {
            Dialog::Confirm { prompt, .. } => {
                ("Confirm", prompt.as_str(), "y confirm  n cancel", self.theme.warning)
            }
            Dialog::Alert { message, .. } => {
                ("Check input", message.as_str(), "Enter dismiss", self.theme.danger)
            }
        };
        let paragraph = Paragraph::new(vec![
            Line::from(message.to_string()),
            Line::from(""),
            Line::from(Span::styled(hint, Style::default().fg(self.theme.muted))),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn is_text_input(modifiers: KeyModifiers) -> bool {
    modifiers.is_empty() || modifiers == KeyModifiers::SHIFT
}

fn step_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = current as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
