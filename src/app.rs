// Application state: routes terminal events into the review pipeline

use crate::animation::CardAnimator;
use crate::config::{SwipeConfig, UserConfig};
use crate::domain::{Action, DecisionStatistics, Direction, QueueSnapshot, UndoEntry};
use crate::effects::FsExecutor;
use crate::error::Result;
use crate::gesture::PointerEvent;
use crate::session::Session;
use crate::tui::helpers::{cell_to_units, viewport_units};
use crate::tui::input::{handle_settings_input, Intent, KeyTarget, KeyboardRouter, Routed, SettingsKey};
use crate::tui::{Screen, ViewState};
use chrono::{DateTime, Utc};
use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use tracing::{info, warn};

/// How long a toast stays in the footer
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Longest the event loop waits for input before redrawing
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Playback controls shown on the card; the player itself is external
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub playing: bool,
    pub speed: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playing: false,
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

/// One editable text field per swipe direction, in [`Direction::ALL`] order
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsForm {
    pub fields: [String; 4],
    pub focus: usize,
    pub error: Option<String>,
}

impl SettingsForm {
    pub fn from_swipe(swipe: &SwipeConfig) -> Self {
        Self {
            fields: Direction::ALL.map(|d| swipe.action_for(d).to_field()),
            focus: 0,
            error: None,
        }
    }

    pub fn focused_direction(&self) -> Direction {
        Direction::ALL[self.focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn insert(&mut self, c: char) {
        self.fields[self.focus].push(c);
        self.error = None;
    }

    pub fn backspace(&mut self) {
        self.fields[self.focus].pop();
        self.error = None;
    }

    /// Parses every field, or names the first one that is empty
    pub fn to_swipe(&self) -> std::result::Result<SwipeConfig, String> {
        let mut swipe = SwipeConfig::default();
        for (direction, field) in Direction::ALL.into_iter().zip(&self.fields) {
            let action = Action::parse(field)
                .ok_or_else(|| format!("{} needs an action or a folder name", direction.label()))?;
            swipe.set(direction, action);
        }
        Ok(swipe)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub stats: DecisionStatistics,
    pub elapsed_secs: i64,
    pub dry_run: bool,
}

/// Start-up options that do not belong to the session itself
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub force_welcome: bool,
    /// Where settings are persisted; `None` keeps them in memory
    pub config_path: Option<PathBuf>,
    /// Terminal size in cells
    pub terminal_size: (u16, u16),
}

pub struct App {
    runtime: Runtime,
    session: Session<FsExecutor>,
    card: CardAnimator,
    router: KeyboardRouter,
    view_state: ViewState,
    playback: PlaybackState,
    toast: Option<Toast>,
    settings: Option<SettingsForm>,
    user_config: UserConfig,
    config_path: Option<PathBuf>,
    queue_updates: watch::Receiver<QueueSnapshot>,
    snapshot: QueueSnapshot,
    last_pointer: Option<PointerEvent>,
    started_at: DateTime<Utc>,
    should_quit: bool,
}

impl App {
    pub fn new(
        session: Session<FsExecutor>,
        user_config: UserConfig,
        options: AppOptions,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        let (columns, rows) = options.terminal_size;
        let (width, height) = viewport_units(columns, rows);

        let queue_updates = session.queue().subscribe();
        let snapshot = session.queue().snapshot();

        let show_welcome = options.force_welcome || !user_config.welcome_shown;
        let mut router = KeyboardRouter::new();
        router.set_enabled(!show_welcome);

        let mut app = Self {
            runtime,
            session,
            card: CardAnimator::new(width, height),
            router,
            view_state: if show_welcome {
                ViewState::Welcome
            } else {
                ViewState::Browsing
            },
            playback: PlaybackState::default(),
            toast: None,
            settings: None,
            user_config,
            config_path: options.config_path,
            queue_updates,
            snapshot,
            last_pointer: None,
            started_at: Utc::now(),
            should_quit: false,
        };
        app.sync_card_enabled();
        Ok(app)
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Resize(columns, rows) => {
                let (width, height) = viewport_units(columns, rows);
                self.card.set_viewport(width, height);
            }
            Event::FocusLost => {
                if let Some(pointer) = self.last_pointer.take() {
                    self.card.pointer_cancel(pointer, now);
                }
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match self.view_state {
            ViewState::Welcome => {
                if key.kind == KeyEventKind::Press {
                    self.dismiss_welcome(now);
                }
            }
            ViewState::Summary => {
                if key.kind == KeyEventKind::Press {
                    self.should_quit = true;
                }
            }
            ViewState::Settings => {
                // The form owns the keyboard while a field has focus
                if self.router.route(key, KeyTarget::Editable) == Routed::PassThrough {
                    self.handle_settings_key(handle_settings_input(key), now);
                }
            }
            ViewState::Help => {
                if let Routed::Handled(Intent::ToggleHelp | Intent::Quit) =
                    self.router.route(key, KeyTarget::Surface)
                {
                    self.set_view(ViewState::Browsing);
                }
            }
            ViewState::Browsing => {
                if let Routed::Handled(intent) = self.router.route(key, KeyTarget::Surface) {
                    self.apply_intent(intent, now);
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.view_state != ViewState::Browsing {
            return;
        }

        let button = match mouse.kind {
            MouseEventKind::Down(button)
            | MouseEventKind::Drag(button)
            | MouseEventKind::Up(button) => button,
            _ => return,
        };

        let (x, y) = cell_to_units(mouse.column, mouse.row);
        let pointer = PointerEvent {
            pointer_id: pointer_id(button),
            is_primary: button == MouseButton::Left,
            x,
            y,
        };

        match mouse.kind {
            MouseEventKind::Down(_) => self.card.pointer_down(pointer),
            MouseEventKind::Drag(_) => self.card.pointer_move(pointer),
            _ => self.card.pointer_up(pointer, now),
        }

        if pointer.is_primary {
            self.last_pointer = match mouse.kind {
                MouseEventKind::Up(_) => None,
                _ => Some(pointer),
            };
        }
    }

    fn apply_intent(&mut self, intent: Intent, now: Instant) {
        match intent {
            Intent::Swipe(direction) => {
                self.card.fling(direction, now);
            }
            Intent::TogglePlayPause => {
                if self.session.queue().current().is_some() {
                    self.playback.playing = !self.playback.playing;
                }
            }
            Intent::SetSpeed(speed) => {
                self.playback.speed = speed;
                self.show_toast(format!("Playback speed {}x", speed), ToastKind::Info, now);
            }
            Intent::Undo => self.undo(now),
            Intent::ToggleHelp => self.set_view(ViewState::Help),
            Intent::OpenSettings => {
                self.settings = Some(SettingsForm::from_swipe(self.session.swipe()));
                self.set_view(ViewState::Settings);
            }
            Intent::OpenExternally => self.open_current(now),
            Intent::Quit => self.request_quit(),
        }
    }

    fn undo(&mut self, now: Instant) {
        // The in-flight decision has not reached the queue yet
        if self.card.is_animating_out() {
            return;
        }

        match self.runtime.block_on(self.session.undo()) {
            Ok(Some(entry)) => {
                self.show_toast(
                    format!("Restored {}", entry.item.filename),
                    ToastKind::Info,
                    now,
                );
            }
            Ok(None) => self.show_toast("Nothing to undo", ToastKind::Info, now),
            Err(e) => self.show_toast(e.to_string(), ToastKind::Error, now),
        }
        self.refresh_snapshot();
    }

    fn open_current(&mut self, now: Instant) {
        let path = match self.session.queue().current() {
            Some(item) => item.path.clone(),
            None => return,
        };

        match open::that_detached(&path) {
            Ok(()) => info!("Opened {} in the default player", path.display()),
            Err(e) => {
                warn!("Failed to open {}: {}", path.display(), e);
                self.show_toast(format!("Could not open clip: {}", e), ToastKind::Error, now);
            }
        }
    }

    fn request_quit(&mut self) {
        if self.session.queue().processed_count() > 0 {
            self.set_view(ViewState::Summary);
        } else {
            self.should_quit = true;
        }
    }

    fn dismiss_welcome(&mut self, now: Instant) {
        self.router.set_enabled(true);
        self.set_view(ViewState::Browsing);

        if !self.user_config.welcome_shown {
            self.user_config.welcome_shown = true;
            if let Err(e) = self.persist_config() {
                self.show_toast(e.to_string(), ToastKind::Error, now);
            }
        }
    }

    fn handle_settings_key(&mut self, key: SettingsKey, now: Instant) {
        let Some(form) = self.settings.as_mut() else {
            self.set_view(ViewState::Browsing);
            return;
        };

        match key {
            SettingsKey::NextField => form.next_field(),
            SettingsKey::PreviousField => form.previous_field(),
            SettingsKey::Insert(c) => form.insert(c),
            SettingsKey::Backspace => form.backspace(),
            SettingsKey::Cancel => {
                self.settings = None;
                self.set_view(ViewState::Browsing);
            }
            SettingsKey::Save => match form.to_swipe() {
                Ok(swipe) => {
                    self.session.set_swipe(swipe.clone());
                    self.user_config.swipe = swipe;
                    self.settings = None;
                    self.set_view(ViewState::Browsing);
                    match self.persist_config() {
                        Ok(()) => self.show_toast("Settings saved", ToastKind::Info, now),
                        Err(e) => self.show_toast(e.to_string(), ToastKind::Error, now),
                    }
                }
                Err(message) => form.error = Some(message),
            },
            SettingsKey::None => {}
        }
    }

    fn persist_config(&self) -> Result<()> {
        match &self.config_path {
            Some(path) => self.user_config.save_to(path),
            None => Ok(()),
        }
    }

    /// Fires due timers, runs any committed decision and expires toasts
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.expires_at <= now) {
            self.toast = None;
        }

        let outcome = self
            .runtime
            .block_on(self.card.tick(now, &mut self.session));

        match outcome {
            Some(Ok(Some(entry))) => {
                let message = decision_message(&entry, self.session.executor().is_dry_run());
                self.show_toast(message, ToastKind::Info, now);
            }
            Some(Ok(None)) | None => {}
            Some(Err(e)) => self.show_toast(e.to_string(), ToastKind::Error, now),
        }

        self.refresh_snapshot();
    }

    fn refresh_snapshot(&mut self) {
        if self.queue_updates.has_changed().unwrap_or(false) {
            self.snapshot = *self.queue_updates.borrow_and_update();
        }
        self.sync_card_enabled();
    }

    fn set_view(&mut self, view: ViewState) {
        self.view_state = view;
        self.sync_card_enabled();
    }

    fn sync_card_enabled(&mut self) {
        let inert = self.view_state != ViewState::Browsing || self.snapshot.is_exhausted();
        if inert != self.card.is_disabled() {
            self.card.set_disabled(inert);
            if inert {
                self.last_pointer = None;
            }
        }
    }

    fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) {
        let message = message.into();
        if kind == ToastKind::Error {
            warn!("{}", message);
        }
        self.toast = Some(Toast {
            message,
            kind,
            expires_at: now + TOAST_DURATION,
        });
    }

    /// How long the event loop may block before the next timer or toast is due
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        let mut wake = now + POLL_INTERVAL;
        if let Some(deadline) = self.card.next_deadline() {
            wake = wake.min(deadline);
        }
        if let Some(toast) = &self.toast {
            wake = wake.min(toast.expires_at);
        }
        wake.saturating_duration_since(now)
    }

    pub fn screen(&self) -> Screen<'_> {
        Screen {
            view: self.view_state,
            current: self.session.queue().current(),
            snapshot: self.snapshot,
            swipe: self.session.swipe(),
            card: &self.card,
            playback: self.playback,
            toast: self.toast.as_ref(),
            settings: self.settings.as_ref(),
            summary: self.summary(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            stats: self.session.queue().statistics(),
            elapsed_secs: (Utc::now() - self.started_at).num_seconds(),
            dry_run: self.session.executor().is_dry_run(),
        }
    }

    /// Drops pending timers so nothing fires once the UI is gone
    pub fn shutdown(&mut self) {
        self.card.cancel_pending();
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn view_state(&self) -> ViewState {
        self.view_state
    }

    pub fn session(&self) -> &Session<FsExecutor> {
        &self.session
    }

    pub fn card(&self) -> &CardAnimator {
        &self.card
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn user_config(&self) -> &UserConfig {
        &self.user_config
    }
}

fn pointer_id(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
    }
}

fn decision_message(entry: &UndoEntry, dry_run: bool) -> String {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    match &entry.action {
        Action::Move { target } => format!("{}{} → {}", prefix, entry.item.filename, target),
        Action::Delete => format!("{}{} → Trash", prefix, entry.item.filename),
        Action::Skip => format!("{}Skipped {}", prefix, entry.item.filename),
    }
}
