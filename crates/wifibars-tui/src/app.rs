//! Application core: event loop, observer ownership, action dispatch.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use wifibars_core::{WifiLevel, WifiLevelObserver};

use crate::action::Action;
use crate::component::Component;
use crate::event::{TermEvent, TermEvents};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::signal_indicator::SignalIndicator;

/// Observer that reports levels back onto the action channel for the status line.
struct StatusLineObserver {
    action_tx: mpsc::UnboundedSender<Action>,
}

impl WifiLevelObserver for StatusLineObserver {
    fn on_level_changed(&self, level: WifiLevel) {
        if self.action_tx.send(Action::LevelObserved(level)).is_err() {
            debug!(%level, "action channel closed; observed level dropped");
        }
    }
}

/// Top-level application state and event loop.
pub struct App {
    indicator: SignalIndicator,
    /// Strong handle to the observer; the indicator only holds a weak one.
    observer: Option<Arc<StatusLineObserver>>,
    last_observed: Option<WifiLevel>,
    notifications: u64,
    running: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(indicator: SignalIndicator) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            indicator,
            observer: None,
            last_observed: None,
            notifications: 0,
            running: true,
            action_tx,
            action_rx,
        }
    }

    /// Hand the indicator its action sender, show it, and register the observer.
    fn mount(&mut self) -> Result<()> {
        self.indicator.init(self.action_tx.clone())?;
        let observer = self.observer_handle();
        info!("registering observer");
        self.indicator.attach_observed(&observer);
        debug!(component = self.indicator.id(), "mounted");
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        self.mount()?;

        let mut events = TermEvents::spawn(Duration::from_millis(33));
        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                TermEvent::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                TermEvent::Resize(cols, rows) => {
                    debug!(cols, rows, "terminal resized");
                    self.action_tx.send(Action::Render)?;
                }
                TermEvent::Frame => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            while let Ok(action) = self.action_rx.try_recv() {
                if action == Action::Render {
                    tui.draw(|frame| self.render(frame))?;
                } else {
                    self.process_action(&action)?;
                }
            }
        }

        self.indicator.detach();
        info!("event loop ended");
        Ok(())
    }

    fn handle_key_event(&self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q') | KeyCode::Esc) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('v')) => Some(Action::ToggleIndicator),
            (KeyModifiers::NONE, KeyCode::Char('o')) => Some(Action::ToggleObserver),
            (KeyModifiers::NONE, KeyCode::Char('x')) if self.observer.is_some() => {
                Some(Action::DropObserver)
            }
            _ => None,
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render => {}
            Action::ToggleIndicator => {
                if self.indicator.is_attached() {
                    info!("hiding indicator");
                    self.indicator.detach();
                } else {
                    info!("showing indicator");
                    self.indicator.attach();
                }
            }
            Action::ToggleObserver => {
                if self.indicator.observer_registered() {
                    info!("unregistering observer");
                    self.indicator.unregister_observer();
                } else {
                    self.register_observer();
                }
            }
            Action::DropObserver => {
                info!("dropping observer handle");
                self.observer = None;
            }
            Action::LevelObserved(level) => {
                self.last_observed = Some(*level);
                self.notifications += 1;
            }
            Action::SignalDelivered(_) => {
                if let Some(follow_up) = self.indicator.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    /// The status-line observer, created anew if the app dropped it.
    fn observer_handle(&mut self) -> Arc<StatusLineObserver> {
        let action_tx = self.action_tx.clone();
        Arc::clone(
            self.observer
                .get_or_insert_with(|| Arc::new(StatusLineObserver { action_tx })),
        )
    }

    fn register_observer(&mut self) {
        let observer = self.observer_handle();
        info!("registering observer");
        self.indicator.register_observer(&observer);
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let [panel, _, status, hints] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_panel(frame, panel);
        frame.render_widget(Paragraph::new(self.status_line()), status);
        frame.render_widget(Paragraph::new(key_hints()), hints);
    }

    fn render_panel(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.indicator.is_attached() {
            theme::border_attached()
        } else {
            theme::border_detached()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(" wifi ", theme::title_style()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.indicator.is_attached() {
            self.indicator.render(frame, inner);
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled("hidden", theme::key_hint()))
                    .alignment(ratatui::layout::Alignment::Center),
                inner,
            );
        }
    }

    fn status_line(&self) -> Line<'_> {
        let level = self
            .last_observed
            .map_or_else(|| "n/a".to_string(), |level| level.to_string());
        let observer = match (
            self.indicator.observer_registered(),
            self.indicator.observer_alive(),
        ) {
            (false, _) => "none",
            (true, true) => "registered",
            (true, false) => "dropped",
        };
        let subscription = if self.indicator.has_subscription() {
            "live"
        } else {
            "none"
        };

        Line::styled(
            format!(
                " level {level} · observer {observer} · subscription {subscription} · {} notifications",
                self.notifications
            ),
            theme::status_bar(),
        )
    }
}

fn key_hints() -> Line<'static> {
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(key, theme::key_hint_key()),
            Span::styled(label, theme::key_hint()),
        ]
    };
    Line::from(
        [
            hint(" q", " quit  "),
            hint("v", " show/hide  "),
            hint("o", " observer on/off  "),
            hint("x", " drop observer"),
        ]
        .concat(),
    )
}
