//! Application core: event loop, action dispatch, background tasks.
//!
//! Service calls run as spawned tasks that report back through the action
//! channel, so results are applied in arrival order. The restriction
//! countdown is its own task, replaced whenever a new window is seeded
//! and cancelled on exit.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use couponly_core::{ClaimView, ClipboardSink, CouponService};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::CouponScreen;
use crate::theme;
use crate::tui::Tui;

/// Countdown granularity.
const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

pub struct App {
    service: CouponService,
    /// Profile whose session file is refreshed after each call. `None`
    /// disables persistence.
    session_profile: Option<String>,
    screen: CouponScreen,
    running: bool,
    help_visible: bool,
    countdown_cancel: CancellationToken,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(
        service: CouponService,
        session_profile: Option<String>,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let view = ClaimView::new(service.config().announce_expiry);

        Self {
            service,
            session_profile,
            screen: CouponScreen::new(view, clipboard),
            running: true,
            help_visible: false,
            countdown_cancel: CancellationToken::new(),
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let mut events = EventReader::new(
            Duration::from_millis(100), // copied-flash expiry + throbber
            Duration::from_millis(33),  // ~30 FPS render
        );

        // Status check on mount.
        self.action_tx.send(Action::CheckStatus)?;
        info!(url = %self.service.config().url, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Mouse(mouse) => self.handle_mouse_event(mouse)?,
                Event::Tick => Some(Action::Tick),
                Event::Resize | Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.countdown_cancel.cancel();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Global keys first, then the screen's own bindings.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => Ok(Some(Action::ToggleHelp)),
            _ => self.screen.handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        self.screen.handle_mouse_event(mouse)
    }

    // ── Actions ──────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::CheckStatus => self.spawn_status_check(),
            Action::SubmitClaim => self.spawn_claim(),
            Action::StartCountdown => self.start_countdown(),
            Action::StopCountdown => {
                debug!("countdown stopped");
                self.countdown_cancel.cancel();
            }
            Action::Render => {}
            other => {
                if let Some(follow_up) = self.screen.update(other)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }
        Ok(())
    }

    fn spawn_status_check(&self) {
        let service = self.service.clone();
        let profile = self.session_profile.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = service.check_status().await;
            persist_session(&service, profile.as_deref());
            let _ = tx.send(Action::StatusLoaded(result));
        });
    }

    fn spawn_claim(&self) {
        let service = self.service.clone();
        let profile = self.session_profile.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = service.claim().await;
            persist_session(&service, profile.as_deref());
            let _ = tx.send(Action::ClaimFinished(result));
        });
    }

    /// Replace any running countdown timer with a fresh one.
    fn start_countdown(&mut self) {
        self.countdown_cancel.cancel();
        self.countdown_cancel = CancellationToken::new();

        let cancel = self.countdown_cancel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(COUNTDOWN_STEP);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if tx.send(Action::CountdownTick).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        debug!("countdown started");
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, hints] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.screen.render(frame, content);
        Self::render_key_hints(frame, hints);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_key_hints(frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in [
            ("Enter", "claim"),
            ("y", "copy"),
            ("r", "refresh"),
            ("?", "help"),
            ("q", "quit"),
        ] {
            spans.push(Span::styled(key, theme::key_hint_key()));
            spans.push(Span::styled(format!(" {label}  "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width.saturating_sub(4));
        let height = 12u16.min(area.height.saturating_sub(2));
        let help_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let row = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::subtitle_style()),
            ])
        };
        let lines = vec![
            Line::from(""),
            row("Enter / c", "Claim a coupon"),
            row("y / click", "Copy the code"),
            row("r", "Check status again"),
            row("?", "Toggle this help"),
            row("q / Ctrl+C", "Quit"),
            Line::from(""),
            Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.countdown_cancel.cancel();
    }
}

/// Write the service's current cookies to the profile's session file.
fn persist_session(service: &CouponService, profile: Option<&str>) {
    let (Some(profile), Some(cookies)) = (profile, service.session_cookies()) else {
        return;
    };
    if let Err(e) = couponly_config::save_session(profile, &service.config().url, &cookies) {
        warn!(profile, error = %e, "failed to save session");
    }
}
