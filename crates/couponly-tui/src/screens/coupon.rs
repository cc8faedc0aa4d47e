//! The coupon screen: header, status message, claimed code with copy
//! badge, restriction countdown, claim button and notes.

use std::cell::Cell;
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tracing::debug;

use couponly_core::{ClaimView, ClipboardSink, CopyOutcome, Severity, Tick};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const TITLE: &str = "Exclusive Coupon Offer";
const SUBTITLE: &str = "Get your limited-time discount code";
const CODE_LABEL: &str = "Your Discount Code:";
const COPY_HINT: &str = "Click the code or press y to copy";
const TIMER_LABEL: &str = "Time until next coupon:";
const NOTES: [&str; 2] = [
    "Our coupons are distributed fairly using a round-robin system.",
    "One coupon per user within the restricted time period.",
];

const CARD_WIDTH: u16 = 68;

pub struct CouponScreen {
    view: ClaimView,
    clipboard: Box<dyn ClipboardSink>,
    /// Last clipboard failure, shown under the code until the next copy.
    notice: Option<String>,
    throbber_state: ThrobberState,
    /// Hit areas from the last render, for mouse clicks.
    code_area: Cell<Rect>,
    button_area: Cell<Rect>,
}

impl CouponScreen {
    pub fn new(view: ClaimView, clipboard: Box<dyn ClipboardSink>) -> Self {
        Self {
            view,
            clipboard,
            notice: None,
            throbber_state: ThrobberState::default(),
            code_area: Cell::new(Rect::default()),
            button_area: Cell::new(Rect::default()),
        }
    }

    pub fn view(&self) -> &ClaimView {
        &self.view
    }

    fn copy(&mut self, now: Instant) {
        match self.view.copy_coupon(self.clipboard.as_mut(), now) {
            CopyOutcome::Copied => self.notice = None,
            CopyOutcome::Failed(reason) => self.notice = Some(format!("Copy failed: {reason}")),
            CopyOutcome::NothingToCopy => debug!("nothing to copy"),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_header(frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(TITLE, theme::title_style())),
            Line::from(Span::styled(SUBTITLE, theme::subtitle_style())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn render_message(&self, frame: &mut Frame, area: Rect) {
        let message = self.view.message();
        let style = theme::message_style(message.severity);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style);
        frame.render_widget(
            Paragraph::new(Span::styled(message.text.as_str(), style))
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_coupon(&self, frame: &mut Frame, area: Rect) {
        let Some(coupon) = self.view.coupon() else {
            self.code_area.set(Rect::default());
            return;
        };

        let [label, code_row, hint] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Span::styled(CODE_LABEL, Style::default().fg(theme::INDIGO_LIGHT)))
                .alignment(Alignment::Center),
            label,
        );

        let code_width = u16::try_from(coupon.as_str().chars().count())
            .unwrap_or(u16::MAX)
            .saturating_add(6)
            .min(code_row.width);
        let [code_area] = Layout::horizontal([Constraint::Length(code_width)])
            .flex(Flex::Center)
            .areas(code_row);
        self.code_area.set(code_area);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        if self.view.is_copied(Instant::now()) {
            block = block.title_top(
                Line::from(Span::styled(" Copied! ", theme::copied_badge())).right_aligned(),
            );
        }
        frame.render_widget(
            Paragraph::new(Span::styled(coupon.as_str(), theme::coupon_code()))
                .block(block)
                .alignment(Alignment::Center),
            code_area,
        );

        let hint_line = match self.notice {
            Some(ref notice) => {
                Span::styled(notice.as_str(), theme::message_style(Severity::Error))
            }
            None => Span::styled(COPY_HINT, theme::key_hint()),
        };
        frame.render_widget(Paragraph::new(hint_line).alignment(Alignment::Center), hint);
    }

    fn render_timer(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(TIMER_LABEL, theme::subtitle_style())),
            Line::from(Span::styled(self.view.countdown_display(), theme::timer())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
    }

    fn render_button(&self, frame: &mut Frame, area: Rect) {
        self.button_area.set(area);
        let style = if self.view.can_claim() {
            theme::button_enabled()
        } else {
            theme::button_disabled()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.view.loading() {
            let label = self.view.button_label();
            let width = u16::try_from(label.len())
                .unwrap_or(u16::MAX)
                .saturating_add(2)
                .min(inner.width);
            let [spot] = Layout::horizontal([Constraint::Length(width)])
                .flex(Flex::Center)
                .areas(inner);
            let throbber = Throbber::default()
                .label(label)
                .style(Style::default().fg(theme::DIM_WHITE))
                .throbber_style(Style::default().fg(theme::INDIGO_LIGHT));
            frame.render_stateful_widget(throbber, spot, &mut self.throbber_state.clone());
        } else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    self.view.button_label(),
                    style.add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
                inner,
            );
        }
    }

    fn render_notes(frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = NOTES
            .iter()
            .map(|n| Line::from(Span::styled(*n, theme::key_hint())))
            .collect();
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

impl Component for CouponScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Enter | KeyCode::Char('c') => Some(Action::Claim),
            KeyCode::Char('y') => Some(Action::CopyCode),
            KeyCode::Char('r') => Some(Action::CheckStatus),
            _ => None,
        })
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return Ok(None);
        };
        let at = Position::new(mouse.column, mouse.row);
        if self.code_area.get().contains(at) {
            return Ok(Some(Action::CopyCode));
        }
        if self.button_area.get().contains(at) {
            return Ok(Some(Action::Claim));
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        Ok(match action {
            Action::Claim => self.view.begin_claim().then_some(Action::SubmitClaim),
            Action::StatusLoaded(result) => self
                .view
                .apply_status(result)
                .map(|_| Action::StartCountdown),
            Action::ClaimFinished(result) => {
                self.notice = None;
                self.view
                    .apply_claim(result)
                    .map(|_| Action::StartCountdown)
            }
            Action::CountdownTick => match self.view.tick_second() {
                Tick::Running(_) => None,
                Tick::Expired | Tick::Idle => Some(Action::StopCountdown),
            },
            Action::CopyCode => {
                self.copy(Instant::now());
                None
            }
            Action::Tick => {
                self.view.expire_copied(Instant::now());
                if self.view.loading() {
                    self.throbber_state.calc_next();
                }
                None
            }
            _ => None,
        })
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = CARD_WIDTH.min(area.width);
        let [column] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);

        let card = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = card.inner(column);
        frame.render_widget(card, column);

        let coupon_height = if self.view.coupon().is_some() { 5 } else { 0 };
        let timer_height = if self.view.time_left().is_some() { 2 } else { 0 };

        let [header, _, message, coupon, timer, button, _, notes] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(coupon_height),
            Constraint::Length(timer_height),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);

        Self::render_header(frame, header);
        self.render_message(frame, message);
        self.render_coupon(frame, coupon);
        if timer_height > 0 {
            self.render_timer(frame, timer);
        }
        self.render_button(frame, button);
        Self::render_notes(frame, notes);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use couponly_core::{ClaimOutcome, CoreError, CouponCode, Restriction};

    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[derive(Clone, Default)]
    struct SharedClipboard(Arc<Mutex<Vec<String>>>);

    impl ClipboardSink for SharedClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), CoreError> {
            self.0.lock().unwrap().push(text.to_owned());
            Ok(())
        }
    }

    struct DeadClipboard;

    impl ClipboardSink for DeadClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), CoreError> {
            Err(CoreError::Clipboard {
                message: "no display".into(),
            })
        }
    }

    fn screen() -> (CouponScreen, SharedClipboard) {
        let clipboard = SharedClipboard::default();
        let screen = CouponScreen::new(ClaimView::new(true), Box::new(clipboard.clone()));
        (screen, clipboard)
    }

    fn claimed(code: &str, window: Option<u64>) -> Action {
        Action::ClaimFinished(Ok(ClaimOutcome {
            coupon: CouponCode::new(code),
            restriction_time: window,
            claimed_at: Utc::now(),
        }))
    }

    fn draw(screen: &CouponScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 30)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn keys_map_to_actions() {
        let (mut s, _) = screen();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(s.handle_key_event(enter).unwrap(), Some(Action::Claim)));
        assert!(matches!(s.handle_key_event(key('c')).unwrap(), Some(Action::Claim)));
        assert!(matches!(s.handle_key_event(key('y')).unwrap(), Some(Action::CopyCode)));
        assert!(matches!(
            s.handle_key_event(key('r')).unwrap(),
            Some(Action::CheckStatus)
        ));
        assert!(s.handle_key_event(key('x')).unwrap().is_none());
    }

    #[test]
    fn claim_is_submitted_once() {
        let (mut s, _) = screen();
        assert!(matches!(
            s.update(&Action::Claim).unwrap(),
            Some(Action::SubmitClaim)
        ));
        // Already loading: a second press does nothing.
        assert!(s.update(&Action::Claim).unwrap().is_none());
    }

    #[test]
    fn claim_with_window_starts_countdown() {
        let (mut s, _) = screen();
        s.update(&Action::Claim).unwrap();
        let follow_up = s.update(&claimed("SAVE10", Some(2))).unwrap();
        assert!(matches!(follow_up, Some(Action::StartCountdown)));
        assert_eq!(s.view().coupon().unwrap().as_str(), "SAVE10");

        assert!(s.update(&Action::CountdownTick).unwrap().is_none());
        assert!(matches!(
            s.update(&Action::CountdownTick).unwrap(),
            Some(Action::StopCountdown)
        ));
        assert_eq!(s.view().message().severity, Severity::Success);
    }

    #[test]
    fn restricted_status_starts_countdown() {
        let (mut s, _) = screen();
        let follow_up = s
            .update(&Action::StatusLoaded(Ok(Restriction {
                restricted: true,
                time_left: Some(30),
            })))
            .unwrap();
        assert!(matches!(follow_up, Some(Action::StartCountdown)));
        assert!(!s.view().can_claim());
        assert!(s.update(&Action::Claim).unwrap().is_none());
    }

    #[test]
    fn copy_goes_to_clipboard() {
        let (mut s, clipboard) = screen();
        s.update(&claimed("SAVE10", None)).unwrap();
        s.update(&Action::CopyCode).unwrap();
        assert_eq!(*clipboard.0.lock().unwrap(), vec!["SAVE10".to_owned()]);
        assert!(s.view().is_copied(Instant::now()));
    }

    #[test]
    fn copy_failure_shows_notice() {
        let mut s = CouponScreen::new(ClaimView::new(true), Box::new(DeadClipboard));
        s.update(&claimed("SAVE10", None)).unwrap();
        s.update(&Action::CopyCode).unwrap();
        assert!(draw(&s).contains("Copy failed"));
    }

    #[test]
    fn renders_welcome_state() {
        let (s, _) = screen();
        let text = draw(&s);
        assert!(text.contains("Exclusive Coupon Offer"));
        assert!(text.contains("Welcome! Claim your special discount coupon below."));
        assert!(text.contains("Claim Your Coupon"));
        assert!(!text.contains("Your Discount Code:"));
    }

    #[test]
    fn renders_code_badge_and_timer() {
        let (mut s, _) = screen();
        s.update(&claimed("SAVE10", Some(3661))).unwrap();
        s.update(&Action::CopyCode).unwrap();

        let text = draw(&s);
        assert!(text.contains("SAVE10"));
        assert!(text.contains("Copied!"));
        assert!(text.contains("01:01:01"));
        assert!(text.contains("Please Wait"));
    }

    #[test]
    fn clicking_the_code_copies_it() {
        let (mut s, _) = screen();
        s.update(&claimed("SAVE10", None)).unwrap();
        draw(&s);

        let area = s.code_area.get();
        assert!(area.width > 0);
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x + 1,
            row: area.y + 1,
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches!(
            s.handle_mouse_event(click).unwrap(),
            Some(Action::CopyCode)
        ));

        let miss = MouseEvent {
            column: 0,
            row: 0,
            ..click
        };
        assert!(s.handle_mouse_event(miss).unwrap().is_none());
    }
}
