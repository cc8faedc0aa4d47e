//! Restriction countdown.
//!
//! Holds the seconds left in the server-imposed window and steps it down
//! once per second. The server stays authoritative: any new value simply
//! replaces the local one, with no drift correction.

/// Outcome of one countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No window active; nothing happened.
    Idle,
    /// Still counting; seconds remaining.
    Running(u64),
    /// The window just reached zero and was cleared.
    Expired,
}

/// Seconds remaining in the restriction window. Never negative; a zero
/// window is the same as no window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: Option<u64>,
}

impl Countdown {
    /// Replace the window. Zero or `None` clears it.
    pub fn seed(&mut self, seconds: Option<u64>) {
        self.remaining = seconds.filter(|&s| s > 0);
    }

    pub fn remaining(&self) -> Option<u64> {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Advance one second.
    pub fn tick(&mut self) -> Tick {
        match self.remaining {
            None => Tick::Idle,
            Some(s) if s > 1 => {
                self.remaining = Some(s - 1);
                Tick::Running(s - 1)
            }
            Some(_) => {
                self.remaining = None;
                Tick::Expired
            }
        }
    }

    /// `HH:MM:SS` for an active window, empty otherwise.
    pub fn display(&self) -> String {
        self.remaining.map(format_hms).unwrap_or_default()
    }
}

/// Format seconds as zero-padded `HH:MM:SS`. Hours are not wrapped.
pub fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
