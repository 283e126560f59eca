//! Transient user feedback: the capped log panel and floating banners.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};

/// Entries kept by [`LogPanel::default`].
pub const DEFAULT_LOG_CAPACITY: usize = 20;
/// Banner lifetime used by [`Notifications::default`].
pub const DEFAULT_BANNER_TTL: Duration = Duration::from_millis(3000);

/// Severity of a log line or banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Neutral progress message.
    Info,
    /// Completed action.
    Success,
    /// Destructive or degraded outcome.
    Warning,
    /// Failed action.
    Error,
}

/// A single line in the log panel.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Local wall-clock time the entry was recorded.
    pub at: DateTime<Local>,
    /// Severity.
    pub level: LogLevel,
    /// Text shown to the user.
    pub message: String,
}

impl LogEntry {
    /// `HH:MM:SS` label rendered in front of the message.
    pub fn timestamp_label(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Newest-first log with a fixed capacity; the oldest entry is dropped on overflow.
#[derive(Debug, Clone)]
pub struct LogPanel {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl LogPanel {
    /// Panel holding at most `capacity` entries (minimum one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a message.
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        self.entries.push_front(LogEntry {
            at: Local::now(),
            level,
            message: message.into(),
        });
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    /// Entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries held.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries kept before the oldest is dropped.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A floating message that disappears on its own.
#[derive(Debug, Clone)]
pub struct Banner {
    /// Severity, used for styling.
    pub level: LogLevel,
    /// Text shown.
    pub message: String,
    /// When the banner is pruned.
    pub expires_at: Instant,
}

/// Auto-dismissing banners.
#[derive(Debug, Clone)]
pub struct Notifications {
    ttl: Duration,
    banners: Vec<Banner>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_TTL)
    }
}

impl Notifications {
    /// No banners; each new one lives for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            banners: Vec::new(),
        }
    }

    /// Show a banner until `now + ttl`.
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>, now: Instant) {
        self.banners.push(Banner {
            level,
            message: message.into(),
            expires_at: now + self.ttl,
        });
    }

    /// Drop expired banners.
    pub fn prune(&mut self, now: Instant) {
        self.banners.retain(|banner| banner.expires_at > now);
    }

    /// Banners still visible at `now`, oldest first.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Banner> {
        self.banners
            .iter()
            .filter(move |banner| banner.expires_at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_never_exceeds_capacity() {
        let mut panel = LogPanel::default();
        for idx in 0..57 {
            panel.push(LogLevel::Info, format!("entry {idx}"));
            assert!(panel.len() <= DEFAULT_LOG_CAPACITY);
        }
        assert_eq!(panel.len(), DEFAULT_LOG_CAPACITY);
        assert_eq!(panel.latest().map(|e| e.message.as_str()), Some("entry 56"));
        assert_eq!(
            panel.entries().last().map(|e| e.message.as_str()),
            Some("entry 37")
        );
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut panel = LogPanel::with_capacity(0);
        panel.push(LogLevel::Error, "first");
        panel.push(LogLevel::Error, "second");
        assert_eq!(panel.len(), 1);
        assert_eq!(panel.capacity(), 1);
    }

    #[test]
    fn clear_empties_panel() {
        let mut panel = LogPanel::default();
        panel.push(LogLevel::Success, "saved");
        panel.clear();
        assert!(panel.is_empty());
    }

    #[test]
    fn banners_expire_after_ttl() {
        let start = Instant::now();
        let mut notifications = Notifications::new(Duration::from_millis(3000));
        notifications.push(LogLevel::Success, "exported", start);
        notifications.push(
            LogLevel::Error,
            "copy failed",
            start + Duration::from_millis(2000),
        );

        assert_eq!(
            notifications.active(start + Duration::from_millis(2999)).count(),
            2
        );
        let later = start + Duration::from_millis(3000);
        assert_eq!(notifications.active(later).count(), 1);

        notifications.prune(later);
        let remaining: Vec<_> = notifications.active(later).collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "copy failed");

        notifications.prune(start + Duration::from_millis(5000));
        assert_eq!(
            notifications.active(start + Duration::from_millis(5000)).count(),
            0
        );
    }
}
