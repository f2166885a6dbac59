//! User-facing notifications
//!
//! The core reports things like save results through a [`NotificationSink`]
//! and never renders them itself. [`ToastQueue`] is an in-memory sink with
//! expiring messages for a UI to poll; [`LogSink`] just logs.

use log::{error, info, warn};
use std::collections::VecDeque;

// ─────────────────────────────────────────────────────────────────────────────
// Notification
// ─────────────────────────────────────────────────────────────────────────────

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Receiver of user-facing notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

// ─────────────────────────────────────────────────────────────────────────────
// Log Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Sink that writes notifications to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info | NotificationLevel::Success => {
                info!("{}", notification.message)
            }
            NotificationLevel::Warning => warn!("{}", notification.message),
            NotificationLevel::Error => error!("{}", notification.message),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Toast Queue
// ─────────────────────────────────────────────────────────────────────────────

/// Seconds a toast stays visible unless told otherwise.
pub const DEFAULT_TOAST_DURATION: f64 = 3.0;

/// A notification with an expiry time.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub notification: Notification,
    /// When the toast should disappear (seconds, same clock as `update`)
    pub expires_at: f64,
}

/// Non-blocking toast messages, oldest first.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    /// Last time seen by `update`
    now: f64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast for `duration` seconds from the current time.
    pub fn show(&mut self, notification: Notification, duration: f64) {
        self.toasts.push_back(Toast {
            notification,
            expires_at: self.now + duration,
        });
    }

    /// Advance the clock and drop expired toasts.
    ///
    /// `current_time` should be monotonic, in seconds.
    pub fn update(&mut self, current_time: f64) {
        self.now = current_time;
        self.toasts.retain(|t| t.expires_at > current_time);
    }

    /// The toast to display now, if any.
    pub fn current(&self) -> Option<&Toast> {
        self.toasts.front()
    }

    /// All live toasts.
    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&mut self, notification: Notification) {
        self.show(notification, DEFAULT_TOAST_DURATION);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
