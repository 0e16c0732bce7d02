//! Transient toast notifications.

use serde::Serialize;
use std::time::{Duration, Instant};

/// How long a notification stays before it starts leaving.
pub const DISPLAY_FOR: Duration = Duration::from_secs(5);
/// Length of the exit transition.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "#10b981",
            Severity::Error => "#ef4444",
            Severity::Info => "#06b6d4",
        }
    }

    /// Icon name, rendered as `fa-{icon}-circle`.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "check",
            Severity::Error => "times",
            Severity::Info => "info",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Visible,
    Leaving,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn phase(&self, now: Instant) -> Phase {
        if now.saturating_duration_since(self.shown_at) >= DISPLAY_FOR {
            Phase::Leaving
        } else {
            Phase::Visible
        }
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= DISPLAY_FOR + EXIT_TRANSITION
    }
}

/// Stack of live notifications, oldest first.
#[derive(Debug, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> u64 {
        self.push_at(severity, message, Instant::now())
    }

    pub fn push_at(&mut self, severity: Severity, message: impl Into<String>, now: Instant) -> u64 {
        self.next_id += 1;
        let message = message.into();
        match severity {
            Severity::Error => log::warn!("notify: {}", message),
            _ => log::info!("notify: {}", message),
        }
        self.items.push(Notification {
            id: self.next_id,
            severity,
            message,
            shown_at: now,
        });
        self.next_id
    }

    /// Close one early. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop everything whose exit transition has finished.
    pub fn sweep(&mut self, now: Instant) {
        self.items.retain(|n| !n.expired(now));
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifications_stack_and_expire_after_transition() {
        let t0 = Instant::now();
        let mut n = Notifications::new();
        let a = n.push_at(Severity::Success, "saved", t0);
        let b = n.push_at(Severity::Error, "failed", t0 + Duration::from_secs(2));
        assert_eq!(n.len(), 2);

        let at_5s = t0 + DISPLAY_FOR;
        assert_eq!(n.items()[0].phase(at_5s), Phase::Leaving);
        assert_eq!(n.items()[1].phase(at_5s), Phase::Visible);

        n.sweep(at_5s + EXIT_TRANSITION);
        assert_eq!(n.len(), 1);
        assert_eq!(n.items()[0].id, b);
        assert!(!n.dismiss(a));
        assert!(n.dismiss(b));
        assert!(n.is_empty());
    }
}
