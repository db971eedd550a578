//! Transient user-facing messages.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// A message shown to the user for `ttl`, then dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub ttl: Duration,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            kind,
            ttl,
        }
    }

    pub fn success(text: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NoticeKind::Success, text, ttl)
    }

    pub fn info(text: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NoticeKind::Info, text, ttl)
    }

    pub fn error(text: impl Into<String>, ttl: Duration) -> Self {
        Self::new(NoticeKind::Error, text, ttl)
    }
}

/// Holds the latest notice until its TTL elapses.
///
/// A newer notice replaces the current one and restarts the clock.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Mutex<Option<(Notice, Instant)>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, notice: Notice) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = Some((notice, Instant::now()));
    }

    /// The notice still on display, if any. Expired notices are dropped.
    pub fn current(&self) -> Option<Notice> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        let expired = matches!(&*current, Some((notice, posted)) if posted.elapsed() >= notice.ttl);
        if expired {
            *current = None;
        }
        current.as_ref().map(|(notice, _)| notice.clone())
    }

    pub fn dismiss(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_notice_expires_after_ttl() {
        let board = NoticeBoard::new();
        board.post(Notice::info("Processing payment...", Duration::from_secs(5)));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(board.current().map(|n| n.kind), Some(NoticeKind::Info));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(board.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_notice_replaces_and_restarts() {
        let board = NoticeBoard::new();
        board.post(Notice::info("first", Duration::from_secs(5)));
        tokio::time::advance(Duration::from_secs(4)).await;
        board.post(Notice::error("second", Duration::from_secs(5)));
        tokio::time::advance(Duration::from_secs(4)).await;

        let notice = board.current().unwrap();
        assert_eq!(notice.text, "second");
        assert_eq!(notice.kind, NoticeKind::Error);

        board.dismiss();
        assert!(board.current().is_none());
    }
}
