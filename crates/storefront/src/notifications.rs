//! User-facing notifications and the session flash queue.
//!
//! Wishlist and auth outcomes surface to the shopper as notifications. On a
//! full page load they render in the base layout; on an HTMX toggle response
//! they ride along as an out-of-band fragment. Between the POST that produced
//! them and the render, they sit in a session-backed flash queue.

use serde::{Deserialize, Serialize};

/// Notification severity, mapped to styling in the templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// A one-shot user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    /// Create a success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    /// Create an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    /// Whether this is an error notification (used by templates).
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.kind, NotificationKind::Error)
    }
}

/// Session-backed flash queue.
///
/// Notifications pushed here drain exactly once, in push order, on the next
/// [`take`].
pub mod flash {
    use tower_sessions::Session;

    use super::Notification;
    use crate::models::session_keys;

    /// Append a notification to the flash queue.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn push(
        session: &Session,
        notification: Notification,
    ) -> Result<(), tower_sessions::session::Error> {
        let mut queue: Vec<Notification> = session
            .get(session_keys::FLASH)
            .await?
            .unwrap_or_default();
        queue.push(notification);
        session.insert(session_keys::FLASH, queue).await
    }

    /// Drain the flash queue, returning notifications in push order.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be read or modified.
    pub async fn take(
        session: &Session,
    ) -> Result<Vec<Notification>, tower_sessions::session::Error> {
        Ok(session
            .remove::<Vec<Notification>>(session_keys::FLASH)
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use super::*;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_is_error() {
        assert!(Notification::error("nope").is_error());
        assert!(!Notification::success("yep").is_error());
    }

    #[tokio::test]
    async fn test_flash_drains_once_in_order() {
        let session = test_session();

        flash::push(&session, Notification::error("first"))
            .await
            .unwrap();
        flash::push(&session, Notification::success("second"))
            .await
            .unwrap();

        let drained = flash::take(&session).await.unwrap();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].message, "second");

        // Second take is empty - the queue drains exactly once.
        assert!(flash::take(&session).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_take_on_empty_session() {
        let session = test_session();
        assert!(flash::take(&session).await.unwrap().is_empty());
    }
}
