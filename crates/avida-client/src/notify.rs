use tokio::sync::broadcast;
use tracing::{info, warn};

use avida_types::events::Notice;

use crate::error::Result;

/// Fans user-facing notices out to every subscribed view.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notice>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn toast(&self, text: impl Into<String>) {
        let text = text.into();
        info!("{}", text);
        // No subscribers is fine
        let _ = self.tx.send(Notice::Toast { text });
    }

    pub fn error(&self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        let _ = self.tx.send(Notice::Error { text });
    }
}

/// Page-level error slot shared by the flows.
///
/// Every flow operation settles its own result here: a failure is stored as a
/// human-readable string and announced, a success clears the previous error.
/// Nothing is retried.
#[derive(Clone, Default)]
pub struct Page {
    notifier: Notifier,
    error: Option<String>,
}

impl Page {
    pub fn new(notifier: Notifier) -> Self {
        Self {
            notifier,
            error: None,
        }
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.error = None,
            Err(e) => {
                let text = e.to_string();
                self.notifier.error(text.clone());
                self.error = Some(text);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[tokio::test]
    async fn settle_records_and_clears_errors() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();
        let mut page = Page::new(notifier);

        let failed: Result<()> = page.settle(Err(ClientError::validation("Message cannot be empty.")));
        assert!(failed.is_err());
        assert_eq!(page.error(), Some("Message cannot be empty."));
        assert_eq!(
            rx.recv().await.unwrap(),
            Notice::Error { text: "Message cannot be empty.".into() }
        );

        page.settle(Ok(())).unwrap();
        assert_eq!(page.error(), None);
    }

    #[test]
    fn toast_without_subscribers_is_dropped() {
        Notifier::new().toast("Request Sent Successfully");
    }
}
