use crate::error::Result;
use async_trait::async_trait;

/// Chat channel that accepts one text message at a time
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}

/// Wrap a fixed-width table in a Markdown code block
pub fn fence(table: &str) -> String {
    format!("```\n{}```", table)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub delivered: usize,
    pub failed: usize,
}

/// Send each message on its own; a failed send does not stop the rest
pub async fn dispatch(notifier: &dyn Notifier, messages: &[String]) -> DispatchOutcome {
    let mut outcome = DispatchOutcome::default();

    for (i, message) in messages.iter().enumerate() {
        match notifier.notify(message).await {
            Ok(()) => outcome.delivered += 1,
            Err(e) => {
                tracing::warn!("Failed to send message {} of {}: {}", i + 1, messages.len(), e);
                outcome.failed += 1;
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WindWatchError;
    use std::sync::Mutex;

    /// Records messages and fails the ones listed in `fail_on`
    struct Recorder {
        sent: Mutex<Vec<String>>,
        fail_on: Vec<usize>,
    }

    impl Recorder {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn notify(&self, text: &str) -> Result<()> {
            let mut sent = self.sent.lock().unwrap();
            let index = sent.len();
            sent.push(text.to_string());
            if self.fail_on.contains(&index) {
                Err(WindWatchError::DataSourceUnavailable("Telegram: 500".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn fence_wraps_table() {
        assert_eq!(fence("a | b\n"), "```\na | b\n```");
    }

    #[tokio::test]
    async fn failures_are_independent() {
        let notifier = Recorder::new(vec![0]);
        let messages = vec!["first".to_string(), "second".to_string()];

        let outcome = dispatch(&notifier, &messages).await;

        assert_eq!(outcome, DispatchOutcome { delivered: 1, failed: 1 });
        assert_eq!(*notifier.sent.lock().unwrap(), messages);
    }

    #[tokio::test]
    async fn empty_batch() {
        let notifier = Recorder::new(vec![]);
        let outcome = dispatch(&notifier, &[]).await;
        assert_eq!(outcome, DispatchOutcome::default());
    }
}
