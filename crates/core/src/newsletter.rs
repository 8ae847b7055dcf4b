//! Newsletter sign-up.

use crate::{QuillError, QuillResult};
use std::collections::BTreeSet;
use std::sync::RwLock;
use std::time::Duration;

/// Result of a successful subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscribed {
    /// The address was already on the list.
    pub already_subscribed: bool,
}

#[derive(Debug)]
pub struct NewsletterService {
    subscribers: RwLock<BTreeSet<String>>,
    submit_delay: Duration,
}

impl NewsletterService {
    pub fn new(submit_delay: Duration) -> Self {
        Self {
            subscribers: RwLock::new(BTreeSet::new()),
            submit_delay,
        }
    }

    /// Subscribe `email`.
    ///
    /// The check is intentionally the light one the sign-up box always used: non-blank and
    /// containing `@`. Addresses are stored lower-cased, so repeats are idempotent.
    pub async fn subscribe(&self, email: &str) -> QuillResult<Subscribed> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(QuillError::InvalidEmail);
        }

        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }

        let inserted = self
            .subscribers
            .write()
            .map_err(|_| QuillError::LockPoisoned)?
            .insert(email.to_lowercase());
        tracing::info!(new = inserted, "newsletter subscription");

        Ok(Subscribed {
            already_subscribed: !inserted,
        })
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> QuillResult<usize> {
        Ok(self
            .subscribers
            .read()
            .map_err(|_| QuillError::LockPoisoned)?
            .len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_blank_and_at_less_addresses() {
        let service = NewsletterService::new(Duration::ZERO);
        for bad in ["", "   ", "reader.example.com"] {
            let err = service.subscribe(bad).await.expect_err("invalid email");
            assert!(matches!(err, QuillError::InvalidEmail));
        }
        assert_eq!(service.subscriber_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn repeat_subscriptions_are_idempotent() {
        let service = NewsletterService::new(Duration::ZERO);
        let first = service.subscribe("Reader@Example.com").await.unwrap();
        assert!(!first.already_subscribed);
        let second = service.subscribe(" reader@example.com ").await.unwrap();
        assert!(second.already_subscribed);
        assert_eq!(service.subscriber_count().unwrap(), 1);
    }
}
