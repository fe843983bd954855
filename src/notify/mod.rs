//! Completion notification.
//!
//! When a countdown expires the driver hands a [`Completion`] to a
//! [`CompletionNotifier`]. Notifiers run once per expiry. Their failures are
//! logged and never reach the countdown engine.

mod bell;
mod error;
mod sound;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

pub use bell::BellNotifier;
pub use error::NotifyError;
pub use sound::SoundNotifier;

/// Details of an expired countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Optional countdown label.
    pub label: Option<String>,
    /// The instant the countdown reached zero.
    pub target: DateTime<Utc>,
}

impl Completion {
    pub fn new(label: Option<String>, target: DateTime<Utc>) -> Self {
        Self { label, target }
    }

    /// The message shown to the user.
    pub fn message(&self) -> String {
        match &self.label {
            Some(label) => format!("{label}: Time's up!"),
            None => "Time's up!".to_string(),
        }
    }
}

/// Something that reacts to a countdown reaching zero.
pub trait CompletionNotifier {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Delivers the notification.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery failed.
    fn notify(&self, completion: &Completion) -> Result<(), NotifyError>;

    /// Blocks until any background work started by `notify` is finished.
    fn flush(&self) {}
}

impl<T: CompletionNotifier + ?Sized> CompletionNotifier for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        (**self).notify(completion)
    }

    fn flush(&self) {
        (**self).flush()
    }
}

impl<T: CompletionNotifier + ?Sized> CompletionNotifier for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        (**self).notify(completion)
    }

    fn flush(&self) {
        (**self).flush()
    }
}

// ============================================================================
// CompositeNotifier
// ============================================================================

/// Fans a completion out to several notifiers.
///
/// A failing notifier is logged at warn level and does not stop the others.
#[derive(Default)]
pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn CompletionNotifier>>,
}

impl CompositeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notifier.
    #[must_use]
    pub fn with(mut self, notifier: impl CompletionNotifier + 'static) -> Self {
        self.push(notifier);
        self
    }

    pub fn push(&mut self, notifier: impl CompletionNotifier + 'static) {
        self.notifiers.push(Box::new(notifier));
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Runs every notifier and returns how many succeeded.
    pub fn notify_all(&self, completion: &Completion) -> usize {
        let mut delivered = 0;
        for notifier in &self.notifiers {
            match notifier.notify(completion) {
                Ok(()) => {
                    debug!(notifier = notifier.name(), "notification delivered");
                    delivered += 1;
                }
                Err(e) => {
                    warn!(notifier = notifier.name(), error = %e, "notification failed");
                }
            }
        }
        delivered
    }
}

impl CompletionNotifier for CompositeNotifier {
    fn name(&self) -> &str {
        "composite"
    }

    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        let delivered = self.notify_all(completion);
        debug!(delivered, total = self.notifiers.len(), "completion announced");
        Ok(())
    }

    fn flush(&self) {
        for notifier in &self.notifiers {
            notifier.flush();
        }
    }
}

impl std::fmt::Debug for CompositeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.notifiers.iter().map(|n| n.name()).collect();
        f.debug_struct("CompositeNotifier")
            .field("notifiers", &names)
            .finish()
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    calls: std::sync::Mutex<Vec<Completion>>,
    flush_calls: std::sync::atomic::AtomicUsize,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_calls(&self) -> Vec<Completion> {
        self.calls.lock().unwrap().clone()
    }

    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flush_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl CompletionNotifier for MockNotifier {
    fn name(&self) -> &str {
        "mock"
    }

    fn notify(&self, completion: &Completion) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(completion.clone());
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotifyError::Unavailable("mock failure".to_string()));
        }
        Ok(())
    }

    fn flush(&self) {
        self.flush_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn completion(label: Option<&str>) -> Completion {
        Completion::new(
            label.map(str::to_string),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    mod completion_tests {
        use super::*;

        #[test]
        fn test_message_without_label() {
            assert_eq!(completion(None).message(), "Time's up!");
        }

        #[test]
        fn test_message_with_label() {
            assert_eq!(completion(Some("Tea")).message(), "Tea: Time's up!");
        }
    }

    mod composite_tests {
        use super::*;

        #[test]
        fn test_empty_composite() {
            let composite = CompositeNotifier::new();
            assert!(composite.is_empty());
            assert_eq!(composite.notify_all(&completion(None)), 0);
            assert!(composite.notify(&completion(None)).is_ok());
        }

        #[test]
        fn test_failure_does_not_stop_others() {
            let failing = Arc::new(MockNotifier::new());
            failing.set_should_fail(true);
            let working = Arc::new(MockNotifier::new());

            let composite = CompositeNotifier::new()
                .with(Arc::clone(&failing))
                .with(Arc::clone(&working));
            assert_eq!(composite.len(), 2);

            assert_eq!(composite.notify_all(&completion(Some("Tea"))), 1);
            assert!(composite.notify(&completion(Some("Tea"))).is_ok());

            assert_eq!(failing.notify_count(), 2);
            assert_eq!(working.notify_count(), 2);
            assert_eq!(working.get_calls()[0].label.as_deref(), Some("Tea"));
        }

        #[test]
        fn test_all_failing_still_completes() {
            let first = Arc::new(MockNotifier::new());
            first.set_should_fail(true);
            let second = Arc::new(MockNotifier::new());
            second.set_should_fail(true);

            let composite = CompositeNotifier::new()
                .with(Arc::clone(&first))
                .with(Arc::clone(&second));

            assert_eq!(composite.notify_all(&completion(None)), 0);
            assert!(composite.notify(&completion(None)).is_ok());
            assert_eq!(first.notify_count(), 2);
            assert_eq!(second.notify_count(), 2);
        }

        #[test]
        fn test_flush_reaches_every_notifier() {
            let first = Arc::new(MockNotifier::new());
            let second = Arc::new(MockNotifier::new());
            let composite = CompositeNotifier::new()
                .with(Arc::clone(&first))
                .with(Arc::clone(&second));

            composite.flush();

            assert_eq!(first.flush_count(), 1);
            assert_eq!(second.flush_count(), 1);
        }

        #[test]
        fn test_debug_lists_names() {
            let composite = CompositeNotifier::new()
                .with(BellNotifier::new(Vec::new()))
                .with(MockNotifier::new());
            let debug = format!("{composite:?}");
            assert!(debug.contains("bell"));
            assert!(debug.contains("mock"));
        }
    }

    mod mock_tests {
        use super::*;

        #[test]
        fn test_records_calls() {
            let mock = MockNotifier::new();
            mock.notify(&completion(None)).unwrap();
            assert_eq!(mock.notify_count(), 1);
            assert_eq!(mock.get_calls()[0], completion(None));
        }

        #[test]
        fn test_failure_mode() {
            let mock = MockNotifier::new();
            mock.set_should_fail(true);
            assert!(mock.notify(&completion(None)).is_err());
            assert_eq!(mock.notify_count(), 1);
        }
    }
}
