//! Sink for load failures
//!
//! Stores never return request errors to their callers. Failures go to an
//! [`ErrorReporter`] and the store keeps serving its last good data.

use crate::error::Error;

pub trait ErrorReporter: Send + Sync {
    /// `context` names the operation that failed (e.g. `load identity.project`)
    fn report(&self, context: &str, error: &Error);
}

/// Reports through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, error: &Error) {
        log::error!("{}: {}", context, error);
    }
}

#[cfg(test)]
pub use recording::RecordingReporter;

#[cfg(test)]
mod recording {
    use std::sync::Mutex;

    use super::ErrorReporter;
    use crate::error::Error;

    /// Keeps every report for assertions
    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        reports: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        pub fn reports(&self) -> Vec<String> {
            self.reports.lock().unwrap().clone()
        }
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, context: &str, error: &Error) {
            self.reports
                .lock()
                .unwrap()
                .push(format!("{}: {}", context, error));
        }
    }
}
