//! Progress and info events for one gallery run.
//!
//! Every stage reports through a [`Reporter`] handed in by the caller. A run
//! has exactly one listener: the receiving end of the channel the reporter was
//! built from. Events are sent synchronously, in processing order, as each
//! image is handled.
//!
//! ```text
//! Info { level: Info,  message: "Create thumbnail 1 of 3" }
//! Progress { current: 33.3, max: 100.0 }
//! Info { level: Error, message: "Skipped broken.jpg: ..." }
//! ```

use std::sync::mpsc::Sender;
use tracing::debug;

/// Severity of an info message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Info { level: InfoLevel, message: String },
    Progress { current: f64, max: f64 },
}

/// Sending half of a run's event stream.
///
/// A reporter without a channel drops events (after mirroring them to the
/// debug log), which is what library callers that do not care get from
/// [`Reporter::silent`].
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    tx: Option<Sender<Event>>,
}

impl Reporter {
    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn silent() -> Self {
        Self { tx: None }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(Event::Info {
            level: InfoLevel::Info,
            message: message.into(),
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Event::Info {
            level: InfoLevel::Error,
            message: message.into(),
        });
    }

    /// Report `step` of `total` as a percentage out of 100.
    pub fn progress(&self, step: usize, total: usize) {
        self.send(Event::Progress {
            current: progress_percent(step, total),
            max: 100.0,
        });
    }

    fn send(&self, event: Event) {
        debug!(?event, "event");
        if let Some(tx) = &self.tx {
            if tx.send(event).is_err() {
                debug!("event listener is gone");
            }
        }
    }
}

/// `100 / total * step`, or 0 for an empty run.
pub fn progress_percent(step: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 / total as f64 * step as f64
}
