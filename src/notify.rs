//! User notifications.

use std::io::Write;

/// Shows a message to the user.
///
/// Synchronous: the caller continues only after the message has been
/// delivered, the way a modal dialog blocks until dismissed.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Prints each alert on its own line to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
            tracing::error!("Failed to show alert '{}': {}", message, e);
        }
    }
}
