//! Best-effort notification fan-out.
//!
//! Request creation must succeed even when individual approver
//! notifications fail, so delivery sits behind a trait and failures are
//! logged rather than propagated.

use tracing::warn;

/// Delivers a short message to a user. Implementations are supplied by the
/// notification collaborator; the engine ships a tracing-only default.
pub trait Notifier: Send + Sync {
    /// Attempts delivery to a single recipient.
    fn notify(&self, user_id: &str, message: &str) -> Result<(), String>;
}

/// Fans a message out to every recipient, logging failures and continuing.
pub fn fan_out(notifier: &dyn Notifier, recipients: &[String], message: &str) {
    for recipient in recipients {
        if let Err(error) = notifier.notify(recipient, message) {
            warn!(recipient = %recipient, error = %error, "Notification delivery failed");
        }
    }
}

/// Notifier that only records deliveries in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, user_id: &str, message: &str) -> Result<(), String> {
        tracing::info!(user_id = %user_id, message = %message, "Notification queued");
        Ok(())
    }
}
