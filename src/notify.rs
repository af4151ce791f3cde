//! Toast notifications — structured events fanned out to every UI client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
    Warning,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Severity {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "error" => Ok(Self::Error),
            "warning" => Ok(Self::Warning),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A single notification event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Toast {
    /// Event identity, lets clients dedup on reconnect.
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        }
    }
}

/// Fan-out notification presenter backed by a broadcast channel.
///
/// Every action handler uses this for both success and error paths; it is
/// the only place failures surface.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Toast>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to toast events. Each UI client calls this.
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.tx.subscribe()
    }

    /// Dispatch a toast. Fine if nobody is listening yet.
    pub fn notify(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) {
        let toast = Toast::new(title, message, severity);
        debug!(
            toast_id = %toast.id,
            severity = %toast.severity,
            title = %toast.title,
            message = %toast.message,
            "Toast dispatched"
        );
        let _ = self.tx.send(toast);
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(title, message, Severity::Info);
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(title, message, Severity::Success);
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(title, message, Severity::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_severity_is_info() {
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn severity_display_matches_serde() {
        for severity in [
            Severity::Info,
            Severity::Success,
            Severity::Error,
            Severity::Warning,
        ] {
            let display = format!("{severity}");
            let json = serde_json::to_string(&severity).unwrap();
            assert_eq!(format!("\"{display}\""), json);
            assert_eq!(display.parse::<Severity>().unwrap(), severity);
        }
    }

    #[tokio::test]
    async fn subscribers_receive_toasts() {
        let notifier = Notifier::new(16);
        let mut rx = notifier.subscribe();

        notifier.success("Success", "Bulk onboard started");

        let toast = rx.recv().await.unwrap();
        assert_eq!(toast.title, "Success");
        assert_eq!(toast.message, "Bulk onboard started");
        assert_eq!(toast.severity, Severity::Success);
    }

    #[tokio::test]
    async fn notify_without_subscribers_is_fine() {
        let notifier = Notifier::new(16);
        notifier.error("Error", "nobody listening");
        // A late subscriber only sees later toasts.
        let mut rx = notifier.subscribe();
        notifier.info("Info", "second");
        let toast = rx.recv().await.unwrap();
        assert_eq!(toast.message, "second");
    }

    #[test]
    fn toast_serde_roundtrip() {
        let toast = Toast::new("Error", "task not found", Severity::Error);
        let json = serde_json::to_string(&toast).unwrap();
        assert!(json.contains("\"severity\":\"error\""));
        let parsed: Toast = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, toast.id);
        assert_eq!(parsed.message, "task not found");
    }
}
