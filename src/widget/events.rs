use log::info;

const CATEGORY: &str = "Chat";

/// Observation points of the widget lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The transcript became visible.
    Opened,
    Submitted { chars: usize },
    Responded,
    Failed,
    /// The transcript was hidden, by collapse or clear.
    Closed { cleared: bool },
}

impl WidgetEvent {
    pub fn category(&self) -> &'static str {
        CATEGORY
    }

    pub fn action(&self) -> &'static str {
        match self {
            WidgetEvent::Opened => "Open",
            WidgetEvent::Submitted { .. } => "Message Submit",
            WidgetEvent::Responded => "Response",
            WidgetEvent::Failed => "Error",
            WidgetEvent::Closed { .. } => "Close",
        }
    }

    pub fn label(&self) -> Option<String> {
        match self {
            WidgetEvent::Submitted { chars } => Some(format!("{} chars", chars)),
            WidgetEvent::Closed { cleared: true } => Some("clear".to_string()),
            WidgetEvent::Closed { cleared: false } => Some("collapse".to_string()),
            _ => None,
        }
    }
}

/// Receives widget telemetry. Implementations must not fail the caller:
/// the widget behaves the same whether or not a sink is attached.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &WidgetEvent);
}

/// Writes every event to the log at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: &WidgetEvent) {
        match event.label() {
            Some(label) => info!("[{}] {} ({})", event.category(), event.action(), label),
            None => info!("[{}] {}", event.category(), event.action()),
        }
    }
}
