//! Inline chat widget.
//!
//! `ChatWidget` owns one in-memory conversation and the two axes of its
//! display state: expanded or collapsed, idle or sending. Rendering and the
//! network call live outside; the widget hands out a [`ChatPayload`] on
//! submit and is told how the request ended through
//! [`ChatWidget::response_arrived`] or [`ChatWidget::request_failed`].

pub mod events;
pub mod message;
pub mod page;
pub mod transport;

use std::fmt::Display;
use std::sync::Arc;

use log::warn;
use serde::Serialize;

use crate::web::models::{ChatPayload, ChatReply, DEFAULT_LANGUAGE};

pub use events::{EventSink, LogSink, WidgetEvent};
pub use message::{ChatMessage, MessageId, Role};
pub use page::PageContext;
pub use transport::{ChatTransport, HttpTransport};

pub const LOADING_MARKER: &str = "...";
pub const REPLY_FALLBACK: &str = "Désolé, je n'ai pas pu répondre.";
pub const RETRY_PROMPT: &str = "Oups, réessayez !";

/// The outstanding request. `stale` is set when the transcript was cleared
/// after it was sent, so its outcome has nowhere to go.
struct InFlight {
    stale: bool,
}

pub struct ChatWidget {
    messages: Vec<ChatMessage>,
    input: String,
    expanded: bool,
    in_flight: Option<InFlight>,
    next_id: u64,
    language: String,
    page_context: Option<PageContext>,
    sink: Option<Arc<dyn EventSink>>,
    scroll_requested: bool,
    focus_requested: bool,
}

/// Snapshot handed to templates.
#[derive(Debug, Serialize)]
pub struct WidgetView<'a> {
    pub expanded: bool,
    pub show_header: bool,
    pub sending: bool,
    pub can_submit: bool,
    pub input: &'a str,
    pub messages: &'a [ChatMessage],
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            input: String::new(),
            expanded: false,
            in_flight: None,
            next_id: 0,
            language: DEFAULT_LANGUAGE.to_string(),
            page_context: None,
            sink: None,
            scroll_requested: false,
            focus_requested: false,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_page_context(mut self, context: PageContext) -> Self {
        self.page_context = Some(context);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the send button is enabled.
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() && !self.is_sending()
    }

    /// True once the transcript holds anything besides a loading placeholder.
    pub fn has_conversation(&self) -> bool {
        self.messages.iter().any(|m| !m.is_loading())
    }

    /// Starts a chat turn with `text`, trimmed.
    ///
    /// Returns the payload to send, or `None` when the text is blank or a
    /// request is already in flight; in that case nothing changes.
    pub fn submit(&mut self, text: &str) -> Option<ChatPayload> {
        let text = text.trim();
        if text.is_empty() || self.is_sending() {
            return None;
        }

        if !self.expanded {
            self.expanded = true;
            self.focus_requested = true;
            self.emit(WidgetEvent::Opened);
        }

        self.push(Role::User, text);
        self.push(Role::Loading, LOADING_MARKER);
        self.input.clear();
        self.in_flight = Some(InFlight { stale: false });
        self.emit(WidgetEvent::Submitted {
            chars: text.chars().count(),
        });

        Some(ChatPayload {
            message: text.to_string(),
            language: self.language.clone(),
            context: self.page_context.map(PageContext::to_value),
        })
    }

    /// Submits whatever is in the input field.
    pub fn submit_input(&mut self) -> Option<ChatPayload> {
        let text = std::mem::take(&mut self.input);
        let payload = self.submit(&text);
        if payload.is_none() {
            self.input = text;
        }
        payload
    }

    /// Replaces the loading placeholder with the bot's reply.
    ///
    /// Returns false when there was nothing to resolve, or the transcript was
    /// cleared since the request went out.
    pub fn response_arrived(&mut self, reply: &ChatReply) -> bool {
        if !self.settle() {
            return false;
        }
        let text = reply.text().unwrap_or(REPLY_FALLBACK).to_string();
        self.push(Role::Bot, text);
        self.emit(WidgetEvent::Responded);
        true
    }

    /// Replaces the loading placeholder with a retry prompt. No retry is attempted.
    pub fn request_failed(&mut self, error: impl Display) -> bool {
        warn!("Chat request failed: {}", error);
        if !self.settle() {
            return false;
        }
        self.push(Role::Error, RETRY_PROMPT);
        self.emit(WidgetEvent::Failed);
        true
    }

    /// Hides the transcript and keeps it. The next submit re-expands onto the
    /// same conversation.
    pub fn collapse(&mut self) {
        if self.expanded {
            self.expanded = false;
            self.emit(WidgetEvent::Closed { cleared: false });
        }
    }

    /// Empties the transcript and collapses. An in-flight request keeps running
    /// but its outcome is dropped.
    pub fn clear(&mut self) {
        let had_state = self.expanded || !self.messages.is_empty();
        self.messages.clear();
        self.expanded = false;
        if let Some(flight) = self.in_flight.as_mut() {
            flight.stale = true;
        }
        if had_state {
            self.emit(WidgetEvent::Closed { cleared: true });
        }
    }

    /// Submits the input and waits for `transport`. Returns false when the
    /// input was not submittable.
    pub async fn send(&mut self, transport: &dyn ChatTransport) -> bool {
        let Some(payload) = self.submit_input() else {
            return false;
        };
        match transport.send(&payload).await {
            Ok(reply) => {
                self.response_arrived(&reply);
            }
            Err(e) => {
                self.request_failed(format!("{:#}", e));
            }
        }
        true
    }

    /// One-shot: true if the transcript changed since the last call and is visible.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested) && self.expanded
    }

    /// One-shot: true right after the widget expanded.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested) && self.expanded
    }

    pub fn view(&self) -> WidgetView<'_> {
        WidgetView {
            expanded: self.expanded,
            show_header: self.expanded && self.has_conversation(),
            sending: self.is_sending(),
            can_submit: self.can_submit(),
            input: &self.input,
            messages: &self.messages,
        }
    }

    // Ends the in-flight request; true when its outcome belongs in the transcript.
    fn settle(&mut self) -> bool {
        match self.in_flight.take() {
            Some(InFlight { stale: false }) => {
                self.messages.retain(|m| !m.is_loading());
                true
            }
            _ => false,
        }
    }

    fn push(&mut self, role: Role, content: impl Into<String>) {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage::new(id, role, content));
        self.scroll_requested = true;
    }

    fn emit(&self, event: WidgetEvent) {
        if let Some(sink) = &self.sink {
            sink.record(&event);
        }
    }
}
