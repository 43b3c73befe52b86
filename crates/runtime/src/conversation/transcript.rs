//! Per-query conversation history.

use crate::model::{Message, Part, Role, ToolCall, ToolResult};

/// The ordered messages exchanged with the model for one query.
///
/// Every tool result is pushed together with the assistant message holding
/// the call it answers, so a result always follows its request.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Start a transcript with a single user message.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(query)],
        }
    }

    /// Record one executed tool call and its result.
    pub fn record_tool_exchange(&mut self, call: ToolCall, result: ToolResult) {
        debug_assert_eq!(call.id, result.tool_call_id);
        self.messages
            .push(Message::assistant(vec![Part::ToolCall(call)]));
        self.messages.push(Message {
            role: Role::User,
            parts: vec![Part::ToolResult(result)],
        });
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
