//! Scripted backend and tool host for unit tests.

use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, ToolCall, ToolSpec, Usage,
};
use crate::tools::{ToolError, ToolHost, ToolOutput};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Replays canned replies in order and records every request it sees.
pub(crate) struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ModelResponse, ModelError>>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedBackend {
    pub(crate) fn new(replies: Vec<Result<ModelResponse, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        self.requests.lock().unwrap().push(request.messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::InvalidResponse("script exhausted".into())))
    }
}

/// Serves a fixed catalog and replays canned tool outputs in order.
pub(crate) struct ScriptedTools {
    specs: Vec<ToolSpec>,
    outputs: Mutex<VecDeque<Result<ToolOutput, ToolError>>>,
    calls: Mutex<Vec<ToolCall>>,
    list_calls: AtomicUsize,
}

impl ScriptedTools {
    pub(crate) fn new(outputs: Vec<Result<ToolOutput, ToolError>>) -> Self {
        Self {
            specs: vec![ToolSpec {
                name: "get_location_by_id".into(),
                description: "Get location information by location ID/code.".into(),
                schema: json!({
                    "type": "object",
                    "properties": { "location_id": { "type": "string" } },
                    "required": ["location_id"]
                }),
            }],
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> Vec<ToolCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl ToolHost for ScriptedTools {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.specs.clone())
    }

    async fn call_tool(&self, call: &ToolCall) -> Result<ToolOutput, ToolError> {
        self.calls.lock().unwrap().push(call.clone());
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ToolError::Execution(format!("no scripted output for {}", call.name))))
    }
}

pub(crate) fn reply(parts: Vec<Part>) -> ModelResponse {
    ModelResponse {
        message: Message::assistant(parts),
        usage: Usage::default(),
    }
}

pub(crate) fn text_reply(texts: &[&str]) -> ModelResponse {
    reply(texts.iter().map(|t| Part::Text((*t).to_string())).collect())
}

pub(crate) fn tool_use(id: &str, name: &str, input: Value) -> Part {
    Part::ToolCall(ToolCall {
        id: id.into(),
        name: name.into(),
        input,
    })
}
