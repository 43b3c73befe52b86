//! The tool-calling conversation loop.
//!
//! One query runs to completion before the next begins:
//!
//! 1. seed a fresh [`Transcript`] with the query,
//! 2. fetch the tool catalog once,
//! 3. ask the model for a reply,
//! 4. walk the reply's parts in order, emitting text and executing each tool
//!    call; every executed call extends the transcript and fetches a follow-up
//!    reply, which is walked before the rest of the earlier reply.
//!
//! The loop ends when no unvisited parts remain, i.e. the latest reply asked
//! for no tools. There is no round limit, no retry and no deduplication.

mod annotate;
mod transcript;

pub use annotate::tool_call_annotation;
pub use transcript::Transcript;

use crate::model::{Backend, ModelRequest, ModelResponse, Part, ToolResult, ToolSpec};
use crate::tools::ToolHost;
use crate::{Error, Result};
use std::error::Error as _;
use tracing::debug;

/// Drives queries through a model backend and an optional tool session.
pub struct Agent<B, H> {
    backend: B,
    tools: Option<H>,
    verbose_errors: bool,
}

impl<B: Backend, H: ToolHost> Agent<B, H> {
    /// Create an agent with no tool session attached.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            tools: None,
            verbose_errors: false,
        }
    }

    /// Attach the tool session queries will use.
    pub fn with_tools(mut self, tools: H) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Append the error's cause chain to failure messages.
    pub fn verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn tools(&self) -> Option<&H> {
        self.tools.as_ref()
    }

    /// Detach and return the tool session, e.g. to shut it down.
    pub fn disconnect(&mut self) -> Option<H> {
        self.tools.take()
    }

    /// Run a query and always produce text.
    ///
    /// Failures are rendered as `Error processing query: ...` instead of
    /// being returned, so the caller can keep accepting queries.
    pub async fn process_query(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(answer) => answer,
            Err(Error::NotConnected) => Error::NotConnected.to_string(),
            Err(e) => self.render_error(&e),
        }
    }

    /// Run a query to its final answer.
    ///
    /// The answer is every text part the model produced plus one annotation
    /// line per tool call, newline-joined in the order they occurred.
    pub async fn run(&self, query: &str) -> Result<String> {
        let tools = self.tools.as_ref().ok_or(Error::NotConnected)?;

        let mut transcript = Transcript::new(query);
        let catalog = tools.list_tools().await?;
        debug!(tools = catalog.len(), "fetched tool catalog");

        let mut output = Vec::new();
        let first = self.invoke(&transcript, &catalog).await?;
        let mut pending = vec![first.message.parts.into_iter()];

        loop {
            let next = match pending.last_mut() {
                Some(parts) => parts.next(),
                None => break,
            };

            match next {
                None => {
                    pending.pop();
                }
                Some(Part::Text(text)) => output.push(text),
                Some(Part::ToolCall(call)) => {
                    debug!(tool = %call.name, id = %call.id, "executing tool call");
                    let result = tools
                        .call_tool(&call)
                        .await
                        .map_err(|source| Error::ToolCall {
                            name: call.name.clone(),
                            source,
                        })?;

                    output.push(tool_call_annotation(&call));
                    let result = ToolResult::new(call.id.clone(), result.text)
                        .with_error(result.is_error);
                    transcript.record_tool_exchange(call, result);

                    let reply = self.invoke(&transcript, &catalog).await?;
                    pending.push(reply.message.parts.into_iter());
                }
                // Models never send these; nothing to emit.
                Some(Part::ToolResult(_)) => {}
            }
        }

        Ok(output.join("\n"))
    }

    async fn invoke(&self, transcript: &Transcript, catalog: &[ToolSpec]) -> Result<ModelResponse> {
        debug!(messages = transcript.len(), "requesting model reply");
        let response = self
            .backend
            .call(ModelRequest {
                messages: transcript.messages(),
                tools: catalog,
            })
            .await?;
        Ok(response)
    }

    fn render_error(&self, error: &Error) -> String {
        let mut rendered = format!("Error processing query: {error}");
        if self.verbose_errors {
            let mut source = error.source();
            if source.is_some() {
                rendered.push_str("\n\nCaused by:");
            }
            while let Some(cause) = source {
                rendered.push_str(&format!("\n    {cause}"));
                source = cause.source();
            }
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Guarded, ModelError, Role};
    use crate::testing::{ScriptedBackend, ScriptedTools, reply, text_reply, tool_use};
    use crate::tools::{ToolError, ToolOutput};
    use serde_json::json;

    fn agent(backend: ScriptedBackend, tools: ScriptedTools) -> Agent<ScriptedBackend, ScriptedTools> {
        Agent::new(backend).with_tools(tools)
    }

    #[tokio::test]
    async fn text_only_reply_makes_one_model_call() {
        let agent = agent(
            ScriptedBackend::new(vec![Ok(text_reply(&["Hello", "there"]))]),
            ScriptedTools::new(vec![]),
        );

        let answer = agent.process_query("hi").await;

        assert_eq!(answer, "Hello\nthere");
        assert_eq!(agent.backend().calls(), 1);
        assert_eq!(agent.tools().unwrap().calls().len(), 0);
        assert_eq!(agent.tools().unwrap().list_calls(), 1);
    }

    #[tokio::test]
    async fn location_time_zone_scenario() {
        let agent = agent(
            ScriptedBackend::new(vec![
                Ok(reply(vec![tool_use(
                    "t1",
                    "get_location_by_id",
                    json!({ "location_id": "QIM4" }),
                )])),
                Ok(text_reply(&["QIM4 is in the America/Chicago time zone."])),
            ]),
            ScriptedTools::new(vec![Ok(ToolOutput::text("Time Zone: America/Chicago"))]),
        );

        let answer = agent
            .process_query("What is the time zone for location QIM4?")
            .await;

        assert_eq!(
            answer,
            "[Calling tool get_location_by_id with args {\"location_id\": \"QIM4\"}]\nQIM4 is in the America/Chicago time zone."
        );

        let requests = agent.backend().requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].len(), 1);
        let follow_up = &requests[1];
        assert_eq!(follow_up.len(), 3);
        assert_eq!(follow_up[1].role, Role::Assistant);
        assert_eq!(follow_up[1].tool_calls()[0].id, "t1");
        assert_eq!(
            follow_up[2].parts,
            vec![Part::ToolResult(ToolResult::new("t1", "Time Zone: America/Chicago"))]
        );
    }

    #[tokio::test]
    async fn text_around_single_tool_call_keeps_order() {
        let agent = agent(
            ScriptedBackend::new(vec![
                Ok(reply(vec![
                    Part::Text("Let me look that up.".into()),
                    tool_use("t1", "search_locations_by_name", json!({ "name": "Manheim" })),
                ])),
                Ok(text_reply(&["Found two Manheim locations."])),
            ]),
            ScriptedTools::new(vec![Ok(ToolOutput::text("Location Name: Manheim Dallas"))]),
        );

        let answer = agent.process_query("Where is Manheim?").await;

        let lines: Vec<&str> = answer.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Let me look that up.",
                "[Calling tool search_locations_by_name with args {\"name\": \"Manheim\"}]",
                "Found two Manheim locations.",
            ]
        );
        assert_eq!(agent.backend().calls(), 2);
        assert_eq!(agent.tools().unwrap().calls().len(), 1);
    }

    #[tokio::test]
    async fn chain_of_tool_calls_runs_until_no_tool_is_requested() {
        let n = 4;
        let mut script: Vec<_> = (0..n)
            .map(|i| {
                Ok(reply(vec![tool_use(
                    &format!("t{i}"),
                    "get_locations_by_state",
                    json!({ "state": "MS" }),
                )]))
            })
            .collect();
        script.push(Ok(text_reply(&["done"])));
        let outputs = (0..n).map(|i| Ok(ToolOutput::text(format!("page {i}")))).collect();

        let agent = agent(ScriptedBackend::new(script), ScriptedTools::new(outputs));
        let answer = agent.process_query("list everything in MS").await;

        assert_eq!(agent.backend().calls(), n + 1);
        assert_eq!(agent.tools().unwrap().calls().len(), n);
        assert!(answer.ends_with("\ndone"));
        assert_eq!(answer.matches("[Calling tool").count(), n);

        // Each follow-up request carries every earlier exchange.
        let last = agent.backend().requests().pop().unwrap();
        assert_eq!(last.len(), 1 + 2 * n);
    }

    #[tokio::test]
    async fn follow_up_is_walked_before_remaining_parts() {
        let agent = agent(
            ScriptedBackend::new(vec![
                Ok(reply(vec![
                    tool_use("a", "get_location_by_id", json!({ "location_id": "QIM4" })),
                    Part::Text("after first".into()),
                    tool_use("b", "get_location_by_id", json!({ "location_id": "ABC1" })),
                ])),
                Ok(text_reply(&["follow-up a"])),
                Ok(text_reply(&["follow-up b"])),
            ]),
            ScriptedTools::new(vec![
                Ok(ToolOutput::text("QIM4 data")),
                Ok(ToolOutput::text("ABC1 data")),
            ]),
        );

        let answer = agent.process_query("compare QIM4 and ABC1").await;
        let lines: Vec<&str> = answer.lines().collect();

        assert_eq!(lines[1], "follow-up a");
        assert_eq!(lines[2], "after first");
        assert_eq!(lines[4], "follow-up b");
        assert_eq!(agent.backend().calls(), 3);
        let called: Vec<String> = agent.tools().unwrap().calls().into_iter().map(|c| c.id).collect();
        assert_eq!(called, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn tool_failure_stops_the_query() {
        let agent = agent(
            ScriptedBackend::new(vec![
                Ok(reply(vec![tool_use(
                    "t1",
                    "get_location_by_id",
                    json!({ "location_id": "QIM4" }),
                )])),
                Ok(text_reply(&["never requested"])),
            ]),
            ScriptedTools::new(vec![Err(ToolError::Execution("connection refused".into()))]),
        );

        let answer = agent.process_query("time zone for QIM4?").await;

        assert!(answer.starts_with("Error processing query:"));
        assert!(answer.contains("connection refused"));
        assert_eq!(agent.backend().calls(), 1);
    }

    #[tokio::test]
    async fn tool_error_output_is_sent_back_to_the_model() {
        let agent = agent(
            ScriptedBackend::new(vec![
                Ok(reply(vec![tool_use("t1", "get_location_by_id", json!({ "location_id": "ZZZ9" }))])),
                Ok(text_reply(&["That location does not exist."])),
            ]),
            ScriptedTools::new(vec![Ok(ToolOutput::error("404 Not Found"))]),
        );

        agent.process_query("where is ZZZ9?").await;

        let follow_up = agent.backend().requests().pop().unwrap();
        match &follow_up[2].parts[0] {
            Part::ToolResult(result) => {
                assert!(result.is_error);
                assert_eq!(result.content, "404 Not Found");
            }
            other => panic!("expected tool result, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn model_failure_becomes_error_text() {
        let agent = agent(
            ScriptedBackend::new(vec![Err(ModelError::Network("dns error".into()))]),
            ScriptedTools::new(vec![]),
        );

        let answer = agent.process_query("hi").await;
        assert_eq!(answer, "Error processing query: network: dns error");
    }

    #[tokio::test]
    async fn no_session_reports_not_connected() {
        let agent: Agent<ScriptedBackend, ScriptedTools> =
            Agent::new(ScriptedBackend::new(vec![Ok(text_reply(&["unused"]))]));

        let answer = agent.process_query("hi").await;

        assert_eq!(answer, "Not connected to server. Please connect first.");
        assert_eq!(agent.backend().calls(), 0);
    }

    #[tokio::test]
    async fn latched_backend_fails_every_query_without_calling_out() {
        let backend = Guarded::new(ScriptedBackend::new(vec![Err(ModelError::Auth(
            "401: invalid x-api-key".into(),
        ))]));
        let agent = Agent::new(backend).with_tools(ScriptedTools::new(vec![]));

        let first = agent.process_query("hi").await;
        assert!(first.contains("authentication failed"));

        for _ in 0..3 {
            let answer = agent.process_query("hi again").await;
            assert!(answer.starts_with("Error processing query: model unavailable:"));
        }
        assert!(agent.backend().availability().is_unavailable());
    }

    #[tokio::test]
    async fn verbose_errors_include_cause_chain() {
        let agent = agent(
            ScriptedBackend::new(vec![Ok(reply(vec![tool_use(
                "t1",
                "get_location_by_id",
                json!({ "location_id": "QIM4" }),
            )]))]),
            ScriptedTools::new(vec![Err(ToolError::Execution("timed out".into()))]),
        )
        .verbose_errors(true);

        let answer = agent.process_query("QIM4?").await;
        assert!(answer.contains("\n\nCaused by:\n    execution failed: timed out"));
    }

    #[tokio::test]
    async fn disconnect_returns_the_session() {
        let mut agent = agent(
            ScriptedBackend::new(vec![]),
            ScriptedTools::new(vec![]),
        );
        assert!(agent.disconnect().is_some());
        assert!(agent.tools().is_none());
        assert_eq!(
            agent.process_query("hi").await,
            "Not connected to server. Please connect first."
        );
    }
}
