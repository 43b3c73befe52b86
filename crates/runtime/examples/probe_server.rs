//! Connect to an MCP server, list its tools and optionally call one.
//!
//! Run with:
//!   cargo run --example probe_server -- http://localhost:8080/mcp
//!   cargo run --example probe_server -- http://localhost:8080/mcp get_location_by_id '{"location_id":"QIM4"}'

use runtime::{McpToolHost, ToolCall, ToolHost};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let url = args
        .next()
        .ok_or("usage: probe_server <url> [tool] [json-args]")?;

    println!("Connecting to {url}...");
    let host = McpToolHost::connect(&url).await?;

    let tools = host.list_tools().await?;
    println!("\nDiscovered {} tools:", tools.len());
    for tool in &tools {
        println!("  - {}", tool.name);
        if !tool.description.is_empty() {
            println!("    {}", tool.description);
        }
    }

    if let Some(name) = args.next() {
        let input = match args.next() {
            Some(raw) => serde_json::from_str(&raw)?,
            None => serde_json::Value::Null,
        };
        let call = ToolCall {
            id: "probe".into(),
            name,
            input,
        };

        println!("\nCalling {}...", call.name);
        match host.call_tool(&call).await {
            Ok(output) if output.is_error => println!("Tool reported an error:\n{}", output.text),
            Ok(output) => println!("{}", output.text),
            Err(e) => println!("Error: {e}"),
        }
    }

    host.shutdown().await?;
    println!("\nDone!");
    Ok(())
}
