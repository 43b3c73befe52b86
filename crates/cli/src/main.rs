mod config;
mod error;

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser;
use runtime::{Agent, AnthropicBackend, Backend, Guarded, McpToolHost, ToolHost};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const ENV_HELP: &str = "\
Environment:
  ANTHROPIC_API_KEY      API key for the model backend
  ANTHROPIC_AUTH_TOKEN   bearer token (alternative to the API key)
  WAYPOINT_MODEL         model override
  ANTHROPIC_BASE_URL     alternative API host
  RUST_LOG               log filter (default: warn)";

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(about = "Chat with a model that can call tools on a remote MCP server", long_about = None)]
#[command(version, after_help = ENV_HELP)]
struct Cli {
    /// URL of the MCP server's Streamable HTTP endpoint, e.g. http://localhost:8080/mcp
    server_url: String,

    /// Config file (default: ./waypoint.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum tokens per model reply
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Append the full cause chain to error messages
    #[arg(long)]
    verbose_errors: bool,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::discover(cli.config.as_deref())?.with_env(|key| std::env::var(key).ok());
    if let Some(model) = cli.model {
        config.backend.model = model;
    }
    if let Some(max_tokens) = cli.max_tokens {
        config.backend.max_tokens = max_tokens;
    }

    let backend = build_backend(&config);

    println!("Connecting to server at {}...", cli.server_url);
    let Some(host) = until_interrupted(connect(&cli.server_url), ctrl_c()).await else {
        return Ok(());
    };
    let host = host?;

    let mut agent = Agent::new(backend)
        .with_tools(host)
        .verbose_errors(cli.verbose_errors);

    let outcome = chat_loop(&agent).await;

    println!("Cleaning up resources...");
    if let Some(host) = agent.disconnect() {
        if let Some(Err(e)) = until_interrupted(host.shutdown(), ctrl_c()).await {
            eprintln!("Error during cleanup: {e}");
        }
    }

    outcome
}

/// Build the model backend. Missing or conflicting credentials do not stop
/// startup; the backend starts latched unavailable and every query says why.
fn build_backend(config: &Config) -> Guarded<AnthropicBackend> {
    match config.auth() {
        Ok(auth) => {
            let mut builder = AnthropicBackend::builder(auth, &config.backend.model)
                .max_tokens(config.backend.max_tokens);
            if let Some(system) = &config.backend.system {
                builder = builder.system(system);
            }
            if let Some(base_url) = &config.backend.base_url {
                builder = builder.base_url(base_url);
            }
            let backend = builder.build();
            println!("Model: {backend}");
            Guarded::new(backend)
        }
        Err(e) => {
            warn!(error = %e, "model backend disabled");
            println!("Warning: {e}");
            println!("Queries will fail until credentials are configured and the client is restarted.");
            Guarded::unavailable(e.to_string())
        }
    }
}

async fn connect(url: &str) -> Result<McpToolHost> {
    let connect_error = |reason: String| Error::Connect {
        url: url.to_string(),
        reason,
    };

    let host = McpToolHost::connect(url)
        .await
        .map_err(|e| connect_error(e.to_string()))?;
    info!(url = host.url(), "MCP session ready");
    println!("Initialized Streamable HTTP client...");

    let tools = host
        .list_tools()
        .await
        .map_err(|e| connect_error(e.to_string()))?;
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    println!("\nConnected to server with tools: {names:?}");

    Ok(host)
}

async fn chat_loop<B: Backend, H: ToolHost>(agent: &Agent<B, H>) -> Result<()> {
    println!("\nWaypoint client started!");
    println!("Type your queries or 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        print!("\nQuery: ");
        stdout.flush()?;

        let Some(line) = until_interrupted(lines.next_line(), ctrl_c()).await else {
            break;
        };

        // EOF
        let Some(line) = line? else {
            println!();
            break;
        };

        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit_command(query) {
            break;
        }

        println!("Processing your query...");
        let Some(response) = until_interrupted(agent.process_query(query), ctrl_c()).await else {
            break;
        };
        println!("\n{response}");
    }

    Ok(())
}

/// Run `work` unless `interrupt` fires first.
async fn until_interrupted<T>(
    work: impl Future<Output = T>,
    interrupt: impl Future<Output = ()>,
) -> Option<T> {
    tokio::select! {
        output = work => Some(output),
        _ = interrupt => {
            println!("\nDetected Ctrl+C. Exiting...");
            None
        }
    }
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit")
}
