//! lsq: MCP bridge to a running Logseq graph
//!
//! Commands: serve, call, tools, completions

use std::io;
use std::time::Duration;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use lsq_client::{ClientConfig, LogseqClient, DEFAULT_API_URL, DEFAULT_TIMEOUT};
use lsq_mcp::{LsqMcpService, OPERATIONS};

#[derive(Parser)]
#[command(name = "lsq")]
#[command(version)]
#[command(about = "MCP bridge to a running Logseq graph")]
struct Cli {
    /// Base URL of the Logseq HTTP API server
    #[arg(
        long,
        global = true,
        env = "LOGSEQ_API_URL",
        default_value = DEFAULT_API_URL
    )]
    api_url: String,

    /// Bearer token configured in Logseq's API server settings
    #[arg(long, global = true, env = "LOGSEQ_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "LOGSEQ_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT.as_secs()
    )]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the tool catalog over MCP on stdin/stdout (default)
    Serve,
    /// Run one operation and print its result
    Call {
        /// Operation name, e.g. list_pages
        operation: String,
        /// Arguments as a JSON object
        args: Option<String>,
    },
    /// List the available operations
    Tools,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    fn client(&self) -> anyhow::Result<LogseqClient> {
        let config = ClientConfig::new(
            &self.api_url,
            self.api_token.clone().unwrap_or_default(),
            Duration::from_secs(self.timeout_secs),
        )?;
        tracing::info!(
            api_url = %config.api_url,
            timeout_secs = self.timeout_secs,
            "connecting to Logseq"
        );
        Ok(LogseqClient::http(config)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lsq=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        None | Some(Commands::Serve) => serve(&cli).await,
        Some(Commands::Call { operation, args }) => call(&cli, operation, args.as_deref()).await,
        Some(Commands::Tools) => {
            for name in OPERATIONS {
                println!("{name}");
            }
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "lsq", &mut io::stdout());
            Ok(())
        }
    }
}

async fn serve(cli: &Cli) -> anyhow::Result<()> {
    let client = cli.client()?;
    tracing::info!("lsq starting (stdio transport)");

    let service = LsqMcpService::new(client)
        .serve(rmcp::transport::io::stdio())
        .await?;
    service.waiting().await?;
    Ok(())
}

async fn call(cli: &Cli, operation: &str, args: Option<&str>) -> anyhow::Result<()> {
    let args: serde_json::Value = match args {
        Some(raw) => serde_json::from_str(raw).context("arguments must be a JSON object")?,
        None => serde_json::Value::Null,
    };
    let client = cli.client()?;
    let text = lsq_mcp::invoke(&client, operation, args).await?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn timeout_flag_defaults_to_client_timeout() {
        let command = Cli::command();
        let timeout = command
            .get_arguments()
            .find(|arg| arg.get_id() == "timeout_secs")
            .unwrap();
        let defaults: Vec<String> = timeout
            .get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect();
        assert_eq!(defaults, vec![DEFAULT_TIMEOUT.as_secs().to_string()]);
    }
}
