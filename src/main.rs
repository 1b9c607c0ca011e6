//! banking-agent service binary.
//!
//! Runs one role per process: the orchestrator or one of the four
//! keyword responders.
//!
//! ```text
//!   client ── POST /consulta ──▶ orchestrator :8000
//!                                   │ keyword category
//!            ┌──────────────┬───────┴──────┬──────────────┐
//!            ▼              ▼              ▼              ▼
//!       consultas :8001 cuentas :8002 identidad :8003  ia :8004
//!            POST /respuesta (Bearer token)
//! ```

use std::path::PathBuf;

use clap::Parser;

use banking_agent::config::Role;
use banking_agent::lifecycle::{start, StartupOptions};

#[derive(Parser)]
#[command(name = "banking-agent")]
#[command(about = "Mock banking orchestrator and keyword responders", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, env = "BANKING_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Role to run (orchestrator, consultas, cuentas, identidad, ia).
    #[arg(short, long)]
    role: Option<Role>,

    /// Bind address, e.g. 127.0.0.1:8000.
    #[arg(short, long)]
    bind: Option<String>,

    /// Reload the configuration file when it changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    start(StartupOptions {
        config_path: cli.config,
        role: cli.role,
        bind: cli.bind,
        watch: cli.watch,
    })
    .await?;

    Ok(())
}
