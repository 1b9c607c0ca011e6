use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

use banking_agent::config::ServiceKind;

#[derive(Parser)]
#[command(name = "agent-cli")]
#[command(about = "Client for the mock banking agent", long_about = None)]
struct Cli {
    /// Orchestrator base URL.
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Bearer token; fetched from the orchestrator's /token when omitted.
    #[arg(short, long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Obtain an access token
    Token,
    /// Ask the orchestrator a question
    Ask { pregunta: String },
    /// Ask a responder directly
    Direct {
        /// consultas, cuentas, identidad or ia
        service: ServiceKind,
        pregunta: String,
        /// Responder base URL (defaults to localhost with the service's port)
        #[arg(long)]
        service_url: Option<String>,
    },
    /// Check orchestrator health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match &cli.command {
        Commands::Token => {
            let res = client.post(format!("{}/token", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Ask { pregunta } => {
            let headers = auth_headers(&client, &cli).await?;
            let res = client
                .post(format!("{}/consulta", cli.url))
                .headers(headers)
                .json(&json!({ "pregunta": pregunta }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Direct {
            service,
            pregunta,
            service_url,
        } => {
            let base = service_url.clone().unwrap_or_else(|| {
                let port = banking_agent::config::Role::from(*service).default_port();
                format!("http://localhost:{}", port)
            });
            let headers = auth_headers(&client, &cli).await?;
            let res = client
                .post(format!("{}/respuesta", base))
                .headers(headers)
                .json(&json!({ "pregunta": pregunta }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn auth_headers(
    client: &reqwest::Client,
    cli: &Cli,
) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let token = match &cli.token {
        Some(token) => token.clone(),
        None => {
            let body: Value = client
                .post(format!("{}/token", cli.url))
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            body["access_token"]
                .as_str()
                .ok_or("token response has no access_token")?
                .to_string()
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))?,
    );
    Ok(headers)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("service returned status {}: {}", status, text).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
