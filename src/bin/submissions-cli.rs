use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "submissions-cli")]
#[command(about = "Command-line client for the submission service", long_about = None)]
struct Cli {
    /// Base URL of the service.
    #[arg(short, long, env = "BACKEND_URL", default_value = "http://localhost:9191")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service process is up
    Ready,
    /// Check that the service can reach its database
    Health,
    /// Store a new submission
    Submit {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        message: String,
    },
    /// List all submissions, newest first
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Ready => client.get(format!("{}/api/ready", base)).send().await?,
        Commands::Health => client.get(format!("{}/api/health", base)).send().await?,
        Commands::Submit { name, message } => {
            client
                .post(format!("{}/api/submit", base))
                .form(&[("name", name), ("message", message)])
                .send()
                .await?
        }
        Commands::List => client.get(format!("{}/api/submissions", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let is_json = res
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    let body = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        eprintln!("Response: {}", body.trim_end());
        std::process::exit(1);
    }

    if is_json {
        let json: Value = serde_json::from_str(&body)?;
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", body);
    }
    Ok(())
}
