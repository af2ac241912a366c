use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "chain-cli")]
#[command(about = "Management CLI for chain relay nodes", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe a node's identity
    Probe,
    /// Send a transaction into the chain
    Send {
        /// Raw JSON payload to persist at the first hop
        #[arg(short, long, default_value = "{}")]
        payload: String,
        /// Initial hop count
        #[arg(short, long, default_value_t = 0)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Probe => {
            let res = client.get(&cli.url).send().await?;
            println!("{}", res.text().await?);
        }
        Commands::Send { payload, count } => {
            let payload: Value = serde_json::from_str(&payload)?;
            let res = client
                .post(format!("{}/create", cli.url))
                .query(&[("count", count)])
                .json(&payload)
                .send()
                .await?;

            let status = res.status();
            let body: Value = res.json().await?;
            println!("status: {}", status);
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
