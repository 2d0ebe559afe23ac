use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "bridge-cli")]
#[command(about = "Command-line client for a running Miniflux Bridge", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:5001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the bridge is running
    Status,
    /// Show the current Miniflux user
    Me,
    /// List all feeds
    Feeds,
    /// Show one feed
    Feed { id: u64 },
    /// List a feed's entries
    Entries {
        id: u64,
        /// Entry status filter (read, unread, removed)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Subscribe to a feed
    Add {
        feed_url: String,
        #[arg(long)]
        category_id: Option<u64>,
    },
    /// Unsubscribe from a feed
    Delete { id: u64 },
    /// List categories
    Categories,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/", base)).send().await?,
        Commands::Me => client.get(format!("{}/v1/me", base)).send().await?,
        Commands::Feeds => client.get(format!("{}/v1/feeds", base)).send().await?,
        Commands::Feed { id } => client.get(format!("{}/v1/feeds/{}", base, id)).send().await?,
        Commands::Entries { id, status, limit, offset } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(status) = status {
                query.push(("status", status));
            }
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(offset) = offset {
                query.push(("offset", offset.to_string()));
            }
            client
                .get(format!("{}/v1/feeds/{}/entries", base, id))
                .query(&query)
                .send()
                .await?
        }
        Commands::Add { feed_url, category_id } => {
            let mut body = json!({ "feed_url": feed_url });
            if let Some(category_id) = category_id {
                body["category_id"] = json!(category_id);
            }
            client
                .post(format!("{}/v1/feeds", base))
                .json(&body)
                .send()
                .await?
        }
        Commands::Delete { id } => {
            client
                .delete(format!("{}/v1/feeds/{}", base, id))
                .send()
                .await?
        }
        Commands::Categories => client.get(format!("{}/v1/categories", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: bridge returned status {}", status);
        eprintln!("{}", rendered);
    }
    Ok(())
}
