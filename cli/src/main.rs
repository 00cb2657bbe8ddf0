pub mod account;
pub mod auth;
pub mod boxes;
pub mod cli;
pub mod client;
pub mod grid;
pub mod logger;
pub mod token;

use clap::Parser;
use cli::{Cli, Commands, DEFAULT_API_URL};
use client::ApiClient;
use logger::Logger;
use std::time::{SystemTime, UNIX_EPOCH};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()).await {
        Logger::error(format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // --api-url / BOXES_API_URL, then wherever we last logged in, then localhost.
    let api_url = match cli.api_url {
        Some(url) => url,
        None => auth::AuthConfig::load()
            .ok()
            .and_then(|a| a.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
    };
    log::debug!("using API at {}", api_url);
    let client = ApiClient::new(&api_url);

    match cli.command {
        Commands::Register { admin } => account::register(&client, admin).await?,
        Commands::Login { admin } => account::login(&client, admin).await?,
        Commands::Logout => account::logout().await?,
        Commands::Status => {
            let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;
            account::status(&client, now).await?
        }
        Commands::Whoami => account::whoami(&client).await?,
        Commands::Show => boxes::show(&client).await?,
        Commands::Toggle { indices } => boxes::edit(&client, boxes::Edit::Toggle(indices)).await?,
        Commands::Extend { from, to } => {
            boxes::edit(&client, boxes::Edit::Extend { from, to }).await?
        }
        Commands::Add { count } => boxes::edit(&client, boxes::Edit::Add(count)).await?,
        Commands::Reset => boxes::reset(&client).await?,
    }

    Ok(())
}
