use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
#[allow(unused_imports)]
use tracing::*;
use tracing_subscriber::prelude::*;

use sui_client::{config::Configuration, Client};

mod commands;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "sui.json")]
    config: PathBuf,
    /// Account book to work in, overrides the configuration.
    #[arg(short, long)]
    book: Option<String>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Books(commands::books::Command),
    Meta(commands::meta::Command),
    List(commands::list::Command),
    Income(commands::add::Command),
    Payout(commands::add::Command),
    Transfer(commands::transfer::Command),
    Delete(commands::delete::Command),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let get_rust_log = || -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| {
            match cli.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
            .into()
        })
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(get_rust_log()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Configuration::load(&cli.config)?;
    let password = config.password().ok_or_else(|| {
        anyhow!(
            "no password in {} or ${}",
            cli.config.display(),
            sui_client::config::PASSWORD_VARIABLE
        )
    })?;

    let mut client = Client::connect(config.endpoints.clone(), &config.user_agent)?;

    if let Commands::Books(cmd) = &cli.command {
        client.login(&config.email, &password)?;
        client.fetch_account_books()?;
        return commands::books::execute_command(&client, cmd);
    }

    let book = cli
        .book
        .clone()
        .or(config.account_book.clone())
        .ok_or_else(|| anyhow!("no account book given, use --book"))?;

    client.login_and_init(&config.email, &password, &book)?;

    match &cli.command {
        Commands::Books(_) => Ok(()),
        Commands::Meta(cmd) => commands::meta::execute_command(&client, cmd),
        Commands::List(cmd) => commands::list::execute_command(&mut client, cmd),
        Commands::Income(cmd) => commands::add::execute_income(&mut client, cmd),
        Commands::Payout(cmd) => commands::add::execute_payout(&mut client, cmd),
        Commands::Transfer(cmd) => commands::transfer::execute_command(&mut client, cmd),
        Commands::Delete(cmd) => commands::delete::execute_command(&mut client, cmd),
    }
}
