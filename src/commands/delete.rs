use clap::Args;
use tracing::info;

use sui_client::Client;

#[derive(Debug, Args)]
pub struct Command {
    #[arg(required = true)]
    ids: Vec<String>,
}

pub fn execute_command(client: &mut Client, cmd: &Command) -> anyhow::Result<()> {
    let reply = client.delete_transactions(&cmd.ids)?;
    info!("deleted {} transactions", cmd.ids.len());
    println!("{}", reply);

    Ok(())
}
