use clap::Args;

use sui_client::Client;

use super::EntryArgs;

#[derive(Debug, Args)]
pub struct Command {
    /// Account sent as `in_account`.
    seller: String,
    /// Account sent as `out_account`.
    buyer: String,
    #[command(flatten)]
    entry: EntryArgs,
}

pub fn execute_command(client: &mut Client, cmd: &Command) -> anyhow::Result<()> {
    let id = client.add_transfer(&cmd.seller, &cmd.buyer, &cmd.entry.entry())?;
    println!("{}", id);

    Ok(())
}
