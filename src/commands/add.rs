use clap::Args;

use sui_client::Client;

use super::EntryArgs;

#[derive(Debug, Args)]
pub struct Command {
    account: String,
    category: String,
    #[command(flatten)]
    entry: EntryArgs,
}

pub fn execute_income(client: &mut Client, cmd: &Command) -> anyhow::Result<()> {
    let id = client.add_income(&cmd.account, &cmd.category, &cmd.entry.entry())?;
    println!("{}", id);

    Ok(())
}

pub fn execute_payout(client: &mut Client, cmd: &Command) -> anyhow::Result<()> {
    let id = client.add_payout(&cmd.account, &cmd.category, &cmd.entry.entry())?;
    println!("{}", id);

    Ok(())
}
