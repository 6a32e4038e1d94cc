use chrono::NaiveDate;
use clap::Args;

use sui_client::Client;

#[derive(Debug, Args)]
pub struct Command {
    /// First day, YYYY-MM-DD.
    begin: NaiveDate,
    /// Last day, YYYY-MM-DD.
    end: NaiveDate,
    #[arg(short, long)]
    json: bool,
}

pub fn execute_command(client: &mut Client, cmd: &Command) -> anyhow::Result<()> {
    let transactions = client.transactions(cmd.begin, cmd.end)?;

    if cmd.json {
        serde_json::to_writer(std::io::stdout(), &transactions)?;
        return Ok(());
    }

    for tx in transactions.iter() {
        let when = tx
            .date
            .naive_local()
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{:16} {:>14} {:8} {:>10} {:12} {}",
            when, tx.id, tx.kind_name, tx.item_amount, tx.category_name, tx.memo
        );
    }

    Ok(())
}
