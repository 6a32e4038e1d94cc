use clap::Args;
use itertools::Itertools;

use sui_client::Client;

#[derive(Debug, Args)]
pub struct Command {}

pub fn execute_command(client: &Client, _cmd: &Command) -> anyhow::Result<()> {
    let books = &client.account_book().account_books;
    if let Some(width) = books.keys().map(|k| k.chars().count()).max() {
        for (name, id) in books.iter().sorted() {
            println!("{:width$} {}", name, id, width = width);
        }
    }

    Ok(())
}
