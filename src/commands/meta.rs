use std::collections::HashMap;

use clap::Args;
use itertools::Itertools;

use sui_client::Client;

#[derive(Debug, Args)]
pub struct Command {}

fn print_ids(title: &str, ids: &HashMap<String, i64>) {
    println!("{}:", title);
    for (name, id) in ids.iter().sorted() {
        println!("  {:<24} {}", name, id);
    }
}

pub fn execute_command(client: &Client, _cmd: &Command) -> anyhow::Result<()> {
    let meta = client.meta()?;

    println!("categories:");
    for category in meta.categories.values().sorted_by_key(|c| (c.kind.to_string(), c.id)) {
        let marker = if category.is_sub { "+" } else { " " };
        println!(
            "{} {:<22} {:<8} {}",
            marker, category.name, category.kind, category.id
        );
    }

    print_ids("stores", &meta.stores);
    print_ids("members", &meta.members);
    print_ids("accounts", &meta.accounts);
    print_ids("projects", &meta.projects);

    Ok(())
}
