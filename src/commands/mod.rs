use bigdecimal::BigDecimal;
use chrono::{Local, NaiveDateTime};
use clap::Args;

use sui_client::Entry;

pub mod add;
pub mod books;
pub mod delete;
pub mod list;
pub mod meta;
pub mod transfer;

/// Options shared by every command that creates a transaction.
#[derive(Debug, Args)]
pub struct EntryArgs {
    amount: BigDecimal,
    #[arg(short, long, default_value = "")]
    memo: String,
    /// Defaults to now, format "YYYY-MM-DD HH:MM".
    #[arg(short, long, value_parser = parse_time)]
    time: Option<NaiveDateTime>,
    #[arg(long)]
    store: Option<String>,
    #[arg(long)]
    project: Option<String>,
    #[arg(long)]
    member: Option<String>,
}

impl EntryArgs {
    pub fn entry(&self) -> Entry<'_> {
        Entry {
            amount: self.amount.clone(),
            time: self.time.unwrap_or_else(|| Local::now().naive_local()),
            memo: &self.memo,
            store: self.store.as_deref(),
            project: self.project.as_deref(),
            member: self.member.as_deref(),
        }
    }
}

fn parse_time(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M")
}
