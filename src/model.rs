use std::collections::HashMap;

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Income,
    Payout,
    Transfer,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => f.pad("income"),
            TransactionType::Payout => f.pad("payout"),
            TransactionType::Transfer => f.pad("transfer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TransactionType,
    /// Set on the heading anchors of a category group.
    pub is_sub: bool,
    pub sub_ids: Vec<i64>,
}

/// One parse of the metadata page. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountBookMeta {
    pub categories: HashMap<String, Category>,
    pub stores: HashMap<String, i64>,
    pub members: HashMap<String, i64>,
    pub accounts: HashMap<String, i64>,
    pub projects: HashMap<String, i64>,
}

#[derive(Debug, Default)]
pub struct AccountBook {
    pub account_books: HashMap<String, i64>,
    current: Option<String>,
    meta: Option<AccountBookMeta>,
}

impl AccountBook {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn set_current(&mut self, name: &str) {
        self.current = Some(name.to_owned());
    }

    pub fn meta(&self) -> Result<&AccountBookMeta> {
        self.meta.as_ref().ok_or(Error::MetaNotLoaded)
    }

    pub fn set_meta(&mut self, meta: AccountBookMeta) {
        self.meta = Some(meta);
    }

    pub fn book_id(&self, name: &str) -> Result<i64> {
        self.account_books
            .get(name)
            .copied()
            .ok_or_else(|| Error::not_found("account book", name))
    }

    pub fn account_id(&self, name: &str) -> Result<i64> {
        lookup(&self.meta()?.accounts, "account", name)
    }

    pub fn category_id(&self, name: &str) -> Result<i64> {
        self.meta()?
            .categories
            .get(name)
            .map(|c| c.id)
            .ok_or_else(|| Error::not_found("category", name))
    }

    pub fn store_id(&self, name: &str) -> Result<i64> {
        lookup(&self.meta()?.stores, "store", name)
    }

    pub fn member_id(&self, name: &str) -> Result<i64> {
        lookup(&self.meta()?.members, "member", name)
    }

    pub fn project_id(&self, name: &str) -> Result<i64> {
        lookup(&self.meta()?.projects, "project", name)
    }
}

fn lookup(ids: &HashMap<String, i64>, kind: &'static str, name: &str) -> Result<i64> {
    ids.get(name)
        .copied()
        .ok_or_else(|| Error::not_found(kind, name))
}

/// The service serializes dates the way `java.util.Date` does.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuiDate {
    /// Day of month.
    pub date: u32,
    /// Day of week, Sunday is 0.
    pub day: u32,
    pub hours: u32,
    pub minutes: u32,
    /// Zero based.
    pub month: u32,
    pub seconds: u32,
    /// Milliseconds since the epoch.
    pub time: i64,
    pub timezone_offset: i32,
    /// Years since 1900.
    pub year: i32,
}

impl SuiDate {
    pub fn epoch_millis(&self) -> i64 {
        self.time
    }

    pub fn naive_local(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year + 1900, self.month + 1, self.date)?;
        let time = NaiveTime::from_hms_opt(self.hours, self.minutes, self.seconds)?;
        Some(NaiveDateTime::new(date, time))
    }
}

/// The service sends `null` for fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "tranId")]
    pub id: i64,
    #[serde(rename = "tranType")]
    pub kind: i32,
    #[serde(rename = "tranName", default, deserialize_with = "null_as_default")]
    pub kind_name: String,
    pub date: SuiDate,
    #[serde(rename = "itemAmount")]
    pub item_amount: BigDecimal,
    #[serde(rename = "currencyAmount", default, deserialize_with = "null_as_default")]
    pub currency_amount: BigDecimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub account: i64,
    #[serde(rename = "categoryId", default, deserialize_with = "null_as_default")]
    pub category_id: i64,
    #[serde(rename = "categoryName", default, deserialize_with = "null_as_default")]
    pub category_name: String,
    #[serde(rename = "categoryIcon", default, deserialize_with = "null_as_default")]
    pub category_icon: String,
    #[serde(rename = "sId", default, deserialize_with = "null_as_default")]
    pub store: String,
    #[serde(rename = "transferStoreId", default, deserialize_with = "null_as_default")]
    pub transfer_store_id: i64,
    #[serde(rename = "memberId", default, deserialize_with = "null_as_default")]
    pub member_id: i64,
    #[serde(rename = "memberName", default, deserialize_with = "null_as_default")]
    pub member_name: String,
    #[serde(rename = "projectId", default, deserialize_with = "null_as_default")]
    pub project_id: i64,
    #[serde(rename = "projectName", default, deserialize_with = "null_as_default")]
    pub project_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relation: String,
    #[serde(rename = "imgId", default, deserialize_with = "null_as_default")]
    pub img_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(rename = "sellerAcount", default)]
    pub seller_account: Option<String>,
    #[serde(rename = "sellerAcountId", default)]
    pub seller_account_id: Option<i64>,
    #[serde(rename = "buyerAcount", default)]
    pub buyer_account: Option<String>,
    #[serde(rename = "buyerAcountId", default)]
    pub buyer_account_id: Option<i64>,
}
