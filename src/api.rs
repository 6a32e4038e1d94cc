use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, span, Level};

use crate::error::{Error, Result};
use crate::model::{Transaction, TransactionType};
use crate::parsing::parse_created_id;
use crate::session::{params, HttpSession};

/// Safety net for a service that never reports its last page.
pub const MAX_TRANSACTION_PAGES: u32 = 500;

/// Filter value meaning "every" for the list endpoint, and "none" when creating.
const ALL: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_login_url() -> String {
    "https://login.sui.com".to_string()
}

fn default_base_url() -> String {
    "https://www.sui.com".to_string()
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            base_url: default_base_url(),
        }
    }
}

impl Endpoints {
    pub fn login(&self, path: &str) -> String {
        format!("{}{}", self.login_url.trim_end_matches('/'), path)
    }

    pub fn base(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Where the money goes. Ids are the service's numeric identifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Income { account: i64 },
    Payout { account: i64 },
    Transfer { seller: i64, buyer: i64 },
}

impl Target {
    pub fn kind(&self) -> TransactionType {
        match self {
            Target::Income { .. } => TransactionType::Income,
            Target::Payout { .. } => TransactionType::Payout,
            Target::Transfer { .. } => TransactionType::Transfer,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub target: Target,
    pub amount: BigDecimal,
    pub time: NaiveDateTime,
    pub memo: String,
    pub category: i64,
    pub store: i64,
    pub project: i64,
    pub member: i64,
}

#[derive(Debug, Deserialize)]
struct TransactionGroup {
    list: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
struct TransactionPage {
    #[serde(rename = "pageNo")]
    page_no: u32,
    #[serde(rename = "pageCount")]
    page_count: u32,
    #[serde(default)]
    groups: Vec<TransactionGroup>,
}

/// One method per service endpoint, all over the same cookie-bearing session.
#[derive(Debug)]
pub struct SuiApi<S> {
    pub(crate) session: S,
    pub(crate) endpoints: Endpoints,
}

impl<S: HttpSession> SuiApi<S> {
    pub fn new(session: S, endpoints: Endpoints) -> Self {
        Self { session, endpoints }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn switch_account_book_by_id(&mut self, id: i64) -> Result<()> {
        let query = params([
            ("opt", "switch".to_owned()),
            ("switchId", id.to_string()),
            ("return", "xxx".to_owned()),
        ]);

        let url = self.endpoints.base("/systemSet/book.do");
        self.session
            .get(&url, &query)?
            .expect_ok("switching account book")?;

        debug!("switched to account book {}", id);

        Ok(())
    }

    pub fn account_book_list(&mut self) -> Result<String> {
        let url = self.endpoints.base("/report_index.do");
        Ok(self
            .session
            .get(&url, &[])?
            .expect_ok("fetching account book list")?
            .body)
    }

    pub fn account_book_meta(&mut self) -> Result<String> {
        let url = self.endpoints.base("/tally/new.do");
        Ok(self
            .session
            .get(&url, &[])?
            .expect_ok("fetching account book meta")?
            .body)
    }

    /// Returns the id the service assigned to the new transaction.
    pub fn create_transaction(&mut self, txn: &NewTransaction) -> Result<String> {
        let mut form = params([
            ("id", "0".to_owned()),
            ("store", txn.store.to_string()),
            ("memo", txn.memo.clone()),
            ("category", txn.category.to_string()),
            ("project", txn.project.to_string()),
            ("member", txn.member.to_string()),
            ("time", txn.time.format("%Y-%m-%d %H:%M").to_string()),
            ("price", txn.amount.to_string()),
        ]);

        let path = match txn.target {
            Target::Income { account } => {
                form.extend(params([("account", account.to_string())]));
                "/tally/income.rmi"
            }
            Target::Payout { account } => {
                form.extend(params([("account", account.to_string())]));
                "/tally/payout.rmi"
            }
            Target::Transfer { seller, buyer } => {
                form.extend(params([
                    ("in_account", seller.to_string()),
                    ("out_account", buyer.to_string()),
                ]));
                "/tally/transfer.rmi"
            }
        };

        let url = self.endpoints.base(path);
        let response = self
            .session
            .post(&url, &form)?
            .expect_ok("creating transaction")?;

        let id = parse_created_id(&response.body)?;
        info!("created {} {} ({})", txn.target.kind(), id, txn.amount);

        Ok(id)
    }

    /// The service answers with free text; it is handed back as is.
    pub fn delete_transactions<I>(&mut self, ids: I) -> Result<String>
    where
        I: IntoIterator,
        I::Item: std::fmt::Display,
    {
        let form = params([
            ("ids", ids.into_iter().join(",")),
            ("opt", "batchDel".to_owned()),
        ]);

        let url = self.endpoints.base("/tally/new.rmi");
        Ok(self
            .session
            .post(&url, &form)?
            .expect_ok("deleting transactions")?
            .body)
    }

    fn transaction_page(&mut self, begin: NaiveDate, end: NaiveDate, page: u32) -> Result<TransactionPage> {
        let form = params([
            ("page", page.to_string()),
            ("opt", "list2".to_owned()),
            ("beginDate", begin.format("%Y.%m.%d").to_string()),
            ("endDate", end.format("%Y.%m.%d").to_string()),
            ("bids", ALL.to_owned()),
            ("cids", ALL.to_owned()),
            ("mids", ALL.to_owned()),
            ("pids", ALL.to_owned()),
            ("sids", ALL.to_owned()),
            ("memids", ALL.to_owned()),
        ]);

        let url = self.endpoints.base("/tally/new.rmi");
        let response = self
            .session
            .post(&url, &form)?
            .expect_ok("listing transactions")?;

        serde_json::from_str(&response.body).map_err(|e| Error::Body {
            context: "listing transactions",
            body: format!("{}: {}", e, response.body),
        })
    }

    /// Every transaction between `begin` and `end`, walking all pages.
    pub fn transactions(&mut self, begin: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        let _span = span!(Level::INFO, "transactions").entered();

        let mut transactions = Vec::new();
        for page in 1..=MAX_TRANSACTION_PAGES {
            let fetched = self.transaction_page(begin, end, page)?;
            debug!("page {}/{}", fetched.page_no, fetched.page_count);

            transactions.extend(fetched.groups.into_iter().flat_map(|g| g.list));

            if fetched.page_no >= fetched.page_count {
                info!("{} transactions in {} pages", transactions.len(), page);
                return Ok(transactions);
            }
        }

        Err(Error::Protocol(format!(
            "transaction list did not end after {} pages",
            MAX_TRANSACTION_PAGES
        )))
    }
}
