use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, span, Level};

use crate::api::{Endpoints, NewTransaction, SuiApi, Target};
use crate::error::Result;
use crate::model::{AccountBook, AccountBookMeta, Transaction};
use crate::parsing::{parse_account_book_meta, parse_account_list};
use crate::session::{HttpSession, ReqwestSession};

/// Everything about a new transaction except where the money goes, by display name.
/// Store, project and member fall back to the service's "none" id when absent.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub amount: BigDecimal,
    pub time: NaiveDateTime,
    pub memo: &'a str,
    pub store: Option<&'a str>,
    pub project: Option<&'a str>,
    pub member: Option<&'a str>,
}

const NONE: i64 = 0;

#[derive(Debug)]
pub struct Client<S = ReqwestSession> {
    api: SuiApi<S>,
    account_book: AccountBook,
}

impl Client<ReqwestSession> {
    pub fn connect(endpoints: Endpoints, user_agent: &str) -> Result<Self> {
        Ok(Self::new(SuiApi::new(ReqwestSession::new(user_agent)?, endpoints)))
    }
}

impl<S: HttpSession> Client<S> {
    pub fn new(api: SuiApi<S>) -> Self {
        Self {
            api,
            account_book: AccountBook::default(),
        }
    }

    pub fn api(&self) -> &SuiApi<S> {
        &self.api
    }

    pub fn account_book(&self) -> &AccountBook {
        &self.account_book
    }

    pub fn meta(&self) -> Result<&AccountBookMeta> {
        self.account_book.meta()
    }

    pub fn login_and_init(&mut self, email: &str, password: &str, account_book: &str) -> Result<()> {
        let _span = span!(Level::INFO, "init").entered();

        self.login(email, password)?;
        self.fetch_account_books()?;
        self.switch_account_book(account_book)?;
        self.fetch_meta()?;

        Ok(())
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<()> {
        self.api.login(email, password)
    }

    pub fn fetch_account_books(&mut self) -> Result<()> {
        let html = self.api.account_book_list()?;
        self.account_book.account_books = parse_account_list(&html)?;
        info!("{} account books", self.account_book.account_books.len());
        Ok(())
    }

    /// The server session's meta changes with the switch, so follow with `fetch_meta`.
    pub fn switch_account_book(&mut self, name: &str) -> Result<()> {
        let id = self.account_book.book_id(name)?;
        self.api.switch_account_book_by_id(id)?;
        self.account_book.set_current(name);
        info!("using account book {:?} ({})", name, id);
        Ok(())
    }

    pub fn fetch_meta(&mut self) -> Result<()> {
        let html = self.api.account_book_meta()?;
        let meta = parse_account_book_meta(&html)?;
        info!(
            "{} categories, {} stores, {} members, {} accounts, {} projects",
            meta.categories.len(),
            meta.stores.len(),
            meta.members.len(),
            meta.accounts.len(),
            meta.projects.len()
        );
        self.account_book.set_meta(meta);
        Ok(())
    }

    fn optional_id(name: Option<&str>, lookup: impl Fn(&str) -> Result<i64>) -> Result<i64> {
        match name {
            Some(name) => lookup(name),
            None => Ok(NONE),
        }
    }

    fn resolve(&self, target: Target, category: Option<&str>, entry: &Entry) -> Result<NewTransaction> {
        let book = &self.account_book;
        Ok(NewTransaction {
            target,
            amount: entry.amount.clone(),
            time: entry.time,
            memo: entry.memo.to_owned(),
            category: Self::optional_id(category, |n| book.category_id(n))?,
            store: Self::optional_id(entry.store, |n| book.store_id(n))?,
            project: Self::optional_id(entry.project, |n| book.project_id(n))?,
            member: Self::optional_id(entry.member, |n| book.member_id(n))?,
        })
    }

    pub fn add_income(&mut self, account: &str, category: &str, entry: &Entry) -> Result<String> {
        let target = Target::Income {
            account: self.account_book.account_id(account)?,
        };
        let txn = self.resolve(target, Some(category), entry)?;
        self.api.create_transaction(&txn)
    }

    pub fn add_payout(&mut self, account: &str, category: &str, entry: &Entry) -> Result<String> {
        let target = Target::Payout {
            account: self.account_book.account_id(account)?,
        };
        let txn = self.resolve(target, Some(category), entry)?;
        self.api.create_transaction(&txn)
    }

    pub fn add_transfer(&mut self, seller: &str, buyer: &str, entry: &Entry) -> Result<String> {
        let target = Target::Transfer {
            seller: self.account_book.account_id(seller)?,
            buyer: self.account_book.account_id(buyer)?,
        };
        let txn = self.resolve(target, None, entry)?;
        self.api.create_transaction(&txn)
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<String> {
        self.api.delete_transactions([id])
    }

    pub fn delete_transactions(&mut self, ids: &[String]) -> Result<String> {
        self.api.delete_transactions(ids)
    }

    pub fn transactions(&mut self, begin: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        self.api.transactions(begin, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::session::testing::ScriptedSession;
    use crate::session::Response;

    const BASE: &str = "https://www.example.com";

    const BOOKS: &str = r#"<ul class="s-accountbook-all">
  <li title="Household" data-bookid="1001"></li>
  <li title="Travel" data-bookid="1002"></li>
</ul>"#;

    const META: &str = r#"<html><body>
<div id="panel-category"><ul><li>
  <a id="cCat-out-100-a" class="ctit">Food</a>
  <a id="cCat-out-102-b" class="cCat-out-100">Lunch</a>
</li><li>
  <a id="cCat-in-300-a" class="ctit">Salary</a>
</li></ul></div>
<div id="filter-bar"><div class="fb-choose">
  <div id="panel-store"><a id="cSto-a">(all)</a><a id="cSto-7001-s">Bakery</a></div>
  <div id="panel-member"><a id="cMem-a">(all)</a><a id="cMem-8001-m">Me</a></div>
  <div id="panel-account"><a id="cAcc-9001-c">Cash</a><a id="cAcc-9002-c">Checking</a></div>
  <div id="panel-project"><a id="cPro-a">(all)</a><a id="cPro-6001-p">Trip</a></div>
</div></div>
</body></html>"#;

    fn client(responses: Vec<Response>) -> Client<ScriptedSession> {
        Client::new(SuiApi::new(
            ScriptedSession::new(responses),
            Endpoints {
                login_url: "https://login.example.com".into(),
                base_url: BASE.into(),
            },
        ))
    }

    fn ready(mut responses: Vec<Response>) -> Result<Client<ScriptedSession>> {
        let mut script = vec![
            Response::ok(BASE, BOOKS),
            Response::ok(BASE, ""),
            Response::ok(BASE, META),
        ];
        script.append(&mut responses);

        let mut client = client(script);
        client.fetch_account_books()?;
        client.switch_account_book("Travel")?;
        client.fetch_meta()?;
        Ok(client)
    }

    fn entry() -> Entry<'static> {
        Entry {
            amount: BigDecimal::from(25),
            time: NaiveDate::from_ymd_opt(2023, 5, 2)
                .unwrap()
                .and_hms_opt(19, 30, 0)
                .unwrap(),
            memo: "dinner",
            store: None,
            project: None,
            member: None,
        }
    }

    #[test]
    fn test_login_and_init() -> Result<()> {
        let mut client = client(vec![
            Response::ok(BASE, r#"{"vccode": "VC", "uid": "7"}"#),
            Response::ok(BASE, r#"{"status": "ok"}"#),
            Response::ok(BASE, "<html><body></body></html>"),
            Response::ok(BASE, BOOKS),
            Response::ok(BASE, ""),
            Response::ok(BASE, META),
        ]);
        client.login_and_init("me@example.com", "secret", "Household")?;

        assert_eq!(client.account_book().current(), Some("Household"));
        assert_eq!(client.meta()?.accounts["Checking"], 9002);
        assert_eq!(client.api().session().requests[4].param("switchId"), Some("1001"));
        Ok(())
    }

    #[test]
    fn test_switch_to_unknown_book() -> Result<()> {
        let mut client = client(vec![Response::ok(BASE, BOOKS)]);
        client.fetch_account_books()?;

        assert!(matches!(
            client.switch_account_book("Business"),
            Err(Error::NotFound { kind: "account book", .. })
        ));
        assert_eq!(client.account_book().current(), None);
        assert_eq!(client.api().session().requests.len(), 1);
        Ok(())
    }

    #[test]
    fn test_add_payout_resolves_names() -> Result<()> {
        let mut client = ready(vec![Response::ok(BASE, "{id:{id:42},price:25}")])?;
        let id = client.add_payout(
            "Cash",
            "Lunch",
            &Entry {
                store: Some("Bakery"),
                member: Some("Me"),
                ..entry()
            },
        )?;
        assert_eq!(id, "42");

        let request = client.api().session().requests.last().unwrap();
        assert_eq!(request.url, format!("{}/tally/payout.rmi", BASE));
        assert_eq!(request.param("account"), Some("9001"));
        assert_eq!(request.param("category"), Some("102"));
        assert_eq!(request.param("store"), Some("7001"));
        assert_eq!(request.param("member"), Some("8001"));
        assert_eq!(request.param("project"), Some("0"));
        Ok(())
    }

    #[test]
    fn test_add_income() -> Result<()> {
        let mut client = ready(vec![Response::ok(BASE, "{id:{id:43},price:25}")])?;
        client.add_income(
            "Checking",
            "Salary",
            &Entry {
                project: Some("Trip"),
                ..entry()
            },
        )?;

        let request = client.api().session().requests.last().unwrap();
        assert_eq!(request.url, format!("{}/tally/income.rmi", BASE));
        assert_eq!(request.param("account"), Some("9002"));
        assert_eq!(request.param("category"), Some("300"));
        assert_eq!(request.param("project"), Some("6001"));
        Ok(())
    }

    #[test]
    fn test_add_transfer() -> Result<()> {
        let mut client = ready(vec![Response::ok(BASE, "{id:{id:44},price:25}")])?;
        client.add_transfer("Cash", "Checking", &entry())?;

        let request = client.api().session().requests.last().unwrap();
        assert_eq!(request.url, format!("{}/tally/transfer.rmi", BASE));
        assert_eq!(request.param("in_account"), Some("9001"));
        assert_eq!(request.param("out_account"), Some("9002"));
        assert_eq!(request.param("category"), Some("0"));
        Ok(())
    }

    #[test]
    fn test_unknown_store_sends_nothing() -> Result<()> {
        let mut client = ready(Vec::new())?;
        let result = client.add_payout(
            "Cash",
            "Lunch",
            &Entry {
                store: Some("Nowhere"),
                ..entry()
            },
        );

        assert!(matches!(result, Err(Error::NotFound { kind: "store", .. })));
        assert_eq!(client.api().session().requests.len(), 3);
        Ok(())
    }

    #[test]
    fn test_add_before_meta() {
        let mut client = client(Vec::new());
        assert!(matches!(
            client.add_payout("Cash", "Lunch", &entry()),
            Err(Error::MetaNotLoaded)
        ));
    }

    #[test]
    fn test_delete_transaction() -> Result<()> {
        let mut client = client(vec![Response::ok(BASE, "ok")]);
        client.delete_transaction("42")?;

        let request = &client.api().session().requests[0];
        assert_eq!(request.param("ids"), Some("42"));
        Ok(())
    }
}
