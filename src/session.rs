use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36";

pub type Params = [(String, String)];

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    /// Final URL after any HTTP-level redirects.
    pub url: String,
    pub body: String,
}

impl Response {
    pub fn ok(url: &str, body: &str) -> Self {
        Self {
            status: 200,
            url: url.to_owned(),
            body: body.to_owned(),
        }
    }

    /// Fails with a status error unless the service answered 200.
    pub fn expect_ok(self, context: &'static str) -> Result<Self> {
        if self.status == 200 {
            Ok(self)
        } else {
            Err(Error::Status {
                context,
                status: self.status,
            })
        }
    }
}

/// Cookie-bearing session everything in this crate talks through. Calls take
/// `&mut self` because every exchange mutates the shared cookie jar.
pub trait HttpSession {
    fn get(&mut self, url: &str, query: &Params) -> Result<Response>;

    fn post(&mut self, url: &str, form: &Params) -> Result<Response>;
}

#[derive(Debug)]
pub struct ReqwestSession {
    client: reqwest::blocking::Client,
}

impl ReqwestSession {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    fn read(response: reqwest::blocking::Response) -> Result<Response> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text()?;
        debug!("{} {} ({} bytes)", status, url, body.len());
        Ok(Response { status, url, body })
    }
}

impl HttpSession for ReqwestSession {
    fn get(&mut self, url: &str, query: &Params) -> Result<Response> {
        debug!("GET {}", url);
        Self::read(self.client.get(url).query(query).send()?)
    }

    fn post(&mut self, url: &str, form: &Params) -> Result<Response> {
        debug!("POST {}", url);
        Self::read(self.client.post(url).form(form).send()?)
    }
}

/// Builds owned request parameters from string pairs.
pub fn params<const N: usize>(pairs: [(&str, String); N]) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect()
}
