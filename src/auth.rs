use lazy_static::lazy_static;
use reqwest::Url;
use scraper::{Html, Selector};
use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::{debug, info, span, Level};

use crate::api::SuiApi;
use crate::error::{Error, Lock, Result};
use crate::session::{params, HttpSession, Params, Response};

/// Hops allowed after the initial request to the auth endpoint.
pub const MAX_AUTH_REDIRECTS: usize = 5;

const AUTO_SUBMIT: &str = "document.forms[0].submit()";

lazy_static! {
    static ref BODY: Selector = Selector::parse("body").unwrap();
    static ref FORM: Selector = Selector::parse("form").unwrap();
    static ref INPUT: Selector = Selector::parse("input").unwrap();
}

/// Challenge issued by the login endpoint, good for one password check.
#[derive(Debug, Clone, PartialEq)]
pub struct VcCode {
    pub code: String,
    pub uid: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    Get,
    Post,
}

/// An auto-submitting form, the service's way of chaining auth steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub method: Method,
    pub action: String,
    pub data: Vec<(String, String)>,
}

fn hex_sha1(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// sha1(sha1(email + sha1(password)) + vccode), lowercase hex at every step.
pub fn password_digest(email: &str, password: &str, vccode: &str) -> String {
    let digest = hex_sha1(password);
    let digest = hex_sha1(&format!("{}{}", email, digest));
    hex_sha1(&format!("{}{}", digest, vccode))
}

fn json_field<'a>(json: &'a Value, field: &str) -> Result<&'a Value> {
    json.get(field)
        .ok_or_else(|| Error::Protocol(format!("missing {:?} in login response", field)))
}

fn json_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_json(body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| Error::Protocol(format!("login response is not json ({}): {}", e, body)))
}

pub fn parse_vccode(body: &str) -> Result<VcCode> {
    let json = parse_json(body)?;
    Ok(VcCode {
        code: json_string(json_field(&json, "vccode")?),
        uid: json_string(json_field(&json, "uid")?),
    })
}

/// Maps the login status onto the error taxonomy.
pub fn check_login_status(status: &str) -> Result<()> {
    match status {
        "ok" => Ok(()),
        "no" => Err(Error::InvalidCredentials),
        "lock" => Err(Error::AccountLocked(Lock::Temporary)),
        "lock-status" => Err(Error::AccountLocked(Lock::Permanent)),
        other => Err(Error::Protocol(format!("unknown login status: {}", other))),
    }
}

fn parse_method(method: Option<&str>) -> Result<Method> {
    match method.map(|m| m.trim().to_ascii_uppercase()) {
        None => Ok(Method::Get),
        Some(m) if m == "GET" => Ok(Method::Get),
        Some(m) if m == "POST" => Ok(Method::Post),
        Some(m) => Err(Error::Protocol(format!("unknown form method: {}", m))),
    }
}

/// `None` once a page no longer submits itself on load, which ends the chain.
pub fn find_auto_submit(html: &str) -> Result<Option<Redirect>> {
    let document = Html::parse_document(html);

    let onload = document
        .select(&BODY)
        .next()
        .and_then(|body| body.value().attr("onload"));
    if onload.map(str::trim) != Some(AUTO_SUBMIT) {
        return Ok(None);
    }

    let form = document
        .select(&FORM)
        .next()
        .ok_or_else(|| Error::DocumentShape("auto-submit page without a form".into()))?;

    let action = form
        .value()
        .attr("action")
        .ok_or_else(|| Error::DocumentShape("auto-submit form without an action".into()))?;

    let data = form
        .select(&INPUT)
        .filter_map(|input| {
            let input = input.value();
            input
                .attr("name")
                .map(|name| (name.to_owned(), input.attr("value").unwrap_or("").to_owned()))
        })
        .collect();

    Ok(Some(Redirect {
        method: parse_method(form.value().attr("method"))?,
        action: action.to_owned(),
        data,
    }))
}

fn resolve(base: &str, action: &str) -> Result<String> {
    let base = Url::parse(base).map_err(|e| Error::Protocol(format!("bad url {}: {}", base, e)))?;
    let joined = base
        .join(action)
        .map_err(|e| Error::Protocol(format!("bad form action {}: {}", action, e)))?;
    Ok(joined.to_string())
}

impl<S: HttpSession> SuiApi<S> {
    /// Leaves the session authenticated. Nothing is returned, the cookies are the result.
    pub fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let _span = span!(Level::INFO, "login").entered();

        let vccode = self.vccode()?;
        self.verify_user(&vccode, email, password)?;
        self.follow_auth_redirects()?;

        info!("logged in as {}", email);

        Ok(())
    }

    fn vccode(&mut self) -> Result<VcCode> {
        let url = self.endpoints.login("/login.do");
        let response = self
            .session
            .get(&url, &params([("opt", "vccode".to_owned())]))?
            .expect_ok("requesting vccode")?;

        parse_vccode(&response.body)
    }

    fn verify_user(&mut self, vccode: &VcCode, email: &str, password: &str) -> Result<()> {
        let query = params([
            ("email", email.to_owned()),
            // Stay logged in.
            ("status", "1".to_owned()),
            ("password", password_digest(email, password, &vccode.code)),
            ("uid", vccode.uid.clone()),
        ]);

        let url = self.endpoints.login("/login.do");
        let response = self
            .session
            .get(&url, &query)?
            .expect_ok("verifying user")?;

        let json = parse_json(&response.body)?;
        let status = json_field(&json, "status")?;

        check_login_status(&json_string(status))
    }

    fn send(&mut self, method: Method, url: &str, data: &Params) -> Result<Response> {
        match method {
            Method::Get => self.session.get(url, data),
            Method::Post => self.session.post(url, data),
        }
    }

    fn follow_auth_redirects(&mut self) -> Result<()> {
        let mut method = Method::Get;
        let mut url = self.endpoints.login("/auth.do");
        let mut data = Vec::new();
        let mut hops = 0;

        loop {
            info!("auth hop {}: {:?} {}", hops, method, url);
            debug!("auth hop {} data: {:?}", hops, data);

            let response = self.send(method, &url, &data)?;

            let redirect = match find_auto_submit(&response.body)? {
                Some(redirect) => redirect,
                None => return Ok(()),
            };

            hops += 1;
            if hops > MAX_AUTH_REDIRECTS {
                return Err(Error::TooManyRedirects { hops });
            }

            method = redirect.method;
            url = resolve(&response.url, &redirect.action)?;
            data = redirect.data;
        }
    }
}
