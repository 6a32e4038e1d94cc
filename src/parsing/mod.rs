use std::collections::HashMap;

use lazy_static::lazy_static;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::digit1,
    combinator::{map, map_res, opt, rest, value},
    sequence::{preceded, tuple},
    IResult,
};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{AccountBookMeta, Category, TransactionType};

#[cfg(test)]
mod tests;

lazy_static! {
    static ref ANCHOR: Selector = Selector::parse("a").unwrap();
    static ref DIV: Selector = Selector::parse("div").unwrap();
    static ref CATEGORY_PANEL: Selector = Selector::parse("div#panel-category").unwrap();
    static ref FILTER_CHOICES: Selector =
        Selector::parse("div#filter-bar div.fb-choose").unwrap();
    static ref BOOK_LIST: Selector = Selector::parse("ul.s-accountbook-all").unwrap();
    static ref LIST_ITEM: Selector = Selector::parse("li").unwrap();
}

/// Marks the heading anchor of a category group.
const CATEGORY_HEADING_CLASS: &str = "ctit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Store,
    Member,
    Account,
    Project,
}

impl Dimension {
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Store => "store",
            Dimension::Member => "member",
            Dimension::Account => "account",
            Dimension::Project => "project",
        }
    }

    fn panel_id(&self) -> &'static str {
        match self {
            Dimension::Store => "panel-store",
            Dimension::Member => "panel-member",
            Dimension::Account => "panel-account",
            Dimension::Project => "panel-project",
        }
    }

    fn anchor_prefix(&self) -> &'static str {
        match self {
            Dimension::Store => "cSto-",
            Dimension::Member => "cMem-",
            Dimension::Account => "cAcc-",
            Dimension::Project => "cPro-",
        }
    }
}

fn numeric_id(i: &str) -> IResult<&str, i64> {
    map_res(digit1, str::parse)(i)
}

fn category_kind(i: &str) -> IResult<&str, TransactionType> {
    alt((
        value(TransactionType::Payout, tag("out")),
        value(TransactionType::Income, tag("in")),
    ))(i)
}

// cCat-{out|in}-{N}-{suffix}
fn category_anchor(i: &str) -> IResult<&str, (i64, TransactionType)> {
    map(
        tuple((
            tag("cCat-"),
            category_kind,
            tag("-"),
            numeric_id,
            tag("-"),
            rest,
        )),
        |(_, kind, _, id, _, _)| (id, kind),
    )(i)
}

/// `None` for anything that is not a category anchor.
pub fn parse_category_id(id: &str) -> Option<(i64, TransactionType)> {
    category_anchor(id).ok().map(|(_, parsed)| parsed)
}

// c{Sto|Mem|Acc|Pro}-{N}-{suffix}
fn dimension_anchor<'a>(prefix: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, i64> {
    map(
        tuple((tag(prefix), numeric_id, tag("-"), rest)),
        |(_, id, _, _)| id,
    )
}

/// The "(all)" entry heading every dimension panel, `c{Dim}-a`.
fn is_all_anchor(dimension: Dimension, id: &str) -> bool {
    id.strip_prefix(dimension.anchor_prefix()) == Some("a")
}

/// `None` for the "(all)" anchor and anything else without a numeric id.
pub fn parse_dimension_id(dimension: Dimension, id: &str) -> Option<i64> {
    dimension_anchor(dimension.anchor_prefix())(id)
        .ok()
        .map(|(_, parsed)| parsed)
}

// {id:{id:21695292018743},price:100}
fn created_id(i: &str) -> IResult<&str, &str> {
    preceded(opt(tag("{id:{id:")), take_until("},"))(i)
}

/// Pulls the new transaction id out of the body returned by the create endpoints.
pub fn parse_created_id(body: &str) -> Result<String> {
    let unexpected = || Error::Body {
        context: "creating transaction",
        body: body.to_owned(),
    };

    if !body.contains("id:") {
        return Err(unexpected());
    }

    match created_id(body.trim()) {
        Ok((_, id)) if !id.is_empty() => Ok(id.to_owned()),
        _ => Err(unexpected()),
    }
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_owned()
}

fn has_class(element: &ElementRef, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Members of a group carry the heading's id, minus its trailing `-a`, as their class.
fn group_member_ids(heading: &ElementRef, heading_id: &str) -> Vec<i64> {
    let group_class = match heading_id.rfind("-a") {
        Some(end) => &heading_id[..end],
        None => return Vec::new(),
    };

    let container = match heading.parent().and_then(ElementRef::wrap) {
        Some(container) => container,
        None => return Vec::new(),
    };

    container
        .select(&ANCHOR)
        .filter(|a| has_class(a, group_class))
        .filter_map(|a| a.value().id())
        .filter_map(parse_category_id)
        .map(|(id, _)| id)
        .collect()
}

pub fn parse_categories(document: &Html) -> Result<HashMap<String, Category>> {
    let panel = document
        .select(&CATEGORY_PANEL)
        .next()
        .ok_or_else(|| Error::DocumentShape("no category panel".into()))?;

    let mut categories = HashMap::new();
    for anchor in panel.select(&ANCHOR) {
        let anchor_id = match anchor.value().id() {
            Some(anchor_id) => anchor_id,
            None => continue,
        };

        let (id, kind) = match parse_category_id(anchor_id) {
            Some(parsed) => parsed,
            None => {
                debug!("skipping non-category anchor {:?}", anchor_id);
                continue;
            }
        };

        let name = element_text(&anchor);
        let is_sub = has_class(&anchor, CATEGORY_HEADING_CLASS);
        let sub_ids = if is_sub {
            group_member_ids(&anchor, anchor_id)
        } else {
            Vec::new()
        };

        let category = Category {
            id,
            name: name.clone(),
            kind,
            is_sub,
            sub_ids,
        };
        if categories.insert(name.clone(), category).is_some() {
            debug!("category {:?} listed twice, keeping the last", name);
        }
    }

    Ok(categories)
}

pub fn parse_dimension(choices: &ElementRef, dimension: Dimension) -> Result<HashMap<String, i64>> {
    let panel = choices
        .select(&DIV)
        .find(|div| div.value().id() == Some(dimension.panel_id()))
        .ok_or_else(|| Error::DocumentShape(format!("no {} panel", dimension.name())))?;

    let mut ids = HashMap::new();
    for anchor in panel.select(&ANCHOR) {
        let anchor_id = match anchor.value().id() {
            Some(anchor_id) => anchor_id,
            None => continue,
        };

        if is_all_anchor(dimension, anchor_id) {
            continue;
        }

        let id = parse_dimension_id(dimension, anchor_id).ok_or_else(|| {
            Error::DocumentShape(format!("{} anchor id {:?}", dimension.name(), anchor_id))
        })?;

        let name = element_text(&anchor);
        if ids.insert(name.clone(), id).is_some() {
            debug!("{} {:?} listed twice, keeping the last", dimension.name(), name);
        }
    }

    Ok(ids)
}

/// Parses the new-transaction page, which carries every lookup table of the active book.
pub fn parse_account_book_meta(html: &str) -> Result<AccountBookMeta> {
    let document = Html::parse_document(html);

    let categories = parse_categories(&document)?;

    let choices = document
        .select(&FILTER_CHOICES)
        .next()
        .ok_or_else(|| Error::DocumentShape("no filter bar".into()))?;

    Ok(AccountBookMeta {
        categories,
        stores: parse_dimension(&choices, Dimension::Store)?,
        members: parse_dimension(&choices, Dimension::Member)?,
        accounts: parse_dimension(&choices, Dimension::Account)?,
        projects: parse_dimension(&choices, Dimension::Project)?,
    })
}

/// Maps account book titles to their ids.
pub fn parse_account_list(html: &str) -> Result<HashMap<String, i64>> {
    let document = Html::parse_document(html);

    let list = document
        .select(&BOOK_LIST)
        .next()
        .ok_or_else(|| Error::DocumentShape("no account book list".into()))?;

    let mut books = HashMap::new();
    for item in list.select(&LIST_ITEM) {
        let (title, book_id) = match (item.value().attr("title"), item.value().attr("data-bookid")) {
            (Some(title), Some(book_id)) => (title, book_id),
            _ => continue,
        };

        let book_id = book_id
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::DocumentShape(format!("account book id {:?}", book_id)))?;

        books.insert(title.to_owned(), book_id);
    }

    if books.is_empty() {
        return Err(Error::not_found("account book", "(none listed)"));
    }

    Ok(books)
}
