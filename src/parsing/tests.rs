use super::*;

const META_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>new</title></head>
<body>
<div id="panel-category">
  <div class="cat-out">
    <ul>
      <li>
        <a id="cCat-out-100-a" class="ctit" href="#">Food</a>
        <a id="cCat-out-101-b" class="cCat-out-100" href="#">Breakfast</a>
        <a id="cCat-out-102-b" class="cCat-out-100" href="#">Lunch</a>
      </li>
      <li>
        <a id="cCat-out-200-a" class="ctit" href="#">Transport</a>
        <a id="cCat-out-201-b" class="cCat-out-200" href="#">Bus</a>
        <a id="cCat-out-202-b" class="cCat-out-200" href="#">Taxi</a>
      </li>
    </ul>
  </div>
  <div class="cat-in">
    <ul>
      <li>
        <a id="cCat-in-300-a" class="ctit" href="#">Salary</a>
        <a id="cCat-in-301-b" class="cCat-in-300" href="#">Bonus</a>
      </li>
    </ul>
  </div>
  <a id="cat-manage" href="/category.do">Manage</a>
</div>
<div id="filter-bar">
  <div class="fb-choose">
    <div id="panel-store">
      <a id="cSto-a" href="#">(all)</a>
      <a id="cSto-7001-s" href="#">Supermarket</a>
      <a id="cSto-7002-s" href="#">Bakery</a>
    </div>
    <div id="panel-member">
      <a id="cMem-a" href="#">(all)</a>
      <a id="cMem-8001-m" href="#">Me</a>
    </div>
    <div id="panel-account">
      <a id="cAcc-a" href="#">(all)</a>
      <a id="cAcc-9001-c" href="#">Cash</a>
      <a id="cAcc-9002-c" href="#">Checking</a>
      <a id="cAcc-9003-c" href="#">Credit Card</a>
    </div>
    <div id="panel-project">
      <a id="cPro-a" href="#">(all)</a>
    </div>
  </div>
</div>
</body>
</html>
"##;

const BOOK_LIST_PAGE: &str = r##"<html><body>
<ul class="s-accountbook-all">
  <li title="Household" data-bookid="1001"><a href="#">Household</a></li>
  <li title="Travel" data-bookid="1002"><a href="#">Travel</a></li>
  <li class="add"><a href="#">New book</a></li>
</ul>
</body></html>"##;

#[test]
fn test_parse_category_id_payout() {
    assert_eq!(
        parse_category_id("cCat-out-123-a"),
        Some((123, TransactionType::Payout))
    );
}

#[test]
fn test_parse_category_id_income() {
    assert_eq!(
        parse_category_id("cCat-in-45-b"),
        Some((45, TransactionType::Income))
    );
}

#[test]
fn test_parse_category_id_other_prefix() {
    assert_eq!(parse_category_id("cSto-123-a"), None);
    assert_eq!(parse_category_id("cCat-transfer-1-a"), None);
    assert_eq!(parse_category_id("cat-manage"), None);
    assert_eq!(parse_category_id(""), None);
}

#[test]
fn test_parse_category_id_needs_suffix() {
    assert_eq!(parse_category_id("cCat-out-123"), None);
}

#[test]
fn test_parse_dimension_id() {
    assert_eq!(parse_dimension_id(Dimension::Store, "cSto-7001-s"), Some(7001));
    assert_eq!(parse_dimension_id(Dimension::Member, "cMem-8-x"), Some(8));
    assert_eq!(parse_dimension_id(Dimension::Account, "cAcc-9-x"), Some(9));
    assert_eq!(parse_dimension_id(Dimension::Project, "cPro-10-x"), Some(10));
}

#[test]
fn test_parse_dimension_id_all_sentinel() {
    assert_eq!(parse_dimension_id(Dimension::Store, "cSto-a"), None);
    assert_eq!(parse_dimension_id(Dimension::Project, "cPro-a"), None);
}

#[test]
fn test_parse_dimension_id_wrong_dimension() {
    assert_eq!(parse_dimension_id(Dimension::Store, "cAcc-9-x"), None);
}

#[test]
fn test_parse_created_id() -> Result<()> {
    assert_eq!(
        parse_created_id("{id:{id:21695292018743},price:100}")?,
        "21695292018743"
    );

    Ok(())
}

#[test]
fn test_parse_created_id_missing_marker() {
    match parse_created_id("{error:'session expired'}") {
        Err(err) => assert!(err.is_transport()),
        Ok(id) => panic!("unexpected id {:?}", id),
    }
}

#[test]
fn test_parse_created_id_unterminated() {
    assert!(parse_created_id("{id:{id:123").is_err());
}

#[test]
fn test_parse_meta_category_count() -> Result<()> {
    let meta = parse_account_book_meta(META_PAGE)?;

    // Three headings and five group members, the manage link is not a category.
    assert_eq!(meta.categories.len(), 3 + 5);
    assert!(!meta.categories.contains_key("Manage"));

    Ok(())
}

#[test]
fn test_parse_meta_category_groups() -> Result<()> {
    let meta = parse_account_book_meta(META_PAGE)?;

    let food = &meta.categories["Food"];
    assert_eq!(food.id, 100);
    assert_eq!(food.kind, TransactionType::Payout);
    assert!(food.is_sub);
    assert_eq!(food.sub_ids, vec![101, 102]);

    let lunch = &meta.categories["Lunch"];
    assert_eq!(lunch.id, 102);
    assert!(!lunch.is_sub);
    assert!(lunch.sub_ids.is_empty());

    let salary = &meta.categories["Salary"];
    assert_eq!(salary.kind, TransactionType::Income);
    assert_eq!(salary.sub_ids, vec![301]);

    for (heading, members) in [("Food", ["Breakfast", "Lunch"]), ("Transport", ["Bus", "Taxi"])] {
        for member in members {
            assert!(meta.categories[heading]
                .sub_ids
                .contains(&meta.categories[member].id));
        }
    }

    Ok(())
}

#[test]
fn test_parse_meta_dimensions() -> Result<()> {
    let meta = parse_account_book_meta(META_PAGE)?;

    assert_eq!(meta.stores.len(), 2);
    assert_eq!(meta.stores["Supermarket"], 7001);
    assert!(!meta.stores.contains_key("(all)"));
    assert_eq!(meta.members["Me"], 8001);
    assert_eq!(meta.accounts.len(), 3);
    assert_eq!(meta.accounts["Credit Card"], 9003);
    assert!(meta.projects.is_empty());

    Ok(())
}

#[test]
fn test_parse_meta_duplicate_names_keep_last() -> Result<()> {
    let html = META_PAGE.replace(">Bakery<", ">Supermarket<");
    let meta = parse_account_book_meta(&html)?;

    assert_eq!(meta.stores.len(), 1);
    assert_eq!(meta.stores["Supermarket"], 7002);

    Ok(())
}

#[test]
fn test_parse_meta_malformed_dimension_id() {
    let html = META_PAGE.replace("cAcc-9002-c", "cAcc-x9002-c");
    match parse_account_book_meta(&html) {
        Err(Error::DocumentShape(message)) => assert!(message.contains("cAcc-x9002-c")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_is_all_anchor() {
    assert!(is_all_anchor(Dimension::Store, "cSto-a"));
    assert!(!is_all_anchor(Dimension::Store, "cMem-a"));
    assert!(!is_all_anchor(Dimension::Account, "cAcc-a-1"));
}

#[test]
fn test_parse_meta_missing_category_panel() {
    let html = META_PAGE.replace("panel-category", "panel-elsewhere");
    assert!(matches!(
        parse_account_book_meta(&html),
        Err(Error::DocumentShape(_))
    ));
}

#[test]
fn test_parse_meta_missing_dimension_panel() {
    let html = META_PAGE.replace("panel-member", "panel-people");
    match parse_account_book_meta(&html) {
        Err(Error::DocumentShape(message)) => assert!(message.contains("member")),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_parse_account_list() -> Result<()> {
    let books = parse_account_list(BOOK_LIST_PAGE)?;

    assert_eq!(books.len(), 2);
    assert_eq!(books["Household"], 1001);
    assert_eq!(books["Travel"], 1002);

    Ok(())
}

#[test]
fn test_parse_account_list_empty() {
    let html = r#"<ul class="s-accountbook-all"></ul>"#;
    assert!(matches!(
        parse_account_list(html),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_parse_account_list_missing() {
    assert!(matches!(
        parse_account_list("<html><body><p>maintenance</p></body></html>"),
        Err(Error::DocumentShape(_))
    ));
}
