use super::*;
use serde_json::json;

#[test]
fn literal_and_param_segments() {
    let p = RoutePattern::parse("/details/:id").unwrap();
    assert_eq!(p.matches("/details/42").unwrap()["id"], json!("42"));
    assert!(p.matches("/details").is_none());
    assert!(p.matches("/details/42/more").is_none());
    assert!(p.matches("/other/42").is_none());
}

#[test]
fn root_matches_only_root() {
    let p = RoutePattern::parse("/").unwrap();
    assert!(p.matches("/").is_some());
    assert!(p.matches("").is_some());
    assert!(p.matches("/a").is_none());
}

#[test]
fn trailing_wildcard_captures_rest() {
    let p = RoutePattern::parse("/files/*").unwrap();
    assert_eq!(p.matches("/files/a/b.txt").unwrap()["*"], json!("a/b.txt"));
    assert_eq!(p.matches("/files").unwrap()["*"], json!(""));
}

#[test]
fn invalid_patterns_are_config_errors() {
    assert!(RoutePattern::parse("details").is_err());
    assert!(RoutePattern::parse("/a/*/b").is_err());
    assert!(RoutePattern::parse("/a/:").is_err());
}

#[test]
fn query_is_ignored_by_matching_and_parsed_into_params() {
    let p = RoutePattern::parse("/search").unwrap();
    assert!(p.matches("/search?q=rust").is_some());

    let (_, query) = split_query("/search?q=rust&page=2&exact=true&empty");
    let params = parse_query(query.unwrap());
    assert_eq!(params["q"], json!("rust"));
    assert_eq!(params["page"], json!(2));
    assert_eq!(params["exact"], json!(true));
    assert_eq!(params["empty"], json!(""));
}

#[test]
fn entry_params_merge() {
    let mut e = RouteEntry {
        pattern: Some("/d/:id".into()),
        resolved_pathname: "/d/1".into(),
        ..RouteEntry::default()
    };
    e.set_params(parse_query("id=1&tab=info"));
    let mut more = Params::new();
    more.insert("tab".into(), json!("photos"));
    e.set_params(more);
    assert_eq!(e.param("id").as_deref(), Some("1"));
    assert_eq!(e.param("tab").as_deref(), Some("photos"));
}
