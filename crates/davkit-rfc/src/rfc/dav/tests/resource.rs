//! Resource model tests driven from parsed response bodies.

use super::fixtures::{CAL_DEPTH_ONE, SYNC_REPORT, multistatus, response};
use crate::rfc::dav::core::{QName, Status, dav_names};
use crate::rfc::dav::model::{build_children, build_result, build_single};
use crate::rfc::dav::parse::{MultistatusError, parse_multistatus};

#[test_log::test]
fn depth_one_children_exclude_the_collection() {
    let parsed = parse_multistatus(CAL_DEPTH_ONE.as_bytes()).unwrap();
    let children = build_children(parsed, "/cal/");

    let uris: Vec<_> = children.iter().map(|c| c.uri.as_str()).collect();
    assert_eq!(uris, vec!["/cal/a.ics", "/cal/b.ics"]);

    assert_eq!(children[0].etag().as_deref(), Some("\"e1\""));
    assert!(!children[0].is_collection);

    let etag = children[1].find_property(&dav_names::getetag()).unwrap();
    assert_eq!(etag.status, Status::NOT_FOUND);
    assert_eq!(children[1].etag(), None);
}

#[test_log::test]
fn encoded_hash_and_question_mark_are_members() {
    let responses = [
        response("/cal/"),
        response("/cal/%23notes.ics"),
        response("http://example.com/cal/%3Fq.ics"),
    ];
    let body = multistatus(&responses.concat());
    let children = build_children(parse_multistatus(body.as_bytes()).unwrap(), "/cal/");

    let paths: Vec<_> = children.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(paths, vec!["/cal/#notes.ics", "/cal/?q.ics"]);
    assert_eq!(children[1].uri, "http://example.com/cal/?q.ics");
}

#[test_log::test]
fn collection_marker() {
    let parsed = parse_multistatus(CAL_DEPTH_ONE.as_bytes()).unwrap();
    let result = build_result(parsed);

    let cal = &result.children[0];
    assert!(cal.is_collection);
    assert!(cal.has_resource_type(&QName::caldav("calendar")));
    assert_eq!(cal.display_name.as_deref(), Some("Calendar"));
    assert!(cal.find_property(&dav_names::resourcetype()).is_none());

    assert!(!result.children[1].is_collection);
    assert!(!result.children[2].is_collection);
}

#[test_log::test]
fn every_response_becomes_a_child() {
    for n in 0..5 {
        let body: String = (0..n).map(|i| response(&format!("/c/{i}"))).collect();
        let parsed = parse_multistatus(multistatus(&body).as_bytes()).unwrap();

        let children = build_children(parsed.clone(), "/elsewhere/");
        assert_eq!(children.len(), n);
        for (i, child) in children.iter().enumerate() {
            assert_eq!(child.uri, format!("/c/{i}"));
        }

        let without_parent = build_children(parsed, "/c/0");
        assert_eq!(without_parent.len(), n.saturating_sub(1));
    }
}

#[test_log::test]
fn sync_result_keeps_token_and_removals() {
    let parsed = parse_multistatus(SYNC_REPORT.as_bytes()).unwrap();
    let result = build_result(parsed);

    assert_eq!(
        result.sync_token.as_deref(),
        Some("http://example.com/sync/abc123")
    );
    let removed: Vec<_> = result.removed().map(|c| c.uri.as_str()).collect();
    assert_eq!(removed, vec!["/cal/old.ics"]);
    let changed: Vec<_> = result.changed().map(|c| c.uri.as_str()).collect();
    assert_eq!(changed, vec!["/cal/new.ics"]);
}

#[test_log::test]
fn single_resource_must_be_unique() {
    let two = multistatus(&format!("{}{}", response("/a"), response("/b")));
    let parsed = parse_multistatus(two.as_bytes()).unwrap();
    assert_eq!(
        build_single(parsed).unwrap_err(),
        MultistatusError::MultipleResponsesForSingleResource { count: 2 }
    );

    let one = multistatus(&response("/a"));
    let child = build_single(parse_multistatus(one.as_bytes()).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(child.uri, "/a");
    assert_eq!(child.display_name.as_deref(), Some("/a"));
}
