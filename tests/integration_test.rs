use mockito::{Server, ServerGuard};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;

use sws::api::client::parse_document;
use sws::api::{Credentials, Request, SwsClient};
use sws::config::ClientConfig;
use sws::error::SwsError;

fn config(server: &ServerGuard, cache: &TempDir) -> ClientConfig {
    ClientConfig {
        base_url: format!("{}/student/v5/", server.url()),
        cache_dir: cache.path().to_path_buf(),
        ..Default::default()
    }
}

fn client(server: &ServerGuard, cache: &TempDir) -> SwsClient {
    SwsClient::new(config(server, cache)).unwrap()
}

#[test]
fn test_campus_is_fetched_once_and_cached() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let mock = server
        .mock("GET", "/student/v5/public/campus.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"Campuses":["A","B","C"]}"#)
        .expect(1)
        .create();

    let client = client(&server, &cache);
    let first = client.campus().unwrap().unwrap();
    let second = client.campus().unwrap().unwrap();
    mock.assert();

    assert_eq!(first["Campuses"].as_array().unwrap().len(), 3);
    assert_eq!(first, second);

    let url = format!("{}/student/v5/public/campus.json", server.url());
    let path = client.cache().path_for(&url);
    let stored = std::fs::read_to_string(&path).unwrap();
    assert_eq!(parse_document(&url, &stored).unwrap(), first);
    assert_eq!(client.cache().stats().unwrap().total_entries, 1);
}

#[test]
fn test_cache_disabled_always_hits_network() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let mock = server
        .mock("GET", "/student/v5/public/campus.json")
        .with_status(200)
        .with_body(r#"{"Campuses":[]}"#)
        .expect(2)
        .create();

    let client = SwsClient::new(ClientConfig {
        use_cache: false,
        ..config(&server, &cache)
    })
    .unwrap();
    client.campus().unwrap();
    client.campus().unwrap();
    mock.assert();

    assert_eq!(client.cache().stats().unwrap().total_entries, 0);
}

#[test]
fn test_response_is_cleaned_before_parsing() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let _m = server
        .mock("GET", "/student/v5/public/odd.json")
        .with_status(200)
        .with_body(r#"{"value": "  CSE  ", "flag": "true"}"#)
        .create();

    let client = client(&server, &cache);
    let doc = client.fetch(&Request::public("odd.json")).unwrap().unwrap();

    assert_eq!(doc["value"], json!("CSE"));
    assert_eq!(doc["flag"], json!(true));
    assert_eq!(client.last(), Some(doc));
}

#[test]
fn test_redirect_is_followed() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let moved = server
        .mock("GET", "/student/v5/public/old.json")
        .with_status(301)
        .with_header("location", "/student/v5/public/new.json")
        .expect(1)
        .create();
    let target = server
        .mock("GET", "/student/v5/public/new.json")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .expect(1)
        .create();

    let client = client(&server, &cache);
    let doc = client.fetch(&Request::public("old.json")).unwrap().unwrap();
    moved.assert();
    target.assert();

    assert_eq!(Value::Object(doc), json!({"ok": true}));
}

#[test]
fn test_redirect_loop_is_capped() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let _m = server
        .mock("GET", "/student/v5/public/loop.json")
        .with_status(302)
        .with_header("location", "/student/v5/public/loop.json")
        .with_body("Moved Temporarily")
        .create();

    let client = SwsClient::new(ClientConfig {
        max_redirects: 3,
        ..config(&server, &cache)
    })
    .unwrap();

    match client.fetch(&Request::public("loop.json")).unwrap_err() {
        SwsError::TooManyRedirects { url, hops, body } => {
            assert_eq!(hops, 3);
            assert!(url.ends_with("/student/v5/public/loop.json"));
            assert_eq!(body, "Moved Temporarily");
        }
        other => panic!("Expected TooManyRedirects, got {:?}", other),
    }
}

#[test]
fn test_404_is_fatal_by_default() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let _m = server
        .mock("GET", "/student/v5/public/term/1900,winter.json")
        .with_status(404)
        .with_body("Term not found")
        .create();

    let client = client(&server, &cache);
    let err = client.term(1900, "winter", sws::Tier::Public).unwrap_err();

    match err {
        SwsError::Http { url, status, body } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/student/v5/public/term/1900,winter.json"));
            assert_eq!(body, "Term not found");
        }
        other => panic!("Expected Http error, got {:?}", other),
    }
}

#[test]
fn test_tolerated_404_leaves_last_result_unchanged() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let _campus = server
        .mock("GET", "/student/v5/public/campus.json")
        .with_status(200)
        .with_body(r#"{"Campuses":["SEATTLE"]}"#)
        .create();
    let _missing = server
        .mock("GET", "/student/v5/public/missing.json")
        .with_status(404)
        .with_body("Not found")
        .create();

    let client = SwsClient::new(ClientConfig {
        throw_404: false,
        ..config(&server, &cache)
    })
    .unwrap();

    let campus = client.campus().unwrap();
    let missing = client.fetch(&Request::public("missing.json")).unwrap();

    assert!(missing.is_none());
    assert_eq!(client.last(), campus);
    // Suppressed responses are never cached
    assert_eq!(client.cache().stats().unwrap().total_entries, 1);
}

#[test]
fn test_suppressed_fetch_keeps_next_cursor() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let href = "/student/v5/public/course.json?curriculum_abbreviation=CSE&page_start=26";
    let _page = server
        .mock("GET", "/student/v5/public/course.json")
        .with_status(200)
        .with_body(json!({"Courses": [{"CourseNumber": "142"}], "Next": {"Href": href}}).to_string())
        .create();
    let _missing = server
        .mock("GET", "/student/v5/public/missing.json")
        .with_status(404)
        .with_body("Not found")
        .create();

    let client = SwsClient::new(ClientConfig {
        throw_404: false,
        ..config(&server, &cache)
    })
    .unwrap();

    let page = client.fetch(&Request::public("course.json")).unwrap();
    assert_eq!(client.next_cursor(), href);

    assert!(client.fetch(&Request::public("missing.json")).unwrap().is_none());
    assert_eq!(client.next_cursor(), href);
    assert!(client.has_next());
    assert_eq!(client.last(), page);
}

#[test]
fn test_401_is_suppressed_unless_strict() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let _m = server
        .mock("GET", "/student/v5/public/campus.json")
        .with_status(401)
        .with_body("Unauthorized")
        .create();

    let lenient = client(&server, &cache);
    assert!(lenient.campus().unwrap().is_none());
    assert!(lenient.last().is_none());

    let strict = SwsClient::new(ClientConfig {
        throw_hepps: true,
        ..config(&server, &cache)
    })
    .unwrap();
    let err = strict.campus().unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[test]
fn test_hepps_500_is_suppressed_other_500_is_fatal() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let _hepps = server
        .mock("GET", "/student/v5/public/course/1985,autumn,CSE,142.json")
        .with_status(500)
        .with_body("Error reading Sr-Course-Titles for course")
        .create();
    let _broken = server
        .mock("GET", "/student/v5/public/course/2013,autumn,CSE,142.json")
        .with_status(500)
        .with_body("Database unavailable")
        .create();

    let client = client(&server, &cache);
    let old = client
        .course(1985, "autumn", "CSE", 142, sws::Tier::Public)
        .unwrap();
    assert!(old.is_none());

    let err = client
        .course(2013, "autumn", "CSE", 142, sws::Tier::Public)
        .unwrap_err();
    assert!(err.is_fatal_http());
    assert!(err.to_string().contains("Database unavailable"));
}

#[test]
fn test_private_call_without_credentials_never_reaches_network() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let mock = server
        .mock("GET", "/student/v5/person/ABC.json")
        .with_status(200)
        .with_body("{}")
        .expect(0)
        .create();

    let client = client(&server, &cache);
    let err = client.person("ABC").unwrap_err();
    mock.assert();

    match err {
        SwsError::MissingCredentials { url } => {
            assert!(url.ends_with("/student/v5/person/ABC.json"));
        }
        other => panic!("Expected MissingCredentials, got {:?}", other),
    }
}

#[test]
fn test_missing_certificate_file_fails_construction() {
    let server = Server::new();
    let cache = TempDir::new().unwrap();
    let result = SwsClient::new(ClientConfig {
        cert_path: Some(cache.path().join("absent.pem")),
        key_path: Some(cache.path().join("absent.key")),
        ..config(&server, &cache)
    });

    match result {
        Err(SwsError::Config(msg)) => assert!(msg.contains("absent.pem")),
        Err(other) => panic!("Expected Config error, got {:?}", other),
        Ok(_) => panic!("Expected construction to fail"),
    }
}

#[test]
fn test_invalid_certificate_is_rejected() {
    let server = Server::new();
    let cache = TempDir::new().unwrap();
    let credentials = Credentials::from_pem("not a cert", "not a key");

    let result = SwsClient::with_credentials(config(&server, &cache), Some(credentials));
    assert!(result.is_err());
}

#[test]
fn test_unparseable_body_is_never_cached() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let mock = server
        .mock("GET", "/student/v5/public/campus.json")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .expect(2)
        .create();

    let client = client(&server, &cache);
    for _ in 0..2 {
        assert!(matches!(client.campus().unwrap_err(), SwsError::Parse { .. }));
    }
    mock.assert();

    assert_eq!(client.cache().stats().unwrap().total_entries, 0);
}

#[test]
fn test_corrupt_cache_entry_is_replaced() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let mock = server
        .mock("GET", "/student/v5/public/campus.json")
        .with_status(200)
        .with_body(r#"{"Campuses":["SEATTLE"]}"#)
        .expect(1)
        .create();

    let client = client(&server, &cache);
    let url = format!("{}/student/v5/public/campus.json", server.url());
    let path = client.cache().path_for(&url);
    std::fs::write(&path, "{\"Campuses\": [").unwrap();

    let campus = client.campus().unwrap().unwrap();
    mock.assert();

    assert_eq!(campus["Campuses"], json!(["SEATTLE"]));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"Campuses":["SEATTLE"]}"#);
}

#[test]
fn test_projected_field() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let _m = server
        .mock("GET", "/student/v5/public/college.json")
        .match_query(mockito::Matcher::UrlEncoded(
            "campus_short_name".to_string(),
            "SEATTLE".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"Colleges":[{"CollegeAbbreviation":"ENGR"}],"Next":null}"#)
        .create();

    let client = client(&server, &cache);
    let colleges = client.colleges("SEATTLE").unwrap().unwrap();

    assert_eq!(colleges, json!([{"CollegeAbbreviation": "ENGR"}]));
    assert!(!client.has_next());
}

#[test]
fn test_path_components_are_percent_encoded() {
    let mut server = Server::new();
    let cache = TempDir::new().unwrap();
    let mock = server
        .mock("GET", "/student/v5/public/course/2013,autumn,B%20E,101.json")
        .with_status(200)
        .with_body(r#"{"CourseTitle":"INTRO"}"#)
        .create();

    let client = client(&server, &cache);
    let course = client
        .course(2013, "autumn", "B E", 101, sws::Tier::Public)
        .unwrap()
        .unwrap();
    mock.assert();

    assert_eq!(course["CourseTitle"], json!("INTRO"));
}
