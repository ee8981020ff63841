//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract and follow cycle end-to-end.

use maxtract::config::{validate, CrawlConfig, CrawlOptions, OutputMode};
use maxtract::crawler::{crawl, CrawlReport};
use maxtract::output::render;
use maxtract::PageRecord;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration rooted at the mock server
fn create_test_config(root: &str, patterns: &[&str], max_depth: i64) -> CrawlOptions {
    CrawlOptions {
        url: Some(root.to_string()),
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        max_depth: Some(max_depth),
        concurrency: Some(4),
        request_timeout: Some(5),
        user_agent: Some("TestBot/1.0".to_string()),
        ..Default::default()
    }
}

fn build(options: CrawlOptions) -> CrawlConfig {
    validate(options).expect("test configuration should be valid")
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

fn find<'a>(report: &'a CrawlReport, url: &str) -> Option<&'a PageRecord> {
    report.records.iter().find(|r| r.url.as_str() == url)
}

fn child_urls(record: &PageRecord) -> Vec<String> {
    record.children.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_out_of_scope_link_recorded_but_not_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><body>
            <a href="/a">A</a>
            <a href="http://other.test/b">B</a>
            contact: root@example.com
        </body></html>"#,
    )
    .await;
    mount_page(&server, "/a", "<p>a@example.com</p>").await;

    let report = crawl(build(create_test_config(&base, &["email"], 1)))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 2);

    let root = find(&report, &format!("{}/", base)).expect("root record");
    assert_eq!(
        child_urls(root),
        vec![format!("{}/a", base), "http://other.test/b".to_string()]
    );
    assert_eq!(root.data, vec!["root@example.com"]);

    let a = find(&report, &format!("{}/a", base)).expect("child record");
    assert_eq!(a.data, vec!["a@example.com"]);

    assert!(find(&report, "http://other.test/b").is_none());
    assert_eq!(report.stats.links_out_of_scope, 1);
}

#[tokio::test]
async fn test_page_linked_from_many_parents_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/p1">1</a><a href="/p2">2</a><a href="/p3">3</a><a href="/p4">4</a>"#,
    )
    .await;
    for p in ["/p1", "/p2", "/p3", "/p4"] {
        mount_page(&server, p, r#"<a href="/shared">shared</a><a href="/">home</a>"#).await;
    }

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<p>555-123-4567</p>".to_string(), "text/html"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(build(create_test_config(&base, &["phone"], 3)))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 6);
    assert_eq!(report.stats.registry_anomalies, 0);
    for p in ["p1", "p2", "p3", "p4"] {
        let record = find(&report, &format!("{}/{}", base, p)).unwrap();
        assert_eq!(
            child_urls(record),
            vec![format!("{}/shared", base), format!("{}/", base)]
        );
    }

    let shared = find(&report, &format!("{}/shared", base)).unwrap();
    assert_eq!(shared.data, vec!["555-123-4567"]);

    // Dropping the server verifies the `.expect(1)`
}

#[tokio::test]
async fn test_depth_zero_fetches_root_only() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a><a href="/b">B</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(build(create_test_config(&base, &["email"], 0)))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].children.len(), 2);
}

#[tokio::test]
async fn test_depth_bound_stops_chain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/one">1</a>"#).await;
    mount_page(&server, "/one", r#"<a href="/two">2</a>"#).await;
    mount_page(&server, "/two", r#"<a href="/three">3</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/three"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(build(create_test_config(&base, &["email"], 2)))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 3);
    let two = find(&report, &format!("{}/two", base)).unwrap();
    assert_eq!(child_urls(two), vec![format!("{}/three", base)]);
    assert_eq!(report.stats.links_depth_bounded, 1);
}

#[tokio::test]
async fn test_failed_fetches_do_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<a href="/missing">gone</a><a href="/broken">500</a><a href="/doc.pdf">pdf</a><a href="/ok">ok</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x25, 0x50], "application/pdf"))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "Call (555) 123-4567").await;

    let report = crawl(build(create_test_config(&base, &["phone"], 1)))
        .await
        .unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stats.fetch_failures, 3);
    assert!(find(&report, &format!("{}/missing", base)).is_none());
    assert_eq!(
        find(&report, &format!("{}/ok", base)).unwrap().data,
        vec!["(555) 123-4567"]
    );
}

#[tokio::test]
async fn test_allow_list_extends_scope() {
    let server = MockServer::start().await;
    let root = server.uri();
    let port = url::Url::parse(&root).unwrap().port().unwrap();
    let alias = format!("http://localhost:{}", port);

    mount_page(
        &server,
        "/",
        &format!(r#"<a href="{}/alias">alias</a>"#, alias),
    )
    .await;
    mount_page(&server, "/alias", "alias@example.com").await;

    // Default scope: the root host only
    let report = crawl(build(create_test_config(&root, &["email"], 1)))
        .await
        .unwrap();
    assert_eq!(report.records.len(), 1);

    // Allow-listed second host
    let mut options = create_test_config(&root, &["email"], 1);
    options.domains = vec!["localhost".to_string()];
    let report = crawl(build(options)).await.unwrap();

    assert_eq!(report.records.len(), 2);
    assert_eq!(
        find(&report, &format!("{}/alias", alias)).unwrap().data,
        vec!["alias@example.com"]
    );
}

#[tokio::test]
async fn test_run_timeout_keeps_partial_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/slow">slow</a> root@example.com"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("slow@example.com".to_string(), "text/html")
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let mut options = create_test_config(&base, &["email"], 1);
    options.timeout = Some(1);
    let report = crawl(build(options)).await.unwrap();

    assert!(report.timed_out);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].data, vec!["root@example.com"]);
}

#[tokio::test]
async fn test_rendered_json_output() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", r#"<a href="/a">A</a> x@example.com"#).await;
    mount_page(&server, "/a", "y@example.com y@example.com").await;

    let report = crawl(build(create_test_config(&base, &["email"], 1)))
        .await
        .unwrap();

    let mut out = Vec::new();
    render(&report.records, OutputMode::Json, false, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["url"], format!("{}/", base));
    assert_eq!(records[0]["children"][0], format!("{}/a", base));
    assert_eq!(records[1]["data"], serde_json::json!(["y@example.com", "y@example.com"]));

    let mut out = Vec::new();
    render(&report.records, OutputMode::DataOnly, true, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "x@example.com\ny@example.com\n");
}
