//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, extract, enrich and write cycle end-to-end.

use doc_harvest::config::Config;
use doc_harvest::crawler::Coordinator;
use doc_harvest::{ContentType, CrawlStats, Document, HarvestError, OutputFormat};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server with no delay
fn create_test_config(server: &MockServer, dir: &TempDir) -> Config {
    let mut config = Config::for_start_url(format!("{}/", server.uri()));
    config.crawler.delay = 0.0;
    config.crawler.timeout = 5;
    config.crawler.respect_robots = false;
    config.output.path = output_path(dir, "out.jsonl").to_string_lossy().into_owned();
    config
}

fn output_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Mounts a page that must never be requested
async fn mount_untouched(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>never</p>", "text/html"))
        .expect(0)
        .mount(server)
        .await;
}

fn page_with_links(title: &str, text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<li><a href="{}">{}</a></li>"#, l, l))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><main><p>{}</p></main><ul>{}</ul></body></html>",
        title, text, anchors
    )
}

fn read_jsonl(path: &Path) -> Vec<Document> {
    let content = std::fs::read_to_string(path).expect("Failed to read output");
    content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSONL line"))
        .collect()
}

async fn crawl(config: Config) -> CrawlStats {
    Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed")
}

fn assert_document_invariants(docs: &[Document], config: &Config) {
    assert!(docs.len() <= config.crawler.max_pages as usize);

    let mut urls = HashSet::new();
    for doc in docs {
        assert!(urls.insert(doc.url.clone()), "duplicate document for {}", doc.url);
        assert!(doc.crawl_depth <= config.crawler.max_depth);
        assert!((0.0..=1.0).contains(&doc.link_density));
        assert_eq!(doc.word_count, doc.body_text.split_whitespace().count());
        assert_eq!(doc.char_count, doc.body_text.chars().count());
    }
}

#[tokio::test]
async fn test_single_page_document() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<main><h1>Hello</h1><p>World test</p></main>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);
    let stats = crawl(config.clone()).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    assert_eq!(docs.len(), 1);

    let doc = &docs[0];
    assert_eq!(doc.url, format!("{}/", server.uri()));
    assert_eq!(doc.title, "Hello");
    assert!(doc.body_text.contains("World test"));
    assert_eq!(doc.word_count, 2);
    assert_eq!(doc.link_density, 0.0);
    assert_eq!(doc.content_type, ContentType::Unclassified);
    assert_eq!(doc.language, "unknown");
    assert_eq!(doc.http_status, 200);
    assert_eq!(doc.crawl_depth, 0);

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.pages_failed, 0);
    assert_eq!(stats.documents_written, 1);
    assert!(stats.finished_at.is_some());
    assert!(!stats.interrupted);
    assert_document_invariants(&docs, &config);
}

#[tokio::test]
async fn test_http_error_counted_and_crawl_continues() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Welcome", &["/missing", "/ok"])).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<main><p>Still here</p></main>").await;

    let dir = TempDir::new().unwrap();
    let stats = crawl(create_test_config(&server, &dir)).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    let urls: Vec<_> = docs.iter().map(|d| d.url.clone()).collect();
    assert_eq!(urls, vec![format!("{}/", server.uri()), format!("{}/ok", server.uri())]);

    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.failures_by_kind.get("http_status_error"), Some(&1));
    assert_eq!(stats.documents_written, 2);
}

#[tokio::test]
async fn test_mutual_links_do_not_loop() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Start", &["/a"])).await;
    mount_page(&server, "/a", &page_with_links("A", "Page A", &["/b"])).await;
    mount_page(&server, "/b", &page_with_links("B", "Page B", &["/a", "/", "/a/#top"])).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);
    let stats = crawl(config.clone()).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    assert_eq!(docs.len(), 3);
    assert_document_invariants(&docs, &config);

    let depths: Vec<_> = docs.iter().map(|d| d.crawl_depth).collect();
    assert_eq!(depths, vec![0, 1, 2]);
    assert_eq!(stats.skips_by_reason.get("already_seen"), Some(&3));
}

#[tokio::test]
async fn test_page_budget_of_one() {
    let server = MockServer::start().await;
    let links = ["/p1", "/p2", "/p3", "/p4", "/p5"];
    mount_page(&server, "/", &page_with_links("Home", "Five links below", &links)).await;
    for link in links {
        mount_untouched(&server, link).await;
    }

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.max_pages = 1;
    let stats = crawl(config.clone()).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    assert_eq!(docs.len(), 1);
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.pages_skipped, 0);
    assert_document_invariants(&docs, &config);
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Root", &["/level1"])).await;
    mount_page(&server, "/level1", &page_with_links("L1", "One deep", &["/level2"])).await;
    mount_untouched(&server, "/level2").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.max_depth = 1;
    let stats = crawl(config.clone()).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    assert_eq!(docs.len(), 2);
    assert_document_invariants(&docs, &config);
    assert_eq!(stats.skips_by_reason.get("depth_exceeded"), Some(&1));
}

#[tokio::test]
async fn test_non_html_response_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Data below", &["/data.json"])).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let stats = crawl(create_test_config(&server, &dir)).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    assert_eq!(docs.len(), 1);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.failures_by_kind.get("unsupported_content_type"), Some(&1));
}

#[tokio::test]
async fn test_filtered_links_not_followed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        &page_with_links(
            "Home",
            "Links everywhere",
            &[
                "https://other.example/page",
                "/login",
                "/files/report.pdf",
                "mailto:team@example.com",
            ],
        ),
    )
    .await;
    mount_untouched(&server, "/login").await;
    mount_untouched(&server, "/files/report.pdf").await;

    let dir = TempDir::new().unwrap();
    let stats = crawl(create_test_config(&server, &dir)).await;

    assert_eq!(read_jsonl(&output_path(&dir, "out.jsonl")).len(), 1);
    assert_eq!(stats.skips_by_reason.get("off_domain"), Some(&1));
    assert_eq!(stats.skips_by_reason.get("excluded"), Some(&2));
    assert_eq!(stats.skips_by_reason.get("invalid_url"), Some(&1));
    assert_eq!(stats.pages_skipped, 4);
}

#[tokio::test]
async fn test_json_array_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Index", &["/docs/intro"])).await;
    mount_page(&server, "/docs/intro", "<main><h1>Intro</h1><p>Read me first.</p></main>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    let path = output_path(&dir, "nested/out.json");
    config.output.path = path.to_string_lossy().into_owned();
    config.output.format = OutputFormat::Json;
    let stats = crawl(config).await;

    let content = std::fs::read_to_string(&path).unwrap();
    let docs: Vec<Document> = serde_json::from_str(&content).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(stats.documents_written, 2);
    assert_eq!(docs[1].content_type, ContentType::DocPage);
    assert_eq!(docs[1].title, "Intro");
    assert_eq!(stats.content_types.get("doc_page"), Some(&1));
}

#[tokio::test]
async fn test_robots_disallow_respected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /private", "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", &page_with_links("Home", "Hi", &["/private/notes", "/public"])).await;
    mount_page(&server, "/public", "<main><p>Open</p></main>").await;
    mount_untouched(&server, "/private/notes").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.respect_robots = true;
    let stats = crawl(config).await;

    assert_eq!(read_jsonl(&output_path(&dir, "out.jsonl")).len(), 2);
    assert_eq!(stats.skips_by_reason.get("robots_denied"), Some(&1));
}

#[tokio::test]
async fn test_missing_robots_allows_crawl() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<main><p>No robots file here</p></main>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.respect_robots = true;
    let stats = crawl(config).await;

    assert_eq!(stats.documents_written, 1);
}

#[tokio::test]
async fn test_min_body_chars_skips_but_follows_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Tiny", &["/long"])).await;
    let long_text = "This page has plenty of words in its body. ".repeat(5);
    mount_page(&server, "/long", &format!("<main><p>{}</p></main>", long_text)).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.min_body_chars = 100;
    let stats = crawl(config).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].url, format!("{}/long", server.uri()));
    assert_eq!(docs[0].crawl_depth, 1);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.failures_by_kind.get("insufficient_content"), Some(&1));
    assert_eq!(stats.pages_failed, 0);
}

#[tokio::test]
async fn test_delay_between_fetches() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Start", &["/a", "/b"])).await;
    mount_page(&server, "/a", "<p>A</p>").await;
    mount_page(&server, "/b", "<p>B</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.delay = 0.2;

    let start = Instant::now();
    let stats = crawl(config).await;

    assert_eq!(stats.documents_written, 3);
    assert!(start.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_unreachable_seed_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::for_start_url("http://127.0.0.1:9/");
    config.crawler.delay = 0.0;
    config.crawler.timeout = 2;
    config.crawler.respect_robots = false;
    config.output.path = output_path(&dir, "out.jsonl").to_string_lossy().into_owned();

    let stats = crawl(config).await;

    assert_eq!(stats.documents_written, 0);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.failures_by_kind.get("transport_error"), Some(&1));
    assert!(read_jsonl(&output_path(&dir, "out.jsonl")).is_empty());
}

#[tokio::test]
async fn test_seed_is_crawled_even_when_it_looks_excluded() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/account/help",
        &page_with_links("Account help", "Reset your password here", &["/login"]),
    )
    .await;
    mount_untouched(&server, "/login").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.start_url = format!("{}/account/help", server.uri());
    let stats = crawl(config).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].url, format!("{}/account/help", server.uri()));
    assert_eq!(docs[0].crawl_depth, 0);
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.documents_written, 1);
    assert_eq!(stats.skips_by_reason.get("excluded"), Some(&1));
}

#[tokio::test]
async fn test_robots_group_follows_user_agent_override() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "User-agent: CustomBot\nDisallow: /private\n\nUser-agent: *\nDisallow:\n",
            "text/plain",
        ))
        .mount(&server)
        .await;
    mount_page(&server, "/", &page_with_links("Home", "Hi", &["/private/notes", "/public"])).await;
    mount_page(&server, "/public", "<main><p>Open</p></main>").await;
    mount_untouched(&server, "/private/notes").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.crawler.respect_robots = true;
    config.user_agent.override_value = Some("CustomBot/2.0".to_string());
    let stats = crawl(config).await;

    assert_eq!(stats.documents_written, 2);
    assert_eq!(stats.skips_by_reason.get("robots_denied"), Some(&1));
}

#[tokio::test]
async fn test_parse_error_counted_and_crawl_continues() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Welcome", &["/plain", "/ok"])).await;
    mount_page(&server, "/plain", "just words and no markup at all").await;
    mount_page(&server, "/ok", "<main><p>Still here</p></main>").await;

    let dir = TempDir::new().unwrap();
    let stats = crawl(create_test_config(&server, &dir)).await;

    let docs = read_jsonl(&output_path(&dir, "out.jsonl"));
    let urls: Vec<_> = docs.iter().map(|d| d.url.clone()).collect();
    assert_eq!(urls, vec![format!("{}/", server.uri()), format!("{}/ok", server.uri())]);

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.failures_by_kind.get("parse_error"), Some(&1));
    assert_eq!(stats.documents_written, 2);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_output_failure_aborts_crawl() {
    // Every write to /dev/full fails with ENOSPC
    if !Path::new("/dev/full").exists() {
        return;
    }

    let server = MockServer::start().await;
    mount_page(&server, "/", &page_with_links("Home", "Welcome", &["/next"])).await;
    mount_untouched(&server, "/next").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.output.path = "/dev/full".to_string();

    let result = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert!(matches!(result, Err(HarvestError::Output(_))));
}
