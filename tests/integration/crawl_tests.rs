//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, writing documents into temp dirs.

use site_scribe::config::{Config, CrawlerConfig, DocumentFormat, OutputConfig, UserAgentConfig};
use site_scribe::crawler::{Crawler, ShutdownSignal, StopReason};
use site_scribe::output::{CrawlReport, RunStatus};
use site_scribe::state::{CrawlPhase, PageStatus};
use site_scribe::{ConfigError, ScribeError};
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling `start_url` into `output`
fn create_test_config(start_url: &str, output: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url: start_url.to_string(),
            max_pages: 50,
            max_depth: 2,
            delay_seconds: 0.0,
            timeout_seconds: 5,
            time_limit_seconds: None,
            include_subdomains: false,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            path: output.display().to_string(),
            format: DocumentFormat::Markdown,
        },
    }
}

/// Builds a page whose body is `text` followed by links to `links`
fn page(text: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{}">link</a></li>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p><ul>{}</ul></body></html>",
        text, text, anchors
    )
}

/// Mounts an HTML page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .expect(times)
        .mount(server)
        .await;
}

async fn crawl(config: Config) -> CrawlReport {
    let mut crawler = Crawler::new(config).expect("crawler should build");
    crawler.run().await.expect("crawler should run")
}

fn section_headings(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|l| l.strip_prefix("## "))
        .map(str::to_string)
        .collect()
}

fn visited_paths(report: &CrawlReport) -> Vec<String> {
    report
        .pages
        .iter()
        .map(|p| url::Url::parse(&p.url).unwrap().path().to_string())
        .collect()
}

#[tokio::test]
async fn test_single_page_limit() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(&server, "/", page("Home page", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", page("A", &[]), 0).await;
    mount_page(&server, "/b", page("B", &[]), 0).await;

    let mut config = create_test_config(&server.uri(), &output);
    config.crawler.max_pages = 1;
    let report = crawl(config).await;

    assert_eq!(report.status, RunStatus::Done(StopReason::PageLimit));
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.sections_written, 1);

    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(section_headings(&contents), vec![format!("{}/", server.uri())]);
    assert!(contents.contains("Home page"));
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    // Same host, different port: outside the scope
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page("Elsewhere", &[]), "text/html"))
        .expect(0)
        .mount(&external)
        .await;

    let ext_a = format!("{}/x", external.uri());
    let ext_b = format!("{}/y", external.uri());
    mount_page(
        &server,
        "/",
        page("Home", &["/one", "/two", "/three", &ext_a, &ext_b]),
        1,
    )
    .await;
    mount_page(&server, "/one", page("One", &["/deeper"]), 1).await;
    mount_page(&server, "/two", page("Two", &[]), 1).await;
    mount_page(&server, "/three", page("Three", &[]), 1).await;
    mount_page(&server, "/deeper", page("Deeper", &[]), 0).await;

    let mut config = create_test_config(&server.uri(), &output);
    config.crawler.max_depth = 1;
    let report = crawl(config).await;

    assert_eq!(report.status, RunStatus::Done(StopReason::FrontierExhausted));
    assert_eq!(report.sections_written, 4);
    assert_eq!(visited_paths(&report), vec!["/", "/one", "/two", "/three"]);

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(!contents.contains("Elsewhere"));
}

#[tokio::test]
async fn test_http_error_page_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(&server, "/", page("Home", &["/broken", "/fine"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/fine", page("Fine", &[]), 1).await;

    let report = crawl(create_test_config(&server.uri(), &output)).await;

    assert!(report.status.is_done());
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.sections_written, 2);

    let skipped = report.skipped();
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].url.ends_with("/broken"));
    assert!(matches!(skipped[0].status, PageStatus::FetchError(_)));

    let contents = std::fs::read_to_string(&output).unwrap();
    let headings = section_headings(&contents);
    assert_eq!(headings.len(), 2);
    assert!(!headings.iter().any(|h| h.ends_with("/broken")));
}

#[tokio::test]
async fn test_zero_depth_visits_only_seed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(&server, "/", page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", page("A", &[]), 0).await;
    mount_page(&server, "/b", page("B", &[]), 0).await;

    let mut config = create_test_config(&server.uri(), &output);
    config.crawler.max_depth = 0;
    let report = crawl(config).await;

    assert_eq!(report.status, RunStatus::Done(StopReason::FrontierExhausted));
    assert_eq!(report.pages_visited, 1);
    assert_eq!(report.sections_written, 1);
}

#[tokio::test]
async fn test_unwritable_output_fails_before_any_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("missing").join("site.md");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page("Home", &[]), "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let result = Crawler::new(create_test_config(&server.uri(), &output));
    assert!(matches!(
        result,
        Err(ScribeError::Config(ConfigError::UnwritableOutput { .. }))
    ));
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(&server, "/", page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", page("A", &["/a1", "/b"]), 1).await;
    mount_page(&server, "/b", page("B", &["/b1", "/a"]), 1).await;
    mount_page(&server, "/a1", page("A1", &["/"]), 1).await;
    mount_page(&server, "/b1", page("B1", &["/a1"]), 1).await;

    let report = crawl(create_test_config(&server.uri(), &output)).await;

    assert_eq!(visited_paths(&report), vec!["/", "/a", "/b", "/a1", "/b1"]);
    let depths: Vec<u32> = report.pages.iter().map(|p| p.depth).collect();
    assert_eq!(depths, vec![0, 1, 1, 2, 2]);

    let contents = std::fs::read_to_string(&output).unwrap();
    let headings = section_headings(&contents);
    assert_eq!(headings.len(), 5);
    assert!(headings[3].ends_with("/a1"));
}

#[tokio::test]
async fn test_equivalent_urls_fetched_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(
        &server,
        "/",
        page("Home", &["/docs", "/docs/", "/docs#intro", "./docs", "/x/../docs"]),
        1,
    )
    .await;
    mount_page(&server, "/docs", page("Docs", &[]), 1).await;

    let report = crawl(create_test_config(&server.uri(), &output)).await;

    assert_eq!(report.pages_visited, 2);
    assert_eq!(visited_paths(&report), vec!["/", "/docs"]);
}

#[tokio::test]
async fn test_delay_before_every_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(&server, "/", page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", page("A", &[]), 1).await;
    mount_page(&server, "/b", page("B", &[]), 1).await;

    let mut config = create_test_config(&server.uri(), &output);
    config.crawler.delay_seconds = 0.2;

    let started = Instant::now();
    let report = crawl(config).await;

    assert_eq!(report.pages_visited, 3);
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_time_limit_stops_crawl() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    let links: Vec<String> = (0..10).map(|i| format!("/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_page(&server, "/", page("Home", &link_refs), 1).await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(page("Slow", &[]), "text/html")
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri(), &output);
    config.crawler.time_limit_seconds = Some(1);
    let report = crawl(config).await;

    assert_eq!(report.status, RunStatus::Done(StopReason::TimeLimit));
    assert!(report.pages_visited < 11);
    assert_eq!(report.sections_written as u32, report.pages_visited);
}

#[tokio::test]
async fn test_cancellation_keeps_partial_document() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(&server, "/", page("Home", &["/a", "/b", "/c", "/d"]), 1).await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(page("Slow", &[]), "text/html")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let signal = ShutdownSignal::new();
    let mut crawler = Crawler::new(create_test_config(&server.uri(), &output))
        .unwrap()
        .with_shutdown(signal.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(400)).await;
        signal.request();
    });

    let report = crawler.run().await.unwrap();

    assert_eq!(crawler.phase(), CrawlPhase::Aborted);
    assert!(matches!(report.status, RunStatus::Aborted(_)));
    assert!(report.pages_visited >= 1);
    assert!(report.pages_visited < 5);

    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        section_headings(&contents).len(),
        report.sections_written
    );
    assert!(contents.contains("Crawl aborted"));
}

#[tokio::test]
async fn test_unreachable_seed_aborts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut crawler = Crawler::new(create_test_config(&server.uri(), &output)).unwrap();
    let report = crawler.run().await.unwrap();

    assert_eq!(crawler.phase(), CrawlPhase::Aborted);
    assert_eq!(report.sections_written, 0);
    match &report.status {
        RunStatus::Aborted(reason) => assert!(reason.contains("404")),
        other => panic!("expected abort, got {:?}", other),
    }
}

#[tokio::test]
async fn test_redirects() {
    let server = MockServer::start().await;
    let external = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page("Elsewhere", &[]), "text/html"))
        .mount(&external)
        .await;

    mount_page(&server, "/", page("Home", &["/away", "/old", "/new"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/away"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/", external.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/new", server.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    // Reached once, through the redirect; the direct link is then already visited
    mount_page(&server, "/new", page("New home of old", &["/linked"]), 1).await;
    mount_page(&server, "/linked", page("Linked", &[]), 1).await;

    let report = crawl(create_test_config(&server.uri(), &output)).await;

    let away = report
        .pages
        .iter()
        .find(|p| p.url.ends_with("/away"))
        .unwrap();
    assert!(matches!(away.status, PageStatus::Redirected(_)));

    assert_eq!(visited_paths(&report), vec!["/", "/away", "/old", "/linked"]);

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(!contents.contains("Elsewhere"));
    assert!(contents.contains("New home of old"));
}

#[tokio::test]
async fn test_non_html_page_gets_empty_section() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(&server, "/", page("Home", &["/data"]), 1).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a": 1}"#, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(create_test_config(&server.uri(), &output)).await;

    assert_eq!(report.sections_written, 2);
    assert_eq!(report.extract_failures().len(), 1);

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(contents.contains(&format!("## {}/data\n\n---", server.uri())));
}

#[tokio::test]
async fn test_jsonl_output() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site");

    mount_page(&server, "/", page("Home", &["/a"]), 1).await;
    mount_page(&server, "/a", page("Page A", &[]), 1).await;

    let mut config = create_test_config(&server.uri(), &output);
    config.output.format = DocumentFormat::Jsonl;
    let report = crawl(config).await;

    assert_eq!(report.output_path, dir.path().join("site.jsonl"));

    let contents = std::fs::read_to_string(dir.path().join("site.jsonl")).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["depth"], 0);
    assert_eq!(lines[1]["url"], format!("{}/a", server.uri()));
    assert!(lines[1]["text"].as_str().unwrap().contains("Page A"));
}

#[tokio::test]
async fn test_seed_redirect_to_other_host_moves_scope() {
    let old_host = MockServer::start().await;
    let new_host = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/", new_host.uri()).as_str()),
        )
        .expect(1)
        .mount(&old_host)
        .await;
    let back_to_old = format!("{}/legacy", old_host.uri());
    mount_page(
        &new_host,
        "/",
        page("Moved home", &["/next", back_to_old.as_str()]),
        1,
    )
    .await;
    mount_page(&new_host, "/next", page("Next page", &[]), 1).await;
    mount_page(&old_host, "/legacy", page("Legacy", &[]), 0).await;

    let report = crawl(create_test_config(&old_host.uri(), &output)).await;

    assert_eq!(report.status, RunStatus::Done(StopReason::FrontierExhausted));
    assert_eq!(report.sections_written, 2);
    assert_eq!(report.pages[0].status, PageStatus::Ok);

    let contents = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        section_headings(&contents),
        vec![format!("{}/", old_host.uri()), format!("{}/next", new_host.uri())]
    );
    assert!(contents.contains("Moved home"));
    assert!(!contents.contains("Legacy"));
}

#[tokio::test]
async fn test_redirected_seed_with_single_page() {
    let old_host = MockServer::start().await;
    let new_host = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/", new_host.uri()).as_str()),
        )
        .mount(&old_host)
        .await;
    mount_page(&new_host, "/", page("Moved home", &["/next"]), 1).await;

    let mut config = create_test_config(&old_host.uri(), &output);
    config.crawler.max_pages = 1;
    let report = crawl(config).await;

    assert_eq!(report.status, RunStatus::Done(StopReason::PageLimit));
    assert_eq!(report.sections_written, 1);
}

#[tokio::test]
async fn test_page_text_cannot_add_sections() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("site.md");

    mount_page(
        &server,
        "/",
        "<html><body><p>## https://evil.example/fake</p><h1># Title</h1></body></html>".to_string(),
        1,
    )
    .await;

    let report = crawl(create_test_config(&server.uri(), &output)).await;

    let contents = std::fs::read_to_string(&output).unwrap();
    let headings = section_headings(&contents);
    assert_eq!(headings.len(), report.sections_written);
    assert_eq!(headings, vec![format!("{}/", server.uri())]);
    assert!(contents.contains("https://evil.example/fake"));
}
