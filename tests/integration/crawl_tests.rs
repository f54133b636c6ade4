//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run full crawls
//! against them with the default HTTP fetcher and CSS selector evaluator.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use trawler::config::{Config, UserAgentConfig};
use trawler::crawler::{HttpFetcher, PageFetcher};
use trawler::output::LinkFileSink;
use trawler::{ConfigError, CrawlError, CrawlHandlers, CrawlPhase, Crawler, FetchError};
use url::Url;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for a mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::new(format!("{}/", base_url), vec!["a".to_string()]);
    config.crawler.workers = 2;
    config.crawler.time_between_requests = 20;
    config.crawler.ignore_external = true;
    config.crawler.stop_when_idle = true;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn run_to_completion(crawler: &Crawler) {
    crawler.start();
    tokio::time::timeout(Duration::from_secs(10), crawler.drained())
        .await
        .expect("crawl did not finish in time");
}

#[tokio::test]
async fn test_http_fetcher_statuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .and(header("user-agent", "TestBot/2.0"))
        .respond_with(html("<p>hello</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "2.0".to_string(),
        contact_url: None,
    })
    .unwrap();

    let ok_url = Url::parse(&format!("{}/ok", mock_server.uri())).unwrap();
    let page = fetcher.fetch(&ok_url).await.unwrap();
    assert_eq!(page.status, 200);
    assert!(page.body.contains("<p>hello</p>"));

    let missing_url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();
    let err = fetcher.fetch(&missing_url).await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert_eq!(err.url(), missing_url.as_str());
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">Page 1</a>
           <a href="/page2">Page 2</a>
           <a href="https://y.test/">Elsewhere</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", r#"<a href="/page2">Page 2 again</a>"#).await;
    mount_page(&mock_server, "/page2", r#"<a href="/">Home</a>"#).await;

    let dir = tempfile::tempdir().unwrap();
    let links_path = dir.path().join("data").join("links.txt");
    let sink = LinkFileSink::open(&links_path).unwrap();

    let visited: Arc<Mutex<Vec<String>>> = Arc::default();
    let recorded = Arc::clone(&visited);
    let handlers = CrawlHandlers::new()
        .on_links(move |url, _| recorded.lock().unwrap().push(url.path().to_string()))
        .on_admitted(move |urls| sink.record_or_warn(urls));

    let crawler = Crawler::new(create_test_config(&base_url), handlers).unwrap();
    run_to_completion(&crawler).await;

    let mut visited = visited.lock().unwrap().clone();
    visited.sort();
    assert_eq!(visited, vec!["/", "/page1", "/page2"]);

    let stats = crawler.stats();
    assert_eq!(crawler.phase(), CrawlPhase::Finished);
    assert_eq!(stats.visited, 3);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.out_of_scope, 1);
    assert_eq!(stats.queued, 0);

    let links = std::fs::read_to_string(&links_path).unwrap();
    let mut lines: Vec<&str> = links.lines().collect();
    lines.sort();
    assert_eq!(
        lines,
        vec![
            format!("{}/page1", base_url),
            format!("{}/page2", base_url)
        ]
    );
}

#[tokio::test]
async fn test_failed_page_dropped_without_callbacks() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", r#"<a href="/broken">Broken again</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let called_for: Arc<Mutex<Vec<String>>> = Arc::default();
    let links_record = Arc::clone(&called_for);
    let content_record = Arc::clone(&called_for);
    let handlers = CrawlHandlers::new()
        .on_links(move |url, _| links_record.lock().unwrap().push(url.path().to_string()))
        .on_content(move |url, _| content_record.lock().unwrap().push(url.path().to_string()));

    let crawler = Crawler::new(create_test_config(&base_url), handlers).unwrap();
    run_to_completion(&crawler).await;

    let called_for = called_for.lock().unwrap();
    assert!(!called_for.iter().any(|p| p == "/broken"));
    assert_eq!(called_for.len(), 4);

    let stats = crawler.stats();
    assert_eq!(stats.visited, 2);
    assert_eq!(stats.failed, 1);
    assert_eq!(crawler.frontier_len(), 0);
}

#[tokio::test]
async fn test_content_selectors_reach_callback() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<ul class="news"><li><article><a href="/story">Story</a></article></li></ul>
           <h1>Front page</h1>"#,
    )
    .await;
    mount_page(&mock_server, "/story", r#"<h1>The story</h1><p class="lede">It began.</p>"#)
        .await;

    let mut config = create_test_config(&base_url);
    config.selectors.links = vec!["ul.news>li>article>a".to_string()];
    config.selectors.content = vec!["h1".to_string(), "p.lede".to_string()];

    let content: Arc<Mutex<Vec<(String, String, String)>>> = Arc::default();
    let recorded = Arc::clone(&content);
    let handlers = CrawlHandlers::new().on_content(move |url, matches| {
        let mut recorded = recorded.lock().unwrap();
        for m in matches {
            for element in &m.elements {
                recorded.push((
                    url.path().to_string(),
                    m.selector.clone(),
                    element.text.clone(),
                ));
            }
        }
    });

    let crawler = Crawler::new(config, handlers).unwrap();
    run_to_completion(&crawler).await;

    let mut content = content.lock().unwrap().clone();
    content.sort();
    assert_eq!(
        content,
        vec![
            ("/".to_string(), "h1".to_string(), "Front page".to_string()),
            ("/story".to_string(), "h1".to_string(), "The story".to_string()),
            (
                "/story".to_string(),
                "p.lede".to_string(),
                "It began.".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn test_ticks_are_paced() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/one">One</a>"#).await;
    mount_page(&mock_server, "/one", r#"<a href="/two">Two</a>"#).await;
    mount_page(&mock_server, "/two", "no links").await;

    let mut config = create_test_config(&base_url);
    config.crawler.workers = 1;
    config.crawler.time_between_requests = 150;

    let seen_at: Arc<Mutex<Vec<Instant>>> = Arc::default();
    let recorded = Arc::clone(&seen_at);
    let handlers =
        CrawlHandlers::new().on_links(move |_, _| recorded.lock().unwrap().push(Instant::now()));

    let started = Instant::now();
    let crawler = Crawler::new(config, handlers).unwrap();
    run_to_completion(&crawler).await;

    // Three visits need at least three ticks, two intervals apart
    assert_eq!(seen_at.lock().unwrap().len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_external_links_followed_when_allowed() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &site,
        "/",
        &format!(r#"<a href="{}/elsewhere">Elsewhere</a>"#, other.uri()),
    )
    .await;
    mount_page(&other, "/elsewhere", "the end").await;

    let mut config = create_test_config(&site.uri());
    config.crawler.ignore_external = false;

    let crawler = Crawler::new(config, CrawlHandlers::new()).unwrap();
    run_to_completion(&crawler).await;

    assert_eq!(crawler.visited_count(), 2);
    assert_eq!(crawler.stats().out_of_scope, 0);
}

#[tokio::test]
async fn test_missing_link_selectors_rejected_before_network() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.selectors.links.clear();
    config.selectors.content = vec!["p".to_string()];

    let result = Crawler::new(config, CrawlHandlers::new());
    assert!(matches!(
        result,
        Err(CrawlError::Config(ConfigError::MissingLinkSelectors))
    ));
}
