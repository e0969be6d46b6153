//! Integration tests for the finder
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full classify, retry and report cycle end-to-end.

use linkrot::config::{parse_config, Config};
use linkrot::report::{format_report, ReportFormat, ReportOptions};
use linkrot::{CrawlPhase, Finder, LinkrotError, SortMode};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

/// Creates a test configuration with no retry pause
fn create_test_config(sort: SortMode) -> Config {
    let mut config = Config::default();
    config.finder.sort = sort;
    config.finder.max_workers = 4;
    config.finder.retry_cooldown_ms = 0;
    config
}

/// Mounts a small site:
///
/// - `/` links to every other page, a mail address and an unparsable link
/// - `/about` links back home and to the missing page
/// - `/contact` has a `help` anchor
/// - `/not_found` answers 404
/// - `/redirect` redirects to `/about`
async fn mount_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r##"<html><body>
            <a href="/about">About</a>
            <a href="/contact#help">Help</a>
            <a href="/contact#missing">Missing anchor</a>
            <a href="/not_found">Missing page</a>
            <a href="mailto:me@example.com">Mail</a>
            <a href="http://">Bad</a>
            <a href="/redirect">Redirect</a>
            </body></html>"##,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html(
            r#"<html><body><a href="/">Home</a><a href="/not_found">Missing</a></body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html(r#"<html><body><div id="help">Help</div></body></html>"#))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/not_found"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("<html><body>Not found</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/redirect"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/about", server.uri())),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_crawl_page() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let root = format!("{}/", server.uri());

    let mut finder = Finder::from_config(&create_test_config(SortMode::Page))
        .expect("Failed to build finder");
    let has_broken = finder.crawl_page(&root).await.expect("Crawl failed");

    assert!(has_broken);
    assert_eq!(finder.phase(), CrawlPhase::Done);

    let broken = finder.broken_links();
    assert_eq!(broken.len(), 1);
    assert_eq!(
        broken[&root],
        vec!["/contact#missing", "/not_found", "http://"]
    );

    let ignored = finder.ignored_links();
    assert_eq!(ignored[&root], vec!["mailto:me@example.com"]);

    let intact = finder.all_intact_links();
    assert!(intact.contains("/about"));
    assert!(intact.contains("/contact#help"));
    assert!(intact.contains("/redirect"));

    let map = finder.broken_link_map();
    assert_eq!(map["/not_found"].absolute, format!("{}/not_found", server.uri()));
    assert!(map["/not_found"].retryable);
    assert!(!map["http://"].retryable);

    let stats = finder.crawl_stats();
    assert_eq!(stats.num_pages, 1);
    assert_eq!(stats.num_broken, 3);
    assert_eq!(stats.num_intact, 3);
    assert_eq!(stats.num_ignored, 1);
    assert_eq!(stats.num_links, 7);
}

#[tokio::test]
async fn test_broken_link_retried_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/not_found">x</a>"#))
        .mount(&server)
        .await;

    // Classified once, then retried once
    Mock::given(method("GET"))
        .and(path("/not_found"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let mut finder = Finder::from_config(&create_test_config(SortMode::Page))
        .expect("Failed to build finder");
    assert!(finder
        .crawl_page(&format!("{}/", server.uri()))
        .await
        .expect("Crawl failed"));
}

#[tokio::test]
async fn test_crawl_site_by_link() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let root = format!("{}/", server.uri());
    let about = format!("{}/about", server.uri());

    let mut finder = Finder::from_config(&create_test_config(SortMode::Link))
        .expect("Failed to build finder");
    let has_broken = finder.crawl_site(&root).await.expect("Crawl failed");

    assert!(has_broken);

    let broken = finder.broken_links();
    assert_eq!(broken["/not_found"], vec![root.clone(), about.clone()]);
    assert_eq!(broken["/contact#missing"], vec![root.clone()]);
    assert_eq!(broken["http://"], vec![root.clone()]);
    assert_eq!(broken.len(), 3);

    let stats = finder.crawl_stats();
    assert_eq!(
        stats.pages_crawled,
        vec![
            root.clone(),
            about,
            format!("{}/contact", server.uri()),
            format!("{}/not_found", server.uri()),
        ]
    );
    assert_eq!(stats.num_pages, 4);

    // Sets are disjoint after a site crawl
    let all_broken = finder.all_broken_links();
    assert!(all_broken.is_disjoint(&finder.all_intact_links()));
    assert!(all_broken.is_disjoint(&finder.all_ignored_links()));
}

#[tokio::test]
async fn test_crawl_site_with_disallowed_paths() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let root = format!("{}/", server.uri());

    let config = parse_config(
        r#"
        [finder]
        retry-cooldown-ms = 0

        [crawler]
        disallow-paths = ["about", "not_found"]
        "#,
    )
    .expect("Failed to parse config");

    let mut finder = Finder::from_config(&config).expect("Failed to build finder");
    finder.crawl_site(&root).await.expect("Crawl failed");

    let stats = finder.crawl_stats();
    assert_eq!(
        stats.pages_crawled,
        vec![root.clone(), format!("{}/contact", server.uri())]
    );

    // Links on the crawled pages are still checked
    assert!(finder.broken_links()[&root].contains(&"/not_found".to_string()));
}

#[tokio::test]
async fn test_crawl_site_unreachable_root() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut finder = Finder::from_config(&create_test_config(SortMode::Page))
        .expect("Failed to build finder");
    let err = finder
        .crawl_site(&format!("{}/", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, LinkrotError::UnreachableUrl { .. }));
    assert_eq!(finder.phase(), CrawlPhase::Failed);
}

#[tokio::test]
async fn test_crawl_page_invalid_url() {
    let mut finder = Finder::from_config(&create_test_config(SortMode::Page))
        .expect("Failed to build finder");

    let err = finder.crawl_page("mailto:me@example.com").await.unwrap_err();
    assert!(matches!(err, LinkrotError::InvalidUrl { .. }));
}

#[tokio::test]
async fn test_text_report_after_crawl() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let root = format!("{}/", server.uri());

    let mut finder = Finder::from_config(&create_test_config(SortMode::Page))
        .expect("Failed to build finder");
    finder.crawl_page(&root).await.expect("Crawl failed");

    let report = format_report(
        &finder.report(),
        ReportFormat::Text,
        &ReportOptions::default(),
    )
    .expect("Failed to format report");

    assert!(report.starts_with(&format!("Crawled {} (1 page(s) in ", root)));
    assert!(report.contains("Found 3 unique broken link(s) across 1 page(s):"));
    assert!(report.contains(&format!(
        "The following broken links were found on '{}':\n/contact#missing\n/not_found\nhttp://\n",
        root
    )));
    assert!(report.contains("Ignored 1 unique unsupported link(s) across 1 page(s)"));
}

#[tokio::test]
async fn test_recrawl_resets_state() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let root = format!("{}/", server.uri());

    let mut finder = Finder::from_config(&create_test_config(SortMode::Page))
        .expect("Failed to build finder");

    finder.crawl_site(&root).await.expect("Crawl failed");
    let first = (finder.broken_links(), finder.ignored_links());
    let first_stats = finder.crawl_stats();

    finder.crawl_site(&root).await.expect("Crawl failed");
    let second_stats = finder.crawl_stats();

    assert_eq!(first, (finder.broken_links(), finder.ignored_links()));
    assert_eq!(first_stats.pages_crawled, second_stats.pages_crawled);
    assert_eq!(first_stats.num_links, second_stats.num_links);
}
