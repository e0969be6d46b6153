//! Integration tests for the HTTP crawler
//!
//! These tests run `HttpCrawler` against wiremock servers.

use linkrot::config::CrawlerConfig;
use linkrot::crawler::{Crawler, HttpCrawler};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn crawler() -> HttpCrawler {
    HttpCrawler::new(&CrawlerConfig::default()).expect("Failed to build crawler")
}

fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), path)).expect("Failed to parse URL")
}

#[tokio::test]
async fn test_fetch_html_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body><h1 id="top">Home</h1>
            <a href="/about">About</a><img src="logo.png"><a href="http://">Bad</a>
            </body></html>"#,
        ))
        .mount(&server)
        .await;

    let outcome = crawler().fetch_page(&url(&server, "/")).await;

    assert_eq!(outcome.status, Some(200));
    let document = outcome.document.expect("Expected a document");
    let links: Vec<&str> = document.links().iter().map(|l| l.as_str()).collect();
    assert_eq!(links, vec!["/about", "logo.png"]);
    assert_eq!(document.unparsable_links(), ["http://"]);
    assert!(document.has_element_id("top"));
}

#[tokio::test]
async fn test_fragment_kept_without_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html(r#"<div id="help">Help</div>"#))
        .mount(&server)
        .await;

    let outcome = crawler().fetch_page(&url(&server, "/contact#help")).await;

    let document = outcome.document.expect("Expected a document");
    assert_eq!(document.url().fragment(), Some("help"));
    assert!(!document.is_missing_fragment());
}

#[tokio::test]
async fn test_not_found_has_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410).set_body_string("<p>Gone</p>"))
        .mount(&server)
        .await;

    let crawler = crawler();

    let outcome = crawler.fetch_page(&url(&server, "/gone")).await;
    assert_eq!(outcome.status, Some(410));
    assert!(outcome.document.is_some());
    assert!(outcome.is_not_found());

    // Unmatched wiremock paths answer 404
    let outcome = crawler.fetch_page(&url(&server, "/missing")).await;
    assert_eq!(outcome.status, Some(404));
    assert!(outcome.document.is_some());
}

#[tokio::test]
async fn test_server_error_has_no_document() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let outcome = crawler().fetch_page(&url(&server, "/error")).await;

    assert_eq!(outcome.status, Some(500));
    assert!(outcome.document.is_none());
}

#[tokio::test]
async fn test_redirect_updates_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html("<p>New</p>"))
        .mount(&server)
        .await;

    let outcome = crawler().fetch_page(&url(&server, "/old#top")).await;

    assert_eq!(outcome.status, Some(200));
    let document = outcome.document.expect("Expected a document");
    assert_eq!(document.url().path(), "/new");
    assert_eq!(document.url().fragment(), None);
}

#[tokio::test]
async fn test_too_many_redirects_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/loop", server.uri())),
        )
        .mount(&server)
        .await;

    let outcome = crawler().fetch_page(&url(&server, "/loop")).await;

    assert_eq!(outcome.status, None);
    assert!(outcome.document.is_none());
}

#[tokio::test]
async fn test_non_html_has_no_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"href": "<a href='/x'>x</a>"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let outcome = crawler().fetch_page(&url(&server, "/data.json")).await;

    let document = outcome.document.expect("Expected a document");
    assert!(document.links().is_empty());
}

#[tokio::test]
async fn test_connection_refused() {
    let server = MockServer::start().await;
    let target = url(&server, "/");
    drop(server);

    let outcome = crawler().fetch_page(&target).await;

    assert_eq!(outcome.status, None);
    assert!(outcome.document.is_none());
}

#[tokio::test]
async fn test_user_agent_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(wiremock::matchers::header("user-agent", "TestBot/1.0"))
        .respond_with(html("<p>Hi</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let config = CrawlerConfig {
        user_agent: "TestBot/1.0".to_string(),
        ..Default::default()
    };
    let crawler = HttpCrawler::new(&config).expect("Failed to build crawler");

    let outcome = crawler.fetch_page(&url(&server, "/")).await;
    assert_eq!(outcome.status, Some(200));
}
