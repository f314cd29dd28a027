//! Integration tests for the crawler
//!
//! These tests use wiremock to serve mock results pages and test the
//! fetch → extract → paginate cycle end-to-end.

use availability_crawler::config::Config;
use availability_crawler::crawler::{build_http_client, fetch_page, fetch_url, FetchResult};
use availability_crawler::output::{aggregate_by_day, write_csv};
use availability_crawler::{AvailabilityError, CrawlError, CrawlState, Crawler, FixedClock};
use chrono::NaiveDate;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HTML: &str = "text/html; charset=utf-8";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.search_path = "/to-rent/page-a?beds_min=2&radius=0".to_string();
    config.crawler.request_timeout_secs = 5;
    config.crawler.connect_timeout_secs = 2;
    config
}

fn create_test_crawler(config: &Config) -> Crawler {
    Crawler::new(config)
        .expect("Failed to create crawler")
        .with_clock(FixedClock(date(2020, 7, 20)))
}

/// Builds a results page with one listing per availability text
fn results_page(availabilities: &[&str], next_href: Option<&str>) -> String {
    let mut html = String::from("<html><head><title>Results</title></head><body><ul>");
    for text in availabilities {
        html.push_str(&format!(
            r#"<li class="listing"><p class="available-from">
                {}
            </p></li>"#,
            text
        ));
    }
    html.push_str("</ul><div class=\"paginate\"><a href=\"/to-rent/page-0\">Previous</a>");
    if let Some(href) = next_href {
        html.push_str(&format!(r#"<a href="{}">Next &gt;</a>"#, href));
    }
    html.push_str("</div></body></html>");
    html
}

async fn mount_page(server: &MockServer, page_path: &str, body: String, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, HTML))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_three_page_chain_collects_in_order() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(
            &["Available from 29th Jul 2020", "Available immediately"],
            Some("/to-rent/page-b?beds_min=2&pn=2"),
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-b",
        results_page(
            &["Available from 1st Aug 2020"],
            Some("/to-rent/page-c?beds_min=2&pn=3"),
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-c",
        results_page(&["Available from 2nd Sep 2020", "Available from 23rd Oct 2020"], None),
        1,
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut crawler = create_test_crawler(&config);
    let summary = crawler
        .crawl(&config.site.search_path)
        .await
        .expect("Crawl failed");

    assert_eq!(summary.pages_visited, 3);
    assert_eq!(summary.dates_collected, 5);
    assert_eq!(summary.final_state, CrawlState::Done);
    assert_eq!(
        crawler.availabilities(),
        &[
            date(2020, 7, 29),
            date(2020, 7, 20),
            date(2020, 8, 1),
            date(2020, 9, 2),
            date(2020, 10, 23),
        ]
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].url.query(), Some("beds_min=2&pn=2"));
}

#[tokio::test]
async fn test_failed_second_page_truncates_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(
            &["Available from 29th Jul 2020", "Available from 31st Jul 2020"],
            Some("/to-rent/page-b"),
        ),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/to-rent/page-b"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Reachable only through page B
    mount_page(
        &mock_server,
        "/to-rent/page-c",
        results_page(&["Available from 2nd Sep 2020"], None),
        0,
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut crawler = create_test_crawler(&config);
    let summary = crawler
        .crawl(&config.site.search_path)
        .await
        .expect("Fetch failures must not fail the crawl");

    assert_eq!(summary.final_state, CrawlState::Aborted);
    assert_eq!(summary.pages_visited, 1);
    assert_eq!(
        crawler.availabilities(),
        &[date(2020, 7, 29), date(2020, 7, 31)]
    );
}

#[tokio::test]
async fn test_non_html_page_truncates_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(&["Available from 29th Jul 2020"], Some("/to-rent/page-b")),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/to-rent/page-b"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"listings": []}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut crawler = create_test_crawler(&config);
    let summary = crawler.crawl(&config.site.search_path).await.unwrap();

    assert_eq!(summary.final_state, CrawlState::Aborted);
    assert_eq!(crawler.availabilities(), &[date(2020, 7, 29)]);
}

#[tokio::test]
async fn test_unparsable_date_fails_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(&["Available from 29th Jul 2020"], Some("/to-rent/page-b")),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-b",
        results_page(&["Available from end of summer"], Some("/to-rent/page-c")),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-c",
        results_page(&["Available from 2nd Sep 2020"], None),
        0,
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut crawler = create_test_crawler(&config);
    let err = crawler
        .crawl(&config.site.search_path)
        .await
        .expect_err("Malformed dates are fatal");

    assert!(matches!(
        err,
        CrawlError::Availability(AvailabilityError::InvalidDate { .. })
    ));
    assert_eq!(crawler.state(), CrawlState::Failed);
    assert!(!crawler.state().is_truncated());
    assert_eq!(crawler.availabilities(), &[date(2020, 7, 29)]);
}

#[tokio::test]
async fn test_page_without_listings_yields_no_dates() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/to-rent/page-a", results_page(&[], None), 1).await;

    let config = create_test_config(&mock_server.uri());
    let mut crawler = create_test_crawler(&config);
    let summary = crawler.crawl(&config.site.search_path).await.unwrap();

    assert_eq!(summary.final_state, CrawlState::Done);
    assert_eq!(summary.pages_visited, 1);
    assert!(crawler.availabilities().is_empty());
}

#[tokio::test]
async fn test_page_limit_stops_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(&["Available from 29th Jul 2020"], Some("/to-rent/page-b")),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-b",
        results_page(&["Available from 1st Aug 2020"], Some("/to-rent/page-c")),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-c",
        results_page(&["Available from 2nd Sep 2020"], None),
        0,
    )
    .await;

    let mut config = create_test_config(&mock_server.uri());
    config.crawler.max_pages = Some(2);
    let mut crawler = create_test_crawler(&config);
    let summary = crawler.crawl(&config.site.search_path).await.unwrap();

    assert_eq!(summary.final_state, CrawlState::LimitReached);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(
        crawler.availabilities(),
        &[date(2020, 7, 29), date(2020, 8, 1)]
    );
}

#[tokio::test]
async fn test_next_link_back_to_visited_page_stops_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(&["Available from 29th Jul 2020"], Some("/to-rent/page-b")),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-b",
        results_page(
            &["Available from 1st Aug 2020"],
            Some("/to-rent/page-a?beds_min=2&radius=0"),
        ),
        1,
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut crawler = create_test_crawler(&config);
    let summary = crawler.crawl(&config.site.search_path).await.unwrap();

    assert_eq!(summary.final_state, CrawlState::CycleDetected);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(crawler.availabilities().len(), 2);
}

#[tokio::test]
async fn test_absolute_next_href_is_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(
            &["Available from 29th Jul 2020"],
            Some(&format!("{}/to-rent/page-b", base_url)),
        ),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/to-rent/page-b",
        results_page(&["Available from 1st Aug 2020"], None),
        1,
    )
    .await;

    let config = create_test_config(&base_url);
    let mut crawler = create_test_crawler(&config);
    let summary = crawler.crawl(&config.site.search_path).await.unwrap();

    assert_eq!(summary.final_state, CrawlState::Done);
    assert_eq!(summary.pages_visited, 2);
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/uk/to-rent/page-a",
        results_page(&["Available from 29th Jul 2020"], Some("/to-rent/page-b?pn=2")),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "/uk/to-rent/page-b",
        results_page(&["Available from 1st Aug 2020"], None),
        1,
    )
    .await;
    mount_page(&mock_server, "/to-rent/page-a", results_page(&[], None), 0).await;
    mount_page(&mock_server, "/to-rent/page-b", results_page(&[], None), 0).await;

    let config = create_test_config(&format!("{}/uk", mock_server.uri()));
    let mut crawler = create_test_crawler(&config);
    let summary = crawler.crawl(&config.site.search_path).await.unwrap();

    assert_eq!(summary.final_state, CrawlState::Done);
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(
        crawler.availabilities(),
        &[date(2020, 7, 29), date(2020, 8, 1)]
    );
}

#[tokio::test]
async fn test_unresolvable_next_href_truncates_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(&["Available from 29th Jul 2020"], Some("http://[oops/b")),
        1,
    )
    .await;

    let config = create_test_config(&mock_server.uri());
    let mut crawler = create_test_crawler(&config);
    let summary = crawler
        .crawl(&config.site.search_path)
        .await
        .expect("A bad next link ends the crawl without an error");

    assert_eq!(summary.final_state, CrawlState::Aborted);
    assert_eq!(summary.pages_visited, 1);
    assert_eq!(crawler.availabilities(), &[date(2020, 7, 29)]);
}

#[tokio::test]
async fn test_crawl_then_export() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/to-rent/page-a",
        results_page(
            &[
                "Available from 29th Jul 2020",
                "Available from 29th Jul 2020",
                "Available from 1st Aug 2020",
            ],
            None,
        ),
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("availabilities.csv");

    let mut config = create_test_config(&mock_server.uri());
    config.output.output_path = csv_path.to_string_lossy().into_owned();

    let mut crawler = create_test_crawler(&config);
    crawler.crawl(&config.site.search_path).await.unwrap();
    let dates = crawler.into_availabilities();

    write_csv(&dates, &csv_path).unwrap();
    assert_eq!(
        std::fs::read_to_string(&csv_path).unwrap(),
        "29/07/2020\n29/07/2020\n01/08/2020\n"
    );

    let counts = aggregate_by_day(&dates);
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&date(2020, 7, 29)], 2);
    assert_eq!(counts[&date(2020, 8, 1)], 1);
}

#[tokio::test]
async fn test_fetch_absent_on_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw("<h1>Not found</h1>", HTML))
        .mount(&mock_server)
        .await;

    let config = Config::default();
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let url = format!("{}/missing", mock_server.uri());

    assert!(matches!(
        fetch_url(&client, &url).await,
        FetchResult::HttpError { status_code: 404 }
    ));
    assert_eq!(fetch_page(&client, &url).await, None);
}

#[tokio::test]
async fn test_fetch_absent_on_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&mock_server)
        .await;

    let config = Config::default();
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let url = format!("{}/api", mock_server.uri());

    match fetch_url(&client, &url).await {
        FetchResult::ContentMismatch { content_type } => {
            assert!(content_type.starts_with("application/json"))
        }
        other => panic!("Expected ContentMismatch, got {:?}", other),
    }
    assert_eq!(fetch_page(&client, &url).await, None);
}

#[tokio::test]
async fn test_fetch_absent_on_non_200_status() {
    let mock_server = MockServer::start().await;

    // 200 is the only accepted status; a 204 with an HTML type still fails
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(204).insert_header("content-type", HTML))
        .mount(&mock_server)
        .await;

    let config = Config::default();
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let url = format!("{}/empty", mock_server.uri());

    assert_eq!(fetch_page(&client, &url).await, None);
}

#[tokio::test]
async fn test_fetch_html_body() {
    let mock_server = MockServer::start().await;
    let body = results_page(&["Available immediately"], None);

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.clone(), HTML))
        .mount(&mock_server)
        .await;

    let config = Config::default();
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let url = format!("{}/page", mock_server.uri());

    assert_eq!(fetch_page(&client, &url).await, Some(body.into_bytes()));
}

#[tokio::test]
async fn test_fetch_network_error_is_absence() {
    // Reserve a port, then release it so nothing is listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = Config::default();
    let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
    let url = format!("http://127.0.0.1:{}/to-rent/", port);

    assert!(matches!(
        fetch_url(&client, &url).await,
        FetchResult::NetworkError { .. }
    ));
}
