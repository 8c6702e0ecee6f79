use factcheck_common::FetchConfig;
use factcheck_web::{FetchError, PageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const PAGE: &str = r#"<!doctype html>
<html>
  <head>
    <title>X raises $50M</title>
    <style>body { color: red; }</style>
    <script src="/tracker.js"></script>
  </head>
  <body>
    <h1>Company X raises $50M</h1>
    <script>window.dataLayer = [];</script>
    <p>The Series B   round was led by Y.</p>
  </body>
</html>"#;

/// Exact header match. Values here contain commas, which the stock matcher
/// splits on.
fn header_is(name: &'static str, expected: String) -> impl Fn(&Request) -> bool + Send + Sync + 'static {
    move |req: &Request| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

fn fetcher() -> PageFetcher {
    PageFetcher::new(&FetchConfig::default()).expect("fetcher builds")
}

#[tokio::test]
async fn html_page_is_cleaned_to_visible_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/story"))
        .and(header_is("accept-language", "en-US,en;q=0.5".to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"))
        .expect(1)
        .mount(&server)
        .await;

    let page = fetcher()
        .fetch(&format!("{}/story", server.uri()))
        .await
        .expect("page fetched");

    assert_eq!(
        page.content,
        "X raises $50M Company X raises $50M The Series B round was led by Y."
    );
    assert_eq!(page.content_type, "text/html; charset=utf-8");
}

#[tokio::test]
async fn sends_browser_like_headers() {
    let server = MockServer::start().await;
    let agent = FetchConfig::default().user_agent;
    Mock::given(method("GET"))
        .and(header_is("user-agent", agent))
        .and(header_is(
            "accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>ok</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let resp = fetcher().fetch_response(&server.uri()).await;
    assert!(resp.success, "{resp:?}");
    assert_eq!(resp.content.as_deref(), Some("ok"));
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resp = fetcher()
        .fetch_response(&format!("{}/missing", server.uri()))
        .await;
    assert!(!resp.success);
    assert_eq!(resp.error.as_deref(), Some("Failed to fetch URL: 404 Not Found"));
    assert_eq!(resp.content, None);
}

#[tokio::test]
async fn non_html_content_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let err = fetcher().fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, FetchError::ContentType(ref t) if t == "application/json"));
    assert_eq!(err.to_string(), "Invalid content type: application/json");
}

#[tokio::test]
async fn unsupported_scheme_is_an_invalid_url() {
    let err = fetcher().fetch("ftp://example.com/file").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}
