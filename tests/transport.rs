//! `ReqwestTransport` against a local HTTP server.

use awful_gnews::feed::fetch_feed;
use awful_gnews::{Extractor, NewsError, ReqwestTransport, Transport};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UA: &str = "awful-gnews-test/1.0";

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{p}", server.uri())).unwrap()
}

#[tokio::test]
async fn head_reports_redirect_without_following_it() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/rss/articles/CBMi1"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", "https://publisher.example/story"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(None).unwrap();
    let resp = transport.head(&url(&server, "/rss/articles/CBMi1"), UA).await.unwrap();

    assert_eq!(resp.status, 302);
    assert!(resp.is_redirect());
    assert_eq!(resp.location.as_deref(), Some("https://publisher.example/story"));
}

#[tokio::test]
async fn get_sends_user_agent_and_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .and(header("user-agent", UA))
        .respond_with(ResponseTemplate::new(200).set_body_string("landed"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(None).unwrap();
    let resp = transport.get(&url(&server, "/old"), UA).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "landed");
}

#[tokio::test]
async fn fetch_feed_parses_served_rss() {
    let server = MockServer::start().await;
    let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Top stories</title>
<item><title>First - Outlet</title><link>https://news.google.com/rss/articles/A?oc=5</link><pubDate>Tue, 06 May 2025 14:30:00 GMT</pubDate></item>
<item><title>Second - Outlet</title><link>https://news.google.com/rss/articles/B?oc=5</link></item>
</channel></rss>"#;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(None).unwrap();
    let entries = fetch_feed(&transport, &url(&server, "/rss"), UA).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "First - Outlet");
    assert_eq!(entries[1].link, "https://news.google.com/rss/articles/B?oc=5");
}

#[tokio::test]
async fn fetch_feed_rejects_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(None).unwrap();
    let err = fetch_feed(&transport, &url(&server, "/rss"), UA).await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn extractor_uses_default_selector_for_unknown_host() {
    let server = MockServer::start().await;
    let page = r#"<html><head>
<meta property="og:title" content="Local story">
<meta property="og:site_name" content="Local Paper">
</head><body>
<div class="article-body"><p>First paragraph.</p><script>track()</script><p>Second paragraph.</p></div>
</body></html>"#;
    Mock::given(method("GET"))
        .and(path("/story"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>no container</p></body></html>"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(None).unwrap();
    let extractor = Extractor::new(&transport, Some(UA));

    let page = extractor.fetch_page(url(&server, "/story").as_str()).await.unwrap();
    assert_eq!(page.body, "First paragraph.\nSecond paragraph.");
    assert_eq!(page.metadata.title.as_deref(), Some("Local story"));
    assert_eq!(page.metadata.site_name.as_deref(), Some("Local Paper"));

    let err = extractor
        .extract_content(url(&server, "/bare").as_str())
        .await
        .unwrap_err();
    assert!(matches!(err, NewsError::EmptyContent { .. }));
}

#[tokio::test]
async fn proxy_receives_plain_http_requests() {
    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_string("via proxy"))
        .expect(1)
        .mount(&proxy)
        .await;

    let transport = ReqwestTransport::new(Some(&proxy.uri())).unwrap();
    let target = Url::parse("http://news.example.invalid/rss").unwrap();
    let resp = transport.get(&target, UA).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, "via proxy");
}
