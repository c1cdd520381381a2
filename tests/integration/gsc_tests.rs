//! `GscClient` against a mock Search Console

use gsc_reindex::config::ApiConfig;
use gsc_reindex::gsc::{
    AccessToken, GscClient, IndexRequester, PageStatusFetcher, PublishMetadataFetcher,
    SitemapSource,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "sc-domain:example.com";
const PAGE: &str = "https://example.com/a";

/// Creates a client pointing every API at the mock server
fn create_test_client(server: &MockServer) -> GscClient {
    let base = server.uri();
    GscClient::new(ApiConfig {
        inspection_endpoint: base.clone(),
        indexing_endpoint: base.clone(),
        webmasters_endpoint: base.clone(),
        token_endpoint: format!("{}/token", base),
        timeout_secs: 5,
        max_retries: 2,
    })
    .expect("Failed to build client")
}

fn token() -> AccessToken {
    AccessToken::new("test-token")
}

async fn mount_inspection(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v1/urlInspection/index:inspect"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({ "inspectionUrl": PAGE, "siteUrl": SITE })))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_inspection_returns_coverage_state() {
    let server = MockServer::start().await;
    mount_inspection(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "inspectionResult": {
                "indexStatusResult": {
                    "verdict": "PASS",
                    "coverageState": "Submitted and indexed"
                }
            }
        })),
    )
    .await;

    let status = create_test_client(&server)
        .get_page_indexing_status(&token(), SITE, PAGE)
        .await
        .unwrap();

    assert_eq!(status, "Submitted and indexed");
}

#[tokio::test]
async fn test_inspection_forbidden() {
    let server = MockServer::start().await;
    mount_inspection(&server, ResponseTemplate::new(403)).await;

    let status = create_test_client(&server)
        .get_page_indexing_status(&token(), SITE, PAGE)
        .await
        .unwrap();

    assert_eq!(status, "Forbidden");
}

#[tokio::test]
async fn test_inspection_rate_limited_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/urlInspection/index:inspect"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let status = create_test_client(&server)
        .get_page_indexing_status(&token(), SITE, PAGE)
        .await
        .unwrap();

    assert_eq!(status, "RateLimited");
}

#[tokio::test]
async fn test_inspection_client_error_maps_to_error() {
    let server = MockServer::start().await;
    mount_inspection(&server, ResponseTemplate::new(400)).await;

    let status = create_test_client(&server)
        .get_page_indexing_status(&token(), SITE, PAGE)
        .await
        .unwrap();

    assert_eq!(status, "Error");
}

#[tokio::test]
async fn test_inspection_server_error_is_retried_then_mapped_to_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/urlInspection/index:inspect"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let status = create_test_client(&server)
        .get_page_indexing_status(&token(), SITE, PAGE)
        .await
        .unwrap();

    assert_eq!(status, "Error");
}

#[tokio::test]
async fn test_publish_metadata_status_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/urlNotifications/metadata"))
        .and(query_param("url", PAGE))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/urlNotifications/metadata"))
        .and(query_param("url", "https://example.com/known"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com/known",
            "latestUpdate": { "type": "URL_UPDATED" }
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);

    assert_eq!(client.get_publish_metadata(&token(), PAGE).await.unwrap(), 404);
    assert_eq!(
        client
            .get_publish_metadata(&token(), "https://example.com/known")
            .await
            .unwrap(),
        200
    );
}

#[tokio::test]
async fn test_request_indexing_sends_url_updated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/urlNotifications:publish"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({ "url": PAGE, "type": "URL_UPDATED" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "urlNotificationMetadata": { "url": PAGE }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = create_test_client(&server)
        .request_indexing(&token(), PAGE)
        .await
        .unwrap();

    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_request_indexing_rate_limit_is_returned_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/urlNotifications:publish"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let status = create_test_client(&server)
        .request_indexing(&token(), PAGE)
        .await
        .unwrap();

    assert_eq!(status, 429);
}

#[tokio::test]
async fn test_request_indexing_server_error_returns_final_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/urlNotifications:publish"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let status = create_test_client(&server)
        .request_indexing(&token(), PAGE)
        .await
        .unwrap();

    assert_eq!(status, 500);
}

#[tokio::test]
async fn test_sitemap_pages_follow_index_and_dedupe() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path_regex(r"^/webmasters/v3/sites/.+/sitemaps$"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sitemap": [
                { "path": format!("{}/sitemap_index.xml", base) },
                { "path": format!("{}/missing.xml", base) }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>{base}/posts.xml</loc></sitemap>
  <sitemap><loc>{base}/pages.xml</loc></sitemap>
</sitemapindex>"#
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posts.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/post-1</loc></url>
  <url><loc>https://example.com/</loc></url>
</urlset>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/pages.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/</loc></url>
  <url><loc>https://example.com/about</loc></url>
</urlset>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = create_test_client(&server)
        .get_sitemap_pages(&token(), SITE)
        .await
        .unwrap();

    assert_eq!(
        result.sitemaps,
        vec![
            format!("{}/sitemap_index.xml", base),
            format!("{}/missing.xml", base)
        ]
    );
    assert_eq!(
        result.pages,
        vec![
            "https://example.com/post-1".to_string(),
            "https://example.com/".to_string(),
            "https://example.com/about".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_site_without_sitemaps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/webmasters/v3/sites/.+/sitemaps$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = create_test_client(&server)
        .get_sitemap_pages(&token(), SITE)
        .await
        .unwrap();

    assert!(result.sitemaps.is_empty());
    assert!(result.pages.is_empty());
}

#[tokio::test]
async fn test_sitemap_listing_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/webmasters/v3/sites/.+/sitemaps$"))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    let result = create_test_client(&server)
        .get_sitemap_pages(&token(), SITE)
        .await;

    assert!(matches!(
        result,
        Err(gsc_reindex::ReindexError::Api { status: 403, .. })
    ));
}
