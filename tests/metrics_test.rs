//! Request instrumentation and the Prometheus exposition route.

use reqwest::StatusCode;

use submission_service::config::ServiceConfig;
use submission_service::observability;

mod common;

#[tokio::test]
async fn test_requests_are_counted_without_changing_responses() {
    let handle = observability::init_metrics().unwrap();
    let service = common::start_with(ServiceConfig::default(), Some(handle)).await;
    let client = common::client();

    let res = client.get(service.url("/api/ready")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "Backend is running");

    let res = client.get(service.url("/api/submit")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    let res = common::submit(&client, &service, "", "Hi").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client.get(service.url("/metrics")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    // The exposition route is not wrapped with CORS headers.
    assert!(!res.headers().contains_key("access-control-allow-origin"));
    let text = res.text().await.unwrap();

    assert!(text.contains("http_requests_total"));
    assert!(text.contains("http_request_duration_seconds_bucket"));
    for labels in [
        r#"path="/api/ready""#,
        r#"path="/api/submit""#,
        r#"method="GET""#,
        r#"method="POST""#,
    ] {
        assert!(text.contains(labels), "missing {} in:\n{}", labels, text);
    }
    assert!(!text.contains(r#"path="/metrics""#));
}
