// End-to-end checks of the cached API against a local canned HTTP server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use overseas_api::api::{JobQuery, RateLimit};
use overseas_api::{ApiClient, ApiConfig, ApiError, CacheConfig, CachedApi, RequestCache};
use reqwest::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Canned {
    status: u16,
    body: &'static str,
    headers: Vec<(&'static str, &'static str)>,
}

fn ok(body: &'static str) -> Canned {
    Canned {
        status: 200,
        body,
        headers: Vec::new(),
    }
}

fn status(status: u16, headers: Vec<(&'static str, &'static str)>) -> Canned {
    Canned {
        status,
        body: r#"{"message":"error"}"#,
        headers,
    }
}

/// Serves canned responses in order, repeating the last one.
struct MockServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    async fn start(responses: Vec<Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        tokio::spawn(async move {
            let mut served = 0usize;
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };

                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                seen.lock().unwrap().push(String::from_utf8_lossy(&buf).into_owned());

                let canned = &responses[served.min(responses.len() - 1)];
                served += 1;

                let reason = StatusCode::from_u16(canned.status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown");
                let mut response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                    canned.status,
                    reason,
                    canned.body.len()
                );
                for (name, value) in &canned.headers {
                    response.push_str(&format!("{}: {}\r\n", name, value));
                }
                response.push_str("\r\n");
                response.push_str(canned.body);

                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].clone()
    }
}

fn api(server: &MockServer, cache: CacheConfig) -> CachedApi {
    let mut config = ApiConfig::new(&server.base_url);
    config.token = Some("test-token".into());
    config.cache = cache;
    let client = ApiClient::new(&config).unwrap();
    CachedApi::new(client, Arc::new(RequestCache::new(config.cache)))
}

const COUNTRIES: &str = r#"{"data":[{"id":1,"name":"Qatar","code":"QA"},{"id":2,"name":"Oman","code":null}]}"#;
const JOBS: &str = r#"{"data":[{"id":7,"title":"Electrician","country":"Qatar"}],"current_page":2,"last_page":2,"total":11}"#;

#[tokio::test]
async fn repeated_reads_hit_the_backend_once() {
    let server = MockServer::start(vec![ok(COUNTRIES)]).await;
    let api = api(&server, CacheConfig::default());

    let first = api.countries().await.unwrap();
    let second = api.countries().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].name, "Qatar");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn job_query_and_token_are_sent() {
    let server = MockServer::start(vec![ok(JOBS)]).await;
    let api = api(&server, CacheConfig::default());

    let query = JobQuery {
        country_id: Some(5),
        ..JobQuery::page(2)
    };
    let page = api.jobs(&query).await.unwrap();

    assert_eq!(page.data[0].title, "Electrician");
    assert!(!page.has_more());

    let request = server.request(0);
    assert!(request.starts_with("GET /jobs?page=2&country_id=5 HTTP/1.1"));
    assert!(request.to_lowercase().contains("authorization: bearer test-token"));
}

#[tokio::test]
async fn upstream_429_serves_stale_data() {
    let server = MockServer::start(vec![
        ok(COUNTRIES),
        status(429, vec![("Retry-After", "30"), ("X-RateLimit-Remaining", "0")]),
    ])
    .await;
    let api = api(
        &server,
        CacheConfig::default().with_cache_duration(Duration::from_millis(1)),
    );

    let fresh = api.countries().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let stale = api.countries().await.unwrap();

    assert_eq!(fresh, stale);
    assert_eq!(server.hits(), 2);
    assert_eq!(
        api.client().rate_limit(),
        RateLimit {
            limit: None,
            remaining: Some(0),
            retry_after: Some(30),
        }
    );
}

#[tokio::test]
async fn upstream_429_without_cache_propagates() {
    let server = MockServer::start(vec![status(429, vec![("Retry-After", "30")])]).await;
    let api = api(&server, CacheConfig::default());

    let err = api.occupations().await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimited { retry_after: Some(30) }));
}

#[tokio::test]
async fn exhausted_budget_is_throttled_locally() {
    let server = MockServer::start(vec![ok(r#"{"data":{"id":1,"title":"Cook"}}"#)]).await;
    let api = api(&server, CacheConfig::default().with_max_requests(1));

    assert_eq!(api.job(1).await.unwrap().title, "Cook");

    let err = api.job(2).await.unwrap_err();
    assert!(matches!(err, ApiError::Throttled { ref endpoint } if endpoint == "job"));
    assert_eq!(server.hits(), 1);

    // Other endpoints keep their own budget.
    api.countries().await.unwrap_err();
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn not_found_propagates_and_is_not_cached() {
    let server = MockServer::start(vec![status(404, Vec::new())]).await;
    let api = api(&server, CacheConfig::default());

    assert!(matches!(api.job(99).await, Err(ApiError::NotFound(_))));
    assert!(matches!(api.job(99).await, Err(ApiError::NotFound(_))));
    assert_eq!(server.hits(), 2);
    assert_eq!(api.cache().stats().entries, 0);
}
