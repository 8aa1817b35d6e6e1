// Server loop module
// Accepts connections until a shutdown signal, then drains in-flight work

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until `shutdown` is notified
///
/// After the listener closes, open connections get up to
/// `performance.shutdown_grace` seconds to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => break,
        }
    }

    // Stop accepting before draining
    drop(listener);

    let grace = Duration::from_secs(state.config.performance.shutdown_grace);
    drain_connections(&active_connections, grace).await;
    Ok(())
}

/// Wait for in-flight connections to finish, bounded by `grace`
async fn drain_connections(active: &AtomicUsize, grace: Duration) {
    logger::log_shutdown(active.load(Ordering::SeqCst));

    let deadline = tokio::time::Instant::now() + grace;
    while active.load(Ordering::SeqCst) > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }

    let remaining = active.load(Ordering::SeqCst);
    if remaining > 0 {
        logger::log_warning(&format!(
            "Shutdown grace period elapsed with {remaining} connection(s) still open"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_reusable_listener;

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let cfg = Config::from_toml(
            r#"
            [performance]
            shutdown_grace = 1

            [providers]
            geo_url = "http://127.0.0.1:9/{ip}"
            detail_url = "http://127.0.0.1:9/{lat},{lng}"
            "#,
        )
        .unwrap();
        let state = Arc::new(AppState::new(cfg).unwrap());
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{addr}/api/clientip"))
            .header("X-Forwarded-For", "198.51.100.20, 10.0.0.1")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, serde_json::json!({"ip": "198.51.100.20"}));

        let resp = client
            .post(format!("http://{addr}/api/query"))
            .json(&serde_json::json!({"ip": "127.0.0.1"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

        drop(client);
        shutdown.notify_one();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_slow_lookup_still_gets_json_response() {
        use wiremock::matchers::path;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let upstream = MockServer::start().await;
        Mock::given(path("/locate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"lat": 1.0, "lng": 2.0}}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&upstream)
            .await;

        let cfg = Config::from_toml(&format!(
            r#"
            [performance]
            read_timeout = 1
            write_timeout = 1
            shutdown_grace = 1

            [providers]
            geo_url = "{base}/locate?ip={{ip}}"
            detail_url = "{base}/latlng/{{lat}},{{lng}}"
            request_timeout = 5
            "#,
            base = upstream.uri()
        ))
        .unwrap();
        let state = Arc::new(AppState::new(cfg).unwrap());
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&shutdown)));

        let client = reqwest::Client::new();
        let resp = client
            .get(format!("http://{addr}/api/clientip"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let resp = client
            .post(format!("http://{addr}/api/query"))
            .json(&serde_json::json!({"ip": "8.8.8.8"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::GATEWAY_TIMEOUT);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, serde_json::json!({"error": "lookup timed out after 1 seconds"}));

        drop(client);
        shutdown.notify_one();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let active = AtomicUsize::new(0);
        let started = std::time::Instant::now();
        drain_connections(&active, Duration::from_secs(5)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
