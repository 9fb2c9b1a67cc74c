//! Test helpers for the Zoom API
#![allow(clippy::disallowed_methods)]

use super::{Client, Credentials, RetryConfig};

pub const TEST_TOKEN: &str = "test-access-token";

pub fn test_credentials() -> Credentials {
    Credentials {
        account_id: "acct".to_string(),
        client_id: "cid".to_string(),
        client_secret: "secret".to_string(),
    }
}

/// Client pointed at a mock server for both OAuth and API calls, with short backoff
pub fn create_test_client(url: &str) -> Client {
    Client::with_config(
        url,
        url,
        test_credentials(),
        RetryConfig {
            max_retries: 3,
            initial_backoff_ms: 1,
            max_backoff_ms: 5,
            timeout_seconds: 5,
        },
    )
    .unwrap()
}

pub async fn mock_oauth(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("POST", "/oauth/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"access_token":"{}","token_type":"bearer","expires_in":3600,"scope":"phone:write:admin"}}"#,
            TEST_TOKEN
        ))
        .create_async()
        .await
}

pub fn bearer() -> String {
    format!("Bearer {}", TEST_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::super::*;
    use super::*;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Profile {
        id: String,
    }

    #[tokio::test]
    async fn test_retry_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff_ms, 100);
        assert_eq!(config.max_backoff_ms, 10000);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[tokio::test]
    async fn test_connection_pool_config() {
        use pool::ConnectionPoolConfig;

        let config = ConnectionPoolConfig::default();
        assert_eq!(config.max_idle_connections, 10);
        assert_eq!(config.idle_timeout.as_secs(), 90);
        assert_eq!(config.connection_timeout.as_secs(), 10);
        assert_eq!(config.request_timeout.as_secs(), 30);
        assert_eq!(config.tcp_keepalive.unwrap().as_secs(), 30);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_fetches_token_once_and_sends_bearer() {
        let mut server = Server::new_async().await;
        let oauth = mock_oauth(&mut server).await;
        let api = server
            .mock("GET", "/phone/users/u1")
            .match_header("authorization", bearer().as_str())
            .with_body(r#"{"id":"u1"}"#)
            .expect(2)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let first: Profile = client.get("/phone/users/u1").await.unwrap();
        let second: Profile = client.get("/phone/users/u1").await.unwrap();

        assert_eq!(first.id, "u1");
        assert_eq!(second.id, "u1");
        oauth.assert_async().await;
        api.assert_async().await;

        let stats = client.get_connection_stats().await;
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.failed_requests, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_retries_server_errors() {
        let mut server = Server::new_async().await;
        mock_oauth(&mut server).await;
        let failing = server
            .mock("GET", "/phone/users/u1")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;
        let ok = server
            .mock("GET", "/phone/users/u1")
            .with_body(r#"{"id":"u1"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let profile: Profile = client.get("/phone/users/u1").await.unwrap();

        assert_eq!(profile.id, "u1");
        failing.assert_async().await;
        ok.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_gives_up_after_max_retries_on_rate_limit() {
        let mut server = Server::new_async().await;
        mock_oauth(&mut server).await;
        let limited = server
            .mock("GET", "/phone/users/u1")
            .with_status(429)
            .expect(4)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result: Result<Profile, _> = client.get("/phone/users/u1").await;

        assert!(matches!(result, Err(ApiError::RateLimited)));
        limited.assert_async().await;

        let stats = client.get_connection_stats().await;
        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.rate_limited_requests, 4);
        assert_eq!(stats.token_fetches, 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_maps_unauthorized_and_refetches_token() {
        let mut server = Server::new_async().await;
        let oauth = server
            .mock("POST", "/oauth/token")
            .with_body(r#"{"access_token":"t","token_type":"bearer","expires_in":3600}"#)
            .expect(2)
            .create_async()
            .await;
        server
            .mock("GET", "/phone/users/u1")
            .with_status(401)
            .with_body(r#"{"code":124,"message":"Invalid access token."}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let first: Result<Profile, _> = client.get("/phone/users/u1").await;
        let second: Result<Profile, _> = client.get("/phone/users/u1").await;

        assert!(matches!(first, Err(ApiError::AuthError)));
        assert!(matches!(second, Err(ApiError::AuthError)));
        oauth.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_parses_error_body_code() {
        let mut server = Server::new_async().await;
        mock_oauth(&mut server).await;
        server
            .mock("GET", "/phone/call_queues/cq1")
            .with_status(400)
            .with_body(r#"{"code":300,"message":"Call queue does not exist."}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let err = client
            .get::<serde_json::Value>("/phone/call_queues/cq1")
            .await
            .unwrap_err();

        assert!(err.is_deleted_on_read());
        match err {
            ApiError::ApiError {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, Some(300));
                assert_eq!(message, "Call queue does not exist.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_accepts_empty_success_bodies() {
        let mut server = Server::new_async().await;
        mock_oauth(&mut server).await;
        let mock = server
            .mock("DELETE", "/phone/call_queues/cq1/members/m1")
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client
            .delete::<()>("/phone/call_queues/cq1/members/m1")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn client_surfaces_token_errors() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/oauth/token")
            .with_status(401)
            .with_body(r#"{"reason":"Invalid client_id or client_secret"}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let result = client.get::<serde_json::Value>("/phone/users/u1").await;

        assert!(matches!(result, Err(ApiError::TokenError(_))));
    }

    #[test]
    fn client_rejects_invalid_urls() {
        let result = Client::new("not a url", "https://zoom.us", test_credentials());
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));

        let result = Client::new("ftp://api.zoom.us", "https://zoom.us", test_credentials());
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn client_strips_trailing_slash() {
        let client = Client::new("https://api.zoom.us/v2/", "https://zoom.us/", test_credentials())
            .unwrap();
        assert_eq!(client.base_url(), "https://api.zoom.us/v2");
    }
}
