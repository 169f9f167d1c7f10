#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use http::StatusCode;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::{json, Value};

    use crate::cache::store::StoreKind;
    use crate::cache::token_cache::MemoryStore;
    use crate::manager::token_manager::TokenManager;
    use crate::server::server::{router, TOKEN_PATH};
    use crate::tests::common::{service_config, spawn_axum};

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn token_endpoint_serves_cached_token() -> Result<()> {
        let drupal = MockServer::start_async().await;
        let token_mock = drupal
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth/token")
                    .header("accept", "application/json")
                    .header_exists("content-type");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "token_type": "Bearer",
                        "expires_in": 300,
                        "access_token": "served-token",
                        "refresh_token": "served-refresh",
                    }));
            })
            .await;

        let mut config = service_config(&drupal.base_url());
        config.settings.metrics.is_enabled = true;
        let manager = TokenManager::new(&config, StoreKind::Memory(MemoryStore::new()))?;
        let app = router(&config.settings, Arc::new(manager)).await;
        let (handle, addr) = spawn_axum(app).await;

        let client = reqwest::Client::new();
        let url = format!("http://{}{}", addr, TOKEN_PATH);
        for _ in 0..2 {
            let response = client.get(&url).send().await?;
            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = response.json().await?;
            assert_eq!(body["access_token"], "served-token");
            assert!(body["expirationDate"].as_i64().unwrap() > body["date"].as_i64().unwrap());
        }
        // second call is a cache hit
        token_mock.assert_hits_async(1).await;

        let metrics = client
            .get(format!("http://{}{}", addr, config.settings.metrics.path))
            .send()
            .await?
            .text()
            .await?;
        assert!(metrics.contains("drupaltoken_token_cache_hits_total"));
        assert!(metrics.contains("drupaltoken_grant_requests_total"));

        handle.abort();
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn token_endpoint_reports_rejected_credentials() -> Result<()> {
        let drupal = MockServer::start_async().await;
        drupal
            .mock_async(|when, then| {
                when.method(POST).path("/oauth/token");
                then.status(401)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"error": "invalid_grant"}));
            })
            .await;

        let config = service_config(&drupal.base_url());
        let manager = TokenManager::new(&config, StoreKind::Memory(MemoryStore::new()))?;
        let app = router(&config.settings, Arc::new(manager)).await;
        let (handle, addr) = spawn_axum(app).await;

        let response = reqwest::get(format!("http://{}{}", addr, TOKEN_PATH)).await?;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: Value = response.json().await?;
        assert!(body["error"].as_str().unwrap().contains("401"));

        // metrics route is off by default
        let metrics = reqwest::get(format!("http://{}/metrics", addr)).await?;
        assert_eq!(metrics.status(), StatusCode::NOT_FOUND);

        handle.abort();
        Ok(())
    }
}
