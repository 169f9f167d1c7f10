#[cfg(test)]
mod tests {

    use std::path::Path;

    use serial_test::serial;

    use crate::config::proc_loader::{env_to_config, expand_env_vars, file_to_config, parse_config};
    use crate::config::proc_validator::validate_service_config;
    use crate::config::settings::{LogFormat, StorageConfig};
    use crate::manager::token_manager::TokenManager;
    use crate::cache::token_cache::MemoryStore;
    use crate::tests::common::service_config;
    use crate::utils::constants::*;

    const ENV_VARS: [&str; 6] = [
        ENV_CLIENT_ID,
        ENV_CLIENT_SECRET,
        ENV_CLIENT_SCOPE,
        ENV_DRUPAL_ROOT,
        ENV_DRUPAL_USER,
        ENV_DRUPAL_PASSWORD,
    ];

    fn set_env() {
        std::env::set_var(ENV_CLIENT_ID, "cid");
        std::env::set_var(ENV_CLIENT_SECRET, "csecret");
        std::env::set_var(ENV_CLIENT_SCOPE, "consumer");
        std::env::set_var(ENV_DRUPAL_ROOT, "https://cms.example.com/");
        std::env::set_var(ENV_DRUPAL_USER, "api");
        std::env::set_var(ENV_DRUPAL_PASSWORD, "pw");
    }

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    #[serial]
    async fn repo_config_is_valid() {
        set_env();
        std::env::remove_var(ENV_CLIENT_SCOPE);
        let cfg = file_to_config(Path::new("configs/drupal-token.yaml"))
            .await
            .expect("configs/drupal-token.yaml must exist in repo root for tests");
        clear_env();

        assert_eq!(cfg.oauth.client_id, "cid");
        // default from ${CLIENT_SCOPE:consumer}
        assert_eq!(cfg.oauth.scope, "consumer");
        assert_eq!(cfg.oauth.token_url(), "https://cms.example.com/oauth/token");
        assert_eq!(
            cfg.settings.storage,
            StorageConfig::File { path: "/var/lib/drupal-token".into(), key: "access-token".into() }
        );
        assert_eq!(cfg.settings.logging.as_ref().map(|l| l.format.clone()), Some(LogFormat::Json));
        assert!(cfg.settings.metrics.is_enabled);
    }

    #[tokio::test]
    #[serial]
    async fn env_config_uses_defaults() {
        set_env();
        let cfg = env_to_config().await;
        clear_env();

        let cfg = cfg.unwrap();
        assert_eq!(cfg.oauth.username, "api");
        assert_eq!(cfg.settings.storage.key(), DEFAULT_STORAGE_KEY);
        assert_eq!(cfg.settings.http.timeout_ms, DEFAULT_HTTP_TIMEOUT_MS);
        assert!(!cfg.settings.metrics.is_enabled);
    }

    #[tokio::test]
    #[serial]
    async fn missing_env_is_rejected_with_every_field_named() {
        clear_env();
        let err = env_to_config().await.unwrap_err().to_string();
        for field in ["client_id", "client_secret", "scope", "drupal_root", "username", "password"] {
            assert!(err.contains(&format!("oauth.{} is required", field)), "{}", err);
        }
    }

    #[tokio::test]
    async fn settings_are_optional() {
        let yaml = r#"
oauth:
  client_id: cid
  client_secret: secret
  scope: consumer
  drupal_root: http://drupal.local
  username: api
  password: pw
"#;
        let cfg = parse_config(yaml.to_owned()).await.unwrap();
        assert_eq!(cfg.settings.storage, StorageConfig::default());
        assert_eq!(cfg.settings.server.port, DEFAULT_SERVER_PORT);
        assert_eq!(cfg.settings.metrics.path, DEFAULT_METRICS_PATH);
    }

    #[tokio::test]
    async fn invalid_settings_are_aggregated() {
        let yaml = r#"
oauth:
  client_id: cid
  client_secret: secret
  scope: consumer
  drupal_root: ftp://drupal.local
  username: api
  password: pw
settings:
  storage:
    type: file
    path: ""
  http:
    timeout_ms: 0
  logging:
    level: loud
  metrics:
    path: metrics
  server:
    port: http
"#;
        let err = parse_config(yaml.to_owned()).await.unwrap_err().to_string();
        assert!(err.contains("total errors: 6"), "{}", err);
        assert!(err.contains("oauth.drupal_root"));
        assert!(err.contains("settings.storage.path"));
        assert!(err.contains("settings.http.timeout_ms"));
        assert!(err.contains("settings.logging.level"));
        assert!(err.contains("settings.metrics.path"));
        assert!(err.contains("settings.server.port"));
    }

    #[test]
    fn relative_drupal_root_is_rejected() {
        let cfg = service_config("cms.example.com");
        let errors = validate_service_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("oauth.drupal_root"));
    }

    #[test]
    fn manager_construction_fails_fast() {
        let mut cfg = service_config("http://drupal.local");
        cfg.oauth.client_secret = String::new();
        let err = TokenManager::new(&cfg, MemoryStore::new()).unwrap_err();
        assert!(err.to_string().contains("oauth.client_secret is required"));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let cfg = service_config("http://drupal.local");
        let debug = format!("{:?}", cfg);
        assert!(!debug.contains("client-secret"));
        assert!(!debug.contains("api-password"));
        assert!(debug.contains("client-id"));
    }

    #[test]
    #[serial]
    fn expand_env_vars_falls_back_to_default() {
        std::env::set_var("DRUPAL_TOKEN_TEST_VAR", "set");
        std::env::remove_var("DRUPAL_TOKEN_TEST_UNSET");
        let out = expand_env_vars("a: ${DRUPAL_TOKEN_TEST_VAR}\nb: ${DRUPAL_TOKEN_TEST_UNSET:fallback}\nc: ${DRUPAL_TOKEN_TEST_UNSET}");
        std::env::remove_var("DRUPAL_TOKEN_TEST_VAR");
        assert_eq!(out, "a: set\nb: fallback\nc: ");
    }
}
