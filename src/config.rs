use secrecy::SecretString;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub refresh_expiration_hours: i64,
    pub openai_api_key: SecretString,
    pub generation_model: String,
    pub max_source_chars: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizrise-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "dev_secret_key_change_in_production".to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            refresh_expiration_hours: env::var("REFRESH_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(168),
            openai_api_key: SecretString::from(
                env::var("OPENAI_API_KEY").unwrap_or_else(|_| "sk-dev-placeholder".to_string()),
            ),
            generation_model: env::var("GENERATION_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            max_source_chars: env::var("MAX_SOURCE_CHARS")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(12_000),
        }
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// Validate that production-critical configuration is set.
    /// Panics if required secrets are using default values. Only called
    /// when `APP_ENV=production`, so the dev defaults above stay bootable.
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == "dev_secret_key_change_in_production" {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.openai_api_key.expose_secret() == "sk-dev-placeholder" {
            panic!(
                "FATAL: OPENAI_API_KEY is using default value! Set OPENAI_API_KEY environment variable."
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            app_env: "test".to_string(),
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizrise-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            refresh_expiration_hours: 168,
            openai_api_key: SecretString::from("sk-test".to_string()),
            generation_model: "gpt-4o-mini".to_string(),
            max_source_chars: 2_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env_with_defaults() {
        let config = Config::from_env();

        // Should use env vars if set, or fall back to defaults
        assert!(!config.mongo_conn_string.is_empty());
        assert!(!config.mongo_db_name.is_empty());
        assert!(config.max_source_chars > 0);
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();

        assert_eq!(config.mongo_conn_string, "mongodb://localhost:27017");
        assert_eq!(config.mongo_db_name, "quizrise-test");
        assert_eq!(config.max_source_chars, 2_000);
        assert!(!config.is_production());
    }

    #[test]
    fn non_production_environments_skip_secret_validation() {
        let mut config = Config::test_config();
        config.app_env = "development".to_string();
        config.jwt_secret = SecretString::from("dev_secret_key_change_in_production".to_string());

        // The startup path only validates when is_production() holds.
        assert!(!config.is_production());
    }

    #[test]
    #[should_panic(expected = "JWT_SECRET")]
    fn production_validation_rejects_the_default_jwt_secret() {
        let mut config = Config::test_config();
        config.jwt_secret = SecretString::from("dev_secret_key_change_in_production".to_string());

        config.validate_for_production();
    }

    #[test]
    #[should_panic(expected = "OPENAI_API_KEY")]
    fn production_validation_rejects_the_placeholder_openai_key() {
        let mut config = Config::test_config();
        config.jwt_secret =
            SecretString::from("a-long-enough-production-grade-secret-key".to_string());
        config.openai_api_key = SecretString::from("sk-dev-placeholder".to_string());

        config.validate_for_production();
    }
}
