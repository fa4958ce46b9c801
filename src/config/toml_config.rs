use crate::adapters::http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::core::client::DEFAULT_API_URL;
use crate::core::rate_limiter::{MAX_REQUEST_LIMIT, MIN_WINDOW};
use crate::core::time_unit::TimeUnit;
use crate::core::ConfigProvider;
use crate::utils::error::{CrptError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 客戶端設定檔，所有區段與欄位皆可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub rate_limit: RateLimitConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub time_unit: TimeUnit,
    pub request_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            time_unit: TimeUnit::Seconds,
            request_limit: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ClientConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CrptError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CRPT_API_URL})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CrptError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.url", &self.api.url)?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 3600)?;
        validation::validate_non_empty_string("api.user_agent", &self.api.user_agent)?;
        validation::validate_range(
            "rate_limit.request_limit",
            self.rate_limit.request_limit,
            1,
            MAX_REQUEST_LIMIT,
        )?;
        if self.rate_limit.time_unit.as_duration() < MIN_WINDOW {
            return Err(CrptError::InvalidConfigValueError {
                field: "rate_limit.time_unit".to_string(),
                value: self.rate_limit.time_unit.to_string(),
                reason: "Windows shorter than one millisecond are not supported".to_string(),
            });
        }

        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(CrptError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Unsupported log level. Valid levels: {}", LOG_LEVELS.join(", ")),
            });
        }

        Ok(())
    }
}

impl ConfigProvider for ClientConfig {
    fn api_url(&self) -> &str {
        &self.api.url
    }

    fn time_unit(&self) -> TimeUnit {
        self.rate_limit.time_unit
    }

    fn request_limit(&self) -> usize {
        self.rate_limit.request_limit
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.api.user_agent
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[api]
url = "https://markirovka.demo.crpt.tech/api/v3/lk/documents/create"
timeout_seconds = 10
user_agent = "test-agent"

[rate_limit]
time_unit = "minutes"
request_limit = 100

[logging]
level = "debug"
json = true
"#;

        let config = ClientConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.api_url(),
            "https://markirovka.demo.crpt.tech/api/v3/lk/documents/create"
        );
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.time_unit(), TimeUnit::Minutes);
        assert_eq!(config.request_limit(), 100);
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClientConfig::from_toml_str("").unwrap();

        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.time_unit(), TimeUnit::Seconds);
        assert_eq!(config.request_limit(), 10);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CRPT_TEST_API_URL", "https://test.crpt.local/create");

        let toml_content = r#"
[api]
url = "${CRPT_TEST_API_URL}"
"#;

        let config = ClientConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api.url, "https://test.crpt.local/create");

        std::env::remove_var("CRPT_TEST_API_URL");
    }

    #[test]
    fn test_config_validation() {
        let invalid_url = ClientConfig::from_toml_str("[api]\nurl = \"invalid-url\"\n").unwrap();
        assert!(invalid_url.validate().is_err());

        let zero_limit =
            ClientConfig::from_toml_str("[rate_limit]\nrequest_limit = 0\n").unwrap();
        assert!(zero_limit.validate().is_err());

        let bad_level = ClientConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(bad_level.validate().is_err());
    }

    #[test]
    fn test_request_limit_upper_bound() {
        let huge_limit = ClientConfig::from_toml_str(
            "[rate_limit]\nrequest_limit = 9223372036854775807\n",
        )
        .unwrap();
        match huge_limit.validate() {
            Err(CrptError::InvalidConfigValueError { field, .. }) => {
                assert_eq!(field, "rate_limit.request_limit")
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut at_max = ClientConfig::default();
        at_max.rate_limit.request_limit = MAX_REQUEST_LIMIT;
        assert!(at_max.validate().is_ok());
    }

    #[test]
    fn test_sub_millisecond_time_unit_rejected() {
        for unit in ["nanoseconds", "microseconds"] {
            let config = ClientConfig::from_toml_str(&format!(
                "[rate_limit]\ntime_unit = \"{}\"\n",
                unit
            ))
            .unwrap();
            assert!(config.validate().is_err(), "{} should be rejected", unit);
        }

        let millis =
            ClientConfig::from_toml_str("[rate_limit]\ntime_unit = \"milliseconds\"\n").unwrap();
        assert!(millis.validate().is_ok());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = ClientConfig::default();
        config.api.timeout_seconds = 3600;
        assert!(config.validate().is_ok());

        config.api.timeout_seconds = 3601;
        assert!(config.validate().is_err());

        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_time_unit_fails_to_parse() {
        let result = ClientConfig::from_toml_str("[rate_limit]\ntime_unit = \"fortnights\"\n");
        assert!(matches!(result, Err(CrptError::ConfigValidationError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[rate_limit]\ntime_unit = \"seconds\"\nrequest_limit = 3\n")
            .unwrap();

        let config = ClientConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.request_limit(), 3);
    }
}
