use crate::config::toml_config::ClientConfig;
use crate::core::time_unit::TimeUnit;
use crate::core::Document;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "crpt-api")]
#[command(about = "Submit documents to the CRPT (Честный знак) API with client-side rate limiting")]
pub struct CliConfig {
    #[arg(long, help = "Path to the document JSON file")]
    pub document: String,

    #[arg(long, env = "CRPT_SIGNATURE", hide_env_values = true, help = "Value for the Authorization header")]
    pub signature: Option<String>,

    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Override api.url")]
    pub api_url: Option<String>,

    #[arg(long, help = "Override rate_limit.time_unit (seconds, minutes, ...)")]
    pub time_unit: Option<TimeUnit>,

    #[arg(long, help = "Override rate_limit.request_limit")]
    pub request_limit: Option<usize>,

    #[arg(long, default_value = "1", help = "Submit the document this many times")]
    pub repeat: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入設定檔並套用命令列覆寫
    pub fn resolve(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(api_url) = &self.api_url {
            config.api.url = api_url.clone();
        }
        if let Some(time_unit) = self.time_unit {
            config.rate_limit.time_unit = time_unit;
        }
        if let Some(request_limit) = self.request_limit {
            config.rate_limit.request_limit = request_limit;
        }
        if self.json_logs {
            config.logging.json = true;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn signature(&self) -> Result<&str> {
        let signature = validation::validate_required_field("signature", &self.signature)?;
        validation::validate_non_empty_string("signature", signature)?;
        Ok(signature.as_str())
    }

    pub fn load_document(&self) -> Result<Document> {
        let content = std::fs::read_to_string(&self.document)?;
        let document = serde_json::from_str(&content)?;
        Ok(document)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("document", &self.document)?;
        validation::validate_positive_number("repeat", self.repeat, 1)?;
        if let Some(path) = &self.config {
            validation::validate_path("config", path)?;
        }
        self.signature()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CrptError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["crpt-api"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let mut config_file = NamedTempFile::new().unwrap();
        config_file
            .write_all(b"[rate_limit]\ntime_unit = \"minutes\"\nrequest_limit = 50\n")
            .unwrap();
        let config_path = config_file.path().to_str().unwrap().to_string();

        let cli = parse(&[
            "--document",
            "doc.json",
            "--signature",
            "Bearer token",
            "--config",
            &config_path,
            "--request-limit",
            "5",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.rate_limit.time_unit, TimeUnit::Minutes);
        assert_eq!(config.rate_limit.request_limit, 5);
    }

    #[test]
    fn test_time_unit_argument() {
        let cli = parse(&["--document", "doc.json", "--time-unit", "ms"]);
        assert_eq!(cli.time_unit, Some(TimeUnit::Milliseconds));
        assert!(CliConfig::try_parse_from(["crpt-api", "--document", "d.json", "--time-unit", "weeks"]).is_err());
    }

    #[test]
    fn test_zero_request_limit_rejected() {
        let cli = parse(&["--document", "doc.json", "--request-limit", "0"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn test_blank_signature_rejected() {
        let cli = parse(&["--document", "doc.json", "--signature", "  "]);
        assert!(matches!(
            cli.validate(),
            Err(CrptError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_zero_repeat_rejected() {
        let cli = parse(&[
            "--document",
            "doc.json",
            "--signature",
            "Bearer token",
            "--repeat",
            "0",
        ]);
        match cli.validate() {
            Err(CrptError::InvalidConfigValueError { field, .. }) => assert_eq!(field, "repeat"),
            other => panic!("unexpected result: {:?}", other),
        }

        let cli = parse(&["--document", "doc.json", "--signature", "Bearer token", "--repeat", "3"]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.repeat, 3);
    }

    #[test]
    fn test_load_document() {
        let mut document_file = NamedTempFile::new().unwrap();
        document_file
            .write_all(br#"{"doc_id": "42", "importRequest": true}"#)
            .unwrap();

        let cli = parse(&["--document", document_file.path().to_str().unwrap()]);
        let document = cli.load_document().unwrap();

        assert_eq!(document.doc_id.as_deref(), Some("42"));
        assert!(document.import_request);
    }
}
