use serde::{Deserialize, Serialize};
use std::io::Error as IoError;
use std::path::{Path, PathBuf};
use std::{env, fs};
use thiserror::Error;

pub const CONFIG_PATH: &str = "./doctor.toml";
pub const API_KEY_VARIABLE: &str = "DOCTOR_API_KEY";
pub const SEARCH_ENGINE_ID_VARIABLE: &str = "DOCTOR_SEARCH_ENGINE_ID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file {0} not found: {1}")]
    NotFound(String, IoError),
    #[error("Unable to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("API credential \"{0}\" is not set")]
    MissingCredential(&'static str),
    #[error("Configuration value \"{0}\" is out of range")]
    OutOfRange(&'static str),
}

#[derive(Debug, Deserialize)]
struct ConfigTable {
    #[serde(rename = "Config")]
    config: Config,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default, skip_serializing)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub search_engine_id: String,
    #[serde(skip_serializing)]
    pub model_path: PathBuf,
    #[serde(skip_serializing)]
    pub labels_path: PathBuf,
    #[serde(default = "default_input_size")]
    pub input_size: u32, //pixels
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f32,
    #[serde(default = "default_confidence")]
    pub default_confidence: f32,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
    #[serde(default = "default_max_confidence")]
    pub max_confidence: f32,
    #[serde(default = "default_confidence_step")]
    pub confidence_step: f32,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_summary_sentences")]
    pub summary_sentences: u32,
    #[serde(default = "default_http_server_bind_port")]
    pub http_server_bind_port: u16, //port
    #[serde(default = "default_bind_retry_duration")]
    pub bind_retry_duration: u64, //seconds
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize, //bytes
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64, //seconds
    #[serde(default = "default_search_endpoint", skip_serializing)]
    pub search_endpoint: String,
    #[serde(default = "default_summary_endpoint", skip_serializing)]
    pub summary_endpoint: String,
    #[serde(default = "default_country_site_token")]
    pub country_site_token: String,
    #[serde(default = "default_marketplace_domain")]
    pub marketplace_domain: String,
    #[serde(default = "default_marketplace_name")]
    pub marketplace_name: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    /// Reads the file, lets the environment override the credentials, then validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let toml_string = fs::read_to_string(path)
            .map_err(|err| ConfigError::NotFound(path.display().to_string(), err))?;
        let mut config = toml::from_str::<ConfigTable>(&toml_string)?.config;
        if let Ok(api_key) = env::var(API_KEY_VARIABLE) {
            config.api_key = api_key;
        }
        if let Ok(search_engine_id) = env::var(SEARCH_ENGINE_ID_VARIABLE) {
            config.search_engine_id = search_engine_id;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(toml_string: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<ConfigTable>(toml_string)?.config;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential("api_key"));
        }
        if self.search_engine_id.trim().is_empty() {
            return Err(ConfigError::MissingCredential("search_engine_id"));
        }
        let checks = [
            (Self::validate_input_size(self.input_size), "input_size"),
            (Self::validate_probability(self.iou_threshold), "iou_threshold"),
            (Self::validate_probability(self.min_confidence) && self.min_confidence > 0.0, "min_confidence"),
            (Self::validate_probability(self.max_confidence) && self.max_confidence >= self.min_confidence, "max_confidence"),
            (self.accepts_confidence(self.default_confidence), "default_confidence"),
            (self.confidence_step > 0.0 && self.confidence_step <= self.max_confidence - self.min_confidence, "confidence_step"),
            ((1..=10).contains(&self.max_results), "max_results"),
            ((1..=10).contains(&self.summary_sentences), "summary_sentences"),
            (Self::validate_second(self.bind_retry_duration), "bind_retry_duration"),
            (self.max_upload_size > 0, "max_upload_size"),
            (Self::validate_second(self.request_timeout) && self.request_timeout > 0, "request_timeout"),
            (!self.country_site_token.trim().is_empty(), "country_site_token"),
            (!self.marketplace_domain.trim().is_empty(), "marketplace_domain"),
            (!self.marketplace_name.trim().is_empty(), "marketplace_name"),
        ];
        match checks.into_iter().find(|(valid, _)| !valid) {
            Some((_, field)) => Err(ConfigError::OutOfRange(field)),
            None => Ok(()),
        }
    }

    /// Whether a user-chosen confidence threshold lies within the slider bounds.
    pub fn accepts_confidence(&self, confidence: f32) -> bool {
        confidence >= self.min_confidence && confidence <= self.max_confidence
    }

    fn validate_probability(value: f32) -> bool {
        (0.0..=1.0).contains(&value)
    }

    fn validate_second(second: u64) -> bool {
        second <= 3600
    }

    fn validate_input_size(size: u32) -> bool {
        size >= 32 && size % 32 == 0
    }
}

fn default_input_size() -> u32 {
    640
}

fn default_iou_threshold() -> f32 {
    0.7
}

fn default_confidence() -> f32 {
    0.1
}

fn default_min_confidence() -> f32 {
    0.01
}

fn default_max_confidence() -> f32 {
    1.0
}

fn default_confidence_step() -> f32 {
    0.01
}

fn default_max_results() -> usize {
    3
}

fn default_summary_sentences() -> u32 {
    2
}

fn default_http_server_bind_port() -> u16 {
    8501
}

fn default_bind_retry_duration() -> u64 {
    5
}

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

fn default_request_timeout() -> u64 {
    10
}

fn default_search_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_summary_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_country_site_token() -> String {
    "site:.in".to_string()
}

fn default_marketplace_domain() -> String {
    "amazon.in".to_string()
}

fn default_marketplace_name() -> String {
    "Amazon India".to_string()
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config::from_toml_str(
        r#"
        [Config]
        api_key = "key"
        search_engine_id = "engine"
        model_path = "model.onnx"
        labels_path = "labels.txt"
        "#,
    )
    .expect("test configuration is valid")
}
