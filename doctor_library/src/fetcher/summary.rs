use crate::utils::config::Config;
use crate::utils::logging::*;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("\"{0}\" may refer to several topics")]
    Ambiguous(String),
    #[error("No Wikipedia page found for \"{0}\"")]
    NotFound(String),
    #[error("Wikipedia lookup failed: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Text shown to the user in place of the summary.
    pub fn fallback(&self) -> &'static str {
        match self {
            FetchError::Ambiguous(_) => "Information is ambiguous, please refine your search.",
            FetchError::NotFound(_) => "No Wikipedia page found for this disease.",
            FetchError::Unavailable(_) => "An error occurred while fetching Wikipedia data.",
        }
    }
}

pub trait SummaryFetcher: Send + Sync + 'static {
    fn fetch_summary(&self, name: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// MediaWiki action API lookup: search for the closest title, then read the lead extract.
pub struct WikipediaFetcher {
    client: reqwest::Client,
    endpoint: String,
    sentences: u32,
}

impl WikipediaFetcher {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.summary_endpoint.clone(),
            sentences: config.summary_sentences,
        }
    }

    async fn query(&self, parameters: &[(&str, &str)]) -> Result<Value, FetchError> {
        match self.request(parameters).await {
            Ok(body) => Ok(body),
            Err(entry) => {
                let message = entry.to_string();
                logging_warning!(entry, format!("Parameters: {parameters:?}"));
                Err(FetchError::Unavailable(message))
            },
        }
    }

    async fn request(&self, parameters: &[(&str, &str)]) -> Result<Value, NetworkEntry> {
        let response = self.client.get(&self.endpoint)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(parameters)
            .send().await
            .map_err(|err| NetworkEntry::RequestError(self.endpoint.clone(), err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkEntry::UnexpectedStatus(self.endpoint.clone(), status.as_u16()));
        }
        let body = response.json::<Value>().await
            .map_err(|err| NetworkEntry::MalformedResponse(self.endpoint.clone(), err.to_string()))?;
        if let Some(info) = body.get("error").and_then(|error| error.get("info")).and_then(Value::as_str) {
            return Err(NetworkEntry::ApiError(self.endpoint.clone(), info.to_string()));
        }
        Ok(body)
    }

    async fn resolve_title(&self, name: &str) -> Result<String, FetchError> {
        let body = self.query(&[("list", "search"), ("srsearch", name), ("srlimit", "1"), ("srprop", "")]).await?;
        parse_search_title(name, &body)
    }
}

impl SummaryFetcher for WikipediaFetcher {
    async fn fetch_summary(&self, name: &str) -> Result<String, FetchError> {
        let title = self.resolve_title(name).await?;
        let sentences = self.sentences.to_string();
        let body = self.query(&[
            ("prop", "extracts|pageprops"),
            ("exsentences", sentences.as_str()),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("titles", title.as_str()),
        ]).await?;
        parse_summary(&title, &body)
    }
}

pub fn parse_search_title(name: &str, body: &Value) -> Result<String, FetchError> {
    let hits = body["query"]["search"].as_array()
        .ok_or_else(|| FetchError::Unavailable("search response has no result list".to_string()))?;
    hits.first()
        .and_then(|hit| hit.get("title"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| FetchError::NotFound(name.to_string()))
}

pub fn parse_summary(title: &str, body: &Value) -> Result<String, FetchError> {
    let pages = body["query"]["pages"].as_array()
        .ok_or_else(|| FetchError::Unavailable("extract response has no page list".to_string()))?;
    let page = pages.first().ok_or_else(|| FetchError::NotFound(title.to_string()))?;
    if page["missing"].as_bool() == Some(true) || page.get("invalid").is_some() {
        return Err(FetchError::NotFound(title.to_string()));
    }
    if page["pageprops"].get("disambiguation").is_some() {
        return Err(FetchError::Ambiguous(title.to_string()));
    }
    page["extract"].as_str()
        .map(str::trim)
        .filter(|extract| !extract.is_empty())
        .map(str::to_string)
        .ok_or_else(|| FetchError::NotFound(title.to_string()))
}
