use crate::utils::config::Config;
use crate::utils::logging::*;
use common::diagnosis::search_result::SearchResult;
use serde_json::Value;
use std::future::Future;

/// Issues one web search and never fails the caller: every problem degrades to no results.
pub trait SearchFetcher: Send + Sync + 'static {
    fn search(&self, query: &str, max_results: usize) -> impl Future<Output = Vec<SearchResult>> + Send;
}

pub struct GoogleSearchFetcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    search_engine_id: String,
    country_site_token: String,
    marketplace_domain: String,
}

impl GoogleSearchFetcher {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.search_endpoint.clone(),
            api_key: config.api_key.clone(),
            search_engine_id: config.search_engine_id.clone(),
            country_site_token: config.country_site_token.clone(),
            marketplace_domain: config.marketplace_domain.clone(),
        }
    }

    async fn request(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>, NetworkEntry> {
        // The Custom Search API serves at most 10 results per call.
        let num = max_results.clamp(1, 10).to_string();
        let response = self.client.get(&self.endpoint)
            .query(&[("q", query), ("key", self.api_key.as_str()), ("cx", self.search_engine_id.as_str()), ("num", num.as_str())])
            .send().await
            .map_err(|err| NetworkEntry::RequestError(self.endpoint.clone(), err.to_string()))?;
        let status = response.status();
        let body = response.json::<Value>().await
            .map_err(|err| NetworkEntry::MalformedResponse(self.endpoint.clone(), err.to_string()))?;
        if let Some(error) = body.get("error") {
            let message = error.get("message").and_then(Value::as_str).unwrap_or("unknown error");
            return Err(NetworkEntry::ApiError(self.endpoint.clone(), message.to_string()));
        }
        if !status.is_success() {
            return Err(NetworkEntry::UnexpectedStatus(self.endpoint.clone(), status.as_u16()));
        }
        parse_search_items(&body).ok_or_else(|| NetworkEntry::NoSearchItems(query.to_string()))
    }
}

impl SearchFetcher for GoogleSearchFetcher {
    async fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        match self.request(query, max_results).await {
            Ok(results) => {
                let mut results = filter_results(query, results, &self.country_site_token, &self.marketplace_domain);
                results.truncate(max_results);
                results
            },
            Err(entry) => {
                logging_warning!(entry, format!("Query: {query}"));
                Vec::new()
            },
        }
    }
}

/// Reads the `items` array; `None` when it is absent or not an array.
pub fn parse_search_items(body: &Value) -> Option<Vec<SearchResult>> {
    let items = body.get("items")?.as_array()?;
    let results = items.iter()
        .map(|item| {
            let field = |name: &str| item.get(name).and_then(Value::as_str);
            SearchResult::new(
                field("title").unwrap_or("No title"),
                field("snippet").unwrap_or("No description available"),
                field("link").unwrap_or(""),
            )
        })
        .collect();
    Some(results)
}

/// A query carrying the country token only keeps links on the marketplace domain.
/// Without the token every result passes.
pub fn filter_results(query: &str, results: Vec<SearchResult>, country_site_token: &str, marketplace_domain: &str) -> Vec<SearchResult> {
    if !query.contains(country_site_token) {
        return results;
    }
    results.into_iter()
        .filter(|result| result.link.contains(marketplace_domain))
        .collect()
}
