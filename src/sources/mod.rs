//! News provider adapters
//!
//! Each provider is one [`NewsSource`] implementation that knows two things:
//! how to build the request URL for a topical section, and how to map the
//! provider's JSON payload onto [`NewArticle`]. Normalization is pure; the
//! only side effect of an adapter is the outbound call made through the
//! shared [`ApiFetcher`].
//!
//! Adding a provider means adding one module here and one line in
//! [`from_config`].

pub mod fetcher;
pub mod guardian;
pub mod newsapi;
pub mod nyt;

pub use fetcher::ApiFetcher;
pub use guardian::GuardianSource;
pub use newsapi::NewsApiSource;
pub use nyt::NytSource;

use crate::config::{ProviderConfig, SourcesConfig};
use crate::models::NewArticle;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// One upstream news provider
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Short identifier used in logs and config (`newsapi`, `guardian`, `nyt`)
    fn id(&self) -> &'static str;

    /// Human-readable provider name stored as the article `source`
    fn display_name(&self) -> &'static str;

    /// Build the request URL for one section, credentials included
    fn endpoint(&self, section: &str) -> Result<Url, FetchError>;

    /// Map a provider payload onto canonical records
    ///
    /// Every record gets `category = section` and `source = display_name()`.
    /// A payload without the expected list yields no records; a payload whose
    /// list has the wrong shape is `MalformedPayload`.
    fn normalize(&self, payload: Value, section: &str) -> Result<Vec<NewArticle>, FetchError>;

    /// Fetch and normalize one section
    async fn fetch_section(
        &self,
        fetcher: &ApiFetcher,
        section: &str,
    ) -> Result<Vec<NewArticle>, FetchError> {
        let url = self.endpoint(section)?;
        let payload = fetcher.get_json(url).await?;
        self.normalize(payload, section)
    }
}

/// Build the enabled, credentialed providers from configuration
///
/// Providers that are disabled or lack an API key are skipped with a warning.
///
/// # Errors
///
/// Returns `FetchError::InvalidUrl` if a configured base URL cannot be parsed
pub fn from_config(config: &SourcesConfig) -> Result<Vec<Arc<dyn NewsSource>>, FetchError> {
    let mut sources: Vec<Arc<dyn NewsSource>> = Vec::new();

    if let Some(key) = usable_key("newsapi", &config.newsapi) {
        sources.push(Arc::new(NewsApiSource::new(key, &config.newsapi.base_url)?));
    }
    if let Some(key) = usable_key("guardian", &config.guardian) {
        sources.push(Arc::new(GuardianSource::new(key, &config.guardian.base_url)?));
    }
    if let Some(key) = usable_key("nyt", &config.nyt) {
        sources.push(Arc::new(NytSource::new(key, &config.nyt.base_url)?));
    }

    Ok(sources)
}

/// API key of an enabled provider
///
/// A disabled provider yields `Ok(None)`; an enabled one without a key is
/// `MissingCredentials`.
fn provider_key<'a>(
    id: &'static str,
    provider: &'a ProviderConfig,
) -> Result<Option<&'a str>, FetchError> {
    if !provider.enabled {
        return Ok(None);
    }

    provider
        .api_key()
        .map(Some)
        .ok_or(FetchError::MissingCredentials(id))
}

fn usable_key<'a>(id: &'static str, provider: &'a ProviderConfig) -> Option<&'a str> {
    match provider_key(id, provider) {
        Ok(Some(key)) => Some(key),
        Ok(None) => {
            tracing::info!(provider = id, "Provider disabled, skipping");
            None
        }
        Err(e) => {
            tracing::warn!(provider = id, kind = e.kind(), error = %e, "Skipping provider");
            None
        }
    }
}

/// Parse a base URL and make sure it ends in `/` so path segments append
pub(crate) fn endpoint_root(base_url: &str) -> Result<Url, FetchError> {
    let mut url =
        Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;

    if url.cannot_be_a_base() {
        return Err(FetchError::InvalidUrl(base_url.to_string()));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

/// Append one path segment (percent-encoded) to a base URL
pub(crate) fn push_segment(base: &Url, segment: &str) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Deserialize list items one by one, dropping the ones that don't fit
pub(crate) fn decode_items<T: DeserializeOwned>(provider: &str, items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(provider, error = %e, "Skipping unreadable item");
                None
            }
        })
        .collect()
}

/// Take an envelope's article list out of a payload
///
/// A missing or `null` list is an empty page; any other non-array is malformed.
pub(crate) fn take_list(payload: Option<Value>, field: &str) -> Result<Vec<Value>, FetchError> {
    match payload {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(FetchError::MalformedPayload(format!(
            "`{field}` is not an array (found {})",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
