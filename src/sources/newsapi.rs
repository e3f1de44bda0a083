//! NewsAPI top-headlines adapter
//!
//! `GET {base}/top-headlines?apiKey=..&category=..&country=us&pageSize=100`
//! returns `{ "articles": [ ... ] }` with camelCase fields.

use super::{decode_items, endpoint_root, push_segment, take_list, NewsSource};
use crate::models::{NewArticle, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE};
use crate::parser::date::parse_optional;
use crate::parser::sanitize::non_blank;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const NAME: &str = "NewsAPI";

const COUNTRY: &str = "us";
const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    articles: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    author: Option<String>,
    published_at: Option<String>,
    url_to_image: Option<String>,
}

/// Headline aggregator keyed by category
pub struct NewsApiSource {
    api_key: String,
    base: Url,
}

impl NewsApiSource {
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` cannot be parsed
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            api_key: api_key.into(),
            base: endpoint_root(base_url)?,
        })
    }

    fn to_article(raw: RawArticle, section: &str) -> Option<NewArticle> {
        let url = non_blank(raw.url.as_deref())?;

        Some(NewArticle {
            url,
            title: non_blank(raw.title.as_deref()).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            description: non_blank(raw.description.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string()),
            source: NAME.to_string(),
            author: non_blank(raw.author.as_deref()),
            published_at: parse_optional(raw.published_at.as_deref()),
            category: section.to_string(),
            url_to_image: non_blank(raw.url_to_image.as_deref()),
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn id(&self) -> &'static str {
        "newsapi"
    }

    fn display_name(&self) -> &'static str {
        NAME
    }

    fn endpoint(&self, section: &str) -> Result<Url, FetchError> {
        let mut url = push_segment(&self.base, "top-headlines")?;
        url.query_pairs_mut()
            .append_pair("apiKey", &self.api_key)
            .append_pair("category", section)
            .append_pair("country", COUNTRY)
            .append_pair("pageSize", PAGE_SIZE);
        Ok(url)
    }

    fn normalize(&self, payload: Value, section: &str) -> Result<Vec<NewArticle>, FetchError> {
        let envelope: Envelope = serde_json::from_value(payload)
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
        let items = take_list(envelope.articles, "articles")?;

        Ok(decode_items::<RawArticle>(self.id(), items)
            .into_iter()
            .filter_map(|raw| Self::to_article(raw, section))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn source() -> NewsApiSource {
        NewsApiSource::new("secret", "https://newsapi.org/v2").unwrap()
    }

    #[test]
    fn test_endpoint_query() {
        let url = source().endpoint("business").unwrap();
        assert_eq!(url.path(), "/v2/top-headlines");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("apiKey".into(), "secret".into())));
        assert!(pairs.contains(&("category".into(), "business".into())));
        assert!(pairs.contains(&("country".into(), "us".into())));
        assert!(pairs.contains(&("pageSize".into(), "100".into())));
    }

    #[test]
    fn test_normalize_full_record() {
        let payload = json!({
            "status": "ok",
            "articles": [{
                "source": { "id": "cnn", "name": "CNN" },
                "author": "Jane Doe",
                "title": "Markets rally",
                "description": "Stocks rose sharply.",
                "url": "https://example.com/markets",
                "urlToImage": "https://example.com/markets.jpg",
                "publishedAt": "2024-12-16T10:15:00Z"
            }]
        });

        let articles = source().normalize(payload, "business").unwrap();
        assert_eq!(articles.len(), 1);

        let article = &articles[0];
        assert_eq!(article.title, "Markets rally");
        assert_eq!(article.description, "Stocks rose sharply.");
        assert_eq!(article.source, "NewsAPI");
        assert_eq!(article.author.as_deref(), Some("Jane Doe"));
        assert_eq!(article.category, "business");
        assert_eq!(
            article.url_to_image.as_deref(),
            Some("https://example.com/markets.jpg")
        );
        assert_eq!(
            article.published_at,
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_normalize_placeholders() {
        let payload = json!({
            "articles": [{
                "url": "https://example.com/bare",
                "title": null,
                "publishedAt": "soon"
            }]
        });

        let articles = source().normalize(payload, "general").unwrap();
        assert_eq!(articles[0].title, "No Title");
        assert_eq!(articles[0].description, "No Description");
        assert_eq!(articles[0].published_at, None);
        assert_eq!(articles[0].author, None);
        assert_eq!(articles[0].url_to_image, None);
    }

    #[test]
    fn test_normalize_skips_records_without_url() {
        let payload = json!({
            "articles": [
                { "title": "No link" },
                { "title": "Blank link", "url": "  " },
                { "title": "Linked", "url": "https://example.com/ok" }
            ]
        });

        let articles = source().normalize(payload, "general").unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Linked");
    }

    #[test]
    fn test_normalize_missing_list_is_empty() {
        let payload = json!({ "status": "ok", "totalResults": 0 });
        assert!(source().normalize(payload, "general").unwrap().is_empty());
    }

    #[test]
    fn test_normalize_wrong_shape_is_malformed() {
        let result = source().normalize(json!({ "articles": "none" }), "general");
        assert!(matches!(result, Err(FetchError::MalformedPayload(_))));

        let result = source().normalize(json!([1, 2, 3]), "general");
        assert!(matches!(result, Err(FetchError::MalformedPayload(_))));
    }
}
