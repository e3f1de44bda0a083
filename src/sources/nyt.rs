//! New York Times top stories adapter
//!
//! `GET {base}/{section}.json?api-key=..` returns `{ "results": [ ... ] }`.
//! The cover image is the first entry of `multimedia`, which the API sends
//! as an array, `null`, or occasionally an empty string.

use super::{decode_items, endpoint_root, push_segment, take_list, NewsSource};
use crate::models::{NewArticle, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE};
use crate::parser::date::parse_optional;
use crate::parser::sanitize::non_blank;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const NAME: &str = "The New York Times";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    results: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawStory {
    title: Option<String>,
    #[serde(rename = "abstract")]
    summary: Option<String>,
    url: Option<String>,
    byline: Option<String>,
    published_date: Option<String>,
    #[serde(default)]
    multimedia: Value,
}

/// First `multimedia[].url`, if the story has any artwork
fn cover_image(multimedia: &Value) -> Option<String> {
    let first = multimedia.as_array()?.first()?;
    non_blank(first.get("url").and_then(Value::as_str))
}

/// Wire-service top stories keyed by section path
pub struct NytSource {
    api_key: String,
    base: Url,
}

impl NytSource {
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` cannot be parsed
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            api_key: api_key.into(),
            base: endpoint_root(base_url)?,
        })
    }

    fn to_article(raw: RawStory, section: &str) -> Option<NewArticle> {
        let url = non_blank(raw.url.as_deref())?;

        Some(NewArticle {
            url,
            title: non_blank(raw.title.as_deref()).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            description: non_blank(raw.summary.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string()),
            source: NAME.to_string(),
            author: non_blank(raw.byline.as_deref()),
            published_at: parse_optional(raw.published_date.as_deref()),
            category: section.to_string(),
            url_to_image: cover_image(&raw.multimedia),
        })
    }
}

#[async_trait]
impl NewsSource for NytSource {
    fn id(&self) -> &'static str {
        "nyt"
    }

    fn display_name(&self) -> &'static str {
        NAME
    }

    fn endpoint(&self, section: &str) -> Result<Url, FetchError> {
        let mut url = push_segment(&self.base, &format!("{section}.json"))?;
        url.query_pairs_mut().append_pair("api-key", &self.api_key);
        Ok(url)
    }

    fn normalize(&self, payload: Value, section: &str) -> Result<Vec<NewArticle>, FetchError> {
        let envelope: Envelope = serde_json::from_value(payload)
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
        let items = take_list(envelope.results, "results")?;

        Ok(decode_items::<RawStory>(self.id(), items)
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

    fn source() -> NytSource {
        NytSource::new("n-key", "https://api.nytimes.com/svc/topstories/v2").unwrap()
    }

    #[test]
    fn test_endpoint_is_section_path() {
        let url = source().endpoint("science").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.nytimes.com/svc/topstories/v2/science.json?api-key=n-key"
        );
    }

    #[test]
    fn test_normalize_story() {
        let payload = json!({
            "status": "OK",
            "section": "science",
            "results": [{
                "section": "climate",
                "title": "Glaciers retreat",
                "abstract": "Ice loss accelerated this year.",
                "url": "https://www.nytimes.com/2024/12/16/climate/glaciers.html",
                "byline": "By Raymond Zhong",
                "published_date": "2024-12-16T05:00:03-05:00",
                "multimedia": [
                    { "url": "https://static01.nyt.com/glacier-large.jpg", "format": "Super Jumbo" },
                    { "url": "https://static01.nyt.com/glacier-thumb.jpg", "format": "thumbLarge" }
                ]
            }]
        });

        let articles = source().normalize(payload, "science").unwrap();
        assert_eq!(articles.len(), 1);

        let article = &articles[0];
        assert_eq!(article.title, "Glaciers retreat");
        assert_eq!(article.description, "Ice loss accelerated this year.");
        assert_eq!(article.source, "The New York Times");
        assert_eq!(article.author.as_deref(), Some("By Raymond Zhong"));
        // requested section wins over the per-story one
        assert_eq!(article.category, "science");
        assert_eq!(
            article.url_to_image.as_deref(),
            Some("https://static01.nyt.com/glacier-large.jpg")
        );
        assert_eq!(
            article.published_at,
            Some(Utc.with_ymd_and_hms(2024, 12, 16, 10, 0, 3).unwrap())
        );
    }

    #[test]
    fn test_multimedia_variants() {
        assert_eq!(cover_image(&Value::Null), None);
        assert_eq!(cover_image(&json!("")), None);
        assert_eq!(cover_image(&json!([])), None);
        assert_eq!(cover_image(&json!([{ "caption": "no url" }])), None);
        assert_eq!(
            cover_image(&json!([{ "url": "https://x/y.jpg" }])),
            Some("https://x/y.jpg".to_string())
        );
    }

    #[test]
    fn test_story_with_empty_multimedia_string() {
        let payload = json!({
            "results": [{
                "url": "https://www.nytimes.com/x.html",
                "multimedia": "",
                "abstract": ""
            }]
        });

        let articles = source().normalize(payload, "home").unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "No Title");
        assert_eq!(articles[0].description, "No Description");
        assert_eq!(articles[0].url_to_image, None);
    }
}
