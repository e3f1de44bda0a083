//! The Guardian content search adapter
//!
//! `GET {base}/search?api-key=..&section=..&show-fields=headline,trailText,body,byline&page-size=100`
//! returns `{ "response": { "results": [ ... ] } }`. The requested fields
//! arrive nested under `fields`, and `body` is full article HTML, so the
//! description is the only one in the pipeline that goes through
//! [`strip_markup`].

use super::{decode_items, endpoint_root, push_segment, take_list, NewsSource};
use crate::models::{NewArticle, PLACEHOLDER_DESCRIPTION, PLACEHOLDER_TITLE};
use crate::parser::date::parse_optional;
use crate::parser::sanitize::{has_content, non_blank, strip_markup};
use crate::utils::error::FetchError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const NAME: &str = "The Guardian";

const SHOW_FIELDS: &str = "headline,trailText,body,byline";
const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Option<Response>,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    results: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResult {
    web_url: Option<String>,
    web_title: Option<String>,
    web_publication_date: Option<String>,
    #[serde(default)]
    fields: Option<RawFields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFields {
    headline: Option<String>,
    trail_text: Option<String>,
    body: Option<String>,
    byline: Option<String>,
}

/// Editorial search keyed by section
pub struct GuardianSource {
    api_key: String,
    base: Url,
}

impl GuardianSource {
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if `base_url` cannot be parsed
    pub fn new(api_key: impl Into<String>, base_url: &str) -> Result<Self, FetchError> {
        Ok(Self {
            api_key: api_key.into(),
            base: endpoint_root(base_url)?,
        })
    }

    fn to_article(raw: RawResult, section: &str) -> Option<NewArticle> {
        let url = non_blank(raw.web_url.as_deref())?;
        let fields = raw.fields.unwrap_or_default();

        // body, then trailText, then placeholder; markup stripped either way
        let description = fields
            .body
            .as_deref()
            .map(strip_markup)
            .filter(|text| has_content(text))
            .or_else(|| {
                fields
                    .trail_text
                    .as_deref()
                    .map(strip_markup)
                    .filter(|text| has_content(text))
            })
            .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string());

        let title = non_blank(fields.headline.as_deref())
            .or_else(|| non_blank(raw.web_title.as_deref()))
            .unwrap_or_else(|| PLACEHOLDER_TITLE.to_string());

        Some(NewArticle {
            url,
            title,
            description,
            source: NAME.to_string(),
            author: non_blank(fields.byline.as_deref()),
            published_at: parse_optional(raw.web_publication_date.as_deref()),
            category: section.to_string(),
            url_to_image: None,
        })
    }
}

#[async_trait]
impl NewsSource for GuardianSource {
    fn id(&self) -> &'static str {
        "guardian"
    }

    fn display_name(&self) -> &'static str {
        NAME
    }

    fn endpoint(&self, section: &str) -> Result<Url, FetchError> {
        let mut url = push_segment(&self.base, "search")?;
        url.query_pairs_mut()
            .append_pair("api-key", &self.api_key)
            .append_pair("section", section)
            .append_pair("show-fields", SHOW_FIELDS)
            .append_pair("page-size", PAGE_SIZE);
        Ok(url)
    }

    fn normalize(&self, payload: Value, section: &str) -> Result<Vec<NewArticle>, FetchError> {
        let envelope: Envelope = serde_json::from_value(payload)
            .map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
        let items = take_list(envelope.response.and_then(|r| r.results), "response.results")?;

        Ok(decode_items::<RawResult>(self.id(), items)
            .into_iter()
            .filter_map(|raw| Self::to_article(raw, section))
            .collect())
    }
}
