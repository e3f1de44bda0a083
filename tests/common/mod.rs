//! Common test utilities

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use newsroom::models::NewArticle;
use serde_json::{json, Value};

/// Create a normalized article with default values
pub fn create_test_article(url: &str) -> NewArticle {
    NewArticle {
        url: url.to_string(),
        title: "Test headline".to_string(),
        description: "Test description".to_string(),
        source: "NewsAPI".to_string(),
        author: None,
        published_at: None,
        category: "general".to_string(),
        url_to_image: None,
    }
}

pub fn utc(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, day, hour, 0, 0).unwrap()
}

/// NewsAPI `top-headlines` body with one article per `(url, title)` pair
pub fn newsapi_payload(items: &[(&str, &str)]) -> Value {
    let articles: Vec<Value> = items
        .iter()
        .map(|(url, title)| {
            json!({
                "source": { "id": null, "name": "Reuters" },
                "author": "Wire Desk",
                "title": title,
                "description": format!("Summary of {title}"),
                "url": url,
                "urlToImage": format!("{url}.jpg"),
                "publishedAt": "2024-12-16T08:00:00Z",
                "content": "Truncated content [+1200 chars]"
            })
        })
        .collect();

    json!({ "status": "ok", "totalResults": articles.len(), "articles": articles })
}

/// Guardian `search` body; bodies are HTML
pub fn guardian_payload(items: &[(&str, &str)]) -> Value {
    let results: Vec<Value> = items
        .iter()
        .map(|(url, title)| {
            json!({
                "id": "world/2024/dec/16/story",
                "type": "article",
                "sectionId": "world",
                "webPublicationDate": "2024-12-16T09:30:00Z",
                "webTitle": title,
                "webUrl": url,
                "fields": {
                    "headline": title,
                    "trailText": "Teaser",
                    "body": format!("<p>Body of <em>{title}</em></p>"),
                    "byline": "Guardian staff"
                }
            })
        })
        .collect();

    json!({
        "response": {
            "status": "ok",
            "total": results.len(),
            "results": results
        }
    })
}

/// NYT top stories body
pub fn nyt_payload(items: &[(&str, &str)]) -> Value {
    let results: Vec<Value> = items
        .iter()
        .map(|(url, title)| {
            json!({
                "section": "us",
                "title": title,
                "abstract": format!("Abstract of {title}"),
                "url": url,
                "byline": "By NYT Staff",
                "published_date": "2024-12-16T05:00:00-05:00",
                "multimedia": [{ "url": format!("{url}/image.jpg"), "format": "Super Jumbo" }]
            })
        })
        .collect();

    json!({ "status": "OK", "num_results": results.len(), "results": results })
}
