//! Read-side query contract
//!
//! Raw request parameters ([`ListParams`]) are validated into an
//! [`ArticleQuery`] before anything touches the store. Validation is
//! all-or-nothing: either every field is acceptable or the caller gets a
//! [`ValidationErrors`] listing each offending field.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::error::Error;
use crate::models::Article;
use crate::parser::date::parse_published_at;
use crate::storage::ArticleRepository;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;
pub const MAX_FIELD_LEN: usize = 255;

/// Query string parameters as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub query: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    pub sort: Option<String>,
    pub per_page: Option<String>,
    pub page: Option<String>,
}

impl ListParams {
    /// Collect known keys from decoded pairs
    ///
    /// A repeated key keeps its last value; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "source" => &mut params.source,
                "category" => &mut params.category,
                "date" => &mut params.date,
                "author" => &mut params.author,
                "sort" => &mut params.sort,
                "per_page" => &mut params.per_page,
                "page" => &mut params.page,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        params
    }

    /// Decode an `application/x-www-form-urlencoded` query string
    pub fn from_query_string(raw: &str) -> Self {
        Self::from_pairs(url::form_urlencoded::parse(raw.as_bytes()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Store order (insertion, by id)
    #[default]
    Default,
    /// `published_at` descending
    Latest,
    /// `published_at` ascending
    Oldest,
}

impl SortOrder {
    /// `latest` and `oldest` are recognized; anything else is store order
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "latest" => Self::Latest,
            "oldest" => Self::Oldest,
            _ => Self::Default,
        }
    }
}

/// Validated, store-ready criteria
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleQuery {
    /// Case-insensitive substring of title or description
    pub text: Option<String>,
    /// Exact source names, any of
    pub sources: Vec<String>,
    /// Exact categories, any of
    pub categories: Vec<String>,
    /// Calendar day (UTC) of `published_at`
    pub date: Option<NaiveDate>,
    /// Case-insensitive substring of author
    pub author: Option<String>,
    pub sort: SortOrder,
    pub per_page: u32,
    /// 1-based page number
    pub page: u32,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            text: None,
            sources: Vec::new(),
            categories: Vec::new(),
            date: None,
            author: None,
            sort: SortOrder::Default,
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl ArticleQuery {
    /// Number of rows skipped before this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// Field-level validation failures, in the order fields were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, Vec<String>)>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the fields that failed
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// Messages recorded for one field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Summary line: the first message plus a count of the rest
    pub fn message(&self) -> String {
        let mut messages = self.fields.iter().flat_map(|(_, m)| m.iter());
        let Some(first) = messages.next() else {
            return String::from("The given data was invalid.");
        };

        match messages.count() {
            0 => first.clone(),
            1 => format!("{first} (and 1 more error)"),
            n => format!("{first} (and {n} more errors)"),
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationErrors {}

struct FieldMap<'a>(&'a [(&'static str, Vec<String>)]);

impl Serialize for FieldMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, messages) in self.0 {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("message", &self.message())?;
        map.serialize_entry("errors", &FieldMap(&self.fields))?;
        map.end()
    }
}

/// `None` for absent or empty input
fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn label(field: &str) -> String {
    field.replace('_', " ")
}

fn check_length(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        if value.chars().count() > MAX_FIELD_LEN {
            errors.add(
                field,
                format!(
                    "The {} field must not be greater than {MAX_FIELD_LEN} characters.",
                    label(field)
                ),
            );
        }
    }
}

fn parse_bounded(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&str>,
    min: u32,
    max: Option<u32>,
    default: u32,
) -> u32 {
    let Some(raw) = value else {
        return default;
    };

    let Ok(number) = raw.trim().parse::<i64>() else {
        errors.add(field, format!("The {} field must be an integer.", label(field)));
        return default;
    };

    if number < i64::from(min) {
        errors.add(field, format!("The {} field must be at least {min}.", label(field)));
        return default;
    }

    if let Some(max) = max {
        if number > i64::from(max) {
            errors.add(
                field,
                format!("The {} field must not be greater than {max}.", label(field)),
            );
            return default;
        }
    }

    match u32::try_from(number) {
        Ok(number) => number,
        Err(_) => {
            errors.add(
                field,
                format!("The {} field must not be greater than {}.", label(field), u32::MAX),
            );
            default
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping blanks
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl TryFrom<ListParams> for ArticleQuery {
    type Error = ValidationErrors;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::default();

        let query = present(params.query.as_ref());
        let source = present(params.source.as_ref());
        let category = present(params.category.as_ref());
        let date = present(params.date.as_ref());
        let author = present(params.author.as_ref());
        let sort = present(params.sort.as_ref());

        check_length(&mut errors, "query", query);
        check_length(&mut errors, "source", source);
        check_length(&mut errors, "category", category);

        let day = date.and_then(|raw| {
            let parsed = parse_published_at(raw).map(|dt| dt.date_naive());
            if parsed.is_none() {
                errors.add("date", "The date field must be a valid date.");
            }
            parsed
        });

        check_length(&mut errors, "author", author);
        check_length(&mut errors, "sort", sort);

        let per_page = parse_bounded(
            &mut errors,
            "per_page",
            present(params.per_page.as_ref()),
            1,
            Some(MAX_PER_PAGE),
            DEFAULT_PER_PAGE,
        );
        let page = parse_bounded(
            &mut errors,
            "page",
            present(params.page.as_ref()),
            1,
            None,
            1,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            text: query.map(str::to_string),
            sources: split_list(source),
            categories: split_list(category),
            date: day,
            author: author.map(str::to_string),
            sort: sort.map(SortOrder::parse).unwrap_or_default(),
            per_page,
            page,
        })
    }
}

/// One page of results with Laravel-style pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub current_page: u32,
    pub data: Vec<T>,
    pub per_page: u32,
    pub total: u64,
    pub last_page: u32,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, query: &ArticleQuery, total: u64) -> Self {
        let per_page = u64::from(query.per_page.max(1));
        let last_page = u32::try_from(total.div_ceil(per_page).max(1)).unwrap_or(u32::MAX);

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let first = query.offset() + 1;
            (Some(first), Some(first + data.len() as u64 - 1))
        };

        Self {
            current_page: query.page,
            data,
            per_page: query.per_page,
            total,
            last_page,
            from,
            to,
        }
    }
}

/// Why a list request produced no page
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("storage error: {0}")]
    Storage(#[from] Error),
}

/// Filtered, paginated reads over the article store
#[derive(Clone)]
pub struct QueryService {
    repo: Arc<dyn ArticleRepository>,
}

impl QueryService {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    /// Validate `params` and return the requested page
    pub fn list(&self, params: ListParams) -> Result<Page<Article>, QueryError> {
        let query = ArticleQuery::try_from(params)?;
        Ok(self.repo.search(&query)?)
    }
}
