//! Query-string and body shapes, and their translation into store filters.

use chrono::{DateTime, NaiveDate, Utc};
use postbook_store::{
    AccountFilter, AccountId, NewPost, Page, PostFilter, SortOrder, StoreError, TimeRange,
};
use serde::Deserialize;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// `GET /users` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AccountListParams {
    #[serde(rename = "fromCreatedAt", alias = "from")]
    pub from_created_at: Option<String>,
    #[serde(rename = "toCreatedAt", alias = "to")]
    pub to_created_at: Option<String>,
    /// Comma-separated candidate names.
    pub name: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    #[serde(rename = "topPostsAmount", alias = "sort")]
    pub top_posts_amount: Option<String>,
}

/// `GET /posts` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    #[serde(rename = "fromCreatedAt", alias = "from")]
    pub from_created_at: Option<String>,
    #[serde(rename = "toCreatedAt", alias = "to")]
    pub to_created_at: Option<String>,
    pub subject: Option<String>,
    /// Comma-separated author ids.
    pub author: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// `POST /post` body. The author is signed so that zero and negative ids
/// surface as validation failures rather than decode errors.
#[derive(Debug, Deserialize)]
pub struct PostAddRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: i64,
}

impl TryFrom<PostAddRequest> for NewPost {
    type Error = ServerError;

    fn try_from(req: PostAddRequest) -> ServerResult<Self> {
        let author = u64::try_from(req.author)
            .ok()
            .filter(|raw| *raw > 0)
            .ok_or_else(|| StoreError::Validation("author must be a positive id".into()))?;
        Ok(NewPost::new(req.subject, req.body, AccountId::new(author)))
    }
}

impl AccountListParams {
    pub fn into_filter(self, config: &ServerConfig) -> ServerResult<AccountFilter> {
        let order = non_empty(self.top_posts_amount.as_deref())
            .map(str::parse::<SortOrder>)
            .transpose()?;
        Ok(AccountFilter {
            created: time_range(self.from_created_at.as_deref(), self.to_created_at.as_deref())?,
            names: split_list(self.name.as_deref()).map(str::to_string).collect(),
            page: page(self.offset.as_deref(), self.limit.as_deref(), config)?,
            order,
        })
    }
}

impl PostListParams {
    pub fn into_filter(self, config: &ServerConfig) -> ServerResult<PostFilter> {
        let authors = split_list(self.author.as_deref())
            .map(|raw| {
                raw.parse::<u64>()
                    .map(AccountId::new)
                    .map_err(|_| ServerError::malformed(format!("invalid author id {raw:?}")))
            })
            .collect::<ServerResult<Vec<_>>>()?;
        Ok(PostFilter {
            created: time_range(self.from_created_at.as_deref(), self.to_created_at.as_deref())?,
            subject: non_empty(self.subject.as_deref()).map(str::to_string),
            authors,
            page: page(self.offset.as_deref(), self.limit.as_deref(), config)?,
        })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn page(offset: Option<&str>, limit: Option<&str>, config: &ServerConfig) -> ServerResult<Page> {
    let offset = parse_count("offset", offset)?.unwrap_or(0);
    let limit = parse_count("limit", limit)?
        .unwrap_or(config.default_page_limit)
        .min(config.max_page_limit);
    Ok(Page::new(offset, limit))
}

fn parse_count(field: &str, raw: Option<&str>) -> ServerResult<Option<usize>> {
    non_empty(raw)
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| ServerError::malformed(format!("invalid format for {field}: {s:?}")))
        })
        .transpose()
}

fn time_range(from: Option<&str>, to: Option<&str>) -> ServerResult<TimeRange> {
    let from = non_empty(from)
        .map(|raw| parse_instant("from", raw, false))
        .transpose()?;
    let to = non_empty(to)
        .map(|raw| parse_instant("to", raw, true))
        .transpose()?;
    Ok(TimeRange::new(from, to))
}

/// Accepts RFC 3339 or `YYYY-MM-DD`. A bare date is the first instant of
/// that day, or the last one when it closes a range.
pub fn parse_instant(field: &str, raw: &str, end_of_day: bool) -> ServerResult<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let invalid = || ServerError::malformed(format!("invalid format for {field}: {raw:?}"));
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| invalid())?;
    let at = if end_of_day {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    at.map(|naive| naive.and_utc()).ok_or_else(invalid)
}
