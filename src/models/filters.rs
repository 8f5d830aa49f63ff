use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::ModelError;

/// Exclusive upper bound on the requested page number.
pub const MAX_PAGE: i64 = 10_000_000;

/// Inclusive upper bound on the number of records per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Feed ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Most votes first, newest first among equal votes.
    Popular,
    /// Newest first.
    #[default]
    Recent,
}

impl OrderBy {
    /// Anything other than `"popular"` ranks by recency.
    pub fn parse(value: &str) -> Self {
        match value {
            "popular" => OrderBy::Popular,
            _ => OrderBy::Recent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Popular => "popular",
            OrderBy::Recent => "recent",
        }
    }
}

/// Per-request paging, sorting and search parameters.
///
/// Must pass [`Filters::validate`] before being handed to the query layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub order_by: OrderBy,
    pub query: String,
}

impl Filters {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.page <= 0 || self.page >= MAX_PAGE {
            return Err(ModelError::InvalidPageRange);
        }
        if self.page_size <= 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ModelError::InvalidPageSize);
        }
        Ok(())
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    /// `LIKE` pattern for a case-insensitive title search, if one was requested.
    pub fn search_pattern(&self) -> Option<String> {
        if self.query.is_empty() {
            None
        } else {
            Some(format!("%{}%", self.query.to_lowercase()))
        }
    }
}

/// Raw feed query-string parameters.
///
/// Numbers arrive as strings so that garbage falls back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub q: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub order_by: Option<String>,
}

impl FeedParams {
    pub fn into_filters(self, default_page_size: i64) -> Filters {
        Filters {
            page: read_int_default(self.page.as_deref(), 1),
            page_size: read_int_default(self.page_size.as_deref(), default_page_size),
            order_by: self
                .order_by
                .as_deref()
                .map(OrderBy::parse)
                .unwrap_or_default(),
            query: self.q.unwrap_or_default(),
        }
    }
}

/// Parses a positive integer, returning `default` for missing, malformed or non-positive input.
fn read_int_default(value: Option<&str>, default: i64) -> i64 {
    match value.and_then(|v| v.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => n,
        _ => default,
    }
}

/// Page metadata derived from the window total-count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetaData {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub next_page: i64,
    /// `0` when there is no previous page.
    pub prev_page: i64,
    pub total_records: i64,
}

/// Derives page metadata for `total_records` rows split into pages of `page_size`.
///
/// An empty result yields the zero value. `next_page` is never clamped to
/// `last_page`; callers decide whether to offer a next link.
pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> MetaData {
    if total_records <= 0 || page_size <= 0 {
        return MetaData::default();
    }

    let first_page = 1;
    MetaData {
        current_page: page,
        page_size,
        first_page,
        last_page: (total_records + page_size - 1) / page_size,
        next_page: page + 1,
        prev_page: if page <= first_page { 0 } else { page - 1 },
        total_records,
    }
}

/// Query strings for the neighbouring feed pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    /// Absent on the last page.
    pub next: Option<String>,
    /// Absent on the first page.
    pub prev: Option<String>,
}

impl PageLinks {
    pub fn new(filters: &Filters, meta: &MetaData) -> Self {
        let link = |page: i64| {
            form_urlencoded::Serializer::new(String::new())
                .append_pair("page_size", &filters.page_size.to_string())
                .append_pair("order_by", filters.order_by.as_str())
                .append_pair("q", &filters.query)
                .append_pair("page", &page.to_string())
                .finish()
        };

        Self {
            next: (meta.current_page < meta.last_page).then(|| link(meta.next_page)),
            prev: (meta.prev_page > 0).then(|| link(meta.prev_page)),
        }
    }
}
