//! Structured composition of the aggregate feed query.
//!
//! The query is assembled from tagged fragments (predicate, ordering,
//! limit/offset). Placeholders are handed out by a tracker in the order the
//! fragments appear in the final text, so `$n` always lines up with the
//! n-th bound parameter no matter which fragments are present.

use sqlx::{
    FromRow, Postgres,
    postgres::{PgArguments, PgRow},
    query::QueryAs,
};

use super::filters::{Filters, OrderBy};

/// A positional query argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    Int(i64),
}

/// Assigns `$1`, `$2`, ... in bind order.
#[derive(Debug, Default)]
struct ParamTracker {
    params: Vec<QueryParam>,
}

impl ParamTracker {
    fn push(&mut self, param: QueryParam) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }
}

/// Row filter applied inside the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive title match against a ready-made `LIKE` pattern.
    TitleLike(String),
    PostId(i64),
}

impl Predicate {
    fn render(&self, tracker: &mut ParamTracker) -> String {
        match self {
            Predicate::TitleLike(pattern) => format!(
                "WHERE LOWER(p.title) LIKE {}",
                tracker.push(QueryParam::Text(pattern.clone()))
            ),
            Predicate::PostId(id) => format!("WHERE p.id = {}", tracker.push(QueryParam::Int(*id))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

impl Window {
    fn render(&self, tracker: &mut ParamTracker) -> String {
        let limit = tracker.push(QueryParam::Int(self.limit));
        let offset = tracker.push(QueryParam::Int(self.offset));
        format!("LIMIT {} OFFSET {}", limit, offset)
    }
}

fn order_clause(order_by: OrderBy, votes: &str, created_at: &str) -> String {
    match order_by {
        OrderBy::Popular => format!("ORDER BY {} DESC, {} DESC", votes, created_at),
        OrderBy::Recent => format!("ORDER BY {} DESC", created_at),
    }
}

/// Description of one execution of the aggregate posts query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    pub predicate: Option<Predicate>,
    pub ordering: Option<OrderBy>,
    pub window: Option<Window>,
}

impl FeedQuery {
    /// Feed page for already validated filters.
    pub fn for_filters(filters: &Filters) -> Self {
        Self {
            predicate: filters.search_pattern().map(Predicate::TitleLike),
            ordering: Some(filters.order_by),
            window: Some(Window {
                limit: filters.limit(),
                offset: filters.offset(),
            }),
        }
    }

    /// A single post with its counts.
    pub fn for_post(id: i64) -> Self {
        Self {
            predicate: Some(Predicate::PostId(id)),
            ordering: None,
            window: None,
        }
    }

    pub fn compose(&self) -> ComposedQuery {
        let mut tracker = ParamTracker::default();

        // Render in textual order: WHERE, ORDER BY, LIMIT/OFFSET.
        let where_clause = self
            .predicate
            .as_ref()
            .map(|p| p.render(&mut tracker))
            .unwrap_or_default();
        let inner_order = self
            .ordering
            .map(|o| order_clause(o, "votes", "p.created_at"))
            .unwrap_or_default();
        // The join with users does not preserve the subquery's order.
        let outer_order = self
            .ordering
            .map(|o| order_clause(o, "pq.votes", "pq.created_at"))
            .unwrap_or_default();
        let window = self
            .window
            .map(|w| w.render(&mut tracker))
            .unwrap_or_default();

        let sql = format!(
            r#"
        SELECT COUNT(*) OVER() AS total_records, pq.*, u.username FROM (
            SELECT p.id, p.title, p.url, p.created_at, p.user_id,
                   COUNT(DISTINCT c.id) AS comment_count,
                   COUNT(DISTINCT v.user_id) AS votes
            FROM posts p
            LEFT JOIN comments c ON p.id = c.post_id
            LEFT JOIN votes v ON p.id = v.post_id
            {where_clause}
            GROUP BY p.id
            {inner_order}
        ) AS pq
        LEFT JOIN users u ON u.id = pq.user_id
        {outer_order}
        {window}
        "#
        );

        ComposedQuery {
            sql,
            params: tracker.params,
        }
    }
}

/// Query text plus its arguments in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl ComposedQuery {
    /// Binds every parameter, in order, onto a typed query.
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        self.params
            .iter()
            .fold(sqlx::query_as(&self.sql), |query, param| match param {
                QueryParam::Text(text) => query.bind(text.as_str()),
                QueryParam::Int(n) => query.bind(*n),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(query: &str, order_by: OrderBy) -> Filters {
        Filters {
            page: 3,
            page_size: 5,
            order_by,
            query: query.to_string(),
        }
    }

    #[test]
    fn search_takes_first_slot() {
        let composed = FeedQuery::for_filters(&filters("Rust", OrderBy::Recent)).compose();

        assert_eq!(
            composed.params,
            vec![
                QueryParam::Text("%rust%".to_string()),
                QueryParam::Int(5),
                QueryParam::Int(10),
            ]
        );
        assert!(composed.sql.contains("WHERE LOWER(p.title) LIKE $1"));
        assert!(composed.sql.contains("LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn without_search_window_starts_at_one() {
        let composed = FeedQuery::for_filters(&filters("", OrderBy::Recent)).compose();

        assert_eq!(composed.params, vec![QueryParam::Int(5), QueryParam::Int(10)]);
        assert!(!composed.sql.contains("WHERE"));
        assert!(composed.sql.contains("LIMIT $1 OFFSET $2"));
        assert!(!composed.sql.contains("$3"));
    }

    #[test]
    fn popular_ranks_by_votes_then_recency() {
        let composed = FeedQuery::for_filters(&filters("", OrderBy::Popular)).compose();

        assert!(composed.sql.contains("ORDER BY votes DESC, p.created_at DESC"));
        assert!(composed.sql.contains("ORDER BY pq.votes DESC, pq.created_at DESC"));
    }

    #[test]
    fn recent_ranks_by_recency_only() {
        let composed = FeedQuery::for_filters(&filters("", OrderBy::Recent)).compose();

        assert!(composed.sql.contains("ORDER BY p.created_at DESC"));
        assert!(composed.sql.contains("ORDER BY pq.created_at DESC"));
        assert!(!composed.sql.contains("votes DESC"));
    }

    #[test]
    fn unknown_order_falls_back_to_recent() {
        let f = filters("", OrderBy::parse("top"));
        let composed = FeedQuery::for_filters(&f).compose();

        assert!(!composed.sql.contains("votes DESC"));
    }

    #[test]
    fn window_follows_where_in_text() {
        let composed = FeedQuery::for_filters(&filters("x", OrderBy::Popular)).compose();

        let where_at = composed.sql.find("WHERE").unwrap();
        let order_at = composed.sql.find("ORDER BY").unwrap();
        let limit_at = composed.sql.find("LIMIT").unwrap();
        assert!(where_at < order_at && order_at < limit_at);
    }

    #[test]
    fn single_post_has_no_order_or_window() {
        let composed = FeedQuery::for_post(42).compose();

        assert_eq!(composed.params, vec![QueryParam::Int(42)]);
        assert!(composed.sql.contains("WHERE p.id = $1"));
        assert!(!composed.sql.contains("ORDER BY"));
        assert!(!composed.sql.contains("LIMIT"));
    }

    #[test]
    fn empty_query_has_no_params() {
        let composed = FeedQuery::default().compose();

        assert!(composed.params.is_empty());
        assert!(!composed.sql.contains('$'));
    }
}
