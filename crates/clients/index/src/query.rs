//! Search request builder.

use crate::Hit;
use serde_json::{Value, json};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A sort clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field to sort on.
    pub field: &'static str,
    /// Direction.
    pub order: SortOrder,
}

/// A half-open numeric range `[gte, lt)` on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    /// Field the range applies to.
    pub field: &'static str,
    /// Inclusive lower bound.
    pub gte: u64,
    /// Exclusive upper bound.
    pub lt: u64,
}

impl BlockRange {
    /// Returns `true` if `value` lies in the range.
    pub const fn contains(&self, value: u64) -> bool {
        self.gte <= value && value < self.lt
    }
}

/// A filtered, sorted search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Optional range filter.
    pub range: Option<BlockRange>,
    /// Only match documents without this field.
    pub missing: Option<&'static str>,
    /// Sort clauses, applied in order.
    pub sort: Vec<SortKey>,
    /// Page size. `None` uses the store's configured size.
    pub size: Option<usize>,
    /// Sort values of the last hit of the previous page. Only hits sorting
    /// strictly after them match.
    pub search_after: Option<Vec<Value>>,
}

impl SearchQuery {
    /// Matches documents whose `field` lies in `[start, end)`.
    pub fn window(field: &'static str, start: u64, end: u64) -> Self {
        Self { range: Some(BlockRange { field, gte: start, lt: end }), ..Default::default() }
    }

    /// Restricts the match to documents missing `field`.
    pub const fn missing(mut self, field: &'static str) -> Self {
        self.missing = Some(field);
        self
    }

    /// Appends an ascending sort on `field`.
    pub fn sort_asc(mut self, field: &'static str) -> Self {
        self.sort.push(SortKey { field, order: SortOrder::Asc });
        self
    }

    /// Appends a descending sort on `field`.
    pub fn sort_desc(mut self, field: &'static str) -> Self {
        self.sort.push(SortKey { field, order: SortOrder::Desc });
        self
    }

    /// Sets the page size.
    pub const fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Returns the query for the page following the one that ended with `last`.
    ///
    /// The cursor is read from the sort fields of `last`'s source document.
    pub fn after(mut self, last: &Hit) -> Self {
        let cursor = self
            .sort
            .iter()
            .map(|key| last.source.get(key.field).cloned().unwrap_or(Value::Null))
            .collect();
        self.search_after = Some(cursor);
        self
    }

    /// Renders the request body, using `default_size` if no size was set.
    pub fn to_body(&self, default_size: usize) -> Value {
        let mut filter = Vec::new();
        if let Some(range) = &self.range {
            filter.push(json!({ "range": { range.field: { "gte": range.gte, "lt": range.lt } } }));
        }
        let mut must_not = Vec::new();
        if let Some(field) = self.missing {
            must_not.push(json!({ "exists": { "field": field } }));
        }

        let query = if filter.is_empty() && must_not.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "bool": { "filter": filter, "must_not": must_not } })
        };
        let sort: Vec<Value> = self
            .sort
            .iter()
            .map(|key| json!({ key.field: { "order": key.order.as_str() } }))
            .collect();

        let mut body = json!({
            "query": query,
            "sort": sort,
            "size": self.size.unwrap_or(default_size),
        });
        if let Some(cursor) = &self.search_after {
            body["search_after"] = Value::Array(cursor.clone());
        }
        body
    }
}
