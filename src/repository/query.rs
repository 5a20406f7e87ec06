//! Query helpers: ordering, substring search and pagination envelopes.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::{Record, CREATED_AT};

/// Sort direction for `sort` and `paginate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Parameters for `CollectionRepository::paginate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
    pub sort_field: String,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            sort_field: CREATED_AT.to_string(),
            direction: SortDirection::Desc,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page,
            per_page,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = field.into();
        self.direction = direction;
        self
    }
}

/// Pagination envelope returned alongside a page of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

/// A page of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<Record>,
    pub pagination: Pagination,
}

/// Slice an already-sorted list into a page. Page and page size of 0 are
/// treated as 1.
pub fn paginate(sorted: Vec<Record>, page: usize, per_page: usize) -> Page {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = sorted.len();
    let start = (page - 1).saturating_mul(per_page);
    let end = start.saturating_add(per_page);

    let data = sorted
        .into_iter()
        .skip(start)
        .take(per_page)
        .collect::<Vec<_>>();

    Page {
        data,
        pagination: Pagination {
            current_page: page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
            has_next: end < total,
            has_prev: page > 1,
        },
    }
}

/// Stable sort of `records` by `field`.
pub fn sort_records(records: &mut [Record], field: &str, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare_values(a.get(field), b.get(field));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Natural ordering of two field values.
///
/// Numbers compare numerically and strings lexicographically. Across types
/// the rank is missing/null, bool, number, string, then arrays and objects.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (a, b) => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Case-insensitive substring match over string-typed fields.
///
/// With no `fields`, every top-level string field of the record is
/// considered.
pub fn matches_query(record: &Record, needle_lower: &str, fields: &[&str]) -> bool {
    let hit = |value: &Value| {
        value
            .as_str()
            .map(|s| s.to_lowercase().contains(needle_lower))
            .unwrap_or(false)
    };

    if fields.is_empty() {
        record.fields().values().any(hit)
    } else {
        fields
            .iter()
            .any(|field| record.get(field).map(hit).unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn pagination_second_page_of_25() {
        let records = (0..25).map(|i| record(json!({ "n": i }))).collect();
        let page = paginate(records, 2, 10);

        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].get("n"), Some(&json!(10)));
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next);
        assert!(page.pagination.has_prev);
    }

    #[test]
    fn pagination_last_and_empty() {
        let records = (0..25).map(|i| record(json!({ "n": i }))).collect();
        let last = paginate(records, 3, 10);
        assert_eq!(last.data.len(), 5);
        assert!(!last.pagination.has_next);

        let empty = paginate(Vec::new(), 1, 10);
        assert_eq!(empty.pagination.total_pages, 0);
        assert!(!empty.pagination.has_next);
        assert!(!empty.pagination.has_prev);
    }

    #[test]
    fn pagination_clamps_zero() {
        let records = (0..3).map(|i| record(json!({ "n": i }))).collect();
        let page = paginate(records, 0, 0);
        assert_eq!(page.pagination.current_page, 1);
        assert_eq!(page.pagination.per_page, 1);
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn numbers_sort_numerically() {
        let mut records = vec![
            record(json!({ "v": 10 })),
            record(json!({ "v": 9 })),
            record(json!({ "v": 100 })),
        ];
        sort_records(&mut records, "v", SortDirection::Asc);
        let order: Vec<_> = records.iter().map(|r| r.get("v").cloned()).collect();
        assert_eq!(order, vec![Some(json!(9)), Some(json!(10)), Some(json!(100))]);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut records = vec![
            record(json!({ "k": "b", "i": 0 })),
            record(json!({ "k": "a", "i": 1 })),
            record(json!({ "k": "b", "i": 2 })),
        ];
        sort_records(&mut records, "k", SortDirection::Desc);
        let order: Vec<_> = records.iter().map(|r| r.get("i").cloned()).collect();
        assert_eq!(order, vec![Some(json!(0)), Some(json!(2)), Some(json!(1))]);
    }

    #[test]
    fn missing_values_rank_first_ascending() {
        assert_eq!(
            compare_values(None, Some(&json!("x"))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!(5)), Some(&json!("5"))),
            Ordering::Less
        );
    }

    #[test]
    fn query_matching() {
        let r = record(json!({ "name": "Green Earth", "age": 30, "city": "Pune" }));
        assert!(matches_query(&r, "earth", &[]));
        assert!(matches_query(&r, "pun", &["city"]));
        assert!(!matches_query(&r, "earth", &["city"]));
        assert!(!matches_query(&r, "30", &[]));
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("ASC".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("up".parse::<SortDirection>().is_err());
    }
}
