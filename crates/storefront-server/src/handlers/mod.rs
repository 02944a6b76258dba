//! Request handlers.

pub mod categories;
pub mod home;
pub mod products;
pub mod redis_debug;
pub mod users;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cache::Source;
use crate::response::ApiResponse;

/// Fallback for unrouted paths.
pub async fn not_found() -> ApiResponse {
    ApiResponse::not_found("route not found")
}

/// Optional pagination parameters accepted by list endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// Wraps a full collection read into the list envelope: the plain
/// `{items, count, source}` shape, or the paginated shape when the client
/// asked for a page.
pub(crate) fn list_response<T: Serialize>(
    items: Vec<T>,
    source: Source,
    params: ListParams,
) -> ApiResponse {
    if params.page.is_none() && params.page_size.is_none() {
        let count = items.len();
        return ApiResponse::success_with(
            &json!({
                "items": items,
                "count": count,
                "source": source,
            }),
            "list retrieved",
            200,
        );
    }

    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(10).clamp(1, 100);
    let total = items.len() as u64;
    let start = ((page - 1) * page_size) as usize;
    let slice: Vec<&T> = items
        .iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    ApiResponse::paginate(&slice, total, page, page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_list_response_carries_source_tag() {
        let resp = list_response(vec!["a", "b"], Source::Cache, ListParams::default());
        assert_eq!(resp.data["source"], "cache");
        assert_eq!(resp.data["count"], 2);
        assert_eq!(resp.data["items"][1], "b");
    }

    #[test]
    fn test_paginated_list_response_slices() {
        let items: Vec<u32> = (1..=25).collect();
        let params = ListParams {
            page: Some(3),
            page_size: Some(10),
        };
        let resp = list_response(items, Source::Database, params);

        let data = &resp.data;
        assert_eq!(data["pagination"]["total"], 25);
        assert_eq!(data["pagination"]["totalPages"], 3);
        assert_eq!(data["pagination"]["hasNext"], false);
        assert_eq!(data["items"].as_array().unwrap().len(), 5);
        assert_eq!(data["items"][0], 21);
    }

    #[test]
    fn test_page_size_alone_enables_pagination() {
        let items: Vec<u32> = (1..=5).collect();
        let params = ListParams {
            page: None,
            page_size: Some(2),
        };
        let resp = list_response(items, Source::Database, params);
        assert_eq!(resp.data["pagination"]["page"], 1);
        assert_eq!(resp.data["items"].as_array().unwrap().len(), 2);
    }
}
