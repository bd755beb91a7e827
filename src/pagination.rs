//! Multi-page fetch driver.
//!
//! Walks a paged upstream resource from page 0, letting each page's
//! `totalPages` refine the loop bound, and merges the item arrays in fetch
//! order. A hard page ceiling caps iteration against a misbehaving upstream.

use std::future::Future;

use serde_json::Value;

use crate::error::AggregationResult;

/// Key carrying the page count on paged upstream responses.
pub const TOTAL_PAGES_KEY: &str = "totalPages";

/// Everything collected while walking a paged resource.
#[derive(Debug)]
pub struct MergedPages {
    // ---
    /// Items of every fetched page, page-ascending then upstream order.
    pub items: Vec<Value>,

    /// Last `totalPages` observed (1 when upstream never sent one).
    pub total_pages: u32,

    /// Number of page fetches issued.
    pub pages_fetched: u32,

    /// True when the ceiling stopped the walk before `total_pages`.
    pub truncated: bool,

    /// Body of page 0, kept only when it lacked the items key.
    pub first_page: Option<Value>,

    /// Whether any page carried the items key as an array.
    pub wrapper_seen: bool,
}

impl MergedPages {
    /// Raw page 0 when no page matched the expected schema.
    pub fn passthrough(&mut self) -> Option<Value> {
        if self.wrapper_seen {
            None
        } else {
            self.first_page.take()
        }
    }
}

/// Fetch pages `0..totalPages` (bounded by `ceiling`) and merge their
/// `items_key` arrays.
///
/// Stops when the current page reaches `totalPages`, or when it exceeds
/// `ceiling`; at most `ceiling + 1` pages are requested. Reaching the
/// ceiling logs a warning and returns what was accumulated. Any page failure
/// aborts the walk and discards the accumulated items.
pub async fn fetch_all_pages<F, Fut>(
    mut fetch_page: F,
    items_key: &str,
    ceiling: u32,
) -> AggregationResult<MergedPages>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = AggregationResult>,
{
    // ---
    let mut items = Vec::new();
    let mut current_page: u32 = 0;
    let mut total_pages: u32 = 1;
    let mut truncated = false;
    let mut first_page = None;
    let mut wrapper_seen = false;

    while current_page < total_pages {
        if current_page > ceiling {
            tracing::warn!(
                "Hit page ceiling of {} for '{}' ({} of {} pages fetched), returning {} items",
                ceiling,
                items_key,
                current_page,
                total_pages,
                items.len()
            );
            truncated = true;
            break;
        }

        let mut page = fetch_page(current_page).await?;

        if let Some(declared) = page.get(TOTAL_PAGES_KEY).and_then(declared_page_count) {
            total_pages = declared;
        }

        let page_items = page
            .get_mut(items_key)
            .and_then(Value::as_array_mut)
            .map(std::mem::take);

        match page_items {
            Some(mut page_items) => {
                tracing::debug!(
                    "Page {} of {} carried {} items",
                    current_page,
                    total_pages,
                    page_items.len()
                );
                wrapper_seen = true;
                items.append(&mut page_items);
            }
            None => {
                tracing::debug!("Page {} has no '{}' array", current_page, items_key);
                if current_page == 0 {
                    first_page = Some(page);
                }
            }
        }

        current_page += 1;
    }

    tracing::info!(
        "Fetched {} items from {} pages (upstream reports {})",
        items.len(),
        current_page,
        total_pages
    );

    Ok(MergedPages {
        items,
        total_pages,
        pages_fetched: current_page,
        truncated,
        first_page,
        wrapper_seen,
    })
}

/// `totalPages` arrives as a number; some gateways stringify it.
fn declared_page_count(value: &Value) -> Option<u32> {
    // ---
    let count = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Some(u32::try_from(count).unwrap_or(u32::MAX))
}
