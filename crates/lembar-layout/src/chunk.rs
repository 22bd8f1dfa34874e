// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Item ordering and page chunking.

use lembar_core::ItemRow;
use lembar_core::error::{LembarError, Result};
use serde::Serialize;
use tracing::debug;

/// A contiguous run of items assigned to one page. Borrowed from the ordered
/// item list; regenerated on every render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageChunk<'a> {
    /// 0-based page index.
    pub page_index: usize,
    pub is_first_page: bool,
    pub is_last_page: bool,
    /// 1-based number of the first row, continuing across pages.
    pub first_row_number: usize,
    pub rows: &'a [ItemRow],
}

impl PageChunk<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Put rows into print order.
///
/// Rows with a `sort_order` come first, ascending; rows without one follow in
/// retrieval order. The sort is stable, so ties keep retrieval order and
/// ordering an already ordered list is a no-op.
pub fn order_items(mut rows: Vec<ItemRow>) -> Vec<ItemRow> {
    rows.sort_by_key(|row| (row.sort_order.is_none(), row.sort_order));
    rows
}

/// Number of pages `item_count` rows need at `capacity` rows per page.
pub fn page_count(item_count: usize, capacity: usize) -> Result<usize> {
    if capacity == 0 {
        return Err(LembarError::InvalidCapacity { capacity });
    }
    Ok(item_count.div_ceil(capacity).max(1))
}

/// Split an ordered item list into page-sized chunks.
///
/// An empty list still yields one empty chunk so the header and signature
/// block print. No reordering, no filtering.
pub fn chunk(items: &[ItemRow], capacity: usize) -> Result<Vec<PageChunk<'_>>> {
    let total = page_count(items.len(), capacity)?;

    let chunks: Vec<PageChunk<'_>> = if items.is_empty() {
        vec![PageChunk {
            page_index: 0,
            is_first_page: true,
            is_last_page: true,
            first_row_number: 1,
            rows: items,
        }]
    } else {
        items
            .chunks(capacity)
            .enumerate()
            .map(|(page_index, rows)| PageChunk {
                page_index,
                is_first_page: page_index == 0,
                is_last_page: page_index + 1 == total,
                first_row_number: page_index * capacity + 1,
                rows,
            })
            .collect()
    };

    debug!(items = items.len(), capacity, pages = chunks.len(), "Items chunked");
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<ItemRow> {
        (0..n).map(|i| ItemRow::new(format!("item-{i}"), i as f64)).collect()
    }

    fn lengths(chunks: &[PageChunk<'_>]) -> Vec<usize> {
        chunks.iter().map(PageChunk::len).collect()
    }

    #[test]
    fn capacity_boundaries() {
        assert_eq!(lengths(&chunk(&items(5), 5).unwrap()), [5]);
        assert_eq!(lengths(&chunk(&items(6), 5).unwrap()), [5, 1]);
        assert_eq!(lengths(&chunk(&items(10), 5).unwrap()), [5, 5]);
    }

    #[test]
    fn empty_list_yields_one_empty_page() {
        let chunks = chunk(&[], 5).unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
        assert!(chunks[0].is_first_page);
        assert!(chunks[0].is_last_page);
    }

    #[test]
    fn zero_capacity_fails_fast() {
        let err = chunk(&items(3), 0).unwrap_err();
        assert!(matches!(err, LembarError::InvalidCapacity { capacity: 0 }));
        assert!(page_count(0, 0).is_err());
    }

    #[test]
    fn chunks_concatenate_to_the_original_list() {
        for n in 0..=23 {
            for capacity in 1..=7 {
                let list = items(n);
                let chunks = chunk(&list, capacity).unwrap();
                let expected_pages = if n == 0 { 1 } else { n.div_ceil(capacity) };
                assert_eq!(chunks.len(), expected_pages, "n={n} capacity={capacity}");

                let rejoined: Vec<&ItemRow> = chunks.iter().flat_map(|c| c.rows).collect();
                let original: Vec<&ItemRow> = list.iter().collect();
                assert_eq!(rejoined, original, "n={n} capacity={capacity}");
                assert!(chunks.iter().all(|c| c.len() <= capacity));
            }
        }
    }

    #[test]
    fn first_and_last_flags() {
        let list = items(11);
        let chunks = chunk(&list, 4).unwrap();
        let flags: Vec<(bool, bool)> = chunks
            .iter()
            .map(|c| (c.is_first_page, c.is_last_page))
            .collect();
        assert_eq!(flags, [(true, false), (false, false), (false, true)]);
        let indices: Vec<usize> = chunks.iter().map(|c| c.page_index).collect();
        assert_eq!(indices, [0, 1, 2]);
    }

    #[test]
    fn row_numbers_continue_across_pages() {
        let list = items(11);
        let chunks = chunk(&list, 4).unwrap();
        let starts: Vec<usize> = chunks.iter().map(|c| c.first_row_number).collect();
        assert_eq!(starts, [1, 5, 9]);
    }

    #[test]
    fn chunking_is_deterministic() {
        let list = items(17);
        assert_eq!(chunk(&list, 4).unwrap(), chunk(&list, 4).unwrap());
    }

    #[test]
    fn ordering_uses_sort_order_then_retrieval_order() {
        let rows = vec![
            ItemRow::new("loose-a", 1.0),
            ItemRow::new("third", 1.0).with_sort_order(3),
            ItemRow::new("first", 1.0).with_sort_order(1),
            ItemRow::new("loose-b", 1.0),
            ItemRow::new("tie-x", 1.0).with_sort_order(2),
            ItemRow::new("tie-y", 1.0).with_sort_order(2),
        ];
        let names: Vec<String> = order_items(rows).into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["first", "tie-x", "tie-y", "third", "loose-a", "loose-b"]);
    }

    #[test]
    fn ordering_is_idempotent() {
        let rows = vec![
            ItemRow::new("b", 1.0).with_sort_order(2),
            ItemRow::new("a", 1.0).with_sort_order(1),
            ItemRow::new("c", 1.0),
        ];
        let once = order_items(rows);
        let twice = order_items(once.clone());
        assert_eq!(once, twice);
    }
}
