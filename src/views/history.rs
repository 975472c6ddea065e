//! Search, status filtering and pagination for the upload history table.

use crate::api::{FileRecord, StatusKind};
use std::ops::Range;

pub const PAGE_SIZE: usize = 10;
/// Most page buttons shown at once
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Failed,
    Processing,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 4] = [Self::All, Self::Completed, Self::Failed, Self::Processing];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Processing => "Processing",
        }
    }

    pub fn matches(&self, kind: &StatusKind) -> bool {
        match self {
            Self::All => true,
            Self::Completed => kind.is_successful(),
            Self::Failed => *kind == StatusKind::Failed,
            Self::Processing => *kind == StatusKind::Processing,
        }
    }
}

pub fn matches_search(record: &FileRecord, query: &str) -> bool {
    query.is_empty()
        || record
            .filename
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(&query.to_lowercase())
}

pub fn filter_files<'a>(
    files: &'a [FileRecord],
    query: &str,
    filter: StatusFilter,
) -> Vec<&'a FileRecord> {
    files
        .iter()
        .filter(|f| matches_search(f, query) && filter.matches(&f.status_kind()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub total_items: usize,
    pub total_pages: usize,
    /// 1-based, clamped into `1..=total_pages` (1 when there are no pages)
    pub current_page: usize,
}

impl Pagination {
    pub fn new(total_items: usize, requested_page: usize) -> Self {
        let total_pages = total_items.div_ceil(PAGE_SIZE);
        let current_page = requested_page.clamp(1, total_pages.max(1));
        Self {
            total_items,
            total_pages,
            current_page,
        }
    }

    /// Indices of the rows shown on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * PAGE_SIZE).min(self.total_items);
        let end = (start + PAGE_SIZE).min(self.total_items);
        start..end
    }

    /// Page numbers to offer as buttons, keeping the current page centered
    /// where the ends allow it.
    pub fn window(&self) -> Vec<usize> {
        let count = PAGE_WINDOW.min(self.total_pages);
        let first = if self.total_pages <= PAGE_WINDOW || self.current_page <= 3 {
            1
        } else if self.current_page + 2 >= self.total_pages {
            self.total_pages + 1 - PAGE_WINDOW
        } else {
            self.current_page - 2
        };
        (first..first + count).collect()
    }

    /// Page controls are only worth showing with more than one page.
    pub fn is_paged(&self) -> bool {
        self.total_pages > 1
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn summary(&self) -> String {
        let range = self.range();
        format!(
            "Showing {} to {} of {} results",
            range.start + 1,
            range.end,
            self.total_items
        )
    }
}

/// Rows for one page of the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage<'a> {
    pub rows: Vec<&'a FileRecord>,
    pub pagination: Pagination,
}

impl HistoryPage<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn history_page<'a>(
    files: &'a [FileRecord],
    query: &str,
    filter: StatusFilter,
    page: usize,
) -> HistoryPage<'a> {
    let mut matching = filter_files(files, query, filter);
    let pagination = Pagination::new(matching.len(), page);
    let range = pagination.range();
    matching.truncate(range.end);
    let rows = matching.split_off(range.start);
    HistoryPage { rows, pagination }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::record;

    #[test]
    fn test_single_page_is_not_paged() {
        assert!(!Pagination::new(0, 1).is_paged());
        assert!(!Pagination::new(PAGE_SIZE, 1).is_paged());
        assert!(Pagination::new(PAGE_SIZE + 1, 1).is_paged());
    }

    fn uploads(count: usize) -> Vec<FileRecord> {
        (1..=count)
            .map(|i| record(&i.to_string(), &format!("file_{i}.csv"), "COMPLETED"))
            .collect()
    }

    #[test]
    fn test_failed_filter_scenario() {
        let files = vec![record("1", "a.csv", "FAILED")];

        let failed = history_page(&files, "", StatusFilter::Failed, 1);
        assert_eq!(failed.rows.len(), 1);
        assert_eq!(failed.rows[0].display_name(), "a.csv");

        let completed = history_page(&files, "", StatusFilter::Completed, 1);
        assert!(completed.is_empty());
        assert_eq!(completed.pagination.total_pages, 0);
    }

    #[test]
    fn test_filters_are_case_insensitive() {
        let files = vec![
            record("1", "Customers.CSV", "Completed"),
            record("2", "orders.csv", "processed"),
            record("3", "inventory.xlsx", "Failed"),
            record("4", "Vendors.xlsx", "PROCESSING"),
            record("5", "notes.csv", "UPLOADED"),
        ];

        let names = |filter, query| -> Vec<String> {
            filter_files(&files, query, filter)
                .iter()
                .map(|f| f.display_name().to_string())
                .collect()
        };

        assert_eq!(names(StatusFilter::Completed, ""), ["Customers.CSV", "orders.csv"]);
        assert_eq!(names(StatusFilter::Failed, ""), ["inventory.xlsx"]);
        assert_eq!(names(StatusFilter::Processing, ""), ["Vendors.xlsx"]);
        assert_eq!(names(StatusFilter::All, "").len(), 5);
        assert_eq!(names(StatusFilter::All, "CUSTOM"), ["Customers.CSV"]);
        assert_eq!(names(StatusFilter::All, ".xlsx"), ["inventory.xlsx", "Vendors.xlsx"]);
        assert!(names(StatusFilter::Failed, "orders").is_empty());
    }

    #[test]
    fn test_search_skips_unnamed_records() {
        let unnamed = FileRecord::default();
        assert!(matches_search(&unnamed, ""));
        assert!(!matches_search(&unnamed, "a"));
    }

    #[test]
    fn test_page_count_and_ranges() {
        for total in [0usize, 1, 9, 10, 11, 20, 25, 101] {
            let pages = Pagination::new(total, 1).total_pages;
            assert_eq!(pages, (total + PAGE_SIZE - 1) / PAGE_SIZE, "total {total}");

            for page in 1..=pages {
                let range = Pagination::new(total, page).range();
                assert_eq!(range.start, PAGE_SIZE * (page - 1));
                assert_eq!(range.end, (PAGE_SIZE * page).min(total));
            }
        }
    }

    #[test]
    fn test_page_is_clamped() {
        assert_eq!(Pagination::new(25, 0).current_page, 1);
        assert_eq!(Pagination::new(25, 9).current_page, 3);
        assert_eq!(Pagination::new(0, 4).current_page, 1);
        assert_eq!(Pagination::new(0, 4).range(), 0..0);
    }

    #[test]
    fn test_history_page_slices_rows() {
        let files = uploads(15);
        let page = history_page(&files, "", StatusFilter::All, 2);
        let ids: Vec<_> = page.rows.iter().filter_map(|f| f.id()).collect();
        assert_eq!(ids, ["11", "12", "13", "14", "15"]);
        assert_eq!(page.pagination.summary(), "Showing 11 to 15 of 15 results");
        assert!(page.pagination.has_previous());
        assert!(!page.pagination.has_next());
    }

    #[test]
    fn test_window_slides_with_current_page() {
        let window = |total_pages: usize, page: usize| {
            Pagination::new(total_pages * PAGE_SIZE, page).window()
        };

        assert_eq!(window(3, 2), [1, 2, 3]);
        assert_eq!(window(5, 5), [1, 2, 3, 4, 5]);
        assert_eq!(window(10, 1), [1, 2, 3, 4, 5]);
        assert_eq!(window(10, 3), [1, 2, 3, 4, 5]);
        assert_eq!(window(10, 4), [2, 3, 4, 5, 6]);
        assert_eq!(window(10, 7), [5, 6, 7, 8, 9]);
        assert_eq!(window(10, 8), [6, 7, 8, 9, 10]);
        assert_eq!(window(10, 10), [6, 7, 8, 9, 10]);
        assert!(window(0, 1).is_empty());
    }
}
