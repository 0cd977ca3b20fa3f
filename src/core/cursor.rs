use crate::types::{ListStatus, PageNumber};

/// Page/query/status tracking for the paginated listing.
///
/// `page` stays within `1..=total_pages` and `total_pages` is at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCursor {
    page: PageNumber,
    query: String,
    status: ListStatus,
    total_pages: PageNumber,
}

impl Default for ListCursor {
    fn default() -> Self {
        Self {
            page: 1,
            query: String::new(),
            status: ListStatus::Idle,
            total_pages: 1,
        }
    }
}

impl ListCursor {
    /// Current page, 1-based.
    pub fn page(&self) -> PageNumber {
        self.page
    }

    /// Active name filter.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Fetch status.
    pub fn status(&self) -> ListStatus {
        self.status
    }

    /// Page count reported by the last response, at least 1.
    pub fn total_pages(&self) -> PageNumber {
        self.total_pages
    }

    /// Returns true while pages remain past the current one.
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    pub(crate) fn set_page(&mut self, page: PageNumber) {
        self.page = page.clamp(1, self.total_pages);
    }

    pub(crate) fn set_query(&mut self, query: String) {
        self.query = query;
    }

    pub(crate) fn set_status(&mut self, status: ListStatus) {
        self.status = status;
    }

    pub(crate) fn set_total_pages(&mut self, total: PageNumber) {
        self.total_pages = total.max(1);
        self.page = self.page.min(self.total_pages);
    }
}
