use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u64 = 50;
pub const MAX_PER_PAGE: u64 = 200;

#[derive(Debug, Deserialize)]
pub struct AttendanceListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub session_token: Option<String>,
    pub branch: Option<String>,
    pub section: Option<String>,
    /// Calendar day in `YYYY-MM-DD`, matched against the marking timestamp.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlaggedLogListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub roll_no: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

// Manual impl: the row types themselves have no Default, and the error path
// only needs an empty page.
impl<T> Default for PageResponse<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            total: 0,
        }
    }
}

/// Normalizes 1-based page / per_page query values into sane bounds.
pub fn page_params(page: Option<u64>, per_page: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}
