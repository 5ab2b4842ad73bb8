//! Candidate-management table: one interview-status tab, one page at a time.

use std::cmp::Ordering;
use std::str::FromStr;

use tracing::warn;

use crate::api::{ApiClient, Candidate, InterviewStatus};
use crate::errors::AppError;
use crate::selection::{HeaderState, Selection};

pub const FETCH_FAILED: &str = "Failed to fetch candidates";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Email,
    Location,
    Department,
    Grade,
    InterviewStatus,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Location => "location",
            SortField::Department => "department",
            SortField::Grade => "grade",
            SortField::InterviewStatus => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "email" => Ok(SortField::Email),
            "location" => Ok(SortField::Location),
            "department" => Ok(SortField::Department),
            "grade" => Ok(SortField::Grade),
            "interview_status" | "status" => Ok(SortField::InterviewStatus),
            _ => Err(format!("Cannot sort by '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

pub struct CandidateTable {
    status: InterviewStatus,
    page: u32,
    rows_per_page: u32,
    rows: Vec<Candidate>,
    total: u64,
    error: Option<String>,
    order_by: SortField,
    order: SortOrder,
    selection: Selection<i64>,
}

impl CandidateTable {
    pub fn new(status: InterviewStatus, rows_per_page: u32) -> Self {
        Self {
            status,
            page: 0,
            rows_per_page: rows_per_page.max(1),
            rows: Vec::new(),
            total: 0,
            error: None,
            order_by: SortField::default(),
            order: SortOrder::default(),
            selection: Selection::new(Vec::new()),
        }
    }

    pub fn status(&self) -> InterviewStatus {
        self.status
    }

    /// Zero-based page index.
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn rows(&self) -> &[Candidate] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn sort(&self) -> (SortField, SortOrder) {
        (self.order_by, self.order)
    }

    pub fn selection(&self) -> &Selection<i64> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection<i64> {
        &mut self.selection
    }

    pub fn header_state(&self) -> HeaderState {
        self.selection.header_state()
    }

    /// Switching tabs starts over at the first page.
    pub fn set_status(&mut self, status: InterviewStatus) {
        self.status = status;
        self.page = 0;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    /// Changing the page size starts over at the first page with nothing checked.
    pub fn set_rows_per_page(&mut self, rows_per_page: u32) {
        self.rows_per_page = rows_per_page.max(1);
        self.page = 0;
        self.selection.deselect_all();
    }

    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(u64::from(self.rows_per_page))
    }

    /// Fetches the current page. On failure the table is emptied and an error is set;
    /// stale rows are never kept.
    pub async fn load(&mut self, api: &ApiClient) {
        self.error = None;
        match api
            .list_candidates(self.page + 1, self.rows_per_page, self.status)
            .await
        {
            Ok(page) => {
                self.total = page.count;
                self.replace_rows(page.data);
            }
            Err(e) => {
                warn!("Candidate fetch failed: {e}");
                self.error = Some(match e {
                    AppError::Unauthenticated => e.user_message(),
                    _ => FETCH_FAILED.to_string(),
                });
                self.total = 0;
                self.replace_rows(Vec::new());
            }
        }
    }

    /// Replaces the rows with search results. An empty query clears the table without
    /// a request; a failed search also leaves it empty.
    pub async fn apply_search(&mut self, api: &ApiClient, query: &str) {
        if query.is_empty() {
            self.replace_rows(Vec::new());
            return;
        }
        match api.search_candidates(query).await {
            Ok(rows) => self.replace_rows(rows),
            Err(e) => {
                warn!("Candidate search failed: {e}");
                self.replace_rows(Vec::new());
            }
        }
    }

    /// Clicking the active column flips the order; a new column starts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        self.order = if self.order_by == field && self.order == SortOrder::Asc {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        self.order_by = field;
    }

    pub fn sorted_rows(&self) -> Vec<&Candidate> {
        let mut rows: Vec<&Candidate> = self.rows.iter().collect();
        rows.sort_by(|a, b| {
            let ordering = compare(a, b, self.order_by);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        rows
    }

    fn replace_rows(&mut self, rows: Vec<Candidate>) {
        self.rows = rows;
        self.selection.bind(self.rows.iter().map(|c| c.id));
    }
}

fn compare(a: &Candidate, b: &Candidate, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => compare_text(&a.name, &b.name),
        SortField::Email => compare_text(&a.email, &b.email),
        SortField::Location => compare_text(&a.location, &b.location),
        SortField::Department => compare_text(&a.department, &b.department),
        SortField::Grade => compare_text(&a.grade, &b.grade),
        SortField::InterviewStatus => compare_text(&a.interview_status, &b.interview_status),
    }
}

/// Numeric when both sides are numbers, lexical otherwise.
fn compare_text(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::Query,
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    use super::*;
    use crate::test_support::{serve, signed_in_api, unsigned_api};

    fn candidate(id: i64, name: &str) -> Candidate {
        Candidate {
            id,
            resume: None,
            skill_id: None,
            name: name.to_string(),
            grade: String::new(),
            location: String::new(),
            department: String::new(),
            email: format!("{}@example.com", name.to_lowercase()),
            interview_status: "Scheduled".to_string(),
        }
    }

    /// Serves three ids per page: page 1 → 1..=3, page 2 → 4..=6.
    async fn paged_server() -> String {
        let router = Router::new()
            .route(
                "/candidates",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let page: i64 = q["page_num"].parse().unwrap();
                    let first = (page - 1) * 3 + 1;
                    let data: Vec<_> = (first..first + 3)
                        .map(|id| json!({"id": id, "name": format!("C{id}")}))
                        .collect();
                    Json(json!({"data": data, "count": 6}))
                }),
            )
            .route(
                "/search",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    assert_eq!(q["search_text"], "mee");
                    Json(json!([{"id": 99, "name": "Meera"}]))
                }),
            );
        serve(router).await
    }

    #[tokio::test]
    async fn test_load_fills_rows_and_total() {
        let base = paged_server().await;
        let (api, _store) = signed_in_api(&base);
        let mut table = CandidateTable::new(InterviewStatus::All, 3);

        table.load(&api).await;

        assert_eq!(table.total(), 6);
        assert_eq!(table.page_count(), 2);
        assert_eq!(table.rows().len(), 3);
        assert!(table.error().is_none());
    }

    #[tokio::test]
    async fn test_changing_page_resets_selection() {
        let base = paged_server().await;
        let (api, _store) = signed_in_api(&base);
        let mut table = CandidateTable::new(InterviewStatus::All, 3);

        table.load(&api).await;
        table.selection_mut().select_all();
        assert!(table.selection().selected_all());

        table.set_page(1);
        table.load(&api).await;

        assert_eq!(table.selection().universe(), &[4, 5, 6]);
        assert!(!table.selection().selected_any());
        assert_eq!(table.header_state(), HeaderState::Unchecked);
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_rows_and_sets_error() {
        let router = Router::new().route(
            "/candidates",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(router).await;
        let (api, _store) = signed_in_api(&base);
        let mut table = CandidateTable::new(InterviewStatus::Completed, 10);
        table.rows = vec![candidate(1, "Stale")];
        table.total = 1;

        table.load(&api).await;

        assert_eq!(table.error(), Some(FETCH_FAILED));
        assert!(table.rows().is_empty());
        assert_eq!(table.total(), 0);
    }

    #[tokio::test]
    async fn test_load_without_session_asks_to_sign_in() {
        let api = unsigned_api(crate::test_support::UNREACHABLE);
        let mut table = CandidateTable::new(InterviewStatus::All, 10);

        table.load(&api).await;

        assert_eq!(table.error(), Some(crate::errors::SIGN_IN_AGAIN));
    }

    #[tokio::test]
    async fn test_search_replaces_rows_and_empty_query_clears() {
        let base = paged_server().await;
        let (api, _store) = signed_in_api(&base);
        let mut table = CandidateTable::new(InterviewStatus::All, 3);
        table.load(&api).await;

        table.apply_search(&api, "mee").await;
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].name, "Meera");

        table.apply_search(&api, "").await;
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_sort_toggles_and_orders_rows() {
        let mut table = CandidateTable::new(InterviewStatus::All, 10);
        table.rows = vec![candidate(3, "Zoya"), candidate(1, "Anil"), candidate(2, "Meera")];

        let ids = |t: &CandidateTable| t.sorted_rows().iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids(&table), vec![1, 2, 3]);

        table.sort_by(SortField::Id);
        assert_eq!(table.sort(), (SortField::Id, SortOrder::Desc));
        assert_eq!(ids(&table), vec![3, 2, 1]);

        table.sort_by(SortField::Name);
        assert_eq!(table.sort(), (SortField::Name, SortOrder::Asc));
        assert_eq!(ids(&table), vec![1, 2, 3]);
    }

    #[test]
    fn test_numeric_ids_sort_numerically() {
        let mut table = CandidateTable::new(InterviewStatus::All, 10);
        table.rows = vec![candidate(10, "A"), candidate(9, "B")];
        let ids: Vec<_> = table.sorted_rows().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![9, 10]);
    }

    #[test]
    fn test_numeric_grades_sort_numerically() {
        let mut table = CandidateTable::new(InterviewStatus::All, 10);
        let mut ten = candidate(1, "A");
        ten.grade = "10".to_string();
        let mut nine = candidate(2, "B");
        nine.grade = "9".to_string();
        table.rows = vec![ten, nine];

        table.sort_by(SortField::Grade);
        let grades: Vec<_> = table.sorted_rows().iter().map(|c| c.grade.clone()).collect();
        assert_eq!(grades, vec!["9", "10"]);

        table.sort_by(SortField::Grade);
        let grades: Vec<_> = table.sorted_rows().iter().map(|c| c.grade.clone()).collect();
        assert_eq!(grades, vec!["10", "9"]);

        assert_eq!(compare_text("L2", "10"), Ordering::Greater);
    }

    #[tokio::test]
    async fn test_rows_per_page_change_resets_page_and_selection() {
        let base = paged_server().await;
        let (api, _store) = signed_in_api(&base);
        let mut table = CandidateTable::new(InterviewStatus::All, 3);
        table.set_page(1);
        table.load(&api).await;
        table.selection_mut().select_all();

        table.set_rows_per_page(0);
        assert_eq!(table.rows_per_page(), 1);
        table.set_rows_per_page(3);
        assert_eq!(table.page(), 0);
        table.load(&api).await;

        assert_eq!(table.selection().universe(), &[1, 2, 3]);
        assert!(!table.selection().selected_any());
    }

    #[test]
    fn test_switching_tab_returns_to_first_page() {
        let mut table = CandidateTable::new(InterviewStatus::All, 10);
        table.set_page(4);
        table.set_status(InterviewStatus::Scheduled);
        assert_eq!(table.page(), 0);
        assert_eq!(table.status(), InterviewStatus::Scheduled);
    }
}
