use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use crate::response::ApiResponse;
use db::models::{attendance_record, flagged_log};
use util::state::AppState;

use super::common::{AttendanceListQuery, FlaggedLogListQuery, PageResponse, page_params};

/// GET /admin/attendance
///
/// Paginated attendance report, newest first. Optional filters:
/// `session_token`, `branch`, `section`, and `date` (a `YYYY-MM-DD` day).
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<AttendanceListQuery>,
) -> (
    StatusCode,
    Json<ApiResponse<PageResponse<attendance_record::Model>>>,
) {
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut find = attendance_record::Entity::find()
        .order_by_desc(attendance_record::Column::Timestamp);

    if let Some(token) = &query.session_token {
        find = find.filter(attendance_record::Column::SessionToken.eq(token));
    }
    if let Some(branch) = &query.branch {
        find = find.filter(attendance_record::Column::Branch.eq(branch));
    }
    if let Some(section) = &query.section {
        find = find.filter(attendance_record::Column::Section.eq(section));
    }
    if let Some(date) = &query.date {
        let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!(
                    "Invalid date '{date}'; expected YYYY-MM-DD"
                ))),
            );
        };
        let start = Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap_or_default());
        let end = start + Duration::days(1);
        find = find
            .filter(attendance_record::Column::Timestamp.gte(start))
            .filter(attendance_record::Column::Timestamp.lt(end));
    }

    let paginator = find.paginate(state.db(), per_page);
    let total = match paginator.num_items().await {
        Ok(n) => n,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };
    match paginator.fetch_page(page - 1).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                PageResponse {
                    items,
                    page,
                    per_page,
                    total,
                },
                "Attendance retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /admin/flagged-logs
///
/// Paginated flagged-attempt report, newest first. Optional filters:
/// `roll_no` and `reason` (exact match on the stored reason string).
///
/// Reads go through the audit connection so the report reflects exactly what
/// that channel committed.
pub async fn list_flagged_logs(
    State(state): State<AppState>,
    Query(query): Query<FlaggedLogListQuery>,
) -> (
    StatusCode,
    Json<ApiResponse<PageResponse<flagged_log::Model>>>,
) {
    let (page, per_page) = page_params(query.page, query.per_page);

    let mut find = flagged_log::Entity::find().order_by_desc(flagged_log::Column::Timestamp);

    if let Some(roll_no) = &query.roll_no {
        find = find.filter(flagged_log::Column::RollNo.eq(roll_no));
    }
    if let Some(reason) = &query.reason {
        find = find.filter(flagged_log::Column::Reason.eq(reason));
    }

    let paginator = find.paginate(state.audit_db(), per_page);
    let total = match paginator.num_items().await {
        Ok(n) => n,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };
    match paginator.fetch_page(page - 1).await {
        Ok(items) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                PageResponse {
                    items,
                    page,
                    per_page,
                    total,
                },
                "Flagged logs retrieved",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
